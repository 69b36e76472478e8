//! Inventory of the UI controls the dashboard exposes.
//!
//! Kept free of any rendering concern so the host (and tests) can list the
//! controls and parse their wire values without a running UI.

use serde::Serialize;

use crate::scene::{ColorMode, SceneParams, ViewMode};
use crate::statistic::StatisticType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlId {
    ViewMode,
    ColorMode,
    Statistic,
    ShowBrain,
}

impl ControlId {
    pub fn label(self) -> &'static str {
        match self {
            ControlId::ViewMode => "View",
            ControlId::ColorMode => "Color by",
            ControlId::Statistic => "Statistic",
            ControlId::ShowBrain => "Show whole brain",
        }
    }

    pub fn all() -> &'static [ControlId] {
        &[
            ControlId::ViewMode,
            ControlId::ColorMode,
            ControlId::Statistic,
            ControlId::ShowBrain,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlKind {
    Dropdown,
    Radio,
    Toggle,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControlOption {
    pub label: String,
    pub value: String,
}

impl ControlOption {
    fn new(label: &str, value: impl Into<String>) -> Self {
        Self {
            label: label.to_string(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Control {
    pub id: ControlId,
    pub label: String,
    pub kind: ControlKind,
    /// Empty for toggles.
    pub options: Vec<ControlOption>,
    pub default_value: String,
}

impl Control {
    pub fn accepts(&self, value: &str) -> bool {
        match self.kind {
            ControlKind::Toggle => matches!(value, "true" | "false"),
            _ => self.options.iter().any(|o| o.value == value),
        }
    }
}

/// Every control, in display order, with defaults taken from `defaults`.
pub fn inventory(defaults: &SceneParams) -> Vec<Control> {
    vec![
        Control {
            id: ControlId::ViewMode,
            label: ControlId::ViewMode.label().to_string(),
            kind: ControlKind::Dropdown,
            options: ViewMode::all()
                .iter()
                .map(|m| ControlOption::new(m.label(), m.wire_value()))
                .collect(),
            default_value: defaults.view.wire_value().to_string(),
        },
        Control {
            id: ControlId::ColorMode,
            label: ControlId::ColorMode.label().to_string(),
            kind: ControlKind::Radio,
            options: ColorMode::all()
                .iter()
                .map(|m| ControlOption::new(m.label(), m.wire_value()))
                .collect(),
            default_value: defaults.color.wire_value().to_string(),
        },
        Control {
            id: ControlId::Statistic,
            label: ControlId::Statistic.label().to_string(),
            kind: ControlKind::Dropdown,
            options: StatisticType::all()
                .iter()
                .map(|s| ControlOption::new(s.label(), s.code().to_string()))
                .collect(),
            default_value: defaults.statistic.to_string(),
        },
        Control {
            id: ControlId::ShowBrain,
            label: ControlId::ShowBrain.label().to_string(),
            kind: ControlKind::Toggle,
            options: Vec::new(),
            default_value: defaults.show_full_brain.to_string(),
        },
    ]
}

/// Text shown beside the whole-brain toggle.
pub fn brain_label(show_full_brain: bool) -> &'static str {
    if show_full_brain {
        "Whole brain"
    } else {
        "Temporal lobe only"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_inventory_is_stable() {
        let controls = inventory(&SceneParams::default());
        let ids: Vec<ControlId> = controls.iter().map(|c| c.id).collect();
        assert_eq!(ids, ControlId::all().to_vec());

        for c in &controls {
            assert!(!c.label.trim().is_empty());
            assert!(c.accepts(&c.default_value), "{:?} rejects its default", c.id);
            for o in &c.options {
                assert!(!o.label.trim().is_empty());
            }
        }
    }

    #[test]
    fn statistic_dropdown_lists_eight_codes() {
        let controls = inventory(&SceneParams::default());
        let stat = controls
            .iter()
            .find(|c| c.id == ControlId::Statistic)
            .unwrap();
        let values: Vec<&str> = stat.options.iter().map(|o| o.value.as_str()).collect();
        assert_eq!(values, ["0", "1", "2", "3", "4", "5", "12", "20"]);
        assert_eq!(stat.default_value, "12");
        for v in values {
            assert!(v.parse::<StatisticType>().is_ok());
        }
    }

    #[test]
    fn option_values_parse_into_selectors() {
        let controls = inventory(&SceneParams::default());
        for c in &controls {
            for o in &c.options {
                match c.id {
                    ControlId::ViewMode => assert!(o.value.parse::<ViewMode>().is_ok()),
                    ControlId::ColorMode => assert!(o.value.parse::<ColorMode>().is_ok()),
                    ControlId::Statistic => assert!(o.value.parse::<StatisticType>().is_ok()),
                    ControlId::ShowBrain => unreachable!("toggles carry no options"),
                }
            }
        }
    }

    #[test]
    fn toggle_defaults_on() {
        let controls = inventory(&SceneParams::default());
        let toggle = controls.last().unwrap();
        assert_eq!(toggle.kind, ControlKind::Toggle);
        assert_eq!(toggle.default_value, "true");
        assert!(!toggle.accepts("yes"));
    }

    #[test]
    fn brain_label_tracks_toggle() {
        assert_eq!(brain_label(true), "Whole brain");
        assert_eq!(brain_label(false), "Temporal lobe only");
    }
}
