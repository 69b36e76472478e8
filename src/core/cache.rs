//! Time-limited memoization of built scenes.
//!
//! Keys are the complete [`SceneParams`] tuple, so a cached entry is always
//! exactly what [`build_scene`](crate::scene::build_scene) would return.

use std::sync::Arc;
use std::time::{Duration, Instant};

use hashbrown::HashMap;
use tracing::debug;

use crate::error::VizResult;
use crate::scene::{SceneDescription, SceneParams};

pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

struct Entry {
    built_at: Instant,
    scene: Arc<SceneDescription>,
}

pub struct SceneCache {
    ttl: Duration,
    entries: HashMap<SceneParams, Entry>,
    hits: u64,
    misses: u64,
}

impl Default for SceneCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl SceneCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
            hits: 0,
            misses: 0,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(hits, misses)` since construction.
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }

    pub fn get_or_build<F>(&mut self, key: SceneParams, build: F) -> VizResult<Arc<SceneDescription>>
    where
        F: FnOnce() -> VizResult<SceneDescription>,
    {
        self.get_or_build_at(key, Instant::now(), build)
    }

    /// Same as [`get_or_build`](Self::get_or_build) with an explicit clock.
    /// Failed builds are not stored.
    pub fn get_or_build_at<F>(
        &mut self,
        key: SceneParams,
        now: Instant,
        build: F,
    ) -> VizResult<Arc<SceneDescription>>
    where
        F: FnOnce() -> VizResult<SceneDescription>,
    {
        if let Some(entry) = self.entries.get(&key) {
            if now.saturating_duration_since(entry.built_at) < self.ttl {
                self.hits += 1;
                debug!(?key, "scene cache hit");
                return Ok(Arc::clone(&entry.scene));
            }
        }

        self.misses += 1;
        let purged = self.purge_expired(now);
        debug!(?key, purged, "scene cache miss");
        let scene = Arc::new(build()?);
        self.entries.insert(
            key,
            Entry {
                built_at: now,
                scene: Arc::clone(&scene),
            },
        );
        Ok(scene)
    }

    /// Drops entries older than the TTL.
    pub fn purge_expired(&mut self, now: Instant) -> usize {
        let before = self.entries.len();
        let ttl = self.ttl;
        self.entries
            .retain(|_, e| now.saturating_duration_since(e.built_at) < ttl);
        before - self.entries.len()
    }
}
