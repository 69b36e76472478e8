//! cortexd: hosts a speech-cortex dashboard behind a JSON-lines protocol.
//!
//! Requests arrive one per line on stdin; each produces exactly one response
//! line on stdout. Logs go to stderr.

use std::sync::Arc;

use speech_cortex::dashboard::Dashboard;
use speech_cortex::dataset::Dataset;
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{error, info, warn};

mod config;
mod paths;
mod protocol;

use config::CortexConfig;
use paths::AppPaths;
use protocol::{Command, Request, Response};

// ═══════════════════════════════════════════════════════════════════════════
// Request handling
// ═══════════════════════════════════════════════════════════════════════════

/// Result of one request: the response line and whether to keep serving.
fn handle_request(dashboard: &mut Dashboard, request: Request) -> (Response, bool) {
    let command = match Command::try_from(request) {
        Ok(c) => c,
        Err(e) => return (Response::error(e), true),
    };

    let response = match command {
        Command::Controls => Response::Controls {
            controls: dashboard.controls(),
        },
        Command::GetState => Response::State {
            state: dashboard.state().clone(),
        },
        Command::Render => match dashboard.render() {
            Ok(outputs) => Response::Outputs { outputs },
            Err(e) => Response::error(e),
        },
        Command::Event(event) => match dashboard.handle(event) {
            Ok(outputs) => Response::Outputs { outputs },
            Err(e) => Response::error(e),
        },
        Command::Shutdown => {
            return (
                Response::Success {
                    message: "Shutting down".to_string(),
                },
                false,
            )
        }
    };
    (response, true)
}

async fn write_response<W>(writer: &mut W, response: &Response) -> Result<(), Box<dyn std::error::Error>>
where
    W: AsyncWrite + Unpin,
{
    writer
        .write_all(serde_json::to_string(response)?.as_bytes())
        .await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}

/// Serves requests until EOF or `Shutdown`. Events are handled one at a time.
async fn serve<R, W>(
    reader: R,
    mut writer: W,
    dashboard: &mut Dashboard,
) -> Result<(), Box<dyn std::error::Error>>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let request: Request = match serde_json::from_str(&line) {
            Ok(req) => req,
            Err(e) => {
                warn!("Invalid request: {}", e);
                let resp = Response::Error {
                    message: format!("Invalid request: {}", e),
                };
                write_response(&mut writer, &resp).await?;
                continue;
            }
        };

        let (response, keep_running) = handle_request(dashboard, request);
        write_response(&mut writer, &response).await?;
        if !keep_running {
            info!("Shutdown requested");
            break;
        }
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════
// Entry point
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // stdout carries protocol frames
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let paths = AppPaths::new()?;
    info!("Data directory: {}", paths.data_dir().display());
    let cfg = CortexConfig::load(&paths)?;
    let dataset_path = cfg.dataset_path(&paths);

    let dataset = match Dataset::load_bundle(&dataset_path, &cfg.load_options()) {
        Ok(d) => d,
        Err(e) => {
            error!("Could not load dataset {}: {}", dataset_path.display(), e);
            return Err(e.into());
        }
    };

    let mut dashboard = Dashboard::with_cache(Arc::new(dataset), cfg.scene_cache());
    info!(
        cache = cfg.cache_enabled,
        ttl_secs = cfg.cache_ttl_secs,
        "cortexd ready on stdin/stdout"
    );

    serve(BufReader::new(io::stdin()), io::stdout(), &mut dashboard).await?;
    info!("cortexd stopped");
    Ok(())
}
