use std::path::PathBuf;

use deckwatch_core::session::SessionHandle;
use deckwatch_core::telemetry::tail_telemetry;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Start following the telemetry capture, if it exists.
pub fn start_telemetry_tail(
    path: PathBuf,
    from_start: bool,
    session: SessionHandle,
) -> Option<JoinHandle<()>> {
    if !path.exists() {
        warn!(path = %path.display(), "Telemetry file does not exist, running console only");
        return None;
    }

    info!(path = %path.display(), from_start, "Following telemetry");

    let handle = tokio::spawn(async move {
        if let Err(e) = tail_telemetry(&path, from_start, session).await {
            error!(error = %e, path = %path.display(), "Telemetry tail stopped");
        }
    });

    Some(handle)
}
