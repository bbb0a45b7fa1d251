//! Follow a newline-delimited JSON telemetry capture.

use std::io::{Result, SeekFrom};
use std::path::Path;

use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncSeekExt, BufReader};
use tokio::time::{Duration, sleep};
use tracing::{debug, warn};

use super::parse_update;
use crate::session::SessionHandle;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Tail `path`, forwarding each parsed line to the session.
///
/// Starts at the end of the file unless `from_start` is set. Malformed lines are
/// logged and skipped. Returns once the session has shut down.
pub async fn tail_telemetry<P: AsRef<Path>>(
    path: P,
    from_start: bool,
    session: SessionHandle,
) -> Result<()> {
    let file = File::open(&path).await?;
    let mut reader = BufReader::new(file);

    if !from_start {
        reader.seek(SeekFrom::End(0)).await?;
    }

    let mut buf = Vec::new();
    let mut line_number: u64 = 0;

    loop {
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => {
                if session.is_closed() {
                    return Ok(());
                }
                sleep(POLL_INTERVAL).await;
            }
            Ok(_) if buf.last() != Some(&b'\n') => {
                // Writer is mid-line, wait for the rest
                sleep(POLL_INTERVAL).await;
            }
            Ok(_) => {
                line_number += 1;
                match std::str::from_utf8(&buf) {
                    Ok(line) if line.trim().is_empty() => {}
                    Ok(line) => match parse_update(line) {
                        Ok(update) => {
                            if session.send(update).await.is_err() {
                                debug!("Session closed, stopping telemetry tail");
                                return Ok(());
                            }
                        }
                        Err(e) => warn!(line = line_number, error = %e, "Skipping telemetry line"),
                    },
                    Err(e) => warn!(line = line_number, error = %e, "Skipping non UTF-8 telemetry line"),
                }
                buf.clear();
            }
            Err(e) => {
                warn!(error = %e, "Error reading telemetry line");
                return Err(e);
            }
        }
    }
}
