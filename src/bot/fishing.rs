use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::bot::capabilities::Capabilities;
use crate::error::Result;
use crate::state::Hand;

pub const FISHING_ROD: &str = "fishing_rod";

/// A running fishing loop. Dropping the handle stops it.
pub struct FishingHandle {
    stop: Arc<AtomicBool>,
    task: JoinHandle<u32>,
}

impl FishingHandle {
    /// Ask the loop to stop. A cast already in flight still completes.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Stop and wait for the loop to exit, returning the number of catches
    pub async fn join(mut self) -> u32 {
        self.stop();
        (&mut self.task).await.unwrap_or(0)
    }
}

impl Drop for FishingHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Equip a rod and keep fishing until stopped or a cast fails.
///
/// Returns an error (and spawns nothing) when the rod cannot be equipped.
pub async fn start<C>(caps: Arc<C>) -> Result<FishingHandle>
where
    C: Capabilities + ?Sized + 'static,
{
    caps.equip(FISHING_ROD, Hand::Main).await?;

    let stop = Arc::new(AtomicBool::new(false));
    let flag = stop.clone();
    let task = tokio::spawn(async move {
        let mut catches = 0u32;
        while !flag.load(Ordering::SeqCst) {
            match caps.fish().await {
                Ok(()) => {
                    catches += 1;
                    debug!(catches, "reeled in a catch");
                }
                Err(e) => {
                    warn!(error = %e, "fishing aborted");
                    if let Err(e) = caps.chat(&format!("Fishing failed: {}", e)).await {
                        warn!(error = %e, "could not report fishing failure");
                    }
                    break;
                }
            }
        }
        info!(catches, "fishing loop finished");
        catches
    });

    Ok(FishingHandle { stop, task })
}
