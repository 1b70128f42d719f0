//! Runs each feeder as an independent long-lived task.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::Feeder;

/// Spawns one loop per feeder. Tasks are uncoordinated and run until the
/// process exits; per-item failures are logged and never stop a loop.
pub fn spawn_feeders(feeders: Vec<Arc<dyn Feeder>>) -> Vec<JoinHandle<()>> {
    feeders
        .into_iter()
        .map(|feeder| {
            tokio::spawn(async move {
                loop {
                    if feeder.is_active().await {
                        for outcome in feeder.run_pass().await {
                            match outcome {
                                Ok(message) => info!(feeder = feeder.name(), "{message}"),
                                Err(err) => {
                                    error!(feeder = feeder.name(), "feed item failed: {err:#}")
                                }
                            }
                        }
                        info!(feeder = feeder.name(), "completed feed pass");
                    }
                    tokio::time::sleep(feeder.interval()).await;
                }
            })
        })
        .collect()
}
