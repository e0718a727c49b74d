//! Detection log: a bounded, newest-first list of a patient's detections,
//! refreshed on an interval until cancelled.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use stemsight_core::types::DbId;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::ClientError;
use crate::model::Event;

/// Where detections come from.
#[async_trait]
pub trait DetectionSource: Send + Sync {
    async fn detections(&self, patient_id: DbId) -> Result<Vec<Event>, ClientError>;
}

#[derive(Debug, Clone)]
pub struct DetectionLog {
    capacity: usize,
    entries: VecDeque<Event>,
    seen: HashSet<DbId>,
}

impl DetectionLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: VecDeque::new(),
            seen: HashSet::new(),
        }
    }

    /// Newest first.
    pub fn entries(&self) -> impl Iterator<Item = &Event> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Merge a fetched batch. Already-logged events are skipped; the oldest
    /// entries fall off once the log is full. Returns how many were added.
    pub fn merge(&mut self, mut batch: Vec<Event>) -> usize {
        batch.sort_by(|a, b| a.created_at.cmp(&b.created_at));

        let mut added = 0;
        for event in batch {
            if !self.seen.insert(event.id) {
                continue;
            }
            self.entries.push_front(event);
            added += 1;
        }

        while self.entries.len() > self.capacity {
            if let Some(dropped) = self.entries.pop_back() {
                self.seen.remove(&dropped.id);
            }
        }
        added
    }
}

/// Shortest refresh period the feed will run at.
pub const MIN_FEED_INTERVAL: Duration = Duration::from_millis(1);

/// Refresh `log` from `source` every `interval` until `cancel` fires.
///
/// Fetch failures are logged and the previous entries kept. Intervals below
/// [`MIN_FEED_INTERVAL`] are raised to it.
pub fn spawn_detection_feed<S>(
    source: Arc<S>,
    patient_id: DbId,
    interval: Duration,
    log: Arc<RwLock<DetectionLog>>,
    cancel: CancellationToken,
) -> JoinHandle<()>
where
    S: DetectionSource + ?Sized + 'static,
{
    if interval < MIN_FEED_INTERVAL {
        tracing::warn!(patient_id = %patient_id, ?interval, "Detection feed interval too short, raised to minimum");
    }
    let interval = interval.max(MIN_FEED_INTERVAL);

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        tracing::info!(patient_id = %patient_id, "Detection feed started");

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!(patient_id = %patient_id, "Detection feed stopped");
                    break;
                }
                _ = ticker.tick() => {
                    match source.detections(patient_id).await {
                        Ok(batch) => {
                            let added = log.write().await.merge(batch);
                            if added > 0 {
                                tracing::debug!(patient_id = %patient_id, added, "New detections");
                            }
                        }
                        Err(e) => {
                            tracing::warn!(patient_id = %patient_id, error = %e, "Failed to refresh detections");
                        }
                    }
                }
            }
        }
    })
}
