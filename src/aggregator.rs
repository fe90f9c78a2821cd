use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::github::{BlobSource, TreeEntry};
use crate::output::{render_merged, FetchedFile};

pub const DEFAULT_BATCH_SIZE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

impl Progress {
    pub fn is_done(&self) -> bool {
        self.completed == self.total
    }
}

/// Fetches selected blobs in sequential batches of concurrent requests.
///
/// At most `batch_size` requests are in flight at once, and batch *k+1*
/// starts only after every fetch in batch *k* has settled. Results are
/// assembled by position, so output order always equals input order.
pub struct Aggregator<S> {
    source: Arc<S>,
    batch_size: usize,
}

impl<S> Aggregator<S>
where
    S: BlobSource + 'static,
{
    pub fn new(source: Arc<S>) -> Self {
        Self {
            source,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Fetches every entry, yielding exactly one [`FetchedFile`] per entry.
    ///
    /// Per-file failures become bracketed placeholder content. Only a task
    /// that cannot be joined aborts the run.
    pub async fn fetch_all<F>(
        &self,
        entries: &[TreeEntry],
        mut on_progress: F,
    ) -> Result<Vec<FetchedFile>>
    where
        F: FnMut(Progress),
    {
        let total = entries.len();
        let mut results = Vec::with_capacity(total);
        on_progress(Progress {
            completed: 0,
            total,
        });

        for (batch_index, batch) in entries.chunks(self.batch_size).enumerate() {
            debug!(
                "Starting batch {} with {} file(s)",
                batch_index + 1,
                batch.len()
            );

            let handles: Vec<(String, JoinHandle<String>)> = batch
                .iter()
                .map(|entry| (entry.path.clone(), self.spawn_fetch(entry)))
                .collect();

            for (path, handle) in handles {
                let content = handle
                    .await
                    .map_err(|e| Error::Orchestration(format!("fetch task for {path}: {e}")))?;
                results.push(FetchedFile { path, content });
            }

            debug!("Finished batch {}", batch_index + 1);
            on_progress(Progress {
                completed: results.len(),
                total,
            });
        }

        Ok(results)
    }

    /// Fetches every entry and serializes the result as one merged document.
    pub async fn merge<F>(&self, entries: &[TreeEntry], on_progress: F) -> Result<String>
    where
        F: FnMut(Progress),
    {
        let files = self.fetch_all(entries, on_progress).await?;
        Ok(render_merged(&files))
    }

    fn spawn_fetch(&self, entry: &TreeEntry) -> JoinHandle<String> {
        let source = Arc::clone(&self.source);
        let path = entry.path.clone();
        let content_ref = entry.content_ref.clone();

        tokio::spawn(async move {
            let fetched = match content_ref {
                Some(content_ref) => source.blob_content(&content_ref).await,
                None => Err(Error::BlobFetch("No content location for entry".to_string())),
            };
            match fetched {
                Ok(content) => content,
                Err(e) => {
                    warn!("Failed to fetch {}: {}", path, e);
                    format!("[Error fetching content: {e}]")
                }
            }
        })
    }
}
