//! The poll cycle: fetch, merge, re-derive, publish.
//!
//! `LiveResults` is the single writer. Each cycle finishes its merge and
//! derive before publishing one `Arc<ElectionView>` on a watch channel, so
//! readers only ever see complete snapshots. A failed fetch publishes
//! nothing and the previous view stays current.

use crate::config::{ConfigResult, ElectionConfig};
use crate::merge::{merge_value, MergeReport};
use crate::store::VoteStore;
use crate::view::{derive, ElectionView};
use chrono::Utc;
use instant::Instant;
use serde_json::Value;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Could not read payload: {0}")]
    Io(#[from] std::io::Error),
    #[error("Payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type SourceResult<T> = std::result::Result<T, SourceError>;

/// Where update payloads come from.
pub trait PayloadSource {
    fn fetch(&mut self) -> impl Future<Output = SourceResult<Value>> + Send;
}

/// Re-reads a JSON file on every fetch.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: &Path) -> Self {
        FileSource {
            path: path.to_path_buf(),
        }
    }
}

impl PayloadSource for FileSource {
    fn fetch(&mut self) -> impl Future<Output = SourceResult<Value>> + Send {
        let path = self.path.clone();
        async move {
            let text = tokio::fs::read_to_string(&path).await?;
            Ok(serde_json::from_str(&text)?)
        }
    }
}

pub struct LiveResults {
    config: ElectionConfig,
    store: VoteStore,
    views: watch::Sender<Arc<ElectionView>>,
}

impl LiveResults {
    /// Seeds the store from a validated config and publishes the empty view.
    pub fn new(config: ElectionConfig) -> ConfigResult<Self> {
        config.validate()?;
        let store = VoteStore::from_config(&config);
        let (views, _) = watch::channel(Arc::new(derive(&store, &config)));
        Ok(LiveResults {
            config,
            store,
            views,
        })
    }

    pub fn config(&self) -> &ElectionConfig {
        &self.config
    }

    pub fn store(&self) -> &VoteStore {
        &self.store
    }

    /// Latest published view.
    pub fn view(&self) -> Arc<ElectionView> {
        self.views.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<ElectionView>> {
        self.views.subscribe()
    }

    /// Merges one payload and publishes the re-derived view. A payload that
    /// is not an object changes nothing and publishes nothing.
    pub fn apply(&mut self, payload: &Value) -> MergeReport {
        let start = Instant::now();

        let report = merge_value(&mut self.store, &self.config, payload);
        if report.ignored {
            return report;
        }
        self.store.mark_merged(Utc::now());
        self.publish();

        tracing::info!(
            "Merged {} districts ({} unresolved) in {} ms",
            report.updated.len(),
            report.unresolved.len(),
            start.elapsed().as_millis()
        );
        report
    }

    /// Clears all results back to the seeded roster.
    pub fn reset(&mut self) {
        self.store.reset();
        self.publish();
    }

    fn publish(&mut self) {
        let view = derive(&self.store, &self.config);
        self.views.send_replace(Arc::new(view));
    }
}

/// Polls `source` every `period`, applying each payload. Runs `max_cycles`
/// cycles, or forever when `None`. `on_cycle` sees the outcome of every
/// cycle after it is applied. Returns the number of cycles run.
pub async fn poll<S, F>(
    live: &mut LiveResults,
    source: &mut S,
    period: Duration,
    max_cycles: Option<u64>,
    mut on_cycle: F,
) -> u64
where
    S: PayloadSource,
    F: FnMut(&LiveResults, &SourceResult<MergeReport>),
{
    let mut ticker = tokio::time::interval(period);
    let mut cycles = 0;

    while max_cycles.map_or(true, |max| cycles < max) {
        ticker.tick().await;

        let outcome = match source.fetch().await {
            Ok(payload) => Ok(live.apply(&payload)),
            Err(e) => {
                tracing::warn!("Poll failed, keeping last results: {}", e);
                Err(e)
            }
        };
        on_cycle(live, &outcome);
        cycles += 1;
    }

    cycles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::FillState;
    use serde_json::json;
    use std::collections::VecDeque;

    struct Scripted(VecDeque<SourceResult<Value>>);

    impl PayloadSource for Scripted {
        fn fetch(&mut self) -> impl Future<Output = SourceResult<Value>> + Send {
            let next = self.0.pop_front().unwrap_or_else(|| Ok(json!({})));
            async move { next }
        }
    }

    fn io_error() -> SourceError {
        SourceError::Io(std::io::Error::new(std::io::ErrorKind::Other, "offline"))
    }

    #[test]
    fn apply_publishes_complete_snapshots() {
        let mut live = LiveResults::new(ElectionConfig::default()).unwrap();
        let rx = live.subscribe();
        assert!(rx.borrow().merged_at.is_none());

        live.apply(&json!({"districts": {"NW": {"ULP": 10, "NDP": 4}}}));

        let view = rx.borrow().clone();
        assert!(view.merged_at.is_some());
        assert_eq!(
            view.district("North Windward").unwrap().fill_state,
            FillState::Leading
        );
        assert_eq!(view.aggregate.total_votes, 14);
    }

    #[test]
    fn single_party_config_is_rejected() {
        let mut config = ElectionConfig::default();
        config.parties.truncate(1);

        let err = LiveResults::new(config).err().unwrap();
        assert!(matches!(err, crate::ConfigError::Invalid(_)));
    }

    #[test]
    fn ignored_payload_keeps_previous_view() {
        let mut live = LiveResults::new(ElectionConfig::default()).unwrap();
        live.apply(&json!({"districts": {"NW": {"ULP": 10}}}));
        let before = live.view();

        let report = live.apply(&json!("garbage"));

        assert!(report.ignored);
        assert!(Arc::ptr_eq(&before, &live.view()));
    }

    #[test]
    fn reset_returns_to_empty_roster() {
        let mut live = LiveResults::new(ElectionConfig::default()).unwrap();
        live.apply(&json!({"districts": {"NW": {"ULP": 10}}}));
        live.reset();

        let view = live.view();
        assert_eq!(view.count_in_state(FillState::Undecided), 15);
        assert!(view.merged_at.is_none());
    }

    #[tokio::test]
    async fn poll_keeps_last_good_view_on_failure() {
        let mut live = LiveResults::new(ElectionConfig::default()).unwrap();
        let mut source = Scripted(VecDeque::from(vec![
            Ok(json!({"updatedAt": "t1", "districts": {"SW": {"ULP": 5, "NDP": 9}}})),
            Err(io_error()),
        ]));
        let mut failures = 0;

        let cycles = poll(
            &mut live,
            &mut source,
            Duration::from_millis(5),
            Some(2),
            |_, outcome| {
                if outcome.is_err() {
                    failures += 1;
                }
            },
        )
        .await;

        assert_eq!(cycles, 2);
        assert_eq!(failures, 1);
        let view = live.view();
        assert_eq!(view.last_updated.as_deref(), Some("t1"));
        assert_eq!(view.district("South Windward").unwrap().total_votes, 14);
    }

    #[tokio::test]
    async fn file_source_reads_json() {
        let path = std::env::temp_dir().join(format!("election-map-{}.json", std::process::id()));
        tokio::fs::write(&path, r#"{"districts": {"MQ": {"NDP": 3}}}"#)
            .await
            .unwrap();

        let mut source = FileSource::new(&path);
        let value = source.fetch().await.unwrap();
        assert_eq!(value["districts"]["MQ"]["NDP"], 3);

        tokio::fs::remove_file(&path).await.unwrap();
        assert!(matches!(source.fetch().await, Err(SourceError::Io(_))));
    }
}
