// Copyright 2025 RustFS Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Refresh cycle of the dashboard.
//!
//! A refresh reads node usage, node capacity and pod usage concurrently,
//! normalizes them and publishes the result as a new [`Snapshot`]. Every
//! refresh draws a generation number; a result is discarded when a snapshot
//! from a later generation has already been published, so overlapping
//! refreshes can never roll the dashboard back. A failed refresh leaves the
//! published snapshot untouched.

use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use serde::Serialize;
use snafu::{ResultExt, Snafu};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::context;
use crate::normalize::{self, NodeView, PodView};
use crate::types;
use crate::types::metrics::{NodeCapacityRecord, NodeUsageRecord, PodUsageRecord};

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("fetch metrics error: {}", source))]
    Fetch { source: context::Error },

    #[snafu(display("normalize metrics error: {}", source))]
    Normalize { source: types::error::Error },
}

/// Where a refresh reads its input from.
pub trait MetricsSource: Send + Sync {
    fn node_usage(&self) -> BoxFuture<'_, Result<Vec<NodeUsageRecord>, context::Error>>;

    fn node_capacity(&self) -> BoxFuture<'_, Result<Vec<NodeCapacityRecord>, context::Error>>;

    fn pod_usage<'a>(
        &'a self,
        namespace: &'a str,
    ) -> BoxFuture<'a, Result<Vec<PodUsageRecord>, context::Error>>;
}

/// Normalized views produced by one refresh.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Snapshot {
    pub generation: u64,
    pub fetched_at: DateTime<Utc>,
    pub namespace: String,
    pub nodes: Vec<NodeView>,
    pub pods: Vec<PodView>,
}

impl Snapshot {
    pub fn build(
        generation: u64,
        namespace: &str,
        usage: &[NodeUsageRecord],
        capacity: &[NodeCapacityRecord],
        pods: &[PodUsageRecord],
    ) -> Result<Self, types::error::Error> {
        Ok(Self {
            generation,
            fetched_at: Utc::now(),
            namespace: namespace.to_string(),
            nodes: normalize::join_node_usage_with_capacity(usage, capacity)?,
            pods: normalize::normalize_pods(pods)?,
        })
    }

    /// Nodes that had no capacity record in this refresh.
    pub fn nodes_without_capacity(&self) -> usize {
        self.nodes.iter().filter(|n| !n.has_capacity()).count()
    }
}

/// The last refresh that failed after the published snapshot was taken.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RefreshFailure {
    pub generation: u64,
    pub failed_at: DateTime<Utc>,
    pub message: String,
}

/// Result of a successful refresh.
#[derive(Clone, Debug)]
pub struct Refresh {
    pub generation: u64,
    /// `false` when a later refresh had already been published.
    pub committed: bool,
    /// The snapshot published after this refresh.
    pub snapshot: Arc<Snapshot>,
}

#[derive(Default)]
struct Published {
    snapshot: Option<Arc<Snapshot>>,
    last_error: Option<RefreshFailure>,
}

impl Published {
    fn newer_than(&self, generation: u64) -> Option<&Arc<Snapshot>> {
        self.snapshot.as_ref().filter(|s| s.generation > generation)
    }
}

pub struct Dashboard {
    source: Arc<dyn MetricsSource>,
    namespace: String,
    generation: AtomicU64,
    published: RwLock<Published>,
}

impl Dashboard {
    pub fn new(source: Arc<dyn MetricsSource>, namespace: impl Into<String>) -> Self {
        Self {
            source,
            namespace: namespace.into(),
            generation: AtomicU64::new(0),
            published: RwLock::new(Published::default()),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub async fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.published.read().await.snapshot.clone()
    }

    pub async fn last_error(&self) -> Option<RefreshFailure> {
        self.published.read().await.last_error.clone()
    }

    pub async fn refresh(&self) -> Result<Refresh, Error> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        debug!("refresh {} started", generation);

        let result = self.collect(generation).await;
        let mut published = self.published.write().await;

        match result {
            Ok(snapshot) => {
                if let Some(current) = published.newer_than(generation) {
                    info!(
                        "refresh {} superseded by published refresh {}, discarding",
                        generation, current.generation
                    );
                    return Ok(Refresh {
                        generation,
                        committed: false,
                        snapshot: current.clone(),
                    });
                }

                let snapshot = Arc::new(snapshot);
                info!(
                    "refresh {} published: {} nodes ({} without capacity), {} pods in '{}'",
                    generation,
                    snapshot.nodes.len(),
                    snapshot.nodes_without_capacity(),
                    snapshot.pods.len(),
                    self.namespace
                );

                published.snapshot = Some(snapshot.clone());
                if published
                    .last_error
                    .as_ref()
                    .is_some_and(|e| e.generation < generation)
                {
                    published.last_error = None;
                }

                Ok(Refresh {
                    generation,
                    committed: true,
                    snapshot,
                })
            }
            Err(e) => {
                warn!(
                    "refresh {} failed, keeping the previous snapshot: {}",
                    generation, e
                );

                let stale = published.newer_than(generation).is_some()
                    || published
                        .last_error
                        .as_ref()
                        .is_some_and(|f| f.generation > generation);
                if !stale {
                    published.last_error = Some(RefreshFailure {
                        generation,
                        failed_at: Utc::now(),
                        message: e.to_string(),
                    });
                }

                Err(e)
            }
        }
    }

    async fn collect(&self, generation: u64) -> Result<Snapshot, Error> {
        let (usage, capacity, pods) = futures::try_join!(
            self.source.node_usage(),
            self.source.node_capacity(),
            self.source.pod_usage(&self.namespace),
        )
        .context(FetchSnafu)?;

        Snapshot::build(generation, &self.namespace, &usage, &capacity, &pods)
            .context(NormalizeSnafu)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{capacity_record, node_usage, pod_usage, single_container};
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::AtomicBool;
    use tokio::sync::oneshot;

    fn upstream_error() -> context::Error {
        let source = http::Request::get("not a uri").body(()).unwrap_err();
        context::Error::Request {
            path: "not a uri".to_string(),
            source,
        }
    }

    #[derive(Default)]
    struct FakeSource {
        usage: Mutex<Vec<NodeUsageRecord>>,
        capacity: Vec<NodeCapacityRecord>,
        pods: Vec<PodUsageRecord>,
        // node usage calls wait on these, in call order, while any are queued
        gates: Mutex<VecDeque<oneshot::Receiver<Vec<NodeUsageRecord>>>>,
        fail_pods: AtomicBool,
    }

    impl FakeSource {
        fn new() -> Self {
            Self {
                usage: Mutex::new(vec![
                    node_usage("node-a", "500000000n", "2097152Ki"),
                    node_usage("node-b", "100000000n", "1048576Ki"),
                ]),
                capacity: vec![capacity_record("node-a", "4", "8388608Ki")],
                pods: vec![pod_usage("web-0", single_container("250000000n", "1048576Ki"))],
                ..Default::default()
            }
        }

        fn gate(&self) -> oneshot::Sender<Vec<NodeUsageRecord>> {
            let (tx, rx) = oneshot::channel();
            self.gates.lock().unwrap().push_back(rx);
            tx
        }
    }

    impl MetricsSource for FakeSource {
        fn node_usage(&self) -> BoxFuture<'_, Result<Vec<NodeUsageRecord>, context::Error>> {
            let gate = self.gates.lock().unwrap().pop_front();
            let usage = self.usage.lock().unwrap().clone();
            Box::pin(async move {
                match gate {
                    Some(rx) => rx.await.map_err(|_| upstream_error()),
                    None => Ok(usage),
                }
            })
        }

        fn node_capacity(
            &self,
        ) -> BoxFuture<'_, Result<Vec<NodeCapacityRecord>, context::Error>> {
            Box::pin(async move { Ok(self.capacity.clone()) })
        }

        fn pod_usage<'a>(
            &'a self,
            namespace: &'a str,
        ) -> BoxFuture<'a, Result<Vec<PodUsageRecord>, context::Error>> {
            Box::pin(async move {
                if self.fail_pods.load(Ordering::SeqCst) {
                    return Err(upstream_error());
                }
                Ok(self.pods.clone())
            })
        }
    }

    #[tokio::test]
    async fn test_refresh_publishes_snapshot() {
        let dashboard = Dashboard::new(Arc::new(FakeSource::new()), "default");
        assert!(dashboard.snapshot().await.is_none());

        let refresh = dashboard.refresh().await.unwrap();

        assert!(refresh.committed);
        assert_eq!(refresh.generation, 1);
        let snapshot = dashboard.snapshot().await.unwrap();
        assert_eq!(snapshot.nodes.len(), 2);
        assert_eq!(snapshot.nodes[0].cpu_percent.to_string(), "12.50%");
        assert_eq!(snapshot.nodes[1].cpu_percent.to_string(), "unavailable");
        assert_eq!(snapshot.nodes_without_capacity(), 1);
        assert_eq!(snapshot.pods[0].cpu_usage_milli.to_string(), "250");
        assert_eq!(snapshot.namespace, "default");
    }

    #[tokio::test]
    async fn test_each_refresh_replaces_the_snapshot() {
        let source = Arc::new(FakeSource::new());
        let dashboard = Dashboard::new(source.clone(), "default");

        dashboard.refresh().await.unwrap();
        *source.usage.lock().unwrap() = vec![node_usage("node-c", "0", "0")];
        dashboard.refresh().await.unwrap();

        let snapshot = dashboard.snapshot().await.unwrap();
        assert_eq!(snapshot.generation, 2);
        let names: Vec<_> = snapshot.nodes.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, ["node-c"]);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_snapshot() {
        let source = Arc::new(FakeSource::new());
        let dashboard = Dashboard::new(source.clone(), "default");
        dashboard.refresh().await.unwrap();

        source.fail_pods.store(true, Ordering::SeqCst);
        let err = dashboard.refresh().await.unwrap_err();
        assert!(matches!(err, Error::Fetch { .. }));

        let snapshot = dashboard.snapshot().await.unwrap();
        assert_eq!(snapshot.generation, 1);
        let failure = dashboard.last_error().await.unwrap();
        assert_eq!(failure.generation, 2);

        source.fail_pods.store(false, Ordering::SeqCst);
        dashboard.refresh().await.unwrap();
        assert!(dashboard.last_error().await.is_none());
    }

    #[tokio::test]
    async fn test_malformed_quantity_fails_refresh() {
        let source = Arc::new(FakeSource::new());
        *source.usage.lock().unwrap() = vec![node_usage("node-a", "bogus", "1Ki")];
        let dashboard = Dashboard::new(source, "default");

        let err = dashboard.refresh().await.unwrap_err();

        assert!(matches!(err, Error::Normalize { .. }));
        assert!(dashboard.snapshot().await.is_none());
        assert!(dashboard.last_error().await.is_some());
    }

    #[tokio::test]
    async fn test_superseded_refresh_is_discarded() {
        let source = Arc::new(FakeSource::new());
        let older_gate = source.gate();
        let newer_gate = source.gate();
        let dashboard = Dashboard::new(source.clone(), "default");

        let driver = async {
            // the newer refresh resolves first
            newer_gate
                .send(vec![node_usage("newer", "0", "0")])
                .unwrap();
            while dashboard.snapshot().await.is_none() {
                tokio::task::yield_now().await;
            }
            older_gate
                .send(vec![node_usage("older", "0", "0")])
                .unwrap();
        };

        let (older, newer, ()) = tokio::join!(dashboard.refresh(), dashboard.refresh(), driver);
        let older = older.unwrap();
        let newer = newer.unwrap();

        assert_eq!(older.generation, 1);
        assert_eq!(newer.generation, 2);
        assert!(newer.committed);
        assert!(!older.committed);
        assert_eq!(older.snapshot.generation, 2);

        let snapshot = dashboard.snapshot().await.unwrap();
        assert_eq!(snapshot.nodes[0].name, "newer");
    }

    #[tokio::test]
    async fn test_superseded_failure_does_not_clear_published_refresh() {
        let source = Arc::new(FakeSource::new());
        let older_gate = source.gate();
        let newer_gate = source.gate();
        let dashboard = Dashboard::new(source.clone(), "default");

        let driver = async {
            newer_gate
                .send(vec![node_usage("newer", "0", "0")])
                .unwrap();
            while dashboard.snapshot().await.is_none() {
                tokio::task::yield_now().await;
            }
            // the older fetch fails once its gate is gone
            drop(older_gate);
        };

        let (older, newer, ()) = tokio::join!(dashboard.refresh(), dashboard.refresh(), driver);

        assert!(matches!(older.unwrap_err(), Error::Fetch { .. }));
        assert!(newer.unwrap().committed);
        assert!(dashboard.last_error().await.is_none());
        assert_eq!(dashboard.snapshot().await.unwrap().generation, 2);
    }

    #[tokio::test]
    async fn test_superseded_failure_keeps_newer_failure() {
        let source = Arc::new(FakeSource::new());
        let older_gate = source.gate();
        let newer_gate = source.gate();
        let dashboard = Dashboard::new(source.clone(), "default");

        let driver = async {
            drop(newer_gate);
            while dashboard.last_error().await.is_none() {
                tokio::task::yield_now().await;
            }
            drop(older_gate);
        };

        let (older, newer, ()) = tokio::join!(dashboard.refresh(), dashboard.refresh(), driver);

        assert!(older.is_err());
        assert!(newer.is_err());
        assert!(dashboard.snapshot().await.is_none());
        assert_eq!(dashboard.last_error().await.unwrap().generation, 2);
    }
}
