// Copyright 2025 The Huddle SDK Contributors
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

//! Polling synchronization of the current user's call list.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};

use chrono::{DateTime, Utc};
use eyeball::{SharedObservable, Subscriber};
use tokio::{
    task::{spawn, JoinHandle},
    time::MissedTickBehavior,
};
use tracing::{debug, instrument, trace, warn};

use crate::{
    call::CallRecord,
    config::CallListSettings,
    directory::{CallFilter, CallSort},
    Client,
};

/// The immutable result of one call-list fetch.
///
/// Every refresh produces a brand-new snapshot; an already-published
/// snapshot is never mutated, so concurrent readers can never observe a
/// half-updated list.
#[derive(Clone, Debug, PartialEq)]
pub struct CallListSnapshot {
    /// The fetched call records, sorted by start time descending.
    pub calls: Vec<CallRecord>,
    /// When this snapshot was fetched; `None` before the first successful
    /// refresh.
    pub fetched_at: Option<DateTime<Utc>>,
    /// Whether a refresh is currently in flight.
    pub is_loading: bool,
}

impl CallListSnapshot {
    fn empty() -> Self {
        Self { calls: Vec::new(), fetched_at: None, is_loading: false }
    }
}

/// Synchronizes the current user's calls by polling the remote call
/// directory on a fixed interval.
///
/// The latest [`CallListSnapshot`] is exposed as an observable; the
/// `ended()` and `upcoming()` buckets are derived views, recomputed against
/// the wall clock at every call rather than frozen at fetch time.
///
/// Dropping the service cancels the refresh loop; results of refreshes that
/// are still in flight at that point are discarded.
pub struct CallListService {
    inner: Arc<CallListServiceInner>,
    task: Mutex<Option<JoinHandle<()>>>,
}

struct CallListServiceInner {
    client: Client,
    settings: CallListSettings,
    snapshot: SharedObservable<CallListSnapshot>,
    is_dropping: AtomicBool,
}

impl Client {
    /// Returns a [`CallListService`] for this client with default settings.
    pub fn call_list(&self) -> CallListService {
        CallListService::new(self.clone())
    }
}

impl CallListService {
    /// Create a new service with default settings.
    pub fn new(client: Client) -> Self {
        Self::with_settings(client, CallListSettings::default())
    }

    /// Create a new service with the given settings.
    pub fn with_settings(client: Client, settings: CallListSettings) -> Self {
        Self {
            inner: Arc::new(CallListServiceInner {
                client,
                settings,
                snapshot: SharedObservable::new(CallListSnapshot::empty()),
                is_dropping: AtomicBool::new(false),
            }),
            task: Mutex::new(None),
        }
    }

    /// Fetch the call list once and publish a new snapshot.
    ///
    /// A failed fetch is logged and leaves the previous snapshot in place; a
    /// transient network failure must never blank the list. There is no
    /// retry backoff here, the polling interval itself is the retry
    /// mechanism.
    pub async fn refresh(&self) {
        self.inner.refresh().await;
    }

    /// Start the periodic refresh loop.
    ///
    /// The first refresh is issued right away, then one every poll interval,
    /// unconditionally: a refresh that is still in flight does not delay the
    /// next one. Overlapping refreshes are tolerated since each publishes an
    /// independent snapshot, last one to complete wins.
    ///
    /// Calling this while the loop is already running is a no-op.
    pub fn start(&self) {
        let mut task = self.task.lock().unwrap();

        if task.as_ref().is_some_and(|task| !task.is_finished()) {
            return;
        }

        trace!("starting the call-list refresh loop");

        let inner = self.inner.clone();
        *task = Some(spawn(async move {
            let mut interval = tokio::time::interval(inner.settings.poll_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;

                // Refresh in its own task so a slow fetch can overlap the
                // next tick.
                let inner = inner.clone();
                spawn(async move {
                    inner.refresh().await;
                });
            }
        }));
    }

    /// Stop the periodic refresh loop.
    ///
    /// In-flight refreshes are not aborted; their snapshots are still
    /// published. Manual [`refresh`](Self::refresh) keeps working.
    pub fn stop(&self) {
        trace!("stopping the call-list refresh loop");

        if let Some(task) = self.task.lock().unwrap().take() {
            task.abort();
        }
    }

    /// Whether the refresh loop is currently running.
    pub fn is_running(&self) -> bool {
        self.task.lock().unwrap().as_ref().is_some_and(|task| !task.is_finished())
    }

    /// The latest published snapshot.
    pub fn snapshot(&self) -> CallListSnapshot {
        self.inner.snapshot.get()
    }

    /// Subscribe to snapshot updates.
    pub fn subscribe(&self) -> Subscriber<CallListSnapshot> {
        self.inner.snapshot.subscribe()
    }

    /// The calls from the latest snapshot that have ended, evaluated against
    /// the current wall-clock time.
    pub fn ended(&self) -> Vec<CallRecord> {
        let now = Utc::now();
        self.snapshot().calls.into_iter().filter(|call| call.is_ended_at(now)).collect()
    }

    /// The calls from the latest snapshot that are still upcoming, evaluated
    /// against the current wall-clock time.
    pub fn upcoming(&self) -> Vec<CallRecord> {
        let now = Utc::now();
        self.snapshot().calls.into_iter().filter(|call| call.is_upcoming_at(now)).collect()
    }
}

impl Drop for CallListService {
    fn drop(&mut self) {
        self.inner.is_dropping.store(true, Ordering::SeqCst);
        self.stop();
    }
}

impl std::fmt::Debug for CallListService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallListService").finish_non_exhaustive()
    }
}

impl CallListServiceInner {
    #[instrument(skip(self))]
    async fn refresh(&self) {
        let Some(user) = self.client.user_session() else {
            debug!("no signed-in user, skipping call-list refresh");
            return;
        };
        let Some(calls) = self.client.inner.calls.clone() else {
            debug!("no call directory, skipping call-list refresh");
            return;
        };

        self.publish_loading(true);

        let filter = CallFilter::for_user(user.user_id);
        match calls.query(&filter, CallSort::starts_at_descending()).await {
            Ok(records) => {
                self.publish(CallListSnapshot {
                    calls: records,
                    fetched_at: Some(Utc::now()),
                    is_loading: false,
                });
            }
            Err(error) => {
                warn!(%error, "call-list refresh failed, keeping the previous snapshot");
                self.publish_loading(false);
            }
        }
    }

    fn publish(&self, snapshot: CallListSnapshot) {
        if self.is_dropping.load(Ordering::SeqCst) {
            trace!("service dropped, discarding the refresh result");
            return;
        }
        self.snapshot.set(snapshot);
    }

    fn publish_loading(&self, is_loading: bool) {
        let mut snapshot = self.snapshot.get();
        snapshot.is_loading = is_loading;
        self.publish(snapshot);
    }
}
