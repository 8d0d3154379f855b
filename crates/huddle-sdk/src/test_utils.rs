//! Testing utilities - DO NOT USE IN PRODUCTION.
//!
//! In-memory implementations of the remote directory and media seams, plus
//! helpers to build a signed-in [`Client`] wired up to them.

#![allow(dead_code)]

use std::{
    collections::BTreeMap,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use async_trait::async_trait;
use chrono::Utc;

use crate::{
    call::{CallCreationData, CallId, CallRecord, UserId},
    chat::{ChatChannelRef, ChatUserProfile},
    directory::{CallDirectory, CallFilter, CallSort, ChatDirectory, SortDirection},
    error::{DirectoryError, MediaError},
    session::{LocalParticipant, MediaSession, TrackKind},
    Client, UserSession,
};

/// An in-memory [`CallDirectory`].
///
/// Implements the remote idempotency contract: `get_or_create` for a known
/// id returns the stored record untouched.
#[derive(Debug)]
pub struct MockCallDirectory {
    calls: Mutex<BTreeMap<CallId, CallRecord>>,
    creator: Mutex<UserId>,
    query_count: AtomicUsize,
    get_or_create_count: AtomicUsize,
    fail_queries: AtomicBool,
    fail_next_get_or_create: AtomicBool,
    last_creation: Mutex<Option<CallCreationData>>,
}

impl Default for MockCallDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCallDirectory {
    /// Create an empty directory whose created calls belong to `@alice`.
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(BTreeMap::new()),
            creator: Mutex::new(UserId::from("@alice")),
            query_count: AtomicUsize::new(0),
            get_or_create_count: AtomicUsize::new(0),
            fail_queries: AtomicBool::new(false),
            fail_next_get_or_create: AtomicBool::new(false),
            last_creation: Mutex::new(None),
        }
    }

    /// Set the user that newly created calls are attributed to.
    pub fn with_creator(self, creator: impl Into<UserId>) -> Self {
        *self.creator.lock().unwrap() = creator.into();
        self
    }

    /// Insert a call record directly, bypassing `get_or_create`.
    pub fn seed(&self, record: CallRecord) {
        self.calls.lock().unwrap().insert(record.id.clone(), record);
    }

    /// All records currently stored.
    pub fn stored_calls(&self) -> Vec<CallRecord> {
        self.calls.lock().unwrap().values().cloned().collect()
    }

    /// Number of `query` invocations so far.
    pub fn query_count(&self) -> usize {
        self.query_count.load(Ordering::SeqCst)
    }

    /// Number of `get_or_create` invocations so far.
    pub fn get_or_create_count(&self) -> usize {
        self.get_or_create_count.load(Ordering::SeqCst)
    }

    /// Make every subsequent `query` fail until reset.
    pub fn set_fail_queries(&self, fail: bool) {
        self.fail_queries.store(fail, Ordering::SeqCst);
    }

    /// Make only the next `get_or_create` fail.
    pub fn fail_next_get_or_create(&self) {
        self.fail_next_get_or_create.store(true, Ordering::SeqCst);
    }

    /// The creation payload of the most recent `get_or_create`.
    pub fn last_creation_data(&self) -> Option<CallCreationData> {
        self.last_creation.lock().unwrap().clone()
    }
}

#[async_trait]
impl CallDirectory for MockCallDirectory {
    async fn query(
        &self,
        filter: &CallFilter,
        sort: CallSort,
    ) -> Result<Vec<CallRecord>, DirectoryError> {
        self.query_count.fetch_add(1, Ordering::SeqCst);

        if self.fail_queries.load(Ordering::SeqCst) {
            return Err(DirectoryError::Rejected("query failed".to_owned()));
        }

        let mut records: Vec<_> = self
            .calls
            .lock()
            .unwrap()
            .values()
            .filter(|record| {
                record.created_by == filter.member || record.members.contains(&filter.member)
            })
            .filter(|record| !filter.starts_at_exists || record.starts_at.is_some())
            .cloned()
            .collect();

        records.sort_by_key(|record| record.starts_at);
        if sort.direction == SortDirection::Descending {
            records.reverse();
        }

        Ok(records)
    }

    async fn get_or_create(
        &self,
        id: &CallId,
        data: &CallCreationData,
    ) -> Result<CallRecord, DirectoryError> {
        self.get_or_create_count.fetch_add(1, Ordering::SeqCst);

        if self.fail_next_get_or_create.swap(false, Ordering::SeqCst) {
            return Err(DirectoryError::Rejected("call creation failed".to_owned()));
        }

        *self.last_creation.lock().unwrap() = Some(data.clone());

        let creator = self.creator.lock().unwrap().clone();
        let record = self
            .calls
            .lock()
            .unwrap()
            .entry(id.clone())
            .or_insert_with(|| CallRecord {
                id: id.clone(),
                created_by: creator.clone(),
                starts_at: Some(data.starts_at),
                ended_at: None,
                members: vec![creator],
                custom: data.custom.clone(),
            })
            .clone();

        Ok(record)
    }
}

/// An in-memory [`ChatDirectory`].
#[derive(Debug, Default)]
pub struct MockChatDirectory {
    connect_count: AtomicUsize,
    fail_next_connect: AtomicBool,
    connected_profile: Mutex<Option<ChatUserProfile>>,
    ensured: Mutex<Vec<ChatChannelRef>>,
}

impl MockChatDirectory {
    /// Create an empty chat directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `connect_user` invocations so far.
    pub fn connect_count(&self) -> usize {
        self.connect_count.load(Ordering::SeqCst)
    }

    /// Make only the next `connect_user` fail.
    pub fn fail_next_connect(&self) {
        self.fail_next_connect.store(true, Ordering::SeqCst);
    }

    /// The profile passed to the most recent successful `connect_user`.
    pub fn connected_profile(&self) -> Option<ChatUserProfile> {
        self.connected_profile.lock().unwrap().clone()
    }

    /// The channels passed to `ensure_channel`, in call order.
    pub fn ensured_channels(&self) -> Vec<ChatChannelRef> {
        self.ensured.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatDirectory for MockChatDirectory {
    async fn connect_user(&self, profile: &ChatUserProfile) -> Result<(), DirectoryError> {
        self.connect_count.fetch_add(1, Ordering::SeqCst);

        if self.fail_next_connect.swap(false, Ordering::SeqCst) {
            return Err(DirectoryError::Rejected("connect failed".to_owned()));
        }

        *self.connected_profile.lock().unwrap() = Some(profile.clone());
        Ok(())
    }

    async fn ensure_channel(&self, channel: &ChatChannelRef) -> Result<(), DirectoryError> {
        self.ensured.lock().unwrap().push(channel.clone());
        Ok(())
    }
}

/// A scriptable [`LocalParticipant`] that records device commands.
#[derive(Debug, Default)]
pub struct MockLocalParticipant {
    tracks: Mutex<Vec<TrackKind>>,
    fail_devices: AtomicBool,
    camera_commands: Mutex<Vec<bool>>,
    microphone_commands: Mutex<Vec<bool>>,
}

impl MockLocalParticipant {
    /// A participant currently publishing the given tracks.
    pub fn publishing(tracks: impl IntoIterator<Item = TrackKind>) -> Self {
        Self { tracks: Mutex::new(tracks.into_iter().collect()), ..Self::default() }
    }

    /// Make every device command fail, as if the hardware was already
    /// released.
    pub fn failing_devices(self) -> Self {
        self.fail_devices.store(true, Ordering::SeqCst);
        self
    }

    /// The `enabled` arguments passed to `set_camera_enabled`, in order.
    pub fn camera_commands(&self) -> Vec<bool> {
        self.camera_commands.lock().unwrap().clone()
    }

    /// The `enabled` arguments passed to `set_microphone_enabled`, in order.
    pub fn microphone_commands(&self) -> Vec<bool> {
        self.microphone_commands.lock().unwrap().clone()
    }
}

#[async_trait]
impl LocalParticipant for MockLocalParticipant {
    fn published_tracks(&self) -> Vec<TrackKind> {
        self.tracks.lock().unwrap().clone()
    }

    async fn set_camera_enabled(&self, enabled: bool) -> Result<(), MediaError> {
        self.camera_commands.lock().unwrap().push(enabled);
        if self.fail_devices.load(Ordering::SeqCst) {
            return Err(MediaError::Device("camera hardware already released".to_owned()));
        }
        Ok(())
    }

    async fn set_microphone_enabled(&self, enabled: bool) -> Result<(), MediaError> {
        self.microphone_commands.lock().unwrap().push(enabled);
        if self.fail_devices.load(Ordering::SeqCst) {
            return Err(MediaError::Device("microphone hardware already released".to_owned()));
        }
        Ok(())
    }
}

/// A scriptable [`MediaSession`].
#[derive(Debug, Default)]
pub struct MockMediaSession {
    participant: Mutex<Option<Arc<MockLocalParticipant>>>,
    leave_count: AtomicUsize,
    ended: AtomicBool,
}

impl MockMediaSession {
    /// A media session without a local participant.
    pub fn new() -> Self {
        Self::default()
    }

    /// A media session with the given local participant.
    pub fn with_participant(participant: Arc<MockLocalParticipant>) -> Self {
        Self { participant: Mutex::new(Some(participant)), ..Self::default() }
    }

    /// Whether `leave` has been called at least once.
    pub fn has_left(&self) -> bool {
        self.leave_count() > 0
    }

    /// Number of `leave` invocations so far.
    pub fn leave_count(&self) -> usize {
        self.leave_count.load(Ordering::SeqCst)
    }

    /// Whether `end_for_all` has been called.
    pub fn has_ended(&self) -> bool {
        self.ended.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediaSession for MockMediaSession {
    fn local_participant(&self) -> Option<Arc<dyn LocalParticipant>> {
        self.participant
            .lock()
            .unwrap()
            .clone()
            .map(|participant| participant as Arc<dyn LocalParticipant>)
    }

    async fn leave(&self) -> Result<(), MediaError> {
        self.leave_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn end_for_all(&self) -> Result<(), MediaError> {
        self.ended.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// A signed-in [`Client`] backed by fresh mock directories.
///
/// The user is `@alice` and the base origin is `https://meet.example.org`.
pub fn logged_in_client() -> (Client, Arc<MockCallDirectory>, Arc<MockChatDirectory>) {
    let calls = Arc::new(MockCallDirectory::new());
    let chat = Arc::new(MockChatDirectory::new());

    let client = Client::builder()
        .base_url("https://meet.example.org")
        .user_session(UserSession::new("@alice"))
        .call_directory(calls.clone())
        .chat_directory(chat.clone())
        .build()
        .unwrap();

    (client, calls, chat)
}

/// A future call record for the given user, starting `minutes_from_now`
/// minutes from now.
pub fn upcoming_call(id: &str, member: &str, minutes_from_now: i64) -> CallRecord {
    CallRecord {
        id: CallId::from(id),
        created_by: UserId::from(member),
        starts_at: Some(Utc::now() + chrono::Duration::minutes(minutes_from_now)),
        ended_at: None,
        members: vec![UserId::from(member)],
        custom: Default::default(),
    }
}
