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

//! Call session handles and the media-transport seam.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    call::{CallId, CallRecord},
    config::MeetingKind,
    error::MediaError,
};

/// A handle to a call that the remote directory has confirmed to exist.
///
/// Sessions are only produced by [`Client::create_or_join_call`], after the
/// remote get-or-create has succeeded; there is no way to observe a
/// partially-initialized one.
///
/// [`Client::create_or_join_call`]: crate::Client::create_or_join_call
#[derive(Clone, Debug)]
pub struct CallSession {
    id: CallId,
    record: CallRecord,
    kind: MeetingKind,
}

impl CallSession {
    pub(crate) fn new(record: CallRecord, kind: MeetingKind) -> Self {
        Self { id: record.id.clone(), record, kind }
    }

    /// The call's identifier.
    pub fn id(&self) -> &CallId {
        &self.id
    }

    /// The call record returned by the remote get-or-create.
    pub fn record(&self) -> &CallRecord {
        &self.record
    }

    /// Whether this session was created as an instant or a scheduled
    /// meeting.
    pub fn kind(&self) -> MeetingKind {
        self.kind
    }
}

/// The calling state reported by the media transport.
///
/// This is an external signal; the SDK never computes it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallingState {
    /// Not connected to the session yet.
    Idle,
    /// The local client is in the process of joining.
    Joining,
    /// The local client has fully joined the session.
    Joined,
    /// The connection dropped and is being re-established.
    Reconnecting,
    /// The local client has left the session.
    Left,
}

/// A media track kind the local participant may be publishing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackKind {
    /// Camera video.
    Camera,
    /// Microphone audio.
    Microphone,
    /// Screen-share video.
    ScreenShare,
}

/// The local participant of an active session.
#[async_trait]
pub trait LocalParticipant: Send + Sync {
    /// The track kinds currently being published.
    fn published_tracks(&self) -> Vec<TrackKind>;

    /// Enable or disable the camera.
    async fn set_camera_enabled(&self, enabled: bool) -> Result<(), MediaError>;

    /// Enable or disable the microphone.
    async fn set_microphone_enabled(&self, enabled: bool) -> Result<(), MediaError>;
}

/// An active media session, owned by the external real-time transport.
///
/// The SDK issues commands through this seam but never drives the media
/// negotiation itself.
#[async_trait]
pub trait MediaSession: Send + Sync {
    /// The local participant, if one has been published yet.
    fn local_participant(&self) -> Option<Arc<dyn LocalParticipant>>;

    /// Leave the session for the local participant only.
    async fn leave(&self) -> Result<(), MediaError>;

    /// End the call for every participant.
    async fn end_for_all(&self) -> Result<(), MediaError>;
}
