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

//! The in-meeting state machine.

use std::{fmt, sync::Arc};

use eyeball::{SharedObservable, Subscriber};
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::{
    chat::ChatChannelRef,
    error::MediaError,
    session::{CallSession, CallingState, MediaSession, TrackKind},
    Client,
};

/// The layout used to arrange participant video tiles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CallLayout {
    /// A paginated grid of equally sized tiles.
    Grid,
    /// Active speaker with the participants bar on the right.
    #[default]
    SpeakerLeft,
    /// Active speaker with the participants bar on the left.
    SpeakerRight,
}

/// Where the local client is in the meeting lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MeetingPhase {
    /// Waiting for the media transport to report a fully-joined state. The
    /// surface shows a loading indicator and accepts no interactions.
    #[default]
    Connecting,
    /// The local client has fully joined.
    Joined,
    /// The local client has left. Terminal; the transition doubles as the
    /// navigate-away signal for the embedder.
    Left,
}

/// The view state of an active meeting surface.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ViewState {
    /// The selected video layout.
    pub layout: CallLayout,
    /// Whether the participants panel is open.
    pub show_participants: bool,
    /// Whether the chat panel is open. Both panels may be open at once.
    pub show_chat: bool,
    /// Where the local client is in the meeting lifecycle.
    pub phase: MeetingPhase,
}

/// Errors for the [`MeetingRoom`] API.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MeetingRoomError {
    /// Ending the call for everyone is not offered for a personal room.
    #[error("a personal room cannot be ended for all participants")]
    PersonalRoom,

    /// No media session is attached to this room.
    #[error("no active media session")]
    NotConnected,

    /// The media transport failed.
    #[error(transparent)]
    Media(#[from] MediaError),
}

/// The moment-to-moment state of an active meeting.
///
/// Owns the [`ViewState`] exclusively and exposes it as an observable; the
/// embedding surface renders from the observable and calls back into this
/// type for every interaction, so UI state and device/session side effects
/// cannot drift apart.
pub struct MeetingRoom {
    client: Client,
    session: Option<CallSession>,
    media: Option<Arc<dyn MediaSession>>,
    is_personal_room: bool,
    view_state: SharedObservable<ViewState>,
}

impl MeetingRoom {
    /// Create a new builder for a [`MeetingRoom`].
    pub fn builder(client: Client) -> MeetingRoomBuilder {
        MeetingRoomBuilder::new(client)
    }

    /// The call session this room was opened for, if it resolved.
    pub fn session(&self) -> Option<&CallSession> {
        self.session.as_ref()
    }

    /// The current view state.
    pub fn view_state(&self) -> ViewState {
        self.view_state.get()
    }

    /// Subscribe to view-state updates.
    pub fn subscribe(&self) -> Subscriber<ViewState> {
        self.view_state.subscribe()
    }

    /// Where the local client is in the meeting lifecycle.
    pub fn phase(&self) -> MeetingPhase {
        self.view_state.get().phase
    }

    /// Whether the local client has fully joined.
    pub fn is_ready(&self) -> bool {
        self.phase() == MeetingPhase::Joined
    }

    /// Feed a calling-state update from the media transport into the room.
    ///
    /// The room becomes ready only once the transport reports a fully-joined
    /// state; the SDK never computes this signal itself. Updates arriving
    /// after the room was left are ignored.
    pub fn handle_calling_state(&self, state: CallingState) {
        let current = self.view_state.get();
        match current.phase {
            MeetingPhase::Connecting if state == CallingState::Joined => {
                debug!("local client fully joined");
                self.update(|state| state.phase = MeetingPhase::Joined);
            }
            MeetingPhase::Left => {
                trace!(?state, "ignoring calling state after leaving");
            }
            _ => {}
        }
    }

    /// Select the video layout.
    ///
    /// Returns whether the interaction was accepted; layout changes are
    /// rejected while the room is still connecting.
    pub fn set_layout(&self, layout: CallLayout) -> bool {
        if !self.is_ready() {
            return false;
        }
        self.update(|state| state.layout = layout);
        true
    }

    /// Toggle the participants panel.
    ///
    /// Returns whether the interaction was accepted.
    pub fn toggle_participants(&self) -> bool {
        if !self.is_ready() {
            return false;
        }
        self.update(|state| state.show_participants = !state.show_participants);
        true
    }

    /// Toggle the chat panel.
    ///
    /// Returns whether the interaction was accepted. The chat panel and the
    /// participants panel are independent; both may be open at once.
    pub fn toggle_chat(&self) -> bool {
        if !self.is_ready() {
            return false;
        }
        self.update(|state| state.show_chat = !state.show_chat);
        true
    }

    /// The chat channel to render in the chat panel.
    ///
    /// `Some` only when the panel is visible, the chat client is connected
    /// and the channel identifier resolved from an actual session. In every
    /// other case the panel renders nothing; that is not an error.
    pub fn chat_channel(&self) -> Option<ChatChannelRef> {
        if !self.view_state.get().show_chat || !self.client.is_chat_connected() {
            return None;
        }
        self.session.as_ref().map(|session| ChatChannelRef::for_call(session.id()))
    }

    /// Whether ending the call for all participants is offered.
    ///
    /// A personal room only supports self-leave.
    pub fn can_end_for_all(&self) -> bool {
        !self.is_personal_room
    }

    /// End the call for every participant.
    pub async fn end_for_all(&self) -> Result<(), MeetingRoomError> {
        if self.is_personal_room {
            return Err(MeetingRoomError::PersonalRoom);
        }
        let media = self.media.as_ref().ok_or(MeetingRoomError::NotConnected)?;

        media.end_for_all().await?;
        self.update(|state| state.phase = MeetingPhase::Left);
        Ok(())
    }

    /// Leave the meeting.
    ///
    /// Ordering is fixed: published devices are shut down first, then the
    /// session is terminated, then the room transitions to
    /// [`MeetingPhase::Left`]. Each device is checked independently, so a
    /// participant publishing only audio has only the microphone disabled.
    /// Device shutdown is best-effort; a failure is logged and never blocks
    /// the teardown. A missing media session or local participant skips the
    /// device step but still completes the transition.
    pub async fn leave(&self) {
        if self.phase() == MeetingPhase::Left {
            trace!("already left the meeting");
            return;
        }

        if let Some(media) = &self.media {
            if let Some(participant) = media.local_participant() {
                let tracks = participant.published_tracks();

                if tracks.contains(&TrackKind::Camera) {
                    if let Err(error) = participant.set_camera_enabled(false).await {
                        warn!(%error, "failed to disable the camera on leave");
                    }
                }
                if tracks.contains(&TrackKind::Microphone) {
                    if let Err(error) = participant.set_microphone_enabled(false).await {
                        warn!(%error, "failed to disable the microphone on leave");
                    }
                }
            }

            if let Err(error) = media.leave().await {
                warn!(%error, "failed to terminate the session cleanly");
            }
        }

        debug!("left the meeting");
        self.update(|state| state.phase = MeetingPhase::Left);
    }

    fn update(&self, f: impl FnOnce(&mut ViewState)) {
        let mut state = self.view_state.get();
        f(&mut state);
        self.view_state.set(state);
    }
}

impl fmt::Debug for MeetingRoom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MeetingRoom")
            .field("session", &self.session)
            .field("is_personal_room", &self.is_personal_room)
            .finish_non_exhaustive()
    }
}

/// Builder for [`MeetingRoom`].
pub struct MeetingRoomBuilder {
    client: Client,
    session: Option<CallSession>,
    media: Option<Arc<dyn MediaSession>>,
    is_personal_room: bool,
}

impl MeetingRoomBuilder {
    fn new(client: Client) -> Self {
        Self { client, session: None, media: None, is_personal_room: false }
    }

    /// Attach the call session produced by
    /// [`Client::create_or_join_call`](crate::Client::create_or_join_call).
    #[must_use]
    pub fn session(mut self, session: CallSession) -> Self {
        self.session = Some(session);
        self
    }

    /// Attach the media session owned by the external real-time transport.
    #[must_use]
    pub fn media_session(mut self, media: Arc<dyn MediaSession>) -> Self {
        self.media = Some(media);
        self
    }

    /// Mark this room as a personal room, which only supports self-leave.
    #[must_use]
    pub fn personal_room(mut self, is_personal_room: bool) -> Self {
        self.is_personal_room = is_personal_room;
        self
    }

    /// Build the [`MeetingRoom`], starting in [`MeetingPhase::Connecting`].
    pub fn build(self) -> MeetingRoom {
        MeetingRoom {
            client: self.client,
            session: self.session,
            media: self.media,
            is_personal_room: self.is_personal_room,
            view_state: SharedObservable::new(ViewState::default()),
        }
    }
}

impl fmt::Debug for MeetingRoomBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MeetingRoomBuilder").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use assert_matches2::assert_matches;
    use stream_assert::{assert_next_matches, assert_pending};

    use super::{CallLayout, MeetingPhase, MeetingRoom, MeetingRoomError};
    use crate::{
        call::CallId,
        config::CallCreationSettings,
        session::{CallingState, TrackKind},
        test_utils::{logged_in_client, MockLocalParticipant, MockMediaSession},
        CallSession, Client,
    };

    async fn session_for(client: &Client, id: &str) -> CallSession {
        client
            .create_or_join_call(CallId::from(id), CallCreationSettings::instant())
            .await
            .unwrap()
    }

    fn joined_room(client: Client, media: Arc<MockMediaSession>) -> MeetingRoom {
        let room = MeetingRoom::builder(client).media_session(media).build();
        room.handle_calling_state(CallingState::Joined);
        room
    }

    #[tokio::test]
    async fn interactions_are_rejected_while_connecting() {
        let (client, _, _) = logged_in_client();
        let room = MeetingRoom::builder(client).build();

        assert_eq!(room.phase(), MeetingPhase::Connecting);
        assert!(!room.set_layout(CallLayout::Grid));
        assert!(!room.toggle_participants());
        assert!(!room.toggle_chat());

        let state = room.view_state();
        assert_eq!(state.layout, CallLayout::SpeakerLeft);
        assert!(!state.show_participants);
        assert!(!state.show_chat);
    }

    #[tokio::test]
    async fn joined_signal_unlocks_the_room() {
        let (client, _, _) = logged_in_client();
        let room = MeetingRoom::builder(client).build();

        room.handle_calling_state(CallingState::Joining);
        assert_eq!(room.phase(), MeetingPhase::Connecting);

        room.handle_calling_state(CallingState::Joined);
        assert!(room.is_ready());

        assert!(room.set_layout(CallLayout::Grid));
        assert_eq!(room.view_state().layout, CallLayout::Grid);
    }

    #[tokio::test]
    async fn panels_toggle_independently() {
        let (client, _, _) = logged_in_client();
        let media = Arc::new(MockMediaSession::new());
        let room = joined_room(client, media);

        assert!(room.toggle_participants());
        assert!(room.toggle_chat());

        let state = room.view_state();
        assert!(state.show_participants);
        assert!(state.show_chat);

        assert!(room.toggle_participants());
        let state = room.view_state();
        assert!(!state.show_participants);
        assert!(state.show_chat);
    }

    #[tokio::test]
    async fn subscribers_observe_view_state_changes() {
        let (client, _, _) = logged_in_client();
        let media = Arc::new(MockMediaSession::new());
        let room = joined_room(client, media);

        let mut subscriber = room.subscribe();
        assert_pending!(subscriber);

        room.toggle_chat();
        assert_next_matches!(subscriber, state => assert!(state.show_chat));
    }

    #[tokio::test]
    async fn leave_with_only_microphone_disables_only_the_microphone() {
        let (client, _, _) = logged_in_client();
        let participant = Arc::new(MockLocalParticipant::publishing([TrackKind::Microphone]));
        let media = Arc::new(MockMediaSession::with_participant(participant.clone()));
        let room = joined_room(client, media.clone());

        room.leave().await;

        assert_eq!(participant.microphone_commands(), vec![false]);
        assert!(participant.camera_commands().is_empty());
        assert!(media.has_left());
        assert_eq!(room.phase(), MeetingPhase::Left);
    }

    #[tokio::test]
    async fn leave_disables_both_devices_when_both_are_published() {
        let (client, _, _) = logged_in_client();
        let participant = Arc::new(MockLocalParticipant::publishing([
            TrackKind::Camera,
            TrackKind::Microphone,
        ]));
        let media = Arc::new(MockMediaSession::with_participant(participant.clone()));
        let room = joined_room(client, media);

        room.leave().await;

        assert_eq!(participant.camera_commands(), vec![false]);
        assert_eq!(participant.microphone_commands(), vec![false]);
    }

    #[tokio::test]
    async fn leave_without_a_local_participant_still_tears_down() {
        let (client, _, _) = logged_in_client();
        let media = Arc::new(MockMediaSession::new());
        let room = joined_room(client, media.clone());

        room.leave().await;

        assert!(media.has_left());
        assert_eq!(room.phase(), MeetingPhase::Left);
    }

    #[tokio::test]
    async fn leave_without_a_media_session_still_transitions() {
        let (client, _, _) = logged_in_client();
        let room = MeetingRoom::builder(client).build();

        room.leave().await;

        assert_eq!(room.phase(), MeetingPhase::Left);
    }

    #[tokio::test]
    async fn device_failures_do_not_block_the_teardown() {
        let (client, _, _) = logged_in_client();
        let participant = Arc::new(
            MockLocalParticipant::publishing([TrackKind::Camera, TrackKind::Microphone])
                .failing_devices(),
        );
        let media = Arc::new(MockMediaSession::with_participant(participant));
        let room = joined_room(client, media.clone());

        room.leave().await;

        assert!(media.has_left());
        assert_eq!(room.phase(), MeetingPhase::Left);
    }

    #[tokio::test]
    async fn leaving_twice_terminates_the_session_once() {
        let (client, _, _) = logged_in_client();
        let media = Arc::new(MockMediaSession::new());
        let room = joined_room(client, media.clone());

        room.leave().await;
        room.leave().await;

        assert_eq!(media.leave_count(), 1);
    }

    #[tokio::test]
    async fn calling_state_updates_are_ignored_after_leaving() {
        let (client, _, _) = logged_in_client();
        let room = MeetingRoom::builder(client).build();

        room.leave().await;
        room.handle_calling_state(CallingState::Joined);

        assert_eq!(room.phase(), MeetingPhase::Left);
    }

    #[tokio::test]
    async fn personal_rooms_cannot_be_ended_for_all() {
        let (client, _, _) = logged_in_client();
        let media = Arc::new(MockMediaSession::new());
        let room = MeetingRoom::builder(client)
            .media_session(media.clone())
            .personal_room(true)
            .build();

        assert!(!room.can_end_for_all());
        assert_matches!(room.end_for_all().await, Err(MeetingRoomError::PersonalRoom));
        assert!(!media.has_ended());
    }

    #[tokio::test]
    async fn regular_rooms_can_be_ended_for_all() {
        let (client, _, _) = logged_in_client();
        let media = Arc::new(MockMediaSession::new());
        let room = joined_room(client, media.clone());

        assert!(room.can_end_for_all());
        room.end_for_all().await.unwrap();

        assert!(media.has_ended());
        assert_eq!(room.phase(), MeetingPhase::Left);
    }

    #[tokio::test]
    async fn ending_without_a_media_session_fails() {
        let (client, _, _) = logged_in_client();
        let room = MeetingRoom::builder(client).build();

        assert_matches!(room.end_for_all().await, Err(MeetingRoomError::NotConnected));
    }

    #[tokio::test]
    async fn chat_channel_requires_visibility_connection_and_session() {
        let (client, _, _) = logged_in_client();
        let session = session_for(&client, "abc123").await;
        let media = Arc::new(MockMediaSession::new());
        let room = MeetingRoom::builder(client.clone())
            .session(session)
            .media_session(media)
            .build();
        room.handle_calling_state(CallingState::Joined);

        // Panel hidden.
        assert_eq!(room.chat_channel(), None);

        // Panel visible, but the chat client is not connected yet.
        room.toggle_chat();
        assert_eq!(room.chat_channel(), None);

        client.provision_chat(&CallId::from("abc123")).await.unwrap();
        let channel = room.chat_channel().unwrap();
        assert_eq!(channel.id, "meeting-chat-abc123");

        // Hiding the panel hides the channel again.
        room.toggle_chat();
        assert_eq!(room.chat_channel(), None);
    }

    #[tokio::test]
    async fn chat_channel_without_a_session_renders_nothing() {
        let (client, _, _) = logged_in_client();
        client.provision_chat(&CallId::from("abc123")).await.unwrap();

        let room = MeetingRoom::builder(client).build();
        room.handle_calling_state(CallingState::Joined);
        room.toggle_chat();

        assert_eq!(room.chat_channel(), None);
    }
}
