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

//! The client context and the call-session lifecycle API.

use std::{
    fmt,
    sync::{Arc, RwLock},
};

use chrono::Utc;
use tokio::sync::OnceCell;
use tracing::{debug, instrument};
use url::Url;

use crate::{
    call::{CallCreationData, CallCustomData, CallId, UserId},
    chat::{ChatChannelRef, ChatUserProfile},
    config::{CallCreationSettings, MeetingKind},
    directory::{CallDirectory, ChatDirectory},
    error::{Error, Result, ValidationError},
    link,
    session::CallSession,
};

mod builder;

pub use self::builder::{ClientBuildError, ClientBuilder};

/// Description attached to a call when the user supplied none.
const DEFAULT_MEETING_DESCRIPTION: &str = "Instant Meeting";

/// The signed-in user, as provided by the surrounding application.
///
/// Authentication itself is out of scope; the session only carries what the
/// remote directories need to act on the user's behalf.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserSession {
    /// The user's identifier.
    pub user_id: UserId,
    /// Display name, if the user has one.
    pub display_name: Option<String>,
    /// Avatar image URL, if any.
    pub avatar_url: Option<String>,
}

impl UserSession {
    /// Create a session for a user without profile data.
    pub fn new(user_id: impl Into<UserId>) -> Self {
        Self { user_id: user_id.into(), display_name: None, avatar_url: None }
    }

    fn chat_profile(&self) -> ChatUserProfile {
        ChatUserProfile {
            id: self.user_id.clone(),
            name: self.display_name.clone().unwrap_or_else(|| self.user_id.to_string()),
            image_url: self.avatar_url.clone(),
        }
    }
}

/// The context every component of the SDK operates on.
///
/// Holds the remote directories, the signed-in user and the configured base
/// origin. All of the state is behind an `Arc`, so the `Client` can be
/// cloned freely and passed into each component's constructor.
#[derive(Clone)]
pub struct Client {
    pub(crate) inner: Arc<ClientInner>,
}

pub(crate) struct ClientInner {
    /// Base origin that join links are built on.
    pub(crate) base_url: Url,
    /// The signed-in user, if any.
    pub(crate) user: RwLock<Option<UserSession>>,
    /// The remote call directory.
    pub(crate) calls: Option<Arc<dyn CallDirectory>>,
    /// The remote chat directory.
    pub(crate) chat: Option<Arc<dyn ChatDirectory>>,
    /// One-shot guard for the per-user chat connection. Concurrent connect
    /// attempts collapse into a single remote call; a failed attempt leaves
    /// the cell empty so a later call can retry.
    pub(crate) chat_connection: OnceCell<()>,
}

impl Client {
    /// Create a new [`ClientBuilder`].
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// The base origin join links are built on.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// The signed-in user, if any.
    pub fn user_session(&self) -> Option<UserSession> {
        self.inner.user.read().unwrap().clone()
    }

    /// Restore the signed-in user after the client was built.
    pub fn restore_user(&self, user: UserSession) {
        *self.inner.user.write().unwrap() = Some(user);
    }

    /// Whether the chat connection for the current user has been
    /// established.
    pub fn is_chat_connected(&self) -> bool {
        self.inner.chat_connection.initialized()
    }

    /// Build the shareable join link for a call.
    pub fn join_link(&self, call_id: &CallId) -> String {
        link::join_link(&self.inner.base_url, call_id)
    }

    /// Create the call with the given id, or join it if it already exists.
    ///
    /// The operation is idempotent: calling it twice with the same id
    /// resolves to the same underlying record, never a duplicate. Scheduled
    /// meetings are validated locally first; a missing or past start time is
    /// rejected before any remote call is issued.
    #[instrument(skip(self, settings), fields(call_id = %id))]
    pub async fn create_or_join_call(
        &self,
        id: CallId,
        settings: CallCreationSettings,
    ) -> Result<CallSession> {
        if self.user_session().is_none() {
            return Err(Error::AuthenticationRequired);
        }
        let calls = self.inner.calls.clone().ok_or(Error::ClientUnavailable)?;

        let kind = settings.kind;
        let starts_at = match kind {
            MeetingKind::Scheduled => {
                let starts_at = settings.starts_at.ok_or(ValidationError::MissingStartsAt)?;
                if starts_at < Utc::now() {
                    return Err(ValidationError::StartsAtInPast.into());
                }
                starts_at
            }
            MeetingKind::Instant => settings.starts_at.unwrap_or_else(Utc::now),
        };

        let description = if settings.description.is_empty() {
            DEFAULT_MEETING_DESCRIPTION.to_owned()
        } else {
            settings.description
        };

        let data = CallCreationData { starts_at, custom: CallCustomData::with_description(description) };

        debug!(starts_at = %data.starts_at.to_rfc3339(), "creating or joining call");
        let record = calls.get_or_create(&id, &data).await?;

        Ok(CallSession::new(record, kind))
    }

    /// Provision the chat channel attached to a call.
    ///
    /// Connects the current user to the chat directory (a no-op when already
    /// connected) and makes sure the deterministic per-call channel exists.
    /// Must only be called once the call's get-or-create has succeeded, so
    /// the channel is never derived from an unconfirmed identifier.
    ///
    /// Safe to call concurrently with itself for the same call: the connect
    /// is guarded client-wide, and channel creation is idempotent on the
    /// remote side, so no extra deduplication is layered on top.
    #[instrument(skip(self), fields(call_id = %call_id))]
    pub async fn provision_chat(&self, call_id: &CallId) -> Result<ChatChannelRef> {
        let user = self.user_session().ok_or(Error::AuthenticationRequired)?;
        let chat = self.inner.chat.clone().ok_or(Error::ClientUnavailable)?;

        let channel = ChatChannelRef::for_call(call_id);
        let profile = user.chat_profile();

        self.inner
            .chat_connection
            .get_or_try_init(|| async {
                debug!(user_id = %profile.id, "connecting user to the chat directory");
                chat.connect_user(&profile).await
            })
            .await?;

        chat.ensure_channel(&channel).await?;

        Ok(channel)
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client").field("base_url", &self.inner.base_url).finish_non_exhaustive()
    }
}
