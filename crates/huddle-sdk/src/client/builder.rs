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

use std::{
    fmt,
    sync::{Arc, RwLock},
};

use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::debug;
use url::Url;

use super::{Client, ClientInner, UserSession};
use crate::directory::{CallDirectory, ChatDirectory};

/// Builder for [`Client`].
///
/// The builder makes every collaborator explicit: the base origin used for
/// join links, the signed-in user, and the two remote directories. There is
/// no process-global state.
#[derive(Clone, Default)]
pub struct ClientBuilder {
    base_url: Option<String>,
    user: Option<UserSession>,
    calls: Option<Arc<dyn CallDirectory>>,
    chat: Option<Arc<dyn ChatDirectory>>,
}

impl ClientBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Set the base origin that join links are built on.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the signed-in user.
    ///
    /// Can be left unset and restored later with [`Client::restore_user`];
    /// operations that need a user fail with
    /// [`Error::AuthenticationRequired`] until then.
    ///
    /// [`Error::AuthenticationRequired`]: crate::Error::AuthenticationRequired
    pub fn user_session(mut self, user: UserSession) -> Self {
        self.user = Some(user);
        self
    }

    /// Set the remote call directory.
    pub fn call_directory(mut self, calls: Arc<dyn CallDirectory>) -> Self {
        self.calls = Some(calls);
        self
    }

    /// Set the remote chat directory.
    pub fn chat_directory(mut self, chat: Arc<dyn ChatDirectory>) -> Self {
        self.chat = Some(chat);
        self
    }

    /// Create the [`Client`] with the given parameters.
    pub fn build(self) -> Result<Client, ClientBuildError> {
        let base_url = self.base_url.ok_or(ClientBuildError::MissingBaseUrl)?;
        let base_url = Url::parse(&base_url)?;

        debug!(%base_url, "building client");

        Ok(Client {
            inner: Arc::new(ClientInner {
                base_url,
                user: RwLock::new(self.user),
                calls: self.calls,
                chat: self.chat,
                chat_connection: OnceCell::new(),
            }),
        })
    }
}

impl fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientBuilder").finish_non_exhaustive()
    }
}

/// Errors that can happen when building a [`Client`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ClientBuildError {
    /// No base origin was configured.
    #[error("no base url was configured")]
    MissingBaseUrl,

    /// The configured base origin is not a valid URL.
    #[error(transparent)]
    Url(#[from] url::ParseError),
}
