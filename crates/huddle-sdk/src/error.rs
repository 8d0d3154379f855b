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

//! Error conditions.

use thiserror::Error;

/// Result type of the huddle-sdk.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors for user input that is rejected before any remote call is issued.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ValidationError {
    /// A scheduled meeting was requested without a start time.
    #[error("a scheduled meeting needs a date and time")]
    MissingStartsAt,

    /// The requested start time lies in the past.
    #[error("cannot schedule meetings in the past")]
    StartsAtInPast,

    /// The join-by-link input was empty.
    #[error("no meeting link or id was provided")]
    EmptyJoinInput,

    /// The join-by-link input looked like a meeting URL but contained no
    /// identifier after the `/meeting/` segment.
    #[error("the meeting link contains no meeting id")]
    MalformedJoinLink,
}

/// An error reported by one of the remote directories.
///
/// The concrete [`CallDirectory`] and [`ChatDirectory`] implementations adapt
/// whatever error type their vendor SDK produces into this.
///
/// [`CallDirectory`]: crate::CallDirectory
/// [`ChatDirectory`]: crate::ChatDirectory
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DirectoryError {
    /// The remote service understood the request but rejected it.
    #[error("the remote service rejected the request: {0}")]
    Rejected(String),

    /// The request never produced a usable response.
    #[error("directory transport error: {0}")]
    Transport(Box<dyn std::error::Error + Send + Sync>),
}

impl DirectoryError {
    /// Wrap a transport-specific error.
    pub fn transport<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Transport(Box::new(error))
    }
}

/// An error reported by the media transport while controlling devices or
/// tearing down a session.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MediaError {
    /// A device could not be enabled or disabled.
    #[error("device control failed: {0}")]
    Device(String),

    /// The media transport failed.
    #[error("media transport error: {0}")]
    Transport(Box<dyn std::error::Error + Send + Sync>),
}

impl MediaError {
    /// Wrap a transport-specific error.
    pub fn transport<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Transport(Box::new(error))
    }
}

/// Internal representation of errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The operation requires a signed-in user, but none is available.
    #[error("the operation requires a signed-in user but none is available")]
    AuthenticationRequired,

    /// The remote directory needed for the operation was not configured on
    /// this client.
    #[error("the remote directory is not available on this client")]
    ClientUnavailable,

    /// User input was rejected before any remote call was made.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A remote directory call failed.
    #[error(transparent)]
    Remote(#[from] DirectoryError),
}
