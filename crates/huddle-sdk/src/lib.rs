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
#![doc = include_str!("../README.md")]
#![warn(missing_debug_implementations, missing_docs)]

pub use async_trait::async_trait;
pub use eyeball;

mod call;
mod call_list;
mod chat;
mod client;
pub mod config;
mod directory;
mod error;
mod link;
mod room;
mod session;

pub use call::{CallCreationData, CallCustomData, CallId, CallRecord, UserId};
pub use call_list::{CallListService, CallListSnapshot};
pub use chat::{derive_channel_id, ChatChannelRef, ChatUserProfile, MEETING_CHAT_CHANNEL_TYPE};
pub use client::{Client, ClientBuildError, ClientBuilder, UserSession};
pub use directory::{
    CallDirectory, CallFilter, CallSort, CallSortField, ChatDirectory, SortDirection,
};
pub use error::{DirectoryError, Error, MediaError, Result, ValidationError};
pub use link::{join_link, parse_join_input};
pub use room::{
    CallLayout, MeetingPhase, MeetingRoom, MeetingRoomBuilder, MeetingRoomError, ViewState,
};
pub use session::{CallSession, CallingState, LocalParticipant, MediaSession, TrackKind};

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;

#[cfg(test)]
#[ctor::ctor]
fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .init();
}
