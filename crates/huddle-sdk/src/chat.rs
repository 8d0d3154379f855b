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

//! The text-chat channel attached to a call.

use serde::{Deserialize, Serialize};

use crate::call::{CallId, UserId};

/// The fixed channel type used for meeting chats.
pub const MEETING_CHAT_CHANNEL_TYPE: &str = "messaging";

/// Derive the chat channel identifier for a call.
///
/// The mapping is deterministic, so the channel id can always be recomputed
/// from the call id without a remote lookup.
pub fn derive_channel_id(call_id: &CallId) -> String {
    format!("meeting-chat-{call_id}")
}

/// Reference to the chat channel attached to a call.
///
/// Exactly one channel exists per chat-enabled call; it is created lazily the
/// first time a session requiring chat is established and is never destroyed
/// by this SDK.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatChannelRef {
    /// The channel identifier, derived from the call identifier.
    pub id: String,
    /// The channel type tag.
    pub channel_type: String,
    /// Human-readable channel name.
    pub name: String,
}

impl ChatChannelRef {
    /// Compute the channel reference for the given call.
    pub fn for_call(call_id: &CallId) -> Self {
        Self {
            id: derive_channel_id(call_id),
            channel_type: MEETING_CHAT_CHANNEL_TYPE.to_owned(),
            name: format!("Meeting Chat {call_id}"),
        }
    }
}

/// The profile under which the current user connects to the chat directory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatUserProfile {
    /// The user's identifier.
    pub id: UserId,
    /// Display name, falling back to the raw identifier when the user has
    /// none.
    pub name: String,
    /// Avatar image URL, if any.
    pub image_url: Option<String>,
}
