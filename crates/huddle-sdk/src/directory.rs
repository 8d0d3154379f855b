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

//! Seams for the remote call and chat services.
//!
//! The SDK never talks to a vendor backend directly; implementations of
//! these traits adapt the concrete provider. This keeps the synchronization
//! logic testable against in-memory fakes.

use async_trait::async_trait;

use crate::{
    call::{CallCreationData, CallId, CallRecord, UserId},
    chat::{ChatChannelRef, ChatUserProfile},
    error::DirectoryError,
};

/// Filter for a call-directory query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallFilter {
    /// Match calls the user created or is a member of.
    pub member: UserId,
    /// Only match calls that have a scheduled start time set.
    pub starts_at_exists: bool,
}

impl CallFilter {
    /// Filter for all scheduled calls the given user takes part in.
    pub fn for_user(member: UserId) -> Self {
        Self { member, starts_at_exists: true }
    }
}

/// Sort direction for a call-directory query.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDirection {
    /// Ascending order.
    Ascending,
    /// Descending order.
    Descending,
}

/// Field to sort a call-directory query on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallSortField {
    /// The scheduled start time.
    StartsAt,
}

/// Sort specification for a call-directory query.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CallSort {
    /// Field to sort on.
    pub field: CallSortField,
    /// Direction to sort in.
    pub direction: SortDirection,
}

impl CallSort {
    /// Sort by scheduled start time, newest first.
    pub fn starts_at_descending() -> Self {
        Self { field: CallSortField::StartsAt, direction: SortDirection::Descending }
    }
}

impl Default for CallSort {
    fn default() -> Self {
        Self::starts_at_descending()
    }
}

/// A remote service holding call records.
#[async_trait]
pub trait CallDirectory: Send + Sync {
    /// Query call records matching `filter`, ordered by `sort`.
    async fn query(
        &self,
        filter: &CallFilter,
        sort: CallSort,
    ) -> Result<Vec<CallRecord>, DirectoryError>;

    /// Fetch the call with the given id, creating it with `data` if it does
    /// not exist yet.
    ///
    /// Implementations must treat this as idempotent: two calls with the
    /// same id must resolve to the same underlying record.
    async fn get_or_create(
        &self,
        id: &CallId,
        data: &CallCreationData,
    ) -> Result<CallRecord, DirectoryError>;
}

/// A remote service holding chat channels.
#[async_trait]
pub trait ChatDirectory: Send + Sync {
    /// Connect the given user to the chat service.
    ///
    /// Connecting an already-connected user must be a no-op. Authentication
    /// tokens are minted by the implementation.
    async fn connect_user(&self, profile: &ChatUserProfile) -> Result<(), DirectoryError>;

    /// Make sure the given channel exists, joining it if it already does.
    ///
    /// This is the watch-or-create operation; implementations must treat
    /// channel creation as idempotent, including under concurrent calls for
    /// the same channel.
    async fn ensure_channel(&self, channel: &ChatChannelRef) -> Result<(), DirectoryError>;
}
