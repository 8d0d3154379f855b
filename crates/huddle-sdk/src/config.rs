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

//! Settings for call creation and the call-list refresh loop.

use std::time::Duration;

use chrono::{DateTime, Utc};

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Whether a meeting starts right away or at a scheduled time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MeetingKind {
    /// The meeting starts now.
    Instant,
    /// The meeting is scheduled for a later time.
    Scheduled,
}

/// Settings for creating (or joining) a call.
#[derive(Clone, Debug, PartialEq)]
pub struct CallCreationSettings {
    pub(crate) kind: MeetingKind,
    pub(crate) starts_at: Option<DateTime<Utc>>,
    pub(crate) description: String,
}

impl CallCreationSettings {
    /// Settings for an instant meeting, starting now.
    pub fn instant() -> Self {
        Self { kind: MeetingKind::Instant, starts_at: None, description: String::new() }
    }

    /// Settings for a scheduled meeting.
    ///
    /// The start time comes straight from user input and may be absent;
    /// validation happens when the call is created, before any remote call.
    pub fn scheduled(starts_at: Option<DateTime<Utc>>) -> Self {
        Self { kind: MeetingKind::Scheduled, starts_at, description: String::new() }
    }

    /// Set the meeting description.
    ///
    /// An empty description is replaced with "Instant Meeting" at creation
    /// time.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// The kind of meeting these settings describe.
    pub fn kind(&self) -> MeetingKind {
        self.kind
    }
}

/// Settings for the call-list refresh loop.
#[derive(Clone, Debug)]
pub struct CallListSettings {
    pub(crate) poll_interval: Duration,
}

impl CallListSettings {
    /// Create default settings, polling every 30 seconds.
    #[must_use]
    pub fn new() -> Self {
        Self { poll_interval: DEFAULT_POLL_INTERVAL }
    }

    /// Set the interval between two scheduled refreshes.
    ///
    /// The interval is unconditional: a slow refresh does not delay the next
    /// one.
    #[must_use]
    pub fn poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}

impl Default for CallListSettings {
    fn default() -> Self {
        Self::new()
    }
}
