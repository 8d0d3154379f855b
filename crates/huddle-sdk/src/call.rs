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

//! Call records and their identifiers.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// The globally unique identifier of a call.
///
/// Identifiers are caller-supplied at creation time; [`CallId::random`]
/// produces a fresh one for the "new meeting" flow.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallId(String);

impl CallId {
    /// Generate a new random call identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CallId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for CallId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for CallId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// The identifier of a user, as known to the remote directories.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for UserId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// Free-form data attached to a call at creation time.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CallCustomData {
    /// Human-readable description of the meeting.
    #[serde(default)]
    pub description: String,
    /// Any further fields the remote service stores on the call; carried
    /// along verbatim so a re-fetch round-trips them.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CallCustomData {
    /// Custom data carrying only a description.
    pub fn with_description(description: impl Into<String>) -> Self {
        Self { description: description.into(), extra: Map::new() }
    }
}

/// A single call as known to the remote call directory.
///
/// Records are never deleted locally; a re-fetch replaces them wholesale.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CallRecord {
    /// The call's unique identifier.
    pub id: CallId,
    /// The user that created the call.
    pub created_by: UserId,
    /// Scheduled start of the call, once set.
    pub starts_at: Option<DateTime<Utc>>,
    /// When the call ended, if it has.
    pub ended_at: Option<DateTime<Utc>>,
    /// Users that are members of the call.
    pub members: Vec<UserId>,
    /// Free-form data supplied at creation.
    #[serde(default)]
    pub custom: CallCustomData,
}

impl CallRecord {
    /// Whether this call counts as ended when evaluated at `now`.
    ///
    /// A call with `ended_at` set is always ended, regardless of its start
    /// time; otherwise a call whose start time lies strictly before `now` is
    /// ended too.
    pub fn is_ended_at(&self, now: DateTime<Utc>) -> bool {
        self.ended_at.is_some() || self.starts_at.is_some_and(|starts_at| starts_at < now)
    }

    /// Whether this call counts as upcoming when evaluated at `now`.
    ///
    /// Only calls that have not ended and start strictly after `now` are
    /// upcoming. A record that satisfies neither predicate (no start time at
    /// all) falls in neither bucket.
    pub fn is_upcoming_at(&self, now: DateTime<Utc>) -> bool {
        self.ended_at.is_none() && self.starts_at.is_some_and(|starts_at| starts_at > now)
    }

    /// The meeting description supplied at creation.
    pub fn description(&self) -> &str {
        &self.custom.description
    }
}

/// The payload of a call get-or-create request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CallCreationData {
    /// Start time of the call, serialized in ISO 8601 form on the wire.
    pub starts_at: DateTime<Utc>,
    /// Free-form data to attach to the call.
    pub custom: CallCustomData,
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::{CallCustomData, CallId, CallRecord, UserId};

    fn record(
        starts_at: Option<chrono::DateTime<Utc>>,
        ended_at: Option<chrono::DateTime<Utc>>,
    ) -> CallRecord {
        CallRecord {
            id: CallId::from("call-1"),
            created_by: UserId::from("@alice"),
            starts_at,
            ended_at,
            members: vec![UserId::from("@alice")],
            custom: CallCustomData::with_description("Standup"),
        }
    }

    #[test]
    fn ended_call_is_never_upcoming_even_with_future_start() {
        let now = Utc::now();
        let call = record(Some(now + Duration::hours(2)), Some(now - Duration::minutes(5)));

        assert!(call.is_ended_at(now));
        assert!(!call.is_upcoming_at(now));
    }

    #[test]
    fn future_call_without_end_is_upcoming() {
        let now = Utc::now();
        let call = record(Some(now + Duration::hours(1)), None);

        assert!(call.is_upcoming_at(now));
        assert!(!call.is_ended_at(now));
    }

    #[test]
    fn past_call_without_end_is_ended() {
        let now = Utc::now();
        let call = record(Some(now - Duration::hours(1)), None);

        assert!(call.is_ended_at(now));
        assert!(!call.is_upcoming_at(now));
    }

    #[test]
    fn call_without_start_time_is_in_neither_bucket() {
        let now = Utc::now();
        let call = record(None, None);

        assert!(!call.is_ended_at(now));
        assert!(!call.is_upcoming_at(now));
    }

    #[test]
    fn random_call_ids_are_unique() {
        assert_ne!(CallId::random(), CallId::random());
    }

    #[test]
    fn unknown_custom_fields_round_trip() {
        let json = serde_json::json!({
            "description": "Standup",
            "color": "teal",
        });

        let custom: CallCustomData = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(custom.description, "Standup");
        assert_eq!(custom.extra["color"], "teal");

        assert_eq!(serde_json::to_value(&custom).unwrap(), json);
    }
}
