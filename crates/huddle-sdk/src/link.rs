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

//! Shareable join links and the "join by link" input parser.

use url::Url;

use crate::{call::CallId, error::ValidationError};

const MEETING_PATH_MARKER: &str = "/meeting/";

/// Build the shareable join link for a call.
///
/// The link has the form `<base origin>/meeting/<call id>`. This is a pure
/// function; no remote call is involved.
pub fn join_link(base_url: &Url, call_id: &CallId) -> String {
    let base = base_url.as_str().trim_end_matches('/');
    format!("{base}{MEETING_PATH_MARKER}{call_id}")
}

/// Extract a call identifier from manual "join by link" input.
///
/// The input is either a bare identifier, or a URL containing `/meeting/`
/// from which the identifier is the path segment following that marker, with
/// any query string stripped.
pub fn parse_join_input(input: &str) -> Result<CallId, ValidationError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ValidationError::EmptyJoinInput);
    }

    let Some((_, rest)) = input.split_once(MEETING_PATH_MARKER) else {
        return Ok(CallId::from(input));
    };

    let id = rest
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .split('/')
        .next()
        .unwrap_or_default();

    if id.is_empty() {
        return Err(ValidationError::MalformedJoinLink);
    }

    Ok(CallId::from(id))
}
