//! Pair-programming collaboration sessions.
//!
//! Sessions are kept in sync by polling; each code write carries the
//! version it was based on so the backend can reject stale writes.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::types::{DbId, Timestamp};

/// Session ids are opaque URL-safe tokens (UUIDs in practice).
static SESSION_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{1,128}$").expect("valid regex"));

/// Returns `true` if `id` can be placed in a URL path segment as is.
pub fn is_valid_session_id(id: &str) -> bool {
    SESSION_ID_RE.is_match(id)
}

/// Role of a participant inside a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantRole {
    Driver,
    Navigator,
    Observer,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub user_id: DbId,
    pub display_name: String,
    pub role: ParticipantRole,
    #[serde(default)]
    pub is_online: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Active,
    Ended,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollaborationSession {
    pub id: String,
    pub title: String,
    pub status: SessionStatus,
    #[serde(default)]
    pub participants: Vec<Participant>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub code: String,
    /// Monotonic revision of `code`, bumped by the backend on every write.
    pub version: u64,
    #[serde(default)]
    pub updated_at: Option<Timestamp>,
}

impl CollaborationSession {
    pub fn online_count(&self) -> usize {
        self.participants.iter().filter(|p| p.is_online).count()
    }
}

/// Body of `POST /collaboration/sessions`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateSessionRequest {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// Body of `PUT /collaboration/sessions/{id}/code`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CodeUpdate {
    pub code: String,
    /// Version the edit was based on.
    pub base_version: u64,
}
