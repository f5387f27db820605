//! Instructor-side course management: invitations, join links and
//! lecture transcriptions.

use serde::{Deserialize, Serialize};
use validator::ValidateEmail;

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// Maximum number of addresses accepted in one invitation batch.
pub const MAX_INVITATIONS_PER_BATCH: usize = 100;

// ---------------------------------------------------------------------------
// Invitations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvitationStatus {
    Pending,
    Accepted,
    Expired,
    Revoked,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invitation {
    pub id: DbId,
    pub course_id: DbId,
    pub email: String,
    pub status: InvitationStatus,
    #[serde(default)]
    pub sent_at: Option<Timestamp>,
}

/// Body of `POST /instructor/courses/{id}/invitations`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvitationBatch {
    pub emails: Vec<String>,
}

impl InvitationBatch {
    /// Parse a free-form list (commas, semicolons, whitespace or newlines)
    /// into a de-duplicated, validated batch.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let mut emails: Vec<String> = Vec::new();
        for candidate in raw
            .split(|c: char| c == ',' || c == ';' || c.is_whitespace())
            .filter(|s| !s.is_empty())
        {
            let email = candidate.to_ascii_lowercase();
            if !email.validate_email() {
                return Err(CoreError::Validation(format!(
                    "'{candidate}' is not a valid email address"
                )));
            }
            if !emails.contains(&email) {
                emails.push(email);
            }
        }

        if emails.is_empty() {
            return Err(CoreError::Validation(
                "At least one email address is required".to_string(),
            ));
        }
        if emails.len() > MAX_INVITATIONS_PER_BATCH {
            return Err(CoreError::Validation(format!(
                "At most {MAX_INVITATIONS_PER_BATCH} invitations can be sent at once"
            )));
        }

        Ok(Self { emails })
    }
}

/// Structured partial result returned by the invitation endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvitationBatchResult {
    #[serde(default)]
    pub sent: Vec<String>,
    #[serde(default)]
    pub already_enrolled: Vec<String>,
    #[serde(default)]
    pub already_invited: Vec<String>,
    #[serde(default)]
    pub failed: Vec<FailedInvitation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedInvitation {
    pub email: String,
    pub reason: String,
}

impl InvitationBatchResult {
    /// One-line summary such as `"3 invitations sent, 2 already enrolled"`.
    ///
    /// Only non-zero buckets are mentioned.
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        let sent = self.sent.len();
        parts.push(format!(
            "{sent} {} sent",
            if sent == 1 { "invitation" } else { "invitations" }
        ));
        if !self.already_enrolled.is_empty() {
            parts.push(format!("{} already enrolled", self.already_enrolled.len()));
        }
        if !self.already_invited.is_empty() {
            parts.push(format!("{} already invited", self.already_invited.len()));
        }
        if !self.failed.is_empty() {
            parts.push(format!("{} failed", self.failed.len()));
        }
        parts.join(", ")
    }

    /// True when nothing at all was delivered.
    pub fn is_total_failure(&self) -> bool {
        self.sent.is_empty() && !self.failed.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Join links
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinLink {
    pub id: DbId,
    pub course_id: DbId,
    pub code: String,
    pub url: String,
    #[serde(default)]
    pub max_uses: Option<u32>,
    #[serde(default)]
    pub use_count: u32,
    #[serde(default)]
    pub expires_at: Option<Timestamp>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// Body of `POST /instructor/courses/{id}/join-links`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateJoinLinkRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_uses: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in_hours: Option<u32>,
}

// ---------------------------------------------------------------------------
// Transcriptions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranscriptionStatus {
    Queued,
    Processing,
    Completed,
    Failed,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcription {
    pub id: DbId,
    pub lesson_id: DbId,
    #[serde(default)]
    pub lesson_title: Option<String>,
    pub status: TranscriptionStatus,
    #[serde(default)]
    pub word_count: Option<u32>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
