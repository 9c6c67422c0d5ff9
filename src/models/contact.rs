//! Contact form submission model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored contact form submission. Write-once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmission {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    /// Set by the repository on insert.
    pub created_at: DateTime<Utc>,
}

/// Request body for the contact form.
///
/// Missing fields deserialize as empty strings so validation can report them
/// per field.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateContactRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

impl ContactSubmission {
    pub fn from_request(id: i64, request: &CreateContactRequest, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: request.name.clone(),
            email: request.email.clone(),
            subject: request.subject.clone(),
            message: request.message.clone(),
            created_at,
        }
    }
}

/// Response body returned to the submitter.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactReceipt {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub message: String,
}

/// Text shown to the submitter after a successful submission.
pub const CONTACT_SUCCESS_MESSAGE: &str = "Message sent successfully!";

impl From<&ContactSubmission> for ContactReceipt {
    fn from(contact: &ContactSubmission) -> Self {
        Self {
            id: contact.id,
            created_at: contact.created_at,
            message: CONTACT_SUCCESS_MESSAGE.to_string(),
        }
    }
}
