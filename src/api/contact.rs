//! Contact form API endpoints.

use axum::{extract::rejection::JsonRejection, extract::State, Json};

use super::{success, ApiResult};
use crate::models::{ContactReceipt, ContactSubmission, CreateContactRequest};
use crate::notify::ContactNotification;
use crate::validation::validate_contact;
use crate::AppState;

/// POST /api/contact - Store a contact form submission and queue the email relay.
pub async fn submit_contact(
    State(state): State<AppState>,
    payload: Result<Json<CreateContactRequest>, JsonRejection>,
) -> ApiResult<ContactReceipt> {
    let Json(request) = payload?;
    validate_contact(&request)?;

    let contact = state.repo.create_contact(&request).await;
    tracing::info!(id = contact.id, "Contact submission stored");

    // The submission is already stored; a dropped notification is only logged.
    state
        .notifications
        .enqueue(ContactNotification::from(&contact));

    success(ContactReceipt::from(&contact))
}

/// GET /api/contacts - List all contact submissions.
pub async fn list_contacts(State(state): State<AppState>) -> ApiResult<Vec<ContactSubmission>> {
    success(state.repo.get_contacts().await)
}
