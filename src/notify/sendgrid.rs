//! SendGrid v3 mail relay.

use std::time::Duration;

use async_trait::async_trait;
use html_escape::encode_text;
use reqwest::StatusCode;
use serde::Serialize;

use super::{ContactNotification, ContactNotifier};
use crate::errors::AppError;

/// Base URL for the SendGrid API.
const API_BASE_URL: &str = "https://api.sendgrid.com";

/// Sends contact notifications through SendGrid.
#[derive(Debug, Clone)]
pub struct SendGridNotifier {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    to: String,
    from: String,
}

impl SendGridNotifier {
    /// Creates a new SendGrid client.
    ///
    /// `from` must be a verified sender on the SendGrid account.
    pub fn new(api_key: String, to: String, from: String) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| AppError::Internal(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            base_url: API_BASE_URL.to_string(),
            to,
            from,
        })
    }

    /// Overrides the base URL (for testing with wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }

    fn build_mail<'a>(&'a self, notification: &'a ContactNotification) -> Mail<'a> {
        Mail {
            personalizations: vec![Personalization {
                to: vec![Address {
                    email: &self.to,
                    name: None,
                }],
            }],
            from: Address {
                email: &self.from,
                name: None,
            },
            reply_to: Address {
                email: &notification.email,
                name: Some(&notification.name),
            },
            subject: format!("New Contact Form Message from {}", notification.name),
            content: vec![
                Content {
                    kind: "text/plain",
                    value: text_body(notification),
                },
                Content {
                    kind: "text/html",
                    value: html_body(notification),
                },
            ],
        }
    }
}

#[async_trait]
impl ContactNotifier for SendGridNotifier {
    fn kind(&self) -> &'static str {
        "sendgrid"
    }

    async fn notify(&self, notification: &ContactNotification) -> Result<(), AppError> {
        let response = self
            .client
            .post(format!("{}/v3/mail/send", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&self.build_mail(notification))
            .send()
            .await?;

        let status = response.status();
        tracing::debug!(status = %status, contact_id = notification.contact_id, "SendGrid responded");

        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(AppError::Notification {
            message: format!("SendGrid returned {}: {}", status, body),
            retryable: is_transient_error(status),
        })
    }
}

fn is_transient_error(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

#[derive(Debug, Serialize)]
struct Mail<'a> {
    personalizations: Vec<Personalization<'a>>,
    from: Address<'a>,
    reply_to: Address<'a>,
    subject: String,
    content: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Personalization<'a> {
    to: Vec<Address<'a>>,
}

#[derive(Debug, Serialize)]
struct Address<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct Content {
    #[serde(rename = "type")]
    kind: &'static str,
    value: String,
}

fn text_body(n: &ContactNotification) -> String {
    format!(
        "Name: {}\nEmail: {}\nSubject: {}\n\nMessage:\n{}\n",
        n.name, n.email, n.subject, n.message
    )
}

fn html_body(n: &ContactNotification) -> String {
    format!(
        concat!(
            "<div style=\"font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;\">",
            "<h2 style=\"color: #047857;\">New Contact Form Message</h2>",
            "<p><strong>Name:</strong> {}</p>",
            "<p><strong>Email:</strong> {}</p>",
            "<p><strong>Subject:</strong> {}</p>",
            "<h3>Message:</h3>",
            "<p style=\"line-height: 1.6;\">{}</p>",
            "<p style=\"color: #6b7280; font-size: 14px;\">",
            "This message was sent from your portfolio website contact form.</p>",
            "</div>"
        ),
        encode_text(&n.name),
        encode_text(&n.email),
        encode_text(&n.subject),
        encode_text(&n.message).replace('\n', "<br>"),
    )
}
