//! Request validation.
//!
//! Runs in the handlers before the repository is touched. Every rule that
//! fails is reported, keyed by its camelCase field name.

use crate::errors::{AppError, FieldError};
use crate::models::{
    CreateContactRequest, CreateProfileRequest, CreateProjectRequest, CreateSkillRequest,
    UpdateProfileRequest,
};

pub const MAX_NAME_LEN: usize = 100;
pub const MAX_EMAIL_LEN: usize = 254;
pub const MAX_SUBJECT_LEN: usize = 200;
pub const MAX_MESSAGE_LEN: usize = 5000;

/// Accumulates field errors for one request.
#[derive(Debug, Default)]
struct Checker {
    errors: Vec<FieldError>,
}

impl Checker {
    fn fail(&mut self, field: &str, message: String) {
        self.errors.push(FieldError::new(field, message));
    }

    /// Non-blank after trimming.
    fn required(&mut self, field: &str, label: &str, value: &str) -> bool {
        if value.trim().is_empty() {
            self.fail(field, format!("{} is required", label));
            return false;
        }
        true
    }

    fn max_len(&mut self, field: &str, label: &str, value: &str, max: usize) {
        if value.chars().count() > max {
            self.fail(
                field,
                format!("{} must be at most {} characters", label, max),
            );
        }
    }

    fn email(&mut self, field: &str, value: &str) {
        if !self.required(field, "Email", value) {
            return;
        }
        if !is_email(value) {
            self.fail(field, "Email must be a valid email address".to_string());
        }
        self.max_len(field, "Email", value, MAX_EMAIL_LEN);
    }

    fn finish(self) -> Result<(), AppError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self.errors))
        }
    }
}

/// Loose `local@domain.tld` shape check.
fn is_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') || value.chars().any(char::is_whitespace) {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

pub fn validate_contact(request: &CreateContactRequest) -> Result<(), AppError> {
    let mut check = Checker::default();

    if check.required("name", "Name", &request.name) {
        check.max_len("name", "Name", &request.name, MAX_NAME_LEN);
    }
    check.email("email", &request.email);
    if check.required("subject", "Subject", &request.subject) {
        check.max_len("subject", "Subject", &request.subject, MAX_SUBJECT_LEN);
    }
    if check.required("message", "Message", &request.message) {
        check.max_len("message", "Message", &request.message, MAX_MESSAGE_LEN);
    }

    check.finish()
}

pub fn validate_skill(request: &CreateSkillRequest) -> Result<(), AppError> {
    let mut check = Checker::default();

    check.required("category", "Category", &request.category);
    check.required("name", "Name", &request.name);
    check.required("level", "Level", &request.level);
    if !(0..=100).contains(&request.percentage) {
        check.fail(
            "percentage",
            "Percentage must be between 0 and 100".to_string(),
        );
    }

    check.finish()
}

pub fn validate_project(request: &CreateProjectRequest) -> Result<(), AppError> {
    let mut check = Checker::default();

    check.required("title", "Title", &request.title);
    check.required("description", "Description", &request.description);
    check.required("imageUrl", "Image URL", &request.image_url);
    if request.technologies.iter().any(|t| t.trim().is_empty()) {
        check.fail(
            "technologies",
            "Technologies must not contain blank labels".to_string(),
        );
    }

    check.finish()
}

pub fn validate_new_profile(request: &CreateProfileRequest) -> Result<(), AppError> {
    let mut check = Checker::default();

    check.required("name", "Name", &request.name);
    check.required("title", "Title", &request.title);
    check.required("bio", "Bio", &request.bio);
    check.email("email", &request.email);
    check.required("phone", "Phone", &request.phone);
    check.required("location", "Location", &request.location);
    check.required("education", "Education", &request.education);
    check.required("currentRole", "Current role", &request.current_role);

    check.finish()
}

pub fn validate_profile_update(request: &UpdateProfileRequest) -> Result<(), AppError> {
    let mut check = Checker::default();

    if request.is_empty() {
        check.fail("body", "At least one field must be provided".to_string());
        return check.finish();
    }

    let text_fields = [
        ("name", "Name", &request.name),
        ("title", "Title", &request.title),
        ("bio", "Bio", &request.bio),
        ("phone", "Phone", &request.phone),
        ("location", "Location", &request.location),
        ("education", "Education", &request.education),
        ("currentRole", "Current role", &request.current_role),
    ];
    for (field, label, value) in text_fields {
        if let Some(value) = value {
            check.required(field, label, value);
        }
    }
    if let Some(email) = &request.email {
        check.email("email", email);
    }

    check.finish()
}
