//! Profile model matching the frontend Profile interface.

use serde::{Deserialize, Deserializer, Serialize};

/// The site owner's profile. The store holds at most one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: i64,
    pub name: String,
    pub title: String,
    pub bio: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    /// Free text, may span several lines.
    pub education: String,
    /// Free text, may span several lines.
    pub current_role: String,
    pub profile_image_url: Option<String>,
}

/// Request body for creating the profile.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProfileRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub education: String,
    #[serde(default)]
    pub current_role: String,
    #[serde(default)]
    pub profile_image_url: Option<String>,
}

/// Request body for a partial profile update.
///
/// Absent fields keep their stored value. `profileImageUrl: null` clears the
/// image.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub education: Option<String>,
    #[serde(default)]
    pub current_role: Option<String>,
    /// `None` when absent, `Some(None)` when sent as `null`.
    #[serde(default, deserialize_with = "present")]
    pub profile_image_url: Option<Option<String>>,
}

/// Marks a field as supplied even when its value is `null`.
fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl UpdateProfileRequest {
    /// True when no field was supplied.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.title.is_none()
            && self.bio.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.location.is_none()
            && self.education.is_none()
            && self.current_role.is_none()
            && self.profile_image_url.is_none()
    }
}

impl Profile {
    /// Build a profile from a create request under the given identity.
    pub fn from_request(id: i64, request: &CreateProfileRequest) -> Self {
        Self {
            id,
            name: request.name.clone(),
            title: request.title.clone(),
            bio: request.bio.clone(),
            email: request.email.clone(),
            phone: request.phone.clone(),
            location: request.location.clone(),
            education: request.education.clone(),
            current_role: request.current_role.clone(),
            profile_image_url: request.profile_image_url.clone(),
        }
    }

    /// Shallow-merge supplied fields over this profile. Identity is kept.
    pub fn merged(&self, changes: &UpdateProfileRequest) -> Self {
        Self {
            id: self.id,
            name: changes.name.clone().unwrap_or_else(|| self.name.clone()),
            title: changes.title.clone().unwrap_or_else(|| self.title.clone()),
            bio: changes.bio.clone().unwrap_or_else(|| self.bio.clone()),
            email: changes.email.clone().unwrap_or_else(|| self.email.clone()),
            phone: changes.phone.clone().unwrap_or_else(|| self.phone.clone()),
            location: changes
                .location
                .clone()
                .unwrap_or_else(|| self.location.clone()),
            education: changes
                .education
                .clone()
                .unwrap_or_else(|| self.education.clone()),
            current_role: changes
                .current_role
                .clone()
                .unwrap_or_else(|| self.current_role.clone()),
            profile_image_url: match &changes.profile_image_url {
                Some(url) => url.clone(),
                None => self.profile_image_url.clone(),
            },
        }
    }
}
