//! Project model matching the frontend Project interface.

use serde::{Deserialize, Serialize};

/// A portfolio project card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub technologies: Vec<String>,
    pub live_url: Option<String>,
    pub code_url: Option<String>,
    /// Shown on the landing page. Encoded as 0/1 on the wire.
    #[serde(with = "flag")]
    pub featured: bool,
}

/// Request body for creating a new project.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub live_url: Option<String>,
    #[serde(default)]
    pub code_url: Option<String>,
    #[serde(default, with = "flag")]
    pub featured: bool,
}

impl Project {
    pub fn from_request(id: i64, request: &CreateProjectRequest) -> Self {
        Self {
            id,
            title: request.title.clone(),
            description: request.description.clone(),
            image_url: request.image_url.clone(),
            technologies: request.technologies.clone(),
            live_url: request.live_url.clone(),
            code_url: request.code_url.clone(),
            featured: request.featured,
        }
    }
}

/// Query parameters for GET /api/projects.
#[derive(Debug, Default, Deserialize)]
pub struct ProjectQuery {
    #[serde(default)]
    pub featured: Option<String>,
}

impl ProjectQuery {
    /// Only the literal `true` selects the featured subset.
    pub fn featured_only(&self) -> bool {
        self.featured.as_deref() == Some("true")
    }
}

/// Serde adapter writing a bool as 0/1 and reading either a bool or an integer.
mod flag {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(u8::from(*value))
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bool(bool),
        Int(i64),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        match Raw::deserialize(deserializer)? {
            Raw::Bool(b) => Ok(b),
            Raw::Int(0) => Ok(false),
            Raw::Int(1) => Ok(true),
            Raw::Int(other) => Err(de::Error::custom(format!(
                "featured must be 0 or 1, got {}",
                other
            ))),
        }
    }
}
