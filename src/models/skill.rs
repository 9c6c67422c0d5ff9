//! Skill model and the category grouping used by the skills section.

use serde::{Deserialize, Serialize};

/// A single skill shown in the skills section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub id: i64,
    /// Display grouping label, e.g. "Frontend" or "Tools".
    pub category: String,
    pub name: String,
    /// Proficiency label, e.g. "Expert", "Advanced", "Intermediate".
    pub level: String,
    /// Proficiency bar width, 0 to 100.
    pub percentage: i32,
}

/// Request body for creating a new skill.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSkillRequest {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub percentage: i32,
}

impl Skill {
    pub fn from_request(id: i64, request: &CreateSkillRequest) -> Self {
        Self {
            id,
            category: request.category.clone(),
            name: request.name.clone(),
            level: request.level.clone(),
            percentage: request.percentage,
        }
    }
}

/// Skills sharing a category, in display order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillGroup {
    pub category: String,
    pub icon: &'static str,
    pub skills: Vec<Skill>,
}

/// Icon shown for categories without a dedicated one.
pub const DEFAULT_CATEGORY_ICON: &str = "code";

const CATEGORY_ICONS: &[(&str, &str)] = &[
    ("Frontend", "code"),
    ("Backend", "server"),
    ("Tools", "settings"),
    ("Mobile", "smartphone"),
];

/// Look up the icon name for a skill category.
pub fn category_icon(category: &str) -> &'static str {
    CATEGORY_ICONS
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, icon)| *icon)
        .unwrap_or(DEFAULT_CATEGORY_ICON)
}

/// Group skills by category.
///
/// A category is placed where its first skill appears; skills inside a group
/// keep their relative order.
pub fn group_by_category(skills: &[Skill]) -> Vec<SkillGroup> {
    skills.iter().fold(Vec::new(), |mut groups: Vec<SkillGroup>, skill| {
        match groups.iter_mut().find(|g| g.category == skill.category) {
            Some(group) => group.skills.push(skill.clone()),
            None => groups.push(SkillGroup {
                category: skill.category.clone(),
                icon: category_icon(&skill.category),
                skills: vec![skill.clone()],
            }),
        }
        groups
    })
}
