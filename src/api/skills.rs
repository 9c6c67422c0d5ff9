//! Skill API endpoints.

use axum::{extract::rejection::JsonRejection, extract::State, Json};

use super::{success, ApiResult};
use crate::models::{group_by_category, CreateSkillRequest, Skill, SkillGroup};
use crate::validation::validate_skill;
use crate::AppState;

/// GET /api/skills - List all skills in insertion order.
pub async fn list_skills(State(state): State<AppState>) -> ApiResult<Vec<Skill>> {
    success(state.repo.get_skills().await)
}

/// GET /api/skills/grouped - Skills grouped by category, first-seen order.
pub async fn list_skill_groups(State(state): State<AppState>) -> ApiResult<Vec<SkillGroup>> {
    let skills = state.repo.get_skills().await;
    success(group_by_category(&skills))
}

/// POST /api/skills - Create a new skill.
pub async fn create_skill(
    State(state): State<AppState>,
    payload: Result<Json<CreateSkillRequest>, JsonRejection>,
) -> ApiResult<Skill> {
    let Json(request) = payload?;
    validate_skill(&request)?;

    let skill = state.repo.create_skill(&request).await;
    tracing::info!(id = skill.id, category = %skill.category, "Skill created");
    success(skill)
}
