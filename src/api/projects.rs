//! Project API endpoints.

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    Json,
};

use super::{success, ApiResult};
use crate::models::{CreateProjectRequest, Project, ProjectQuery};
use crate::validation::validate_project;
use crate::AppState;

/// GET /api/projects - List projects; `?featured=true` keeps only featured ones.
pub async fn list_projects(
    State(state): State<AppState>,
    Query(query): Query<ProjectQuery>,
) -> ApiResult<Vec<Project>> {
    let projects = if query.featured_only() {
        state.repo.get_featured_projects().await
    } else {
        state.repo.get_projects().await
    };

    success(projects)
}

/// POST /api/projects - Create a new project.
pub async fn create_project(
    State(state): State<AppState>,
    payload: Result<Json<CreateProjectRequest>, JsonRejection>,
) -> ApiResult<Project> {
    let Json(request) = payload?;
    validate_project(&request)?;

    let project = state.repo.create_project(&request).await;
    tracing::info!(id = project.id, featured = project.featured, "Project created");
    success(project)
}
