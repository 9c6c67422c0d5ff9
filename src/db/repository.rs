//! Content repository for the four portfolio collections.
//!
//! All collections live behind one lock, so every operation is atomic on its
//! own. Nothing spans operations.

use chrono::Utc;
use tokio::sync::RwLock;

use crate::errors::AppError;
use crate::models::{
    ContactSubmission, CreateContactRequest, CreateProfileRequest, CreateProjectRequest,
    CreateSkillRequest, Profile, Project, Skill, UpdateProfileRequest,
};

/// Records of one kind plus the last identity handed out.
#[derive(Debug, Clone)]
pub struct Collection<T> {
    records: Vec<T>,
    last_id: i64,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            last_id: 0,
        }
    }
}

impl<T> Collection<T> {
    /// Start from seeded records whose highest identity is `last_id`.
    pub fn seeded(records: Vec<T>, last_id: i64) -> Self {
        Self { records, last_id }
    }

    /// Increment then hand out. Identities are never reused.
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    pub fn count(&self) -> usize {
        self.records.len()
    }
}

/// Everything the repository owns.
#[derive(Debug, Clone, Default)]
pub struct Collections {
    pub profiles: Collection<Profile>,
    pub skills: Collection<Skill>,
    pub projects: Collection<Project>,
    pub contacts: Collection<ContactSubmission>,
}

/// In-memory repository for all content operations.
#[derive(Debug, Default)]
pub struct Repository {
    inner: RwLock<Collections>,
}

impl Repository {
    pub fn new(collections: Collections) -> Self {
        Self {
            inner: RwLock::new(collections),
        }
    }

    /// Repository with no records at all.
    #[cfg(test)]
    pub fn empty() -> Self {
        Self::default()
    }

    // ==================== PROFILE OPERATIONS ====================

    /// Get the profile, if one exists.
    pub async fn get_profile(&self) -> Option<Profile> {
        self.inner.read().await.profiles.records.first().cloned()
    }

    /// Create the profile. Fails when one already exists.
    pub async fn create_profile(
        &self,
        request: &CreateProfileRequest,
    ) -> Result<Profile, AppError> {
        let mut inner = self.inner.write().await;
        let profiles = &mut inner.profiles;

        if let Some(existing) = profiles.records.first() {
            return Err(AppError::Conflict(format!(
                "Profile {} already exists",
                existing.id
            )));
        }

        let profile = Profile::from_request(profiles.next_id(), request);
        profiles.records.push(profile.clone());
        tracing::debug!(id = profile.id, "profile created");
        Ok(profile)
    }

    /// Merge supplied fields over the existing profile.
    pub async fn update_profile(
        &self,
        request: &UpdateProfileRequest,
    ) -> Result<Profile, AppError> {
        let mut inner = self.inner.write().await;
        let existing = inner
            .profiles
            .records
            .first_mut()
            .ok_or_else(|| AppError::NotFound("No profile found to update".to_string()))?;

        let updated = existing.merged(request);
        *existing = updated.clone();
        tracing::debug!(id = updated.id, "profile updated");
        Ok(updated)
    }

    // ==================== SKILL OPERATIONS ====================

    /// List all skills in insertion order.
    pub async fn get_skills(&self) -> Vec<Skill> {
        self.inner.read().await.skills.records.clone()
    }

    /// Create a new skill.
    pub async fn create_skill(&self, request: &CreateSkillRequest) -> Skill {
        let mut inner = self.inner.write().await;
        let skills = &mut inner.skills;

        let skill = Skill::from_request(skills.next_id(), request);
        skills.records.push(skill.clone());
        tracing::debug!(id = skill.id, category = %skill.category, "skill created");
        skill
    }

    // ==================== PROJECT OPERATIONS ====================

    /// List all projects in insertion order.
    pub async fn get_projects(&self) -> Vec<Project> {
        self.inner.read().await.projects.records.clone()
    }

    /// List featured projects, keeping their relative order.
    pub async fn get_featured_projects(&self) -> Vec<Project> {
        self.inner
            .read()
            .await
            .projects
            .records
            .iter()
            .filter(|p| p.featured)
            .cloned()
            .collect()
    }

    /// Create a new project.
    pub async fn create_project(&self, request: &CreateProjectRequest) -> Project {
        let mut inner = self.inner.write().await;
        let projects = &mut inner.projects;

        let project = Project::from_request(projects.next_id(), request);
        projects.records.push(project.clone());
        tracing::debug!(id = project.id, featured = project.featured, "project created");
        project
    }

    // ==================== CONTACT OPERATIONS ====================

    /// Store a contact submission stamped with the current time.
    pub async fn create_contact(&self, request: &CreateContactRequest) -> ContactSubmission {
        let mut inner = self.inner.write().await;
        let contacts = &mut inner.contacts;

        let contact = ContactSubmission::from_request(contacts.next_id(), request, Utc::now());
        contacts.records.push(contact.clone());
        tracing::debug!(id = contact.id, "contact submission stored");
        contact
    }

    /// List all contact submissions in insertion order.
    pub async fn get_contacts(&self) -> Vec<ContactSubmission> {
        self.inner.read().await.contacts.records.clone()
    }

    /// Record counts per collection: (profiles, skills, projects, contacts).
    #[cfg(test)]
    pub async fn counts(&self) -> (usize, usize, usize, usize) {
        let inner = self.inner.read().await;
        (
            inner.profiles.count(),
            inner.skills.count(),
            inner.projects.count(),
            inner.contacts.count(),
        )
    }
}
