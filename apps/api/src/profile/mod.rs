//! Per-user profile dashboard: resume files, coding profiles and application history.

use std::collections::HashMap;

use chrono::{Duration, Utc};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::models::profile::{
    ApplicationHistoryItem, ApplicationStatus, CodingProfile, Platform, Profile, ResumeFile,
};

pub mod handlers;

pub const NEW_PROFILE_SUMMARY: &str = "New Profile - Summary Pending";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileError {
    #[error("Resume '{0}' not found")]
    ResumeNotFound(String),

    #[error("Username is required.")]
    EmptyUsername,

    #[error(
        "Please select a resume with content or paste resume text into the text area to get suggestions."
    )]
    NoResumeText,
}

/// In-memory profiles keyed by session email.
#[derive(Default)]
pub struct ProfileStore {
    profiles: RwLock<HashMap<String, Profile>>,
}

impl ProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The user's profile, seeded with sample data on first access.
    pub async fn profile(&self, email: &str) -> Profile {
        if let Some(profile) = self.profiles.read().await.get(email) {
            return profile.clone();
        }
        self.profiles
            .write()
            .await
            .entry(email.to_string())
            .or_insert_with(seed_profile)
            .clone()
    }

    /// Stores an uploaded resume. The first resume of an empty list becomes primary.
    pub async fn add_resume(&self, email: &str, name: &str, content: String) -> ResumeFile {
        self.update(email, |profile| {
            let resume = ResumeFile {
                id: format!("r{}", Uuid::new_v4().simple()),
                name: name.to_string(),
                upload_date: Utc::now(),
                is_primary: profile.resumes.is_empty(),
                content: Some(content),
            };
            profile.resumes.push(resume.clone());
            info!(email, resume_id = %resume.id, "Resume uploaded");
            resume
        })
        .await
    }

    pub async fn set_primary(&self, email: &str, id: &str) -> Result<Vec<ResumeFile>, ProfileError> {
        self.update(email, |profile| {
            if !profile.resumes.iter().any(|r| r.id == id) {
                return Err(ProfileError::ResumeNotFound(id.to_string()));
            }
            for resume in &mut profile.resumes {
                resume.is_primary = resume.id == id;
            }
            Ok(profile.resumes.clone())
        })
        .await
    }

    /// Removing the primary resume promotes the first one left.
    pub async fn delete_resume(
        &self,
        email: &str,
        id: &str,
    ) -> Result<Vec<ResumeFile>, ProfileError> {
        self.update(email, |profile| {
            let index = profile
                .resumes
                .iter()
                .position(|r| r.id == id)
                .ok_or_else(|| ProfileError::ResumeNotFound(id.to_string()))?;
            let removed = profile.resumes.remove(index);
            if removed.is_primary {
                if let Some(first) = profile.resumes.first_mut() {
                    first.is_primary = true;
                }
            }
            Ok(profile.resumes.clone())
        })
        .await
    }

    pub async fn add_coding_profile(
        &self,
        email: &str,
        platform: Platform,
        username: &str,
    ) -> Result<CodingProfile, ProfileError> {
        if username.trim().is_empty() {
            return Err(ProfileError::EmptyUsername);
        }
        let entry = CodingProfile {
            platform,
            username: username.to_string(),
            url: format!("https://example.com/{}/{username}", platform.slug()),
            summary: Some(NEW_PROFILE_SUMMARY.to_string()),
        };
        self.update(email, |profile| profile.coding_profiles.push(entry.clone()))
            .await;
        Ok(entry)
    }

    /// Text to run suggestions on: the supplied text if any, else the primary resume's content.
    pub async fn suggestion_source(
        &self,
        email: &str,
        supplied: Option<String>,
    ) -> Result<String, ProfileError> {
        if let Some(text) = supplied.filter(|t| !t.trim().is_empty()) {
            return Ok(text);
        }
        self.profile(email)
            .await
            .primary_resume()
            .and_then(|r| r.content.clone())
            .filter(|c| !c.trim().is_empty())
            .ok_or(ProfileError::NoResumeText)
    }

    async fn update<T>(&self, email: &str, f: impl FnOnce(&mut Profile) -> T) -> T {
        let mut profiles = self.profiles.write().await;
        let profile = profiles.entry(email.to_string()).or_insert_with(seed_profile);
        f(profile)
    }
}

fn seed_profile() -> Profile {
    let now = Utc::now();
    Profile {
        resumes: vec![
            ResumeFile {
                id: "r1".into(),
                name: "Software_Engineer_Resume_v3.txt".into(),
                upload_date: now,
                is_primary: true,
                content: Some(
                    "John Doe\nSoftware Engineer\nSkills: React, Node.js, TypeScript\n\
                     Experience: Tech Corp (2 years)"
                        .into(),
                ),
            },
            ResumeFile {
                id: "r2".into(),
                name: "Project_Manager_Resume_OLD.txt".into(),
                upload_date: now - Duration::days(10),
                is_primary: false,
                content: Some("John Doe\nProject Manager\nSkills: Agile, Scrum, JIRA".into()),
            },
        ],
        coding_profiles: vec![
            CodingProfile {
                platform: Platform::GitHub,
                username: "johndoe".into(),
                url: "https://github.com/johndoe".into(),
                summary: Some("Contributions: 250+".into()),
            },
            CodingProfile {
                platform: Platform::LeetCode,
                username: "johndoe_lc".into(),
                url: "https://leetcode.com/johndoe_lc".into(),
                summary: Some("Solved: 150 Problems".into()),
            },
        ],
        application_history: vec![
            ApplicationHistoryItem {
                job_id: "1".into(),
                job_title: "Senior Frontend Engineer".into(),
                company: "Innovatech Solutions".into(),
                applied_date: now - Duration::days(5),
                status: ApplicationStatus::Applied,
            },
            ApplicationHistoryItem {
                job_id: "j2".into(),
                job_title: "UX Designer".into(),
                company: "Creative Designs".into(),
                applied_date: now - Duration::days(12),
                status: ApplicationStatus::Interviewing,
            },
        ],
    }
}
