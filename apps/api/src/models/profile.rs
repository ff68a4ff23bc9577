use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeFile {
    pub id: String,
    pub name: String,
    pub upload_date: DateTime<Utc>,
    pub is_primary: bool,
    /// Extracted text used for AI analysis.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    LeetCode,
    CodeChef,
    HackerRank,
    GitHub,
}

impl Platform {
    pub fn slug(self) -> &'static str {
        match self {
            Platform::LeetCode => "leetcode",
            Platform::CodeChef => "codechef",
            Platform::HackerRank => "hackerrank",
            Platform::GitHub => "github",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodingProfile {
    pub platform: Platform,
    pub username: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplicationStatus {
    Applied,
    Interviewing,
    Offer,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationHistoryItem {
    pub job_id: String,
    pub job_title: String,
    pub company: String,
    pub applied_date: DateTime<Utc>,
    pub status: ApplicationStatus,
}

/// Everything the profile dashboard shows for one user.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub resumes: Vec<ResumeFile>,
    pub coding_profiles: Vec<CodingProfile>,
    pub application_history: Vec<ApplicationHistoryItem>,
}

impl Profile {
    pub fn primary_resume(&self) -> Option<&ResumeFile> {
        self.resumes.iter().find(|r| r.is_primary)
    }
}
