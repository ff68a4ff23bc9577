use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The fixed set of AI-assisted resume/career operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnalysisTask {
    ResumeCritique,
    PercentageMatch,
    AtsScore,
    MockInterviewQuestions,
    /// Improvement suggestions offered on the profile dashboard.
    ResumeSuggestions,
}

impl AnalysisTask {
    pub const ALL: [AnalysisTask; 5] = [
        AnalysisTask::ResumeCritique,
        AnalysisTask::PercentageMatch,
        AnalysisTask::AtsScore,
        AnalysisTask::MockInterviewQuestions,
        AnalysisTask::ResumeSuggestions,
    ];

    /// Path segment naming the task; matches the serde name.
    pub fn slug(self) -> &'static str {
        match self {
            AnalysisTask::ResumeCritique => "resume-critique",
            AnalysisTask::PercentageMatch => "percentage-match",
            AnalysisTask::AtsScore => "ats-score",
            AnalysisTask::MockInterviewQuestions => "mock-interview-questions",
            AnalysisTask::ResumeSuggestions => "resume-suggestions",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        AnalysisTask::ALL.into_iter().find(|t| t.slug() == slug)
    }

    /// Human-facing service title, used in validation messages.
    pub fn title(self) -> &'static str {
        match self {
            AnalysisTask::ResumeCritique => "Resume Analyzer",
            AnalysisTask::PercentageMatch => "Percentage Match",
            AnalysisTask::AtsScore => "ATS Score Calculator",
            AnalysisTask::MockInterviewQuestions => "AI Mock Interview Questions",
            AnalysisTask::ResumeSuggestions => "AI Resume Suggestions",
        }
    }

    /// Sampling temperature: low for scoring, higher for generative tasks.
    pub fn temperature(self) -> f32 {
        match self {
            AnalysisTask::PercentageMatch => 0.3,
            AnalysisTask::AtsScore => 0.4,
            AnalysisTask::ResumeCritique | AnalysisTask::ResumeSuggestions => 0.5,
            AnalysisTask::MockInterviewQuestions => 0.6,
        }
    }

    pub fn requires_resume(self) -> bool {
        !matches!(self, AnalysisTask::MockInterviewQuestions)
    }

    pub fn secondary_input(self) -> Option<SecondaryInput> {
        match self {
            AnalysisTask::PercentageMatch => Some(SecondaryInput::JobDescription),
            AnalysisTask::MockInterviewQuestions => Some(SecondaryInput::JobRole),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecondaryInput {
    JobDescription,
    JobRole,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("Please upload or paste your resume for {0}.")]
    MissingResume(&'static str),

    #[error("Please provide the job description for {0}.")]
    MissingJobDescription(&'static str),

    #[error("Please provide the job role/industry for {0}.")]
    MissingJobRole(&'static str),
}

/// A validated pipeline input. Only constructible through [`AnalysisRequest::new`],
/// so every request that reaches the pipeline carries the inputs its task needs.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    task: AnalysisTask,
    resume_text: String,
    secondary_text: Option<String>,
}

impl AnalysisRequest {
    pub fn new(
        task: AnalysisTask,
        resume_text: Option<String>,
        secondary_text: Option<String>,
    ) -> Result<Self, RequestError> {
        let resume_text = non_blank(resume_text);
        let secondary_text = non_blank(secondary_text);

        if task.requires_resume() && resume_text.is_none() {
            return Err(RequestError::MissingResume(task.title()));
        }
        match task.secondary_input() {
            Some(SecondaryInput::JobDescription) if secondary_text.is_none() => {
                return Err(RequestError::MissingJobDescription(task.title()));
            }
            Some(SecondaryInput::JobRole) if secondary_text.is_none() => {
                return Err(RequestError::MissingJobRole(task.title()));
            }
            _ => {}
        }

        Ok(Self {
            task,
            resume_text: resume_text.unwrap_or_default(),
            // Secondary text is ignored by tasks that have no use for it.
            secondary_text: task.secondary_input().and(secondary_text),
        })
    }

    pub fn task(&self) -> AnalysisTask {
        self.task
    }

    pub fn resume_text(&self) -> &str {
        &self.resume_text
    }

    pub fn secondary_text(&self) -> Option<&str> {
        self.secondary_text.as_deref()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Uniform, UI-facing result of any analysis task.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Markdown-bearing main feedback. Always populated.
    pub feedback: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
    /// 0 – 100
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall_score: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detailed_breakdown: Option<Vec<ParameterScore>>,
}

impl AnalysisResult {
    /// A result carrying only an explanatory message.
    pub fn message(feedback: impl Into<String>) -> Self {
        Self {
            feedback: feedback.into(),
            ..Self::default()
        }
    }
}

/// One evaluated ATS parameter, e.g. "Keyword Matching".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterScore {
    pub parameter_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,
    /// Categorical verdict, e.g. "Strong Match" or "Needs Improvement".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    pub feedback: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
}
