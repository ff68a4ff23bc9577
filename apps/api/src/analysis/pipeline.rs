//! AI request pipeline: prompt → external call → parse → normalise.
//!
//! `run` never fails. Missing configuration, transport errors and malformed replies all
//! come back as an [`AnalysisResult`] whose feedback explains what happened.

use std::sync::Arc;

use tracing::{error, info};

use crate::analysis::models::{AnalysisRequest, AnalysisResult, AnalysisTask};
use crate::analysis::normalize::{normalize, parse_reply};
use crate::analysis::prompts::build_prompt;
use crate::llm_client::{GenerationRequest, TextGenerator};

pub const NOT_CONFIGURED_FEEDBACK: &str = "AI service not configured. Please set GEMINI_API_KEY.";

#[derive(Clone)]
pub struct AnalysisPipeline {
    /// `None` when no API credential was configured at startup.
    generator: Option<Arc<dyn TextGenerator>>,
}

impl AnalysisPipeline {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator: Some(generator),
        }
    }

    pub fn unconfigured() -> Self {
        Self { generator: None }
    }

    pub fn is_configured(&self) -> bool {
        self.generator.is_some()
    }

    pub async fn run(&self, request: &AnalysisRequest) -> AnalysisResult {
        let Some(generator) = &self.generator else {
            return AnalysisResult::message(NOT_CONFIGURED_FEEDBACK);
        };

        let task = request.task();
        let (system_instruction, prompt) = build_prompt(request);
        info!(?task, "Running analysis task");

        let reply = generator
            .generate(GenerationRequest {
                system_instruction: &system_instruction,
                prompt: &prompt,
                temperature: task.temperature(),
            })
            .await;

        match reply {
            Ok(raw) => normalize(task, parse_reply(&raw)),
            Err(e) => {
                error!(?task, "Analysis call failed: {e}");
                AnalysisResult::message(format!("{}: {e}", failure_prefix(task)))
            }
        }
    }
}

fn failure_prefix(task: AnalysisTask) -> &'static str {
    match task {
        AnalysisTask::ResumeCritique => "An error occurred while analyzing the resume",
        AnalysisTask::PercentageMatch => "Error calculating match",
        AnalysisTask::AtsScore => "Error estimating ATS score",
        AnalysisTask::MockInterviewQuestions => "Error generating questions",
        AnalysisTask::ResumeSuggestions => "Error getting resume suggestions",
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::llm_client::{GenerationRequest, LlmError, TextGenerator};

    /// Scripted generator: returns a fixed reply and records what it was asked.
    pub struct FakeGenerator {
        reply: Result<String, String>,
        pub calls: AtomicUsize,
        pub temperatures: Mutex<Vec<f32>>,
        pub prompts: Mutex<Vec<String>>,
    }

    impl FakeGenerator {
        pub fn replying(reply: impl Into<String>) -> Self {
            Self::with(Ok(reply.into()))
        }

        pub fn failing(message: impl Into<String>) -> Self {
            Self::with(Err(message.into()))
        }

        fn with(reply: Result<String, String>) -> Self {
            Self {
                reply,
                calls: AtomicUsize::new(0),
                temperatures: Mutex::new(Vec::new()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TextGenerator for FakeGenerator {
        async fn generate(&self, request: GenerationRequest<'_>) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.temperatures.lock().unwrap().push(request.temperature);
            self.prompts.lock().unwrap().push(request.prompt.to_string());
            self.reply.clone().map_err(|message| LlmError::Api {
                status: 503,
                message,
            })
        }
    }
}
