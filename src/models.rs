use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;

use crate::constants::{
    DEFAULT_INSTRUCTION, DEFAULT_OUTPUT_PATH, DEFAULT_RATE_LIMIT_SECS, DEFAULT_REFERENCE_IMAGES,
};

#[derive(Debug, Clone)]
pub struct CompositeRequest {
    /// URLs or local paths; only checked for loadability.
    pub reference_images: Vec<String>,
    pub instruction: String,
    pub output_path: PathBuf,
}

impl Default for CompositeRequest {
    fn default() -> Self {
        Self {
            reference_images: DEFAULT_REFERENCE_IMAGES
                .iter()
                .map(|source| source.to_string())
                .collect(),
            instruction: DEFAULT_INSTRUCTION.to_string(),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
        }
    }
}

/// Wait applied before the real generation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitPolicy {
    None,
    Fixed(Duration),
}

impl RateLimitPolicy {
    pub fn from_secs(secs: u64) -> Self {
        if secs == 0 {
            RateLimitPolicy::None
        } else {
            RateLimitPolicy::Fixed(Duration::from_secs(secs))
        }
    }

    pub fn delay(&self) -> Duration {
        match self {
            RateLimitPolicy::None => Duration::ZERO,
            RateLimitPolicy::Fixed(duration) => *duration,
        }
    }
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        RateLimitPolicy::Fixed(Duration::from_secs(DEFAULT_RATE_LIMIT_SECS))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    PreflightCheck,
    ValidateReferences,
    RateLimitDelay,
    Generate,
    Persist,
    Encode,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::PreflightCheck => "preflight check",
            PipelineStage::ValidateReferences => "reference validation",
            PipelineStage::RateLimitDelay => "rate-limit delay",
            PipelineStage::Generate => "generation",
            PipelineStage::Persist => "persistence",
            PipelineStage::Encode => "encoding",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    pub output_path: PathBuf,
    pub image_base64: String,
    pub revised_prompt: Option<String>,
}

#[derive(Debug)]
pub enum GenerationOutcome {
    Completed(GenerationResult),
    Failed {
        stage: PipelineStage,
        error: anyhow::Error,
    },
}

impl GenerationOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, GenerationOutcome::Completed(_))
    }

    /// `(path, base64)`; both `Some` on success, both `None` on failure.
    pub fn into_pair(self) -> (Option<PathBuf>, Option<String>) {
        match self {
            GenerationOutcome::Completed(result) => {
                (Some(result.output_path), Some(result.image_base64))
            }
            GenerationOutcome::Failed { .. } => (None, None),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            GenerationOutcome::Completed(result) => serde_json::json!({
                "status": "completed",
                "result": result,
            }),
            GenerationOutcome::Failed { stage, error } => serde_json::json!({
                "status": "failed",
                "stage": stage,
                "error": format!("{error:#}"),
            }),
        }
    }
}
