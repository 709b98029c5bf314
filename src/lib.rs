mod commands;
mod constants;
mod fs_utils;
mod models;

pub use commands::generate::CompositeGenerator;

pub use constants::{
    BASE64_PREVIEW_CHARS, DEFAULT_INSTRUCTION, DEFAULT_OUTPUT_PATH, DEFAULT_RATE_LIMIT_SECS,
    DEFAULT_REFERENCE_IMAGES,
};

pub use fs_utils::{ensure_parent_dir, output_format_for, save_image};

pub use models::{
    CompositeRequest, GenerationOutcome, GenerationResult, PipelineStage, RateLimitPolicy,
};
