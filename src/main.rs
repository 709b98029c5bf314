use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use composite_gen_lib::{
    BASE64_PREVIEW_CHARS, CompositeGenerator, CompositeRequest, DEFAULT_INSTRUCTION,
    DEFAULT_OUTPUT_PATH, DEFAULT_RATE_LIMIT_SECS, DEFAULT_REFERENCE_IMAGES, RateLimitPolicy,
};
use imageapi::types::{DEFAULT_IMAGE_MODEL, DEFAULT_OPENAI_ENDPOINT};
use imageapi::ImageGenClient;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Generate an image from reference images and an instruction.
///
/// With no arguments, runs the built-in example: four reference URLs and a
/// cinematic landscape instruction.
#[derive(Parser)]
#[command(name = "composite-gen", version)]
struct Cli {
    /// Reference image URL or local path (repeatable)
    #[arg(long = "reference")]
    references: Vec<String>,

    /// Instruction sent to the image-generation service
    #[arg(long)]
    instruction: Option<String>,

    /// Where to write the generated image
    #[arg(long, default_value = DEFAULT_OUTPUT_PATH)]
    output: PathBuf,

    /// Seconds to wait before the generation request (0 disables)
    #[arg(long, default_value_t = DEFAULT_RATE_LIMIT_SECS)]
    delay_secs: u64,

    /// Base URL of the image-generation API
    #[arg(long, env = "OPENAI_BASE_URL", default_value = DEFAULT_OPENAI_ENDPOINT)]
    endpoint: String,

    /// Image model name
    #[arg(long, default_value = DEFAULT_IMAGE_MODEL)]
    model: String,

    /// Skip the connectivity self-test
    #[arg(long)]
    skip_preflight: bool,

    /// Print the outcome as JSON
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn request(&self) -> CompositeRequest {
        let reference_images = if self.references.is_empty() {
            DEFAULT_REFERENCE_IMAGES
                .iter()
                .map(|source| source.to_string())
                .collect()
        } else {
            self.references.clone()
        };

        CompositeRequest {
            reference_images,
            instruction: self
                .instruction
                .clone()
                .unwrap_or_else(|| DEFAULT_INSTRUCTION.to_string()),
            output_path: self.output.clone(),
        }
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_ansi(false))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let client = ImageGenClient::from_env(cli.endpoint.clone(), cli.model.clone())?;

    let generator = CompositeGenerator::new(client)
        .with_rate_limit(RateLimitPolicy::from_secs(cli.delay_secs))
        .with_preflight(!cli.skip_preflight);

    let outcome = generator.generate(&cli.request()).await;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&outcome.to_json())?);
        return Ok(());
    }

    let (output_path, img_b64) = outcome.into_pair();
    if let Some(path) = output_path {
        println!("Image saved to: {}", path.display());
    }
    if let Some(encoded) = img_b64 {
        let preview: String = encoded.chars().take(BASE64_PREVIEW_CHARS).collect();
        println!("Base64 (first {BASE64_PREVIEW_CHARS} characters): {preview}...");
    }

    Ok(())
}
