use anyhow::{Context, Result};
use imageapi::utils::{encode_image_to_base64, load_image};
use imageapi::{ImageGenClient, ImageGenerationOptions};
use tracing::{error, info};

use crate::fs_utils::{ensure_parent_dir, save_image};
use crate::models::{
    CompositeRequest, GenerationOutcome, GenerationResult, PipelineStage, RateLimitPolicy,
};

/// Runs the generation pipeline:
/// preflight, reference validation, delay, generate, persist, encode.
///
/// Every stage must succeed for the next to run. Failures are logged and
/// reported as [`GenerationOutcome::Failed`]; nothing already written is
/// rolled back.
pub struct CompositeGenerator {
    client: ImageGenClient,
    options: ImageGenerationOptions,
    rate_limit: RateLimitPolicy,
    preflight: bool,
}

impl CompositeGenerator {
    pub fn new(client: ImageGenClient) -> Self {
        Self {
            client,
            options: ImageGenerationOptions::default(),
            rate_limit: RateLimitPolicy::default(),
            preflight: true,
        }
    }

    pub fn with_options(mut self, options: ImageGenerationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_rate_limit(mut self, rate_limit: RateLimitPolicy) -> Self {
        self.rate_limit = rate_limit;
        self
    }

    pub fn with_preflight(mut self, preflight: bool) -> Self {
        self.preflight = preflight;
        self
    }

    pub fn client(&self) -> &ImageGenClient {
        &self.client
    }

    pub async fn generate(&self, request: &CompositeRequest) -> GenerationOutcome {
        match self.run(request).await {
            Ok(result) => GenerationOutcome::Completed(result),
            Err((stage, error)) => {
                error!("Error during generation ({stage}): {error:#}");
                GenerationOutcome::Failed { stage, error }
            }
        }
    }

    async fn run(
        &self,
        request: &CompositeRequest,
    ) -> Result<GenerationResult, (PipelineStage, anyhow::Error)> {
        if self.preflight {
            self.preflight_check()
                .await
                .map_err(|err| (PipelineStage::PreflightCheck, err))?;
        }

        ensure_parent_dir(&request.output_path)
            .await
            .map_err(|err| (PipelineStage::Persist, err))?;

        validate_references(&request.reference_images)
            .await
            .map_err(|err| (PipelineStage::ValidateReferences, err))?;

        self.wait_for_rate_limit().await;

        let generated = imageapi::generate_image(&self.client, &request.instruction, &self.options)
            .await
            .context("Main generation request failed")
            .map_err(|err| (PipelineStage::Generate, err))?;

        let output_path = save_image(&generated.image, &request.output_path)
            .await
            .map_err(|err| (PipelineStage::Persist, err))?;
        info!("Image saved to: {}", output_path.display());

        let image_base64 = encode_image_to_base64(&generated.image)
            .context("Unable to base64-encode generated image")
            .map_err(|err| (PipelineStage::Encode, err))?;

        Ok(GenerationResult {
            output_path,
            image_base64,
            revised_prompt: generated.revised_prompt,
        })
    }

    async fn preflight_check(&self) -> Result<()> {
        info!("Testing API connection");
        match imageapi::self_test(&self.client, &self.options).await {
            Ok(test_image) => {
                info!(
                    "API test succeeded ({}x{} image from {})",
                    test_image.image.width(),
                    test_image.image.height(),
                    test_image.url
                );
                Ok(())
            }
            Err(err) => {
                error!("API test failed: {err}");
                Err(anyhow::Error::new(err)
                    .context("API test failed, not proceeding with main request"))
            }
        }
    }

    async fn wait_for_rate_limit(&self) {
        let delay = self.rate_limit.delay();
        if delay.is_zero() {
            return;
        }
        info!("Waiting {}s before the generation request", delay.as_secs_f32());
        tokio::time::sleep(delay).await;
    }
}

/// Loads each reference purely to confirm it is reachable and decodable.
async fn validate_references(sources: &[String]) -> Result<()> {
    for source in sources {
        let img = load_image(source).await?;
        info!(
            "Reference image ok: {source} ({}x{})",
            img.width(),
            img.height()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use imageapi::ImageProvider;
    use std::time::{Duration, Instant};

    fn offline_client() -> ImageGenClient {
        ImageGenClient::new(
            ImageProvider::OpenAI,
            "TEST",
            "http://127.0.0.1:1",
            "dall-e-3",
        )
    }

    #[tokio::test]
    async fn unreachable_service_fails_at_preflight() {
        let tmp = tempfile::tempdir().unwrap();
        let request = CompositeRequest {
            reference_images: vec![],
            instruction: "anything".to_string(),
            output_path: tmp.path().join("out/result.png"),
        };

        let outcome = CompositeGenerator::new(offline_client())
            .with_rate_limit(RateLimitPolicy::None)
            .generate(&request)
            .await;

        match outcome {
            GenerationOutcome::Failed { stage, .. } => {
                assert_eq!(stage, PipelineStage::PreflightCheck)
            }
            GenerationOutcome::Completed(_) => panic!("expected failure"),
        }
        assert!(!request.output_path.exists());
    }

    #[tokio::test]
    async fn missing_reference_fails_validation() {
        let tmp = tempfile::tempdir().unwrap();
        let request = CompositeRequest {
            reference_images: vec![tmp.path().join("nope.jpg").display().to_string()],
            instruction: "anything".to_string(),
            output_path: tmp.path().join("result.png"),
        };

        let outcome = CompositeGenerator::new(offline_client())
            .with_preflight(false)
            .with_rate_limit(RateLimitPolicy::Fixed(Duration::from_secs(60)))
            .generate(&request)
            .await;

        match outcome {
            GenerationOutcome::Failed { stage, error } => {
                assert_eq!(stage, PipelineStage::ValidateReferences);
                assert!(format!("{error}").contains("nope.jpg"));
            }
            GenerationOutcome::Completed(_) => panic!("expected failure"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn fixed_policy_sleeps_for_its_duration() {
        let generator = CompositeGenerator::new(offline_client())
            .with_rate_limit(RateLimitPolicy::Fixed(Duration::from_secs(20)));

        let started = tokio::time::Instant::now();
        generator.wait_for_rate_limit().await;

        assert!(started.elapsed() >= Duration::from_secs(20));
    }

    #[tokio::test]
    async fn disabled_policy_does_not_sleep() {
        let generator =
            CompositeGenerator::new(offline_client()).with_rate_limit(RateLimitPolicy::None);

        let started = Instant::now();
        generator.wait_for_rate_limit().await;

        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn builder_keeps_client() {
        let generator = CompositeGenerator::new(offline_client());
        assert_eq!(generator.client().endpoint(), "http://127.0.0.1:1");
    }
}
