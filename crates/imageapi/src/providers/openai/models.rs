use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct ImageGenerationRequest<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub n: u8,
    pub size: String,
    pub quality: &'a str,
    pub style: &'a str,
    pub response_format: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ImageGenerationResponse {
    pub created: Option<i64>,
    #[serde(default)]
    pub data: Vec<ImageGenerationData>,
}

#[derive(Debug, Deserialize)]
pub struct ImageGenerationData {
    pub url: Option<String>,
    pub revised_prompt: Option<String>,
}
