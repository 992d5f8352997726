// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! vLLM client for DotsOCR via the OpenAI-compatible API

use async_trait::async_trait;
use image::DynamicImage;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::backend::OcrBackend;
use super::image_utils::encode_png_base64;
use crate::config::ParserConfig;
use crate::error::{OcrError, Result};

/// Image placeholder tokens DotsOCR expects in front of the prompt
const IMAGE_TOKENS: &str = "<|img|><|imgpad|><|endofimg|>";

// --- OpenAI-compatible serde structs ---

#[derive(serde::Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_completion_tokens: u32,
    temperature: f32,
    top_p: f32,
}

#[derive(serde::Serialize)]
struct ChatMessage {
    role: String,
    content: serde_json::Value,
}

#[derive(serde::Deserialize)]
struct ChatUsage {
    total_tokens: u32,
}

#[derive(serde::Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(serde::Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(serde::Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Entry of `GET /v1/models`
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ModelCard {
    pub id: String,
    #[serde(default)]
    pub owned_by: Option<String>,
    #[serde(default)]
    pub max_model_len: Option<u64>,
}

#[derive(serde::Deserialize)]
struct ModelList {
    data: Vec<ModelCard>,
}

/// Sampling parameters sent with every completion request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingParams {
    pub temperature: f32,
    pub top_p: f32,
    pub max_completion_tokens: u32,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            temperature: 0.1,
            top_p: 1.0,
            max_completion_tokens: 16384,
        }
    }
}

/// Result of a single inference call
#[derive(Debug, Clone)]
pub struct InferenceOutput {
    pub text: String,
    pub model: String,
    pub processing_time_ms: u64,
    pub tokens_used: u32,
}

/// Client for calling a vLLM server hosting DotsOCR
#[derive(Debug, Clone)]
pub struct VlmClient {
    client: Client,
    endpoint: String,
    model_name: String,
    params: SamplingParams,
}

impl VlmClient {
    /// Create a new client
    pub fn new(
        endpoint: &str,
        model_name: &str,
        params: SamplingParams,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        let endpoint = endpoint.trim_end_matches('/').to_string();
        info!(
            "vLLM client configured: endpoint={}, model={}",
            endpoint, model_name
        );

        Ok(Self {
            client,
            endpoint,
            model_name: model_name.to_string(),
            params,
        })
    }

    /// Build a client from parser configuration
    pub fn from_config(config: &ParserConfig) -> Result<Self> {
        Self::new(
            &config.endpoint(),
            &config.model_name,
            SamplingParams {
                temperature: config.temperature,
                top_p: config.top_p,
                max_completion_tokens: config.max_completion_tokens,
            },
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn params(&self) -> SamplingParams {
        self.params
    }

    /// Copy of this client with different sampling parameters
    pub fn with_params(&self, params: SamplingParams) -> Self {
        Self {
            params,
            ..self.clone()
        }
    }

    /// Check if the server answers `/health` with 200
    pub async fn health_check(&self) -> bool {
        match self
            .client
            .get(format!("{}/health", self.endpoint))
            .timeout(Duration::from_secs(5))
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                debug!("vLLM health check failed: {}", e);
                false
            }
        }
    }

    /// Poll `/health` until the server is up or `timeout` elapses
    pub async fn wait_for_server(&self, timeout: Duration, poll_interval: Duration) -> bool {
        info!("Waiting for vLLM server at {}", self.endpoint);
        let start = Instant::now();
        while start.elapsed() < timeout {
            if self.health_check().await {
                info!("vLLM server ready after {:.1}s", start.elapsed().as_secs_f64());
                return true;
            }
            tokio::time::sleep(poll_interval).await;
        }
        warn!("vLLM server did not become ready within {:?}", timeout);
        false
    }

    /// List models served by the endpoint
    pub async fn list_models(&self) -> Result<Vec<ModelCard>> {
        let response = self
            .client
            .get(format!("{}/v1/models", self.endpoint))
            .timeout(Duration::from_secs(5))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OcrError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let list: ModelList = response.json().await?;
        Ok(list.data)
    }

    /// Run the model on an image with the given prompt
    pub async fn infer_image(&self, image: &DynamicImage, prompt: &str) -> Result<InferenceOutput> {
        let start = Instant::now();
        let base64_image = encode_png_base64(image)?;
        let request = self.build_request(&base64_image, prompt);

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.endpoint))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("vLLM returned {}: {}", status, body);
            return Err(OcrError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let chat_response: ChatResponse = response.json().await?;
        let text = chat_response
            .choices
            .into_iter()
            .next()
            .ok_or(OcrError::EmptyResponse)?
            .message
            .content
            .unwrap_or_default();
        let tokens_used = chat_response.usage.map(|u| u.total_tokens).unwrap_or(0);

        let output = InferenceOutput {
            text,
            model: self.model_name.clone(),
            processing_time_ms: start.elapsed().as_millis() as u64,
            tokens_used,
        };
        debug!(
            "vLLM inference complete: {} chars, {} tokens, {}ms",
            output.text.len(),
            output.tokens_used,
            output.processing_time_ms
        );
        Ok(output)
    }

    fn build_request(&self, base64_image: &str, prompt: &str) -> ChatRequest {
        let data_url = format!("data:image/png;base64,{}", base64_image);
        ChatRequest {
            model: self.model_name.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: serde_json::json!([
                    {"type": "image_url", "image_url": {"url": data_url}},
                    {"type": "text", "text": format!("{}{}", IMAGE_TOKENS, prompt)}
                ]),
            }],
            max_completion_tokens: self.params.max_completion_tokens,
            temperature: self.params.temperature,
            top_p: self.params.top_p,
        }
    }
}

#[async_trait]
impl OcrBackend for VlmClient {
    async fn infer(&self, image: &DynamicImage, prompt: &str) -> Result<String> {
        self.infer_image(image, prompt).await.map(|out| out.text)
    }

    fn model_name(&self) -> String {
        self.model_name.clone()
    }
}
