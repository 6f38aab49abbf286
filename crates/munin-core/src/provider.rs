//! Text-generation backends behind a single capability trait.
//!
//! The pipeline is polymorphic over one operation — produce text from a
//! prompt. Three interchangeable backends: OpenAI, Gemini, and Ollama
//! (local). Swapping backends never touches pipeline logic.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::GeneratorError;

const OPENAI_API_BASE: &str = "https://api.openai.com/v1";
const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const OLLAMA_DEFAULT_BASE: &str = "http://localhost:11434";

const REQUEST_TIMEOUT_SECS: u64 = 60;

/// The single external capability the pipeline depends on.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, temperature: f32) -> Result<String, GeneratorError>;
}

/// Backend selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    OpenAi,
    Gemini,
    Ollama,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Gemini => "gemini",
            Provider::Ollama => "ollama",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Some(Provider::OpenAi),
            "gemini" => Some(Provider::Gemini),
            "ollama" => Some(Provider::Ollama),
            _ => None,
        }
    }

    /// Default model name per backend.
    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::OpenAi => "gpt-4o",
            Provider::Gemini => "gemini-1.5-pro",
            Provider::Ollama => "qwen2.5:latest",
        }
    }
}

/// Backend configuration: model name plus an optional base endpoint for
/// local backends.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub model: String,
    pub base_url: Option<String>,
}

impl GeneratorConfig {
    pub fn new(model: impl Into<String>) -> Self {
        GeneratorConfig {
            model: model.into(),
            base_url: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }
}

/// Build a generator for the selected backend. API keys come from the
/// environment (OPENAI_API_KEY / GOOGLE_API_KEY); Ollama needs none.
pub fn create_generator(
    provider: Provider,
    config: GeneratorConfig,
) -> Result<Box<dyn TextGenerator>, GeneratorError> {
    match provider {
        Provider::OpenAi => Ok(Box::new(OpenAiGenerator::from_env(config)?)),
        Provider::Gemini => Ok(Box::new(GeminiGenerator::from_env(config)?)),
        Provider::Ollama => Ok(Box::new(OllamaGenerator::new(config))),
    }
}

fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

// ---------------------------------------------------------------------------
// OpenAI (chat completions)
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Deserialize)]
struct ChatMessageResponse {
    content: String,
}

pub struct OpenAiGenerator {
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl OpenAiGenerator {
    pub fn from_env(config: GeneratorConfig) -> Result<Self, GeneratorError> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or(GeneratorError::MissingApiKey("OPENAI_API_KEY"))?;
        Ok(OpenAiGenerator {
            api_key,
            model: config.model,
            client: http_client(),
        })
    }
}

#[async_trait]
impl TextGenerator for OpenAiGenerator {
    async fn generate(&self, prompt: &str, temperature: f32) -> Result<String, GeneratorError> {
        let url = format!("{}/chat/completions", OPENAI_API_BASE);
        let body = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature,
        };

        let res = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            return Err(GeneratorError::Status { status, body });
        }

        let parsed: ChatResponse = res.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(GeneratorError::EmptyCompletion)
    }
}

// ---------------------------------------------------------------------------
// Gemini (generateContent)
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GeminiGenerationConfig,
}

#[derive(Serialize, Deserialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Serialize, Deserialize)]
struct GeminiPart {
    text: String,
}

#[derive(Serialize)]
struct GeminiGenerationConfig {
    temperature: f32,
}

#[derive(Deserialize)]
struct GeminiResponse {
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}

pub struct GeminiGenerator {
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl GeminiGenerator {
    pub fn from_env(config: GeneratorConfig) -> Result<Self, GeneratorError> {
        let api_key = std::env::var("GOOGLE_API_KEY")
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or(GeneratorError::MissingApiKey("GOOGLE_API_KEY"))?;
        Ok(GeminiGenerator {
            api_key,
            model: config.model,
            client: http_client(),
        })
    }
}

#[async_trait]
impl TextGenerator for GeminiGenerator {
    async fn generate(&self, prompt: &str, temperature: f32) -> Result<String, GeneratorError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            GEMINI_API_BASE, self.model, self.api_key
        );
        let body = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GeminiGenerationConfig { temperature },
        };

        let res = self.client.post(&url).json(&body).send().await?;

        if !res.status().is_success() {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            return Err(GeneratorError::Status { status, body });
        }

        let parsed: GeminiResponse = res.json().await?;
        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or(GeneratorError::EmptyCompletion)
    }
}

// ---------------------------------------------------------------------------
// Ollama (local /api/generate)
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct OllamaRequest {
    model: String,
    prompt: String,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f32,
}

#[derive(Deserialize)]
struct OllamaResponse {
    response: String,
}

pub struct OllamaGenerator {
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl OllamaGenerator {
    /// Base endpoint priority: explicit config > OLLAMA_BASE_URL > localhost.
    pub fn new(config: GeneratorConfig) -> Self {
        let base_url = config
            .base_url
            .or_else(|| std::env::var("OLLAMA_BASE_URL").ok())
            .unwrap_or_else(|| OLLAMA_DEFAULT_BASE.to_string());
        OllamaGenerator {
            model: config.model,
            base_url: base_url.trim_end_matches('/').to_string(),
            client: http_client(),
        }
    }
}

#[async_trait]
impl TextGenerator for OllamaGenerator {
    async fn generate(&self, prompt: &str, temperature: f32) -> Result<String, GeneratorError> {
        let url = format!("{}/api/generate", self.base_url);
        let body = OllamaRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            stream: false,
            options: OllamaOptions { temperature },
        };

        let res = self.client.post(&url).json(&body).send().await?;

        if !res.status().is_success() {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            return Err(GeneratorError::Status { status, body });
        }

        let parsed: OllamaResponse = res.json().await?;
        Ok(parsed.response)
    }
}
