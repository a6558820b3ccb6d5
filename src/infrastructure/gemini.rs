//! Client for the Gemini `generateContent` endpoint, used as the logo editor.

use std::time::{Duration, Instant};

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::application::ImageEditor;
use crate::domain::{AppError, EditorConfig, Logo, Result};

/// Consulted when the configured key variable is unset.
const FALLBACK_API_KEY_ENV: &str = "API_KEY";

const DEFAULT_IMAGE_MIME: &str = "image/png";

/// Image editor backed by the Generative Language REST API.
pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    /// Create a client with an explicit API key.
    ///
    /// # Errors
    /// Returns `Http` if the HTTP client cannot be built.
    pub fn new(config: &EditorConfig, api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(AppError::http)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: api_key.into(),
        })
    }

    /// Create a client reading the API key from the environment.
    ///
    /// # Errors
    /// Returns `Config` when neither the configured variable nor `API_KEY`
    /// holds a key.
    pub fn from_env(config: &EditorConfig) -> Result<Self> {
        let api_key = [config.api_key_env.as_str(), FALLBACK_API_KEY_ENV]
            .into_iter()
            .find_map(|name| std::env::var(name).ok().filter(|v| !v.trim().is_empty()))
            .ok_or_else(|| AppError::Config {
                message: format!(
                    "No API key found; set {} or {FALLBACK_API_KEY_ENV}",
                    config.api_key_env
                ),
            })?;

        Self::new(config, api_key)
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }

    async fn generate(&self, image: &Logo, prompt: &str) -> Result<Logo> {
        let Logo::Inline { mime, data } = image else {
            return Err(AppError::MissingLogo);
        };

        let body = GenerateRequest {
            contents: Content {
                parts: vec![
                    RequestPart::Text {
                        text: prompt.to_string(),
                    },
                    RequestPart::InlineData {
                        inline_data: InlineData {
                            mime_type: mime.clone(),
                            data: data.clone(),
                        },
                    },
                ],
            },
        };

        let url = self.endpoint();
        tracing::debug!(url = %url, model = %self.model, "Sending image edit request");

        let start = Instant::now();
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(AppError::http)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());

            return Err(AppError::ImageEditor {
                message: format!("{status}: {error_text}"),
            });
        }

        let bytes = response.bytes().await.map_err(AppError::http)?;
        let logo = parse_generate_response(&bytes)?;

        tracing::debug!(
            latency_ms = start.elapsed().as_millis() as u64,
            size = logo.payload_len(),
            "Image edit response received"
        );
        Ok(logo)
    }
}

impl ImageEditor for GeminiClient {
    fn edit(&self, image: &Logo, prompt: &str) -> impl std::future::Future<Output = Result<Logo>> + Send {
        self.generate(image, prompt)
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Content,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum RequestPart {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    #[serde(default)]
    mime_type: String,
    #[serde(default)]
    data: String,
}

/// Raw `generateContent` response; only the fields we read.
#[derive(Debug, Deserialize, Default)]
struct RawResponse {
    #[serde(default)]
    candidates: Vec<RawCandidate>,
}

#[derive(Debug, Deserialize, Default)]
struct RawCandidate {
    #[serde(default)]
    content: Option<RawContent>,
}

#[derive(Debug, Deserialize, Default)]
struct RawContent {
    #[serde(default)]
    parts: Vec<RawPart>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct RawPart {
    #[serde(default)]
    inline_data: Option<InlineData>,
}

/// Extract the first inline image of the first candidate.
///
/// # Errors
/// Returns `JsonParse` for malformed JSON and `NoImageProduced` when no part
/// carries image data.
fn parse_generate_response(body: &[u8]) -> Result<Logo> {
    let raw: RawResponse = serde_json::from_slice(body).map_err(AppError::json_parse)?;

    raw.candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .and_then(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.inline_data)
                .find(|inline| !inline.data.is_empty())
        })
        .map(|inline| {
            let mime = if inline.mime_type.is_empty() {
                DEFAULT_IMAGE_MIME.to_string()
            } else {
                inline.mime_type
            };
            Logo::Inline {
                mime,
                data: inline.data,
            }
        })
        .ok_or(AppError::NoImageProduced)
}
