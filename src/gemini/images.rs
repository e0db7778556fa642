use super::mime::detect_image_mime;
use super::{Client, GenerateResponse};
use crate::{Error, Result};
use base64::Engine as _;
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    InlineData { inline_data: InlineData },
    Text { text: String },
}

#[derive(Debug, Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

/// Optional inputs to [`Images::generate`].
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    pub image_path: Option<PathBuf>,
    pub image_mime_type: Option<String>,
    /// Extra top-level payload fields (`generationConfig`, `safetySettings`, ...).
    /// Keys here replace same-named fields the request builds itself.
    pub extra: Map<String, Value>,
}

impl GenerateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_image(mut self, path: impl Into<PathBuf>) -> Self {
        self.image_path = Some(path.into());
        self
    }

    pub fn with_image_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.image_mime_type = Some(mime_type.into());
        self
    }

    pub fn with_option(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

/// Image generation endpoints bound to a [`Client`].
#[derive(Debug, Clone, Copy)]
pub struct Images<'a> {
    client: &'a Client,
}

impl<'a> Images<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Generate an image from `prompt`, optionally conditioned on a local image.
    pub async fn generate(&self, prompt: &str, options: GenerateOptions) -> Result<GenerateResponse> {
        let payload = build_payload(prompt, &options).await?;

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.client.base_url(),
            self.client.model()
        );

        tracing::debug!(
            "Sending image generation request to Gemini (model: {}, with image: {})",
            self.client.model(),
            options.image_path.is_some()
        );

        let mut request = self
            .client
            .http
            .post(&url)
            .header("x-goog-api-key", self.client.api_key())
            .header("Content-Type", "application/json")
            .json(&payload);
        if let Some(timeout) = self.client.request_timeout() {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(|e| {
            tracing::error!("Failed to send request to Gemini: {}", e);
            e
        })?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            let error_text = response.text().await?;
            tracing::error!("Gemini API error (status {}): {}", status, error_text);
            return Err(Error::Resource(format!(
                "Gemini image generation failed ({}): {}",
                status.as_u16(),
                error_text
            )));
        }

        let body = response.text().await?;
        let data: Value = serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse Gemini response: {}", e);
            Error::ImageResponse(format!("Failed to parse Gemini response: {}", e))
        })?;

        GenerateResponse::from_payload(data)
    }
}

/// Assemble the `generateContent` body: inline image part (if any) first,
/// then the prompt text, then `extra` merged over the top level.
pub async fn build_payload(prompt: &str, options: &GenerateOptions) -> Result<Value> {
    let mut parts = Vec::with_capacity(2);

    if let Some(path) = &options.image_path {
        parts.push(inline_image_part(path, options.image_mime_type.as_deref()).await?);
    }

    parts.push(Part::Text {
        text: prompt.to_string(),
    });

    let mut payload = Map::new();
    payload.insert(
        "contents".to_string(),
        serde_json::to_value(vec![Content { parts }])?,
    );
    payload.extend(options.extra.clone());

    Ok(Value::Object(payload))
}

async fn inline_image_part(path: &Path, mime_type: Option<&str>) -> Result<Part> {
    let binary = tokio::fs::read(path).await.map_err(|e| {
        Error::Resource(format!("Image file not readable: {} ({})", path.display(), e))
    })?;

    let mime_type = match mime_type {
        Some(mime_type) => mime_type.to_string(),
        None => detect_image_mime(&binary).to_string(),
    };

    Ok(Part::InlineData {
        inline_data: InlineData {
            mime_type,
            data: base64::engine::general_purpose::STANDARD.encode(&binary),
        },
    })
}
