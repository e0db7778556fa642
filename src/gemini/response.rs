//! Image generation response parsing and persistence.

use crate::storage::ImageStore;
use crate::{Error, Result};
use base64::Engine as _;
use serde_json::Value;
use uuid::Uuid;

/// Inline-data keys checked on each response part, in priority order.
const INLINE_DATA_KEYS: [&str; 2] = ["inlineData", "inline_data"];

/// A `generateContent` response known to carry inline image data.
#[derive(Debug, Clone)]
pub struct GenerateResponse {
    base64_image: String,
    raw: Value,
}

impl GenerateResponse {
    /// Locate the base64 image in a response body.
    ///
    /// Parts are read from `candidates[0].content.parts`, falling back to a
    /// top-level `parts` array. The first part carrying a string under
    /// `inlineData.data` or `inline_data.data` wins.
    pub fn from_payload(data: Value) -> Result<Self> {
        let base64_image = extract_base64(&data)
            .filter(|b64| !b64.is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                Error::ImageResponse("Gemini response did not contain image data.".to_string())
            })?;

        Ok(Self {
            base64_image,
            raw: data,
        })
    }

    pub fn base64(&self) -> &str {
        &self.base64_image
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn into_raw(self) -> Value {
        self.raw
    }

    /// Strictly decode the image bytes.
    pub fn decode(&self) -> Result<Vec<u8>> {
        base64::engine::general_purpose::STANDARD
            .decode(&self.base64_image)
            .map_err(|e| {
                Error::ImageResponse(format!("Failed to decode base64 image data: {}", e))
            })
    }

    /// Return the base64 image as-is when storing is disabled, otherwise
    /// write it to the store under a fresh `<uuid>.png` name and return its URL.
    pub async fn result(&self, store: &ImageStore) -> Result<String> {
        let Some(disk) = store.disk() else {
            return Ok(self.base64_image.clone());
        };

        let binary = self.decode()?;
        let path = store.image_path(&format!("{}.png", Uuid::new_v4()));

        disk.put(&path, &binary).await?;
        tracing::debug!("Stored generated image ({} bytes) at {}", binary.len(), path);

        Ok(disk.url(&path))
    }
}

fn extract_base64(data: &Value) -> Option<&str> {
    let parts = data
        .pointer("/candidates/0/content/parts")
        .and_then(Value::as_array)
        .or_else(|| data.get("parts").and_then(Value::as_array))?;

    parts.iter().find_map(|part| {
        INLINE_DATA_KEYS
            .iter()
            .find_map(|key| part.get(key)?.get("data")?.as_str())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryDisk, StorageDisk};
    use serde_json::json;
    use std::sync::Arc;

    fn encode(bytes: &[u8]) -> String {
        base64::engine::general_purpose::STANDARD.encode(bytes)
    }

    fn response_with(data: &str) -> GenerateResponse {
        GenerateResponse::from_payload(json!({ "parts": [{ "inlineData": { "data": data } }] }))
            .unwrap()
    }

    #[test]
    fn test_parses_candidates_inline_data() {
        let data = json!({
            "candidates": [{ "content": { "parts": [{ "inlineData": { "data": "QUJD" } }] } }]
        });

        let resp = GenerateResponse::from_payload(data.clone()).unwrap();

        assert_eq!(resp.base64(), "QUJD");
        assert_eq!(resp.raw(), &data);
    }

    #[test]
    fn test_parses_top_level_snake_case_parts() {
        let resp =
            GenerateResponse::from_payload(json!({ "parts": [{ "inline_data": { "data": "aW1n" } }] }))
                .unwrap();

        assert_eq!(resp.base64(), "aW1n");
    }

    #[test]
    fn test_skips_text_parts_and_takes_first_image() {
        let data = json!({
            "candidates": [{ "content": { "parts": [
                { "text": "here you go" },
                { "inline_data": { "mimeType": "image/png", "data": "Zmlyc3Q=" } },
                { "inlineData": { "data": "c2Vjb25k" } }
            ] } }]
        });

        assert_eq!(GenerateResponse::from_payload(data).unwrap().base64(), "Zmlyc3Q=");
    }

    #[test]
    fn test_camel_case_preferred_within_a_part() {
        let data = json!({ "parts": [{
            "inline_data": { "data": "c25ha2U=" },
            "inlineData": { "data": "Y2FtZWw=" }
        }] });

        assert_eq!(GenerateResponse::from_payload(data).unwrap().base64(), "Y2FtZWw=");
    }

    #[test]
    fn test_falls_back_to_top_level_parts_when_candidates_not_array() {
        let data = json!({
            "candidates": [{ "content": { "parts": "nope" } }],
            "parts": [{ "inlineData": { "data": "b2s=" } }]
        });

        assert_eq!(GenerateResponse::from_payload(data).unwrap().base64(), "b2s=");
    }

    #[test]
    fn test_empty_payload_is_rejected() {
        let err = GenerateResponse::from_payload(json!({})).unwrap_err();
        assert!(matches!(err, Error::ImageResponse(_)));
    }

    #[test]
    fn test_non_string_and_empty_data_are_rejected() {
        for data in [
            json!({ "parts": [{ "inlineData": { "data": 42 } }] }),
            json!({ "parts": [{ "inlineData": { "data": "" } }] }),
            json!({ "parts": [{ "text": "only text" }] }),
            json!([1, 2, 3]),
        ] {
            let err = GenerateResponse::from_payload(data).unwrap_err();
            assert!(matches!(err, Error::ImageResponse(_)));
        }
    }

    #[tokio::test]
    async fn test_result_returns_base64_when_store_disabled() {
        let resp = response_with(&encode(b"abc"));

        let result = resp.result(&ImageStore::passthrough()).await.unwrap();
        assert_eq!(result, encode(b"abc"));
    }

    #[tokio::test]
    async fn test_result_stores_png_and_returns_url() {
        let disk = MemoryDisk::new().with_base_url("https://cdn.example.test".to_string());
        let store = ImageStore::new(Arc::new(disk.clone()), "/gemininano/");
        let resp = response_with(&encode(b"file-bytes"));

        let url = resp.result(&store).await.unwrap();

        let files = disk.get_files();
        assert_eq!(files.len(), 1);
        let (path, bytes) = files.into_iter().next().unwrap();
        assert!(path.starts_with("gemininano/"));
        assert!(path.ends_with(".png"));
        assert_eq!(bytes, b"file-bytes");
        assert!(disk.exists(&path).await.unwrap());
        assert_eq!(url, format!("https://cdn.example.test/{}", path));
    }

    #[tokio::test]
    async fn test_result_without_prefix_stores_at_root() {
        let disk = MemoryDisk::new();
        let store = ImageStore::new(Arc::new(disk.clone()), "");

        response_with(&encode(b"x")).result(&store).await.unwrap();

        let path = disk.get_files().into_keys().next().unwrap();
        assert!(!path.contains('/'));
        assert!(path.ends_with(".png"));
    }

    #[tokio::test]
    async fn test_result_twice_writes_two_files() {
        let disk = MemoryDisk::new();
        let store = ImageStore::new(Arc::new(disk.clone()), "gemininano");
        let resp = response_with(&encode(b"twice"));

        let first = resp.result(&store).await.unwrap();
        let second = resp.result(&store).await.unwrap();

        assert_ne!(first, second);
        assert_eq!(disk.get_files().len(), 2);
    }

    #[tokio::test]
    async fn test_result_rejects_invalid_base64_before_writing() {
        let disk = MemoryDisk::new();
        let store = ImageStore::new(Arc::new(disk.clone()), "gemininano");
        let resp = response_with("@@@not-base64@@@");

        let err = resp.result(&store).await.unwrap_err();

        assert!(matches!(err, Error::ImageResponse(_)));
        assert_eq!(disk.get_put_count(), 0);
    }
}
