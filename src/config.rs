//! Process-wide configuration
//!
//! Loaded once at the boundary (environment variables, with `.env` support)
//! and handed by reference to the client factory and the image store.

use crate::{Error, Result};
use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_DISK: &str = "public";
pub const DEFAULT_PATH: &str = "gemininano";
pub const DEFAULT_DISK_URL: &str = "/storage";
pub const DEFAULT_S3_REGION: &str = "us-east-1";

/// Connection details for an S3-compatible storage disk.
#[derive(Debug, Clone, PartialEq)]
pub struct S3Config {
    pub bucket: String,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub endpoint: Option<String>,
    pub region: String,
    /// Public URL prefix objects are served from.
    pub base_url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub timeout: Option<u64>,
    pub model: String,
    pub store: bool,
    pub disk: String,
    pub path: String,
    pub disk_root: Option<PathBuf>,
    pub disk_url: Option<String>,
    pub s3: Option<S3Config>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: Some(DEFAULT_BASE_URL.to_string()),
            api_key: None,
            timeout: Some(DEFAULT_TIMEOUT_SECS),
            model: DEFAULT_MODEL.to_string(),
            store: true,
            disk: DEFAULT_DISK.to_string(),
            path: DEFAULT_PATH.to_string(),
            disk_root: None,
            disk_url: None,
            s3: None,
        }
    }
}

impl Config {
    /// Load configuration from the process environment, reading `.env` first
    /// when one is present.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup. Unset keys fall back
    /// to the defaults of [`Config::default`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let timeout = match var("GEMINI_NANO_TIMEOUT") {
            Some(raw) => Some(raw.trim().parse::<u64>().map_err(|_| {
                Error::Config(format!("GEMINI_NANO_TIMEOUT must be whole seconds, got '{}'", raw))
            })?),
            None => defaults.timeout,
        };

        let store = match var("GEMINI_NANO_STORE") {
            Some(raw) => parse_bool(&raw).ok_or_else(|| {
                Error::Config(format!("GEMINI_NANO_STORE must be a boolean, got '{}'", raw))
            })?,
            None => defaults.store,
        };

        let s3 = var("GEMINI_NANO_S3_BUCKET").map(|bucket| S3Config {
            base_url: var("GEMINI_NANO_S3_URL").unwrap_or_default(),
            bucket,
            access_key_id: var("GEMINI_NANO_S3_KEY"),
            secret_access_key: var("GEMINI_NANO_S3_SECRET"),
            endpoint: var("GEMINI_NANO_S3_ENDPOINT"),
            region: var("GEMINI_NANO_S3_REGION").unwrap_or_else(|| DEFAULT_S3_REGION.to_string()),
        });

        Ok(Self {
            base_url: var("GEMINI_NANO_URL").or(defaults.base_url),
            api_key: var("GEMINI_NANO_KEY"),
            timeout,
            model: var("GEMINI_NANO_MODEL").unwrap_or(defaults.model),
            store,
            disk: var("GEMINI_NANO_DISK").unwrap_or(defaults.disk),
            path: var("GEMINI_NANO_PATH").unwrap_or(defaults.path),
            disk_root: var("GEMINI_NANO_DISK_ROOT").map(PathBuf::from),
            disk_url: var("GEMINI_NANO_DISK_URL"),
            s3,
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
