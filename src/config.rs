use anyhow::{Context, Result};
use serde::Deserialize;
use std::{fs, path::Path, time::Duration};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub predict_path: String,
    pub upload_path: String,
    /// Multipart field name the service reads the file from.
    pub upload_field: String,
    /// No timeout when unset; a hung service keeps the submission waiting.
    pub timeout_ms: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            predict_path: "predict".to_string(),
            upload_path: "upload".to_string(),
            upload_field: "file".to_string(),
            timeout_ms: None,
        }
    }
}

impl ClientConfig {
    /// Defaults, then the JSON file (if given), then `VITALS_*` env overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut cfg = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };

        if let Ok(url) = std::env::var("VITALS_BASE_URL") {
            cfg.base_url = url;
        }
        if let Ok(ms) = std::env::var("VITALS_TIMEOUT_MS") {
            let ms = ms
                .parse()
                .with_context(|| format!("VITALS_TIMEOUT_MS is not a number: {:?}", ms))?;
            cfg.timeout_ms = Some(ms);
        }

        Ok(cfg.normalized())
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        let cfg: Self = serde_json::from_str(&data)
            .with_context(|| format!("invalid config JSON in {}", path.display()))?;
        Ok(cfg.normalized())
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self.normalized()
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    pub fn predict_url(&self) -> String {
        format!("{}/{}", self.base_url, self.predict_path)
    }

    pub fn upload_url(&self) -> String {
        format!("{}/{}", self.base_url, self.upload_path)
    }

    fn normalized(mut self) -> Self {
        while self.base_url.ends_with('/') {
            self.base_url.pop();
        }
        self.predict_path = self.predict_path.trim_start_matches('/').to_string();
        self.upload_path = self.upload_path.trim_start_matches('/').to_string();
        self
    }
}
