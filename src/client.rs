//! Blocking HTTP client for the Ollama REST API.
//!
//! A client is built per check and dropped with it, so no pooled connection
//! outlives the check that opened it.

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::Method;
use serde::Deserialize;

pub const TAGS_PATH: &str = "/api/tags";

/// Body of `GET /api/tags`.
#[derive(Debug, Default, Deserialize)]
pub struct TagsResponse {
    #[serde(default)]
    pub models: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
pub struct ModelEntry {
    #[serde(default)]
    pub name: Option<String>,
}

impl TagsResponse {
    pub fn has_model(&self, name: &str) -> bool {
        self.models
            .iter()
            .any(|m| m.name.as_deref() == Some(name))
    }
}

pub struct OllamaClient {
    base_url: String,
    http: Client,
}

impl OllamaClient {
    pub fn new(base_url: &str, timeout: Duration) -> reqwest::Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(0)
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn get(&self, path: &str) -> reqwest::Result<Response> {
        self.http.get(self.url(path)).send()
    }

    pub fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> reqwest::Result<Response> {
        let mut req = self.http.request(method, self.url(path));
        if let Some(body) = body {
            req = req.json(body);
        }
        req.send()
    }
}
