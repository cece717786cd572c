use dioxus::prelude::*;
use serde::Deserialize;

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct RuntimeConfig {
    pub content_api_base_url: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            content_api_base_url: "/api/content".to_string(),
        }
    }
}

impl RuntimeConfig {
    pub fn content_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.content_api_base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

pub fn use_runtime_config() -> Resource<Result<RuntimeConfig, String>> {
    use_resource(|| async move { fetch_runtime_config().await })
}

#[cfg(target_arch = "wasm32")]
async fn fetch_runtime_config() -> Result<RuntimeConfig, String> {
    match fetch_config_from("/config.json").await {
        Ok(config) => Ok(config),
        Err(_) => fetch_config_from("/assets/config.json").await,
    }
}

#[cfg(target_arch = "wasm32")]
async fn fetch_config_from(path: &str) -> Result<RuntimeConfig, String> {
    let response = gloo_net::http::Request::get(path)
        .send()
        .await
        .map_err(|err| format!("config fetch failed: {err}"))?;
    if !response.ok() {
        return Err(format!("config fetch failed: status {}", response.status()));
    }
    response
        .json::<RuntimeConfig>()
        .await
        .map_err(|err| format!("config decode failed: {err}"))
}

#[cfg(not(target_arch = "wasm32"))]
async fn fetch_runtime_config() -> Result<RuntimeConfig, String> {
    let content_api_base_url = std::env::var("CONTENT_API_BASE_URL")
        .unwrap_or_else(|_| RuntimeConfig::default().content_api_base_url);
    Ok(RuntimeConfig {
        content_api_base_url,
    })
}
