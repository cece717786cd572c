use dioxus::prelude::*;
use serde::de::DeserializeOwned;

/// Fetches JSON from the content API whenever the URL built by `builder`
/// changes. A 404 maps to `Ok(None)`.
pub fn use_content_get<T, F>(builder: F) -> Resource<Result<Option<T>, String>>
where
    T: DeserializeOwned + 'static,
    F: Fn() -> String + 'static,
{
    use_resource(move || {
        let url = builder();
        async move { get_json(&url).await }
    })
}

#[cfg(target_arch = "wasm32")]
async fn get_json<T: DeserializeOwned>(url: &str) -> Result<Option<T>, String> {
    tracing::debug!(url, "content: fetch");
    let response = gloo_net::http::Request::get(url)
        .send()
        .await
        .map_err(|err| format!("request failed: {err}"))?;
    if response.status() == 404 {
        return Ok(None);
    }
    if !response.ok() {
        return Err(format!("http {}", response.status()));
    }
    response
        .json::<T>()
        .await
        .map(Some)
        .map_err(|err| format!("decode failed: {err}"))
}

#[cfg(not(target_arch = "wasm32"))]
async fn get_json<T: DeserializeOwned>(url: &str) -> Result<Option<T>, String> {
    Err(format!("content API unavailable outside the browser: {url}"))
}
