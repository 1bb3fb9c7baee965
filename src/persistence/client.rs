//! HTTP client for the hosted functions (WASM only)
//!
//! Every request carries an abort timeout. Failures come back as
//! `ApiError` values; nothing here panics or blocks the frame loop.

use serde::Serialize;
use serde::de::DeserializeOwned;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{AbortSignal, Request, RequestInit, RequestMode, Response};

use super::error::ApiError;
use super::protocol::{
    ErrorBody, LEADERBOARD_PATH, LeaderboardResponse, RANK_PATH, REGISTER_PATH, RankResponse,
    RegisterRequest, RegisterResponse, SUBMIT_PATH, SubmitScoreRequest, SubmitScoreResponse,
    clamp_limit,
};

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Prefix for all endpoint paths
    pub base_url: String,
    pub timeout_ms: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "/.netlify/functions".to_string(),
            timeout_ms: 5000,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ApiClient {
    config: ClientConfig,
}

fn js_message(value: &JsValue) -> String {
    js_sys::Reflect::get(value, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string())
        .unwrap_or_else(|| format!("{value:?}"))
}

/// A rejected fetch is either our abort timeout or a network failure
fn fetch_error(value: JsValue) -> ApiError {
    let name = js_sys::Reflect::get(&value, &JsValue::from_str("name"))
        .ok()
        .and_then(|n| n.as_string());
    match name.as_deref() {
        Some("TimeoutError") | Some("AbortError") => ApiError::Timeout,
        _ => ApiError::Network(js_message(&value)),
    }
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: &str,
        url: &str,
        body: Option<String>,
    ) -> Result<T, ApiError> {
        let opts = RequestInit::new();
        opts.set_method(method);
        opts.set_mode(RequestMode::SameOrigin);
        let signal = AbortSignal::timeout_with_u32(self.config.timeout_ms);
        opts.set_signal(Some(&signal));
        if let Some(body) = &body {
            opts.set_body(&JsValue::from_str(body));
        }

        let request = Request::new_with_str_and_init(url, &opts)
            .map_err(|e| ApiError::Network(js_message(&e)))?;
        if body.is_some() {
            request
                .headers()
                .set("Content-Type", "application/json")
                .map_err(|e| ApiError::Network(js_message(&e)))?;
        }

        let window = web_sys::window().ok_or_else(|| ApiError::Network("no window".into()))?;
        let response: Response = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(fetch_error)?
            .dyn_into()
            .map_err(|_| ApiError::Decode("fetch did not return a Response".into()))?;

        let text_promise = response
            .text()
            .map_err(|e| ApiError::Decode(js_message(&e)))?;
        let text = JsFuture::from(text_promise)
            .await
            .map_err(fetch_error)?
            .as_string()
            .unwrap_or_default();

        if !response.ok() {
            let message = serde_json::from_str::<ErrorBody>(&text)
                .map(|b| b.error)
                .unwrap_or(text);
            return Err(ApiError::Server {
                status: response.status(),
                message,
            });
        }
        Ok(serde_json::from_str(&text)?)
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let json = serde_json::to_string(body)?;
        self.send("POST", &self.url(path), Some(json)).await
    }

    pub async fn register_identity(
        &self,
        request: &RegisterRequest,
    ) -> Result<RegisterResponse, ApiError> {
        let request = request.validated()?;
        self.post(REGISTER_PATH, &request).await
    }

    pub async fn submit_score(
        &self,
        request: &SubmitScoreRequest,
    ) -> Result<SubmitScoreResponse, ApiError> {
        request.validated()?;
        self.post(SUBMIT_PATH, request).await
    }

    pub async fn leaderboard(&self, limit: Option<usize>) -> Result<LeaderboardResponse, ApiError> {
        let url = format!("{}?limit={}", self.url(LEADERBOARD_PATH), clamp_limit(limit));
        self.send("GET", &url, None).await
    }

    pub async fn my_rank(&self, device_id: &str) -> Result<RankResponse, ApiError> {
        let encoded = String::from(js_sys::encode_uri_component(device_id));
        let url = format!("{}?deviceId={}", self.url(RANK_PATH), encoded);
        self.send("GET", &url, None).await
    }
}
