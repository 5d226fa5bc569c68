use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;

#[derive(Clone, Debug, PartialEq)]
pub enum FetchError {
    Transport(String),
    Status(u16, String),
    Decode(String),
}

impl FetchError {
    // Status line for the error modal. Transport and decode failures map to
    // code 0 with a short reason, the way browser XHR reported them.
    pub fn status_parts(&self) -> (u16, String) {
        match self {
            FetchError::Transport(_) => (0, "error".to_string()),
            FetchError::Status(code, reason) => (*code, reason.clone()),
            FetchError::Decode(_) => (0, "parsererror".to_string()),
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Transport(msg) => write!(f, "transport error: {msg}"),
            FetchError::Status(code, reason) => write!(f, "status {code} {reason}"),
            FetchError::Decode(msg) => write!(f, "decode error: {msg}"),
        }
    }
}

#[derive(Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base: Arc<String>,
}

impl BackendClient {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base: Arc::new(base_url.trim_end_matches('/').to_string()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, FetchError> {
        let response = self.request(path, query).await?;
        response
            .json::<T>()
            .await
            .map_err(|err| FetchError::Decode(err.to_string()))
    }

    pub async fn get_ok(&self, path: &str, query: &[(&str, String)]) -> Result<(), FetchError> {
        self.request(path, query).await.map(|_| ())
    }

    async fn request(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<reqwest::Response, FetchError> {
        let url = format!("{}{}", self.base, path);
        let mut request = self.http.get(&url);
        if !query.is_empty() {
            request = request.query(query);
        }
        let response = request
            .send()
            .await
            .map_err(|err| FetchError::Transport(err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown Error").to_string(),
            ));
        }
        Ok(response)
    }
}
