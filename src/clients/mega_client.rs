use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Client for the internal Mega API
#[derive(Debug, Clone)]
pub struct MegaClient {
    client: Client,
    base_url: String,
}

#[derive(Debug)]
pub enum BackendError {
    /// The request could not be sent or its body could not be read
    Request(reqwest::Error),
    /// The backend answered with something that is not JSON
    InvalidJson(serde_json::Error),
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendError::Request(e) => write!(f, "Backend request failed: {}", e),
            BackendError::InvalidJson(e) => write!(f, "Backend returned invalid JSON: {}", e),
        }
    }
}

impl std::error::Error for BackendError {}

impl From<reqwest::Error> for BackendError {
    fn from(e: reqwest::Error) -> Self {
        BackendError::Request(e)
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(e: serde_json::Error) -> Self {
        BackendError::InvalidJson(e)
    }
}

impl MegaClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Outbound URL for deleting a merge request comment. The id is not escaped.
    pub fn comment_delete_url(&self, id: &str) -> String {
        format!("{}/api/v1/mr/comment/{}/delete", self.base_url, id)
    }

    /// Ask the backend to delete a merge request comment and return its JSON reply as is
    pub async fn delete_mr_comment(&self, id: &str) -> Result<serde_json::Value, BackendError> {
        let url = self.comment_delete_url(id);
        let res = self.client.post(&url).send().await?;
        debug!("POST {} answered {}", url, res.status());

        // The status is not inspected, the body is relayed whatever it says
        let body = res.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}
