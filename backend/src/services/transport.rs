//! Transport to the external prediction service.

use async_trait::async_trait;
use tracing::debug;

use crate::config::ForecastSettings;
use crate::error::{ForecastError, ForecastResult};
use crate::models::{PredictionRequest, PredictionResponse};

/// Sends a prediction request and returns the decoded response.
#[async_trait]
pub trait ForecastTransport: Send + Sync {
    async fn fetch(&self, request: &PredictionRequest) -> ForecastResult<PredictionResponse>;
}

/// JSON-over-HTTP transport backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpForecastTransport {
    client: reqwest::Client,
    url: String,
}

impl HttpForecastTransport {
    pub fn new(settings: &ForecastSettings) -> ForecastResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout())
            .build()
            .map_err(|e| ForecastError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: settings.predict_url(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ForecastTransport for HttpForecastTransport {
    async fn fetch(&self, request: &PredictionRequest) -> ForecastResult<PredictionResponse> {
        debug!(url = %self.url, area = %request.area, rooms = %request.rooms_en, "Posting prediction request");

        let response = self.client.post(&self.url).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ForecastError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ForecastError::Decode(e.to_string()))
    }
}
