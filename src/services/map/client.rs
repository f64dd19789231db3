use crate::error::ReportError;
use crate::kernel::label::RoomLabel;
use crate::kernel::smoother::Confirmation;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tracing::info;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:5000/maps/locations/add/slam";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Body of the location POST.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationPayload {
    pub map_name: String,
    pub label: RoomLabel,
    pub description: String,
}

impl LocationPayload {
    pub fn from_confirmation(map_name: &str, confirmation: &Confirmation) -> Self {
        Self {
            map_name: map_name.to_string(),
            label: confirmation.label,
            description: format!(
                "Auto-generated location for room type '{}' (majority {:.0}% of {} samples, stable for {:.1}s)",
                confirmation.label,
                confirmation.majority_fraction * 100.0,
                confirmation.window_size,
                confirmation.stable_for.as_secs_f64(),
            ),
        }
    }
}

/// What came back from a successful (2xx) delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportReceipt {
    pub status: u16,
    pub body: String,
}

/// Outbound side of the provider. One attempt per call, no retries.
pub trait LocationReporter: Send + Sync {
    fn report(
        &self,
        payload: &LocationPayload,
    ) -> impl Future<Output = Result<ReportReceipt, ReportError>> + Send;
}

/// HTTP client for the map location service.
#[derive(Clone)]
pub struct MapLocationClient {
    client: Client,
    endpoint: String,
}

impl MapLocationClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl LocationReporter for MapLocationClient {
    async fn report(&self, payload: &LocationPayload) -> Result<ReportReceipt, ReportError> {
        info!(
            "Posting room type '{}' to {} (map '{}')",
            payload.label, self.endpoint, payload.map_name
        );

        let response = self
            .client
            .post(&self.endpoint)
            .json(payload)
            .send()
            .await
            .map_err(ReportError::from_reqwest)?;

        let status = response.status();
        // Body is for logging only; a body read failure must not mask the status.
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(ReportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(ReportReceipt {
            status: status.as_u16(),
            body,
        })
    }
}
