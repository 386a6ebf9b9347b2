//! Reachability probe for the generation service.

use crate::error::ClientError;
use crate::protocol::HealthResponse;
use reqwest::Client;
use std::time::Duration;

/// Query `GET {base_url}/` and return the service's self-reported status.
pub async fn check_health(http: &Client, base_url: &str) -> Result<HealthResponse, ClientError> {
    let url = format!("{}/", base_url);
    let response = http
        .get(&url)
        .timeout(Duration::from_secs(5))
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ClientError::Server {
            status: status.as_u16(),
            body,
        });
    }

    Ok(response.json().await?)
}
