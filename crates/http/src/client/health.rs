//! Health endpoint

use super::{ApiClient, ApiError};
use crate::types::HealthStatus;
use reqwest::Method;

const HEALTH_PATH: &str = "/healthz";

impl ApiClient {
    /// Query the backend health endpoint once
    pub async fn health(&self) -> Result<HealthStatus, ApiError> {
        let request = self.request(Method::GET, HEALTH_PATH);
        self.execute(request).await
    }
}
