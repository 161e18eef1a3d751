//! Authentication API client methods

use super::pipeline::{LOGIN_PATH, REFRESH_PATH};
use super::{ApiClient, ApiError};
use crate::types::{LoginRequest, LoginResponse, RefreshRequest, RefreshResponse};
use reqwest::Method;

impl ApiClient {
    /// Sign in and store the returned tokens and profile.
    ///
    /// On failure the error from the pipeline is returned as is.
    pub async fn login(
        &self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<LoginResponse, ApiError> {
        let credentials = LoginRequest {
            username: username.into(),
            password: password.into(),
        };
        info!(username = %credentials.username, "Signing in");

        let request = self.request(Method::POST, LOGIN_PATH).json(&credentials);
        match self.execute::<LoginResponse>(request).await {
            Ok(response) => {
                self.session().establish(&response);
                Ok(response)
            }
            Err(e) => {
                error!(username = %credentials.username, "Login failed: {}", e);
                Err(e)
            }
        }
    }

    /// Exchange the stored refresh token for a new access token.
    ///
    /// The refresh token itself is kept. Failures are returned to the caller,
    /// who decides whether to log out.
    pub async fn refresh_token(&self) -> Result<RefreshResponse, ApiError> {
        let body = RefreshRequest {
            refresh: self.session().get_refresh_token(),
        };
        if body.refresh.is_none() {
            warn!("Refreshing without a stored refresh token");
        }

        let request = self.request(Method::POST, REFRESH_PATH).json(&body);
        let response: RefreshResponse = self.execute(request).await?;
        self.session().replace_access_token(&response.access);
        Ok(response)
    }

    /// End the session locally
    pub fn logout(&self) {
        self.session().logout();
    }
}
