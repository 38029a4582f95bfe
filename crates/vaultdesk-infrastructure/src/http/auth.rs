use async_trait::async_trait;
use reqwest::Method;
use serde::Serialize;

use vaultdesk_core::error::Result;
use vaultdesk_core::session::{LoginResponse, RemoteAuthService, SystemStatus};

use super::client::ApiClient;

#[derive(Serialize)]
struct SetupRequest<'a> {
    password: &'a str,
    confirm_password: &'a str,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    password: &'a str,
}

#[derive(Serialize)]
struct ChangePasswordRequest<'a> {
    current_password: &'a str,
    new_password: &'a str,
    confirm_password: &'a str,
}

/// `/auth/*` endpoints.
#[derive(Clone)]
pub struct HttpAuthService {
    api: ApiClient,
}

impl HttpAuthService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl RemoteAuthService for HttpAuthService {
    async fn get_status(&self) -> Result<SystemStatus> {
        self.api
            .send(self.api.request(Method::GET, "/auth/status"))
            .await
    }

    async fn setup(&self, password: &str, confirm_password: &str) -> Result<()> {
        let body = SetupRequest {
            password,
            confirm_password,
        };
        self.api
            .send_unit(self.api.request(Method::POST, "/auth/setup").json(&body))
            .await
    }

    async fn login(&self, password: &str) -> Result<LoginResponse> {
        self.api
            .send(
                self.api
                    .request(Method::POST, "/auth/login")
                    .json(&LoginRequest { password }),
            )
            .await
    }

    async fn logout(&self) -> Result<()> {
        self.api
            .send_unit(self.api.request(Method::POST, "/auth/logout"))
            .await
    }

    async fn lock(&self) -> Result<()> {
        self.api
            .send_unit(self.api.request(Method::POST, "/auth/lock"))
            .await
    }

    async fn change_password(
        &self,
        current_password: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<()> {
        let body = ChangePasswordRequest {
            current_password,
            new_password,
            confirm_password,
        };
        self.api
            .send_unit(self.api.request(Method::PUT, "/auth/password").json(&body))
            .await
    }
}
