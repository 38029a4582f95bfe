use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};

use vaultdesk_core::account::{
    AccountCreate, AccountPage, AccountQuery, AccountRecord, AccountStats, AccountUpdate,
    BatchOutcome, RemoteAccountService, TagMode,
};
use vaultdesk_core::error::Result;

use super::client::ApiClient;

#[derive(Deserialize)]
struct PasswordResponse {
    password: Option<String>,
}

#[derive(Deserialize)]
struct TotpResponse {
    totp_secret: Option<String>,
}

#[derive(Serialize)]
struct BatchIds<'a> {
    account_ids: &'a [String],
}

#[derive(Serialize)]
struct BatchTags<'a> {
    account_ids: &'a [String],
    tag_ids: &'a [String],
}

#[derive(Serialize)]
struct BatchUpdate<'a> {
    account_ids: &'a [String],
    #[serde(flatten)]
    data: &'a AccountUpdate,
}

/// `/accounts/*` endpoints.
#[derive(Clone)]
pub struct HttpAccountService {
    api: ApiClient,
}

impl HttpAccountService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl RemoteAccountService for HttpAccountService {
    async fn list(&self, query: &AccountQuery) -> Result<AccountPage> {
        let request = self
            .api
            .request(Method::GET, "/accounts")
            .query(&query.to_query_pairs());
        self.api.send(request).await
    }

    async fn get(&self, id: &str) -> Result<AccountRecord> {
        self.api
            .send(self.api.request(Method::GET, &format!("/accounts/{id}")))
            .await
    }

    async fn get_password(&self, id: &str) -> Result<Option<String>> {
        let response: PasswordResponse = self
            .api
            .send(self.api.request(Method::GET, &format!("/accounts/{id}/password")))
            .await?;
        Ok(response.password)
    }

    async fn get_totp(&self, id: &str) -> Result<Option<String>> {
        let response: TotpResponse = self
            .api
            .send(self.api.request(Method::GET, &format!("/accounts/{id}/totp")))
            .await?;
        Ok(response.totp_secret)
    }

    async fn create(&self, data: &AccountCreate) -> Result<AccountRecord> {
        self.api
            .send(self.api.request(Method::POST, "/accounts").json(data))
            .await
    }

    async fn update(&self, id: &str, data: &AccountUpdate) -> Result<AccountRecord> {
        self.api
            .send(
                self.api
                    .request(Method::PUT, &format!("/accounts/{id}"))
                    .json(data),
            )
            .await
    }

    async fn delete(&self, id: &str, hard: bool) -> Result<()> {
        let request = self
            .api
            .request(Method::DELETE, &format!("/accounts/{id}"))
            .query(&[("hard", hard)]);
        self.api.send_unit(request).await
    }

    async fn list_sources(&self) -> Result<Vec<String>> {
        self.api
            .send(self.api.request(Method::GET, "/accounts/sources"))
            .await
    }

    async fn get_stats(&self) -> Result<AccountStats> {
        self.api
            .send(self.api.request(Method::GET, "/accounts/stats"))
            .await
    }

    async fn batch_delete(&self, ids: &[String], hard: bool) -> Result<BatchOutcome> {
        let request = self
            .api
            .request(Method::POST, "/accounts/batch/delete")
            .query(&[("hard", hard)])
            .json(&BatchIds { account_ids: ids });
        self.api.send(request).await
    }

    async fn batch_update_tags(
        &self,
        ids: &[String],
        tag_ids: &[String],
        mode: TagMode,
    ) -> Result<BatchOutcome> {
        let request = self
            .api
            .request(Method::POST, "/accounts/batch/tags")
            .query(&[("action", mode.to_string())])
            .json(&BatchTags {
                account_ids: ids,
                tag_ids,
            });
        self.api.send(request).await
    }

    async fn batch_update(&self, ids: &[String], data: &AccountUpdate) -> Result<BatchOutcome> {
        let request = self
            .api
            .request(Method::POST, "/accounts/batch/update")
            .json(&BatchUpdate {
                account_ids: ids,
                data,
            });
        self.api.send(request).await
    }
}
