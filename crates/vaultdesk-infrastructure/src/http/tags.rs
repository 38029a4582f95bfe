use async_trait::async_trait;
use reqwest::Method;

use vaultdesk_core::error::Result;
use vaultdesk_core::tag::{RemoteTagService, Tag, TagCreate, TagUpdate};

use super::client::ApiClient;

/// `/tags/*` endpoints.
#[derive(Clone)]
pub struct HttpTagService {
    api: ApiClient,
}

impl HttpTagService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl RemoteTagService for HttpTagService {
    async fn list(&self) -> Result<Vec<Tag>> {
        self.api.send(self.api.request(Method::GET, "/tags")).await
    }

    async fn get(&self, id: &str) -> Result<Tag> {
        self.api
            .send(self.api.request(Method::GET, &format!("/tags/{id}")))
            .await
    }

    async fn create(&self, data: &TagCreate) -> Result<Tag> {
        self.api
            .send(self.api.request(Method::POST, "/tags").json(data))
            .await
    }

    async fn update(&self, id: &str, data: &TagUpdate) -> Result<Tag> {
        self.api
            .send(self.api.request(Method::PUT, &format!("/tags/{id}")).json(data))
            .await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.api
            .send_unit(self.api.request(Method::DELETE, &format!("/tags/{id}")))
            .await
    }
}
