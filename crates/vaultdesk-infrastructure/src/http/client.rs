//! Shared reqwest client for the vault API.

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, warn};

use vaultdesk_core::config::ClientConfig;
use vaultdesk_core::error::{Result, VaultError};
use vaultdesk_core::session::TokenStore;

/// Base URL, timeout and bearer credential shared by the remote services.
///
/// The token is read from the token slot on every request, so login, lock
/// and logout take effect without rebuilding the client.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token_store: Arc<dyn TokenStore>,
}

impl ApiClient {
    pub fn new(config: &ClientConfig, token_store: Arc<dyn TokenStore>) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|err| VaultError::config(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token_store,
        })
    }

    /// Starts a request to `path` (relative to the base URL).
    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, self.url(path))
    }

    /// Sends the request and decodes a JSON body.
    pub(crate) async fn send<R: DeserializeOwned>(&self, request: RequestBuilder) -> Result<R> {
        let response = self.execute(request).await?;
        response.json::<R>().await.map_err(|err| {
            if err.is_decode() {
                VaultError::Serialization {
                    format: "JSON".to_string(),
                    message: err.to_string(),
                }
            } else {
                transport_error(err)
            }
        })
    }

    /// Sends the request and ignores the body.
    pub(crate) async fn send_unit(&self, request: RequestBuilder) -> Result<()> {
        self.execute(request).await?;
        Ok(())
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Response> {
        let request = self.authorize(request).await.build().map_err(transport_error)?;
        let method = request.method().clone();
        let path = request.url().path().to_string();
        debug!(%method, %path, "Sending API request");

        let response = self.client.execute(request).await.map_err(transport_error)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        debug!(%method, %path, status = status.as_u16(), "API request failed");
        Err(map_http_error(status, &path, &body))
    }

    async fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.token_store.get_token().await {
            Ok(Some(token)) => request.bearer_auth(token),
            Ok(None) => request,
            Err(err) => {
                warn!(error = %err, "Failed to read token; sending request without credentials");
                request
            }
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

fn transport_error(err: reqwest::Error) -> VaultError {
    VaultError::transport(err.to_string())
}

// ============================================================================
// Error mapping
// ============================================================================

/// Maps a non-success response onto the shared error type.
pub(crate) fn map_http_error(status: StatusCode, path: &str, body: &str) -> VaultError {
    let detail = parse_error_detail(body);

    match status {
        StatusCode::UNAUTHORIZED => {
            VaultError::unauthorized(detail.unwrap_or_else(|| "Not authenticated".to_string()))
        }
        StatusCode::NOT_FOUND => {
            let (entity_type, id) = entity_for_path(path);
            match detail {
                Some(detail) => VaultError::not_found_with_detail(entity_type, id, detail),
                None => VaultError::not_found(entity_type, id),
            }
        }
        StatusCode::BAD_REQUEST | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
            VaultError::validation(detail.unwrap_or_else(|| "Request rejected".to_string()))
        }
        _ => {
            let message = detail
                .or_else(|| Some(body.trim().to_string()).filter(|text| !text.is_empty()))
                .or_else(|| status.canonical_reason().map(str::to_string))
                .unwrap_or_else(|| "Unknown error".to_string());
            VaultError::remote(status.as_u16(), message)
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ErrorBody {
    // Tried first: a one-field struct would also accept a one-element array.
    Items(Vec<ValidationItem>),
    Detail { detail: Detail },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Detail {
    Message(String),
    Items(Vec<ValidationItem>),
    Other(serde_json::Value),
}

#[derive(Deserialize)]
struct ValidationItem {
    #[serde(default)]
    loc: Vec<serde_json::Value>,
    #[serde(default)]
    msg: String,
}

impl ValidationItem {
    fn describe(&self) -> String {
        match self.loc.last().and_then(|field| field.as_str()) {
            Some(field) if !self.msg.is_empty() => format!("{field}: {}", self.msg),
            _ => self.msg.clone(),
        }
    }
}

/// Extracts a readable message from an error body.
///
/// Understands `{"detail": "..."}`, `{"detail": [{loc, msg}, ...]}` and a bare
/// `[{loc, msg}, ...]` array. Anything else yields `None`.
pub(crate) fn parse_error_detail(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    let message = match parsed {
        ErrorBody::Detail {
            detail: Detail::Message(message),
        } => message,
        ErrorBody::Detail {
            detail: Detail::Items(items),
        }
        | ErrorBody::Items(items) => join_items(&items),
        ErrorBody::Detail {
            detail: Detail::Other(value),
        } => value.to_string(),
    };
    Some(message).filter(|message| !message.is_empty())
}

fn join_items(items: &[ValidationItem]) -> String {
    items
        .iter()
        .map(ValidationItem::describe)
        .filter(|message| !message.is_empty())
        .collect::<Vec<_>>()
        .join("; ")
}

/// `("account", "<id>")` for `/api/accounts/<id>`, and so on.
fn entity_for_path(path: &str) -> (&'static str, String) {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let entity_type = if segments.contains(&"accounts") {
        "account"
    } else if segments.contains(&"tags") {
        "tag"
    } else {
        "resource"
    };
    let id = match segments.as_slice() {
        [.., "accounts" | "tags"] => String::new(),
        [.., collection, id, "password" | "totp"] if *collection == "accounts" => id.to_string(),
        [.., last] => last.to_string(),
        [] => String::new(),
    };
    (entity_type, id)
}
