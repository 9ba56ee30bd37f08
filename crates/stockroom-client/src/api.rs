//! # Remote API Client
//!
//! Authenticated JSON request/response wrapper over the inventory REST API.
//!
//! ## Endpoint Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Remote API Surface                               │
//! │                                                                         │
//! │  POST   /register          {username,password} → {message,userId}      │
//! │  POST   /login             {username,password} → {success,token,       │
//! │                                                   message,role}        │
//! │  POST   /addItem     auth  {item}              → {success,message,item}│
//! │  GET    /getItems    auth                      → {success,message,     │
//! │                                                   items[]}             │
//! │  GET    /getItem/{id} auth                     → {success,message,item}│
//! │  GET    /getItems?search=q auth                → {success,message,     │
//! │                                                   items[]}             │
//! │  PUT    /updateItem  auth  {item}              → {success,message,item}│
//! │  DELETE /deleteItem/{id} auth                  → {success,message}     │
//! │                                                                         │
//! │  auth = Authorization: Bearer <token> from the Session                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Outcome Contract
//! Every call resolves to exactly one of three distinct outcomes:
//! - `Ok(..)` - the server accepted the request
//! - `Err(Rejected)` - the server responded with non-2xx or `success: false`;
//!   the server's own message is carried through
//! - `Err(Transport)` - no usable response reached us
//!
//! There is no automatic retry at this layer.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::search::ItemSource;
use crate::session::Session;
use stockroom_core::Item;

// =============================================================================
// Wire DTOs
// =============================================================================

/// Login/registration request body.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Response to `POST /register`.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterResponse {
    pub message: Option<String>,
    #[serde(rename = "userId")]
    pub user_id: Option<i64>,
}

/// Response to `POST /login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub success: bool,
    pub token: Option<String>,
    pub message: Option<String>,
    pub role: Option<String>,
}

/// Envelope for single-item operations.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemResponse {
    #[serde(default)]
    pub success: bool,
    pub message: Option<String>,
    pub item: Option<Item>,
}

/// Envelope for list operations.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemsResponse {
    #[serde(default)]
    pub success: bool,
    pub message: Option<String>,
    #[serde(default)]
    pub items: Vec<Item>,
}

/// Envelope for delete operations (no item payload).
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteResponse {
    #[serde(default)]
    pub success: bool,
    pub message: Option<String>,
}

// =============================================================================
// Envelope Handling
// =============================================================================

/// Maps a `success: false` envelope to a rejection carrying the server's
/// message. A 2xx status with `success: false` is still a rejection.
fn check_envelope(status: StatusCode, success: bool, message: Option<&str>) -> ClientResult<()> {
    if success {
        return Ok(());
    }

    Err(ClientError::Rejected {
        status: status.as_u16(),
        message: message
            .unwrap_or("Request failed without a server message")
            .to_string(),
    })
}

/// Extracts a server message from an error body, falling back to the HTTP
/// status reason.
fn rejection_from_body(status: StatusCode, body: &str) -> ClientError {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str().map(String::from)))
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        });

    ClientError::Rejected {
        status: status.as_u16(),
        message,
    }
}

// =============================================================================
// ApiClient
// =============================================================================

/// Remote API client.
///
/// Holds a connection-pooled HTTP client, the validated base URL, and the
/// session it reads bearer tokens from. Cloning shares the pool and session.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Session,
}

impl ApiClient {
    /// Creates a new client from a validated configuration.
    ///
    /// The request timeout, when configured, applies to every call; `None`
    /// leaves the platform default in place.
    pub fn new(config: &ClientConfig, session: Session) -> ClientResult<Self> {
        config.validate()?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        let http = builder
            .build()
            .map_err(|e| ClientError::InvalidConfig(e.to_string()))?;

        Ok(ApiClient {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    /// Returns the session this client authenticates with.
    pub fn session(&self) -> &Session {
        &self.session
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Reads the bearer token or fails before any request is sent.
    async fn bearer(&self) -> ClientResult<String> {
        self.session
            .token()
            .await
            .ok_or(ClientError::NotAuthenticated)
    }

    /// Reads a JSON body of type `T`, mapping non-2xx statuses to rejections.
    async fn read_json<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> ClientResult<T> {
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(rejection_from_body(status, &body));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))
    }

    // =========================================================================
    // Credential Operations
    // =========================================================================

    /// Registers a new user.
    pub async fn register(&self, username: &str, password: &str) -> ClientResult<RegisterResponse> {
        debug!(username = %username, "register");

        let response = self
            .http
            .post(self.endpoint("register"))
            .json(&Credentials {
                username: username.to_string(),
                password: password.to_string(),
            })
            .send()
            .await?;

        Self::read_json(response).await
    }

    /// Logs in and establishes the session on success.
    ///
    /// A `success: false` body (wrong credentials) is a rejection carrying
    /// the server's message; the session is left untouched.
    pub async fn login(&self, username: &str, password: &str) -> ClientResult<LoginResponse> {
        debug!(username = %username, "login");

        let response = self
            .http
            .post(self.endpoint("login"))
            .json(&Credentials {
                username: username.to_string(),
                password: password.to_string(),
            })
            .send()
            .await?;

        let status = response.status();
        let body: LoginResponse = Self::read_json(response).await?;

        check_envelope(status, body.success, body.message.as_deref())?;

        let token = body.token.clone().ok_or_else(|| ClientError::Decode(
            "login succeeded but no token was returned".to_string(),
        ))?;

        self.session.establish(token, body.role.clone()).await;

        Ok(body)
    }

    // =========================================================================
    // Item Operations (authenticated)
    // =========================================================================

    /// Adds a new item.
    pub async fn add_item(&self, item: &Item) -> ClientResult<Item> {
        let token = self.bearer().await?;
        debug!(name = %item.name, "add_item");

        let response = self
            .http
            .post(self.endpoint("addItem"))
            .bearer_auth(token)
            .json(item)
            .send()
            .await?;

        let status = response.status();
        let body: ItemResponse = Self::read_json(response).await?;
        check_envelope(status, body.success, body.message.as_deref())?;

        body.item
            .ok_or_else(|| ClientError::Decode("addItem returned no item".to_string()))
    }

    /// Lists all items.
    pub async fn list_items(&self) -> ClientResult<Vec<Item>> {
        let token = self.bearer().await?;
        debug!("list_items");

        let response = self
            .http
            .get(self.endpoint("getItems"))
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        let body: ItemsResponse = Self::read_json(response).await?;
        check_envelope(status, body.success, body.message.as_deref())?;

        Ok(body.items)
    }

    /// Gets a single item by id.
    pub async fn get_item(&self, id: i64) -> ClientResult<Item> {
        let token = self.bearer().await?;
        debug!(id = %id, "get_item");

        let response = self
            .http
            .get(self.endpoint(&format!("getItem/{}", id)))
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        let body: ItemResponse = Self::read_json(response).await?;
        check_envelope(status, body.success, body.message.as_deref())?;

        body.item
            .ok_or_else(|| ClientError::Decode("getItem returned no item".to_string()))
    }

    /// Searches items server-side by name substring.
    ///
    /// An empty query is a plain list call (match all).
    pub async fn search_items(&self, query: &str) -> ClientResult<Vec<Item>> {
        let query = query.trim();
        if query.is_empty() {
            return self.list_items().await;
        }

        let token = self.bearer().await?;
        debug!(query = %query, "search_items");

        let response = self
            .http
            .get(self.endpoint("getItems"))
            .query(&[("search", query)])
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        let body: ItemsResponse = Self::read_json(response).await?;
        check_envelope(status, body.success, body.message.as_deref())?;

        Ok(body.items)
    }

    /// Updates an existing item.
    pub async fn update_item(&self, item: &Item) -> ClientResult<Item> {
        let token = self.bearer().await?;
        debug!(id = ?item.id, "update_item");

        let response = self
            .http
            .put(self.endpoint("updateItem"))
            .bearer_auth(token)
            .json(item)
            .send()
            .await?;

        let status = response.status();
        let body: ItemResponse = Self::read_json(response).await?;
        check_envelope(status, body.success, body.message.as_deref())?;

        // Some deployments echo the item back, some don't; fall back to the
        // caller's copy so the caller always gets the stored shape.
        Ok(body.item.unwrap_or_else(|| item.clone()))
    }

    /// Deletes an item by id.
    pub async fn delete_item(&self, id: i64) -> ClientResult<()> {
        let token = self.bearer().await?;
        debug!(id = %id, "delete_item");

        let response = self
            .http
            .delete(self.endpoint(&format!("deleteItem/{}", id)))
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        let body: DeleteResponse = Self::read_json(response).await?;
        check_envelope(status, body.success, body.message.as_deref())?;

        Ok(())
    }
}

// =============================================================================
// Search Pipeline Integration
// =============================================================================

#[async_trait::async_trait]
impl ItemSource for ApiClient {
    /// Remote fetch for the search pipeline: empty query lists everything,
    /// otherwise the server filters by substring.
    async fn fetch(&self, query: &str) -> ClientResult<Vec<Item>> {
        self.search_items(query).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ApiClient {
        ApiClient::new(
            &ClientConfig::new("http://localhost:3000/"),
            Session::new(),
        )
        .unwrap()
    }

    #[test]
    fn test_endpoint_joining_strips_trailing_slash() {
        let client = client();
        assert_eq!(client.endpoint("getItems"), "http://localhost:3000/getItems");
        assert_eq!(
            client.endpoint("getItem/5"),
            "http://localhost:3000/getItem/5"
        );
    }

    #[test]
    fn test_new_rejects_invalid_base_url() {
        let result = ApiClient::new(&ClientConfig::new("ftp://example.com"), Session::new());
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_authenticated_call_without_login_fails_early() {
        let client = client();
        let err = client.list_items().await.unwrap_err();
        assert!(matches!(err, ClientError::NotAuthenticated));
    }

    #[test]
    fn test_login_response_contract() {
        let body: LoginResponse = serde_json::from_str(
            r#"{"success":true,"token":"tok-1","message":"Login successful","role":"admin"}"#,
        )
        .unwrap();
        assert!(body.success);
        assert_eq!(body.token.as_deref(), Some("tok-1"));
        assert_eq!(body.role.as_deref(), Some("admin"));
    }

    #[test]
    fn test_items_response_contract() {
        let body: ItemsResponse = serde_json::from_str(
            r#"{"success":true,"message":"ok","items":[{"item_id":1,"name":"Laptop","quantity":10}]}"#,
        )
        .unwrap();
        assert!(body.success);
        assert_eq!(body.items.len(), 1);
        assert_eq!(body.items[0], Item::with_id(1, "Laptop", 10));
    }

    #[test]
    fn test_items_response_missing_items_defaults_empty() {
        let body: ItemsResponse =
            serde_json::from_str(r#"{"success":true,"message":"ok"}"#).unwrap();
        assert!(body.items.is_empty());
    }

    #[test]
    fn test_register_response_contract() {
        let body: RegisterResponse =
            serde_json::from_str(r#"{"message":"Registration Successful","userId":7}"#).unwrap();
        assert_eq!(body.user_id, Some(7));
    }

    #[test]
    fn test_check_envelope_false_is_rejection_with_server_message() {
        let err = check_envelope(StatusCode::OK, false, Some("Invalid credentials")).unwrap_err();
        match err {
            ClientError::Rejected { status, message } => {
                assert_eq!(status, 200);
                assert_eq!(message, "Invalid credentials");
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn test_rejection_from_body_prefers_server_message() {
        let err = rejection_from_body(
            StatusCode::CONFLICT,
            r#"{"message":"Username already exists"}"#,
        );
        match err {
            ClientError::Rejected { status, message } => {
                assert_eq!(status, 409);
                assert_eq!(message, "Username already exists");
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn test_rejection_from_body_falls_back_to_status_reason() {
        let err = rejection_from_body(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>");
        match err {
            ClientError::Rejected { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "Internal Server Error");
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }
}
