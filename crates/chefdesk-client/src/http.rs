//! # HTTP Backend
//!
//! `Backend` over the managed backend's REST API.
//!
//! ## Endpoints
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  health   GET  {api}/health                                            │
//! │  login    POST {api}/auth/users/login        {email, password}         │
//! │                                        ◄──   {token}                   │
//! │  me       GET  {api}/auth/users/me           Authorization: Bearer     │
//! │  logout   (local: the token is dropped)                                │
//! │  find     GET  {api}/collections/{slug}?owner_eq=1&relations=owner...  │
//! │  create   POST {api}/collections/{slug}      JSON body                 │
//! │                                                                         │
//! │  Every request carries X-App-Id when one is configured.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};
use url::Url;

use crate::backend::{Backend, Collection};
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::query::{FindOptions, Paginated};
use crate::session::TokenStore;

/// Header carrying the application id.
pub const APP_ID_HEADER: &str = "x-app-id";

/// Collection used for authentication.
const AUTH_COLLECTION: Collection = Collection::Users;

#[derive(Deserialize)]
struct LoginResponse {
    token: String,
}

/// REST client for the managed backend.
pub struct HttpBackend {
    client: Client,
    api_base: Url,
    tokens: TokenStore,
}

impl HttpBackend {
    /// Builds a client from configuration and a token store.
    pub fn new(config: &ClientConfig, tokens: TokenStore) -> ClientResult<Self> {
        let mut api_base = Url::parse(&config.api_base())?;
        // Url::join drops the last segment unless the path ends with '/'.
        if !api_base.path().ends_with('/') {
            let path = format!("{}/", api_base.path());
            api_base.set_path(&path);
        }

        let mut headers = HeaderMap::new();
        if let Some(app_id) = &config.backend.app_id {
            let value = HeaderValue::from_str(app_id)
                .map_err(|e| ClientError::InvalidConfig(format!("invalid app_id: {e}")))?;
            headers.insert(HeaderName::from_static(APP_ID_HEADER), value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| ClientError::InvalidConfig(e.to_string()))?;

        info!(api_base = %api_base, "HTTP backend ready");

        Ok(HttpBackend {
            client,
            api_base,
            tokens,
        })
    }

    /// Builds a client whose token store follows `[session]`, restoring a
    /// persisted token if there is one.
    pub async fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        let tokens = TokenStore::new(config.session_path());
        match tokens.restore().await {
            Ok(true) => info!("Found a saved session"),
            Ok(false) => {}
            Err(e) => warn!(error = %e, "Could not read saved session, starting signed out"),
        }
        Self::new(config, tokens)
    }

    /// Resolves a path relative to the API root.
    pub fn endpoint(&self, path: &str) -> ClientResult<Url> {
        Ok(self.api_base.join(path.trim_start_matches('/'))?)
    }

    /// Attaches the bearer token if one is held.
    async fn authorized(&self, request: RequestBuilder) -> ClientResult<RequestBuilder> {
        match self.tokens.get().await {
            Some(token) => {
                let value = HeaderValue::from_str(&format!("Bearer {token}"))
                    .map_err(|e| ClientError::SessionStoreFailed(format!("invalid token: {e}")))?;
                Ok(request.header(AUTHORIZATION, value))
            }
            None => Ok(request),
        }
    }

    /// Turns a response into JSON, mapping non-success statuses to errors.
    async fn read_json(response: Response) -> ClientResult<Value> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::from_status(status.as_u16(), body));
        }
        Ok(response.json::<Value>().await?)
    }
}

#[async_trait]
impl Backend for HttpBackend {
    fn backend_tag(&self) -> &'static str {
        "http"
    }

    async fn health(&self) -> ClientResult<()> {
        let url = self.endpoint("health")?;
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::from_status(status.as_u16(), "health check failed"));
        }
        Ok(())
    }

    async fn login(&self, email: &str, password: &str) -> ClientResult<()> {
        let url = self.endpoint(&format!("auth/{}/login", AUTH_COLLECTION.slug()))?;
        debug!(email = %email, "Logging in");

        let response = self
            .client
            .post(url)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        let body: LoginResponse = serde_json::from_value(Self::read_json(response).await?)?;

        if let Err(e) = self.tokens.set(body.token).await {
            warn!(error = %e, "Logged in but could not persist the session token");
        }
        Ok(())
    }

    async fn logout(&self) -> ClientResult<()> {
        self.tokens.clear().await
    }

    async fn me(&self) -> ClientResult<Value> {
        let token = self.tokens.require().await?;
        let url = self.endpoint(&format!("auth/{}/me", AUTH_COLLECTION.slug()))?;

        let response = self.client.get(url).bearer_auth(token).send().await?;
        Self::read_json(response).await
    }

    async fn find(
        &self,
        collection: Collection,
        options: &FindOptions,
    ) -> ClientResult<Paginated<Value>> {
        let mut url = self.endpoint(&format!("collections/{}", collection.slug()))?;
        let pairs = options.to_query_pairs();
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        debug!(url = %url, "GET collection");

        let request = self.authorized(self.client.get(url)).await?;
        let response = request.send().await?;
        Ok(serde_json::from_value(Self::read_json(response).await?)?)
    }

    async fn create(&self, collection: Collection, body: Value) -> ClientResult<Value> {
        let url = self.endpoint(&format!("collections/{}", collection.slug()))?;
        debug!(url = %url, "POST collection");

        let request = self.authorized(self.client.post(url).json(&body)).await?;
        let response = request.send().await?;
        Self::read_json(response).await
    }
}
