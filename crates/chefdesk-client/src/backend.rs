//! # Backend Seam
//!
//! The generic data-access surface of the managed backend, and a typed
//! client layered over it.
//!
//! ## Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Data Access Layers                             │
//! │                                                                         │
//! │   AppState (apps/chefdesk)                                             │
//! │        │  restaurants_owned_by(), create_menu_item(), me() ...         │
//! │        ▼                                                                │
//! │   DataClient            typed: User / Restaurant / MenuItem            │
//! │        │  find(), create() over serde_json::Value                      │
//! │        ▼                                                                │
//! │   dyn Backend                                                          │
//! │     ├── HttpBackend     REST over reqwest                              │
//! │     └── MemoryBackend   in-process, for tests and offline demo         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use chefdesk_core::{EntityId, MenuItem, NewMenuItem, NewRestaurant, Restaurant, User};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use crate::error::{ClientError, ClientResult};
use crate::query::{FindOptions, Paginated, SortOrder};

// =============================================================================
// Collections
// =============================================================================

/// Entity collections exposed by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Restaurants,
    MenuItems,
}

impl Collection {
    /// URL slug of the collection.
    pub fn slug(&self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Restaurants => "restaurants",
            Collection::MenuItems => "menu-items",
        }
    }

    /// Collection a relation field points into.
    pub fn for_relation(relation: &str) -> Option<Collection> {
        match relation {
            "owner" | "user" => Some(Collection::Users),
            "restaurant" => Some(Collection::Restaurants),
            _ => None,
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.slug())
    }
}

// =============================================================================
// Backend Trait
// =============================================================================

/// Raw operations of the backend-as-a-service.
///
/// Implementations hold their own session token: `login` stores it and
/// every later call presents it.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Short tag for logs ("http", "memory").
    fn backend_tag(&self) -> &'static str;

    /// Reachability check. `Ok` means the backend answered with success.
    async fn health(&self) -> ClientResult<()>;

    /// Exchanges credentials for a session token.
    async fn login(&self, email: &str, password: &str) -> ClientResult<()>;

    /// Ends the session.
    async fn logout(&self) -> ClientResult<()>;

    /// The user behind the current session.
    async fn me(&self) -> ClientResult<Value>;

    /// Lists records of a collection.
    async fn find(
        &self,
        collection: Collection,
        options: &FindOptions,
    ) -> ClientResult<Paginated<Value>>;

    /// Creates a record and returns it as stored.
    async fn create(&self, collection: Collection, body: Value) -> ClientResult<Value>;
}

// =============================================================================
// Typed Client
// =============================================================================

/// Typed access to users, restaurants, and menu items.
#[derive(Clone)]
pub struct DataClient {
    backend: Arc<dyn Backend>,
    per_page: Option<u32>,
}

impl DataClient {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        DataClient {
            backend,
            per_page: None,
        }
    }

    /// Page size requested on list queries.
    pub fn with_per_page(mut self, per_page: Option<u32>) -> Self {
        self.per_page = per_page;
        self
    }

    pub fn backend(&self) -> &Arc<dyn Backend> {
        &self.backend
    }

    pub async fn login(&self, email: &str, password: &str) -> ClientResult<()> {
        self.backend.login(email, password).await
    }

    pub async fn logout(&self) -> ClientResult<()> {
        self.backend.logout().await
    }

    /// The signed-in user.
    pub async fn me(&self) -> ClientResult<User> {
        let raw = self.backend.me().await?;
        Ok(serde_json::from_value(raw)?)
    }

    /// Lists and decodes records.
    pub async fn find<T: DeserializeOwned>(
        &self,
        collection: Collection,
        options: &FindOptions,
    ) -> ClientResult<Paginated<T>> {
        let page = self.backend.find(collection, options).await?;
        let data = page
            .data
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<T>, _>>()?;

        debug!(
            backend = self.backend.backend_tag(),
            collection = %collection,
            count = data.len(),
            total = page.total,
            "Fetched records"
        );

        Ok(Paginated {
            data,
            total: page.total,
            current_page: page.current_page,
            last_page: page.last_page,
            per_page: page.per_page,
        })
    }

    /// Encodes, creates, and decodes a record.
    pub async fn create<B, T>(&self, collection: Collection, body: &B) -> ClientResult<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let raw = serde_json::to_value(body)
            .map_err(|e| ClientError::SerializationFailed(e.to_string()))?;
        let created = self.backend.create(collection, raw).await?;
        Ok(serde_json::from_value(created)?)
    }

    // =========================================================================
    // Domain Queries
    // =========================================================================

    /// Restaurants of one owner, owner embedded, newest first.
    pub async fn restaurants_owned_by(&self, owner: &EntityId) -> ClientResult<Vec<Restaurant>> {
        let options = FindOptions::new()
            .filter("owner", owner)
            .include("owner")
            .sort("createdAt", SortOrder::Desc)
            .per_page(self.per_page);

        Ok(self
            .find::<Restaurant>(Collection::Restaurants, &options)
            .await?
            .data)
    }

    /// Menu items of one restaurant, newest first.
    pub async fn menu_items_for(&self, restaurant: &EntityId) -> ClientResult<Vec<MenuItem>> {
        let options = FindOptions::new()
            .filter("restaurant", restaurant)
            .sort("createdAt", SortOrder::Desc)
            .per_page(self.per_page);

        Ok(self
            .find::<MenuItem>(Collection::MenuItems, &options)
            .await?
            .data)
    }

    pub async fn create_restaurant(&self, payload: &NewRestaurant) -> ClientResult<Restaurant> {
        self.create(Collection::Restaurants, payload).await
    }

    pub async fn create_menu_item(&self, payload: &NewMenuItem) -> ClientResult<MenuItem> {
        self.create(Collection::MenuItems, payload).await
    }
}
