//! # In-Memory Backend
//!
//! A `Backend` that lives in the process: the same filter, relation, and
//! sort rules as the REST API, over plain JSON records.
//!
//! Used by the test suites and by `chefdesk --offline`.
//!
//! ## Seeded Data
//! One user, the demo account (`admin@manifest.build` / `admin`), id 1.
//!
//! ## Failure Switches
//! - `set_reachable(false)`: every call fails with `ConnectionFailed`
//! - `set_fail_creates(true)`: `create` fails with a 500
//! - `set_fail_me(true)`: `me` fails with a 500, even with a session

use async_trait::async_trait;
use chefdesk_core::{DEMO_EMAIL, DEMO_PASSWORD};
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::{json, Map, Value};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering as AtomicOrdering};
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::backend::{Backend, Collection};
use crate::error::{ClientError, ClientResult};
use crate::query::{FindOptions, Paginated, SortOrder};

/// Fields of a user record that leave the backend.
const PUBLIC_USER_FIELDS: [&str; 3] = ["id", "name", "email"];

#[derive(Debug, Default)]
struct MemoryState {
    records: HashMap<Collection, Vec<Value>>,
    passwords: HashMap<String, String>,
    active_token: Option<String>,
    active_user: Option<Value>,
    next_id: u64,
    ticks: i64,
}

impl MemoryState {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Strictly increasing timestamps so `createdAt` ordering is total.
    fn next_timestamp(&mut self) -> DateTime<Utc> {
        self.ticks += 1;
        base_time() + Duration::seconds(self.ticks)
    }

    fn user_by_id(&self, id: &Value) -> Option<Value> {
        self.records
            .get(&Collection::Users)?
            .iter()
            .find(|u| ids_match(&u["id"], &id_text(id)))
            .map(public_user)
    }
}

/// In-process backend.
pub struct MemoryBackend {
    state: Mutex<MemoryState>,
    reachable: AtomicBool,
    fail_creates: AtomicBool,
    fail_me: AtomicBool,
    calls: AtomicU64,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    /// Creates a backend seeded with the demo user.
    pub fn new() -> Self {
        let mut state = MemoryState::default();
        seed_user(&mut state, "Admin", DEMO_EMAIL, DEMO_PASSWORD);
        Self::with_state(state)
    }

    fn with_state(state: MemoryState) -> Self {
        MemoryBackend {
            state: Mutex::new(state),
            reachable: AtomicBool::new(true),
            fail_creates: AtomicBool::new(false),
            fail_me: AtomicBool::new(false),
            calls: AtomicU64::new(0),
        }
    }

    /// Adds a user and returns its id.
    pub async fn add_user(&self, name: &str, email: &str, password: &str) -> Value {
        let mut state = self.state.lock().await;
        seed_user(&mut state, name, email, password)
    }

    /// Stores a record as-is, filling `id` and `createdAt` when missing.
    pub async fn insert(&self, collection: Collection, record: Value) -> Value {
        let mut state = self.state.lock().await;
        store_record(&mut state, collection, record)
    }

    /// Starts a session for an existing user, as if a token survived a restart.
    pub async fn sign_in_as(&self, email: &str) -> bool {
        let mut state = self.state.lock().await;
        let user = state
            .records
            .get(&Collection::Users)
            .and_then(|users| users.iter().find(|u| u["email"] == email))
            .map(public_user);
        match user {
            Some(user) => {
                state.active_token = Some(Uuid::new_v4().to_string());
                state.active_user = Some(user);
                true
            }
            None => false,
        }
    }

    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, AtomicOrdering::SeqCst);
    }

    pub fn set_fail_creates(&self, fail: bool) {
        self.fail_creates.store(fail, AtomicOrdering::SeqCst);
    }

    pub fn set_fail_me(&self, fail: bool) {
        self.fail_me.store(fail, AtomicOrdering::SeqCst);
    }

    /// Number of backend calls received so far.
    pub fn call_count(&self) -> u64 {
        self.calls.load(AtomicOrdering::SeqCst)
    }

    /// Records currently stored in a collection, in insertion order.
    pub async fn records(&self, collection: Collection) -> Vec<Value> {
        let state = self.state.lock().await;
        state.records.get(&collection).cloned().unwrap_or_default()
    }

    /// Whether a session is active.
    pub async fn has_session(&self) -> bool {
        self.state.lock().await.active_token.is_some()
    }

    fn enter(&self, operation: &str) -> ClientResult<()> {
        self.calls.fetch_add(1, AtomicOrdering::SeqCst);
        if !self.reachable.load(AtomicOrdering::SeqCst) {
            debug!(operation, "Memory backend unreachable");
            return Err(ClientError::ConnectionFailed(
                "memory backend is offline".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    fn backend_tag(&self) -> &'static str {
        "memory"
    }

    async fn health(&self) -> ClientResult<()> {
        self.enter("health")
    }

    async fn login(&self, email: &str, password: &str) -> ClientResult<()> {
        self.enter("login")?;
        let mut state = self.state.lock().await;

        if state.passwords.get(email).map(String::as_str) != Some(password) {
            return Err(ClientError::Unauthorized(
                "Invalid email or password".to_string(),
            ));
        }

        let user = state
            .records
            .get(&Collection::Users)
            .and_then(|users| users.iter().find(|u| u["email"] == email))
            .map(public_user)
            .ok_or_else(|| ClientError::Unauthorized("Invalid email or password".to_string()))?;

        state.active_token = Some(Uuid::new_v4().to_string());
        state.active_user = Some(user);
        Ok(())
    }

    async fn logout(&self) -> ClientResult<()> {
        self.enter("logout")?;
        let mut state = self.state.lock().await;
        state.active_token = None;
        state.active_user = None;
        Ok(())
    }

    async fn me(&self) -> ClientResult<Value> {
        self.enter("me")?;
        if self.fail_me.load(AtomicOrdering::SeqCst) {
            return Err(ClientError::Http {
                status: 500,
                message: "profile unavailable".to_string(),
            });
        }
        let state = self.state.lock().await;
        if state.active_token.is_none() {
            return Err(ClientError::NoSession);
        }
        state
            .active_user
            .clone()
            .ok_or_else(|| ClientError::Unauthorized("session has no user".to_string()))
    }

    async fn find(
        &self,
        collection: Collection,
        options: &FindOptions,
    ) -> ClientResult<Paginated<Value>> {
        self.enter("find")?;
        let state = self.state.lock().await;

        let mut rows: Vec<Value> = state
            .records
            .get(&collection)
            .map(|rows| {
                rows.iter()
                    .filter(|row| {
                        options
                            .filters
                            .iter()
                            .all(|(field, value)| ids_match(&row[field.as_str()], value))
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if collection == Collection::Users {
            rows = rows.iter().map(public_user).collect();
        }

        if let Some((field, order)) = &options.sort {
            rows.sort_by(|a, b| {
                let ordering = compare_values(&a[field.as_str()], &b[field.as_str()]);
                match order {
                    SortOrder::Asc => ordering,
                    SortOrder::Desc => ordering.reverse(),
                }
            });
        }

        for relation in &options.include {
            if let Some(target) = Collection::for_relation(relation) {
                for row in rows.iter_mut() {
                    let expanded = match target {
                        Collection::Users => state.user_by_id(&row[relation.as_str()]),
                        other => state.records.get(&other).and_then(|records| {
                            let wanted = id_text(&row[relation.as_str()]);
                            records.iter().find(|r| ids_match(&r["id"], &wanted)).cloned()
                        }),
                    };
                    if let (Some(expanded), Some(object)) = (expanded, row.as_object_mut()) {
                        object.insert(relation.clone(), expanded);
                    }
                }
            }
        }

        let total = rows.len() as u64;
        let per_page = options
            .per_page
            .filter(|&n| n > 0)
            .map(u64::from)
            .unwrap_or(total.max(1));
        rows.truncate(per_page as usize);

        Ok(Paginated {
            data: rows,
            total,
            current_page: 1,
            last_page: total.div_ceil(per_page).max(1),
            per_page,
        })
    }

    async fn create(&self, collection: Collection, body: Value) -> ClientResult<Value> {
        self.enter("create")?;

        if self.fail_creates.load(AtomicOrdering::SeqCst) {
            return Err(ClientError::Http {
                status: 500,
                message: "create rejected".to_string(),
            });
        }

        let mut state = self.state.lock().await;

        let Some(user) = state.active_user.clone() else {
            return Err(ClientError::Unauthorized("login required".to_string()));
        };

        if collection == Collection::Users {
            return Err(ClientError::Unauthorized(
                "user creation is restricted to admins".to_string(),
            ));
        }

        let Value::Object(mut object) = body else {
            return Err(ClientError::Http {
                status: 400,
                message: "body must be a JSON object".to_string(),
            });
        };

        let name_ok = object
            .get("name")
            .and_then(Value::as_str)
            .is_some_and(|name| !name.trim().is_empty());
        if !name_ok {
            return Err(ClientError::Http {
                status: 400,
                message: "name should not be empty".to_string(),
            });
        }

        if !object.contains_key("owner") {
            object.insert("owner".to_string(), user["id"].clone());
        }

        Ok(store_record(&mut state, collection, Value::Object(object)))
    }
}

// =============================================================================
// Record Helpers
// =============================================================================

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0)
        .single()
        .unwrap_or_default()
}

fn seed_user(state: &mut MemoryState, name: &str, email: &str, password: &str) -> Value {
    state
        .passwords
        .insert(email.to_string(), password.to_string());
    let record = store_record(
        state,
        Collection::Users,
        json!({ "name": name, "email": email }),
    );
    record["id"].clone()
}

fn store_record(state: &mut MemoryState, collection: Collection, record: Value) -> Value {
    let mut object = match record {
        Value::Object(object) => object,
        other => {
            let mut object = Map::new();
            object.insert("value".to_string(), other);
            object
        }
    };

    if !object.contains_key("id") {
        let id = state.next_id();
        object.insert("id".to_string(), json!(id));
    }
    if !object.contains_key("createdAt") {
        let now = state.next_timestamp();
        object.insert("createdAt".to_string(), json!(now.to_rfc3339()));
        object.insert("updatedAt".to_string(), json!(now.to_rfc3339()));
    }

    let stored = Value::Object(object);
    state
        .records
        .entry(collection)
        .or_default()
        .push(stored.clone());
    stored
}

fn public_user(user: &Value) -> Value {
    let mut object = Map::new();
    for field in PUBLIC_USER_FIELDS {
        if let Some(value) = user.get(field) {
            object.insert(field.to_string(), value.clone());
        }
    }
    Value::Object(object)
}

/// Id of a relation value: a bare id, or the `id` of an embedded object.
fn id_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Object(object) => object.get("id").map(id_text).unwrap_or_default(),
        _ => String::new(),
    }
}

fn ids_match(value: &Value, wanted: &str) -> bool {
    !value.is_null() && id_text(value) == wanted
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn signed_in() -> MemoryBackend {
        let backend = MemoryBackend::new();
        backend.login(DEMO_EMAIL, DEMO_PASSWORD).await.unwrap();
        backend
    }

    #[tokio::test]
    async fn test_login_and_me() {
        let backend = MemoryBackend::new();
        assert!(matches!(backend.me().await, Err(ClientError::NoSession)));

        let err = backend.login(DEMO_EMAIL, "wrong").await.unwrap_err();
        assert!(err.is_auth_error());

        backend.login(DEMO_EMAIL, DEMO_PASSWORD).await.unwrap();
        let me = backend.me().await.unwrap();
        assert_eq!(me["email"], DEMO_EMAIL);
        assert!(me.get("password").is_none());

        backend.logout().await.unwrap();
        assert!(backend.me().await.is_err());
    }

    #[tokio::test]
    async fn test_unreachable_fails_everything() {
        let backend = MemoryBackend::new();
        backend.set_reachable(false);
        assert!(backend.health().await.unwrap_err().is_connectivity_error());
        assert!(backend
            .login(DEMO_EMAIL, DEMO_PASSWORD)
            .await
            .unwrap_err()
            .is_connectivity_error());
        assert_eq!(backend.call_count(), 2);
    }

    #[tokio::test]
    async fn test_filter_include_and_sort() {
        let backend = signed_in().await;
        let other = backend.add_user("Other", "other@example.com", "pw").await;

        backend
            .create(Collection::Restaurants, json!({ "name": "First", "owner": 1 }))
            .await
            .unwrap();
        backend
            .insert(Collection::Restaurants, json!({ "name": "Theirs", "owner": other }))
            .await;
        backend
            .create(Collection::Restaurants, json!({ "name": "Second" }))
            .await
            .unwrap();

        let opts = FindOptions::new()
            .filter("owner", 1)
            .include("owner")
            .sort("createdAt", SortOrder::Desc);
        let page = backend.find(Collection::Restaurants, &opts).await.unwrap();

        let names: Vec<&str> = page.data.iter().filter_map(|r| r["name"].as_str()).collect();
        assert_eq!(names, vec!["Second", "First"]);
        assert_eq!(page.data[0]["owner"]["email"], DEMO_EMAIL);
        assert_eq!(page.total, 2);
    }

    #[tokio::test]
    async fn test_filter_matches_embedded_relation() {
        let backend = signed_in().await;
        backend
            .insert(
                Collection::MenuItems,
                json!({ "name": "Soup", "restaurant": { "id": 7, "name": "X" } }),
            )
            .await;
        backend
            .insert(Collection::MenuItems, json!({ "name": "Salad", "restaurant": 8 }))
            .await;

        let page = backend
            .find(Collection::MenuItems, &FindOptions::new().filter("restaurant", 7))
            .await
            .unwrap();
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0]["name"], "Soup");
    }

    #[tokio::test]
    async fn test_create_rules() {
        let backend = MemoryBackend::new();
        let anonymous = backend
            .create(Collection::Restaurants, json!({ "name": "X" }))
            .await;
        assert!(matches!(anonymous, Err(ClientError::Unauthorized(_))));

        let backend = signed_in().await;
        let blank = backend
            .create(Collection::Restaurants, json!({ "name": "  " }))
            .await;
        assert!(matches!(blank, Err(ClientError::Http { status: 400, .. })));

        backend.set_fail_creates(true);
        let failed = backend
            .create(Collection::Restaurants, json!({ "name": "Y" }))
            .await;
        assert!(matches!(failed, Err(ClientError::Http { status: 500, .. })));
        assert!(backend.records(Collection::Restaurants).await.is_empty());
    }

    #[tokio::test]
    async fn test_per_page_truncates() {
        let backend = signed_in().await;
        for name in ["a", "b", "c"] {
            backend
                .create(Collection::Restaurants, json!({ "name": name }))
                .await
                .unwrap();
        }
        let page = backend
            .find(Collection::Restaurants, &FindOptions::new().per_page(Some(2)))
            .await
            .unwrap();
        assert_eq!(page.data.len(), 2);
        assert_eq!(page.total, 3);
        assert_eq!(page.last_page, 2);
    }

    #[tokio::test]
    async fn test_zero_page_size_returns_everything() {
        let backend = signed_in().await;
        for name in ["a", "b"] {
            backend
                .create(Collection::Restaurants, json!({ "name": name }))
                .await
                .unwrap();
        }

        let options = FindOptions {
            per_page: Some(0),
            ..FindOptions::new()
        };
        let page = backend.find(Collection::Restaurants, &options).await.unwrap();
        assert_eq!(page.data.len(), 2);
        assert_eq!(page.last_page, 1);
    }

    #[tokio::test]
    async fn test_sign_in_as_restores_session() {
        let backend = MemoryBackend::new();
        assert!(!backend.sign_in_as("nobody@example.com").await);
        assert!(backend.sign_in_as(DEMO_EMAIL).await);
        assert!(backend.has_session().await);
        assert_eq!(backend.me().await.unwrap()["name"], "Admin");
    }
}
