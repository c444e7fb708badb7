//! # Application State
//!
//! The session and data orchestrator. One value owns the screen, the
//! signed-in user, and the cached restaurants and menus; every operation
//! that talks to the backend goes through it.
//!
//! ## Operation Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       AppState Operations                               │
//! │                                                                         │
//! │  initialize()          probe ──► me() ──► Dashboard | Landing          │
//! │  login(email, pw)      login ──► me() ──► Dashboard                    │
//! │  logout()              logout (outcome ignored) ──► Landing, cleared   │
//! │                                                                         │
//! │  load_restaurants()                    replace list wholesale          │
//! │  create_restaurant(data)               prepend on success              │
//! │  load_menu_items_for_restaurant(id)    replace one key                 │
//! │  create_menu_item(data)                prepend under data.restaurant   │
//! │                                                                         │
//! │  FAILURES:                                                             │
//! │  • login / create_*   → one alert + error log, state untouched         │
//! │  • load_* / logout    → log only, state untouched                      │
//! │  • no session at init → debug log, Landing                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency
//! Single owner, `&mut self` methods awaited one at a time by the terminal
//! loop. No locks.

use chefdesk_client::{probe, DataClient};
use chefdesk_core::validation::validate_email;
use chefdesk_core::{
    EntityId, KeyedCache, MenuItem, NewMenuItem, NewRestaurant, Restaurant, Screen, Session, User,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::alerts::Alerts;
use crate::error::{AppError, AppResult};

/// Alert shown for every failed login.
pub const LOGIN_FAILED: &str = "Login failed. Please check your credentials.";

/// Screen, user, and cached backend data.
pub struct AppState {
    client: DataClient,
    alerts: Arc<dyn Alerts>,
    probe_timeout: Duration,

    session: Session,
    connected: bool,
    restaurants: Vec<Restaurant>,
    menu_items: KeyedCache<EntityId, MenuItem>,
}

impl AppState {
    /// Creates the orchestrator in the `Loading` state.
    pub fn new(client: DataClient, alerts: Arc<dyn Alerts>, probe_timeout: Duration) -> Self {
        AppState {
            client,
            alerts,
            probe_timeout,
            session: Session::new(),
            connected: false,
            restaurants: Vec::new(),
            menu_items: KeyedCache::new(),
        }
    }

    // =========================================================================
    // Read Access
    // =========================================================================

    pub fn screen(&self) -> Screen {
        self.session.screen()
    }

    pub fn user(&self) -> Option<&User> {
        self.session.user()
    }

    /// Result of the startup probe.
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Restaurants of the signed-in user, newest first.
    pub fn restaurants(&self) -> &[Restaurant] {
        &self.restaurants
    }

    /// Cached menu of one restaurant, `None` if never loaded.
    pub fn menu_items(&self, restaurant: &EntityId) -> Option<&[MenuItem]> {
        self.menu_items.get(restaurant)
    }

    pub fn has_menu_items(&self, restaurant: &EntityId) -> bool {
        self.menu_items.contains(restaurant)
    }

    /// Number of restaurants with a cached menu.
    pub fn cached_menus(&self) -> usize {
        self.menu_items.len()
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Probes the backend and restores an existing session if there is one.
    ///
    /// Leaves `Loading` exactly once; later calls are ignored.
    pub async fn initialize(&mut self) {
        if self.session.screen() != Screen::Loading {
            warn!(screen = %self.session.screen(), "initialize called twice, ignoring");
            return;
        }

        self.connected = probe(self.client.backend().as_ref(), self.probe_timeout).await;

        let user = if self.connected {
            match self.client.me().await {
                Ok(user) => {
                    info!(user = %user.email, "Restored existing session");
                    Some(user)
                }
                Err(e) => {
                    debug!(error = %e, "No active session");
                    None
                }
            }
        } else {
            None
        };

        if let Err(e) = self.session.resolve(user) {
            error!(error = %e, "Could not leave the loading screen");
        }
    }

    /// Logs in and moves to the dashboard.
    ///
    /// Returns `false` after raising exactly one alert.
    pub async fn login(&mut self, email: &str, password: &str) -> bool {
        if let Err(e) = validate_email(email) {
            self.report("Login rejected", e.into());
            return false;
        }

        match self.sign_in(email, password).await {
            Ok(()) => true,
            Err(e) => {
                error!(code = ?e.code, email = %email, "Login failed: {}", e.message);
                self.alerts.alert(LOGIN_FAILED);
                false
            }
        }
    }

    /// Exchanges credentials for a token, then the token for a user.
    ///
    /// A token that never produced a user is dropped again.
    async fn sign_in(&mut self, email: &str, password: &str) -> AppResult<()> {
        self.client.login(email, password).await?;

        if let Err(e) = self.adopt_session().await {
            if let Err(logout_err) = self.client.logout().await {
                warn!(error = %logout_err, "Could not drop the token of a failed login");
            }
            return Err(e);
        }
        Ok(())
    }

    async fn adopt_session(&mut self) -> AppResult<()> {
        let user = self.client.me().await?;
        info!(user = %user.email, "Logged in");
        self.session.sign_in(user)?;
        Ok(())
    }

    /// Ends the session. Always lands on `Landing` with every cache empty.
    pub async fn logout(&mut self) {
        if let Err(e) = self.client.logout().await {
            warn!(error = %e, "Backend logout failed, clearing local session anyway");
        }

        self.session.sign_out();
        self.restaurants.clear();
        self.menu_items.clear();
        info!("Logged out");
    }

    // =========================================================================
    // Restaurants
    // =========================================================================

    /// Replaces the restaurant list with the signed-in user's restaurants.
    ///
    /// Without a user this does nothing, not even a backend call.
    pub async fn load_restaurants(&mut self) {
        let Some(owner) = self.session.user().map(|user| user.id.clone()) else {
            debug!("No user, skipping restaurant load");
            return;
        };

        match self.client.restaurants_owned_by(&owner).await {
            Ok(restaurants) => {
                debug!(count = restaurants.len(), "Loaded restaurants");
                self.restaurants = restaurants;
            }
            Err(e) => error!(error = %e, owner = %owner, "Failed to load restaurants"),
        }
    }

    /// Creates a restaurant and puts it at the top of the list.
    pub async fn create_restaurant(&mut self, data: NewRestaurant) -> Option<Restaurant> {
        match self.send_restaurant(&data).await {
            Ok(restaurant) => {
                info!(id = %restaurant.id, name = %restaurant.name, "Restaurant created");
                self.restaurants.insert(0, restaurant.clone());
                Some(restaurant)
            }
            Err(e) => {
                self.report("Failed to create restaurant", e);
                None
            }
        }
    }

    // =========================================================================
    // Menu Items
    // =========================================================================

    /// Fetches one restaurant's menu and caches it under that restaurant.
    pub async fn load_menu_items_for_restaurant(&mut self, restaurant: &EntityId) {
        match self.client.menu_items_for(restaurant).await {
            Ok(items) => {
                debug!(restaurant = %restaurant, count = items.len(), "Loaded menu items");
                self.menu_items.replace(restaurant.clone(), items);
            }
            Err(e) => error!(error = %e, restaurant = %restaurant, "Failed to load menu items"),
        }
    }

    /// Creates a menu item and puts it at the top of its restaurant's menu.
    pub async fn create_menu_item(&mut self, data: NewMenuItem) -> Option<MenuItem> {
        match self.send_menu_item(&data).await {
            Ok(item) => {
                info!(id = %item.id, restaurant = %data.restaurant, "Menu item created");
                self.menu_items.prepend(data.restaurant, item.clone());
                Some(item)
            }
            Err(e) => {
                self.report("Failed to create menu item", e);
                None
            }
        }
    }

    async fn send_restaurant(&self, data: &NewRestaurant) -> AppResult<Restaurant> {
        data.validate()?;
        Ok(self.client.create_restaurant(data).await?)
    }

    async fn send_menu_item(&self, data: &NewMenuItem) -> AppResult<MenuItem> {
        data.validate()?;
        Ok(self.client.create_menu_item(data).await?)
    }

    // =========================================================================
    // Failure Reporting
    // =========================================================================

    /// Logs a failure and raises one alert for it.
    pub fn report(&self, context: &str, err: AppError) {
        error!(code = ?err.code, "{}: {}", context, err.message);
        self.alerts.alert(&format!("{}: {}", context, err.message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::RecordingAlerts;
    use chefdesk_client::{Collection, MemoryBackend};
    use chefdesk_core::{Money, DEMO_EMAIL, DEMO_PASSWORD};
    use serde_json::json;

    struct Harness {
        backend: Arc<MemoryBackend>,
        alerts: Arc<RecordingAlerts>,
        app: AppState,
    }

    fn harness_with(backend: MemoryBackend) -> Harness {
        let backend = Arc::new(backend);
        let alerts = Arc::new(RecordingAlerts::new());
        let app = AppState::new(
            DataClient::new(backend.clone()),
            alerts.clone(),
            Duration::from_secs(1),
        );
        Harness {
            backend,
            alerts,
            app,
        }
    }

    fn harness() -> Harness {
        harness_with(MemoryBackend::new())
    }

    /// Landing screen, connected, nobody signed in.
    async fn landed() -> Harness {
        let mut h = harness();
        h.app.initialize().await;
        assert_eq!(h.app.screen(), Screen::Landing);
        h
    }

    /// Dashboard screen as the demo user.
    async fn signed_in() -> Harness {
        let mut h = landed().await;
        assert!(h.app.login(DEMO_EMAIL, DEMO_PASSWORD).await);
        h
    }

    fn owner(h: &Harness) -> EntityId {
        h.app.user().map(|u| u.id.clone()).unwrap()
    }

    fn dish(name: &str, restaurant: &EntityId, owner: &EntityId) -> NewMenuItem {
        NewMenuItem {
            name: name.to_string(),
            description: String::new(),
            price: Money::from_cents(900),
            category: "Main".to_string(),
            restaurant: restaurant.clone(),
            owner: owner.clone(),
        }
    }

    // =========================================================================
    // initialize
    // =========================================================================

    #[tokio::test]
    async fn test_initialize_without_session_lands() {
        let h = landed().await;
        assert!(h.app.is_connected());
        assert!(h.app.user().is_none());
        assert!(h.alerts.messages().is_empty());
    }

    #[tokio::test]
    async fn test_initialize_restores_session() {
        let backend = MemoryBackend::new();
        assert!(backend.sign_in_as(DEMO_EMAIL).await);

        let mut h = harness_with(backend);
        h.app.initialize().await;

        assert_eq!(h.app.screen(), Screen::Dashboard);
        assert_eq!(h.app.user().map(|u| u.email.as_str()), Some(DEMO_EMAIL));
    }

    #[tokio::test]
    async fn test_initialize_unreachable_skips_session_check() {
        let backend = MemoryBackend::new();
        assert!(backend.sign_in_as(DEMO_EMAIL).await);
        backend.set_reachable(false);

        let mut h = harness_with(backend);
        h.app.initialize().await;

        assert_eq!(h.app.screen(), Screen::Landing);
        assert!(!h.app.is_connected());
        assert!(h.app.user().is_none());
        // health only
        assert_eq!(h.backend.call_count(), 1);
        assert!(h.alerts.messages().is_empty());
    }

    #[tokio::test]
    async fn test_initialize_runs_once() {
        let mut h = landed().await;
        let calls = h.backend.call_count();

        h.app.initialize().await;
        assert_eq!(h.backend.call_count(), calls);
        assert_eq!(h.app.screen(), Screen::Landing);
    }

    // =========================================================================
    // login / logout
    // =========================================================================

    #[tokio::test]
    async fn test_login_moves_to_dashboard() {
        let h = signed_in().await;
        assert_eq!(h.app.screen(), Screen::Dashboard);
        assert_eq!(h.app.user().map(|u| u.name.as_str()), Some("Admin"));
        assert!(h.alerts.messages().is_empty());
    }

    #[tokio::test]
    async fn test_wrong_password_alerts_once() {
        let mut h = landed().await;

        assert!(!h.app.login(DEMO_EMAIL, "wrong").await);

        assert_eq!(h.app.screen(), Screen::Landing);
        assert!(h.app.user().is_none());
        assert_eq!(h.alerts.messages(), vec![LOGIN_FAILED.to_string()]);
    }

    #[tokio::test]
    async fn test_login_against_dead_backend_alerts_once() {
        let mut h = landed().await;
        h.backend.set_reachable(false);

        assert!(!h.app.login(DEMO_EMAIL, DEMO_PASSWORD).await);
        assert_eq!(h.alerts.count(), 1);
        assert_eq!(h.app.screen(), Screen::Landing);
    }

    #[tokio::test]
    async fn test_login_without_profile_drops_token() {
        let mut h = landed().await;
        h.backend.set_fail_me(true);

        assert!(!h.app.login(DEMO_EMAIL, DEMO_PASSWORD).await);

        assert_eq!(h.app.screen(), Screen::Landing);
        assert!(h.app.user().is_none());
        assert_eq!(h.alerts.messages(), vec![LOGIN_FAILED.to_string()]);
        assert!(!h.backend.has_session().await);
    }

    #[tokio::test]
    async fn test_malformed_email_never_reaches_backend() {
        let mut h = landed().await;
        let calls = h.backend.call_count();

        assert!(!h.app.login("chef", "pw").await);

        assert_eq!(h.backend.call_count(), calls);
        assert_eq!(h.alerts.count(), 1);
    }

    #[tokio::test]
    async fn test_logout_clears_everything() {
        let mut h = signed_in().await;
        let me = owner(&h);
        let created = h
            .app
            .create_restaurant(NewRestaurant::named("Bistro").owned_by(me.clone()))
            .await
            .unwrap();
        h.app.create_menu_item(dish("Soup", &created.id, &me)).await.unwrap();

        h.app.logout().await;

        assert_eq!(h.app.screen(), Screen::Landing);
        assert!(h.app.user().is_none());
        assert!(h.app.restaurants().is_empty());
        assert_eq!(h.app.cached_menus(), 0);
        assert!(!h.backend.has_session().await);
    }

    #[tokio::test]
    async fn test_logout_ignores_backend_failure() {
        let mut h = signed_in().await;
        h.backend.set_reachable(false);

        h.app.logout().await;

        assert_eq!(h.app.screen(), Screen::Landing);
        assert!(h.alerts.messages().is_empty());
    }

    // =========================================================================
    // restaurants
    // =========================================================================

    #[tokio::test]
    async fn test_load_restaurants_without_user_is_noop() {
        let mut h = landed().await;
        let calls = h.backend.call_count();

        h.app.load_restaurants().await;

        assert_eq!(h.backend.call_count(), calls);
        assert!(h.app.restaurants().is_empty());
    }

    #[tokio::test]
    async fn test_load_restaurants_only_returns_own_newest_first() {
        let mut h = signed_in().await;
        let me = owner(&h);
        let other = h.backend.add_user("Other", "other@example.com", "pw").await;

        h.backend
            .insert(Collection::Restaurants, json!({ "name": "Old", "owner": me }))
            .await;
        h.backend
            .insert(Collection::Restaurants, json!({ "name": "Theirs", "owner": other }))
            .await;
        h.backend
            .insert(Collection::Restaurants, json!({ "name": "New", "owner": me }))
            .await;

        h.app.load_restaurants().await;

        let names: Vec<_> = h.app.restaurants().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["New", "Old"]);
        assert!(h.app.restaurants().iter().all(|r| r.owner_id() == Some(&me)));
    }

    #[tokio::test]
    async fn test_failed_load_keeps_list() {
        let mut h = signed_in().await;
        let me = owner(&h);
        h.app
            .create_restaurant(NewRestaurant::named("Kept").owned_by(me))
            .await
            .unwrap();

        h.backend.set_reachable(false);
        h.app.load_restaurants().await;

        assert_eq!(h.app.restaurants().len(), 1);
        assert!(h.alerts.messages().is_empty());
    }

    #[tokio::test]
    async fn test_created_restaurants_are_prepended() {
        let mut h = signed_in().await;
        let me = owner(&h);

        for name in ["First", "Second", "Third"] {
            h.app
                .create_restaurant(NewRestaurant::named(name).owned_by(me.clone()))
                .await
                .unwrap();
        }

        let names: Vec<_> = h.app.restaurants().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Third", "Second", "First"]);
    }

    #[tokio::test]
    async fn test_failed_create_restaurant_leaves_state() {
        let mut h = signed_in().await;
        let me = owner(&h);
        h.app
            .create_restaurant(NewRestaurant::named("Kept").owned_by(me.clone()))
            .await
            .unwrap();
        h.backend.set_fail_creates(true);

        let created = h
            .app
            .create_restaurant(NewRestaurant::named("Lost").owned_by(me))
            .await;

        assert!(created.is_none());
        assert_eq!(h.app.restaurants().len(), 1);
        assert_eq!(h.alerts.count(), 1);
    }

    #[tokio::test]
    async fn test_invalid_restaurant_is_not_sent() {
        let mut h = signed_in().await;
        let calls = h.backend.call_count();

        assert!(h.app.create_restaurant(NewRestaurant::named("  ")).await.is_none());

        assert_eq!(h.backend.call_count(), calls);
        assert_eq!(h.alerts.count(), 1);
    }

    // =========================================================================
    // menu items
    // =========================================================================

    #[tokio::test]
    async fn test_menu_items_are_keyed_by_restaurant() {
        let mut h = signed_in().await;
        let me = owner(&h);
        let r1 = h
            .app
            .create_restaurant(NewRestaurant::named("One").owned_by(me.clone()))
            .await
            .unwrap();
        let r2 = h
            .app
            .create_restaurant(NewRestaurant::named("Two").owned_by(me.clone()))
            .await
            .unwrap();

        h.backend
            .insert(
                Collection::MenuItems,
                json!({ "name": "Soup", "price": 4.5, "restaurant": r1.id, "owner": me }),
            )
            .await;

        h.app.load_menu_items_for_restaurant(&r1.id).await;
        h.app.load_menu_items_for_restaurant(&r2.id).await;

        assert_eq!(h.app.menu_items(&r1.id).map(|items| items.len()), Some(1));
        assert_eq!(h.app.menu_items(&r2.id).map(|items| items.len()), Some(0));
        assert_eq!(h.app.cached_menus(), 2);
    }

    #[tokio::test]
    async fn test_create_for_uncached_restaurant_creates_key() {
        let mut h = signed_in().await;
        let me = owner(&h);
        let r1 = h
            .app
            .create_restaurant(NewRestaurant::named("One").owned_by(me.clone()))
            .await
            .unwrap();
        assert!(!h.app.has_menu_items(&r1.id));

        let item = h.app.create_menu_item(dish("Stew", &r1.id, &me)).await.unwrap();

        assert_eq!(h.app.menu_items(&r1.id), Some(&[item][..]));
        assert_eq!(h.app.cached_menus(), 1);
    }

    #[tokio::test]
    async fn test_create_menu_item_touches_one_key() {
        let mut h = signed_in().await;
        let me = owner(&h);
        let r1 = h
            .app
            .create_restaurant(NewRestaurant::named("One").owned_by(me.clone()))
            .await
            .unwrap();
        let r2 = h
            .app
            .create_restaurant(NewRestaurant::named("Two").owned_by(me.clone()))
            .await
            .unwrap();
        h.app.load_menu_items_for_restaurant(&r2.id).await;

        h.app.create_menu_item(dish("Stew", &r1.id, &me)).await.unwrap();
        let second = h.app.create_menu_item(dish("Pie", &r1.id, &me)).await.unwrap();

        assert_eq!(h.app.menu_items(&r1.id).map(|items| items[0].id.clone()), Some(second.id));
        assert_eq!(h.app.menu_items(&r1.id).map(|items| items.len()), Some(2));
        assert_eq!(h.app.menu_items(&r2.id).map(|items| items.len()), Some(0));
    }

    #[tokio::test]
    async fn test_failed_create_menu_item_leaves_cache() {
        let mut h = signed_in().await;
        let me = owner(&h);
        let r1 = h
            .app
            .create_restaurant(NewRestaurant::named("One").owned_by(me.clone()))
            .await
            .unwrap();
        h.backend.set_fail_creates(true);

        assert!(h.app.create_menu_item(dish("Stew", &r1.id, &me)).await.is_none());

        assert!(!h.app.has_menu_items(&r1.id));
        assert_eq!(h.alerts.count(), 1);
    }

    #[tokio::test]
    async fn test_failed_menu_load_keeps_cache() {
        let mut h = signed_in().await;
        let me = owner(&h);
        let r1 = h
            .app
            .create_restaurant(NewRestaurant::named("One").owned_by(me.clone()))
            .await
            .unwrap();
        h.app.create_menu_item(dish("Stew", &r1.id, &me)).await.unwrap();

        h.backend.set_reachable(false);
        h.app.load_menu_items_for_restaurant(&r1.id).await;

        assert_eq!(h.app.menu_items(&r1.id).map(|items| items.len()), Some(1));
        assert!(h.alerts.messages().is_empty());
    }
}
