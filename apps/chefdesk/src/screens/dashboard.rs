//! # Dashboard Screen
//!
//! Restaurants on the left, the selected restaurant's menu on the right.
//! The view keeps only form input and the current selection; everything
//! fetched from the backend lives in `AppState`.
//!
//! ## Selection Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  mount ──► load_restaurants ──► first restaurant? ──► select(first)    │
//! │                                                                         │
//! │  select(id) ──► menu cached? ── yes ──► show it (no backend call)      │
//! │                      │                                                  │
//! │                      no ──► load_menu_items_for_restaurant(id)         │
//! │                                                                         │
//! │  restaurant created while nothing selected ──► select(first)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Cached menus are never invalidated by selection.

use chefdesk_core::{EntityId, Money, NewMenuItem, NewRestaurant, Restaurant};
use std::fmt::Write;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

// =============================================================================
// Menu Item Draft
// =============================================================================

/// Fields of the menu item form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Name,
    Description,
    Price,
    Category,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown field '{0}' (expected name, description, price or category)")]
pub struct UnknownField(pub String);

impl FromStr for DraftField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(DraftField::Name),
            "description" | "desc" => Ok(DraftField::Description),
            "price" => Ok(DraftField::Price),
            "category" => Ok(DraftField::Category),
            other => Err(UnknownField(other.to_string())),
        }
    }
}

/// Menu item form input. The price stays text until submit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuItemDraft {
    pub name: String,
    pub description: String,
    pub price: String,
    pub category: String,
}

impl MenuItemDraft {
    pub fn set(&mut self, field: DraftField, value: impl Into<String>) {
        let value = value.into();
        match field {
            DraftField::Name => self.name = value,
            DraftField::Description => self.description = value,
            DraftField::Price => self.price = value,
            DraftField::Category => self.category = value,
        }
    }

    /// Parsed price. An untouched price field means zero.
    pub fn price(&self) -> AppResult<Money> {
        if self.price.trim().is_empty() {
            return Ok(Money::zero());
        }
        Ok(self.price.parse::<Money>()?)
    }
}

// =============================================================================
// Dashboard View
// =============================================================================

/// Form input and selection of the dashboard.
#[derive(Debug, Default)]
pub struct DashboardView {
    selected: Option<EntityId>,
    restaurant_name: String,
    item: MenuItemDraft,
}

impl DashboardView {
    /// Loads restaurants and selects the first one.
    pub async fn mount(app: &mut AppState) -> Self {
        let mut view = DashboardView::default();
        app.load_restaurants().await;
        view.select_first(app).await;
        view
    }

    pub fn selected(&self) -> Option<&EntityId> {
        self.selected.as_ref()
    }

    /// The selected restaurant, if it is still in the list.
    pub fn selected_restaurant<'a>(&self, app: &'a AppState) -> Option<&'a Restaurant> {
        let selected = self.selected.as_ref()?;
        app.restaurants().iter().find(|r| &r.id == selected)
    }

    pub fn restaurant_name(&self) -> &str {
        &self.restaurant_name
    }

    pub fn draft(&self) -> &MenuItemDraft {
        &self.item
    }

    /// Selects a restaurant, loading its menu unless it is cached.
    pub async fn select(&mut self, app: &mut AppState, id: EntityId) {
        if !app.has_menu_items(&id) {
            app.load_menu_items_for_restaurant(&id).await;
        } else {
            debug!(restaurant = %id, "Menu already cached");
        }
        self.selected = Some(id);
    }

    /// Selects by 1-based position in the restaurant list.
    pub async fn select_index(&mut self, app: &mut AppState, position: usize) -> AppResult<()> {
        let id = position
            .checked_sub(1)
            .and_then(|index| app.restaurants().get(index))
            .map(|r| r.id.clone())
            .ok_or_else(|| {
                AppError::validation(format!(
                    "No restaurant #{} (there are {})",
                    position,
                    app.restaurants().len()
                ))
            })?;
        self.select(app, id).await;
        Ok(())
    }

    async fn select_first(&mut self, app: &mut AppState) {
        if self.selected.is_some() {
            return;
        }
        if let Some(first) = app.restaurants().first().map(|r| r.id.clone()) {
            self.select(app, first).await;
        }
    }

    /// Re-fetches the restaurant list.
    pub async fn refresh(&mut self, app: &mut AppState) {
        app.load_restaurants().await;
        self.select_first(app).await;
    }

    // =========================================================================
    // Forms
    // =========================================================================

    pub fn set_restaurant_name(&mut self, name: impl Into<String>) {
        self.restaurant_name = name.into();
    }

    pub fn set_draft_field(&mut self, field: DraftField, value: impl Into<String>) {
        self.item.set(field, value);
    }

    /// Creates a restaurant from the name field.
    ///
    /// Blank name: nothing happens. Failure: the name is kept.
    pub async fn submit_restaurant(&mut self, app: &mut AppState) -> bool {
        if self.restaurant_name.trim().is_empty() {
            return false;
        }
        let Some(owner) = app.user().map(|u| u.id.clone()) else {
            return false;
        };

        let payload = NewRestaurant::named(self.restaurant_name.as_str()).owned_by(owner);
        if app.create_restaurant(payload).await.is_none() {
            return false;
        }

        self.restaurant_name.clear();
        self.select_first(app).await;
        true
    }

    /// Creates a menu item for the selected restaurant from the draft.
    ///
    /// Blank name or no selection: nothing happens. Failure: the draft is
    /// kept.
    pub async fn submit_menu_item(&mut self, app: &mut AppState) -> bool {
        if self.item.name.trim().is_empty() {
            return false;
        }
        let Some(restaurant) = self.selected.clone() else {
            return false;
        };
        let Some(owner) = app.user().map(|u| u.id.clone()) else {
            return false;
        };

        let price = match self.item.price() {
            Ok(price) => price,
            Err(e) => {
                app.report("Failed to create menu item", e);
                return false;
            }
        };

        let payload = NewMenuItem {
            name: self.item.name.trim().to_string(),
            description: self.item.description.trim().to_string(),
            price,
            category: self.item.category.trim().to_string(),
            restaurant,
            owner,
        };
        if app.create_menu_item(payload).await.is_none() {
            return false;
        }

        self.item = MenuItemDraft::default();
        true
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Renders the dashboard.
    pub fn render(&self, app: &AppState, admin_url: &str) -> String {
        let mut out = String::new();

        let _ = write!(out, "Chef's Dashboard");
        if let Some(user) = app.user() {
            let _ = write!(out, "    {} <{}>", user.name, user.email);
        }
        let _ = writeln!(out, "    Admin Panel: {}", admin_url);
        let _ = writeln!(out);

        let _ = writeln!(out, "My Restaurants");
        if app.restaurants().is_empty() {
            let _ = writeln!(out, "  No restaurants yet. Add one above!");
        }
        for (index, restaurant) in app.restaurants().iter().enumerate() {
            let marker = if self.selected.as_ref() == Some(&restaurant.id) {
                '>'
            } else {
                ' '
            };
            let _ = writeln!(out, " {}{:>3}. {}", marker, index + 1, restaurant.name);
        }
        if !self.restaurant_name.is_empty() {
            let _ = writeln!(out, "  new restaurant: {}", self.restaurant_name);
        }
        let _ = writeln!(out);

        match self.selected_restaurant(app) {
            Some(restaurant) => self.render_menu(&mut out, app, restaurant),
            None => {
                let name = app.user().map(|u| u.name.as_str()).unwrap_or_default();
                let _ = writeln!(out, "Welcome, {}!", name);
                let _ = writeln!(
                    out,
                    "Select a restaurant on the left, or create a new one to get started."
                );
            }
        }

        out
    }

    fn render_menu(&self, out: &mut String, app: &AppState, restaurant: &Restaurant) {
        let _ = writeln!(out, "Menu for {}", restaurant.name);

        let draft = &self.item;
        if draft != &MenuItemDraft::default() {
            let _ = writeln!(
                out,
                "  draft: name={:?} category={:?} price={:?} description={:?}",
                draft.name, draft.category, draft.price, draft.description
            );
        }

        let items = app.menu_items(&restaurant.id).unwrap_or_default();
        if items.is_empty() {
            let _ = writeln!(out, "  No menu items found. Add one above.");
        }
        for item in items {
            let _ = writeln!(out, "  {:<40} {:>10}", item.name, item.price.to_string());
            if !item.description.is_empty() {
                let _ = writeln!(out, "    {}", item.description);
            }
            if !item.category.is_empty() {
                let _ = writeln!(out, "    [{}]", item.category);
            }
        }
    }
}
