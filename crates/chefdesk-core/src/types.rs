//! # Domain Types
//!
//! Entities exchanged with the managed backend.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      User       │   │   Restaurant    │   │    MenuItem     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │◄──│  owner          │◄──│  restaurant     │       │
//! │  │  name           │   │  name           │   │  name, category │       │
//! │  │  email          │   │  createdAt      │   │  price (Money)  │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  Relations arrive either as a bare id or, when the query asks for it,  │
//! │  as the embedded record. `Relation<T>` accepts both.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! The backend decides the id format (auto-increment numbers or UUID strings
//! depending on its version). `EntityId` keeps whichever form arrived and
//! sends it back unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::error::ValidationError;
use crate::money::Money;
use crate::validation::{validate_description, validate_name, ValidationResult};

// =============================================================================
// Entity Id
// =============================================================================

/// Identifier assigned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    /// Numeric id (auto-increment primary keys).
    Number(u64),
    /// String id (UUIDs).
    Text(String),
}

impl EntityId {
    /// Parses an id typed by the user, preferring the numeric form.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        raw.parse::<u64>()
            .map(EntityId::Number)
            .unwrap_or_else(|_| EntityId::Text(raw.to_string()))
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Number(n) => write!(f, "{}", n),
            EntityId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<u64> for EntityId {
    fn from(n: u64) -> Self {
        EntityId::Number(n)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        EntityId::Text(s.to_string())
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        EntityId::Text(s)
    }
}

/// Anything that carries a backend id.
pub trait Identified {
    fn id(&self) -> &EntityId;
}

// =============================================================================
// Relation
// =============================================================================

/// A reference to another entity: the embedded record or just its id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Relation<T> {
    /// The related record, present when the query included the relation.
    Expanded(T),
    /// Only the id.
    Id(EntityId),
}

impl<T: Identified> Relation<T> {
    /// Returns the id of the referenced entity.
    pub fn id(&self) -> &EntityId {
        match self {
            Relation::Expanded(entity) => entity.id(),
            Relation::Id(id) => id,
        }
    }

    /// Returns the embedded record, if the relation was included.
    pub fn expanded(&self) -> Option<&T> {
        match self {
            Relation::Expanded(entity) => Some(entity),
            Relation::Id(_) => None,
        }
    }
}

// =============================================================================
// User
// =============================================================================

/// An authenticated restaurant owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: EntityId,

    /// Display name shown in the dashboard header.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    pub email: String,
}

impl Identified for User {
    fn id(&self) -> &EntityId {
        &self.id
    }
}

// =============================================================================
// Restaurant
// =============================================================================

/// A restaurant owned by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub id: EntityId,

    pub name: String,

    /// Owning user. Absent when the backend omits relations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<Relation<User>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Restaurant {
    /// Id of the owner, if known.
    pub fn owner_id(&self) -> Option<&EntityId> {
        self.owner.as_ref().map(Relation::id)
    }
}

impl Identified for Restaurant {
    fn id(&self) -> &EntityId {
        &self.id
    }
}

/// Payload for creating a restaurant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRestaurant {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<EntityId>,
}

impl NewRestaurant {
    /// Creates a payload with a trimmed name and no owner.
    pub fn named(name: impl Into<String>) -> Self {
        NewRestaurant {
            name: name.into().trim().to_string(),
            owner: None,
        }
    }

    /// Sets the owning user.
    pub fn owned_by(mut self, owner: EntityId) -> Self {
        self.owner = Some(owner);
        self
    }

    /// Checks the payload before it is sent.
    pub fn validate(&self) -> ValidationResult<()> {
        validate_name("name", &self.name)
    }
}

// =============================================================================
// Menu Item
// =============================================================================

/// A dish or drink on a restaurant's menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: EntityId,

    pub name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,

    #[serde(default)]
    pub price: Money,

    /// Free-form category ("Appetizer", "Main", ...).
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restaurant: Option<Relation<Restaurant>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<Relation<User>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl MenuItem {
    /// Id of the restaurant this item belongs to, if the backend sent it.
    pub fn restaurant_id(&self) -> Option<&EntityId> {
        self.restaurant.as_ref().map(Relation::id)
    }
}

impl Identified for MenuItem {
    fn id(&self) -> &EntityId {
        &self.id
    }
}

/// Payload for creating a menu item.
///
/// `restaurant` is the key the created item is cached under locally,
/// whatever the backend echoes back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMenuItem {
    pub name: String,
    pub description: String,
    pub price: Money,
    pub category: String,
    pub restaurant: EntityId,
    pub owner: EntityId,
}

impl NewMenuItem {
    /// Checks the payload before it is sent.
    pub fn validate(&self) -> ValidationResult<()> {
        validate_name("name", &self.name)?;
        validate_description(&self.description)?;
        if self.price.is_negative() {
            return Err(ValidationError::Negative {
                field: "price".to_string(),
            });
        }
        Ok(())
    }
}

// =============================================================================
// Serde Helpers
// =============================================================================

/// Treats an explicit JSON `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// =============================================================================
// Unit Tests
// =============================================================================
