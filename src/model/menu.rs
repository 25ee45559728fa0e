//! Menu items: what the catalog actor stores and what orders price against.
//!
//! # Actor Framework
//! [`MenuItem`] implements the [`ActorEntity`](actor_framework::ActorEntity) trait,
//! allowing it to be managed by a [`ResourceActor`](actor_framework::ResourceActor).
//!
//! See [`impl ActorEntity for MenuItem`](#impl-ActorEntity-for-MenuItem) for details on:
//! - Creation parameters ([`MenuItemCreate`])
//! - Queries ([`CatalogQuery`])

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for menu items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MenuItemId(pub u32);

impl From<u32> for MenuItemId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for MenuItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "item_{}", self.0)
    }
}

/// Menu section such as `coffee` or `dessert`. Free-form so new sections need no release.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(String);

impl Category {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(name.as_ref().trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: MenuItemId,
    pub name: String,
    pub price: Decimal,
    pub category: Category,
    pub image: Option<String>,
}

impl MenuItem {
    pub fn new(
        id: MenuItemId,
        name: impl Into<String>,
        price: Decimal,
        category: Category,
        image: Option<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            category,
            image,
        }
    }
}

/// Payload for adding a menu item. Also the shape of each entry in the seed file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemCreate {
    pub name: String,
    pub price: Decimal,
    pub category: Category,
    #[serde(default)]
    pub image: Option<String>,
}

/// Filters understood by the catalog actor.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogQuery {
    All,
    Ids(Vec<MenuItemId>),
}
