//! [`ActorEntity`] implementation for [`MenuItem`].
//!
//! The catalog has no dependencies (`Context = ()`). It takes neither updates nor custom
//! actions: items are added at boot and orders only read them through queries.

use super::CatalogError;
use crate::model::money::is_whole_minor_units;
use crate::model::{CatalogQuery, MenuItem, MenuItemCreate, MenuItemId};
use actor_framework::ActorEntity;
use async_trait::async_trait;
use rust_decimal::Decimal;

fn validate(name: &str, price: Decimal) -> Result<(), CatalogError> {
    if name.trim().is_empty() {
        return Err(CatalogError::InvalidItem("name is empty".into()));
    }
    if price <= Decimal::ZERO {
        return Err(CatalogError::InvalidItem(format!(
            "price must be positive, got {price}"
        )));
    }
    if !is_whole_minor_units(price) {
        return Err(CatalogError::InvalidItem(format!(
            "price {price} has more than two decimal places"
        )));
    }
    Ok(())
}

#[async_trait]
impl ActorEntity for MenuItem {
    type Id = MenuItemId;
    type Create = MenuItemCreate;
    type Update = ();
    type Query = CatalogQuery;
    type Action = ();
    type ActionResult = ();
    type Context = ();
    type Error = CatalogError;

    fn from_create_params(id: MenuItemId, params: MenuItemCreate) -> Result<Self, Self::Error> {
        validate(&params.name, params.price)?;
        Ok(Self::new(
            id,
            params.name.trim(),
            params.price,
            params.category,
            params.image,
        ))
    }

    fn matches(&self, query: &CatalogQuery) -> bool {
        match query {
            CatalogQuery::All => true,
            CatalogQuery::Ids(ids) => ids.contains(&self.id),
        }
    }

    async fn on_update(&mut self, _update: (), _ctx: &()) -> Result<(), Self::Error> {
        Ok(())
    }

    async fn handle_action(&mut self, _action: (), _ctx: &()) -> Result<(), Self::Error> {
        Ok(())
    }
}
