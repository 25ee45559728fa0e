//! Client-side cart.
//!
//! The server never stores carts. This value type mirrors what the storefront keeps in
//! local storage, and turns into checkout lines with [`Cart::to_lines`]. Prices here are
//! display snapshots; the order actor reprices every line from the catalog.

use crate::model::{LineRequest, MenuItem, MenuItemId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub item_id: MenuItemId,
    pub name: String,
    pub price: Decimal,
    pub image: Option<String>,
    pub quantity: u32,
}

/// A cart read back from storage drops lines with no quantity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredCart")]
pub struct Cart {
    items: Vec<CartItem>,
}

#[derive(Deserialize)]
struct StoredCart {
    #[serde(default)]
    items: Vec<CartItem>,
}

impl From<StoredCart> for Cart {
    fn from(stored: StoredCart) -> Self {
        Self {
            items: stored
                .items
                .into_iter()
                .filter(|line| line.quantity > 0)
                .collect(),
        }
    }
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Adds `quantity` of `item`, merging with an existing line for the same item.
    pub fn add(&mut self, item: &MenuItem, quantity: u32) {
        if quantity == 0 {
            return;
        }
        match self.items.iter_mut().find(|line| line.item_id == item.id) {
            Some(line) => line.quantity = line.quantity.saturating_add(quantity),
            None => self.items.push(CartItem {
                item_id: item.id,
                name: item.name.clone(),
                price: item.price,
                image: item.image.clone(),
                quantity,
            }),
        }
    }

    /// Sets a line's quantity. Zero removes the line.
    pub fn set_quantity(&mut self, item_id: MenuItemId, quantity: u32) {
        if quantity == 0 {
            self.remove(item_id);
            return;
        }
        if let Some(line) = self.items.iter_mut().find(|line| line.item_id == item_id) {
            line.quantity = quantity;
        }
    }

    pub fn increment(&mut self, item_id: MenuItemId) {
        if let Some(line) = self.items.iter().find(|line| line.item_id == item_id) {
            let next = line.quantity.saturating_add(1);
            self.set_quantity(item_id, next);
        }
    }

    /// Steps a line down by one; a line at one is removed.
    pub fn decrement(&mut self, item_id: MenuItemId) {
        if let Some(line) = self.items.iter().find(|line| line.item_id == item_id) {
            let next = line.quantity.saturating_sub(1);
            self.set_quantity(item_id, next);
        }
    }

    pub fn remove(&mut self, item_id: MenuItemId) {
        self.items.retain(|line| line.item_id != item_id);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn total_quantity(&self) -> u32 {
        self.items.iter().map(|line| line.quantity).sum()
    }

    /// Display subtotal from the snapshot prices.
    pub fn subtotal(&self) -> Decimal {
        self.items
            .iter()
            .map(|line| line.price * Decimal::from(line.quantity))
            .sum()
    }

    pub fn to_lines(&self) -> Vec<LineRequest> {
        self.items
            .iter()
            .map(|line| LineRequest {
                item_id: line.item_id,
                quantity: i64::from(line.quantity),
                image: line.image.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Category;

    fn espresso() -> MenuItem {
        MenuItem::new(
            MenuItemId(1),
            "Espresso",
            Decimal::from(180),
            Category::new("coffee"),
            None,
        )
    }

    fn brownie() -> MenuItem {
        MenuItem::new(
            MenuItemId(2),
            "Brownie",
            Decimal::new(1205, 1),
            Category::new("dessert"),
            Some("brownie.jpg".into()),
        )
    }

    #[test]
    fn test_add_merges_same_item() {
        let mut cart = Cart::new();
        cart.add(&espresso(), 1);
        cart.add(&espresso(), 2);
        cart.add(&brownie(), 1);

        assert_eq!(cart.items().len(), 2);
        assert_eq!(cart.total_quantity(), 4);
        assert_eq!(cart.subtotal(), Decimal::new(6605, 1));
    }

    #[test]
    fn test_decrement_at_one_removes_line() {
        let mut cart = Cart::new();
        cart.add(&espresso(), 1);
        cart.increment(MenuItemId(1));
        assert_eq!(cart.total_quantity(), 2);

        cart.decrement(MenuItemId(1));
        cart.decrement(MenuItemId(1));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_to_lines_carries_quantities() {
        let mut cart = Cart::new();
        cart.add(&espresso(), 2);
        cart.add(&brownie(), 1);
        cart.set_quantity(MenuItemId(2), 0);

        let lines = cart.to_lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].item_id, MenuItemId(1));
        assert_eq!(lines[0].quantity, 2);

        cart.clear();
        assert!(cart.to_lines().is_empty());
    }

    #[test]
    fn test_stored_zero_quantity_line_is_dropped() {
        let cart: Cart = serde_json::from_str(
            r#"{"items":[
                {"itemId":1,"name":"Espresso","price":180,"image":null,"quantity":0},
                {"itemId":2,"name":"Brownie","price":120.5,"image":null,"quantity":2}
            ]}"#,
        )
        .unwrap();

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].item_id, MenuItemId(2));
        assert_eq!(cart.total_quantity(), 2);
    }

    #[test]
    fn test_decrement_at_zero_removes_line() {
        let mut cart = Cart::new();
        cart.add(&espresso(), 1);
        cart.items[0].quantity = 0;

        cart.decrement(MenuItemId(1));
        assert!(cart.is_empty());
    }
}
