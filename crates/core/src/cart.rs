//! Per-session cart state.
//!
//! A [`Cart`] is an ordered list of [`CartEntry`] values with at most one
//! entry per product id and a quantity of at least one on every entry.
//! [`CartState`] pairs the cart with the visibility flag of the cart drawer,
//! which opens whenever something is added.
//!
//! All operations are local state transitions and never fail: looking up a
//! product that is not in the cart is reported through the return value and
//! leaves the cart untouched.
//!
//! # Example
//!
//! ```rust
//! use carrito_core::{CartState, Price, Product, Quantity, ReduceOutcome};
//!
//! let mut state = CartState::default();
//! let tea = Product::new("p1", "Tea", Price::from_cents(1000).unwrap());
//!
//! state.add_to_cart(tea, Quantity::new(2).unwrap());
//! assert!(state.is_drawer_visible());
//!
//! assert_eq!(
//!     state.reduce_quantity(&"p1".into()),
//!     ReduceOutcome::Reduced(Quantity::ONE)
//! );
//! assert_eq!(state.reduce_quantity(&"p1".into()), ReduceOutcome::Removed);
//! assert!(state.cart().is_empty());
//! ```

use serde::{Deserialize, Serialize};

use crate::types::{Price, Product, ProductId, Quantity};

/// One product paired with the quantity selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartEntry {
    pub product: Product,
    pub quantity: Quantity,
}

impl CartEntry {
    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.line_total(self.quantity)
    }
}

/// Result of [`Cart::reduce_quantity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReduceOutcome {
    /// The entry is still present with the new quantity.
    Reduced(Quantity),
    /// The entry held a single unit and was removed.
    Removed,
    /// No entry for that product id.
    NotFound,
}

/// Ordered cart contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    entries: Vec<CartEntry>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add `quantity` units of `product`.
    ///
    /// Merges into the existing entry for the same product id, otherwise
    /// appends a new entry. Returns the entry's quantity afterwards.
    pub fn add(&mut self, product: Product, quantity: Quantity) -> Quantity {
        if let Some(entry) = self.entry_mut(&product.id) {
            entry.quantity = entry.quantity.saturating_add(quantity);
            return entry.quantity;
        }

        self.entries.push(CartEntry { product, quantity });
        quantity
    }

    /// Remove the entry for `product_id`, returning it if it was present.
    pub fn remove(&mut self, product_id: &ProductId) -> Option<CartEntry> {
        let index = self
            .entries
            .iter()
            .position(|entry| &entry.product.id == product_id)?;
        Some(self.entries.remove(index))
    }

    /// Take one unit off the entry for `product_id`.
    ///
    /// The last unit removes the entry entirely.
    pub fn reduce_quantity(&mut self, product_id: &ProductId) -> ReduceOutcome {
        let Some(entry) = self.entry_mut(product_id) else {
            return ReduceOutcome::NotFound;
        };

        match entry.quantity.decremented() {
            Some(quantity) => {
                entry.quantity = quantity;
                ReduceOutcome::Reduced(quantity)
            }
            None => {
                self.remove(product_id);
                ReduceOutcome::Removed
            }
        }
    }

    /// Entry for `product_id`, if any.
    #[must_use]
    pub fn get(&self, product_id: &ProductId) -> Option<&CartEntry> {
        self.entries
            .iter()
            .find(|entry| &entry.product.id == product_id)
    }

    /// Entries in display order.
    #[must_use]
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of quantities across all entries.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.entries
            .iter()
            .map(|entry| u64::from(entry.quantity.get()))
            .sum()
    }

    /// Sum of line totals, saturating like [`Price`] addition.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.entries.iter().map(CartEntry::line_total).sum()
    }

    fn entry_mut(&mut self, product_id: &ProductId) -> Option<&mut CartEntry> {
        self.entries
            .iter_mut()
            .find(|entry| &entry.product.id == product_id)
    }
}

/// Visibility of the cart drawer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawerVisibility {
    #[default]
    Hidden,
    Visible,
}

/// Cart contents plus the drawer flag, as kept in a visitor's session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartState {
    cart: Cart,
    drawer: DrawerVisibility,
}

impl CartState {
    /// Add to the cart and open the drawer.
    pub fn add_to_cart(&mut self, product: Product, quantity: Quantity) -> Quantity {
        let quantity = self.cart.add(product, quantity);
        self.drawer = DrawerVisibility::Visible;
        quantity
    }

    /// Remove a product; a no-op if it is not in the cart.
    pub fn remove_from_cart(&mut self, product_id: &ProductId) -> Option<CartEntry> {
        self.cart.remove(product_id)
    }

    /// Take one unit off a product.
    pub fn reduce_quantity(&mut self, product_id: &ProductId) -> ReduceOutcome {
        self.cart.reduce_quantity(product_id)
    }

    /// Hide the drawer. Contents are untouched.
    pub const fn close_cart_menu(&mut self) {
        self.drawer = DrawerVisibility::Hidden;
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub const fn drawer(&self) -> DrawerVisibility {
        self.drawer
    }

    #[must_use]
    pub const fn is_drawer_visible(&self) -> bool {
        matches!(self.drawer, DrawerVisibility::Visible)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn product(id: &str, cents: i64) -> Product {
        Product::new(id, format!("Product {id}"), Price::from_cents(cents).unwrap())
    }

    fn qty(n: u32) -> Quantity {
        Quantity::new(n).unwrap()
    }

    fn quantities(state: &CartState) -> Vec<(String, u32)> {
        state
            .cart()
            .entries()
            .iter()
            .map(|e| (e.product.id.to_string(), e.quantity.get()))
            .collect()
    }

    #[test]
    fn test_repeated_adds_merge_into_one_entry() {
        let mut state = CartState::default();
        for n in [1, 4, 2, 7] {
            state.add_to_cart(product("p1", 500), qty(n));
        }

        assert_eq!(state.cart().len(), 1);
        assert_eq!(quantities(&state), vec![("p1".to_string(), 14)]);
    }

    #[test]
    fn test_adds_keep_insertion_order() {
        let mut state = CartState::default();
        state.add_to_cart(product("b", 100), qty(1));
        state.add_to_cart(product("a", 100), qty(1));
        state.add_to_cart(product("b", 100), qty(1));

        assert_eq!(
            quantities(&state),
            vec![("b".to_string(), 2), ("a".to_string(), 1)]
        );
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut state = CartState::default();
        state.add_to_cart(product("p1", 100), qty(1));
        state.add_to_cart(product("p2", 100), qty(3));

        let removed = state.remove_from_cart(&"p1".into());
        assert_eq!(removed.map(|e| e.quantity.get()), Some(1));
        let after_first = state.clone();

        assert_eq!(state.remove_from_cart(&"p1".into()), None);
        assert_eq!(state, after_first);
        assert_eq!(quantities(&state), vec![("p2".to_string(), 3)]);
    }

    #[test]
    fn test_reduce_last_unit_removes_entry() {
        let mut state = CartState::default();
        state.add_to_cart(product("p1", 100), qty(1));

        assert_eq!(state.reduce_quantity(&"p1".into()), ReduceOutcome::Removed);
        assert!(state.cart().get(&"p1".into()).is_none());
    }

    #[test]
    fn test_reduce_above_one_decrements() {
        let mut state = CartState::default();
        state.add_to_cart(product("p1", 100), qty(6));

        assert_eq!(
            state.reduce_quantity(&"p1".into()),
            ReduceOutcome::Reduced(qty(5))
        );
        assert_eq!(state.cart().get(&"p1".into()).unwrap().quantity, qty(5));
    }

    #[test]
    fn test_reduce_missing_entry_is_not_found() {
        let mut state = CartState::default();
        state.add_to_cart(product("p1", 100), qty(2));
        let before = state.clone();

        assert_eq!(
            state.reduce_quantity(&"nope".into()),
            ReduceOutcome::NotFound
        );
        assert_eq!(state, before);
    }

    #[test]
    fn test_add_then_reduce_to_empty() {
        let mut state = CartState::default();
        assert!(!state.is_drawer_visible());

        state.add_to_cart(product("p1", 1000), qty(2));
        assert_eq!(quantities(&state), vec![("p1".to_string(), 2)]);
        assert!(state.is_drawer_visible());

        state.add_to_cart(product("p1", 1000), qty(3));
        assert_eq!(quantities(&state), vec![("p1".to_string(), 5)]);

        for expected in [4, 3, 2, 1] {
            assert_eq!(
                state.reduce_quantity(&"p1".into()),
                ReduceOutcome::Reduced(qty(expected))
            );
        }
        assert_eq!(state.reduce_quantity(&"p1".into()), ReduceOutcome::Removed);
        assert!(state.cart().is_empty());
    }

    #[test]
    fn test_close_menu_keeps_contents() {
        let mut state = CartState::default();
        state.add_to_cart(product("p2", 100), qty(1));
        state.close_cart_menu();

        assert_eq!(state.drawer(), DrawerVisibility::Hidden);
        assert_eq!(quantities(&state), vec![("p2".to_string(), 1)]);
    }

    #[test]
    fn test_remove_and_reduce_leave_drawer_alone() {
        let mut state = CartState::default();
        state.add_to_cart(product("p1", 100), qty(2));
        state.reduce_quantity(&"p1".into());
        state.remove_from_cart(&"p1".into());

        assert!(state.is_drawer_visible());
    }

    #[test]
    fn test_totals() {
        let mut state = CartState::default();
        state.add_to_cart(product("p1", 1000), qty(2));
        state.add_to_cart(product("p2", 250), qty(3));

        assert_eq!(state.cart().total_quantity(), 5);
        assert_eq!(state.cart().subtotal().display(), "$27.50");
    }

    #[test]
    fn test_huge_totals_saturate() {
        let price = Price::new(Decimal::from(10_u64.pow(19)) * Decimal::TEN).unwrap();
        let mut state = CartState::default();
        state.add_to_cart(Product::new("p1", "Gold", price), qty(u32::MAX));
        state.add_to_cart(product("p2", 250), qty(1));

        let max = Price::new(Decimal::MAX).unwrap();
        assert_eq!(state.cart().entries()[0].line_total(), max);
        assert_eq!(state.cart().subtotal(), max);
    }

    #[test]
    fn test_state_survives_json_round_trip() {
        let mut state = CartState::default();
        state.add_to_cart(product("p1", 1999).with_image("/img/p1.png"), qty(2));

        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["drawer"], "visible");

        let back: CartState = serde_json::from_value(json).unwrap();
        assert_eq!(back, state);
    }
}
