//! Display data shared by the page templates.
//!
//! Every page renders the same header (cart badge, navigation, admin links)
//! and, while it is open, the cart drawer. [`PageChrome`] carries that data so
//! each page template only adds its own fields.

use carrito_core::{Cart, CartEntry, CartState, Product};

use crate::middleware::AccessContext;

/// Product display data for templates.
#[derive(Debug, Clone)]
pub struct ProductView {
    pub id: String,
    pub name: String,
    pub price: String,
    /// Bare amount for form inputs, e.g. `12.50`.
    pub amount: String,
    pub image: Option<String>,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            price: product.price.display(),
            amount: product.price.to_string(),
            image: product.image_ref.clone(),
        }
    }
}

/// Cart line display data for templates.
#[derive(Debug, Clone)]
pub struct CartItemView {
    pub product_id: String,
    pub name: String,
    pub image: Option<String>,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
}

impl From<&CartEntry> for CartItemView {
    fn from(entry: &CartEntry) -> Self {
        Self {
            product_id: entry.product.id.to_string(),
            name: entry.product.name.clone(),
            image: entry.product.image_ref.clone(),
            quantity: entry.quantity.get(),
            price: entry.product.price.display(),
            line_price: entry.line_total().display(),
        }
    }
}

/// Cart display data for templates.
#[derive(Debug, Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u64,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.entries().iter().map(CartItemView::from).collect(),
            subtotal: cart.subtotal().display(),
            item_count: cart.total_quantity(),
        }
    }
}

/// Header and drawer data rendered on every page.
#[derive(Debug, Clone)]
pub struct PageChrome {
    /// Number of distinct products in the cart (header badge).
    pub cart_count: usize,
    /// Cart contents when the drawer is open.
    pub drawer: Option<CartView>,
    /// Whether to show the management links.
    pub is_admin: bool,
    /// Logged-in user's display name.
    pub user_name: Option<String>,
    /// Path of the page being rendered; forms return here.
    pub current_path: String,
}

impl PageChrome {
    #[must_use]
    pub fn new(cart: &CartState, access: &AccessContext, current_path: &str) -> Self {
        Self {
            cart_count: cart.cart().len(),
            drawer: cart
                .is_drawer_visible()
                .then(|| CartView::from(cart.cart())),
            is_admin: access.is_admin(),
            user_name: access.user.as_ref().map(|user| user.name.clone()),
            current_path: current_path.to_string(),
        }
    }
}

/// Restrict a user-supplied redirect target to a local path.
#[must_use]
pub fn local_redirect_target(target: Option<&str>, fallback: &str) -> String {
    match target {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => {
            path.to_string()
        }
        _ => fallback.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use carrito_core::{Price, Quantity, Role};

    use super::*;

    #[test]
    fn test_chrome_shows_drawer_only_when_open() {
        let mut cart = CartState::default();
        let access = AccessContext::default();
        assert!(PageChrome::new(&cart, &access, "/").drawer.is_none());

        cart.add_to_cart(
            Product::new("p1", "Tea", Price::from_cents(450).unwrap()),
            Quantity::new(2).unwrap(),
        );
        let chrome = PageChrome::new(&cart, &access, "/");
        let drawer = chrome.drawer.unwrap();
        assert_eq!(chrome.cart_count, 1);
        assert_eq!(drawer.items[0].line_price, "$9.00");
        assert_eq!(drawer.subtotal, "$9.00");
        assert_eq!(drawer.item_count, 2);

        cart.close_cart_menu();
        let chrome = PageChrome::new(&cart, &access, "/");
        assert!(chrome.drawer.is_none());
        assert_eq!(chrome.cart_count, 1);
    }

    #[test]
    fn test_chrome_admin_flag() {
        let access = AccessContext {
            role: Some(Role::Admin),
            user: None,
        };
        assert!(PageChrome::new(&CartState::default(), &access, "/").is_admin);
    }

    #[test]
    fn test_local_redirect_target() {
        assert_eq!(local_redirect_target(Some("/cart"), "/"), "/cart");
        assert_eq!(local_redirect_target(Some("//evil.example"), "/"), "/");
        assert_eq!(local_redirect_target(Some("https://evil.example"), "/"), "/");
        assert_eq!(local_redirect_target(Some("/\\evil"), "/"), "/");
        assert_eq!(local_redirect_target(None, "/cart"), "/cart");
    }
}
