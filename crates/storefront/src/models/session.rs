//! Session-related types.
//!
//! Everything a visitor accumulates lives in their session: the cart and its
//! drawer flag, the last checkout form, and the role handed out at login.
//! Sessions never share data with each other.

use carrito_core::{CartState, OrderId, PaymentInfo, UserId};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

/// Session-stored user identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's id in the REST API.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// User's email address.
    pub email: String,
}

/// Session keys.
pub mod keys {
    /// Key for the visitor's cart and drawer flag.
    pub const CART: &str = "cart";

    /// Key for the last submitted checkout form.
    pub const PAYMENT_INFO: &str = "payment_info";

    /// Key for the order created by the last checkout.
    pub const LAST_ORDER: &str = "last_order";

    /// Key for the display role string.
    pub const ROLE: &str = "role";

    /// Key for the logged-in user.
    pub const CURRENT_USER: &str = "current_user";
}

/// Load the visitor's cart, empty if none was stored yet.
///
/// # Errors
///
/// Returns an error if the session store fails or the stored value is corrupt.
pub async fn load_cart(session: &Session) -> Result<CartState, tower_sessions::session::Error> {
    Ok(session
        .get::<CartState>(keys::CART)
        .await?
        .unwrap_or_default())
}

/// Store the visitor's cart.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn save_cart(
    session: &Session,
    cart: &CartState,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::CART, cart).await
}

/// Load the last submitted checkout form.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn load_payment_info(
    session: &Session,
) -> Result<PaymentInfo, tower_sessions::session::Error> {
    Ok(session
        .get::<PaymentInfo>(keys::PAYMENT_INFO)
        .await?
        .unwrap_or_default())
}

/// Replace the checkout form wholesale.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn save_payment_info(
    session: &Session,
    info: &PaymentInfo,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::PAYMENT_INFO, info).await
}

/// Order id recorded by the last checkout, if the API returned one.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn load_last_order(
    session: &Session,
) -> Result<Option<OrderId>, tower_sessions::session::Error> {
    session.get::<OrderId>(keys::LAST_ORDER).await
}

/// Record (or forget) the order created by checkout.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn save_last_order(
    session: &Session,
    order: Option<&OrderId>,
) -> Result<(), tower_sessions::session::Error> {
    match order {
        Some(id) => session.insert(keys::LAST_ORDER, id).await,
        None => session
            .remove::<OrderId>(keys::LAST_ORDER)
            .await
            .map(drop),
    }
}
