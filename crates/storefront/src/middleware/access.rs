//! Role gate extractors.
//!
//! The role string handed out at login is kept in the session. Handlers read
//! it through [`AccessContext`] and ask capability questions instead of
//! comparing strings. [`RequireAdmin`] turns the check into an extractor for
//! the management screens.
//!
//! This is a display gate. The REST API enforces its own rules.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use carrito_core::{Capability, Role};
use tower_sessions::Session;

use crate::models::{CurrentUser, session_keys};

/// Message shown when a gated page is requested without the admin role.
pub const ACCESS_DENIED_MESSAGE: &str = "You do not have access to this page";

/// The visitor's role and identity for the current request.
#[derive(Debug, Clone, Default)]
pub struct AccessContext {
    pub role: Option<Role>,
    pub user: Option<CurrentUser>,
}

impl AccessContext {
    /// Whether the visitor may use `capability`.
    #[must_use]
    pub fn can(&self, capability: Capability) -> bool {
        self.role
            .as_ref()
            .is_some_and(|role| role.grants(capability))
    }

    /// Shorthand for `can(Capability::ManageStore)`.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.can(Capability::ManageStore)
    }

    /// Read the context from a session. Missing or unreadable values mean
    /// an anonymous visitor.
    pub async fn from_session(session: &Session) -> Self {
        let role = session
            .get::<Role>(session_keys::ROLE)
            .await
            .ok()
            .flatten();
        let user = session
            .get::<CurrentUser>(session_keys::CURRENT_USER)
            .await
            .ok()
            .flatten();

        Self { role, user }
    }
}

impl<S> FromRequestParts<S> for AccessContext
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<Session>() {
            Some(session) => Ok(Self::from_session(session).await),
            None => Ok(Self::default()),
        }
    }
}

/// Extractor that only lets `admin` visitors through.
///
/// # Example
///
/// ```rust,ignore
/// async fn manage(RequireAdmin(access): RequireAdmin) -> impl IntoResponse {
///     format!("Managing as {:?}", access.user)
/// }
/// ```
pub struct RequireAdmin(pub AccessContext);

/// Rejection for [`RequireAdmin`]: a plain access-denied page.
#[derive(Debug)]
pub struct AccessDenied;

impl IntoResponse for AccessDenied {
    fn into_response(self) -> Response {
        (StatusCode::FORBIDDEN, ACCESS_DENIED_MESSAGE).into_response()
    }
}

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AccessDenied;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Ok(access) = AccessContext::from_request_parts(parts, state).await;

        if !access.is_admin() {
            tracing::debug!(path = %parts.uri.path(), "Role gate denied access");
            return Err(AccessDenied);
        }

        Ok(Self(access))
    }
}

/// Store the role and user returned by login.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_identity(
    session: &Session,
    role: &Role,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::ROLE, role).await?;
    session.insert(session_keys::CURRENT_USER, user).await
}

/// Forget the role and user (logout). The cart is kept.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_identity(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.remove::<Role>(session_keys::ROLE).await?;
    session
        .remove::<CurrentUser>(session_keys::CURRENT_USER)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_cannot_manage() {
        assert!(!AccessContext::default().is_admin());
    }

    #[test]
    fn test_admin_role_can_manage() {
        let access = AccessContext {
            role: Some(Role::Admin),
            user: None,
        };
        assert!(access.can(Capability::ManageStore));
    }

    #[test]
    fn test_other_role_cannot_manage() {
        let access = AccessContext {
            role: Some(Role::Other("cliente".to_string())),
            user: None,
        };
        assert!(!access.is_admin());
    }

    #[test]
    fn test_access_denied_response() {
        let response = AccessDenied.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
