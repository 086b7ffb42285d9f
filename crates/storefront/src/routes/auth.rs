//! Account route handlers.
//!
//! Registration, login and profile updates are forwarded to the REST API.
//! Login stores the returned role and user in the session; the role is what
//! the management screens check. Validation messages travel back to the form
//! in the query string.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::api::{ApiError, LoginPayload, RegisterPayload, UpdateUserPayload};
use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{AccessContext, clear_identity, set_identity};
use crate::models::{CurrentUser, session_keys};
use crate::routes::{MessageQuery, page_chrome, redirect_with};
use crate::state::AppState;
use crate::views::PageChrome;

const MIN_PASSWORD_LENGTH: usize = 6;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Registration form data.
#[derive(Deserialize)]
pub struct RegisterForm {
    pub nombre: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

/// Profile update form data. An empty password keeps the current one.
#[derive(Deserialize)]
pub struct UpdateUserForm {
    pub nombre: String,
    pub email: String,
    #[serde(default)]
    pub password: String,
}

// Passwords must never reach the logs through `#[instrument]`.
macro_rules! redacted_debug {
    ($ty:ty, $($field:ident),*) => {
        impl std::fmt::Debug for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_struct(stringify!($ty))
                    $(.field(stringify!($field), &self.$field))*
                    .field("password", &"[REDACTED]")
                    .finish()
            }
        }
    };
}

redacted_debug!(LoginForm, email);
redacted_debug!(RegisterForm, nombre, email);
redacted_debug!(UpdateUserForm, nombre, email);

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub chrome: PageChrome,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub chrome: PageChrome,
    pub error: Option<String>,
}

/// Profile page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/update_user.html")]
pub struct UpdateUserTemplate {
    pub chrome: PageChrome,
    pub user: CurrentUser,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Map an API rejection to a form message; anything else is a server error.
fn rejection_message(err: ApiError, message: &str) -> std::result::Result<String, AppError> {
    if err.is_rejection() {
        Ok(message.to_string())
    } else {
        Err(err.into())
    }
}

// =============================================================================
// Registration
// =============================================================================

/// Display the register page.
#[instrument(skip(session, access))]
pub async fn register_page(
    session: Session,
    access: AccessContext,
    Query(query): Query<MessageQuery>,
) -> Result<RegisterTemplate> {
    Ok(RegisterTemplate {
        chrome: page_chrome(&session, &access, "/register").await?,
        error: query.error,
    })
}

/// Handle registration.
#[instrument(skip(state))]
pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Result<Redirect> {
    if form.password != form.password_confirm {
        return Ok(redirect_with("/register", "error", "Passwords do not match"));
    }
    if form.password.len() < MIN_PASSWORD_LENGTH {
        return Ok(redirect_with(
            "/register",
            "error",
            "Password must be at least 6 characters",
        ));
    }

    let payload = RegisterPayload {
        nombre: form.nombre.trim().to_string(),
        email: form.email.trim().to_string(),
        password: form.password,
    };

    match state.api().register(&payload).await {
        Ok(()) => {
            tracing::info!(email = %payload.email, "User registered");
            Ok(redirect_with(
                "/login",
                "success",
                "Account created, you can log in now",
            ))
        }
        Err(e) => {
            let message = rejection_message(e, "Registration was rejected")?;
            Ok(redirect_with("/register", "error", &message))
        }
    }
}

// =============================================================================
// Login / Logout
// =============================================================================

/// Display the login page.
#[instrument(skip(session, access))]
pub async fn login_page(
    session: Session,
    access: AccessContext,
    Query(query): Query<MessageQuery>,
) -> Result<LoginTemplate> {
    Ok(LoginTemplate {
        chrome: page_chrome(&session, &access, "/login").await?,
        error: query.error,
        success: query.success,
    })
}

/// Handle login: store the role and user returned by the API.
#[instrument(skip(state, session))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Redirect> {
    let credentials = LoginPayload {
        email: form.email.trim().to_string(),
        password: form.password,
    };

    let user = match state.api().login(&credentials).await {
        Ok(user) => user,
        Err(e) => {
            let message = rejection_message(e, "Invalid email or password")?;
            return Ok(redirect_with("/login", "error", &message));
        }
    };

    // New session id on privilege change
    session.cycle_id().await?;

    let current = CurrentUser {
        id: user.id,
        name: user.nombre,
        email: user.email,
    };
    set_identity(&session, &user.rol, &current).await?;
    set_sentry_user(&current.id, Some(&current.email));

    tracing::info!(user_id = %current.id, role = %user.rol, "User logged in");

    Ok(Redirect::to("/"))
}

/// Handle logout. The cart stays with the session.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Redirect> {
    clear_identity(&session).await?;
    clear_sentry_user();
    Ok(Redirect::to("/"))
}

// =============================================================================
// Profile
// =============================================================================

/// Display the profile form. Visitors who are not logged in go to login.
#[instrument(skip(session, access))]
pub async fn update_user_page(
    session: Session,
    access: AccessContext,
    Query(query): Query<MessageQuery>,
) -> Result<Response> {
    let Some(user) = access.user.clone() else {
        return Ok(Redirect::to("/login").into_response());
    };

    Ok(UpdateUserTemplate {
        chrome: page_chrome(&session, &access, "/update-user").await?,
        user,
        error: query.error,
        success: query.success,
    }
    .into_response())
}

/// Handle a profile update.
#[instrument(skip(state, session, access))]
pub async fn update_user(
    State(state): State<AppState>,
    session: Session,
    access: AccessContext,
    Form(form): Form<UpdateUserForm>,
) -> Result<Redirect> {
    let Some(user) = access.user else {
        return Ok(Redirect::to("/login"));
    };

    let password = (!form.password.is_empty()).then_some(form.password);
    if password
        .as_ref()
        .is_some_and(|p| p.len() < MIN_PASSWORD_LENGTH)
    {
        return Ok(redirect_with(
            "/update-user",
            "error",
            "Password must be at least 6 characters",
        ));
    }

    let payload = UpdateUserPayload {
        nombre: form.nombre.trim().to_string(),
        email: form.email.trim().to_string(),
        password,
    };

    if let Err(e) = state.api().update_user(&user.id, &payload).await {
        let message = rejection_message(e, "The update was rejected")?;
        return Ok(redirect_with("/update-user", "error", &message));
    }

    let updated = CurrentUser {
        id: user.id,
        name: payload.nombre,
        email: payload.email,
    };
    session
        .insert(session_keys::CURRENT_USER, &updated)
        .await?;

    tracing::info!(user_id = %updated.id, "User profile updated");

    Ok(redirect_with("/update-user", "success", "Profile updated"))
}
