//! Registration and session handlers.

use actix_web::cookie::{Cookie, SameSite, time::Duration};
use actix_web::{HttpResponse, web};
use std::sync::Arc;

use inkwell_core::domain::User;
use inkwell_core::error::RepoError;
use inkwell_core::ports::{
    FieldErrors, FormValidator, NON_FIELD_ERRORS, PasswordService, TokenService,
};
use inkwell_shared::ApiResponse;
use inkwell_shared::dto::{LoginForm, RegisterForm, UserResponse};

use super::redirect_home;
use crate::config::SessionConfig;
use crate::forms::{LoginFormValidator, RegisterFormValidator};
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn username_taken() -> AppError {
    FieldErrors::single("username", "A user with that username already exists.").into()
}

fn session_cookie(session: &SessionConfig, token: String, max_age_seconds: i64) -> Cookie<'static> {
    Cookie::build(session.cookie_name.clone(), token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(session.secure)
        .max_age(Duration::seconds(max_age_seconds))
        .finish()
}

/// Issue a session for `user` and send them home.
fn start_session(
    session: &SessionConfig,
    token_service: &dyn TokenService,
    user: &User,
) -> AppResult<HttpResponse> {
    let token = token_service
        .generate_token(user.id, &user.username)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    let cookie = session_cookie(session, token, token_service.expiration_seconds());

    let mut response = redirect_home();
    response
        .add_cookie(&cookie)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(response)
}

/// POST /register/
pub async fn register(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    password_service: web::Data<Arc<dyn PasswordService>>,
    form: web::Form<RegisterForm>,
) -> AppResult<HttpResponse> {
    let validator = RegisterFormValidator {
        limits: state.forms,
    };
    let registration = validator.validate(form.into_inner())?;

    if state
        .users
        .find_by_username(&registration.username)
        .await?
        .is_some()
    {
        return Err(username_taken());
    }

    let password_hash = password_service
        .hash(&registration.password)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let user = User::new(registration.username, registration.email, password_hash);
    let user = match state.users.insert(user).await {
        Ok(user) => user,
        // Lost a race with a concurrent registration
        Err(RepoError::Constraint(_)) => return Err(username_taken()),
        Err(e) => return Err(e.into()),
    };
    tracing::info!(user_id = %user.id, username = %user.username, "User registered");

    start_session(&state.session, token_service.get_ref().as_ref(), &user)
}

/// POST /login/
pub async fn login(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    password_service: web::Data<Arc<dyn PasswordService>>,
    form: web::Form<LoginForm>,
) -> AppResult<HttpResponse> {
    let credentials = LoginFormValidator.validate(form.into_inner())?;

    let invalid = || -> AppError {
        FieldErrors::single(
            NON_FIELD_ERRORS,
            "Please enter a correct username and password. Note that both fields may be case-sensitive.",
        )
        .into()
    };

    let Some(user) = state.users.find_by_username(&credentials.username).await? else {
        return Err(invalid());
    };

    let valid = password_service
        .verify(&credentials.password, &user.password_hash)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    if !valid {
        tracing::info!(username = %credentials.username, "Failed login attempt");
        return Err(invalid());
    }

    tracing::debug!(user_id = %user.id, "User logged in");
    start_session(&state.session, token_service.get_ref().as_ref(), &user)
}

/// POST /logout/
pub async fn logout(state: web::Data<AppState>, identity: Identity) -> HttpResponse {
    let mut removal = Cookie::build(state.session.cookie_name.clone(), "")
        .path("/")
        .finish();
    removal.make_removal();

    tracing::debug!(user_id = %identity.user_id, "User logged out");

    let mut response = redirect_home();
    if let Err(e) = response.add_cookie(&removal) {
        tracing::error!("Failed to clear session cookie: {}", e);
    }
    response
}

/// GET /secret/ - the signed-in user.
pub async fn secret(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let user = state
        .users
        .find_by_id(identity.user_id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(UserResponse {
        id: user.id.to_string(),
        username: user.username,
        email: user.email,
    })))
}
