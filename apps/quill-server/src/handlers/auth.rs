//! Authentication handlers.

use actix_web::{HttpResponse, web};

use quill_core::domain::User;
use quill_core::error::DomainError;
use quill_core::ports::BaseRepository;
use quill_infra::MIN_PASSWORD_LEN;
use quill_shared::ApiResponse;
use quill_shared::dto::{AuthResponse, LoginRequest, NextQuery, RegisterUserRequest};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn auth_response(state: &AppState, user: &User) -> AppResult<AuthResponse> {
    let token = state
        .tokens
        .generate_token(user.id, &user.username, user.roles())
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(AuthResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: state.tokens.expiration_seconds().max(0) as u64,
    })
}

/// POST /register/
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterUserRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let username = req.username.trim().to_string();

    // Validate input
    let mut errors = Vec::new();
    if let Err(DomainError::Validation(msg)) = User::validate_username(&username) {
        errors.push(msg);
    }
    if req.email.is_empty() || !req.email.contains('@') {
        errors.push("email: Enter a valid email address.".to_string());
    }
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        errors.push(format!(
            "password: This password is too short. It must contain at least {MIN_PASSWORD_LEN} characters."
        ));
    }
    if errors.is_empty() && state.users.find_by_username(&username).await?.is_some() {
        errors.push("username: A user with that username already exists.".to_string());
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let password_hash = state
        .passwords
        .hash(&req.password)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let user = state
        .users
        .insert(User::new(username, req.email, password_hash))
        .await?;
    tracing::info!(user_id = %user.id, username = %user.username, "User registered");

    Ok(HttpResponse::Created().json(auth_response(&state, &user)?))
}

/// POST /login/
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let user = state
        .users
        .find_by_username(req.username.trim())
        .await?
        .ok_or(AppError::Unauthorized)?;

    let valid = state
        .passwords
        .verify(&req.password, &user.password_hash)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    if !valid {
        tracing::debug!(username = %user.username, "Rejected login");
        return Err(AppError::Unauthorized);
    }

    Ok(HttpResponse::Ok().json(auth_response(&state, &user)?))
}

/// GET /login/?next=<path>
///
/// Landing spot for login redirects; echoes where to go once signed in.
pub async fn login_page(query: web::Query<NextQuery>) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::ok_with_message(
        query.into_inner(),
        "Log in with POST /login/ to continue",
    ))
}
