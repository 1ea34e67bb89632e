use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use password_hash::rand_core::OsRng;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::{
    audit,
    domain::validation::{
        normalize_email, validate_email, validate_name, validate_password, validate_phone,
    },
    dto::auth::{Claims, LoginRequest, LoginResponse, RegisterRequest, UpdateProfileRequest},
    entity::{
        Users,
        users::{ActiveModel as UserActive, Column as UserCol},
    },
    error::{AppError, AppResult, ValidationError, unique_violation_as},
    middleware::auth::AuthUser,
    models::{Role, User},
    response::{ApiResponse, Meta},
    state::AppState,
};

const TOKEN_TTL_HOURS: i64 = 24;

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string())
}

pub fn issue_token(user: &User, secret: &str) -> AppResult<String> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(TOKEN_TTL_HOURS))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: user.id.to_string(),
        role: user.role.to_string(),
        exp: expiration.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

/// Creates a `client` account.
pub async fn register_user(
    state: &AppState,
    payload: RegisterRequest,
) -> AppResult<ApiResponse<User>> {
    let name = payload.name.trim().to_string();
    let email = normalize_email(&payload.email);
    let phone = payload.phone.trim().to_string();
    validate_name(&name)?;
    validate_email(&email)?;
    validate_phone(&phone)?;
    validate_password(&payload.password)?;

    let taken = Users::find()
        .filter(UserCol::Email.eq(email.as_str()))
        .count(&state.orm)
        .await?;
    if taken > 0 {
        return Err(ValidationError::DuplicateEmail.into());
    }

    let user = UserActive {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        email: Set(email),
        password_hash: Set(hash_password(&payload.password)?),
        phone: Set(phone),
        image_uri: Set(None),
        role_id: Set(Role::Client.id()),
        created_at: Set(state.clock.now()),
    }
    .insert(&state.orm)
    .await
    .map_err(|err| unique_violation_as(err, ValidationError::DuplicateEmail))?;

    tracing::info!(user_id = %user.id, "user registered");
    audit::record(
        state,
        Some(user.id),
        "user_register",
        "users",
        serde_json::json!({ "user_id": user.id }),
    )
    .await;

    Ok(ApiResponse::success("User created", user.into(), None))
}

/// Checks credentials. `None` covers both an unknown email and a wrong password.
pub async fn authenticate(
    state: &AppState,
    email: &str,
    password: &str,
) -> AppResult<Option<User>> {
    let Some(user) = Users::find()
        .filter(UserCol::Email.eq(normalize_email(email)))
        .one(&state.orm)
        .await?
    else {
        return Ok(None);
    };

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;
    if Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_err()
    {
        return Ok(None);
    }

    Ok(Some(user.into()))
}

pub async fn login_user(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<ApiResponse<LoginResponse>> {
    let user = authenticate(state, &payload.email, &payload.password)
        .await?
        .ok_or_else(|| AppError::BadRequest("Invalid email or password".into()))?;

    let token = issue_token(&user, &state.config.jwt_secret)?;

    audit::record(
        state,
        Some(user.id),
        "user_login",
        "users",
        serde_json::json!({ "user_id": user.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Logged in",
        LoginResponse { token, user },
        Some(Meta::empty()),
    ))
}

pub async fn me(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<User>> {
    let user = Users::find_by_id(user.user_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::Unauthorized)?;
    Ok(ApiResponse::success("OK", user.into(), None))
}

/// Applies the supplied, non-blank fields.
pub async fn update_profile(
    state: &AppState,
    user: &AuthUser,
    payload: UpdateProfileRequest,
) -> AppResult<ApiResponse<User>> {
    let current = Users::find_by_id(user.user_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let non_blank = |value: Option<String>| {
        value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let mut active: UserActive = current.clone().into();
    if let Some(name) = non_blank(payload.name) {
        validate_name(&name)?;
        active.name = Set(name);
    }
    if let Some(phone) = non_blank(payload.phone) {
        validate_phone(&phone)?;
        active.phone = Set(phone);
    }
    if let Some(password) = payload.password.filter(|p| !p.is_empty()) {
        validate_password(&password)?;
        active.password_hash = Set(hash_password(&password)?);
    }
    if let Some(image_uri) = non_blank(payload.image_uri) {
        active.image_uri = Set(Some(image_uri));
    }

    let updated = if active.is_changed() {
        active.update(&state.orm).await?
    } else {
        current
    };

    Ok(ApiResponse::success("Profile updated", updated.into(), None))
}
