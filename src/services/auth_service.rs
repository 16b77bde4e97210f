use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use password_hash::rand_core::OsRng;

use crate::{
    dto::auth::{RegisterRequest, TokenRequest, TokenResponse},
    error::{AppError, AppResult},
    models::User,
    response::{ApiResponse, Meta},
    state::AppState,
    store::NewUser,
};

const USERNAME_MAX_CHARS: usize = 150;

fn username_taken() -> AppError {
    AppError::BadRequest("Username is already taken".to_string())
}

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();
    Ok(hash)
}

pub fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Username used when the client does not pick one: first and last name
/// concatenated as given.
pub fn derive_username(first_name: &str, last_name: &str) -> String {
    format!("{}{}", first_name.trim(), last_name.trim())
}

pub async fn register_user(
    state: &AppState,
    payload: RegisterRequest,
) -> AppResult<ApiResponse<User>> {
    let RegisterRequest {
        username,
        first_name,
        last_name,
        email,
        sex,
        role,
        password,
    } = payload;

    let username = username.unwrap_or_else(|| derive_username(&first_name, &last_name));
    if username.is_empty() {
        return Err(AppError::field(
            "username",
            "required when first_name and last_name are empty",
        ));
    }
    if username.chars().count() > USERNAME_MAX_CHARS {
        return Err(AppError::field("username", "must be 1 to 150 characters"));
    }

    if state.store.find_user_by_username(&username).await?.is_some() {
        return Err(username_taken());
    }

    let password_hash = hash_password(&password)?;
    let user = state
        .store
        .insert_user(NewUser {
            username,
            email,
            first_name,
            last_name,
            password_hash,
            sex,
            role,
        })
        .await
        .map_err(|err| match err {
            // A concurrent registration won the unique index.
            AppError::Conflict(_) => username_taken(),
            other => other,
        })?;

    tracing::info!(user = %user.uuid, role = ?user.role, "user registered");
    Ok(ApiResponse::success("User created", user, None))
}

pub async fn obtain_token(
    state: &AppState,
    payload: TokenRequest,
) -> AppResult<ApiResponse<TokenResponse>> {
    let TokenRequest { username, password } = payload;
    let user = match state.store.find_user_by_username(&username).await? {
        Some(u) => u,
        None => return Err(AppError::Unauthorized),
    };

    if !verify_password(&password, &user.password_hash)? {
        tracing::info!(user = %user.uuid, "token request with wrong password");
        return Err(AppError::Unauthorized);
    }

    let token = state.tokens.issue(&user)?;
    tracing::info!(user = %user.uuid, "token issued");

    Ok(ApiResponse::success(
        "Token issued",
        TokenResponse { token },
        Some(Meta::empty()),
    ))
}
