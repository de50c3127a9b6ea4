use axum::{
    extract::{DefaultBodyLimit, FromRef, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post, put},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::{
        dto::{
            ConversationRequest, LoginRequest, MessageResponse, MutedConversationsResponse,
            PublicUser, SignupRequest, UpdateProfileRequest,
        },
        jwt::{clear_session_cookie, session_cookie, set_cookie_headers, AuthUser, JwtKeys},
        password::{hash_password, verify_password},
        repo_types::User,
    },
    error::AppError,
    media::{ext_for_mime, parse_data_uri},
    state::AppState,
};

const MIN_PASSWORD_LEN: usize = 6;

fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route(
            "/update-profile",
            put(update_profile).layer(DefaultBodyLimit::max(10 * 1024 * 1024)),
        )
        .route("/check", get(check_auth))
        .route("/mute-conversation", post(mute_conversation))
        .route("/unmute-conversation", post(unmute_conversation))
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    Json(mut payload): Json<SignupRequest>,
) -> Result<(StatusCode, HeaderMap, Json<PublicUser>), AppError> {
    payload.email = payload.email.trim().to_lowercase();
    let full_name = payload.full_name.trim().to_string();

    if full_name.is_empty() || payload.email.is_empty() || payload.password.is_empty() {
        return Err(AppError::validation("All fields are required"));
    }
    if payload.password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::validation(
            "Password must be at least 6 characters",
        ));
    }
    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(AppError::validation("Invalid email"));
    }

    if User::find_by_email(&state.db, &payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(AppError::conflict("Email already exists"));
    }

    let hash = hash_password(&payload.password)?;
    let user = User::create(&state.db, &payload.email, &hash, &full_name).await?;

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id)?;
    let headers = set_cookie_headers(&session_cookie(
        &token,
        keys.ttl,
        state.config.cookie_secure,
    ))?;

    info!(user_id = %user.id, email = %user.email, "user signed up");
    Ok((StatusCode::CREATED, headers, Json(PublicUser::from(user))))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<(HeaderMap, Json<PublicUser>), AppError> {
    payload.email = payload.email.trim().to_lowercase();

    // Same message for unknown email and wrong password.
    let user = User::find_by_email(&state.db, &payload.email)
        .await?
        .ok_or_else(|| {
            warn!(email = %payload.email, "login unknown email");
            AppError::auth("Invalid credentials")
        })?;

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(AppError::auth("Invalid credentials"));
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id)?;
    let headers = set_cookie_headers(&session_cookie(
        &token,
        keys.ttl,
        state.config.cookie_secure,
    ))?;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok((headers, Json(PublicUser::from(user))))
}

#[instrument(skip(state))]
pub async fn logout(
    State(state): State<AppState>,
) -> Result<(HeaderMap, Json<MessageResponse>), AppError> {
    let headers = set_cookie_headers(&clear_session_cookie(state.config.cookie_secure))?;
    Ok((
        headers,
        Json(MessageResponse {
            message: "Logged out successfully".into(),
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<User>, AppError> {
    let changes = payload.into_changes();
    if changes.is_empty() {
        return Err(AppError::validation("No profile fields to update"));
    }

    let profile_pic_url = match changes.profile_pic {
        Some(data_uri) => {
            let img = parse_data_uri(&data_uri)
                .ok_or_else(|| AppError::validation("Invalid image data"))?;
            let key = format!(
                "avatars/{}/{}.{}",
                user_id,
                Uuid::new_v4(),
                ext_for_mime(&img.content_type)
            );
            let url = state.media.upload(&key, img.bytes, &img.content_type).await?;
            Some(url)
        }
        None => None,
    };

    let user = User::update_profile(
        &state.db,
        user_id,
        profile_pic_url.as_deref(),
        changes.about.as_deref(),
        changes.full_name.as_deref(),
    )
    .await?;

    info!(user_id = %user.id, "profile updated");
    Ok(Json(user))
}

#[instrument(skip(state))]
pub async fn check_auth(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<User>, AppError> {
    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| {
            warn!(user_id = %user_id, "session refers to a missing user");
            AppError::unauthorized("User not found")
        })?;
    Ok(Json(user))
}

#[instrument(skip(state, payload))]
pub async fn mute_conversation(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<ConversationRequest>,
) -> Result<Json<MutedConversationsResponse>, AppError> {
    let conversation_user_id = payload
        .conversation_user_id
        .ok_or_else(|| AppError::validation("conversation_user_id is required"))?;

    let muted = User::mute_conversation(&state.db, user_id, conversation_user_id).await?;
    Ok(Json(MutedConversationsResponse {
        success: true,
        muted_conversations: muted,
    }))
}

#[instrument(skip(state, payload))]
pub async fn unmute_conversation(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<ConversationRequest>,
) -> Result<Json<MutedConversationsResponse>, AppError> {
    let conversation_user_id = payload
        .conversation_user_id
        .ok_or_else(|| AppError::validation("conversation_user_id is required"))?;

    let muted = User::unmute_conversation(&state.db, user_id, conversation_user_id).await?;
    Ok(Json(MutedConversationsResponse {
        success: true,
        muted_conversations: muted,
    }))
}

#[cfg(test)]
mod email_tests {
    use super::is_valid_email;

    #[test]
    fn accepts_ordinary_addresses() {
        assert!(is_valid_email("a@x.com"));
        assert!(is_valid_email("first.last@sub.domain.org"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("no-at-sign"));
        assert!(!is_valid_email("spaces in@x.com"));
        assert!(!is_valid_email("missing@tld"));
    }
}
