// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Tastebook

//! User endpoints: account lifecycle, credentials and subscriptions.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::CookieJar;

use crate::{
    auth::{
        cookies::{self, ACCESS_COOKIE, REFRESH_COOKIE},
        password, Auth, TokenKind,
    },
    error::ApiError,
    models::{
        validate_email, validate_nickname, validate_password, EmailAvailabilityRequest,
        MessageResponse, NicknameAvailabilityRequest, ProfileResponse, SigninRequest,
        SignupRequest, UpdateProfileRequest,
    },
    state::AppState,
    storage::{StoreError, StoredUser},
};

/// Single rejection for any credential failure, so a caller cannot probe
/// which part was wrong.
const SIGNIN_REJECTION: &str = "Invalid email or password.";

/// Register a new account.
#[utoipa::path(
    post,
    path = "/users/signup",
    request_body = SignupRequest,
    tag = "Users",
    responses(
        (status = 201, description = "Account created", body = MessageResponse),
        (status = 400, description = "Invalid format or duplicate email/nickname", body = MessageResponse),
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    validate_email(&request.email).map_err(ApiError::bad_request)?;
    validate_nickname(&request.nickname).map_err(ApiError::bad_request)?;
    validate_password(&request.password).map_err(ApiError::bad_request)?;

    let hash = password::hash_password(&request.password)
        .map_err(|_| ApiError::internal("Internal server error."))?;

    let mut users = state.users.write().await;
    users
        .create(StoredUser::new(request.email, request.nickname, hash))
        .map_err(|e| match e {
            StoreError::EmailTaken => ApiError::bad_request("This email is already in use."),
            StoreError::NicknameTaken => ApiError::bad_request("This nickname is already in use."),
            other => {
                tracing::error!(error = %other, "signup failed");
                ApiError::internal("Internal server error.")
            }
        })?;

    tracing::info!("account created");
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("signup success")),
    ))
}

/// Sign in and receive both session cookies.
#[utoipa::path(
    post,
    path = "/users/signin",
    request_body = SigninRequest,
    tag = "Users",
    responses(
        (status = 200, description = "Signed in; access and refresh cookies set", body = MessageResponse),
        (status = 401, description = "Unknown email or wrong password", body = MessageResponse),
    )
)]
pub async fn signin(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<SigninRequest>,
) -> Result<(CookieJar, Json<MessageResponse>), ApiError> {
    let user = state.users.read().await.find_by_email(&request.email);

    let Some(user) = user else {
        return Err(ApiError::unauthorized(SIGNIN_REJECTION));
    };
    if !password::verify_password(&request.password, &user.password_hash) {
        return Err(ApiError::unauthorized(SIGNIN_REJECTION));
    }

    let access = state
        .tokens
        .issue(&user.id, TokenKind::Access)
        .map_err(|_| ApiError::internal("Internal server error."))?;
    let refresh = state
        .tokens
        .issue(&user.id, TokenKind::Refresh)
        .map_err(|_| ApiError::internal("Internal server error."))?;

    let jar = jar
        .add(cookies::access_cookie(access))
        .add(cookies::refresh_cookie(refresh));

    Ok((jar, Json(MessageResponse::new("signin success"))))
}

/// Clear both session cookies. Safe to call when already signed out.
#[utoipa::path(
    post,
    path = "/users/signout",
    tag = "Users",
    responses((status = 200, description = "Cookies cleared", body = MessageResponse))
)]
pub async fn signout(jar: CookieJar) -> (CookieJar, Json<MessageResponse>) {
    let jar = jar
        .remove(cookies::removal(ACCESS_COOKIE))
        .remove(cookies::removal(REFRESH_COOKIE));
    (jar, Json(MessageResponse::new("signout success")))
}

/// Delete the authenticated account and prune it from every other user's
/// relation sets.
#[utoipa::path(
    delete,
    path = "/users",
    tag = "Users",
    responses(
        (status = 200, description = "Account deleted; cookies cleared", body = MessageResponse),
        (status = 401, description = "Not authenticated", body = MessageResponse),
    )
)]
pub async fn delete_account(
    Auth(user): Auth,
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<MessageResponse>), ApiError> {
    state
        .users
        .write()
        .await
        .delete(&user.user_id)
        .map_err(|e| match e {
            StoreError::NotFound(_) => ApiError::unauthorized("Account no longer exists."),
            other => {
                tracing::error!(error = %other, "account deletion failed");
                ApiError::internal("Internal server error.")
            }
        })?;

    tracing::info!(user_id = %user.user_id, "account deleted");
    let jar = jar
        .remove(cookies::removal(ACCESS_COOKIE))
        .remove(cookies::removal(REFRESH_COOKIE));
    Ok((jar, Json(MessageResponse::new("account deleted"))))
}

/// Public profile for a nickname.
#[utoipa::path(
    get,
    path = "/users/{nickname}",
    params(("nickname" = String, Path, description = "Nickname of the user to look up")),
    tag = "Users",
    responses(
        (status = 200, description = "Public profile", body = ProfileResponse),
        (status = 404, description = "No such user", body = MessageResponse),
    )
)]
pub async fn get_profile(
    State(state): State<AppState>,
    Path(nickname): Path<String>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let users = state.users.read().await;
    let user = users
        .find_by_nickname(&nickname)
        .ok_or_else(|| ApiError::not_found("User not found."))?;

    Ok(Json(ProfileResponse {
        subscribers: users.nicknames(&user.subscribers),
        subscriptions: users.nicknames(&user.subscriptions),
        nickname: user.nickname,
        created_at: user.created_at,
    }))
}

/// Update the authenticated user's nickname and/or password.
#[utoipa::path(
    patch,
    path = "/users",
    request_body = UpdateProfileRequest,
    tag = "Users",
    responses(
        (status = 200, description = "Profile updated", body = MessageResponse),
        (status = 400, description = "Invalid format, duplicate nickname or empty update", body = MessageResponse),
        (status = 401, description = "Not authenticated", body = MessageResponse),
    )
)]
pub async fn update_profile(
    Auth(user): Auth,
    State(state): State<AppState>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    if request.nickname.is_none() && request.password.is_none() {
        return Err(ApiError::bad_request("Nothing to update."));
    }

    if let Some(ref nickname) = request.nickname {
        validate_nickname(nickname).map_err(ApiError::bad_request)?;
    }

    let hash = match request.password {
        Some(ref plaintext) => {
            validate_password(plaintext).map_err(ApiError::bad_request)?;
            Some(
                password::hash_password(plaintext)
                    .map_err(|_| ApiError::internal("Internal server error."))?,
            )
        }
        None => None,
    };

    state
        .users
        .write()
        .await
        .update_profile(&user.user_id, request.nickname, hash)
        .map_err(|e| match e {
            StoreError::NicknameTaken => ApiError::bad_request("This nickname is already in use."),
            StoreError::NotFound(_) => ApiError::unauthorized("Account no longer exists."),
            other => {
                tracing::error!(error = %other, "profile update failed");
                ApiError::internal("Internal server error.")
            }
        })?;

    Ok(Json(MessageResponse::new("profile updated")))
}

/// Follow another user.
#[utoipa::path(
    post,
    path = "/users/subscribe/{nickname}",
    params(("nickname" = String, Path, description = "Nickname of the user to follow")),
    tag = "Users",
    responses(
        (status = 200, description = "Subscribed (idempotent)", body = MessageResponse),
        (status = 400, description = "Attempted to subscribe to oneself", body = MessageResponse),
        (status = 404, description = "No such user", body = MessageResponse),
    )
)]
pub async fn subscribe(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(nickname): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .users
        .write()
        .await
        .subscribe(&user.user_id, &nickname)
        .map_err(|e| match e {
            StoreError::SelfSubscribe => {
                ApiError::bad_request("You cannot subscribe to yourself.")
            }
            StoreError::NotFound(_) => ApiError::not_found("User not found."),
            other => {
                tracing::error!(error = %other, "subscribe failed");
                ApiError::internal("Internal server error.")
            }
        })?;

    Ok(Json(MessageResponse::new("subscribe success")))
}

/// Unfollow another user.
#[utoipa::path(
    post,
    path = "/users/unsubscribe/{nickname}",
    params(("nickname" = String, Path, description = "Nickname of the user to unfollow")),
    tag = "Users",
    responses(
        (status = 200, description = "Unsubscribed (no-op if not subscribed)", body = MessageResponse),
        (status = 404, description = "No such user", body = MessageResponse),
    )
)]
pub async fn unsubscribe(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(nickname): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .users
        .write()
        .await
        .unsubscribe(&user.user_id, &nickname)
        .map_err(|e| match e {
            StoreError::NotFound(_) => ApiError::not_found("User not found."),
            other => {
                tracing::error!(error = %other, "unsubscribe failed");
                ApiError::internal("Internal server error.")
            }
        })?;

    Ok(Json(MessageResponse::new("unsubscribe success")))
}

/// Check whether a nickname is free.
///
/// A positive answer can race a concurrent signup; uniqueness is enforced
/// again when the signup commits.
#[utoipa::path(
    post,
    path = "/users/nickname",
    request_body = NicknameAvailabilityRequest,
    tag = "Users",
    responses(
        (status = 200, description = "Nickname is available", body = MessageResponse),
        (status = 400, description = "Invalid or taken nickname", body = MessageResponse),
    )
)]
pub async fn nickname_availability(
    State(state): State<AppState>,
    Json(request): Json<NicknameAvailabilityRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    validate_nickname(&request.nickname).map_err(ApiError::bad_request)?;

    if state.users.read().await.nickname_taken(&request.nickname) {
        return Err(ApiError::bad_request("This nickname is already in use."));
    }

    Ok(Json(MessageResponse::new("This nickname is available.")))
}

/// Check whether an email is free.
#[utoipa::path(
    post,
    path = "/users/email",
    request_body = EmailAvailabilityRequest,
    tag = "Users",
    responses(
        (status = 200, description = "Email is available", body = MessageResponse),
        (status = 400, description = "Invalid or taken email", body = MessageResponse),
    )
)]
pub async fn email_availability(
    State(state): State<AppState>,
    Json(request): Json<EmailAvailabilityRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    validate_email(&request.email).map_err(ApiError::bad_request)?;

    if state.users.read().await.email_taken(&request.email) {
        return Err(ApiError::bad_request("This email is already in use."));
    }

    Ok(Json(MessageResponse::new("This email is available.")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthenticatedUser;
    use axum::http::StatusCode;

    fn auth_as(user_id: &str) -> Auth {
        Auth(AuthenticatedUser {
            user_id: user_id.to_string(),
            expires_at: 0,
        })
    }

    async fn signup_user(state: &AppState, email: &str, nickname: &str) -> String {
        let (status, _) = signup(
            State(state.clone()),
            Json(SignupRequest {
                email: email.to_string(),
                nickname: nickname.to_string(),
                password: "abcd1234".to_string(),
            }),
        )
        .await
        .expect("signup succeeds");
        assert_eq!(status, StatusCode::CREATED);

        state.users.read().await.find_by_email(email).unwrap().id
    }

    #[tokio::test]
    async fn signup_rejects_duplicates() {
        let state = AppState::default();
        signup_user(&state, "a@x.com", "nick1").await;

        let err = signup(
            State(state.clone()),
            Json(SignupRequest {
                email: "a@x.com".to_string(),
                nickname: "nick2".to_string(),
                password: "zxy98765".to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "This email is already in use.");

        let err = signup(
            State(state.clone()),
            Json(SignupRequest {
                email: "b@x.com".to_string(),
                nickname: "nick1".to_string(),
                password: "zxy98765".to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "This nickname is already in use.");
    }

    #[tokio::test]
    async fn signup_rejects_invalid_formats_before_storage() {
        let state = AppState::default();

        for (email, nickname, password) in [
            ("not-an-email", "nick1", "abcd1234"),
            ("a@x.com", "n", "abcd1234"),
            ("a@x.com", "nick1", "short1"),
            ("a@x.com", "nick1", "NoUpperAllowed1"),
        ] {
            let err = signup(
                State(state.clone()),
                Json(SignupRequest {
                    email: email.to_string(),
                    nickname: nickname.to_string(),
                    password: password.to_string(),
                }),
            )
            .await
            .unwrap_err();
            assert_eq!(err.status, StatusCode::BAD_REQUEST);
        }

        assert!(!state.users.read().await.email_taken("a@x.com"));
    }

    #[tokio::test]
    async fn signin_sets_both_cookies_for_the_right_user() {
        let state = AppState::default();
        let user_id = signup_user(&state, "a@x.com", "nick1").await;

        let (jar, _) = signin(
            State(state.clone()),
            CookieJar::new(),
            Json(SigninRequest {
                email: "a@x.com".to_string(),
                password: "abcd1234".to_string(),
            }),
        )
        .await
        .expect("signin succeeds");

        let access = jar.get(ACCESS_COOKIE).expect("access cookie");
        let refresh = jar.get(REFRESH_COOKIE).expect("refresh cookie");

        let claims = state
            .tokens
            .verify(access.value(), TokenKind::Access)
            .unwrap();
        assert_eq!(claims.sub, user_id);
        let claims = state
            .tokens
            .verify(refresh.value(), TokenKind::Refresh)
            .unwrap();
        assert_eq!(claims.sub, user_id);
    }

    #[tokio::test]
    async fn signin_failure_is_uniform() {
        let state = AppState::default();
        signup_user(&state, "a@x.com", "nick1").await;

        let unknown_email = signin(
            State(state.clone()),
            CookieJar::new(),
            Json(SigninRequest {
                email: "b@x.com".to_string(),
                password: "abcd1234".to_string(),
            }),
        )
        .await
        .unwrap_err();

        let wrong_password = signin(
            State(state.clone()),
            CookieJar::new(),
            Json(SigninRequest {
                email: "a@x.com".to_string(),
                password: "abcd9999".to_string(),
            }),
        )
        .await
        .unwrap_err();

        assert_eq!(unknown_email.status, StatusCode::UNAUTHORIZED);
        assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
        assert_eq!(unknown_email.message, wrong_password.message);
    }

    #[tokio::test]
    async fn signout_is_idempotent() {
        let (jar, Json(body)) = signout(CookieJar::new()).await;
        assert_eq!(body.message, "signout success");

        // Calling again on the already-cleared jar still succeeds.
        let (_, Json(body)) = signout(jar).await;
        assert_eq!(body.message, "signout success");
    }

    #[tokio::test]
    async fn subscribe_then_unsubscribe_restores_relations() {
        let state = AppState::default();
        let a = signup_user(&state, "a@x.com", "alpha").await;
        let b = signup_user(&state, "b@x.com", "beta").await;

        subscribe(auth_as(&a), State(state.clone()), Path("beta".to_string()))
            .await
            .expect("subscribe succeeds");

        {
            let users = state.users.read().await;
            assert!(users.find_by_id(&a).unwrap().subscriptions.contains(&b));
            assert!(users.find_by_id(&b).unwrap().subscribers.contains(&a));
        }

        unsubscribe(auth_as(&a), State(state.clone()), Path("beta".to_string()))
            .await
            .expect("unsubscribe succeeds");

        let users = state.users.read().await;
        assert!(users.find_by_id(&a).unwrap().subscriptions.is_empty());
        assert!(users.find_by_id(&b).unwrap().subscribers.is_empty());
    }

    #[tokio::test]
    async fn subscribe_to_self_is_rejected() {
        let state = AppState::default();
        let a = signup_user(&state, "a@x.com", "alpha").await;

        let err = subscribe(auth_as(&a), State(state.clone()), Path("alpha".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn subscribe_unknown_nickname_is_404() {
        let state = AppState::default();
        let a = signup_user(&state, "a@x.com", "alpha").await;

        let err = subscribe(auth_as(&a), State(state.clone()), Path("ghost".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_account_prunes_relations() {
        let state = AppState::default();
        let a = signup_user(&state, "a@x.com", "alpha").await;
        let b = signup_user(&state, "b@x.com", "beta").await;
        subscribe(auth_as(&b), State(state.clone()), Path("alpha".to_string()))
            .await
            .unwrap();

        let (_jar, Json(body)) = delete_account(auth_as(&a), State(state.clone()), CookieJar::new())
            .await
            .expect("account deletion succeeds");
        assert_eq!(body.message, "account deleted");

        let users = state.users.read().await;
        assert!(users.find_by_id(&a).is_none());
        assert!(users.find_by_id(&b).unwrap().subscriptions.is_empty());
    }

    #[tokio::test]
    async fn get_profile_resolves_relation_nicknames() {
        let state = AppState::default();
        let a = signup_user(&state, "a@x.com", "alpha").await;
        signup_user(&state, "b@x.com", "beta").await;
        subscribe(auth_as(&a), State(state.clone()), Path("beta".to_string()))
            .await
            .unwrap();

        let Json(profile) = get_profile(State(state.clone()), Path("alpha".to_string()))
            .await
            .expect("profile lookup succeeds");
        assert_eq!(profile.nickname, "alpha");
        assert_eq!(profile.subscriptions, vec!["beta".to_string()]);
        assert!(profile.subscribers.is_empty());

        let Json(profile) = get_profile(State(state.clone()), Path("beta".to_string()))
            .await
            .unwrap();
        assert_eq!(profile.subscribers, vec!["alpha".to_string()]);
    }

    #[tokio::test]
    async fn get_profile_unknown_nickname_is_404() {
        let state = AppState::default();
        let err = get_profile(State(state), Path("ghost".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn update_profile_changes_nickname_and_password() {
        let state = AppState::default();
        let a = signup_user(&state, "a@x.com", "alpha").await;

        update_profile(
            auth_as(&a),
            State(state.clone()),
            Json(UpdateProfileRequest {
                nickname: Some("omega".to_string()),
                password: Some("newpass99".to_string()),
            }),
        )
        .await
        .expect("profile update succeeds");

        let user = state.users.read().await.find_by_id(&a).unwrap();
        assert_eq!(user.nickname, "omega");
        assert!(password::verify_password("newpass99", &user.password_hash));
    }

    #[tokio::test]
    async fn update_profile_with_no_fields_is_rejected() {
        let state = AppState::default();
        let a = signup_user(&state, "a@x.com", "alpha").await;

        let err = update_profile(
            auth_as(&a),
            State(state.clone()),
            Json(UpdateProfileRequest::default()),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn availability_probes_report_taken_and_free() {
        let state = AppState::default();
        signup_user(&state, "a@x.com", "nick1").await;

        assert!(nickname_availability(
            State(state.clone()),
            Json(NicknameAvailabilityRequest {
                nickname: "fresh".to_string()
            }),
        )
        .await
        .is_ok());

        let err = nickname_availability(
            State(state.clone()),
            Json(NicknameAvailabilityRequest {
                nickname: "nick1".to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);

        assert!(email_availability(
            State(state.clone()),
            Json(EmailAvailabilityRequest {
                email: "b@x.com".to_string()
            }),
        )
        .await
        .is_ok());

        let err = email_availability(
            State(state.clone()),
            Json(EmailAvailabilityRequest {
                email: "a@x.com".to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }
}
