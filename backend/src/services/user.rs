//! User service for authentication and user management
//!
//! Password hashing and verification run on the blocking thread pool;
//! the JWT service is passed by reference with its keys pre-computed.

use crate::auth::{JwtService, PasswordService};
use crate::error::ApiError;
use crate::repositories::{unique_violation, CreateUser, UserProfileRecord, UserRepository};
use foodgram_shared::types::{
    AuthTokens, Page, PageWindow, RegisterRequest, RegisteredUser, SetPasswordRequest,
    UserResponse,
};
use foodgram_shared::validation::{validate_email, validate_password, validate_username};
use foodgram_shared::{AuthError, Role};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

impl From<UserProfileRecord> for UserResponse {
    fn from(record: UserProfileRecord) -> Self {
        UserResponse {
            email: record.email,
            id: record.id,
            username: record.username,
            first_name: record.first_name,
            last_name: record.last_name,
            is_subscribed: record.is_subscribed,
        }
    }
}

/// User service for authentication operations
pub struct UserService;

impl UserService {
    /// Register a new user
    pub async fn register(pool: &PgPool, req: &RegisterRequest) -> Result<RegisteredUser, ApiError> {
        req.validate()?;

        let email = req.email.trim();
        let username = req.username.trim();
        validate_email(email).map_err(|msg| ApiError::field("email", msg))?;
        validate_username(username).map_err(|msg| ApiError::field("username", msg))?;
        validate_password(&req.password).map_err(|msg| ApiError::field("password", msg))?;

        if UserRepository::username_exists(pool, username)
            .await
            .map_err(ApiError::Internal)?
        {
            return Err(ApiError::field(
                "username",
                "A user with that username already exists",
            ));
        }
        if UserRepository::email_exists(pool, email)
            .await
            .map_err(ApiError::Internal)?
        {
            return Err(ApiError::field("email", "A user with that email already exists"));
        }

        let password_hash = PasswordService::hash_async(req.password.clone())
            .await
            .map_err(ApiError::Internal)?;

        let input = CreateUser {
            email: email.to_string(),
            username: username.to_string(),
            first_name: req.first_name.trim().to_string(),
            last_name: req.last_name.trim().to_string(),
            password_hash,
            role: Role::User,
        };

        let user = UserRepository::create(pool, &input)
            .await
            .map_err(|err| match unique_violation(&err).as_deref() {
                Some("users_email_key") => {
                    ApiError::field("email", "A user with that email already exists")
                }
                Some(_) => ApiError::field("username", "A user with that username already exists"),
                None => ApiError::Internal(err),
            })?;

        info!(user_id = %user.id, "User registered");

        Ok(RegisteredUser {
            email: user.email,
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
        })
    }

    /// Login with email and password
    ///
    /// Unknown email and wrong password are indistinguishable to the caller.
    pub async fn login(
        pool: &PgPool,
        jwt_service: &JwtService,
        email: &str,
        password: &str,
    ) -> Result<AuthTokens, ApiError> {
        let rejected = || ApiError::Validation(AuthError::InvalidCredentials.to_string());

        let user = UserRepository::find_by_email(pool, email.trim())
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(rejected)?;

        let valid = PasswordService::verify_async(password.to_string(), user.password_hash.clone())
            .await
            .map_err(ApiError::Internal)?;

        if !valid {
            return Err(rejected());
        }

        info!(user_id = %user.id, role = %user.role(), "User logged in");
        Self::issue_tokens(jwt_service, user.id)
    }

    /// Exchange a refresh token for a fresh token pair
    pub async fn refresh_token(
        pool: &PgPool,
        jwt_service: &JwtService,
        refresh_token: &str,
    ) -> Result<AuthTokens, ApiError> {
        let claims = jwt_service
            .validate_refresh_token(refresh_token)
            .map_err(|e| ApiError::Unauthorized(format!("Invalid refresh token: {}", e)))?;

        let user_id = claims
            .user_id()
            .map_err(|e| ApiError::Unauthorized(e.to_string()))?;

        // The account may have been removed since the token was issued
        UserRepository::find_by_id(pool, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::Unauthorized("User not found".to_string()))?;

        Self::issue_tokens(jwt_service, user_id)
    }

    fn issue_tokens(jwt_service: &JwtService, user_id: Uuid) -> Result<AuthTokens, ApiError> {
        let access_token = jwt_service
            .generate_access_token(user_id)
            .map_err(ApiError::Internal)?;
        let refresh_token = jwt_service
            .generate_refresh_token(user_id)
            .map_err(ApiError::Internal)?;

        Ok(AuthTokens {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: jwt_service.access_token_expiry_secs(),
        })
    }

    /// Paginated list of all users
    pub async fn list(
        pool: &PgPool,
        viewer: Option<Uuid>,
        window: PageWindow,
    ) -> Result<Page<UserResponse>, ApiError> {
        let (users, count) =
            UserRepository::list_profiles(pool, viewer, window.limit, window.offset())
                .await
                .map_err(ApiError::Internal)?;

        Ok(Page::new(
            users.into_iter().map(UserResponse::from).collect(),
            count,
            window,
        ))
    }

    /// A single user as seen by `viewer`
    pub async fn get(
        pool: &PgPool,
        user_id: Uuid,
        viewer: Option<Uuid>,
    ) -> Result<UserResponse, ApiError> {
        UserRepository::find_profile(pool, user_id, viewer)
            .await
            .map_err(ApiError::Internal)?
            .map(UserResponse::from)
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
    }

    /// Change the caller's password after checking the current one
    pub async fn set_password(
        pool: &PgPool,
        user_id: Uuid,
        req: &SetPasswordRequest,
    ) -> Result<(), ApiError> {
        req.validate()?;
        validate_password(&req.new_password).map_err(|msg| ApiError::field("new_password", msg))?;

        let user = UserRepository::find_by_id(pool, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        let valid =
            PasswordService::verify_async(req.current_password.clone(), user.password_hash.clone())
                .await
                .map_err(ApiError::Internal)?;
        if !valid {
            return Err(ApiError::field("current_password", "Invalid password"));
        }

        let password_hash = PasswordService::hash_async(req.new_password.clone())
            .await
            .map_err(ApiError::Internal)?;

        UserRepository::update_password(pool, user_id, &password_hash)
            .await
            .map_err(ApiError::Internal)?;

        info!(user_id = %user_id, "Password changed");
        Ok(())
    }
}
