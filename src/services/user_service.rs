use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth;
use crate::database::manager::DatabaseManager;
use crate::database::models::{User, ROLE_USER};
use crate::database::repositories::{NewUser, UserRepository};
use crate::error::ApiError;
use crate::validation;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterUserRequest {
    #[validate(length(min = 3, max = 100, message = "username must be 3-100 characters"))]
    pub username: String,
    #[validate(
        length(min = 6, max = 100, message = "password must be 6-100 characters"),
        custom(function = crate::validation::password_strength)
    )]
    pub password: String,
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: String,
    #[validate(email(message = "email must be a valid email address"))]
    pub email: String,
    #[validate(
        length(min = 1, max = 20, message = "phone must be 1-20 characters"),
        custom(function = crate::validation::phone_format)
    )]
    pub phone: String,
    #[validate(length(min = 1, max = 255, message = "address must be 1-255 characters"))]
    pub address: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginUserRequest {
    #[validate(length(min = 1, max = 100, message = "username must be 1-100 characters"))]
    pub username: String,
    #[validate(length(min = 1, max = 100, message = "password must be 1-100 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserProfileRequest {
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: Option<String>,
    #[validate(email(message = "email must be a valid email address"))]
    pub email: Option<String>,
    #[validate(
        length(min = 1, max = 20, message = "phone must be 1-20 characters"),
        custom(function = crate::validation::phone_format)
    )]
    pub phone: Option<String>,
    #[validate(length(min = 1, max = 255, message = "address must be 1-255 characters"))]
    pub address: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserPasswordRequest {
    #[validate(length(min = 6, max = 100, message = "old_password must be 6-100 characters"))]
    pub old_password: String,
    #[validate(
        length(min = 6, max = 100, message = "new_password must be 6-100 characters"),
        custom(function = crate::validation::password_strength)
    )]
    pub new_password: String,
}

/// Public user shape; the password hash and role never leave the service.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub username: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            username: user.username,
            name: user.name,
            email: user.email,
            phone: user.phone,
            address: user.address,
            token: user.token,
        }
    }
}

pub struct UserService {
    users: UserRepository,
}

impl UserService {
    pub async fn new() -> Result<Self, ApiError> {
        let pool = DatabaseManager::pool().await?;
        Ok(Self {
            users: UserRepository::new(pool),
        })
    }

    /// Register a new account, then log it straight in so the response
    /// already carries a session token.
    pub async fn register(&self, request: RegisterUserRequest) -> Result<UserResponse, ApiError> {
        tracing::debug!("Registering new user {}", request.username);
        validation::validate(&request)?;

        if self
            .users
            .find_by_username(&request.username)
            .await?
            .is_some()
        {
            return Err(ApiError::conflict("Username already exists"));
        }

        if self.users.find_by_email(&request.email).await?.is_some() {
            return Err(ApiError::conflict("Email already exists"));
        }

        let password_hash = auth::hash_password(&request.password)?;
        let user = self
            .users
            .create(&NewUser {
                username: &request.username,
                password: &password_hash,
                name: &request.name,
                email: &request.email,
                phone: &request.phone,
                address: request.address.as_deref(),
                role: ROLE_USER,
            })
            .await?;

        self.login(LoginUserRequest {
            username: user.username,
            password: request.password,
        })
        .await
    }

    /// Verify credentials and mint a fresh session token, invalidating
    /// whatever token was stored before.
    pub async fn login(&self, request: LoginUserRequest) -> Result<UserResponse, ApiError> {
        tracing::debug!("Login attempt for {}", request.username);
        validation::validate(&request)?;

        let user = self
            .users
            .find_by_username(&request.username)
            .await?
            .ok_or_else(|| ApiError::unauthorized("Invalid username or password"))?;

        auth::verify_password(&request.password, &user.password)?;

        let token = auth::mint_token();
        let user = self.users.set_token(&user.username, Some(&token)).await?;

        Ok(UserResponse::from(user))
    }

    pub fn current(&self, user: &User) -> UserResponse {
        UserResponse::from(user.clone())
    }

    pub async fn update_profile(
        &self,
        username: &str,
        request: UpdateUserProfileRequest,
    ) -> Result<UserResponse, ApiError> {
        tracing::debug!("Updating profile for {}", username);
        validation::validate(&request)?;

        if let Some(email) = &request.email {
            if let Some(existing) = self.users.find_by_email(email).await? {
                if existing.username != username {
                    return Err(ApiError::conflict("Email already exists"));
                }
            }
        }

        let user = self
            .users
            .update_profile(
                username,
                request.name.as_deref(),
                request.email.as_deref(),
                request.phone.as_deref(),
                request.address.as_deref(),
            )
            .await?;

        Ok(UserResponse::from(user))
    }

    /// Change the password after the caller proves knowledge of the current
    /// one. The mismatch case is 401, distinct from validation failures.
    pub async fn update_password(
        &self,
        user: &User,
        request: UpdateUserPasswordRequest,
    ) -> Result<UserResponse, ApiError> {
        tracing::debug!("Updating password for {}", user.username);
        validation::validate(&request)?;

        auth::verify_password(&request.old_password, &user.password)
            .map_err(|_| ApiError::unauthorized("Invalid old password"))?;

        let password_hash = auth::hash_password(&request.new_password)?;
        let updated = self.users.set_password(&user.username, &password_hash).await?;

        Ok(UserResponse::from(updated))
    }

    pub async fn logout(&self, username: &str) -> Result<(), ApiError> {
        tracing::debug!("Logging out {}", username);
        self.users.set_token(username, None).await?;
        Ok(())
    }
}
