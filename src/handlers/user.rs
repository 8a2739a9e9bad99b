// /api/user handlers: registration, session management and self-service
// profile updates. Registration and login are the only public writes.
use crate::middleware::{ApiResponse, ApiResult, Principal};
use crate::services::user_service::{
    LoginUserRequest, RegisterUserRequest, UpdateUserPasswordRequest, UpdateUserProfileRequest,
    UserResponse,
};
use crate::services::UserService;
use crate::validation::ValidJson;

/// POST /api/user/register
pub async fn register(ValidJson(request): ValidJson<RegisterUserRequest>) -> ApiResult<UserResponse> {
    let service = UserService::new().await?;
    let user = service.register(request).await?;
    Ok(ApiResponse::created(user))
}

/// POST /api/user/login
pub async fn login(ValidJson(request): ValidJson<LoginUserRequest>) -> ApiResult<UserResponse> {
    let service = UserService::new().await?;
    let user = service.login(request).await?;
    Ok(ApiResponse::success(user))
}

/// GET /api/user/current
pub async fn current(principal: Principal) -> ApiResult<UserResponse> {
    let service = UserService::new().await?;
    Ok(ApiResponse::success(service.current(&principal.user)))
}

/// PATCH /api/user/current
pub async fn update_profile(
    principal: Principal,
    ValidJson(request): ValidJson<UpdateUserProfileRequest>,
) -> ApiResult<UserResponse> {
    let service = UserService::new().await?;
    let user = service.update_profile(principal.username(), request).await?;
    Ok(ApiResponse::success(user))
}

/// PATCH /api/user/current/password
pub async fn update_password(
    principal: Principal,
    ValidJson(request): ValidJson<UpdateUserPasswordRequest>,
) -> ApiResult<UserResponse> {
    let service = UserService::new().await?;
    let user = service.update_password(&principal.user, request).await?;
    Ok(ApiResponse::success(user))
}

/// DELETE /api/user/current - logout
pub async fn logout(principal: Principal) -> ApiResult<bool> {
    let service = UserService::new().await?;
    service.logout(principal.username()).await?;
    Ok(ApiResponse::success(true))
}
