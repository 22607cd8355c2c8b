/// Staff user endpoints, admin only. Responses carry the `UserView`
/// projection; the password hash never leaves the db layer.
use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::auth::{self, AuthUser};
use crate::db::models::{CreateUserRequest, Role, UserView};
use crate::db::{Database, DbPool};
use crate::error::ApiError;

/// List all users
/// GET /api/users
pub async fn list_users(
    pool: web::Data<DbPool>,
    user: AuthUser,
) -> Result<HttpResponse, ApiError> {
    user.require_admin()?;

    let users: Vec<UserView> = Database::list_users(&pool)
        .await?
        .into_iter()
        .map(UserView::from)
        .collect();

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": users,
    })))
}

/// Create a new staff user (admin/manager)
/// POST /api/users
pub async fn create_user(
    pool: web::Data<DbPool>,
    auth_user: AuthUser,
    req: web::Json<CreateUserRequest>,
) -> Result<HttpResponse, ApiError> {
    auth_user.require_admin()?;

    let (username, password, role_raw) = match (&req.username, &req.password, &req.role) {
        (Some(username), Some(password), Some(role))
            if !username.is_empty() && !password.is_empty() && !role.is_empty() =>
        {
            (username, password, role)
        }
        _ => return Err(ApiError::Validation("Все поля обязательны".to_string())),
    };

    let role = Role::from_str(role_raw).ok_or_else(|| {
        ApiError::Validation("Роль должна быть admin или manager".to_string())
    })?;

    if Database::find_user_by_username(&pool, username)
        .await?
        .is_some()
    {
        return Err(ApiError::Validation(
            "Пользователь с таким логином уже существует".to_string(),
        ));
    }

    let password_hash = auth::hash_password(password)?;
    let user = Database::insert_user(&pool, username, &password_hash, role).await?;

    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "data": UserView::from(user),
    })))
}
