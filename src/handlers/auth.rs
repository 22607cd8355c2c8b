/// Login endpoint: credential verification and token issuance.
use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::auth::{self, AuthConfig};
use crate::db::models::{LoginRequest, UserView};
use crate::db::{Database, DbPool};
use crate::error::ApiError;

// Unknown username and wrong password must be indistinguishable.
fn invalid_credentials() -> ApiError {
    ApiError::Unauthorized("Неверные учетные данные".to_string())
}

/// Log in a staff user (admin/manager)
/// POST /api/auth/login
pub async fn login(
    pool: web::Data<DbPool>,
    config: web::Data<AuthConfig>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let user = match Database::find_user_by_username(&pool, &req.username).await? {
        Some(user) => user,
        None => return Err(invalid_credentials()),
    };

    if !auth::verify_password(&req.password, &user.password_hash)? {
        return Err(invalid_credentials());
    }

    let token = auth::generate_token(&user, &config.jwt_secret)?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "token": token,
        "user": UserView::from(user),
    })))
}
