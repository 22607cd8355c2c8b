/// Branch registry endpoints: public listing, admin create/delete.
use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::auth::AuthUser;
use crate::db::models::CreateBranchRequest;
use crate::db::{Database, DbPool};
use crate::error::ApiError;

/// List all branches ordered by name
/// GET /api/branches
pub async fn list_branches(pool: web::Data<DbPool>) -> Result<HttpResponse, ApiError> {
    let branches = Database::list_branches(&pool).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": branches,
    })))
}

/// Create a new branch
/// POST /api/branches
pub async fn create_branch(
    pool: web::Data<DbPool>,
    user: AuthUser,
    req: web::Json<CreateBranchRequest>,
) -> Result<HttpResponse, ApiError> {
    user.require_admin()?;

    let name = req.name.as_deref().unwrap_or("").trim().to_string();
    if name.is_empty() {
        return Err(ApiError::Validation(
            "Название филиала обязательно".to_string(),
        ));
    }

    // Check-then-insert is not atomic; the UNIQUE constraint on the
    // name column catches the losing side of a concurrent create.
    if Database::find_branch_by_name(&pool, &name).await?.is_some() {
        return Err(ApiError::Validation(
            "Филиал с таким названием уже существует".to_string(),
        ));
    }

    let branch = Database::insert_branch(&pool, &name).await?;

    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "data": branch,
    })))
}

/// Delete a branch by id
/// DELETE /api/branches/{id}
pub async fn delete_branch(
    pool: web::Data<DbPool>,
    user: AuthUser,
    id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    user.require_admin()?;

    if !Database::delete_branch(&pool, &id).await? {
        return Err(ApiError::NotFound("Филиал не найден".to_string()));
    }

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Филиал удален",
    })))
}
