/// Complaint endpoints: public submission, authenticated listing,
/// admin triage, and the analytics aggregation.
use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::auth::AuthUser;
use crate::db::models::{
    CreateComplaintRequest, ListComplaintsQuery, Status, UpdateComplaintRequest,
};
use crate::db::{Database, DbPool};
use crate::error::ApiError;
use crate::query::{self, PageParams, SortKey};

/// Create a new complaint
/// POST /api/complaints
pub async fn create_complaint(
    pool: web::Data<DbPool>,
    req: web::Json<CreateComplaintRequest>,
) -> Result<HttpResponse, ApiError> {
    let complaint = Database::insert_complaint(
        &pool,
        &req.full_name,
        &req.branch,
        &req.problem,
        req.solution.as_deref(),
        req.contact.as_deref(),
        req.rating,
    )
    .await?;

    // Notify staff through the log; there is no push channel.
    let preview: String = complaint.problem.chars().take(50).collect();
    log::info!("New complaint from {}: {}...", complaint.branch, preview);

    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "data": complaint,
        "message": "Жалоба успешно отправлена",
    })))
}

/// List complaints with filtering, sorting, and pagination
/// GET /api/complaints
pub async fn list_complaints(
    pool: web::Data<DbPool>,
    _user: AuthUser,
    params: web::Query<ListComplaintsQuery>,
) -> Result<HttpResponse, ApiError> {
    let status = params
        .status
        .as_deref()
        .map(|raw| {
            Status::from_str(raw)
                .ok_or_else(|| ApiError::Validation(format!("Недопустимый статус: {raw}")))
        })
        .transpose()?;

    // Equality filters are pushed into the store; ordering and
    // windowing happen in memory over the fetched set.
    let mut complaints = Database::query_complaints(&pool, params.branch.as_deref(), status).await?;

    let sort = SortKey::from_param(params.sort.as_deref());
    query::sort_complaints(&mut complaints, sort);

    let page_params = PageParams::resolve(params.page.as_deref(), params.limit.as_deref());
    let page = query::paginate(complaints, &page_params);

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "count": page.count(),
        "total": page.total,
        "page": page.page,
        "totalPages": page.total_pages,
        "data": page.items,
    })))
}

/// Update complaint status and/or admin comment
/// PATCH /api/complaints/{id}
pub async fn update_complaint(
    pool: web::Data<DbPool>,
    user: AuthUser,
    id: web::Path<String>,
    req: web::Json<UpdateComplaintRequest>,
) -> Result<HttpResponse, ApiError> {
    user.require_admin()?;

    let updated =
        Database::update_complaint(&pool, &id, req.status, req.admin_comment.as_deref()).await?;

    match updated {
        Some(complaint) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": complaint,
        }))),
        None => Err(ApiError::NotFound("Жалоба не найдена".to_string())),
    }
}

/// Aggregate complaint statistics
/// GET /api/complaints/analytics
pub async fn get_analytics(
    pool: web::Data<DbPool>,
    user: AuthUser,
) -> Result<HttpResponse, ApiError> {
    user.require_admin()?;

    let complaints = Database::all_complaints(&pool).await?;
    let analytics = query::aggregate(&complaints);

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": analytics,
    })))
}
