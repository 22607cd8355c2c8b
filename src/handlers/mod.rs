/// HTTP handlers module
/// One submodule per resource, plus login and liveness endpoints

pub mod auth;
pub mod branches;
pub mod complaints;
pub mod users;

pub use auth::login;
pub use branches::{create_branch, delete_branch, list_branches};
pub use complaints::{create_complaint, get_analytics, list_complaints, update_complaint};
pub use users::{create_user, list_users};

use actix_web::{HttpResponse, Result as ActixResult};
use serde_json::json;

/// Service banner
/// GET /
pub async fn index() -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().body("Complaint Backend is Running"))
}

/// Health check endpoint
/// GET /health
pub async fn health() -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(json!({
        "status": "ok"
    })))
}
