/// Database layer for persistent storage.
/// Handles all database operations for complaints, branches, and users.
pub mod init;
pub mod models;

use chrono::Utc;
use models::{Branch, Complaint, Role, Status, User};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Result as SqliteResult};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

pub type DbPool = Arc<Mutex<Connection>>;

const COMPLAINT_COLUMNS: &str =
    "id, full_name, branch, problem, solution, contact, rating, admin_comment, status, created_at";

/// Create a connection pool (simplified for single-threaded SQLite)
pub fn create_pool(db_path: &str) -> SqliteResult<DbPool> {
    let conn = Connection::open(db_path)?;
    init::initialize_database(&conn)?;
    Ok(Arc::new(Mutex::new(conn)))
}

/// Create an in-memory database for testing
pub fn create_test_pool() -> DbPool {
    let conn = Connection::open_in_memory().expect("Failed to create in-memory DB");
    init::initialize_database(&conn).expect("Failed to initialize DB");
    Arc::new(Mutex::new(conn))
}

fn map_complaint_row(row: &rusqlite::Row<'_>) -> SqliteResult<Complaint> {
    let status: String = row.get(8)?;
    Ok(Complaint {
        id: row.get(0)?,
        full_name: row.get(1)?,
        branch: row.get(2)?,
        problem: row.get(3)?,
        solution: row.get(4)?,
        contact: row.get(5)?,
        rating: row.get(6)?,
        admin_comment: row.get(7)?,
        // Legacy rows may carry an unknown status; treat them as New.
        status: Status::from_str(&status).unwrap_or(Status::New),
        created_at: row.get(9)?,
    })
}

fn map_branch_row(row: &rusqlite::Row<'_>) -> SqliteResult<Branch> {
    Ok(Branch {
        id: row.get(0)?,
        name: row.get(1)?,
        created_at: row.get(2)?,
    })
}

fn map_user_row(row: &rusqlite::Row<'_>) -> SqliteResult<User> {
    let role: String = row.get(3)?;
    let role = Role::from_str(&role).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            3,
            rusqlite::types::Type::Text,
            format!("unknown role: {role}").into(),
        )
    })?;
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        password_hash: row.get(2)?,
        role,
    })
}

/// Database operations
pub struct Database;

impl Database {
    /// Insert a new complaint; the store assigns the id and creation timestamp
    pub async fn insert_complaint(
        pool: &DbPool,
        full_name: &str,
        branch: &str,
        problem: &str,
        solution: Option<&str>,
        contact: Option<&str>,
        rating: Option<i64>,
    ) -> SqliteResult<Complaint> {
        let conn = pool.lock().await;
        let id = Uuid::new_v4().to_string();
        let created_at = Utc::now().to_rfc3339();

        conn.execute(
            "INSERT INTO complaints (id, full_name, branch, problem, solution, contact, rating, status, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                id,
                full_name,
                branch,
                problem,
                solution,
                contact,
                rating,
                Status::New.as_str(),
                &created_at
            ],
        )?;

        // Retrieve the inserted complaint
        let mut stmt = conn.prepare(&format!(
            "SELECT {COMPLAINT_COLUMNS} FROM complaints WHERE id = ?1"
        ))?;
        stmt.query_row(params![id], map_complaint_row)
    }

    /// Get complaint by id
    pub async fn get_complaint(pool: &DbPool, id: &str) -> SqliteResult<Option<Complaint>> {
        let conn = pool.lock().await;

        let mut stmt = conn.prepare(&format!(
            "SELECT {COMPLAINT_COLUMNS} FROM complaints WHERE id = ?1"
        ))?;

        stmt.query_row(params![id], map_complaint_row).optional()
    }

    /// Fetch complaints matching the given equality filters, unordered.
    /// Sorting and pagination happen in memory (see `query`).
    pub async fn query_complaints(
        pool: &DbPool,
        branch: Option<&str>,
        status: Option<Status>,
    ) -> SqliteResult<Vec<Complaint>> {
        let conn = pool.lock().await;

        let mut sql = format!("SELECT {COMPLAINT_COLUMNS} FROM complaints");
        let mut clauses: Vec<&str> = Vec::new();
        let mut args: Vec<String> = Vec::new();
        if let Some(branch) = branch {
            clauses.push("branch = ?");
            args.push(branch.to_string());
        }
        if let Some(status) = status {
            clauses.push("status = ?");
            args.push(status.as_str().to_string());
        }
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }

        let mut stmt = conn.prepare(&sql)?;
        let complaints = stmt
            .query_map(params_from_iter(args.iter()), map_complaint_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(complaints)
    }

    /// Fetch the full complaint collection (for analytics)
    pub async fn all_complaints(pool: &DbPool) -> SqliteResult<Vec<Complaint>> {
        Self::query_complaints(pool, None, None).await
    }

    /// Apply a partial update (status and/or admin comment) to a complaint.
    /// Only the provided fields change; returns None when the id is unknown.
    pub async fn update_complaint(
        pool: &DbPool,
        id: &str,
        status: Option<Status>,
        admin_comment: Option<&str>,
    ) -> SqliteResult<Option<Complaint>> {
        let conn = pool.lock().await;

        let mut sets: Vec<&str> = Vec::new();
        let mut args: Vec<String> = Vec::new();
        if let Some(status) = status {
            sets.push("status = ?");
            args.push(status.as_str().to_string());
        }
        if let Some(comment) = admin_comment {
            sets.push("admin_comment = ?");
            args.push(comment.to_string());
        }
        if !sets.is_empty() {
            let sql = format!("UPDATE complaints SET {} WHERE id = ?", sets.join(", "));
            args.push(id.to_string());
            conn.execute(&sql, params_from_iter(args.iter()))?;
        }

        let mut stmt = conn.prepare(&format!(
            "SELECT {COMPLAINT_COLUMNS} FROM complaints WHERE id = ?1"
        ))?;
        stmt.query_row(params![id], map_complaint_row).optional()
    }

    /// List all branches ordered by name ascending
    pub async fn list_branches(pool: &DbPool) -> SqliteResult<Vec<Branch>> {
        let conn = pool.lock().await;

        let mut stmt =
            conn.prepare("SELECT id, name, created_at FROM branches ORDER BY name ASC")?;
        let branches = stmt
            .query_map([], map_branch_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(branches)
    }

    /// Look up a branch by exact name
    pub async fn find_branch_by_name(pool: &DbPool, name: &str) -> SqliteResult<Option<Branch>> {
        let conn = pool.lock().await;

        let mut stmt = conn.prepare("SELECT id, name, created_at FROM branches WHERE name = ?1")?;
        stmt.query_row(params![name], map_branch_row).optional()
    }

    /// Insert a new branch. The caller trims the name and checks for
    /// duplicates first; the UNIQUE constraint backstops the race
    /// between that check and this insert.
    pub async fn insert_branch(pool: &DbPool, name: &str) -> SqliteResult<Branch> {
        let conn = pool.lock().await;
        let id = Uuid::new_v4().to_string();
        let created_at = Utc::now().to_rfc3339();

        conn.execute(
            "INSERT INTO branches (id, name, created_at) VALUES (?1, ?2, ?3)",
            params![id, name, &created_at],
        )?;

        let mut stmt = conn.prepare("SELECT id, name, created_at FROM branches WHERE id = ?1")?;
        stmt.query_row(params![id], map_branch_row)
    }

    /// Delete a branch by id; returns false when the id is unknown
    pub async fn delete_branch(pool: &DbPool, id: &str) -> SqliteResult<bool> {
        let conn = pool.lock().await;

        let deleted = conn.execute("DELETE FROM branches WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }

    /// List all users (password hash included; callers project to `UserView`)
    pub async fn list_users(pool: &DbPool) -> SqliteResult<Vec<User>> {
        let conn = pool.lock().await;

        let mut stmt = conn.prepare("SELECT id, username, password_hash, role FROM users")?;
        let users = stmt
            .query_map([], map_user_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(users)
    }

    /// Look up a user by username
    pub async fn find_user_by_username(
        pool: &DbPool,
        username: &str,
    ) -> SqliteResult<Option<User>> {
        let conn = pool.lock().await;

        let mut stmt =
            conn.prepare("SELECT id, username, password_hash, role FROM users WHERE username = ?1")?;
        stmt.query_row(params![username], map_user_row).optional()
    }

    /// Insert a new user with an already-hashed password
    pub async fn insert_user(
        pool: &DbPool,
        username: &str,
        password_hash: &str,
        role: Role,
    ) -> SqliteResult<User> {
        let conn = pool.lock().await;
        let id = Uuid::new_v4().to_string();

        conn.execute(
            "INSERT INTO users (id, username, password_hash, role) VALUES (?1, ?2, ?3, ?4)",
            params![id, username, password_hash, role.as_str()],
        )?;

        let mut stmt =
            conn.prepare("SELECT id, username, password_hash, role FROM users WHERE id = ?1")?;
        stmt.query_row(params![id], map_user_row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_complaint_defaults() {
        let pool = create_test_pool();
        let complaint = Database::insert_complaint(
            &pool,
            "Иван Петров",
            "Центр",
            "Долгое обслуживание",
            None,
            None,
            Some(3),
        )
        .await
        .expect("Failed to insert complaint");

        assert!(!complaint.id.is_empty());
        assert_eq!(complaint.status, Status::New);
        assert_eq!(complaint.rating, Some(3));
        assert!(complaint.admin_comment.is_none());
        // Creation timestamp is a parseable instant
        assert!(chrono::DateTime::parse_from_rfc3339(&complaint.created_at).is_ok());
    }

    #[tokio::test]
    async fn test_query_complaints_filters() {
        let pool = create_test_pool();
        Database::insert_complaint(&pool, "a", "Центр", "p1", None, None, None)
            .await
            .expect("insert failed");
        Database::insert_complaint(&pool, "b", "Север", "p2", None, None, None)
            .await
            .expect("insert failed");
        let c3 = Database::insert_complaint(&pool, "c", "Центр", "p3", None, None, None)
            .await
            .expect("insert failed");
        Database::update_complaint(&pool, &c3.id, Some(Status::Solved), None)
            .await
            .expect("update failed");

        let by_branch = Database::query_complaints(&pool, Some("Центр"), None)
            .await
            .expect("query failed");
        assert_eq!(by_branch.len(), 2);

        let by_both = Database::query_complaints(&pool, Some("Центр"), Some(Status::Solved))
            .await
            .expect("query failed");
        assert_eq!(by_both.len(), 1);
        assert_eq!(by_both[0].id, c3.id);

        let all = Database::all_complaints(&pool).await.expect("query failed");
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn test_partial_update_leaves_other_fields() {
        let pool = create_test_pool();
        let complaint = Database::insert_complaint(
            &pool,
            "Иван",
            "Центр",
            "Проблема",
            Some("Решение"),
            Some("ivan@example.com"),
            Some(2),
        )
        .await
        .expect("insert failed");

        // Status-only update must not touch the admin comment
        let updated = Database::update_complaint(&pool, &complaint.id, Some(Status::Solved), None)
            .await
            .expect("update failed")
            .expect("complaint missing");
        assert_eq!(updated.status, Status::Solved);
        assert!(updated.admin_comment.is_none());
        assert_eq!(updated.solution.as_deref(), Some("Решение"));
        assert_eq!(updated.created_at, complaint.created_at);

        // Comment-only update must not touch the status
        let updated = Database::update_complaint(&pool, &complaint.id, None, Some("Проверено"))
            .await
            .expect("update failed")
            .expect("complaint missing");
        assert_eq!(updated.status, Status::Solved);
        assert_eq!(updated.admin_comment.as_deref(), Some("Проверено"));
    }

    #[tokio::test]
    async fn test_update_unknown_complaint_returns_none() {
        let pool = create_test_pool();
        let result = Database::update_complaint(&pool, "missing", Some(Status::Solved), None)
            .await
            .expect("update failed");
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_legacy_status_read_as_new() {
        let pool = create_test_pool();
        {
            let conn = pool.lock().await;
            conn.execute(
                "INSERT INTO complaints (id, full_name, branch, problem, status, created_at)
                 VALUES ('legacy', 'x', 'Центр', 'p', 'Archived', '2020-01-01T00:00:00+00:00')",
                [],
            )
            .expect("raw insert failed");
        }

        let complaint = Database::get_complaint(&pool, "legacy")
            .await
            .expect("query failed")
            .expect("complaint missing");
        assert_eq!(complaint.status, Status::New);
    }

    #[tokio::test]
    async fn test_branches_ordered_by_name() {
        let pool = create_test_pool();
        Database::insert_branch(&pool, "Юг").await.expect("insert failed");
        Database::insert_branch(&pool, "Центр").await.expect("insert failed");
        Database::insert_branch(&pool, "Север").await.expect("insert failed");

        let branches = Database::list_branches(&pool).await.expect("query failed");
        let names: Vec<&str> = branches.iter().map(|b| b.name.as_str()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }

    #[tokio::test]
    async fn test_duplicate_branch_insert_rejected_by_store() {
        // The check-then-insert sequence in the handler is not atomic;
        // the UNIQUE constraint is what actually closes the race. Both
        // uniqueness checks passing must still leave only one row.
        let pool = create_test_pool();

        let first = Database::find_branch_by_name(&pool, "Центр")
            .await
            .expect("query failed");
        let second = Database::find_branch_by_name(&pool, "Центр")
            .await
            .expect("query failed");
        assert!(first.is_none() && second.is_none());

        Database::insert_branch(&pool, "Центр").await.expect("insert failed");
        let raced = Database::insert_branch(&pool, "Центр").await;
        assert!(raced.is_err());

        let branches = Database::list_branches(&pool).await.expect("query failed");
        assert_eq!(branches.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_branch() {
        let pool = create_test_pool();
        let branch = Database::insert_branch(&pool, "Центр").await.expect("insert failed");

        assert!(Database::delete_branch(&pool, &branch.id).await.expect("delete failed"));
        assert!(!Database::delete_branch(&pool, &branch.id).await.expect("delete failed"));
        assert!(Database::list_branches(&pool).await.expect("query failed").is_empty());
    }

    #[tokio::test]
    async fn test_insert_and_find_user() {
        let pool = create_test_pool();
        let user = Database::insert_user(&pool, "alice", "$2b$12$hash", Role::Admin)
            .await
            .expect("insert failed");
        assert_eq!(user.username, "alice");
        assert_eq!(user.role, Role::Admin);

        let found = Database::find_user_by_username(&pool, "alice")
            .await
            .expect("query failed")
            .expect("user missing");
        assert_eq!(found, user);

        let missing = Database::find_user_by_username(&pool, "bob")
            .await
            .expect("query failed");
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected_by_store() {
        let pool = create_test_pool();
        Database::insert_user(&pool, "alice", "h1", Role::Admin)
            .await
            .expect("insert failed");
        let raced = Database::insert_user(&pool, "alice", "h2", Role::Manager).await;
        assert!(raced.is_err());
    }

    #[tokio::test]
    async fn test_file_backed_pool() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("complaints.db");
        let pool = create_pool(path.to_str().unwrap()).expect("Failed to create pool");

        Database::insert_branch(&pool, "Центр").await.expect("insert failed");
        let branches = Database::list_branches(&pool).await.expect("query failed");
        assert_eq!(branches.len(), 1);
    }
}
