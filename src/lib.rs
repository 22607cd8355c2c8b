/// Complaint management backend.
///
/// Customers file complaints against named branches; staff authenticate
/// with bearer tokens to triage them (status changes, admin comments);
/// admins manage the branch and user registries and read aggregate
/// analytics. All state lives in SQLite; handlers hold no shared
/// mutable state between requests.
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod query;
pub mod server;
