/// Data models for database operations and API payloads.
/// Represents complaints, branches, and users.
use serde::{Deserialize, Serialize};

/// Complaint lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    New,
    #[serde(rename = "In progress")]
    InProgress,
    Solved,
    Rejected,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::New => "New",
            Status::InProgress => "In progress",
            Status::Solved => "Solved",
            Status::Rejected => "Rejected",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "New" => Some(Status::New),
            "In progress" => Some(Status::InProgress),
            "Solved" => Some(Status::Solved),
            "Rejected" => Some(Status::Rejected),
            _ => None,
        }
    }
}

/// Staff access tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Role::Admin),
            "manager" => Some(Role::Manager),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Complaint {
    pub id: String,
    pub full_name: String,
    pub branch: String,
    pub problem: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_comment: Option<String>,
    pub status: Status,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub id: String,
    pub name: String,
    pub created_at: String,
}

/// Stored user record. Deliberately not serializable: the password
/// hash must never reach a response body. Use `UserView` for output.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: String,
    pub username: String,
    pub password_hash: String,
    pub role: Role,
}

/// Public projection of a user (id, username, role only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserView {
    pub id: String,
    pub username: String,
    pub role: Role,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        UserView {
            id: user.id,
            username: user.username,
            role: user.role,
        }
    }
}

// Request DTOs
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateComplaintRequest {
    pub full_name: String,
    pub branch: String,
    pub problem: String,
    pub solution: Option<String>,
    pub contact: Option<String>,
    pub rating: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateComplaintRequest {
    pub status: Option<Status>,
    pub admin_comment: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListComplaintsQuery {
    pub branch: Option<String>,
    pub status: Option<String>,
    pub sort: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateBranchRequest {
    pub name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            Status::New,
            Status::InProgress,
            Status::Solved,
            Status::Rejected,
        ] {
            assert_eq!(Status::from_str(status.as_str()), Some(status));
        }
        assert_eq!(Status::from_str("Escalated"), None);
    }

    #[test]
    fn test_status_wire_names() {
        let json = serde_json::to_string(&Status::InProgress).expect("Serialization failed");
        assert_eq!(json, "\"In progress\"");
        let parsed: Status = serde_json::from_str("\"Solved\"").expect("Deserialization failed");
        assert_eq!(parsed, Status::Solved);
    }

    #[test]
    fn test_unknown_status_rejected_at_boundary() {
        let result: Result<UpdateComplaintRequest, _> =
            serde_json::from_str(r#"{"status": "Escalated"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_role_wire_names() {
        assert_eq!(
            serde_json::to_string(&Role::Admin).expect("Serialization failed"),
            "\"admin\""
        );
        assert_eq!(Role::from_str("manager"), Some(Role::Manager));
        assert_eq!(Role::from_str("root"), None);
    }

    #[test]
    fn test_complaint_camel_case_wire_format() {
        let complaint = Complaint {
            id: "c1".to_string(),
            full_name: "Иван Петров".to_string(),
            branch: "Центр".to_string(),
            problem: "Долгое обслуживание".to_string(),
            solution: None,
            contact: None,
            rating: Some(3),
            admin_comment: None,
            status: Status::New,
            created_at: "2025-01-05T10:00:00+00:00".to_string(),
        };

        let value = serde_json::to_value(&complaint).expect("Serialization failed");
        assert_eq!(value["fullName"], "Иван Петров");
        assert_eq!(value["createdAt"], "2025-01-05T10:00:00+00:00");
        assert_eq!(value["status"], "New");
        // Absent optional fields are omitted, not null
        assert!(value.get("solution").is_none());
        assert!(value.get("adminComment").is_none());
    }

    #[test]
    fn test_user_view_has_no_hash_field() {
        let user = User {
            id: "u1".to_string(),
            username: "alice".to_string(),
            password_hash: "$2b$12$secret".to_string(),
            role: Role::Admin,
        };
        let view = UserView::from(user);
        let value = serde_json::to_value(&view).expect("Serialization failed");
        let keys: Vec<&String> = value.as_object().expect("Expected object").keys().collect();
        assert_eq!(keys.len(), 3);
        assert!(!value.to_string().contains("secret"));
    }
}
