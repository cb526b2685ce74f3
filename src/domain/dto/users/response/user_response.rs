//! 사용자 응답 DTO
//!
//! 엔티티의 BSON 전용 타입을 JSON 친화적인 형태로 바꿉니다.
//! `_id` / `managerId`는 hex 문자열, `createdAt`은 RFC 3339 문자열이 됩니다.

use serde::Serialize;

use crate::domain::entities::{Address, User};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub age: i32,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    pub tags: Vec<String>,
    pub balance: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager_id: Option<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_hex(),
            name: user.name,
            age: user.age,
            email: user.email,
            address: user.address,
            created_at: user.created_at.and_then(|dt| dt.try_to_rfc3339_string().ok()),
            tags: user.tags,
            balance: user.balance,
            manager_id: user.manager_id.map(|id| id.to_hex()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{DateTime, oid::ObjectId};

    #[test]
    fn test_from_user_converts_bson_types() {
        let manager = ObjectId::new();
        let mut user = User::new("Kim".to_string(), 30, "kim@example.com".to_string())
            .with_manager(manager);
        user.created_at = Some(DateTime::from_millis(0));

        let response = UserResponse::from(user.clone());

        assert_eq!(response.id, user.id.to_hex());
        assert_eq!(response.manager_id, Some(manager.to_hex()));
        assert!(response.created_at.unwrap().starts_with("1970-01-01T00:00:00"));
    }

    #[test]
    fn test_json_shape_is_camel_case() {
        let user = User::new("Lee".to_string(), 22, "lee@example.com".to_string());
        let json = serde_json::to_value(UserResponse::from(user)).unwrap();

        assert!(json.get("createdAt").is_some());
        assert!(json.get("managerId").is_none());
        assert_eq!(json["balance"], 0.0);
    }
}
