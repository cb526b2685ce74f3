//! 사용자 생성 요청 DTO
//!
//! `POST /api/v1/users` 요청 본문입니다. 집계 예제에 쓸 샘플 데이터를 적재하는 용도입니다.

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::core::errors::{AppError, AppResult};
use crate::domain::entities::{Address, User};
use crate::utils::string_utils::deserialize_email;

/// 새 사용자 생성 요청
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 100, message = "이름은 1-100자 사이여야 합니다"))]
    pub name: String,

    #[validate(range(min = 0, max = 150, message = "나이는 0-150 사이여야 합니다"))]
    pub age: i32,

    #[serde(deserialize_with = "deserialize_email")]
    #[validate(email(message = "유효한 이메일 주소를 입력해주세요"))]
    pub email: String,

    #[validate(nested)]
    pub address: Option<AddressRequest>,

    #[serde(default)]
    #[validate(custom(function = "validate_tags"))]
    pub tags: Vec<String>,

    #[serde(default)]
    #[validate(range(min = 0.0, message = "잔액은 음수일 수 없습니다"))]
    pub balance: f64,

    /// 상위 관리자 ID (24자리 hex)
    pub manager_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AddressRequest {
    #[validate(length(min = 1, message = "도시는 비어 있을 수 없습니다"))]
    pub city: String,

    #[validate(length(min = 1, message = "국가는 비어 있을 수 없습니다"))]
    pub country: String,
}

/// 빈 태그 금지
fn validate_tags(tags: &[String]) -> Result<(), ValidationError> {
    if tags.iter().any(|t| t.trim().is_empty()) {
        return Err(ValidationError::new("empty_tag")
            .with_message("태그는 비어 있을 수 없습니다".into()));
    }
    Ok(())
}

impl CreateUserRequest {
    /// 검증된 요청을 엔티티로 변환합니다.
    ///
    /// `managerId`가 올바른 ObjectId hex가 아니면 `InvalidArgument`입니다.
    pub fn into_entity(self) -> AppResult<User> {
        let manager_id = self
            .manager_id
            .as_deref()
            .map(ObjectId::parse_str)
            .transpose()
            .map_err(|e| AppError::InvalidArgument(format!("managerId: {}", e)))?;

        let mut user = User::new(self.name.trim().to_string(), self.age, self.email.trim().to_lowercase())
            .with_tags(self.tags.into_iter().map(|t| t.trim().to_string()).collect())
            .with_balance(self.balance);

        user.address = self.address.map(|a| Address { city: a.city, country: a.country });
        user.manager_id = manager_id;

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CreateUserRequest {
        CreateUserRequest {
            name: "Kim".to_string(),
            age: 34,
            email: "Kim@Example.com".to_string(),
            address: Some(AddressRequest { city: "Seoul".to_string(), country: "Korea".to_string() }),
            tags: vec!["admin".to_string()],
            balance: 1500.0,
            manager_id: None,
        }
    }

    #[test]
    fn test_valid_request() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn test_invalid_email_and_nested_address() {
        let mut req = request();
        req.email = "not-an-email".to_string();
        req.address = Some(AddressRequest { city: String::new(), country: "Korea".to_string() });

        let errors = req.validate().unwrap_err();
        let fields = errors.errors();

        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("address"));
    }

    #[test]
    fn test_into_entity_normalizes_email() {
        let user = request().into_entity().unwrap();

        assert_eq!(user.email, "kim@example.com");
        assert_eq!(user.address.map(|a| a.country).as_deref(), Some("Korea"));
        assert!(user.created_at.is_some());
    }

    #[test]
    fn test_padded_email_body_passes_validation() {
        let req: CreateUserRequest = serde_json::from_str(
            r#"{"name": "Kim", "age": 34, "email": " Kim@Example.com "}"#,
        )
        .unwrap();

        assert_eq!(req.email, "kim@example.com");
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_bad_manager_id_is_invalid_argument() {
        let mut req = request();
        req.manager_id = Some("not-hex".to_string());

        assert!(matches!(req.into_entity(), Err(AppError::InvalidArgument(_))));
    }
}
