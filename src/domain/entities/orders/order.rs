//! Order Entity
//!
//! `orders` 컬렉션의 주문 문서입니다. 사용자와의 연결은 이메일 값으로만 이루어지며
//! (비공식 외래 키), 그 필드 이름은 `CollectionConfig::order_user_email_field`로 정해집니다.
//! 필드 이름이 런타임 설정이므로 serde derive 대신 문서를 직접 변환합니다.

use mongodb::bson::{Bson, Document, oid::ObjectId};

use crate::core::errors::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: ObjectId,
    pub user_email: String,
    pub amount: f64,
}

impl Order {
    pub fn new(user_email: String, amount: f64) -> Self {
        Self { id: ObjectId::new(), user_email, amount }
    }

    /// 저장용 문서로 변환합니다.
    pub fn to_document(&self, email_field: &str) -> Document {
        let mut document = Document::new();
        document.insert("_id", self.id);
        document.insert(email_field, self.user_email.as_str());
        document.insert("amount", self.amount);
        document
    }

    /// 저장된 문서(또는 `$lookup` 결과의 원소)를 주문으로 변환합니다.
    ///
    /// `_id`, 이메일 필드, `amount` 중 하나라도 없거나 타입이 다르면 `MappingError`입니다.
    /// `amount`는 정수로 저장된 경우도 허용합니다.
    pub fn from_document(document: &Document, email_field: &str) -> AppResult<Self> {
        let id = document
            .get_object_id("_id")
            .map_err(|e| AppError::MappingError(format!("order._id: {}", e)))?;

        let user_email = document
            .get_str(email_field)
            .map_err(|e| AppError::MappingError(format!("order.{}: {}", email_field, e)))?
            .to_string();

        let amount = match document.get("amount") {
            Some(Bson::Double(v)) => *v,
            Some(Bson::Int32(v)) => f64::from(*v),
            Some(Bson::Int64(v)) => *v as f64,
            Some(other) => {
                return Err(AppError::MappingError(format!(
                    "order.amount: expected number, found {:?}",
                    other.element_type()
                )));
            }
            None => return Err(AppError::MappingError("order.amount: missing field".to_string())),
        };

        Ok(Self { id, user_email, amount })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    #[test]
    fn test_email_field_name_follows_configuration() {
        let order = Order::new("kim@example.com".to_string(), 120.5);

        let snake = order.to_document("user_email");
        let camel = order.to_document("userEmail");

        assert_eq!(snake.get_str("user_email").unwrap(), "kim@example.com");
        assert_eq!(camel.get_str("userEmail").unwrap(), "kim@example.com");
        assert_eq!(Order::from_document(&camel, "userEmail").unwrap(), order);
    }

    #[test]
    fn test_integer_amount_is_accepted() {
        let id = ObjectId::new();
        let order = Order::from_document(
            &doc! { "_id": id, "user_email": "lee@example.com", "amount": 300 },
            "user_email",
        )
        .unwrap();

        assert_eq!(order.amount, 300.0);
    }

    #[test]
    fn test_missing_email_is_mapping_error() {
        let result = Order::from_document(
            &doc! { "_id": ObjectId::new(), "userEmail": "lee@example.com", "amount": 1.0 },
            "user_email",
        );

        match result {
            Err(AppError::MappingError(msg)) => assert!(msg.contains("user_email")),
            other => panic!("Expected MappingError, got {:?}", other),
        }
    }
}
