//! # Result Mapper
//!
//! 집계 결과 원본 문서를 응답 타입으로 변환합니다.
//!
//! 변환 규칙은 단순한 필드 매핑입니다. 필수 필드가 없거나 타입이 맞지 않으면
//! 기본값으로 대체하지 않고 `AppError::MappingError`를 반환합니다.
//! 에러 메시지에는 몇 번째 문서에서 실패했는지 포함됩니다.

use mongodb::bson::{Bson, Document, from_document};
use serde::de::DeserializeOwned;

use crate::core::errors::{AppError, AppResult};
use crate::domain::dto::aggregation::{CountResult, UserWithOrders};
use crate::domain::dto::orders::OrderResponse;
use crate::domain::dto::users::UserResponse;
use crate::domain::entities::{Order, User};

/// 각 문서를 `T`로 역직렬화합니다.
pub fn map_documents<T>(documents: Vec<Document>) -> AppResult<Vec<T>>
where
    T: DeserializeOwned,
{
    documents
        .into_iter()
        .enumerate()
        .map(|(index, document)| map_document(document, index))
        .collect()
}

fn map_document<T>(document: Document, index: usize) -> AppResult<T>
where
    T: DeserializeOwned,
{
    from_document(document).map_err(|e| {
        AppError::MappingError(format!(
            "document #{} cannot be mapped to {}: {}",
            index,
            short_type_name::<T>(),
            e
        ))
    })
}

fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}

/// 사용자 문서 → 응답 DTO
pub fn map_users(documents: Vec<Document>) -> AppResult<Vec<UserResponse>> {
    let users: Vec<User> = map_documents(documents)?;
    Ok(users.into_iter().map(UserResponse::from).collect())
}

/// "단일 결과" 연산의 결과를 꺼냅니다.
///
/// 결과가 없으면 `None`, 두 개 이상이면 `MappingError`입니다.
pub fn expect_unique(documents: Vec<Document>) -> AppResult<Option<Document>> {
    let mut iter = documents.into_iter();
    let first = iter.next();

    let extra = iter.count();
    if extra > 0 {
        return Err(AppError::MappingError(format!(
            "expected at most one result document, got {}",
            extra + 1
        )));
    }

    Ok(first)
}

/// `$count` 결과 추출. 일치하는 문서가 없으면 서버가 아무것도 돌려주지 않으므로 0입니다.
pub fn extract_count(result: Option<Document>) -> AppResult<i64> {
    match result {
        Some(document) => {
            let CountResult { count } = map_document(document, 0)?;
            Ok(count)
        }
        None => Ok(0),
    }
}

/// `$lookup` 결과 문서 → 사용자 + 주문 목록
///
/// `orders` 배열을 분리한 뒤 나머지를 사용자로 역직렬화합니다.
/// 주문 원소는 설정된 이메일 필드 이름으로 읽습니다.
pub fn map_user_with_orders(mut document: Document, order_email_field: &str) -> AppResult<UserWithOrders> {
    let orders = match document.remove("orders") {
        Some(Bson::Array(items)) => items
            .iter()
            .map(|item| match item {
                Bson::Document(order) => Order::from_document(order, order_email_field).map(OrderResponse::from),
                other => Err(AppError::MappingError(format!(
                    "orders element must be a document, found {:?}",
                    other.element_type()
                ))),
            })
            .collect::<AppResult<Vec<_>>>()?,
        Some(other) => {
            return Err(AppError::MappingError(format!(
                "orders must be an array, found {:?}",
                other.element_type()
            )));
        }
        None => return Err(AppError::MappingError("missing field `orders`".to_string())),
    };

    let user: User = from_document(document)?;

    Ok(UserWithOrders { user: UserResponse::from(user), orders })
}

/// 여러 `$lookup` 결과 문서를 변환합니다.
pub fn map_users_with_orders(documents: Vec<Document>, order_email_field: &str) -> AppResult<Vec<UserWithOrders>> {
    documents
        .into_iter()
        .map(|document| map_user_with_orders(document, order_email_field))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dto::aggregation::CountrySummary;
    use mongodb::bson::{doc, oid::ObjectId};

    fn user_document(name: &str, age: i32) -> Document {
        doc! {
            "_id": ObjectId::new(),
            "name": name,
            "age": age,
            "email": format!("{}@example.com", name.to_lowercase()),
            "tags": ["admin"],
            "balance": 1200.0,
        }
    }

    #[test]
    fn test_map_users() {
        let users = map_users(vec![user_document("Kim", 30), user_document("Lee", 25)]).unwrap();

        assert_eq!(users.len(), 2);
        assert_eq!(users[1].email, "lee@example.com");
    }

    #[test]
    fn test_missing_required_field_reports_index() {
        let mut broken = user_document("Park", 41);
        broken.remove("age");

        match map_users(vec![user_document("Kim", 30), broken]) {
            Err(AppError::MappingError(msg)) => {
                assert!(msg.contains("#1"));
                assert!(msg.contains("User"));
            }
            other => panic!("Expected MappingError, got {:?}", other),
        }
    }

    #[test]
    fn test_type_mismatch_is_not_defaulted() {
        let result: AppResult<Vec<CountrySummary>> =
            map_documents(vec![doc! { "id": "Korea", "avgBalance": 1.0, "count": "three" }]);

        assert!(matches!(result, Err(AppError::MappingError(_))));
    }

    #[test]
    fn test_expect_unique() {
        assert_eq!(expect_unique(Vec::new()).unwrap(), None);
        assert_eq!(expect_unique(vec![doc! { "a": 1 }]).unwrap(), Some(doc! { "a": 1 }));
        assert!(matches!(
            expect_unique(vec![doc! { "a": 1 }, doc! { "a": 2 }]),
            Err(AppError::MappingError(_))
        ));
    }

    #[test]
    fn test_extract_count() {
        assert_eq!(extract_count(None).unwrap(), 0);
        assert_eq!(extract_count(Some(doc! { "count": 7 })).unwrap(), 7);
    }

    #[test]
    fn test_map_user_with_orders() {
        let mut document = user_document("Kim", 30);
        let order_id = ObjectId::new();
        document.insert(
            "orders",
            vec![Bson::Document(doc! { "_id": order_id, "user_email": "kim@example.com", "amount": 99.5 })],
        );

        let mapped = map_user_with_orders(document, "user_email").unwrap();

        assert_eq!(mapped.user.name, "Kim");
        assert_eq!(mapped.orders.len(), 1);
        assert_eq!(mapped.orders[0].id, order_id.to_hex());
    }

    #[test]
    fn test_map_user_with_orders_requires_orders_array() {
        let result = map_user_with_orders(user_document("Kim", 30), "user_email");

        assert!(matches!(result, Err(AppError::MappingError(_))));
    }
}
