//! 집계 결과 형태
//!
//! 파이프라인 출력 문서가 그대로 역직렬화되는 구조체들입니다.
//! 스키마가 정해지지 않은 결과(`$unwind`, `$bucket` 등)는 `bson::Document`로 둡니다.

use serde::{Deserialize, Serialize};

use crate::domain::dto::orders::OrderResponse;
use crate::domain::dto::users::UserResponse;

/// `$group` by country 결과
///
/// 주소가 없는 사용자들은 `id: null` 그룹으로 모이고,
/// 잔액 필드가 전혀 없는 그룹은 `avgBalance: null`이 됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountrySummary {
    pub id: Option<String>,
    pub avg_balance: Option<f64>,
    pub count: i64,
}

/// `$project` 결과
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProjection {
    pub full_name: String,
    pub email: String,
}

/// `$lookup` 결과 - 사용자와 그 주문 목록
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserWithOrders {
    #[serde(flatten)]
    pub user: UserResponse,
    pub orders: Vec<OrderResponse>,
}

/// `$count` 결과 문서 `{ "count": n }`
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct CountResult {
    pub count: i64,
}

/// `$merge` / `$out` 실행 확인 응답
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WriteStageResponse {
    pub operation: String,
    pub stage: String,
    pub target: String,
    pub status: String,
}

impl WriteStageResponse {
    pub fn completed(operation: &str, stage: &str, target: &str) -> Self {
        Self {
            operation: operation.to_string(),
            stage: stage.to_string(),
            target: target.to_string(),
            status: "completed".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::User;
    use mongodb::bson::{doc, from_document};

    #[test]
    fn test_country_summary_from_group_output() {
        let summary: CountrySummary =
            from_document(doc! { "id": "Korea", "avgBalance": 1250.5, "count": 3 }).unwrap();

        assert_eq!(summary.id.as_deref(), Some("Korea"));
        assert_eq!(summary.count, 3);
    }

    #[test]
    fn test_country_summary_requires_count() {
        let result: Result<CountrySummary, _> = from_document(doc! { "id": "Korea", "avgBalance": 10.0 });

        assert!(result.is_err());
    }

    #[test]
    fn test_user_with_orders_flattens_user() {
        let user = User::new("Kim".to_string(), 30, "kim@example.com".to_string());
        let value = serde_json::to_value(UserWithOrders {
            user: UserResponse::from(user),
            orders: Vec::new(),
        })
        .unwrap();

        assert_eq!(value["email"], "kim@example.com");
        assert!(value["orders"].as_array().unwrap().is_empty());
    }
}
