//! 주문 생성 요청 DTO

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::Order;
use crate::utils::string_utils::deserialize_email;

/// `POST /api/v1/orders`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[serde(deserialize_with = "deserialize_email")]
    #[validate(email(message = "유효한 이메일 주소를 입력해주세요"))]
    pub user_email: String,

    #[validate(range(min = 0.0, message = "주문 금액은 음수일 수 없습니다"))]
    pub amount: f64,
}

impl CreateOrderRequest {
    pub fn into_entity(self) -> Order {
        Order::new(self.user_email.trim().to_lowercase(), self.amount)
    }
}
