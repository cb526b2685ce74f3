//! 주문 응답 DTO

use serde::Serialize;

use crate::domain::entities::Order;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: String,
    pub user_email: String,
    pub amount: f64,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id.to_hex(),
            user_email: order.user_email,
            amount: order.amount,
        }
    }
}
