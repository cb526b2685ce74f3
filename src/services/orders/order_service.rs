//! 주문 서비스
//!
//! 주문은 사용자 이메일로만 연결되므로, 생성 시 해당 이메일의 사용자가
//! 존재하는지 먼저 확인합니다.

use std::any::Any;
use std::sync::Arc;

use log::info;
use once_cell::sync::OnceCell;

use crate::core::errors::{AppError, AppResult};
use crate::core::registry::ServiceLocator;
use crate::domain::dto::orders::{CreateOrderRequest, OrderResponse};
use crate::repositories::orders::OrderRepository;
use crate::repositories::users::UserRepository;

pub struct OrderService {
    order_repo: Arc<OrderRepository>,
    user_repo: Arc<UserRepository>,
}

static ORDER_SERVICE_INSTANCE: OnceCell<Arc<OrderService>> = OnceCell::new();

impl OrderService {
    pub fn instance() -> Arc<Self> {
        ORDER_SERVICE_INSTANCE
            .get_or_init(|| Arc::new(Self::new()))
            .clone()
    }

    fn new() -> Self {
        Self {
            order_repo: ServiceLocator::get::<OrderRepository>(),
            user_repo: ServiceLocator::get::<UserRepository>(),
        }
    }

    pub fn with_repositories(order_repo: Arc<OrderRepository>, user_repo: Arc<UserRepository>) -> Self {
        Self { order_repo, user_repo }
    }

    /// 주문 생성. 이메일에 해당하는 사용자가 없으면 `NotFound`입니다.
    pub async fn create_order(&self, request: CreateOrderRequest) -> AppResult<OrderResponse> {
        let order = request.into_entity();

        if self.user_repo.find_by_email(&order.user_email).await?.is_none() {
            return Err(AppError::NotFound(format!("user not found: {}", order.user_email)));
        }

        let created = self.order_repo.create(order).await?;
        info!("🧾 주문 생성: {} → {}", created.user_email, created.amount);

        Ok(OrderResponse::from(created))
    }

    pub async fn orders_by_user(&self, email: &str) -> AppResult<Vec<OrderResponse>> {
        let orders = self
            .order_repo
            .find_by_user_email(&email.trim().to_lowercase())
            .await?;

        Ok(orders.into_iter().map(OrderResponse::from).collect())
    }
}

fn order_service_constructor() -> Box<dyn Any + Send + Sync> {
    Box::new(OrderService::instance())
}

inventory::submit! {
    crate::core::registry::ServiceRegistration {
        name: "order_service",
        constructor: order_service_constructor,
    }
}
