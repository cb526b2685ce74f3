//! # Order HTTP Handlers
//!
//! | 메서드 | 경로 | 설명 | 상태 코드 |
//! |--------|------|------|-----------|
//! | `POST` | `/api/v1/orders` | 주문 생성 | 201 Created |
//! | `GET` | `/api/v1/orders/by-user/{email}` | 사용자별 주문 목록 | 200 OK |

use actix_web::{HttpResponse, get, post, web};
use validator::Validate;

use crate::core::errors::AppError;
use crate::domain::dto::orders::CreateOrderRequest;
use crate::services::orders::OrderService;
use crate::utils::string_utils::validate_required_string;

#[post("")]
pub async fn create_order(payload: web::Json<CreateOrderRequest>) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let order = OrderService::instance().create_order(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(order))
}

#[get("/by-user/{email}")]
pub async fn orders_by_user(email: web::Path<String>) -> Result<HttpResponse, AppError> {
    let email = validate_required_string(&email, "email")?;

    let orders = OrderService::instance().orders_by_user(&email).await?;
    Ok(HttpResponse::Ok().json(orders))
}
