//! # HTTP Handlers
//!
//! - [`aggregation`] - `/agg/users/...` 집계 예제 엔드포인트
//! - [`users`] - `/api/v1/users` 사용자 적재/조회
//! - [`orders`] - `/api/v1/orders` 주문 적재/조회
//!
//! 모든 핸들러는 `Result<HttpResponse, AppError>`를 반환하며,
//! 에러는 `AppError`의 `ResponseError` 구현이 `{"error": "..."}` JSON으로 변환합니다.

pub mod aggregation;
pub mod users;
pub mod orders;
