//! 집계 엔드포인트 DTO
//!
//! - [`request`] - 경로 파라미터 (`/users/age/{age}` 등)
//! - [`response`] - 타입이 정해진 집계 결과 형태

pub mod request;
pub mod response;

pub use request::*;
pub use response::*;
