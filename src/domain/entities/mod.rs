//! # Domain Entities
//!
//! 데이터베이스 컬렉션에 저장되는 도메인 엔티티입니다.
//!
//! - [`users`] - `users` 컬렉션의 사용자 문서
//! - [`orders`] - `orders` 컬렉션의 주문 문서

pub mod users;
pub mod orders;

pub use users::*;
pub use orders::*;
