//! 주문 데이터 액세스 리포지토리

pub mod order_repo;

pub use order_repo::*;
