//! 데이터 액세스 계층을 담당하는 리포지토리 모듈
//!
//! 모든 리포지토리는 `OnceCell` 싱글톤으로 관리되며 `inventory`로
//! [`RepositoryRegistration`](crate::core::registry::RepositoryRegistration)을 제출합니다.
//! `ServiceLocator::initialize_all()`이 시작 시점에 생성과 `init`을 실행합니다.
//!
//! # Examples
//!
//! ```rust,ignore
//! use crate::repositories::aggregation::AggregationRepository;
//!
//! let repo = AggregationRepository::instance();
//! let documents = repo.aggregate("users", &pipeline).await?;
//! ```

pub mod aggregation;
pub mod users;
pub mod orders;
