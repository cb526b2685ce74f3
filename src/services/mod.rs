//! 비즈니스 로직을 담당하는 서비스 계층 모듈
//!
//! 서비스는 `OnceCell` 싱글톤으로 관리되며 `inventory`로 등록됩니다.
//! 핸들러는 파라미터 검증 후 `XxxService::instance()`로 서비스를 얻어 호출합니다.
//!
//! - [`aggregation`] - 엔드포인트별 파이프라인 구성 → 실행 → 결과 매핑
//! - [`users`] - 사용자 생성/조회/검색
//! - [`orders`] - 주문 생성/조회
//!
//! # Examples
//!
//! ```rust,ignore
//! use crate::services::aggregation::AggregationService;
//!
//! let summaries = AggregationService::instance().group_by_country().await?;
//! ```

pub mod aggregation;
pub mod users;
pub mod orders;
