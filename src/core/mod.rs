//! # Core Framework Module
//!
//! 백엔드 서비스 전반에서 쓰는 핵심 기능입니다.
//!
//! ## 모듈 구성
//!
//! ### [`registry`] - 의존성 주입 컨테이너
//! - **ServiceLocator**: Spring의 ApplicationContext 역할
//! - **자동 등록**: `inventory` 기반 리포지토리/서비스 등록
//! - **싱글톤 관리**: `OnceCell` + `Arc<T>` 인스턴스 공유
//!
//! ### [`errors`] - 통합 에러 처리
//! - **AppError**: 애플리케이션 전역 에러 타입
//! - **HTTP 통합**: `actix_web::ResponseError` 구현
//! - **드라이버 에러 분류**: 연결 / 권한 / 파이프라인 / 매핑
//!
//! ## Spring Framework와의 비교
//!
//! | Spring | 이 프로젝트 |
//! |--------|-------------|
//! | `ApplicationContext` | `ServiceLocator` |
//! | `@Repository` / `@Service` | `inventory::submit!` + `instance()` |
//! | `@Bean` | `ServiceLocator::set()` |
//! | `@ExceptionHandler` | `AppError::error_response()` |
//!
//! ## 사용 패턴
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use crate::core::registry::ServiceLocator;
//!
//! #[actix_web::main]
//! async fn main() -> std::io::Result<()> {
//!     let database = Database::new().await?;
//!     ServiceLocator::set(Arc::new(database));
//!     ServiceLocator::set(Arc::new(CollectionConfig::from_env()));
//!
//!     ServiceLocator::initialize_all().await?;
//!
//!     let service = AggregationService::instance();
//!     // ...
//! }
//! ```
//!
//! ## 트러블슈팅
//!
//! ### 순환 참조 감지
//! ```text
//! panic: Circular dependency detected: UserService is already being initialized
//! ```
//! **해결**: 서비스 계층 구조를 단방향 의존성으로 재설계
//!
//! ### 미등록 타입 에러
//! ```text
//! panic: Service not found: EmailService. Register it with inventory::submit! or ServiceLocator::set()
//! ```

pub mod errors;
pub mod registry;

pub use errors::*;
pub use registry::*;
