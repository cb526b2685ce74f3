//! 집계 파이프라인 실행 클라이언트
//!
//! [`AggregationRepository`](aggregation_repo::AggregationRepository)가 검증된
//! 파이프라인을 드라이버에 전달하고 원본 결과 문서를 돌려줍니다.

pub mod aggregation_repo;

pub use aggregation_repo::*;
