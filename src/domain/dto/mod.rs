//! # Data Transfer Objects
//!
//! HTTP 요청/응답 계층에서 사용하는 데이터 구조입니다.
//! 엔티티는 저장 형식을, DTO는 API 형식(ObjectId → hex 문자열,
//! BSON 날짜 → RFC 3339 문자열)을 담당합니다.
//!
//! - [`users`] - 사용자 생성/조회/검색
//! - [`orders`] - 주문 생성/조회
//! - [`aggregation`] - 집계 엔드포인트 경로 파라미터와 결과 형태

pub mod users;
pub mod orders;
pub mod aggregation;
