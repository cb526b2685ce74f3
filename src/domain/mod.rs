//! # Domain Layer
//!
//! - [`entities`] - 컬렉션에 저장되는 문서 (User, Order)
//! - [`dto`] - HTTP 요청/응답 형태
//! - [`mapper`] - 집계 결과 문서 → 응답 타입 변환

pub mod entities;
pub mod dto;
pub mod mapper;
