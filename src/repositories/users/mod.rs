//! 사용자 데이터 액세스 리포지토리
//!
//! 파생 쿼리(나이, 국가, 태그, 이메일 도메인 등)와 시작 시점 인덱스 생성을 담당합니다.

pub mod user_repo;

pub use user_repo::*;
