//! 공통 유틸리티 함수 모듈
//!
//! # Modules
//!
//! - [`string_utils`] - 파라미터 정리, 정규식 이스케이프
//! - [`display_terminal`] - 기동 과정 터미널 출력

pub mod string_utils;
pub mod display_terminal;
