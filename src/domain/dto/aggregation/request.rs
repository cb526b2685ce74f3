//! 집계 엔드포인트 경로 파라미터
//!
//! 타입 변환 실패(`/users/age/abc`)는 `PathConfig` 에러 핸들러가,
//! limit / skip / sample 범위 위반(`/users/limit/-1`)은 `validator`가 `InvalidArgument`로 바꿉니다.
//! 둘 다 데이터베이스 호출 전에 걸러집니다.

use serde::Deserialize;
use validator::Validate;

/// 나이는 범위 제한이 없습니다. 일치하는 문서가 없으면 빈 목록입니다.
#[derive(Debug, Clone, Deserialize)]
pub struct AgePath {
    pub age: i32,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LimitPath {
    #[validate(range(min = 1, message = "limit must be positive"))]
    pub limit: i64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SkipPath {
    #[validate(range(min = 0, message = "skip must not be negative"))]
    pub skip: i64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SamplePath {
    #[validate(range(min = 1, message = "sample size must be positive"))]
    pub size: i64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CountryPath {
    #[validate(length(min = 1, max = 100, message = "country must be 1-100 characters"))]
    pub country: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_rules() {
        assert!(LimitPath { limit: 0 }.validate().is_err());
        assert!(LimitPath { limit: 1 }.validate().is_ok());
        assert!(SkipPath { skip: -1 }.validate().is_err());
        assert!(SkipPath { skip: 0 }.validate().is_ok());
        assert!(SamplePath { size: 0 }.validate().is_err());
    }
}
