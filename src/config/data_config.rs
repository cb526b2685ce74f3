//! 실행 환경 및 서버 설정 관리 모듈
//!
//! 실행 프로파일, HTTP 바인딩, 요청 제한(rate limit) 설정을 관리합니다.

use std::env;

/// 애플리케이션 실행 환경
#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    /// 개발 환경
    Development,
    /// 테스트 환경
    Test,
    /// 스테이징 환경
    Staging,
    /// 프로덕션 환경
    Production,
}

impl Environment {
    /// 현재 실행 환경을 감지합니다.
    ///
    /// `ENVIRONMENT` 환경 변수를 확인하며,
    /// 설정되지 않은 경우 `Development`를 기본값으로 사용합니다.
    pub fn current() -> Self {
        Self::from_str(&env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()))
    }

    /// 문자열에서 Environment를 생성합니다.
    ///
    /// 알 수 없는 값인 경우 `Production`을 반환합니다.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            "test" | "testing" => Environment::Test,
            "staging" | "stage" => Environment::Staging,
            _ => Environment::Production,
        }
    }

    /// 환경별 기본 로그 필터
    ///
    /// `RUST_LOG`가 없을 때 `env_logger`에 넘기는 값입니다.
    pub fn default_log_filter(&self) -> &'static str {
        match self {
            Environment::Test => "debug,actix_web=debug,mongodb=info",
            Environment::Development | Environment::Staging => "info,actix_web=debug",
            Environment::Production => "info,actix_web=info",
        }
    }
}

/// 서버 바인딩 설정
pub struct ServerConfig;

impl ServerConfig {
    /// 서버가 바인딩할 포트를 반환합니다. 기본값: 8080
    pub fn port() -> u16 {
        env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .unwrap_or(8080)
    }

    /// 서버가 바인딩할 호스트 주소를 반환합니다. 기본값: "127.0.0.1"
    pub fn host() -> String {
        env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string())
    }

    /// `host:port` 형식의 바인딩 주소
    pub fn bind_address() -> String {
        format!("{}:{}", Self::host(), Self::port())
    }

    /// HTTP 워커 스레드 수. 기본값: 4
    pub fn workers() -> usize {
        env::var("HTTP_WORKERS")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(4)
    }
}

/// Rate Limiting 설정
///
/// * `RATE_LIMIT_PER_SECOND` - 초당 허용 요청 수 (기본값: 100)
/// * `RATE_LIMIT_BURST_SIZE` - 버스트 허용량 (기본값: 200)
#[derive(Debug, Clone, PartialEq)]
pub struct RateLimitConfig {
    pub per_second: u64,
    pub burst_size: u32,
}

impl RateLimitConfig {
    /// 환경변수에서 Rate Limiting 설정을 로드합니다.
    ///
    /// 파싱에 실패한 값은 에러 로그를 남기고 기본값으로 대체합니다.
    pub fn from_env() -> Self {
        let per_second = Self::parse_or(
            env::var("RATE_LIMIT_PER_SECOND").ok(),
            "RATE_LIMIT_PER_SECOND",
            100u64,
        );
        let burst_size = Self::parse_or(
            env::var("RATE_LIMIT_BURST_SIZE").ok(),
            "RATE_LIMIT_BURST_SIZE",
            200u32,
        );

        Self { per_second, burst_size }
    }

    fn parse_or<T>(raw: Option<String>, key: &str, default: T) -> T
    where
        T: std::str::FromStr + Copy + PartialOrd + Default,
        T::Err: std::fmt::Display,
    {
        match raw {
            None => default,
            Some(value) => match value.trim().parse::<T>() {
                Ok(parsed) if parsed > T::default() => parsed,
                Ok(_) => {
                    log::error!("{} 값은 0보다 커야 합니다. 기본값 사용", key);
                    default
                }
                Err(e) => {
                    log::error!("{} 파싱 실패: {}. 기본값 사용", key, e);
                    default
                }
            },
        }
    }
}
