//! # Application Error Handling System
//!
//! 집계 서비스 전역에서 사용하는 통합 에러 처리 시스템입니다.
//! 파이프라인 구성, 드라이버 실행, 결과 매핑 단계에서 발생하는 모든 실패를
//! 하나의 `AppError`로 모으고, `actix_web::ResponseError` 구현을 통해
//! 일관된 JSON 에러 응답으로 변환합니다.
//!
//! ## HTTP 응답 매핑
//!
//! | AppError | HTTP Status | 사용 시나리오 |
//! |----------|-------------|---------------|
//! | `InvalidArgument` | 400 Bad Request | 잘못된 경로/쿼리 파라미터 |
//! | `NotFound` | 404 Not Found | 리소스 없음 |
//! | `ConflictError` | 409 Conflict | 중복 키 |
//! | `AuthorizationError` | 403 Forbidden | 데이터베이스 권한 부족 |
//! | `ConnectivityError` | 503 Service Unavailable | 데이터베이스 연결 불가 |
//! | `ValidationError` | 500 Internal Server Error | 잘못 구성된 파이프라인 |
//! | `MappingError` | 500 Internal Server Error | 결과 문서와 응답 스키마 불일치 |
//! | `DatabaseError` | 500 Internal Server Error | 기타 드라이버 오류 |
//! | `InternalError` | 500 Internal Server Error | 예상치 못한 오류 |
//!
//! ## 사용 패턴
//!
//! ```rust,ignore
//! use crate::core::errors::{AppError, AppResult};
//!
//! fn limit(n: i64) -> AppResult<i64> {
//!     if n < 1 {
//!         return Err(AppError::InvalidArgument(format!("limit must be positive, got {}", n)));
//!     }
//!     Ok(n)
//! }
//! ```

use mongodb::error::{ErrorKind, WriteFailure};
use thiserror::Error;

/// MongoDB 서버가 권한 부족 시 돌려주는 에러 코드 (`Unauthorized`)
const UNAUTHORIZED_CODE: i32 = 13;

/// 중복 키 에러 코드 (`DuplicateKey`)
const DUPLICATE_KEY_CODE: i32 = 11000;

/// 애플리케이션 전역 에러 타입
///
/// 요청 처리 중 발생할 수 있는 모든 실패를 포괄하는 열거형입니다.
/// 어떤 에러도 서비스 내부에서 재시도되거나 복구되지 않으며,
/// 그대로 HTTP 호출자에게 전달됩니다.
#[derive(Error, Debug)]
pub enum AppError {
    /// 잘못된 입력 파라미터
    ///
    /// 음수 limit, 0 이하의 sample 크기, 숫자가 아닌 경로 변수 등
    /// 데이터베이스 호출 이전에 걸러지는 오류입니다.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// 데이터베이스에 도달할 수 없음
    ///
    /// 서버 선택 타임아웃, 네트워크 I/O 실패, 커넥션 풀 초기화 등.
    #[error("Connectivity error: {0}")]
    ConnectivityError(String),

    /// 잘못 구성된 파이프라인
    ///
    /// 로컬 구조 검증(`$out`이 마지막 단계가 아님 등)에 실패했거나
    /// 서버가 스테이지를 거부한 경우입니다.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 데이터베이스 권한 부족
    #[error("Authorization error: {0}")]
    AuthorizationError(String),

    /// 결과 문서를 응답 스키마로 변환하지 못함
    ///
    /// 필수 필드 누락이나 타입 불일치는 기본값으로 대체하지 않고
    /// 반드시 이 에러로 드러냅니다.
    #[error("Mapping error: {0}")]
    MappingError(String),

    /// 요청한 리소스가 존재하지 않음
    #[error("Not found: {0}")]
    NotFound(String),

    /// 중복 데이터 생성 시도
    #[error("Conflict error: {0}")]
    ConflictError(String),

    /// 분류되지 않은 드라이버 오류
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// 내부 서버 에러
    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    /// 에러에 대응하는 HTTP 상태 코드를 반환합니다.
    pub fn http_status(&self) -> actix_web::http::StatusCode {
        use actix_web::http::StatusCode;

        match self {
            AppError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ConflictError(_) => StatusCode::CONFLICT,
            AppError::AuthorizationError(_) => StatusCode::FORBIDDEN,
            AppError::ConnectivityError(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        self.http_status()
    }

    /// HTTP 에러 응답을 생성합니다.
    ///
    /// 모든 에러 응답은 `{"error": "..."}` 형식을 따릅니다.
    /// 5xx 에러는 서버 로그에도 기록합니다.
    fn error_response(&self) -> actix_web::HttpResponse {
        let status = self.http_status();

        if status.is_server_error() {
            log::error!("❌ {}", self);
        }

        actix_web::HttpResponse::build(status)
            .json(serde_json::json!({
                "error": self.to_string()
            }))
    }
}

/// MongoDB 드라이버 에러를 분류합니다.
///
/// 연결 계열은 `ConnectivityError`, 인증/권한 계열은 `AuthorizationError`,
/// 나머지 명령 오류는 서버가 파이프라인을 거부한 것으로 보고 `ValidationError`로 변환합니다.
impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        match err.kind.as_ref() {
            ErrorKind::ServerSelection { .. }
            | ErrorKind::Io(_)
            | ErrorKind::ConnectionPoolCleared { .. } => {
                AppError::ConnectivityError(err.to_string())
            }
            ErrorKind::Authentication { .. } => AppError::AuthorizationError(err.to_string()),
            ErrorKind::Command(command_error) if command_error.code == UNAUTHORIZED_CODE => {
                AppError::AuthorizationError(err.to_string())
            }
            ErrorKind::Command(_) => AppError::ValidationError(err.to_string()),
            ErrorKind::Write(WriteFailure::WriteError(write_error))
                if write_error.code == DUPLICATE_KEY_CODE =>
            {
                AppError::ConflictError(err.to_string())
            }
            ErrorKind::BsonDeserialization(_) | ErrorKind::BsonSerialization(_) => {
                AppError::MappingError(err.to_string())
            }
            _ => AppError::DatabaseError(err.to_string()),
        }
    }
}

impl From<mongodb::bson::de::Error> for AppError {
    fn from(err: mongodb::bson::de::Error) -> Self {
        AppError::MappingError(err.to_string())
    }
}

impl From<mongodb::bson::ser::Error> for AppError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        AppError::MappingError(err.to_string())
    }
}

/// 요청 본문/경로 파라미터 검증 실패는 400으로 응답합니다.
impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::InvalidArgument(errors.to_string())
    }
}

/// 편의성을 위한 Result 타입 별칭
pub type AppResult<T> = Result<T, AppError>;

/// 외부 라이브러리 에러를 AppError로 변환하는 확장 trait
///
/// ```rust,ignore
/// use crate::core::errors::ErrorContext;
///
/// let port: u16 = raw.parse().context("Failed to parse PORT")?;
/// ```
pub trait ErrorContext<T> {
    /// 컨텍스트 정보와 함께 에러를 변환합니다.
    fn context(self, msg: &str) -> AppResult<T>;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: std::fmt::Display,
{
    fn context(self, msg: &str) -> AppResult<T> {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", msg, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;
    use actix_web::http::StatusCode;
    use mongodb::bson::doc;

    #[test]
    fn test_invalid_argument_response() {
        let error = AppError::InvalidArgument("limit must be positive".to_string());
        let response = error.error_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_connectivity_error_response() {
        let error = AppError::ConnectivityError("server selection timeout".to_string());
        let response = error.error_response();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_authorization_error_response() {
        let error = AppError::AuthorizationError("not authorized on test_db".to_string());
        let response = error.error_response();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_pipeline_and_mapping_errors_are_server_errors() {
        let validation = AppError::ValidationError("$out must be last".to_string());
        let mapping = AppError::MappingError("missing field `name`".to_string());

        assert_eq!(validation.error_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(mapping.error_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_io_error_is_connectivity_error() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let driver_error = mongodb::error::Error::from(io);

        assert!(matches!(AppError::from(driver_error), AppError::ConnectivityError(_)));
    }

    #[test]
    fn test_bson_deserialization_is_mapping_error() {
        #[derive(Debug, serde::Deserialize)]
        #[allow(dead_code)]
        struct Named {
            name: String,
        }

        let result: Result<Named, _> = mongodb::bson::from_document(doc! { "age": 3 });
        let error = AppError::from(result.unwrap_err());

        match error {
            AppError::MappingError(msg) => assert!(msg.contains("name")),
            other => panic!("Expected MappingError, got {:?}", other),
        }
    }

    #[test]
    fn test_validation_errors_are_invalid_arguments() {
        let mut errors = validator::ValidationErrors::new();
        errors.add("limit", validator::ValidationError::new("range"));

        assert!(matches!(AppError::from(errors), AppError::InvalidArgument(_)));
    }

    #[test]
    fn test_error_context_trait() {
        let result: Result<(), &str> = Err("original error");
        let app_result = result.context("Additional context");

        if let Err(AppError::InternalError(msg)) = app_result {
            assert!(msg.contains("Additional context"));
            assert!(msg.contains("original error"));
        } else {
            panic!("Expected InternalError");
        }
    }
}
