//! 문자열 처리 유틸리티
//!
//! 경로/쿼리 파라미터 정리와 MongoDB 정규식 필터 생성을 위한 보조 함수들입니다.

use serde::Deserialize;
use crate::core::errors::AppError;

/// 필수 문자열을 검증하고 앞뒤 공백을 제거합니다.
///
/// 비어 있으면 `AppError::InvalidArgument`를 반환합니다.
pub fn validate_required_string(value: &str, field_name: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidArgument(format!("{} must not be empty", field_name)));
    }
    Ok(trimmed.to_string())
}

/// 선택적 문자열을 정리합니다. 공백뿐인 값은 `None`이 됩니다.
pub fn clean_optional_string(value: Option<String>) -> Option<String> {
    value.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// serde용 정리 함수
///
/// ```rust,ignore
/// #[serde(default, deserialize_with = "deserialize_optional_string")]
/// pub country: Option<String>,
/// ```
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(clean_optional_string(opt))
}

/// 이메일 필드용 serde 함수. 검증 전에 공백 제거와 소문자 변환을 합니다.
///
/// ```rust,ignore
/// #[serde(deserialize_with = "deserialize_email")]
/// #[validate(email)]
/// pub email: String,
/// ```
pub fn deserialize_email<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(raw.trim().to_lowercase())
}

/// 정규식 메타 문자를 이스케이프합니다.
///
/// 사용자 입력을 `$regex` 필터에 그대로 넣지 않기 위해 사용합니다.
pub fn escape_regex(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(
            c,
            '\\' | '.' | '+' | '*' | '?' | '(' | ')' | '|' | '[' | ']' | '{' | '}' | '^' | '$'
        ) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_required_string() {
        assert_eq!(validate_required_string("Korea", "country").unwrap(), "Korea");
        assert_eq!(validate_required_string("  Japan  ", "country").unwrap(), "Japan");

        assert!(matches!(
            validate_required_string("   ", "country"),
            Err(AppError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_clean_optional_string() {
        assert_eq!(clean_optional_string(Some("  admin ".to_string())), Some("admin".to_string()));
        assert_eq!(clean_optional_string(Some("\t\n".to_string())), None);
        assert_eq!(clean_optional_string(None), None);
    }

    #[test]
    fn test_deserialize_optional_string() {
        #[derive(Deserialize)]
        struct Query {
            #[serde(default, deserialize_with = "deserialize_optional_string")]
            tag: Option<String>,
        }

        let parsed: Query = serde_json::from_str(r#"{"tag": "  vip  "}"#).unwrap();
        assert_eq!(parsed.tag, Some("vip".to_string()));

        let parsed: Query = serde_json::from_str(r#"{"tag": "   "}"#).unwrap();
        assert_eq!(parsed.tag, None);

        let parsed: Query = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed.tag, None);
    }

    #[test]
    fn test_deserialize_email_trims_and_lowercases() {
        #[derive(Deserialize)]
        struct Body {
            #[serde(deserialize_with = "deserialize_email")]
            email: String,
        }

        let parsed: Body = serde_json::from_str(r#"{"email": "  Kim@Example.COM \n"}"#).unwrap();
        assert_eq!(parsed.email, "kim@example.com");
    }

    #[test]
    fn test_escape_regex() {
        assert_eq!(escape_regex("example.com"), "example\\.com");
        assert_eq!(escape_regex("a+b(c)"), "a\\+b\\(c\\)");
        assert_eq!(escape_regex("plain"), "plain");
    }
}
