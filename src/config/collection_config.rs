//! 컬렉션 및 필드 이름 설정
//!
//! 파이프라인 빌더가 참조하는 모든 컬렉션 이름과 조인 필드 이름을 한 곳에 모읍니다.
//! 주문 문서의 사용자 이메일 필드(`user_email`)는 엔티티 직렬화와 `$lookup`의
//! `foreignField`가 같은 값을 공유해야 하므로 여기서만 정의합니다.

use std::env;

/// 주문 문서에서 사용자 이메일을 담는 필드의 기본 이름
pub const DEFAULT_ORDER_USER_EMAIL_FIELD: &str = "user_email";

/// 파이프라인에서 사용하는 컬렉션 이름 모음
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionConfig {
    /// 사용자 컬렉션 (`users`)
    pub users: String,
    /// 주문 컬렉션 (`orders`)
    pub orders: String,
    /// `$merge` 대상 컬렉션 (`country_summary`)
    pub country_summary: String,
    /// `$out` 대상 컬렉션 (`senior_users`)
    pub senior_users: String,
    /// 주문 문서의 사용자 이메일 필드 이름
    pub order_user_email_field: String,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            users: "users".to_string(),
            orders: "orders".to_string(),
            country_summary: "country_summary".to_string(),
            senior_users: "senior_users".to_string(),
            order_user_email_field: DEFAULT_ORDER_USER_EMAIL_FIELD.to_string(),
        }
    }
}

impl CollectionConfig {
    /// 환경 변수에서 설정을 읽습니다. 비어 있거나 없는 값은 기본값을 사용합니다.
    ///
    /// - `USERS_COLLECTION`
    /// - `ORDERS_COLLECTION`
    /// - `COUNTRY_SUMMARY_COLLECTION`
    /// - `SENIOR_USERS_COLLECTION`
    /// - `ORDERS_USER_EMAIL_FIELD`
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            users: read_or("USERS_COLLECTION", defaults.users),
            orders: read_or("ORDERS_COLLECTION", defaults.orders),
            country_summary: read_or("COUNTRY_SUMMARY_COLLECTION", defaults.country_summary),
            senior_users: read_or("SENIOR_USERS_COLLECTION", defaults.senior_users),
            order_user_email_field: read_or(
                "ORDERS_USER_EMAIL_FIELD",
                defaults.order_user_email_field,
            ),
        }
    }
}

fn read_or(key: &str, default: String) -> String {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or(default)
}
