//! 사용자 검색 쿼리 파라미터
//!
//! `GET /api/v1/users/search?country=Korea&minAge=25&maxAge=35`
//!
//! 모든 조건은 선택이며 AND로 결합됩니다. `minBalance`가 있으면
//! 결과는 잔액 내림차순으로 정렬됩니다.

use mongodb::bson::{Document, doc};
use serde::Deserialize;

use crate::core::errors::{AppError, AppResult};
use crate::utils::string_utils::{deserialize_optional_string, escape_regex};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSearchQuery {
    /// 정확히 일치하는 나이
    pub age: Option<i32>,
    /// 이름 부분 일치 (대소문자 무시)
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub country: Option<String>,
    /// 이 나이 초과
    pub older_than: Option<i32>,
    pub min_age: Option<i32>,
    pub max_age: Option<i32>,
    pub min_balance: Option<f64>,
    /// 태그(역할) 포함
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub tag: Option<String>,
    /// 이메일 도메인 (`example.com`)
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub email_domain: Option<String>,
}

impl UserSearchQuery {
    /// MongoDB 필터 문서를 만듭니다.
    pub fn to_filter(&self) -> AppResult<Document> {
        if let (Some(min), Some(max)) = (self.min_age, self.max_age) {
            if min > max {
                return Err(AppError::InvalidArgument(format!(
                    "minAge ({}) must not exceed maxAge ({})",
                    min, max
                )));
            }
        }

        let mut filter = Document::new();

        let mut age = Document::new();
        if let Some(exact) = self.age {
            age.insert("$eq", exact);
        }
        if let Some(older_than) = self.older_than {
            age.insert("$gt", older_than);
        }
        if let Some(min) = self.min_age {
            age.insert("$gte", min);
        }
        if let Some(max) = self.max_age {
            age.insert("$lte", max);
        }
        if !age.is_empty() {
            filter.insert("age", age);
        }

        if let Some(name) = &self.name {
            filter.insert("name", doc! { "$regex": escape_regex(name), "$options": "i" });
        }
        if let Some(country) = &self.country {
            filter.insert("address.country", country.as_str());
        }
        if let Some(min_balance) = self.min_balance {
            filter.insert("balance", doc! { "$gte": min_balance });
        }
        if let Some(tag) = &self.tag {
            filter.insert("tags", tag.as_str());
        }
        if let Some(domain) = &self.email_domain {
            let domain = domain.trim_start_matches('@');
            filter.insert("email", doc! { "$regex": format!("{}$", escape_regex(domain)) });
        }

        Ok(filter)
    }

    /// 정렬 조건 (`minBalance` 검색일 때만)
    pub fn sort(&self) -> Option<Document> {
        self.min_balance.map(|_| doc! { "balance": -1 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_matches_everything() {
        let query = UserSearchQuery::default();

        assert_eq!(query.to_filter().unwrap(), Document::new());
        assert!(query.sort().is_none());
    }

    #[test]
    fn test_country_and_age_range() {
        let query = UserSearchQuery {
            country: Some("Korea".to_string()),
            min_age: Some(25),
            max_age: Some(35),
            ..Default::default()
        };

        assert_eq!(
            query.to_filter().unwrap(),
            doc! {
                "age": { "$gte": 25, "$lte": 35 },
                "address.country": "Korea",
            }
        );
    }

    #[test]
    fn test_inverted_age_range_is_rejected() {
        let query = UserSearchQuery { min_age: Some(40), max_age: Some(20), ..Default::default() };

        assert!(matches!(query.to_filter(), Err(AppError::InvalidArgument(_))));
    }

    #[test]
    fn test_name_is_escaped_and_case_insensitive() {
        let query = UserSearchQuery { name: Some("o.k".to_string()), ..Default::default() };

        assert_eq!(
            query.to_filter().unwrap(),
            doc! { "name": { "$regex": "o\\.k", "$options": "i" } }
        );
    }

    #[test]
    fn test_min_balance_sorts_descending() {
        let query = UserSearchQuery { min_balance: Some(1000.0), ..Default::default() };

        assert_eq!(query.to_filter().unwrap(), doc! { "balance": { "$gte": 1000.0 } });
        assert_eq!(query.sort(), Some(doc! { "balance": -1 }));
    }

    #[test]
    fn test_email_domain_anchors_at_end() {
        let query = UserSearchQuery { email_domain: Some("@example.com".to_string()), ..Default::default() };

        assert_eq!(
            query.to_filter().unwrap(),
            doc! { "email": { "$regex": "example\\.com$" } }
        );
    }

    #[test]
    fn test_deserialize_from_query_string() {
        let query: UserSearchQuery =
            serde_json::from_str(r#"{"olderThan": 30, "tag": " admin ", "emailDomain": ""}"#).unwrap();

        assert_eq!(query.older_than, Some(30));
        assert_eq!(query.tag.as_deref(), Some("admin"));
        assert_eq!(query.email_domain, None);
    }
}
