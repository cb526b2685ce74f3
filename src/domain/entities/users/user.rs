//! User Entity Implementation
//!
//! `users` 컬렉션에 저장되는 사용자 문서입니다.
//! 저장 필드 이름은 camelCase(`createdAt`, `managerId`)를 따릅니다.

use mongodb::bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

/// 사용자 엔티티
///
/// 읽기 시 `_id`, `name`, `age`, `email`은 필수입니다.
/// 누락되면 기본값으로 채우지 않고 역직렬화에 실패합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub age: i32,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime>,
    /// 태그/역할 (`admin`, `vip` 등)
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub balance: f64,
    /// 상위 관리자 `_id` (`$graphLookup` 계층 탐색용)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager_id: Option<ObjectId>,
}

/// 내장 주소 문서
///
/// `$replaceRoot` 결과의 루트 문서이기도 합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub city: String,
    pub country: String,
}

impl User {
    /// 새 사용자 생성
    ///
    /// `_id`와 `createdAt`은 여기서 부여됩니다.
    pub fn new(name: String, age: i32, email: String) -> Self {
        Self {
            id: ObjectId::new(),
            name,
            age,
            email,
            address: None,
            created_at: Some(DateTime::now()),
            tags: Vec::new(),
            balance: 0.0,
            manager_id: None,
        }
    }

    pub fn with_address(mut self, city: impl Into<String>, country: impl Into<String>) -> Self {
        self.address = Some(Address { city: city.into(), country: country.into() });
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_balance(mut self, balance: f64) -> Self {
        self.balance = balance;
        self
    }

    pub fn with_manager(mut self, manager_id: ObjectId) -> Self {
        self.manager_id = Some(manager_id);
        self
    }
}
