//! # 사용자 관리 서비스 구현
//!
//! 집계 예제용 사용자 데이터를 적재/조회하는 서비스입니다.
//!
//! ```text
//! ┌─────────────────────────────┐
//! │         UserService         │
//! │ • 요청 → 엔티티 변환         │
//! │ • 검색 조건 → 필터 문서      │
//! │ • 엔티티 → 응답 DTO          │
//! └──────────────┬──────────────┘
//!                ▼
//! ┌─────────────────────────────┐
//! │        UserRepository       │
//! └─────────────────────────────┘
//! ```

use std::any::Any;
use std::sync::Arc;

use log::info;
use once_cell::sync::OnceCell;

use crate::core::errors::{AppError, AppResult};
use crate::core::registry::ServiceLocator;
use crate::domain::dto::users::{CreateUserRequest, UserResponse, UserSearchQuery};
use crate::repositories::users::UserRepository;

pub struct UserService {
    user_repo: Arc<UserRepository>,
}

static USER_SERVICE_INSTANCE: OnceCell<Arc<UserService>> = OnceCell::new();

impl UserService {
    pub fn instance() -> Arc<Self> {
        USER_SERVICE_INSTANCE
            .get_or_init(|| Arc::new(Self::new()))
            .clone()
    }

    fn new() -> Self {
        Self {
            user_repo: ServiceLocator::get::<UserRepository>(),
        }
    }

    pub fn with_repository(user_repo: Arc<UserRepository>) -> Self {
        Self { user_repo }
    }

    /// 새 사용자 생성
    ///
    /// 요청은 핸들러에서 이미 `validate()`를 통과한 상태여야 합니다.
    pub async fn create_user(&self, request: CreateUserRequest) -> AppResult<UserResponse> {
        let user = request.into_entity()?;
        let created = self.user_repo.create(user).await?;

        info!("👤 새 사용자 생성: {} ({})", created.email, created.id);
        Ok(UserResponse::from(created))
    }

    pub async fn get_user_by_id(&self, id: &str) -> AppResult<UserResponse> {
        self.user_repo
            .find_by_id(id)
            .await?
            .map(UserResponse::from)
            .ok_or_else(|| AppError::NotFound(format!("user not found: {}", id)))
    }

    pub async fn get_user_by_email(&self, email: &str) -> AppResult<UserResponse> {
        let email = email.trim().to_lowercase();
        self.user_repo
            .find_by_email(&email)
            .await?
            .map(UserResponse::from)
            .ok_or_else(|| AppError::NotFound(format!("user not found: {}", email)))
    }

    /// 조건 검색. 빈 쿼리는 전체 사용자를 반환합니다.
    pub async fn search(&self, query: &UserSearchQuery) -> AppResult<Vec<UserResponse>> {
        let filter = query.to_filter()?;
        let users = self.user_repo.find(filter, query.sort()).await?;

        Ok(users.into_iter().map(UserResponse::from).collect())
    }
}

fn user_service_constructor() -> Box<dyn Any + Send + Sync> {
    Box::new(UserService::instance())
}

inventory::submit! {
    crate::core::registry::ServiceRegistration {
        name: "user_service",
        constructor: user_service_constructor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CollectionConfig;
    use crate::db::test_support::{drop_database, isolated_database};
    use crate::domain::dto::users::AddressRequest;

    fn request(name: &str, age: i32, country: &str, balance: f64, tags: &[&str]) -> CreateUserRequest {
        CreateUserRequest {
            name: name.to_string(),
            age,
            email: format!("{}@example.com", name.to_lowercase()),
            address: Some(AddressRequest { city: "City".to_string(), country: country.to_string() }),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            balance,
            manager_id: None,
        }
    }

    #[actix_web::test]
    async fn test_search_against_database() {
        let Some(db) = isolated_database().await else {
            return;
        };
        let repo = UserRepository::with_database(db.clone(), Arc::new(CollectionConfig::default()));
        let service = UserService::with_repository(Arc::new(repo));

        let kim = service.create_user(request("Kim", 45, "Korea", 5000.0, &["admin"])).await.unwrap();
        service.create_user(request("Lee", 28, "Korea", 800.0, &["user"])).await.unwrap();
        service.create_user(request("Sato", 33, "Japan", 1200.0, &["user"])).await.unwrap();

        let rich = service
            .search(&UserSearchQuery { min_balance: Some(1000.0), ..Default::default() })
            .await
            .unwrap();
        let korea_young = service
            .search(&UserSearchQuery {
                country: Some("Korea".to_string()),
                min_age: Some(20),
                max_age: Some(30),
                ..Default::default()
            })
            .await
            .unwrap();
        let admins = service
            .search(&UserSearchQuery { tag: Some("admin".to_string()), ..Default::default() })
            .await
            .unwrap();
        let by_id = service.get_user_by_id(&kim.id).await.unwrap();
        let missing = service.get_user_by_email("nobody@example.com").await;

        drop_database(&db).await;

        assert_eq!(rich.iter().map(|u| u.name.as_str()).collect::<Vec<_>>(), vec!["Kim", "Sato"]);
        assert_eq!(korea_young.len(), 1);
        assert_eq!(admins.len(), 1);
        assert_eq!(by_id.email, "kim@example.com");
        assert!(matches!(missing, Err(AppError::NotFound(_))));
    }
}
