//! # 사용자 리포지토리 구현
//!
//! `users` 컬렉션의 데이터 액세스 계층입니다.
//! 집계 예제가 사용할 사용자 문서를 적재하고, 단순 필터 기반의 파생 쿼리를 제공합니다.
//!
//! ## 인덱스
//!
//! | 필드 | 옵션 | 용도 |
//! |------|------|------|
//! | `email` | unique | 중복 가입 방지, `$lookup` 조인 키 |
//! | `address.country` | - | 국가별 그룹/카운트 |
//! | `age` | - | 나이 필터, 정렬 |
//! | `managerId` | sparse | `$graphLookup` 계층 탐색 |

use std::any::Any;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::TryStreamExt;
use futures_util::future::BoxFuture;
use log::{debug, info};
use mongodb::bson::{Document, doc, oid::ObjectId};
use mongodb::options::IndexOptions;
use mongodb::{Collection, IndexModel};
use once_cell::sync::OnceCell;

use crate::config::CollectionConfig;
use crate::core::errors::{AppError, AppResult};
use crate::core::registry::{Repository, ServiceLocator};
use crate::db::Database;
use crate::domain::entities::User;

/// 사용자 데이터 액세스 리포지토리
pub struct UserRepository {
    db: Arc<Database>,
    collections: Arc<CollectionConfig>,
}

static USER_REPOSITORY_INSTANCE: OnceCell<Arc<UserRepository>> = OnceCell::new();

impl UserRepository {
    pub fn instance() -> Arc<Self> {
        USER_REPOSITORY_INSTANCE
            .get_or_init(|| Arc::new(Self::new()))
            .clone()
    }

    fn new() -> Self {
        Self {
            db: ServiceLocator::get::<Database>(),
            collections: ServiceLocator::get::<CollectionConfig>(),
        }
    }

    pub fn with_database(db: Arc<Database>, collections: Arc<CollectionConfig>) -> Self {
        Self { db, collections }
    }

    fn collection(&self) -> Collection<User> {
        self.db.get_database().collection::<User>(&self.collections.users)
    }

    /// 새 사용자를 저장합니다.
    ///
    /// 같은 이메일이 이미 있으면 `ConflictError`를 반환합니다.
    /// 유니크 인덱스가 동시 요청 경합도 막아주며, 그 경우 드라이버의
    /// 중복 키 에러가 역시 `ConflictError`로 변환됩니다.
    pub async fn create(&self, user: User) -> AppResult<User> {
        if self.find_by_email(&user.email).await?.is_some() {
            return Err(AppError::ConflictError(format!("email already registered: {}", user.email)));
        }

        self.collection().insert_one(&user).await?;
        debug!("👤 user created: {}", user.id);

        Ok(user)
    }

    /// ID(24자리 hex)로 조회합니다. 형식이 잘못되면 `InvalidArgument`입니다.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<User>> {
        let object_id = ObjectId::parse_str(id)
            .map_err(|_| AppError::InvalidArgument(format!("invalid user id: {}", id)))?;

        Ok(self.collection().find_one(doc! { "_id": object_id }).await?)
    }

    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self.collection().find_one(doc! { "email": email }).await?)
    }

    /// 필터와 선택적 정렬 조건으로 조회합니다.
    pub async fn find(&self, filter: Document, sort: Option<Document>) -> AppResult<Vec<User>> {
        let collection = self.collection();
        let mut action = collection.find(filter);
        if let Some(sort) = sort {
            action = action.sort(sort);
        }

        let users: Vec<User> = action.await?.try_collect().await?;
        Ok(users)
    }

    async fn create_indexes(&self) -> AppResult<()> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "email": 1 })
                .options(IndexOptions::builder().unique(true).build())
                .build(),
            IndexModel::builder().keys(doc! { "address.country": 1 }).build(),
            IndexModel::builder().keys(doc! { "age": 1 }).build(),
            IndexModel::builder()
                .keys(doc! { "managerId": 1 })
                .options(IndexOptions::builder().sparse(true).build())
                .build(),
        ];

        self.collection().create_indexes(indexes).await?;
        info!("📇 indexes ensured on '{}'", self.collections.users);
        Ok(())
    }
}

#[async_trait]
impl Repository for UserRepository {
    fn name(&self) -> &str {
        "user"
    }

    fn collection_name(&self) -> &str {
        &self.collections.users
    }

    async fn init(&self) -> AppResult<()> {
        self.create_indexes().await
    }
}

fn user_repository_constructor() -> Box<dyn Any + Send + Sync> {
    Box::new(UserRepository::instance())
}

fn user_repository_init() -> BoxFuture<'static, AppResult<()>> {
    Box::pin(async { UserRepository::instance().init().await })
}

inventory::submit! {
    crate::core::registry::RepositoryRegistration {
        name: "user_repository",
        constructor: user_repository_constructor,
        init: user_repository_init,
    }
}
