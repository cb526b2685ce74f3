//! # 집계 실행 리포지토리
//!
//! 파이프라인을 지정된 컬렉션에 대해 실행하고 결과 문서를 돌려줍니다.
//!
//! ## 실행 흐름
//!
//! ```text
//! Pipeline ──validate()──▶ to_documents() ──aggregate()──▶ Cursor<Document> ──try_collect()──▶ Vec<Document>
//! ```
//!
//! 1. 구조 검증 실패는 서버에 보내기 전에 `ValidationError`로 반환합니다.
//! 2. 드라이버 에러는 `From<mongodb::error::Error>`로 분류됩니다
//!    (연결 → `ConnectivityError`, 권한 → `AuthorizationError`, 명령 거부 → `ValidationError`).
//! 3. 재시도는 하지 않습니다. 타임아웃과 풀 관리는 드라이버 설정을 따릅니다.
//!
//! ## 결과 의도
//!
//! | 메서드 | 의도 | 반환 |
//! |--------|------|------|
//! | [`AggregationRepository::aggregate`] | 전체 결과 | `Vec<Document>` |
//! | [`AggregationRepository::aggregate_unique`] | 단일 결과 (`$count`, `$facet`) | `Option<Document>` |
//! | [`AggregationRepository::aggregate_write`] | 쓰기 스테이지 (`$merge`, `$out`) | `()` |

use std::any::Any;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use futures_util::TryStreamExt;
use futures_util::future::BoxFuture;
use log::{debug, info};
use mongodb::Collection;
use mongodb::bson::Document;
use once_cell::sync::OnceCell;

use crate::config::CollectionConfig;
use crate::core::errors::{AppError, AppResult};
use crate::core::registry::{Repository, ServiceLocator};
use crate::db::Database;
use crate::domain::mapper::expect_unique;
use crate::pipeline::Pipeline;

pub struct AggregationRepository {
    db: Arc<Database>,
    collections: Arc<CollectionConfig>,
}

static AGGREGATION_REPOSITORY_INSTANCE: OnceCell<Arc<AggregationRepository>> = OnceCell::new();

impl AggregationRepository {
    pub fn instance() -> Arc<Self> {
        AGGREGATION_REPOSITORY_INSTANCE
            .get_or_init(|| Arc::new(Self::new()))
            .clone()
    }

    fn new() -> Self {
        Self {
            db: ServiceLocator::get::<Database>(),
            collections: ServiceLocator::get::<CollectionConfig>(),
        }
    }

    /// 레지스트리를 거치지 않고 직접 구성합니다.
    pub fn with_database(db: Arc<Database>, collections: Arc<CollectionConfig>) -> Self {
        Self { db, collections }
    }

    pub fn collections(&self) -> &CollectionConfig {
        &self.collections
    }

    fn collection(&self, name: &str) -> Collection<Document> {
        self.db.get_database().collection::<Document>(name)
    }

    /// 파이프라인을 실행하고 모든 결과 문서를 반환합니다.
    pub async fn aggregate(&self, collection: &str, pipeline: &Pipeline) -> AppResult<Vec<Document>> {
        pipeline.validate()?;

        let started = Instant::now();
        debug!("🔎 aggregate on '{}': {}", collection, pipeline.describe());

        let cursor = self.collection(collection).aggregate(pipeline.to_documents()).await?;
        let documents: Vec<Document> = cursor.try_collect().await?;

        info!(
            "📊 '{}' [{}] → {} documents ({} ms)",
            collection,
            pipeline.describe(),
            documents.len(),
            started.elapsed().as_millis()
        );

        Ok(documents)
    }

    /// 결과가 최대 한 개인 파이프라인을 실행합니다.
    ///
    /// 결과가 둘 이상이면 `MappingError`입니다.
    pub async fn aggregate_unique(&self, collection: &str, pipeline: &Pipeline) -> AppResult<Option<Document>> {
        let documents = self.aggregate(collection, pipeline).await?;
        expect_unique(documents)
    }

    /// `$merge` / `$out`으로 끝나는 파이프라인을 실행합니다.
    ///
    /// 마지막 스테이지가 쓰기 스테이지가 아니면 `ValidationError`입니다.
    pub async fn aggregate_write(&self, collection: &str, pipeline: &Pipeline) -> AppResult<()> {
        if !pipeline.writes_output() {
            return Err(AppError::ValidationError(format!(
                "pipeline [{}] does not end with $merge or $out",
                pipeline.describe()
            )));
        }

        let documents = self.aggregate(collection, pipeline).await?;
        if !documents.is_empty() {
            debug!("write-stage pipeline returned {} documents", documents.len());
        }

        Ok(())
    }
}

#[async_trait]
impl Repository for AggregationRepository {
    fn name(&self) -> &str {
        "aggregation"
    }

    fn collection_name(&self) -> &str {
        &self.collections.users
    }

    async fn init(&self) -> AppResult<()> {
        debug!("aggregation repository ready on '{}'", self.db.database_name());
        Ok(())
    }
}

fn aggregation_repository_constructor() -> Box<dyn Any + Send + Sync> {
    Box::new(AggregationRepository::instance())
}

fn aggregation_repository_init() -> BoxFuture<'static, AppResult<()>> {
    Box::pin(async { AggregationRepository::instance().init().await })
}

inventory::submit! {
    crate::core::registry::RepositoryRegistration {
        name: "aggregation_repository",
        constructor: aggregation_repository_constructor,
        init: aggregation_repository_init,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::{drop_database, isolated_database, unconnected_database};
    use crate::pipeline::SortOrder;
    use mongodb::bson::doc;

    #[actix_web::test]
    async fn test_invalid_pipeline_fails_before_database_call() {
        let repo = AggregationRepository::with_database(
            unconnected_database().await,
            Arc::new(CollectionConfig::default()),
        );
        let pipeline = Pipeline::new()
            .out("senior_users")
            .unwrap()
            .matching(doc! { "age": 1 });

        let result = repo.aggregate("users", &pipeline).await;

        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[actix_web::test]
    async fn test_aggregate_write_requires_write_stage() {
        let repo = AggregationRepository::with_database(
            unconnected_database().await,
            Arc::new(CollectionConfig::default()),
        );
        let pipeline = Pipeline::new().sort("age", SortOrder::Ascending);

        let result = repo.aggregate_write("users", &pipeline).await;

        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[actix_web::test]
    async fn test_aggregate_against_database() {
        let Some(db) = isolated_database().await else {
            return;
        };
        let repo = AggregationRepository::with_database(db.clone(), Arc::new(CollectionConfig::default()));

        db.get_database()
            .collection::<Document>("users")
            .insert_many(vec![doc! { "age": 20 }, doc! { "age": 30 }, doc! { "age": 30 }])
            .await
            .unwrap();

        let thirty = repo
            .aggregate("users", &Pipeline::new().matching(doc! { "age": 30 }))
            .await
            .unwrap();
        let count = repo
            .aggregate_unique("users", &Pipeline::new().count("count").unwrap())
            .await
            .unwrap();
        let many = repo
            .aggregate_unique("users", &Pipeline::new().matching(doc! {}))
            .await;

        drop_database(&db).await;

        assert_eq!(thirty.len(), 2);
        assert_eq!(count.unwrap().get_i32("count").unwrap(), 3);
        assert!(matches!(many, Err(AppError::MappingError(_))));
    }
}
