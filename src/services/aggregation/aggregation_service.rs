//! # 집계 서비스
//!
//! 각 엔드포인트의 흐름을 하나로 묶습니다.
//!
//! ```text
//! AggregationOperation ──build()──▶ Pipeline ──AggregationRepository──▶ Vec<Document> ──mapper──▶ 응답 타입
//! ```
//!
//! 서비스는 요청별 상태를 갖지 않습니다. 공유 자원은 드라이버의 커넥션 풀뿐입니다.
//!
//! ## 연산 목록
//!
//! | 메서드 | 스테이지 | 응답 |
//! |--------|----------|------|
//! | `find_by_age` | `$match` | `Vec<UserResponse>` |
//! | `group_by_country` | `$group` → `$project` | `Vec<CountrySummary>` |
//! | `project_name_and_email` | `$project` | `Vec<UserProjection>` |
//! | `sort_by_age_desc` | `$sort` | `Vec<UserResponse>` |
//! | `limit` / `skip` | `$limit` / `$skip` | `Vec<UserResponse>` |
//! | `unwind_tags` | `$unwind` | `Vec<Document>` |
//! | `project_sort_unwind` | `$project` → `$sort` → `$unwind` | `Vec<Document>` |
//! | `users_with_orders` | `$lookup` | `Vec<UserWithOrders>` |
//! | `add_balance_status` | `$addFields` | `Vec<Document>` |
//! | `count_by_country` | `$match` → `$count` | `i64` |
//! | `facet` | `$facet` | `Document` |
//! | `bucket_by_age` | `$bucket` | `Vec<Document>` |
//! | `sort_tags_by_count` | `$unwind` → `$sortByCount` | `Vec<Document>` |
//! | `hierarchy` | `$graphLookup` | `Vec<Document>` |
//! | `replace_root_address` | `$replaceRoot` | `Vec<Address>` |
//! | `merge_country_summary` | `$group` → `$merge` | `WriteStageResponse` |
//! | `out_senior_users` | `$match` → `$out` | `WriteStageResponse` |
//! | `sample` | `$sample` | `Vec<UserResponse>` |

use std::any::Any;
use std::sync::Arc;

use log::info;
use mongodb::bson::Document;
use once_cell::sync::OnceCell;

use crate::core::errors::AppResult;
use crate::core::registry::ServiceLocator;
use crate::domain::dto::aggregation::{CountrySummary, UserProjection, UserWithOrders, WriteStageResponse};
use crate::domain::dto::users::UserResponse;
use crate::domain::entities::Address;
use crate::domain::mapper;
use crate::pipeline::{AggregationOperation, Pipeline};
use crate::repositories::aggregation::AggregationRepository;

pub struct AggregationService {
    aggregation_repo: Arc<AggregationRepository>,
}

static AGGREGATION_SERVICE_INSTANCE: OnceCell<Arc<AggregationService>> = OnceCell::new();

impl AggregationService {
    pub fn instance() -> Arc<Self> {
        AGGREGATION_SERVICE_INSTANCE
            .get_or_init(|| Arc::new(Self::new()))
            .clone()
    }

    fn new() -> Self {
        Self {
            aggregation_repo: ServiceLocator::get::<AggregationRepository>(),
        }
    }

    pub fn with_repository(aggregation_repo: Arc<AggregationRepository>) -> Self {
        Self { aggregation_repo }
    }

    fn build(&self, operation: &AggregationOperation) -> AppResult<Pipeline> {
        let pipeline = operation.build(self.aggregation_repo.collections())?;
        info!("🧩 {} → [{}]", operation.name(), pipeline.describe());
        Ok(pipeline)
    }

    /// `users` 컬렉션에 대해 연산을 실행합니다.
    async fn run(&self, operation: AggregationOperation) -> AppResult<Vec<Document>> {
        let pipeline = self.build(&operation)?;
        let users = &self.aggregation_repo.collections().users;
        self.aggregation_repo.aggregate(users, &pipeline).await
    }

    async fn run_unique(&self, operation: AggregationOperation) -> AppResult<Option<Document>> {
        let pipeline = self.build(&operation)?;
        let users = &self.aggregation_repo.collections().users;
        self.aggregation_repo.aggregate_unique(users, &pipeline).await
    }

    async fn run_write(&self, operation: AggregationOperation, stage: &str, target: &str) -> AppResult<WriteStageResponse> {
        let pipeline = self.build(&operation)?;
        let users = &self.aggregation_repo.collections().users;
        self.aggregation_repo.aggregate_write(users, &pipeline).await?;

        info!("💾 {} wrote results into '{}'", operation.name(), target);
        Ok(WriteStageResponse::completed(operation.name(), stage, target))
    }

    pub async fn find_by_age(&self, age: i32) -> AppResult<Vec<UserResponse>> {
        mapper::map_users(self.run(AggregationOperation::MatchByAge(age)).await?)
    }

    pub async fn group_by_country(&self) -> AppResult<Vec<CountrySummary>> {
        mapper::map_documents(self.run(AggregationOperation::GroupByCountry).await?)
    }

    pub async fn project_name_and_email(&self) -> AppResult<Vec<UserProjection>> {
        mapper::map_documents(self.run(AggregationOperation::Projection).await?)
    }

    pub async fn sort_by_age_desc(&self) -> AppResult<Vec<UserResponse>> {
        mapper::map_users(self.run(AggregationOperation::SortByAge).await?)
    }

    pub async fn limit(&self, n: i64) -> AppResult<Vec<UserResponse>> {
        mapper::map_users(self.run(AggregationOperation::Limit(n)).await?)
    }

    pub async fn skip(&self, n: i64) -> AppResult<Vec<UserResponse>> {
        mapper::map_users(self.run(AggregationOperation::Skip(n)).await?)
    }

    pub async fn unwind_tags(&self) -> AppResult<Vec<Document>> {
        self.run(AggregationOperation::UnwindTags).await
    }

    pub async fn project_sort_unwind(&self) -> AppResult<Vec<Document>> {
        self.run(AggregationOperation::ProjectSortUnwind).await
    }

    pub async fn users_with_orders(&self) -> AppResult<Vec<UserWithOrders>> {
        let documents = self.run(AggregationOperation::WithOrders).await?;
        let email_field = &self.aggregation_repo.collections().order_user_email_field;
        mapper::map_users_with_orders(documents, email_field)
    }

    pub async fn add_balance_status(&self) -> AppResult<Vec<Document>> {
        self.run(AggregationOperation::BalanceStatus).await
    }

    /// 국가별 사용자 수. 일치하는 사용자가 없으면 0입니다.
    pub async fn count_by_country(&self, country: &str) -> AppResult<i64> {
        let result = self
            .run_unique(AggregationOperation::CountByCountry(country.to_string()))
            .await?;
        mapper::extract_count(result)
    }

    /// 결과가 없으면 빈 문서를 반환합니다.
    pub async fn facet(&self) -> AppResult<Document> {
        Ok(self.run_unique(AggregationOperation::Facet).await?.unwrap_or_default())
    }

    pub async fn bucket_by_age(&self) -> AppResult<Vec<Document>> {
        self.run(AggregationOperation::BucketByAge).await
    }

    pub async fn sort_tags_by_count(&self) -> AppResult<Vec<Document>> {
        self.run(AggregationOperation::TagsByCount).await
    }

    pub async fn hierarchy(&self) -> AppResult<Vec<Document>> {
        self.run(AggregationOperation::Hierarchy).await
    }

    pub async fn replace_root_address(&self) -> AppResult<Vec<Address>> {
        mapper::map_documents(self.run(AggregationOperation::ReplaceRootAddress).await?)
    }

    pub async fn merge_country_summary(&self) -> AppResult<WriteStageResponse> {
        let target = self.aggregation_repo.collections().country_summary.clone();
        self.run_write(AggregationOperation::MergeCountrySummary, "$merge", &target).await
    }

    pub async fn out_senior_users(&self) -> AppResult<WriteStageResponse> {
        let target = self.aggregation_repo.collections().senior_users.clone();
        self.run_write(AggregationOperation::OutSeniorUsers, "$out", &target).await
    }

    pub async fn sample(&self, size: i64) -> AppResult<Vec<UserResponse>> {
        mapper::map_users(self.run(AggregationOperation::Sample(size)).await?)
    }
}

fn aggregation_service_constructor() -> Box<dyn Any + Send + Sync> {
    Box::new(AggregationService::instance())
}

inventory::submit! {
    crate::core::registry::ServiceRegistration {
        name: "aggregation_service",
        constructor: aggregation_service_constructor,
    }
}
