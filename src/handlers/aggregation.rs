//! # Aggregation HTTP Handlers
//!
//! `/agg/users/...` 엔드포인트 핸들러입니다. 각 핸들러는 하나의 집계 연산에 대응합니다.
//!
//! ## 처리 순서
//!
//! 1. 경로 파라미터 추출 (타입 오류 → `PathConfig` 에러 핸들러 → 400)
//! 2. `validate()`로 범위 검증 (음수 limit 등 → 400)
//! 3. `AggregationService::instance()` 호출
//!
//! 검증은 서비스 인스턴스를 얻기 전에 끝나므로 잘못된 요청은 데이터베이스에 닿지 않습니다.
//!
//! | 메서드 | 경로 | 응답 |
//! |--------|------|------|
//! | `GET` | `/users/age/{age}` | `[User]` |
//! | `GET` | `/users/group-by-country` | `[CountrySummary]` |
//! | `GET` | `/users/projection` | `[UserProjection]` |
//! | `GET` | `/users/sort-by-age` | `[User]` |
//! | `GET` | `/users/limit/{limit}` | `[User]` |
//! | `GET` | `/users/skip/{skip}` | `[User]` |
//! | `GET` | `/users/unwind-tags` | `[Document]` |
//! | `GET` | `/users/project-sort-unwind` | `[Document]` |
//! | `GET` | `/users/with-orders` | `[UserWithOrders]` |
//! | `GET` | `/users/add-balance-status` | `[Document]` |
//! | `GET` | `/users/count/{country}` | integer |
//! | `GET` | `/users/facet-example` | `Document` |
//! | `GET` | `/users/bucket-age` | `[Document]` |
//! | `GET` | `/users/sort-tags-by-count` | `[Document]` |
//! | `GET` | `/users/hierarchy` | `[Document]` |
//! | `GET` | `/users/replace-root-address` | `[Address]` |
//! | `POST` | `/users/merge-country-summary` | `WriteStageResponse` |
//! | `POST` | `/users/out-senior-users` | `WriteStageResponse` |
//! | `GET` | `/users/sample/{size}` | `[User]` |

use actix_web::{HttpResponse, get, post, web};
use validator::Validate;

use crate::core::errors::AppError;
use crate::domain::dto::aggregation::{AgePath, CountryPath, LimitPath, SamplePath, SkipPath};
use crate::services::aggregation::AggregationService;
use crate::utils::string_utils::validate_required_string;

#[get("/users/age/{age}")]
pub async fn users_by_age(path: web::Path<AgePath>) -> Result<HttpResponse, AppError> {
    let users = AggregationService::instance().find_by_age(path.age).await?;
    Ok(HttpResponse::Ok().json(users))
}

#[get("/users/group-by-country")]
pub async fn group_by_country() -> Result<HttpResponse, AppError> {
    let summaries = AggregationService::instance().group_by_country().await?;
    Ok(HttpResponse::Ok().json(summaries))
}

#[get("/users/projection")]
pub async fn projection() -> Result<HttpResponse, AppError> {
    let projections = AggregationService::instance().project_name_and_email().await?;
    Ok(HttpResponse::Ok().json(projections))
}

#[get("/users/sort-by-age")]
pub async fn sort_by_age() -> Result<HttpResponse, AppError> {
    let users = AggregationService::instance().sort_by_age_desc().await?;
    Ok(HttpResponse::Ok().json(users))
}

#[get("/users/limit/{limit}")]
pub async fn limit(path: web::Path<LimitPath>) -> Result<HttpResponse, AppError> {
    path.validate()?;

    let users = AggregationService::instance().limit(path.limit).await?;
    Ok(HttpResponse::Ok().json(users))
}

#[get("/users/skip/{skip}")]
pub async fn skip(path: web::Path<SkipPath>) -> Result<HttpResponse, AppError> {
    path.validate()?;

    let users = AggregationService::instance().skip(path.skip).await?;
    Ok(HttpResponse::Ok().json(users))
}

#[get("/users/unwind-tags")]
pub async fn unwind_tags() -> Result<HttpResponse, AppError> {
    let documents = AggregationService::instance().unwind_tags().await?;
    Ok(HttpResponse::Ok().json(documents))
}

#[get("/users/project-sort-unwind")]
pub async fn project_sort_unwind() -> Result<HttpResponse, AppError> {
    let documents = AggregationService::instance().project_sort_unwind().await?;
    Ok(HttpResponse::Ok().json(documents))
}

#[get("/users/with-orders")]
pub async fn with_orders() -> Result<HttpResponse, AppError> {
    let users = AggregationService::instance().users_with_orders().await?;
    Ok(HttpResponse::Ok().json(users))
}

#[get("/users/add-balance-status")]
pub async fn add_balance_status() -> Result<HttpResponse, AppError> {
    let documents = AggregationService::instance().add_balance_status().await?;
    Ok(HttpResponse::Ok().json(documents))
}

#[get("/users/count/{country}")]
pub async fn count_by_country(path: web::Path<CountryPath>) -> Result<HttpResponse, AppError> {
    path.validate()?;
    let country = validate_required_string(&path.country, "country")?;

    let count = AggregationService::instance().count_by_country(&country).await?;
    Ok(HttpResponse::Ok().json(count))
}

#[get("/users/facet-example")]
pub async fn facet_example() -> Result<HttpResponse, AppError> {
    let document = AggregationService::instance().facet().await?;
    Ok(HttpResponse::Ok().json(document))
}

#[get("/users/bucket-age")]
pub async fn bucket_age() -> Result<HttpResponse, AppError> {
    let buckets = AggregationService::instance().bucket_by_age().await?;
    Ok(HttpResponse::Ok().json(buckets))
}

#[get("/users/sort-tags-by-count")]
pub async fn sort_tags_by_count() -> Result<HttpResponse, AppError> {
    let counts = AggregationService::instance().sort_tags_by_count().await?;
    Ok(HttpResponse::Ok().json(counts))
}

#[get("/users/hierarchy")]
pub async fn hierarchy() -> Result<HttpResponse, AppError> {
    let documents = AggregationService::instance().hierarchy().await?;
    Ok(HttpResponse::Ok().json(documents))
}

#[get("/users/replace-root-address")]
pub async fn replace_root_address() -> Result<HttpResponse, AppError> {
    let addresses = AggregationService::instance().replace_root_address().await?;
    Ok(HttpResponse::Ok().json(addresses))
}

#[post("/users/merge-country-summary")]
pub async fn merge_country_summary() -> Result<HttpResponse, AppError> {
    let ack = AggregationService::instance().merge_country_summary().await?;
    Ok(HttpResponse::Ok().json(ack))
}

#[post("/users/out-senior-users")]
pub async fn out_senior_users() -> Result<HttpResponse, AppError> {
    let ack = AggregationService::instance().out_senior_users().await?;
    Ok(HttpResponse::Ok().json(ack))
}

#[get("/users/sample/{size}")]
pub async fn sample(path: web::Path<SamplePath>) -> Result<HttpResponse, AppError> {
    path.validate()?;

    let users = AggregationService::instance().sample(path.size).await?;
    Ok(HttpResponse::Ok().json(users))
}
