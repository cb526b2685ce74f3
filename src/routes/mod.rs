//! # Route Configuration
//!
//! 애플리케이션의 모든 라우트와 추출기(extractor) 설정을 한 곳에서 구성합니다.
//!
//! ```text
//! /health                         헬스 체크 + DB ping
//! /agg/users/...                  집계 예제 (19개)
//! /api/v1/users/...               사용자 적재/조회
//! /api/v1/orders/...              주문 적재/조회
//! ```
//!
//! 경로/쿼리/JSON 추출 실패는 모두 `AppError::InvalidArgument`(400)로 응답합니다.

use actix_web::{HttpRequest, HttpResponse, web};
use serde_json::json;

use crate::core::errors::AppError;
use crate::core::registry::ServiceLocator;
use crate::db::Database;
use crate::handlers;

/// 기동 시 출력할 라우트 목록 `(method, path, stage)`
pub const ROUTES: &[(&str, &str, &str)] = &[
    ("GET", "/health", "ping"),
    ("GET", "/agg/users/age/{age}", "$match"),
    ("GET", "/agg/users/group-by-country", "$group → $project"),
    ("GET", "/agg/users/projection", "$project"),
    ("GET", "/agg/users/sort-by-age", "$sort"),
    ("GET", "/agg/users/limit/{limit}", "$limit"),
    ("GET", "/agg/users/skip/{skip}", "$skip"),
    ("GET", "/agg/users/unwind-tags", "$unwind"),
    ("GET", "/agg/users/project-sort-unwind", "$project → $sort → $unwind"),
    ("GET", "/agg/users/with-orders", "$lookup"),
    ("GET", "/agg/users/add-balance-status", "$addFields"),
    ("GET", "/agg/users/count/{country}", "$match → $count"),
    ("GET", "/agg/users/facet-example", "$facet"),
    ("GET", "/agg/users/bucket-age", "$bucket"),
    ("GET", "/agg/users/sort-tags-by-count", "$unwind → $sortByCount"),
    ("GET", "/agg/users/hierarchy", "$graphLookup"),
    ("GET", "/agg/users/replace-root-address", "$replaceRoot"),
    ("POST", "/agg/users/merge-country-summary", "$group → $merge"),
    ("POST", "/agg/users/out-senior-users", "$match → $out"),
    ("GET", "/agg/users/sample/{size}", "$sample"),
    ("POST", "/api/v1/users", "insert"),
    ("GET", "/api/v1/users/search", "find"),
    ("GET", "/api/v1/users/by-email/{email}", "findOne"),
    ("GET", "/api/v1/users/{id}", "findOne"),
    ("POST", "/api/v1/orders", "insert"),
    ("GET", "/api/v1/orders/by-user/{email}", "find"),
];

pub fn configure_all_routes(cfg: &mut web::ServiceConfig) {
    configure_extractors(cfg);

    // Health check endpoint
    cfg.service(health_check);

    configure_aggregation_routes(cfg);
    configure_user_routes(cfg);
    configure_order_routes(cfg);
}

/// 추출기 실패를 400 JSON 응답으로 통일합니다.
fn configure_extractors(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::PathConfig::default().error_handler(|err, req: &HttpRequest| {
        AppError::InvalidArgument(format!("{} ({})", err, req.path())).into()
    }));
    cfg.app_data(web::QueryConfig::default().error_handler(|err, _req| {
        AppError::InvalidArgument(err.to_string()).into()
    }));
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AppError::InvalidArgument(err.to_string()).into()
    }));
}

fn configure_aggregation_routes(cfg: &mut web::ServiceConfig) {
    use handlers::aggregation as agg;

    cfg.service(
        web::scope("/agg")
            .service(agg::users_by_age)
            .service(agg::group_by_country)
            .service(agg::projection)
            .service(agg::sort_by_age)
            .service(agg::limit)
            .service(agg::skip)
            .service(agg::unwind_tags)
            .service(agg::project_sort_unwind)
            .service(agg::with_orders)
            .service(agg::add_balance_status)
            .service(agg::count_by_country)
            .service(agg::facet_example)
            .service(agg::bucket_age)
            .service(agg::sort_tags_by_count)
            .service(agg::hierarchy)
            .service(agg::replace_root_address)
            .service(agg::merge_country_summary)
            .service(agg::out_senior_users)
            .service(agg::sample),
    );
}

fn configure_user_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/users")
            .service(handlers::users::create_user)
            .service(handlers::users::search_users)
            .service(handlers::users::get_user_by_email)
            .service(handlers::users::get_user),
    );
}

fn configure_order_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/orders")
            .service(handlers::orders::create_order)
            .service(handlers::orders::orders_by_user),
    );
}

/// 프로세스 상태와 데이터베이스 `ping` 결과
///
/// 데이터베이스가 등록되지 않았거나 응답하지 않으면 503입니다.
#[actix_web::get("/health")]
async fn health_check() -> HttpResponse {
    let database = match ServiceLocator::try_get::<Database>() {
        Some(db) => match db.ping().await {
            Ok(()) => "up",
            Err(e) => {
                log::warn!("⚠️ health check ping failed: {}", e);
                "down"
            }
        },
        None => "not_initialized",
    };

    let body = json!({
        "status": if database == "up" { "healthy" } else { "degraded" },
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "database": database,
    });

    if database == "up" {
        HttpResponse::Ok().json(body)
    } else {
        HttpResponse::ServiceUnavailable().json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::App;
    use actix_web::test as actix_test;
    use serde_json::Value;

    #[actix_web::test]
    async fn test_negative_limit_is_bad_request() {
        let app = actix_test::init_service(App::new().configure(configure_all_routes)).await;

        let req = actix_test::TestRequest::get().uri("/agg/users/limit/-1").to_request();
        let resp = actix_test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(resp).await;
        assert!(body["error"].as_str().unwrap().contains("limit"));
    }

    #[actix_web::test]
    async fn test_negative_skip_and_zero_sample_are_bad_requests() {
        let app = actix_test::init_service(App::new().configure(configure_all_routes)).await;

        for uri in ["/agg/users/skip/-2", "/agg/users/sample/0"] {
            let req = actix_test::TestRequest::get().uri(uri).to_request();
            let resp = actix_test::call_service(&app, req).await;

            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", uri);
        }
    }

    #[actix_web::test]
    async fn test_non_numeric_age_is_bad_request() {
        let app = actix_test::init_service(App::new().configure(configure_all_routes)).await;

        let req = actix_test::TestRequest::get().uri("/agg/users/age/abc").to_request();
        let resp = actix_test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(resp).await;
        assert!(body["error"].as_str().unwrap().starts_with("Invalid argument"));
    }

    #[actix_web::test]
    async fn test_malformed_json_body_is_bad_request() {
        let app = actix_test::init_service(App::new().configure(configure_all_routes)).await;

        let req = actix_test::TestRequest::post()
            .uri("/api/v1/users")
            .insert_header(("content-type", "application/json"))
            .set_payload("{\"name\": ")
            .to_request();
        let resp = actix_test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_invalid_user_body_is_bad_request() {
        let app = actix_test::init_service(App::new().configure(configure_all_routes)).await;

        let req = actix_test::TestRequest::post()
            .uri("/api/v1/users")
            .set_json(json!({ "name": "Kim", "age": 30, "email": "not-an-email" }))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_inverted_search_range_is_bad_request() {
        let app = actix_test::init_service(App::new().configure(configure_all_routes)).await;

        let req = actix_test::TestRequest::get()
            .uri("/api/v1/users/search?minAge=40&maxAge=20")
            .to_request();
        let resp = actix_test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_health_without_database_is_degraded() {
        let app = actix_test::init_service(App::new().configure(configure_all_routes)).await;

        let req = actix_test::TestRequest::get().uri("/health").to_request();
        let resp = actix_test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body: Value = actix_test::read_body_json(resp).await;
        assert_eq!(body["status"], "degraded");
        assert_eq!(body["database"], "not_initialized");
    }

    #[test]
    fn test_route_table_covers_every_aggregation_endpoint() {
        let aggregation_routes = ROUTES.iter().filter(|(_, path, _)| path.starts_with("/agg/")).count();

        assert_eq!(aggregation_routes, 19);
    }
}
