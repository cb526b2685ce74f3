//! MongoDB 집계 예제 서비스 메인 애플리케이션
//!
//! Actix-web 기반의 HTTP 서버를 구동하고 모든 리포지토리/서비스를 초기화합니다.
//! 시작 시 MongoDB `ping`에 실패하면 프로세스는 종료됩니다.

use std::io;
use std::sync::Arc;

use actix_cors::Cors;
use actix_governor::{Governor, GovernorConfigBuilder};
use actix_web::http::header;
use actix_web::{App, HttpServer, middleware};
use dotenv::dotenv;
use env_logger::Env;
use log::{error, info, warn};

use mongo_aggregation_service::config::{CollectionConfig, Environment, RateLimitConfig, ServerConfig};
use mongo_aggregation_service::core::registry::ServiceLocator;
use mongo_aggregation_service::db::Database;
use mongo_aggregation_service::routes::{ROUTES, configure_all_routes};
use mongo_aggregation_service::utils::display_terminal::print_route_table;

#[actix_web::main]
async fn main() -> io::Result<()> {
    // 환경 설정 및 로깅 초기화
    let env_file = load_env_file();
    let environment = Environment::current();
    init_logging(&environment);

    info!("🚀 MongoDB 집계 서비스 시작중... ({:?})", environment);
    info!("{}", env_file);

    // 데이터베이스 연결
    let database = initialize_database().await?;
    let collections = CollectionConfig::from_env();
    info!("🗂️ 컬렉션 설정: {:?}", collections);

    // ServiceLocator에 인프라 컴포넌트 등록
    ServiceLocator::set(database);
    ServiceLocator::set(Arc::new(collections));

    // 모든 리포지토리/서비스 초기화
    ServiceLocator::initialize_all().await.map_err(|e| {
        error!("❌ 서비스 초기화 실패: {}", e);
        io::Error::other(e.to_string())
    })?;

    info!("✅ 모든 서비스가 성공적으로 초기화되었습니다!");

    // HTTP 서버 시작
    start_http_server().await
}

/// HTTP 서버를 구성하고 실행합니다
///
/// Rate limiting, CORS, 로깅, 경로 정규화 미들웨어를 포함합니다.
/// 바인딩 주소와 워커 수는 `HOST` / `PORT` / `HTTP_WORKERS`를 따릅니다.
async fn start_http_server() -> io::Result<()> {
    let bind_address = ServerConfig::bind_address();

    print_route_table("📍 REGISTERED ROUTES", ROUTES);
    info!("🌐 서버가 http://{} 에서 실행중입니다", bind_address);
    info!("📍 Health check: http://{}/health", bind_address);
    info!("📍 Aggregations: http://{}/agg/users", bind_address);

    // Rate Limiting 설정
    let rate_limit_config = RateLimitConfig::from_env();
    let governor_conf = GovernorConfigBuilder::default()
        .requests_per_second(rate_limit_config.per_second)
        .burst_size(rate_limit_config.burst_size)
        .use_headers()
        .finish()
        .ok_or_else(|| io::Error::other("invalid rate limit configuration"))?;

    info!(
        "🛡️ Rate Limiting 활성화: 초당 {}요청, 버스트 {}개",
        rate_limit_config.per_second,
        rate_limit_config.burst_size
    );

    HttpServer::new(move || {
        App::new()
            // Rate Limiting 미들웨어 (가장 먼저 적용)
            .wrap(Governor::new(&governor_conf))
            .wrap(configure_cors())
            .wrap(middleware::Logger::default())
            .wrap(middleware::NormalizePath::trim())
            .configure(configure_all_routes)
    })
    .bind(&bind_address)?
    .workers(ServerConfig::workers())
    .run()
    .await
}

/// 환경별 설정 파일을 로드합니다
///
/// * `PROFILE=dev` - .env.dev 파일 로드 (기본값)
/// * `PROFILE=prod` - .env.prod 파일 로드
/// * 기타 - 기본 .env 파일 로드
///
/// 로거 초기화 전에 호출되므로 결과는 문자열로 돌려주고 나중에 기록합니다.
fn load_env_file() -> String {
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "dev".to_string());

    let filename = match profile.as_str() {
        "prod" => ".env.prod",
        "dev" => ".env.dev",
        _ => {
            return match dotenv() {
                Ok(path) => format!("Current profile: {} (기본 {} 로드됨)", profile, path.display()),
                Err(_) => format!("Current profile: {} (.env 파일 없음, 환경 변수만 사용)", profile),
            };
        }
    };

    match dotenv::from_filename(filename) {
        Ok(_) => format!("Current profile: {} ({} 파일 로드 됨)", profile, filename),
        Err(e) => format!("Current profile: {} ({} 파일 로드 실패: {})", profile, filename, e),
    }
}

/// 로깅 시스템을 초기화합니다
///
/// `RUST_LOG`가 없으면 실행 환경별 기본 필터를 사용합니다.
///
/// ```bash
/// RUST_LOG=mongo_aggregation_service::repositories=debug cargo run
/// ```
fn init_logging(environment: &Environment) {
    env_logger::init_from_env(Env::default().default_filter_or(environment.default_log_filter()));
}

/// MongoDB 연결을 초기화합니다
///
/// 연결(ping) 실패는 그대로 프로세스 종료로 이어집니다.
async fn initialize_database() -> io::Result<Arc<Database>> {
    info!("📡 데이터베이스 연결 중...");

    match Database::new().await {
        Ok(database) => Ok(Arc::new(database)),
        Err(e) => {
            error!("❌ 데이터베이스 연결 실패: {}", e);
            warn!("MONGODB_URI / DATABASE_NAME 설정을 확인하세요");
            Err(io::Error::other(e.to_string()))
        }
    }
}

/// CORS 설정을 구성합니다
///
/// 로컬 프론트엔드 개발 서버와 자체 서버 origin을 허용합니다.
fn configure_cors() -> Cors {
    Cors::default()
        .allowed_origin("http://localhost:3000")
        .allowed_origin("http://127.0.0.1:3000")
        .allowed_origin("http://localhost:8080")
        .allowed_origin("http://127.0.0.1:8080")
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
        .max_age(3600)
}
