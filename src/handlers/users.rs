//! # User Management HTTP Handlers
//!
//! 집계 예제 데이터를 적재하고 확인하기 위한 사용자 엔드포인트입니다.
//!
//! | 메서드 | 경로 | 설명 | 상태 코드 |
//! |--------|------|------|-----------|
//! | `POST` | `/api/v1/users` | 새 사용자 생성 | 201 Created |
//! | `GET` | `/api/v1/users/search` | 조건 검색 | 200 OK |
//! | `GET` | `/api/v1/users/by-email/{email}` | 이메일로 조회 | 200 OK |
//! | `GET` | `/api/v1/users/{id}` | ID로 조회 | 200 OK |
//!
//! `/search`는 `/{id}`보다 먼저 등록되어야 합니다.

use actix_web::{HttpResponse, get, post, web};
use validator::Validate;

use crate::core::errors::AppError;
use crate::domain::dto::users::{CreateUserRequest, UserSearchQuery};
use crate::services::users::UserService;
use crate::utils::string_utils::validate_required_string;

#[post("")]
pub async fn create_user(payload: web::Json<CreateUserRequest>) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let service = UserService::instance();
    let response = service.create_user(payload.into_inner()).await?;

    Ok(HttpResponse::Created().json(response))
}

#[get("/search")]
pub async fn search_users(query: web::Query<UserSearchQuery>) -> Result<HttpResponse, AppError> {
    query.to_filter()?;

    let users = UserService::instance().search(&query).await?;
    Ok(HttpResponse::Ok().json(users))
}

#[get("/by-email/{email}")]
pub async fn get_user_by_email(email: web::Path<String>) -> Result<HttpResponse, AppError> {
    let email = validate_required_string(&email, "email")?;

    let user = UserService::instance().get_user_by_email(&email).await?;
    Ok(HttpResponse::Ok().json(user))
}

#[get("/{user_id}")]
pub async fn get_user(user_id: web::Path<String>) -> Result<HttpResponse, AppError> {
    let user = UserService::instance().get_user_by_id(&user_id).await?;
    Ok(HttpResponse::Ok().json(user))
}
