//! MongoDB 집계 파이프라인 예제 서비스
//!
//! `$match`부터 `$sample`까지 MongoDB 집계 스테이지를 REST 엔드포인트로 노출하는
//! 데모 백엔드입니다. 각 엔드포인트는 하나의 파이프라인을 만들어 드라이버에 넘기고,
//! 결과 문서를 응답 타입으로 변환할 뿐입니다. 집계 의미론은 MongoDB 서버의 몫입니다.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   HTTP Routes   │ ← /agg/users/..., /api/v1/...
//! ├─────────────────┤
//! │    Handlers     │ ← 파라미터 추출/검증
//! ├─────────────────┤
//! │    Services     │ ← 연산 → 파이프라인 → 실행 → 매핑
//! ├─────────────────┤
//! │  Repositories   │ ← 드라이버 호출 (aggregate / find / insert)
//! ├─────────────────┤
//! │    Database     │ ← MongoDB 클라이언트 + 커넥션 풀
//! └─────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`pipeline`] - 선언적 스테이지 디스크립터와 연산 카탈로그
//! - [`domain`] - 엔티티, DTO, 결과 매퍼
//! - [`repositories`] - 집계 실행 클라이언트와 컬렉션별 리포지토리
//! - [`services`] - 엔드포인트별 비즈니스 흐름
//! - [`core`] - 에러 타입과 서비스 레지스트리
//! - [`config`] / [`db`] - 환경 설정과 데이터베이스 연결

pub mod core;
pub mod config;
pub mod db;
pub mod domain;
pub mod pipeline;
pub mod repositories;
pub mod services;
pub mod utils;
pub mod routes;
pub mod handlers;
