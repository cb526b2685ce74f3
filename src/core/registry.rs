//! # Service Registry
//!
//! 싱글톤 컴포넌트를 보관하는 간단한 의존성 주입 컨테이너입니다.
//! Spring의 `ApplicationContext` 역할을 하며, 다음 두 가지 경로로 인스턴스가 들어옵니다.
//!
//! 1. **수동 등록**: `Database`처럼 비동기 초기화가 필요한 인프라 컴포넌트는
//!    `main`에서 만든 뒤 [`ServiceLocator::set`]으로 등록합니다.
//! 2. **자동 등록**: 리포지토리와 서비스는 `inventory::submit!`으로
//!    [`RepositoryRegistration`] / [`ServiceRegistration`]을 제출하고,
//!    [`ServiceLocator::get`]이 타입 이름으로 생성자를 찾아 지연 생성합니다.
//!
//! ## 초기화 순서
//!
//! ```text
//! main
//!  ├─ ServiceLocator::set(Arc<Database>)
//!  ├─ ServiceLocator::initialize_all()
//!  │    ├─ Step 1: Repository 인스턴스 생성
//!  │    ├─ Step 2: Repository init (인덱스 생성)
//!  │    └─ Step 3: Service 인스턴스 생성
//!  └─ HttpServer::run()
//! ```
//!
//! ## 등록 예제
//!
//! ```rust,ignore
//! fn order_repository_constructor() -> Box<dyn Any + Send + Sync> {
//!     Box::new(OrderRepository::instance())
//! }
//!
//! inventory::submit! {
//!     crate::core::registry::RepositoryRegistration {
//!         name: "order_repository",
//!         constructor: order_repository_constructor,
//!         init: order_repository_init,
//!     }
//! }
//! ```

use std::any::{Any, TypeId};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use async_trait::async_trait;
use futures_util::future::BoxFuture;
use once_cell::sync::Lazy;
use crate::core::errors::{AppError, AppResult};
use crate::utils::display_terminal::{
    print_boxed_title, print_final_summary, print_step_complete, print_step_start, print_sub_task,
};

/// 데이터 액세스 리포지토리를 위한 공통 인터페이스
#[async_trait]
pub trait Repository: Send + Sync {
    /// 리포지토리의 고유 이름
    fn name(&self) -> &str;

    /// 연결된 MongoDB 컬렉션의 이름
    fn collection_name(&self) -> &str;

    /// 인덱스 생성 등 시작 시점 초기화를 수행합니다.
    async fn init(&self) -> AppResult<()>;
}

/// 서비스 등록 정보
pub struct ServiceRegistration {
    /// 서비스의 고유 이름 (`<entity>_service`)
    pub name: &'static str,
    /// `Box<Arc<T>>`를 돌려주는 생성 함수
    pub constructor: fn() -> Box<dyn Any + Send + Sync>,
}

/// 리포지토리 등록 정보
pub struct RepositoryRegistration {
    /// 리포지토리의 고유 이름 (`<entity>_repository`)
    pub name: &'static str,
    /// `Box<Arc<T>>`를 돌려주는 생성 함수
    pub constructor: fn() -> Box<dyn Any + Send + Sync>,
    /// 시작 시점 초기화 함수
    pub init: fn() -> BoxFuture<'static, AppResult<()>>,
}

inventory::collect!(ServiceRegistration);
inventory::collect!(RepositoryRegistration);

/// 서비스 이름 → 등록정보 매핑 캐시
static SERVICE_NAME_CACHE: Lazy<HashMap<String, &'static ServiceRegistration>> = Lazy::new(|| {
    inventory::iter::<ServiceRegistration>()
        .map(|registration| (strip_registration_suffix(registration.name), registration))
        .collect()
});

/// 리포지토리 이름 → 등록정보 매핑 캐시
static REPOSITORY_NAME_CACHE: Lazy<HashMap<String, &'static RepositoryRegistration>> =
    Lazy::new(|| {
        inventory::iter::<RepositoryRegistration>()
            .map(|registration| (strip_registration_suffix(registration.name), registration))
            .collect()
    });

/// `user_service` / `user_repository` → `user`
fn strip_registration_suffix(name: &str) -> String {
    name.strip_suffix("_service")
        .or_else(|| name.strip_suffix("_repository"))
        .unwrap_or(name)
        .to_string()
}

/// `AggregationRepository` → `aggregation`, `UserService` → `user`
///
/// 카멜 케이스 경계마다 `_`를 넣어 등록 이름 규칙과 맞춥니다.
fn registry_key(type_name: &str, suffix: &str) -> Option<String> {
    let stem = type_name.strip_suffix(suffix)?;
    let mut key = String::with_capacity(stem.len() + 4);
    for (i, c) in stem.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                key.push('_');
            }
            key.extend(c.to_lowercase());
        } else {
            key.push(c);
        }
    }
    Some(key)
}

/// 싱글톤 의존성 주입 컨테이너
pub struct ServiceLocator {
    /// `TypeId`별 싱글톤 인스턴스
    instances: RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
    /// 생성 중인 타입 (순환 참조 감지용)
    initializing: RwLock<HashSet<TypeId>>,
}

impl ServiceLocator {
    fn new() -> Self {
        Self {
            instances: RwLock::new(HashMap::new()),
            initializing: RwLock::new(HashSet::new()),
        }
    }

    fn read_instances(&self) -> RwLockReadGuard<'_, HashMap<TypeId, Arc<dyn Any + Send + Sync>>> {
        self.instances.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_instances(&self) -> RwLockWriteGuard<'_, HashMap<TypeId, Arc<dyn Any + Send + Sync>>> {
        self.instances.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_initializing(&self) -> RwLockWriteGuard<'_, HashSet<TypeId>> {
        self.initializing.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// 지정된 타입의 싱글톤 인스턴스를 가져옵니다.
    ///
    /// 1. 캐시에 있으면 그대로 반환
    /// 2. 타입 이름이 `...Repository` / `...Service`이면 등록된 생성자를 호출
    /// 3. 생성 결과를 캐시에 저장
    ///
    /// 생성자는 락을 잡지 않은 상태에서 호출되므로, 생성자 안에서 다시
    /// `ServiceLocator::get`으로 의존성을 해결할 수 있습니다.
    ///
    /// # Panics
    ///
    /// - 순환 참조가 감지된 경우
    /// - 등록되지 않은 타입을 요청한 경우
    pub fn get<T: 'static + Send + Sync>() -> Arc<T> {
        match Self::try_get::<T>() {
            Some(instance) => instance,
            None => panic!(
                "Service not found: {}. Register it with inventory::submit! or ServiceLocator::set()",
                std::any::type_name::<T>()
            ),
        }
    }

    /// [`ServiceLocator::get`]과 같지만 등록되지 않은 타입이면 `None`을 반환합니다.
    pub fn try_get<T: 'static + Send + Sync>() -> Option<Arc<T>> {
        let type_id = TypeId::of::<T>();
        let type_name = std::any::type_name::<T>();

        if let Some(instance) = LOCATOR.read_instances().get(&type_id) {
            return instance.clone().downcast::<T>().ok();
        }

        let constructor = Self::find_constructor(Self::extract_clean_type_name(type_name))?;

        if !LOCATOR.write_initializing().insert(type_id) {
            panic!("Circular dependency detected: {} is already being initialized", type_name);
        }

        let boxed_instance = constructor();
        LOCATOR.write_initializing().remove(&type_id);

        let instance = match boxed_instance.downcast::<Arc<T>>() {
            Ok(arc_instance) => *arc_instance,
            Err(_) => panic!("Type mismatch in ServiceLocator for {}", type_name),
        };

        let mut instances = LOCATOR.write_instances();
        let stored = instances
            .entry(type_id)
            .or_insert_with(|| instance.clone() as Arc<dyn Any + Send + Sync>)
            .clone();

        stored.downcast::<T>().ok()
    }

    fn find_constructor(clean_type_name: &str) -> Option<fn() -> Box<dyn Any + Send + Sync>> {
        if let Some(key) = registry_key(clean_type_name, "Repository") {
            return REPOSITORY_NAME_CACHE.get(&key).map(|r| r.constructor);
        }
        if let Some(key) = registry_key(clean_type_name, "Service") {
            return SERVICE_NAME_CACHE.get(&key).map(|r| r.constructor);
        }
        None
    }

    /// `crate::services::UserService` → `UserService`
    fn extract_clean_type_name(type_name: &str) -> &str {
        match type_name.rfind("::") {
            Some(pos) => &type_name[pos + 2..],
            None => type_name,
        }
    }

    /// 외부에서 생성된 인스턴스를 직접 등록합니다.
    ///
    /// Spring의 `@Bean` 메서드와 같은 역할입니다.
    pub fn set<T: 'static + Send + Sync>(instance: Arc<T>) {
        let type_name = std::any::type_name::<T>();
        log::debug!("📦 Registering: {}", Self::extract_clean_type_name(type_name));

        LOCATOR
            .write_instances()
            .insert(TypeId::of::<T>(), instance as Arc<dyn Any + Send + Sync>);
    }

    /// 모든 리포지토리와 서비스를 생성하고 리포지토리 초기화를 실행합니다.
    ///
    /// `Database`가 먼저 [`ServiceLocator::set`]으로 등록되어 있어야 합니다.
    pub async fn initialize_all() -> AppResult<()> {
        print_boxed_title("🔄 INITIALIZING SERVICE REGISTRY");

        let repo_registrations: Vec<_> = inventory::iter::<RepositoryRegistration>().collect();
        let repo_count = repo_registrations.len();

        print_step_start(1, "Creating Repository instances");
        for registration in &repo_registrations {
            let _instance = (registration.constructor)();
            print_sub_task(registration.name, "✓ Created");
        }
        print_step_complete(1, "Repository instances created", repo_count);

        print_step_start(2, "Running Repository init");
        for registration in &repo_registrations {
            (registration.init)().await.map_err(|e| {
                AppError::InternalError(format!("{} init failed: {}", registration.name, e))
            })?;
            print_sub_task(registration.name, "✓ Initialized");
        }
        print_step_complete(2, "Repository init finished", repo_count);

        let service_registrations: Vec<_> = inventory::iter::<ServiceRegistration>().collect();
        let service_count = service_registrations.len();

        print_step_start(3, "Creating Service instances");
        for registration in &service_registrations {
            let _instance = (registration.constructor)();
            print_sub_task(registration.name, "✓ Created");
        }
        print_step_complete(3, "Service instances created", service_count);

        print_final_summary(repo_count, service_count);

        Ok(())
    }
}

/// 전역 서비스 로케이터 인스턴스
static LOCATOR: Lazy<ServiceLocator> = Lazy::new(ServiceLocator::new);
