//! # 주문 리포지토리
//!
//! `orders` 컬렉션에 주문 문서를 저장하고 사용자 이메일로 조회합니다.
//! 이메일 필드 이름은 `$lookup`의 `foreignField`와 같은 설정값
//! (`ORDERS_USER_EMAIL_FIELD`)을 사용합니다.

use std::any::Any;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::TryStreamExt;
use futures_util::future::BoxFuture;
use log::{debug, info};
use mongodb::bson::{Document, doc};
use mongodb::{Collection, IndexModel};
use once_cell::sync::OnceCell;

use crate::config::CollectionConfig;
use crate::core::errors::AppResult;
use crate::core::registry::{Repository, ServiceLocator};
use crate::db::Database;
use crate::domain::entities::Order;

pub struct OrderRepository {
    db: Arc<Database>,
    collections: Arc<CollectionConfig>,
}

static ORDER_REPOSITORY_INSTANCE: OnceCell<Arc<OrderRepository>> = OnceCell::new();

impl OrderRepository {
    pub fn instance() -> Arc<Self> {
        ORDER_REPOSITORY_INSTANCE
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

    fn collection(&self) -> Collection<Document> {
        self.db.get_database().collection::<Document>(&self.collections.orders)
    }

    fn email_field(&self) -> &str {
        &self.collections.order_user_email_field
    }

    pub async fn create(&self, order: Order) -> AppResult<Order> {
        self.collection()
            .insert_one(order.to_document(self.email_field()))
            .await?;
        debug!("🧾 order created: {} ({})", order.id, order.user_email);

        Ok(order)
    }

    pub async fn find_by_user_email(&self, email: &str) -> AppResult<Vec<Order>> {
        let mut filter = Document::new();
        filter.insert(self.email_field(), email);

        let documents: Vec<Document> = self
            .collection()
            .find(filter)
            .sort(doc! { "_id": 1 })
            .await?
            .try_collect()
            .await?;

        documents
            .iter()
            .map(|document| Order::from_document(document, self.email_field()))
            .collect()
    }
}

#[async_trait]
impl Repository for OrderRepository {
    fn name(&self) -> &str {
        "order"
    }

    fn collection_name(&self) -> &str {
        &self.collections.orders
    }

    async fn init(&self) -> AppResult<()> {
        let mut keys = Document::new();
        keys.insert(self.email_field(), 1);

        self.collection()
            .create_index(IndexModel::builder().keys(keys).build())
            .await?;
        info!("📇 indexes ensured on '{}' ({})", self.collections.orders, self.email_field());
        Ok(())
    }
}

fn order_repository_constructor() -> Box<dyn Any + Send + Sync> {
    Box::new(OrderRepository::instance())
}

fn order_repository_init() -> BoxFuture<'static, AppResult<()>> {
    Box::pin(async { OrderRepository::instance().init().await })
}

inventory::submit! {
    crate::core::registry::RepositoryRegistration {
        name: "order_repository",
        constructor: order_repository_constructor,
        init: order_repository_init,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::{drop_database, isolated_database};

    #[actix_web::test]
    async fn test_orders_use_configured_email_field() {
        let Some(db) = isolated_database().await else {
            return;
        };
        let collections = CollectionConfig {
            order_user_email_field: "userEmail".to_string(),
            ..CollectionConfig::default()
        };
        let repo = OrderRepository::with_database(db.clone(), Arc::new(collections));
        repo.init().await.unwrap();

        repo.create(Order::new("kim@example.com".to_string(), 10.0)).await.unwrap();
        repo.create(Order::new("kim@example.com".to_string(), 20.0)).await.unwrap();
        repo.create(Order::new("lee@example.com".to_string(), 5.0)).await.unwrap();

        let raw = db
            .get_database()
            .collection::<Document>("orders")
            .find_one(doc! { "userEmail": "lee@example.com" })
            .await
            .unwrap();
        let kim = repo.find_by_user_email("kim@example.com").await.unwrap();

        drop_database(&db).await;

        assert!(raw.is_some());
        assert_eq!(kim.iter().map(|o| o.amount).sum::<f64>(), 30.0);
    }
}
