#![allow(dead_code)]

use std::sync::Arc;

use chrono::Utc;
use restaurant_api::{
    clock::ManualClock,
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    entity::{categories, dining_tables, products, users},
    middleware::auth::AuthUser,
    models::{Product, Role, Table},
    scheduler::ReadyWorker,
    state::AppState,
};
use sea_orm::{ActiveModelTrait, Set};
use uuid::Uuid;

pub const READY_DELAY_SECS: i64 = 60;

pub struct TestApp {
    pub state: AppState,
    pub clock: Arc<ManualClock>,
}

impl TestApp {
    pub fn worker(&self) -> ReadyWorker {
        ReadyWorker::new(self.state.clone())
    }
}

/// Fresh in-memory store with the schema applied and a clock that only moves on request.
pub async fn setup() -> anyhow::Result<TestApp> {
    let orm = create_orm_conn("sqlite::memory:").await?;
    run_migrations(&orm).await?;

    let config = AppConfig {
        database_url: "sqlite::memory:".into(),
        host: "127.0.0.1".into(),
        port: 0,
        jwt_secret: "test-secret".into(),
        order_ready_delay_secs: READY_DELAY_SECS as u64,
        ready_tick_millis: 10,
    };
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let state = AppState::with_clock(orm, config, clock.clone());
    Ok(TestApp { state, clock })
}

/// Inserts an account directly; the hash is a placeholder, so it cannot log in.
pub async fn create_user(state: &AppState, name: &str, role: Role) -> anyhow::Result<AuthUser> {
    let id = Uuid::new_v4();
    users::ActiveModel {
        id: Set(id),
        name: Set(name.to_string()),
        email: Set(format!("{}-{id}@example.com", name.to_lowercase())),
        password_hash: Set("not-a-hash".into()),
        phone: Set("912345678".into()),
        image_uri: Set(None),
        role_id: Set(role.id()),
        created_at: Set(Utc::now()),
    }
    .insert(&state.orm)
    .await?;
    Ok(AuthUser { user_id: id, role })
}

pub async fn create_category(state: &AppState, name: &str) -> anyhow::Result<Uuid> {
    let category = categories::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
    }
    .insert(&state.orm)
    .await?;
    Ok(category.id)
}

pub async fn create_product(
    state: &AppState,
    name: &str,
    category_id: Uuid,
    category_name: &str,
    price: i64,
) -> anyhow::Result<Product> {
    let product = products::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        description: Set(format!("{name} from the kitchen")),
        price: Set(price),
        stock: Set(10),
        category_id: Set(category_id),
        category_name: Set(category_name.to_string()),
        image_url: Set(None),
        created_at: Set(state.clock.now()),
    }
    .insert(&state.orm)
    .await?;
    Ok(product.into())
}

pub async fn create_table(
    state: &AppState,
    number: i32,
    capacity: i32,
    available: bool,
) -> anyhow::Result<Table> {
    let table = dining_tables::ActiveModel {
        id: Set(Uuid::new_v4()),
        number: Set(number),
        capacity: Set(capacity),
        available: Set(available),
    }
    .insert(&state.orm)
    .await?;
    Ok(table.into())
}
