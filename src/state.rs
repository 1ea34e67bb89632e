use std::sync::Arc;

use crate::{
    clock::{Clock, SystemClock},
    config::AppConfig,
    db::{DbPool, OrmConn},
    events::ChangeNotifier,
    scheduler::ReadySchedule,
    services::cart_service::CartStore,
};

#[derive(Clone)]
pub struct AppState {
    pub orm: OrmConn,
    /// Raw pool behind `orm`, used for audit writes.
    pub pool: DbPool,
    pub config: Arc<AppConfig>,
    pub clock: Arc<dyn Clock>,
    pub carts: CartStore,
    pub ready_schedule: Arc<ReadySchedule>,
    pub events: ChangeNotifier,
}

impl AppState {
    pub fn new(orm: OrmConn, config: AppConfig) -> Self {
        Self::with_clock(orm, config, Arc::new(SystemClock))
    }

    pub fn with_clock(orm: OrmConn, config: AppConfig, clock: Arc<dyn Clock>) -> Self {
        let pool = orm.get_sqlite_connection_pool().clone();
        let ready_schedule = Arc::new(ReadySchedule::new(config.order_ready_delay()));
        Self {
            orm,
            pool,
            config: Arc::new(config),
            clock,
            carts: CartStore::default(),
            ready_schedule,
            events: ChangeNotifier::default(),
        }
    }
}
