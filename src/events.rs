//! In-process change notifications.
//!
//! Every successful mutation publishes one [`ChangeEvent`]. Observers call
//! [`ChangeNotifier::subscribe`] and re-query whatever they display.

use serde::Serialize;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::entity::sea_orm_active_enums::OrderStatus;

const CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChangeEvent {
    OrderCreated { order_id: Uuid },
    OrderStatusChanged { order_id: Uuid, status: OrderStatus },
    OrdersCleared { deleted: u64 },
    ReservationCreated { reservation_id: Uuid },
    ReservationConfirmed { reservation_id: Uuid },
    ReservationDeleted { reservation_id: Uuid },
    CatalogChanged,
    TableChanged { table_id: Uuid },
    UserChanged { user_id: Uuid },
    UserDeleted { user_id: Uuid },
}

#[derive(Debug, Clone)]
pub struct ChangeNotifier {
    tx: broadcast::Sender<ChangeEvent>,
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new(CHANNEL_CAPACITY)
    }
}

impl ChangeNotifier {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.tx.subscribe()
    }

    pub fn publish(&self, event: ChangeEvent) {
        // No receivers is fine: nobody is watching right now.
        if self.tx.send(event).is_err() {
            tracing::trace!("change event dropped: no subscribers");
        }
    }
}
