//! Status machines for orders and reservations.
//!
//! Orders only move forward along `pending -> in_preparation -> ready -> delivered`.
//! `delivered` is entered from `ready` alone; `cancelled` from any state that is
//! not yet terminal. Reservations go from `pending` to `confirmed` and stop there.

use crate::{
    entity::sea_orm_active_enums::{OrderStatus, ReservationStatus},
    error::AppError,
};

impl OrderStatus {
    fn rank(self) -> u8 {
        match self {
            OrderStatus::Pending => 0,
            OrderStatus::InPreparation => 1,
            OrderStatus::Ready => 2,
            OrderStatus::Delivered => 3,
            OrderStatus::Cancelled => 4,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        match next {
            OrderStatus::Cancelled => true,
            OrderStatus::Delivered => self == OrderStatus::Ready,
            _ => next.rank() > self.rank(),
        }
    }

    /// Checks a requested move, naming both ends on rejection.
    pub fn transition_to(self, next: OrderStatus) -> Result<OrderStatus, AppError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(AppError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }
}

impl ReservationStatus {
    /// Confirmation is idempotent: a confirmed reservation stays confirmed.
    pub fn confirm(self) -> ReservationStatus {
        ReservationStatus::Confirmed
    }
}
