use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Reservation;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateReservationRequest {
    /// `YYYY-MM-DD`
    #[schema(example = "2026-10-20")]
    pub date: String,
    /// `HH:MM`
    #[schema(example = "19:30")]
    pub time: String,
    pub party_size: i32,
    pub table_id: Uuid,
    /// Defaults to the account name when missing or blank.
    pub customer_name: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReservationList {
    pub items: Vec<Reservation>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeletedReservation {
    pub id: Uuid,
}
