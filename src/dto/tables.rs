use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use uuid::Uuid;

use crate::models::Table;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTableRequest {
    pub number: i32,
    pub capacity: i32,
    #[serde(default = "default_available")]
    pub available: bool,
}

fn default_available() -> bool {
    true
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TableAvailabilityRequest {
    pub available: bool,
}

/// Missing fields keep their current value.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateTableRequest {
    pub number: Option<i32>,
    pub capacity: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TableList {
    pub items: Vec<Table>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeletedTable {
    pub id: Uuid,
}
