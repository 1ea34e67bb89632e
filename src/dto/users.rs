use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Role, User};

/// Admin edit of an account. Blank or missing fields keep their value.
#[derive(Deserialize, Debug, Default, ToSchema)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserList {
    pub items: Vec<User>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeletedUser {
    pub id: Uuid,
    /// Orders removed along with the account.
    pub orders: u64,
    /// Reservations removed along with the account.
    pub reservations: u64,
}
