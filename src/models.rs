use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::{
    categories, dining_tables, order_lines, orders, products, reservations,
    sea_orm_active_enums::{DeliveryMode, OrderStatus, ReservationStatus},
    users,
};

/// Account role. The numeric ids match the rows seeded into `roles`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Waiter,
    Client,
}

impl Role {
    pub fn id(self) -> i32 {
        match self {
            Role::Admin => 1,
            Role::Waiter => 2,
            Role::Client => 3,
        }
    }

    pub fn from_id(id: i32) -> Option<Self> {
        match id {
            1 => Some(Role::Admin),
            2 => Some(Role::Waiter),
            3 => Some(Role::Client),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Waiter => "waiter",
            Role::Client => "client",
        }
    }

    /// Admins and waiters work the floor and see every order.
    pub fn is_staff(self) -> bool {
        matches!(self, Role::Admin | Role::Waiter)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "waiter" => Ok(Role::Waiter),
            "client" => Ok(Role::Client),
            other => Err(format!("unknown role {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub image_uri: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            phone: model.phone,
            image_uri: model.image_uri,
            role: Role::from_id(model.role_id).unwrap_or(Role::Client),
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
}

impl From<categories::Model> for Category {
    fn from(model: categories::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    /// Unit price in the smallest currency unit.
    pub price: i64,
    pub stock: i32,
    pub category_id: Uuid,
    pub category_name: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<products::Model> for Product {
    fn from(model: products::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            price: model.price,
            stock: model.stock,
            category_id: model.category_id,
            category_name: model.category_name,
            image_url: model.image_url,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Table {
    pub id: Uuid,
    pub number: i32,
    pub capacity: i32,
    pub available: bool,
}

impl From<dining_tables::Model> for Table {
    fn from(model: dining_tables::Model) -> Self {
        Self {
            id: model.id,
            number: model.number,
            capacity: model.capacity,
            available: model.available,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Reservation {
    pub id: Uuid,
    #[schema(value_type = String, example = "2026-10-20")]
    pub date: NaiveDate,
    #[schema(value_type = String, example = "19:30:00")]
    pub time: NaiveTime,
    pub party_size: i32,
    pub status: ReservationStatus,
    pub user_id: Uuid,
    pub table_id: Uuid,
    pub customer_name: String,
    pub created_at: DateTime<Utc>,
}

impl From<reservations::Model> for Reservation {
    fn from(model: reservations::Model) -> Self {
        Self {
            id: model.id,
            date: model.date,
            time: model.time,
            party_size: model.party_size,
            status: model.status,
            user_id: model.user_id,
            table_id: model.table_id,
            customer_name: model.customer_name,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub status: OrderStatus,
    pub total: i64,
    pub user_id: Uuid,
    pub reservation_id: Option<Uuid>,
    pub delivery_mode: DeliveryMode,
    pub table_number: Option<i32>,
    pub customer_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<orders::Model> for Order {
    fn from(model: orders::Model) -> Self {
        Self {
            id: model.id,
            status: model.status,
            total: model.total,
            user_id: model.user_id,
            reservation_id: model.reservation_id,
            delivery_mode: model.delivery_mode,
            table_number: model.table_number,
            customer_name: model.customer_name,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderLine {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: i64,
}

impl OrderLine {
    pub fn subtotal(&self) -> i64 {
        self.unit_price * i64::from(self.quantity)
    }
}

impl From<order_lines::Model> for OrderLine {
    fn from(model: order_lines::Model) -> Self {
        Self {
            id: model.id,
            order_id: model.order_id,
            product_id: model.product_id,
            quantity: model.quantity,
            unit_price: model.unit_price,
        }
    }
}
