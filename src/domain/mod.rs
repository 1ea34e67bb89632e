//! Store-free rules: catalog search, cart arithmetic, table fit, input
//! validation, and the order/reservation status machines.

pub mod cart;
pub mod catalog;
pub mod lifecycle;
pub mod tables;
pub mod validation;

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::Utc;
    use uuid::Uuid;

    use crate::models::{Product, Table};

    pub fn product(name: &str, category: &str, price: i64) -> Product {
        Product {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: format!("{name} from the kitchen"),
            price,
            stock: 10,
            category_id: Uuid::new_v4(),
            category_name: category.to_string(),
            image_url: None,
            created_at: Utc::now(),
        }
    }

    pub fn table(number: i32, capacity: i32) -> Table {
        Table {
            id: Uuid::new_v4(),
            number,
            capacity,
            available: true,
        }
    }
}
