pub mod auth;
pub mod cart;
pub mod orders;
pub mod products;
pub mod reservations;
pub mod tables;
pub mod users;
