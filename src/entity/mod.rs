pub mod audit_logs;
pub mod categories;
pub mod dining_tables;
pub mod order_lines;
pub mod orders;
pub mod products;
pub mod reservations;
pub mod roles;
pub mod sea_orm_active_enums;
pub mod users;

pub use audit_logs::Entity as AuditLogs;
pub use categories::Entity as Categories;
pub use dining_tables::Entity as DiningTables;
pub use order_lines::Entity as OrderLines;
pub use orders::Entity as Orders;
pub use products::Entity as Products;
pub use reservations::Entity as Reservations;
pub use roles::Entity as Roles;
pub use users::Entity as Users;
