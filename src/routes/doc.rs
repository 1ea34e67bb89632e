use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    domain::cart::CartLine,
    dto::{
        auth::{LoginRequest, LoginResponse, RegisterRequest, UpdateProfileRequest},
        cart::{AddToCartRequest, CartView},
        orders::{CheckoutRequest, ClearOrdersResult, OrderList, OrderWithLines, UpdateOrderStatusRequest},
        products::{CategoryList, CreateCategoryRequest, CreateProductRequest, ProductList, UpdateProductRequest},
        reservations::{CreateReservationRequest, DeletedReservation, ReservationList},
        tables::{
            CreateTableRequest, DeletedTable, TableAvailabilityRequest, TableList,
            UpdateTableRequest,
        },
        users::{DeletedUser, UpdateUserRequest, UserList},
    },
    entity::sea_orm_active_enums::{DeliveryMode, OrderStatus, ReservationStatus},
    models::{Category, Order, OrderLine, Product, Reservation, Role, Table, User},
    response::{ApiResponse, Meta},
    routes::{
        admin, auth, cart, categories, health, orders, params, products, reservations, tables,
        users,
    },
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        auth::me,
        auth::update_profile,
        products::list_products,
        products::get_product,
        products::create_product,
        products::update_product,
        products::delete_product,
        categories::list_categories,
        categories::create_category,
        cart::view_cart,
        cart::add_to_cart,
        cart::remove_from_cart,
        cart::clear_cart,
        orders::list_orders,
        orders::checkout,
        orders::get_order,
        orders::update_order_status,
        orders::deliver_order,
        reservations::list_reservations,
        reservations::create_reservation,
        reservations::get_reservation,
        tables::list_tables,
        tables::available_tables,
        tables::get_table,
        users::list_users,
        users::get_user,
        users::update_user,
        users::delete_user,
        admin::clear_orders,
        admin::cancel_order,
        admin::confirm_reservation,
        admin::delete_reservation,
        admin::create_table,
        admin::set_table_availability,
        admin::update_table,
        admin::delete_table
    ),
    components(
        schemas(
            User,
            Role,
            Category,
            Product,
            Table,
            Reservation,
            Order,
            OrderLine,
            OrderStatus,
            DeliveryMode,
            ReservationStatus,
            CartLine,
            CartView,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            UpdateProfileRequest,
            AddToCartRequest,
            CheckoutRequest,
            UpdateOrderStatusRequest,
            OrderWithLines,
            OrderList,
            ClearOrdersResult,
            CreateProductRequest,
            UpdateProductRequest,
            ProductList,
            CreateCategoryRequest,
            CategoryList,
            CreateReservationRequest,
            ReservationList,
            DeletedReservation,
            CreateTableRequest,
            TableAvailabilityRequest,
            UpdateTableRequest,
            DeletedTable,
            TableList,
            UpdateUserRequest,
            UserList,
            DeletedUser,
            params::Pagination,
            params::ProductQuery,
            params::OrderListQuery,
            params::ReservationListQuery,
            params::UserListQuery,
            Meta,
            ApiResponse<Product>,
            ApiResponse<ProductList>,
            ApiResponse<OrderWithLines>,
            ApiResponse<OrderList>,
            ApiResponse<Reservation>,
            ApiResponse<TableList>,
            ApiResponse<CartView>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Registration, login, and profile"),
        (name = "Products", description = "Menu catalog and categories"),
        (name = "Cart", description = "Per-user cart"),
        (name = "Orders", description = "Order placement and lifecycle"),
        (name = "Reservations", description = "Table reservations"),
        (name = "Tables", description = "Dining tables"),
        (name = "Users", description = "Account management for admins"),
        (name = "Admin", description = "Administrative actions"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
