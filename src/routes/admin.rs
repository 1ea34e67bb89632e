use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, patch, post},
};
use uuid::Uuid;

use crate::{
    dto::{
        orders::ClearOrdersResult,
        reservations::DeletedReservation,
        tables::{CreateTableRequest, DeletedTable, TableAvailabilityRequest, UpdateTableRequest},
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::{Order, Reservation, Table},
    response::ApiResponse,
    services::{order_service, reservation_service, table_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/orders", delete(clear_orders))
        .route("/orders/{id}/cancel", post(cancel_order))
        .route("/reservations/{id}/confirm", post(confirm_reservation))
        .route("/reservations/{id}", delete(delete_reservation))
        .route("/tables", post(create_table))
        .route(
            "/tables/{id}",
            patch(set_table_availability)
                .put(update_table)
                .delete(delete_table),
        )
}

#[utoipa::path(
    patch,
    path = "/api/admin/tables/{id}",
    params(
        ("id" = Uuid, Path, description = "Table ID")
    ),
    request_body = TableAvailabilityRequest,
    responses(
        (status = 200, description = "Availability changed", body = ApiResponse<Table>),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Table not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn set_table_availability(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<TableAvailabilityRequest>,
) -> AppResult<Json<ApiResponse<Table>>> {
    let resp = table_service::set_availability(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/tables/{id}",
    params(
        ("id" = Uuid, Path, description = "Table ID")
    ),
    request_body = UpdateTableRequest,
    responses(
        (status = 200, description = "Table renumbered or resized", body = ApiResponse<Table>),
        (status = 400, description = "Invalid values, duplicate number, or larger reservations"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Table not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_table(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTableRequest>,
) -> AppResult<Json<ApiResponse<Table>>> {
    let resp = table_service::update_table(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/tables/{id}",
    params(
        ("id" = Uuid, Path, description = "Table ID")
    ),
    responses(
        (status = 200, description = "Table and its reservations deleted", body = ApiResponse<DeletedTable>),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Table not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_table(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<DeletedTable>>> {
    let resp = table_service::delete_table(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/orders",
    responses(
        (status = 200, description = "Every order deleted", body = ApiResponse<ClearOrdersResult>),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn clear_orders(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<ClearOrdersResult>>> {
    let resp = order_service::clear_all_orders(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/orders/{id}/cancel",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order cancelled", body = ApiResponse<Order>),
        (status = 403, description = "Admin only"),
        (status = 409, description = "Order already delivered or cancelled")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn cancel_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = order_service::cancel_order(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/reservations/{id}/confirm",
    params(
        ("id" = Uuid, Path, description = "Reservation ID")
    ),
    responses(
        (status = 200, description = "Reservation confirmed", body = ApiResponse<Reservation>),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Reservation not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn confirm_reservation(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Reservation>>> {
    let resp = reservation_service::confirm_reservation(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/reservations/{id}",
    params(
        ("id" = Uuid, Path, description = "Reservation ID")
    ),
    responses(
        (status = 200, description = "Reservation deleted", body = ApiResponse<DeletedReservation>),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Reservation not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_reservation(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<DeletedReservation>>> {
    let resp = reservation_service::delete_reservation(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/tables",
    request_body = CreateTableRequest,
    responses(
        (status = 200, description = "Table created", body = ApiResponse<Table>),
        (status = 400, description = "Invalid capacity or duplicate number"),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_table(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateTableRequest>,
) -> AppResult<Json<ApiResponse<Table>>> {
    let resp = table_service::create_table(&state, &user, payload).await?;
    Ok(Json(resp))
}
