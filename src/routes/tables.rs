use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::tables::TableList, error::AppResult, models::Table, response::ApiResponse,
    routes::params::AvailableTablesQuery, services::table_service, state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tables))
        .route("/available", get(available_tables))
        .route("/{id}", get(get_table))
}

#[utoipa::path(
    get,
    path = "/api/tables",
    responses(
        (status = 200, description = "Every table, by number", body = ApiResponse<TableList>)
    ),
    tag = "Tables"
)]
pub async fn list_tables(State(state): State<AppState>) -> AppResult<Json<ApiResponse<TableList>>> {
    let resp = table_service::list_tables(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/tables/available",
    params(
        ("party_size" = i32, Query, description = "Number of guests, 1 to 8")
    ),
    responses(
        (status = 200, description = "Open tables that seat the party", body = ApiResponse<TableList>),
        (status = 400, description = "Party size out of range")
    ),
    tag = "Tables"
)]
pub async fn available_tables(
    State(state): State<AppState>,
    Query(query): Query<AvailableTablesQuery>,
) -> AppResult<Json<ApiResponse<TableList>>> {
    let resp = table_service::available(&state, query.party_size).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/tables/{id}",
    params(
        ("id" = Uuid, Path, description = "Table ID")
    ),
    responses(
        (status = 200, description = "Table", body = ApiResponse<Table>),
        (status = 404, description = "Table not found")
    ),
    tag = "Tables"
)]
pub async fn get_table(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Table>>> {
    let resp = table_service::get_table(&state, id).await?;
    Ok(Json(resp))
}
