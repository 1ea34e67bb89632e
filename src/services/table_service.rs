use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::{
    audit,
    domain::{tables::available_tables, validation::validate_party_size},
    dto::tables::{
        CreateTableRequest, DeletedTable, TableAvailabilityRequest, TableList, UpdateTableRequest,
    },
    entity::{
        DiningTables, Reservations,
        dining_tables::{ActiveModel as TableActive, Column as TableCol, Model as TableModel},
        reservations::Column as ResCol,
    },
    error::{AppError, AppResult, ValidationError, unique_violation_as},
    events::ChangeEvent,
    middleware::auth::{AuthUser, ensure_admin},
    models::Table,
    response::ApiResponse,
    state::AppState,
};

async fn all_tables(state: &AppState) -> AppResult<Vec<Table>> {
    Ok(DiningTables::find()
        .order_by_asc(TableCol::Number)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Table::from)
        .collect())
}

async fn find_table(state: &AppState, id: Uuid) -> AppResult<TableModel> {
    DiningTables::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)
}

fn duplicate_number(number: i32) -> AppError {
    AppError::BadRequest(format!("Table {number} already exists"))
}

pub async fn list_tables(state: &AppState) -> AppResult<ApiResponse<TableList>> {
    let items = all_tables(state).await?;
    Ok(ApiResponse::success("OK", TableList { items }, None))
}

pub async fn get_table(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Table>> {
    let table = find_table(state, id).await?;
    Ok(ApiResponse::success("OK", table.into(), None))
}

/// Tables that seat `party_size` and are currently open for booking.
pub async fn available(state: &AppState, party_size: i32) -> AppResult<ApiResponse<TableList>> {
    validate_party_size(party_size)?;
    let tables = all_tables(state).await?;
    let items = available_tables(&tables, party_size)
        .filter(|t| t.available)
        .cloned()
        .collect();
    Ok(ApiResponse::success("OK", TableList { items }, None))
}

pub async fn create_table(
    state: &AppState,
    user: &AuthUser,
    payload: CreateTableRequest,
) -> AppResult<ApiResponse<Table>> {
    ensure_admin(user)?;
    if payload.capacity <= 0 || payload.number <= 0 {
        return Err(ValidationError::InvalidCapacity.into());
    }

    let taken = DiningTables::find()
        .filter(TableCol::Number.eq(payload.number))
        .count(&state.orm)
        .await?;
    if taken > 0 {
        return Err(duplicate_number(payload.number));
    }

    let table = TableActive {
        id: Set(Uuid::new_v4()),
        number: Set(payload.number),
        capacity: Set(payload.capacity),
        available: Set(payload.available),
    }
    .insert(&state.orm)
    .await
    .map_err(|err| unique_violation_as(err, duplicate_number(payload.number)))?;

    state.events.publish(ChangeEvent::TableChanged { table_id: table.id });
    audit::record(
        state,
        Some(user.user_id),
        "table_created",
        "dining_tables",
        serde_json::json!({ "table_id": table.id, "number": table.number }),
    )
    .await;

    Ok(ApiResponse::success("Table created", table.into(), None))
}

/// Renumbers or resizes a table. A table cannot shrink below a party already booked on it.
pub async fn update_table(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateTableRequest,
) -> AppResult<ApiResponse<Table>> {
    ensure_admin(user)?;
    if payload.number.is_some_and(|n| n <= 0) || payload.capacity.is_some_and(|c| c <= 0) {
        return Err(ValidationError::InvalidCapacity.into());
    }
    let table = find_table(state, id).await?;

    if let Some(capacity) = payload.capacity.filter(|c| *c < table.capacity) {
        let too_big = Reservations::find()
            .filter(ResCol::TableId.eq(id))
            .filter(ResCol::PartySize.gt(capacity))
            .count(&state.orm)
            .await?;
        if too_big > 0 {
            return Err(AppError::BadRequest(format!(
                "Table has {too_big} reservation(s) larger than {capacity}"
            )));
        }
    }

    let mut active: TableActive = table.clone().into();
    if let Some(number) = payload.number {
        active.number = Set(number);
    }
    if let Some(capacity) = payload.capacity {
        active.capacity = Set(capacity);
    }
    if !active.is_changed() {
        return Ok(ApiResponse::success("Table updated", table.into(), None));
    }

    let number = payload.number.unwrap_or(table.number);
    let table = active
        .update(&state.orm)
        .await
        .map_err(|err| unique_violation_as(err, duplicate_number(number)))?;

    state.events.publish(ChangeEvent::TableChanged { table_id: id });
    tracing::info!(table_id = %id, number = table.number, capacity = table.capacity, "table updated");
    audit::record(
        state,
        Some(user.user_id),
        "table_updated",
        "dining_tables",
        serde_json::json!({ "table_id": id, "number": table.number, "capacity": table.capacity }),
    )
    .await;

    Ok(ApiResponse::success("Table updated", table.into(), None))
}

pub async fn set_availability(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: TableAvailabilityRequest,
) -> AppResult<ApiResponse<Table>> {
    ensure_admin(user)?;
    let table = find_table(state, id).await?;

    let mut active: TableActive = table.into();
    active.available = Set(payload.available);
    let table = active.update(&state.orm).await?;

    state.events.publish(ChangeEvent::TableChanged { table_id: id });
    tracing::info!(table_id = %id, available = table.available, "table availability changed");
    audit::record(
        state,
        Some(user.user_id),
        "table_availability_changed",
        "dining_tables",
        serde_json::json!({ "table_id": id, "available": table.available }),
    )
    .await;

    Ok(ApiResponse::success("Table updated", table.into(), None))
}

/// Removes the table together with its reservations.
pub async fn delete_table(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<DeletedTable>> {
    ensure_admin(user)?;
    let result = DiningTables::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    state.events.publish(ChangeEvent::TableChanged { table_id: id });
    tracing::info!(table_id = %id, "table deleted");
    audit::record(
        state,
        Some(user.user_id),
        "table_deleted",
        "dining_tables",
        serde_json::json!({ "table_id": id }),
    )
    .await;

    Ok(ApiResponse::success("Table deleted", DeletedTable { id }, None))
}
