use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    audit,
    domain::validation::{ensure_table_fits, parse_date, parse_time, validate_party_size},
    dto::reservations::{CreateReservationRequest, DeletedReservation, ReservationList},
    entity::{
        DiningTables, Reservations, Users,
        reservations::{ActiveModel as ReservationActive, Column as ResCol, Model as ResModel},
        sea_orm_active_enums::ReservationStatus,
    },
    error::{AppError, AppResult, ValidationError, unique_violation_as},
    events::ChangeEvent,
    middleware::auth::{AuthUser, ensure_admin},
    models::{Reservation, Table},
    response::{ApiResponse, Meta},
    routes::params::ReservationListQuery,
    state::AppState,
};

/// Books `table_id` for the caller. The new reservation starts out `pending`.
pub async fn create_reservation(
    state: &AppState,
    user: &AuthUser,
    payload: CreateReservationRequest,
) -> AppResult<ApiResponse<Reservation>> {
    let date = parse_date(&payload.date)?;
    let time = parse_time(&payload.time)?;
    validate_party_size(payload.party_size)?;

    let table: Table = DiningTables::find_by_id(payload.table_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?
        .into();
    if !table.available {
        return Err(ValidationError::TableUnavailable.into());
    }
    ensure_table_fits(payload.party_size, &table)?;

    let taken = Reservations::find()
        .filter(ResCol::TableId.eq(table.id))
        .filter(ResCol::Date.eq(date))
        .filter(ResCol::Time.eq(time))
        .count(&state.orm)
        .await?;
    if taken > 0 {
        return Err(ValidationError::TableAlreadyBooked.into());
    }

    let customer_name = match payload.customer_name.filter(|n| !n.trim().is_empty()) {
        Some(name) => name.trim().to_string(),
        None => {
            Users::find_by_id(user.user_id)
                .one(&state.orm)
                .await?
                .ok_or(AppError::Unauthorized)?
                .name
        }
    };

    let reservation = ReservationActive {
        id: Set(Uuid::new_v4()),
        date: Set(date),
        time: Set(time),
        party_size: Set(payload.party_size),
        status: Set(ReservationStatus::Pending),
        user_id: Set(user.user_id),
        table_id: Set(table.id),
        customer_name: Set(customer_name),
        created_at: Set(state.clock.now()),
    }
    .insert(&state.orm)
    .await
    .map_err(|err| unique_violation_as(err, ValidationError::TableAlreadyBooked))?;

    state.events.publish(ChangeEvent::ReservationCreated {
        reservation_id: reservation.id,
    });
    tracing::info!(
        reservation_id = %reservation.id,
        table = table.number,
        party_size = reservation.party_size,
        "reservation created"
    );

    audit::record(
        state,
        Some(user.user_id),
        "reservation_created",
        "reservations",
        serde_json::json!({ "reservation_id": reservation.id, "table_id": table.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Reservation created",
        reservation.into(),
        None,
    ))
}

/// Sets the reservation to `confirmed`. Confirming twice is a no-op.
pub async fn confirm_reservation(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Reservation>> {
    ensure_admin(user)?;
    let current = find_reservation(state, id).await?;
    let next = current.status.confirm();
    if current.status == next {
        return Ok(ApiResponse::success(
            "Reservation already confirmed",
            current.into(),
            None,
        ));
    }

    let mut active: ReservationActive = current.into();
    active.status = Set(next);
    let reservation = active.update(&state.orm).await?;

    state.events.publish(ChangeEvent::ReservationConfirmed { reservation_id: id });
    tracing::info!(reservation_id = %id, "reservation confirmed");

    audit::record(
        state,
        Some(user.user_id),
        "reservation_confirmed",
        "reservations",
        serde_json::json!({ "reservation_id": id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Reservation confirmed",
        reservation.into(),
        None,
    ))
}

pub async fn list_reservations(
    state: &AppState,
    user: &AuthUser,
    query: ReservationListQuery,
) -> AppResult<ApiResponse<ReservationList>> {
    let (page, limit, offset) = query.pagination().normalize();
    let mut condition = Condition::all();
    if !user.is_staff() {
        condition = condition.add(ResCol::UserId.eq(user.user_id));
    }
    if let Some(status) = query.status {
        condition = condition.add(ResCol::Status.eq(status));
    }
    if let Some(date) = query.date.as_deref() {
        condition = condition.add(ResCol::Date.eq(parse_date(date)?));
    }

    let finder = Reservations::find()
        .filter(condition)
        .order_by_desc(ResCol::CreatedAt);
    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Reservation::from)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Ok",
        ReservationList { items },
        Some(meta),
    ))
}

pub async fn get_reservation(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Reservation>> {
    let reservation = find_reservation(state, id).await?;
    if !user.is_staff() && reservation.user_id != user.user_id {
        return Err(AppError::NotFound);
    }
    Ok(ApiResponse::success("OK", reservation.into(), None))
}

/// Orders that pointed at the reservation keep existing, unlinked.
pub async fn delete_reservation(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<DeletedReservation>> {
    ensure_admin(user)?;
    let result = Reservations::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    state.events.publish(ChangeEvent::ReservationDeleted { reservation_id: id });
    tracing::info!(reservation_id = %id, "reservation deleted");

    audit::record(
        state,
        Some(user.user_id),
        "reservation_deleted",
        "reservations",
        serde_json::json!({ "reservation_id": id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Reservation deleted",
        DeletedReservation { id },
        None,
    ))
}

async fn find_reservation(state: &AppState, id: Uuid) -> AppResult<ResModel> {
    Reservations::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)
}
