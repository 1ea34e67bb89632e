use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    audit,
    domain::validation::{
        normalize_email, validate_email, validate_name, validate_password, validate_phone,
    },
    dto::users::{DeletedUser, UpdateUserRequest, UserList},
    entity::{
        Orders, Reservations, Users,
        orders::Column as OrderCol,
        reservations::Column as ResCol,
        users::{ActiveModel as UserActive, Column as UserCol, Model as UserModel},
    },
    error::{AppError, AppResult, ValidationError, unique_violation_as},
    events::ChangeEvent,
    middleware::auth::{AuthUser, ensure_admin},
    models::{Role, User},
    response::{ApiResponse, Meta},
    routes::params::UserListQuery,
    services::auth_service::hash_password,
    state::AppState,
};

async fn find_user(state: &AppState, id: Uuid) -> AppResult<UserModel> {
    Users::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)
}

pub async fn list_users(
    state: &AppState,
    admin: &AuthUser,
    query: UserListQuery,
) -> AppResult<ApiResponse<UserList>> {
    ensure_admin(admin)?;
    let (page, limit, offset) = query.pagination().normalize();
    let mut condition = Condition::all();
    if let Some(role) = query.role {
        condition = condition.add(UserCol::RoleId.eq(role.id()));
    }

    let finder = Users::find()
        .filter(condition)
        .order_by_asc(UserCol::CreatedAt)
        .order_by_asc(UserCol::Email);
    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(User::from)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Ok", UserList { items }, Some(meta)))
}

pub async fn get_user(
    state: &AppState,
    admin: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<User>> {
    ensure_admin(admin)?;
    let user = find_user(state, id).await?;
    Ok(ApiResponse::success("OK", user.into(), None))
}

/// Edits any account. Admins cannot take their own admin role away.
pub async fn update_user(
    state: &AppState,
    admin: &AuthUser,
    id: Uuid,
    payload: UpdateUserRequest,
) -> AppResult<ApiResponse<User>> {
    ensure_admin(admin)?;
    if id == admin.user_id && payload.role.is_some_and(|role| role != Role::Admin) {
        return Err(AppError::BadRequest(
            "Admins cannot change their own role".into(),
        ));
    }
    let current = find_user(state, id).await?;

    let non_blank = |value: Option<String>| {
        value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let mut active: UserActive = current.clone().into();
    if let Some(name) = non_blank(payload.name) {
        validate_name(&name)?;
        active.name = Set(name);
    }
    if let Some(email) = non_blank(payload.email).map(|e| normalize_email(&e)) {
        validate_email(&email)?;
        if email != current.email {
            let taken = Users::find()
                .filter(UserCol::Email.eq(email.as_str()))
                .filter(UserCol::Id.ne(id))
                .count(&state.orm)
                .await?;
            if taken > 0 {
                return Err(ValidationError::DuplicateEmail.into());
            }
            active.email = Set(email);
        }
    }
    if let Some(phone) = non_blank(payload.phone) {
        validate_phone(&phone)?;
        active.phone = Set(phone);
    }
    if let Some(password) = payload.password.filter(|p| !p.is_empty()) {
        validate_password(&password)?;
        active.password_hash = Set(hash_password(&password)?);
    }
    if let Some(role) = payload.role {
        active.role_id = Set(role.id());
    }

    if !active.is_changed() {
        return Ok(ApiResponse::success("User updated", current.into(), None));
    }

    let updated = active
        .update(&state.orm)
        .await
        .map_err(|err| unique_violation_as(err, ValidationError::DuplicateEmail))?;

    state.events.publish(ChangeEvent::UserChanged { user_id: id });
    tracing::info!(user_id = %id, role_id = updated.role_id, "user updated");
    audit::record(
        state,
        Some(admin.user_id),
        "user_updated",
        "users",
        serde_json::json!({ "user_id": id }),
    )
    .await;

    Ok(ApiResponse::success("User updated", updated.into(), None))
}

/// Deletes an account. Its orders (with their lines) and reservations go with it.
pub async fn delete_user(
    state: &AppState,
    admin: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<DeletedUser>> {
    ensure_admin(admin)?;
    if id == admin.user_id {
        return Err(AppError::BadRequest("Admins cannot delete themselves".into()));
    }
    find_user(state, id).await?;

    let order_ids: Vec<Uuid> = Orders::find()
        .select_only()
        .column(OrderCol::Id)
        .filter(OrderCol::UserId.eq(id))
        .into_tuple()
        .all(&state.orm)
        .await?;
    let reservations = Reservations::find()
        .filter(ResCol::UserId.eq(id))
        .count(&state.orm)
        .await?;

    let result = Users::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    for order_id in &order_ids {
        state.ready_schedule.cancel(*order_id);
    }
    state.carts.clear(id);

    state.events.publish(ChangeEvent::UserDeleted { user_id: id });
    tracing::info!(
        user_id = %id,
        orders = order_ids.len(),
        reservations,
        "user deleted"
    );
    audit::record(
        state,
        Some(admin.user_id),
        "user_deleted",
        "users",
        serde_json::json!({
            "user_id": id,
            "orders": order_ids.len(),
            "reservations": reservations,
        }),
    )
    .await;

    Ok(ApiResponse::success(
        "User deleted",
        DeletedUser {
            id,
            orders: order_ids.len() as u64,
            reservations,
        },
        None,
    ))
}
