use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait, sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    audit,
    domain::cart::OrderLineDraft,
    dto::orders::{
        CheckoutRequest, ClearOrdersResult, OrderList, OrderWithLines, UpdateOrderStatusRequest,
    },
    entity::{
        OrderLines, Orders, Products, Reservations, Users,
        order_lines::{ActiveModel as OrderLineActive, Column as OrderLineCol},
        orders::{ActiveModel as OrderActive, Column as OrderCol, Model as OrderModel},
        products::Column as ProdCol,
        sea_orm_active_enums::{DeliveryMode, OrderStatus},
    },
    error::{AppError, AppResult, ValidationError},
    events::ChangeEvent,
    middleware::auth::{AuthUser, ensure_admin, ensure_staff},
    models::{Order, OrderLine, Product},
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, SortOrder},
    state::AppState,
};

/// Everything about a new order except its lines.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub delivery_mode: DeliveryMode,
    pub table_number: Option<i32>,
    pub customer_name: String,
    pub reservation_id: Option<Uuid>,
}

/// Persists an order and its lines in one transaction and starts its ready timer.
pub async fn create_order(
    state: &AppState,
    user_id: Uuid,
    lines: &[OrderLineDraft],
    new_order: NewOrder,
) -> AppResult<OrderWithLines> {
    if lines.is_empty() {
        return Err(ValidationError::EmptyCart.into());
    }
    let table_number = match new_order.delivery_mode {
        DeliveryMode::AtTable => Some(new_order.table_number.ok_or(ValidationError::MissingTable)?),
        DeliveryMode::ToGo => None,
    };
    let customer_name = new_order.customer_name.trim().to_string();
    if customer_name.is_empty() {
        return Err(ValidationError::InvalidName.into());
    }

    if let Some(reservation_id) = new_order.reservation_id {
        let owned = Reservations::find_by_id(reservation_id)
            .one(&state.orm)
            .await?
            .is_some_and(|r| r.user_id == user_id);
        if !owned {
            return Err(AppError::NotFound);
        }
    }

    let total: i64 = lines.iter().map(OrderLineDraft::subtotal).sum();
    let now = state.clock.now();
    let order_id = Uuid::new_v4();

    let txn = state.orm.begin().await?;

    let order = OrderActive {
        id: Set(order_id),
        status: Set(OrderStatus::Pending),
        total: Set(total),
        user_id: Set(user_id),
        reservation_id: Set(new_order.reservation_id),
        delivery_mode: Set(new_order.delivery_mode),
        table_number: Set(table_number),
        customer_name: Set(customer_name),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&txn)
    .await?;

    let mut order_lines = Vec::with_capacity(lines.len());
    for draft in lines {
        let line = OrderLineActive {
            id: Set(Uuid::new_v4()),
            order_id: Set(order.id),
            product_id: Set(draft.product_id),
            quantity: Set(draft.quantity),
            unit_price: Set(draft.unit_price),
        }
        .insert(&txn)
        .await?;
        order_lines.push(OrderLine::from(line));
    }

    txn.commit().await?;

    let due_at = state.ready_schedule.schedule(order.id, order.created_at);
    state.events.publish(ChangeEvent::OrderCreated { order_id: order.id });
    tracing::info!(order_id = %order.id, total, %due_at, "order created");

    Ok(OrderWithLines {
        order: order.into(),
        lines: order_lines,
    })
}

pub async fn checkout(
    state: &AppState,
    user: &AuthUser,
    payload: CheckoutRequest,
) -> AppResult<ApiResponse<OrderWithLines>> {
    let cart = state.carts.get(user.user_id);
    if cart.is_empty() {
        return Err(ValidationError::EmptyCart.into());
    }

    // Prices are frozen from the catalog as it is now, not as it was when added.
    let catalog: HashMap<Uuid, Product> = Products::find()
        .filter(ProdCol::Id.is_in(cart.product_ids()))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|model| (model.id, Product::from(model)))
        .collect();
    let cart = cart.refreshed(&catalog).map_err(|product_id| {
        tracing::debug!(%product_id, "cart references a deleted product");
        AppError::NotFound
    })?;

    let customer_name = match payload.customer_name.filter(|n| !n.trim().is_empty()) {
        Some(name) => name,
        None => {
            Users::find_by_id(user.user_id)
                .one(&state.orm)
                .await?
                .ok_or(AppError::Unauthorized)?
                .name
        }
    };

    let created = create_order(
        state,
        user.user_id,
        &cart.to_order_lines(),
        NewOrder {
            delivery_mode: payload.delivery_mode,
            table_number: payload.table_number,
            customer_name,
            reservation_id: payload.reservation_id,
        },
    )
    .await?;

    state.carts.clear(user.user_id);

    audit::record(
        state,
        Some(user.user_id),
        "checkout",
        "orders",
        serde_json::json!({ "order_id": created.order.id, "total": created.order.total }),
    )
    .await;

    Ok(ApiResponse::success("Checkout success", created, Some(Meta::empty())))
}

pub async fn list_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let (page, limit, offset) = query.pagination().normalize();
    let mut condition = Condition::all();
    if !user.is_staff() {
        condition = condition.add(OrderCol::UserId.eq(user.user_id));
    }
    if let Some(status) = query.status {
        condition = condition.add(OrderCol::Status.eq(status));
    }

    let mut finder = Orders::find().filter(condition);
    finder = match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => finder.order_by_asc(OrderCol::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(OrderCol::CreatedAt),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Order::from)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Ok", OrderList { items }, Some(meta)))
}

pub async fn get_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderWithLines>> {
    let order = find_order(state, id).await?;
    if !user.is_staff() && order.user_id != user.user_id {
        return Err(AppError::NotFound);
    }

    let lines = OrderLines::find()
        .filter(OrderLineCol::OrderId.eq(order.id))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(OrderLine::from)
        .collect();

    Ok(ApiResponse::success(
        "OK",
        OrderWithLines {
            order: order.into(),
            lines,
        },
        Some(Meta::empty()),
    ))
}

/// `ready -> delivered`. Any other starting status is rejected.
pub async fn deliver_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Order>> {
    ensure_staff(user)?;
    let order = transition(state, user, id, OrderStatus::Delivered).await?;
    Ok(ApiResponse::success("Order delivered", order, None))
}

pub async fn update_order_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<Order>> {
    ensure_staff(user)?;
    if payload.status == OrderStatus::Cancelled {
        ensure_admin(user)?;
    }
    let order = transition(state, user, id, payload.status).await?;
    Ok(ApiResponse::success("Order status updated", order, None))
}

pub async fn cancel_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Order>> {
    ensure_admin(user)?;
    let order = transition(state, user, id, OrderStatus::Cancelled).await?;
    Ok(ApiResponse::success("Order cancelled", order, None))
}

/// Timer-driven move to `ready`.
///
/// Returns `None` when the order is gone or has already left
/// `pending`/`in_preparation`; the status check and the write are one statement.
pub async fn promote_to_ready(state: &AppState, id: Uuid) -> AppResult<Option<Order>> {
    let now = state.clock.now();
    let result = Orders::update_many()
        .col_expr(OrderCol::Status, Expr::value(OrderStatus::Ready))
        .col_expr(OrderCol::UpdatedAt, Expr::value(now))
        .filter(OrderCol::Id.eq(id))
        .filter(OrderCol::Status.is_in([OrderStatus::Pending, OrderStatus::InPreparation]))
        .exec(&state.orm)
        .await?;
    if result.rows_affected == 0 {
        return Ok(None);
    }

    let order = find_order(state, id).await?;
    state.events.publish(ChangeEvent::OrderStatusChanged {
        order_id: id,
        status: OrderStatus::Ready,
    });
    tracing::info!(order_id = %id, "order ready");
    Ok(Some(order.into()))
}

/// Deletes every order and its lines. Irreversible.
pub async fn clear_all_orders(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<ClearOrdersResult>> {
    ensure_admin(user)?;

    let txn = state.orm.begin().await?;
    OrderLines::delete_many().exec(&txn).await?;
    let deleted = Orders::delete_many().exec(&txn).await?.rows_affected;
    txn.commit().await?;

    state.ready_schedule.clear();
    state.events.publish(ChangeEvent::OrdersCleared { deleted });
    tracing::warn!(deleted, user_id = %user.user_id, "all orders cleared");

    audit::record(
        state,
        Some(user.user_id),
        "orders_cleared",
        "orders",
        serde_json::json!({ "deleted": deleted }),
    )
    .await;

    Ok(ApiResponse::success(
        "Orders cleared",
        ClearOrdersResult { deleted },
        None,
    ))
}

async fn find_order(state: &AppState, id: Uuid) -> AppResult<OrderModel> {
    Orders::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)
}

async fn transition(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    target: OrderStatus,
) -> AppResult<Order> {
    let current = find_order(state, id).await?;
    let next = current.status.transition_to(target)?;
    let now = state.clock.now();

    // Guarded on the status we read so a concurrent move is not overwritten.
    let result = Orders::update_many()
        .col_expr(OrderCol::Status, Expr::value(next))
        .col_expr(OrderCol::UpdatedAt, Expr::value(now))
        .filter(OrderCol::Id.eq(id))
        .filter(OrderCol::Status.eq(current.status))
        .exec(&state.orm)
        .await?;
    if result.rows_affected == 0 {
        let latest = find_order(state, id).await?;
        return Err(AppError::InvalidTransition {
            from: latest.status,
            to: target,
        });
    }

    if !next.can_transition_to(OrderStatus::Ready) {
        state.ready_schedule.cancel(id);
    }
    state.events.publish(ChangeEvent::OrderStatusChanged {
        order_id: id,
        status: next,
    });
    tracing::info!(order_id = %id, from = %current.status, to = %next, "order status changed");

    audit::record(
        state,
        Some(user.user_id),
        "order_status_changed",
        "orders",
        serde_json::json!({ "order_id": id, "from": current.status, "to": next }),
    )
    .await;

    let mut order = Order::from(current);
    order.status = next;
    order.updated_at = now;
    Ok(order)
}
