use std::sync::Arc;

use dashmap::DashMap;
use sea_orm::EntityTrait;
use uuid::Uuid;

use crate::{
    domain::cart::Cart,
    dto::cart::{AddToCartRequest, CartView},
    entity::Products,
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Product,
    response::ApiResponse,
    state::AppState,
};

/// One cart per user, kept for the lifetime of the process.
#[derive(Debug, Clone, Default)]
pub struct CartStore {
    carts: Arc<DashMap<Uuid, Cart>>,
}

impl CartStore {
    pub fn get(&self, user_id: Uuid) -> Cart {
        self.carts
            .get(&user_id)
            .map(|cart| cart.value().clone())
            .unwrap_or_default()
    }

    /// Applies `f` to the user's cart under the entry lock and stores the result.
    pub fn update<F>(&self, user_id: Uuid, f: F) -> Cart
    where
        F: FnOnce(Cart) -> Cart,
    {
        let mut entry = self.carts.entry(user_id).or_default();
        let next = f(std::mem::take(entry.value_mut()));
        *entry.value_mut() = next.clone();
        next
    }

    pub fn clear(&self, user_id: Uuid) {
        self.carts.remove(&user_id);
    }
}

pub async fn view_cart(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<CartView>> {
    let cart = state.carts.get(user.user_id);
    Ok(ApiResponse::success("OK", CartView::from(&cart), None))
}

pub async fn add_item(
    state: &AppState,
    user: &AuthUser,
    payload: AddToCartRequest,
) -> AppResult<ApiResponse<CartView>> {
    let product: Product = Products::find_by_id(payload.product_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?
        .into();

    let cart = state
        .carts
        .update(user.user_id, |cart| cart.add_item(&product));
    tracing::debug!(user_id = %user.user_id, product_id = %product.id, "cart item added");

    Ok(ApiResponse::success("Added to cart", CartView::from(&cart), None))
}

pub async fn remove_item(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
) -> AppResult<ApiResponse<CartView>> {
    let cart = state
        .carts
        .update(user.user_id, |cart| cart.remove_item(product_id));
    Ok(ApiResponse::success("Removed from cart", CartView::from(&cart), None))
}

pub async fn clear_cart(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<CartView>> {
    state.carts.clear(user.user_id);
    Ok(ApiResponse::success("Cart cleared", CartView::from(&Cart::new()), None))
}
