use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::{
    audit,
    domain::{
        catalog::{self, CategoryFilter},
        validation::{
            validate_description, validate_name, validate_price, validate_product_name,
            validate_stock,
        },
    },
    dto::products::{
        CategoryList, CreateCategoryRequest, CreateProductRequest, ProductList,
        UpdateProductRequest,
    },
    entity::{
        Categories, OrderLines, Products,
        categories::{ActiveModel as CategoryActive, Column as CategoryCol, Model as CategoryModel},
        order_lines::Column as OrderLineCol,
        products::{ActiveModel as ProductActive, Column as ProdCol},
    },
    error::{AppError, AppResult, unique_violation_as},
    events::ChangeEvent,
    middleware::auth::{AuthUser, ensure_admin},
    models::{Category, Product},
    response::{ApiResponse, Meta},
    routes::params::ProductQuery,
    state::AppState,
};

/// Catalog search: name substring plus exact category, then paged.
pub async fn list_products(
    state: &AppState,
    query: ProductQuery,
) -> AppResult<ApiResponse<ProductList>> {
    let (page, limit, offset) = query.pagination().normalize();

    let products: Vec<Product> = Products::find()
        .order_by_asc(ProdCol::CreatedAt)
        .order_by_asc(ProdCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Product::from)
        .collect();

    let category = CategoryFilter::parse(query.category.as_deref());
    let matches = catalog::filter(&products, query.q.as_deref().unwrap_or(""), &category);
    let total = matches.clone().count() as i64;
    let items = matches
        .skip(offset as usize)
        .take(limit as usize)
        .cloned()
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Products", ProductList { items }, Some(meta)))
}

pub async fn get_product(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Product>> {
    let product = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("OK", product.into(), None))
}

pub async fn create_product(
    state: &AppState,
    user: &AuthUser,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(user)?;
    let name = payload.name.trim().to_string();
    validate_product_name(&name)?;
    validate_description(&payload.description)?;
    validate_price(payload.price)?;
    validate_stock(payload.stock)?;
    let category = find_category(state, payload.category_id).await?;

    let product = ProductActive {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        description: Set(payload.description),
        price: Set(payload.price),
        stock: Set(payload.stock),
        category_id: Set(category.id),
        category_name: Set(category.name),
        image_url: Set(payload.image_url),
        created_at: Set(state.clock.now()),
    }
    .insert(&state.orm)
    .await?;

    state.events.publish(ChangeEvent::CatalogChanged);
    audit::record(
        state,
        Some(user.user_id),
        "product_created",
        "products",
        serde_json::json!({ "product_id": product.id }),
    )
    .await;

    Ok(ApiResponse::success("Product created", product.into(), None))
}

pub async fn update_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(user)?;
    let product = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ProductActive = product.into();
    if let Some(name) = payload.name {
        let name = name.trim().to_string();
        validate_product_name(&name)?;
        active.name = Set(name);
    }
    if let Some(description) = payload.description {
        validate_description(&description)?;
        active.description = Set(description);
    }
    if let Some(price) = payload.price {
        validate_price(price)?;
        active.price = Set(price);
    }
    if let Some(stock) = payload.stock {
        validate_stock(stock)?;
        active.stock = Set(stock);
    }
    if let Some(category_id) = payload.category_id {
        let category = find_category(state, category_id).await?;
        active.category_id = Set(category.id);
        active.category_name = Set(category.name);
    }
    if payload.image_url.is_some() {
        active.image_url = Set(payload.image_url);
    }

    let product = active.update(&state.orm).await?;

    state.events.publish(ChangeEvent::CatalogChanged);
    audit::record(
        state,
        Some(user.user_id),
        "product_updated",
        "products",
        serde_json::json!({ "product_id": product.id }),
    )
    .await;

    Ok(ApiResponse::success("Product updated", product.into(), None))
}

pub async fn delete_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(user)?;
    let product = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    // Order lines keep their product; history must not dangle.
    let referenced = OrderLines::find()
        .filter(OrderLineCol::ProductId.eq(id))
        .count(&state.orm)
        .await?;
    if referenced > 0 {
        return Err(AppError::BadRequest(
            "Product is referenced by existing orders".into(),
        ));
    }

    Products::delete_by_id(id).exec(&state.orm).await?;

    state.events.publish(ChangeEvent::CatalogChanged);
    audit::record(
        state,
        Some(user.user_id),
        "product_deleted",
        "products",
        serde_json::json!({ "product_id": id }),
    )
    .await;

    Ok(ApiResponse::success("Product deleted", product.into(), None))
}

pub async fn list_categories(state: &AppState) -> AppResult<ApiResponse<CategoryList>> {
    let items = Categories::find()
        .order_by_asc(CategoryCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Category::from)
        .collect();
    Ok(ApiResponse::success("Categories", CategoryList { items }, None))
}

pub async fn create_category(
    state: &AppState,
    user: &AuthUser,
    payload: CreateCategoryRequest,
) -> AppResult<ApiResponse<Category>> {
    ensure_admin(user)?;
    let name = payload.name.trim().to_string();
    validate_name(&name)?;

    let taken = Categories::find()
        .filter(CategoryCol::Name.eq(name.as_str()))
        .count(&state.orm)
        .await?;
    if taken > 0 {
        return Err(AppError::BadRequest(format!("Category {name} already exists")));
    }

    let category = CategoryActive {
        id: Set(Uuid::new_v4()),
        name: Set(name.clone()),
    }
    .insert(&state.orm)
    .await
    .map_err(|err| {
        unique_violation_as(err, AppError::BadRequest(format!("Category {name} already exists")))
    })?;

    state.events.publish(ChangeEvent::CatalogChanged);
    Ok(ApiResponse::success("Category created", category.into(), None))
}

async fn find_category(state: &AppState, id: Uuid) -> AppResult<CategoryModel> {
    Categories::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)
}
