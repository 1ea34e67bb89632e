mod common;

use chrono::Duration;
use common::{create_category, create_product, create_user, setup};
use restaurant_api::{
    dto::{
        cart::AddToCartRequest,
        orders::CheckoutRequest,
        products::{CreateCategoryRequest, CreateProductRequest, UpdateProductRequest},
    },
    entity::sea_orm_active_enums::DeliveryMode,
    error::{AppError, ValidationError},
    middleware::auth::AuthUser,
    models::Role,
    routes::params::ProductQuery,
    services::{cart_service, catalog_service, order_service},
};
use uuid::Uuid;

fn query(q: Option<&str>, category: Option<&str>) -> ProductQuery {
    ProductQuery {
        q: q.map(str::to_string),
        category: category.map(str::to_string),
        ..Default::default()
    }
}

#[tokio::test]
async fn search_combines_name_and_category() -> anyhow::Result<()> {
    let app = setup().await?;
    let state = &app.state;
    let sushi = create_category(state, "Sushi").await?;
    let ramen = create_category(state, "Ramen").await?;
    create_product(state, "Sushi Sakura", sushi, "Sushi", 8990).await?;
    app.clock.advance(Duration::seconds(1));
    create_product(state, "Ramen Tonkotsu", ramen, "Ramen", 11500).await?;
    app.clock.advance(Duration::seconds(1));
    create_product(state, "Sushi Tempura", sushi, "Sushi", 9500).await?;

    let names = |resp: restaurant_api::response::ApiResponse<restaurant_api::dto::products::ProductList>| {
        resp.into_data()
            .expect("products")
            .items
            .into_iter()
            .map(|p| p.name)
            .collect::<Vec<_>>()
    };

    let all = catalog_service::list_products(state, query(None, Some("All"))).await?;
    assert_eq!(names(all), ["Sushi Sakura", "Ramen Tonkotsu", "Sushi Tempura"]);

    let by_name = catalog_service::list_products(state, query(Some("SUSHI"), None)).await?;
    assert_eq!(names(by_name), ["Sushi Sakura", "Sushi Tempura"]);

    let by_category = catalog_service::list_products(state, query(None, Some("Ramen"))).await?;
    assert_eq!(names(by_category), ["Ramen Tonkotsu"]);

    let none = catalog_service::list_products(state, query(Some("tempura"), Some("Ramen"))).await?;
    assert_eq!(none.meta.as_ref().and_then(|m| m.total), Some(0));

    let paged = catalog_service::list_products(
        state,
        ProductQuery {
            page: Some(2),
            per_page: Some(2),
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(paged.meta.as_ref().and_then(|m| m.total), Some(3));
    assert_eq!(names(paged), ["Sushi Tempura"]);
    Ok(())
}

#[tokio::test]
async fn product_admin_validates_input() -> anyhow::Result<()> {
    let app = setup().await?;
    let state = &app.state;
    let admin = create_user(state, "Admin", Role::Admin).await?;
    let client = create_user(state, "Client", Role::Client).await?;
    let category = create_category(state, "Postres").await?;

    let valid = || CreateProductRequest {
        name: "Mochi Fresa".into(),
        description: "Strawberry rice cake".into(),
        price: 3200,
        stock: 15,
        category_id: category,
        image_url: None,
    };

    let err = catalog_service::create_product(state, &client, valid())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));

    let cases = [
        (CreateProductRequest { name: "Mo".into(), ..valid() }, ValidationError::InvalidProductName),
        (CreateProductRequest { description: "Short".into(), ..valid() }, ValidationError::InvalidDescription),
        (CreateProductRequest { price: 0, ..valid() }, ValidationError::InvalidPrice),
        (CreateProductRequest { stock: -1, ..valid() }, ValidationError::InvalidStock),
    ];
    for (payload, expected) in cases {
        let err = catalog_service::create_product(state, &admin, payload)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(ref got) if *got == expected));
    }

    let err = catalog_service::create_product(
        state,
        &admin,
        CreateProductRequest {
            category_id: Uuid::new_v4(),
            ..valid()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound));

    let created = catalog_service::create_product(state, &admin, valid())
        .await?
        .into_data()
        .expect("product");
    assert_eq!(created.category_name, "Postres");
    Ok(())
}

#[tokio::test]
async fn moving_a_product_copies_the_category_name() -> anyhow::Result<()> {
    let app = setup().await?;
    let state = &app.state;
    let admin = create_user(state, "Admin", Role::Admin).await?;
    let entradas = create_category(state, "Entradas").await?;
    let sushi = create_category(state, "Sushi").await?;
    let product = create_product(state, "Gyoza", entradas, "Entradas", 5500).await?;

    let updated = catalog_service::update_product(
        state,
        &admin,
        product.id,
        UpdateProductRequest {
            category_id: Some(sushi),
            stock: Some(0),
            ..Default::default()
        },
    )
    .await?
    .into_data()
    .expect("product");
    assert_eq!(updated.category_id, sushi);
    assert_eq!(updated.category_name, "Sushi");
    assert_eq!(updated.stock, 0);
    assert_eq!(updated.price, 5500);
    Ok(())
}

#[tokio::test]
async fn ordered_products_cannot_be_deleted() -> anyhow::Result<()> {
    let app = setup().await?;
    let state = &app.state;
    let admin = create_user(state, "Admin", Role::Admin).await?;
    let client = create_user(state, "Client", Role::Client).await?;
    let category = create_category(state, "Bebidas").await?;
    let ordered = create_product(state, "Ramune", category, "Bebidas", 2500).await?;
    let spare = create_product(state, "Matcha", category, "Bebidas", 2800).await?;

    cart_service::add_item(state, &client, AddToCartRequest { product_id: ordered.id }).await?;
    order_service::checkout(
        state,
        &client,
        CheckoutRequest {
            delivery_mode: DeliveryMode::ToGo,
            table_number: None,
            customer_name: None,
            reservation_id: None,
        },
    )
    .await?;

    let err = catalog_service::delete_product(state, &admin, ordered.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    catalog_service::delete_product(state, &admin, spare.id).await?;
    let err = catalog_service::get_product(state, spare.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound));
    Ok(())
}

#[tokio::test]
async fn categories_are_unique() -> anyhow::Result<()> {
    let app = setup().await?;
    let state = &app.state;
    let admin = create_user(state, "Admin", Role::Admin).await?;

    catalog_service::create_category(state, &admin, CreateCategoryRequest { name: "Ramen".into() })
        .await?;
    let err = catalog_service::create_category(
        state,
        &admin,
        CreateCategoryRequest { name: " Ramen ".into() },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let err = catalog_service::create_category(state, &admin, CreateCategoryRequest { name: "  ".into() })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(ValidationError::InvalidName)));

    let list = catalog_service::list_categories(state)
        .await?
        .into_data()
        .expect("categories");
    assert_eq!(list.items.len(), 1);
    Ok(())
}

#[tokio::test]
async fn simultaneous_category_creation_keeps_one() -> anyhow::Result<()> {
    let app = setup().await?;
    let state = app.state.clone();
    let admin = create_user(&state, "Admin", Role::Admin).await?;

    let spawn_create = |admin: AuthUser| {
        let state = state.clone();
        tokio::spawn(async move {
            catalog_service::create_category(
                &state,
                &admin,
                CreateCategoryRequest { name: "Bebidas".into() },
            )
            .await
        })
    };
    let first = spawn_create(admin.clone());
    let second = spawn_create(admin);
    let outcomes = [first.await?, second.await?];

    assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(outcomes.iter().any(|r| matches!(r, Err(AppError::BadRequest(_)))));
    let list = catalog_service::list_categories(&state)
        .await?
        .into_data()
        .expect("categories");
    assert_eq!(list.items.len(), 1);
    Ok(())
}

#[tokio::test]
async fn cart_adds_and_removes_single_units() -> anyhow::Result<()> {
    let app = setup().await?;
    let state = &app.state;
    let client = create_user(state, "Client", Role::Client).await?;
    let category = create_category(state, "Sushi").await?;
    let sushi = create_product(state, "Sushi Sakura", category, "Sushi", 8990).await?;

    for _ in 0..2 {
        cart_service::add_item(state, &client, AddToCartRequest { product_id: sushi.id }).await?;
    }
    let view = cart_service::remove_item(state, &client, sushi.id)
        .await?
        .into_data()
        .expect("cart");
    assert_eq!((view.item_count, view.total), (1, 8990));

    let view = cart_service::remove_item(state, &client, sushi.id)
        .await?
        .into_data()
        .expect("cart");
    assert!(view.lines.is_empty());

    // Removing something that is not there changes nothing.
    let view = cart_service::remove_item(state, &client, Uuid::new_v4())
        .await?
        .into_data()
        .expect("cart");
    assert_eq!(view.item_count, 0);

    let err = cart_service::add_item(state, &client, AddToCartRequest { product_id: Uuid::new_v4() })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));
    Ok(())
}
