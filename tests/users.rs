mod common;

use common::{create_category, create_product, create_table, create_user, setup};
use restaurant_api::{
    dto::{
        cart::AddToCartRequest, orders::CheckoutRequest,
        reservations::CreateReservationRequest, users::UpdateUserRequest,
    },
    entity::{OrderLines, Orders, Reservations, Users, sea_orm_active_enums::DeliveryMode},
    error::{AppError, ValidationError},
    models::Role,
    routes::params::UserListQuery,
    services::{auth_service, cart_service, order_service, reservation_service, user_service},
};
use sea_orm::{EntityTrait, PaginatorTrait};
use uuid::Uuid;

#[tokio::test]
async fn only_admins_manage_accounts() -> anyhow::Result<()> {
    let app = setup().await?;
    let state = &app.state;
    let admin = create_user(state, "Admin", Role::Admin).await?;
    let waiter = create_user(state, "Waiter", Role::Waiter).await?;
    let client = create_user(state, "Client", Role::Client).await?;

    let err = user_service::list_users(state, &waiter, UserListQuery::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));
    let err = user_service::get_user(state, &client, admin.user_id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));
    let err = user_service::delete_user(state, &waiter, client.user_id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));

    let all = user_service::list_users(state, &admin, UserListQuery::default()).await?;
    assert_eq!(all.meta.and_then(|m| m.total), Some(3));

    let clients = user_service::list_users(
        state,
        &admin,
        UserListQuery {
            role: Some(Role::Client),
            ..Default::default()
        },
    )
    .await?
    .into_data()
    .expect("users");
    assert_eq!(clients.items.len(), 1);
    assert_eq!(clients.items[0].id, client.user_id);

    let fetched = user_service::get_user(state, &admin, waiter.user_id)
        .await?
        .into_data()
        .expect("user");
    assert_eq!(fetched.role, Role::Waiter);
    let err = user_service::get_user(state, &admin, Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));
    Ok(())
}

#[tokio::test]
async fn admin_edits_fields_and_role() -> anyhow::Result<()> {
    let app = setup().await?;
    let state = &app.state;
    let admin = create_user(state, "Admin", Role::Admin).await?;
    let client = create_user(state, "Client", Role::Client).await?;
    let other = create_user(state, "Other", Role::Client).await?;
    let other_email = user_service::get_user(state, &admin, other.user_id)
        .await?
        .into_data()
        .expect("user")
        .email;

    let updated = user_service::update_user(
        state,
        &admin,
        client.user_id,
        UpdateUserRequest {
            name: Some("Mesero Nuevo".into()),
            email: Some(" Mesero@Sakura.com ".into()),
            password: Some("mesero123".into()),
            role: Some(Role::Waiter),
            ..Default::default()
        },
    )
    .await?
    .into_data()
    .expect("user");
    assert_eq!(updated.name, "Mesero Nuevo");
    assert_eq!(updated.email, "mesero@sakura.com");
    assert_eq!(updated.role, Role::Waiter);
    assert_eq!(updated.phone, "912345678");

    let login = auth_service::authenticate(state, "mesero@sakura.com", "mesero123").await?;
    assert_eq!(login.map(|u| u.id), Some(client.user_id));

    let err = user_service::update_user(
        state,
        &admin,
        client.user_id,
        UpdateUserRequest {
            email: Some(other_email),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(ValidationError::DuplicateEmail)));

    let err = user_service::update_user(
        state,
        &admin,
        client.user_id,
        UpdateUserRequest {
            phone: Some("812345678".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(ValidationError::InvalidPhone)));

    let err = user_service::update_user(
        state,
        &admin,
        admin.user_id,
        UpdateUserRequest {
            role: Some(Role::Client),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
    Ok(())
}

#[tokio::test]
async fn deleting_a_user_removes_their_orders_and_reservations() -> anyhow::Result<()> {
    let app = setup().await?;
    let state = &app.state;
    let admin = create_user(state, "Admin", Role::Admin).await?;
    let client = create_user(state, "Client", Role::Client).await?;
    let bystander = create_user(state, "Bystander", Role::Client).await?;
    let table = create_table(state, 3, 4, true).await?;
    let category = create_category(state, "Ramen").await?;
    let ramen = create_product(state, "Ramen Tonkotsu", category, "Ramen", 11500).await?;

    reservation_service::create_reservation(
        state,
        &client,
        CreateReservationRequest {
            date: "2026-10-20".into(),
            time: "19:30".into(),
            party_size: 2,
            table_id: table.id,
            customer_name: None,
        },
    )
    .await?;

    let mut placed = Vec::new();
    for user in [&client, &bystander] {
        cart_service::add_item(state, user, AddToCartRequest { product_id: ramen.id }).await?;
        let order = order_service::checkout(
            state,
            user,
            CheckoutRequest {
                delivery_mode: DeliveryMode::ToGo,
                table_number: None,
                customer_name: None,
                reservation_id: None,
            },
        )
        .await?
        .into_data()
        .expect("order");
        placed.push(order.order.id);
    }
    cart_service::add_item(state, &client, AddToCartRequest { product_id: ramen.id }).await?;

    let err = user_service::delete_user(state, &admin, admin.user_id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let deleted = user_service::delete_user(state, &admin, client.user_id)
        .await?
        .into_data()
        .expect("deleted");
    assert_eq!(deleted.id, client.user_id);
    assert_eq!((deleted.orders, deleted.reservations), (1, 1));

    assert!(Users::find_by_id(client.user_id).one(&state.orm).await?.is_none());
    assert_eq!(Reservations::find().count(&state.orm).await?, 0);
    assert_eq!(Orders::find().count(&state.orm).await?, 1);
    assert_eq!(OrderLines::find().count(&state.orm).await?, 1);
    assert!(state.ready_schedule.due_at(placed[0]).is_none());
    assert!(state.ready_schedule.due_at(placed[1]).is_some());
    assert!(state.carts.get(client.user_id).is_empty());

    let err = user_service::delete_user(state, &admin, client.user_id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));
    Ok(())
}
