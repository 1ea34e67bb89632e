mod common;

use common::{create_table, create_user, setup};
use restaurant_api::{
    dto::{
        reservations::CreateReservationRequest,
        tables::{CreateTableRequest, TableAvailabilityRequest, UpdateTableRequest},
    },
    entity::{AuditLogs, Reservations, audit_logs},
    error::{AppError, ValidationError},
    middleware::auth::AuthUser,
    models::Role,
    services::{reservation_service, table_service},
};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use uuid::Uuid;

#[tokio::test]
async fn available_tables_fit_the_party_and_are_open() -> anyhow::Result<()> {
    let app = setup().await?;
    let state = &app.state;
    create_table(state, 1, 2, true).await?;
    create_table(state, 2, 4, true).await?;
    create_table(state, 3, 6, true).await?;
    create_table(state, 4, 4, false).await?;

    let fits = table_service::available(state, 4)
        .await?
        .into_data()
        .expect("tables");
    let numbers: Vec<i32> = fits.items.iter().map(|t| t.number).collect();
    assert_eq!(numbers, vec![2, 3]);

    let everyone = table_service::list_tables(state)
        .await?
        .into_data()
        .expect("tables");
    assert_eq!(everyone.items.len(), 4);

    for party_size in [0, 9] {
        let err = table_service::available(state, party_size).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(ValidationError::InvalidPartySize)));
    }
    Ok(())
}

#[tokio::test]
async fn admins_manage_tables() -> anyhow::Result<()> {
    let app = setup().await?;
    let state = &app.state;
    let admin = create_user(state, "Admin", Role::Admin).await?;
    let waiter = create_user(state, "Waiter", Role::Waiter).await?;

    let err = table_service::create_table(
        state,
        &waiter,
        CreateTableRequest {
            number: 1,
            capacity: 2,
            available: true,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));

    let err = table_service::create_table(
        state,
        &admin,
        CreateTableRequest {
            number: 1,
            capacity: 0,
            available: true,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(ValidationError::InvalidCapacity)));

    let table = table_service::create_table(
        state,
        &admin,
        CreateTableRequest {
            number: 1,
            capacity: 2,
            available: true,
        },
    )
    .await?
    .into_data()
    .expect("table");

    let err = table_service::create_table(
        state,
        &admin,
        CreateTableRequest {
            number: 1,
            capacity: 4,
            available: true,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let closed = table_service::set_availability(
        state,
        &admin,
        table.id,
        TableAvailabilityRequest { available: false },
    )
    .await?
    .into_data()
    .expect("table");
    assert!(!closed.available);

    let open = table_service::available(state, 2)
        .await?
        .into_data()
        .expect("tables");
    assert!(open.items.is_empty());

    let err = table_service::set_availability(
        state,
        &admin,
        Uuid::new_v4(),
        TableAvailabilityRequest { available: true },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound));

    let audits = AuditLogs::find()
        .filter(audit_logs::Column::Action.eq("table_availability_changed"))
        .all(&state.orm)
        .await?;
    assert_eq!(audits.len(), 1);
    assert_eq!(audits[0].user_id, Some(admin.user_id));
    Ok(())
}

#[tokio::test]
async fn admins_renumber_resize_and_delete_tables() -> anyhow::Result<()> {
    let app = setup().await?;
    let state = &app.state;
    let admin = create_user(state, "Admin", Role::Admin).await?;
    let client = create_user(state, "Client", Role::Client).await?;
    let one = create_table(state, 1, 4, true).await?;
    let two = create_table(state, 2, 6, true).await?;

    let fetched = table_service::get_table(state, two.id)
        .await?
        .into_data()
        .expect("table");
    assert_eq!((fetched.number, fetched.capacity), (2, 6));
    let err = table_service::get_table(state, Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound));

    let resize = |number, capacity| UpdateTableRequest { number, capacity };
    let err = table_service::update_table(state, &client, one.id, resize(None, Some(2)))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));

    let err = table_service::update_table(state, &admin, one.id, resize(Some(2), None))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let err = table_service::update_table(state, &admin, one.id, resize(None, Some(0)))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(ValidationError::InvalidCapacity)));

    reservation_service::create_reservation(
        state,
        &client,
        CreateReservationRequest {
            date: "2026-10-20".into(),
            time: "20:00".into(),
            party_size: 4,
            table_id: one.id,
            customer_name: None,
        },
    )
    .await?;
    let err = table_service::update_table(state, &admin, one.id, resize(None, Some(2)))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let updated = table_service::update_table(state, &admin, one.id, resize(Some(7), Some(5)))
        .await?
        .into_data()
        .expect("table");
    assert_eq!((updated.number, updated.capacity), (7, 5));
    assert!(updated.available);

    let deleted = table_service::delete_table(state, &admin, one.id)
        .await?
        .into_data()
        .expect("deleted");
    assert_eq!(deleted.id, one.id);
    assert_eq!(Reservations::find().count(&state.orm).await?, 0);

    let err = table_service::delete_table(state, &admin, one.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound));
    let err = table_service::delete_table(state, &client, two.id).await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden));
    Ok(())
}

#[tokio::test]
async fn simultaneous_table_creation_keeps_one_number() -> anyhow::Result<()> {
    let app = setup().await?;
    let state = app.state.clone();
    let admin = create_user(&state, "Admin", Role::Admin).await?;

    let spawn_create = |admin: AuthUser, capacity| {
        let state = state.clone();
        tokio::spawn(async move {
            table_service::create_table(
                &state,
                &admin,
                CreateTableRequest {
                    number: 5,
                    capacity,
                    available: true,
                },
            )
            .await
        })
    };
    let first = spawn_create(admin.clone(), 2);
    let second = spawn_create(admin, 4);
    let outcomes = [first.await?, second.await?];

    assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(outcomes.iter().any(|r| matches!(r, Err(AppError::BadRequest(_)))));
    let tables = table_service::list_tables(&state)
        .await?
        .into_data()
        .expect("tables");
    assert_eq!(tables.items.len(), 1);
    Ok(())
}
