mod common;

use common::{create_user, setup};
use restaurant_api::{
    dto::auth::{LoginRequest, RegisterRequest, UpdateProfileRequest},
    error::{AppError, ValidationError},
    middleware::auth::{decode_token, ensure_admin, ensure_staff},
    entity::{Roles, Users, roles},
    models::Role,
    services::auth_service,
};
use sea_orm::{EntityTrait, PaginatorTrait, QueryOrder};

fn registration(email: &str) -> RegisterRequest {
    RegisterRequest {
        name: "Valeria".into(),
        email: email.into(),
        password: "valeria123".into(),
        phone: "912345678".into(),
    }
}

#[tokio::test]
async fn register_then_login() -> anyhow::Result<()> {
    let app = setup().await?;
    let state = &app.state;

    let user = auth_service::register_user(state, registration("  Valeria@Gmail.com "))
        .await?
        .into_data()
        .expect("user");
    assert_eq!(user.email, "valeria@gmail.com");
    assert_eq!(user.role, Role::Client);

    assert!(
        auth_service::authenticate(state, "valeria@gmail.com", "wrong-pass")
            .await?
            .is_none()
    );
    assert!(
        auth_service::authenticate(state, "nobody@gmail.com", "valeria123")
            .await?
            .is_none()
    );

    let login = auth_service::login_user(
        state,
        LoginRequest {
            email: "VALERIA@gmail.com".into(),
            password: "valeria123".into(),
        },
    )
    .await?
    .into_data()
    .expect("login");
    assert_eq!(login.user.id, user.id);

    let auth = decode_token(&login.token, &state.config.jwt_secret)?;
    assert_eq!(auth.user_id, user.id);
    assert_eq!(auth.role, Role::Client);
    assert!(matches!(
        decode_token(&login.token, "another-secret"),
        Err(AppError::Unauthorized)
    ));

    let err = auth_service::login_user(
        state,
        LoginRequest {
            email: "valeria@gmail.com".into(),
            password: "nope-nope".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
    Ok(())
}

#[tokio::test]
async fn registration_rejects_bad_fields() -> anyhow::Result<()> {
    let app = setup().await?;
    let state = &app.state;
    auth_service::register_user(state, registration("valeria@gmail.com")).await?;

    let cases = [
        (registration("VALERIA@gmail.com"), ValidationError::DuplicateEmail),
        (registration("not-an-email"), ValidationError::InvalidEmail),
        (
            RegisterRequest { phone: "812345678".into(), ..registration("a@b.com") },
            ValidationError::InvalidPhone,
        ),
        (
            RegisterRequest { password: "12345".into(), ..registration("a@b.com") },
            ValidationError::WeakPassword,
        ),
        (
            RegisterRequest { name: " ".into(), ..registration("a@b.com") },
            ValidationError::InvalidName,
        ),
    ];
    for (payload, expected) in cases {
        let err = auth_service::register_user(state, payload).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(ref got) if *got == expected));
    }
    Ok(())
}

#[tokio::test]
async fn simultaneous_registrations_keep_one_account() -> anyhow::Result<()> {
    let app = setup().await?;
    let state = app.state.clone();

    let first = tokio::spawn({
        let state = state.clone();
        async move { auth_service::register_user(&state, registration("a@b.com")).await }
    });
    let second = tokio::spawn({
        let state = state.clone();
        async move { auth_service::register_user(&state, registration("A@B.com")).await }
    });
    let outcomes = [first.await?, second.await?];

    assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(outcomes.iter().any(|r| matches!(
        r,
        Err(AppError::Validation(ValidationError::DuplicateEmail))
    )));
    assert_eq!(Users::find().count(&state.orm).await?, 1);
    Ok(())
}

#[tokio::test]
async fn profile_updates_only_supplied_fields() -> anyhow::Result<()> {
    let app = setup().await?;
    let state = &app.state;
    let client = create_user(state, "Valeria", Role::Client).await?;

    let updated = auth_service::update_profile(
        state,
        &client,
        UpdateProfileRequest {
            name: Some("Valeria R.".into()),
            phone: Some("".into()),
            ..Default::default()
        },
    )
    .await?
    .into_data()
    .expect("user");
    assert_eq!(updated.name, "Valeria R.");
    assert_eq!(updated.phone, "912345678");

    let err = auth_service::update_profile(
        state,
        &client,
        UpdateProfileRequest {
            phone: Some("12345".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(ValidationError::InvalidPhone)));

    let unchanged = auth_service::update_profile(state, &client, UpdateProfileRequest::default())
        .await?
        .into_data()
        .expect("user");
    assert_eq!(unchanged.name, "Valeria R.");
    assert_eq!(unchanged.phone, "912345678");
    assert_eq!(unchanged.id, client.user_id);

    let me = auth_service::me(state, &client).await?.into_data().expect("user");
    assert_eq!(me.id, client.user_id);
    Ok(())
}

#[tokio::test]
async fn role_guards() -> anyhow::Result<()> {
    let app = setup().await?;
    let state = &app.state;
    let admin = create_user(state, "Admin", Role::Admin).await?;
    let waiter = create_user(state, "Waiter", Role::Waiter).await?;
    let client = create_user(state, "Client", Role::Client).await?;

    assert!(ensure_admin(&admin).is_ok());
    assert!(matches!(ensure_admin(&waiter), Err(AppError::Forbidden)));
    assert!(ensure_staff(&waiter).is_ok());
    assert!(matches!(ensure_staff(&client), Err(AppError::Forbidden)));

    let seeded: Vec<(i32, String)> = Roles::find()
        .order_by_asc(roles::Column::Id)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|r| (r.id, r.name))
        .collect();
    let expected: Vec<(i32, String)> = [Role::Admin, Role::Waiter, Role::Client]
        .into_iter()
        .map(|r| (r.id(), r.to_string()))
        .collect();
    assert_eq!(seeded, expected);
    Ok(())
}
