use chrono::Utc;
use restaurant_api::{
    config::DEFAULT_DATABASE_URL,
    db::{create_orm_conn, run_migrations},
    entity::{
        Categories, DiningTables, Products, Users, categories, dining_tables, products, users,
    },
    models::Role,
    services::auth_service::hash_password,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

const CATEGORIES: [&str; 5] = ["Entradas", "Sushi", "Ramen", "Bebidas", "Postres"];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

    let orm = create_orm_conn(&database_url).await?;
    run_migrations(&orm).await?;

    let admin_id = ensure_user(&orm, "Admin Sakura", "admin@sakura.com", "admin123", Role::Admin).await?;
    ensure_user(&orm, "Mesero Sakura", "mesero@sakura.com", "mesero123", Role::Waiter).await?;
    let client_id = ensure_user(&orm, "Valeria", "valeria@gmail.com", "valeria123", Role::Client).await?;
    seed_tables(&orm).await?;
    seed_menu(&orm).await?;

    println!("Seed completed. Admin ID: {admin_id}, Client ID: {client_id}");
    Ok(())
}

/// Inserts the account unless the email is already registered.
async fn ensure_user(
    orm: &DatabaseConnection,
    name: &str,
    email: &str,
    password: &str,
    role: Role,
) -> anyhow::Result<Uuid> {
    if let Some(existing) = Users::find()
        .filter(users::Column::Email.eq(email))
        .one(orm)
        .await?
    {
        return Ok(existing.id);
    }

    let user = users::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        email: Set(email.to_string()),
        password_hash: Set(hash_password(password)?),
        phone: Set("912345678".to_string()),
        image_uri: Set(None),
        role_id: Set(role.id()),
        created_at: Set(Utc::now()),
    }
    .insert(orm)
    .await?;

    println!("Ensured user {email} (role={role})");
    Ok(user.id)
}

/// Tables 1 to 8: even numbers seat four, odd numbers seat two.
async fn seed_tables(orm: &DatabaseConnection) -> anyhow::Result<()> {
    for number in 1..=8 {
        let exists = DiningTables::find()
            .filter(dining_tables::Column::Number.eq(number))
            .one(orm)
            .await?
            .is_some();
        if exists {
            continue;
        }
        dining_tables::ActiveModel {
            id: Set(Uuid::new_v4()),
            number: Set(number),
            capacity: Set(if number % 2 == 0 { 4 } else { 2 }),
            available: Set(true),
        }
        .insert(orm)
        .await?;
    }

    println!("Seeded tables");
    Ok(())
}

async fn seed_menu(orm: &DatabaseConnection) -> anyhow::Result<()> {
    let mut category_ids = Vec::with_capacity(CATEGORIES.len());
    for name in CATEGORIES {
        let existing = Categories::find()
            .filter(categories::Column::Name.eq(name))
            .one(orm)
            .await?;
        let id = match existing {
            Some(category) => category.id,
            None => {
                categories::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    name: Set(name.to_string()),
                }
                .insert(orm)
                .await?
                .id
            }
        };
        category_ids.push((name, id));
    }

    let menu = [
        ("Sushi Sakura", "Salmon and avocado roll", 8990, 10, "Sushi"),
        ("Ramen Tonkotsu", "Pork broth with noodles", 11500, 5, "Ramen"),
        ("Gyoza", "Pan-fried japanese dumplings", 5500, 20, "Entradas"),
        ("Mochi Fresa", "Strawberry rice cake dessert", 3200, 15, "Postres"),
    ];

    for (name, description, price, stock, category) in menu {
        let exists = Products::find()
            .filter(products::Column::Name.eq(name))
            .one(orm)
            .await?
            .is_some();
        if exists {
            continue;
        }
        let Some((_, category_id)) = category_ids.iter().find(|(n, _)| *n == category) else {
            anyhow::bail!("unknown category {category}");
        };
        products::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            description: Set(description.to_string()),
            price: Set(price),
            stock: Set(stock),
            category_id: Set(*category_id),
            category_name: Set(category.to_string()),
            image_url: Set(None),
            created_at: Set(Utc::now()),
        }
        .insert(orm)
        .await?;
    }

    println!("Seeded products");
    Ok(())
}
