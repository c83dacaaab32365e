use campus_marketplace::{
    config::AppConfig,
    db::{OrmConn, create_orm_conn, run_migrations},
    entity::{
        Colleges, Products, Users,
        colleges::{self, ActiveModel as CollegeActive},
        products::{self, ActiveModel as ProductActive, ProductCondition, ProductStatus},
        users::{self, ActiveModel as UserActive},
    },
    models::encode_string_list,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(&config.database_url, config.db_max_connections).await?;
    run_migrations(&orm).await?;

    let college = ensure_college(&orm, "Default University", "default.edu").await?;
    let seller = ensure_user(&orm, &college, "John Doe", "john.doe@default.edu").await?;
    ensure_user(&orm, &college, "Jane Roe", "jane.roe@default.edu").await?;
    seed_products(&orm, &seller).await?;

    println!("Seed completed. College ID: {}, Seller ID: {}", college.id, seller.id);
    Ok(())
}

async fn ensure_college(
    orm: &OrmConn,
    name: &str,
    domain: &str,
) -> anyhow::Result<colleges::Model> {
    if let Some(existing) = Colleges::find()
        .filter(colleges::Column::Domain.eq(domain))
        .one(orm)
        .await?
    {
        return Ok(existing);
    }

    let college = CollegeActive {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        domain: Set(domain.to_string()),
        created_at: Set(Utc::now().into()),
    }
    .insert(orm)
    .await?;
    println!("Ensured college {domain}");
    Ok(college)
}

async fn ensure_user(
    orm: &OrmConn,
    college: &colleges::Model,
    name: &str,
    email: &str,
) -> anyhow::Result<users::Model> {
    if let Some(existing) = Users::find()
        .filter(users::Column::Email.eq(email))
        .one(orm)
        .await?
    {
        return Ok(existing);
    }

    let now = Utc::now();
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        email: Set(email.to_string()),
        avatar: Set(String::new()),
        year: Set("Senior".to_string()),
        department: Set("Computer Science".to_string()),
        college_id: Set(college.id),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(orm)
    .await?;
    println!("Ensured user {email}");
    Ok(user)
}

async fn seed_products(orm: &OrmConn, seller: &users::Model) -> anyhow::Result<()> {
    let listings = [
        (
            "MacBook Pro 13-inch",
            800.00,
            "M1, 8GB RAM, 256GB SSD. Battery health 91%.",
            ProductCondition::LikeNew,
            "Electronics",
            &["laptop", "apple"][..],
        ),
        (
            "Calculus: Early Transcendentals",
            45.00,
            "8th edition, light highlighting in the first chapters.",
            ProductCondition::Good,
            "Books",
            &["textbook", "math"][..],
        ),
        (
            "Desk Lamp",
            12.50,
            "LED, three brightness levels.",
            ProductCondition::Fair,
            "Furniture",
            &["dorm"][..],
        ),
    ];

    for (title, price, description, condition, category, tags) in listings {
        let exists = Products::find()
            .filter(products::Column::Title.eq(title))
            .filter(products::Column::SellerId.eq(seller.id))
            .one(orm)
            .await?
            .is_some();
        if exists {
            continue;
        }

        let tags: Vec<String> = tags.iter().map(|t| t.to_string()).collect();
        let now = Utc::now();
        ProductActive {
            id: Set(Uuid::new_v4()),
            title: Set(title.to_string()),
            price: Set(price),
            description: Set(description.to_string()),
            images: Set(encode_string_list(&[])),
            condition: Set(condition),
            category: Set(category.to_string()),
            tags: Set(encode_string_list(&tags)),
            status: Set(ProductStatus::Available),
            seller_id: Set(seller.id),
            college_id: Set(seller.college_id),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(orm)
        .await?;
    }

    println!("Seeded products");
    Ok(())
}
