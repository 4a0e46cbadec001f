use async_graphql::Json;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde_json::json;
use storefront_api::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    dto::{
        auth::{LoginInput, RegisterInput},
        delivery_methods::DeliveryMethodInput,
        products::{CategoryInput, ImageAttachmentInput, ProductInput},
    },
    entity::{
        Customers, customers,
        enums::{DeliveryMethodType, PaymentMethod},
    },
    error::AppError,
    middleware::auth::issue_customer_token,
    models::AuthPayload,
    services::{auth_service, delivery_method_service, product_service},
    state::AppState,
};
use uuid::Uuid;

const OWNER_EMAIL: &str = "owner@example.com";
const OWNER_PASSWORD: &str = "owner123";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(&config.database_url).await?;
    // Ensure migrations are applied.
    run_migrations(&orm).await?;
    let state = AppState::new(orm, &config);

    let owner = ensure_owner(&state).await?;
    let shop_id = owner
        .user
        .shop
        .as_ref()
        .map(|shop| shop.id)
        .ok_or_else(|| anyhow::anyhow!("seed owner has no shop"))?;

    let products = product_service::upsert_products(&state, shop_id, demo_products())
        .await?
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;
    let methods =
        delivery_method_service::upsert_delivery_methods(&state, shop_id, demo_delivery_methods())
            .await?
            .into_iter()
            .collect::<Result<Vec<_>, _>>()?;
    let customer_token = ensure_customer(&state, shop_id).await?;

    println!(
        "Seed completed. Shop ID: {shop_id}, products: {}, delivery methods: {}",
        products.len(),
        methods.len()
    );
    println!("Owner token: {}", owner.token);
    println!("Customer token: {customer_token}");
    Ok(())
}

async fn ensure_owner(state: &AppState) -> anyhow::Result<AuthPayload> {
    let registered = auth_service::register_user(
        state,
        RegisterInput {
            name: "Demo Owner".into(),
            email: OWNER_EMAIL.into(),
            password: OWNER_PASSWORD.into(),
            shop_name: "Demo Shop".into(),
            shop_slug: "demo-shop".into(),
            phone_number: Some("+10000000000".into()),
            instagram: None,
            tiktok: None,
            facebook: None,
        },
    )
    .await;

    match registered {
        Ok(payload) => Ok(payload),
        Err(AppError::DuplicateEmail) => Ok(auth_service::login_user(
            state,
            LoginInput {
                email: OWNER_EMAIL.into(),
                password: OWNER_PASSWORD.into(),
            },
        )
        .await?),
        Err(err) => Err(err.into()),
    }
}

fn demo_products() -> Vec<ProductInput> {
    let image = |name: &str| ImageAttachmentInput {
        original: Some(format!("/images/{name}.jpg")),
        normal: Some(format!("/images/{name}-normal.jpg")),
        thumbnail: Some(format!("/images/{name}-thumb.jpg")),
    };
    let category = |name: &str, slug: &str| CategoryInput {
        name: Some(name.into()),
        slug: Some(slug.into()),
    };

    vec![
        ProductInput {
            name: Some("Arepa Mix".into()),
            price: Some(3.5),
            stock: Some(40),
            position: Some(1),
            images: Some(vec![image("arepa-mix")]),
            categories: Some(vec![category("Pantry", "pantry")]),
            ..Default::default()
        },
        ProductInput {
            name: Some("Coffee Beans".into()),
            price: Some(12.0),
            stock: Some(15),
            position: Some(2),
            variants: Some(vec![
                Json(json!({ "name": "250g", "price": 12.0 })),
                Json(json!({ "name": "500g", "price": 21.0 })),
            ]),
            images: Some(vec![image("coffee")]),
            categories: Some(vec![
                category("Pantry", "pantry"),
                category("Drinks", "drinks"),
            ]),
            ..Default::default()
        },
    ]
}

fn demo_delivery_methods() -> Vec<DeliveryMethodInput> {
    vec![
        DeliveryMethodInput {
            name: Some("Store pickup".into()),
            kind: Some(DeliveryMethodType::Pickup),
            admit_cash: Some(true),
            specific_payment_methods: Some(vec![PaymentMethod::Cash, PaymentMethod::Pos]),
            ..Default::default()
        },
        DeliveryMethodInput {
            name: Some("City delivery".into()),
            price: Some(2.0),
            request_direction: Some(true),
            specific_payment_methods: Some(vec![PaymentMethod::Zelle, PaymentMethod::Pagomovil]),
            ..Default::default()
        },
    ]
}

async fn ensure_customer(state: &AppState, shop_id: Uuid) -> anyhow::Result<String> {
    let existing = Customers::find()
        .filter(customers::Column::ShopId.eq(shop_id))
        .one(&state.orm)
        .await?;
    let customer = match existing {
        Some(customer) => customer,
        None => {
            customers::ActiveModel {
                id: Set(Uuid::new_v4()),
                shop_id: Set(shop_id),
                name: Set("Demo Customer".into()),
                email: Set(Some("customer@example.com".into())),
                phone_number: Set(None),
                created_at: Set(Utc::now().into()),
            }
            .insert(&state.orm)
            .await?
        }
    };
    Ok(issue_customer_token(&state.auth, &customer)?)
}
