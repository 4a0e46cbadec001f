mod common;

use async_graphql::{Json, MaybeUndefined};
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, TransactionTrait,
};
use serde_json::json;
use storefront_api::{
    dto::{
        delivery_methods::DeliveryMethodInput,
        products::{CategoryInput, ImageAttachmentInput, ProductInput},
    },
    entity::{
        Categories, ImageAttachments, ProductCategories, Products, categories,
        enums::{DeliveryMethodType, PaymentMethod},
        image_attachments, product_categories,
    },
    error::AppError,
    routes::params::{CategoryQuery, DeliveryMethodQuery, Pagination, ProductQuery},
    services::{
        category_service::{self, CategoryLink},
        delivery_method_service, product_service,
    },
};

use common::{owner, setup_state, upsert_delivery_methods, upsert_products};

fn named(name: &str) -> ProductInput {
    ProductInput {
        name: Some(name.into()),
        ..Default::default()
    }
}

fn image(tag: &str) -> ImageAttachmentInput {
    ImageAttachmentInput {
        original: Some(format!("/{tag}.jpg")),
        normal: Some(format!("/{tag}-n.jpg")),
        thumbnail: Some(format!("/{tag}-t.jpg")),
    }
}

fn category(slug: &str) -> CategoryInput {
    CategoryInput {
        name: Some(slug.to_uppercase()),
        slug: Some(slug.into()),
    }
}

#[tokio::test]
async fn creates_precede_updates_in_results() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let owner = owner(&state, "a@example.com", "shop-a").await?;
    let shop_id = owner.shop_id()?;

    let existing = upsert_products(&state, shop_id, vec![named("X")]).await?;
    let x = existing[0].id;

    let result = upsert_products(
        &state,
        shop_id,
        vec![
            ProductInput {
                id: Some(x),
                name: Some("B".into()),
                ..Default::default()
            },
            ProductInput::default(),
            named("A"),
        ],
    )
    .await?;

    assert_eq!(result.len(), 2);
    assert_eq!(result[0].name, "A");
    assert_ne!(result[0].id, x);
    assert_eq!(result[1].id, x);
    assert_eq!(result[1].name, "B");
    Ok(())
}

#[tokio::test]
async fn has_variants_tracks_the_variant_list() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let shop_id = owner(&state, "v@example.com", "shop-v").await?.shop_id()?;

    let created = upsert_products(
        &state,
        shop_id,
        vec![
            named("Plain"),
            ProductInput {
                name: Some("Sized".into()),
                variants: Some(vec![Json(json!({ "size": "M" }))]),
                ..Default::default()
            },
        ],
    )
    .await?;
    assert!(!created[0].has_variants);
    assert!(created[1].has_variants);

    let updated = upsert_products(
        &state,
        shop_id,
        vec![
            ProductInput {
                id: Some(created[0].id),
                variants: Some(vec![Json(json!({ "color": "red" }))]),
                ..Default::default()
            },
            ProductInput {
                id: Some(created[1].id),
                variants: Some(Vec::new()),
                ..Default::default()
            },
        ],
    )
    .await?;
    assert!(updated[0].has_variants);
    assert_eq!(updated[0].variants.len(), 1);
    assert!(!updated[1].has_variants);
    assert!(updated[1].variants.is_empty());
    Ok(())
}

#[tokio::test]
async fn image_lists_are_replaced_wholesale() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let shop_id = owner(&state, "i@example.com", "shop-i").await?.shop_id()?;

    let created = upsert_products(
        &state,
        shop_id,
        vec![ProductInput {
            name: Some("Lamp".into()),
            images: Some(vec![image("a"), image("b"), image("c")]),
            ..Default::default()
        }],
    )
    .await?;
    let id = created[0].id;
    assert_eq!(created[0].images.len(), 3);

    let updated = upsert_products(
        &state,
        shop_id,
        vec![ProductInput {
            id: Some(id),
            images: Some(vec![image("d")]),
            ..Default::default()
        }],
    )
    .await?;
    assert_eq!(updated[0].images.len(), 1);
    assert_eq!(updated[0].images[0].original, "/d.jpg");

    let stored = ImageAttachments::find()
        .filter(image_attachments::Column::ProductId.eq(id))
        .count(&state.orm)
        .await?;
    assert_eq!(stored, 1);

    // a patch without images leaves them alone; an empty list clears them
    let untouched = upsert_products(
        &state,
        shop_id,
        vec![ProductInput {
            id: Some(id),
            description: MaybeUndefined::Value("bright".into()),
            ..Default::default()
        }],
    )
    .await?;
    assert_eq!(untouched[0].images.len(), 1);

    let cleared = upsert_products(
        &state,
        shop_id,
        vec![ProductInput {
            id: Some(id),
            images: Some(Vec::new()),
            ..Default::default()
        }],
    )
    .await?;
    assert!(cleared[0].images.is_empty());
    Ok(())
}

#[tokio::test]
async fn category_slugs_connect_or_create_once() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let shop_id = owner(&state, "c@example.com", "shop-c").await?.shop_id()?;

    let first = upsert_products(
        &state,
        shop_id,
        vec![ProductInput {
            name: Some("Boots".into()),
            categories: Some(vec![category("shoes"), category("shoes")]),
            ..Default::default()
        }],
    )
    .await?;
    assert_eq!(first[0].categories.len(), 1);

    let second = upsert_products(
        &state,
        shop_id,
        vec![
            ProductInput {
                name: Some("Sandals".into()),
                categories: Some(vec![category("shoes"), category("summer")]),
                ..Default::default()
            },
            ProductInput {
                id: Some(first[0].id),
                categories: Some(vec![category("shoes")]),
                ..Default::default()
            },
        ],
    )
    .await?;

    let shoes = Categories::find()
        .filter(categories::Column::Slug.eq("shoes"))
        .count(&state.orm)
        .await?;
    assert_eq!(shoes, 1);
    assert_eq!(Categories::find().count(&state.orm).await?, 2);

    let slugs: Vec<_> = second[0]
        .categories
        .iter()
        .map(|category| category.slug.as_str())
        .collect();
    assert!(slugs.contains(&"shoes") && slugs.contains(&"summer"));
    assert_eq!(second[1].categories.len(), 1);
    assert_eq!(second[0].categories[0].products.len(), 0);
    Ok(())
}

#[tokio::test]
async fn category_references_need_a_slug() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let shop_id = owner(&state, "s@example.com", "shop-s").await?.shop_id()?;

    let err = product_service::upsert_products(
        &state,
        shop_id,
        vec![ProductInput {
            name: Some("Hat".into()),
            categories: Some(vec![CategoryInput {
                name: Some("Hats".into()),
                slug: None,
            }]),
            ..Default::default()
        }],
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::ValidationFailed(_)));
    assert_eq!(Categories::find().count(&state.orm).await?, 0);
    Ok(())
}

#[tokio::test]
async fn updates_outside_the_callers_shop_are_not_found() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let alice = owner(&state, "alice@example.com", "alice").await?.shop_id()?;
    let bob = owner(&state, "bob@example.com", "bob").await?.shop_id()?;

    let product = upsert_products(&state, alice, vec![named("Mug")]).await?;
    let items = product_service::upsert_products(
        &state,
        bob,
        vec![ProductInput {
            id: Some(product[0].id),
            name: Some("Stolen".into()),
            ..Default::default()
        }],
    )
    .await?;
    assert!(matches!(items[..], [Err(AppError::NotFound)]));

    let unchanged = product_service::get_product(&state, product[0].id).await?;
    assert_eq!(unchanged.name, "Mug");
    Ok(())
}

#[tokio::test]
async fn pagination_reports_total_independent_of_page() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let owner = owner(&state, "p@example.com", "shop-p").await?;
    let shop_id = owner.shop_id()?;

    let records = (0..15)
        .map(|i| ProductInput {
            name: Some(format!("Item {i}")),
            position: Some(i),
            ..Default::default()
        })
        .collect();
    upsert_products(&state, shop_id, records).await?;

    let first = product_service::list_products(
        &state,
        None,
        ProductQuery {
            pagination: Pagination::new(0, 10),
            shop_slug: Some("shop-p".into()),
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(first.items.len(), 10);
    assert_eq!(first.total, 15);
    // default order is descending by position
    assert_eq!(first.items[0].position, 14);

    let second = product_service::list_products(
        &state,
        Some(&owner),
        ProductQuery {
            pagination: Pagination::new(10, 10),
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(second.items.len(), 5);
    assert_eq!(second.total, 15);
    Ok(())
}

#[tokio::test]
async fn product_filters_compose() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let shop_id = owner(&state, "f@example.com", "shop-f").await?.shop_id()?;
    let other = owner(&state, "g@example.com", "shop-g").await?.shop_id()?;

    upsert_products(
        &state,
        shop_id,
        vec![
            ProductInput {
                name: Some("Shown".into()),
                categories: Some(vec![category("tea")]),
                ..Default::default()
            },
            ProductInput {
                name: Some("Hidden".into()),
                visible: Some(false),
                categories: Some(vec![category("tea")]),
                ..Default::default()
            },
            named("Loose"),
        ],
    )
    .await?;
    upsert_products(&state, other, vec![named("Elsewhere")]).await?;

    let hidden = product_service::list_products(
        &state,
        None,
        ProductQuery {
            shop_id: Some(shop_id),
            visible: Some(false),
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(hidden.total, 1);
    assert_eq!(hidden.items[0].name, "Hidden");

    let in_tea = product_service::list_products(
        &state,
        None,
        ProductQuery {
            shop_id: Some(shop_id),
            category_slug: Some("tea".into()),
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(in_tea.total, 2);
    assert!(in_tea.items.iter().all(|p| p.shop.as_ref().map(|s| s.id) == Some(shop_id)));

    let all = product_service::list_products(
        &state,
        None,
        ProductQuery {
            shop_id: Some(shop_id),
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(all.total, 3);

    let anonymous = product_service::list_products(&state, None, ProductQuery::default()).await;
    assert!(matches!(anonymous, Err(AppError::Unauthorized)));
    Ok(())
}

#[tokio::test]
async fn categories_list_only_those_with_products_in_scope() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let shop_id = owner(&state, "k@example.com", "shop-k").await?.shop_id()?;
    let other = owner(&state, "l@example.com", "shop-l").await?.shop_id()?;

    upsert_products(
        &state,
        shop_id,
        vec![ProductInput {
            name: Some("Kettle".into()),
            categories: Some(vec![category("kitchen")]),
            ..Default::default()
        }],
    )
    .await?;
    upsert_products(
        &state,
        other,
        vec![ProductInput {
            name: Some("Rake".into()),
            categories: Some(vec![category("garden"), category("kitchen")]),
            ..Default::default()
        }],
    )
    .await?;

    let page = category_service::list_categories(
        &state,
        None,
        CategoryQuery {
            shop_slug: Some("shop-k".into()),
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].slug, "kitchen");
    assert_eq!(page.items[0].products.len(), 1);
    assert_eq!(page.items[0].products[0].name, "Kettle");

    let kitchen = category_service::get_category(&state, "kitchen").await?;
    assert_eq!(kitchen.products.len(), 2);

    let missing = category_service::get_category(&state, "nope").await;
    assert!(matches!(missing, Err(AppError::NotFound)));
    Ok(())
}

#[tokio::test]
async fn delivery_payment_methods_are_deduplicated() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let shop_id = owner(&state, "d@example.com", "shop-d").await?.shop_id()?;

    let created = upsert_delivery_methods(
        &state,
        shop_id,
        vec![DeliveryMethodInput {
            name: Some("Courier".into()),
            specific_payment_methods: Some(vec![
                PaymentMethod::Cash,
                PaymentMethod::Cash,
                PaymentMethod::Zelle,
            ]),
            ..Default::default()
        }],
    )
    .await?;
    let method = &created[0];
    assert_eq!(method.specific_payment_methods.len(), 2);
    assert!(method.specific_payment_methods.contains(&PaymentMethod::Cash));
    assert!(method.specific_payment_methods.contains(&PaymentMethod::Zelle));
    assert_eq!(method.kind, DeliveryMethodType::Delivery);
    assert!(method.active);
    assert!(!method.admit_cash);

    let stored = delivery_method_service::get_delivery_method(&state, method.id).await?;
    assert_eq!(stored.specific_payment_methods.len(), 2);
    Ok(())
}

#[tokio::test]
async fn delivery_updates_honor_explicit_false() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let owner = owner(&state, "e@example.com", "shop-e").await?;
    let shop_id = owner.shop_id()?;

    let created = upsert_delivery_methods(
        &state,
        shop_id,
        vec![DeliveryMethodInput {
            name: Some("Pickup".into()),
            kind: Some(DeliveryMethodType::Pickup),
            ..Default::default()
        }],
    )
    .await?;

    let updated = upsert_delivery_methods(
        &state,
        shop_id,
        vec![DeliveryMethodInput {
            id: Some(created[0].id),
            active: Some(false),
            ..Default::default()
        }],
    )
    .await?;
    assert!(!updated[0].active);
    assert_eq!(updated[0].name, "Pickup");
    assert_eq!(updated[0].kind, DeliveryMethodType::Pickup);

    let active_only = delivery_method_service::list_delivery_methods(
        &state,
        Some(&owner),
        DeliveryMethodQuery {
            active: Some(true),
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(active_only.total, 0);

    let missing = delivery_method_service::upsert_delivery_methods(
        &state,
        shop_id,
        vec![
            DeliveryMethodInput {
                id: Some(uuid::Uuid::new_v4()),
                name: Some("Ghost".into()),
                ..Default::default()
            },
            DeliveryMethodInput {
                id: Some(created[0].id),
                price: Some(3.5),
                ..Default::default()
            },
        ],
    )
    .await?;
    assert!(matches!(missing[0], Err(AppError::NotFound)));
    let repriced = missing[1].as_ref().expect("sibling update");
    assert_eq!(repriced.price, 3.5);
    Ok(())
}

#[tokio::test]
async fn failed_update_fails_only_its_own_item() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let shop_id = owner(&state, "u@example.com", "shop-u").await?.shop_id()?;
    let x = upsert_products(&state, shop_id, vec![named("X")]).await?[0].id;

    let items = product_service::upsert_products(
        &state,
        shop_id,
        vec![
            named("A"),
            ProductInput {
                id: Some(x),
                name: Some("B".into()),
                ..Default::default()
            },
            ProductInput {
                id: Some(uuid::Uuid::new_v4()),
                name: Some("ghost".into()),
                ..Default::default()
            },
        ],
    )
    .await?;

    assert_eq!(items.len(), 3);
    let created = items[0].as_ref().expect("create");
    assert_eq!(created.name, "A");
    let renamed = items[1].as_ref().expect("update");
    assert_eq!((renamed.id, renamed.name.as_str()), (x, "B"));
    assert!(matches!(items[2], Err(AppError::NotFound)));

    // the created id came back, so nothing needs to be retried
    assert_eq!(Products::find().count(&state.orm).await?, 2);
    Ok(())
}

#[tokio::test]
async fn failed_create_rolls_back_every_create() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let shop_id = owner(&state, "r@example.com", "shop-r").await?.shop_id()?;

    // the second record's image insert has nowhere to go
    state
        .orm
        .execute_unprepared("DROP TABLE image_attachments")
        .await?;

    let result = product_service::upsert_products(
        &state,
        shop_id,
        vec![
            named("Plain"),
            ProductInput {
                name: Some("Pictured".into()),
                images: Some(vec![image("a")]),
                ..Default::default()
            },
        ],
    )
    .await;

    assert!(result.is_err());
    assert_eq!(Products::find().count(&state.orm).await?, 0);
    Ok(())
}

#[tokio::test]
async fn repeated_ids_return_one_result_per_record() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let shop_id = owner(&state, "t@example.com", "shop-t").await?.shop_id()?;
    let x = upsert_products(&state, shop_id, vec![named("X")]).await?[0].id;

    let items = upsert_products(
        &state,
        shop_id,
        vec![
            ProductInput {
                id: Some(x),
                stock: Some(1),
                ..Default::default()
            },
            ProductInput {
                id: Some(x),
                price: Some(2.0),
                ..Default::default()
            },
        ],
    )
    .await?;

    assert_eq!(items.len(), 2);
    for item in &items {
        assert_eq!(item.id, x);
        assert_eq!((item.stock, item.price), (1, 2.0));
    }
    Ok(())
}

#[tokio::test]
async fn sibling_updates_share_a_new_category() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let shop_id = owner(&state, "n@example.com", "shop-n").await?.shop_id()?;
    let created = upsert_products(&state, shop_id, vec![named("Cup"), named("Saucer")]).await?;

    let updated = upsert_products(
        &state,
        shop_id,
        created
            .iter()
            .map(|product| ProductInput {
                id: Some(product.id),
                categories: Some(vec![category("tableware")]),
                ..Default::default()
            })
            .collect(),
    )
    .await?;

    assert!(updated.iter().all(|product| product.categories.len() == 1));
    let rows = Categories::find()
        .filter(categories::Column::Slug.eq("tableware"))
        .count(&state.orm)
        .await?;
    assert_eq!(rows, 1);
    Ok(())
}

#[tokio::test]
async fn stale_create_links_connect_to_the_existing_category() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let shop_id = owner(&state, "o@example.com", "shop-o").await?.shop_id()?;
    let product = upsert_products(
        &state,
        shop_id,
        vec![ProductInput {
            name: Some("Teapot".into()),
            categories: Some(vec![category("tea")]),
            ..Default::default()
        }],
    )
    .await?
    .remove(0);

    // decided before another writer created the slug
    let stale = CategoryLink::Create {
        name: "Tea".into(),
        slug: "tea".into(),
    };
    let txn = state.orm.begin().await?;
    category_service::apply_links(&txn, product.id, vec![stale.clone(), stale]).await?;
    txn.commit().await?;

    assert_eq!(Categories::find().count(&state.orm).await?, 1);
    let links = ProductCategories::find()
        .filter(product_categories::Column::ProductId.eq(product.id))
        .count(&state.orm)
        .await?;
    assert_eq!(links, 1);
    Ok(())
}
