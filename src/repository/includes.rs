use std::collections::HashMap;

use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use crate::{
    entity::{
        Categories, DeliveryMethods, ImageAttachments, ProductCategories, Products, Shops, Users,
        categories, delivery_methods, image_attachments, product_categories, products, shops,
    },
    models::{
        Category, Product, Shop, User, category_from_entity, delivery_method_from_entity,
        image_from_entity, product_from_entity, shop_from_entity, user_from_entity,
    },
};

use super::filters::ShopScope;

/// Relations loaded alongside a product. Images and the owning shop are always loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductIncludes {
    pub categories: bool,
    /// Shop logo and delivery methods.
    pub shop_extras: bool,
}

impl ProductIncludes {
    pub const LIST: Self = Self {
        categories: true,
        shop_extras: false,
    };
    pub const DETAIL: Self = Self {
        categories: true,
        shop_extras: true,
    };
    pub const NESTED: Self = Self {
        categories: false,
        shop_extras: false,
    };
}

fn unique_ids(ids: impl IntoIterator<Item = Uuid>) -> Vec<Uuid> {
    let mut out = Vec::new();
    for id in ids {
        if !out.contains(&id) {
            out.push(id);
        }
    }
    out
}

pub async fn find_product<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
    includes: ProductIncludes,
) -> Result<Option<Product>, DbErr> {
    let Some(model) = Products::find_by_id(id).one(conn).await? else {
        return Ok(None);
    };
    Ok(load_products(conn, vec![model], includes).await?.pop())
}

/// Products for `ids` in the order given, once per occurrence; ids with no
/// row are skipped.
pub async fn find_products_by_ids<C: ConnectionTrait>(
    conn: &C,
    ids: &[Uuid],
    includes: ProductIncludes,
) -> Result<Vec<Product>, DbErr> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let by_id: HashMap<Uuid, products::Model> = Products::find()
        .filter(products::Column::Id.is_in(unique_ids(ids.iter().copied())))
        .all(conn)
        .await?
        .into_iter()
        .map(|model| (model.id, model))
        .collect();
    let ordered = ids.iter().filter_map(|id| by_id.get(id).cloned()).collect();
    load_products(conn, ordered, includes).await
}

pub async fn load_products<C: ConnectionTrait>(
    conn: &C,
    models: Vec<products::Model>,
    includes: ProductIncludes,
) -> Result<Vec<Product>, DbErr> {
    if models.is_empty() {
        return Ok(Vec::new());
    }
    let product_ids: Vec<Uuid> = models.iter().map(|model| model.id).collect();
    let shop_ids = unique_ids(models.iter().map(|model| model.shop_id));

    let mut images = images_by_product(conn, &product_ids).await?;
    let mut categories = if includes.categories {
        categories_by_product(conn, &product_ids).await?
    } else {
        HashMap::new()
    };
    let shops = load_shops(conn, &shop_ids, includes.shop_extras).await?;

    Ok(models
        .into_iter()
        .map(|model| {
            let id = model.id;
            let shop_id = model.shop_id;
            let mut product = product_from_entity(model);
            product.images = images
                .remove(&id)
                .unwrap_or_default()
                .into_iter()
                .map(image_from_entity)
                .collect();
            product.categories = categories.remove(&id).unwrap_or_default();
            product.shop = shops.get(&shop_id).cloned();
            product
        })
        .collect())
}

async fn images_by_product<C: ConnectionTrait>(
    conn: &C,
    product_ids: &[Uuid],
) -> Result<HashMap<Uuid, Vec<image_attachments::Model>>, DbErr> {
    let rows = ImageAttachments::find()
        .filter(image_attachments::Column::ProductId.is_in(product_ids.iter().copied()))
        .order_by_asc(image_attachments::Column::CreatedAt)
        .all(conn)
        .await?;
    let mut grouped: HashMap<Uuid, Vec<image_attachments::Model>> = HashMap::new();
    for row in rows {
        if let Some(product_id) = row.product_id {
            grouped.entry(product_id).or_default().push(row);
        }
    }
    Ok(grouped)
}

async fn categories_by_product<C: ConnectionTrait>(
    conn: &C,
    product_ids: &[Uuid],
) -> Result<HashMap<Uuid, Vec<Category>>, DbErr> {
    let links = ProductCategories::find()
        .filter(product_categories::Column::ProductId.is_in(product_ids.iter().copied()))
        .all(conn)
        .await?;
    if links.is_empty() {
        return Ok(HashMap::new());
    }
    let category_ids: Vec<i32> = links.iter().map(|link| link.category_id).collect();
    let categories: HashMap<i32, categories::Model> = Categories::find()
        .filter(categories::Column::Id.is_in(category_ids))
        .all(conn)
        .await?
        .into_iter()
        .map(|model| (model.id, model))
        .collect();

    let mut grouped: HashMap<Uuid, Vec<Category>> = HashMap::new();
    for link in links {
        if let Some(category) = categories.get(&link.category_id) {
            grouped
                .entry(link.product_id)
                .or_default()
                .push(category_from_entity(category.clone()));
        }
    }
    for list in grouped.values_mut() {
        list.sort_by_key(|category| category.id);
    }
    Ok(grouped)
}

pub async fn find_logo<C: ConnectionTrait>(
    conn: &C,
    shop_id: Uuid,
) -> Result<Option<image_attachments::Model>, DbErr> {
    ImageAttachments::find()
        .filter(image_attachments::Column::ShopId.eq(shop_id))
        .one(conn)
        .await
}

/// Shops keyed by id. With `extras` the logo and delivery methods are attached.
pub async fn load_shops<C: ConnectionTrait>(
    conn: &C,
    shop_ids: &[Uuid],
    extras: bool,
) -> Result<HashMap<Uuid, Shop>, DbErr> {
    if shop_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let models = Shops::find()
        .filter(shops::Column::Id.is_in(shop_ids.iter().copied()))
        .all(conn)
        .await?;

    if !extras {
        return Ok(models
            .into_iter()
            .map(|model| (model.id, shop_from_entity(model, None)))
            .collect());
    }

    let mut logos: HashMap<Uuid, image_attachments::Model> = ImageAttachments::find()
        .filter(image_attachments::Column::ShopId.is_in(shop_ids.iter().copied()))
        .all(conn)
        .await?
        .into_iter()
        .filter_map(|logo| logo.shop_id.map(|shop_id| (shop_id, logo)))
        .collect();

    let mut methods: HashMap<Uuid, Vec<delivery_methods::Model>> = HashMap::new();
    for method in DeliveryMethods::find()
        .filter(delivery_methods::Column::ShopId.is_in(shop_ids.iter().copied()))
        .order_by_asc(delivery_methods::Column::CreatedAt)
        .all(conn)
        .await?
    {
        methods.entry(method.shop_id).or_default().push(method);
    }

    Ok(models
        .into_iter()
        .map(|model| {
            let id = model.id;
            let mut shop = shop_from_entity(model, logos.remove(&id));
            shop.delivery_methods = Some(
                methods
                    .remove(&id)
                    .unwrap_or_default()
                    .into_iter()
                    .map(delivery_method_from_entity)
                    .collect(),
            );
            (id, shop)
        })
        .collect())
}

/// User with their shop and its logo.
pub async fn find_user<C: ConnectionTrait>(conn: &C, user_id: Uuid) -> Result<Option<User>, DbErr> {
    let Some(user) = Users::find_by_id(user_id).one(conn).await? else {
        return Ok(None);
    };
    let shop = match Shops::find()
        .filter(shops::Column::UserId.eq(user_id))
        .one(conn)
        .await?
    {
        Some(shop) => {
            let logo = find_logo(conn, shop.id).await?;
            Some(shop_from_entity(shop, logo))
        }
        None => None,
    };
    Ok(Some(user_from_entity(user, shop)))
}

/// Attach to each category the products it holds inside `scope`, with images and shop.
pub async fn load_categories<C: ConnectionTrait>(
    conn: &C,
    models: Vec<categories::Model>,
    scope: &ShopScope,
) -> Result<Vec<Category>, DbErr> {
    if models.is_empty() {
        return Ok(Vec::new());
    }
    let category_ids: Vec<i32> = models.iter().map(|model| model.id).collect();
    let links = ProductCategories::find()
        .filter(product_categories::Column::CategoryId.is_in(category_ids))
        .all(conn)
        .await?;

    let product_ids = unique_ids(links.iter().map(|link| link.product_id));
    let products = if product_ids.is_empty() {
        Vec::new()
    } else {
        let rows = Products::find()
            .filter(products::Column::Id.is_in(product_ids))
            .filter(scope.condition(products::Column::ShopId))
            .order_by_asc(products::Column::Position)
            .all(conn)
            .await?;
        load_products(conn, rows, ProductIncludes::NESTED).await?
    };
    let products: HashMap<Uuid, Product> = products
        .into_iter()
        .map(|product| (product.id, product))
        .collect();

    let mut grouped: HashMap<i32, Vec<Product>> = HashMap::new();
    for link in links {
        if let Some(product) = products.get(&link.product_id) {
            grouped
                .entry(link.category_id)
                .or_default()
                .push(product.clone());
        }
    }

    Ok(models
        .into_iter()
        .map(|model| {
            let id = model.id;
            let mut category = category_from_entity(model);
            let mut items = grouped.remove(&id).unwrap_or_default();
            items.sort_by_key(|product| product.position);
            category.products = items;
            category
        })
        .collect())
}
