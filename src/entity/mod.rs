pub mod accounts;
pub mod categories;
pub mod customers;
pub mod delivery_methods;
pub mod enums;
pub mod image_attachments;
pub mod product_categories;
pub mod products;
pub mod shop_status_logs;
pub mod shops;
pub mod users;

pub use accounts::Entity as Accounts;
pub use categories::Entity as Categories;
pub use customers::Entity as Customers;
pub use delivery_methods::Entity as DeliveryMethods;
pub use image_attachments::Entity as ImageAttachments;
pub use product_categories::Entity as ProductCategories;
pub use products::Entity as Products;
pub use shop_status_logs::Entity as ShopStatusLogs;
pub use shops::Entity as Shops;
pub use users::Entity as Users;
