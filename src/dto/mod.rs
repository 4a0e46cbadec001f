pub mod auth;
pub mod delivery_methods;
pub mod products;
pub mod users;
