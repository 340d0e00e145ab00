//! Domain models for the catalog application.

pub mod product;
pub mod session;
pub mod user;

pub use product::{NewProduct, Product, ProductChanges};
pub use session::{CurrentUser, session_keys};
pub use user::User;
