//! Domain model types.
//!
//! Row types derive `sqlx::FromRow` and map 1:1 onto query results; view
//! types shape what the API returns. Monetary values are `Decimal`
//! throughout and serialize as strings.

pub mod cart;
pub mod order;
pub mod product;
pub mod user;

pub use cart::{Cart, CartLine};
pub use order::{Order, OrderItem, OrderItemDetail, OrderWithItems};
pub use product::{CatalogProduct, NewProduct, Product};
pub use user::User;
