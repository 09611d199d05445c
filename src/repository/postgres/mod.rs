//! PostgreSQL adapters

mod cart;
mod product;
mod session;
mod user;

pub use cart::PgCartRepository;
pub use product::PgProductCatalog;
pub use session::PgSessionRepository;
pub use user::PgUserRepository;
