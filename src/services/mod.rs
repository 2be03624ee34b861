// Service exports
pub mod auth;
pub mod authors;
pub mod memory;
pub mod postgres;
pub mod store;

pub use auth::{AuthError, AuthenticatedUser, Claims, TokenVerifier};
pub use authors::AuthorDirectory;
pub use memory::MemoryStore;
pub use postgres::PostgresStore;
pub use store::{GroupStore, HelpStore, Store, StoreError, UserStore};
