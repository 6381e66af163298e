// Service exports
pub mod auth;
pub mod discovery;
pub mod memory;
pub mod postgres;
pub mod profiles;
pub mod store;

pub use auth::{AuthError, Claims, TokenService};
pub use discovery::{DiscoveryError, DiscoveryService};
pub use memory::MemoryStore;
pub use postgres::PostgresStore;
pub use profiles::ProfileError;
pub use store::{ProfileStore, StoreError};
