pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod store;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryMessageStore;
pub use postgres::PgMessageStore;
pub use store::MessageStore;
