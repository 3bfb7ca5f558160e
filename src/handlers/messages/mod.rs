pub mod create;
pub mod get;
pub mod read;

// Re-export handler functions for use in routing
pub use create::message_post;
pub use get::message_get;
pub use read::message_read;
