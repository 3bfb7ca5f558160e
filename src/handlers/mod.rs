// handlers/mod.rs
//
// Public:    /, /health
// Protected: /messages/* (bearer JWT, see middleware::auth)
pub mod messages;
pub mod service;
