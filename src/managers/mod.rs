pub mod auth;
pub mod executor;
pub mod method;
pub mod trigger;
