pub mod cache;
pub mod environment;
pub mod loader;
pub mod logger;
