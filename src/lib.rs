pub mod config;
pub mod db;
pub mod error;
pub mod fetch;
pub mod model;
pub mod projector;
pub mod qrcodes;
pub mod server;
pub mod shopify;
