pub mod config;
pub mod dashboard;
pub mod display;
pub mod feed;
pub mod fetch_cache;
pub mod html;
pub mod http_client;
pub mod projection;
pub mod server;
pub mod tui;
