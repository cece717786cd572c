pub mod app;
pub mod config;
pub mod export;
pub mod headers;
pub mod logger;
pub mod posts;
pub mod render;
pub mod sitemap;

pub use app::build_router;
