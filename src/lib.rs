pub mod cache;
pub mod config;
pub mod demo_feed;
pub mod error;
pub mod export;
pub mod feed;
pub mod http_cache;
pub mod http_client;
pub mod logging;
pub mod model;
pub mod pitch;
pub mod provider;
pub mod spatial;
pub mod state;
pub mod statsbomb;
pub mod stats;
pub mod summary;
