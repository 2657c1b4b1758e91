pub mod app;
pub mod client;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod refresh;
pub mod report;
pub mod session;
pub mod state;
pub mod storage;
pub mod ui;
pub mod views;
pub mod voice;

pub use app::router;
pub use client::ApiClient;
pub use config::Config;
pub use errors::ApiError;
pub use refresh::{RefreshBus, Subscription};
pub use session::UserSession;
pub use state::AppState;
pub use storage::{FileStore, KeyValueStore, MemoryStore};
