pub mod analytics;
pub mod app;
pub mod dates;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod state;
pub mod storage;
pub mod store;
pub mod streaks;
pub mod ui;

pub use app::router;
pub use state::SharedState;
pub use storage::{load_state, resolve_data_path};
