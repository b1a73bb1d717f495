use crate::models::AppState;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

/// Handle to the single in-memory snapshot. Mutations replace the whole
/// `AppState` value under the lock; nothing edits it in place.
#[derive(Clone)]
pub struct SharedState {
    pub data_path: PathBuf,
    pub state: Arc<Mutex<AppState>>,
}

impl SharedState {
    pub fn new(data_path: PathBuf, state: AppState) -> Self {
        Self {
            data_path,
            state: Arc::new(Mutex::new(state)),
        }
    }
}
