use crate::errors::AppError;
use crate::models::AppState;
use crate::state::SharedState;
use crate::store;
use std::{env, path::Path, path::PathBuf};
use tokio::fs;
use tracing::error;

pub fn resolve_data_path() -> Result<PathBuf, std::io::Error> {
    if let Ok(path) = env::var("APP_DATA_PATH") {
        return Ok(PathBuf::from(path));
    }

    Ok(PathBuf::from("data/habits.json"))
}

/// Reads the persisted snapshot. Any failure (missing file, unreadable,
/// malformed JSON) degrades to the default single-profile state; a loaded
/// snapshot is normalized so the active pointer always resolves.
pub async fn load_state(path: &Path) -> AppState {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice::<AppState>(&bytes) {
            Ok(state) => store::normalize(state),
            Err(err) => {
                error!("failed to parse data file: {err}");
                store::default_state()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => store::default_state(),
        Err(err) => {
            error!("failed to read data file: {err}");
            store::default_state()
        }
    }
}

pub async fn persist_state(path: &Path, state: &AppState) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(state).map_err(AppError::internal)?;
    fs::write(path, payload).await.map_err(AppError::internal)?;
    Ok(())
}

/// Fire-and-forget save of a snapshot. Write failures are logged and never
/// reach the mutation path; state is not rolled back.
pub fn save_in_background(shared: &SharedState, snapshot: AppState) {
    let path = shared.data_path.clone();
    tokio::spawn(async move {
        if let Err(err) = persist_state(&path, &snapshot).await {
            error!("failed to persist state: {}", err.message);
        }
    });
}
