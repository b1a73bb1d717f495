use crate::analytics::build_analytics;
use crate::errors::AppError;
use crate::models::{
    ActiveProfileRequest, AnalyticsResponse, AppState, EditHabitRequest, HabitView,
    NewHabitRequest, NewProfileRequest, ProfileUpdateRequest, ProfileView, ReorderRequest,
};
use crate::state::SharedState;
use crate::storage::save_in_background;
use crate::store;
use crate::streaks::is_completed_today;
use crate::ui::render_index;
use axum::{
    extract::{Path, State},
    response::{Html, Redirect},
    Json,
};

pub async fn index(State(shared): State<SharedState>) -> Html<String> {
    let state = shared.state.lock().await;
    Html(render_index(&state))
}

pub async fn get_state(State(shared): State<SharedState>) -> Json<AppState> {
    let state = shared.state.lock().await;
    Json(state.clone())
}

pub async fn get_profile(
    State(shared): State<SharedState>,
) -> Result<Json<ProfileView>, AppError> {
    let state = shared.state.lock().await;
    Ok(Json(profile_view(&state)?))
}

pub async fn get_analytics(
    State(shared): State<SharedState>,
) -> Result<Json<AnalyticsResponse>, AppError> {
    let state = shared.state.lock().await;
    let profile = store::active_profile(&state)
        .ok_or_else(|| AppError::internal_message("state has no profiles"))?;
    Ok(Json(build_analytics(&profile.habits)))
}

pub async fn add_habit(
    State(shared): State<SharedState>,
    Json(payload): Json<NewHabitRequest>,
) -> Result<Json<ProfileView>, AppError> {
    let title = payload.title.trim();
    if title.is_empty() {
        return Err(AppError::bad_request("habit title must not be empty"));
    }

    let next = apply(&shared, |state| {
        store::add_habit(state, title, payload.icon.as_deref())
    })
    .await;
    profile_view(&next).map(Json)
}

pub async fn edit_habit(
    State(shared): State<SharedState>,
    Path(id): Path<String>,
    Json(payload): Json<EditHabitRequest>,
) -> Result<Json<ProfileView>, AppError> {
    let title = payload.title.trim();
    if title.is_empty() {
        return Err(AppError::bad_request("habit title must not be empty"));
    }

    let next = apply(&shared, |state| {
        store::edit_habit(state, &id, title, payload.icon.as_deref())
    })
    .await;
    profile_view(&next).map(Json)
}

pub async fn toggle_habit(
    State(shared): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<ProfileView>, AppError> {
    let next = apply(&shared, |state| store::toggle_habit(state, &id)).await;
    profile_view(&next).map(Json)
}

/// Form-post variant used by the server-rendered page.
pub async fn toggle_habit_form(
    State(shared): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Redirect, AppError> {
    apply(&shared, |state| store::toggle_habit(state, &id)).await;
    Ok(Redirect::to("/"))
}

pub async fn delete_habit(
    State(shared): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<ProfileView>, AppError> {
    let next = apply(&shared, |state| store::delete_habit(state, &id)).await;
    profile_view(&next).map(Json)
}

pub async fn reorder_habits(
    State(shared): State<SharedState>,
    Json(payload): Json<ReorderRequest>,
) -> Result<Json<ProfileView>, AppError> {
    let next = apply(&shared, |state| {
        store::reorder_habits(state, payload.habits)
    })
    .await;
    profile_view(&next).map(Json)
}

pub async fn add_profile(
    State(shared): State<SharedState>,
    Json(payload): Json<NewProfileRequest>,
) -> Result<Json<AppState>, AppError> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(AppError::bad_request("profile name must not be empty"));
    }

    let next = apply(&shared, |state| {
        store::add_profile(state, name, payload.color)
    })
    .await;
    Ok(Json(next))
}

pub async fn update_profile(
    State(shared): State<SharedState>,
    Path(id): Path<String>,
    Json(payload): Json<ProfileUpdateRequest>,
) -> Result<Json<AppState>, AppError> {
    let name = payload.name.as_deref().map(str::trim);
    if name.is_some_and(str::is_empty) {
        return Err(AppError::bad_request("profile name must not be empty"));
    }

    let next = apply(&shared, |state| {
        store::update_profile(state, &id, name, payload.color)
    })
    .await;
    Ok(Json(next))
}

pub async fn delete_profile(
    State(shared): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<AppState>, AppError> {
    let next = apply(&shared, |state| store::delete_profile(state, &id)).await;
    Ok(Json(next))
}

pub async fn set_active_profile(
    State(shared): State<SharedState>,
    Json(payload): Json<ActiveProfileRequest>,
) -> Result<Json<AppState>, AppError> {
    let next = apply(&shared, |state| {
        store::set_active_profile(state, &payload.id)
    })
    .await;
    Ok(Json(next))
}

/// Runs one mutation under the lock, installs the new snapshot and kicks
/// off the background save. Returns the snapshot the caller should render.
async fn apply(shared: &SharedState, mutate: impl FnOnce(&AppState) -> AppState) -> AppState {
    let next = {
        let mut state = shared.state.lock().await;
        let next = mutate(&state);
        *state = next.clone();
        next
    };
    save_in_background(shared, next.clone());
    next
}

fn profile_view(state: &AppState) -> Result<ProfileView, AppError> {
    let profile = store::active_profile(state)
        .ok_or_else(|| AppError::internal_message("state has no profiles"))?;
    Ok(ProfileView {
        id: profile.id.clone(),
        name: profile.name.clone(),
        theme_color: profile.theme_color,
        habits: profile
            .habits
            .iter()
            .map(|habit| HabitView {
                id: habit.id.clone(),
                title: habit.title.clone(),
                icon: habit.icon.clone(),
                streak: habit.streak,
                completed_today: is_completed_today(habit),
            })
            .collect(),
    })
}
