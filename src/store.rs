//! Pure mutation operations over the app snapshot. Every operation takes
//! the current state by reference and returns the next snapshot; callers
//! swap the new value in and persist it. Operations against ids that do
//! not exist are silent no-ops, mirroring what the UI can actually issue.

use crate::dates::{day_key, today_date};
use crate::models::{AppState, Habit, Profile, ThemeColor};
use crate::streaks::current_streak_at;
use chrono::NaiveDate;
use std::collections::BTreeSet;
use uuid::Uuid;

pub const DEFAULT_PROFILE_NAME: &str = "Mis Hábitos";
const DEFAULT_ICON: &str = "📝";

fn fresh_id() -> String {
    Uuid::new_v4().to_string()
}

/// Single-profile state used on first run and after a failed load.
pub fn default_state() -> AppState {
    let profile = Profile {
        id: fresh_id(),
        name: DEFAULT_PROFILE_NAME.to_string(),
        theme_color: ThemeColor::Teal,
        habits: Vec::new(),
    };
    AppState {
        active_profile_id: profile.id.clone(),
        profiles: vec![profile],
    }
}

/// Repairs a loaded snapshot: at least one profile must exist and the
/// active pointer must reference one of them.
pub fn normalize(mut state: AppState) -> AppState {
    if state.profiles.is_empty() {
        return default_state();
    }
    if !state.profiles.iter().any(|p| p.id == state.active_profile_id) {
        state.active_profile_id = state.profiles[0].id.clone();
    }
    state
}

/// The profile habit operations act on. Falls back to the first profile
/// when the active pointer dangles; `None` only when there are no
/// profiles at all.
pub fn active_profile(state: &AppState) -> Option<&Profile> {
    state
        .profiles
        .iter()
        .find(|p| p.id == state.active_profile_id)
        .or_else(|| state.profiles.first())
}

fn map_active_profile(state: &AppState, apply: impl FnOnce(&mut Profile)) -> AppState {
    let mut next = state.clone();
    let Some(target) = active_profile(state).map(|p| p.id.clone()) else {
        return next;
    };
    if let Some(profile) = next.profiles.iter_mut().find(|p| p.id == target) {
        apply(profile);
    }
    next
}

fn normalize_icon(icon: Option<&str>) -> Option<String> {
    let icon = icon.map(str::trim).filter(|i| !i.is_empty());
    Some(icon.unwrap_or(DEFAULT_ICON).to_string())
}

pub fn add_habit(state: &AppState, title: &str, icon: Option<&str>) -> AppState {
    map_active_profile(state, |profile| {
        profile.habits.push(Habit {
            id: fresh_id(),
            title: title.to_string(),
            icon: normalize_icon(icon),
            streak: 0,
            completed_dates: BTreeSet::new(),
        });
    })
}

/// Updates title and icon only; completion history and the cached streak
/// are left alone.
pub fn edit_habit(state: &AppState, habit_id: &str, title: &str, icon: Option<&str>) -> AppState {
    map_active_profile(state, |profile| {
        if let Some(habit) = profile.habits.iter_mut().find(|h| h.id == habit_id) {
            habit.title = title.to_string();
            habit.icon = normalize_icon(icon);
        }
    })
}

pub fn toggle_habit(state: &AppState, habit_id: &str) -> AppState {
    toggle_habit_at(state, habit_id, today_date())
}

/// Flips today's completion and refreshes the cached streak from the new
/// date set. This is the only writer of `streak`.
pub fn toggle_habit_at(state: &AppState, habit_id: &str, today: NaiveDate) -> AppState {
    let key = day_key(today);
    map_active_profile(state, |profile| {
        if let Some(habit) = profile.habits.iter_mut().find(|h| h.id == habit_id) {
            if !habit.completed_dates.remove(&key) {
                habit.completed_dates.insert(key);
            }
            habit.streak = current_streak_at(today, &habit.completed_dates);
        }
    })
}

pub fn delete_habit(state: &AppState, habit_id: &str) -> AppState {
    map_active_profile(state, |profile| {
        profile.habits.retain(|h| h.id != habit_id);
    })
}

/// Replaces the display order wholesale. The caller supplies a permutation
/// of the existing habits; that contract is not checked here.
pub fn reorder_habits(state: &AppState, habits: Vec<Habit>) -> AppState {
    map_active_profile(state, |profile| {
        profile.habits = habits;
    })
}

/// Creates a profile and makes it active.
pub fn add_profile(state: &AppState, name: &str, color: ThemeColor) -> AppState {
    let mut next = state.clone();
    let profile = Profile {
        id: fresh_id(),
        name: name.to_string(),
        theme_color: color,
        habits: Vec::new(),
    };
    next.active_profile_id = profile.id.clone();
    next.profiles.push(profile);
    next
}

/// Partial merge of name and color into the matching profile.
pub fn update_profile(
    state: &AppState,
    profile_id: &str,
    name: Option<&str>,
    color: Option<ThemeColor>,
) -> AppState {
    let mut next = state.clone();
    if let Some(profile) = next.profiles.iter_mut().find(|p| p.id == profile_id) {
        if let Some(name) = name {
            profile.name = name.to_string();
        }
        if let Some(color) = color {
            profile.theme_color = color;
        }
    }
    next
}

/// Removes a profile. Deleting the last remaining profile is refused;
/// deleting the active one promotes the first remaining profile.
pub fn delete_profile(state: &AppState, profile_id: &str) -> AppState {
    if state.profiles.len() <= 1 {
        return state.clone();
    }
    let mut next = state.clone();
    next.profiles.retain(|p| p.id != profile_id);
    if next.profiles.is_empty() {
        return state.clone();
    }
    if !next.profiles.iter().any(|p| p.id == next.active_profile_id) {
        next.active_profile_id = next.profiles[0].id.clone();
    }
    next
}

/// Sets the pointer without an existence check; dangling pointers are
/// repaired at read time by `active_profile`.
pub fn set_active_profile(state: &AppState, profile_id: &str) -> AppState {
    let mut next = state.clone();
    next.active_profile_id = profile_id.to_string();
    next
}
