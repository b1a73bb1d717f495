use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Fixed palette a profile can pick from. Unknown values in a stored blob
/// fall back to `Teal` instead of failing the whole parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeColor {
    Slate,
    Rose,
    Orange,
    Blue,
    Violet,
    #[default]
    #[serde(other)]
    Teal,
}

impl ThemeColor {
    /// Accent color used by the server-rendered page.
    pub fn hex(self) -> &'static str {
        match self {
            ThemeColor::Teal => "#14b8a6",
            ThemeColor::Slate => "#64748b",
            ThemeColor::Rose => "#e11d48",
            ThemeColor::Orange => "#ea580c",
            ThemeColor::Blue => "#2563eb",
            ThemeColor::Violet => "#7c3aed",
        }
    }
}

/// One tracked habit. `streak` is a cache of the current-streak computation
/// over `completed_dates`; it is refreshed on every completion toggle and
/// never recomputed anywhere else.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default)]
    pub streak: u32,
    #[serde(default)]
    pub completed_dates: BTreeSet<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub theme_color: ThemeColor,
    #[serde(default)]
    pub habits: Vec<Habit>,
}

/// The full persisted snapshot. Every mutation produces a fresh value of
/// this type; the old one is discarded wholesale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub profiles: Vec<Profile>,
    #[serde(default)]
    pub active_profile_id: String,
}

#[derive(Debug, Deserialize)]
pub struct NewHabitRequest {
    pub title: String,
    pub icon: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EditHabitRequest {
    pub title: String,
    pub icon: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub habits: Vec<Habit>,
}

#[derive(Debug, Deserialize)]
pub struct NewProfileRequest {
    pub name: String,
    pub color: ThemeColor,
}

#[derive(Debug, Deserialize)]
pub struct ProfileUpdateRequest {
    pub name: Option<String>,
    pub color: Option<ThemeColor>,
}

#[derive(Debug, Deserialize)]
pub struct ActiveProfileRequest {
    pub id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitView {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub streak: u32,
    pub completed_today: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    pub id: String,
    pub name: String,
    pub theme_color: ThemeColor,
    pub habits: Vec<HabitView>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayStat {
    pub date: String,
    pub day_label: String,
    pub completed_count: u32,
    pub total_count: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitBreakdown {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub streak: u32,
    pub best_streak: u32,
    pub total_completions: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsResponse {
    pub weekly: Vec<DayStat>,
    pub consistency_score: u32,
    pub habits: Vec<HabitBreakdown>,
}
