use crate::dates::{day_key, today_date};
use crate::models::{AnalyticsResponse, DayStat, Habit, HabitBreakdown};
use crate::streaks::best_streak;
use chrono::{Duration, NaiveDate};

const WINDOW_DAYS: i64 = 30;

pub fn build_analytics(habits: &[Habit]) -> AnalyticsResponse {
    build_analytics_at(today_date(), habits)
}

pub fn build_analytics_at(today: NaiveDate, habits: &[Habit]) -> AnalyticsResponse {
    let breakdown = habits
        .iter()
        .map(|habit| HabitBreakdown {
            id: habit.id.clone(),
            title: habit.title.clone(),
            icon: habit.icon.clone(),
            streak: habit.streak,
            best_streak: best_streak(&habit.completed_dates),
            total_completions: habit.completed_dates.len() as u32,
        })
        .collect();

    AnalyticsResponse {
        weekly: weekly_stats_at(today, habits),
        consistency_score: consistency_score_at(today, habits),
        habits: breakdown,
    }
}

pub fn weekly_stats(habits: &[Habit]) -> Vec<DayStat> {
    weekly_stats_at(today_date(), habits)
}

/// Per-day completion counts for the 7 days ending today, oldest first.
/// The denominator is the habit count as of now, also for past days: a
/// habit added mid-week counts against the whole window. With no habits
/// the denominator is clamped to 1 so percentage math stays defined.
pub fn weekly_stats_at(today: NaiveDate, habits: &[Habit]) -> Vec<DayStat> {
    let total = habits.len().max(1) as u32;

    let mut days = Vec::with_capacity(7);
    for offset in (0..7).rev() {
        let date = today - Duration::days(offset);
        let key = day_key(date);
        let completed = habits
            .iter()
            .filter(|habit| habit.completed_dates.contains(&key))
            .count() as u32;
        days.push(DayStat {
            date: key,
            day_label: date.format("%a").to_string(),
            completed_count: completed,
            total_count: total,
        });
    }
    days
}

pub fn consistency_score(habits: &[Habit]) -> u32 {
    consistency_score_at(today_date(), habits)
}

/// Share of possible completions realized over the trailing 30 days
/// (today inclusive), rounded to a whole percent.
pub fn consistency_score_at(today: NaiveDate, habits: &[Habit]) -> u32 {
    if habits.is_empty() {
        return 0;
    }

    let possible = habits.len() as u32 * WINDOW_DAYS as u32;
    let mut actual = 0u32;
    for offset in 0..WINDOW_DAYS {
        let key = day_key(today - Duration::days(offset));
        actual += habits
            .iter()
            .filter(|habit| habit.completed_dates.contains(&key))
            .count() as u32;
    }

    (f64::from(actual) / f64::from(possible) * 100.0).round() as u32
}
