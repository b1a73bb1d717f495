use crate::dates::{day_key, parse_day_key, today, today_date};
use crate::models::Habit;
use chrono::{Duration, NaiveDate};
use std::collections::BTreeSet;

pub fn is_completed_today(habit: &Habit) -> bool {
    habit.completed_dates.contains(&today())
}

pub fn current_streak(completed: &BTreeSet<String>) -> u32 {
    current_streak_at(today_date(), completed)
}

/// Consecutive-day count anchored on the present, walking backwards from
/// today. Today itself gets a grace day: an unmarked today does not break
/// the chain as long as yesterday is marked.
pub fn current_streak_at(today: NaiveDate, completed: &BTreeSet<String>) -> u32 {
    let yesterday = today - Duration::days(1);
    let mut cursor = if completed.contains(&day_key(today)) {
        today
    } else if completed.contains(&day_key(yesterday)) {
        yesterday
    } else {
        return 0;
    };

    let mut streak = 0;
    while completed.contains(&day_key(cursor)) {
        streak += 1;
        cursor = cursor - Duration::days(1);
    }
    streak
}

/// Longest run of consecutive days anywhere in history. No anchor on the
/// present; a long-dead run still counts.
pub fn best_streak(completed: &BTreeSet<String>) -> u32 {
    // Lexical set order is chronological for zero-padded day keys.
    let mut best = 0u32;
    let mut run = 0u32;
    let mut prev: Option<NaiveDate> = None;

    for key in completed {
        let Some(date) = parse_day_key(key) else {
            continue;
        };
        run = match prev {
            Some(p) if date - p == Duration::days(1) => run + 1,
            // Two keys for the same day (e.g. unpadded variants) hold the run.
            Some(p) if date == p => run,
            _ => 1,
        };
        best = best.max(run);
        prev = Some(date);
    }
    best
}
