use crate::analytics::consistency_score;
use crate::dates::today;
use crate::models::AppState;
use crate::store;
use crate::streaks::is_completed_today;

/// Server-rendered index for the active profile: today's habits with
/// toggle buttons plus the 30-day consistency score.
pub fn render_index(state: &AppState) -> String {
    let Some(profile) = store::active_profile(state) else {
        return INDEX_HTML
            .replace("{{ACCENT}}", "#14b8a6")
            .replace("{{PROFILE}}", "—")
            .replace("{{DATE}}", &today())
            .replace("{{DONE}}", "0")
            .replace("{{TOTAL}}", "0")
            .replace("{{SCORE}}", "0")
            .replace("{{ROWS}}", EMPTY_ROWS);
    };

    let done = profile
        .habits
        .iter()
        .filter(|habit| is_completed_today(habit))
        .count();

    let mut rows = String::new();
    for habit in &profile.habits {
        let completed = is_completed_today(habit);
        rows.push_str(&format!(
            r#"<li class="habit{checked}">
  <span class="icon">{icon}</span>
  <span class="title">{title}</span>
  <span class="streak" title="current streak">{streak}🔥</span>
  <form method="post" action="/toggle/{id}">
    <button type="submit">{label}</button>
  </form>
</li>
"#,
            checked = if completed { " done" } else { "" },
            icon = escape(habit.icon.as_deref().unwrap_or("📝")),
            title = escape(&habit.title),
            streak = habit.streak,
            id = escape(&habit.id),
            label = if completed { "Undo" } else { "Done" },
        ));
    }
    if rows.is_empty() {
        rows.push_str(EMPTY_ROWS);
    }

    INDEX_HTML
        .replace("{{ACCENT}}", profile.theme_color.hex())
        .replace("{{PROFILE}}", &escape(&profile.name))
        .replace("{{DATE}}", &today())
        .replace("{{DONE}}", &done.to_string())
        .replace("{{TOTAL}}", &profile.habits.len().to_string())
        .replace("{{SCORE}}", &consistency_score(&profile.habits).to_string())
        .replace("{{ROWS}}", &rows)
}

fn escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

const EMPTY_ROWS: &str =
    r#"<li class="empty">No habits yet. Add one through the API to get started.</li>"#;

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Atomic Daily</title>
  <style>
    :root {
      --accent: {{ACCENT}};
      --ink: #1e293b;
      --muted: #64748b;
      --bg: #f1f5f9;
      --card: #ffffff;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Segoe UI", system-ui, sans-serif;
      display: grid;
      place-items: start center;
      padding: 40px 16px;
    }

    .app {
      width: min(560px, 100%);
      display: grid;
      gap: 20px;
    }

    header h1 {
      margin: 0;
      font-size: 1.9rem;
    }

    header .date {
      margin: 4px 0 0;
      color: var(--muted);
    }

    .panel {
      display: grid;
      grid-template-columns: 1fr 1fr;
      gap: 12px;
    }

    .stat {
      background: var(--card);
      border-radius: 14px;
      padding: 16px;
      border: 1px solid rgba(30, 41, 59, 0.08);
    }

    .stat .label {
      display: block;
      font-size: 0.75rem;
      text-transform: uppercase;
      letter-spacing: 0.1em;
      color: var(--muted);
    }

    .stat .value {
      display: block;
      font-size: 1.6rem;
      font-weight: 600;
      color: var(--accent);
    }

    ul.habits {
      list-style: none;
      margin: 0;
      padding: 0;
      display: grid;
      gap: 10px;
    }

    li.habit {
      background: var(--card);
      border-radius: 14px;
      border: 1px solid rgba(30, 41, 59, 0.08);
      padding: 14px 16px;
      display: flex;
      align-items: center;
      gap: 12px;
    }

    li.habit.done .title {
      text-decoration: line-through;
      color: var(--muted);
    }

    li.habit .icon {
      font-size: 1.4rem;
    }

    li.habit .title {
      flex: 1;
      font-weight: 500;
    }

    li.habit .streak {
      color: var(--muted);
      font-size: 0.9rem;
    }

    li.empty {
      background: var(--card);
      border-radius: 14px;
      padding: 20px;
      text-align: center;
      color: var(--muted);
    }

    button {
      border: none;
      border-radius: 999px;
      padding: 8px 18px;
      font-weight: 600;
      cursor: pointer;
      background: var(--accent);
      color: white;
    }

    li.habit.done button {
      background: var(--muted);
    }

    .hint {
      color: var(--muted);
      font-size: 0.85rem;
      text-align: center;
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>{{PROFILE}}</h1>
      <p class="date">{{DATE}}</p>
    </header>

    <section class="panel">
      <div class="stat">
        <span class="label">Today</span>
        <span class="value">{{DONE}} / {{TOTAL}}</span>
      </div>
      <div class="stat">
        <span class="label">30-day consistency</span>
        <span class="value">{{SCORE}}%</span>
      </div>
    </section>

    <ul class="habits">
      {{ROWS}}
    </ul>

    <p class="hint">Days roll over at local midnight. Yesterday's streak survives until today ends.</p>
  </main>
</body>
</html>
"#;
