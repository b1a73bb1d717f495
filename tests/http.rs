use once_cell::sync::Lazy;
use reqwest::Client;
use serde::Deserialize;
use std::net::TcpListener;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HabitView {
    id: String,
    title: String,
    streak: u32,
    completed_today: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileView {
    id: String,
    habits: Vec<HabitView>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileSummary {
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StateView {
    profiles: Vec<ProfileSummary>,
    active_profile_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DayStat {
    date: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalyticsView {
    weekly: Vec<DayStat>,
    consistency_score: u32,
}

struct TestServer {
    base_url: String,
    data_path: PathBuf,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn unique_data_path() -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("atomic_daily_http_{}_{}.json", std::process::id(), nanos));
    path
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/state")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server() -> TestServer {
    let port = pick_free_port();
    let data_path = unique_data_path();
    let child = Command::new(env!("CARGO_BIN_EXE_atomic_daily"))
        .env("PORT", port.to_string())
        .env("APP_DATA_PATH", &data_path)
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer {
        base_url,
        data_path,
        child,
    }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server().await);
    *guard = Some(Arc::clone(&server));
    server
}

async fn add_habit(client: &Client, base_url: &str, title: &str) -> HabitView {
    let profile: ProfileView = client
        .post(format!("{base_url}/api/habits"))
        .json(&serde_json::json!({ "title": title, "icon": "💧" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    profile
        .habits
        .into_iter()
        .find(|h| h.title == title)
        .expect("habit missing from profile view")
}

#[tokio::test]
async fn http_toggle_builds_and_clears_streak() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let habit = add_habit(&client, &server.base_url, "Hydrate").await;
    assert_eq!(habit.streak, 0);
    assert!(!habit.completed_today);

    let toggled: ProfileView = client
        .post(format!("{}/api/habits/{}/toggle", server.base_url, habit.id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let toggled = toggled.habits.iter().find(|h| h.id == habit.id).unwrap();
    assert!(toggled.completed_today);
    assert_eq!(toggled.streak, 1);

    let untoggled: ProfileView = client
        .post(format!("{}/api/habits/{}/toggle", server.base_url, habit.id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let untoggled = untoggled.habits.iter().find(|h| h.id == habit.id).unwrap();
    assert!(!untoggled.completed_today);
    assert_eq!(untoggled.streak, 0);
}

#[tokio::test]
async fn http_edit_keeps_streak_and_delete_removes() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let habit = add_habit(&client, &server.base_url, "Stretch").await;
    client
        .post(format!("{}/api/habits/{}/toggle", server.base_url, habit.id))
        .send()
        .await
        .unwrap();

    let edited: ProfileView = client
        .put(format!("{}/api/habits/{}", server.base_url, habit.id))
        .json(&serde_json::json!({ "title": "Stretch 10min", "icon": "🧘" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let edited = edited.habits.iter().find(|h| h.id == habit.id).unwrap();
    assert_eq!(edited.title, "Stretch 10min");
    assert_eq!(edited.streak, 1);

    let after_delete: ProfileView = client
        .delete(format!("{}/api/habits/{}", server.base_url, habit.id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(after_delete.habits.iter().all(|h| h.id != habit.id));
}

#[tokio::test]
async fn http_rejects_blank_habit_title() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/api/habits", server.base_url))
        .json(&serde_json::json!({ "title": "   " }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn http_profile_lifecycle() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let before: StateView = client
        .get(format!("{}/api/state", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let created: StateView = client
        .post(format!("{}/api/profiles", server.base_url))
        .json(&serde_json::json!({ "name": "Work", "color": "blue" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(created.profiles.len(), before.profiles.len() + 1);
    let new_id = created.active_profile_id.clone();
    assert!(created.profiles.iter().any(|p| p.id == new_id && p.name == "Work"));
    assert_ne!(new_id, before.active_profile_id);

    let renamed: StateView = client
        .patch(format!("{}/api/profiles/{new_id}", server.base_url))
        .json(&serde_json::json!({ "name": "Deep Work" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(renamed.profiles.iter().any(|p| p.id == new_id && p.name == "Deep Work"));

    // deleting the active profile promotes a remaining one
    let after_delete: StateView = client
        .delete(format!("{}/api/profiles/{new_id}", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(after_delete.profiles.len(), before.profiles.len());
    assert!(after_delete.profiles.iter().all(|p| p.id != new_id));
    assert!(after_delete
        .profiles
        .iter()
        .any(|p| p.id == after_delete.active_profile_id));
}

#[tokio::test]
async fn http_last_profile_cannot_be_deleted() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    // whittle down to a single profile, then try to delete it too
    let mut state: StateView = client
        .get(format!("{}/api/state", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    while state.profiles.len() > 1 {
        let victim = state.profiles[0].id.clone();
        state = client
            .delete(format!("{}/api/profiles/{victim}", server.base_url))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
    }

    let last = state.profiles[0].id.clone();
    let after: StateView = client
        .delete(format!("{}/api/profiles/{last}", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(after.profiles.len(), 1);
    assert_eq!(after.profiles[0].id, last);
    assert_eq!(after.active_profile_id, last);
}

#[tokio::test]
async fn http_analytics_covers_seven_days_ending_today() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    add_habit(&client, &server.base_url, "Journal").await;

    let analytics: AnalyticsView = client
        .get(format!("{}/api/analytics", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(analytics.weekly.len(), 7);
    assert!(analytics.consistency_score <= 100);

    // oldest first, strictly increasing day keys
    let dates: Vec<&str> = analytics.weekly.iter().map(|d| d.date.as_str()).collect();
    let mut sorted = dates.clone();
    sorted.sort();
    assert_eq!(dates, sorted);
}

#[tokio::test]
async fn http_mutations_reach_the_data_file() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    add_habit(&client, &server.base_url, "Persisted habit").await;

    // saves are fire-and-forget; poll until the write lands
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(raw) = std::fs::read_to_string(&server.data_path) {
            if raw.contains("Persisted habit") {
                break;
            }
        }
        if Instant::now() > deadline {
            panic!("mutation never reached the data file");
        }
        sleep(Duration::from_millis(100)).await;
    }
}
