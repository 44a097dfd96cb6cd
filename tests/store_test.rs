//! Persistence tests: snapshot round-trips, damaged records, failing backends.

use growbit::clock::ManualClock;
use growbit::engine::{Tracker, TrackerConfig};
use growbit::error::{Error, Result};
use growbit::model::*;
use growbit::store::{FileStore, HABITS_KEY, MemoryStore, Snapshot, Store, USER_KEY};

fn day(s: &str) -> Day {
    s.parse().expect("valid test date")
}

fn temp_dir() -> std::path::PathBuf {
    std::env::temp_dir()
        .join("growbit-test")
        .join(uuid::Uuid::new_v4().to_string())
}

/// A backend whose writes always fail.
struct BrokenStore {
    loads_fail: bool,
}

impl Store for BrokenStore {
    fn load(&self) -> Result<Snapshot> {
        if self.loads_fail {
            return Err(Error::Other("disk unplugged".to_string()));
        }
        Ok(Snapshot::default())
    }

    fn save(&mut self, _snapshot: &Snapshot) -> Result<()> {
        Err(Error::Other("disk full".to_string()))
    }
}

// ---------------------------------------------------------------------------
// Round-trips
// ---------------------------------------------------------------------------

#[test]
fn state_survives_reopen_in_memory() {
    let clock = ManualClock::new(day("2024-05-01"));
    let mut tracker = Tracker::open(MemoryStore::new(), clock.clone(), TrackerConfig::default());
    let id = tracker.add_habit(NewHabit::new("Read")).unwrap().id;
    tracker.complete_habit(&id).unwrap();
    let user_before = tracker.user().clone();
    let store = tracker.close();

    let tracker = Tracker::open(store, clock, TrackerConfig::default());
    let habit = tracker.habit(&id).unwrap();
    assert_eq!(habit.streak, 1);
    assert!(habit.completed_today);
    assert_eq!(tracker.user(), &user_before);
}

#[test]
fn records_use_plain_date_strings() {
    let clock = ManualClock::new(day("2024-05-01"));
    let mut tracker = Tracker::open(MemoryStore::new(), clock, TrackerConfig::default());
    let id = tracker.add_habit(NewHabit::new("Read")).unwrap().id;
    tracker.complete_habit(&id).unwrap();

    let raw = tracker.store().raw(HABITS_KEY).unwrap();
    let value: serde_json::Value = serde_json::from_str(raw).unwrap();
    assert_eq!(value[0]["completed_dates"], serde_json::json!(["2024-05-01"]));
    assert_eq!(value[0]["created_at"], "2024-05-01");
    assert!(tracker.store().raw(USER_KEY).is_some());
}

#[test]
fn file_store_round_trips_both_records() {
    let dir = temp_dir();
    let clock = ManualClock::new(day("2024-05-01"));

    let mut tracker = Tracker::open(FileStore::new(&dir), clock.clone(), TrackerConfig::default());
    let id = tracker.add_habit(NewHabit::new("Stretch")).unwrap().id;
    tracker.complete_habit(&id).unwrap();
    tracker.close();

    assert!(dir.join("habits.json").exists());
    assert!(dir.join("user.json").exists());
    assert!(!dir.join("habits.json.tmp").exists());

    clock.advance_days(1);
    let mut tracker = Tracker::open(FileStore::new(&dir), clock, TrackerConfig::default());
    let habit = tracker.habit(&id).unwrap();
    assert!(!habit.completed_today);
    assert_eq!(habit.streak, 1);
    assert_eq!(tracker.complete_habit(&id).unwrap().streak, 2);
    assert_eq!(tracker.user().total_habits_completed, 2);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn file_store_missing_directory_loads_empty() {
    let store = FileStore::new(temp_dir());
    assert_eq!(store.load().unwrap(), Snapshot::default());
}

// ---------------------------------------------------------------------------
// Damaged records
// ---------------------------------------------------------------------------

#[test]
fn malformed_habits_record_is_discarded() {
    let clock = ManualClock::new(day("2024-05-01"));
    let mut tracker = Tracker::open(MemoryStore::new(), clock.clone(), TrackerConfig::default());
    tracker.rename_user("Robin").unwrap();
    let mut store = tracker.close();
    store.put_raw(HABITS_KEY, "{not json");

    let tracker = Tracker::open(store, clock, TrackerConfig::default());
    assert!(tracker.habits().is_empty());
    assert_eq!(tracker.user().name, "Robin");
    assert!(tracker.is_durable());
}

#[test]
fn malformed_user_record_falls_back_to_default_profile() {
    let mut store = MemoryStore::new();
    store.put_raw(USER_KEY, r#"{"level": "high"}"#);
    store.put_raw(HABITS_KEY, "[]");

    let clock = ManualClock::new(day("2024-05-01"));
    let tracker = Tracker::open(store, clock, TrackerConfig::default());
    assert_eq!(tracker.user().level, 1);
    assert_eq!(tracker.user().badges.len(), 6);
}

#[test]
fn stale_derived_fields_are_corrected_on_load() {
    let clock = ManualClock::new(day("2024-05-03"));
    let mut tracker = Tracker::open(MemoryStore::new(), clock.clone(), TrackerConfig::default());
    tracker.add_habit(NewHabit::new("Read")).unwrap();
    let mut store = tracker.close();

    let mut habits: Vec<Habit> = serde_json::from_str(store.raw(HABITS_KEY).unwrap()).unwrap();
    habits[0].completed_dates = ["2024-05-01", "2024-05-02", "2024-05-03"]
        .iter()
        .map(|s| day(s))
        .collect();
    habits[0].streak = 9;
    habits[0].completed_today = false;
    habits[0].xp = 250;
    store.put_raw(HABITS_KEY, serde_json::to_string(&habits).unwrap());

    let tracker = Tracker::open(store, clock, TrackerConfig::default());
    let habits = tracker.habits();
    let habit = &habits[0];
    assert_eq!(habit.streak, 3);
    assert_eq!(habit.best_streak, 3);
    assert!(habit.completed_today);
    assert_eq!(tracker.user().xp, 250);
    assert_eq!((tracker.user().level, tracker.user().xp_to_next_level), (2, 50));
}

#[test]
fn non_uuid_ids_survive_reload() {
    let clock = ManualClock::new(day("2024-05-01"));
    let mut tracker = Tracker::open(MemoryStore::new(), clock.clone(), TrackerConfig::default());
    tracker.add_habit(NewHabit::new("Read")).unwrap();
    tracker.add_habit(NewHabit::new("Run")).unwrap();
    let mut store = tracker.close();

    let mut value: serde_json::Value =
        serde_json::from_str(store.raw(HABITS_KEY).unwrap()).unwrap();
    value[0]["id"] = serde_json::json!("1");
    value[1]["id"] = serde_json::json!("k3j9x2a");
    store.put_raw(HABITS_KEY, value.to_string());

    let mut tracker = Tracker::open(store, clock, TrackerConfig::default());
    assert_eq!(tracker.habits().len(), 2);
    let id = HabitId::from("k3j9x2a");
    assert_eq!(tracker.habit(&id).unwrap().name, "Run");
    assert_eq!(tracker.complete_habit(&id).unwrap().streak, 1);
}

#[test]
fn records_without_derived_fields_are_rebuilt() {
    let mut store = MemoryStore::new();
    store.put_raw(
        HABITS_KEY,
        r#"[{"id": "2", "name": "Read", "completed_dates": ["2024-04-30", "2024-05-01"], "created_at": "2024-04-20"}]"#,
    );
    store.put_raw(
        USER_KEY,
        r#"{"id": "1", "name": "Demo User", "badges": [], "friends": [], "joined_at": "2024-04-20T08:00:00.000Z"}"#,
    );

    let clock = ManualClock::new(day("2024-05-01"));
    let tracker = Tracker::open(store, clock, TrackerConfig::default());
    let habit = tracker.habit(&HabitId::from("2")).unwrap();
    assert_eq!(habit.streak, 2);
    assert_eq!(habit.best_streak, 2);
    assert!(habit.completed_today);
    assert_eq!(habit.xp, 0);
    assert_eq!(tracker.user().id, "1");
    assert_eq!(tracker.user().level, 1);
    assert_eq!(tracker.user().longest_streak, 2);
}

#[test]
fn best_streak_is_repaired_from_history() {
    let mut store = MemoryStore::new();
    store.put_raw(
        HABITS_KEY,
        r#"[{"id": "a", "name": "Run", "best_streak": 1,
             "completed_dates": ["2024-04-01", "2024-04-02", "2024-04-03", "2024-04-04", "2024-04-30"],
             "created_at": "2024-04-01"}]"#,
    );

    let clock = ManualClock::new(day("2024-05-01"));
    let tracker = Tracker::open(store, clock, TrackerConfig::default());
    let habit = tracker.habit(&HabitId::from("a")).unwrap();
    assert_eq!(habit.streak, 1);
    assert_eq!(habit.best_streak, 4);
}

// ---------------------------------------------------------------------------
// Unavailable storage
// ---------------------------------------------------------------------------

#[test]
fn failed_save_degrades_to_memory_only() {
    let clock = ManualClock::new(day("2024-05-01"));
    let mut tracker = Tracker::open(
        BrokenStore { loads_fail: false },
        clock.clone(),
        TrackerConfig::default(),
    );
    assert!(tracker.is_durable());

    let id = tracker.add_habit(NewHabit::new("Read")).unwrap().id;
    assert!(!tracker.is_durable());

    let done = tracker.complete_habit(&id).expect("works without storage");
    assert_eq!(done.streak, 1);
    clock.advance_days(1);
    assert_eq!(tracker.complete_habit(&id).unwrap().streak, 2);
}

#[test]
fn failed_load_starts_blank_in_memory() {
    let clock = ManualClock::new(day("2024-05-01"));
    let mut tracker = Tracker::open(
        BrokenStore { loads_fail: true },
        clock,
        TrackerConfig::default(),
    );
    assert!(!tracker.is_durable());
    assert!(tracker.habits().is_empty());
    assert!(tracker.add_habit(NewHabit::new("Read")).is_ok());
}

#[test]
fn failed_file_save_keeps_previous_records() {
    let dir = temp_dir();
    let clock = ManualClock::new(day("2024-05-01"));
    let mut tracker = Tracker::open(FileStore::new(&dir), clock.clone(), TrackerConfig::default());
    let id = tracker.add_habit(NewHabit::new("Read")).unwrap().id;
    tracker.close();
    let habits_before = std::fs::read_to_string(dir.join("habits.json")).unwrap();
    let user_before = std::fs::read_to_string(dir.join("user.json")).unwrap();

    // A directory where the user temp file should go makes that write fail
    std::fs::create_dir_all(dir.join("user.json.tmp")).unwrap();

    let mut tracker = Tracker::open(FileStore::new(&dir), clock, TrackerConfig::default());
    tracker.complete_habit(&id).unwrap();
    assert!(!tracker.is_durable());

    assert_eq!(std::fs::read_to_string(dir.join("habits.json")).unwrap(), habits_before);
    assert_eq!(std::fs::read_to_string(dir.join("user.json")).unwrap(), user_before);
    assert!(!dir.join("habits.json.tmp").exists());

    let _ = std::fs::remove_dir_all(&dir);
}
