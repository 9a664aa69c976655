//! Integration tests for the questa-store crate over real files.

use std::fs;

use questa_config::StreakConfig;
use questa_protocol::{Difficulty, Priority, TaskStatus, TaskUpdate};
use questa_store::{
    Gateway, JsonFileGateway, PersistenceError, StoreError, TaskStore, streak,
};
use tempfile::TempDir;

fn open_store(dir: &TempDir) -> TaskStore<JsonFileGateway> {
    let gateway = JsonFileGateway::new(dir.path()).expect("gateway");
    TaskStore::open(gateway).expect("open store")
}

#[test]
fn fix_bug_lifecycle_survives_restart() {
    let dir = TempDir::new().unwrap();

    let id = {
        let mut store = open_store(&dir);
        let task = store
            .create("Fix bug", Difficulty::Medium, Priority::High, None)
            .unwrap();
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.xp_reward, 30);

        let done = store.complete(task.id).unwrap();
        assert_eq!(done.xp_awarded, 30);
        task.id
    };

    let mut store = open_store(&dir);
    assert!(store.recovered().is_empty());
    assert_eq!(store.get_task(id).unwrap().status, TaskStatus::Completed);
    assert_eq!(store.player().total_xp(), 30);
    assert_eq!(store.player().tasks_completed(), 1);

    assert!(matches!(store.complete(id), Err(StoreError::State { .. })));
    assert_eq!(store.player().total_xp(), 30);

    assert!(store.delete(id).unwrap());
    drop(store);

    let store = open_store(&dir);
    assert!(store.get(None).is_empty());
    assert_eq!(store.player().total_xp(), 30);
    assert_eq!(store.player().tasks_completed(), 1);
}

#[test]
fn completed_task_stays_completed() {
    let dir = TempDir::new().unwrap();
    let mut store = open_store(&dir);
    let task = store
        .create("Ship", Difficulty::Easy, Priority::Low, None)
        .unwrap();
    store.complete(task.id).unwrap();

    let update = TaskUpdate::from_fields([("status", "pending")]).unwrap();
    assert!(matches!(
        store.update(task.id, &update),
        Err(StoreError::State { .. })
    ));

    let store = open_store(&dir);
    assert_eq!(store.get_task(task.id).unwrap().status, TaskStatus::Completed);
}

#[test]
fn corrupt_tasks_file_is_recovered_on_open() {
    let dir = TempDir::new().unwrap();
    {
        let mut store = open_store(&dir);
        store
            .create("Lost", Difficulty::Easy, Priority::Low, None)
            .unwrap();
    }
    fs::write(dir.path().join("tasks.json"), "{\"tasks\": 42}").unwrap();

    let store = open_store(&dir);
    assert!(store.get(None).is_empty());
    assert_eq!(store.recovered().len(), 1);

    let PersistenceError::Corrupt { moved_to, .. } = &store.recovered()[0] else {
        panic!("expected a corruption report");
    };
    assert_eq!(fs::read_to_string(moved_to).unwrap(), "{\"tasks\": 42}");

    // The replacement file opens cleanly
    drop(store);
    assert!(open_store(&dir).recovered().is_empty());
}

#[test]
fn undecodable_player_file_does_not_stop_open() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("player.json"), [0xff, 0xfe, b'{', 0x80]).unwrap();

    let mut store = open_store(&dir);
    assert_eq!(store.recovered().len(), 1);
    assert_eq!(store.player().total_xp(), 0);

    let task = store
        .create("Carry on", Difficulty::Easy, Priority::Low, None)
        .unwrap();
    store.complete(task.id).unwrap();
    assert_eq!(store.player().total_xp(), 15);
}

#[test]
fn backup_before_delete() {
    let dir = TempDir::new().unwrap();
    let mut store = open_store(&dir);
    let task = store
        .create("Archive me", Difficulty::Hard, Priority::Critical, None)
        .unwrap();
    store.complete(task.id).unwrap();

    let safety = store.deletion_safety(task.id).unwrap();
    assert!(!safety.is_safe());

    let backup = store.backup().unwrap().expect("backup dir");
    store.delete(task.id).unwrap();

    let saved = fs::read_to_string(backup.join("tasks.json")).unwrap();
    assert!(saved.contains(&task.id.to_string()));
    assert!(store.get(None).is_empty());
}

#[test]
fn configured_streak_policy_applies() {
    let dir = TempDir::new().unwrap();
    let mut store =
        open_store(&dir).with_streak_policy(streak::policy_for(&StreakConfig::CalendarDay));

    for title in ["one", "two", "three"] {
        let task = store
            .create(title, Difficulty::Easy, Priority::Low, None)
            .unwrap();
        store.complete(task.id).unwrap();
    }

    // All three completions fall on the same UTC day
    assert_eq!(store.player().current_streak(), 1);
    assert_eq!(store.player().total_xp(), 45);
}

#[test]
fn files_carry_version_and_timestamp() {
    let dir = TempDir::new().unwrap();
    let mut store = open_store(&dir);
    store
        .create("Quest", Difficulty::Easy, Priority::Low, None)
        .unwrap();

    for name in ["tasks.json", "player.json"] {
        let content = fs::read_to_string(dir.path().join(name)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["version"], "1.0", "{name}");
        assert!(value["last_modified"].is_string(), "{name}");
    }
    assert!(!dir.path().join("tasks.json.tmp").exists());
}

#[test]
fn gateway_round_trip_through_store() {
    let dir = TempDir::new().unwrap();
    let mut store = open_store(&dir);
    for (title, difficulty) in [
        ("a", Difficulty::Easy),
        ("b", Difficulty::Medium),
        ("c", Difficulty::Hard),
    ] {
        store
            .create(title, difficulty, Priority::Medium, Some(format!("notes for {title}")))
            .unwrap();
    }
    let first = store.get(None)[0].id;
    store.set_status(first, TaskStatus::Blocked).unwrap();

    let reloaded = store.gateway().load_tasks().unwrap();
    assert!(!reloaded.was_recovered());
    let expected: Vec<_> = store.get(None);
    let mut actual: Vec<_> = reloaded.value.into_values().collect();
    actual.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    assert_eq!(actual, expected);
}
