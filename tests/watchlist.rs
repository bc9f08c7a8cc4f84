//! Watchlist Integration Tests
//!
//! Tests for persistence across handles, legacy data and concurrent writers.

use std::sync::Arc;

use flowstate::library::{
    render_watchlist, MoodFilter, Storage, TypeFilter, Watchlist, WatchlistEntry, WatchlistKind,
};
use flowstate::Mood;
use tempfile::TempDir;
use tokio_test::assert_ok;

fn open(dir: &TempDir) -> Watchlist {
    Watchlist::new(Storage::open(dir.path().join("storage.json")))
}

fn entry(id: &str, title: &str, mood: Option<Mood>) -> WatchlistEntry {
    WatchlistEntry {
        mood,
        ..WatchlistEntry::new(id, title)
    }
}

#[test]
fn test_entries_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let added = assert_ok!(open(&dir).add(
        WatchlistKind::Movies,
        entry("603", "The Matrix", Some(Mood::Energize))
    ));
    assert!(added);

    let reopened = open(&dir);
    let movies = reopened.list(WatchlistKind::Movies);
    assert_eq!(movies.len(), 1);
    assert_eq!(movies[0].title, "The Matrix");
    assert_eq!(movies[0].mood, Some(Mood::Energize));
    assert!(movies[0].added_at.is_some());
}

#[test]
fn test_website_storage_is_readable() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("storage.json"),
        r#"{
            "flowstate_movie_watchlist": [
                {"id": 27205, "title": "Inception", "rating": "8.4", "mood": "focus"},
                {"id": "13", "name": "Forrest Gump", "rating": "N/A", "mood": "unknown"}
            ],
            "flowstate_game_favorites": [
                {"id": "2048", "title": "2048", "mood": "relax"}
            ],
            "pomodoroSettings": {"pomodoro": 30}
        }"#,
    )
    .unwrap();

    let wl = open(&dir);
    let movies = wl.list(WatchlistKind::Movies);
    assert_eq!(movies[0].id, "27205");
    assert_eq!(movies[0].rating, Some(8.4));
    assert_eq!(movies[1].title, "Forrest Gump");
    assert_eq!(movies[1].rating, None);
    assert_eq!(movies[1].mood, None);

    let untagged = wl.filtered(TypeFilter::All, MoodFilter::Untagged);
    assert_eq!(untagged.len(), 1);

    let relax = wl.filtered(TypeFilter::All, MoodFilter::Mood(Mood::Relax));
    assert_eq!(relax.len(), 1);
    assert_eq!(relax[0].kind, WatchlistKind::Games);
}

#[test]
fn test_writes_keep_unrelated_keys() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("storage.json");
    std::fs::write(&path, r#"{"pomodoroSettings": {"pomodoro": 30}}"#).unwrap();

    let wl = open(&dir);
    assert_ok!(wl.add(WatchlistKind::Music, entry("1", "Says", None)));
    assert!(assert_ok!(wl.remove(WatchlistKind::Music, "1")));

    let raw: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw["pomodoroSettings"]["pomodoro"], 30);
    assert_eq!(raw["flowstate_music_favorites"], serde_json::json!([]));
}

#[test]
fn test_add_keeps_entries_it_cannot_read() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("storage.json");
    std::fs::write(
        &path,
        r#"{"flowstate_movie_watchlist": [{"id": 1, "title": "Keep Me"}, {"id": 2, "title": null}]}"#,
    )
    .unwrap();

    let wl = open(&dir);
    assert_eq!(wl.list(WatchlistKind::Movies).len(), 1);
    assert!(assert_ok!(wl.add(WatchlistKind::Movies, WatchlistEntry::new("3", "New"))));
    assert!(!assert_ok!(wl.add(WatchlistKind::Movies, WatchlistEntry::new("2", "Dup"))));

    let titles: Vec<String> = wl
        .list(WatchlistKind::Movies)
        .into_iter()
        .map(|e| e.title)
        .collect();
    assert_eq!(titles, vec!["Keep Me", "New"]);

    let raw: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw["flowstate_movie_watchlist"].as_array().unwrap().len(), 3);
    assert!(raw["flowstate_movie_watchlist"][1]["title"].is_null());
}

#[test]
fn test_concurrent_writers_do_not_lose_entries() {
    let dir = TempDir::new().unwrap();
    let path = Arc::new(dir.path().join("storage.json"));

    let handles: Vec<_> = (0..8)
        .map(|n| {
            let path = path.clone();
            std::thread::spawn(move || {
                let wl = Watchlist::new(Storage::open(path.as_path()));
                wl.add(WatchlistKind::Games, entry(&n.to_string(), "Game", None))
                    .unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(open(&dir).list(WatchlistKind::Games).len(), 8);
}

#[test]
fn test_stats_and_grid() {
    let dir = TempDir::new().unwrap();
    let wl = open(&dir);
    wl.add(WatchlistKind::Movies, entry("1", "A", None)).unwrap();
    wl.add(WatchlistKind::Games, entry("2", "B", None)).unwrap();
    wl.add(WatchlistKind::Games, entry("3", "C", None)).unwrap();

    let stats = wl.stats();
    assert_eq!((stats.movies, stats.music, stats.games), (1, 0, 2));
    assert_eq!(stats.total(), 3);

    let games = wl.filtered(TypeFilter::Only(WatchlistKind::Games), MoodFilter::All);
    let html = render_watchlist(&games);
    assert_eq!(html.matches("class=\"wl-card\"").count(), 2);
}
