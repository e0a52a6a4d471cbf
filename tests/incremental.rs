// tests/incremental.rs
//
// Collector behaviour against a real file and a scripted fetch function.
//
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::time::Duration;

use stats_pull::collect::{Collector, missing_games};
use stats_pull::config::DelayRange;
use stats_pull::core::GameId;
use stats_pull::error::{ErrorKind, SourceError};
use stats_pull::progress::NullProgress;
use stats_pull::retry::{Pause, RetryPolicy};
use stats_pull::store::{DataSet, load_completed_ids, load_dataset};

#[derive(Default)]
struct RecordingPause(RefCell<Vec<Duration>>);

impl Pause for RecordingPause {
    fn pause(&self, d: Duration) {
        self.0.borrow_mut().push(d);
    }
}

fn games(raw: &[&str]) -> Vec<GameId> {
    raw.iter().map(|s| GameId::new(s)).collect()
}

/// Two player rows per game.
fn box_rows(game: &GameId) -> DataSet {
    DataSet::new(
        vec!["PLAYER".into(), "PTS".into()],
        vec![
            vec![format!("p1-{game}"), "10".into()],
            vec![format!("p2-{game}"), "20".into()],
        ],
    )
}

fn rows_for(path: &Path, game: &str) -> usize {
    let ds = load_dataset(path).unwrap().unwrap();
    let ix = ds.column("game_id").unwrap();
    ds.rows.iter().filter(|r| r[ix] == GameId::new(game).as_str()).count()
}

#[test]
fn first_run_fetches_all_second_run_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("player_boxscores.csv");
    let retry = RetryPolicy::immediate(5);
    let pause = RecordingPause::default();
    let collector = Collector::new(&retry, DelayRange::ZERO, &pause);
    let all = games(&["1", "22", "333"]);

    let calls = RefCell::new(Vec::new());
    let fetch = |g: &GameId| {
        calls.borrow_mut().push(g.clone());
        Ok(box_rows(g))
    };
    let first = collector.run("Player BS", &all, &path, fetch, &mut NullProgress).unwrap();
    assert_eq!(first.missing, 3);
    assert_eq!(first.appended, 3);
    assert_eq!(first.rows_written, 6);
    assert_eq!(*calls.borrow(), all);

    for g in ["0000000001", "0000000022", "0000000333"] {
        assert_eq!(rows_for(&path, g), 2, "{g}");
    }
    let text = fs::read_to_string(&path).unwrap();
    assert_eq!(text.matches("game_id,PLAYER,PTS").count(), 1, "header written once");
    // Pause between games, not before the first or after the last.
    assert_eq!(pause.0.borrow().len(), 2);

    let before = fs::read_to_string(&path).unwrap();
    let second = collector
        .run("Player BS", &all, &path, |_: &GameId| -> Result<DataSet, SourceError> {
            panic!("nothing should be fetched on a complete dataset")
        }, &mut NullProgress)
        .unwrap();
    assert_eq!(second.missing, 0);
    assert_eq!(second.appended, 0);
    assert_eq!(fs::read_to_string(&path).unwrap(), before);
}

#[test]
fn exhausted_game_is_skipped_and_retried_next_run() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("team_boxscores.csv");
    let retry = RetryPolicy::immediate(5);
    let pause = RecordingPause::default();
    let collector = Collector::new(&retry, DelayRange::ZERO, &pause);
    let all = games(&["1", "2", "3"]);

    let attempts: RefCell<HashMap<GameId, u32>> = RefCell::new(HashMap::new());
    let flaky = |g: &GameId| {
        *attempts.borrow_mut().entry(g.clone()).or_default() += 1;
        if *g == GameId::new("2") {
            Err(SourceError::Other("502 bad gateway".into()))
        } else {
            Ok(box_rows(g))
        }
    };
    let first = collector.run("Team BS", &all, &path, flaky, &mut NullProgress).unwrap();
    assert_eq!(first.failed, games(&["2"]));
    assert_eq!(first.appended, 2);
    assert_eq!(attempts.borrow()[&GameId::new("2")], 5);
    assert_eq!(rows_for(&path, "2"), 0, "no partial rows for a failed game");

    assert_eq!(missing_games(&all, &path).unwrap(), games(&["2"]));

    let second = collector
        .run("Team BS", &all, &path, |g: &GameId| Ok(box_rows(g)), &mut NullProgress)
        .unwrap();
    assert_eq!(second.missing, 1);
    assert!(second.failed.is_empty());
    assert_eq!(rows_for(&path, "2"), 2);
    assert!(missing_games(&all, &path).unwrap().is_empty());
}

#[test]
fn resume_computes_exact_difference_for_any_prior_subset() {
    let all = games(&["5", "1", "4", "2", "3"]);
    let subsets: [&[&str]; 4] = [&[], &["3", "1"], &["4", "5", "2"], &["1", "2", "3", "4", "5"]];

    for subset in subsets {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("d.csv");
        let mut text = String::from("PLAYER,game_id\n");
        for g in subset {
            // stored without padding on purpose
            text.push_str(&format!("x,{g}\n"));
        }
        fs::write(&path, text).unwrap();

        let done: HashSet<GameId> = games(subset).into_iter().collect();
        let expected: Vec<GameId> = all.iter().filter(|g| !done.contains(g)).cloned().collect();
        assert_eq!(missing_games(&all, &path).unwrap(), expected, "subset {subset:?}");
    }
}

#[test]
fn interrupted_run_keeps_finished_games_byte_for_byte() {
    let all = games(&["10", "20", "30", "40"]);
    // Third game's first row cut before, inside and after its id cell.
    let cases: [(&str, Option<&str>); 4] = [
        ("", None),
        ("0000000", None),
        ("0000000030", None),
        ("0000000030,p1-00", Some("30")),
    ];

    for (torn, repaired) in cases {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("p.csv");
        let retry = RetryPolicy::immediate(2);
        let pause = RecordingPause::default();
        let collector = Collector::new(&retry, DelayRange::ZERO, &pause);

        // First run "dies" after two games: simulate by only offering the first two.
        collector.run("P", &all[..2], &path, |g: &GameId| Ok(box_rows(g)), &mut NullProgress).unwrap();
        let finished = fs::read_to_string(&path).unwrap();
        assert!(finished.starts_with("game_id,PLAYER,PTS\n"));
        fs::write(&path, format!("{finished}{torn}")).unwrap();

        let fetched = RefCell::new(Vec::new());
        let resumed = collector
            .run("P", &all, &path, |g: &GameId| {
                fetched.borrow_mut().push(g.clone());
                Ok(box_rows(g))
            }, &mut NullProgress)
            .unwrap();
        assert_eq!(resumed.repaired, repaired.map(GameId::new), "{torn:?}");
        assert_eq!(*fetched.borrow(), games(&["30", "40"]), "{torn:?}");

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with(&finished), "finished games rewritten for {torn:?}");
        for g in ["10", "20", "30", "40"] {
            assert_eq!(rows_for(&path, g), 2, "{g} after {torn:?}");
        }
        assert_eq!(load_completed_ids(&path, "game_id").unwrap().len(), 4);
    }
}

#[test]
fn torn_row_in_older_id_last_layout_keeps_finished_games() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("p.csv");
    let finished = "PLAYER,PTS,game_id\na,1,0000000001\nb,2,0000000002\nc,3,0000000002\n";
    fs::write(&path, format!("{finished}d,4")).unwrap();
    let retry = RetryPolicy::immediate(1);
    let pause = RecordingPause::default();
    let collector = Collector::new(&retry, DelayRange::ZERO, &pause);

    let fetched = RefCell::new(Vec::new());
    let s = collector
        .run("P", &games(&["1", "2", "3"]), &path, |g: &GameId| {
            fetched.borrow_mut().push(g.clone());
            Ok(box_rows(g))
        }, &mut NullProgress)
        .unwrap();
    assert_eq!(s.repaired, None);
    assert_eq!(*fetched.borrow(), games(&["3"]));
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        format!("{finished}p1-0000000003,10,0000000003\np2-0000000003,20,0000000003\n")
    );
}

#[test]
fn empty_result_writes_nothing_and_stays_missing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("p.csv");
    let retry = RetryPolicy::immediate(1);
    let pause = RecordingPause::default();
    let collector = Collector::new(&retry, DelayRange::ZERO, &pause);
    let all = games(&["7"]);

    let s = collector
        .run("P", &all, &path, |_: &GameId| Ok(DataSet::new(vec!["PLAYER".into()], vec![])), &mut NullProgress)
        .unwrap();
    assert_eq!(s.empty, all);
    assert!(!path.exists());
    assert_eq!(missing_games(&all, &path).unwrap(), all);
}

#[test]
fn new_columns_are_aligned_to_existing_header() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("p.csv");
    fs::write(&path, "PTS,PLAYER,game_id\n3,old,0000000001\n").unwrap();
    let retry = RetryPolicy::immediate(1);
    let pause = RecordingPause::default();
    let collector = Collector::new(&retry, DelayRange::ZERO, &pause);

    collector
        .run("P", &games(&["1", "2"]), &path, |g: &GameId| Ok(box_rows(g)), &mut NullProgress)
        .unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert_eq!(
        text,
        "PTS,PLAYER,game_id\n3,old,0000000001\n10,p1-0000000002,0000000002\n20,p2-0000000002,0000000002\n"
    );
}

#[test]
fn malformed_dataset_aborts_before_any_fetch() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("p.csv");
    fs::write(&path, "PLAYER,PTS\na,1\n").unwrap();
    let retry = RetryPolicy::immediate(1);
    let pause = RecordingPause::default();
    let collector = Collector::new(&retry, DelayRange::ZERO, &pause);

    let err = collector
        .run("P", &games(&["1"]), &path, |_: &GameId| -> Result<DataSet, SourceError> {
            panic!("must not fetch")
        }, &mut NullProgress)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedDataset);
}

#[test]
fn existing_game_id_column_is_overwritten_with_canonical_id() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("p.csv");
    let retry = RetryPolicy::immediate(1);
    let pause = RecordingPause::default();
    let collector = Collector::new(&retry, DelayRange::ZERO, &pause);

    collector
        .run("P", &games(&["22400061"]), &path, |_: &GameId| {
            Ok(DataSet::new(vec!["game_id".into(), "PTS".into()], vec![vec!["22400061".into(), "9".into()]]))
        }, &mut NullProgress)
        .unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "game_id,PTS\n0022400061,9\n");
}
