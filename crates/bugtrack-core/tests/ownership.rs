//! End-to-end ownership tests for BugTracker

use bugtrack_core::{
    default_seed, parse_seed, BugTracker, Severity, TrackerConfig, TrackerError,
};

#[test]
fn reference_scenario_balances_ledger() {
    let mut bt = BugTracker::from_config(&TrackerConfig::default()).unwrap();
    let ledger = bt.ledger();

    let crit = bt.pop_highest().unwrap();
    assert_eq!(crit.id(), "A");
    assert_eq!(crit.severity(), Severity::new(9));

    let next = bt.pop_highest().unwrap();
    assert_eq!(next.id(), "C");
    assert_eq!(next.severity(), Severity::new(5));

    crit.release();
    next.release();
    assert_eq!(ledger.outstanding(), 1);

    // Remaining bug B is released by teardown
    assert_eq!(bt.destroy(), 1);
    assert_eq!(ledger.allocated(), 3);
    assert_eq!(ledger.released(), 3);
    assert!(ledger.is_balanced());
}

#[test]
fn pops_are_non_increasing() {
    let seed = parse_seed("a:3,b:0,c:4,d:4,e:1,f:200,g:2,h:3,i:0,j:7").unwrap();
    let mut bt = BugTracker::seeded(&seed).unwrap();

    let mut prev = Severity::new(u8::MAX);
    let mut count = 0;
    while let Ok(bug) = bt.pop_highest() {
        assert!(bug.severity() <= prev, "{} popped after {}", bug, prev);
        prev = bug.severity();
        count += 1;
    }
    assert_eq!(count, seed.len());
}

#[test]
fn n_pops_then_empty() {
    let seed = default_seed();
    let mut bt = BugTracker::seeded(&seed).unwrap();

    let popped: Vec<_> = (0..seed.len()).map(|_| bt.pop_highest().unwrap()).collect();
    assert_eq!(popped.len(), 3);
    assert!(bt.is_empty());

    // The next pop never fabricates a bug
    assert_eq!(bt.pop_highest().unwrap_err(), TrackerError::Empty);
    assert_eq!(bt.pop_highest().unwrap_err(), TrackerError::Empty);
}

#[test]
fn equal_severity_is_stable() {
    let mut bt = BugTracker::new();
    bt.insert("A", Severity::CRITICAL).unwrap();
    bt.insert("B", Severity::CRITICAL).unwrap();

    assert_eq!(bt.pop_highest().unwrap().id(), "A");
    assert_eq!(bt.pop_highest().unwrap().id(), "B");
}

#[test]
fn destroy_after_k_pops_releases_rest() {
    let seed = parse_seed("a:1,b:2,c:3,d:4,e:5,f:6").unwrap();

    for k in 0..=seed.len() {
        let mut bt = BugTracker::seeded(&seed).unwrap();
        let ledger = bt.ledger();

        let held: Vec<_> = (0..k).map(|_| bt.pop_highest().unwrap()).collect();
        assert_eq!(bt.destroy(), seed.len() - k);

        // Popped bugs are still owned and readable after teardown
        assert_eq!(ledger.outstanding(), k as u64);
        for bug in &held {
            assert!(!bug.id().is_empty());
        }

        drop(held);
        assert!(ledger.is_balanced());
    }
}

#[test]
fn popped_bug_moves_across_threads() {
    let mut bt = BugTracker::seeded(&default_seed()).unwrap();
    let ledger = bt.ledger();
    let bug = bt.pop_highest().unwrap();
    drop(bt);

    let id = std::thread::spawn(move || {
        let id = bug.id().to_string();
        bug.release();
        id
    })
    .join()
    .unwrap();

    assert_eq!(id, "A");
    assert!(ledger.is_balanced());
}
