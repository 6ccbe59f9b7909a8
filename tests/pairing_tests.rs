use chrono::{Duration, Utc};
use webpunch::core::calculator::pairing::pair_punches;
use webpunch::errors::AppError;
use webpunch::models::session::Pairing;

mod common;
use common::{linked, punch_in, punch_out, utc};

#[test]
fn test_linked_pair_wins_over_position() {
    // positional walking would pair in2 with out1; the links say otherwise
    let in1 = punch_in("in1", utc(2025, 6, 2, 9, 0));
    let in2 = punch_in("in2", utc(2025, 6, 2, 10, 0));
    let out1 = punch_out("out1", utc(2025, 6, 2, 12, 0));
    let in1 = linked(in1, &out1);
    let out1 = linked(out1, &in1);

    let pairings = pair_punches(&[in1, in2, out1], &Utc).unwrap();

    assert_eq!(pairings.sessions.len(), 2);
    let closed = pairings.sessions.iter().find(|s| !s.is_open()).unwrap();
    assert_eq!(closed.in_record.id.as_str(), "in1");
    assert_eq!(closed.pairing, Pairing::Linked);
    let open = pairings.sessions.iter().find(|s| s.is_open()).unwrap();
    assert_eq!(open.in_record.id.as_str(), "in2");
}

#[test]
fn test_paired_id_to_same_kind_is_ignored() {
    let a = punch_in("a", utc(2025, 6, 2, 9, 0));
    let b = punch_in("b", utc(2025, 6, 2, 10, 0));
    let a = linked(a, &b);
    let out = punch_out("out", utc(2025, 6, 2, 17, 0));

    let pairings = pair_punches(&[a, b, out], &Utc).unwrap();

    assert!(pairings.sessions.iter().all(|s| s.pairing != Pairing::Linked));
    // b takes the Out by position, a stays open
    let closed = pairings.sessions.iter().find(|s| !s.is_open()).unwrap();
    assert_eq!(closed.in_record.id.as_str(), "b");
    assert_eq!(closed.pairing, Pairing::Positional);
}

#[test]
fn test_dangling_link_falls_back_to_position() {
    let mut i = punch_in("i", utc(2025, 6, 2, 9, 0));
    i.paired_id = Some("gone".into());
    let o = punch_out("o", utc(2025, 6, 2, 17, 0));

    let pairings = pair_punches(&[i, o], &Utc).unwrap();

    assert_eq!(pairings.sessions.len(), 1);
    assert_eq!(pairings.sessions[0].pairing, Pairing::Positional);
    assert_eq!(pairings.sessions[0].duration(&utc(2025, 6, 3, 0, 0)), Duration::hours(8));
}

#[test]
fn test_linked_out_before_in_is_an_invariant_violation() {
    let i = punch_in("i", utc(2025, 6, 2, 17, 0));
    let o = punch_out("o", utc(2025, 6, 2, 9, 0));
    let i = linked(i, &o);

    let err = pair_punches(&[i, o], &Utc).unwrap_err();

    assert!(matches!(err, AppError::Invariant(_)));
}

#[test]
fn test_positional_pairs_never_produce_negative_durations() {
    // Out before any In on the day, then two sessions
    let punches = vec![
        punch_out("o0", utc(2025, 6, 2, 7, 0)),
        punch_in("i1", utc(2025, 6, 2, 8, 0)),
        punch_out("o1", utc(2025, 6, 2, 12, 0)),
        punch_in("i2", utc(2025, 6, 2, 13, 0)),
        punch_out("o2", utc(2025, 6, 2, 17, 0)),
    ];
    let now = utc(2025, 6, 3, 0, 0);

    let pairings = pair_punches(&punches, &Utc).unwrap();

    assert_eq!(pairings.sessions.len(), 2);
    assert!(pairings.sessions.iter().all(|s| s.duration(&now) >= Duration::zero()));
    let total: Duration = pairings
        .sessions
        .iter()
        .fold(Duration::zero(), |acc, s| acc + s.duration(&now));
    assert_eq!(total, Duration::hours(8));
    assert_eq!(pairings.unmatched.len(), 1);
    assert_eq!(pairings.unmatched[0].id.as_str(), "o0");
}

#[test]
fn test_extra_out_leaves_the_latest_one_unmatched() {
    let punches = vec![
        punch_in("i", utc(2025, 6, 2, 9, 0)),
        punch_out("lunch", utc(2025, 6, 2, 12, 0)),
        punch_out("evening", utc(2025, 6, 2, 17, 0)),
    ];
    let now = utc(2025, 6, 3, 0, 0);

    let pairings = pair_punches(&punches, &Utc).unwrap();

    assert_eq!(pairings.sessions.len(), 1);
    let session = &pairings.sessions[0];
    assert_eq!(session.pairing, Pairing::Positional);
    assert_eq!(session.duration(&now), Duration::hours(3));
    assert_eq!(pairings.unmatched.len(), 1);
    assert_eq!(pairings.unmatched[0].id.as_str(), "evening");
}

#[test]
fn test_positional_pairing_stays_within_a_day() {
    let punches = vec![
        punch_in("i", utc(2025, 6, 2, 22, 0)),
        punch_out("o", utc(2025, 6, 3, 2, 0)),
    ];

    let pairings = pair_punches(&punches, &Utc).unwrap();

    assert_eq!(pairings.sessions.len(), 1);
    assert!(pairings.sessions[0].is_open());
    assert_eq!(pairings.unmatched.len(), 1);
}

#[test]
fn test_linked_session_may_cross_midnight() {
    let i = punch_in("i", utc(2025, 6, 2, 22, 0));
    let o = punch_out("o", utc(2025, 6, 3, 2, 0));
    let i = linked(i, &o);
    let o = linked(o, &i);

    let pairings = pair_punches(&[i, o], &Utc).unwrap();

    assert_eq!(pairings.sessions.len(), 1);
    assert_eq!(
        pairings.sessions[0].duration(&utc(2025, 6, 4, 0, 0)),
        Duration::hours(4)
    );
    assert!(pairings.unmatched.is_empty());
}

#[test]
fn test_open_session_grows_with_now() {
    let pairings = pair_punches(&[punch_in("i", utc(2025, 6, 2, 9, 0))], &Utc).unwrap();
    let s = &pairings.sessions[0];

    assert_eq!(s.duration(&utc(2025, 6, 2, 11, 0)), Duration::hours(2));
    assert_eq!(s.duration(&utc(2025, 6, 2, 13, 0)), Duration::hours(4));
    // an In in the future has not accrued anything
    assert_eq!(s.duration(&utc(2025, 6, 2, 8, 0)), Duration::zero());
}
