//! Protocol tests for the progress hub, without sockets.

use proptest::prelude::*;
use serde_json::json;

use tutor_core::progress::{COMPLETION_MESSAGE, CONNECTED_MESSAGE, RESET_MESSAGE};
use tutor_core::{ProgressRules, ProgressUpdate};
use tutor_server::progress::{ClientEvent, ProgressHub, ServerEvent};

fn always_correct() -> ProgressRules {
    ProgressRules {
        success_probability: 1.0,
        ..ProgressRules::default()
    }
}

fn update(event: ServerEvent) -> ProgressUpdate {
    match event {
        ServerEvent::ProgressUpdate(update) => update,
        other => panic!("expected progress_update, got {:?}", other),
    }
}

fn answer() -> ClientEvent {
    ClientEvent::AnswerSubmission(json!({"answer": "42"}))
}

#[test]
fn connect_greets_and_registers() {
    let hub = ProgressHub::new(ProgressRules::default(), 3);
    let (conn, greeting) = hub.connect();
    let greeting = update(greeting);
    assert_eq!(greeting.progress, 0);
    assert_eq!(greeting.message, CONNECTED_MESSAGE);
    assert_eq!(hub.connected_users(), 1);

    let summary = hub.disconnect(conn).unwrap();
    assert_eq!(summary.progress, 0);
    assert_eq!(hub.connected_users(), 0);
}

#[test]
fn correct_answers_follow_the_streak_table() {
    let hub = ProgressHub::new(always_correct(), 3);
    let (mut conn, _) = hub.connect();

    let increments: Vec<u32> = (0..4)
        .map(|_| update(hub.handle(&mut conn, answer())).increment.unwrap())
        .collect();
    assert_eq!(increments, vec![12, 14, 16, 18]);

    let last = update(hub.handle(&mut conn, answer()));
    assert_eq!(last.increment, Some(20));
    assert_eq!(last.progress, 80);
    assert_eq!(last.streak, Some(10));
}

#[test]
fn completion_is_announced_once() {
    let hub = ProgressHub::new(always_correct(), 3);
    let (mut conn, _) = hub.connect();
    let completions = (0..12)
        .map(|_| update(hub.handle(&mut conn, answer())))
        .filter(|u| u.special_message.as_deref() == Some(COMPLETION_MESSAGE))
        .count();
    assert_eq!(completions, 1);

    let stats = hub.stats();
    assert_eq!(stats.users_at_100_percent, 1);
    assert_eq!(stats.total_answers, 12);
    assert_eq!(stats.global_accuracy, 100.0);
}

#[test]
fn reset_clears_session() {
    let hub = ProgressHub::new(always_correct(), 3);
    let (mut conn, _) = hub.connect();
    hub.handle(&mut conn, answer());

    let reset = update(hub.handle(&mut conn, ClientEvent::ResetProgress));
    assert_eq!(reset.progress, 0);
    assert_eq!(reset.message, RESET_MESSAGE);
    assert_eq!(reset.reward, None);

    let next = update(hub.handle(&mut conn, answer()));
    assert_eq!(next.increment, Some(12));
}

#[test]
fn bad_frames_yield_error_events() {
    let hub = ProgressHub::new(ProgressRules::default(), 3);
    let (mut conn, _) = hub.connect();

    assert!(matches!(
        hub.handle_frame(&mut conn, "not json"),
        ServerEvent::Error { .. }
    ));
    match hub.handle_frame(&mut conn, r#"{"event":"teleport"}"#) {
        ServerEvent::Error { message } => assert!(message.contains("teleport")),
        other => panic!("expected error, got {:?}", other),
    }
    // The session survives bad frames.
    let reply = hub.handle_frame(&mut conn, r#"{"event":"answer_submission","data":"x"}"#);
    assert_eq!(update(reply).kind, "progress_update");
}

#[test]
fn sessions_are_independent() {
    let hub = ProgressHub::new(always_correct(), 3);
    let (mut a, _) = hub.connect();
    let (b, _) = hub.connect();
    hub.handle(&mut a, answer());

    let stats = hub.stats();
    assert_eq!(stats.total_users, 2);
    assert_eq!(stats.average_progress, 6.0);

    hub.disconnect(b);
    assert_eq!(hub.stats().average_progress, 12.0);
}

#[test]
fn same_seed_replays_the_same_answers() {
    let run = || {
        let hub = ProgressHub::new(ProgressRules::default(), 99);
        let (mut conn, _) = hub.connect();
        (0..20)
            .map(|_| update(hub.handle(&mut conn, answer())).increment.unwrap())
            .collect::<Vec<_>>()
    };
    assert_eq!(run(), run());
}

proptest! {
    #[test]
    fn progress_never_exceeds_100(seed in any::<u64>(), answers in 0usize..60) {
        let hub = ProgressHub::new(ProgressRules::default(), seed);
        let rules = hub.rules().clone();
        let (mut conn, _) = hub.connect();
        for _ in 0..answers {
            let u = update(hub.handle(&mut conn, answer()));
            prop_assert!(u.progress <= 100);
            prop_assert!(u.increment.unwrap() <= rules.max_increment());
        }
    }
}
