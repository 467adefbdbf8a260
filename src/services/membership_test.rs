use tokio::time::{Duration, timeout};

use super::*;

fn conn() -> (ConnId, mpsc::Sender<ServerEvent>, mpsc::Receiver<ServerEvent>) {
    let (tx, rx) = mpsc::channel(8);
    (Uuid::new_v4(), tx, rx)
}

async fn recv(rx: &mut mpsc::Receiver<ServerEvent>) -> ServerEvent {
    timeout(Duration::from_millis(500), rx.recv())
        .await
        .expect("broadcast receive timed out")
        .expect("broadcast channel closed unexpectedly")
}

fn assert_nothing_queued(rx: &mut mpsc::Receiver<ServerEvent>) {
    assert!(rx.try_recv().is_err(), "expected no queued event");
}

#[test]
fn join_records_both_directions() {
    let mut members = Membership::new();
    let (a, tx, _rx) = conn();

    assert_eq!(members.join(a, "b1", tx), None);

    assert_eq!(members.board_of(a), Some("b1"));
    assert_eq!(members.member_count("b1"), 1);
}

#[test]
fn rejoin_moves_connection_to_new_board() {
    let mut members = Membership::new();
    let (a, tx, _rx) = conn();
    members.join(a, "b1", tx.clone());

    assert_eq!(members.join(a, "b2", tx).as_deref(), Some("b1"));

    assert_eq!(members.board_of(a), Some("b2"));
    assert_eq!(members.member_count("b1"), 0);
    assert_eq!(members.member_count("b2"), 1);
}

#[test]
fn leave_is_idempotent() {
    let mut members = Membership::new();
    let (a, tx, _rx) = conn();
    members.join(a, "b1", tx);

    assert_eq!(members.leave(a).as_deref(), Some("b1"));
    assert_eq!(members.leave(a), None);
    assert_eq!(members.board_of(a), None);
}

#[tokio::test]
async fn broadcast_excludes_sender() {
    let mut members = Membership::new();
    let (a, a_tx, mut a_rx) = conn();
    let (b, b_tx, mut b_rx) = conn();
    members.join(a, "b1", a_tx);
    members.join(b, "b1", b_tx);

    let sent = members.broadcast("b1", &ServerEvent::ObjectRemoved("o1".into()), Some(a));

    assert_eq!(sent, 1);
    assert_eq!(recv(&mut b_rx).await, ServerEvent::ObjectRemoved("o1".into()));
    assert_nothing_queued(&mut a_rx);
}

#[tokio::test]
async fn broadcast_without_exclusion_reaches_everyone() {
    let mut members = Membership::new();
    let (a, a_tx, mut a_rx) = conn();
    let (b, b_tx, mut b_rx) = conn();
    members.join(a, "b1", a_tx);
    members.join(b, "b1", b_tx);

    assert_eq!(members.broadcast("b1", &ServerEvent::BoardCleared, None), 2);
    assert_eq!(recv(&mut a_rx).await, ServerEvent::BoardCleared);
    assert_eq!(recv(&mut b_rx).await, ServerEvent::BoardCleared);
}

#[tokio::test]
async fn broadcast_stays_inside_the_board() {
    let mut members = Membership::new();
    let (a, a_tx, _a_rx) = conn();
    let (c, c_tx, mut c_rx) = conn();
    members.join(a, "b1", a_tx);
    members.join(c, "other", c_tx);

    members.broadcast("b1", &ServerEvent::BoardCleared, None);

    assert_nothing_queued(&mut c_rx);
    assert_eq!(members.broadcast("nobody-here", &ServerEvent::BoardCleared, None), 0);
}

#[test]
fn full_queue_drops_instead_of_blocking() {
    let mut members = Membership::new();
    let (tx, mut rx) = mpsc::channel(1);
    let a = Uuid::new_v4();
    members.join(a, "b1", tx);

    assert_eq!(members.broadcast("b1", &ServerEvent::BoardCleared, None), 1);
    assert_eq!(members.broadcast("b1", &ServerEvent::ObjectRemoved("x".into()), None), 0);

    assert_eq!(rx.try_recv().ok(), Some(ServerEvent::BoardCleared));
    assert!(rx.try_recv().is_err());
}

#[test]
fn closed_receiver_is_skipped() {
    let mut members = Membership::new();
    let (a, tx, rx) = conn();
    members.join(a, "b1", tx);
    drop(rx);

    assert_eq!(members.broadcast("b1", &ServerEvent::BoardCleared, None), 0);
}
