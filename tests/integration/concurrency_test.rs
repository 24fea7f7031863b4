//! Races between sessions contending for the same slots.

use bookhub::{BookingError, Money};

use crate::helpers::{TestVenue, today};

#[tokio::test]
async fn one_winner_when_sessions_race_for_a_slot() {
    let venue = TestVenue::new();
    let rid = venue.resource("Snooker");

    let mut sessions = Vec::new();
    for _ in 0..8 {
        let mut session = venue.session();
        session.start_selection(rid, today()).unwrap();
        session.toggle_slot(7).await.unwrap();
        sessions.push(session);
    }

    let mut handles = Vec::new();
    for mut session in sessions {
        handles.push(tokio::spawn(async move { session.confirm().await }));
    }

    let mut winners = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(booking) => {
                winners += 1;
                assert_eq!(booking.slot_indices, vec![7]);
            }
            Err(BookingError::Conflict { slots }) => {
                conflicts += 1;
                assert_eq!(slots, vec![7]);
            }
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }

    assert_eq!(winners, 1);
    assert_eq!(conflicts, 7);

    let bookings = venue.session().list_bookings(rid, today()).await.unwrap();
    assert_eq!(bookings.len(), 1);
}

#[tokio::test]
async fn overlapping_selections_split_the_slots() {
    let venue = TestVenue::new();
    let rid = venue.resource("Snooker");

    let mut first = venue.session();
    first.start_selection(rid, today()).unwrap();
    first.toggle_slot(1).await.unwrap();
    first.toggle_slot(2).await.unwrap();

    let mut second = venue.session();
    second.start_selection(rid, today()).unwrap();
    second.toggle_slot(2).await.unwrap();
    second.toggle_slot(3).await.unwrap();

    // First commits the overlap; second loses only slot 2.
    first.confirm().await.unwrap();

    match second.confirm().await.unwrap_err() {
        BookingError::Conflict { slots } => assert_eq!(slots, vec![2]),
        other => panic!("expected conflict, got {other:?}"),
    }
    let booking = second.confirm().await.unwrap();
    assert_eq!(booking.slot_indices, vec![3]);
    assert_eq!(booking.total, Money::from_major(50));
}

#[tokio::test]
async fn commits_on_different_days_do_not_contend() {
    let venue = TestVenue::new();
    let rid = venue.resource("Snooker");

    // Same slot index on distinct days never conflicts.
    let mut handles = Vec::new();
    for offset in 0..4i64 {
        let store = venue.store.clone();
        let date = today() + chrono::Duration::days(offset);
        handles.push(tokio::spawn(async move {
            use bookhub::AvailabilityStore;
            store.try_commit(rid, date, &[1], Money::from_major(50)).await
        }));
    }

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    for offset in 0..4i64 {
        let date = today() + chrono::Duration::days(offset);
        let bookings = venue.session().list_bookings(rid, date).await.unwrap();
        assert_eq!(bookings.len(), 1);
    }
}
