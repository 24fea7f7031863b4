//! End-to-end booking flow tests.

use bookhub::{AvailabilityStore, BookingError, Money, ReservationState};

use crate::helpers::{TestVenue, today};

#[tokio::test]
async fn snooker_hour_costs_the_hourly_rate() {
    let venue = TestVenue::new();
    let rid = venue.resource("Snooker");
    let mut session = venue.session();

    let listed = session.list_slots(rid, today()).await.unwrap();
    assert_eq!(listed.len(), 26);
    assert!(listed.iter().all(|s| s.available));
    assert_eq!(listed[0].slot.label_12h(), "9:00 AM");
    assert_eq!(listed[25].slot.range_label(), "9:30 PM - 10:00 PM");

    session.start_selection(rid, today()).unwrap();
    session.toggle_slot(1).await.unwrap();
    session.toggle_slot(2).await.unwrap();

    // Two half-hour slots at 100 per hour.
    assert_eq!(session.price_selection().unwrap(), Money::from_major(100));

    let booking = session.confirm().await.unwrap();
    assert_eq!(booking.slot_indices, vec![1, 2]);
    assert_eq!(booking.total, Money::from_major(100));
    assert_eq!(booking.duration_minutes(30), 60);
    assert_eq!(session.state(), ReservationState::Confirmed);
}

#[tokio::test]
async fn foosball_uses_its_own_rate() {
    let venue = TestVenue::new();
    let rid = venue.resource("Foosball");
    let mut session = venue.session();

    session.start_selection(rid, today()).unwrap();
    session.toggle_slot(5).await.unwrap();

    assert_eq!(session.price_selection().unwrap(), Money::from_minor(4000));
}

#[tokio::test]
async fn committed_slots_disappear_from_listings() {
    let venue = TestVenue::new();
    let rid = venue.resource("Snooker");

    let mut first = venue.session();
    first.start_selection(rid, today()).unwrap();
    first.toggle_slot(1).await.unwrap();
    first.toggle_slot(2).await.unwrap();
    first.confirm().await.unwrap();

    let second = venue.session();
    let listed = second.list_slots(rid, today()).await.unwrap();
    assert!(!listed[0].available);
    assert!(!listed[1].available);
    assert!(listed[2].available);
}

#[tokio::test]
async fn selecting_a_taken_slot_is_rejected() {
    let venue = TestVenue::new();
    let rid = venue.resource("Snooker");

    let mut first = venue.session();
    first.start_selection(rid, today()).unwrap();
    first.toggle_slot(1).await.unwrap();
    first.confirm().await.unwrap();

    let mut second = venue.session();
    second.start_selection(rid, today()).unwrap();
    let err = second.toggle_slot(1).await.unwrap_err();
    assert!(matches!(err, BookingError::SlotUnavailable { index: 1 }));
}

#[tokio::test]
async fn stale_selection_conflicts_name_the_lost_slots() {
    let venue = TestVenue::new();
    let rid = venue.resource("Snooker");

    let mut session = venue.session();
    session.start_selection(rid, today()).unwrap();
    session.toggle_slot(1).await.unwrap();
    session.toggle_slot(2).await.unwrap();

    // Another party commits slot 1 before this session confirms.
    venue
        .store
        .try_commit(rid, today(), &[1], Money::from_major(50))
        .await
        .unwrap();

    match session.confirm().await.unwrap_err() {
        BookingError::Conflict { slots } => assert_eq!(slots, vec![1]),
        other => panic!("expected conflict, got {other:?}"),
    }

    // The surviving slot can still be booked.
    assert_eq!(session.state(), ReservationState::SlotsChosen);
    let booking = session.confirm().await.unwrap();
    assert_eq!(booking.slot_indices, vec![2]);
}

#[tokio::test]
async fn cancel_releases_the_slots() {
    let venue = TestVenue::new();
    let rid = venue.resource("PS5 Gaming");

    let mut session = venue.session();
    session.start_selection(rid, today()).unwrap();
    session.toggle_slot(10).await.unwrap();
    let booking = session.confirm().await.unwrap();

    let lookup = venue.session();
    assert_eq!(lookup.get_booking(booking.id).await.unwrap().id, booking.id);

    lookup.cancel_booking(booking.id).await.unwrap();
    assert!(matches!(
        lookup.get_booking(booking.id).await.unwrap_err(),
        BookingError::NotFound { .. }
    ));

    let listed = lookup.list_slots(rid, today()).await.unwrap();
    assert!(listed[9].available);
}

#[tokio::test]
async fn bookings_do_not_leak_across_resources() {
    let venue = TestVenue::new();
    let snooker = venue.resource("Snooker");
    let pool = venue.resource("Pool/8-Ball");

    let mut session = venue.session();
    session.start_selection(snooker, today()).unwrap();
    session.toggle_slot(1).await.unwrap();
    session.confirm().await.unwrap();

    let listed = venue.session().list_slots(pool, today()).await.unwrap();
    assert!(listed[0].available);
}

#[tokio::test]
async fn confirm_with_nothing_selected_is_rejected() {
    let venue = TestVenue::new();
    let rid = venue.resource("Snooker");

    let mut session = venue.session();
    session.start_selection(rid, today()).unwrap();
    assert!(matches!(
        session.confirm().await.unwrap_err(),
        BookingError::EmptySelection
    ));
}

#[tokio::test]
async fn aborted_session_keeps_nothing() {
    let venue = TestVenue::new();
    let rid = venue.resource("Snooker");

    let mut session = venue.session();
    session.start_selection(rid, today()).unwrap();
    session.toggle_slot(3).await.unwrap();
    session.abort().unwrap();

    let listed = venue.session().list_slots(rid, today()).await.unwrap();
    assert!(listed[2].available);
    assert_eq!(
        venue.session().list_bookings(rid, today()).await.unwrap().len(),
        0
    );
}
