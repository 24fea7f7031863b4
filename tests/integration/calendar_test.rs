//! Calendar and date-eligibility tests through the service surface.

use chrono::{Datelike, Duration};

use bookhub::{BookingError, CalendarCell};

use crate::helpers::{TestVenue, today};

#[tokio::test]
async fn current_month_grid_marks_past_days_unbookable() {
    let venue = TestVenue::new();
    let rid = venue.resource("Snooker");
    let session = venue.session();

    let now = today();
    let cells = session
        .list_calendar(rid, now.year(), now.month())
        .unwrap();

    let mut saw_today = false;
    for cell in &cells {
        let Some(day) = cell.day() else { continue };
        if day.date < now {
            assert!(!day.is_bookable, "{} is past and must not be bookable", day.date);
        }
        if day.date == now {
            saw_today = true;
            assert!(day.is_bookable, "today must be bookable");
        }
    }
    assert!(saw_today);
}

#[tokio::test]
async fn grid_leads_with_placeholders_up_to_the_weekday() {
    let venue = TestVenue::new();
    let rid = venue.resource("Snooker");
    let session = venue.session();

    let now = today();
    let cells = session
        .list_calendar(rid, now.year(), now.month())
        .unwrap();

    let first = now.with_day(1).unwrap();
    let leading = cells
        .iter()
        .take_while(|c| matches!(c, CalendarCell::Leading))
        .count();
    assert_eq!(leading as u32, first.weekday().num_days_from_sunday());

    // Leading cells are followed by every day of the month in order.
    let days: Vec<_> = cells.iter().filter_map(|c| c.day()).collect();
    assert_eq!(days[0].date, first);
    assert_eq!(days.len(), days.last().unwrap().date.day() as usize);
}

#[tokio::test]
async fn months_past_the_horizon_are_unbookable() {
    let venue = TestVenue::new();
    let rid = venue.resource("Snooker");
    let session = venue.session();

    // Default horizon is the current month only.
    let far = today() + Duration::days(70);
    let cells = session.list_calendar(rid, far.year(), far.month()).unwrap();
    assert!(cells.iter().filter_map(|c| c.day()).all(|d| !d.is_bookable));
}

#[tokio::test]
async fn past_dates_cannot_start_a_selection() {
    let venue = TestVenue::new();
    let rid = venue.resource("Snooker");
    let mut session = venue.session();

    let yesterday = today() - Duration::days(1);
    let err = session.start_selection(rid, yesterday).unwrap_err();
    assert!(matches!(err, BookingError::InvalidDate { .. }));
}
