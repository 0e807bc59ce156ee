//! Booking-slot rules for the meeting page.
//!
//! Meetings are offered Friday through Sunday at 19:00 Belgrade time.
//! Front ends embedding the crate drive their pickers off these rules; the
//! booking API itself stays permissive about the slot it relays.

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc, Weekday};
use chrono_tz::Europe::Belgrade;
use serde::Serialize;

use crate::error::SlotError;

/// IANA name of the meeting timezone, sent along with bookings.
pub const TIMEZONE: &str = "Europe/Belgrade";

/// Wall-clock hour every meeting starts at.
pub const MEETING_HOUR: u32 = 19;

/// A resolved meeting slot: the UTC instant plus its display form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeetingSlot {
    /// The slot as a UTC instant (serialized RFC 3339).
    pub iso: DateTime<Utc>,
    /// Human-readable local form, e.g. "petak, 10.01.2025. 19:00".
    pub local_label: String,
    pub timezone: &'static str,
}

/// Whether meetings are offered on this weekday.
pub fn is_allowed_day(day: Weekday) -> bool {
    matches!(day, Weekday::Fri | Weekday::Sat | Weekday::Sun)
}

/// Today's date on the meeting-timezone wall clock.
pub fn today_in_belgrade() -> NaiveDate {
    Utc::now().with_timezone(&Belgrade).date_naive()
}

/// Resolve a picked date to its meeting slot: that day at 19:00 Belgrade.
///
/// `today` is the caller's "not in the past" reference, normally
/// [`today_in_belgrade`] — passed in so the rule tests without a clock.
pub fn slot_for_date(date: NaiveDate, today: NaiveDate) -> Result<MeetingSlot, SlotError> {
    if !is_allowed_day(date.weekday()) {
        return Err(SlotError::DayNotOffered);
    }
    if date < today {
        return Err(SlotError::InPast);
    }

    let wall_clock = date
        .and_hms_opt(MEETING_HOUR, 0, 0)
        .expect("19:00 is a valid wall-clock time");
    // DST transitions happen in the small hours; 19:00 is never skipped,
    // but map an ambiguous reading to the earlier instant just in case.
    let local = Belgrade
        .from_local_datetime(&wall_clock)
        .earliest()
        .ok_or(SlotError::UnrepresentableTime)?;

    let iso = local.with_timezone(&Utc);
    Ok(MeetingSlot {
        local_label: local_label(iso),
        iso,
        timezone: TIMEZONE,
    })
}

/// Format an instant the way the site displays slots: Serbian weekday name,
/// then "dd.mm.yyyy. hh:mm" on the Belgrade wall clock.
pub fn local_label(instant: DateTime<Utc>) -> String {
    let local = instant.with_timezone(&Belgrade);
    let weekday = match local.weekday() {
        Weekday::Mon => "ponedeljak",
        Weekday::Tue => "utorak",
        Weekday::Wed => "sreda",
        Weekday::Thu => "četvrtak",
        Weekday::Fri => "petak",
        Weekday::Sat => "subota",
        Weekday::Sun => "nedelja",
    };
    format!("{weekday}, {}", local.format("%d.%m.%Y. %H:%M"))
}
