use crate::types::{Booking, TimeSlot};
use chrono::{DateTime, Utc};

/// Whether a candidate slot collides with one confirmed interval.
///
/// Plain interval overlap, plus two extra clauses: a candidate sharing the
/// exact start or exact end of an existing interval is always a collision,
/// even when the intervals only touch. Adjacent slots (candidate ends where
/// an existing booking starts, or vice versa) are allowed.
pub fn overlaps(candidate: &TimeSlot, existing_start: DateTime<Utc>, existing_end: DateTime<Utc>) -> bool {
    (candidate.start < existing_end && candidate.end > existing_start)
        || candidate.start == existing_start
        || candidate.end == existing_end
}

/// First confirmed booking the candidate collides with, if any.
pub fn find_conflict<'a>(candidate: &TimeSlot, bookings: &'a [Booking]) -> Option<&'a Booking> {
    bookings
        .iter()
        .find(|booking| overlaps(candidate, booking.start_time, booking.end_time))
}
