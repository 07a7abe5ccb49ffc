use crate::backend::PortalBackend;
use crate::conflict::find_conflict;
use crate::error::PortalError;
use crate::http::booking_stream;
use crate::selection::SlotSelection;
use crate::types::{Booking, NewBooking, RecurringType, TimeSlot, UserRef};
use futures::future::join_all;
use futures::TryStreamExt;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeSet;
use tracing::info;
use validator::{Validate, ValidationError};

const CALENDAR_PAGE_SIZE: u32 = 100;

lazy_static! {
    static ref EMAIL_REGEX: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
}

/// The shared fields of one booking form. Each selected slot is combined
/// with these into its own create payload on submit.
#[derive(Debug, Clone, Validate)]
#[validate(schema(function = validate_recurrence))]
pub struct BookingForm {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    pub booked_by_name: String,
    #[validate(regex(path = *EMAIL_REGEX, message = "invalid email address"))]
    pub booked_by_email: String,
    pub equipment: BTreeSet<String>,
    pub is_recurring: bool,
    pub recurring_type: Option<RecurringType>,
    pub special_requests: String,
}

fn validate_recurrence(form: &BookingForm) -> Result<(), ValidationError> {
    if form.is_recurring && form.recurring_type.is_none() {
        return Err(ValidationError::new("recurring_type_required"));
    }
    Ok(())
}

impl BookingForm {
    fn payload_for(&self, slot: &TimeSlot) -> NewBooking {
        NewBooking {
            title: self.title.clone(),
            start_time: slot.start,
            end_time: slot.end,
            booked_by: UserRef {
                name: self.booked_by_name.clone(),
                email: self.booked_by_email.clone(),
            },
            equipment: self.equipment.clone(),
            is_recurring: self.is_recurring,
            recurring_type: self.recurring_type,
            special_requests: self.special_requests.clone(),
            is_all_day: slot.all_day,
        }
    }
}

/// One in-progress booking: the confirmed calendar it was opened against,
/// the provisional slot selection, and the injected backend.
pub struct BookingSession<T: PortalBackend> {
    backend: T,
    confirmed: Vec<Booking>,
    selection: SlotSelection,
}

impl<T: PortalBackend> BookingSession<T> {
    pub fn new(backend: T) -> Self {
        Self {
            backend,
            confirmed: Vec::new(),
            selection: SlotSelection::new(),
        }
    }

    /// Pulls the whole room calendar. The conflict pre-check runs against
    /// this snapshot until the next refresh; the server stays the final
    /// authority on conflicts.
    pub async fn refresh(&mut self) -> Result<(), PortalError> {
        self.confirmed = booking_stream(self.backend.clone(), CALENDAR_PAGE_SIZE)
            .try_collect()
            .await?;
        Ok(())
    }

    pub fn confirmed(&self) -> &[Booking] {
        &self.confirmed
    }

    pub fn selection(&self) -> &SlotSelection {
        &self.selection
    }

    /// Toggles a candidate slot. Selecting runs the conflict pre-check
    /// against the confirmed calendar; deselecting skips it.
    pub fn select_slot(&mut self, slot: TimeSlot) -> Result<(), PortalError> {
        if !self.selection.contains_start(&slot) {
            if let Some(existing) = find_conflict(&slot, &self.confirmed) {
                return Err(PortalError::SlotConflict {
                    start: slot.start,
                    end: slot.end,
                    title: existing.title.clone(),
                });
            }
        }
        self.selection = self.selection.toggle(slot);
        Ok(())
    }

    /// Fans out one create request per selected slot, all issued at once,
    /// then awaits them all. There is no rollback: slots created before a
    /// later one failed stay booked on the server. The first failure in
    /// slot order is returned and the selection is kept for a retry; only a
    /// fully successful submission clears it.
    pub async fn submit(&mut self, form: &BookingForm) -> Result<Vec<Booking>, PortalError> {
        form.validate()?;
        if self.selection.is_empty() {
            return Err(PortalError::EmptySelection);
        }

        let payloads: Vec<NewBooking> = self
            .selection
            .slots()
            .iter()
            .map(|slot| form.payload_for(slot))
            .collect();

        info!(slots = payloads.len(), title = %form.title, "submitting booking");
        let results = join_all(
            payloads
                .iter()
                .map(|payload| self.backend.create_booking(payload)),
        )
        .await;

        let mut created = Vec::with_capacity(results.len());
        for result in results {
            created.push(result?);
        }

        self.selection = self.selection.clear();
        Ok(created)
    }
}
