use crate::backend::PortalBackend;
use crate::error::PortalError;
use crate::types::{Booking, BookingPage, NewBooking, UserRef};
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

pub struct MockPortalBackendInner {
    pub calls_to_bookings: AtomicU64,
    pub calls_to_create_booking: AtomicU64,
    pub calls_to_delete_booking: AtomicU64,
    pub calls_to_user_bookings: AtomicU64,
    /// 1-based create call that fails; 0 means every call succeeds.
    pub fail_create_on_call: AtomicU64,
    pub confirmed: Mutex<Vec<Booking>>,
    pub created_payloads: Mutex<Vec<NewBooking>>,
    pub deleted: Mutex<Vec<(Uuid, bool)>>,
}

#[derive(Clone)]
pub struct MockPortalBackend(pub Arc<MockPortalBackendInner>);

impl MockPortalBackend {
    pub fn new() -> Self {
        Self(Arc::new(MockPortalBackendInner {
            calls_to_bookings: AtomicU64::default(),
            calls_to_create_booking: AtomicU64::default(),
            calls_to_delete_booking: AtomicU64::default(),
            calls_to_user_bookings: AtomicU64::default(),
            fail_create_on_call: AtomicU64::default(),
            confirmed: Mutex::default(),
            created_payloads: Mutex::default(),
            deleted: Mutex::default(),
        }))
    }

    pub fn add_confirmed(&self, title: &str, start: DateTime<Utc>, end: DateTime<Utc>) {
        self.0.confirmed.lock().unwrap().push(Booking {
            id: Uuid::new_v4(),
            title: title.into(),
            start_time: start,
            end_time: end,
            booked_by: UserRef {
                name: "Ravi".into(),
                email: "ravi@example.com".into(),
            },
            equipment: BTreeSet::new(),
            is_recurring: false,
            recurring_type: None,
            special_requests: String::new(),
            is_all_day: false,
        });
    }
}

impl PortalBackend for MockPortalBackend {
    async fn bookings(&self, page: u32, _limit: u32) -> Result<BookingPage, PortalError> {
        self.0.calls_to_bookings.fetch_add(1, Ordering::SeqCst);
        Ok(BookingPage {
            bookings: self.0.confirmed.lock().unwrap().clone(),
            page,
            total_pages: 1,
        })
    }

    async fn create_booking(&self, booking: &NewBooking) -> Result<Booking, PortalError> {
        let call = self.0.calls_to_create_booking.fetch_add(1, Ordering::SeqCst) + 1;
        self.0.created_payloads.lock().unwrap().push(booking.clone());

        if self.0.fail_create_on_call.load(Ordering::SeqCst) == call {
            return Err(PortalError::Api {
                status: StatusCode::CONFLICT,
                message: "room is no longer free".into(),
            });
        }

        Ok(Booking {
            id: Uuid::new_v4(),
            title: booking.title.clone(),
            start_time: booking.start_time,
            end_time: booking.end_time,
            booked_by: booking.booked_by.clone(),
            equipment: booking.equipment.clone(),
            is_recurring: booking.is_recurring,
            recurring_type: booking.recurring_type,
            special_requests: booking.special_requests.clone(),
            is_all_day: booking.is_all_day,
        })
    }

    async fn delete_booking(&self, id: Uuid, delete_recurring: bool) -> Result<(), PortalError> {
        self.0.calls_to_delete_booking.fetch_add(1, Ordering::SeqCst);
        self.0.deleted.lock().unwrap().push((id, delete_recurring));
        Ok(())
    }

    async fn user_bookings(&self, email: &str, limit: u32) -> Result<Vec<Booking>, PortalError> {
        self.0.calls_to_user_bookings.fetch_add(1, Ordering::SeqCst);
        let bookings = self
            .0
            .confirmed
            .lock()
            .unwrap()
            .iter()
            .filter(|booking| booking.booked_by.email == email)
            .take(limit as usize)
            .cloned()
            .collect();
        Ok(bookings)
    }
}
