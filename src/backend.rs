use crate::error::PortalError;
use crate::types::{Booking, BookingPage, NewBooking};
use uuid::Uuid;

/// The portal's meeting-room REST surface, seen from the client side.
/// Implemented over HTTP in production and by the counting mock in tests.
pub trait PortalBackend: Clone + Send + Sync + 'static {
    /// One page of the room calendar.
    async fn bookings(&self, page: u32, limit: u32) -> Result<BookingPage, PortalError>;

    /// Create a single booking; the server assigns the id and expands
    /// recurring bookings into their instances.
    async fn create_booking(&self, booking: &NewBooking) -> Result<Booking, PortalError>;

    /// Delete one booking, or the whole recurring series it belongs to.
    async fn delete_booking(&self, id: Uuid, delete_recurring: bool) -> Result<(), PortalError>;

    /// Bookings owned by one user, newest first.
    async fn user_bookings(&self, email: &str, limit: u32) -> Result<Vec<Booking>, PortalError>;
}
