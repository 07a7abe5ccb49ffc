use crate::backend::PortalBackend;
use crate::error::PortalError;
use crate::types::{ApiMessage, Booking, BookingPage, NewBooking};
use futures::{Stream, TryStreamExt};
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

/// Reqwest-backed implementation of the portal's meeting-room API. One
/// shared client, one blanket request timeout.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, PortalError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Maps non-2xx responses to `PortalError::Api`, preferring the
    /// `message` field of the portal's error body over the raw text.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, PortalError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiMessage>(&body)
            .map(|api| api.message)
            .unwrap_or_else(|_| {
                if body.is_empty() {
                    status.canonical_reason().unwrap_or("unknown error").to_string()
                } else {
                    body
                }
            });
        Err(PortalError::Api { status, message })
    }
}

impl PortalBackend for HttpBackend {
    async fn bookings(&self, page: u32, limit: u32) -> Result<BookingPage, PortalError> {
        debug!(page, limit, "fetching calendar page");
        let response = self
            .client
            .get(self.url("/api/meetingRoom"))
            .query(&[("page", page), ("limit", limit)])
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn create_booking(&self, booking: &NewBooking) -> Result<Booking, PortalError> {
        info!(title = %booking.title, start = %booking.start_time, "creating booking");
        let response = self
            .client
            .post(self.url("/api/meetingRoom"))
            .json(booking)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn delete_booking(&self, id: Uuid, delete_recurring: bool) -> Result<(), PortalError> {
        info!(%id, delete_recurring, "deleting booking");
        let mut request = self.client.delete(self.url(&format!("/api/meetingRoom/{id}")));
        if delete_recurring {
            request = request.query(&[("deleteRecurring", "true")]);
        }
        Self::check(request.send().await?).await?;
        Ok(())
    }

    async fn user_bookings(&self, email: &str, limit: u32) -> Result<Vec<Booking>, PortalError> {
        debug!(email, limit, "fetching user bookings");
        let response = self
            .client
            .get(self.url("/api/meetingRoom/user-bookings"))
            .query(&[("email", email)])
            .query(&[("limit", limit)])
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }
}

/// Walks `GET /api/meetingRoom` page by page until the server reports the
/// last one, yielding bookings in calendar order.
pub fn booking_stream<T: PortalBackend>(
    backend: T,
    page_size: u32,
) -> impl Stream<Item = Result<Booking, PortalError>> {
    futures::stream::try_unfold(
        (backend, 1u32, false),
        move |(backend, page, finished)| async move {
            if finished {
                return Ok::<_, PortalError>(None);
            }
            let batch = backend.bookings(page, page_size).await?;
            let finished = batch.bookings.is_empty() || batch.page >= batch.total_pages;
            let items = futures::stream::iter(batch.bookings.into_iter().map(Ok::<_, PortalError>));
            Ok(Some((items, (backend, page + 1, finished))))
        },
    )
    .try_flatten()
}
