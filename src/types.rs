use crate::error::PortalError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// One candidate or confirmed interval on the room calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub all_day: bool,
}

impl TimeSlot {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>, all_day: bool) -> Result<Self, PortalError> {
        if start >= end {
            return Err(PortalError::InvalidInterval { start, end });
        }
        Ok(Self { start, end, all_day })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRef {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurringType {
    Weekly,
    Fortnightly,
}

impl std::str::FromStr for RecurringType {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "weekly" => Ok(Self::Weekly),
            "fortnightly" => Ok(Self::Fortnightly),
            other => Err(format!(
                "unknown recurrence \"{other}\", expected weekly or fortnightly"
            )),
        }
    }
}

/// A confirmed reservation as the portal returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub booked_by: UserRef,
    #[serde(default)]
    pub equipment: BTreeSet<String>,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring_type: Option<RecurringType>,
    #[serde(default)]
    pub special_requests: String,
    #[serde(default)]
    pub is_all_day: bool,
}

/// Create payload; the server assigns the id. Recurring bookings are expanded
/// server-side from the flags below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBooking {
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub booked_by: UserRef,
    pub equipment: BTreeSet<String>,
    pub is_recurring: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurring_type: Option<RecurringType>,
    pub special_requests: String,
    pub is_all_day: bool,
}

/// One page of `GET /api/meetingRoom`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingPage {
    pub bookings: Vec<Booking>,
    pub page: u32,
    pub total_pages: u32,
}

/// Body the portal sends alongside non-2xx statuses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiMessage {
    pub message: String,
}
