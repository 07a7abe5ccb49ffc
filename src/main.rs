use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use crate::backend::PortalBackend;
use crate::configuration::Configuration;
use crate::configuration_handler::ConfigurationHandler;
use crate::error::PortalError;
use crate::http::{booking_stream, HttpBackend};
use crate::session::{BookingForm, BookingSession};
use crate::types::{RecurringType, TimeSlot};

mod backend;
mod configuration;
mod configuration_handler;
mod conflict;
mod error;
mod http;
mod selection;
mod session;
#[cfg(test)]
mod testutils;
mod types;

#[derive(Parser)]
#[command(
    name = "meeting-room",
    about = "Meeting-room booking client for the office-services portal"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the room calendar
    List {
        /// Page size used while walking the calendar
        #[arg(long, default_value_t = 50)]
        page_size: u32,
    },
    /// Print bookings owned by one user
    UserBookings {
        /// Defaults to PORTAL_USER_EMAIL
        #[arg(long)]
        email: Option<String>,
        #[arg(long, default_value_t = 20)]
        limit: u32,
    },
    /// Book one or more slots in a single submission
    Book {
        #[arg(long)]
        title: String,
        /// Slot as <start>/<end> in RFC 3339, repeatable
        #[arg(long = "slot", required = true)]
        slots: Vec<String>,
        /// Equipment to reserve with the room, repeatable
        #[arg(long)]
        equipment: Vec<String>,
        /// weekly or fortnightly
        #[arg(long)]
        recurring: Option<RecurringType>,
        #[arg(long, default_value = "")]
        special_requests: String,
        #[arg(long)]
        all_day: bool,
    },
    /// Cancel a booking, optionally with its whole recurring series
    Cancel {
        id: Uuid,
        #[arg(long)]
        recurring: bool,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = ConfigurationHandler;

    if let Err(err) = run(cli.command, &config).await {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

async fn run(command: Command, config: &ConfigurationHandler) -> Result<(), PortalError> {
    let backend = HttpBackend::new(&config.base_url(), config.request_timeout())?;

    match command {
        Command::List { page_size } => {
            let stream = booking_stream(backend, page_size);
            tokio::pin!(stream);
            while let Some(booking) = tokio_stream::StreamExt::next(&mut stream).await {
                let booking = booking?;
                println!(
                    "{}  {} - {}  {} ({})",
                    booking.id,
                    booking.start_time,
                    booking.end_time,
                    booking.title,
                    booking.booked_by.email
                );
            }
        }
        Command::UserBookings { email, limit } => {
            let email = email.or_else(|| config.user_email()).ok_or_else(|| {
                PortalError::Configuration("pass --email or set PORTAL_USER_EMAIL".into())
            })?;
            for booking in backend.user_bookings(&email, limit).await? {
                println!(
                    "{}  {} - {}  {}",
                    booking.id, booking.start_time, booking.end_time, booking.title
                );
            }
        }
        Command::Book {
            title,
            slots,
            equipment,
            recurring,
            special_requests,
            all_day,
        } => {
            let mut session = BookingSession::new(backend);
            session.refresh().await?;
            for raw in &slots {
                session.select_slot(parse_slot(raw, all_day)?)?;
            }

            let form = BookingForm {
                title,
                booked_by_name: config.user_name().unwrap_or_default(),
                booked_by_email: config.user_email().ok_or_else(|| {
                    PortalError::Configuration("PORTAL_USER_EMAIL is not set".into())
                })?,
                equipment: equipment.into_iter().collect(),
                is_recurring: recurring.is_some(),
                recurring_type: recurring,
                special_requests,
            };

            let created = session.submit(&form).await?;
            println!("booked {} slot(s):", created.len());
            for booking in &created {
                println!("  {}  {} - {}", booking.id, booking.start_time, booking.end_time);
            }
        }
        Command::Cancel { id, recurring } => {
            backend.delete_booking(id, recurring).await?;
            println!("cancelled {id}");
        }
    }
    Ok(())
}

/// `<start>/<end>`, both RFC 3339.
fn parse_slot(raw: &str, all_day: bool) -> Result<TimeSlot, PortalError> {
    let Some((start, end)) = raw.split_once('/') else {
        return Err(PortalError::InvalidSlot(format!(
            "\"{raw}\" must look like <start>/<end>"
        )));
    };
    let start = parse_datetime(start)?;
    let end = parse_datetime(end)?;
    TimeSlot::new(start, end, all_day)
}

fn parse_datetime(raw: &str) -> Result<DateTime<Utc>, PortalError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|datetime| datetime.with_timezone(&Utc))
        .map_err(|err| PortalError::InvalidSlot(format!("bad timestamp \"{raw}\": {err}")))
}
