//! Booking log and history-based recommendations
//!
//! The log is append-only and kept in memory. Its only consumer inside the
//! engine is [`recommend_from_history`], which looks at a user's latest
//! booking and suggests other cars of the same body type. That mode is
//! separate from the content-based recommender and its results are never
//! merged with it.

use crate::catalog::{CarRecord, Catalog};
use crate::error::BookingError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Interaction event recorded for a booking
pub const BOOKED_EVENT: &str = "booked";

/// One logged booking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub user_id: String,
    pub car_id: String,
    pub event: String,
    pub timestamp: DateTime<Utc>,
}

/// Append-only booking log
#[derive(Debug, Clone, Default)]
pub struct BookingLog {
    entries: Vec<Booking>,
}

impl BookingLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a booking of a catalog car
    pub fn log_booking(
        &mut self,
        catalog: &Catalog,
        user_id: &str,
        car_id: &str,
    ) -> Result<Booking, BookingError> {
        self.log_booking_at(catalog, user_id, car_id, Utc::now())
    }

    /// Record a booking with an explicit timestamp
    pub fn log_booking_at(
        &mut self,
        catalog: &Catalog,
        user_id: &str,
        car_id: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<Booking, BookingError> {
        let user_id = user_id.trim();
        if user_id.is_empty() {
            return Err(BookingError::MissingUser);
        }

        let car = catalog
            .get(car_id)
            .ok_or_else(|| BookingError::UnknownCar(car_id.trim().to_string()))?;

        let booking = Booking {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            car_id: car.id.clone(),
            event: BOOKED_EVENT.to_string(),
            timestamp,
        };

        tracing::info!(
            "Logged booking {} of car {} by {}",
            booking.id,
            booking.car_id,
            booking.user_id
        );
        self.entries.push(booking.clone());
        Ok(booking)
    }

    /// A user's bookings, newest first
    pub fn for_user(&self, user_id: &str) -> Vec<&Booking> {
        let user_id = user_id.trim();
        let mut bookings: Vec<&Booking> = self
            .entries
            .iter()
            .filter(|b| b.user_id == user_id)
            .collect();
        // stable sort, so later appends win timestamp ties
        bookings.reverse();
        bookings.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        bookings
    }

    /// The user's latest booking
    pub fn most_recent(&self, user_id: &str) -> Option<&Booking> {
        self.for_user(user_id).into_iter().next()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Cars sharing the body type of the user's latest booking
///
/// The booked car itself is left out. Cars come back in catalog order. A user
/// without bookings, or whose latest booked car is no longer in the catalog,
/// gets an empty list.
pub fn recommend_from_history<'a>(
    log: &BookingLog,
    catalog: &'a Catalog,
    user_id: &str,
    top_n: usize,
) -> Vec<&'a CarRecord> {
    let Some(latest) = log.most_recent(user_id) else {
        return Vec::new();
    };
    let Some(booked) = catalog.get(&latest.car_id) else {
        return Vec::new();
    };

    catalog
        .iter()
        .filter(|car| car.id != booked.id && car.body_type.eq_ignore_ascii_case(&booked.body_type))
        .take(top_n)
        .collect()
}
