use chrono::{DateTime, Utc};
use flightdesk_shared::Masked;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

use crate::weather::Weather;
use crate::{CoreError, CoreResult};

/// HTTP OK, reported by every delete regardless of whether a record was removed.
pub const STATUS_OK: u16 = 200;

/// A flight as persisted by the store. Passenger membership is kept as references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flight {
    pub id: Uuid,
    pub pilot: String,
    pub airplane: String,
    pub destination_city: String,
    pub flight_date: DateTime<Utc>,
    pub passengers: Vec<Uuid>,
}

/// A stored flight with its passenger references resolved to full records.
/// References to passengers that no longer exist are left out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopulatedFlight {
    pub id: Uuid,
    pub pilot: String,
    pub airplane: String,
    pub destination_city: String,
    pub flight_date: DateTime<Utc>,
    pub passengers: Vec<Passenger>,
}

/// Read-one view: a populated flight plus freshly fetched weather. Built per request
/// and never written back to the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedFlight {
    pub id: Uuid,
    pub pilot: String,
    pub airplane: String,
    pub destination_city: String,
    pub flight_date: DateTime<Utc>,
    pub passengers: Vec<Passenger>,
    pub weather: Vec<Weather>,
}

impl EnrichedFlight {
    pub fn new(flight: PopulatedFlight, weather: Vec<Weather>) -> Self {
        Self {
            id: flight.id,
            pilot: flight.pilot,
            airplane: flight.airplane,
            destination_city: flight.destination_city,
            flight_date: flight.flight_date,
            passengers: flight.passengers,
            weather,
        }
    }
}

/// Create contract for a flight.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightInput {
    pub pilot: String,
    pub airplane: String,
    pub destination_city: String,
    pub flight_date: DateTime<Utc>,
    #[serde(default)]
    pub passengers: Vec<Uuid>,
}

impl FlightInput {
    pub fn validate(&self) -> CoreResult<()> {
        require_text("pilot", &self.pilot)?;
        require_text("airplane", &self.airplane)?;
        require_text("destinationCity", &self.destination_city)?;
        Ok(())
    }

    /// Collapses duplicate passenger references, keeping first-seen order.
    pub fn normalized(mut self) -> Self {
        self.passengers = unique_references(self.passengers);
        self
    }
}

/// Update contract for a flight. Absent fields are left untouched; a supplied
/// passenger list replaces the whole set.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FlightPatch {
    pub pilot: Option<String>,
    pub airplane: Option<String>,
    pub destination_city: Option<String>,
    pub flight_date: Option<DateTime<Utc>>,
    pub passengers: Option<Vec<Uuid>>,
}

impl FlightPatch {
    pub fn validate(&self) -> CoreResult<()> {
        if let Some(pilot) = &self.pilot {
            require_text("pilot", pilot)?;
        }
        if let Some(airplane) = &self.airplane {
            require_text("airplane", airplane)?;
        }
        if let Some(city) = &self.destination_city {
            require_text("destinationCity", city)?;
        }
        Ok(())
    }

    pub fn normalized(mut self) -> Self {
        self.passengers = self.passengers.map(unique_references);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.pilot.is_none()
            && self.airplane.is_none()
            && self.destination_city.is_none()
            && self.flight_date.is_none()
            && self.passengers.is_none()
    }

    /// Applies the patch in place. The identifier is never part of a patch.
    pub fn apply_to(&self, flight: &mut Flight) {
        if let Some(pilot) = &self.pilot {
            flight.pilot = pilot.clone();
        }
        if let Some(airplane) = &self.airplane {
            flight.airplane = airplane.clone();
        }
        if let Some(city) = &self.destination_city {
            flight.destination_city = city.clone();
        }
        if let Some(date) = self.flight_date {
            flight.flight_date = date;
        }
        if let Some(passengers) = &self.passengers {
            flight.passengers = passengers.clone();
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passenger {
    pub id: Uuid,
    pub name: String,
    pub email: Masked<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PassengerInput {
    pub name: String,
    pub email: Masked<String>,
}

impl PassengerInput {
    pub fn validate(&self) -> CoreResult<()> {
        require_text("name", &self.name)?;
        require_email(self.email.expose())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PassengerPatch {
    pub name: Option<String>,
    pub email: Option<Masked<String>>,
}

impl PassengerPatch {
    pub fn validate(&self) -> CoreResult<()> {
        if let Some(name) = &self.name {
            require_text("name", name)?;
        }
        if let Some(email) = &self.email {
            require_email(email.expose())?;
        }
        Ok(())
    }

    pub fn apply_to(&self, passenger: &mut Passenger) {
        if let Some(name) = &self.name {
            passenger.name = name.clone();
        }
        if let Some(email) = &self.email {
            passenger.email = email.clone();
        }
    }
}

/// Confirmation returned by deletes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResult {
    pub status: u16,
    pub message: String,
}

impl DeleteResult {
    pub fn deleted() -> Self {
        Self {
            status: STATUS_OK,
            message: "deleted".to_string(),
        }
    }
}

pub fn unique_references(ids: Vec<Uuid>) -> Vec<Uuid> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

fn require_text(field: &str, value: &str) -> CoreResult<()> {
    if value.trim().is_empty() {
        return Err(CoreError::ValidationError(format!("{} must not be empty", field)));
    }
    Ok(())
}

fn require_email(value: &str) -> CoreResult<()> {
    if !value.contains('@') {
        return Err(CoreError::ValidationError("email must be a valid address".to_string()));
    }
    Ok(())
}
