//! Tolerant CSV intake for CRM lead exports.
//!
//! Export tooling varies in how it spells stages and temperatures, so
//! the mapping here accepts common aliases and falls back to sensible
//! defaults for optional columns. Rows missing identity or travel data
//! fail the import with the offending lead id in the message.

mod parser;

use std::io::Read;
use std::path::Path;

use chrono::NaiveTime;

use super::domain::{
    Lead, LeadId, LeadStatus, Payment, PaymentStatus, Temperature, TravelDates,
};

#[derive(Debug)]
pub enum LeadImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Invalid { lead_id: String, reason: String },
}

impl std::fmt::Display for LeadImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeadImportError::Io(err) => write!(f, "failed to read lead export: {err}"),
            LeadImportError::Csv(err) => write!(f, "invalid lead CSV data: {err}"),
            LeadImportError::Invalid { lead_id, reason } => {
                write!(f, "lead '{lead_id}' could not be imported: {reason}")
            }
        }
    }
}

impl std::error::Error for LeadImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LeadImportError::Io(err) => Some(err),
            LeadImportError::Csv(err) => Some(err),
            LeadImportError::Invalid { .. } => None,
        }
    }
}

impl From<std::io::Error> for LeadImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for LeadImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

pub struct LeadCsvImporter;

impl LeadCsvImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Lead>, LeadImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Lead>, LeadImportError> {
        let mut leads = Vec::new();
        for row in parser::parse_rows(reader)? {
            leads.push(lead_from_row(row)?);
        }
        Ok(leads)
    }
}

fn lead_from_row(row: parser::LeadRow) -> Result<Lead, LeadImportError> {
    let lead_id = row.lead_id.clone();
    let invalid = |reason: String| LeadImportError::Invalid {
        lead_id: lead_id.clone(),
        reason,
    };

    if row.lead_id.trim().is_empty() {
        return Err(LeadImportError::Invalid {
            lead_id: "<blank>".to_string(),
            reason: "missing lead id".to_string(),
        });
    }

    let from = parser::parse_date(&row.travel_start)
        .ok_or_else(|| invalid(format!("unparsable travel start '{}'", row.travel_start)))?;
    let to = parser::parse_date(&row.travel_end)
        .ok_or_else(|| invalid(format!("unparsable travel end '{}'", row.travel_end)))?;
    if from > to {
        return Err(invalid(format!("travel window {from} > {to}")));
    }

    let status = parse_status(&row.status)
        .ok_or_else(|| invalid(format!("unknown status '{}'", row.status)))?;
    let temperature = parse_temperature(&row.temperature);

    let created_at = row
        .created_at
        .as_deref()
        .and_then(parser::parse_datetime)
        .unwrap_or_else(|| from.and_time(NaiveTime::MIN));
    let updated_at = row
        .updated_at
        .as_deref()
        .and_then(parser::parse_datetime)
        .unwrap_or(created_at)
        .max(created_at);

    let lead = Lead {
        id: LeadId(row.lead_id),
        client_name: row.client,
        contact: row.contact,
        destination: row.destination,
        travelers: row.travelers.max(1),
        estimated_value: row.estimated_value,
        payment: Payment {
            total: row.estimated_value,
            paid: 0,
            status: PaymentStatus::Pending,
        },
        status,
        temperature,
        ai_score: row.ai_score.min(100),
        travel_dates: TravelDates { from, to },
        created_at,
        updated_at,
        tasks: Vec::new(),
        activity: Vec::new(),
    };

    Ok(lead)
}

fn parse_status(value: &str) -> Option<LeadStatus> {
    let status = match value.trim().to_ascii_lowercase().as_str() {
        "new" | "lead" => LeadStatus::New,
        "qualification" | "qualifying" => LeadStatus::Qualification,
        "quoting" | "quote" | "quoted" => LeadStatus::Quoting,
        "negotiation" | "negotiating" => LeadStatus::Negotiation,
        "booked" | "confirmed" => LeadStatus::Booked,
        "operations" | "in_trip" | "traveling" => LeadStatus::Operations,
        "completed" | "done" => LeadStatus::Completed,
        "lost" | "cancelled" | "canceled" => LeadStatus::Lost,
        _ => return None,
    };
    Some(status)
}

fn parse_temperature(value: &str) -> Temperature {
    match value.trim().to_ascii_lowercase().as_str() {
        "hot" => Temperature::Hot,
        "cold" => Temperature::Cold,
        "hold" | "on_hold" | "paused" => Temperature::Hold,
        _ => Temperature::Warm,
    }
}
