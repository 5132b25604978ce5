use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Deserializer};
use std::io::Read;

/// Raw row as exported by the CRM. Enum-ish columns stay strings here;
/// tolerant mapping happens in the module root.
#[derive(Debug, Deserialize)]
pub(crate) struct LeadRow {
    #[serde(rename = "Lead ID")]
    pub(crate) lead_id: String,
    #[serde(rename = "Client")]
    pub(crate) client: String,
    #[serde(rename = "Contact", default)]
    pub(crate) contact: String,
    #[serde(rename = "Destination")]
    pub(crate) destination: String,
    #[serde(rename = "Travelers", default = "one")]
    pub(crate) travelers: u16,
    #[serde(rename = "Estimated Value", default)]
    pub(crate) estimated_value: u32,
    #[serde(rename = "Status")]
    pub(crate) status: String,
    #[serde(rename = "Temperature", default)]
    pub(crate) temperature: String,
    #[serde(rename = "AI Score", default)]
    pub(crate) ai_score: u8,
    #[serde(rename = "Travel Start")]
    pub(crate) travel_start: String,
    #[serde(rename = "Travel End")]
    pub(crate) travel_end: String,
    #[serde(rename = "Created At", default, deserialize_with = "empty_string_as_none")]
    pub(crate) created_at: Option<String>,
    #[serde(rename = "Updated At", default, deserialize_with = "empty_string_as_none")]
    pub(crate) updated_at: Option<String>,
}

fn one() -> u16 {
    1
}

pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<LeadRow>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    csv_reader.deserialize::<LeadRow>().collect()
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

pub(crate) fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc());
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
        return Some(dt);
    }

    parse_date(trimmed).map(|date| date.and_time(NaiveTime::MIN))
}

pub(crate) fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}
