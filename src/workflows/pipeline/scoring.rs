use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::domain::{Lead, LeadId, Temperature};

/// Deal value (in whole currency units) at which the value component
/// saturates.
const VALUE_CEILING: f32 = 100_000.0;
/// Leads untouched for more than this many days earn the staleness bump
/// so they float back up the board.
const STALE_AFTER_DAYS: i64 = 2;

/// Signals permitted in the prioritization rubric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreFactor {
    AiSignal,
    Temperature,
    DealValue,
    Staleness,
}

/// Discrete contribution to a lead score, kept for transparent audits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub factor: ScoreFactor,
    pub points: f32,
    pub notes: String,
}

/// Composite priority for one lead at one instant.
///
/// The total is intentionally unclamped at the top end: a very large
/// deal with every bonus can exceed 100, and capping it here would
/// collapse exactly the ordering the board relies on. Display layers
/// may clamp for presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadScore {
    pub lead_id: LeadId,
    pub total: i32,
    pub components: Vec<ScoreComponent>,
}

/// Score a single lead. Depends on `now` (staleness), so results must
/// not be cached across time.
pub fn score_lead(lead: &Lead, now: NaiveDateTime) -> LeadScore {
    let mut components = Vec::with_capacity(4);
    let mut total = 0.0f32;

    let ai_points = f32::from(lead.ai_score.min(100)) / 100.0 * 40.0;
    components.push(ScoreComponent {
        factor: ScoreFactor::AiSignal,
        points: ai_points,
        notes: format!("ai score {} of 100", lead.ai_score),
    });
    total += ai_points;

    if lead.temperature == Temperature::Hot {
        components.push(ScoreComponent {
            factor: ScoreFactor::Temperature,
            points: 25.0,
            notes: "hot lead bonus".to_string(),
        });
        total += 25.0;
    }

    let value_points = (lead.estimated_value as f32 / VALUE_CEILING * 20.0).min(20.0);
    components.push(ScoreComponent {
        factor: ScoreFactor::DealValue,
        points: value_points,
        notes: format!("estimated value {}", lead.estimated_value),
    });
    total += value_points;

    let idle_days = (now - lead.updated_at).num_days();
    if idle_days > STALE_AFTER_DAYS {
        components.push(ScoreComponent {
            factor: ScoreFactor::Staleness,
            points: 15.0,
            notes: format!("no update for {idle_days} day(s)"),
        });
        total += 15.0;
    }

    LeadScore {
        lead_id: lead.id.clone(),
        total: total.round() as i32,
        components,
    }
}

/// Rank leads for the board: highest score first, with ties keeping
/// their original relative order (the sort must stay stable).
pub fn rank_leads<'a>(leads: &'a [Lead], now: NaiveDateTime) -> Vec<(&'a Lead, LeadScore)> {
    let mut ranked: Vec<(&Lead, LeadScore)> = leads
        .iter()
        .map(|lead| (lead, score_lead(lead, now)))
        .collect();
    ranked.sort_by(|a, b| b.1.total.cmp(&a.1.total));
    ranked
}
