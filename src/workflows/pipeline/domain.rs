use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for leads so ids cannot be confused with task ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LeadId(pub String);

/// Identifier wrapper for tasks attached to a lead.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(pub String);

/// Sales pipeline stage for a lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    New,
    Qualification,
    Quoting,
    Negotiation,
    Booked,
    Operations,
    Completed,
    Lost,
}

impl LeadStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::New => "New",
            Self::Qualification => "Qualification",
            Self::Quoting => "Quoting",
            Self::Negotiation => "Negotiation",
            Self::Booked => "Booked",
            Self::Operations => "Operations",
            Self::Completed => "Completed",
            Self::Lost => "Lost",
        }
    }

    /// Booked and in-operations leads have confirmed itineraries and
    /// therefore real departure/return dates on the calendar.
    pub const fn is_confirmed(self) -> bool {
        matches!(self, Self::Booked | Self::Operations)
    }
}

/// Engagement temperature used for prioritization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Temperature {
    Hot,
    Warm,
    Cold,
    Hold,
}

impl Temperature {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Hot => "Hot",
            Self::Warm => "Warm",
            Self::Cold => "Cold",
            Self::Hold => "Hold",
        }
    }
}

/// Shared priority scale for tasks and derived calendar events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl TaskPriority {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

/// Settlement state of the lead's payment schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Partial,
    Paid,
    Refunded,
}

impl PaymentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Partial => "Partial",
            Self::Paid => "Paid",
            Self::Refunded => "Refunded",
        }
    }
}

/// Channel or category of an activity log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Call,
    Email,
    WhatsApp,
    Note,
    Meeting,
    FollowUp,
    StatusChange,
    QuoteSent,
}

impl ActivityKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Call => "Call",
            Self::Email => "Email",
            Self::WhatsApp => "WhatsApp",
            Self::Note => "Note",
            Self::Meeting => "Meeting",
            Self::FollowUp => "Follow-up",
            Self::StatusChange => "Status change",
            Self::QuoteSent => "Quote sent",
        }
    }
}

/// Payment schedule snapshot. `paid` never exceeds `total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub total: u32,
    pub paid: u32,
    pub status: PaymentStatus,
}

impl Payment {
    pub const fn outstanding(&self) -> u32 {
        self.total.saturating_sub(self.paid)
    }
}

/// Inclusive travel window for the itinerary. `from <= to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelDates {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

/// Actionable item owned by a lead. Completion is monotonic: the core
/// never flips a completed task back to open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub description: String,
    pub due_date: NaiveDateTime,
    pub is_completed: bool,
    pub priority: TaskPriority,
}

/// Append-only history record attached to a lead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub id: String,
    pub kind: ActivityKind,
    pub content: String,
    pub timestamp: NaiveDateTime,
    pub author: String,
}

/// A prospective or active client engagement.
///
/// The `activity` vector is maintained newest-first by the reducers, but
/// consumers resolve recency through [`Lead::latest_activity`] so a
/// mis-ordered import cannot skew follow-up derivation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    pub id: LeadId,
    pub client_name: String,
    pub contact: String,
    pub destination: String,
    pub travelers: u16,
    pub estimated_value: u32,
    pub payment: Payment,
    pub status: LeadStatus,
    pub temperature: Temperature,
    /// Externally supplied signal in [0, 100]; this core only reads it.
    pub ai_score: u8,
    pub travel_dates: TravelDates,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub tasks: Vec<Task>,
    pub activity: Vec<ActivityEntry>,
}

impl Lead {
    /// Most recent activity entry, resolved by timestamp rather than by
    /// position in the vector.
    pub fn latest_activity(&self) -> Option<&ActivityEntry> {
        self.activity.iter().max_by_key(|entry| entry.timestamp)
    }

    pub fn open_tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(|task| !task.is_completed)
    }

    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| &task.id == id)
    }

    /// Checks the structural invariants a well-formed lead must satisfy.
    pub fn validate(&self) -> Result<(), LeadValidationError> {
        if self.payment.paid > self.payment.total {
            return Err(LeadValidationError::OverpaidPayment {
                paid: self.payment.paid,
                total: self.payment.total,
            });
        }
        if self.travel_dates.from > self.travel_dates.to {
            return Err(LeadValidationError::InvertedTravelWindow {
                from: self.travel_dates.from,
                to: self.travel_dates.to,
            });
        }
        if self.updated_at < self.created_at {
            return Err(LeadValidationError::UpdatedBeforeCreated);
        }
        if self.ai_score > 100 {
            return Err(LeadValidationError::AiScoreOutOfRange(self.ai_score));
        }
        Ok(())
    }
}

/// Violations of the lead invariants, reported at intake.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LeadValidationError {
    #[error("payment of {paid} exceeds total of {total}")]
    OverpaidPayment { paid: u32, total: u32 },
    #[error("travel window ends {to} before it starts {from}")]
    InvertedTravelWindow { from: NaiveDate, to: NaiveDate },
    #[error("updated_at precedes created_at")]
    UpdatedBeforeCreated,
    #[error("ai score {0} outside 0..=100")]
    AiScoreOutOfRange(u8),
}
