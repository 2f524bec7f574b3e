//! Visitor record types: the raw 7-column sign-in row and its normalized form.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Serialize, Serializer};

/// Sentinel used when origin text is empty or carries no usable place.
pub const NOT_INFORMED: &str = "Not Informed";

/// One sign-in row, projected onto the fixed column order
/// (timestamp, name, origin, phone, age, children, note).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    pub timestamp: String,
    pub name: String,
    pub origin: String,
    pub phone: String,
    pub age: String,
    pub children: String,
    pub note: String,
}

impl RawRecord {
    pub const COLUMNS: usize = 7;
    /// Rows shorter than this never reach the pipeline; the note column may be missing.
    pub const MIN_COLUMNS: usize = 6;

    /// Projects the first seven fields of an arbitrary row into the fixed schema.
    ///
    /// Returns `None` when the row has fewer than [`Self::MIN_COLUMNS`] fields.
    /// Extra trailing fields are ignored.
    pub fn from_fields<S: AsRef<str>>(fields: &[S]) -> Option<Self> {
        if fields.len() < Self::MIN_COLUMNS {
            return None;
        }
        let field = |i: usize| {
            fields
                .get(i)
                .map(|f| f.as_ref().trim().to_string())
                .unwrap_or_default()
        };
        Some(RawRecord {
            timestamp: field(0),
            name: field(1),
            origin: field(2),
            phone: field(3),
            age: field(4),
            children: field(5),
            note: field(6),
        })
    }
}

/// Day of week with fixed domestic (pt-BR) labels, ordered Monday…Sunday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    const LABELS: [&'static str; 7] = [
        "Segunda", "Terça", "Quarta", "Quinta", "Sexta", "Sábado", "Domingo",
    ];

    /// Maps chrono's locale-neutral weekday onto the domestic table.
    pub fn from_chrono(day: chrono::Weekday) -> Self {
        Self::ALL[day.num_days_from_monday() as usize]
    }

    pub fn label(self) -> &'static str {
        Self::LABELS[self as usize]
    }
}

impl Serialize for Weekday {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Sanitized age. `Unknown` is never conflated with zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Age {
    Known(u8),
    Unknown,
}

impl Serialize for Age {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Age::Known(y) => serializer.serialize_u8(*y),
            Age::Unknown => serializer.serialize_str("unknown"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GroupType {
    FamilyOrGroup,
    IndividualAdult,
}

impl GroupType {
    pub fn from_children(children_count: u32) -> Self {
        if children_count > 0 {
            GroupType::FamilyOrGroup
        } else {
            GroupType::IndividualAdult
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GroupType::FamilyOrGroup => "Family/Group",
            GroupType::IndividualAdult => "Individual/Adult",
        }
    }
}

impl Serialize for GroupType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Analytics-ready visitor record. Built once per pipeline run and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedRecord {
    pub source: String,
    pub line: usize,

    pub timestamp: NaiveDateTime,
    pub calendar_date: NaiveDate,
    /// `YYYY-MM`
    pub month: String,
    pub weekday: Weekday,
    pub hour_of_day: u32,

    pub name: String,
    pub origin_raw: String,
    pub phone_raw: String,
    pub note: String,

    pub age: Age,
    pub children_count: u32,
    pub children_corrected: bool,

    pub origin_resolved: String,
    /// Which resolution step produced `origin_resolved`.
    pub origin_stage: &'static str,
    pub foreign_by_location: bool,
    pub foreign_by_phone: bool,
    pub is_foreign: bool,

    pub total_visitors: u32,
    pub group_type: GroupType,
}
