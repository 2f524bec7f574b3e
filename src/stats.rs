//! Summary analytics over normalized visitor records.
//!
//! Everything here is computed from [`NormalizedRecord`]s alone; rendering is
//! left to whatever consumes the serialized [`VisitorSummary`].

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::geo::tables::TABLES_VERSION;
use crate::record::{GroupType, NormalizedRecord, Weekday};

/// Bumped whenever the way a summary is computed changes.
pub const ALGORITHM_VERSION: u32 = 1;

pub const TOP_ORIGINS: usize = 10;
pub const TOP_FOREIGN_ORIGINS: usize = 5;

/// Inclusive date range. An open end is unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Period {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl Period {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.is_none_or(|from| date >= from) && self.to.is_none_or(|to| date <= to)
    }

    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }
}

pub fn filter_period(records: &[NormalizedRecord], period: Period) -> Vec<&NormalizedRecord> {
    records
        .iter()
        .filter(|r| period.contains(r.calendar_date))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekdayAverage {
    pub weekday: Weekday,
    pub average_visitors: f64,
    pub days_observed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OriginCount {
    pub origin: String,
    pub records: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct VisitorSummary {
    pub algorithm_version: u32,
    pub tables_version: u32,
    pub generated_at: DateTime<Utc>,
    pub period: Period,

    /// One adult per record.
    pub total_adults: usize,
    pub total_children: u64,
    pub total_public: u64,
    /// Sum of `total_visitors` over foreign records.
    pub foreign_visitors: u64,
    pub foreign_records: usize,

    pub family_groups: usize,
    pub individual_adults: usize,

    pub daily_totals: BTreeMap<NaiveDate, u64>,
    pub monthly_totals: BTreeMap<String, u64>,
    /// Monday first, one entry per weekday.
    pub weekday_averages: Vec<WeekdayAverage>,

    pub top_origins: Vec<OriginCount>,
    pub top_foreign_origins: Vec<OriginCount>,
}

impl VisitorSummary {
    pub fn from_records(records: &[NormalizedRecord]) -> Self {
        Self::for_period(records, Period::default())
    }

    pub fn for_period(records: &[NormalizedRecord], period: Period) -> Self {
        let selected = filter_period(records, period);
        Self::build(&selected, period)
    }

    fn build(records: &[&NormalizedRecord], period: Period) -> Self {
        let mut s = VisitorSummary {
            algorithm_version: ALGORITHM_VERSION,
            tables_version: TABLES_VERSION,
            generated_at: Utc::now(),
            period,
            total_adults: records.len(),
            total_children: 0,
            total_public: 0,
            foreign_visitors: 0,
            foreign_records: 0,
            family_groups: 0,
            individual_adults: 0,
            daily_totals: BTreeMap::new(),
            monthly_totals: BTreeMap::new(),
            weekday_averages: Vec::new(),
            top_origins: Vec::new(),
            top_foreign_origins: Vec::new(),
        };

        let mut weekday_sums: HashMap<Weekday, u64> = HashMap::new();
        let mut weekday_dates: HashMap<Weekday, BTreeSet<NaiveDate>> = HashMap::new();

        for r in records {
            let visitors = u64::from(r.total_visitors);
            s.total_children += u64::from(r.children_count);
            s.total_public += visitors;

            if r.is_foreign {
                s.foreign_records += 1;
                s.foreign_visitors += visitors;
            }

            match r.group_type {
                GroupType::FamilyOrGroup => s.family_groups += 1,
                GroupType::IndividualAdult => s.individual_adults += 1,
            }

            *s.daily_totals.entry(r.calendar_date).or_default() += visitors;
            *s.monthly_totals.entry(r.month.clone()).or_default() += visitors;
            *weekday_sums.entry(r.weekday).or_default() += visitors;
            weekday_dates
                .entry(r.weekday)
                .or_default()
                .insert(r.calendar_date);
        }

        s.weekday_averages = Weekday::ALL
            .iter()
            .map(|&weekday| {
                let days_observed = weekday_dates.get(&weekday).map_or(0, BTreeSet::len);
                let sum = weekday_sums.get(&weekday).copied().unwrap_or(0);
                let average_visitors = if days_observed == 0 {
                    0.0
                } else {
                    sum as f64 / days_observed as f64
                };
                WeekdayAverage {
                    weekday,
                    average_visitors,
                    days_observed,
                }
            })
            .collect();

        s.top_origins = top_origins(records.iter().copied(), TOP_ORIGINS);
        s.top_foreign_origins = top_origins(
            records.iter().copied().filter(|r| r.is_foreign),
            TOP_FOREIGN_ORIGINS,
        );

        s
    }

    pub fn pct(part: u64, total: u64) -> f64 {
        if total == 0 {
            0.0
        } else {
            (part as f64 / total as f64) * 100.0
        }
    }

    pub fn children_pct(&self) -> f64 {
        Self::pct(self.total_children, self.total_public)
    }

    pub fn foreign_pct(&self) -> f64 {
        Self::pct(self.foreign_visitors, self.total_public)
    }
}

/// Most frequent resolved origins by record count, ties broken by name.
pub fn top_origins<'a, I>(records: I, n: usize) -> Vec<OriginCount>
where
    I: IntoIterator<Item = &'a NormalizedRecord>,
{
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for r in records {
        *counts.entry(r.origin_resolved.as_str()).or_default() += 1;
    }

    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked
        .into_iter()
        .take(n)
        .map(|(origin, records)| OriginCount {
            origin: origin.to_string(),
            records,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Age;
    use crate::temporal::TemporalFields;
    use chrono::NaiveDateTime;

    fn record(ts: &str, origin: &str, children: u32, is_foreign: bool) -> NormalizedRecord {
        let timestamp = NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M").unwrap();
        let time = TemporalFields::from_timestamp(timestamp);
        NormalizedRecord {
            source: "test".to_string(),
            line: 2,
            timestamp: time.timestamp,
            calendar_date: time.calendar_date,
            month: time.month,
            weekday: time.weekday,
            hour_of_day: time.hour_of_day,
            name: "x".to_string(),
            origin_raw: origin.to_string(),
            phone_raw: String::new(),
            note: String::new(),
            age: Age::Unknown,
            children_count: children,
            children_corrected: false,
            origin_resolved: origin.to_string(),
            origin_stage: "gazetteer",
            foreign_by_location: is_foreign,
            foreign_by_phone: false,
            is_foreign,
            total_visitors: children + 1,
            group_type: GroupType::from_children(children),
        }
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_pct_with_zero_total() {
        assert_eq!(VisitorSummary::pct(10, 0), 0.0);
        assert_eq!(VisitorSummary::pct(1, 4), 25.0);
    }

    #[test]
    fn test_empty_summary() {
        let s = VisitorSummary::from_records(&[]);
        assert_eq!(s.total_adults, 0);
        assert_eq!(s.total_public, 0);
        assert_eq!(s.weekday_averages.len(), 7);
        assert!(s.weekday_averages.iter().all(|w| w.average_visitors == 0.0));
        assert!(s.top_origins.is_empty());
    }

    #[test]
    fn test_totals_and_profile() {
        let records = vec![
            record("2024-03-02 10:00", "Sinop", 2, false),
            record("2024-03-02 11:00", "Argentina", 0, true),
            record("2024-03-03 09:00", "Sinop", 1, false),
        ];
        let s = VisitorSummary::from_records(&records);
        assert_eq!(s.total_adults, 3);
        assert_eq!(s.total_children, 3);
        assert_eq!(s.total_public, 6);
        assert_eq!(s.foreign_records, 1);
        assert_eq!(s.foreign_visitors, 1);
        assert_eq!(s.family_groups, 2);
        assert_eq!(s.individual_adults, 1);
        assert_eq!(s.daily_totals[&date("2024-03-02")], 4);
        assert_eq!(s.daily_totals[&date("2024-03-03")], 2);
        assert_eq!(s.monthly_totals["2024-03"], 6);
        assert_eq!(s.children_pct(), 50.0);
        assert!((s.foreign_pct() - 16.67).abs() < 0.01);
    }

    #[test]
    fn test_weekday_average_divides_by_distinct_dates() {
        // Two Saturdays: 2 + 1 visitors, then 3 visitors
        let records = vec![
            record("2024-03-02 10:00", "Sinop", 1, false),
            record("2024-03-02 11:00", "Sinop", 0, false),
            record("2024-03-09 10:00", "Sinop", 2, false),
        ];
        let s = VisitorSummary::from_records(&records);
        let saturday = &s.weekday_averages[5];
        assert_eq!(saturday.weekday, Weekday::Saturday);
        assert_eq!(saturday.days_observed, 2);
        assert_eq!(saturday.average_visitors, 3.0);
        assert_eq!(s.weekday_averages[0].weekday, Weekday::Monday);
        assert_eq!(s.weekday_averages[0].average_visitors, 0.0);
    }

    #[test]
    fn test_top_origins_ties_broken_by_name() {
        let records = vec![
            record("2024-03-02 10:00", "Sorriso", 0, false),
            record("2024-03-02 10:00", "Sinop", 0, false),
            record("2024-03-02 10:00", "Cuiabá", 0, false),
            record("2024-03-02 10:00", "Cuiabá", 0, false),
        ];
        let top = top_origins(&records, 2);
        assert_eq!(
            top,
            vec![
                OriginCount { origin: "Cuiabá".to_string(), records: 2 },
                OriginCount { origin: "Sinop".to_string(), records: 1 },
            ]
        );
    }

    #[test]
    fn test_top_foreign_origins_only_foreign() {
        let records = vec![
            record("2024-03-02 10:00", "Cuiabá", 0, false),
            record("2024-03-02 10:00", "Argentina", 0, true),
        ];
        let s = VisitorSummary::from_records(&records);
        assert_eq!(s.top_foreign_origins.len(), 1);
        assert_eq!(s.top_foreign_origins[0].origin, "Argentina");
    }

    #[test]
    fn test_period_is_inclusive() {
        let records = vec![
            record("2024-03-01 10:00", "Sinop", 0, false),
            record("2024-03-02 10:00", "Sinop", 0, false),
            record("2024-03-03 10:00", "Sinop", 0, false),
        ];
        let period = Period::new(Some(date("2024-03-02")), Some(date("2024-03-03")));
        assert_eq!(filter_period(&records, period).len(), 2);

        let s = VisitorSummary::for_period(&records, period);
        assert_eq!(s.total_adults, 2);
        assert_eq!(s.period, period);
    }

    #[test]
    fn test_open_period_keeps_everything() {
        let records = vec![record("2024-03-01 10:00", "Sinop", 0, false)];
        let period = Period::default();
        assert!(period.is_unbounded());
        assert!(!Period::new(Some(date("2024-03-01")), None).is_unbounded());
        assert_eq!(filter_period(&records, period).len(), 1);
        assert!(Period::new(None, Some(date("2024-02-01"))).contains(date("2024-01-31")));
    }
}
