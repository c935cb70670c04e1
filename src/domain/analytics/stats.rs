//! Month-bucketed reading statistics.
//!
//! The pipeline runs in four pure stages: [`filter_records`] narrows the
//! completed books by facet, [`aggregate_by_month`] buckets them,
//! [`normalize_months`] fills calendar gaps and [`reference_value`] derives the
//! average line for the selected [`Metric`]. [`monthly_chart`] chains them.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::domain::books::genres::GenreTag;
use crate::domain::ids::ShelfEntryId;

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StatsError {
    #[error("unknown metric '{0}': expected count, pages or rating")]
    UnknownMetric(String),
    #[error("invalid month '{0}': expected YYYY-MM")]
    InvalidMonth(String),
    #[error("unknown fiction filter '{0}': expected all, fiction or nonfiction")]
    UnknownFictionFilter(String),
}

/// A calendar month, ordered by year then month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    /// Returns `None` unless `month` is within 1–12.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub const fn year(self) -> i32 {
        self.year
    }

    pub const fn month(self) -> u32 {
        self.month
    }

    #[must_use]
    pub const fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Display label such as `Mar 2024`.
    pub fn label(self) -> String {
        let abbreviation = MONTH_ABBREVIATIONS[(self.month - 1) as usize];
        format!("{abbreviation} {}", self.year)
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || StatsError::InvalidMonth(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        if year.len() != 4
            || month.len() != 2
            || !year.bytes().all(|b| b.is_ascii_digit())
            || !month.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).ok_or_else(invalid)
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// One finished book as seen by the statistics pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedBookRecord {
    pub id: ShelfEntryId,
    pub finished_on: NaiveDate,
    pub pages: Option<u32>,
    pub rating: Option<f64>,
    #[serde(default)]
    pub genres: Vec<GenreTag>,
}

impl CompletedBookRecord {
    pub fn month(&self) -> MonthKey {
        MonthKey::from_date(self.finished_on)
    }

    /// A book counts as fiction when any of its genres is flagged fiction.
    pub fn is_fiction(&self) -> bool {
        self.genres.iter().any(|genre| genre.fiction)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FictionFilter {
    #[default]
    All,
    Fiction,
    #[serde(alias = "non-fiction", alias = "non_fiction")]
    NonFiction,
}

impl FictionFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            FictionFilter::All => "all",
            FictionFilter::Fiction => "fiction",
            FictionFilter::NonFiction => "nonfiction",
        }
    }
}

impl FromStr for FictionFilter {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', '_'], "").as_str() {
            "all" | "" => Ok(FictionFilter::All),
            "fiction" => Ok(FictionFilter::Fiction),
            "nonfiction" => Ok(FictionFilter::NonFiction),
            _ => Err(StatsError::UnknownFictionFilter(s.to_string())),
        }
    }
}

/// Facets applied before aggregation. The default restricts nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(default)]
    pub genres: BTreeSet<String>,
    #[serde(default)]
    pub fiction: FictionFilter,
    #[serde(default)]
    pub start: Option<MonthKey>,
    #[serde(default)]
    pub end: Option<MonthKey>,
}

impl FilterCriteria {
    pub fn matches(&self, record: &CompletedBookRecord) -> bool {
        self.matches_genre(record) && self.matches_fiction(record) && self.matches_range(record)
    }

    // Genre names are unique ignoring ASCII case, so they match the same way.
    fn matches_genre(&self, record: &CompletedBookRecord) -> bool {
        self.genres.is_empty()
            || record.genres.iter().any(|genre| {
                self.genres
                    .iter()
                    .any(|wanted| wanted.eq_ignore_ascii_case(&genre.name))
            })
    }

    fn matches_fiction(&self, record: &CompletedBookRecord) -> bool {
        match self.fiction {
            FictionFilter::All => true,
            FictionFilter::Fiction => record.is_fiction(),
            FictionFilter::NonFiction => !record.is_fiction(),
        }
    }

    // Inclusive on both ends. Ordering on MonthKey agrees with comparing
    // zero-padded "YYYY-MM" strings.
    fn matches_range(&self, record: &CompletedBookRecord) -> bool {
        let month = record.month();
        self.start.is_none_or(|start| month >= start) && self.end.is_none_or(|end| month <= end)
    }
}

/// Per-month accumulator built by [`aggregate_by_month`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthAggregate {
    pub books: u32,
    pub pages: u64,
    pub ratings: Vec<f64>,
}

impl MonthAggregate {
    /// Arithmetic mean of the recorded ratings, `0.0` when there are none.
    pub fn mean_rating(&self) -> f64 {
        if self.ratings.is_empty() {
            0.0
        } else {
            self.ratings.iter().sum::<f64>() / self.ratings.len() as f64
        }
    }
}

/// One point of the gap-filled monthly series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthRecord {
    pub month: MonthKey,
    pub label: String,
    pub books: u32,
    pub pages: u64,
    pub rating: f64,
}

impl MonthRecord {
    fn empty(month: MonthKey) -> Self {
        Self {
            month,
            label: month.label(),
            books: 0,
            pages: 0,
            rating: 0.0,
        }
    }

    fn from_aggregate(month: MonthKey, aggregate: &MonthAggregate) -> Self {
        Self {
            month,
            label: month.label(),
            books: aggregate.books,
            pages: aggregate.pages,
            rating: aggregate.mean_rating(),
        }
    }

    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Count => f64::from(self.books),
            Metric::Pages => self.pages as f64,
            Metric::Rating => self.rating,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    #[default]
    Count,
    Pages,
    Rating,
}

impl Metric {
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Count => "count",
            Metric::Pages => "pages",
            Metric::Rating => "rating",
        }
    }
}

impl FromStr for Metric {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "count" | "books" | "booksRead" => Ok(Metric::Count),
            "pages" | "pagesRead" => Ok(Metric::Pages),
            "rating" | "ratings" => Ok(Metric::Rating),
            _ => Err(StatsError::UnknownMetric(s.to_string())),
        }
    }
}

/// Payload handed to the chart renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub series: Vec<MonthRecord>,
    pub reference_value: f64,
    pub metric_key: Metric,
}

/// Keeps the records matching every facet, in input order.
pub fn filter_records<'a>(
    records: &'a [CompletedBookRecord],
    criteria: &FilterCriteria,
) -> Vec<&'a CompletedBookRecord> {
    records
        .iter()
        .filter(|record| criteria.matches(record))
        .collect()
}

/// Buckets records by completion month. Zero ratings are not recorded.
pub fn aggregate_by_month<'a, I>(records: I) -> BTreeMap<MonthKey, MonthAggregate>
where
    I: IntoIterator<Item = &'a CompletedBookRecord>,
{
    let mut buckets: BTreeMap<MonthKey, MonthAggregate> = BTreeMap::new();
    for record in records {
        let bucket = buckets.entry(record.month()).or_default();
        bucket.books += 1;
        bucket.pages += u64::from(record.pages.unwrap_or(0));
        if let Some(rating) = record.rating.filter(|r| r.abs() > 0.0) {
            bucket.ratings.push(rating);
        }
    }
    buckets
}

/// Expands the sparse buckets into one record per calendar month between the
/// earliest and latest key, inclusive.
pub fn normalize_months(aggregates: &BTreeMap<MonthKey, MonthAggregate>) -> Vec<MonthRecord> {
    let (Some((&first, _)), Some((&last, _))) =
        (aggregates.first_key_value(), aggregates.last_key_value())
    else {
        return Vec::new();
    };

    let mut series = Vec::new();
    let mut month = first;
    while month <= last {
        let record = aggregates.get(&month).map_or_else(
            || MonthRecord::empty(month),
            |aggregate| MonthRecord::from_aggregate(month, aggregate),
        );
        series.push(record);
        month = month.next();
    }
    series
}

/// Mean of `metric` across the series, `0.0` for an empty series.
pub fn reference_value(series: &[MonthRecord], metric: Metric) -> f64 {
    if series.is_empty() {
        return 0.0;
    }
    series.iter().map(|record| record.value(metric)).sum::<f64>() / series.len() as f64
}

pub fn monthly_chart(
    records: &[CompletedBookRecord],
    criteria: &FilterCriteria,
    metric: Metric,
) -> ChartData {
    let filtered = filter_records(records, criteria);
    let aggregates = aggregate_by_month(filtered);
    let series = normalize_months(&aggregates);
    let reference_value = reference_value(&series, metric);

    ChartData {
        series,
        reference_value,
        metric_key: metric,
    }
}
