use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::product::Product;

/// Filter submitted from the filter bar.
///
/// The date range only applies when both ends are present. Calendar days are
/// interpreted in UTC.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Case-insensitive title substring.
    #[serde(default)]
    pub title: Option<String>,
    /// First calendar day of the creation date range (inclusive).
    #[serde(default)]
    pub date_start: Option<NaiveDate>,
    /// Last calendar day of the creation date range (inclusive).
    #[serde(default)]
    pub date_end: Option<NaiveDate>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn created_between(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.date_start = Some(start);
        self.date_end = Some(end);
        self
    }

    /// Trim the title and drop it when blank. A reversed date pair is swapped.
    pub fn normalized(mut self) -> Self {
        self.title = self
            .title
            .map(|title| title.trim().to_string())
            .filter(|title| !title.is_empty());

        if let (Some(start), Some(end)) = (self.date_start, self.date_end)
            && start > end
        {
            log::warn!("Date range {start}..{end} is reversed, swapping the bounds");
            self.date_start = Some(end);
            self.date_end = Some(start);
        }
        self
    }

    /// Title term to search for, if any.
    pub fn title_term(&self) -> Option<&str> {
        self.title
            .as_deref()
            .map(str::trim)
            .filter(|title| !title.is_empty())
    }

    /// Creation date window, present only when both dates are supplied.
    pub fn date_range(&self) -> Option<DateRange> {
        match (self.date_start, self.date_end) {
            (Some(start), Some(end)) => Some(DateRange::between(start, end)),
            _ => None,
        }
    }

    /// Whether any filtering applies at all.
    pub fn is_empty(&self) -> bool {
        self.title_term().is_none() && self.date_range().is_none()
    }

    /// Resolve the criteria once for matching many products.
    pub fn matcher(&self) -> CriteriaMatcher {
        CriteriaMatcher {
            term: self.title_term().map(str::to_lowercase),
            range: self.date_range(),
        }
    }
}

/// Title and date conditions of a [`FilterCriteria`], ready to apply.
#[derive(Debug, Clone, PartialEq)]
pub struct CriteriaMatcher {
    /// Lowercased title term.
    term: Option<String>,
    range: Option<DateRange>,
}

impl CriteriaMatcher {
    /// Whether `product` passes both the title and the date conditions.
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(term) = self.term.as_deref()
            && !product.title.to_lowercase().contains(term)
        {
            return false;
        }

        match self.range {
            Some(range) => range.contains_product(product),
            None => true,
        }
    }
}

/// Inclusive window `[start of first day, end of last day]` in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    /// Build the window covering both calendar days. A reversed pair is swapped.
    pub fn between(first: NaiveDate, last: NaiveDate) -> Self {
        let (first, last) = if first <= last {
            (first, last)
        } else {
            (last, first)
        };

        Self {
            start: first.and_time(NaiveTime::MIN).and_utc(),
            end: end_of_day(last),
        }
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }

    /// Products without a parseable creation timestamp never match.
    pub fn contains_product(&self, product: &Product) -> bool {
        product
            .created_at()
            .is_some_and(|created| self.contains(created))
    }
}

fn end_of_day(day: NaiveDate) -> DateTime<Utc> {
    let last_instant =
        NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999).unwrap_or(NaiveTime::MIN);
    day.and_time(last_instant).and_utc()
}
