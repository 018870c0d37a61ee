//! Extraction window and its day partitions

use super::expression::{resolve_date, DATE_FORMAT, DATE_TIME_FORMAT};
use crate::error::{Error, Result};
use chrono::{NaiveDate, NaiveDateTime};
use std::fmt;

/// Inclusive time window of one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub from: NaiveDateTime,
    pub until: NaiveDateTime,
}

impl DateWindow {
    pub fn new(from: NaiveDateTime, until: NaiveDateTime) -> Self {
        Self { from, until }
    }

    /// Resolve both ends from date expressions, relative to `now`
    pub fn resolve(from: &str, until: &str, now: NaiveDateTime) -> Result<Self> {
        let window = Self::new(
            resolve_date("date.from", from, now)?,
            resolve_date("date.until", until, now)?,
        );

        if window.from > window.until {
            return Err(Error::invalid_value(
                "date",
                format!(
                    "'from' ({}) is after 'until' ({})",
                    window.from_string(),
                    window.until_string()
                ),
            ));
        }

        Ok(window)
    }

    /// Start formatted as `YYYY-MM-DD HH:MM:SS`
    pub fn from_string(&self) -> String {
        self.from.format(DATE_TIME_FORMAT).to_string()
    }

    /// End formatted as `YYYY-MM-DD HH:MM:SS`
    pub fn until_string(&self) -> String {
        self.until.format(DATE_TIME_FORMAT).to_string()
    }

    /// One partition per calendar day touched by the window, in order
    pub fn days(&self) -> Vec<DayPartition> {
        let last = self.until.date();
        self.from
            .date()
            .iter_days()
            .take_while(|day| *day <= last)
            .map(DayPartition::new)
            .collect()
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.from_string(), self.until_string())
    }
}

/// One calendar day of a report window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayPartition {
    pub date: NaiveDate,
}

impl DayPartition {
    pub fn new(date: NaiveDate) -> Self {
        Self { date }
    }

    /// Day label, `YYYY-MM-DD`
    pub fn label(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }

    /// `YYYY-MM-DD 00:00:00`
    pub fn start(&self) -> String {
        format!("{} 00:00:00", self.label())
    }

    /// `YYYY-MM-DD 23:59:59`
    pub fn end(&self) -> String {
        format!("{} 23:59:59", self.label())
    }
}
