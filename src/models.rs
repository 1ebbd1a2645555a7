use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Calendar year as a timestamp (January 1st).
pub fn year_date(year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 1, 1)
}

/// One cell of the source table: a year and, if the cell held a number, its value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearValue {
    pub year: NaiveDate,
    pub value: Option<f64>,
}

impl YearValue {
    pub fn new(year: NaiveDate, value: Option<f64>) -> Self {
        Self { year, value }
    }
}

/// One row of the table: a country and its chronological values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountrySeries {
    pub country_name: String,
    pub values: Vec<YearValue>,
    pub default_visible: bool,
}

impl CountrySeries {
    /// Values that are present, in chronological order.
    pub fn present(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.values
            .iter()
            .filter_map(|yv| yv.value.map(|v| (yv.year, v)))
    }

    /// The last year that has a value. Labels are anchored here.
    pub fn last_present(&self) -> Option<(NaiveDate, f64)> {
        self.values
            .iter()
            .rev()
            .find_map(|yv| yv.value.map(|v| (yv.year, v)))
    }

    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|yv| yv.value.is_none()).count()
    }

    /// (min, max) over present values.
    pub fn extent(&self) -> Option<(f64, f64)> {
        self.present().fold(None, |acc, (_, v)| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }
}

/// A loaded table: the year headers plus one series per row, in source order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub years: Vec<NaiveDate>,
    pub series: Vec<CountrySeries>,
}

impl Dataset {
    pub fn country_names(&self) -> impl Iterator<Item = &str> {
        self.series.iter().map(|s| s.country_name.as_str())
    }

    /// (min, max) over every present value in the table.
    pub fn value_extent(&self) -> Option<(f64, f64)> {
        self.series
            .iter()
            .filter_map(CountrySeries::extent)
            .fold(None, |acc, (lo, hi)| match acc {
                None => Some((lo, hi)),
                Some((a, b)) => Some((a.min(lo), b.max(hi))),
            })
    }

    /// (first, last) year header.
    pub fn year_extent(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.years.iter().min()?;
        let max = self.years.iter().max()?;
        Some((*min, *max))
    }
}
