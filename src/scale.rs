//! Scale builder: time (x), value (y) and color (z) mappings computed once after load.

use crate::config::ChartConfig;
use crate::error::{ChartError, Result};
use crate::models::{Dataset, year_date};
use crate::viz::util::palette_colors;
use chrono::{Datelike, NaiveDate};
use plotters::coord::ranged1d::Ranged;
use plotters::coord::types::{RangedCoordf64, RangedCoordi32};
use plotters::style::RGBColor;

/// Linear map from calendar dates to pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    pub domain: (NaiveDate, NaiveDate),
    pub range: (f64, f64),
}

impl TimeScale {
    pub fn map(&self, date: NaiveDate) -> f64 {
        let (d0, d1) = self.domain;
        let span = (d1 - d0).num_days() as f64;
        if span <= 0.0 {
            return (self.range.0 + self.range.1) / 2.0;
        }
        let t = (date - d0).num_days() as f64 / span;
        self.range.0 + t * (self.range.1 - self.range.0)
    }

    /// Whole-year ticks inside the domain, roughly `count` of them.
    pub fn ticks(&self, count: usize) -> Vec<NaiveDate> {
        let (y0, y1) = (self.domain.0.year(), self.domain.1.year());
        let mut years: Vec<i32> = RangedCoordi32::from(y0..y1)
            .key_points(count.max(2))
            .into_iter()
            .filter(|y| (y0..=y1).contains(y))
            .collect();
        if years.is_empty() {
            years = vec![y0, y1];
        }
        years.dedup();
        years.into_iter().filter_map(year_date).collect()
    }
}

/// Linear map from values to pixels. The y scale has an inverted range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl LinearScale {
    pub fn map(&self, v: f64) -> f64 {
        let (d0, d1) = self.domain;
        let span = d1 - d0;
        if span.abs() < f64::EPSILON {
            return (self.range.0 + self.range.1) / 2.0;
        }
        self.range.0 + (v - d0) / span * (self.range.1 - self.range.0)
    }

    /// Nice tick values inside the domain, at most `count` of them.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (d0, d1) = self.domain;
        if !(d1 - d0).is_finite() {
            return vec![d0, d1];
        }
        let mut ticks: Vec<f64> = RangedCoordf64::from(d0..d1)
            .key_points(count.max(2))
            .into_iter()
            .filter(|v| *v >= d0 - 1e-9 && *v <= d1 + 1e-9)
            .collect();
        if ticks.is_empty() {
            ticks = vec![d0, d1];
        }
        ticks
    }

    /// Distance between consecutive ticks; drives label precision.
    pub fn tick_step(&self, count: usize) -> f64 {
        let t = self.ticks(count);
        match t.as_slice() {
            [a, b, ..] => (b - a).abs(),
            _ => (self.domain.1 - self.domain.0).abs(),
        }
    }
}

/// Categorical color by country, assigned by load index and wrapping.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorScale {
    pub domain: Vec<String>,
    pub palette: Vec<RGBColor>,
}

impl ColorScale {
    pub fn color_at(&self, idx: usize) -> RGBColor {
        self.palette[idx % self.palette.len()]
    }

    pub fn color(&self, country: &str) -> Option<RGBColor> {
        self.domain
            .iter()
            .position(|c| c == country)
            .map(|i| self.color_at(i))
    }
}

/// All three scales. Built once, read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Scales {
    pub x: TimeScale,
    pub y: LinearScale,
    pub z: ColorScale,
}

impl Scales {
    pub fn build(data: &Dataset, config: &ChartConfig) -> Result<Self> {
        let (mut first, mut last) = data.year_extent().ok_or(ChartError::NoYearColumns)?;
        if first == last {
            let y = first.year();
            first = year_date(y - 1).unwrap_or(first);
            last = year_date(y + 1).unwrap_or(last);
        }

        let (mut lo, mut hi) = data.value_extent().ok_or(ChartError::NoNumericValues)?;
        if !(hi - lo).is_finite() {
            return Err(ChartError::ValueRangeOverflow { lo, hi });
        }
        if (hi - lo).abs() < f64::EPSILON {
            lo -= 1.0;
            hi += 1.0;
        }

        let palette = palette_colors(&config.palette)?;
        Ok(Self {
            x: TimeScale {
                domain: (first, last),
                range: (0.0, config.width),
            },
            y: LinearScale {
                domain: (lo, hi),
                range: (config.height, 0.0),
            },
            z: ColorScale {
                domain: data.country_names().map(String::from).collect(),
                palette,
            },
        })
    }
}
