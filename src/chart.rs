//! Chart session: everything built once after a successful load.
//!
//! A [`Chart`] owns the dataset, the scales, each series' path geometry, the visibility
//! state and the animator. Renderers read from it; the toggle handler and the entrance
//! sequence are the only writers.

use crate::animate::{Animator, Direction, SeriesFrame, Timing};
use crate::config::ChartConfig;
use crate::curve::{PathGeometry, Point};
use crate::error::Result;
use crate::loader::{self, Source};
use crate::models::{CountrySeries, Dataset};
use crate::scale::Scales;
use crate::toggle::{ToggleController, Visibility};
use crate::viz::text::estimate_text_width_px;
use plotters::style::RGBColor;
use std::time::Duration;

/// Label font size in pixels, shared by the SVG and GUI renderers.
pub const LABEL_FONT_PX: u32 = 12;
/// Horizontal gap between a series' last point and its label.
pub const LABEL_DX: f64 = 3.0;

/// Pre-computed drawing data for one series, in plot-area coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesGeometry {
    pub path: PathGeometry,
    pub total_length: f64,
    /// Where the country label sits: the last point that has a value.
    pub label_anchor: Option<Point>,
    pub color: RGBColor,
}

#[derive(Debug, Clone)]
pub struct Chart {
    config: ChartConfig,
    data: Dataset,
    scales: Scales,
    geometry: Vec<SeriesGeometry>,
    toggles: ToggleController,
    animator: Animator,
}

impl Chart {
    /// Build scales and geometry, and initialize every dash array once.
    pub fn new(data: Dataset, config: ChartConfig) -> Result<Self> {
        let scales = Scales::build(&data, &config)?;
        let geometry: Vec<SeriesGeometry> = data
            .series
            .iter()
            .enumerate()
            .map(|(i, s)| series_geometry(s, &scales, i))
            .collect();

        for (s, g) in data.series.iter().zip(&geometry) {
            let w = estimate_text_width_px(&s.country_name, LABEL_FONT_PX) as f64;
            if g.label_anchor.is_some_and(|p| p.x + LABEL_DX + w > config.width + config.margins.right) {
                log::warn!("label {:?} may be clipped by the right margin", s.country_name);
            }
        }

        let toggles = ToggleController::new(
            data.series
                .iter()
                .map(|s| (s.country_name.as_str(), s.default_visible)),
        );
        let mut animator = Animator::new(data.series.len());
        for (i, g) in geometry.iter().enumerate() {
            animator.init_dash(i, g.total_length);
        }

        Ok(Self {
            config,
            data,
            scales,
            geometry,
            toggles,
            animator,
        })
    }

    /// Load from a source and build the session. Nothing is drawn if this fails.
    pub fn load(source: &Source, config: ChartConfig) -> Result<Self> {
        let data = loader::load(source, &config.default_visible)?;
        Self::new(data, config)
    }

    /// Entrance sequence: reveal every default-visible series. Returns how many started.
    pub fn start(&mut self, now: Duration) -> usize {
        let timing = self.entrance_timing();
        let mut started = 0;
        for (i, s) in self.data.series.iter().enumerate() {
            if s.default_visible {
                self.animator.reveal(i, timing, now);
                started += 1;
            }
        }
        log::info!("entrance: revealing {started} of {} series", self.data.series.len());
        started
    }

    /// Checkbox change for the series bound to `key`. Returns false for unknown keys.
    pub fn set_checked(&mut self, key: &str, checked: bool, now: Duration) -> bool {
        let Some(action) = self.toggles.on_change(key, checked) else {
            return false;
        };
        let timing = match action.direction {
            Direction::Reveal => self.reveal_timing(),
            Direction::Hide => self.hide_timing(),
        };
        self.animator.start(action.index, action.direction, timing, now);
        true
    }

    /// Same as [`Chart::set_checked`], addressed by country name.
    pub fn set_country_checked(&mut self, country: &str, checked: bool, now: Duration) -> bool {
        match self.index_of_country(country) {
            Some(i) => {
                let key = self.toggles.key(i).unwrap_or_default().to_string();
                self.set_checked(&key, checked, now)
            }
            None => {
                log::warn!("unknown country {country:?}");
                false
            }
        }
    }

    /// Advance transitions to `now`. Returns true while anything is still moving.
    pub fn tick(&mut self, now: Duration) -> bool {
        self.animator.tick(now)
    }

    pub fn is_animating(&self) -> bool {
        self.animator.is_animating()
    }

    pub fn settle_time(&self) -> Option<Duration> {
        self.animator.settle_time()
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn series(&self) -> &[CountrySeries] {
        &self.data.series
    }

    pub fn scales(&self) -> &Scales {
        &self.scales
    }

    pub fn geometry(&self, idx: usize) -> Option<&SeriesGeometry> {
        self.geometry.get(idx)
    }

    pub fn frame(&self, idx: usize) -> Option<SeriesFrame> {
        self.animator.frame(idx)
    }

    pub fn key(&self, idx: usize) -> Option<&str> {
        self.toggles.key(idx)
    }

    pub fn visibility(&self, idx: usize) -> Option<Visibility> {
        self.toggles.state(idx)
    }

    pub fn is_running(&self, idx: usize) -> bool {
        self.animator.is_running(idx)
    }

    pub fn index_of_key(&self, key: &str) -> Option<usize> {
        self.toggles.index_of(key)
    }

    pub fn index_of_country(&self, country: &str) -> Option<usize> {
        self.data
            .series
            .iter()
            .position(|s| s.country_name == country)
    }

    pub fn entrance_timing(&self) -> Timing {
        let d = Duration::from_millis(self.config.entrance_duration_ms);
        Timing { path: d, label: d }
    }

    pub fn reveal_timing(&self) -> Timing {
        Timing {
            path: Duration::from_millis(self.config.reveal_duration_ms),
            label: Duration::from_millis(self.config.label_fade_ms),
        }
    }

    pub fn hide_timing(&self) -> Timing {
        Timing {
            path: Duration::from_millis(self.config.hide_duration_ms),
            label: Duration::from_millis(self.config.label_fade_ms),
        }
    }
}

fn series_geometry(s: &CountrySeries, scales: &Scales, idx: usize) -> SeriesGeometry {
    let points: Vec<Option<Point>> = s
        .values
        .iter()
        .map(|yv| {
            yv.value
                .map(|v| Point::new(scales.x.map(yv.year), scales.y.map(v)))
        })
        .collect();
    let path = PathGeometry::basis(&points);
    let total_length = path.total_length();
    let label_anchor = s
        .last_present()
        .map(|(year, v)| Point::new(scales.x.map(year), scales.y.map(v)));
    SeriesGeometry {
        path,
        total_length,
        label_anchor,
        color: scales.z.color_at(idx),
    }
}
