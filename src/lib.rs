//! epc_chart
//!
//! Render an animated multi-series line chart (one line per country, one point per year)
//! from a `Country,<year>,<year>,...` CSV table. Pairs with the `epc-chart` CLI and the
//! `epc-chart-gui` desktop app.
//!
//! ### Features
//! - Load the table from a file or an `http(s)://` URL; empty cells become gaps
//! - Time / value / color scales computed once after load
//! - Basis-spline series paths with end-of-line country labels
//! - Dash-offset reveal/hide transitions driven by an explicit clock
//! - Per-series Visible/Hidden toggles bound through collision-free keys
//! - SVG snapshots, frame sequences and self-animating SVG output
//!
//! ### Example
//! ```no_run
//! use epc_chart::{Chart, ChartConfig, Source};
//! use std::time::Duration;
//!
//! let mut chart = Chart::load(&Source::parse("EPC_2000_2010.csv"), ChartConfig::default())?;
//! chart.start(Duration::ZERO);
//! chart.set_country_checked("Germany", true, Duration::from_millis(500));
//! chart.tick(Duration::from_secs(3));
//! epc_chart::export::save_svg(&chart, "epc.svg")?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod animate;
pub mod chart;
pub mod config;
pub mod curve;
pub mod error;
pub mod export;
pub mod loader;
pub mod models;
pub mod scale;
pub mod toggle;
pub mod viz;

pub use chart::Chart;
pub use config::ChartConfig;
pub use error::ChartError;
pub use loader::Source;
pub use models::{CountrySeries, Dataset, YearValue};
pub use toggle::Visibility;
