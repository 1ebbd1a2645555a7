//! Data loader: reads a `Country,<year>,<year>,...` CSV table into a [`Dataset`].
//!
//! The resource can be a local path or an `http(s)://` URL. Cells that are empty or not
//! numeric become missing values; everything structurally wrong with the table is a
//! [`ChartError`] and no chart is drawn.
//!
//! ```no_run
//! # use epc_chart::loader::{self, Source};
//! let cfg = epc_chart::ChartConfig::default();
//! let data = loader::load(&Source::parse("EPC_2000_2010.csv"), &cfg.default_visible)?;
//! assert!(!data.series.is_empty());
//! # Ok::<(), epc_chart::ChartError>(())
//! ```

use crate::error::{ChartError, Result};
use crate::models::{CountrySeries, Dataset, YearValue, year_date};
use ahash::AHashSet;
use chrono::NaiveDate;
use csv::{ReaderBuilder, Trim};
use reqwest::blocking::Client as HttpClient;
use reqwest::redirect::Policy;
use std::collections::BTreeSet;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

const COUNTRY_HEADER: &str = "Country";

/// Where the CSV comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Path(PathBuf),
    Url(String),
}

impl Source {
    /// `http://` and `https://` are URLs; anything else is a filesystem path.
    pub fn parse(s: &str) -> Self {
        let t = s.trim();
        let lower = t.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Source::Url(t.to_string())
        } else {
            Source::Path(PathBuf::from(t))
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::Path(p) => write!(f, "{}", p.display()),
            Source::Url(u) => f.write_str(u),
        }
    }
}

/// Load a dataset from any [`Source`].
pub fn load(source: &Source, default_visible: &BTreeSet<String>) -> Result<Dataset> {
    log::info!("loading {source}");
    match source {
        Source::Path(p) => load_csv(p, default_visible),
        Source::Url(u) => {
            let body = fetch_text(u)?;
            load_from_reader(body.as_bytes(), default_visible)
        }
    }
}

/// Load a dataset from a CSV file on disk.
pub fn load_csv<P: AsRef<Path>>(path: P, default_visible: &BTreeSet<String>) -> Result<Dataset> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|source| ChartError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_from_reader(file, default_visible)
}

/// Parse a dataset from any reader producing UTF-8 CSV.
pub fn load_from_reader<R: Read>(rdr: R, default_visible: &BTreeSet<String>) -> Result<Dataset> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .trim(Trim::All)
        .from_reader(rdr);

    let headers = rdr.headers()?.clone();
    let first = headers
        .get(0)
        .unwrap_or("")
        .trim_start_matches('\u{feff}')
        .trim();
    if first != COUNTRY_HEADER {
        return Err(ChartError::MissingCountryColumn {
            found: first.to_string(),
        });
    }

    // (year, column index), sorted by year so every series runs forward in time.
    let mut columns: Vec<(NaiveDate, usize)> =
        Vec::with_capacity(headers.len().saturating_sub(1));
    for (col, h) in headers.iter().enumerate().skip(1) {
        let year = parse_year(h).ok_or_else(|| ChartError::InvalidYear {
            header: h.to_string(),
        })?;
        if columns.iter().any(|(y, _)| *y == year) {
            return Err(ChartError::DuplicateYear {
                header: h.to_string(),
            });
        }
        columns.push((year, col));
    }
    if columns.is_empty() {
        return Err(ChartError::NoYearColumns);
    }
    if !columns.is_sorted() {
        log::debug!("year columns are out of order, sorting them");
        columns.sort_unstable();
    }
    let years: Vec<NaiveDate> = columns.iter().map(|(y, _)| *y).collect();

    let mut seen: AHashSet<String> = AHashSet::new();
    let mut series = Vec::new();
    for (i, record) in rdr.records().enumerate() {
        let record = record?;
        // Header is row 1.
        let row = i + 2;
        let name = record.get(0).unwrap_or("").trim();
        if name.is_empty() {
            return Err(ChartError::EmptyCountryName { row });
        }
        if !seen.insert(name.to_string()) {
            return Err(ChartError::DuplicateCountry(name.to_string()));
        }

        let values: Vec<YearValue> = columns
            .iter()
            .map(|&(year, col)| {
                let cell = record.get(col).unwrap_or("");
                let value = parse_cell(cell);
                if value.is_none() && !cell.is_empty() {
                    log::debug!("{name}: non-numeric cell {cell:?} treated as missing");
                }
                YearValue::new(year, value)
            })
            .collect();

        series.push(CountrySeries {
            country_name: name.to_string(),
            values,
            default_visible: default_visible.contains(name),
        });
    }

    if series.is_empty() {
        return Err(ChartError::NoRows);
    }
    log::debug!("loaded {} series x {} years", series.len(), years.len());
    Ok(Dataset { years, series })
}

/// Four ASCII digits, e.g. `"2004"`.
pub fn parse_year(header: &str) -> Option<NaiveDate> {
    let h = header.trim();
    if h.len() != 4 || !h.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    year_date(h.parse().ok()?)
}

/// Numeric cell or missing. Non-finite numbers are missing too.
pub fn parse_cell(cell: &str) -> Option<f64> {
    let c = cell.trim();
    if c.is_empty() {
        return None;
    }
    c.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn fetch_text(url: &str) -> Result<String> {
    let http_err = |source| ChartError::Http {
        url: url.to_string(),
        source,
    };
    let http = HttpClient::builder()
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(5))
        .user_agent(concat!("epc_chart/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(http_err)?;
    let resp = http.get(url).send().map_err(http_err)?;
    let status = resp.status();
    if !status.is_success() {
        return Err(ChartError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    resp.text().map_err(http_err)
}
