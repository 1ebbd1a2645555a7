use chrono::Datelike;
use epc_chart::loader::{self, Source};
use epc_chart::{ChartConfig, ChartError};
use std::collections::BTreeSet;
use std::io::Write;
use std::path::PathBuf;

fn sample_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/EPC_2000_2010.csv")
}

fn none() -> BTreeSet<String> {
    BTreeSet::new()
}

#[test]
fn every_row_has_one_value_per_year_column() {
    let cfg = ChartConfig::default();
    let data = loader::load_csv(sample_path(), &cfg.default_visible).unwrap();
    assert_eq!(data.years.len(), 11);
    assert_eq!(data.years[0].year(), 2000);
    assert_eq!(data.years[10].year(), 2010);
    for s in &data.series {
        assert_eq!(s.values.len(), data.years.len(), "{}", s.country_name);
        let years: Vec<_> = s.values.iter().map(|v| v.year).collect();
        assert_eq!(years, data.years);
    }
}

#[test]
fn default_visible_flags_follow_config() {
    let cfg = ChartConfig::default();
    let data = loader::load(&Source::parse(sample_path().to_str().unwrap()), &cfg.default_visible)
        .unwrap();
    let visible: Vec<&str> = data
        .series
        .iter()
        .filter(|s| s.default_visible)
        .map(|s| s.country_name.as_str())
        .collect();
    assert_eq!(
        visible,
        ["Brazil", "China", "India", "Russia", "South Africa", "United States"]
    );
}

#[test]
fn empty_and_text_cells_become_missing() {
    let csv = "Country,2000,2001,2002\nChad,1.5,,n/a\n\"Korea, South\", 2 ,3,4\n";
    let data = loader::load_from_reader(csv.as_bytes(), &none()).unwrap();
    let chad = &data.series[0];
    assert_eq!(chad.values[0].value, Some(1.5));
    assert_eq!(chad.values[1].value, None);
    assert_eq!(chad.values[2].value, None);
    assert_eq!(data.series[1].country_name, "Korea, South");
    assert_eq!(data.series[1].values[0].value, Some(2.0));
}

#[test]
fn header_bom_is_tolerated() {
    let csv = "\u{feff}Country,2000\nChad,1\n";
    let data = loader::load_from_reader(csv.as_bytes(), &none()).unwrap();
    assert_eq!(data.series.len(), 1);
}

#[test]
fn malformed_tables_are_rejected() {
    let cases: [(&str, fn(&ChartError) -> bool); 7] = [
        ("Nation,2000\nChad,1\n", |e| {
            matches!(e, ChartError::MissingCountryColumn { found } if found == "Nation")
        }),
        ("Country\nChad\n", |e| matches!(e, ChartError::NoYearColumns)),
        ("Country,2000,year\nChad,1,2\n", |e| {
            matches!(e, ChartError::InvalidYear { header } if header == "year")
        }),
        ("Country,2000,2000\nChad,1,2\n", |e| matches!(e, ChartError::DuplicateYear { .. })),
        ("Country,2000,2001\nChad,1\n", |e| matches!(e, ChartError::Csv(_))),
        ("Country,2000\nChad,1\nChad,2\n", |e| {
            matches!(e, ChartError::DuplicateCountry(n) if n == "Chad")
        }),
        ("Country,2000\n,1\n", |e| matches!(e, ChartError::EmptyCountryName { row: 2 })),
    ];
    for (csv, check) in cases {
        let err = loader::load_from_reader(csv.as_bytes(), &none()).unwrap_err();
        assert!(check(&err), "{csv:?} gave {err:?}");
    }
}

#[test]
fn header_only_table_has_no_rows() {
    let err = loader::load_from_reader("Country,2000\n".as_bytes(), &none()).unwrap_err();
    assert!(matches!(err, ChartError::NoRows));
}

#[test]
fn missing_file_is_io_error() {
    let err = loader::load_csv("/definitely/not/here.csv", &none()).unwrap_err();
    assert!(matches!(err, ChartError::Io { .. }));
}

#[test]
fn file_on_disk_round_trips_through_loader() {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    writeln!(f, "Country,2009,2010").unwrap();
    writeln!(f, "India,17.1,18.1").unwrap();
    let data = loader::load_csv(f.path(), &none()).unwrap();
    assert_eq!(data.series[0].values[1].value, Some(18.1));
    assert!(!data.series[0].default_visible);
}

#[test]
fn unreachable_url_is_http_error() {
    // Port 9 (discard) is closed on test machines, so the connection is refused.
    let err = loader::load(&Source::parse("http://127.0.0.1:9/epc.csv"), &none()).unwrap_err();
    assert!(matches!(err, ChartError::Http { .. }), "{err:?}");
}
