use epc_chart::loader::load_from_reader;
use epc_chart::{Chart, ChartConfig, Visibility};
use std::time::Duration;

const THREE_BY_THREE: &str = "\
Country,2000,2001,2002
Brazil,50,55,60
China,30,45,70
Chad,1,2,3
";

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn config() -> ChartConfig {
    ChartConfig {
        default_visible: ["Brazil".to_string(), "China".to_string()].into(),
        ..ChartConfig::default()
    }
}

fn chart() -> Chart {
    let cfg = config();
    let data = load_from_reader(THREE_BY_THREE.as_bytes(), &cfg.default_visible).unwrap();
    Chart::new(data, cfg).unwrap()
}

fn settle(chart: &mut Chart) {
    let end = chart.settle_time().unwrap_or_default();
    assert!(!chart.tick(end));
}

#[test]
fn value_scale_bounds_every_value() {
    let c = chart();
    let (lo, hi) = c.scales().y.domain;
    for s in c.series() {
        for (_, v) in s.present() {
            assert!(lo <= v && v <= hi, "{v} outside [{lo}, {hi}]");
        }
    }
    assert_eq!((lo, hi), (1.0, 70.0));
}

#[test]
fn dash_arrays_are_initialized_before_any_transition() {
    let c = chart();
    for i in 0..3 {
        let g = c.geometry(i).unwrap();
        let f = c.frame(i).unwrap();
        assert!(g.total_length > 0.0);
        assert_eq!(f.dash_array, Some((g.total_length, g.total_length)));
        assert_eq!(f.dash_offset, g.total_length);
        assert_eq!(f.label_opacity, 0.0);
    }
    assert!(!c.is_animating());
}

#[test]
fn entrance_reveals_only_default_visible_series() {
    let mut c = chart();
    assert_eq!(c.start(ms(0)), 2);
    let running: Vec<bool> = (0..3).map(|i| c.is_running(i)).collect();
    assert_eq!(running, [true, true, false]);

    settle(&mut c);
    let opaque = (0..3)
        .filter(|&i| c.frame(i).unwrap().label_opacity == 1.0)
        .count();
    assert_eq!(opaque, 2);
    for i in 0..2 {
        assert_eq!(c.frame(i).unwrap().dash_offset, 0.0);
    }
    let chad = c.frame(2).unwrap();
    assert_eq!(chad.label_opacity, 0.0);
    assert_eq!(chad.dash_offset, c.geometry(2).unwrap().total_length);
    assert_eq!(c.visibility(2), Some(Visibility::Hidden));
}

#[test]
fn entrance_is_half_way_at_half_duration() {
    let mut c = chart();
    c.start(ms(0));
    c.tick(ms(1000));
    let f = c.frame(0).unwrap();
    let len = c.geometry(0).unwrap().total_length;
    assert!((f.dash_offset - len / 2.0).abs() < 1e-9);
    assert!((f.visible_length() - len / 2.0).abs() < 1e-9);
}

#[test]
fn toggle_off_then_on_ends_visible() {
    let mut c = chart();
    c.start(ms(0));
    c.tick(ms(2000));

    let key = c.key(0).unwrap().to_string();
    assert!(c.set_checked(&key, false, ms(2500)));
    c.tick(ms(2600));
    assert!(c.frame(0).unwrap().dash_offset > 0.0);
    assert!(c.set_checked(&key, true, ms(2600)));

    settle(&mut c);
    let f = c.frame(0).unwrap();
    assert_eq!(c.visibility(0), Some(Visibility::Visible));
    assert_eq!(f.label_opacity, 1.0);
    assert_eq!(f.dash_offset, 0.0);
}

#[test]
fn hidden_series_round_trip_matches_never_revealed() {
    let mut c = chart();
    let before = c.frame(2).unwrap();

    assert!(c.set_country_checked("Chad", true, ms(0)));
    assert_eq!(c.visibility(2), Some(Visibility::Visible));
    c.tick(ms(2000));
    assert_eq!(c.frame(2).unwrap().dash_offset, 0.0);

    assert!(c.set_country_checked("Chad", false, ms(2000)));
    settle(&mut c);
    assert_eq!(c.frame(2).unwrap(), before);
    assert_eq!(c.visibility(2), Some(Visibility::Hidden));
}

#[test]
fn unknown_checkbox_is_ignored() {
    let mut c = chart();
    c.start(ms(0));
    assert!(!c.set_checked("Atlantis", true, ms(10)));
    assert!(!c.set_country_checked("Atlantis", true, ms(10)));
    assert_eq!(c.visibility(0), Some(Visibility::Visible));
}

#[test]
fn keys_are_dom_safe() {
    let cfg = ChartConfig::default();
    let csv = "Country,2000,2001\nUnited States,1,2\nUnited-States,3,4\n";
    let data = load_from_reader(csv.as_bytes(), &cfg.default_visible).unwrap();
    let c = Chart::new(data, cfg).unwrap();
    assert_eq!(c.key(0), Some("United_States"));
    assert_eq!(c.key(1), Some("United_States_2"));
    assert_eq!(c.index_of_key("United_States_2"), Some(1));
}

#[test]
fn table_without_numbers_cannot_be_charted() {
    let cfg = ChartConfig::default();
    let data = load_from_reader("Country,2000\nChad,\n".as_bytes(), &cfg.default_visible).unwrap();
    let err = Chart::new(data, cfg).unwrap_err();
    assert!(matches!(err, epc_chart::ChartError::NoNumericValues));
}

#[test]
fn colors_follow_load_order() {
    let c = chart();
    let z = &c.scales().z;
    assert_eq!(z.domain, ["Brazil", "China", "Chad"]);
    assert_eq!(c.geometry(1).unwrap().color, z.color("China").unwrap());
    assert_ne!(c.geometry(0).unwrap().color, c.geometry(1).unwrap().color);
}

#[test]
fn unordered_year_columns_still_draw_left_to_right() {
    let cfg = ChartConfig::default();
    let csv = "Country,2002,2000,2001\nChina,70,30,45\n";
    let data = load_from_reader(csv.as_bytes(), &cfg.default_visible).unwrap();
    let c = Chart::new(data, cfg).unwrap();
    let g = c.geometry(0).unwrap();

    let anchor = g.label_anchor.unwrap();
    assert_eq!(anchor.x, c.config().width);
    assert_eq!(anchor.y, c.scales().y.map(70.0));

    let xs: Vec<f64> = g
        .path
        .prefix(g.total_length)
        .concat()
        .iter()
        .map(|p| p.x)
        .collect();
    assert!(xs.windows(2).all(|w| w[1] >= w[0] - 1e-9), "{xs:?}");
}

#[test]
fn value_range_wider_than_a_float_is_a_load_error() {
    let cfg = ChartConfig::default();
    let data = load_from_reader("Country,2000,2001\nA,1e308,-1e308\n".as_bytes(), &cfg.default_visible)
        .unwrap();
    let err = Chart::new(data, cfg).unwrap_err();
    assert!(matches!(err, epc_chart::ChartError::ValueRangeOverflow { .. }));
}
