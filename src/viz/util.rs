//! Utility functions for visualization: palettes, color strings, locale-aware tick labels.

use crate::config::Palette;
use crate::error::{ChartError, Result};
use num_format::{Locale, ToFormattedString};
use plotters::style::RGBColor;

/// Ten-color categorical scheme used by most charting toolkits.
const CATEGORY10: [RGBColor; 10] = [
    RGBColor(31, 119, 180),  // blue    (#1f77b4)
    RGBColor(255, 127, 14),  // orange  (#ff7f0e)
    RGBColor(44, 160, 44),   // green   (#2ca02c)
    RGBColor(214, 39, 40),   // red     (#d62728)
    RGBColor(148, 103, 189), // purple  (#9467bd)
    RGBColor(140, 86, 75),   // brown   (#8c564b)
    RGBColor(227, 119, 194), // pink    (#e377c2)
    RGBColor(127, 127, 127), // gray    (#7f7f7f)
    RGBColor(188, 189, 34),  // olive   (#bcbd22)
    RGBColor(23, 190, 207),  // cyan    (#17becf)
];

/// Microsoft Office (2013+) chart series palette.
const OFFICE10: [RGBColor; 10] = [
    RGBColor(68, 114, 196),  // blue      (#4472C4)
    RGBColor(237, 125, 49),  // orange    (#ED7D31)
    RGBColor(165, 165, 165), // gray      (#A5A5A5)
    RGBColor(255, 192, 0),   // gold      (#FFC000)
    RGBColor(91, 155, 213),  // light blue(#5B9BD5)
    RGBColor(112, 173, 71),  // green     (#70AD47)
    RGBColor(38, 68, 120),   // dark blue (#264478)
    RGBColor(158, 72, 14),   // dark org. (#9E480E)
    RGBColor(99, 99, 99),    // dark gray (#636363)
    RGBColor(153, 115, 0),   // brownish  (#997300)
];

/// Resolve a configured palette to concrete colors. Never returns an empty list.
pub fn palette_colors(p: &Palette) -> Result<Vec<RGBColor>> {
    match p {
        Palette::Category10 => Ok(CATEGORY10.to_vec()),
        Palette::Office => Ok(OFFICE10.to_vec()),
        Palette::Custom(list) if list.is_empty() => Ok(CATEGORY10.to_vec()),
        Palette::Custom(list) => list
            .iter()
            .map(|s| parse_hex(s).ok_or_else(|| ChartError::InvalidColor(s.clone())))
            .collect(),
    }
}

/// `#rrggbb` (leading `#` optional).
pub fn parse_hex(s: &str) -> Option<RGBColor> {
    let h = s.trim().trim_start_matches('#');
    if h.len() != 6 || !h.is_ascii() {
        return None;
    }
    let c = |i: usize| u8::from_str_radix(&h[i..i + 2], 16).ok();
    Some(RGBColor(c(0)?, c(2)?, c(4)?))
}

pub fn to_hex(c: RGBColor) -> String {
    format!("#{:02x}{:02x}{:02x}", c.0, c.1, c.2)
}

/// Opacity in `[0, 1]` as an 8-bit alpha channel. Out-of-range input is clamped.
pub fn opacity_to_alpha(opacity: f64) -> u8 {
    if opacity.is_nan() {
        return 0;
    }
    (opacity.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Map a user-provided locale tag to a `num_format::Locale` and its decimal separator char.
///
/// Supported tags (case-insensitive): `en`, `us`, `en_US`, `de`, `de_DE`, `german`,
/// `fr`, `es`, `it`, `pt`, `nl`. Defaults to English.
pub fn map_locale(tag: &str) -> (&'static Locale, char) {
    match tag.to_lowercase().as_str() {
        "de" | "de_de" | "german" => (&Locale::de, ','),
        "fr" | "fr_fr" => (&Locale::fr, ','),
        "es" | "es_es" => (&Locale::es, ','),
        "it" | "it_it" => (&Locale::it, ','),
        "pt" | "pt_pt" | "pt_br" => (&Locale::pt, ','),
        "nl" | "nl_nl" => (&Locale::nl, ','),
        _ => (&Locale::en, '.'), // default
    }
}

/// Decimals needed to tell ticks `step` apart (0 for steps >= 1).
pub fn step_precision(step: f64) -> usize {
    if !step.is_finite() || step <= 0.0 || step >= 1.0 {
        return 0;
    }
    (-step.log10().floor()).max(0.0) as usize
}

/// Value tick label with locale digit grouping, e.g. `1,500` or `0.25`.
pub fn format_tick_value(v: f64, step: f64, locale_tag: &str) -> String {
    let (locale, dec_sep) = map_locale(locale_tag);
    let prec = step_precision(step);
    let s = format!("{:.*}", prec, v.abs());
    let (int_part, frac_part) = match s.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (s.as_str(), None),
    };
    let int_val: u64 = int_part.parse().unwrap_or(0);
    let mut out = String::new();
    let is_zero = int_val == 0 && frac_part.is_none_or(|f| f.bytes().all(|b| b == b'0'));
    if v < 0.0 && !is_zero {
        out.push('−');
    }
    out.push_str(&int_val.to_formatted_string(locale));
    if let Some(f) = frac_part {
        out.push(dec_sep);
        out.push_str(f);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trip() {
        assert_eq!(parse_hex("#1f77b4"), Some(RGBColor(31, 119, 180)));
        assert_eq!(to_hex(RGBColor(31, 119, 180)), "#1f77b4");
        assert_eq!(parse_hex("#12345"), None);
        assert_eq!(parse_hex("zzzzzz"), None);
    }

    #[test]
    fn custom_palette_rejects_bad_colors() {
        let bad = Palette::Custom(vec!["#000000".into(), "red".into()]);
        assert!(matches!(
            palette_colors(&bad),
            Err(ChartError::InvalidColor(c)) if c == "red"
        ));
        assert_eq!(palette_colors(&Palette::Office).unwrap().len(), 10);
    }

    #[test]
    fn tick_labels_follow_locale_and_step() {
        assert_eq!(format_tick_value(1500.0, 500.0, "en"), "1,500");
        assert_eq!(format_tick_value(1500.0, 500.0, "de"), "1.500");
        assert_eq!(format_tick_value(0.25, 0.05, "en"), "0.25");
        assert_eq!(format_tick_value(2.5, 0.5, "fr"), "2,5");
        assert_eq!(format_tick_value(-20.0, 10.0, "en"), "−20");
        assert_eq!(format_tick_value(-0.0, 10.0, "en"), "0");
    }
}
