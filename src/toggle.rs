//! Toggle controller: per-series Visible/Hidden state driven by checkbox changes.
//!
//! Each series is bound to its checkbox through a DOM-safe key derived from the country
//! name (see [`slug`]). Keys are unique across a loaded set; names that would collide get
//! a numeric suffix in load order.

use crate::animate::Direction;
use ahash::AHashMap;
use regex::Regex;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
}

impl Visibility {
    pub fn from_checked(checked: bool) -> Self {
        if checked {
            Visibility::Visible
        } else {
            Visibility::Hidden
        }
    }

    pub fn is_visible(self) -> bool {
        self == Visibility::Visible
    }
}

fn non_word() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\p{L}\p{N}]+").expect("static regex"))
}

/// Identifier-safe form of a country name: `"United States"` -> `"United_States"`.
pub fn slug(name: &str) -> String {
    let s = non_word().replace_all(name.trim(), "_");
    let s = s.trim_matches('_');
    if s.is_empty() || s.starts_with(|c: char| c.is_ascii_digit()) {
        format!("c_{s}")
    } else {
        s.to_string()
    }
}

/// Element id of the checkbox bound to `key`.
pub fn checkbox_id(key: &str) -> String {
    format!("{key}_checkbox")
}

/// What the chart has to do after a checkbox change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleAction {
    pub index: usize,
    pub direction: Direction,
}

/// Keys plus the current visibility of every series.
#[derive(Debug, Clone)]
pub struct ToggleController {
    keys: Vec<String>,
    index: AHashMap<String, usize>,
    states: Vec<Visibility>,
}

impl ToggleController {
    /// `series` yields (country name, default visible) in load order.
    pub fn new<'a, I>(series: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, bool)>,
    {
        let mut keys = Vec::new();
        let mut index = AHashMap::new();
        let mut states = Vec::new();
        for (i, (name, visible)) in series.into_iter().enumerate() {
            let base = slug(name);
            let mut key = base.clone();
            let mut n = 2;
            while index.contains_key(&key) {
                key = format!("{base}_{n}");
                n += 1;
            }
            if key != base {
                log::warn!("key {base:?} for {name:?} already taken, using {key:?}");
            }
            index.insert(key.clone(), i);
            keys.push(key);
            states.push(Visibility::from_checked(visible));
        }
        Self {
            keys,
            index,
            states,
        }
    }

    pub fn key(&self, idx: usize) -> Option<&str> {
        self.keys.get(idx).map(String::as_str)
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.index.get(key).copied()
    }

    pub fn state(&self, idx: usize) -> Option<Visibility> {
        self.states.get(idx).copied()
    }

    /// Apply a checkbox change. Unknown keys are ignored.
    pub fn on_change(&mut self, key: &str, checked: bool) -> Option<ToggleAction> {
        let Some(index) = self.index_of(key) else {
            log::warn!("checkbox change for unknown series {key:?} ignored");
            return None;
        };
        self.states[index] = Visibility::from_checked(checked);
        let direction = if checked {
            Direction::Reveal
        } else {
            Direction::Hide
        };
        Some(ToggleAction { index, direction })
    }
}
