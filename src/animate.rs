//! Animator: dash-offset reveal/hide of series paths and label fades.
//!
//! Transitions run on an explicit clock. Every series has two channels (dash offset and
//! label opacity); each channel holds at most one [`Tween`]. Starting a transition on a
//! channel replaces whatever was running there and starts from the channel's current value,
//! so a series retriggered mid-flight continues smoothly from where it is.
//!
//! Callers drive time with [`Animator::tick`], passing the elapsed time since the session
//! started.

use std::time::Duration;

/// Timing curve applied to a tween's progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ease {
    Linear,
    #[default]
    CubicInOut,
}

impl Ease {
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::CubicInOut => {
                let t = t * 2.0;
                if t <= 1.0 {
                    t * t * t / 2.0
                } else {
                    let t = t - 2.0;
                    (t * t * t + 2.0) / 2.0
                }
            }
        }
    }
}

/// One running interpolation of a scalar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    pub from: f64,
    pub to: f64,
    pub start_ms: f64,
    pub duration_ms: f64,
    pub ease: Ease,
}

impl Tween {
    pub fn value_at(&self, now_ms: f64) -> f64 {
        if self.duration_ms <= 0.0 {
            return self.to;
        }
        let t = (now_ms - self.start_ms) / self.duration_ms;
        self.from + (self.to - self.from) * self.ease.apply(t)
    }

    pub fn end_ms(&self) -> f64 {
        self.start_ms + self.duration_ms.max(0.0)
    }

    pub fn is_done(&self, now_ms: f64) -> bool {
        now_ms >= self.end_ms()
    }
}

/// Path and label durations for one transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub path: Duration,
    pub label: Duration,
}

/// Which way a transition goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Reveal,
    Hide,
}

/// Observable animation state of one series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesFrame {
    /// `[dash, gap]`, both equal to the path length once initialized.
    pub dash_array: Option<(f64, f64)>,
    pub dash_offset: f64,
    pub label_opacity: f64,
}

impl SeriesFrame {
    /// Length of the painted prefix of the stroke.
    pub fn visible_length(&self) -> f64 {
        match self.dash_array {
            Some((len, _)) => (len - self.dash_offset).clamp(0.0, len),
            None => 0.0,
        }
    }
}

#[derive(Debug, Clone)]
struct Track {
    frame: SeriesFrame,
    offset_tween: Option<Tween>,
    opacity_tween: Option<Tween>,
}

impl Track {
    fn sample(&mut self, now_ms: f64) {
        if let Some(tw) = self.offset_tween {
            self.frame.dash_offset = tw.value_at(now_ms);
            if tw.is_done(now_ms) {
                self.offset_tween = None;
            }
        }
        if let Some(tw) = self.opacity_tween {
            self.frame.label_opacity = tw.value_at(now_ms);
            if tw.is_done(now_ms) {
                self.opacity_tween = None;
            }
        }
    }

    fn is_active(&self) -> bool {
        self.offset_tween.is_some() || self.opacity_tween.is_some()
    }
}

/// Runs transitions for every series of a chart.
#[derive(Debug, Clone)]
pub struct Animator {
    tracks: Vec<Track>,
    ease: Ease,
}

impl Animator {
    /// `count` series, all with hidden labels and no dash array yet.
    pub fn new(count: usize) -> Self {
        let track = Track {
            frame: SeriesFrame {
                dash_array: None,
                dash_offset: 0.0,
                label_opacity: 0.0,
            },
            offset_tween: None,
            opacity_tween: None,
        };
        Self {
            tracks: vec![track; count],
            ease: Ease::default(),
        }
    }

    pub fn with_ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Set the dash array to `[length, length]` and hide the stroke.
    ///
    /// Calling again with the same length leaves the state alone, so initialization never
    /// resets a series that has already been revealed.
    pub fn init_dash(&mut self, idx: usize, length: f64) {
        let Some(track) = self.tracks.get_mut(idx) else {
            return;
        };
        if track.frame.dash_array == Some((length, length)) {
            log::trace!("series {idx}: dash array already initialized");
            return;
        }
        track.frame.dash_array = Some((length, length));
        track.frame.dash_offset = length;
        track.offset_tween = None;
    }

    pub fn frame(&self, idx: usize) -> Option<SeriesFrame> {
        self.tracks.get(idx).map(|t| t.frame)
    }

    /// Is anything running on series `idx`?
    pub fn is_running(&self, idx: usize) -> bool {
        self.tracks.get(idx).is_some_and(Track::is_active)
    }

    /// Start a reveal or hide on series `idx` at time `now`.
    ///
    /// Does nothing for an unknown index or a series whose dash array was never
    /// initialized.
    pub fn start(&mut self, idx: usize, direction: Direction, timing: Timing, now: Duration) {
        let ease = self.ease;
        let now_ms = as_ms(now);
        let Some(track) = self.tracks.get_mut(idx) else {
            log::warn!("no series at index {idx}");
            return;
        };
        let Some((length, _)) = track.frame.dash_array else {
            log::warn!("series {idx}: transition requested before dash initialization");
            return;
        };
        // Interrupt: settle on the value at `now` before replacing the tweens.
        track.sample(now_ms);
        let (offset_to, opacity_to) = match direction {
            Direction::Reveal => (0.0, 1.0),
            Direction::Hide => (length, 0.0),
        };
        track.offset_tween = Some(Tween {
            from: track.frame.dash_offset,
            to: offset_to,
            start_ms: now_ms,
            duration_ms: as_ms(timing.path),
            ease,
        });
        track.opacity_tween = Some(Tween {
            from: track.frame.label_opacity,
            to: opacity_to,
            start_ms: now_ms,
            duration_ms: as_ms(timing.label),
            ease,
        });
        log::debug!("series {idx}: {direction:?} at {now_ms} ms");
    }

    pub fn reveal(&mut self, idx: usize, timing: Timing, now: Duration) {
        self.start(idx, Direction::Reveal, timing, now);
    }

    pub fn hide(&mut self, idx: usize, timing: Timing, now: Duration) {
        self.start(idx, Direction::Hide, timing, now);
    }

    /// Advance every running tween to `now`. Returns true while anything is still running.
    pub fn tick(&mut self, now: Duration) -> bool {
        let now_ms = as_ms(now);
        for t in &mut self.tracks {
            t.sample(now_ms);
        }
        self.is_animating()
    }

    pub fn is_animating(&self) -> bool {
        self.tracks.iter().any(Track::is_active)
    }

    /// When the last running tween ends, if any is running.
    pub fn settle_time(&self) -> Option<Duration> {
        self.tracks
            .iter()
            .flat_map(|t| [t.offset_tween, t.opacity_tween])
            .flatten()
            .map(|tw| tw.end_ms())
            .fold(None, |acc: Option<f64>, e| Some(acc.map_or(e, |a| a.max(e))))
            .map(|ms| Duration::from_nanos((ms * 1e6).ceil() as u64))
    }
}

fn as_ms(d: Duration) -> f64 {
    d.as_nanos() as f64 / 1e6
}

#[cfg(test)]
mod tests {
    use super::*;

    const T: Timing = Timing {
        path: Duration::from_millis(2000),
        label: Duration::from_millis(1000),
    };

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn cubic_in_out_is_symmetric() {
        let e = Ease::CubicInOut;
        assert_eq!(e.apply(0.0), 0.0);
        assert_eq!(e.apply(1.0), 1.0);
        assert!((e.apply(0.5) - 0.5).abs() < 1e-12);
        assert!((e.apply(0.25) + e.apply(0.75) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn init_dash_twice_is_idempotent() {
        let mut a = Animator::new(1);
        a.init_dash(0, 120.0);
        let first = a.frame(0).unwrap();
        a.init_dash(0, 120.0);
        assert_eq!(a.frame(0).unwrap(), first);
        assert_eq!(first.dash_array, Some((120.0, 120.0)));
        assert_eq!(first.dash_offset, 120.0);
    }

    #[test]
    fn init_dash_does_not_reset_revealed_series() {
        let mut a = Animator::new(1);
        a.init_dash(0, 50.0);
        a.reveal(0, T, ms(0));
        a.tick(ms(2000));
        a.init_dash(0, 50.0);
        assert_eq!(a.frame(0).unwrap().dash_offset, 0.0);
    }

    #[test]
    fn reveal_then_hide_returns_to_hidden() {
        let mut a = Animator::new(1);
        a.init_dash(0, 80.0);
        a.reveal(0, T, ms(0));
        assert!(!a.tick(ms(2500)));
        let shown = a.frame(0).unwrap();
        assert_eq!(shown.dash_offset, 0.0);
        assert_eq!(shown.label_opacity, 1.0);

        a.hide(0, T, ms(3000));
        a.tick(ms(5000));
        let hidden = a.frame(0).unwrap();
        assert_eq!(hidden.dash_offset, 80.0);
        assert_eq!(hidden.label_opacity, 0.0);
        assert_eq!(hidden.visible_length(), 0.0);
    }

    #[test]
    fn retrigger_starts_from_current_value() {
        let mut a = Animator::new(1);
        a.init_dash(0, 100.0);
        a.reveal(0, T, ms(0));
        a.tick(ms(1000));
        let mid = a.frame(0).unwrap().dash_offset;
        assert!((mid - 50.0).abs() < 1e-9);

        a.hide(0, T, ms(1000));
        a.tick(ms(1000));
        assert!((a.frame(0).unwrap().dash_offset - mid).abs() < 1e-9);
        assert_eq!(a.settle_time(), Some(ms(3000)));
    }

    #[test]
    fn start_without_dash_is_ignored() {
        let mut a = Animator::new(1);
        a.reveal(0, T, ms(0));
        assert!(!a.is_running(0));
        a.reveal(7, T, ms(0));
        assert!(!a.is_animating());
    }
}
