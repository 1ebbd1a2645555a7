use crate::chart::Chart;
use crate::viz;
use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Save the chart's current animation state as SVG.
pub fn save_svg<P: AsRef<Path>>(chart: &Chart, path: P) -> Result<()> {
    write_text(path.as_ref(), &viz::render_svg(chart))
}

/// Save a self-animating SVG that replays the entrance sequence.
pub fn save_animated_svg<P: AsRef<Path>>(chart: &Chart, path: P) -> Result<()> {
    write_text(path.as_ref(), &viz::render_animated_svg(chart))
}

/// Advance `chart` from `start` at `fps` until it settles, writing one SVG per frame as
/// `frame_0000.svg`, `frame_0001.svg`, ... into `dir`. Returns the written paths.
pub fn save_frames<P: AsRef<Path>>(
    chart: &mut Chart,
    dir: P,
    start: Duration,
    fps: u32,
) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let fps = fps.max(1);
    let step = Duration::from_nanos(1_000_000_000 / u64::from(fps));
    let end = chart.settle_time().unwrap_or(start);

    let mut written = Vec::new();
    let mut now = start;
    loop {
        chart.tick(now);
        let path = dir.join(format!("frame_{:04}.svg", written.len()));
        save_svg(chart, &path)?;
        written.push(path);
        if now >= end {
            break;
        }
        now = (now + step).min(end);
    }
    log::info!("wrote {} frames to {}", written.len(), dir.display());
    Ok(written)
}

fn write_text(path: &Path, text: &str) -> Result<()> {
    let mut f = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    f.write_all(text.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChartConfig;
    use crate::loader::load_from_reader;
    use tempfile::tempdir;

    const CSV: &str = "Country,2000,2001\nChina,1,2\nChad,3,\n";

    #[test]
    fn frames_cover_the_whole_entrance() {
        let cfg = ChartConfig {
            entrance_duration_ms: 100,
            default_visible: ["China".to_string()].into(),
            ..ChartConfig::default()
        };
        let data = load_from_reader(CSV.as_bytes(), &cfg.default_visible).unwrap();
        let mut chart = Chart::new(data, cfg).unwrap();
        chart.start(Duration::ZERO);

        let dir = tempdir().unwrap();
        let frames = save_frames(&mut chart, dir.path(), Duration::ZERO, 50).unwrap();
        // 0, 20, 40, 60, 80, 100 ms
        assert_eq!(frames.len(), 6);
        assert!(frames.iter().all(|p| p.exists()));
        assert!(!chart.is_animating());
    }
}
