/*!
 * GUI application for epc-chart - animated per-country line charts
 *
 * A cross-platform desktop application providing:
 * - Loading a Country,<year>,... CSV table from disk or a URL
 * - One checkbox per country that reveals or hides its line
 * - The chart itself, animated frame by frame
 *
 * Platform support: Windows, macOS, Linux
 */

use eframe::egui;
use egui::epaint::TextShape;
use egui::{Align2, Color32, FontId, Pos2, Sense, Shape, Stroke, Vec2};
use epc_chart::chart::{LABEL_DX, LABEL_FONT_PX};
use epc_chart::viz::util::{format_tick_value, opacity_to_alpha};
use epc_chart::{Chart, ChartConfig, Source};
use plotters::style::RGBColor;
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

fn main() -> Result<(), eframe::Error> {
    // Enable logging for better debugging
    env_logger::init();

    let initial_input = std::env::args().nth(1).unwrap_or_default();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 640.0])
            .with_min_inner_size([600.0, 400.0])
            .with_title("Energy Consumption per Capita - epc-chart"),
        ..Default::default()
    };

    eframe::run_native(
        "epc-chart",
        options,
        Box::new(move |_cc| Ok(Box::new(EpcApp::new(initial_input)))),
    )
}

/// Main application state
struct EpcApp {
    // Input fields
    input: String,
    config_path: String,

    // Loaded chart and the checkbox state bound to it
    chart: Option<Chart>,
    checked: Vec<bool>,
    started_at: Instant,

    // UI state
    is_loading: bool,
    status_message: String,
    error_message: String,

    // Background load
    load_receiver: Option<mpsc::Receiver<LoadResult>>,
}

enum LoadResult {
    Loaded(Box<Chart>),
    Error(String),
}

impl EpcApp {
    fn new(input: String) -> Self {
        let mut app = Self {
            input,
            config_path: String::new(),
            chart: None,
            checked: Vec::new(),
            started_at: Instant::now(),
            is_loading: false,
            status_message: String::new(),
            error_message: String::new(),
            load_receiver: None,
        };
        if !app.input.trim().is_empty() {
            app.start_load();
        }
        app
    }

    fn start_load(&mut self) {
        if self.input.trim().is_empty() {
            self.error_message = "Please choose a CSV file or enter a URL".to_string();
            return;
        }

        self.is_loading = true;
        self.error_message.clear();
        self.status_message = format!("Loading {}...", self.input.trim());

        let (sender, receiver) = mpsc::channel();
        self.load_receiver = Some(receiver);

        let source = Source::parse(&self.input);
        let config_path = self.config_path.trim().to_string();

        thread::spawn(move || {
            let result = load_chart(&source, &config_path);
            let _ = sender.send(result);
        });
    }

    fn check_load_result(&mut self) {
        if let Some(receiver) = &self.load_receiver
            && let Ok(result) = receiver.try_recv()
        {
            self.is_loading = false;
            self.load_receiver = None;

            match result {
                LoadResult::Loaded(chart) => {
                    let mut chart = *chart;
                    self.checked = chart.series().iter().map(|s| s.default_visible).collect();
                    self.started_at = Instant::now();
                    chart.start(Duration::ZERO);
                    self.status_message = format!("Loaded {} countries", chart.series().len());
                    self.error_message.clear();
                    self.chart = Some(chart);
                }
                LoadResult::Error(error) => {
                    self.error_message = error;
                    self.status_message.clear();
                }
            }
        }
    }
}

fn load_chart(source: &Source, config_path: &str) -> LoadResult {
    let config = match ChartConfig::from_optional_path(config_path) {
        Ok(c) => c,
        Err(err) => return LoadResult::Error(format!("Failed to read config: {}", err)),
    };
    match Chart::load(source, config) {
        Ok(chart) => LoadResult::Loaded(Box::new(chart)),
        Err(err) => LoadResult::Error(format!("Failed to load {}: {}", source, err)),
    }
}

impl eframe::App for EpcApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_load_result();

        if self.is_loading {
            ctx.request_repaint();
        }

        let now = self.started_at.elapsed();
        if let Some(chart) = self.chart.as_mut()
            && chart.tick(now)
        {
            ctx.request_repaint();
        }

        egui::TopBottomPanel::top("source").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label("CSV:");
                ui.text_edit_singleline(&mut self.input)
                    .on_hover_text("Path or http(s) URL of a Country,<year>,... table");
                if ui.button("Browse").clicked() {
                    let start_dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
                    if let Some(path) = rfd::FileDialog::new()
                        .add_filter("CSV", &["csv"])
                        .set_directory(start_dir)
                        .pick_file()
                    {
                        self.input = path.to_string_lossy().to_string();
                    }
                }
                ui.label("Config:");
                ui.text_edit_singleline(&mut self.config_path)
                    .on_hover_text("Optional JSON file overriding chart settings");
                if ui
                    .add_enabled(!self.is_loading, egui::Button::new("Load"))
                    .clicked()
                {
                    self.start_load();
                }
                if self.is_loading {
                    ui.spinner();
                }
            });
            if !self.status_message.is_empty() {
                ui.colored_label(egui::Color32::DARK_GREEN, &self.status_message);
            }
            if !self.error_message.is_empty() {
                ui.colored_label(egui::Color32::RED, &self.error_message);
            }
        });

        let Some(chart) = self.chart.as_mut() else {
            egui::CentralPanel::default().show(ctx, |ui| {
                ui.centered_and_justified(|ui| ui.label("No chart loaded"));
            });
            return;
        };

        egui::SidePanel::left("countries").show(ctx, |ui| {
            ui.heading("Countries");
            ui.add_space(5.0);
            egui::ScrollArea::vertical().show(ui, |ui| {
                for (i, checked) in self.checked.iter_mut().enumerate() {
                    let name = chart.series()[i].country_name.clone();
                    let color = chart
                        .geometry(i)
                        .map(|g| to_color32(g.color))
                        .unwrap_or(Color32::GRAY);
                    ui.horizontal(|ui| {
                        let (swatch, _) = ui.allocate_exact_size(Vec2::splat(10.0), Sense::hover());
                        ui.painter().rect_filled(swatch, 2.0, color);
                        if ui.checkbox(checked, name).changed() {
                            let key = chart.key(i).unwrap_or_default().to_string();
                            chart.set_checked(&key, *checked, now);
                            ctx.request_repaint();
                        }
                    });
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            draw_chart(ui, chart);
        });
    }
}

fn to_color32(c: RGBColor) -> Color32 {
    Color32::from_rgb(c.0, c.1, c.2)
}

fn with_opacity(c: Color32, opacity: f64) -> Color32 {
    Color32::from_rgba_unmultiplied(c.r(), c.g(), c.b(), opacity_to_alpha(opacity))
}

/// Paint grid, axes, revealed path prefixes and labels, scaled to fit the panel.
fn draw_chart(ui: &mut egui::Ui, chart: &Chart) {
    let cfg = chart.config();
    let scales = chart.scales();
    let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::hover());
    let rect = response.rect;
    painter.rect_filled(rect, 0.0, Color32::WHITE);

    let k = (rect.width() / cfg.outer_width() as f32)
        .min(rect.height() / cfg.outer_height() as f32)
        .max(0.01);
    let origin = rect.min + Vec2::new(cfg.margins.left as f32 * k, cfg.margins.top as f32 * k);
    let at = |x: f64, y: f64| Pos2::new(origin.x + x as f32 * k, origin.y + y as f32 * k);
    let (w, h) = (cfg.width, cfg.height);

    let grid = Stroke::new(1.0, with_opacity(Color32::LIGHT_GRAY, 0.7));
    for d in scales.x.ticks(cfg.x_ticks) {
        let x = scales.x.map(d);
        painter.line_segment([at(x, 0.0), at(x, h)], grid);
    }
    for v in scales.y.ticks(cfg.y_ticks) {
        let y = scales.y.map(v);
        painter.line_segment([at(0.0, y), at(w, y)], grid);
    }

    let axis = Stroke::new(1.0, Color32::BLACK);
    let tick_font = FontId::proportional(10.0 * k);
    painter.line_segment([at(0.0, h), at(w, h)], axis);
    painter.line_segment([at(0.0, 0.0), at(0.0, h)], axis);
    let years = (scales.x.domain.1 - scales.x.domain.0).num_days() / 365 + 1;
    for d in scales.x.ticks(years.max(2) as usize) {
        let x = scales.x.map(d);
        painter.line_segment([at(x, h), at(x, h + 6.0)], axis);
        painter.text(
            at(x, h + 9.0),
            Align2::CENTER_TOP,
            d.format("%Y").to_string(),
            tick_font.clone(),
            Color32::BLACK,
        );
    }
    let step = scales.y.tick_step(cfg.y_ticks);
    for v in scales.y.ticks(cfg.y_ticks) {
        let y = scales.y.map(v);
        painter.line_segment([at(-6.0, y), at(0.0, y)], axis);
        painter.text(
            at(-9.0, y),
            Align2::RIGHT_CENTER,
            format_tick_value(v, step, &cfg.locale),
            tick_font.clone(),
            Color32::BLACK,
        );
    }

    let title_font = FontId::proportional(12.0 * k);
    painter.text(
        at(w + 8.0, h + 9.0),
        Align2::LEFT_TOP,
        &cfg.x_title,
        title_font.clone(),
        Color32::BLACK,
    );
    let galley = painter.layout_no_wrap(cfg.y_title.clone(), title_font, Color32::BLACK);
    let y_title_pos = at(-cfg.margins.left + 8.0, h / 2.0) + Vec2::new(0.0, galley.size().x / 2.0);
    painter.add(
        TextShape::new(y_title_pos, galley, Color32::BLACK)
            .with_angle(-std::f32::consts::FRAC_PI_2),
    );

    let label_font = FontId::proportional(LABEL_FONT_PX as f32 * k);
    for (i, series) in chart.series().iter().enumerate() {
        let (Some(geom), Some(frame)) = (chart.geometry(i), chart.frame(i)) else {
            continue;
        };
        let stroke = Stroke::new(1.5 * k, to_color32(geom.color));
        for poly in geom.path.prefix(frame.visible_length()) {
            let pts: Vec<Pos2> = poly.iter().map(|p| at(p.x, p.y)).collect();
            painter.add(Shape::line(pts, stroke));
        }
        if let Some(anchor) = geom.label_anchor
            && frame.label_opacity > 0.0
        {
            painter.text(
                at(anchor.x + LABEL_DX, anchor.y),
                Align2::LEFT_CENTER,
                &series.country_name,
                label_font.clone(),
                with_opacity(Color32::BLACK, frame.label_opacity),
            );
        }
    }
}
