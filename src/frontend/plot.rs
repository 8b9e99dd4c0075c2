//! Plot window for averaged series
//!
//! One line of brightness over absolute time. X values are Unix seconds of the
//! naive timestamps read as UTC, so formatting them back with the same offset
//! reproduces the wall-clock times from the dump trailer.

use crate::analysis::SeriesStatistics;
use crate::config::PlotConfig;
use crate::error::{PicoLogError, Result};
use crate::types::AveragedSeries;
use chrono::DateTime;
use egui::Ui;
use egui_plot::{GridInput, GridMark, Line, Plot, PlotPoints};
use std::fmt::Write;
use std::ops::RangeInclusive;

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Grid marks every `step` seconds across the visible range
///
/// Falls back to fewer marks when the step would draw more than `max_marks`.
fn time_grid_marks(input: GridInput, step: f64, max_marks: usize) -> Vec<GridMark> {
    let (min, max) = input.bounds;
    if step.is_nan() || step <= 0.0 || max <= min {
        return Vec::new();
    }

    let mut step = step;
    while (max - min) / step > max_marks as f64 {
        step *= 2.0;
    }

    let mut marks = Vec::new();
    let mut current = (min / step).floor() * step;
    while current <= max {
        if current >= min {
            marks.push(GridMark {
                value: current,
                step_size: step,
            });
        }
        current += step;
    }
    marks
}

/// Format a plot x value with a strftime pattern
///
/// Values outside the calendar range and broken patterns give an empty label.
pub fn format_tick(value: f64, format: &str) -> String {
    let Some(dt) = DateTime::from_timestamp(value.round() as i64, 0) else {
        return String::new();
    };
    let mut label = String::new();
    if write!(label, "{}", dt.naive_utc().format(format)).is_err() {
        return String::new();
    }
    label
}

/// Plot state for one averaged series
pub struct SeriesPlot {
    points: Vec<[f64; 2]>,
    stats: SeriesStatistics,
    config: PlotConfig,
}

impl SeriesPlot {
    pub fn new(series: &AveragedSeries, config: &PlotConfig) -> Self {
        Self {
            points: series.as_plot_points(),
            stats: SeriesStatistics::from_series(series),
            config: config.clone(),
        }
    }

    /// Whether there is anything to draw
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn render(&self, ui: &mut Ui) {
        ui.label(self.stats.to_string());

        let tick_format = self.config.xtick_format.clone();
        let tick_step = self.config.xtick_hours * SECONDS_PER_HOUR;

        let plot = Plot::new("brightness_plot")
            .x_axis_label("time")
            .y_axis_label("brightness")
            .show_axes(true)
            .show_grid(true)
            .x_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
                format_tick(mark.value, &tick_format)
            })
            .x_grid_spacer(move |input| time_grid_marks(input, tick_step, 24));

        plot.show(ui, |plot_ui| {
            if !self.points.is_empty() {
                let points = PlotPoints::from(self.points.clone());
                plot_ui.line(Line::new("brightness", points));
            }
        });
    }
}

struct PlotApp {
    plot: SeriesPlot,
}

impl eframe::App for PlotApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            self.plot.render(ui);
        });
    }
}

/// Open a window showing `series` and block until it is closed
pub fn show_plot(series: &AveragedSeries, config: &PlotConfig, title: &str) -> Result<()> {
    let plot = SeriesPlot::new(series, config);
    if plot.is_empty() {
        tracing::info!("Nothing to plot, showing an empty window");
    }

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 500.0])
            .with_title(title),
        ..Default::default()
    };

    eframe::run_native(
        title,
        native_options,
        Box::new(|_cc| Ok(Box::new(PlotApp { plot }))),
    )
    .map_err(|e| PicoLogError::Plot(e.to_string()))
}
