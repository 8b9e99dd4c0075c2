//! Presentation of averaged series
//!
//! A single egui window built on `eframe` and `egui_plot`. It only consumes
//! an [`AveragedSeries`](crate::types::AveragedSeries); nothing here parses
//! files or talks to the device.

pub mod plot;

pub use plot::{format_tick, show_plot, SeriesPlot};
