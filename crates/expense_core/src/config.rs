//! Runtime configuration for the tracker and its chart.
//!
//! # Responsibility
//! - Hold chart geometry/timing defaults in one place.
//! - Resolve the store location and collection from the environment.

use crate::chart::color::Rgb;
use crate::store::EXPENSES_COLLECTION;
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "EXPENSES_DB_PATH";
pub const COLLECTION_ENV: &str = "EXPENSES_COLLECTION";
const DEFAULT_DB_FILE_NAME: &str = "expenses.sqlite3";

/// Chart geometry and animation timing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartConfig {
    pub width: f64,
    pub height: f64,
    pub outer_radius: f64,
    pub inner_radius: f64,
    /// Slice enter/update/exit duration.
    pub transition_ms: u64,
    /// Hover fill transition duration.
    pub hover_ms: u64,
    pub highlight: Rgb,
    pub stroke: Rgb,
    pub stroke_width: f64,
    /// Extra canvas room to the right of the pie for the legend.
    pub legend_margin: f64,
    pub legend_padding: f64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        let outer_radius = 150.0;
        Self {
            width: 300.0,
            height: 300.0,
            outer_radius,
            inner_radius: outer_radius / 2.0,
            transition_ms: 750,
            hover_ms: 300,
            highlight: Rgb::WHITE,
            stroke: Rgb::WHITE,
            stroke_width: 3.0,
            legend_margin: 150.0,
            legend_padding: 10.0,
        }
    }
}

impl ChartConfig {
    /// Pie center inside the canvas.
    pub fn center(&self) -> (f64, f64) {
        (self.width / 2.0 + 5.0, self.height / 2.0 + 5.0)
    }

    /// Top-left corner of the legend group.
    pub fn legend_origin(&self) -> (f64, f64) {
        (self.width + 40.0, 10.0)
    }

    /// Canvas is square, sized from the width plus legend margin.
    pub fn canvas_size(&self) -> (f64, f64) {
        let side = self.width + self.legend_margin;
        (side, side)
    }
}

/// Tracker wiring configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerConfig {
    pub collection: String,
    /// `None` keeps the store in memory.
    pub db_path: Option<PathBuf>,
    pub chart: ChartConfig,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            collection: EXPENSES_COLLECTION.to_string(),
            db_path: None,
            chart: ChartConfig::default(),
        }
    }
}

impl TrackerConfig {
    /// Builds a file-backed configuration from the process environment.
    ///
    /// - `EXPENSES_DB_PATH`: database file, defaults to the temp dir.
    /// - `EXPENSES_COLLECTION`: collection name, defaults to `expenses`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let db_path = non_empty(DB_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME));
        let collection =
            non_empty(COLLECTION_ENV).unwrap_or_else(|| EXPENSES_COLLECTION.to_string());

        Self {
            collection,
            db_path: Some(db_path),
            chart: ChartConfig::default(),
        }
    }
}
