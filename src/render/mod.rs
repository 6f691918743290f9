//! Histogram grid rendering to PNG
//!
//! One panel per dataset, laid out by [`grid_shape_for`]. Text goes through
//! plotters' `ttf` font backend, which is on by default. A build with
//! `--no-default-features` has no font backend, so titles, tick labels,
//! legends and the stats box are skipped and only geometry is drawn.

use crate::{
    app::{AnalyzedDataset, DatasetAnalysis},
    error::{AppError, Result},
    models::{config::grid_shape_for, Config},
};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;

const BAR_COLOR: RGBColor = RGBColor(70, 130, 180);
const MEAN_COLOR: RGBColor = RED;
const MEDIAN_COLOR: RGBColor = RGBColor(0, 128, 0);
const STATS_BOX_COLOR: RGBColor = RGBColor(245, 222, 179);
const FONT: &str = "sans-serif";
const DASHES: usize = 24;

/// What the grid looks like
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
    pub title: String,
    /// Draw titles, labels, legends and stats boxes
    pub draw_text: bool,
}

impl RenderOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            width: config.width,
            height: config.height,
            title: crate::defaults::FIGURE_TITLE.to_string(),
            draw_text: cfg!(feature = "ttf"),
        }
    }
}

/// Text lines of the per-panel stats box
pub fn stats_box_lines(analyzed: &AnalyzedDataset) -> Vec<String> {
    let s = &analyzed.summary;
    vec![
        format!("Frames: {}", s.valid_frames),
        format!("Outliers: {}", s.outliers_removed),
        format!("Range: {}-{}ms", s.min_ms, s.max_ms),
        format!("StdDev: {:.2}ms", s.std_dev_ms),
    ]
}

/// Top of the y axis: a tenth above the tallest bar
pub fn y_axis_max(analyzed: &AnalyzedDataset) -> f64 {
    (analyzed.histogram.max_count() as f64 * 1.1).max(1.0)
}

fn render_error<E: std::fmt::Display>(error: E) -> AppError {
    AppError::render(error.to_string())
}

/// Renders a set of analyses into a single PNG
pub struct HistogramGrid {
    options: RenderOptions,
}

impl HistogramGrid {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Draw every dataset into its slot and write the image to `path`.
    ///
    /// Slots of datasets without files stay blank.
    pub fn render(&self, analyses: &[DatasetAnalysis], path: &Path) -> Result<()> {
        let (rows, cols) = grid_shape_for(analyses.len());
        if rows == 0 {
            return Err(AppError::render("No datasets to plot"));
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::render(format!("Cannot create {}: {}", parent.display(), e))
            })?;
        }

        let root = BitMapBackend::new(path, (self.options.width, self.options.height)).into_drawing_area();
        root.fill(&WHITE).map_err(render_error)?;

        let area = if self.options.draw_text {
            root.titled(&self.options.title, (FONT, 30)).map_err(render_error)?
        } else {
            root.margin(10, 10, 10, 10)
        };

        let panels = area.split_evenly((rows, cols));
        for (analysis, panel) in analyses.iter().zip(panels.iter()) {
            if let Some(analyzed) = analysis.analyzed() {
                self.draw_panel(panel, &analysis.spec.label, analyzed)?;
            }
        }

        root.present().map_err(render_error)?;
        Ok(())
    }

    fn draw_panel<DB: DrawingBackend>(
        &self,
        panel: &DrawingArea<DB, Shift>,
        label: &str,
        analyzed: &AnalyzedDataset,
    ) -> Result<()> {
        let histogram = &analyzed.histogram;
        let summary = &analyzed.summary;
        let y_max = y_axis_max(analyzed);

        let mut builder = ChartBuilder::on(panel);
        builder.margin(12);
        if self.options.draw_text {
            builder
                .caption(label, (FONT, 18))
                .x_label_area_size(35)
                .y_label_area_size(45);
        }
        let mut chart = builder
            .build_cartesian_2d(histogram.start..histogram.end, 0f64..y_max)
            .map_err(render_error)?;

        if self.options.draw_text {
            chart
                .configure_mesh()
                .disable_x_mesh()
                .x_desc("Latency (ms)")
                .y_desc("Frame Count")
                .draw()
                .map_err(render_error)?;
        } else {
            let grid_style = BLACK.mix(0.15).stroke_width(1);
            chart
                .draw_series((1..5).map(|k| {
                    let y = y_max * k as f64 / 5.0;
                    PathElement::new(vec![(histogram.start, y), (histogram.end, y)], grid_style)
                }))
                .map_err(render_error)?;
            chart
                .draw_series(std::iter::once(Rectangle::new(
                    [(histogram.start, 0.0), (histogram.end, y_max)],
                    BLACK.stroke_width(1),
                )))
                .map_err(render_error)?;
        }

        let occupied = || histogram.bins().filter(|&(_, _, count)| count > 0);
        chart
            .draw_series(occupied().map(|(left, right, count)| {
                Rectangle::new([(left, 0.0), (right, count as f64)], BAR_COLOR.mix(0.7).filled())
            }))
            .map_err(render_error)?;
        chart
            .draw_series(occupied().map(|(left, right, count)| {
                Rectangle::new([(left, 0.0), (right, count as f64)], BLACK.stroke_width(1))
            }))
            .map_err(render_error)?;

        let markers = [
            (summary.mean_ms, MEAN_COLOR, format!("Mean: {:.1}ms", summary.mean_ms)),
            (summary.median_ms, MEDIAN_COLOR, format!("Median: {:.1}ms", summary.median_ms)),
        ];
        for (x, color, legend) in markers {
            let style = color.stroke_width(2);
            let step = y_max / (2 * DASHES) as f64;
            let series = chart
                .draw_series((0..DASHES).map(|k| {
                    let y0 = 2.0 * step * k as f64;
                    PathElement::new(vec![(x, y0), (x, y0 + step)], style)
                }))
                .map_err(render_error)?;
            if self.options.draw_text {
                series
                    .label(legend)
                    .legend(move |(lx, ly)| PathElement::new(vec![(lx, ly), (lx + 20, ly)], style));
            }
        }

        if self.options.draw_text {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperLeft)
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .label_font((FONT, 13))
                .draw()
                .map_err(render_error)?;

            self.draw_stats_box(panel, analyzed)?;
        }

        Ok(())
    }

    fn draw_stats_box<DB: DrawingBackend>(
        &self,
        panel: &DrawingArea<DB, Shift>,
        analyzed: &AnalyzedDataset,
    ) -> Result<()> {
        let lines = stats_box_lines(analyzed);
        let (width, _) = panel.dim_in_pixel();
        let (box_w, line_h) = (170, 18);
        let x0 = width as i32 - box_w - 25;
        let y0 = 45;

        panel
            .draw(&Rectangle::new(
                [(x0, y0), (x0 + box_w, y0 + line_h * lines.len() as i32 + 10)],
                STATS_BOX_COLOR.mix(0.5).filled(),
            ))
            .map_err(render_error)?;
        for (i, line) in lines.into_iter().enumerate() {
            panel
                .draw(&Text::new(line, (x0 + 8, y0 + 5 + line_h * i as i32), (FONT, 13)))
                .map_err(render_error)?;
        }
        Ok(())
    }
}
