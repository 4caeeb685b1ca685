//! Static Chart Renderer
//! Renders every chart of the report to PNG images with plotters.
//!
//! Charts are drawn into an in-memory RGB buffer and only written to disk
//! by [`StaticChartRenderer::export_report`].

use crate::charts::{heat_rgb, PALETTE_RGB};
use crate::error::{EdaError, Result};
use crate::report::{DensityComparison, EdaReport, GroupAnalysis};
use crate::stats::{CorrelationMatrix, GroupCount, Histogram};
use image::RgbImage;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;
type DrawResult = std::result::Result<(), Box<dyn std::error::Error>>;

const FONT: &str = "sans-serif";
const BAR: RGBColor = RGBColor(52, 152, 219);

/// Chart sizes in pixels
const CHART_SIZE: (u32, u32) = (1000, 700);
const GRID_SIZE: (u32, u32) = (1600, 2000);
const HEATMAP_SIZE: (u32, u32) = (1100, 950);
const CATEGORY_SIZE: (u32, u32) = (1400, 850);

/// Histogram grid layout (rows, columns)
const GRID_LAYOUT: (usize, usize) = (6, 2);

fn palette(index: usize) -> RGBColor {
    let (r, g, b) = PALETTE_RGB[index % PALETTE_RGB.len()];
    RGBColor(r, g, b)
}

fn render_error(e: impl std::fmt::Display) -> EdaError {
    EdaError::Render(e.to_string())
}

/// `"Natural / Dry"` becomes `"natural_dry"`.
pub fn slugify(label: &str) -> String {
    label
        .to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

/// Label for category index `x` when it sits on an integer tick.
fn category_label(labels: &[String], x: f64) -> String {
    let idx = x.round();
    if idx >= 0.0 && (idx - x).abs() < 1e-6 {
        labels.get(idx as usize).cloned().unwrap_or_default()
    } else {
        String::new()
    }
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Draw into a white RGB canvas of the given size.
    fn render(size: (u32, u32), draw: impl FnOnce(&Area<'_>) -> DrawResult) -> Result<RgbImage> {
        let (width, height) = size;
        let mut buffer = vec![255u8; width as usize * height as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, size).into_drawing_area();
            root.fill(&WHITE).map_err(render_error)?;
            draw(&root).map_err(render_error)?;
            root.present().map_err(render_error)?;
        }
        RgbImage::from_raw(width, height, buffer)
            .ok_or_else(|| EdaError::Render("canvas buffer has the wrong size".to_string()))
    }

    fn draw_histogram(area: &Area<'_>, hist: &Histogram, caption: &str) -> DrawResult {
        let (lo, hi) = match (hist.edges.first(), hist.edges.last()) {
            (Some(&lo), Some(&hi)) => (lo, hi),
            _ => return Ok(()),
        };
        let y_max = (hist.max_count() as f64 * 1.1).max(1.0);

        let mut chart = ChartBuilder::on(area)
            .caption(caption, (FONT, 22))
            .margin(10)
            .x_label_area_size(35)
            .y_label_area_size(50)
            .build_cartesian_2d(lo..hi, 0f64..y_max)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .y_desc("Count")
            .draw()?;

        chart.draw_series(hist.edges.windows(2).zip(&hist.counts).map(|(edge, &count)| {
            Rectangle::new([(edge[0], 0.0), (edge[1], count as f64)], BAR.filled())
        }))?;
        chart.draw_series(hist.edges.windows(2).zip(&hist.counts).map(|(edge, &count)| {
            Rectangle::new([(edge[0], 0.0), (edge[1], count as f64)], BLACK.stroke_width(1))
        }))?;
        Ok(())
    }

    /// Single histogram with its own caption.
    pub fn render_histogram(hist: &Histogram, title: &str) -> Result<RgbImage> {
        Self::render(CHART_SIZE, |root| Self::draw_histogram(root, hist, title))
    }

    /// Histograms laid out six rows by two columns.
    pub fn render_histogram_grid(hists: &[Histogram]) -> Result<RgbImage> {
        Self::render(GRID_SIZE, |root| {
            let cells = root.split_evenly(GRID_LAYOUT);
            for (cell, hist) in cells.iter().zip(hists) {
                Self::draw_histogram(cell, hist, &hist.column)?;
            }
            Ok(())
        })
    }

    /// Bar per category, labels rotated under the axis.
    pub fn render_count_chart(title: &str, counts: &[GroupCount]) -> Result<RgbImage> {
        let labels: Vec<String> = counts.iter().map(|c| c.group.clone()).collect();
        let n = counts.len().max(1);
        let y_max = (counts.iter().map(|c| c.count).max().unwrap_or(0) as f64 * 1.1).max(1.0);

        Self::render(CATEGORY_SIZE, |root| {
            let mut chart = ChartBuilder::on(root)
                .caption(title, (FONT, 24))
                .margin(10)
                .x_label_area_size(180)
                .y_label_area_size(50)
                .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), 0f64..y_max)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .x_labels(n)
                .x_label_formatter(&|x| category_label(&labels, *x))
                .x_label_style((FONT, 13).into_font().transform(FontTransform::Rotate90))
                .y_desc("count")
                .draw()?;

            chart.draw_series(counts.iter().enumerate().map(|(i, c)| {
                let x = i as f64;
                Rectangle::new([(x - 0.4, 0.0), (x + 0.4, c.count as f64)], palette(i).filled())
            }))?;
            Ok(())
        })
    }

    /// Box per category with whiskers and outlier points.
    pub fn render_box_chart(title: &str, analysis: &GroupAnalysis) -> Result<RgbImage> {
        let labels: Vec<String> = analysis.boxes.iter().map(|b| b.group.clone()).collect();
        let n = analysis.boxes.len().max(1);

        let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
        for b in &analysis.boxes {
            y_min = b.outliers.iter().copied().fold(y_min.min(b.whisker_low), f64::min);
            y_max = b.outliers.iter().copied().fold(y_max.max(b.whisker_high), f64::max);
        }
        if !y_min.is_finite() {
            (y_min, y_max) = (0.0, 1.0);
        }
        let pad = ((y_max - y_min) * 0.05).max(0.1);

        Self::render(CATEGORY_SIZE, |root| {
            let mut chart = ChartBuilder::on(root)
                .caption(title, (FONT, 24))
                .margin(10)
                .x_label_area_size(180)
                .y_label_area_size(50)
                .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), (y_min - pad)..(y_max + pad))?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .x_labels(n)
                .x_label_formatter(&|x| category_label(&labels, *x))
                .x_label_style((FONT, 13).into_font().transform(FontTransform::Rotate90))
                .y_desc(analysis.value_column.as_str())
                .draw()?;

            for (i, b) in analysis.boxes.iter().enumerate() {
                let x = i as f64;
                let color = palette(i);
                let half = 0.3;

                chart.draw_series(std::iter::once(Rectangle::new(
                    [(x - half, b.q1), (x + half, b.q3)],
                    color.mix(0.4).filled(),
                )))?;
                chart.draw_series(std::iter::once(Rectangle::new(
                    [(x - half, b.q1), (x + half, b.q3)],
                    color.stroke_width(2),
                )))?;

                let segments = [
                    vec![(x - half, b.median), (x + half, b.median)],
                    vec![(x, b.whisker_low), (x, b.q1)],
                    vec![(x, b.q3), (x, b.whisker_high)],
                    vec![(x - half / 2.0, b.whisker_low), (x + half / 2.0, b.whisker_low)],
                    vec![(x - half / 2.0, b.whisker_high), (x + half / 2.0, b.whisker_high)],
                ];
                chart.draw_series(
                    segments
                        .into_iter()
                        .map(|points| PathElement::new(points, BLACK.stroke_width(1))),
                )?;

                chart.draw_series(
                    b.outliers
                        .iter()
                        .map(|&y| Circle::new((x, y), 3, color.stroke_width(1))),
                )?;
            }
            Ok(())
        })
    }

    /// Annotated correlation heatmap, first column at the top.
    pub fn render_heatmap(matrix: &CorrelationMatrix, title: &str) -> Result<RgbImage> {
        let n = matrix.size().max(1);
        let labels = matrix.columns.clone();
        // Row i is drawn at y = n - 1 - i so the first variable is on top.
        let row_labels: Vec<String> = labels.iter().rev().cloned().collect();

        Self::render(HEATMAP_SIZE, |root| {
            let range = -0.5f64..(n as f64 - 0.5);
            let mut chart = ChartBuilder::on(root)
                .caption(title, (FONT, 24))
                .margin(15)
                .x_label_area_size(120)
                .y_label_area_size(120)
                .build_cartesian_2d(range.clone(), range)?;

            chart
                .configure_mesh()
                .disable_mesh()
                .x_labels(n)
                .y_labels(n)
                .x_label_formatter(&|x| category_label(&labels, *x))
                .y_label_formatter(&|y| category_label(&row_labels, *y))
                .x_label_style((FONT, 14).into_font().transform(FontTransform::Rotate90))
                .y_label_style((FONT, 14))
                .draw()?;

            let cells = matrix.values.iter().enumerate().flat_map(|(i, row)| {
                row.iter()
                    .enumerate()
                    .map(move |(j, &value)| (j as f64, (n - 1 - i) as f64, value))
            });

            chart.draw_series(cells.clone().map(|(x, y, value)| {
                let (r, g, b) = heat_rgb(value);
                Rectangle::new(
                    [(x - 0.5, y - 0.5), (x + 0.5, y + 0.5)],
                    RGBColor(r, g, b).filled(),
                )
            }))?;

            let centered = Pos::new(HPos::Center, VPos::Center);
            chart.draw_series(cells.map(|(x, y, value)| {
                let color = if value.abs() > 0.6 { WHITE } else { BLACK };
                let text = if value.is_nan() {
                    "nan".to_string()
                } else {
                    format!("{:.2}", value)
                };
                Text::new(
                    text,
                    (x, y),
                    (FONT, 15).into_font().color(&color).pos(centered),
                )
            }))?;
            Ok(())
        })
    }

    /// Density curves of one subset overlaid with a legend.
    pub fn render_density_chart(comparison: &DensityComparison) -> Result<RgbImage> {
        let points = comparison.curves.iter().flat_map(|c| c.points.iter());
        let (mut x_min, mut x_max, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY, 0f64);
        for &(x, y) in points {
            x_min = x_min.min(x);
            x_max = x_max.max(x);
            y_max = y_max.max(y);
        }
        if !x_min.is_finite() {
            (x_min, x_max) = (0.0, 10.0);
        }
        let y_max = (y_max * 1.1).max(0.1);
        let title = format!("{} Process", comparison.subset);

        Self::render(CHART_SIZE, |root| {
            let mut chart = ChartBuilder::on(root)
                .caption(&title, (FONT, 24))
                .margin(10)
                .x_label_area_size(40)
                .y_label_area_size(60)
                .build_cartesian_2d(x_min..x_max, 0f64..y_max)?;

            chart
                .configure_mesh()
                .x_desc("score")
                .y_desc("Density")
                .draw()?;

            for (i, curve) in comparison.curves.iter().enumerate() {
                let color = palette(i);
                chart
                    .draw_series(LineSeries::new(
                        curve.points.iter().copied(),
                        color.stroke_width(2),
                    ))?
                    .label(curve.label.as_str())
                    .legend(move |(x, y)| {
                        PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                    });
            }

            chart
                .configure_series_labels()
                .background_style(&WHITE.mix(0.8))
                .border_style(&BLACK)
                .draw()?;
            Ok(())
        })
    }

    /// Write every chart of the report as a PNG into `dir`.
    pub fn export_report(report: &EdaReport, dir: &Path) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(dir)?;
        let mut images: Vec<(String, RgbImage)> = Vec::new();

        images.push((
            slugify(&report.score_histogram.column),
            Self::render_histogram(&report.score_histogram, "Total Cup Points")?,
        ));
        images.push((
            "numeric_histograms".to_string(),
            Self::render_histogram_grid(&report.histograms)?,
        ));
        images.push((
            "sensory_correlation".to_string(),
            Self::render_heatmap(&report.correlation, "Sensory attribute correlation")?,
        ));

        for (prefix, analysis) in [("country", &report.by_country), ("processing", &report.by_processing)] {
            images.push((
                format!("{prefix}_counts"),
                Self::render_count_chart(&analysis.column, &analysis.counts)?,
            ));
            images.push((
                format!("{prefix}_{}", slugify(&analysis.value_column)),
                Self::render_box_chart(
                    &format!("{} by {}", analysis.value_column, analysis.column),
                    analysis,
                )?,
            ));
        }

        for matrix in &report.subset_correlations {
            images.push((
                format!("correlation_{}", slugify(&matrix.label)),
                Self::render_heatmap(matrix, &matrix.label)?,
            ));
        }
        for comparison in &report.densities {
            images.push((
                format!("kde_{}", slugify(&comparison.subset)),
                Self::render_density_chart(comparison)?,
            ));
        }

        let mut written = Vec::with_capacity(images.len());
        for (name, image) in images {
            let path = dir.join(format!("{name}.png"));
            debug!("Writing {}", path.display());
            image.save(&path).map_err(render_error)?;
            written.push(path);
        }

        info!("Exported {} charts to {}", written.len(), dir.display());
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::StatsCalculator;

    #[test]
    fn test_heatmap_with_nan_cells() {
        let matrix = CorrelationMatrix {
            label: "Natural / Dry".to_string(),
            columns: vec!["aroma".to_string(), "sweetness".to_string()],
            values: vec![vec![1.0, f64::NAN], vec![f64::NAN, f64::NAN]],
        };
        let image = StaticChartRenderer::render_heatmap(&matrix, &matrix.label).unwrap();
        assert_eq!(image.dimensions(), HEATMAP_SIZE);
    }

    #[test]
    fn test_histogram_grid_fills_canvas() {
        let hists: Vec<Histogram> = ["aroma", "flavor", "moisture"]
            .iter()
            .map(|c| StatsCalculator::compute_histogram(c, &[7.5, 8.0, 8.25, 8.5], 40))
            .collect();
        let image = StaticChartRenderer::render_histogram_grid(&hists).unwrap();
        assert_eq!(image.dimensions(), GRID_SIZE);
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Natural / Dry"), "natural_dry");
        assert_eq!(slugify("Washed / Wet"), "washed_wet");
        assert_eq!(slugify("total_cup_points"), "total_cup_points");
        assert_eq!(slugify("Semi-washed / Semi-pulped"), "semi_washed_semi_pulped");
    }

    #[test]
    fn test_category_label_only_on_integer_ticks() {
        let labels = vec!["Mexico".to_string(), "Guatemala".to_string()];
        assert_eq!(category_label(&labels, 0.0), "Mexico");
        assert_eq!(category_label(&labels, 1.0), "Guatemala");
        assert_eq!(category_label(&labels, 0.5), "");
        assert_eq!(category_label(&labels, 2.0), "");
        assert_eq!(category_label(&labels, -1.0), "");
    }
}
