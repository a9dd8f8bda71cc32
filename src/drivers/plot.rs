use std::io::Cursor;
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
use plotters::prelude::LineSeries;
use plotters::prelude::*;
use crate::drivers::error::RigError;
use crate::drivers::table::ResistanceTable;
use crate::drivers::velocity::CurveAnalysis;
#[derive(Clone, Debug)]
pub struct PlotStyle {
    pub width: u32,
    pub height: u32,
    pub background: RGBColor,
    pub palette: Vec<RGBColor>,
}
impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 600,
            background: RGBColor(10, 10, 10),
            palette: vec![BLUE, RED, GREEN, CYAN, MAGENTA, YELLOW, WHITE],
        }
    }
}
impl PlotStyle {
    /// Color of the `idx`-th series; cycles the palette, white when it is empty.
    pub fn color(&self, idx: usize) -> RGBColor {
        match self.palette.len() {
            0 => WHITE,
            len => self.palette[idx % len],
        }
    }
}
fn value_bounds<'a>(values: impl Iterator<Item = &'a f64>) -> (f64, f64) {
    let (min, max) = values
        .copied()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if !min.is_finite() || (max - min).abs() < f64::EPSILON {
        let center = if min.is_finite() { min } else { 0.0 };
        (center - 1.0, center + 1.0)
    } else {
        let pad = (max - min) * 0.05;
        (min - pad, max + pad)
    }
}
/// Every column of a derived table against its 1-based sample number.
pub fn render_resistance_png(
    table: &ResistanceTable,
    style: PlotStyle,
) -> Result<Vec<u8>, RigError> {
    if table.is_empty() {
        return Err(RigError::Plot("resistance table has no rows".into()));
    }
    let columns: Vec<(&str, &[f64])> = table
        .headers()
        .iter()
        .filter_map(|h| table.column(h).map(|c| (h.as_str(), c)))
        .collect();
    let (y_min, y_max) = value_bounds(columns.iter().flat_map(|(_, c)| c.iter()));
    let mut buffer = vec![0u8; (style.width * style.height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (style.width, style.height))
            .into_drawing_area();
        root.fill(&style.background)?;
        let mut chart = ChartBuilder::on(&root)
            .margin(10)
            .caption("Derived resistances", ("sans-serif", 20).into_font().color(&WHITE))
            .set_label_area_size(LabelAreaPosition::Left, 55)
            .set_label_area_size(LabelAreaPosition::Bottom, 40)
            .build_cartesian_2d(1f64..table.len().max(2) as f64, y_min..y_max)?;
        chart
            .configure_mesh()
            .x_desc("Sample")
            .y_desc("Resistance (ohm)")
            .axis_desc_style(("sans-serif", 14).into_font().color(&WHITE))
            .label_style(("sans-serif", 12).into_font().color(&WHITE))
            .light_line_style(&WHITE.mix(0.1))
            .draw()?;
        for (idx, (label, values)) in columns.iter().enumerate() {
            let color = style.color(idx);
            let series = values.iter().enumerate().map(|(i, v)| ((i + 1) as f64, *v));
            chart
                .draw_series(LineSeries::new(series, &color))?
                .label(label.to_string())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &color));
        }
        chart
            .configure_series_labels()
            .label_font(("sans-serif", 12).into_font().color(&WHITE))
            .border_style(&WHITE.mix(0.2))
            .background_style(&style.background)
            .draw()?;
        root.present()?;
    }
    encode_png(&buffer, style.width, style.height)
}
/// Baseline-corrected curves against time, with a vertical marker at each peak.
pub fn render_curves_png(analysis: &CurveAnalysis, style: PlotStyle) -> Result<Vec<u8>, RigError> {
    if analysis.curves.is_empty() || analysis.time_s.is_empty() {
        return Err(RigError::Plot("no curves selected".into()));
    }
    let t_end = analysis
        .time_s
        .last()
        .copied()
        .unwrap_or(0.0)
        .max(f64::EPSILON);
    let (y_min, y_max) = value_bounds(analysis.curves.iter().flat_map(|c| c.values.iter()));
    let mut buffer = vec![0u8; (style.width * style.height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (style.width, style.height))
            .into_drawing_area();
        root.fill(&style.background)?;
        let mut chart = ChartBuilder::on(&root)
            .margin(10)
            .caption("Resistance curves", ("sans-serif", 20).into_font().color(&WHITE))
            .set_label_area_size(LabelAreaPosition::Left, 55)
            .set_label_area_size(LabelAreaPosition::Bottom, 40)
            .build_cartesian_2d(0f64..t_end, y_min..y_max)?;
        chart
            .configure_mesh()
            .x_desc("Time (s)")
            .y_desc("Value (normalized)")
            .axis_desc_style(("sans-serif", 14).into_font().color(&WHITE))
            .label_style(("sans-serif", 12).into_font().color(&WHITE))
            .light_line_style(&WHITE.mix(0.1))
            .draw()?;
        for (idx, curve) in analysis.curves.iter().enumerate() {
            let color = style.color(idx);
            let series = analysis
                .time_s
                .iter()
                .copied()
                .zip(curve.values.iter().copied());
            chart
                .draw_series(LineSeries::new(series, &color))?
                .label(curve.label.clone())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &color));
        }
        let marker = RGBColor(160, 160, 160);
        for peak in analysis.curves.iter().filter_map(|c| c.peak) {
            chart.draw_series(LineSeries::new(
                [(peak.time_s, y_min), (peak.time_s, y_max)],
                marker.mix(0.6).stroke_width(1),
            ))?;
            chart.draw_series(std::iter::once(Text::new(
                format!("{:.2}s", peak.time_s),
                (peak.time_s, peak.value),
                ("sans-serif", 12).into_font().color(&marker),
            )))?;
        }
        chart
            .configure_series_labels()
            .label_font(("sans-serif", 12).into_font().color(&WHITE))
            .border_style(&WHITE.mix(0.2))
            .background_style(&style.background)
            .draw()?;
        root.present()?;
    }
    encode_png(&buffer, style.width, style.height)
}
fn encode_png(buffer: &[u8], width: u32, height: u32) -> Result<Vec<u8>, RigError> {
    let image = ImageBuffer::<Rgb<u8>, _>::from_raw(width, height, buffer.to_vec())
        .ok_or_else(|| RigError::Plot("failed to allocate image buffer".into()))?;
    let mut output = Vec::new();
    let dynamic = DynamicImage::ImageRgb8(image);
    dynamic.write_to(&mut Cursor::new(&mut output), ImageFormat::Png)?;
    Ok(output)
}
