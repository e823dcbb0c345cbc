//! Chart geometry
//!
//! Pure layout math for the SVG renderer: pie slices and their callout
//! labels, plus the y-scale and band positions of cartesian charts.
//! Angles are in degrees, start at 3 o'clock and grow counter-clockwise
//! (screen y points down, so sines are negated).

use serde::{Deserialize, Serialize};

use findash_utils::{format_percent, CurrencyFormat};

use crate::models::ChartDatum;

pub const RADIAN: f64 = std::f64::consts::PI / 180.0;

/// Default label threshold, in percent
pub const DEFAULT_LABEL_THRESHOLD: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Point at `radius` from `(cx, cy)` at `angle` degrees
pub fn polar(cx: f64, cy: f64, radius: f64, angle: f64) -> Point {
    Point::new(
        cx + radius * (-angle * RADIAN).cos(),
        cy + radius * (-angle * RADIAN).sin(),
    )
}

/// One laid-out pie slice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slice {
    pub index: usize,
    pub datum: ChartDatum,
    pub start_angle: f64,
    pub end_angle: f64,
    pub mid_angle: f64,
    /// Share of the total, between 0 and 1
    pub percent: f64,
}

impl Slice {
    pub fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }
}

/// Lay out slices over the full circle in input order.
///
/// A zero (or non-finite) total yields no slices.
pub fn pie_layout(data: &[ChartDatum]) -> Vec<Slice> {
    let total: f64 = data.iter().map(|d| d.value.max(0.0)).sum();
    if total <= 0.0 || !total.is_finite() {
        return Vec::new();
    }

    let mut angle = 0.0;
    data.iter()
        .enumerate()
        .map(|(index, datum)| {
            let percent = datum.value.max(0.0) / total;
            let start_angle = angle;
            let end_angle = start_angle + percent * 360.0;
            angle = end_angle;
            Slice {
                index,
                datum: datum.clone(),
                start_angle,
                end_angle,
                mid_angle: (start_angle + end_angle) / 2.0,
                percent,
            }
        })
        .collect()
}

fn fmt_coord(v: f64) -> String {
    let rounded = (v * 100.0).round() / 100.0;
    if rounded == 0.0 {
        "0".to_string()
    } else {
        rounded.to_string()
    }
}

/// SVG path for a pie sector
pub fn sector_path(cx: f64, cy: f64, radius: f64, start_angle: f64, end_angle: f64) -> String {
    let sweep = end_angle - start_angle;
    if sweep <= 0.0 {
        return String::new();
    }

    let start = polar(cx, cy, radius, start_angle);
    let r = fmt_coord(radius);

    if sweep >= 359.999 {
        let opposite = polar(cx, cy, radius, start_angle + 180.0);
        return format!(
            "M {sx},{sy} A {r},{r} 0 1 0 {ox},{oy} A {r},{r} 0 1 0 {sx},{sy} Z",
            sx = fmt_coord(start.x),
            sy = fmt_coord(start.y),
            ox = fmt_coord(opposite.x),
            oy = fmt_coord(opposite.y),
            r = r,
        );
    }

    let end = polar(cx, cy, radius, end_angle);
    let large_arc = if sweep > 180.0 { 1 } else { 0 };
    format!(
        "M {cx},{cy} L {sx},{sy} A {r},{r} 0 {large} 0 {ex},{ey} Z",
        cx = fmt_coord(cx),
        cy = fmt_coord(cy),
        sx = fmt_coord(start.x),
        sy = fmt_coord(start.y),
        r = r,
        large = large_arc,
        ex = fmt_coord(end.x),
        ey = fmt_coord(end.y),
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAnchor {
    Start,
    End,
}

impl TextAnchor {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextAnchor::Start => "start",
            TextAnchor::End => "end",
        }
    }

    fn for_angle(mid_angle: f64) -> Self {
        if (-mid_angle * RADIAN).cos() >= 0.0 {
            TextAnchor::Start
        } else {
            TextAnchor::End
        }
    }

    fn direction(&self) -> f64 {
        match self {
            TextAnchor::Start => 1.0,
            TextAnchor::End => -1.0,
        }
    }
}

/// One text line of a callout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalloutLine {
    pub position: Point,
    pub text: String,
    /// Primary line (bold, darker) vs secondary
    pub primary: bool,
}

/// Elbow connector from a slice edge to its label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Callout {
    pub start: Point,
    pub bend: Point,
    pub end: Point,
    pub marker_radius: f64,
    pub anchor: TextAnchor,
    pub lines: Vec<CalloutLine>,
}

impl Callout {
    /// `points` attribute for an SVG polyline
    pub fn polyline_points(&self) -> String {
        [self.start, self.bend, self.end]
            .iter()
            .map(|p| format!("{},{}", fmt_coord(p.x), fmt_coord(p.y)))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn below_threshold(slice: &Slice, threshold_percent: f64) -> bool {
    slice.percent * 100.0 < threshold_percent
}

/// Callout for the balance pie: name with percent, then the amount
pub fn main_label(
    slice: &Slice,
    cx: f64,
    cy: f64,
    radius: f64,
    threshold_percent: f64,
    currency: &CurrencyFormat,
) -> Option<Callout> {
    if below_threshold(slice, threshold_percent) {
        return None;
    }

    let mid = slice.mid_angle;
    let anchor = TextAnchor::for_angle(mid);
    let dir = anchor.direction();

    let start = polar(cx, cy, radius + 10.0, mid);
    let bend = polar(cx, cy, radius + 40.0, mid);
    let offset = if slice.index % 2 == 0 { -12.0 } else { 12.0 };
    let end = Point::new(bend.x + dir * 5.0, bend.y + offset);
    let text_x = end.x + dir * 16.0;

    Some(Callout {
        start,
        bend,
        end,
        marker_radius: 3.0,
        anchor,
        lines: vec![
            CalloutLine {
                position: Point::new(text_x, end.y - 4.0),
                text: format!("{} ({})", slice.datum.name, format_percent(slice.percent)),
                primary: true,
            },
            CalloutLine {
                position: Point::new(text_x, end.y + 14.0),
                text: currency.format(slice.datum.display_value),
                primary: false,
            },
        ],
    })
}

/// Callout for drill-down pies: percentage only
pub fn drilldown_label(
    slice: &Slice,
    cx: f64,
    cy: f64,
    radius: f64,
    threshold_percent: f64,
) -> Option<Callout> {
    if below_threshold(slice, threshold_percent) {
        return None;
    }

    let mid = slice.mid_angle;
    let anchor = TextAnchor::for_angle(mid);
    let dir = anchor.direction();

    let start = polar(cx, cy, radius + 8.0, mid);
    let mut bend = polar(cx, cy, radius + 32.0, mid);
    bend.y += if slice.index % 2 == 0 { -10.0 } else { 10.0 };
    let end = Point::new(bend.x + dir * 5.0, bend.y);

    Some(Callout {
        start,
        bend,
        end,
        marker_radius: 2.0,
        anchor,
        lines: vec![CalloutLine {
            position: Point::new(end.x + dir * 12.0, end.y + 4.0),
            text: format_percent(slice.percent),
            primary: true,
        }],
    })
}

/// Y axis with "nice" tick values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scale {
    pub min: f64,
    pub max: f64,
    pub ticks: Vec<f64>,
}

fn nice_step(raw: f64) -> f64 {
    let exponent = raw.log10().floor();
    let magnitude = 10f64.powf(exponent);
    let error = raw / magnitude;
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };
    factor * magnitude
}

/// Decimal places needed to write a multiple of `step` exactly
fn step_decimals(step: f64) -> i32 {
    (-step.log10().floor()).max(0.0) as i32
}

fn round_decimals(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Tick scale covering every value and zero, about `target_ticks` ticks.
///
/// No values yields an empty scale.
pub fn nice_scale(values: &[f64], target_ticks: usize) -> Scale {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return Scale { min: 0.0, max: 0.0, ticks: Vec::new() };
    }

    let lo = finite.iter().copied().fold(0.0_f64, f64::min);
    let mut hi = finite.iter().copied().fold(0.0_f64, f64::max);
    if lo == hi {
        hi = lo + 1.0;
    }

    let intervals = target_ticks.max(2) - 1;
    let step = nice_step((hi - lo) / intervals as f64);
    let decimals = step_decimals(step);
    let min = round_decimals((lo / step).floor() * step, decimals);
    let max = round_decimals((hi / step).ceil() * step, decimals);

    let count = ((max - min) / step).round() as usize;
    let ticks = (0..=count)
        .map(|i| round_decimals(min + i as f64 * step, decimals))
        .collect();

    Scale { min, max, ticks }
}

/// Drawing area of a cartesian chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plot {
    pub width: f64,
    pub height: f64,
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
    pub scale: Scale,
    pub categories: usize,
}

impl Plot {
    pub fn new(width: f64, height: f64, scale: Scale, categories: usize) -> Self {
        Self {
            width,
            height,
            left: 64.0,
            right: 16.0,
            top: 16.0,
            bottom: 32.0,
            scale,
            categories,
        }
    }

    pub fn inner_width(&self) -> f64 {
        (self.width - self.left - self.right).max(0.0)
    }

    pub fn inner_height(&self) -> f64 {
        (self.height - self.top - self.bottom).max(0.0)
    }

    pub fn baseline(&self) -> f64 {
        self.y(0.0)
    }

    pub fn band_width(&self) -> f64 {
        if self.categories == 0 {
            0.0
        } else {
            self.inner_width() / self.categories as f64
        }
    }

    /// Centre of the category band at `index`
    pub fn x(&self, index: usize) -> f64 {
        self.left + self.band_width() * (index as f64 + 0.5)
    }

    /// Pixel row of a value
    pub fn y(&self, value: f64) -> f64 {
        let span = self.scale.max - self.scale.min;
        if span <= 0.0 {
            return self.top + self.inner_height();
        }
        let ratio = (value - self.scale.min) / span;
        self.top + self.inner_height() * (1.0 - ratio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(values: &[(&str, f64)]) -> Vec<ChartDatum> {
        values.iter().map(|(n, v)| ChartDatum::new(*n, *v)).collect()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_pie_layout_percentages_sum_to_one() {
        let slices = pie_layout(&data(&[("A", 530776.0), ("B", 233400.0), ("C", 297376.0)]));
        assert_eq!(slices.len(), 3);
        let sum: f64 = slices.iter().map(|s| s.percent).sum();
        assert!(approx(sum, 1.0));
        assert!(approx(slices[0].start_angle, 0.0));
        assert!(approx(slices[2].end_angle, 360.0));
        assert!(approx(slices[1].start_angle, slices[0].end_angle));
    }

    #[test]
    fn test_pie_layout_zero_total() {
        assert!(pie_layout(&data(&[("A", 0.0), ("B", 0.0)])).is_empty());
        assert!(pie_layout(&[]).is_empty());
    }

    #[test]
    fn test_polar_orientation() {
        let right = polar(100.0, 100.0, 10.0, 0.0);
        assert!(approx(right.x, 110.0) && approx(right.y, 100.0));
        // 90 degrees is straight up on screen
        let up = polar(100.0, 100.0, 10.0, 90.0);
        assert!(approx(up.x, 100.0) && approx(up.y, 90.0));
    }

    #[test]
    fn test_sector_path_half_and_full() {
        let half = sector_path(100.0, 100.0, 50.0, 0.0, 180.0);
        assert!(half.starts_with("M 100,100 L 150,100 A 50,50 0 0 0 50,100"));

        let major = sector_path(100.0, 100.0, 50.0, 0.0, 270.0);
        assert!(major.contains(" 0 1 0 "));

        let full = sector_path(100.0, 100.0, 50.0, 0.0, 360.0);
        assert_eq!(full.matches('A').count(), 2);
        assert!(full.starts_with("M 150,100"));

        assert!(sector_path(100.0, 100.0, 50.0, 10.0, 10.0).is_empty());
    }

    #[test]
    fn test_labels_hidden_below_threshold() {
        let slices = pie_layout(&data(&[("Big", 97.5), ("Tiny", 2.5)]));
        let currency = CurrencyFormat::default();

        assert!(main_label(&slices[0], 0.0, 0.0, 80.0, 3.0, &currency).is_some());
        assert!(main_label(&slices[1], 0.0, 0.0, 80.0, 3.0, &currency).is_none());
        assert!(drilldown_label(&slices[1], 0.0, 0.0, 80.0, 3.0).is_none());
        let edge = pie_layout(&data(&[("A", 96.0), ("B", 4.0)]));
        assert!(drilldown_label(&edge[1], 0.0, 0.0, 80.0, 3.0).is_some());
    }

    #[test]
    fn test_main_label_geometry() {
        // single slice: mid angle 180, label on the left
        let slices = pie_layout(&data(&[("Assets", 1000.5)]));
        let currency = CurrencyFormat::default();
        let callout = main_label(&slices[0], 200.0, 150.0, 100.0, 3.0, &currency).unwrap();

        assert_eq!(callout.anchor, TextAnchor::End);
        assert!(approx(callout.start.x, 90.0));
        assert!(approx(callout.bend.x, 60.0));
        assert!(approx(callout.end.x, 55.0));
        assert!(approx(callout.end.y, 138.0));
        assert_eq!(callout.marker_radius, 3.0);

        assert_eq!(callout.lines[0].text, "Assets (100.0%)");
        assert!(approx(callout.lines[0].position.x, 39.0));
        assert!(approx(callout.lines[0].position.y, 134.0));
        assert_eq!(callout.lines[1].text, "$1,001");
        assert!(approx(callout.lines[1].position.y, 152.0));
    }

    #[test]
    fn test_main_label_alternates_offset() {
        let slices = pie_layout(&data(&[("A", 25.0), ("B", 25.0), ("C", 50.0)]));
        let currency = CurrencyFormat::default();
        let a = main_label(&slices[0], 0.0, 0.0, 100.0, 3.0, &currency).unwrap();
        let b = main_label(&slices[1], 0.0, 0.0, 100.0, 3.0, &currency).unwrap();
        assert!(approx(a.end.y, a.bend.y - 12.0));
        assert!(approx(b.end.y, b.bend.y + 12.0));
        assert_eq!(a.anchor, TextAnchor::Start);
    }

    #[test]
    fn test_drilldown_label_geometry() {
        let slices = pie_layout(&data(&[("A", 1.0), ("B", 1.0)]));
        let first = drilldown_label(&slices[0], 0.0, 0.0, 100.0, 3.0).unwrap();
        // mid angle 90: straight up, cos(-90deg) ~ 0 -> start
        assert_eq!(first.anchor, TextAnchor::Start);
        assert!(approx(first.start.y, -108.0));
        assert!(approx(first.bend.y, -132.0 - 10.0));
        assert!(approx(first.end.x, first.bend.x + 5.0));
        assert_eq!(first.lines.len(), 1);
        assert_eq!(first.lines[0].text, "50.0%");
        assert!(approx(first.lines[0].position.x, first.end.x + 12.0));
        assert!(approx(first.lines[0].position.y, first.end.y + 4.0));

        let second = drilldown_label(&slices[1], 0.0, 0.0, 100.0, 3.0).unwrap();
        assert!(approx(second.bend.y, 132.0 + 10.0));
        assert_eq!(second.marker_radius, 2.0);
    }

    #[test]
    fn test_nice_scale_includes_zero() {
        let scale = nice_scale(&[12_000.0, 48_500.0, 31_000.0], 5);
        assert_eq!(scale.ticks, vec![0.0, 10_000.0, 20_000.0, 30_000.0, 40_000.0, 50_000.0]);

        let negative = nice_scale(&[-3_000.0, 8_000.0], 5);
        assert!(negative.ticks.contains(&0.0));
        assert!(negative.min <= -3_000.0);
        assert!(negative.max >= 8_000.0);
    }

    #[test]
    fn test_nice_scale_edge_cases() {
        assert!(nice_scale(&[], 5).ticks.is_empty());
        let zeros = nice_scale(&[0.0, 0.0], 5);
        assert_eq!(zeros.ticks.first(), Some(&0.0));
        assert!(zeros.max > 0.0);
    }

    #[test]
    fn test_nice_scale_fractional_steps_are_exact() {
        let scale = nice_scale(&[0.0, 1.0], 5);
        assert_eq!(scale.ticks, vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0]);

        let small = nice_scale(&[0.03, 0.07], 5);
        assert!(small.ticks.iter().all(|t| t.to_string().len() <= 4), "{:?}", small.ticks);
    }

    #[test]
    fn test_plot_mapping() {
        let scale = nice_scale(&[100.0], 5);
        let plot = Plot::new(400.0, 300.0, scale, 4);
        assert!(approx(plot.y(plot.scale.max), plot.top));
        assert!(approx(plot.baseline(), plot.top + plot.inner_height()));
        assert!(approx(plot.band_width(), 80.0));
        assert!(approx(plot.x(0), plot.left + 40.0));
    }
}
