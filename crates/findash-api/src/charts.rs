//! Server-side SVG chart rendering
//!
//! Geometry comes from `findash_core::chart`; this module only turns it
//! into markup. Hover tooltips use SVG `<title>` elements.

use findash_core::chart::{
    drilldown_label, main_label, nice_scale, pie_layout, sector_path, Callout, Plot,
};
use findash_core::{safe_data, ChartDatum, SeriesSet};
use findash_utils::{escape_html, format_percent, CurrencyFormat};

const PLACEHOLDER_COLOR: &str = "#e5e7eb";
const AXIS_COLOR: &str = "#9ca3af";
const GRID_COLOR: &str = "#e5e7eb";

/// Colour of a named cartesian series
pub fn series_color(key: &str) -> &'static str {
    match key {
        "income" | "assets" => "#004dda",
        "costs" => "#f59e0b",
        "expenses" | "outflows" | "liabilities" => "#f97316",
        "period_profit" | "equity" => "#22c55e",
        "accumulated_profit" => "#8b5cf6",
        _ => "#6b7280",
    }
}

fn palette_color(palette: &[String], index: usize) -> &str {
    if palette.is_empty() {
        PLACEHOLDER_COLOR
    } else {
        &palette[index % palette.len()]
    }
}

/// Which callout a pie draws
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelStyle {
    /// Name, percent and amount
    Main,
    /// Percent only
    Drilldown,
}

/// HTMX request fired when a given slice (or its legend entry) is clicked
#[derive(Debug, Clone)]
pub struct SliceLink {
    pub slice: String,
    pub url: String,
    pub target: String,
}

impl SliceLink {
    fn attributes(&self) -> String {
        format!(
            r#" hx-get="{}" hx-target="{}" hx-swap="outerHTML" style="cursor:pointer""#,
            escape_html(&self.url),
            escape_html(&self.target)
        )
    }

    fn applies_to(&self, datum: &ChartDatum) -> bool {
        self.slice == datum.name
    }
}

/// A pie chart with callout labels
pub struct PieChart<'a> {
    data: Vec<ChartDatum>,
    palette: &'a [String],
    currency: &'a CurrencyFormat,
    style: LabelStyle,
    threshold: f64,
    width: f64,
    height: f64,
    radius: f64,
    link: Option<SliceLink>,
}

impl<'a> PieChart<'a> {
    pub fn new(
        data: &[ChartDatum],
        palette: &'a [String],
        currency: &'a CurrencyFormat,
        style: LabelStyle,
    ) -> Self {
        let (width, height, radius) = match style {
            LabelStyle::Main => (520.0, 340.0, 100.0),
            LabelStyle::Drilldown => (380.0, 280.0, 80.0),
        };
        Self {
            data: safe_data(data),
            palette,
            currency,
            style,
            threshold: findash_core::chart::DEFAULT_LABEL_THRESHOLD,
            width,
            height,
            radius,
            link: None,
        }
    }

    pub fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn link(mut self, link: SliceLink) -> Self {
        self.link = Some(link);
        self
    }

    fn is_placeholder(&self) -> bool {
        self.data.len() == 1 && self.data[0].is_placeholder()
    }

    pub fn render(&self) -> String {
        let cx = self.width / 2.0;
        let cy = self.height / 2.0;
        let placeholder = self.is_placeholder();

        let mut svg = format!(
            r#"<svg viewBox="0 0 {w} {h}" class="w-full h-auto" role="img" xmlns="http://www.w3.org/2000/svg">"#,
            w = self.width,
            h = self.height
        );

        let slices = pie_layout(&self.data);
        for slice in &slices {
            let color = if placeholder {
                PLACEHOLDER_COLOR
            } else {
                palette_color(self.palette, slice.index)
            };
            let link = self
                .link
                .as_ref()
                .filter(|l| !placeholder && l.applies_to(&slice.datum))
                .map(SliceLink::attributes)
                .unwrap_or_default();
            let tooltip = if placeholder {
                escape_html(&slice.datum.name)
            } else {
                format!(
                    "{}: {} ({})",
                    escape_html(&slice.datum.name),
                    escape_html(&self.currency.format(slice.datum.display_value)),
                    format_percent(slice.percent)
                )
            };
            svg.push_str(&format!(
                r##"<path d="{}" fill="{}" stroke="#ffffff" stroke-width="1" class="hover:opacity-80"{}><title>{}</title></path>"##,
                sector_path(cx, cy, self.radius, slice.start_angle, slice.end_angle),
                escape_html(color),
                link,
                tooltip
            ));
        }

        if placeholder {
            svg.push_str(&format!(
                r#"<text x="{}" y="{}" text-anchor="middle" font-size="13" fill="{}">No data</text>"#,
                cx, cy + 4.0, AXIS_COLOR
            ));
        } else {
            for slice in &slices {
                let (r, threshold) = (self.radius, self.threshold);
                let callout = match self.style {
                    LabelStyle::Main => main_label(slice, cx, cy, r, threshold, self.currency),
                    LabelStyle::Drilldown => drilldown_label(slice, cx, cy, r, threshold),
                };
                if let Some(callout) = callout {
                    let color = palette_color(self.palette, slice.index);
                    svg.push_str(&render_callout(&callout, color));
                }
            }
        }

        svg.push_str("</svg>");
        svg
    }

    /// Legend list: swatch, name and amount per entry
    pub fn legend(&self) -> String {
        if self.is_placeholder() {
            return String::new();
        }

        // same shares as the drawn slices
        let slices = pie_layout(&self.data);
        let mut html = String::from("<ul class='mt-2 space-y-1 text-sm'>");
        for (index, datum) in self.data.iter().enumerate() {
            let link = self
                .link
                .as_ref()
                .filter(|l| l.applies_to(datum))
                .map(SliceLink::attributes)
                .unwrap_or_default();
            let percent = slices.get(index).map(|slice| slice.percent).unwrap_or(0.0);
            html.push_str(&format!(
                r#"<li class='flex items-center justify-between gap-2'{}><span class='flex items-center gap-2'><span class='inline-block w-3 h-3 rounded-sm' style='background:{}'></span>{}</span><span class='text-gray-600'>{} <span class='text-gray-400'>({})</span></span></li>"#,
                link,
                escape_html(palette_color(self.palette, index)),
                escape_html(&datum.name),
                escape_html(&self.currency.format(datum.display_value)),
                format_percent(percent)
            ));
        }
        html.push_str("</ul>");
        html
    }
}

fn render_callout(callout: &Callout, color: &str) -> String {
    let mut out = format!(
        r#"<polyline points="{}" stroke="{}" fill="none"/><circle cx="{:.2}" cy="{:.2}" r="{}" fill="{}" stroke="none"/>"#,
        callout.polyline_points(),
        escape_html(color),
        callout.end.x,
        callout.end.y,
        callout.marker_radius,
        escape_html(color)
    );
    for line in &callout.lines {
        let (fill, weight, size) = if line.primary { ("#1f2937", "600", 12) } else { ("#6b7280", "400", 11) };
        out.push_str(&format!(
            r#"<text x="{:.2}" y="{:.2}" text-anchor="{}" fill="{}" font-size="{}" font-weight="{}">{}</text>"#,
            line.position.x,
            line.position.y,
            callout.anchor.as_str(),
            fill,
            size,
            weight,
            escape_html(&line.text)
        ));
    }
    out
}

/// How series of a cartesian chart are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartesianKind {
    Line,
    Bar,
    Area,
}

const CARTESIAN_WIDTH: f64 = 720.0;
const CARTESIAN_HEIGHT: f64 = 300.0;

/// Render a line, grouped bar or overlapping area chart
pub fn cartesian_chart(set: &SeriesSet, kind: CartesianKind, currency: &CurrencyFormat) -> String {
    if set.is_empty() {
        return "<div class='h-48 flex items-center justify-center text-gray-400 text-sm'>No data for the selected range</div>".to_string();
    }

    let values: Vec<f64> = set.series.iter().flat_map(|s| s.values.iter().copied()).collect();
    let scale = nice_scale(&values, 5);
    let plot = Plot::new(CARTESIAN_WIDTH, CARTESIAN_HEIGHT, scale, set.categories.len());

    let mut svg = format!(
        r#"<svg viewBox="0 0 {} {}" class="w-full h-auto" xmlns="http://www.w3.org/2000/svg">"#,
        plot.width, plot.height
    );
    svg.push_str(&render_axes(&plot, &set.categories, currency));

    match kind {
        CartesianKind::Line => svg.push_str(&render_lines(&plot, set, false)),
        CartesianKind::Area => svg.push_str(&render_lines(&plot, set, true)),
        CartesianKind::Bar => svg.push_str(&render_bars(&plot, set)),
    }

    svg.push_str(&render_hover_bands(&plot, set, currency));
    svg.push_str("</svg>");
    svg.push_str(&series_legend(set));
    svg
}

fn render_axes(plot: &Plot, categories: &[String], currency: &CurrencyFormat) -> String {
    let mut out = String::new();
    let x_end = plot.width - plot.right;

    for tick in &plot.scale.ticks {
        let y = plot.y(*tick);
        out.push_str(&format!(
            r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}" stroke-dasharray="3 3"/><text x="{:.2}" y="{:.2}" text-anchor="end" font-size="11" fill="{}">{}</text>"#,
            plot.left,
            y,
            x_end,
            y,
            GRID_COLOR,
            plot.left - 8.0,
            y + 4.0,
            AXIS_COLOR,
            escape_html(&currency.axis_thousands(*tick))
        ));
    }

    let base = plot.top + plot.inner_height();
    out.push_str(&format!(
        r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}"/>"#,
        plot.left,
        base,
        x_end,
        base,
        AXIS_COLOR
    ));

    for (index, label) in categories.iter().enumerate() {
        out.push_str(&format!(
            r#"<text x="{:.2}" y="{:.2}" text-anchor="middle" font-size="11" fill="{}">{}</text>"#,
            plot.x(index),
            base + 18.0,
            AXIS_COLOR,
            escape_html(label)
        ));
    }
    out
}

fn render_lines(plot: &Plot, set: &SeriesSet, filled: bool) -> String {
    let mut out = String::new();
    for series in &set.series {
        let color = series_color(&series.key);
        let points: Vec<String> = series
            .values
            .iter()
            .enumerate()
            .map(|(i, v)| format!("{:.2},{:.2}", plot.x(i), plot.y(*v)))
            .collect();

        if filled && !points.is_empty() {
            let baseline = plot.baseline();
            let last = series.values.len().saturating_sub(1);
            out.push_str(&format!(
                r#"<path d="M {:.2},{:.2} L {} L {:.2},{:.2} Z" fill="{}" fill-opacity="0.2" stroke="none"/>"#,
                plot.x(0), baseline,
                points.join(" L "),
                plot.x(last), baseline,
                color
            ));
        }

        out.push_str(&format!(
            r#"<polyline points="{}" fill="none" stroke="{}" stroke-width="2"/>"#,
            points.join(" "),
            color
        ));
        if !filled {
            for (i, v) in series.values.iter().enumerate() {
                out.push_str(&format!(
                    r#"<circle cx="{:.2}" cy="{:.2}" r="3" fill="{}"/>"#,
                    plot.x(i), plot.y(*v), color
                ));
            }
        }
    }
    out
}

fn render_bars(plot: &Plot, set: &SeriesSet) -> String {
    let mut out = String::new();
    let groups = set.series.len().max(1) as f64;
    let group_width = plot.band_width() * 0.7;
    let bar_width = group_width / groups;
    let baseline = plot.baseline();

    for (s, series) in set.series.iter().enumerate() {
        let color = series_color(&series.key);
        for (i, v) in series.values.iter().enumerate() {
            let x = plot.x(i) - group_width / 2.0 + bar_width * s as f64;
            let y = plot.y(*v);
            let (top, height) = if y < baseline {
                (y, baseline - y)
            } else {
                (baseline, y - baseline)
            };
            out.push_str(&format!(
                r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}" rx="2"/>"#,
                x, top, bar_width, height, color
            ));
        }
    }
    out
}

/// Invisible full-height bands carrying the per-month tooltip
fn render_hover_bands(plot: &Plot, set: &SeriesSet, currency: &CurrencyFormat) -> String {
    let band = plot.band_width();
    let mut out = String::new();
    for (index, label) in set.categories.iter().enumerate() {
        let mut tooltip = escape_html(label);
        for series in &set.series {
            if let Some(value) = series.values.get(index) {
                tooltip.push_str(&format!(
                    "\n{}: {}",
                    escape_html(&series.name),
                    escape_html(&currency.format(*value))
                ));
            }
        }
        out.push_str(&format!(
            r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="transparent" class="hover:fill-gray-100/30"><title>{}</title></rect>"#,
            plot.x(index) - band / 2.0,
            plot.top,
            band,
            plot.inner_height(),
            tooltip
        ));
    }
    out
}

fn series_legend(set: &SeriesSet) -> String {
    let items: Vec<String> = set
        .series
        .iter()
        .map(|s| {
            format!(
                "<span class='flex items-center gap-1'><span class='inline-block w-3 h-3 rounded-full' style='background:{}'></span>{}</span>",
                series_color(&s.key),
                escape_html(&s.name)
            )
        })
        .collect();
    format!(
        "<div class='flex flex-wrap justify-center gap-4 mt-2 text-sm text-gray-600'>{}</div>",
        items.join("")
    )
}
