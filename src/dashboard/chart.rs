//! Inline SVG charts for the dashboard page.
//!
//! Charts are plain strings of SVG markup; every label passes through
//! [`quick_xml::escape::escape`] before it is written.
use crate::roster::aggregate::CategoryCount;
use crate::roster::aggregate::YearCount;
use quick_xml::escape::escape;
use std::f64::consts::PI;

pub const SET3: [&str; 12] = [
    "#8dd3c7", "#ffffb3", "#bebada", "#fb8072", "#80b1d3", "#fdb462", "#b3de69", "#fccde5", "#d9d9d9", "#bc80bd",
    "#ccebc5", "#ffed6f",
];

pub const PLOTLY: [&str; 10] = [
    "#636efa", "#ef553b", "#00cc96", "#ab63fa", "#ffa15a", "#19d3f3", "#ff6692", "#b6e880", "#ff97ff", "#fecb52",
];

pub const BLUES_REVERSED: [&str; 9] = [
    "#08306b", "#08519c", "#2171b5", "#4292c6", "#6baed6", "#9ecae1", "#c6dbef", "#deebf7", "#f7fbff",
];

pub const MARKER_COLOR: &str = "#D21F4B";

const WIDTH: f64 = 560.0;
const HEIGHT: f64 = 380.0;
const MARGIN_LEFT: f64 = 56.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 52.0;
const MARGIN_BOTTOM: f64 = 104.0;

fn open_svg(svg: &mut String, title: &str, title_x: f64) {
    svg.push_str(&format!(
        r#"<svg class="chart" xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {WIDTH} {HEIGHT}" role="img" aria-label="{label}"><text class="chart-title" x="{x:.1}" y="28" text-anchor="middle">{label}</text>"#,
        label = escape(title),
        x = WIDTH * title_x,
    ));
}

fn empty_chart(title: &str) -> String {
    let mut svg = String::new();
    open_svg(&mut svg, title, 0.5);
    svg.push_str(&format!(
        r#"<text class="chart-empty" x="{:.1}" y="{:.1}" text-anchor="middle">Tidak ada data</text></svg>"#,
        WIDTH / 2.0,
        HEIGHT / 2.0
    ));
    svg
}

/// Largest axis value and tick step covering `max` with about five integer ticks.
fn integer_axis(max: usize) -> (usize, usize) {
    let step = max.div_ceil(5).max(1);
    let top = max.div_ceil(step).max(1) * step;
    (top, step)
}

fn plot_height() -> f64 {
    HEIGHT - MARGIN_TOP - MARGIN_BOTTOM
}

fn plot_width() -> f64 {
    WIDTH - MARGIN_LEFT - MARGIN_RIGHT
}

fn y_position(value: usize, top: usize) -> f64 {
    MARGIN_TOP + plot_height() * (1.0 - value as f64 / top as f64)
}

fn y_axis(svg: &mut String, top: usize, step: usize, label: &str) {
    let mut tick = 0;
    while tick <= top {
        let y = y_position(tick, top);
        svg.push_str(&format!(
            r#"<line class="grid" x1="{MARGIN_LEFT}" y1="{y:.1}" x2="{:.1}" y2="{y:.1}"/><text class="tick" x="{:.1}" y="{:.1}" text-anchor="end">{tick}</text>"#,
            WIDTH - MARGIN_RIGHT,
            MARGIN_LEFT - 6.0,
            y + 4.0,
        ));
        tick += step;
    }
    svg.push_str(&format!(
        r#"<text class="axis-label" transform="translate(14 {:.1}) rotate(-90)" text-anchor="middle">{}</text>"#,
        MARGIN_TOP + plot_height() / 2.0,
        escape(label)
    ));
}

/// Vertical bars in the given order, one palette color per bar, counts printed on top.
pub fn bar_chart(title: &str, x_label: &str, counts: &[CategoryCount], palette: &[&str]) -> String {
    if counts.is_empty() || palette.is_empty() {
        return empty_chart(title);
    }
    let max = counts.iter().map(|entry| entry.count).max().unwrap_or(0);
    let (top, step) = integer_axis(max);
    let slot = plot_width() / counts.len() as f64;
    let bar_width = slot * 0.7;
    let baseline = y_position(0, top);

    let mut svg = String::new();
    open_svg(&mut svg, title, 0.5);
    y_axis(&mut svg, top, step, "Jumlah");
    for (index, entry) in counts.iter().enumerate() {
        let x = MARGIN_LEFT + slot * index as f64 + (slot - bar_width) / 2.0;
        let y = y_position(entry.count, top);
        let center = x + bar_width / 2.0;
        let label = escape(&entry.value);
        svg.push_str(&format!(
            r#"<g class="bar"><title>{label}: {count}</title><rect x="{x:.1}" y="{y:.1}" width="{bar_width:.1}" height="{height:.1}" fill="{color}"/><text class="value" x="{center:.1}" y="{value_y:.1}" text-anchor="middle">{count}</text><text class="category" transform="translate({center:.1} {label_y:.1}) rotate(-35)" text-anchor="end">{label}</text></g>"#,
            count = entry.count,
            height = baseline - y,
            color = palette[index % palette.len()],
            value_y = y - 4.0,
            label_y = baseline + 14.0,
        ));
    }
    svg.push_str(&format!(
        r#"<text class="axis-label" x="{:.1}" y="{:.1}" text-anchor="middle">{}</text></svg>"#,
        MARGIN_LEFT + plot_width() / 2.0,
        HEIGHT - 6.0,
        escape(x_label)
    ));
    svg
}

/// Pie slices clockwise from twelve o'clock, labelled with name and percentage.
pub fn pie_chart(title: &str, counts: &[CategoryCount], palette: &[&str]) -> String {
    let total: usize = counts.iter().map(|entry| entry.count).sum();
    if total == 0 || palette.is_empty() {
        return empty_chart(title);
    }
    let radius = (HEIGHT - MARGIN_TOP - 24.0) / 2.0;
    let (cx, cy) = (WIDTH / 2.0, MARGIN_TOP + radius);
    let point = |angle: f64, distance: f64| (cx + distance * angle.sin(), cy - distance * angle.cos());

    let mut svg = String::new();
    open_svg(&mut svg, title, 0.5);
    let mut start = 0.0_f64;
    for (index, entry) in counts.iter().enumerate() {
        let share = entry.count as f64 / total as f64;
        let end = start + share * 2.0 * PI;
        let color = palette[index % palette.len()];
        let label = escape(&entry.value);
        svg.push_str(&format!(r#"<g class="slice"><title>{label}: {}</title>"#, entry.count));
        if entry.count == total {
            svg.push_str(&format!(r#"<circle cx="{cx:.1}" cy="{cy:.1}" r="{radius:.1}" fill="{color}"/>"#));
        } else {
            let (x1, y1) = point(start, radius);
            let (x2, y2) = point(end, radius);
            let large_arc = if end - start > PI { 1 } else { 0 };
            svg.push_str(&format!(
                r##"<path d="M {cx:.2} {cy:.2} L {x1:.2} {y1:.2} A {radius:.2} {radius:.2} 0 {large_arc} 1 {x2:.2} {y2:.2} Z" fill="{color}" stroke="#ffffff"/>"##
            ));
        }
        let (lx, ly) = point((start + end) / 2.0, if entry.count == total { 0.0 } else { radius * 0.62 });
        svg.push_str(&format!(
            r#"<text class="slice-label" x="{lx:.1}" y="{ly:.1}" text-anchor="middle"><tspan x="{lx:.1}">{label}</tspan><tspan x="{lx:.1}" dy="1.2em">{percent:.1}%</tspan></text></g>"#,
            percent = share * 100.0,
        ));
        start = end;
    }
    svg.push_str("</svg>");
    svg
}

/// Counts per year joined by a line, with a marker at each year.
pub fn line_chart(title: &str, x_label: &str, counts: &[YearCount]) -> String {
    let (Some(first), Some(last)) = (counts.first(), counts.last()) else {
        return empty_chart(title);
    };
    let max = counts.iter().map(|entry| entry.count).max().unwrap_or(0);
    let (top, step) = integer_axis(max);
    let span = (last.year - first.year) as f64;
    let inset = 24.0;
    let x_position = |year: i32| {
        if span == 0.0 {
            MARGIN_LEFT + plot_width() / 2.0
        } else {
            MARGIN_LEFT + inset + (plot_width() - 2.0 * inset) * (year - first.year) as f64 / span
        }
    };

    let mut svg = String::new();
    open_svg(&mut svg, title, 0.4);
    y_axis(&mut svg, top, step, "Jumlah Atlet");
    let points: Vec<String> = counts
        .iter()
        .map(|entry| format!("{:.1},{:.1}", x_position(entry.year), y_position(entry.count, top)))
        .collect();
    svg.push_str(&format!(
        r#"<polyline fill="none" stroke="{}" stroke-width="2" points="{}"/>"#,
        PLOTLY[0],
        points.join(" ")
    ));
    let baseline = y_position(0, top);
    for entry in counts {
        let (x, y) = (x_position(entry.year), y_position(entry.count, top));
        svg.push_str(&format!(
            r#"<g class="point"><title>{year}: {count}</title><circle cx="{x:.1}" cy="{y:.1}" r="4" fill="{MARKER_COLOR}"/><text class="tick" x="{x:.1}" y="{tick_y:.1}" text-anchor="middle">{year}</text></g>"#,
            year = entry.year,
            count = entry.count,
            tick_y = baseline + 18.0,
        ));
    }
    svg.push_str(&format!(
        r#"<text class="axis-label" x="{:.1}" y="{:.1}" text-anchor="middle">{}</text></svg>"#,
        MARGIN_LEFT + plot_width() / 2.0,
        baseline + 44.0,
        escape(x_label)
    ));
    svg
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(items: &[(&str, usize)]) -> Vec<CategoryCount> {
        items
            .iter()
            .map(|(value, count)| CategoryCount {
                value: value.to_string(),
                count: *count,
            })
            .collect()
    }

    #[test]
    fn axis_covers_maximum() {
        assert_eq!(integer_axis(0), (1, 1));
        assert_eq!(integer_axis(3), (3, 1));
        assert_eq!(integer_axis(12), (12, 3));
        assert_eq!(integer_axis(101), (105, 21));
    }

    #[test]
    fn bars_carry_values_and_escaped_labels() {
        let svg = bar_chart("Cabor", "Cabang Olahraga", &counts(&[("Renang", 4), ("Tenis <Meja>", 2)]), &SET3);
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert_eq!(svg.matches("<rect").count(), 2);
        assert!(svg.contains("Tenis &lt;Meja&gt;"));
        assert!(svg.contains(SET3[1]));
        assert!(svg.contains(">4</text>"));
    }

    #[test]
    fn pie_shows_percentages() {
        let svg = pie_chart("Gender", &counts(&[("Putra", 3), ("Putri", 1)]), &SET3);
        assert_eq!(svg.matches("<path").count(), 2);
        assert!(svg.contains("75.0%"));
        assert!(svg.contains("25.0%"));

        let whole = pie_chart("Gender", &counts(&[("Putra", 2)]), &SET3);
        assert!(whole.contains("<circle"));
        assert!(whole.contains("100.0%"));
    }

    #[test]
    fn line_marks_every_year() {
        let years = [YearCount { year: 2021, count: 2 }, YearCount { year: 2023, count: 5 }];
        let svg = line_chart("Periode", "Periode (Tahun)", &years);
        assert_eq!(svg.matches("<circle").count(), 2);
        assert!(svg.contains(MARKER_COLOR));
        assert!(svg.contains(">2021</text>"));
        assert!(svg.contains("<polyline"));
    }

    #[test]
    fn empty_data_renders_placeholder() {
        assert!(bar_chart("x", "y", &[], &PLOTLY).contains("Tidak ada data"));
        assert!(pie_chart("x", &[], &SET3).contains("Tidak ada data"));
        assert!(line_chart("x", "y", &[]).contains("Tidak ada data"));
    }
}
