//! SVG serialization of chart frames.

use crate::chart::arc::num;
use crate::chart::renderer::{escape_html, ChartFrame};
use crate::config::ChartConfig;
use std::fmt::Write;

const LEGEND_SWATCH_RADIUS: f64 = 10.0;
const LEGEND_LABEL_OFFSET: f64 = 10.0;
const LEGEND_LABEL_FILL: &str = "white";

/// Serializes `frame` into a standalone SVG document.
pub fn render_svg(frame: &ChartFrame, config: &ChartConfig) -> String {
    let (width, height) = config.canvas_size();
    let (cx, cy) = config.center();
    let (lx, ly) = config.legend_origin();

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\">",
        num(width),
        num(height)
    );

    let _ = writeln!(svg, "  <g transform=\"translate({},{})\">", num(cx), num(cy));
    for slice in &frame.slices {
        let _ = writeln!(
            svg,
            "    <path class=\"arc\" data-id=\"{}\" d=\"{}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"{}\"/>",
            slice.id,
            slice.path,
            slice.fill,
            config.stroke,
            num(config.stroke_width)
        );
    }
    svg.push_str("  </g>\n");

    let row_height = LEGEND_SWATCH_RADIUS * 2.0 + config.legend_padding;
    let _ = writeln!(
        svg,
        "  <g class=\"legend\" transform=\"translate({},{})\">",
        num(lx),
        num(ly)
    );
    for (index, entry) in frame.legend.iter().enumerate() {
        let _ = writeln!(
            svg,
            "    <g class=\"cell\" transform=\"translate(0,{})\"><circle class=\"swatch\" r=\"{r}\" cx=\"{r}\" cy=\"{r}\" fill=\"{}\"/><text class=\"label\" x=\"{}\" y=\"{}\" fill=\"{LEGEND_LABEL_FILL}\">{}</text></g>",
            num(row_height * index as f64),
            entry.color,
            num(LEGEND_SWATCH_RADIUS * 2.0 + LEGEND_LABEL_OFFSET),
            num(LEGEND_SWATCH_RADIUS + 5.0),
            escape_html(&entry.name),
            r = num(LEGEND_SWATCH_RADIUS)
        );
    }
    svg.push_str("  </g>\n</svg>\n");
    svg
}
