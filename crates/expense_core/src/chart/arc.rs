//! SVG path data for annular slices.

use crate::chart::tween::ArcAngles;
use std::f64::consts::{PI, TAU};
use std::fmt::Write;

const EPSILON: f64 = 1e-12;

/// Ring geometry shared by every slice of a chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcShape {
    pub inner_radius: f64,
    pub outer_radius: f64,
}

impl ArcShape {
    pub fn new(inner_radius: f64, outer_radius: f64) -> Self {
        Self {
            inner_radius,
            outer_radius,
        }
    }

    /// Builds the `d` attribute for one slice.
    ///
    /// Angles run clockwise from 12 o'clock; the path is centered on the
    /// origin. A sweep of a full turn or more draws the whole ring.
    pub fn path(&self, angles: &ArcAngles) -> String {
        let (start, end) = if angles.end >= angles.start {
            (angles.start, angles.end)
        } else {
            (angles.end, angles.start)
        };
        let sweep = end - start;
        let outer = self.outer_radius.max(0.0);
        let inner = self.inner_radius.clamp(0.0, outer);

        if outer <= EPSILON {
            return "M0,0Z".to_string();
        }

        let mut d = String::new();
        if sweep >= TAU - EPSILON {
            let (x0, y0) = point(outer, start);
            let _ = write!(
                d,
                "M{},{}A{r},{r},0,1,1,{},{}A{r},{r},0,1,1,{},{}",
                num(x0),
                num(y0),
                num(-x0),
                num(-y0),
                num(x0),
                num(y0),
                r = num(outer)
            );
            if inner > EPSILON {
                let (ix, iy) = point(inner, start);
                let _ = write!(
                    d,
                    "M{},{}A{r},{r},0,1,0,{},{}A{r},{r},0,1,0,{},{}",
                    num(ix),
                    num(iy),
                    num(-ix),
                    num(-iy),
                    num(ix),
                    num(iy),
                    r = num(inner)
                );
            }
            d.push('Z');
            return d;
        }

        let large = u8::from(sweep > PI);
        let (ox0, oy0) = point(outer, start);
        let (ox1, oy1) = point(outer, end);
        let _ = write!(
            d,
            "M{},{}A{r},{r},0,{large},1,{},{}",
            num(ox0),
            num(oy0),
            num(ox1),
            num(oy1),
            r = num(outer)
        );
        if inner > EPSILON {
            let (ix1, iy1) = point(inner, end);
            let (ix0, iy0) = point(inner, start);
            let _ = write!(
                d,
                "L{},{}A{r},{r},0,{large},0,{},{}",
                num(ix1),
                num(iy1),
                num(ix0),
                num(iy0),
                r = num(inner)
            );
        } else {
            d.push_str("L0,0");
        }
        d.push('Z');
        d
    }
}

fn point(radius: f64, angle: f64) -> (f64, f64) {
    (radius * angle.sin(), -radius * angle.cos())
}

/// Formats a coordinate with at most three decimals.
pub(crate) fn num(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        return "0".to_string();
    }
    let text = format!("{rounded:.3}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}
