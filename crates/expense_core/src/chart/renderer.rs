//! Keyed slice reconciliation and animation state.
//!
//! # Responsibility
//! - Join the latest expense snapshot against rendered slices by id.
//! - Drive enter/update/exit transitions and hover fill transitions.
//! - Produce immutable frames for the view layer.
//!
//! # Invariants
//! - At most one slice per expense id.
//! - `baselines[id]` is the final angle state of the last completed
//!   transition of that slice; it is written only when a transition ends.
//! - A render with an unchanged snapshot mutates nothing.

use crate::chart::arc::ArcShape;
use crate::chart::color::{OrdinalScale, Rgb};
use crate::chart::pie;
use crate::chart::tween::{ArcAngles, ArcTween, Timing};
use crate::config::ChartConfig;
use crate::model::expense::{Expense, ExpenseId};
use crate::reconcile::SnapshotSink;
use log::{debug, info};
use std::collections::{HashMap, HashSet};

/// Hint shown under every tooltip.
pub const DELETE_HINT: &str = "Click slice to delete";

/// Visual mutations performed by one `render` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub entered: usize,
    pub updated: usize,
    pub exited: usize,
}

impl RenderStats {
    pub fn is_noop(&self) -> bool {
        *self == Self::default()
    }
}

/// One slice as it should be drawn at a given instant.
#[derive(Debug, Clone, PartialEq)]
pub struct SliceView {
    pub id: ExpenseId,
    pub name: String,
    pub cost: i64,
    /// Color assigned to `name`.
    pub color: Rgb,
    /// Currently displayed fill (differs from `color` while hovered).
    pub fill: Rgb,
    pub angles: ArcAngles,
    pub path: String,
    pub exiting: bool,
}

/// One legend row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegendEntry {
    pub name: String,
    pub color: Rgb,
}

/// Hover tooltip content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tooltip {
    pub id: ExpenseId,
    pub name: String,
    pub cost: i64,
    pub hint: &'static str,
}

impl Tooltip {
    /// Tooltip body markup for an HTML overlay.
    pub fn html(&self) -> String {
        format!(
            "<div class=\"name\">{}</div><div class=\"cost\">{}</div><div class=\"delete\">{}</div>",
            escape_html(&self.name),
            self.cost,
            self.hint
        )
    }
}

/// Everything the view needs to paint one instant of the chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartFrame {
    pub slices: Vec<SliceView>,
    pub legend: Vec<LegendEntry>,
    pub tooltip: Option<Tooltip>,
    pub animating: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Live,
    Exiting,
}

#[derive(Debug, Clone, Copy)]
struct FillTransition {
    from: Rgb,
    to: Rgb,
    timing: Timing,
}

impl FillTransition {
    fn settled(color: Rgb) -> Self {
        Self {
            from: color,
            to: color,
            timing: Timing::new(0, 0),
        }
    }

    fn at(&self, now_ms: u64) -> Rgb {
        self.from.lerp(self.to, self.timing.progress(now_ms))
    }
}

#[derive(Debug, Clone)]
struct Slice {
    expense: Expense,
    color: Rgb,
    target: ArcAngles,
    motion: Option<(ArcTween, Timing)>,
    phase: Phase,
    fill: FillTransition,
}

impl Slice {
    fn displayed(&self, now_ms: u64) -> ArcAngles {
        match &self.motion {
            Some((tween, timing)) => tween.at(timing.progress(now_ms)),
            None => self.target,
        }
    }

    /// Where the next transition of this slice starts: the displayed geometry
    /// while one is in flight, otherwise the recorded baseline.
    fn start_angles(&self, baselines: &HashMap<ExpenseId, ArcAngles>, now_ms: u64) -> ArcAngles {
        match self.motion {
            Some(_) => self.displayed(now_ms),
            None => baselines
                .get(&self.expense.id)
                .copied()
                .unwrap_or(self.target),
        }
    }
}

/// Pie chart renderer keyed by expense id.
pub struct ChartRenderer {
    config: ChartConfig,
    shape: ArcShape,
    scale: OrdinalScale,
    slices: Vec<Slice>,
    baselines: HashMap<ExpenseId, ArcAngles>,
    legend: Vec<LegendEntry>,
    hovered: Option<ExpenseId>,
}

impl Default for ChartRenderer {
    fn default() -> Self {
        Self::new(ChartConfig::default())
    }
}

impl ChartRenderer {
    pub fn new(config: ChartConfig) -> Self {
        Self {
            shape: ArcShape::new(config.inner_radius, config.outer_radius),
            config,
            scale: OrdinalScale::default(),
            slices: Vec::new(),
            baselines: HashMap::new(),
            legend: Vec::new(),
            hovered: None,
        }
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    /// Reconciles slices against `records` and starts the needed transitions.
    pub fn render(&mut self, records: &[Expense], now_ms: u64) -> RenderStats {
        let wedges = pie::layout(records);
        self.legend = self.build_legend(records);

        let targets: HashMap<ExpenseId, (usize, ArcAngles)> = wedges
            .iter()
            .enumerate()
            .map(|(index, wedge)| (wedge.id, (index, wedge.angles)))
            .collect();

        let mut stats = RenderStats::default();
        let mut seen = HashSet::with_capacity(records.len());
        let duration_ms = self.config.transition_ms;

        for slice in &mut self.slices {
            match targets.get(&slice.expense.id) {
                Some(&(index, target)) => {
                    seen.insert(slice.expense.id);
                    let record = &records[index];
                    let color = self.scale.color(&record.name);
                    let geometry_changed =
                        slice.phase == Phase::Exiting || !slice.target.approx_eq(&target);
                    let data_changed = slice.expense != *record || slice.color != color;
                    if !geometry_changed && !data_changed {
                        continue;
                    }

                    if geometry_changed {
                        let from = slice.start_angles(&self.baselines, now_ms);
                        slice.motion =
                            Some((ArcTween::update(from, target), Timing::new(now_ms, duration_ms)));
                        slice.target = target;
                        slice.phase = Phase::Live;
                    }
                    if slice.color != color && self.hovered != Some(slice.expense.id) {
                        slice.fill = FillTransition::settled(color);
                    }
                    slice.color = color;
                    slice.expense = record.clone();
                    stats.updated += 1;
                }
                None if slice.phase == Phase::Live => {
                    let from = slice.start_angles(&self.baselines, now_ms);
                    slice.motion = Some((ArcTween::exit(from), Timing::new(now_ms, duration_ms)));
                    slice.target = ArcAngles::new(from.end, from.end);
                    slice.phase = Phase::Exiting;
                    stats.exited += 1;
                }
                None => {}
            }
        }

        for (record, wedge) in records.iter().zip(&wedges) {
            if seen.contains(&record.id) {
                continue;
            }
            let color = self.scale.color(&record.name);
            self.slices.push(Slice {
                expense: record.clone(),
                color,
                target: wedge.angles,
                motion: Some((
                    ArcTween::enter(wedge.angles),
                    Timing::new(now_ms, duration_ms),
                )),
                phase: Phase::Live,
                fill: FillTransition::settled(color),
            });
            seen.insert(record.id);
            stats.entered += 1;
        }

        if let Some(hovered) = self.hovered {
            if !self.is_live(hovered) {
                self.hovered = None;
            }
        }

        if !stats.is_noop() {
            debug!(
                "event=chart_render module=chart status=ok entered={} updated={} exited={} slices={}",
                stats.entered,
                stats.updated,
                stats.exited,
                self.slices.len()
            );
        }
        stats
    }

    /// Completes finished transitions. Returns whether anything still animates.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        let baselines = &mut self.baselines;
        self.slices.retain_mut(|slice| {
            let Some((_, timing)) = slice.motion else {
                return true;
            };
            if !timing.is_done(now_ms) {
                return true;
            }
            slice.motion = None;
            match slice.phase {
                Phase::Live => {
                    baselines.insert(slice.expense.id, slice.target);
                    true
                }
                Phase::Exiting => {
                    baselines.remove(&slice.expense.id);
                    false
                }
            }
        });
        self.is_animating(now_ms)
    }

    /// Whether any slice geometry or fill is still moving at `now_ms`.
    pub fn is_animating(&self, now_ms: u64) -> bool {
        self.slices.iter().any(|slice| {
            slice.motion.is_some() || !slice.fill.timing.is_done(now_ms)
        })
    }

    /// Snapshot of what to draw at `now_ms`.
    pub fn frame(&self, now_ms: u64) -> ChartFrame {
        let slices = self
            .slices
            .iter()
            .map(|slice| {
                let angles = slice.displayed(now_ms);
                SliceView {
                    id: slice.expense.id,
                    name: slice.expense.name.clone(),
                    cost: slice.expense.cost,
                    color: slice.color,
                    fill: slice.fill.at(now_ms),
                    path: self.shape.path(&angles),
                    angles,
                    exiting: slice.phase == Phase::Exiting,
                }
            })
            .collect();

        ChartFrame {
            slices,
            legend: self.legend.clone(),
            tooltip: self.tooltip(),
            animating: self.is_animating(now_ms),
        }
    }

    /// Highlights a live slice and shows its tooltip.
    ///
    /// Returns `false` when no live slice has `id`.
    pub fn pointer_over(&mut self, id: ExpenseId, now_ms: u64) -> bool {
        let highlight = self.config.highlight;
        let hover_ms = self.config.hover_ms;
        let Some(slice) = self.live_slice_mut(id) else {
            return false;
        };
        slice.fill = FillTransition {
            from: slice.fill.at(now_ms),
            to: highlight,
            timing: Timing::new(now_ms, hover_ms),
        };
        self.hovered = Some(id);
        true
    }

    /// Reverts a slice to its assigned color and hides the tooltip.
    pub fn pointer_out(&mut self, id: ExpenseId, now_ms: u64) -> bool {
        let hover_ms = self.config.hover_ms;
        if self.hovered == Some(id) {
            self.hovered = None;
        }
        let Some(slice) = self.slices.iter_mut().find(|slice| slice.expense.id == id) else {
            return false;
        };
        slice.fill = FillTransition {
            from: slice.fill.at(now_ms),
            to: slice.color,
            timing: Timing::new(now_ms, hover_ms),
        };
        true
    }

    /// Resolves a click to the id that should be deleted, if the slice is live.
    pub fn click(&self, id: ExpenseId) -> Option<ExpenseId> {
        if self.is_live(id) {
            info!("event=slice_click module=chart status=ok doc_id={id}");
            Some(id)
        } else {
            None
        }
    }

    pub fn tooltip(&self) -> Option<Tooltip> {
        let id = self.hovered?;
        let slice = self.slices.iter().find(|slice| slice.expense.id == id)?;
        Some(Tooltip {
            id,
            name: slice.expense.name.clone(),
            cost: slice.expense.cost,
            hint: DELETE_HINT,
        })
    }

    pub fn legend(&self) -> &[LegendEntry] {
        &self.legend
    }

    /// Angle state recorded at the end of the slice's last transition.
    pub fn baseline(&self, id: ExpenseId) -> Option<ArcAngles> {
        self.baselines.get(&id).copied()
    }

    /// Ids of all slices in paint order, exiting ones included.
    pub fn slice_ids(&self) -> Vec<ExpenseId> {
        self.slices.iter().map(|slice| slice.expense.id).collect()
    }

    pub fn color_of(&self, name: &str) -> Option<Rgb> {
        self.scale.peek(name)
    }

    fn is_live(&self, id: ExpenseId) -> bool {
        self.slices
            .iter()
            .any(|slice| slice.expense.id == id && slice.phase == Phase::Live)
    }

    fn live_slice_mut(&mut self, id: ExpenseId) -> Option<&mut Slice> {
        self.slices
            .iter_mut()
            .find(|slice| slice.expense.id == id && slice.phase == Phase::Live)
    }

    fn build_legend(&mut self, records: &[Expense]) -> Vec<LegendEntry> {
        let mut names = HashSet::new();
        records
            .iter()
            .filter(|record| names.insert(record.name.as_str()))
            .map(|record| LegendEntry {
                name: record.name.clone(),
                color: self.scale.color(&record.name),
            })
            .collect()
    }
}

impl SnapshotSink for ChartRenderer {
    fn render(&mut self, snapshot: &[Expense], now_ms: u64) {
        ChartRenderer::render(self, snapshot, now_ms);
    }
}

pub(crate) fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
