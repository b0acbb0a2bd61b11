//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the entry form, slice events and chart frames to Dart via FRB.
//! - Own the single process-wide tracker session.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Queued store changes are applied before any frame is produced.

use expense_core::chart::svg::render_svg;
use expense_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    ChartFrame, ExpenseTracker, InteractionOutcome, SliceEvent, SqliteExpenseStore,
    SubmitOutcome, TrackerConfig,
};
use log::error;
use std::sync::{Mutex, MutexGuard, OnceLock};
use uuid::Uuid;

type Tracker = ExpenseTracker<SqliteExpenseStore>;

static TRACKER: OnceLock<Mutex<Option<Tracker>>> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    pub ok: bool,
    /// Expense ID affected by the action, when there is one.
    pub expense_id: Option<String>,
    /// Human-readable diagnostics message.
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>, expense_id: Option<String>) -> Self {
        Self {
            ok: true,
            expense_id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            expense_id: None,
            message: message.into(),
        }
    }
}

/// Form submission result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormResponse {
    pub ok: bool,
    pub expense_id: Option<String>,
    /// Text for the error line under the form; empty when nothing to show.
    pub error_text: String,
    /// Field values the form should display after submission.
    pub name: String,
    pub cost: String,
}

/// One slice as drawn in a frame.
#[derive(Debug, Clone, PartialEq)]
pub struct SliceItem {
    pub expense_id: String,
    pub name: String,
    pub cost: i64,
    /// SVG path data centered on the pie origin.
    pub path: String,
    /// `#rrggbb`.
    pub fill: String,
    pub exiting: bool,
}

/// One legend row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegendItem {
    pub name: String,
    pub color: String,
}

/// One chart frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartFrameResponse {
    pub slices: Vec<SliceItem>,
    pub legend: Vec<LegendItem>,
    pub tooltip_html: Option<String>,
    /// When true the UI should request another frame.
    pub animating: bool,
    pub message: String,
}

/// Opens the tracker session using `EXPENSES_DB_PATH`/`EXPENSES_COLLECTION`.
///
/// # FFI contract
/// - Idempotent; later calls keep the existing session.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn tracker_open() -> ActionResponse {
    match lock_tracker() {
        Ok(_) => ActionResponse::success("Tracker ready.", None),
        Err(err) => ActionResponse::failure(err),
    }
}

/// Submits the entry form.
///
/// `cost` is the raw text of the cost input.
#[flutter_rust_bridge::frb(sync)]
pub fn form_submit(name: String, cost: String, now_ms: i64) -> FormResponse {
    let mut guard = match lock_tracker() {
        Ok(guard) => guard,
        Err(err) => {
            error!("event=ffi_form_submit module=ffi status=error error={err}");
            return FormResponse::untouched(name, cost);
        }
    };
    let Some(tracker) = guard.as_mut() else {
        return FormResponse::untouched(name, cost);
    };

    tracker.form_mut().set_name(name);
    tracker.form_mut().set_cost(cost);
    let outcome = tracker.submit_form();
    tracker.pump(to_clock(now_ms));

    let form = tracker.form();
    FormResponse {
        ok: matches!(outcome, SubmitOutcome::Created(_)),
        expense_id: match outcome {
            SubmitOutcome::Created(id) => Some(id.to_string()),
            SubmitOutcome::Rejected | SubmitOutcome::StoreFailed => None,
        },
        error_text: form.error.clone(),
        name: form.name.clone(),
        cost: form.cost.clone(),
    }
}

/// Forwards a pointer event on a slice.
///
/// `kind` is one of `over|out|click`.
#[flutter_rust_bridge::frb(sync)]
pub fn slice_event(kind: String, expense_id: String, now_ms: i64) -> ActionResponse {
    let id = match Uuid::parse_str(expense_id.trim()) {
        Ok(id) => id,
        Err(_) => return ActionResponse::failure(format!("invalid expense id `{expense_id}`")),
    };
    let event = match kind.trim() {
        "over" => SliceEvent::PointerOver(id),
        "out" => SliceEvent::PointerOut(id),
        "click" => SliceEvent::Click(id),
        other => {
            return ActionResponse::failure(format!(
                "unsupported slice event `{other}`; expected over|out|click"
            ))
        }
    };

    with_tracker(|tracker| {
        let now = to_clock(now_ms);
        let outcome = tracker.handle_slice_event(event, now);
        tracker.pump(now);
        match outcome {
            InteractionOutcome::Highlighted => ActionResponse::success("Highlighted.", None),
            InteractionOutcome::Restored => ActionResponse::success("Restored.", None),
            InteractionOutcome::DeleteRequested(id) => {
                ActionResponse::success("Delete requested.", Some(id.to_string()))
            }
            InteractionOutcome::Ignored => ActionResponse::failure("No live slice for event."),
        }
    })
    .unwrap_or_else(|err| ActionResponse::failure(err))
}

/// Applies queued changes, advances animations and returns the frame.
#[flutter_rust_bridge::frb(sync)]
pub fn chart_frame(now_ms: i64) -> ChartFrameResponse {
    with_tracker(|tracker| {
        let now = to_clock(now_ms);
        tracker.pump(now);
        tracker.tick(now);
        to_frame_response(tracker.frame(now))
    })
    .unwrap_or_else(|err| ChartFrameResponse {
        slices: Vec::new(),
        legend: Vec::new(),
        tooltip_html: None,
        animating: false,
        message: err,
    })
}

/// Same as `chart_frame`, serialized as a standalone SVG document.
#[flutter_rust_bridge::frb(sync)]
pub fn chart_svg(now_ms: i64) -> String {
    with_tracker(|tracker| {
        let now = to_clock(now_ms);
        tracker.pump(now);
        tracker.tick(now);
        let renderer = tracker.renderer();
        render_svg(&renderer.frame(now), renderer.config())
    })
    .unwrap_or_else(|err| svg_unavailable(&err))
}

/// Empty document returned when no tracker session can be opened.
fn svg_unavailable(err: &str) -> String {
    error!("event=ffi_chart_svg module=ffi status=error error={err}");
    String::new()
}

impl FormResponse {
    fn untouched(name: String, cost: String) -> Self {
        Self {
            ok: false,
            expense_id: None,
            error_text: String::new(),
            name,
            cost,
        }
    }
}

fn to_frame_response(frame: ChartFrame) -> ChartFrameResponse {
    let message = format!("{} slice(s).", frame.slices.len());
    ChartFrameResponse {
        slices: frame
            .slices
            .into_iter()
            .map(|slice| SliceItem {
                expense_id: slice.id.to_string(),
                name: slice.name,
                cost: slice.cost,
                path: slice.path,
                fill: slice.fill.to_string(),
                exiting: slice.exiting,
            })
            .collect(),
        legend: frame
            .legend
            .into_iter()
            .map(|entry| LegendItem {
                name: entry.name,
                color: entry.color.to_string(),
            })
            .collect(),
        tooltip_html: frame.tooltip.map(|tooltip| tooltip.html()),
        animating: frame.animating,
        message,
    }
}

fn to_clock(now_ms: i64) -> u64 {
    u64::try_from(now_ms).unwrap_or(0)
}

fn lock_tracker() -> Result<MutexGuard<'static, Option<Tracker>>, String> {
    let cell = TRACKER.get_or_init(|| Mutex::new(None));
    let mut guard = cell
        .lock()
        .map_err(|_| "tracker lock poisoned".to_string())?;
    if guard.is_none() {
        let config = TrackerConfig::from_env();
        let tracker = ExpenseTracker::open(&config)
            .map_err(|err| format!("tracker open failed: {err}"))?;
        *guard = Some(tracker);
    }
    Ok(guard)
}

fn with_tracker<T>(f: impl FnOnce(&mut Tracker) -> T) -> Result<T, String> {
    let mut guard = lock_tracker()?;
    let tracker = guard
        .as_mut()
        .ok_or_else(|| "tracker not initialized".to_string())?;
    Ok(f(tracker))
}

#[cfg(test)]
mod tests {
    use super::{
        chart_frame, chart_svg, core_version, form_submit, init_logging, ping, slice_event,
        svg_unavailable, tracker_open,
    };
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        assert!(!init_logging("info".to_string(), String::new()).is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        assert!(!init_logging("verbose".to_string(), "tmp/logs".to_string()).is_empty());
    }

    #[test]
    fn svg_falls_back_to_empty_document_when_tracker_cannot_open() {
        assert!(svg_unavailable("tracker open failed: unsupported schema").is_empty());
    }

    #[test]
    fn form_submit_creates_expense_visible_in_next_frame() {
        assert!(tracker_open().ok);
        let name = unique_token("ffi-food");
        let response = form_submit(name.clone(), "20".to_string(), 0);
        assert!(response.ok);
        assert!(response.name.is_empty());
        let expense_id = response.expense_id.expect("created expense id");

        let frame = chart_frame(10_000);
        assert!(frame
            .slices
            .iter()
            .any(|slice| slice.expense_id == expense_id && slice.name == name));
        assert!(frame.legend.iter().any(|entry| entry.name == name));
        assert!(chart_svg(10_000).contains(&expense_id));
    }

    #[test]
    fn form_submit_with_empty_cost_reports_error_text() {
        let response = form_submit("food".to_string(), String::new(), 0);
        assert!(!response.ok);
        assert_eq!(response.error_text, "Please enter values before submitting");
        assert_eq!(response.name, "food");
    }

    #[test]
    fn slice_click_deletes_expense_after_round_trip() {
        let response = form_submit(unique_token("ffi-rent"), "80".to_string(), 0);
        let expense_id = response.expense_id.expect("created expense id");
        chart_frame(1_000);

        let clicked = slice_event("click".to_string(), expense_id.clone(), 2_000);
        assert!(clicked.ok, "{}", clicked.message);

        let frame = chart_frame(5_000);
        assert!(frame
            .slices
            .iter()
            .all(|slice| slice.expense_id != expense_id));
    }

    #[test]
    fn slice_event_rejects_bad_input() {
        assert!(!slice_event("click".to_string(), "nope".to_string(), 0).ok);
        let id = uuid::Uuid::new_v4().to_string();
        assert!(!slice_event("drag".to_string(), id, 0).ok);
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }
}
