//! Scanner/applier for right-to-left text on left-to-right pages.
//!
//! The engine walks a page document for elements containing Arabic-script
//! text, picks the smallest sensible container around each hit, and applies
//! directional styling to it — once. Three triggers drive it: a delayed
//! scan after settings load, a recurring timer, and insertion notifications
//! from the host. All entry points are synchronous and fail closed: an
//! ambiguous or broken element is skipped, never styled speculatively.

mod classifier;
mod control;
mod engine;
mod feedback;
mod heuristics;
mod state;

pub use classifier::{contains_rtl_text, has_rtl_text, MIN_RTL_TEXT_LEN};
pub use control::{handle_control, handle_control_json, ControlRequest, ControlResponse};
pub use engine::{
    Engine, Tick, FEEDBACK_DURATION_TICKS, INITIAL_SCAN_DELAY_TICKS, MARKER_ATTR,
    RESCAN_INTERVAL_TICKS, RTL_STYLE_DECLARATIONS, TEXT_TAG_ALLOWLIST,
};
pub use heuristics::{find_styling_target, should_avoid};
pub use state::{StatusSnapshot, TabState};
