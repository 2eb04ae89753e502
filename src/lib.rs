//! Harf: right-to-left text detection and directional styling for
//! left-to-right pages.
//!
//! The crates are split along the page boundary: [`harf_dom`] owns the
//! document model, [`harf_engine`] the detection-and-application engine,
//! and [`harf_config`] the persisted settings shared with the control
//! surface. This facade re-exports the pieces a host embeds.

pub use harf_config::{FileStore, MemoryStore, Settings, SettingsStore};
pub use harf_dom::{Document, DomError, NodeId, Viewport};
pub use harf_engine::{
    handle_control, handle_control_json, ControlRequest, ControlResponse, Engine, StatusSnapshot,
    TabState, Tick,
};
