//! Control-surface message contract.
//!
//! The control panel lives in another context and cannot reach into the
//! page's state directly; it sends a tagged request and receives a tagged
//! response. Serde uses an external `type` tag in snake_case so the JSON on
//! the wire stays stable and self-describing.

use harf_dom::Document;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::engine::{Engine, Tick};
use crate::state::StatusSnapshot;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControlRequest {
    /// Read the page's state snapshot.
    GetStatus,
    /// Force a full rescan; replies with the newly styled count.
    ProcessElements,
    /// Opt the current hostname in and scan.
    EnableSite,
    /// Opt the current hostname out and strip applied styling.
    DisableSite,
    /// Global extension toggle.
    SetActive { active: bool },
    /// Visual feedback toggle.
    SetVisualFeedback { enabled: bool },
    /// Persist the in-memory state as-is.
    SaveSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControlResponse {
    Status { status: StatusSnapshot },
    Processed { count: usize },
    SiteToggled { success: bool },
    Ack,
    /// The page could not be reached or the request was not understood.
    /// The control surface renders this as "unknown/disabled"; there is no
    /// retry.
    Unknown,
}

/// Dispatches one control request against a page engine. Never panics; the
/// page side of a broken round trip is an `Unknown` reply.
pub fn handle_control(
    engine: &mut Engine,
    doc: &mut Document,
    now: Tick,
    request: ControlRequest,
) -> ControlResponse {
    match request {
        ControlRequest::GetStatus => ControlResponse::Status {
            status: engine.status(),
        },
        ControlRequest::ProcessElements => ControlResponse::Processed {
            count: engine.process_elements(doc, now),
        },
        ControlRequest::EnableSite => ControlResponse::SiteToggled {
            success: engine.enable_current_site(doc, now),
        },
        ControlRequest::DisableSite => ControlResponse::SiteToggled {
            success: engine.disable_current_site(doc),
        },
        ControlRequest::SetActive { active } => {
            engine.set_active(active);
            ControlResponse::Ack
        }
        ControlRequest::SetVisualFeedback { enabled } => {
            engine.set_visual_feedback(enabled);
            ControlResponse::Ack
        }
        ControlRequest::SaveSettings => {
            engine.save_settings();
            ControlResponse::Ack
        }
    }
}

/// Wire-level entry point: a JSON request in, a JSON response out. Malformed
/// requests and serialization failures both collapse to an `Unknown` reply.
pub fn handle_control_json(
    engine: &mut Engine,
    doc: &mut Document,
    now: Tick,
    payload: &str,
) -> String {
    let response = match serde_json::from_str::<ControlRequest>(payload) {
        Ok(request) => handle_control(engine, doc, now, request),
        Err(error) => {
            warn!(%error, "unintelligible control request");
            ControlResponse::Unknown
        }
    };
    serde_json::to_string(&response).unwrap_or_else(|_| "{\"type\":\"unknown\"}".to_string())
}
