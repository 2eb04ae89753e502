//! Transient visual feedback on freshly styled elements.

use harf_dom::{Document, NodeId};
use tracing::{debug, warn};

use crate::engine::{Tick, FEEDBACK_DURATION_TICKS};

/// Border applied while feedback is showing.
const FEEDBACK_BORDER: &str = "2px solid #007bff";

#[derive(Debug)]
struct PendingRevert {
    target: NodeId,
    due: Tick,
    /// The border declaration that was in place before feedback, if any.
    original_border: Option<String>,
}

/// Queue of scheduled feedback reversions, drained on every tick. Disabling
/// feedback stops new entries but never cancels reversions already queued,
/// so no element is left with a stray feedback border.
#[derive(Debug, Default)]
pub(crate) struct FeedbackQueue {
    pending: Vec<PendingRevert>,
}

impl FeedbackQueue {
    /// Applies the feedback border and schedules its reversion. `enabled` is
    /// the flag value at call time.
    pub(crate) fn schedule(&mut self, doc: &mut Document, target: NodeId, now: Tick, enabled: bool) {
        if !enabled {
            return;
        }
        let original_border = match doc.element(target) {
            Ok(el) => el.style_property("border").map(str::to_string),
            Err(error) => {
                warn!(%error, "skipping visual feedback");
                return;
            }
        };
        if let Err(error) = doc.set_style_property(target, "border", FEEDBACK_BORDER) {
            warn!(%error, "could not apply visual feedback");
            return;
        }
        self.pending.push(PendingRevert {
            target,
            due: now + FEEDBACK_DURATION_TICKS,
            original_border,
        });
    }

    /// Reverts every due entry. Reversion failure is logged, not escalated.
    pub(crate) fn run_due(&mut self, doc: &mut Document, now: Tick) {
        let mut remaining = Vec::with_capacity(self.pending.len());
        for entry in self.pending.drain(..) {
            if entry.due > now {
                remaining.push(entry);
                continue;
            }
            let result = match &entry.original_border {
                Some(value) => doc.set_style_property(entry.target, "border", value),
                None => doc.remove_style_property(entry.target, "border").map(|_| ()),
            };
            match result {
                Ok(()) => debug!("visual feedback reverted"),
                Err(error) => warn!(%error, "failed to revert visual feedback"),
            }
        }
        self.pending = remaining;
    }

    #[cfg(test)]
    pub(crate) fn pending_count(&self) -> usize {
        self.pending.len()
    }
}
