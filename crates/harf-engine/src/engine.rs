//! Scan orchestration: gating, marking, styling, triggers.

use std::collections::HashSet;

use harf_config::{hostname_of, Settings, SettingsStore};
use harf_dom::{Document, NodeId};
use tracing::{debug, info, warn};

use crate::classifier::contains_rtl_text;
use crate::feedback::FeedbackQueue;
use crate::heuristics::{find_styling_target, should_avoid};
use crate::state::{StatusSnapshot, TabState};

/// Logical clock unit; one tick is nominally one second.
pub type Tick = u64;

/// Recurring rescan period, for pages whose dynamic content evades
/// insertion notifications.
pub const RESCAN_INTERVAL_TICKS: Tick = 15;

/// Delay between settings load and the first scan.
pub const INITIAL_SCAN_DELAY_TICKS: Tick = 1;

/// How long visual feedback stays on a freshly styled element.
pub const FEEDBACK_DURATION_TICKS: Tick = 1;

/// Marker attribute stamped on styled elements; the only state this engine
/// persists into markup.
pub const MARKER_ATTR: &str = "data-rtl-applied";

/// The exact declarations applied to a styled target.
pub const RTL_STYLE_DECLARATIONS: &[(&str, &str)] = &[
    ("direction", "rtl"),
    ("text-align", "right"),
    ("font-family", "Tahoma, Arial, sans-serif"),
];

/// Tags queried as RTL-content candidates.
pub const TEXT_TAG_ALLOWLIST: &[&str] =
    &["span", "p", "div", "h1", "h2", "h3", "h4", "h5", "h6"];

/// One page's scanner/applier instance.
///
/// The processed-set is the authoritative "already styled" memory (node
/// identity is stable for the document's lifetime); the marker attribute is
/// stamped and cleared in lockstep so the markup contract holds. All
/// operations are synchronous, so overlapping triggers cannot interleave
/// mid-scan and idempotency rests entirely on the marker.
pub struct Engine {
    state: TabState,
    processed: HashSet<NodeId>,
    store: Box<dyn SettingsStore>,
    feedback: FeedbackQueue,
    settings_loaded: bool,
    initial_scan_at: Option<Tick>,
    next_rescan_at: Option<Tick>,
}

impl Engine {
    /// Engine for the page at `page_url`. The gate stays closed until
    /// [`Engine::load_settings`] resolves the settings round trip.
    pub fn new(page_url: &str, store: Box<dyn SettingsStore>) -> Self {
        let current_site = hostname_of(page_url);
        Self {
            state: TabState::pending(current_site),
            processed: HashSet::new(),
            store,
            feedback: FeedbackQueue::default(),
            settings_loaded: false,
            initial_scan_at: None,
            next_rescan_at: None,
        }
    }

    /// Completes the settings round trip: applies the loaded (or default)
    /// settings and schedules the delayed initial scan plus the recurring
    /// rescan. A store failure degrades to defaults — the page behaves like
    /// a freshly installed extension.
    pub fn load_settings(&mut self, now: Tick) {
        let settings = match self.store.load() {
            Ok(settings) => settings,
            Err(error) => {
                warn!(%error, "settings load failed, using defaults");
                Settings::default()
            }
        };
        self.state.apply_settings(&settings);
        self.settings_loaded = true;
        self.initial_scan_at = Some(now + INITIAL_SCAN_DELAY_TICKS);
        self.next_rescan_at = Some(now + RESCAN_INTERVAL_TICKS);
        info!(
            active = self.state.active,
            site = %self.state.current_site,
            site_enabled = self.state.site_enabled(),
            "settings loaded"
        );
    }

    fn gate_open(&self) -> bool {
        self.settings_loaded && self.state.active && self.state.site_enabled()
    }

    /// Full-page scan. Queries the tag allowlist, filters by the RTL content
    /// test, climbs to the styling target, and styles everything not yet
    /// marked. Returns the number of newly styled elements; rerunning with
    /// no DOM change returns 0.
    pub fn process_elements(&mut self, doc: &mut Document, now: Tick) -> usize {
        if !self.gate_open() {
            debug!(
                active = self.state.active,
                site_enabled = self.state.site_enabled(),
                "scan skipped, gate closed"
            );
            return 0;
        }
        let candidates = doc.select_tags(TEXT_TAG_ALLOWLIST);
        let mut styled = 0;
        for candidate in candidates {
            if !contains_rtl_text(doc, candidate) {
                continue;
            }
            if self.apply_to_target(doc, candidate, now) {
                styled += 1;
            }
        }
        info!(styled, site = %self.state.current_site, "scan complete");
        styled
    }

    /// Insertion notifications from the host: each inserted element is
    /// tested directly, then its allowlisted descendants. Skips entirely
    /// while the gate is closed.
    pub fn on_nodes_inserted(&mut self, doc: &mut Document, inserted: &[NodeId], now: Tick) -> usize {
        if !self.gate_open() {
            return 0;
        }
        let mut styled = 0;
        for &node in inserted {
            if doc.element(node).is_err() {
                continue;
            }
            if contains_rtl_text(doc, node) && self.apply_to_target(doc, node, now) {
                styled += 1;
            }
            for descendant in doc.select_tags_within(node, TEXT_TAG_ALLOWLIST) {
                if contains_rtl_text(doc, descendant) && self.apply_to_target(doc, descendant, now)
                {
                    styled += 1;
                }
            }
        }
        if styled > 0 {
            debug!(styled, "styled inserted content");
        }
        styled
    }

    /// Advances the logical clock: reverts due feedback, then runs the
    /// delayed initial scan and the recurring rescan when due. Returns the
    /// number of elements styled this tick.
    pub fn tick(&mut self, doc: &mut Document, now: Tick) -> usize {
        self.feedback.run_due(doc, now);
        let mut styled = 0;
        if self.initial_scan_at.is_some_and(|due| due <= now) {
            self.initial_scan_at = None;
            styled += self.process_elements(doc, now);
        }
        if self.next_rescan_at.is_some_and(|due| due <= now) {
            self.next_rescan_at = Some(now + RESCAN_INTERVAL_TICKS);
            styled += self.process_elements(doc, now);
        }
        styled
    }

    fn apply_to_target(&mut self, doc: &mut Document, candidate: NodeId, now: Tick) -> bool {
        let target = find_styling_target(doc, candidate);
        if self.processed.contains(&target) || doc.attr(target, MARKER_ATTR).is_some() {
            return false;
        }
        if should_avoid(doc, target) {
            return false;
        }
        if let Err(error) = doc.set_attr(target, MARKER_ATTR, "true") {
            debug!(%error, "could not mark target");
            return false;
        }
        for &(property, value) in RTL_STYLE_DECLARATIONS {
            if let Err(error) = doc.set_style_property(target, property, value) {
                debug!(%error, property, "could not style target");
            }
        }
        self.processed.insert(target);
        self.feedback
            .schedule(doc, target, now, self.state.visual_feedback);
        debug!(site = %self.state.current_site, "applied directional styling");
        true
    }

    /// Adds the current hostname to the enabled-site list, persists, and
    /// scans immediately when the extension is active. Returns false when
    /// the site is already enabled or the hostname is unknown.
    pub fn enable_current_site(&mut self, doc: &mut Document, now: Tick) -> bool {
        let site = self.state.current_site.clone();
        if site.is_empty() || self.state.enabled_sites.contains(&site) {
            return false;
        }
        self.state.enabled_sites.insert(site);
        self.save_settings();
        if self.state.active {
            self.process_elements(doc, now);
        }
        true
    }

    /// Removes the current hostname from the enabled-site list, persists,
    /// and strips the marker attribute and the directional declarations from
    /// every marked element. Prior inline values are not restored.
    pub fn disable_current_site(&mut self, doc: &mut Document) -> bool {
        if !self.state.enabled_sites.remove(&self.state.current_site) {
            return false;
        }
        self.save_settings();
        for marked in doc.elements_with_attr(MARKER_ATTR) {
            if let Err(error) = doc.remove_attr(marked, MARKER_ATTR) {
                warn!(%error, "could not unmark element");
                continue;
            }
            for &(property, _) in RTL_STYLE_DECLARATIONS {
                if let Err(error) = doc.remove_style_property(marked, property) {
                    warn!(%error, property, "could not strip styling");
                }
            }
        }
        self.processed.clear();
        info!(site = %self.state.current_site, "site disabled, styling removed");
        true
    }

    /// Persists the current in-memory state. Store failures are logged and
    /// swallowed: persistence is fire-and-forget.
    pub fn save_settings(&self) {
        if let Err(error) = self.store.save(&self.state.to_settings()) {
            warn!(%error, "failed to persist settings");
        }
    }

    /// Global on/off toggle. Turning the extension off does not strip
    /// styling already applied; only a per-site disable does.
    pub fn set_active(&mut self, active: bool) {
        self.state.active = active;
        self.save_settings();
    }

    /// Toggles visual feedback. Checked at styling time, so reversions
    /// already scheduled still run.
    pub fn set_visual_feedback(&mut self, enabled: bool) {
        self.state.visual_feedback = enabled;
        self.save_settings();
    }

    pub fn status(&self) -> StatusSnapshot {
        let settings = self.state.to_settings();
        StatusSnapshot {
            active: self.state.active,
            visual_feedback: self.state.visual_feedback,
            enabled_sites: settings.enabled_sites,
            current_site: self.state.current_site.clone(),
            site_enabled: self.state.site_enabled(),
        }
    }

    pub fn state(&self) -> &TabState {
        &self.state
    }
}
