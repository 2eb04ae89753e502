//! Per-tab runtime state.

use std::collections::HashSet;

use harf_config::Settings;
use serde::{Deserialize, Serialize};

/// Mutable state owned by one page's engine instance. Rebuilt from persisted
/// settings on every page load, discarded on navigation.
#[derive(Debug, Clone)]
pub struct TabState {
    pub active: bool,
    pub visual_feedback: bool,
    pub enabled_sites: HashSet<String>,
    pub current_site: String,
}

impl TabState {
    /// State before the settings round trip resolves: the gate is closed so
    /// no styling happens prematurely.
    pub fn pending(current_site: String) -> Self {
        Self {
            active: false,
            visual_feedback: true,
            enabled_sites: HashSet::new(),
            current_site,
        }
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.active = settings.extension_active;
        self.visual_feedback = settings.visual_feedback_enabled;
        self.enabled_sites = settings.enabled_sites.iter().cloned().collect();
    }

    pub fn to_settings(&self) -> Settings {
        let mut enabled_sites: Vec<String> = self.enabled_sites.iter().cloned().collect();
        enabled_sites.sort();
        Settings {
            extension_active: self.active,
            visual_feedback_enabled: self.visual_feedback,
            enabled_sites,
        }
    }

    pub fn site_enabled(&self) -> bool {
        !self.current_site.is_empty() && self.enabled_sites.contains(&self.current_site)
    }
}

/// Serializable state snapshot handed to the control surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub active: bool,
    pub visual_feedback: bool,
    pub enabled_sites: Vec<String>,
    pub current_site: String,
    pub site_enabled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_state_is_gated_off() {
        let state = TabState::pending("example.com".to_string());
        assert!(!state.active);
        assert!(!state.site_enabled());
    }

    #[test]
    fn settings_round_trip_is_sorted() {
        let mut state = TabState::pending("b.example".to_string());
        state.apply_settings(&Settings {
            extension_active: true,
            visual_feedback_enabled: false,
            enabled_sites: vec!["b.example".to_string(), "a.example".to_string()],
        });
        assert!(state.site_enabled());
        let settings = state.to_settings();
        assert_eq!(settings.enabled_sites, vec!["a.example", "b.example"]);
        assert!(!settings.visual_feedback_enabled);
    }

    #[test]
    fn empty_hostname_never_matches() {
        let mut state = TabState::pending(String::new());
        state.enabled_sites.insert(String::new());
        assert!(!state.site_enabled());
    }
}
