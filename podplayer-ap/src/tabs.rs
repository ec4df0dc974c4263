//! Tab visibility reducer
//!
//! The UI shows a fixed set of named tabs (chapters, audio, share, ...), each
//! either open or closed. The state starts with every configured tab closed.
//!
//! `SetTabs` swaps the whole state for an arbitrary payload without looking at
//! it; from then on the state is whatever the payload was.

use crate::request::Request;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

/// Visibility flag per configured tab name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TabVisibility(BTreeMap<String, bool>);

impl TabVisibility {
    /// All `names` present and closed
    pub fn closed<S: AsRef<str>>(names: &[S]) -> Self {
        Self(
            names
                .iter()
                .map(|name| (name.as_ref().to_string(), false))
                .collect(),
        )
    }

    pub fn get(&self, name: &str) -> Option<bool> {
        self.0.get(name).copied()
    }

    /// Flip `name`; false if it is not a configured tab
    pub fn toggle(&mut self, name: &str) -> bool {
        match self.0.get_mut(name) {
            Some(open) => {
                *open = !*open;
                true
            }
            None => false,
        }
    }
}

/// Tab state: configured flags, or a payload installed by `SetTabs`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TabsState {
    Visibility(TabVisibility),
    Replaced(Value),
}

impl Default for TabsState {
    fn default() -> Self {
        TabsState::Visibility(TabVisibility::default())
    }
}

impl TabsState {
    /// Initial state: every configured tab closed
    pub fn initial<S: AsRef<str>>(names: &[S]) -> Self {
        TabsState::Visibility(TabVisibility::closed(names))
    }

    /// Visibility of `name`, if the state holds a flag for it
    pub fn visibility(&self, name: &str) -> Option<bool> {
        match self {
            TabsState::Visibility(tabs) => tabs.get(name),
            TabsState::Replaced(value) => value.get(name).and_then(Value::as_bool),
        }
    }
}

/// Reduce one request into the tab state
///
/// - `ToggleTab`: flips the named flag. Names outside the configured set are
///   rejected and leave the state untouched.
/// - `SetTabs`: the payload becomes the state, verbatim.
/// - Anything else: state returned unchanged.
pub fn reduce(state: TabsState, request: &Request) -> TabsState {
    match request {
        Request::ToggleTab { name } => toggle(state, name),
        Request::SetTabs { value } => TabsState::Replaced(value.clone()),
        _ => state,
    }
}

fn toggle(state: TabsState, name: &str) -> TabsState {
    match state {
        TabsState::Visibility(mut tabs) => {
            if !tabs.toggle(name) {
                warn!(tab = name, "Ignoring toggle of unknown tab");
            }
            TabsState::Visibility(tabs)
        }
        TabsState::Replaced(mut value) => {
            match value.get_mut(name) {
                Some(Value::Bool(open)) => *open = !*open,
                _ => warn!(tab = name, "Replaced tab state has no flag to toggle"),
            }
            TabsState::Replaced(value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn toggle_request(name: &str) -> Request {
        Request::ToggleTab {
            name: name.to_string(),
        }
    }

    fn initial() -> TabsState {
        TabsState::initial(&["chapters", "settings"])
    }

    #[test]
    fn test_initial_state_all_closed() {
        let state = initial();
        assert_eq!(state.visibility("chapters"), Some(false));
        assert_eq!(state.visibility("settings"), Some(false));
        assert_eq!(state.visibility("share"), None);
    }

    #[test]
    fn test_toggles_the_tab() {
        let result = reduce(initial(), &toggle_request("chapters"));
        assert_eq!(result.visibility("chapters"), Some(true));
        assert_eq!(result.visibility("settings"), Some(false));

        let result = reduce(result, &toggle_request("chapters"));
        assert_eq!(result, initial());
    }

    #[test]
    fn test_unknown_request_is_identity() {
        let result = reduce(initial(), &Request::Play);
        assert_eq!(result, initial());
    }

    #[test]
    fn test_unknown_tab_name_is_rejected() {
        let result = reduce(initial(), &toggle_request("transcripts"));
        assert_eq!(result, initial());
        assert_eq!(result.visibility("transcripts"), None);
    }

    #[test]
    fn test_set_tabs_replaces_verbatim() {
        let result = reduce(initial(), &Request::SetTabs { value: json!("x") });
        assert_eq!(result, TabsState::Replaced(json!("x")));
        assert_eq!(serde_json::to_value(&result).unwrap(), json!("x"));
    }

    #[test]
    fn test_toggle_on_replaced_object() {
        let state = reduce(
            initial(),
            &Request::SetTabs {
                value: json!({"chapters": true, "extra": 1}),
            },
        );

        let state = reduce(state, &toggle_request("chapters"));
        assert_eq!(state, TabsState::Replaced(json!({"chapters": false, "extra": 1})));

        // Non-boolean entries are left alone
        let state = reduce(state, &toggle_request("extra"));
        assert_eq!(state, TabsState::Replaced(json!({"chapters": false, "extra": 1})));
    }

    #[test]
    fn test_toggle_on_replaced_scalar_is_identity() {
        let state = TabsState::Replaced(json!("x"));
        assert_eq!(reduce(state.clone(), &toggle_request("chapters")), state);
    }

    #[test]
    fn test_visibility_serializes_as_flat_map() {
        let value = serde_json::to_value(initial()).unwrap();
        assert_eq!(value, json!({"chapters": false, "settings": false}));
    }
}
