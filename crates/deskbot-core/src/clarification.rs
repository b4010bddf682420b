//! Clarification ask-back flow.
//!
//! When a generated answer requests clarification, the flow moves to
//! `Awaiting` and collects option selections. Reaching
//! [`CLARIFICATION_THRESHOLD`] distinct selections signals the caller to
//! re-issue the original query; the answer to that re-query always closes
//! the flow, so a conversation can never get stuck asking back forever.
//!
//! The flow is volatile: it is never persisted and is reset whenever the
//! history is cleared.

use crate::generation::ClarificationContext;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of distinct selections that triggers the automatic re-query.
pub const CLARIFICATION_THRESHOLD: usize = 2;

/// Outcome of recording a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// The selection was stored; `distinct` is the updated count of
    /// distinct selected keys.
    Recorded { distinct: usize },
    /// Nothing changed: the flow was idle or the key was not offered.
    Ignored,
}

/// Two-state ask-back flow.
///
/// `Idle` outside a clarification round; `Awaiting` while the user is
/// expected to pick values for the offered options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ClarificationFlow {
    Idle,
    Awaiting {
        /// Option labels offered by the generator
        options: Vec<String>,
        /// Option label -> chosen value; keys are always a subset of
        /// `options`
        selected: BTreeMap<String, String>,
    },
}

impl Default for ClarificationFlow {
    fn default() -> Self {
        ClarificationFlow::Idle
    }
}

impl ClarificationFlow {
    /// Opens a clarification round with the given options.
    ///
    /// Any selections from a previous round are discarded, including when
    /// a round was already open.
    pub fn begin(&mut self, options: Vec<String>) {
        *self = ClarificationFlow::Awaiting {
            options,
            selected: BTreeMap::new(),
        };
    }

    /// Records one selection, last write wins per key.
    ///
    /// Selections are ignored while idle and for keys that were not
    /// offered, keeping the selected set consistent with the options.
    pub fn select(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> SelectionOutcome {
        let key = key.into();
        match self {
            ClarificationFlow::Idle => SelectionOutcome::Ignored,
            ClarificationFlow::Awaiting { options, selected } => {
                if !options.iter().any(|o| o == &key) {
                    return SelectionOutcome::Ignored;
                }
                selected.insert(key, value.into());
                SelectionOutcome::Recorded {
                    distinct: selected.len(),
                }
            }
        }
    }

    /// Closes the round, discarding options and selections.
    pub fn finish(&mut self) {
        *self = ClarificationFlow::Idle;
    }

    pub fn is_awaiting(&self) -> bool {
        matches!(self, ClarificationFlow::Awaiting { .. })
    }

    /// Whether `key` is among the currently offered options.
    pub fn offers(&self, key: &str) -> bool {
        match self {
            ClarificationFlow::Idle => false,
            ClarificationFlow::Awaiting { options, .. } => options.iter().any(|o| o == key),
        }
    }

    /// Count of distinct selected keys (0 while idle).
    pub fn selected_count(&self) -> usize {
        match self {
            ClarificationFlow::Idle => 0,
            ClarificationFlow::Awaiting { selected, .. } => selected.len(),
        }
    }

    /// Whether enough selections were made to trigger the re-query.
    pub fn ready_to_requery(&self) -> bool {
        self.selected_count() >= CLARIFICATION_THRESHOLD
    }

    /// Builds the generator context for a query issued during this round.
    ///
    /// # Returns
    /// `Some` only while awaiting; `remaining_questions` counts how far
    /// the round still is from the threshold.
    pub fn context(&self, original_query: &str) -> Option<ClarificationContext> {
        match self {
            ClarificationFlow::Idle => None,
            ClarificationFlow::Awaiting { selected, .. } => Some(ClarificationContext {
                original_query: original_query.to_string(),
                selected_options: selected.clone(),
                remaining_questions: (CLARIFICATION_THRESHOLD.saturating_sub(selected.len()))
                    as u32,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn awaiting() -> ClarificationFlow {
        let mut flow = ClarificationFlow::default();
        flow.begin(vec!["Operating system".to_string(), "Network segment".to_string()]);
        flow
    }

    #[test]
    fn test_select_while_idle_is_ignored() {
        let mut flow = ClarificationFlow::default();
        assert_eq!(
            flow.select("Operating system", "Windows 11"),
            SelectionOutcome::Ignored
        );
        assert_eq!(flow.selected_count(), 0);
        assert!(!flow.is_awaiting());
    }

    #[test]
    fn test_select_unknown_key_is_ignored() {
        let mut flow = awaiting();
        assert!(flow.offers("Operating system"));
        assert!(!flow.offers("Color"));
        assert_eq!(flow.select("Color", "blue"), SelectionOutcome::Ignored);
        assert_eq!(flow.selected_count(), 0);
    }

    #[test]
    fn test_reselecting_a_key_overwrites_without_growing() {
        let mut flow = awaiting();
        assert_eq!(
            flow.select("Operating system", "Windows 10"),
            SelectionOutcome::Recorded { distinct: 1 }
        );
        assert_eq!(
            flow.select("Operating system", "Windows 11"),
            SelectionOutcome::Recorded { distinct: 1 }
        );
        assert!(!flow.ready_to_requery());

        let context = flow.context("vpn keeps dropping").unwrap();
        assert_eq!(
            context.selected_options.get("Operating system").map(String::as_str),
            Some("Windows 11")
        );
        assert_eq!(context.remaining_questions, 1);
    }

    #[test]
    fn test_threshold_reached_after_two_distinct_keys() {
        let mut flow = awaiting();
        flow.select("Operating system", "Windows 11");
        assert!(!flow.ready_to_requery());
        flow.select("Network segment", "Office LAN");
        assert!(flow.ready_to_requery());

        let context = flow.context("vpn keeps dropping").unwrap();
        assert_eq!(context.remaining_questions, 0);
        assert_eq!(context.original_query, "vpn keeps dropping");
    }

    #[test]
    fn test_begin_resets_previous_selections() {
        let mut flow = awaiting();
        flow.select("Operating system", "Windows 11");

        flow.begin(vec!["Operating system".to_string()]);
        assert_eq!(flow.selected_count(), 0);
        assert!(flow.is_awaiting());
    }

    #[test]
    fn test_finish_returns_to_idle_and_drops_state() {
        let mut flow = awaiting();
        flow.select("Operating system", "Windows 11");
        flow.finish();

        assert!(!flow.is_awaiting());
        assert_eq!(flow.selected_count(), 0);
        assert!(flow.context("anything").is_none());
    }
}
