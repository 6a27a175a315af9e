//! Connection state owned by one dispatcher.
//!
//! ```text
//!            idle                      command_list_begin
//!  ┌──────┐ ─────▶ ┌──────────┐   ┌──────┐ ─────────────▶ ┌──────────────┐
//!  │ Off  │        │ Blocking │   │ Off  │                │ List (open)  │
//!  └──────┘ ◀───── └──────────┘   └──────┘ ◀───────────── └──────────────┘
//!         event / noidle                     command_list_end
//! ```
//!
//! Idling and an open command list exclude each other: `idle` is rejected
//! inside a list, and nothing but `noidle` is accepted while idling.

use super::tagtypes::TagTypes;
use std::collections::BTreeSet;

/// Which subsystem changes wake an idling connection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum IdleState {
    #[default]
    Off,
    /// `idle` without arguments: every subsystem.
    All,
    Subscribed(BTreeSet<String>),
}

/// Whether list members are separated by `list_OK`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListMode {
    Silent,
    Verbose,
}

/// An open command list and the raw requests buffered so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandList {
    pub mode: ListMode,
    pub requests: Vec<String>,
}

#[derive(Debug, Default)]
pub struct ConnectionState {
    authenticated: bool,
    tagtypes: TagTypes,
    idle: IdleState,
    pending_events: BTreeSet<String>,
    command_list: Option<CommandList>,
    close_requested: bool,
}

impl ConnectionState {
    /// Fresh state. Connections start authenticated when no password is set.
    pub fn new(authenticated: bool) -> Self {
        Self {
            authenticated,
            ..Self::default()
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn authenticate(&mut self) {
        self.authenticated = true;
    }

    pub fn tagtypes(&self) -> &TagTypes {
        &self.tagtypes
    }

    pub fn tagtypes_mut(&mut self) -> &mut TagTypes {
        &mut self.tagtypes
    }

    // ------------------------------------------------------------------
    // Idle
    // ------------------------------------------------------------------

    /// Start idling on `subsystems`, or on everything when empty.
    pub fn subscribe(&mut self, subsystems: &[String]) {
        self.idle = if subsystems.is_empty() {
            IdleState::All
        } else {
            IdleState::Subscribed(subsystems.iter().cloned().collect())
        };
    }

    pub fn is_idle(&self) -> bool {
        self.idle != IdleState::Off
    }

    /// Remember that `subsystem` changed.
    pub fn record_event(&mut self, subsystem: &str) {
        self.pending_events.insert(subsystem.to_owned());
    }

    /// Subsystems that should wake the connection now, sorted.
    ///
    /// Returns `None` when nothing subscribed has changed. Otherwise the
    /// subscription and all pending events are cleared.
    pub fn take_triggered(&mut self) -> Option<Vec<String>> {
        let triggered: Vec<String> = match &self.idle {
            IdleState::Off => return None,
            IdleState::All => self.pending_events.iter().cloned().collect(),
            IdleState::Subscribed(subscriptions) => self
                .pending_events
                .intersection(subscriptions)
                .cloned()
                .collect(),
        };
        if triggered.is_empty() {
            return None;
        }
        self.idle = IdleState::Off;
        self.pending_events.clear();
        Some(triggered)
    }

    /// Leave idle without reporting anything.
    pub fn cancel_idle(&mut self) {
        self.idle = IdleState::Off;
    }

    // ------------------------------------------------------------------
    // Command lists
    // ------------------------------------------------------------------

    pub fn begin_list(&mut self, mode: ListMode) {
        self.command_list = Some(CommandList {
            mode,
            requests: Vec::new(),
        });
    }

    pub fn list_open(&self) -> bool {
        self.command_list.is_some()
    }

    /// Append a request to the open list. Returns false if no list is open.
    pub fn buffer(&mut self, request: &str) -> bool {
        match self.command_list.as_mut() {
            Some(list) => {
                list.requests.push(request.to_owned());
                true
            }
            None => false,
        }
    }

    /// Bytes of request text buffered in the open list.
    pub fn buffered_len(&self) -> usize {
        self.command_list
            .as_ref()
            .map_or(0, |list| list.requests.iter().map(String::len).sum())
    }

    /// Close the open list, handing back its members.
    pub fn take_list(&mut self) -> Option<CommandList> {
        self.command_list.take()
    }

    // ------------------------------------------------------------------
    // Close
    // ------------------------------------------------------------------

    pub fn request_close(&mut self) {
        self.close_requested = true;
    }

    pub fn close_requested(&self) -> bool {
        self.close_requested
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_event_outside_subscription_does_not_trigger() {
        let mut state = ConnectionState::new(true);
        state.subscribe(&names(&["player"]));
        state.record_event("mixer");
        assert_eq!(state.take_triggered(), None);
        assert!(state.is_idle());

        state.record_event("player");
        assert_eq!(state.take_triggered(), Some(names(&["player"])));
        assert!(!state.is_idle());
    }

    #[test]
    fn test_pending_events_survive_until_idle() {
        let mut state = ConnectionState::new(true);
        state.record_event("options");
        state.record_event("mixer");
        assert_eq!(state.take_triggered(), None);

        state.subscribe(&[]);
        assert_eq!(state.take_triggered(), Some(names(&["mixer", "options"])));
        // Wake-up clears everything.
        state.subscribe(&[]);
        assert_eq!(state.take_triggered(), None);
    }

    #[test]
    fn test_trigger_clears_unsubscribed_events_too() {
        let mut state = ConnectionState::new(true);
        state.record_event("mixer");
        state.record_event("player");
        state.subscribe(&names(&["player"]));
        assert_eq!(state.take_triggered(), Some(names(&["player"])));
        state.subscribe(&names(&["mixer"]));
        assert_eq!(state.take_triggered(), None);
    }

    #[test]
    fn test_command_list_buffering() {
        let mut state = ConnectionState::new(true);
        assert!(!state.buffer("status"));
        state.begin_list(ListMode::Verbose);
        assert!(state.buffer("status"));
        assert!(state.buffer("ping"));
        assert_eq!(state.buffered_len(), 10);
        let list = state.take_list().unwrap();
        assert_eq!(list.mode, ListMode::Verbose);
        assert_eq!(list.requests, names(&["status", "ping"]));
        assert!(!state.list_open());
    }
}
