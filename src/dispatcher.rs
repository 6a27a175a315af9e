//! Per-connection request dispatcher.
//!
//! Turns one request line into the response lines sent back, running it
//! through these stages, outermost first:
//!
//! 1. failures of any later stage become a single `ACK` line
//! 2. authentication, when a password is configured
//! 3. command-list buffering
//! 4. the idle guard
//! 5. tokenizing, the blacklist and the registry call
//! 6. silence while the connection is idling
//! 7. the trailing `OK`
//!
//! Subsystem events arrive separately through [`Dispatcher::handle_idle`].

use crate::config::MpdConfig;
use crate::engine::{ConnectionId, Engine};
use crate::error::{Ack, HandlerError};
use crate::handlers::{Context, Registry, changed};
use crate::state::{ConnectionState, ListMode};
use mpd_proto::{LIST_OK, OK, Reply, tokenize};
use std::sync::Arc;
use tracing::{debug, instrument};

/// What the session should do with a request's result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Lines to send. Empty means send nothing.
    Reply(Vec<String>),
    /// Close the connection without a response.
    Close,
}

/// Commands that may not appear inside a command list.
const NOT_IN_LIST: &[&str] = &["idle", "command_list_begin", "command_list_ok_begin"];

pub struct Dispatcher {
    id: ConnectionId,
    registry: Arc<Registry>,
    engine: Arc<dyn Engine>,
    settings: Arc<MpdConfig>,
    state: ConnectionState,
}

impl Dispatcher {
    pub fn new(
        id: ConnectionId,
        registry: Arc<Registry>,
        engine: Arc<dyn Engine>,
        settings: Arc<MpdConfig>,
    ) -> Self {
        let state = ConnectionState::new(settings.password.is_none());
        Self {
            id,
            registry,
            engine,
            settings,
            state,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.state.is_idle()
    }

    /// Process one request line.
    #[instrument(level = "trace", skip(self), fields(connection = self.id))]
    pub fn handle_request(&mut self, request: &str) -> Outcome {
        if let Err(ack) = self.authenticate(request) {
            return Outcome::Reply(vec![ack.to_string()]);
        }

        if self.state.list_open() {
            if request == "command_list_end" {
                return self.run_command_list();
            }
            if self.state.buffered_len() + request.len() > self.settings.max_command_list_size {
                debug!(
                    connection = self.id,
                    limit = self.settings.max_command_list_size,
                    "Command list too large, closing"
                );
                self.state.take_list();
                return Outcome::Close;
            }
            self.state.buffer(request);
            return Outcome::Reply(Vec::new());
        }

        match (self.state.is_idle(), request == "noidle") {
            (true, false) => {
                debug!(connection = self.id, "Request while idling, closing");
                return Outcome::Close;
            }
            (false, true) => return Outcome::Reply(Vec::new()),
            _ => {}
        }

        match self.execute(request, false) {
            Ok(_) if self.state.close_requested() => Outcome::Close,
            // Idling, or a command list was just opened.
            Ok(_) if self.state.is_idle() || self.state.list_open() => Outcome::Reply(Vec::new()),
            Ok(mut lines) => {
                lines.push(OK.to_string());
                Outcome::Reply(lines)
            }
            Err(ack) => Outcome::Reply(vec![ack.to_string()]),
        }
    }

    /// Record a subsystem change and wake the connection if it was waiting
    /// for it.
    pub fn handle_idle(&mut self, subsystem: &str) -> Option<Vec<String>> {
        self.state.record_event(subsystem);
        let triggered = self.state.take_triggered()?;
        debug!(connection = self.id, ?triggered, "Waking idle client");
        let mut lines = changed(triggered).into_lines();
        lines.push(OK.to_string());
        Some(lines)
    }

    fn authenticate(&self, request: &str) -> Result<(), Ack> {
        if self.state.is_authenticated() {
            return Ok(());
        }
        let name = command_name(request);
        match self.registry.get(name) {
            Some(spec) if !spec.auth_required() => Ok(()),
            _ => Err(HandlerError::Permission(name.to_owned()).ack(name)),
        }
    }

    /// Tokenize and run one command, returning its lines without `OK`.
    fn execute(&mut self, request: &str, in_list: bool) -> Result<Vec<String>, Ack> {
        let tokens =
            tokenize::split(request).map_err(|e| HandlerError::from(e).ack(command_name(request)))?;
        let name = tokens.first().map(String::as_str).unwrap_or_default();

        if in_list && NOT_IN_LIST.contains(&name) {
            return Err(
                HandlerError::NotList(format!("\"{name}\" not allowed in a command list")).ack(name),
            );
        }

        if self.settings.is_blacklisted(name) {
            return Err(HandlerError::Disabled(name.to_owned()).ack(name));
        }

        let mut ctx = Context {
            id: self.id,
            state: &mut self.state,
            engine: self.engine.as_ref(),
            registry: &self.registry,
            settings: &self.settings,
        };
        self.registry
            .resolve_and_call(&mut ctx, &tokens)
            .map(Reply::into_lines)
            .map_err(|e| e.ack(name))
    }

    /// Run the members of the open list, stopping at the first failure.
    fn run_command_list(&mut self) -> Outcome {
        let Some(list) = self.state.take_list() else {
            return Outcome::Reply(Vec::new());
        };
        debug!(
            connection = self.id,
            members = list.requests.len(),
            verbose = list.mode == ListMode::Verbose,
            "Running command list"
        );

        let mut lines = Vec::new();
        for (index, request) in list.requests.iter().enumerate() {
            match self.execute(request, true) {
                Ok(member) => lines.extend(member),
                Err(ack) => {
                    lines.push(ack.at(index).to_string());
                    return Outcome::Reply(lines);
                }
            }
            if self.state.close_requested() {
                return Outcome::Close;
            }
            if list.mode == ListMode::Verbose {
                lines.push(LIST_OK.to_string());
            }
        }
        lines.push(OK.to_string());
        Outcome::Reply(lines)
    }
}

/// First word of a request, split the way the tokenizer splits it.
fn command_name(request: &str) -> &str {
    request
        .split(char::is_whitespace)
        .next()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::MemoryEngine;
    use crate::handlers::build_registry;

    fn dispatcher_with(settings: MpdConfig) -> Dispatcher {
        let registry = Arc::new(build_registry().unwrap());
        let engine: Arc<dyn Engine> = Arc::new(MemoryEngine::new());
        Dispatcher::new(1, registry, engine, Arc::new(settings))
    }

    fn dispatcher() -> Dispatcher {
        dispatcher_with(MpdConfig::default())
    }

    fn reply(d: &mut Dispatcher, request: &str) -> Vec<String> {
        match d.handle_request(request) {
            Outcome::Reply(lines) => lines,
            Outcome::Close => panic!("{request:?} closed the connection"),
        }
    }

    #[test]
    fn test_ping() {
        let mut d = dispatcher();
        assert_eq!(reply(&mut d, "ping"), vec!["OK"]);
    }

    #[test]
    fn test_unknown_command() {
        let mut d = dispatcher();
        assert_eq!(
            reply(&mut d, "bogus 1"),
            vec![r#"ACK [5@0] {} unknown command "bogus""#]
        );
    }

    #[test]
    fn test_argument_errors() {
        let mut d = dispatcher();
        assert_eq!(
            reply(&mut d, "setvol"),
            vec![r#"ACK [2@0] {setvol} wrong number of arguments for "setvol""#]
        );
        assert_eq!(
            reply(&mut d, "random yes"),
            vec!["ACK [2@0] {random} incorrect arguments"]
        );
        assert_eq!(
            reply(&mut d, "setvol 101"),
            vec!["ACK [2@0] {setvol} Invalid volume value"]
        );
    }

    #[test]
    fn test_tokenize_error() {
        let mut d = dispatcher();
        assert_eq!(
            reply(&mut d, r#"add "unterminated"#),
            vec![r#"ACK [2@0] {add} Missing closing '"'"#]
        );
    }

    #[test]
    fn test_blacklisted_command() {
        let mut d = dispatcher();
        assert_eq!(
            reply(&mut d, "listall"),
            vec![r#"ACK [52@0] {listall} "listall" has been disabled in the server"#]
        );
    }

    #[test]
    fn test_command_list_stops_at_first_failure() {
        let mut d = dispatcher();
        assert!(reply(&mut d, "command_list_begin").is_empty());
        assert!(reply(&mut d, "setvol 10").is_empty());
        assert!(reply(&mut d, "setvol x").is_empty());
        assert!(reply(&mut d, "setvol 90").is_empty());
        assert_eq!(
            reply(&mut d, "command_list_end"),
            vec!["ACK [2@1] {setvol} incorrect arguments"]
        );
        // The third member never ran.
        assert!(reply(&mut d, "status").contains(&"volume: 10".to_string()));
    }

    #[test]
    fn test_verbose_command_list() {
        let mut d = dispatcher();
        reply(&mut d, "command_list_ok_begin");
        reply(&mut d, "ping");
        reply(&mut d, "add a.flac");
        assert_eq!(
            reply(&mut d, "command_list_end"),
            vec!["list_OK", "list_OK", "OK"]
        );
    }

    #[test]
    fn test_silent_command_list_concatenates_output() {
        let mut d = dispatcher();
        reply(&mut d, "command_list_begin");
        reply(&mut d, "add one.ogg");
        reply(&mut d, "playlistinfo");
        let lines = reply(&mut d, "command_list_end");
        assert_eq!(
            lines,
            vec!["file: one.ogg", "Title: one", "Pos: 0", "Id: 1", "OK"]
        );
    }

    #[test]
    fn test_nested_list_and_idle_rejected_in_list() {
        let mut d = dispatcher();
        reply(&mut d, "command_list_begin");
        reply(&mut d, "ping");
        reply(&mut d, "idle");
        assert_eq!(
            reply(&mut d, "command_list_end"),
            vec![r#"ACK [1@1] {idle} "idle" not allowed in a command list"#]
        );
        assert!(!d.is_idle());
    }

    #[test]
    fn test_tab_separated_idle_rejected_in_list() {
        let mut d = dispatcher();
        reply(&mut d, "command_list_begin");
        reply(&mut d, "idle\tplayer");
        reply(&mut d, "ping");
        assert_eq!(
            reply(&mut d, "command_list_end"),
            vec![r#"ACK [1@0] {idle} "idle" not allowed in a command list"#]
        );
        assert!(!d.is_idle());
        assert_eq!(reply(&mut d, "ping"), vec!["OK"]);

        reply(&mut d, "command_list_begin");
        reply(&mut d, "command_list_ok_begin\t");
        assert_eq!(
            reply(&mut d, "command_list_end"),
            vec![r#"ACK [1@0] {command_list_ok_begin} "command_list_ok_begin" not allowed in a command list"#]
        );
    }

    #[test]
    fn test_oversized_command_list_closes() {
        let mut d = dispatcher_with(MpdConfig {
            max_command_list_size: 16,
            ..MpdConfig::default()
        });
        reply(&mut d, "command_list_begin");
        assert!(reply(&mut d, "setvol 10").is_empty());
        assert_eq!(d.handle_request("random 1 again"), Outcome::Close);
    }

    #[test]
    fn test_list_end_without_begin() {
        let mut d = dispatcher();
        assert_eq!(
            reply(&mut d, "command_list_end"),
            vec![r#"ACK [5@0] {} unknown command "command_list_end""#]
        );
    }

    #[test]
    fn test_idle_waits_for_subscribed_subsystem() {
        let mut d = dispatcher();
        assert!(reply(&mut d, "idle player").is_empty());
        assert!(d.is_idle());
        assert_eq!(d.handle_idle("mixer"), None);
        assert_eq!(
            d.handle_idle("player"),
            Some(vec!["changed: player".to_string(), "OK".to_string()])
        );
        assert!(!d.is_idle());
        assert_eq!(d.handle_idle("player"), None);
    }

    #[test]
    fn test_idle_answers_pending_events_at_once() {
        let mut d = dispatcher();
        reply(&mut d, "setvol 20");
        reply(&mut d, "random 1");
        assert_eq!(d.handle_idle("mixer"), None);
        assert_eq!(d.handle_idle("options"), None);
        assert_eq!(
            reply(&mut d, "idle"),
            vec!["changed: mixer", "changed: options", "OK"]
        );
        assert!(!d.is_idle());
    }

    #[test]
    fn test_noidle() {
        let mut d = dispatcher();
        assert!(reply(&mut d, "noidle").is_empty());
        reply(&mut d, "idle");
        assert_eq!(reply(&mut d, "noidle"), vec!["OK"]);
        assert!(!d.is_idle());
    }

    #[test]
    fn test_other_request_while_idle_closes() {
        let mut d = dispatcher();
        reply(&mut d, "idle");
        assert_eq!(d.handle_request("status"), Outcome::Close);
    }

    #[test]
    fn test_close() {
        let mut d = dispatcher();
        assert_eq!(d.handle_request("close"), Outcome::Close);
    }

    #[test]
    fn test_password_gates_commands() {
        let mut d = dispatcher_with(MpdConfig {
            password: Some("secret".into()),
            ..MpdConfig::default()
        });
        assert_eq!(
            reply(&mut d, "status"),
            vec![r#"ACK [4@0] {status} you don't have permission for "status""#]
        );
        assert_eq!(
            reply(&mut d, "bogus"),
            vec![r#"ACK [4@0] {bogus} you don't have permission for "bogus""#]
        );
        assert_eq!(reply(&mut d, "ping"), vec!["OK"]);
        assert_eq!(
            reply(&mut d, "password wrong"),
            vec!["ACK [3@0] {password} incorrect password"]
        );
        assert_eq!(
            reply(&mut d, "status\tx"),
            vec![r#"ACK [4@0] {status} you don't have permission for "status""#]
        );
        assert_eq!(reply(&mut d, "password secret"), vec!["OK"]);
        assert_eq!(reply(&mut d, "status")[0], "volume: 50");
    }

    #[test]
    fn test_commands_and_notcommands() {
        let mut d = dispatcher_with(MpdConfig {
            password: Some("secret".into()),
            ..MpdConfig::default()
        });
        assert_eq!(
            reply(&mut d, "commands"),
            vec![
                "command: close",
                "command: commands",
                "command: notcommands",
                "command: password",
                "command: ping",
                "OK",
            ]
        );
        let denied = reply(&mut d, "notcommands");
        assert!(denied.contains(&"command: status".to_string()));
        assert!(denied.contains(&"command: config".to_string()));
        assert!(denied.contains(&"command: kill".to_string()));
        assert!(!denied.contains(&"command: noidle".to_string()));

        reply(&mut d, "password secret");
        let allowed = reply(&mut d, "commands");
        assert!(allowed.contains(&"command: status".to_string()));
        assert!(!allowed.contains(&"command: command_list_begin".to_string()));
        assert_eq!(
            reply(&mut d, "notcommands"),
            vec!["command: config", "command: kill", "OK"]
        );
    }

    #[test]
    fn test_tagtypes_filter_playlistinfo() {
        let mut d = dispatcher();
        reply(&mut d, "add music/song.mp3");
        assert_eq!(reply(&mut d, "tagtypes clear"), vec!["OK"]);
        assert_eq!(reply(&mut d, "tagtypes"), vec!["OK"]);
        assert_eq!(
            reply(&mut d, "playlistinfo 0"),
            vec!["file: music/song.mp3", "Pos: 0", "Id: 1", "OK"]
        );
        reply(&mut d, "tagtypes enable title");
        assert_eq!(reply(&mut d, "tagtypes"), vec!["tagtype: Title", "OK"]);
        assert_eq!(
            reply(&mut d, "tagtypes enable Nope"),
            vec!["ACK [2@0] {tagtypes} Unknown tag type: Nope"]
        );
        assert_eq!(
            reply(&mut d, "tagtypes frobnicate"),
            vec!["ACK [2@0] {tagtypes} Unknown sub command"]
        );
    }

    #[test]
    fn test_kill_is_refused() {
        let mut d = dispatcher();
        assert_eq!(
            reply(&mut d, "kill"),
            vec![r#"ACK [4@0] {kill} you don't have permission for "kill""#]
        );
    }

    #[test]
    fn test_requests_answered_in_order() {
        let mut d = dispatcher();
        reply(&mut d, "setvol 30");
        reply(&mut d, "volume 5");
        assert_eq!(reply(&mut d, "status")[0], "volume: 35");
    }
}
