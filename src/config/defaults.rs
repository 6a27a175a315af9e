//! Default value functions for configuration.

pub fn default_server_name() -> String {
    "mpdd".to_string()
}

// =============================================================================
// Protocol Defaults
// =============================================================================

pub fn default_max_connections() -> usize {
    20
}

/// Seconds of silence before a non-idling connection is dropped.
pub fn default_connection_timeout() -> u64 {
    60
}

pub fn default_command_blacklist() -> Vec<String> {
    vec!["listall".to_string(), "listallinfo".to_string()]
}

/// Bytes a single command list may buffer before the connection is closed.
pub fn default_max_command_list_size() -> usize {
    2048 * 1024
}

pub fn default_max_line_length() -> usize {
    mpd_proto::line::DEFAULT_MAX_LEN
}
