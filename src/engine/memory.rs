//! In-memory reference engine.
//!
//! Holds mixer and playback options plus a queue of URIs. Nothing is ever
//! played; the engine exists so that every domain command has real state to
//! act on and real events to publish.

use super::{Engine, EventHub};
use crate::error::HandlerError;
use crate::handlers::core::Value;
use mpd_proto::{Entry, FieldsBuilder, ListRange, Reply};
use parking_lot::Mutex;
use tracing::debug;

#[derive(Debug, Clone)]
struct Track {
    id: u32,
    uri: String,
}

impl Track {
    /// File name without directory or extension.
    fn title(&self) -> &str {
        let name = self.uri.rsplit('/').next().unwrap_or(&self.uri);
        match name.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => name,
        }
    }
}

#[derive(Debug)]
struct PlayerState {
    volume: i64,
    repeat: bool,
    random: bool,
    single: bool,
    consume: bool,
    crossfade: u64,
    mixrampdb: f64,
    mixrampdelay: Option<f64>,
    queue: Vec<Track>,
    playlist_version: u32,
    next_id: u32,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            volume: 50,
            repeat: false,
            random: false,
            single: false,
            consume: false,
            crossfade: 0,
            mixrampdb: 0.0,
            mixrampdelay: None,
            queue: Vec::new(),
            playlist_version: 0,
            next_id: 1,
        }
    }
}

impl PlayerState {
    fn touch_playlist(&mut self) {
        self.playlist_version = self.playlist_version.wrapping_add(1);
    }

    /// Resolve `range` against the queue, rejecting starts past the end.
    fn span(&self, range: ListRange) -> Result<std::ops::Range<usize>, HandlerError> {
        if range.start as usize >= self.queue.len() {
            return Err(HandlerError::Arg("Bad song index".into()));
        }
        Ok(range.resolve(self.queue.len()))
    }
}

/// Engine keeping all state in process memory.
#[derive(Debug, Default)]
pub struct MemoryEngine {
    state: Mutex<PlayerState>,
    events: EventHub,
}

impl MemoryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    fn status(&self) -> Reply {
        let state = self.state.lock();
        let fields = FieldsBuilder::new()
            .field("volume", state.volume)
            .field("repeat", u8::from(state.repeat))
            .field("random", u8::from(state.random))
            .field("single", u8::from(state.single))
            .field("consume", u8::from(state.consume))
            .field("playlist", state.playlist_version)
            .field("playlistlength", state.queue.len())
            .field_opt("xfade", (state.crossfade > 0).then_some(state.crossfade))
            .field("mixrampdb", state.mixrampdb)
            .field_opt("mixrampdelay", state.mixrampdelay)
            .field("state", "stop")
            .build();
        Reply::Fields(fields)
    }

    fn set_volume(&self, volume: i64) -> Result<Reply, HandlerError> {
        if !(0..=100).contains(&volume) {
            return Err(HandlerError::Arg("Invalid volume value".into()));
        }
        self.state.lock().volume = volume;
        self.events.notify("mixer");
        Ok(Reply::Empty)
    }

    fn change_volume(&self, delta: i64) -> Result<Reply, HandlerError> {
        if !(-100..=100).contains(&delta) {
            return Err(HandlerError::Arg("Invalid volume value".into()));
        }
        {
            let mut state = self.state.lock();
            state.volume = (state.volume + delta).clamp(0, 100);
        }
        self.events.notify("mixer");
        Ok(Reply::Empty)
    }

    fn set_option(&self, apply: impl FnOnce(&mut PlayerState)) -> Reply {
        apply(&mut *self.state.lock());
        self.events.notify("options");
        Reply::Empty
    }

    fn add(&self, uri: &str) -> Reply {
        {
            let mut state = self.state.lock();
            let id = state.next_id;
            state.next_id += 1;
            state.queue.push(Track {
                id,
                uri: uri.to_owned(),
            });
            state.touch_playlist();
        }
        self.events.notify("playlist");
        Reply::Empty
    }

    fn clear(&self) -> Reply {
        {
            let mut state = self.state.lock();
            state.queue.clear();
            state.touch_playlist();
        }
        self.events.notify("playlist");
        Reply::Empty
    }

    fn delete(&self, range: ListRange) -> Result<Reply, HandlerError> {
        {
            let mut state = self.state.lock();
            let span = state.span(range)?;
            state.queue.drain(span);
            state.touch_playlist();
        }
        self.events.notify("playlist");
        Ok(Reply::Empty)
    }

    fn playlist_info(&self, range: Option<ListRange>) -> Result<Reply, HandlerError> {
        let state = self.state.lock();
        let span = match range {
            Some(range) => state.span(range)?,
            None => 0..state.queue.len(),
        };
        let entries = state.queue[span.clone()]
            .iter()
            .zip(span)
            .map(|(track, pos)| {
                Entry::Fields(
                    FieldsBuilder::new()
                        .field("file", &track.uri)
                        .field("Title", track.title())
                        .field("Pos", pos)
                        .field("Id", track.id)
                        .build(),
                )
            })
            .collect();
        Ok(Reply::List(entries))
    }
}

impl Engine for MemoryEngine {
    fn execute(&self, operation: &str, args: &[Value]) -> Result<Reply, HandlerError> {
        debug!(operation, ?args, "Engine call");
        match (operation, args) {
            ("status", []) => Ok(self.status()),
            ("setvol", [Value::Int(volume)]) => self.set_volume(*volume),
            ("volume", [Value::Int(delta)]) => self.change_volume(*delta),
            ("repeat", [Value::Bool(on)]) => Ok(self.set_option(|s| s.repeat = *on)),
            ("random", [Value::Bool(on)]) => Ok(self.set_option(|s| s.random = *on)),
            ("single", [Value::Bool(on)]) => Ok(self.set_option(|s| s.single = *on)),
            ("consume", [Value::Bool(on)]) => Ok(self.set_option(|s| s.consume = *on)),
            ("crossfade", [Value::UInt(seconds)]) => {
                Ok(self.set_option(|s| s.crossfade = *seconds))
            }
            ("mixrampdb", [Value::Float(db)]) => Ok(self.set_option(|s| s.mixrampdb = *db)),
            ("mixrampdelay", [Value::Float(seconds)]) => {
                Ok(self.set_option(|s| s.mixrampdelay = (*seconds > 0.0).then_some(*seconds)))
            }
            ("add", [Value::Str(uri)]) => Ok(self.add(uri)),
            ("clear", []) => Ok(self.clear()),
            ("delete", [Value::Range(range)]) => self.delete(*range),
            ("playlistinfo", [Value::Range(range)]) => self.playlist_info(Some(*range)),
            ("playlistinfo", [Value::Absent] | []) => self.playlist_info(None),
            _ => Err(HandlerError::NotImplemented),
        }
    }

    fn events(&self) -> &EventHub {
        &self.events
    }
}
