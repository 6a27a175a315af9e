//! MPD command handlers.
//!
//! Every command is declared once in [`build_registry`]: its parameters, the
//! converters applied to them and its authorization and listing flags.
//! Handlers are plain functions receiving a [`Context`] and bound [`Args`].

pub mod core;

mod command_list;
mod connection;
mod options;
mod queue;
mod reflection;
mod status;

pub use self::core::{CommandBuilder, Context, Registry, Value};
pub use status::changed;

use self::core::args::{boolean, float, int, range, ufloat, uint};
use crate::error::RegistryError;

/// Declare every command the server understands.
pub fn build_registry() -> Result<Registry, RegistryError> {
    let mut builder = Registry::builder();
    builder
        // Command lists
        .register(
            CommandBuilder::new("command_list_begin")
                .unlisted()
                .handler(command_list::begin),
        )?
        .register(
            CommandBuilder::new("command_list_ok_begin")
                .unlisted()
                .handler(command_list::ok_begin),
        )?
        .register(
            CommandBuilder::new("command_list_end")
                .unlisted()
                .handler(command_list::end),
        )?
        // Idle and status
        .register(CommandBuilder::new("idle").variadic().handler(status::idle))?
        .register(CommandBuilder::new("noidle").unlisted().handler(status::noidle))?
        .register(CommandBuilder::new("status").handler(status::status))?
        // Connection
        .register(CommandBuilder::new("close").no_auth().handler(connection::close))?
        .register(CommandBuilder::new("kill").unlisted().handler(connection::kill))?
        .register(
            CommandBuilder::new("password")
                .param("password")
                .no_auth()
                .handler(connection::password),
        )?
        .register(CommandBuilder::new("ping").no_auth().handler(connection::ping))?
        .register(
            CommandBuilder::new("tagtypes")
                .variadic()
                .handler(connection::tagtypes),
        )?
        // Reflection
        .register(
            CommandBuilder::new("commands")
                .no_auth()
                .handler(reflection::commands),
        )?
        .register(
            CommandBuilder::new("notcommands")
                .no_auth()
                .handler(reflection::notcommands),
        )?
        // Playback options
        .register(
            CommandBuilder::new("setvol")
                .param("vol")
                .convert("vol", int)
                .handler(options::setvol),
        )?
        .register(
            CommandBuilder::new("volume")
                .param("change")
                .convert("change", int)
                .handler(options::volume),
        )?
        .register(
            CommandBuilder::new("random")
                .param("state")
                .convert("state", boolean)
                .handler(options::random),
        )?
        .register(
            CommandBuilder::new("repeat")
                .param("state")
                .convert("state", boolean)
                .handler(options::repeat),
        )?
        .register(
            CommandBuilder::new("single")
                .param("state")
                .convert("state", boolean)
                .handler(options::single),
        )?
        .register(
            CommandBuilder::new("consume")
                .param("state")
                .convert("state", boolean)
                .handler(options::consume),
        )?
        .register(
            CommandBuilder::new("crossfade")
                .param("seconds")
                .convert("seconds", uint)
                .handler(options::crossfade),
        )?
        .register(
            CommandBuilder::new("mixrampdb")
                .param("decibels")
                .convert("decibels", float)
                .handler(options::mixrampdb),
        )?
        .register(
            CommandBuilder::new("mixrampdelay")
                .param("seconds")
                .convert("seconds", ufloat)
                .handler(options::mixrampdelay),
        )?
        // Queue
        .register(CommandBuilder::new("add").param("uri").handler(queue::add))?
        .register(CommandBuilder::new("clear").handler(queue::clear))?
        .register(
            CommandBuilder::new("delete")
                .param("range")
                .convert("range", range)
                .handler(queue::delete),
        )?
        .register(
            CommandBuilder::new("playlistinfo")
                .optional("range", Value::Absent)
                .convert("range", range)
                .handler(queue::playlistinfo),
        )?;
    Ok(builder.build())
}
