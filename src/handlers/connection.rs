//! Connection-level commands: `close`, `kill`, `password`, `ping`, `tagtypes`.

use super::core::{Args, Context};
use crate::error::{HandlerError, HandlerResult};
use mpd_proto::{Entry, Reply};
use tracing::info;

/// Close the connection. Nothing is sent back.
pub fn close(ctx: &mut Context<'_>, _args: &Args) -> HandlerResult {
    ctx.state.request_close();
    Ok(Reply::Empty)
}

/// Never allowed over the protocol.
pub fn kill(_ctx: &mut Context<'_>, _args: &Args) -> HandlerResult {
    Err(HandlerError::Permission("kill".into()))
}

pub fn password(ctx: &mut Context<'_>, args: &Args) -> HandlerResult {
    let supplied = args.str("password")?;
    match ctx.settings.password.as_deref() {
        Some(expected) if expected == supplied => {
            ctx.state.authenticate();
            info!(connection = ctx.id, "Client authenticated");
            Ok(Reply::Empty)
        }
        _ => Err(HandlerError::Password),
    }
}

pub fn ping(_ctx: &mut Context<'_>, _args: &Args) -> HandlerResult {
    Ok(Reply::Empty)
}

/// `tagtypes [all | clear | enable TAG... | disable TAG...]`
pub fn tagtypes(ctx: &mut Context<'_>, args: &Args) -> HandlerResult {
    let Some((sub, tags)) = args.rest().split_first() else {
        let entries = ctx
            .state
            .tagtypes()
            .iter()
            .map(|tag| Entry::Pair("tagtype".into(), tag.into()))
            .collect();
        return Ok(Reply::List(entries));
    };

    let tagtypes = ctx.state.tagtypes_mut();
    match sub.as_str() {
        "all" | "clear" if !tags.is_empty() => Err(HandlerError::Arg("Too many arguments".into())),
        "all" => {
            tagtypes.enable_all();
            Ok(Reply::Empty)
        }
        "clear" => {
            tagtypes.clear();
            Ok(Reply::Empty)
        }
        "enable" | "disable" if tags.is_empty() => {
            Err(HandlerError::Arg("Not enough arguments".into()))
        }
        "enable" => tagtypes
            .enable(tags)
            .map(|()| Reply::Empty)
            .map_err(|e| HandlerError::Arg(e.to_string())),
        "disable" => tagtypes
            .disable(tags)
            .map(|()| Reply::Empty)
            .map_err(|e| HandlerError::Arg(e.to_string())),
        _ => Err(HandlerError::Arg("Unknown sub command".into())),
    }
}
