//! Queue commands: `add`, `clear`, `delete`, `playlistinfo`.

use super::core::{Args, Context};
use crate::error::HandlerResult;
use mpd_proto::{Entry, Reply};

pub fn add(ctx: &mut Context<'_>, args: &Args) -> HandlerResult {
    ctx.engine.execute("add", &args.values())
}

pub fn clear(ctx: &mut Context<'_>, _args: &Args) -> HandlerResult {
    ctx.engine.execute("clear", &[])
}

pub fn delete(ctx: &mut Context<'_>, args: &Args) -> HandlerResult {
    ctx.engine.execute("delete", &args.values())
}

/// `playlistinfo [RANGE]`, without the tags this connection disabled.
pub fn playlistinfo(ctx: &mut Context<'_>, args: &Args) -> HandlerResult {
    let reply = ctx.engine.execute("playlistinfo", &args.values())?;
    let tagtypes = ctx.state.tagtypes();
    Ok(match reply {
        Reply::List(entries) => Reply::List(
            entries
                .into_iter()
                .map(|entry| match entry {
                    Entry::Fields(mut fields) => {
                        fields.retain(|(key, _)| !tagtypes.is_disabled(key));
                        Entry::Fields(fields)
                    }
                    pair => pair,
                })
                .collect(),
        ),
        other => other,
    })
}
