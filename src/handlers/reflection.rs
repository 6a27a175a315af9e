//! `commands` and `notcommands`.

use super::core::{Args, Context};
use crate::error::HandlerResult;
use mpd_proto::{Entry, Reply};

/// Commands reserved by the protocol that this server never grants.
const ALWAYS_DENIED: &[&str] = &["config", "kill"];

/// Listable commands the client may run right now.
pub fn commands(ctx: &mut Context<'_>, _args: &Args) -> HandlerResult {
    let authenticated = ctx.state.is_authenticated();
    let names = ctx
        .registry
        .commands()
        .filter(|c| c.listable() && (authenticated || !c.auth_required()))
        .map(|c| c.name());
    Ok(command_list(names))
}

/// Listable commands the client may not run, plus the always denied ones.
pub fn notcommands(ctx: &mut Context<'_>, _args: &Args) -> HandlerResult {
    let authenticated = ctx.state.is_authenticated();
    let names = ctx
        .registry
        .commands()
        .filter(|c| c.listable() && !authenticated && c.auth_required())
        .map(|c| c.name())
        .chain(ALWAYS_DENIED.iter().copied());
    Ok(command_list(names))
}

fn command_list<'a>(names: impl Iterator<Item = &'a str>) -> Reply {
    let mut names: Vec<&str> = names.collect();
    names.sort_unstable();
    names.dedup();
    Reply::List(
        names
            .into_iter()
            .map(|name| Entry::Pair("command".into(), name.into()))
            .collect(),
    )
}
