//! `idle`, `noidle` and `status`.

use super::core::{Args, Context};
use crate::engine::SUBSYSTEMS;
use crate::error::HandlerResult;
use mpd_proto::{Entry, Reply};
use tracing::debug;

/// `idle [SUBSYSTEM...]`
///
/// Answers at once when a subscribed subsystem already changed; otherwise
/// leaves the connection idling and the dispatcher sends nothing.
pub fn idle(ctx: &mut Context<'_>, args: &Args) -> HandlerResult {
    let subsystems = args.rest();
    for unknown in subsystems.iter().filter(|s| !SUBSYSTEMS.contains(&s.as_str())) {
        debug!(connection = ctx.id, subsystem = %unknown, "Idling on unknown subsystem");
    }
    ctx.state.subscribe(subsystems);
    debug!(connection = ctx.id, ?subsystems, "Client idling");
    Ok(ctx
        .state
        .take_triggered()
        .map(changed)
        .unwrap_or_default())
}

/// Leave idle. Pending events stay recorded for the next `idle`.
pub fn noidle(ctx: &mut Context<'_>, _args: &Args) -> HandlerResult {
    ctx.state.cancel_idle();
    Ok(Reply::Empty)
}

pub fn status(ctx: &mut Context<'_>, _args: &Args) -> HandlerResult {
    ctx.engine.execute("status", &[])
}

/// `changed: <subsystem>` lines for the subsystems that woke a client.
pub fn changed(subsystems: Vec<String>) -> Reply {
    Reply::List(
        subsystems
            .into_iter()
            .map(|s| Entry::Pair("changed".into(), s))
            .collect(),
    )
}
