//! Mixer and playback option commands.

use super::core::{Args, Context};
use crate::error::HandlerResult;

pub fn setvol(ctx: &mut Context<'_>, args: &Args) -> HandlerResult {
    ctx.engine.execute("setvol", &args.values())
}

/// Relative volume change.
pub fn volume(ctx: &mut Context<'_>, args: &Args) -> HandlerResult {
    ctx.engine.execute("volume", &args.values())
}

pub fn random(ctx: &mut Context<'_>, args: &Args) -> HandlerResult {
    ctx.engine.execute("random", &args.values())
}

pub fn repeat(ctx: &mut Context<'_>, args: &Args) -> HandlerResult {
    ctx.engine.execute("repeat", &args.values())
}

pub fn single(ctx: &mut Context<'_>, args: &Args) -> HandlerResult {
    ctx.engine.execute("single", &args.values())
}

pub fn consume(ctx: &mut Context<'_>, args: &Args) -> HandlerResult {
    ctx.engine.execute("consume", &args.values())
}

pub fn crossfade(ctx: &mut Context<'_>, args: &Args) -> HandlerResult {
    ctx.engine.execute("crossfade", &args.values())
}

pub fn mixrampdb(ctx: &mut Context<'_>, args: &Args) -> HandlerResult {
    ctx.engine.execute("mixrampdb", &args.values())
}

pub fn mixrampdelay(ctx: &mut Context<'_>, args: &Args) -> HandlerResult {
    ctx.engine.execute("mixrampdelay", &args.values())
}
