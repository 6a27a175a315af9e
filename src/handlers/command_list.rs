//! `command_list_begin`, `command_list_ok_begin`, `command_list_end`.
//!
//! Buffering and execution of list members happen in the dispatcher; these
//! handlers only open the list, or reject an end without a begin.

use super::core::{Args, Context};
use crate::error::{HandlerError, HandlerResult};
use crate::state::ListMode;
use mpd_proto::Reply;

pub fn begin(ctx: &mut Context<'_>, _args: &Args) -> HandlerResult {
    ctx.state.begin_list(ListMode::Silent);
    Ok(Reply::Empty)
}

pub fn ok_begin(ctx: &mut Context<'_>, _args: &Args) -> HandlerResult {
    ctx.state.begin_list(ListMode::Verbose);
    Ok(Reply::Empty)
}

/// Only reached when no list is open.
pub fn end(_ctx: &mut Context<'_>, _args: &Args) -> HandlerResult {
    Err(HandlerError::UnknownCommand("command_list_end".into()))
}
