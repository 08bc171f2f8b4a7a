use clap::ArgMatches;

use crate::args::TesterArgs;
use crate::error::AppResult;

use super::super::types::ConfigFile;
use super::util::{ensure_ratio, is_cli};

/// Request synthesis: JSON-RPC envelope, block references, and priority draws.
pub(super) fn apply_bundle_config(
    args: &mut TesterArgs,
    matches: &ArgMatches,
    config: &ConfigFile,
) -> AppResult<()> {
    if !is_cli(matches, "priority_header")
        && let Some(header) = config.priority_header.clone()
    {
        args.priority_header = header;
    }

    if !is_cli(matches, "high_priority_ratio")
        && let Some(ratio) = config.high_priority_ratio
    {
        args.high_priority_ratio = ensure_ratio(ratio, "high_priority_ratio")?;
    }

    if !is_cli(matches, "fast_track_ratio")
        && let Some(ratio) = config.fast_track_ratio
    {
        args.fast_track_ratio = ensure_ratio(ratio, "fast_track_ratio")?;
    }

    if !is_cli(matches, "rpc_method")
        && let Some(method) = config.rpc_method.clone()
    {
        args.rpc_method = method;
    }

    if !is_cli(matches, "request_id")
        && let Some(request_id) = config.request_id
    {
        args.request_id = request_id;
    }

    if !is_cli(matches, "base_block")
        && let Some(base_block) = config.base_block
    {
        args.base_block = base_block;
    }

    if !is_cli(matches, "block_offset")
        && let Some(block_offset) = config.block_offset
    {
        args.block_offset = block_offset;
    }

    if !is_cli(matches, "state_block")
        && let Some(state_block) = config.state_block.clone()
    {
        args.state_block = state_block;
    }

    if !is_cli(matches, "seed")
        && let Some(seed) = config.seed
    {
        args.seed = Some(seed);
    }

    Ok(())
}
