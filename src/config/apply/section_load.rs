use clap::ArgMatches;

use crate::args::TesterArgs;
use crate::error::AppResult;

use super::super::types::ConfigFile;
use super::util::{ensure_duration, ensure_positive_u64, ensure_positive_usize, is_cli};

/// Run length, worker pool, and pacing.
pub(super) fn apply_load_config(
    args: &mut TesterArgs,
    matches: &ArgMatches,
    config: &ConfigFile,
) -> AppResult<()> {
    if !is_cli(matches, "url")
        && let Some(url) = config.url.clone()
    {
        args.url = Some(url);
    }

    if !is_cli(matches, "fixtures")
        && let Some(fixtures) = config.fixtures.clone()
    {
        args.fixtures = fixtures;
    }

    if !is_cli(matches, "target_duration")
        && let Some(duration) = config.duration
    {
        args.target_duration = ensure_positive_u64(duration, "duration")?;
    }

    if !is_cli(matches, "requests")
        && let Some(requests) = config.requests
    {
        args.requests = Some(ensure_positive_u64(requests, "requests")?);
    }

    if !is_cli(matches, "max_tasks")
        && let Some(max_tasks) = config.max_tasks
    {
        args.max_tasks = ensure_positive_usize(max_tasks, "max_tasks")?;
    }

    if !is_cli(matches, "spawn_rate_per_tick")
        && let Some(spawn_rate) = config.spawn_rate
    {
        args.spawn_rate_per_tick = ensure_positive_usize(spawn_rate, "spawn_rate")?;
    }

    if !is_cli(matches, "tick_interval")
        && let Some(interval) = config.spawn_interval
    {
        args.tick_interval = ensure_positive_u64(interval, "spawn_interval")?;
    }

    if !is_cli(matches, "rate_limit")
        && let Some(rate) = config.rate
    {
        args.rate_limit = Some(ensure_positive_u64(rate, "rate")?);
    }

    if !is_cli(matches, "think_time")
        && let Some(think_time) = config.think_time.as_ref()
    {
        args.think_time = Some(ensure_duration(think_time, "think_time")?);
    }

    if !is_cli(matches, "wait_ongoing")
        && let Some(wait_ongoing) = config.wait_ongoing
    {
        args.wait_ongoing = wait_ongoing;
    }

    Ok(())
}
