mod section_bundle;
mod section_load;
mod section_transport;
mod util;

use clap::ArgMatches;

use crate::args::TesterArgs;
use crate::error::AppResult;

use super::types::ConfigFile;

/// Applies configuration values to CLI arguments.
///
/// Options given explicitly on the command line always win over the file.
///
/// # Errors
///
/// Returns an error when a config value is invalid.
pub fn apply_config(
    args: &mut TesterArgs,
    matches: &ArgMatches,
    config: &ConfigFile,
) -> AppResult<()> {
    section_load::apply_load_config(args, matches, config)?;
    section_bundle::apply_bundle_config(args, matches, config)?;
    section_transport::apply_transport_config(args, matches, config)?;
    Ok(())
}
