use super::write_report;
use crate::cli::BlendArgs;
use crate::error::{CliError, Result};
use crate::input::load_registry;
use crate::utils::parser;
use throwlab::engine::tasks::blend;
use tracing::info;

pub fn run(args: BlendArgs) -> Result<()> {
    let parts = parser::parse_blend(&args.spec).map_err(|e| CliError::Argument(e.to_string()))?;
    let registry = load_registry(args.waxes.as_deref())?;

    let profile = blend::run(&parts, &registry)?;
    info!(
        key = %profile.key,
        channel_factor = profile.channel_factor,
        viscosity = profile.viscosity,
        "Blend profile derived."
    );

    write_report(&profile, None)
}
