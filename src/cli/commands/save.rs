//! Save command - archive paths under a key right away

use crate::cli::args::SaveArgs;
use crate::cli::commands::RunContext;
use crate::error::CacheResult;
use console::style;
use tracing::warn;

/// Execute the save command
pub async fn execute(args: SaveArgs, ctx: &RunContext) -> CacheResult<()> {
    let key = args.inputs.key()?;
    let paths = args.inputs.paths()?;
    let level = args.inputs.compression_level(&ctx.config);

    let saved = ctx.engine().save(&paths, &key, level).await;

    if saved {
        eprintln!("{} Cache saved with key: {}", style("[OK]").green(), key);
    } else {
        warn!("Cache not saved for key: {}", key);
    }

    Ok(())
}
