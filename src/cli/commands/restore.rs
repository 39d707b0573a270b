//! Restore command - extract the best matching cache entry

use crate::cache::CacheOutcome;
use crate::cli::args::RestoreArgs;
use crate::cli::commands::RunContext;
use crate::error::{CacheError, CacheResult};
use crate::session::{names, OutputSink, PendingSave, PendingSaves};
use tracing::{info, warn};

/// Execute the restore command
pub async fn execute(args: RestoreArgs, ctx: &RunContext) -> CacheResult<()> {
    run(args, ctx, &OutputSink::detect()).await.map(|_| ())
}

/// Restore (or look up) and publish outputs to `outputs`
pub async fn run(
    args: RestoreArgs,
    ctx: &RunContext,
    outputs: &OutputSink,
) -> CacheResult<CacheOutcome> {
    // Validate every input before touching the cache
    let key = args.inputs.key()?;
    let paths = args.inputs.paths()?;
    let restore_keys = args.restore_keys();
    let level = args.inputs.compression_level(&ctx.config);

    outputs.set(names::CACHE_PRIMARY_KEY, &key)?;

    let engine = ctx.engine();
    let outcome = if args.lookup_only {
        engine.lookup(&key, &restore_keys)
    } else {
        let target = args
            .target_dir
            .clone()
            .unwrap_or_else(|| ctx.env.workspace_dir());
        let outcome = engine.restore(&paths, &key, &restore_keys, &target).await;
        if let Some(ref dir) = outcome.restored_to {
            if *dir != target {
                warn!(
                    "Cache extracted into {} instead of {}; restored paths moved",
                    dir.display(),
                    target.display()
                );
            }
        }
        outcome
    };

    outputs.set(names::CACHE_HIT, &outcome.cache_hit.to_string())?;
    outputs.set(
        names::CACHE_MATCHED_KEY,
        outcome.matched_key.as_deref().unwrap_or_default(),
    )?;

    if !outcome.is_match() && args.fail_on_cache_miss {
        return Err(CacheError::CacheMiss { key });
    }

    if !outcome.cache_hit && !args.lookup_only {
        let state_dir = ctx.env.state_dir();
        let run_id = ctx.run_id(args.run_id.as_deref());
        let mut pending = PendingSaves::load(&state_dir, &run_id).await?;
        pending.record(PendingSave::new(key.clone(), paths, level));
        pending.persist(&state_dir).await?;
        info!("Cache will be saved with key {} by the post step", key);
    }

    Ok(outcome)
}
