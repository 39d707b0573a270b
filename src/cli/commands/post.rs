//! Post command - perform the saves deferred by restore

use crate::cli::args::PostArgs;
use crate::cli::commands::RunContext;
use crate::error::CacheResult;
use crate::session::PendingSaves;
use tracing::{info, warn};

/// Execute the post command
pub async fn execute(args: PostArgs, ctx: &RunContext) -> CacheResult<()> {
    run(args, ctx).await.map(|_| ())
}

/// Replay pending saves, returning how many succeeded
pub async fn run(args: PostArgs, ctx: &RunContext) -> CacheResult<usize> {
    let run_id = ctx.run_id(args.run_id.as_deref());
    let pending = PendingSaves::take(&ctx.env.state_dir(), &run_id).await?;

    if pending.is_empty() {
        info!("No pending cache saves for run {}", run_id);
        return Ok(0);
    }

    let engine = ctx.engine();
    let mut saved = 0;
    for save in &pending {
        if engine
            .save(&save.paths, &save.key, save.compression_level)
            .await
        {
            saved += 1;
        } else {
            warn!("Cache not saved for key: {}", save.key);
        }
    }

    info!("Saved {} of {} pending cache entries", saved, pending.len());
    Ok(saved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::CompressionLevel;
    use crate::config::{Config, Environment};
    use crate::session::PendingSave;
    use tempfile::TempDir;

    fn context(temp: &TempDir) -> RunContext {
        RunContext {
            config: Config::default(),
            env: Environment {
                tool_cache: Some(temp.path().join("cache")),
                temp: Some(temp.path().join("tmp")),
                run_id: Some("run-9".to_string()),
                ..Environment::default()
            },
            cache_dir: None,
        }
    }

    #[tokio::test]
    async fn nothing_pending_is_a_noop() {
        let temp = TempDir::new().unwrap();
        let ctx = context(&temp);

        let saved = run(PostArgs { run_id: None }, &ctx).await.unwrap();
        assert_eq!(saved, 0);
        assert!(!ctx.cache_dir().exists());
    }

    #[tokio::test]
    async fn pending_state_consumed_even_when_paths_vanished() {
        let temp = TempDir::new().unwrap();
        let ctx = context(&temp);
        let state_dir = ctx.env.state_dir();

        let mut pending = PendingSaves::load(&state_dir, "run-9").await.unwrap();
        pending.record(PendingSave::new(
            "k".to_string(),
            vec![temp.path().join("gone").display().to_string()],
            CompressionLevel::DEFAULT,
        ));
        pending.persist(&state_dir).await.unwrap();

        let saved = run(PostArgs { run_id: None }, &ctx).await.unwrap();

        assert_eq!(saved, 0);
        assert!(!PendingSaves::file_path(&state_dir, "run-9").exists());
    }
}
