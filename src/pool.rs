//! Worker-pool configuration for the parallel builder (C4).
//!
//! `p`, the worker count, is discovered at build time: an explicit value
//! takes precedence, then the `BP_RMM_THREADS` environment variable, then
//! the platform's default parallelism.

/// Configuration for the thread pool the parallel builder runs on.
#[derive(Clone, Debug, Default)]
pub struct PoolConfig {
    pub num_threads: Option<usize>,
}

impl PoolConfig {
    /// Build a config reading the `BP_RMM_THREADS` environment override.
    pub fn from_env() -> Self {
        let num_threads = std::env::var("BP_RMM_THREADS")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .filter(|&n| n >= 1);
        PoolConfig { num_threads }
    }

    /// Resolve the worker count that construction will actually use. An
    /// explicit `Some(0)` is treated the same as `None` (fall through to the
    /// platform default) rather than yielding zero workers.
    pub fn effective_threads(&self) -> usize {
        self.num_threads.filter(|&n| n >= 1).unwrap_or_else(|| {
            #[cfg(feature = "rayon")]
            {
                rayon::current_num_threads()
            }
            #[cfg(not(feature = "rayon"))]
            {
                1
            }
        })
    }
}

/// Run `f` inside a scoped pool sized per `cfg`. Falls back to running `f`
/// directly on the current thread when the `rayon` feature is disabled.
pub fn with_pool<F, R>(cfg: &PoolConfig, f: F) -> R
where
    F: FnOnce() -> R + Send,
    R: Send,
{
    with_pool_impl(cfg, f)
}

#[cfg(feature = "rayon")]
fn with_pool_impl<F, R>(cfg: &PoolConfig, f: F) -> R
where
    F: FnOnce() -> R + Send,
    R: Send,
{
    let threads = cfg.effective_threads();
    match rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("bp-rmm-{i:02}"))
        .build()
    {
        Ok(pool) => pool.install(f),
        Err(_) => f(),
    }
}

#[cfg(not(feature = "rayon"))]
fn with_pool_impl<F, R>(_cfg: &PoolConfig, f: F) -> R
where
    F: FnOnce() -> R + Send,
    R: Send,
{
    f()
}
