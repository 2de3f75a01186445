//! Thin CLI: build an RMM-tree index for a `(`/`)` string and report timing.
//!
//! USAGE:
//!   bp_rmm_cli <bp-string> [--workers=N]
//!
//! Emits one CSV line: workers,input_len,elapsed_seconds

use std::env;
use std::time::Instant;

use bp_rmm::pool::PoolConfig;

fn run() -> Result<(), String> {
    #[cfg(feature = "cli")]
    env_logger::init();

    let mut args = env::args().skip(1).collect::<Vec<_>>();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        eprintln!("bp_rmm_cli <bp-string> [--workers=N]");
        std::process::exit(0);
    }

    let mut workers: Option<usize> = None;
    let mut positional: Option<String> = None;
    for arg in args.drain(..) {
        if let Some(v) = arg.strip_prefix("--workers=") {
            workers = Some(v.parse::<usize>().map_err(|_| format!("invalid --workers: {v}"))?);
        } else if positional.is_none() {
            positional = Some(arg);
        } else {
            return Err(format!("unrecognized argument: {arg}"));
        }
    }

    let bp = positional.ok_or_else(|| "missing <bp-string> argument".to_string())?;
    let cfg = PoolConfig { num_threads: workers };

    let t0 = Instant::now();
    let idx = bp_rmm::Index::create(&bp, &cfg).map_err(|e| e.to_string())?;
    let elapsed = t0.elapsed();

    println!(
        "{},{},{:.6}",
        cfg.effective_threads(),
        idx.len(),
        elapsed.as_secs_f64()
    );
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {e}");
        std::process::exit(2);
    }
}
