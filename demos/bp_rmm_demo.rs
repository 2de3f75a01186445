//! RMM-tree demo CLI for the bp_rmm crate.
//!
//! Builds an RMM-tree index for a randomly generated balanced-parentheses
//! sequence and reports construction timing plus a handful of find_close
//! samples.
//!
//! Build & run:
//!   cargo run --release --example bp_rmm_demo -- --help
//!   cargo run --release --example bp_rmm_demo --
//!   cargo run --release --example bp_rmm_demo -- --bits=65536 --workers=8
//!   cargo run --release --example bp_rmm_demo -- --seed=1337 --print-sample=5
//!
//! Notes:
//! - This demo synthesizes data; it's useful for sanity and perf smoke tests.
//! - `--bits` is rounded up to an even number if needed.

use std::env;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use bp_rmm::pool::PoolConfig;

#[derive(Debug, Clone, Copy)]
struct Opts {
    bits: usize,         // length of the generated BP sequence
    workers: Option<usize>, // explicit worker count override
    seed: u64,           // RNG seed for reproducibility
    print_sample: usize, // show first K find_close results
}

fn print_help_and_exit() -> ! {
    eprintln!(
r#"bp_rmm_demo — build an RMM-tree index over a random balanced-parentheses sequence

USAGE:
  bp_rmm_demo [--bits=N] [--workers=N] [--seed=U64] [--print-sample=K]

OPTIONS:
  --bits=N           Length of the generated BP sequence. Default: 65536
  --workers=N        Explicit worker count (otherwise BP_RMM_THREADS or ambient default).
  --seed=U64         RNG seed for reproducibility. Default: 42
  --print-sample=K   Print the first K find_close results. Default: 0
  --help             Show this help.

EXAMPLES:
  bp_rmm_demo --bits=1048576 --workers=8
  bp_rmm_demo --seed=1234 --print-sample=5
"#
    );
    std::process::exit(0);
}

fn parse_args() -> Result<Opts, String> {
    let mut args = env::args().skip(1).collect::<Vec<_>>();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help_and_exit();
    }
    let mut bits = 65536usize;
    let mut workers = None;
    let mut seed = 42u64;
    let mut print_sample = 0usize;

    while let Some(arg) = args.first().cloned() {
        args.remove(0);
        if let Some(v) = arg.strip_prefix("--bits=") {
            bits = v.parse::<usize>().map_err(|_| format!("Invalid --bits: {v}"))?;
            continue;
        }
        if let Some(v) = arg.strip_prefix("--workers=") {
            workers = Some(v.parse::<usize>().map_err(|_| format!("Invalid --workers: {v}"))?);
            continue;
        }
        if let Some(v) = arg.strip_prefix("--seed=") {
            seed = v.parse::<u64>().map_err(|_| format!("Invalid --seed: {v}"))?;
            continue;
        }
        if let Some(v) = arg.strip_prefix("--print-sample=") {
            print_sample = v.parse::<usize>().map_err(|_| format!("Invalid --print-sample: {v}"))?;
            continue;
        }
        return Err(format!("Unrecognized argument: {arg} (use --help)"));
    }

    if bits % 2 != 0 {
        bits += 1;
    }
    if bits == 0 {
        return Err("--bits must be >= 1".into());
    }

    Ok(Opts { bits, workers, seed, print_sample })
}

/// Random well-formed balanced-parentheses generator: at each step, pick `(`
/// or `)` uniformly among choices that keep the remaining suffix completable.
fn gen_random_bp(n: usize, seed: u64) -> String {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut s = String::with_capacity(n);
    let mut depth = 0i64;
    for i in 0..n {
        let remaining = (n - i) as i64;
        let can_open = depth + 1 <= remaining - 1;
        let can_close = depth > 0;
        let open = if can_open && can_close { rng.next_u32() & 1 == 0 } else { can_open };
        if open {
            s.push('(');
            depth += 1;
        } else {
            s.push(')');
            depth -= 1;
        }
    }
    s
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(feature = "cli")]
    env_logger::init();

    let opts = parse_args().map_err(|e| { eprintln!("error: {e}"); e })?;

    println!("== bp_rmm_demo ==");
    println!("bits          : {}", opts.bits);
    println!("workers       : {}", opts.workers.map(|w| w.to_string()).unwrap_or_else(|| "ambient".into()));
    println!("seed          : {}", opts.seed);
    println!("print sample  : {}", opts.print_sample);
    println!();

    let bp = gen_random_bp(opts.bits, opts.seed);
    let cfg = PoolConfig { num_threads: opts.workers };

    let t0 = Instant::now();
    let idx = bp_rmm::Index::create(&bp, &cfg)?;
    let elapsed = t0.elapsed();

    let shape = idx.shape();
    println!("chunks        : {}", shape.chunk_count);
    println!("tree height   : {}", shape.height);
    println!("workers used  : {}", cfg.effective_threads());
    println!("elapsed       : {:.3}s", elapsed.as_secs_f64());
    println!(
        "throughput    : {:.2} Mbits/s",
        (opts.bits as f64) / 1_000_000.0 / elapsed.as_secs_f64()
    );
    println!();

    if opts.print_sample > 0 {
        println!("-- sample find_close results --");
        let mut shown = 0usize;
        for i in 0..bp.len() {
            if shown >= opts.print_sample {
                break;
            }
            if bp.as_bytes()[i] == b'(' {
                println!("  find_close({:>7}) = {:?}", i, idx.find_close(i));
                shown += 1;
            }
        }
    }

    Ok(())
}
