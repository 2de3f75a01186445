//! Parallel builder (C4): four passes turning a BP bit sequence into the
//! RMM-tree summary arrays owned by an [`crate::rmm::Index`].

use log::{debug, trace};

use crate::bitvec::BitSeq;
use crate::error::BpError;
use crate::pool::{with_pool, PoolConfig};
use crate::parallel::{par_map, split_chunks, WorkSplit};
use crate::rmm::{is_leaf, left_child, right_child, Index, Shape, CHUNK_BITS};
use crate::summary::{summarize, Summary};

/// Build the RMM-tree for `bits`, using the worker count resolved from `cfg`.
pub fn build(bits: &BitSeq, cfg: &PoolConfig) -> Result<Index, BpError> {
    let n = bits.len();
    let s = CHUNK_BITS;
    if n <= s {
        return Err(BpError::InputTooSmall { n, s });
    }

    debug_assert!(
        first_malformed_bit(bits).is_none(),
        "malformed balanced-parentheses input: excess went negative or never returned to 0"
    );

    let shape = Shape::for_input(n, s);
    let requested = cfg.effective_threads();
    let splits = split_chunks(shape.chunk_count, requested);
    debug!(
        "bp_rmm::build: n={n} chunks={} workers_requested={requested} workers_effective={}",
        shape.chunk_count,
        splits.len()
    );

    with_pool(cfg, || build_with_splits(bits, shape, &splits))
}

/// Scan `bits` for the first position where the excess invariant breaks:
/// excess going negative, or (at the last bit) final excess not equal to 0.
fn first_malformed_bit(bits: &BitSeq) -> Option<usize> {
    let mut excess = 0i64;
    for i in 0..bits.len() {
        excess += if bits.get_bit(i) { 1 } else { -1 };
        if excess < 0 {
            return Some(i);
        }
    }
    if excess != 0 {
        return Some(bits.len().saturating_sub(1));
    }
    None
}

/// Explicit opt-in check of the excess invariant, for callers who want it
/// validated even in release builds (where `build`'s `debug_assert!` is
/// compiled out). `Index::create_checked` uses this.
pub fn check_balanced(bits: &BitSeq) -> Result<(), BpError> {
    match first_malformed_bit(bits) {
        Some(at) => Err(BpError::MalformedBp { at }),
        None => Ok(()),
    }
}

fn build_with_splits(bits: &BitSeq, shape: Shape, splits: &[WorkSplit]) -> Result<Index, BpError> {
    let total = shape.total_nodes();

    let mut e_prime = vec![0i16; shape.chunk_count];
    let mut m_prime = vec![0i16; total];
    let mut big_m_prime = vec![0i16; total];
    let mut n_prime = vec![0u32; total];

    // Pass 1: per-worker sequential chunk summaries, seeded at local excess 0.
    trace!("bp_rmm::build: pass 1 (chunk summaries) start");
    let worker_results = pass1_summarize(bits, splits);
    trace!("bp_rmm::build: pass 1 done");

    // Merge worker-local summaries into the leaf arrays.
    for (split, summaries) in splits.iter().zip(worker_results.iter()) {
        for (offset, summary) in summaries.iter().enumerate() {
            let c = split.start + offset;
            debug_assert!(summary.excess_at_hi.unsigned_abs() <= i16::MAX as u32);
            e_prime[c] = summary.excess_at_hi as i16;
            m_prime[shape.leaf_of_chunk(c)] = summary.min as i16;
            big_m_prime[shape.leaf_of_chunk(c)] = summary.max as i16;
            n_prime[shape.leaf_of_chunk(c)] = summary.min_count;
        }
    }

    // Pass 2: sequential excess prefix fix-up at slice boundaries.
    trace!("bp_rmm::build: pass 2 (boundary fix-up) start");
    pass2_fix_boundaries(splits, &mut e_prime);
    trace!("bp_rmm::build: pass 2 done");

    // Pass 3: broadcast each slice's predecessor delta into its chunks.
    trace!("bp_rmm::build: pass 3 (broadcast) start");
    pass3_broadcast(splits, &mut e_prime, &mut m_prime, &mut big_m_prime, &shape);
    trace!("bp_rmm::build: pass 3 done");

    // Pass 4: bottom-up internal-node fill.
    trace!("bp_rmm::build: pass 4 (internal fill) start");
    pass4_fill_internal(&shape, &mut m_prime, &mut big_m_prime, &mut n_prime);
    trace!("bp_rmm::build: pass 4 done");

    debug!("bp_rmm::build: done, root m'={} M'={}", m_prime[0], big_m_prime[0]);

    Ok(Index {
        bits: bits.clone(),
        shape,
        e_prime,
        m_prime,
        big_m_prime,
        n_prime,
    })
}

/// Pass 1: for each worker's chunk range, walk its chunks sequentially (local
/// excess rolling forward from 0), returning one [`Summary`] per chunk.
fn pass1_summarize(bits: &BitSeq, splits: &[WorkSplit]) -> Vec<Vec<Summary>> {
    par_map(splits, |&split| {
        let n = bits.len();
        let mut local_excess = 0i32;
        let mut out = Vec::with_capacity(split.len());
        for c in split.start..split.end {
            let lo = c * CHUNK_BITS;
            let hi = ((c + 1) * CHUNK_BITS).min(n);
            let summary = summarize(bits, lo, hi, local_excess);
            local_excess = summary.excess_at_hi;
            out.push(summary);
        }
        out
    })
}

/// Pass 2: sequentially accumulate each slice's last-chunk excess into the
/// next slice's last-chunk excess, so every slice boundary carries the true
/// global excess at the end of its worker's range. Runs for every non-first
/// slice (see DESIGN.md for why this differs from the source's `t < p-1`
/// bound).
fn pass2_fix_boundaries(splits: &[WorkSplit], e_prime: &mut [i16]) {
    for t in 1..splits.len() {
        let prev_last = splits[t - 1].end - 1;
        let cur_last = splits[t].end - 1;
        let delta = e_prime[prev_last] as i32;
        let widened = e_prime[cur_last] as i32 + delta;
        debug_assert!(
            widened.unsigned_abs() <= i16::MAX as u32,
            "global excess {widened} exceeds i16 range at chunk {cur_last}"
        );
        e_prime[cur_last] = widened as i16;
    }
}

/// Pass 3: broadcast the now-correct predecessor-slice-end excess into every
/// chunk of each non-first slice (except its own last chunk, already fixed in
/// pass 2).
fn pass3_broadcast(
    splits: &[WorkSplit],
    e_prime: &mut [i16],
    m_prime: &mut [i16],
    big_m_prime: &mut [i16],
    shape: &Shape,
) {
    if splits.len() <= 1 {
        return;
    }

    let deltas: Vec<i32> = (1..splits.len())
        .map(|t| e_prime[splits[t - 1].end - 1] as i32)
        .collect();

    // Disjoint per-slice ranges: safe to split mutably and hand each slice to
    // a worker without aliasing.
    let mut apply = |split: WorkSplit, delta: i32| {
        for c in split.start..split.end {
            if c != split.end - 1 {
                let widened = e_prime[c] as i32 + delta;
                debug_assert!(widened.unsigned_abs() <= i16::MAX as u32, "global excess {widened} exceeds i16 range at chunk {c}");
                e_prime[c] = widened as i16;
            }
            let leaf = shape.leaf_of_chunk(c);
            let m_widened = m_prime[leaf] as i32 + delta;
            let bm_widened = big_m_prime[leaf] as i32 + delta;
            debug_assert!(m_widened.unsigned_abs() <= i16::MAX as u32, "global excess {m_widened} exceeds i16 range at leaf {leaf}");
            debug_assert!(bm_widened.unsigned_abs() <= i16::MAX as u32, "global excess {bm_widened} exceeds i16 range at leaf {leaf}");
            m_prime[leaf] = m_widened as i16;
            big_m_prime[leaf] = bm_widened as i16;
        }
    };

    // e_prime/m_prime/big_m_prime are shared across the closure; since the
    // chunk ranges touched by each split are disjoint, run sequentially here
    // (the O(n) work already happened in pass 1) to keep this pass free of
    // unsafe aliasing tricks.
    for (t, &delta) in (1..splits.len()).zip(deltas.iter()) {
        apply(splits[t], delta);
    }
}

/// Pass 4: fill internal nodes bottom-up, level by level (each level's nodes
/// combine independently, so a level is processed with `par_map`; levels
/// themselves run in strict bottom-up order, each being a barrier for the
/// next). A node with no populated descendant (the padded tail of a partial
/// rightmost subtree) is skipped, matching the source's "children beyond the
/// populated leaf range are skipped".
fn pass4_fill_internal(
    shape: &Shape,
    m_prime: &mut [i16],
    big_m_prime: &mut [i16],
    n_prime: &mut [u32],
) {
    let total = shape.total_nodes();
    let i_count = shape.internal_count;

    let mut present = vec![false; total];
    for v in (0..total).rev() {
        present[v] = if is_leaf(v, i_count) {
            true
        } else {
            let l = left_child(v);
            let r = right_child(v);
            (l < total && present[l]) || (r < total && present[r])
        };
    }

    if i_count == 0 {
        return; // single-chunk tree: no internal nodes to fill.
    }

    // Internal nodes with no populated descendant (the padded tail of a
    // partial rightmost subtree) never get a `combine` result below; give
    // them an interval that can never contain any real target, so a query
    // climbing past them can't mistake zero-initialized storage for a match.
    for v in 0..i_count {
        if !present[v] {
            m_prime[v] = i16::MAX;
            big_m_prime[v] = i16::MIN;
            n_prime[v] = 0;
        }
    }

    let height = shape.height;
    for lvl in (0..height).rev() {
        let level_start = (1usize << lvl) - 1;
        let level_end = ((1usize << (lvl + 1)) - 1).min(i_count);
        let nodes: Vec<usize> = (level_start..level_end).filter(|&v| present[v]).collect();

        let combine = |v: usize| -> (i16, i16, u32) {
            let mut best_m = i16::MAX;
            let mut best_big_m = i16::MIN;
            let mut best_n = 0u32;
            for &child in &[left_child(v), right_child(v)] {
                if child >= total || !present[child] {
                    continue;
                }
                let cm = m_prime[child];
                let cbm = big_m_prime[child];
                let cn = n_prime[child];
                if cm < best_m {
                    best_m = cm;
                    best_n = cn;
                } else if cm == best_m {
                    best_n += cn;
                }
                if cbm > best_big_m {
                    best_big_m = cbm;
                }
            }
            (best_m, best_big_m, best_n)
        };

        let results: Vec<(i16, i16, u32)> = par_map(&nodes, |&v| combine(v));

        for (&v, (m, bm, n)) in nodes.iter().zip(results.into_iter()) {
            m_prime[v] = m;
            big_m_prime[v] = bm;
            n_prime[v] = n;
        }
    }
}
