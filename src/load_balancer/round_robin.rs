//! Round-robin selection with live-skip.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::load_balancer::backend::Backend;
use crate::load_balancer::BalancingStrategy;

/// Round-robin selector over the alive subset.
///
/// A single shared cursor is advanced atomically per selection; dead
/// entries are skipped by re-checking the liveness flag at scan time, since
/// the alive snapshot handed in may already be stale.
#[derive(Debug, Default)]
pub struct RoundRobin {
    cursor: AtomicU64,
}

impl RoundRobin {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_index(&self, count: usize) -> usize {
        let advanced = self.cursor.fetch_add(1, Ordering::Relaxed).wrapping_add(1);
        (advanced % count as u64) as usize
    }
}

impl BalancingStrategy for RoundRobin {
    fn next_backend(&self, alive: &[Arc<Backend>]) -> Option<Arc<Backend>> {
        if alive.is_empty() {
            return None;
        }

        let count = alive.len();
        let start = self.next_index(count);

        for offset in 0..count {
            let index = (start + offset) % count;
            if alive[index].is_alive() {
                if index != start {
                    // Resync so later selections don't rescan the dead run.
                    // Racy on purpose; a lost store only costs a rescan.
                    self.cursor.store(index as u64, Ordering::Relaxed);
                }
                return Some(alive[index].clone());
            }
        }

        None
    }
}
