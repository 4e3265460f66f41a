use std::cmp::Ordering;
use std::collections::BinaryHeap;

use hashbrown::HashMap;

#[derive(Copy, Clone, Debug)]
struct Entry {
    entropy: f64,
    idx: usize,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    // Reversed so the max-heap pops the lowest entropy; ties go to the lower index.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .entropy
            .total_cmp(&self.entropy)
            .then_with(|| other.idx.cmp(&self.idx))
    }
}

/// Min-entropy queue of cells awaiting collapse. A cell is queued at most
/// once; re-prioritizing leaves a stale heap entry that `pop` skips.
#[derive(Default, Debug)]
pub struct Frontier {
    heap: BinaryHeap<Entry>,
    queued: HashMap<usize, f64>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `idx` unless it is already queued.
    pub fn push(&mut self, idx: usize, entropy: f64) -> bool {
        if self.queued.contains_key(&idx) {
            return false;
        }
        self.queued.insert(idx, entropy);
        self.heap.push(Entry { entropy, idx });
        true
    }

    /// Refreshes the priority of an already queued cell.
    pub fn update(&mut self, idx: usize, entropy: f64) {
        if let Some(current) = self.queued.get_mut(&idx) {
            if current.to_bits() != entropy.to_bits() {
                *current = entropy;
                self.heap.push(Entry { entropy, idx });
            }
        }
    }

    pub fn pop(&mut self) -> Option<(usize, f64)> {
        while let Some(e) = self.heap.pop() {
            match self.queued.get(&e.idx) {
                Some(cur) if cur.to_bits() == e.entropy.to_bits() => {
                    self.queued.remove(&e.idx);
                    return Some((e.idx, e.entropy));
                }
                _ => continue,
            }
        }
        None
    }

    #[inline]
    pub fn contains(&self, idx: usize) -> bool {
        self.queued.contains_key(&idx)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.queued.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queued.is_empty()
    }
}

/// `ln(Σw) − Σ(w·ln w)/Σw` over candidate weights. Zero for one or no
/// candidates; falls back to `ln(n)` when the weights carry no mass.
pub fn shannon_entropy(weights: impl IntoIterator<Item = f64>) -> f64 {
    let mut n = 0usize;
    let mut sum_w = 0.0f64;
    let mut sum_wlw = 0.0f64;
    for w in weights {
        n += 1;
        if w.is_finite() && w > 0.0 {
            sum_w += w;
            sum_wlw += w * w.ln();
        }
    }
    if n <= 1 {
        return 0.0;
    }
    if !(sum_w > 0.0) || !sum_w.is_finite() {
        return (n as f64).ln();
    }
    sum_w.ln() - sum_wlw / sum_w
}
