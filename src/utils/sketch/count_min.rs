use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use crate::error::{FramecacheError, FramecacheResult};

/// Count-Min Sketch: `depth` rows of `width` u32 counters with one seeded
/// hash function per row. `count` returns the row minimum, which never
/// under-counts; over-counting is bounded by `e/width * N` with probability
/// `1 - e^(-depth)` for `N` inserts.
///
/// The hash family is fixed so that replicated sketches stay interpretable:
/// row `i` feeds `i as u64` and then the key into
/// [`DefaultHasher::new`] (deterministic within a build) and folds the
/// result by `mod width`. Two sketches of equal shape therefore share the
/// whole family and can be merged cell-by-cell.
///
/// Counters saturate instead of wrapping and never decrement. Exclusive
/// access is the caller's business, same as for the replacer.
#[derive(Debug, Clone)]
pub struct CountMinSketch<K> {
    width: u32,
    depth: u32,
    rows: Vec<Vec<u32>>,
    _key: PhantomData<fn(&K)>,
}

impl<K: Hash> CountMinSketch<K> {
    pub fn new(width: u32, depth: u32) -> FramecacheResult<Self> {
        if width == 0 || depth == 0 {
            return Err(FramecacheError::InvalidArgument(format!(
                "count-min sketch requires a nonzero shape, got {}x{}",
                depth, width
            )));
        }
        Ok(Self {
            width,
            depth,
            rows: vec![vec![0; width as usize]; depth as usize],
            _key: PhantomData,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Bumps every row's counter for `key` by one, saturating.
    pub fn insert(&mut self, key: &K) {
        for row in 0..self.depth as usize {
            let column = self.column(row, key);
            let cell = &mut self.rows[row][column];
            *cell = cell.saturating_add(1);
        }
    }

    /// The row-minimum estimate for `key`. Never below the true count.
    pub fn count(&self, key: &K) -> u32 {
        (0..self.depth as usize)
            .map(|row| self.rows[row][self.column(row, key)])
            .min()
            .expect("depth is nonzero")
    }

    /// Zeroes all counters; shape and hash family are untouched.
    pub fn clear(&mut self) {
        for row in self.rows.iter_mut() {
            row.fill(0);
        }
    }

    /// Cell-wise saturating add of an equally shaped sketch. Equal shape
    /// implies an equal hash family, since seeds are the row indices.
    pub fn merge(&mut self, other: &CountMinSketch<K>) -> FramecacheResult<()> {
        if self.width != other.width || self.depth != other.depth {
            return Err(FramecacheError::InvalidArgument(format!(
                "cannot merge a {}x{} sketch into a {}x{} sketch",
                other.depth, other.width, self.depth, self.width
            )));
        }
        for (mine, theirs) in self.rows.iter_mut().zip(other.rows.iter()) {
            for (cell, add) in mine.iter_mut().zip(theirs.iter()) {
                *cell = cell.saturating_add(*add);
            }
        }
        Ok(())
    }

    fn column(&self, row: usize, key: &K) -> usize {
        let mut hasher = DefaultHasher::new();
        (row as u64).hash(&mut hasher);
        key.hash(&mut hasher);
        (hasher.finish() % u64::from(self.width)) as usize
    }
}

impl<K: Hash + Clone> CountMinSketch<K> {
    /// Ranks `candidates` by estimated count, descending, and keeps at most
    /// `k`. The sort is stable, so ties preserve candidate order.
    pub fn top_k(&self, k: u16, candidates: &[K]) -> Vec<(K, u32)> {
        let mut ranked: Vec<(K, u32)> = candidates
            .iter()
            .map(|key| (key.clone(), self.count(key)))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(k as usize);
        ranked
    }
}
