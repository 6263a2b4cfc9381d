use std::collections::HashMap;

use log::{log_enabled, trace, Level};

use super::Replacer;
use crate::buffer::{AccessType, FrameId, PageId};
use crate::error::{FramecacheError, FramecacheResult};
use crate::utils::keyed_deque::KeyedDeque;

/// Which resident list a frame currently sits in. Must agree with the
/// frame's membership in `mru` / `mfu`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Residency {
    Mru,
    Mfu,
}

/// Bookkeeping for one resident frame. Lives in `alive` exactly as long as
/// the frame is in `mru` or `mfu`; eviction discards it and keeps only the
/// page id in a ghost list.
#[derive(Debug)]
struct FrameStatus {
    page_id: PageId,
    evictable: bool,
    residency: Residency,
}

/// Adaptive Replacement Cache over buffer-pool frames.
///
/// Four lists: `mru` (resident, seen once recently), `mfu` (resident, seen
/// at least twice), and their ghost shadows `mru_ghost` / `mfu_ghost`
/// holding page ids of recently evicted pages. `mru_target` is the
/// self-tuning target size for the recency side: ghost hits on the recency
/// side grow it, ghost hits on the frequency side shrink it, and `evict`
/// victimizes whichever side is over target.
///
/// The caller serializes access and is responsible for evicting before
/// recording a miss on a full pool. Frames that are pinned
/// (`set_evictable(.., false)`) are skipped by victim selection.
#[derive(Debug)]
pub struct ArcReplacer {
    capacity: usize,
    /// T1: head is most recent.
    mru: KeyedDeque<FrameId>,
    /// T2: head is most recent.
    mfu: KeyedDeque<FrameId>,
    /// B1: pages evicted from `mru`, head is most recently ghosted.
    mru_ghost: KeyedDeque<PageId>,
    /// B2: pages evicted from `mfu`, head is most recently ghosted.
    mfu_ghost: KeyedDeque<PageId>,
    alive: HashMap<FrameId, FrameStatus>,
    /// Target size for `mru`, in `[0, capacity]`.
    mru_target: usize,
    /// Number of evictable resident frames.
    evictable_count: usize,
}

impl Replacer for ArcReplacer {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            mru: KeyedDeque::with_capacity(capacity),
            mfu: KeyedDeque::with_capacity(capacity),
            mru_ghost: KeyedDeque::with_capacity(capacity),
            mfu_ghost: KeyedDeque::with_capacity(capacity),
            alive: HashMap::with_capacity(capacity),
            mru_target: 0,
            evictable_count: 0,
        }
    }

    /// Records an access to `frame_id` holding `page_id`.
    ///
    /// A resident frame is re-linked at the head of `mfu`. A hit on a ghost
    /// page adapts `mru_target` and revives the page into `mfu` under the
    /// new frame. A miss enters at the head of `mru` after trimming the
    /// ghost lists to their capacity bounds. Making room among the resident
    /// frames is the caller's job (`evict` before a miss on a full pool).
    fn record_access(
        &mut self,
        frame_id: FrameId,
        page_id: PageId,
        _access_type: AccessType,
    ) -> FramecacheResult<()> {
        if let Some(status) = self.alive.get(&frame_id) {
            if status.page_id != page_id {
                return Err(FramecacheError::Internal(format!(
                    "frame {} holds page {}, not page {}",
                    frame_id, status.page_id, page_id
                )));
            }
            self.promote_resident(frame_id);
            self.trace_state("record_access(hit)");
            return Ok(());
        }

        if self.mru_ghost.contains(page_id) {
            // Recency ghosts paying off: grow the recency target.
            if self.mru_ghost.len() >= self.mfu_ghost.len() {
                self.mru_target = (self.mru_target + 1).min(self.capacity);
            } else {
                let delta = self.mfu_ghost.len() / self.mru_ghost.len().max(1);
                self.mru_target = (self.mru_target + delta).min(self.capacity);
            }
            self.mru_ghost.remove(page_id);
            self.revive(frame_id, page_id);
            self.trace_state("record_access(mru ghost hit)");
            return Ok(());
        }

        if self.mfu_ghost.contains(page_id) {
            // Frequency ghosts paying off: shrink the recency target.
            if self.mfu_ghost.len() >= self.mru_ghost.len() {
                self.mru_target = self.mru_target.saturating_sub(1);
            } else {
                let delta = self.mru_ghost.len() / self.mfu_ghost.len().max(1);
                self.mru_target = self.mru_target.saturating_sub(delta);
            }
            self.mfu_ghost.remove(page_id);
            self.revive(frame_id, page_id);
            self.trace_state("record_access(mfu ghost hit)");
            return Ok(());
        }

        // Miss. Trim whichever ghost list the capacity bounds require
        // before the new frame enters the recency list.
        let recency_total = self.mru.len() + self.mru_ghost.len();
        if recency_total == self.capacity {
            let purged = self.mru_ghost.pop_back();
            assert!(
                purged.is_some(),
                "recency side full with no ghost entries to purge"
            );
        } else if recency_total < self.capacity {
            let total = recency_total + self.mfu.len() + self.mfu_ghost.len();
            if total == 2 * self.capacity {
                let purged = self.mfu_ghost.pop_back();
                assert!(
                    purged.is_some(),
                    "both sides full with no frequency ghosts to purge"
                );
            }
        } else {
            return Err(FramecacheError::Internal(format!(
                "recency side holds {} entries, over capacity {}",
                recency_total, self.capacity
            )));
        }

        self.mru.push_front(frame_id);
        self.alive.insert(
            frame_id,
            FrameStatus {
                page_id,
                evictable: true,
                residency: Residency::Mru,
            },
        );
        self.evictable_count += 1;
        self.trace_state("record_access(miss)");
        Ok(())
    }

    /// Picks a victim, unlinks it, and ghosts its page id.
    ///
    /// The frequency side is victimized while the recency list is under
    /// target, otherwise the recency side; pinned frames are skipped, and if
    /// the whole preferred side is pinned the other side is tried. `None`
    /// means every resident frame is pinned, which the caller handles by
    /// waiting or retrying.
    fn evict(&mut self) -> Option<FrameId> {
        let victim = if self.mru.len() < self.mru_target {
            self.evict_from(Residency::Mfu)
                .or_else(|| self.evict_from(Residency::Mru))
        } else {
            self.evict_from(Residency::Mru)
                .or_else(|| self.evict_from(Residency::Mfu))
        };
        if victim.is_some() {
            self.evictable_count -= 1;
            self.trace_state("evict");
        }
        victim
    }

    fn set_evictable(&mut self, frame_id: FrameId, evictable: bool) -> FramecacheResult<()> {
        let status = self.alive.get_mut(&frame_id).ok_or_else(|| {
            FramecacheError::Internal(format!(
                "frame {} is not resident in the replacer",
                frame_id
            ))
        })?;
        if !status.evictable && evictable {
            self.evictable_count += 1;
        } else if status.evictable && !evictable {
            self.evictable_count -= 1;
        }
        status.evictable = evictable;
        Ok(())
    }

    /// Drops a resident frame without ghosting its page. Unknown frames are
    /// ignored; dropping a pinned frame is a caller bug.
    fn remove(&mut self, frame_id: FrameId) {
        if let Some(status) = self.alive.get(&frame_id) {
            assert!(status.evictable, "frame {} removed while pinned", frame_id);
            let residency = status.residency;
            self.alive.remove(&frame_id);
            let unlinked = match residency {
                Residency::Mru => self.mru.remove(frame_id),
                Residency::Mfu => self.mfu.remove(frame_id),
            };
            assert!(unlinked, "resident frame {} missing from its list", frame_id);
            self.evictable_count -= 1;
        }
    }

    fn size(&self) -> usize {
        self.evictable_count
    }
}

impl ArcReplacer {
    /// Re-links a resident frame at the head of `mfu`.
    fn promote_resident(&mut self, frame_id: FrameId) {
        let status = self
            .alive
            .get_mut(&frame_id)
            .expect("promoted frame must be resident");
        let unlinked = match status.residency {
            Residency::Mru => self.mru.remove(frame_id),
            Residency::Mfu => self.mfu.remove(frame_id),
        };
        assert!(unlinked, "resident frame {} missing from its list", frame_id);
        status.residency = Residency::Mfu;
        self.mfu.push_front(frame_id);
    }

    /// Installs a ghost-hit page under a fresh frame at the head of `mfu`.
    fn revive(&mut self, frame_id: FrameId, page_id: PageId) {
        let inserted = self.mfu.push_front(frame_id);
        assert!(inserted, "revived frame {} already in the frequency list", frame_id);
        let previous = self.alive.insert(
            frame_id,
            FrameStatus {
                page_id,
                evictable: true,
                residency: Residency::Mfu,
            },
        );
        assert!(previous.is_none(), "revived frame {} already resident", frame_id);
        self.evictable_count += 1;
    }

    /// Tail-to-head scan of one side for the first evictable frame. On
    /// success the frame is unlinked and its page id ghosted.
    fn evict_from(&mut self, side: Residency) -> Option<FrameId> {
        let victim = {
            let list = match side {
                Residency::Mru => &self.mru,
                Residency::Mfu => &self.mfu,
            };
            list.iter_rev()
                .find(|frame_id| self.alive[frame_id].evictable)?
        };
        let status = self
            .alive
            .remove(&victim)
            .expect("victim must be resident");
        debug_assert_eq!(status.residency, side);
        let unlinked = match side {
            Residency::Mru => self.mru.remove(victim),
            Residency::Mfu => self.mfu.remove(victim),
        };
        assert!(unlinked, "victim frame {} missing from its list", victim);
        assert!(
            !self.mru_ghost.contains(status.page_id) && !self.mfu_ghost.contains(status.page_id),
            "page {} is already ghosted",
            status.page_id
        );
        match side {
            Residency::Mru => self.mru_ghost.push_front(status.page_id),
            Residency::Mfu => self.mfu_ghost.push_front(status.page_id),
        };
        Some(victim)
    }

    fn trace_state(&self, op: &str) {
        if log_enabled!(Level::Trace) {
            trace!(
                "{}: mru={:?} mfu={:?} mru_ghost={:?} mfu_ghost={:?} target={} evictable={}",
                op,
                self.mru,
                self.mfu,
                self.mru_ghost,
                self.mfu_ghost,
                self.mru_target,
                self.evictable_count
            );
        }
    }
}

#[cfg(test)]
impl ArcReplacer {
    /// Asserts the accounting invariants after a test step.
    fn check_invariants(&self) {
        use std::collections::HashSet;

        assert!(self.mru.len() + self.mru_ghost.len() <= self.capacity);
        assert!(self.mru.len() + self.mfu.len() <= self.capacity);
        assert!(
            self.mru.len() + self.mfu.len() + self.mru_ghost.len() + self.mfu_ghost.len()
                <= 2 * self.capacity
        );
        assert!(self.mru_target <= self.capacity);
        assert_eq!(self.alive.len(), self.mru.len() + self.mfu.len());

        for frame_id in self.mru.iter() {
            assert_eq!(self.alive[&frame_id].residency, Residency::Mru);
            assert!(!self.mfu.contains(frame_id));
        }
        for frame_id in self.mfu.iter() {
            assert_eq!(self.alive[&frame_id].residency, Residency::Mfu);
        }

        let evictable = self.alive.values().filter(|s| s.evictable).count();
        assert_eq!(evictable, self.evictable_count);

        // Page ids are unique across residents and both ghost lists.
        let mut pages = HashSet::new();
        for status in self.alive.values() {
            assert!(pages.insert(status.page_id));
        }
        for page_id in self.mru_ghost.iter().chain(self.mfu_ghost.iter()) {
            assert!(pages.insert(page_id));
        }
    }
}
