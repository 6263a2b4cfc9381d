use std::collections::HashMap;

use framecache::{
    AccessType, AdmissionConfig, AdmissionFilter, ArcReplacer, FrameId, PageId, Replacer,
    SketchConfig,
};

/// Minimal stand-in for the buffer-pool manager side of the replacer
/// contract: a page table, a free list, and frames. Fetching pins the
/// frame; `unpin` makes it evictable again.
struct PagePool {
    page_table: HashMap<PageId, FrameId>,
    frames: Vec<Option<PageId>>,
    free_list: Vec<FrameId>,
    replacer: ArcReplacer,
}

impl PagePool {
    fn new(capacity: usize) -> Self {
        Self {
            page_table: HashMap::new(),
            frames: vec![None; capacity],
            free_list: (0..capacity).rev().collect(),
            replacer: ArcReplacer::new(capacity),
        }
    }

    /// Returns the frame now holding `page_id`, pinned, or `None` when the
    /// pool is full of pinned frames.
    fn fetch(&mut self, page_id: PageId) -> Option<FrameId> {
        if let Some(&frame_id) = self.page_table.get(&page_id) {
            self.replacer
                .record_access(frame_id, page_id, AccessType::Lookup)
                .unwrap();
            self.replacer.set_evictable(frame_id, false).unwrap();
            return Some(frame_id);
        }

        let frame_id = match self.free_list.pop() {
            Some(frame_id) => frame_id,
            None => {
                let victim = self.replacer.evict()?;
                let old_page = self.frames[victim].take().expect("victim holds a page");
                self.page_table.remove(&old_page);
                victim
            }
        };
        self.frames[frame_id] = Some(page_id);
        self.page_table.insert(page_id, frame_id);
        self.replacer
            .record_access(frame_id, page_id, AccessType::Lookup)
            .unwrap();
        self.replacer.set_evictable(frame_id, false).unwrap();
        Some(frame_id)
    }

    fn unpin(&mut self, page_id: PageId) {
        let frame_id = self.page_table[&page_id];
        self.replacer.set_evictable(frame_id, true).unwrap();
    }

    fn is_resident(&self, page_id: PageId) -> bool {
        self.page_table.contains_key(&page_id)
    }
}

#[test]
fn test_fetch_evicts_least_recently_fetched() {
    let mut pool = PagePool::new(3);
    for page_id in [1, 2, 3] {
        pool.fetch(page_id).unwrap();
        pool.unpin(page_id);
    }

    pool.fetch(4).unwrap();
    assert!(!pool.is_resident(1));
    for page_id in [2, 3, 4] {
        assert!(pool.is_resident(page_id));
    }
}

#[test]
fn test_fully_pinned_pool_rejects_fetch() {
    let mut pool = PagePool::new(2);
    pool.fetch(1).unwrap();
    pool.fetch(2).unwrap();

    // Both frames pinned: no victim exists.
    assert_eq!(pool.replacer.size(), 0);
    assert_eq!(pool.fetch(3), None);

    pool.unpin(1);
    assert!(pool.fetch(3).is_some());
    assert!(!pool.is_resident(1));
    assert!(pool.is_resident(2));
}

#[test]
fn test_hot_pages_survive_scan() {
    let mut pool = PagePool::new(4);
    // Two pages fetched twice each land on the frequency side.
    for _ in 0..2 {
        for page_id in [1, 2] {
            pool.fetch(page_id).unwrap();
            pool.unpin(page_id);
        }
    }

    // A long one-pass scan churns the recency side only.
    for page_id in 10..40 {
        pool.fetch(page_id).unwrap();
        pool.unpin(page_id);
    }

    assert!(pool.is_resident(1));
    assert!(pool.is_resident(2));
    assert!(!pool.is_resident(10));
}

#[test]
fn test_ghost_hit_revives_evicted_page() {
    let mut pool = PagePool::new(3);
    // Page 1 becomes frequent; pages 2 and 3 fill the recency side.
    pool.fetch(1).unwrap();
    pool.unpin(1);
    pool.fetch(1).unwrap();
    pool.unpin(1);
    for page_id in [2, 3] {
        pool.fetch(page_id).unwrap();
        pool.unpin(page_id);
    }

    // Page 4 pushes page 2 out; refetching page 2 is a ghost hit and must
    // bring it back at the expense of another recency page.
    pool.fetch(4).unwrap();
    pool.unpin(4);
    assert!(!pool.is_resident(2));

    pool.fetch(2).unwrap();
    pool.unpin(2);
    assert!(pool.is_resident(2));
    assert!(pool.is_resident(1));
}

#[test]
fn test_admission_filter_tracks_pool_workload() {
    let mut pool = PagePool::new(4);
    let filter = AdmissionFilter::new(AdmissionConfig {
        enable: true,
        sketch: SketchConfig {
            width: 1024,
            depth: 4,
        },
        sample_window: 100_000,
    })
    .unwrap();

    for _ in 0..10 {
        for page_id in [1, 2] {
            filter.record_access(page_id);
            pool.fetch(page_id).unwrap();
            pool.unpin(page_id);
        }
    }
    for page_id in 20..40 {
        filter.record_access(page_id);
        pool.fetch(page_id).unwrap();
        pool.unpin(page_id);
    }

    // The hot set stays resident, and the filter agrees with that verdict:
    // a cold scan page would not be admitted over a hot page.
    assert!(pool.is_resident(1));
    assert!(pool.is_resident(2));
    assert!(filter.should_admit(1, 25));
    assert!(!filter.should_admit(25, 1));
}
