use log::debug;
use parking_lot::Mutex;

use crate::buffer::PageId;
use crate::config::AdmissionConfig;
use crate::error::FramecacheResult;
use crate::utils::sketch::CountMinSketch;

/// Frequency-based admission gate for the buffer pool.
///
/// Tracks page popularity in a Count-Min Sketch and lets the buffer manager
/// veto caching a newly fetched page when it is estimated to be colder than
/// the victim the replacer picked. Never chooses victims itself.
///
/// The sketch is cleared after every `sample_window` recorded accesses so
/// stale popularity cannot pin the verdicts forever. A window reset is used
/// instead of counter halving because sketch counters never decrement.
#[derive(Debug)]
pub struct AdmissionFilter {
    inner: Mutex<Window>,
    enable: bool,
    sample_window: u64,
}

#[derive(Debug)]
struct Window {
    sketch: CountMinSketch<PageId>,
    accesses: u64,
}

impl AdmissionFilter {
    pub fn new(config: AdmissionConfig) -> FramecacheResult<Self> {
        let sketch = CountMinSketch::new(config.sketch.width, config.sketch.depth)?;
        Ok(Self {
            inner: Mutex::new(Window {
                sketch,
                accesses: 0,
            }),
            enable: config.enable,
            sample_window: config.sample_window,
        })
    }

    pub fn record_access(&self, page_id: PageId) {
        if !self.enable {
            return;
        }
        let mut window = self.inner.lock();
        window.sketch.insert(&page_id);
        window.accesses += 1;
        if window.accesses >= self.sample_window {
            debug!(
                "admission window reset after {} accesses",
                window.accesses
            );
            window.sketch.clear();
            window.accesses = 0;
        }
    }

    /// Estimated access count for `page_id` within the current window.
    pub fn frequency(&self, page_id: PageId) -> u32 {
        if !self.enable {
            return 0;
        }
        self.inner.lock().sketch.count(&page_id)
    }

    /// Whether `candidate` should displace `victim`. Ties keep the
    /// resident page, so a one-pass scan cannot flush equally scored
    /// residents. Always true when the filter is disabled.
    pub fn should_admit(&self, candidate: PageId, victim: PageId) -> bool {
        if !self.enable {
            return true;
        }
        let window = self.inner.lock();
        window.sketch.count(&candidate) > window.sketch.count(&victim)
    }
}
