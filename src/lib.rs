//! Replacement-policy building blocks for a database buffer pool: an
//! adaptive (ARC) frame replacer, a Count-Min Sketch frequency estimator,
//! and a sketch-backed admission filter. Page I/O, the page table, and the
//! rest of the buffer-pool manager are the caller's side of the contract.

pub mod buffer;
pub mod config;
pub mod error;
pub mod utils;

pub use buffer::{AccessType, AdmissionFilter, FrameId, PageId, INVALID_PAGE_ID};
pub use config::{AdmissionConfig, SketchConfig};
pub use error::{FramecacheError, FramecacheResult};
pub use utils::cache::arc::ArcReplacer;
pub use utils::cache::Replacer;
pub use utils::sketch::CountMinSketch;
