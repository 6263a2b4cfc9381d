mod admission;

pub use admission::AdmissionFilter;

pub type FrameId = usize;
pub type PageId = u32;

pub const INVALID_PAGE_ID: PageId = 0;

/// How an access reached the buffer pool. Forwarded to the replacement
/// policy as a hint; the policies shipped here do not act on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessType {
    #[default]
    Unknown,
    Lookup,
    Scan,
    Index,
}
