use crate::buffer::{AccessType, FrameId, PageId};
use crate::error::FramecacheResult;

pub mod arc;

pub trait Replacer {
    fn new(capacity: usize) -> Self
    where
        Self: Sized;

    fn record_access(
        &mut self,
        frame_id: FrameId,
        page_id: PageId,
        access_type: AccessType,
    ) -> FramecacheResult<()>;

    fn evict(&mut self) -> Option<FrameId>;

    fn set_evictable(&mut self, frame_id: FrameId, evictable: bool) -> FramecacheResult<()>;

    fn remove(&mut self, frame_id: FrameId);

    fn size(&self) -> usize;
}
