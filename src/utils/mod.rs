pub mod cache;
pub mod keyed_deque;
pub mod sketch;
