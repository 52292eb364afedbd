pub mod helper;

mod window;
pub use window::Window;

mod slot_ring;
pub use slot_ring::{Side, SlotRing};

mod dual_heap;
pub use dual_heap::DualHeap;
