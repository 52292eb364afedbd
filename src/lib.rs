#![doc = include_str!("../README.md")]
#![no_std]
#![deny(
    unsafe_code,
    unused_imports,
    unused_variables,
    unused_must_use,
    missing_docs,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented
)]

extern crate alloc;

#[cfg(test)]
extern crate std;

mod error;
pub use error::{MedianQueueError, Result};

mod utils;
pub(crate) use utils::{Window, helper};

mod median_queue;
pub use median_queue::MedianQueue;

mod heap_median_queue;
pub use heap_median_queue::HeapMedianQueue;

mod reselect_median_queue;
pub use reselect_median_queue::ReselectMedianQueue;

mod sorted_median_queue;
pub use sorted_median_queue::SortedMedianQueue;

mod strategy;
pub use strategy::{MedianFilter, ParseStrategyError, Strategy};
