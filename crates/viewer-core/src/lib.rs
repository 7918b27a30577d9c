//! Toolkit-neutral state of the reader window: open tabs, page layout,
//! deferred scroll restoration and session bookkeeping.

pub mod deferred;
pub mod layout;
pub mod status;
pub mod tab;
pub mod workspace;

#[cfg(test)]
mod test_support;

pub use deferred::DeferredQueue;
pub use layout::{PageLayout, PAGE_SPACING_PX};
pub use status::StatusMessage;
pub use tab::{DocumentTab, RenderedPage};
pub use workspace::{Command, Timing, Workspace};
