//! TabSort Tabs
//!
//! Tab snapshots as handed over by the host browser, the host window API the
//! rest of the workspace talks through, and duplicate detection by URL.
//! A snapshot is taken once per operation and never mutated afterwards.

mod duplicates;
mod error;
mod host;
mod tab;
mod window;

pub use duplicates::{find_duplicates, normalize_url};
pub use error::TabError;
pub use host::{GroupId, HostTabs};
pub use tab::{Tab, TabId};
pub use window::{TabGroup, TabWindow};

pub type Result<T> = std::result::Result<T, TabError>;
