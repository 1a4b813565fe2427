//! TabSort Groups
//!
//! Raw groups come out of classification (or duplicate detection), are
//! reviewed and renamed by the user, reconciled into final groups, and
//! finally committed to the host as named tab groups.

mod commit;
mod error;
mod groups;
mod review;

pub use commit::{CommitExecutor, CommitSummary};
pub use error::GroupError;
pub use groups::{FinalGroups, RawGroups};
pub use review::{reconcile, ReviewEntry, ReviewSession};

pub type Result<T> = std::result::Result<T, GroupError>;
