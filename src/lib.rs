// Arbor - In-memory versioned content store

pub mod clock;
pub mod config;
pub mod error;
pub mod rank;
pub mod registry;
pub mod shell;
pub mod version;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{OutputFormat, ShellConfig};
pub use error::{ArborError, Result};
pub use rank::{RankIndex, Ranked};
pub use registry::{Messages, Registry, ResourceRank};
pub use shell::{Command, Outcome, Shell};
pub use version::{VersionId, VersionNode, VersionTree, VersionedResource};
