//! Run artifact storage for Storylint.
//!
//! Every run owns one directory under the runs root:
//!
//! ```text
//! <runs>/<run_id>/
//! ├── config.json
//! ├── index.json
//! ├── chapter/<slug>.report.json|md
//! ├── adjacent/<left>_<right>.report.json|md
//! ├── arc/<first>-<last>.report.json|md
//! └── final/
//!     ├── action-plan.json|md
//!     └── dashboard.json|md
//! ```
//!
//! Writes go to a uniquely named temporary file that is renamed into place,
//! so an artifact that exists is always complete. The dashboard is computed
//! from whatever artifacts are on disk.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod dashboard;
mod index;
mod key;
mod store;

pub use dashboard::compute_dashboard;
pub use index::{ChapterIndex, RunIndex, SceneIndex};
pub use key::{ArtifactDir, ArtifactKey};
pub use store::{ArtifactStore, latest_run_id, new_run_id};
