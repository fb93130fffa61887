//! In-page extraction boundary
//!
//! JavaScript snapshot scripts, the serde types they deserialize into, and
//! the driver trait the scanner uses to run them.

mod driver;
pub mod js_scripts;
mod snapshot;

pub use driver::{ChromePage, PageDriver, PageSource, Viewport};
pub use snapshot::{BadgeCandidate, DomSnapshot, ImageRef, LinkRef, ProductSnapshot, Rect};
