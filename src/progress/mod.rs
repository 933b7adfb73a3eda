//! Progress reporting for the image acquisition phase.
//!
//! - `style` - progress bar templates and options
//! - `display` - the bar shown while images are downloaded
//!
//! # Examples
//!
//! ```rust
//! use blogport::progress::{ProgressBarOpts, ProgressDisplay};
//!
//! let display = ProgressDisplay::new(ProgressBarOpts::hidden(), 3);
//! display.settle("https://example.com/a.png");
//! display.finish();
//! ```

pub(crate) mod display;
pub(crate) mod style;

pub use display::ProgressDisplay;
pub use style::ProgressBarOpts;
