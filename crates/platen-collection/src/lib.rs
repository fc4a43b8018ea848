//! Typewriter collection pipeline.
//!
//! Turns the collection spreadsheet (`content/typewriters.csv`) into the two
//! artifacts the site consumes:
//!
//! - [`projection`] - a JSON array of normalized records read by page templates
//! - [`pages`] - one Markdown page per fully identified machine (brand, model, serial)
//!
//! Both stages share the same CSV reader in [`record`], which trims headers,
//! maps blank and sentinel cells (`nan`, `none`, empty) to absent values, and
//! infers numeric columns the way a spreadsheet export expects.
//!
//! # Example
//!
//! ```rust,no_run
//! use platen_collection::{project, ProjectionOutcome};
//! use std::path::Path;
//!
//! let outcome = project(
//!     Path::new("content/typewriters.csv"),
//!     Path::new("content/extra/typewriters.json"),
//! )?;
//! if let ProjectionOutcome::Written { records, .. } = outcome {
//!     println!("projected {records} typewriters");
//! }
//! # Ok::<(), platen_collection::CollectionError>(())
//! ```

pub mod error;
pub mod pages;
pub mod projection;
pub mod record;
pub mod slug;

pub use error::{CollectionError, Result};
pub use pages::{PageGenerator, PagesReport};
pub use projection::{project, ProjectionOutcome};
pub use record::{read_records, Record};
pub use slug::slugify;

/// Column holding the manufacturer name.
pub const BRAND_COLUMN: &str = "Typewriter Brand";

/// Column holding the model name.
pub const MODEL_COLUMN: &str = "Model";

/// Column holding the serial number.
pub const SERIAL_COLUMN: &str = "Serial No";
