//! # exif-scrub
//!
//! Inspect and strip EXIF metadata from JPEG/PNG images — view camera, GPS,
//! and timestamp fields, or produce a metadata-free copy by decoding the
//! image to pixels and re-encoding a fresh container.
//!
//! ## Quick Start
//!
//! The pipeline module handles the full validate → decode → interpret flow:
//!
//! ```rust,no_run
//! use exif_scrub::config::Config;
//! use exif_scrub::pipeline::{collect_images, inspect_image, strip_image};
//! use std::path::PathBuf;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     let images = collect_images(&[PathBuf::from("./photos")]);
//!
//!     for path in &images {
//!         // Inspect: ordered, human-readable metadata fields
//!         let outcome = inspect_image(path, &config)?;
//!         for field in &outcome.report.exif {
//!             println!("{}: {}", field.label, field.value);
//!         }
//!
//!         // Strip: write a metadata-free copy next to the original
//!         let stripped = strip_image(path, &config);
//!         if let Some(ref err) = stripped.error {
//!             eprintln!("Error stripping {}: {err}", path.display());
//!         } else {
//!             println!(
//!                 "Removed {} field(s), {} remaining",
//!                 stripped.fields_before, stripped.fields_after
//!             );
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Lower-Level Usage
//!
//! The decoder, interpreter, and re-encoder can be used individually:
//!
//! ```rust,no_run
//! use exif_scrub::exif::{interpret, read_tag_directories, to_decimal, CoordPart, Rational};
//! use std::path::Path;
//!
//! fn main() -> anyhow::Result<()> {
//!     // 1. Decode the three tag directories (image, capture detail, GPS)
//!     let dirs = read_tag_directories(Path::new("photo.jpg"))?;
//!
//!     // 2. Interpret them into display fields
//!     let fields = interpret(&dirs);
//!     println!("{} metadata field(s)", fields.len());
//!
//!     // 3. Or convert a coordinate triple directly
//!     let triple = [
//!         CoordPart::Ratio(Rational::new(40, 1)),
//!         CoordPart::Ratio(Rational::new(26, 1)),
//!         CoordPart::Ratio(Rational::new(4630, 100)),
//!     ];
//!     println!("{:?}", to_decimal(&triple, "N"));
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Behavior Notes
//!
//! - An image without an EXIF segment inspects successfully with an empty
//!   field set; decode failure and "no metadata" are the same condition.
//! - Malformed rationals (zero denominators, non-finite values) degrade to
//!   zero at the point of conversion and never raise.
//! - Stripping never touches the original file: the cleaned copy is written
//!   as `<stem>_cleaned.<ext>`.
//!
//! ## Modules
//!
//! - [`config`] — Configuration types and loading/saving
//! - [`exif`] — Tag directory decoding, field interpretation, re-encoding
//! - [`pipeline`] — Input validation, image collection, inspect/strip flows
//! - [`report`] — JSON export of an inspection

pub mod config;
pub mod exif;
pub mod pipeline;
pub mod report;
