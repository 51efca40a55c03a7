//! EXIF decoding, field interpretation, and strip-by-re-encode.
//!
//! Three layers:
//!
//! - [`read_tag_directories`] — decode an image's EXIF block into the three
//!   tag directories (image, capture detail, GPS); a missing or broken EXIF
//!   segment yields empty directories, never an error
//! - [`interpret`] — turn the directories into ordered, human-readable
//!   display fields with GPS coordinate conversion
//! - [`strip`] — produce a metadata-free copy by decoding to pixels and
//!   re-encoding a fresh container

pub mod interpret;
mod reader;
pub mod strip;
pub mod tags;

pub use interpret::{
    CoordPart, Field, decimal_location, format_coordinate, has_gps_fields, interpret, map_link,
    to_decimal,
};
pub use reader::{
    Rational, TagDirectories, TagValue, read_tag_directories, read_tag_directories_bytes,
};
pub use strip::{PixelReencoder, Reencode, remaining_field_count};
pub use tags::Directory;
