use anyhow::{Context, Result};
use nom_exif::*;
use std::collections::BTreeMap;
use std::io::Cursor;
use std::path::Path;

use super::tags::{
    self, Directory, TAG_GPS_LATITUDE, TAG_GPS_LATITUDE_REF, TAG_GPS_LONGITUDE,
    TAG_GPS_LONGITUDE_REF,
};

/// A rational pair as stored in EXIF (numerator, denominator).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rational {
    pub num: i64,
    pub den: i64,
}

impl Rational {
    pub const fn new(num: i64, den: i64) -> Self {
        Self { num, den }
    }

    /// Convert to a decimal value. A zero denominator resolves to 0
    /// rather than producing a division error.
    pub fn to_f64(self) -> f64 {
        if self.den == 0 {
            0.0
        } else {
            self.num as f64 / self.den as f64
        }
    }
}

/// A decoded tag value. Shape determines how the interpreter formats it.
#[derive(Debug, Clone, PartialEq)]
pub enum TagValue {
    Text(String),
    Number(f64),
    Rationals(Vec<Rational>),
    List(Vec<String>),
    Composite(serde_json::Value),
}

/// The three tag directories extracted from one image.
///
/// Any or all may be empty — that is the valid "no metadata" state, not an
/// error. Entries are keyed by raw tag id in ascending order so the display
/// order is deterministic.
#[derive(Debug, Clone, Default)]
pub struct TagDirectories {
    pub image: BTreeMap<u16, TagValue>,
    pub exif: BTreeMap<u16, TagValue>,
    pub gps: BTreeMap<u16, TagValue>,
}

impl TagDirectories {
    pub fn insert(&mut self, directory: Directory, id: u16, value: TagValue) {
        match directory {
            Directory::Image => self.image.insert(id, value),
            Directory::Exif => self.exif.insert(id, value),
            Directory::Gps => self.gps.insert(id, value),
        };
    }

    pub fn get(&self, directory: Directory, id: u16) -> Option<&TagValue> {
        match directory {
            Directory::Image => self.image.get(&id),
            Directory::Exif => self.exif.get(&id),
            Directory::Gps => self.gps.get(&id),
        }
    }

    /// Total tag count across all three directories.
    pub fn len(&self) -> usize {
        self.image.len() + self.exif.len() + self.gps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate directories in fixed order: image, exif detail, gps.
    pub fn iter(&self) -> impl Iterator<Item = (Directory, u16, &TagValue)> {
        self.image
            .iter()
            .map(|(id, v)| (Directory::Image, *id, v))
            .chain(self.exif.iter().map(|(id, v)| (Directory::Exif, *id, v)))
            .chain(self.gps.iter().map(|(id, v)| (Directory::Gps, *id, v)))
    }
}

/// Read the tag directories from an image file.
///
/// A missing or unrecognizable EXIF segment yields empty directories — the
/// caller cannot distinguish that from an image that never had metadata,
/// and must not treat it as an error.
pub fn read_tag_directories(path: &Path) -> Result<TagDirectories> {
    let mut parser = MediaParser::new();
    let ms = MediaSource::file_path(path).context("Failed to open image file")?;

    let iter: ExifIter = match parser.parse(ms) {
        Ok(iter) => iter,
        Err(_) => {
            log::debug!("No EXIF data found in {}", path.display());
            return Ok(TagDirectories::default());
        }
    };

    Ok(directories_from_iter(iter))
}

/// Read the tag directories from an in-memory image buffer.
///
/// Used for post-strip verification: a decode failure on freshly re-encoded
/// bytes means zero remaining metadata, so every failure path degrades to
/// empty directories.
pub fn read_tag_directories_bytes(bytes: &[u8]) -> TagDirectories {
    let mut parser = MediaParser::new();
    let ms = match MediaSource::seekable(Cursor::new(bytes.to_vec())) {
        Ok(ms) => ms,
        Err(_) => return TagDirectories::default(),
    };

    let iter: ExifIter = match parser.parse(ms) {
        Ok(iter) => iter,
        Err(_) => return TagDirectories::default(),
    };

    directories_from_iter(iter)
}

fn directories_from_iter(iter: ExifIter) -> TagDirectories {
    let mut dirs = TagDirectories::default();

    // Latitude/longitude come from nom-exif's GPS parser so the raw
    // rational triples survive for the interpreter; everything else is
    // mapped by shape in entry_to_value. Must run before the entry loop
    // consumes the iterator.
    let gps_info = iter.parse_gps_info().ok().flatten();
    let have_coords = gps_info.is_some();

    for mut entry in iter {
        let id = entry.tag_code();
        let directory = tags::classify(id);
        if directory == Directory::Gps
            && have_coords
            && matches!(
                id,
                TAG_GPS_LATITUDE | TAG_GPS_LATITUDE_REF | TAG_GPS_LONGITUDE | TAG_GPS_LONGITUDE_REF
            )
        {
            continue;
        }

        let Some(value) = entry.take_value().and_then(entry_to_value) else {
            continue;
        };
        dirs.insert(directory, id, value);
    }

    if let Some(gps) = gps_info {
        dirs.insert(
            Directory::Gps,
            TAG_GPS_LATITUDE,
            TagValue::Rationals(latlng_to_rationals(&gps.latitude)),
        );
        dirs.insert(
            Directory::Gps,
            TAG_GPS_LATITUDE_REF,
            TagValue::Text(gps.latitude_ref.to_string()),
        );
        dirs.insert(
            Directory::Gps,
            TAG_GPS_LONGITUDE,
            TagValue::Rationals(latlng_to_rationals(&gps.longitude)),
        );
        dirs.insert(
            Directory::Gps,
            TAG_GPS_LONGITUDE_REF,
            TagValue::Text(gps.longitude_ref.to_string()),
        );
    }

    dirs
}

/// Map a decoded entry value onto the shapes the interpreter formats.
/// Rationals and rational arrays keep their raw pairs, numeric scalars
/// become numbers, and everything else falls back to the decoder's text
/// rendering. Empty values map to `None` and are dropped.
fn entry_to_value(value: EntryValue) -> Option<TagValue> {
    match value {
        EntryValue::Text(s) => clean_text(&s).map(TagValue::Text),
        EntryValue::URational(r) => Some(TagValue::Rationals(vec![urational(&r)])),
        EntryValue::IRational(r) => Some(TagValue::Rationals(vec![irational(&r)])),
        EntryValue::URationalArray(rs) => match rs.as_slice() {
            [] => None,
            rs => Some(TagValue::Rationals(rs.iter().map(urational).collect())),
        },
        EntryValue::IRationalArray(rs) => match rs.as_slice() {
            [] => None,
            rs => Some(TagValue::Rationals(rs.iter().map(irational).collect())),
        },
        EntryValue::U8(n) => Some(TagValue::Number(n as f64)),
        EntryValue::U16(n) => Some(TagValue::Number(n as f64)),
        EntryValue::U32(n) => Some(TagValue::Number(n as f64)),
        EntryValue::U64(n) => Some(TagValue::Number(n as f64)),
        EntryValue::I8(n) => Some(TagValue::Number(n as f64)),
        EntryValue::I16(n) => Some(TagValue::Number(n as f64)),
        EntryValue::I32(n) => Some(TagValue::Number(n as f64)),
        EntryValue::I64(n) => Some(TagValue::Number(n as f64)),
        EntryValue::F32(n) => Some(TagValue::Number(n as f64)),
        EntryValue::F64(n) => Some(TagValue::Number(n)),
        other => clean_text(&other.to_string()).map(TagValue::Text),
    }
}

fn clean_text(s: &str) -> Option<String> {
    let s = s.trim().trim_matches('"').to_string();
    if s.is_empty() { None } else { Some(s) }
}

fn urational(r: &URational) -> Rational {
    Rational::new(r.0 as i64, r.1 as i64)
}

fn irational(r: &IRational) -> Rational {
    Rational::new(r.0 as i64, r.1 as i64)
}

/// Convert a nom-exif LatLng (3 URationals: deg, min, sec) to our rationals.
fn latlng_to_rationals(latlng: &LatLng) -> Vec<Rational> {
    vec![
        Rational::new(latlng.0.0 as i64, latlng.0.1 as i64),
        Rational::new(latlng.1.0 as i64, latlng.1.1 as i64),
        Rational::new(latlng.2.0 as i64, latlng.2.1 as i64),
    ]
}
