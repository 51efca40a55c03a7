//! The EXIF field interpreter.
//!
//! Turns the three raw tag directories into an ordered list of
//! human-readable display fields: labels resolved through the static tag
//! tables, rational values converted to decimals, and GPS coordinate
//! triples rendered in sexagesimal + decimal form. All numeric conversion
//! is total — malformed rationals and non-finite values degrade to zero,
//! they never raise.

use serde::Serialize;

use super::reader::{Rational, TagDirectories, TagValue};
use super::tags::{
    self, Directory, TAG_GPS_LATITUDE, TAG_GPS_LATITUDE_REF, TAG_GPS_LONGITUDE,
    TAG_GPS_LONGITUDE_REF,
};

/// One display row: a human-readable label and its formatted value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub label: String,
    pub value: String,
}

impl Field {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// One component of a GPS coordinate triple: either a plain number or a
/// rational pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CoordPart {
    Plain(f64),
    Ratio(Rational),
}

impl CoordPart {
    /// Sanitized decimal value: zero denominators, NaN, and infinities all
    /// resolve to 0.
    pub fn to_f64(self) -> f64 {
        match self {
            Self::Plain(n) => sanitize(n),
            Self::Ratio(r) => sanitize(r.to_f64()),
        }
    }
}

/// Replace NaN and infinite values with 0. Shared by the sexagesimal
/// formatter and the decimal converter so both degrade identically.
fn sanitize(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

/// Interpret the tag directories into an ordered EXIF field list.
///
/// Every present tag produces a row — unknown ids get a fallback label —
/// except rows whose formatted value is empty. When both latitude and
/// longitude are present, one synthetic `Location` row with a map link is
/// appended; the raw coordinate rows are kept.
pub fn interpret(dirs: &TagDirectories) -> Vec<Field> {
    let mut fields = Vec::new();

    for (directory, id, value) in dirs.iter() {
        let label = tags::label(directory, id);
        let formatted = if directory == Directory::Gps
            && matches!(id, TAG_GPS_LATITUDE | TAG_GPS_LONGITUDE)
        {
            // A coordinate the decoder could only render as text has no
            // components to convert; keep its text instead of zeroes.
            match coord_parts(value).as_slice() {
                [] => format_value(value),
                parts => format_coordinate(parts),
            }
        } else {
            format_value(value)
        };

        if formatted.is_empty() {
            continue;
        }
        fields.push(Field::new(label, formatted));
    }

    if let Some((lat, lon)) = decimal_location(dirs) {
        fields.push(Field::new("Location", map_link(lat, lon)));
    }

    fields
}

/// Whether any field label begins with "GPS". The caller uses the absence
/// of GPS fields to surface a privacy notice; it is not part of this
/// module's formatting duties.
pub fn has_gps_fields(fields: &[Field]) -> bool {
    fields.iter().any(|f| f.label.starts_with("GPS"))
}

/// Format a tag value by shape.
fn format_value(value: &TagValue) -> String {
    match value {
        TagValue::Text(s) => s.clone(),
        TagValue::Number(n) => format!("{}", sanitize(*n)),
        TagValue::Rationals(rs) => rs
            .iter()
            .map(|r| format!("{}", sanitize(r.to_f64())))
            .collect::<Vec<_>>()
            .join(", "),
        TagValue::List(items) => items.join(", "),
        TagValue::Composite(v) => v.to_string(),
    }
}

/// Format a coordinate triple as `D° M' S.SS" (DD.DDDDDD°)`.
///
/// Total: short triples are zero-filled, extra components ignored, and
/// non-finite components sanitized to 0. Never panics on malformed input.
pub fn format_coordinate(parts: &[CoordPart]) -> String {
    let degrees = parts.first().map_or(0.0, |p| p.to_f64());
    let minutes = parts.get(1).map_or(0.0, |p| p.to_f64());
    let seconds = parts.get(2).map_or(0.0, |p| p.to_f64());

    let decimal = degrees + minutes / 60.0 + seconds / 3600.0;
    format!("{degrees}° {minutes}' {seconds:.2}\" ({decimal:.6}°)")
}

/// Convert a coordinate triple plus hemisphere reference to signed decimal
/// degrees. Returns `None` unless the triple has exactly 3 components.
/// Negated when the reference is `"S"` or `"W"`.
pub fn to_decimal(parts: &[CoordPart], reference: &str) -> Option<f64> {
    if parts.len() != 3 {
        return None;
    }

    let decimal = parts[0].to_f64() + parts[1].to_f64() / 60.0 + parts[2].to_f64() / 3600.0;
    match reference.trim() {
        "S" | "W" => Some(-decimal),
        _ => Some(decimal),
    }
}

/// Map-link URL for a signed decimal coordinate pair.
pub fn map_link(lat: f64, lon: f64) -> String {
    format!("https://www.google.com/maps?q={lat:.6},{lon:.6}")
}

/// Coerce a tag value into coordinate components.
fn coord_parts(value: &TagValue) -> Vec<CoordPart> {
    match value {
        TagValue::Rationals(rs) => rs.iter().map(|r| CoordPart::Ratio(*r)).collect(),
        TagValue::Number(n) => vec![CoordPart::Plain(*n)],
        TagValue::List(items) => items
            .iter()
            .filter_map(|s| s.trim().parse::<f64>().ok())
            .map(CoordPart::Plain)
            .collect(),
        _ => Vec::new(),
    }
}

/// The signed decimal coordinate pair, when both latitude and longitude
/// (with their hemisphere references) resolve.
pub fn decimal_location(dirs: &TagDirectories) -> Option<(f64, f64)> {
    let lat_ref = reference_text(dirs, TAG_GPS_LATITUDE_REF);
    let lon_ref = reference_text(dirs, TAG_GPS_LONGITUDE_REF);

    let lat = to_decimal(&coord_parts(dirs.get(Directory::Gps, TAG_GPS_LATITUDE)?), &lat_ref)?;
    let lon = to_decimal(&coord_parts(dirs.get(Directory::Gps, TAG_GPS_LONGITUDE)?), &lon_ref)?;
    Some((lat, lon))
}

fn reference_text(dirs: &TagDirectories, id: u16) -> String {
    match dirs.get(Directory::Gps, id) {
        Some(TagValue::Text(s)) => s.clone(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ratio(num: i64, den: i64) -> CoordPart {
        CoordPart::Ratio(Rational::new(num, den))
    }

    // ── numeric sanitization ─────────────────────────────────────────

    #[test]
    fn zero_denominator_converts_to_zero() {
        assert_eq!(ratio(40, 0).to_f64(), 0.0);
    }

    #[test]
    fn non_finite_components_sanitize_to_zero() {
        assert_eq!(CoordPart::Plain(f64::NAN).to_f64(), 0.0);
        assert_eq!(CoordPart::Plain(f64::INFINITY).to_f64(), 0.0);
        assert_eq!(CoordPart::Plain(f64::NEG_INFINITY).to_f64(), 0.0);
    }

    // ── format_coordinate ────────────────────────────────────────────

    #[test]
    fn formats_rational_triple() {
        let s = format_coordinate(&[ratio(40, 1), ratio(26, 1), ratio(4630, 100)]);
        assert!(s.contains("40° 26' 46.30\""), "got {s}");
        assert!(s.contains("(40.446194°)"), "got {s}");
    }

    #[test]
    fn formats_plain_number_triple() {
        let s = format_coordinate(&[
            CoordPart::Plain(40.0),
            CoordPart::Plain(26.0),
            CoordPart::Plain(46.3),
        ]);
        assert!(s.contains("40° 26' 46.30\""), "got {s}");
    }

    #[test]
    fn malformed_triples_degrade_to_zeroes() {
        // short, empty, and non-finite inputs all format without panicking
        assert_eq!(format_coordinate(&[]), "0° 0' 0.00\" (0.000000°)");
        let s = format_coordinate(&[
            CoordPart::Plain(f64::NAN),
            ratio(1, 0),
            CoordPart::Plain(f64::INFINITY),
        ]);
        assert_eq!(s, "0° 0' 0.00\" (0.000000°)");
    }

    // ── to_decimal ───────────────────────────────────────────────────

    #[test]
    fn decimal_conversion_negates_south_and_west() {
        let triple = [ratio(40, 1), ratio(26, 1), ratio(4630, 100)];
        let north = to_decimal(&triple, "N").unwrap();
        assert!((north - 40.446194).abs() < 1e-6);
        assert_eq!(to_decimal(&triple, "S").unwrap(), -north);
        assert_eq!(to_decimal(&triple, "W").unwrap(), -north);
        assert_eq!(to_decimal(&triple, "E").unwrap(), north);
    }

    #[test]
    fn decimal_conversion_rejects_wrong_arity() {
        assert_eq!(to_decimal(&[ratio(40, 1)], "N"), None);
        assert_eq!(to_decimal(&[], "N"), None);
        assert_eq!(
            to_decimal(&[ratio(1, 1), ratio(2, 1), ratio(3, 1), ratio(4, 1)], "N"),
            None
        );
    }

    #[test]
    fn origin_coordinates_are_not_special_cased() {
        let zero = [ratio(0, 1), ratio(0, 1), ratio(0, 1)];
        assert_eq!(to_decimal(&zero, "N"), Some(0.0));
        assert_eq!(to_decimal(&zero, "E"), Some(0.0));
    }

    // ── interpret ────────────────────────────────────────────────────

    fn gps_dirs(lat: [i64; 2], lat_ref: &str, lon: [i64; 2], lon_ref: &str) -> TagDirectories {
        // degrees only for brevity; minutes and seconds zero
        let mut dirs = TagDirectories::default();
        dirs.insert(
            Directory::Gps,
            TAG_GPS_LATITUDE,
            TagValue::Rationals(vec![
                Rational::new(lat[0], lat[1]),
                Rational::new(0, 1),
                Rational::new(0, 1),
            ]),
        );
        dirs.insert(
            Directory::Gps,
            TAG_GPS_LATITUDE_REF,
            TagValue::Text(lat_ref.into()),
        );
        dirs.insert(
            Directory::Gps,
            TAG_GPS_LONGITUDE,
            TagValue::Rationals(vec![
                Rational::new(lon[0], lon[1]),
                Rational::new(0, 1),
                Rational::new(0, 1),
            ]),
        );
        dirs.insert(
            Directory::Gps,
            TAG_GPS_LONGITUDE_REF,
            TagValue::Text(lon_ref.into()),
        );
        dirs
    }

    #[test]
    fn empty_directories_interpret_to_zero_fields() {
        let fields = interpret(&TagDirectories::default());
        assert!(fields.is_empty());
    }

    #[test]
    fn unknown_tag_id_gets_fallback_label() {
        let mut dirs = TagDirectories::default();
        dirs.insert(Directory::Exif, 0xFFFF, TagValue::Text("x".into()));

        let fields = interpret(&dirs);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].label, "Exif Tag 65535");
        assert_eq!(fields[0].value, "x");
    }

    #[test]
    fn empty_values_are_dropped() {
        let mut dirs = TagDirectories::default();
        dirs.insert(Directory::Image, 0x010F, TagValue::Text(String::new()));
        dirs.insert(Directory::Image, 0x0110, TagValue::Text("NIKON Z 6".into()));

        let fields = interpret(&dirs);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].label, "Model");
    }

    #[test]
    fn known_tags_resolve_labels_in_order() {
        let mut dirs = TagDirectories::default();
        dirs.insert(Directory::Exif, 0x8827, TagValue::Text("200".into()));
        dirs.insert(Directory::Image, 0x010F, TagValue::Text("Canon".into()));

        let fields = interpret(&dirs);
        let labels: Vec<&str> = fields.iter().map(|f| f.label.as_str()).collect();
        assert_eq!(labels, vec!["Make", "ISO"]);
    }

    #[test]
    fn location_field_is_additive() {
        let dirs = gps_dirs([40, 1], "N", [79, 1], "W");
        let fields = interpret(&dirs);

        // raw coordinate rows survive
        assert!(fields.iter().any(|f| f.label == "GPSLatitude"));
        assert!(fields.iter().any(|f| f.label == "GPSLongitude"));

        let location = fields.iter().find(|f| f.label == "Location").unwrap();
        assert_eq!(
            location.value,
            "https://www.google.com/maps?q=40.000000,-79.000000"
        );
    }

    #[test]
    fn zero_valued_origin_still_gets_map_link() {
        let dirs = gps_dirs([0, 1], "N", [0, 1], "E");
        let fields = interpret(&dirs);
        let location = fields.iter().find(|f| f.label == "Location").unwrap();
        assert_eq!(
            location.value,
            "https://www.google.com/maps?q=0.000000,0.000000"
        );
    }

    #[test]
    fn textual_coordinates_render_verbatim() {
        // the decoder could not recover the rational triple; its text
        // rendering must survive instead of collapsing to zeroes
        let mut dirs = TagDirectories::default();
        dirs.insert(
            Directory::Gps,
            TAG_GPS_LATITUDE,
            TagValue::Text("40 deg 26 min 46.30 sec N".into()),
        );

        let fields = interpret(&dirs);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].label, "GPSLatitude");
        assert_eq!(fields[0].value, "40 deg 26 min 46.30 sec N");
    }

    #[test]
    fn latitude_alone_produces_no_location() {
        let mut dirs = TagDirectories::default();
        dirs.insert(
            Directory::Gps,
            TAG_GPS_LATITUDE,
            TagValue::Rationals(vec![
                Rational::new(40, 1),
                Rational::new(0, 1),
                Rational::new(0, 1),
            ]),
        );
        dirs.insert(Directory::Gps, TAG_GPS_LATITUDE_REF, TagValue::Text("N".into()));

        let fields = interpret(&dirs);
        assert!(fields.iter().all(|f| f.label != "Location"));
    }

    // ── value formatting by shape ────────────────────────────────────

    #[test]
    fn rational_sequences_join_with_commas() {
        let v = TagValue::Rationals(vec![Rational::new(1, 2), Rational::new(3, 0)]);
        assert_eq!(format_value(&v), "0.5, 0");
    }

    #[test]
    fn lists_join_with_commas() {
        let v = TagValue::List(vec!["a".into(), "b".into(), "c".into()]);
        assert_eq!(format_value(&v), "a, b, c");
    }

    #[test]
    fn composites_serialize_compactly() {
        let v = TagValue::Composite(json!({"num": 28, "den": 10}));
        assert_eq!(format_value(&v), r#"{"den":10,"num":28}"#);
    }

    #[test]
    fn whole_numbers_format_without_decimal_point() {
        assert_eq!(format_value(&TagValue::Number(40.0)), "40");
        assert_eq!(format_value(&TagValue::Number(2.8)), "2.8");
    }

    // ── GPS presence ─────────────────────────────────────────────────

    #[test]
    fn gps_prefix_detection() {
        let with = vec![Field::new("GPSLatitude", "x")];
        let without = vec![Field::new("Make", "Canon"), Field::new("Location", "y")];
        assert!(has_gps_fields(&with));
        assert!(!has_gps_fields(&without));
    }
}
