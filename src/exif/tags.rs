//! Static tag-id → label tables for the three EXIF directories.
//!
//! The tables are immutable constant data, one per directory. Lookups fall
//! back to a synthesized `"<Directory> Tag <id>"` label so that no tag is
//! ever silently dropped from the display.

use std::fmt;

/// The three fixed tag directories an EXIF block is organized into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Directory {
    /// IFD0 — image-level tags (camera make/model, orientation, software).
    Image,
    /// Exif sub-IFD — capture detail tags (exposure, ISO, timestamps).
    Exif,
    /// GPS sub-IFD — location tags.
    Gps,
}

impl fmt::Display for Directory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Image => write!(f, "Image"),
            Self::Exif => write!(f, "Exif"),
            Self::Gps => write!(f, "GPS"),
        }
    }
}

// GPS directory tag ids used by the reader and interpreter.
pub const TAG_GPS_LATITUDE_REF: u16 = 0x0001;
pub const TAG_GPS_LATITUDE: u16 = 0x0002;
pub const TAG_GPS_LONGITUDE_REF: u16 = 0x0003;
pub const TAG_GPS_LONGITUDE: u16 = 0x0004;

/// IFD0 (image) tag labels.
const IMAGE_TAGS: &[(u16, &str)] = &[
    (0x00FE, "SubfileType"),
    (0x0100, "ImageWidth"),
    (0x0101, "ImageHeight"),
    (0x0102, "BitsPerSample"),
    (0x0103, "Compression"),
    (0x0106, "PhotometricInterpretation"),
    (0x010E, "ImageDescription"),
    (0x010F, "Make"),
    (0x0110, "Model"),
    (0x0112, "Orientation"),
    (0x0115, "SamplesPerPixel"),
    (0x011A, "XResolution"),
    (0x011B, "YResolution"),
    (0x0128, "ResolutionUnit"),
    (0x0131, "Software"),
    (0x0132, "ModifyDate"),
    (0x013B, "Artist"),
    (0x013C, "HostComputer"),
    (0x013E, "WhitePoint"),
    (0x013F, "PrimaryChromaticities"),
    (0x0211, "YCbCrCoefficients"),
    (0x0212, "YCbCrSubSampling"),
    (0x0213, "YCbCrPositioning"),
    (0x0214, "ReferenceBlackWhite"),
    (0x8298, "Copyright"),
    (0x8769, "ExifOffset"),
    (0x8825, "GPSInfo"),
];

/// Exif sub-IFD (capture detail) tag labels.
const EXIF_TAGS: &[(u16, &str)] = &[
    (0x829A, "ExposureTime"),
    (0x829D, "FNumber"),
    (0x8822, "ExposureProgram"),
    (0x8824, "SpectralSensitivity"),
    (0x8827, "ISO"),
    (0x8830, "SensitivityType"),
    (0x8832, "RecommendedExposureIndex"),
    (0x9000, "ExifVersion"),
    (0x9003, "DateTimeOriginal"),
    (0x9004, "DateTimeDigitized"),
    (0x9010, "OffsetTime"),
    (0x9011, "OffsetTimeOriginal"),
    (0x9101, "ComponentsConfiguration"),
    (0x9102, "CompressedBitsPerPixel"),
    (0x9201, "ShutterSpeedValue"),
    (0x9202, "ApertureValue"),
    (0x9203, "BrightnessValue"),
    (0x9204, "ExposureCompensation"),
    (0x9205, "MaxApertureValue"),
    (0x9206, "SubjectDistance"),
    (0x9207, "MeteringMode"),
    (0x9208, "LightSource"),
    (0x9209, "Flash"),
    (0x920A, "FocalLength"),
    (0x9214, "SubjectArea"),
    (0x927C, "MakerNote"),
    (0x9286, "UserComment"),
    (0x9290, "SubSecTime"),
    (0x9291, "SubSecTimeOriginal"),
    (0x9292, "SubSecTimeDigitized"),
    (0xA000, "FlashpixVersion"),
    (0xA001, "ColorSpace"),
    (0xA002, "PixelXDimension"),
    (0xA003, "PixelYDimension"),
    (0xA004, "RelatedSoundFile"),
    (0xA20E, "FocalPlaneXResolution"),
    (0xA20F, "FocalPlaneYResolution"),
    (0xA210, "FocalPlaneResolutionUnit"),
    (0xA215, "ExposureIndex"),
    (0xA217, "SensingMethod"),
    (0xA300, "FileSource"),
    (0xA301, "SceneType"),
    (0xA302, "CFAPattern"),
    (0xA401, "CustomRendered"),
    (0xA402, "ExposureMode"),
    (0xA403, "WhiteBalance"),
    (0xA404, "DigitalZoomRatio"),
    (0xA405, "FocalLengthIn35mmFilm"),
    (0xA406, "SceneCaptureType"),
    (0xA407, "GainControl"),
    (0xA408, "Contrast"),
    (0xA409, "Saturation"),
    (0xA40A, "Sharpness"),
    (0xA40C, "SubjectDistanceRange"),
    (0xA420, "ImageUniqueID"),
    (0xA430, "OwnerName"),
    (0xA431, "BodySerialNumber"),
    (0xA432, "LensInfo"),
    (0xA433, "LensMake"),
    (0xA434, "LensModel"),
    (0xA435, "LensSerialNumber"),
];

/// GPS sub-IFD tag labels. Every label starts with "GPS" — the privacy
/// notice in the CLI keys off that prefix.
const GPS_TAGS: &[(u16, &str)] = &[
    (0x0000, "GPSVersionID"),
    (TAG_GPS_LATITUDE_REF, "GPSLatitudeRef"),
    (TAG_GPS_LATITUDE, "GPSLatitude"),
    (TAG_GPS_LONGITUDE_REF, "GPSLongitudeRef"),
    (TAG_GPS_LONGITUDE, "GPSLongitude"),
    (0x0005, "GPSAltitudeRef"),
    (0x0006, "GPSAltitude"),
    (0x0007, "GPSTimeStamp"),
    (0x0008, "GPSSatellites"),
    (0x0009, "GPSStatus"),
    (0x000A, "GPSMeasureMode"),
    (0x000B, "GPSDOP"),
    (0x000C, "GPSSpeedRef"),
    (0x000D, "GPSSpeed"),
    (0x000E, "GPSTrackRef"),
    (0x000F, "GPSTrack"),
    (0x0010, "GPSImgDirectionRef"),
    (0x0011, "GPSImgDirection"),
    (0x0012, "GPSMapDatum"),
    (0x0018, "GPSDestBearingRef"),
    (0x0019, "GPSDestBearing"),
    (0x001A, "GPSDestDistanceRef"),
    (0x001B, "GPSProcessingMethod"),
    (0x001D, "GPSDateStamp"),
    (0x001F, "GPSHPositioningError"),
];

fn table_for(directory: Directory) -> &'static [(u16, &'static str)] {
    match directory {
        Directory::Image => IMAGE_TAGS,
        Directory::Exif => EXIF_TAGS,
        Directory::Gps => GPS_TAGS,
    }
}

/// Look up the label for a tag id within a directory.
pub fn lookup(directory: Directory, id: u16) -> Option<&'static str> {
    table_for(directory)
        .iter()
        .find(|(code, _)| *code == id)
        .map(|(_, label)| *label)
}

/// Resolve a display label, falling back to `"<Directory> Tag <id>"` for
/// ids the tables don't know.
pub fn label(directory: Directory, id: u16) -> String {
    match lookup(directory, id) {
        Some(name) => name.to_string(),
        None => format!("{directory} Tag {id}"),
    }
}

/// Classify a raw tag id into one of the three directories.
///
/// GPS tag ids share the low range 0x0000..=0x001F and never collide with
/// IFD0 ids (which start at 0x00FE). Unknown high ids are assumed to be
/// capture-detail tags; unknown low ids image-level tags.
pub fn classify(id: u16) -> Directory {
    if id <= 0x001F {
        Directory::Gps
    } else if lookup(Directory::Image, id).is_some() {
        Directory::Image
    } else if lookup(Directory::Exif, id).is_some() || id >= 0x8000 {
        Directory::Exif
    } else {
        Directory::Image
    }
}
