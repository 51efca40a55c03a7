use anyhow::{Context, Result, bail};
use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::Config;
use crate::exif::strip::{PixelReencoder, Reencode};
use crate::exif::{self, Field, remaining_field_count};

/// Supported image extensions — inspection and stripping cover JPEG/PNG.
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Accepted MIME types for input validation messages.
pub const ACCEPTED_MIME_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png"];

/// The container format of an input image, detected from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Png,
}

impl ImageKind {
    /// Determine the image kind from a file path extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            _ => None,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }

    pub fn image_format(&self) -> image::ImageFormat {
        match self {
            Self::Jpeg => image::ImageFormat::Jpeg,
            Self::Png => image::ImageFormat::Png,
        }
    }
}

/// Basic attributes of the selected file. Derived from the filesystem,
/// never from EXIF.
#[derive(Debug, Clone)]
pub struct FileAttributes {
    pub name: String,
    pub size: u64,
    pub mime: &'static str,
    pub modified: Option<DateTime<Local>>,
}

impl FileAttributes {
    pub fn from_path(path: &Path, kind: ImageKind) -> Result<Self> {
        let meta = fs::metadata(path).context("Failed to read file metadata")?;
        let modified = meta.modified().ok().map(DateTime::<Local>::from);

        Ok(Self {
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default(),
            size: meta.len(),
            mime: kind.mime_type(),
            modified,
        })
    }

    /// The fixed 4-row basic section: name, size, type, modified time.
    pub fn basic_fields(&self) -> Vec<Field> {
        vec![
            Field::new("FileName", self.name.clone()),
            Field::new("FileSize", format_size(self.size)),
            Field::new("MIMEType", self.mime),
            Field::new(
                "FileModifyDate",
                self.modified
                    .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ),
        ]
    }
}

/// The display metadata set for one inspected image: a basic section from
/// file attributes and an EXIF section from the tag directories.
#[derive(Debug, Clone)]
pub struct MetadataReport {
    pub basic: Vec<Field>,
    pub exif: Vec<Field>,
}

impl MetadataReport {
    pub fn build(attributes: &FileAttributes, dirs: &exif::TagDirectories) -> Self {
        Self {
            basic: attributes.basic_fields(),
            exif: exif::interpret(dirs),
        }
    }

    /// An empty EXIF section is the valid "no metadata" state.
    pub fn has_exif(&self) -> bool {
        !self.exif.is_empty()
    }

    /// Whether any EXIF field label begins with "GPS". When false, the
    /// presentation layer surfaces a privacy notice.
    pub fn has_gps_fields(&self) -> bool {
        exif::has_gps_fields(&self.exif)
    }
}

/// The result of inspecting a single image.
#[derive(Debug)]
pub struct InspectOutcome {
    pub path: PathBuf,
    pub attributes: FileAttributes,
    pub report: MetadataReport,
}

/// Inspect one image: validate, decode its tag directories, and interpret
/// them into a display report.
///
/// An image without any EXIF data inspects successfully with an empty EXIF
/// section; only I/O failures and rejected inputs are errors.
pub fn inspect_image(path: &Path, config: &Config) -> Result<InspectOutcome> {
    let kind = validate_input(path, config)?;
    let attributes = FileAttributes::from_path(path, kind)?;
    let dirs = exif::read_tag_directories(path)?;

    Ok(InspectOutcome {
        path: path.to_path_buf(),
        report: MetadataReport::build(&attributes, &dirs),
        attributes,
    })
}

/// The result of stripping a single image.
///
/// Failures are carried per-file in `error`; one bad file never aborts a
/// batch.
#[derive(Debug)]
pub struct StripOutcome {
    pub path: PathBuf,
    /// Where the cleaned copy was written. `None` on error or dry run.
    pub output_path: Option<PathBuf>,
    pub fields_before: usize,
    pub fields_after: usize,
    pub size_before: u64,
    pub size_after: u64,
    pub error: Option<String>,
}

impl StripOutcome {
    fn failed(path: &Path, error: String) -> Self {
        Self {
            path: path.to_path_buf(),
            output_path: None,
            fields_before: 0,
            fields_after: 0,
            size_before: 0,
            size_after: 0,
            error: Some(error),
        }
    }
}

/// Produce a metadata-free copy of one image.
///
/// Pipeline: validate → count fields → decode + re-encode → verify the new
/// bytes decode to zero fields → write `<stem><suffix>.<ext>`. The original
/// file is never modified.
pub fn strip_image(path: &Path, config: &Config) -> StripOutcome {
    let kind = match validate_input(path, config) {
        Ok(kind) => kind,
        Err(e) => return StripOutcome::failed(path, e.to_string()),
    };

    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => return StripOutcome::failed(path, format!("Failed to read file: {e}")),
    };

    let mut outcome = StripOutcome {
        path: path.to_path_buf(),
        output_path: None,
        fields_before: remaining_field_count(&bytes),
        fields_after: 0,
        size_before: bytes.len() as u64,
        size_after: 0,
        error: None,
    };

    let reencoder = PixelReencoder {
        jpeg_quality: config.strip.jpeg_quality,
    };
    let cleaned = match reencoder.reencode(&bytes, kind) {
        Ok(cleaned) => cleaned,
        Err(e) => {
            outcome.error = Some(e.to_string());
            return outcome;
        }
    };
    outcome.size_after = cleaned.len() as u64;

    if config.strip.verify {
        outcome.fields_after = remaining_field_count(&cleaned);
        if outcome.fields_after > 0 {
            log::warn!(
                "{} metadata field(s) survived re-encoding of {}",
                outcome.fields_after,
                path.display()
            );
        }
    }

    let output_path = derive_output_path(
        path,
        &config.strip.output_suffix,
        config.output.output_dir.as_deref().map(Path::new),
    );

    if config.output.dry_run {
        log::info!("DRY RUN — would write {}", output_path.display());
    } else if let Err(e) = fs::write(&output_path, &cleaned) {
        outcome.error = Some(format!("Failed to write cleaned copy: {e}"));
    } else {
        outcome.output_path = Some(output_path);
    }

    outcome
}

/// Reject unsupported or oversized files before any decoding happens.
fn validate_input(path: &Path, config: &Config) -> Result<ImageKind> {
    let Some(kind) = ImageKind::from_path(path) else {
        bail!(
            "Unsupported file type: {} (accepted: {})",
            path.display(),
            ACCEPTED_MIME_TYPES.join(", ")
        );
    };

    let size = fs::metadata(path)
        .with_context(|| format!("Failed to read file metadata: {}", path.display()))?
        .len();
    let max_bytes = config.limits.max_file_size_mb * 1024 * 1024;
    if size > max_bytes {
        bail!(
            "File exceeds the {} MB size limit: {} ({})",
            config.limits.max_file_size_mb,
            path.display(),
            format_size(size)
        );
    }

    Ok(kind)
}

/// Collect supported image files from the given paths.
///
/// Accepts a mix of file paths and directory paths. Directories are walked
/// recursively (following symlinks); unsupported files are skipped with a
/// warning.
pub fn collect_images(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut images = Vec::new();

    for path in paths {
        if path.is_file() {
            if is_supported_image(path) {
                images.push(path.clone());
            } else {
                log::warn!("Skipping unsupported file: {}", path.display());
            }
        } else if path.is_dir() {
            for entry in WalkDir::new(path)
                .follow_links(true)
                .into_iter()
                .filter_map(|e| e.ok())
            {
                let p = entry.path();
                if p.is_file() && is_supported_image(p) {
                    images.push(p.to_path_buf());
                }
            }
        } else {
            log::warn!("Path does not exist: {}", path.display());
        }
    }

    images
}

/// Check if a file has a supported image extension.
fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Derived filename for the cleaned copy: `<stem><suffix>.<ext>`, next to
/// the original unless an output directory is given.
pub fn derive_output_path(path: &Path, suffix: &str, output_dir: Option<&Path>) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "image".to_string());

    let file_name = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{stem}{suffix}.{ext}"),
        None => format!("{stem}{suffix}"),
    };

    match output_dir {
        Some(dir) => dir.join(file_name),
        None => path.with_file_name(file_name),
    }
}

/// Human-readable byte count.
pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = 1024.0 * 1024.0;

    let b = bytes as f64;
    if b >= MB {
        format!("{:.1} MB", b / MB)
    } else if b >= KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{bytes} B")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::DynamicImage;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn write_sample(dir: &Path, name: &str, kind: ImageKind) -> PathBuf {
        let img = DynamicImage::new_rgb8(8, 6);
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, kind.image_format()).unwrap();
        let path = dir.join(name);
        fs::write(&path, out.into_inner()).unwrap();
        path
    }

    // ── ImageKind ────────────────────────────────────────────────────

    #[test]
    fn image_kind_from_path() {
        assert_eq!(ImageKind::from_path(Path::new("a.jpg")), Some(ImageKind::Jpeg));
        assert_eq!(ImageKind::from_path(Path::new("a.JPEG")), Some(ImageKind::Jpeg));
        assert_eq!(ImageKind::from_path(Path::new("a.png")), Some(ImageKind::Png));
        assert_eq!(ImageKind::from_path(Path::new("a.webp")), None);
        assert_eq!(ImageKind::from_path(Path::new("noext")), None);
    }

    #[test]
    fn mime_types() {
        assert_eq!(ImageKind::Jpeg.mime_type(), "image/jpeg");
        assert_eq!(ImageKind::Png.mime_type(), "image/png");
    }

    // ── collect_images ───────────────────────────────────────────────

    #[test]
    fn collect_images_single_file() {
        let dir = TempDir::new().unwrap();
        let jpg = dir.path().join("test.jpg");
        fs::write(&jpg, b"fake").unwrap();

        let images = collect_images(&[jpg.clone()]);
        assert_eq!(images, vec![jpg]);
    }

    #[test]
    fn collect_images_skips_unsupported() {
        let dir = TempDir::new().unwrap();
        let txt = dir.path().join("readme.txt");
        fs::write(&txt, b"hello").unwrap();

        assert!(collect_images(&[txt]).is_empty());
    }

    #[test]
    fn collect_images_directory_recursive() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();

        fs::write(dir.path().join("a.jpg"), b"fake").unwrap();
        fs::write(sub.join("b.png"), b"fake").unwrap();
        fs::write(sub.join("c.heic"), b"fake").unwrap();

        let images = collect_images(&[dir.path().to_path_buf()]);
        assert_eq!(images.len(), 2);
    }

    #[test]
    fn collect_images_nonexistent_path() {
        assert!(collect_images(&[PathBuf::from("/nonexistent/path")]).is_empty());
    }

    // ── output path derivation ───────────────────────────────────────

    #[test]
    fn cleaned_filename_keeps_stem_and_extension() {
        assert_eq!(
            derive_output_path(Path::new("/pics/photo.jpg"), "_cleaned", None),
            PathBuf::from("/pics/photo_cleaned.jpg")
        );
        assert_eq!(
            derive_output_path(Path::new("photo.PNG"), "_cleaned", None),
            PathBuf::from("photo_cleaned.PNG")
        );
    }

    #[test]
    fn cleaned_filename_honors_output_dir() {
        assert_eq!(
            derive_output_path(Path::new("/pics/photo.jpg"), "_cleaned", Some(Path::new("/out"))),
            PathBuf::from("/out/photo_cleaned.jpg")
        );
    }

    // ── size formatting ──────────────────────────────────────────────

    #[test]
    fn size_formatting() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MB");
    }

    // ── validation ───────────────────────────────────────────────────

    #[test]
    fn validation_rejects_unsupported_extension() {
        let config = Config::default();
        let err = validate_input(Path::new("doc.pdf"), &config).unwrap_err();
        assert!(err.to_string().contains("Unsupported file type"));
    }

    #[test]
    fn validation_rejects_oversized_file() {
        let dir = TempDir::new().unwrap();
        let jpg = dir.path().join("big.jpg");
        fs::write(&jpg, vec![0u8; 1024]).unwrap();

        let mut config = Config::default();
        config.limits.max_file_size_mb = 0;
        let err = validate_input(&jpg, &config).unwrap_err();
        assert!(err.to_string().contains("size limit"));
    }

    // ── inspect ──────────────────────────────────────────────────────

    #[test]
    fn inspect_plain_image_yields_empty_exif_and_four_basic_fields() {
        let dir = TempDir::new().unwrap();
        let png = write_sample(dir.path(), "plain.png", ImageKind::Png);

        let outcome = inspect_image(&png, &Config::default()).unwrap();
        assert_eq!(outcome.report.basic.len(), 4);
        assert!(outcome.report.exif.is_empty());
        assert!(!outcome.report.has_exif());
        assert!(!outcome.report.has_gps_fields());

        let labels: Vec<&str> = outcome
            .report
            .basic
            .iter()
            .map(|f| f.label.as_str())
            .collect();
        assert_eq!(labels, vec!["FileName", "FileSize", "MIMEType", "FileModifyDate"]);
    }

    // ── strip ────────────────────────────────────────────────────────

    #[test]
    fn strip_writes_cleaned_copy_with_zero_fields() {
        let dir = TempDir::new().unwrap();
        let jpg = write_sample(dir.path(), "photo.jpg", ImageKind::Jpeg);

        let outcome = strip_image(&jpg, &Config::default());
        assert!(outcome.error.is_none(), "error: {:?}", outcome.error);
        assert_eq!(outcome.fields_after, 0);

        let output = outcome.output_path.unwrap();
        assert_eq!(output, dir.path().join("photo_cleaned.jpg"));
        assert!(output.exists());
        // original untouched
        assert!(jpg.exists());
    }

    #[test]
    fn strip_dry_run_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let png = write_sample(dir.path(), "photo.png", ImageKind::Png);

        let mut config = Config::default();
        config.output.dry_run = true;
        let outcome = strip_image(&png, &config);

        assert!(outcome.error.is_none());
        assert!(outcome.output_path.is_none());
        assert!(!dir.path().join("photo_cleaned.png").exists());
    }

    #[test]
    fn strip_corrupt_file_reports_error_and_keeps_original() {
        let dir = TempDir::new().unwrap();
        let bad = dir.path().join("corrupt.jpg");
        fs::write(&bad, b"definitely not a jpeg").unwrap();

        let outcome = strip_image(&bad, &Config::default());
        assert!(outcome.error.is_some());
        assert!(outcome.output_path.is_none());
        assert!(bad.exists());
    }
}
