//! Default file names for cached datasets.
//!
//! Names are derived from the row's title and format columns. They are
//! deterministic but not guaranteed unique.

use crate::result_set::RecordView;
use crate::types::Value;

/// Base name used when a row has no usable title.
pub const DEFAULT_BASENAME: &str = "dataset";

/// Extension used when the format is missing or unrecognized.
pub const DEFAULT_EXTENSION: &str = "dat";

const TITLE_UCDS: &[&str] = &["meta.title", "VOX:Image_Title"];
const TITLE_UTYPE_SUFFIX: &str = "title";
const FORMAT_UCDS: &[&str] = &["meta.code.mime", "VOX:Image_Format"];
const FORMAT_UTYPE_SUFFIX: &str = "access.format";

/// Derives a file name for the dataset described by a row.
pub trait FilenamePolicy {
    /// `row` is `None` when the cursor is not positioned on a row.
    fn make_filename(&self, row: Option<&RecordView<'_>>) -> String;
}

/// Title plus an extension inferred from the format.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultNaming;

impl FilenamePolicy for DefaultNaming {
    fn make_filename(&self, row: Option<&RecordView<'_>>) -> String {
        let (title, format) = match row {
            Some(view) => (row_title(view), row_format(view)),
            None => (None, None),
        };
        format!(
            "{}.{}",
            sanitize(title.as_deref().unwrap_or(DEFAULT_BASENAME)),
            format.as_deref().map_or(DEFAULT_EXTENSION, extension_for)
        )
    }
}

/// Naming for image-access results.
///
/// Image titles commonly repeat across cutouts of the same field, so the row
/// position is appended to the title.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageNaming;

impl FilenamePolicy for ImageNaming {
    fn make_filename(&self, row: Option<&RecordView<'_>>) -> String {
        let Some(view) = row else {
            return DefaultNaming.make_filename(None);
        };
        let title = row_title(view).unwrap_or_else(|| DEFAULT_BASENAME.to_string());
        let ext = row_format(view)
            .as_deref()
            .map_or(DEFAULT_EXTENSION, extension_for);
        format!("{}_{}.{}", sanitize(&title), view.position(), ext)
    }
}

fn non_empty(value: Option<&Value>) -> Option<String> {
    let s = value?.as_str()?.trim();
    (!s.is_empty()).then(|| s.to_string())
}

fn row_title(view: &RecordView<'_>) -> Option<String> {
    TITLE_UCDS
        .iter()
        .find_map(|ucd| non_empty(view.by_ucd(ucd)))
        .or_else(|| non_empty(view.by_utype_suffix(TITLE_UTYPE_SUFFIX)))
        .or_else(|| non_empty(view.by_name("title")))
}

fn row_format(view: &RecordView<'_>) -> Option<String> {
    FORMAT_UCDS
        .iter()
        .find_map(|ucd| non_empty(view.by_ucd(ucd)))
        .or_else(|| non_empty(view.by_utype_suffix(FORMAT_UTYPE_SUFFIX)))
        .or_else(|| non_empty(view.by_name("format")))
}

/// File extension for a MIME type or format name.
pub fn extension_for(format: &str) -> &'static str {
    let format = format.trim().to_ascii_lowercase();
    let essence = format.split(';').next().unwrap_or_default().trim();
    match essence {
        f if f.contains("fits") => "fits",
        f if f.contains("votable") || f.ends_with("/xml") || f.ends_with("+xml") => "xml",
        "image/jpeg" | "image/jpg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "text/plain" => "txt",
        "text/csv" => "csv",
        "text/html" => "html",
        "application/pdf" => "pdf",
        "application/x-tar" => "tar",
        "application/gzip" | "application/x-gzip" => "gz",
        "application/zip" => "zip",
        _ => DEFAULT_EXTENSION,
    }
}

/// Replace characters that are awkward in file names.
fn sanitize(title: &str) -> String {
    let cleaned: String = title
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_matches(|c| c == '_' || c == '.');
    if cleaned.is_empty() {
        DEFAULT_BASENAME.to_string()
    } else {
        cleaned.to_string()
    }
}
