//! Label font resolution.
//!
//! The label font is a runtime asset like the cascade model: resolved from
//! an explicit path when configured, otherwise from the usual system font
//! locations.

use std::path::{Path, PathBuf};

use ab_glyph::FontArc;

use crate::error::{VisionError, VisionResult};

/// System font paths probed when no explicit font is configured.
const SYSTEM_FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
];

/// Pick the first existing candidate font path.
pub fn resolve_font_path(explicit: Option<&Path>) -> VisionResult<PathBuf> {
    if let Some(path) = explicit {
        if path.is_file() {
            return Ok(path.to_path_buf());
        }
        return Err(VisionError::FontNotFound(format!(
            "configured font {} does not exist",
            path.display()
        )));
    }

    SYSTEM_FONT_PATHS
        .iter()
        .map(Path::new)
        .find(|p| p.is_file())
        .map(Path::to_path_buf)
        .ok_or_else(|| {
            VisionError::FontNotFound(
                "no system font found; set an explicit font path".to_string(),
            )
        })
}

/// Load the font used for face label tags.
pub fn load_label_font(explicit: Option<&Path>) -> VisionResult<FontArc> {
    let path = resolve_font_path(explicit)?;
    let data = std::fs::read(&path)?;
    FontArc::try_from_vec(data).map_err(|_| VisionError::FontInvalid(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn explicit_missing_path_errors() {
        let err = resolve_font_path(Some(Path::new("/nonexistent/font.ttf"))).unwrap_err();
        assert!(matches!(err, VisionError::FontNotFound(_)));
    }

    #[test]
    fn explicit_existing_path_wins_over_system_scan() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"stub").unwrap();
        let resolved = resolve_font_path(Some(file.path())).unwrap();
        assert_eq!(resolved, file.path());
    }

    #[test]
    fn non_font_bytes_fail_to_parse() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"definitely not a truetype font").unwrap();
        let err = load_label_font(Some(file.path())).unwrap_err();
        assert!(matches!(err, VisionError::FontInvalid(_)));
    }
}
