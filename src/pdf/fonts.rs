//! Font discovery for PDF output.
//!
//! genpdf embeds TrueType fonts, so the report needs one family of four
//! files. Directories are tried in order: `REPORT_FONTS_DIR`, `assets/fonts`
//! next to the executable, then the crate's own `assets/fonts`.

use std::env;
use std::path::{Path, PathBuf};

use genpdf::fonts::{self, FontData, FontFamily};

use crate::error::{ReportError, Result};

/// Environment variable naming a directory with the report font files.
pub const FONTS_DIR_VAR: &str = "REPORT_FONTS_DIR";

/// Family every report style is printed with.
pub const FONT_FAMILY: &str = "LiberationSans";

/// Files `genpdf::fonts::from_files` expects for [`FONT_FAMILY`].
const FAMILY_FILES: [&str; 4] = [
    "LiberationSans-Regular.ttf",
    "LiberationSans-Bold.ttf",
    "LiberationSans-Italic.ttf",
    "LiberationSans-BoldItalic.ttf",
];

/// Ordered list of directories that may hold the report fonts.
#[derive(Clone, Debug, Default)]
pub struct FontSearch {
    directories: Vec<PathBuf>,
}

impl FontSearch {
    /// The standard search path.
    pub fn standard() -> Self {
        let mut search = Self::default();
        if let Some(dir) = env::var_os(FONTS_DIR_VAR).filter(|value| !value.is_empty()) {
            search = search.with_directory(dir);
        }
        if let Some(bin_dir) = env::current_exe().ok().and_then(|exe| exe.parent().map(Path::to_path_buf)) {
            search = search.with_directory(bin_dir.join("assets/fonts"));
        }
        search.with_directory(Path::new(env!("CARGO_MANIFEST_DIR")).join("assets/fonts"))
    }

    /// Appends a directory unless it is already listed.
    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        let directory = directory.into();
        if !self.directories.contains(&directory) {
            self.directories.push(directory);
        }
        self
    }

    pub fn directories(&self) -> &[PathBuf] {
        &self.directories
    }

    /// First directory holding the whole family.
    ///
    /// The error lists every directory tried and what it lacked.
    pub fn locate(&self) -> Result<&Path> {
        let mut skipped = Vec::new();
        for directory in &self.directories {
            let missing = missing_files(directory);
            if missing.is_empty() {
                log::debug!("using report fonts from {}", directory.display());
                return Ok(directory);
            }
            skipped.push(format!("{} (missing {})", directory.display(), missing.join(", ")));
        }
        Err(ReportError::Font(format!(
            "no directory holds the {FONT_FAMILY} family; tried {}. Set {FONTS_DIR_VAR} or see assets/fonts/README.md",
            if skipped.is_empty() {
                "nothing".to_string()
            } else {
                skipped.join("; ")
            }
        )))
    }

    /// Loads the family from the first complete directory.
    pub fn load(&self) -> Result<FontFamily<FontData>> {
        let directory = self.locate()?;
        fonts::from_files(directory, FONT_FAMILY, None).map_err(|err| {
            ReportError::Font(format!(
                "cannot load {FONT_FAMILY} from {}: {err}",
                directory.display()
            ))
        })
    }
}

fn missing_files(directory: &Path) -> Vec<&'static str> {
    FAMILY_FILES
        .iter()
        .copied()
        .filter(|name| !directory.join(name).is_file())
        .collect()
}

/// The report font family from the standard search path.
pub fn default_font_family() -> Result<FontFamily<FontData>> {
    FontSearch::standard().load()
}

/// Whether PDF output can find its fonts. Tests use this to skip.
pub fn default_fonts_available() -> bool {
    FontSearch::standard().locate().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_family(directory: &Path, files: &[&str]) {
        for name in files {
            std::fs::write(directory.join(name), b"").expect("write font file");
        }
    }

    #[test]
    fn directories_are_deduplicated_in_order() {
        let search = FontSearch::default()
            .with_directory("/a")
            .with_directory("/b")
            .with_directory("/a");
        assert_eq!(search.directories(), [PathBuf::from("/a"), PathBuf::from("/b")]);
    }

    #[test]
    fn the_first_complete_directory_wins() {
        let partial = tempfile::tempdir().expect("tempdir");
        let complete = tempfile::tempdir().expect("tempdir");
        write_family(partial.path(), &FAMILY_FILES[..2]);
        write_family(complete.path(), &FAMILY_FILES);

        let search = FontSearch::default()
            .with_directory(partial.path())
            .with_directory(complete.path());
        assert_eq!(search.locate().expect("fonts"), complete.path());
    }

    #[test]
    fn incomplete_directories_are_reported_with_their_missing_files() {
        let partial = tempfile::tempdir().expect("tempdir");
        write_family(partial.path(), &FAMILY_FILES[..3]);

        let search = FontSearch::default().with_directory(partial.path());
        match search.locate() {
            Err(ReportError::Font(message)) => {
                assert!(message.contains("LiberationSans-BoldItalic.ttf"));
                assert!(!message.contains("LiberationSans-Regular.ttf"));
                assert!(message.contains(FONTS_DIR_VAR));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn an_empty_search_fails() {
        assert!(matches!(
            FontSearch::default().load(),
            Err(ReportError::Font(_))
        ));
    }
}
