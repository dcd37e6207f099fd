use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::core::EditorConfig;
use crate::diff::{line_changes, unified_preview, TagEdit};
use crate::error::RetagResult;
use crate::utils::fs;

/// How an edit is applied to disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditOptions {
    /// Compute the change without writing
    pub dry_run: bool,
    /// Keep a `.backup` copy of the original before writing
    pub backup: bool,
    /// Write through a temp file and rename over the target
    pub atomic_write: bool,
}

impl Default for EditOptions {
    fn default() -> Self {
        Self::from(&EditorConfig::default())
    }
}

impl From<&EditorConfig> for EditOptions {
    fn from(config: &EditorConfig) -> Self {
        Self {
            dry_run: false,
            backup: config.backup_files,
            atomic_write: config.atomic_write,
        }
    }
}

impl EditOptions {
    /// Layer command-line flags over configured options. Flags can only
    /// enable a dry run or a backup, or turn atomic writes off.
    pub fn with_overrides(mut self, dry_run: bool, backup: bool, no_atomic: bool) -> Self {
        self.dry_run |= dry_run;
        self.backup |= backup;
        self.atomic_write &= !no_atomic;
        self
    }
}

/// Result of applying a tag edit to a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOutcome {
    pub path: PathBuf,
    pub replacements: usize,
    pub bytes_before: usize,
    pub bytes_after: usize,
    /// Whether the file was rewritten
    pub written: bool,
    pub backup: Option<PathBuf>,
    /// Unified diff of the change, produced on dry runs
    pub preview: Option<String>,
}

/// Apply `edit` to `path`: read it, replace every match, write it back.
///
/// The file must exist and be writable before anything is read, even when
/// `edit.old` turns out to be absent. Outside of dry runs the file is always
/// rewritten, so a run without matches leaves identical contents behind.
/// A requested backup is checked before anything is written. An atomic write
/// falls back to an in-place write when a rename would not replace the same
/// file (read-only directory, hard links, different owner).
pub fn apply_tag_edit(path: impl Into<PathBuf>, edit: &TagEdit, options: EditOptions) -> RetagResult<EditOutcome> {
    let path = path.into();
    edit.validate()?;

    fs::ensure_file(&path)?;
    if !options.dry_run {
        fs::ensure_writable(&path)?;
        if options.backup {
            fs::ensure_backup_possible(&path)?;
        }
    }

    let original = fs::read_text(&path)?;
    let replacement = edit.apply_to_str(&original)?;

    if replacement.is_noop() {
        warn!(
            "No occurrence of {:?} in {}; file left unchanged",
            edit.old,
            path.display()
        );
    } else {
        let changes = line_changes(&original, &replacement.content);
        if changes.is_empty() {
            debug!("Replacement text is identical to the match; contents unchanged");
        } else {
            debug!(
                "{} line(s) removed, {} line(s) added",
                changes.deleted, changes.inserted
            );
        }
    }

    let mut outcome = EditOutcome {
        path: path.clone(),
        replacements: replacement.count,
        bytes_before: original.len(),
        bytes_after: replacement.content.len(),
        written: false,
        backup: None,
        preview: None,
    };

    if options.dry_run {
        outcome.preview = unified_preview(&path, &original, &replacement.content);
        info!(
            "Dry run: {} replacement(s) would be made in {}",
            outcome.replacements,
            path.display()
        );
        return Ok(outcome);
    }

    if options.backup {
        outcome.backup = Some(fs::backup_file(&path)?);
    }

    let atomic = options.atomic_write && fs::can_replace_atomically(&path);
    if options.atomic_write && !atomic {
        debug!("Cannot replace {} by rename, writing in place", path.display());
    }

    if atomic {
        fs::write_text_atomic(&path, &replacement.content)?;
    } else {
        fs::write_text(&path, &replacement.content)?;
    }
    outcome.written = true;

    info!(
        "Made {} replacement(s) in {}",
        outcome.replacements,
        path.display()
    );

    Ok(outcome)
}
