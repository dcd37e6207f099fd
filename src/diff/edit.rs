use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{RetagError, RetagResult};

/// File the built-in edit applies to, relative to the project root
pub const DEFAULT_TARGET: &str = "src/core/effects/library/fiestalatina/SolarFlare.ts";
/// Tag value replaced by the built-in edit
pub const DEFAULT_OLD: &str = "readonly mixBus = 'htp' as const";
/// Tag value written by the built-in edit
pub const DEFAULT_NEW: &str = "readonly mixBus = 'global' as const";

/// A single literal tag edit bound to one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagEdit {
    /// File to edit
    pub target: PathBuf,
    /// Literal text to search for
    pub old: String,
    /// Literal text written in place of every match
    pub new: String,
}

/// Text after an edit, with the number of matches replaced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub content: String,
    pub count: usize,
}

impl Replacement {
    pub fn is_noop(&self) -> bool {
        self.count == 0
    }
}

impl Default for TagEdit {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TagEdit {
    pub fn new(target: impl Into<PathBuf>, old: impl Into<String>, new: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            old: old.into(),
            new: new.into(),
        }
    }

    /// The hard-coded mixBus edit
    pub fn builtin() -> Self {
        Self::new(DEFAULT_TARGET, DEFAULT_OLD, DEFAULT_NEW)
    }

    /// Replace the target when one is given
    pub fn with_target(mut self, target: Option<PathBuf>) -> Self {
        if let Some(target) = target {
            self.target = target;
        }
        self
    }

    /// Resolve a relative target against `root`
    pub fn resolved_target(&self, root: &Path) -> PathBuf {
        if self.target.is_absolute() {
            self.target.clone()
        } else {
            root.join(&self.target)
        }
    }

    pub fn validate(&self) -> RetagResult<()> {
        if self.old.is_empty() {
            return Err(RetagError::invalid_argument(
                "the text to replace must not be empty",
            ));
        }
        Ok(())
    }

    /// Replace every non-overlapping occurrence of `old`, scanning left to right
    pub fn apply_to_str(&self, text: &str) -> RetagResult<Replacement> {
        self.validate()?;

        let count = text.matches(self.old.as_str()).count();
        if count == 0 {
            debug!("No occurrence of {:?} found", self.old);
            return Ok(Replacement {
                content: text.to_string(),
                count,
            });
        }

        let content = text.replace(self.old.as_str(), &self.new);
        debug!("Replaced {} occurrence(s) of {:?}", count, self.old);

        Ok(Replacement { content, count })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edit(old: &str, new: &str) -> TagEdit {
        TagEdit::new("file.ts", old, new)
    }

    #[test]
    fn test_builtin_edit() {
        let source = "export class SolarFlare {\n  readonly mixBus = 'htp' as const  // HTP\n}\n";
        let result = TagEdit::builtin().apply_to_str(source).unwrap();

        assert_eq!(result.count, 1);
        assert_eq!(
            result.content,
            "export class SolarFlare {\n  readonly mixBus = 'global' as const  // HTP\n}\n"
        );
    }

    #[test]
    fn test_replaces_every_occurrence() {
        let result = edit("htp", "global").apply_to_str("htp, htp and htp").unwrap();
        assert_eq!(result.count, 3);
        assert_eq!(result.content, "global, global and global");
    }

    #[test]
    fn test_non_overlapping_left_to_right() {
        let result = edit("aa", "b").apply_to_str("aaaaa").unwrap();
        assert_eq!(result.count, 2);
        assert_eq!(result.content, "bba");
    }

    #[test]
    fn test_absent_is_noop() {
        let text = "readonly mixBus = 'global' as const";
        let result = TagEdit::builtin().apply_to_str(text).unwrap();
        assert!(result.is_noop());
        assert_eq!(result.content, text);
    }

    #[test]
    fn test_second_application_is_noop() {
        let tag = TagEdit::builtin();
        let first = tag.apply_to_str(DEFAULT_OLD).unwrap();
        let second = tag.apply_to_str(&first.content).unwrap();

        assert_eq!(first.count, 1);
        assert!(second.is_noop());
        assert_eq!(second.content, DEFAULT_NEW);
    }

    #[test]
    fn test_empty_old_rejected() {
        let err = edit("", "x").apply_to_str("abc").unwrap_err();
        assert!(matches!(err, RetagError::InvalidArgument { .. }));
    }

    #[test]
    fn test_multibyte_text_preserved() {
        let text = "// 🌊 WAVE 790: htp ✓\nmixBus = 'htp'";
        let result = edit("'htp'", "'global'").apply_to_str(text).unwrap();
        assert_eq!(result.content, "// 🌊 WAVE 790: htp ✓\nmixBus = 'global'");
    }

    #[test]
    fn test_with_target_overrides_only_when_given() {
        let kept = TagEdit::builtin().with_target(None);
        assert_eq!(kept, TagEdit::builtin());

        let moved = TagEdit::builtin().with_target(Some(PathBuf::from("other/Flare.ts")));
        assert_eq!(moved.target, PathBuf::from("other/Flare.ts"));
        assert_eq!(moved.old, DEFAULT_OLD);
        assert_eq!(moved.new, DEFAULT_NEW);
    }

    #[test]
    fn test_resolved_target() {
        let tag = TagEdit::builtin();
        assert_eq!(
            tag.resolved_target(Path::new("/work")),
            Path::new("/work").join(DEFAULT_TARGET)
        );

        let absolute = TagEdit::new("/abs/file.ts", "a", "b");
        assert_eq!(
            absolute.resolved_target(Path::new("/work")),
            PathBuf::from("/abs/file.ts")
        );
    }
}
