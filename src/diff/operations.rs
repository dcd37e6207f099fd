use similar::{ChangeTag, TextDiff};
use std::path::Path;

/// Lines inserted and deleted between two versions of a file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineChanges {
    pub inserted: usize,
    pub deleted: usize,
}

impl LineChanges {
    pub fn is_empty(&self) -> bool {
        self.inserted == 0 && self.deleted == 0
    }
}

/// Count changed lines between `old` and `new`
pub fn line_changes(old: &str, new: &str) -> LineChanges {
    let diff = TextDiff::from_lines(old, new);
    let mut changes = LineChanges::default();

    for change in diff.iter_all_changes() {
        match change.tag() {
            ChangeTag::Delete => changes.deleted += 1,
            ChangeTag::Insert => changes.inserted += 1,
            ChangeTag::Equal => {}
        }
    }

    changes
}

/// Render a unified diff of the change to `path`, or `None` if nothing changed
pub fn unified_preview(path: &Path, old: &str, new: &str) -> Option<String> {
    if old == new {
        return None;
    }

    let before = format!("a/{}", path.display());
    let after = format!("b/{}", path.display());
    let diff = TextDiff::from_lines(old, new);
    let rendered = diff
        .unified_diff()
        .context_radius(2)
        .header(&before, &after)
        .to_string();

    Some(rendered)
}
