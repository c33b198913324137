//! Interactive completion of partially specified change entries.

use crate::entry::ChangeEntry;
use crate::error::{Error, Result};
use crate::schema::DEFAULT_TYPES;
use std::io::Write;
use std::path::Path;
use std::process::Command;

/// Editor used when neither `$VISUAL` nor `$EDITOR` is set.
pub const FALLBACK_EDITOR: &str = "vim";

/// Source of values for the missing fields of an entry.
pub trait EntryPrompter {
    /// Ask for field values, given the entry as currently known.
    ///
    /// Empty fields in the returned entry mean "no answer".
    ///
    /// # Errors
    ///
    /// Returns an error if the values could not be obtained.
    fn prompt(&self, entry: &ChangeEntry) -> Result<ChangeEntry>;
}

/// Fill in missing fields of `entry` through `prompter`.
///
/// A complete entry is returned untouched without consulting the prompter.
/// Otherwise only the fields the prompter answered overwrite `entry`.
///
/// # Errors
///
/// Returns any error raised by the prompter.
pub fn complete_entry(mut entry: ChangeEntry, prompter: &dyn EntryPrompter) -> Result<ChangeEntry> {
    if entry.is_completed() {
        return Ok(entry);
    }
    let answered = prompter.prompt(&entry)?;
    entry.merge_from(answered);
    Ok(entry)
}

/// Prompter that opens a pre-filled form in the user's editor.
#[derive(Debug, Clone)]
pub struct EditorPrompter {
    editor: String,
    types: Vec<String>,
}

impl EditorPrompter {
    /// Use an explicit editor command.
    #[must_use]
    pub fn new(editor: impl Into<String>) -> Self {
        Self {
            editor: editor.into(),
            types: DEFAULT_TYPES.iter().map(ToString::to_string).collect(),
        }
    }

    /// Pick the editor from `$VISUAL`, then `$EDITOR`, then [`FALLBACK_EDITOR`].
    #[must_use]
    ///
    /// Unset and blank variables are skipped.
    pub fn from_env() -> Self {
        Self::new(select_editor(
            std::env::var("VISUAL").ok(),
            std::env::var("EDITOR").ok(),
        ))
    }

    /// List these types in the form's instructions.
    #[must_use]
    pub fn with_types(mut self, types: &[String]) -> Self {
        if !types.is_empty() {
            self.types = types.to_vec();
        }
        self
    }

    /// Program and leading arguments for the editor.
    ///
    /// An existing file is the program itself even if its path has spaces;
    /// anything else is a command line such as `code --wait`.
    fn command(&self) -> Result<(&str, Vec<&str>)> {
        if Path::new(&self.editor).is_file() {
            return Ok((self.editor.as_str(), Vec::new()));
        }
        let mut words = self.editor.split_whitespace();
        let program = words
            .next()
            .ok_or_else(|| Error::editor("No editor configured"))?;
        Ok((program, words.collect()))
    }

    fn form(&self, entry: &ChangeEntry) -> String {
        format!(
            "\
# Type should be one of: {types}
# feature: A larger feature or change in behavior, usually resulting in a
#          minor version bump.
# bugfix: Fixing a bug in an existing code path.
# enhancement: Small change to an underlying implementation detail.
type: {kind}

# Category is the high level feature area.
category: {category}

# A brief description of the change. You can
# use github style references to issues such as
# \"fixes #489\" or \"owner/repo#100\".
description: {description}
",
            types = self.types.join(", "),
            kind = entry.kind,
            category = entry.category,
            description = entry.description,
        )
    }
}

impl EntryPrompter for EditorPrompter {
    fn prompt(&self, entry: &ChangeEntry) -> Result<ChangeEntry> {
        let mut file = tempfile::Builder::new()
            .prefix("chlog-change-")
            .suffix(".txt")
            .tempfile()
            .map_err(|e| Error::io_with_source("Failed to create editor file", None, e))?;
        file.write_all(self.form(entry).as_bytes())
            .and_then(|()| file.flush())
            .map_err(|e| {
                Error::io_with_source("Failed to write editor file", Some(file.path().to_path_buf()), e)
            })?;

        let (program, args) = self.command()?;

        tracing::debug!(editor = %self.editor, path = %file.path().display(), "Opening editor");
        let status = Command::new(program)
            .args(args)
            .arg(file.path())
            .status()
            .map_err(|e| Error::editor(format!("Failed to launch editor '{}': {e}", self.editor)))?;

        if !status.success() {
            return Err(Error::editor(format!(
                "Editor '{}' exited with {status}",
                self.editor
            )));
        }

        let contents = std::fs::read_to_string(file.path()).map_err(|e| {
            Error::io_with_source("Failed to read editor file", Some(file.path().to_path_buf()), e)
        })?;
        Ok(EntryFileParser::parse_contents(&contents))
    }
}

/// First non-blank of `visual` and `editor`, else [`FALLBACK_EDITOR`].
fn select_editor(visual: Option<String>, editor: Option<String>) -> String {
    visual
        .into_iter()
        .chain(editor)
        .find(|value| !value.trim().is_empty())
        .unwrap_or_else(|| FALLBACK_EDITOR.to_string())
}

/// Parser for the `field: value` form filled in by the user.
pub struct EntryFileParser;

impl EntryFileParser {
    /// Extract field values from filled-in form contents.
    ///
    /// Blank lines and `#` comments are skipped. A line starting with a
    /// field name and `:` sets that field to the trimmed remainder; later
    /// lines win. Anything else is ignored.
    #[must_use]
    pub fn parse_contents(contents: &str) -> ChangeEntry {
        let mut entry = ChangeEntry::empty();
        for line in contents.lines().map(str::trim_start) {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((field, value)) = line.split_once(':') else {
                continue;
            };
            let value = value.trim().to_string();
            match field {
                "type" => entry.kind = value,
                "category" => entry.category = value,
                "description" => entry.description = value,
                _ => {}
            }
        }
        entry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct FakePrompter {
        answer: ChangeEntry,
        calls: Cell<usize>,
    }

    impl FakePrompter {
        fn new(answer: ChangeEntry) -> Self {
            Self {
                answer,
                calls: Cell::new(0),
            }
        }
    }

    impl EntryPrompter for FakePrompter {
        fn prompt(&self, _entry: &ChangeEntry) -> Result<ChangeEntry> {
            self.calls.set(self.calls.get() + 1);
            Ok(self.answer.clone())
        }
    }

    #[test]
    fn test_complete_entry_skips_prompt_when_complete() {
        let prompter = FakePrompter::new(ChangeEntry::new("bugfix", "x", "y"));
        let entry = ChangeEntry::new("feature", "foo", "bar");

        let completed = complete_entry(entry.clone(), &prompter).unwrap();
        assert_eq!(completed, entry);
        assert_eq!(prompter.calls.get(), 0);
    }

    #[test]
    fn test_complete_entry_fills_only_answered_fields() {
        let prompter = FakePrompter::new(ChangeEntry::new("", "", "From editor"));
        let entry = ChangeEntry::new("feature", "foo", "");

        let completed = complete_entry(entry, &prompter).unwrap();
        assert_eq!(completed, ChangeEntry::new("feature", "foo", "From editor"));
        assert_eq!(prompter.calls.get(), 1);
    }

    #[test]
    fn test_complete_entry_keeps_values_when_prompt_blanks_them() {
        let prompter = FakePrompter::new(ChangeEntry::empty());
        let entry = ChangeEntry::new("feature", "", "Keep me");

        let completed = complete_entry(entry.clone(), &prompter).unwrap();
        assert_eq!(completed, entry);
    }

    #[test]
    fn test_parse_filled_in_form() {
        let prompter = EditorPrompter::new("true");
        let form = prompter.form(&ChangeEntry::new("feature", "parser", "Add slices"));

        assert_eq!(
            EntryFileParser::parse_contents(&form),
            ChangeEntry::new("feature", "parser", "Add slices")
        );
    }

    #[test]
    fn test_parse_contents_rules() {
        let contents = "\
# type: ignored
   type:   bugfix
category:cli
not a field
description: first
description: Split: on the first colon only

";
        assert_eq!(
            EntryFileParser::parse_contents(contents),
            ChangeEntry::new("bugfix", "cli", "Split: on the first colon only")
        );
    }

    #[test]
    fn test_parse_empty_contents() {
        assert_eq!(EntryFileParser::parse_contents(""), ChangeEntry::empty());
        assert_eq!(EntryFileParser::parse_contents("  \n\n"), ChangeEntry::empty());
    }

    #[test]
    fn test_form_lists_configured_types() {
        let prompter = EditorPrompter::new("true").with_types(&["fix".to_string(), "new".to_string()]);
        let form = prompter.form(&ChangeEntry::empty());
        assert!(form.starts_with("# Type should be one of: fix, new\n"));
        assert!(form.contains("\ntype: \n"));
    }

    #[test]
    fn test_select_editor_skips_blank_values() {
        let some = |s: &str| Some(s.to_string());
        assert_eq!(select_editor(some("nano"), some("vi")), "nano");
        assert_eq!(select_editor(some(""), some("vi")), "vi");
        assert_eq!(select_editor(some("  "), some("vi")), "vi");
        assert_eq!(select_editor(None, some("vi")), "vi");
        assert_eq!(select_editor(some(""), some("")), FALLBACK_EDITOR);
        assert_eq!(select_editor(None, None), FALLBACK_EDITOR);
    }

    #[test]
    fn test_editor_command_with_arguments() {
        let prompter = EditorPrompter::new("code --wait  --new-window");
        let (program, args) = prompter.command().unwrap();
        assert_eq!(program, "code");
        assert_eq!(args, vec!["--wait", "--new-window"]);

        assert!(matches!(EditorPrompter::new("   ").command(), Err(Error::Editor { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_editor_path_with_spaces() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempfile::TempDir::new().unwrap();
        let dir = temp.path().join("My Editors");
        std::fs::create_dir_all(&dir).unwrap();
        let script = dir.join("fill in");
        std::fs::write(
            &script,
            "#!/bin/sh\nprintf 'type: bugfix\\ncategory: cli\\ndescription: From script\\n' > \"$1\"\n",
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let prompter = EditorPrompter::new(script.to_string_lossy());
        let (program, args) = prompter.command().unwrap();
        assert_eq!(Path::new(program), script);
        assert!(args.is_empty());

        let answered = prompter.prompt(&ChangeEntry::empty()).unwrap();
        assert_eq!(answered, ChangeEntry::new("bugfix", "cli", "From script"));
    }

    #[cfg(unix)]
    #[test]
    fn test_editor_that_leaves_form_untouched() {
        let prompter = EditorPrompter::new("true");
        let answered = prompter
            .prompt(&ChangeEntry::new("feature", "foo", ""))
            .unwrap();
        assert_eq!(answered, ChangeEntry::new("feature", "foo", ""));
    }

    #[cfg(unix)]
    #[test]
    fn test_editor_failure() {
        let prompter = EditorPrompter::new("false");
        assert!(matches!(
            prompter.prompt(&ChangeEntry::empty()),
            Err(Error::Editor { .. })
        ));
    }

    #[test]
    fn test_missing_editor_binary() {
        let prompter = EditorPrompter::new("chlog-no-such-editor-binary");
        assert!(matches!(
            prompter.prompt(&ChangeEntry::empty()),
            Err(Error::Editor { .. })
        ));
    }
}
