use chlog_core::{ChangeEntry, ChangeStore, EditorPrompter, record_entry};

/// Execute the `new-change` command.
///
/// Missing fields are filled in through the user's editor before the entry
/// is validated and staged.
///
/// # Errors
///
/// Returns a validation error if the completed entry is invalid, or an
/// editor, configuration or storage error.
pub fn execute_new_change(store: &ChangeStore, entry: ChangeEntry) -> chlog_core::Result<String> {
    let config = store.load_config()?;
    let schema = config.schema();
    let prompter = EditorPrompter::from_env().with_types(&schema.types);

    let path = record_entry(store, entry, &schema, &prompter)?;
    let path = path.display();
    Ok(format!(
        "The change has been written to: {path}\n\
         You can add it to your commit by running:\n\n\
         git add {path}\n"
    ))
}
