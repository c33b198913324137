use chlog_core::ChangeStore;

/// Execute the `init` command.
///
/// # Errors
///
/// Returns an error if the change directory cannot be created.
pub fn execute_init(store: &ChangeStore) -> chlog_core::Result<String> {
    let path = store.change_dir().display();
    if store.init()? {
        Ok(format!("Initialized change directory: {path}\n"))
    } else {
        Ok(format!("Change directory already exists: {path}\n"))
    }
}
