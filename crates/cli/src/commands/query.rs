use chlog_core::{ChangeStore, Query, render_pending, run_query};

/// Execute the `query` command.
///
/// # Errors
///
/// Returns [`chlog_core::Error::NoChangesFound`] for pending queries when
/// nothing is staged, or a storage error.
pub fn execute_query(store: &ChangeStore, query: Query) -> chlog_core::Result<String> {
    run_query(store, query).map(|answer| format!("{answer}\n"))
}

/// Execute the `pending` command.
///
/// # Errors
///
/// Returns [`chlog_core::Error::NoChangesFound`] when nothing is staged.
pub fn execute_pending(store: &ChangeStore) -> chlog_core::Result<String> {
    let pending = store.load_pending()?;
    Ok(render_pending(&pending))
}
