use chlog_core::{BumpType, ChangeStore, ReleaseRequest, Version, cut_release};

/// Execute the `new-release` command.
///
/// # Errors
///
/// Returns an error if nothing is pending, the version was already released,
/// or the release cannot be written.
pub fn execute_new_release(
    store: &ChangeStore,
    version: Option<Version>,
    bump: Option<BumpType>,
    summary: Option<String>,
) -> chlog_core::Result<String> {
    let path = cut_release(
        store,
        ReleaseRequest {
            version,
            bump,
            summary,
        },
    )?;
    Ok(format!("New release file written: {}\n", path.display()))
}
