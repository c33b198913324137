use chlog_core::{ChangeStore, DEFAULT_TEMPLATE, render};

/// Execute the `render` command.
///
/// The template is the one named on the command line, else the one named in
/// `config.toml`, else the built-in template.
///
/// # Errors
///
/// Returns an error if a template name is not a plain file name or names a
/// missing template, if a release cannot be loaded, or if rendering fails.
pub fn execute_render(store: &ChangeStore, template: Option<&str>) -> chlog_core::Result<String> {
    let config = store.load_config()?;
    let source = match template.or(config.render.template.as_deref()) {
        Some(name) => store.load_template(name)?,
        None => DEFAULT_TEMPLATE.to_string(),
    };

    render(&store.load_all_releases()?, &source)
}
