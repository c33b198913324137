//! Rendering of stored releases through Jinja-style templates.
//!
//! Templates receive a single `releases` variable: a list of
//! `(version, release)` pairs in descending version order, where each
//! release exposes `summary`, `schema_version` and `changes`.
//!
//! ```jinja
//! {% for release, changes in releases %}
//! {{ release }}
//! {{ release|underline }}
//! {% for change in changes.changes %}
//! * {{ change.type }}:{{ change.category }}:{{ change.description|bullet_indent }}
//! {% endfor %}
//! {% endfor %}
//! ```

use crate::entry::{ChangeEntry, ReleaseCollection};
use crate::error::{Error, Result};
use crate::version::Version;
use minijinja::{Environment, UndefinedBehavior, context};
use serde::Serialize;
use std::collections::BTreeMap;

/// Built-in template used when no named template is requested.
pub const DEFAULT_TEMPLATE: &str = "\
=========
CHANGELOG
=========

{% for release, changes in releases %}
{{ release }}
{{ release|underline }}
{%- if changes.summary %}
{{ changes.summary -}}
{% endif %}
{% for change in changes.changes %}
* {{ change.type }}:{{ change.category }}:{{ change.description|bullet_indent -}}
{% endfor %}
{% endfor %}

";

/// Continuation prefix for multi-line descriptions inside a bullet.
const BULLET_CONTINUATION: &str = "\n  ";

#[derive(Serialize)]
struct ReleaseView<'a> {
    summary: &'a str,
    schema_version: &'a str,
    changes: &'a [ChangeEntry],
}

impl<'a> From<&'a ReleaseCollection> for ReleaseView<'a> {
    fn from(collection: &'a ReleaseCollection) -> Self {
        Self {
            summary: &collection.summary,
            schema_version: &collection.schema_version,
            changes: &collection.changes,
        }
    }
}

/// Render every release through `template`, newest version first.
///
/// # Errors
///
/// Returns [`Error::Render`] if the template fails to compile or references
/// an undefined value. Nothing is returned on failure.
pub fn render(releases: &BTreeMap<Version, ReleaseCollection>, template: &str) -> Result<String> {
    let releases: Vec<(&Version, ReleaseView<'_>)> = releases
        .iter()
        .rev()
        .map(|(version, collection)| (version, ReleaseView::from(collection)))
        .collect();
    tracing::debug!(releases = releases.len(), "Rendering changelog");

    environment()
        .render_str(template, context! { releases => releases })
        .map_err(|e| Error::render(e.to_string(), Some(e)))
}

/// Render staged entries as bullets, without any version header.
#[must_use]
pub fn render_pending(collection: &ReleaseCollection) -> String {
    collection
        .changes
        .iter()
        .map(|entry| format!("{}\n", format_bullet(entry)))
        .collect()
}

/// Format one entry as `* type:category:description`.
#[must_use]
pub fn format_bullet(entry: &ChangeEntry) -> String {
    format!(
        "* {}:{}:{}",
        entry.kind,
        entry.category,
        bullet_indent(&entry.description)
    )
}

fn environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.add_filter("underline", underline);
    env.add_filter("bullet_indent", bullet_indent);
    env
}

fn underline(value: &str) -> String {
    "=".repeat(value.chars().count())
}

fn bullet_indent(value: &str) -> String {
    value.lines().collect::<Vec<_>>().join(BULLET_CONTINUATION)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn releases() -> BTreeMap<Version, ReleaseCollection> {
        let mut releases = BTreeMap::new();
        releases.insert(
            Version::new(0, 1, 0),
            ReleaseCollection::new(vec![ChangeEntry::new("feature", "foo", "bar")]),
        );
        releases.insert(
            Version::new(0, 2, 0),
            ReleaseCollection::new(vec![
                ChangeEntry::new("bugfix", "parser", "Fix slices"),
                ChangeEntry::new("enhancement", "lexer", "Faster\ntokenizing"),
            ])
            .with_summary("Parser fixes"),
        );
        releases.insert(
            Version::new(0, 10, 0),
            ReleaseCollection::new(vec![ChangeEntry::new("bugfix", "cli", "Exit codes")]),
        );
        releases
    }

    #[test]
    fn test_default_template() {
        let output = render(&releases(), DEFAULT_TEMPLATE).unwrap();

        assert!(output.starts_with("=========\nCHANGELOG\n=========\n"));
        assert!(output.contains("0.1.0\n=====\n\n* feature:foo:bar\n"));
        assert!(output.contains("0.10.0\n======\n\n* bugfix:cli:Exit codes\n"));
        assert!(output.contains(
            "0.2.0\n=====\nParser fixes\n\n* bugfix:parser:Fix slices\n* enhancement:lexer:Faster\n  tokenizing\n"
        ));
    }

    #[test]
    fn test_releases_render_newest_first() {
        let output = render(&releases(), "{% for release, r in releases %}{{ release }} {% endfor %}")
            .unwrap();
        assert_eq!(output, "0.10.0 0.2.0 0.1.0 ");
    }

    #[test]
    fn test_release_fields_are_exposed() {
        let mut releases = BTreeMap::new();
        let legacy = ReleaseCollection {
            changes: vec![ChangeEntry::new("bugfix", "foo", "bar")],
            schema_version: "0.1".to_string(),
            summary: String::new(),
        };
        releases.insert(Version::new(1, 0, 0), legacy);

        let template = "{% for release, r in releases %}{{ r.schema_version }}|{{ r.summary }}|{{ r.changes|length }}{% endfor %}";
        assert_eq!(render(&releases, template).unwrap(), "0.1||1");
    }

    #[test]
    fn test_empty_history_renders_banner() {
        let output = render(&BTreeMap::new(), DEFAULT_TEMPLATE).unwrap();
        assert!(output.starts_with("=========\nCHANGELOG\n=========\n"));
        assert!(!output.contains('*'));
    }

    #[test]
    fn test_undefined_field_is_an_error() {
        let result = render(&releases(), "{% for release, r in releases %}{{ r.missing }}{% endfor %}");
        assert!(matches!(result, Err(Error::Render { source: Some(_), .. })));
    }

    #[test]
    fn test_syntax_error_is_an_error() {
        let result = render(&releases(), "{% for release in %}");
        assert!(matches!(result, Err(Error::Render { .. })));
    }

    #[test]
    fn test_render_pending() {
        let collection = ReleaseCollection::new(vec![
            ChangeEntry::new("feature", "foo", "First line\nsecond line"),
            ChangeEntry::new("bugfix", "bar", "Fix"),
        ]);
        assert_eq!(
            render_pending(&collection),
            "* feature:foo:First line\n  second line\n* bugfix:bar:Fix\n"
        );
    }

    #[test]
    fn test_filters() {
        assert_eq!(underline("1.10.0"), "======");
        assert_eq!(bullet_indent("a\nb\nc"), "a\n  b\n  c");
        assert_eq!(bullet_indent("single"), "single");
    }
}
