//! Go-style `{{.nameID}}` placeholders for service-name templates.

use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};

use crate::errors::{Error, Result};

/// Variable made available to `service_name_id_template`.
pub const NAME_ID_VAR: &str = "nameID";

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{\s*\.([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("placeholder pattern is valid")
});

/// Render `template`, substituting `{{.nameID}}` with `name_id`.
pub fn render_name_template(template: &str, name_id: &str) -> Result<String> {
    if let Some(unknown) = PLACEHOLDER
        .captures_iter(template)
        .map(|caps| caps[1].to_string())
        .find(|var| var != NAME_ID_VAR)
    {
        return Err(Error::Template(format!(
            "unknown variable '.{}' in template '{}'",
            unknown, template
        )));
    }

    let rendered = PLACEHOLDER.replace_all(template, NoExpand(name_id)).into_owned();
    let residue = PLACEHOLDER.replace_all(template, "");
    if residue.contains("{{") || residue.contains("}}") {
        return Err(Error::Template(format!(
            "unbalanced action in template '{}'",
            template
        )));
    }
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_placeholder() {
        assert_eq!(
            render_name_template("{{.nameID}}-prod", "petstore").unwrap(),
            "petstore-prod"
        );
        assert_eq!(
            render_name_template("svc/{{ .nameID }}/{{.nameID}}", "pets").unwrap(),
            "svc/pets/pets"
        );
    }

    #[test]
    fn test_name_is_substituted_literally() {
        assert_eq!(
            render_name_template("{{.nameID}}-prod", "pay$1ment").unwrap(),
            "pay$1ment-prod"
        );
        assert_eq!(
            render_name_template("{{.nameID}}", "${0}").unwrap(),
            "${0}"
        );
    }

    #[test]
    fn test_plain_text_passes_through() {
        assert_eq!(render_name_template("static", "pets").unwrap(), "static");
    }

    #[test]
    fn test_unknown_variable_is_error() {
        let err = render_name_template("{{.env}}-{{.nameID}}", "pets").unwrap_err();
        assert!(matches!(err, Error::Template(_)));
    }

    #[test]
    fn test_unbalanced_braces_is_error() {
        assert!(render_name_template("{{.nameID}", "pets").is_err());
        assert!(render_name_template("{{nameID}}", "pets").is_err());
    }
}
