//! Email template loading with `{{placeholder}}` substitution.

use std::fs;
use std::path::PathBuf;

/// Template loading failures. Callers substitute a fallback body rather
/// than dropping the email.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("Failed to read template '{name}': {source}")]
    Read {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// Loads named HTML templates from a directory and fills placeholders.
#[derive(Debug, Clone)]
pub struct TemplateStore {
    dir: PathBuf,
}

impl TemplateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Renders `<dir>/<name>.html`, replacing every `{{key}}` occurrence
    /// for each provided key. Values are substituted verbatim; placeholders
    /// with no matching key render as empty string, never as the literal
    /// token.
    pub fn render(&self, name: &str, data: &[(&str, &str)]) -> Result<String, TemplateError> {
        let path = self.dir.join(format!("{}.html", name));
        let mut template = fs::read_to_string(&path).map_err(|source| TemplateError::Read {
            name: name.to_string(),
            source,
        })?;

        for (key, value) in data {
            let placeholder = format!("{{{{{}}}}}", key);
            template = template.replace(&placeholder, value);
        }

        Ok(strip_unmatched(&template))
    }
}

/// Erases any `{{...}}` tokens left after substitution
fn strip_unmatched(template: &str) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        match rest[start..].find("}}") {
            Some(end) => {
                out.push_str(&rest[..start]);
                rest = &rest[start + end + 2..];
            }
            None => break,
        }
    }
    out.push_str(rest);

    out
}
