//! Language tag inference from file names.

use serde::{Deserialize, Serialize};

/// Editor language tag, inferred from a file-name extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Javascript,
    Typescript,
    Python,
    Cpp,
    Html,
    Css,
    Json,
    Markdown,
}

impl Language {
    /// Map a lowercase extension to a language tag.
    pub fn from_extension(ext: &str) -> Option<Language> {
        match ext {
            "js" | "jsx" => Some(Language::Javascript),
            "ts" | "tsx" => Some(Language::Typescript),
            "py" => Some(Language::Python),
            "cpp" | "c" => Some(Language::Cpp),
            "html" => Some(Language::Html),
            "css" => Some(Language::Css),
            "json" => Some(Language::Json),
            "md" | "yml" | "yaml" => Some(Language::Markdown),
            _ => None,
        }
    }

    /// Infer the language tag for a display name like `src/main.py`.
    pub fn from_file_name(name: &str) -> Option<Language> {
        let ext = name.rsplit('.').next()?;
        if ext == name {
            return None; // no dot in the name
        }
        Language::from_extension(&ext.to_ascii_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_extensions_map_to_languages() {
        assert_eq!(Language::from_file_name("app.tsx"), Some(Language::Typescript));
        assert_eq!(Language::from_file_name("main.PY"), Some(Language::Python));
        assert_eq!(Language::from_file_name("deploy.yaml"), Some(Language::Markdown));
    }

    #[test]
    fn unknown_or_missing_extension_has_no_tag() {
        assert_eq!(Language::from_file_name("Dockerfile"), None);
        assert_eq!(Language::from_file_name("lib.rs"), None);
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&Language::Javascript).unwrap();
        assert_eq!(json, "\"javascript\"");
    }
}
