use core::fmt;

use thiserror::Error;

/// Error reported for name literals that do not follow Clark notation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("unterminated namespace in name literal '{0}'")]
    UnterminatedNamespace(String),
    #[error("empty local part in name literal '{0}'")]
    EmptyLocalPart(String),
}

/// A tag name split into namespace URI and local part.
///
/// The lexical form is Clark notation: `{uri}local` for namespaced names,
/// a bare `local` otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    pub ns_uri: Option<String>,
    pub local: String,
}

impl QualifiedName {
    pub fn new(ns_uri: Option<String>, local: impl Into<String>) -> Self {
        Self { ns_uri, local: local.into() }
    }

    /// Parses a Clark-notation literal.
    pub fn parse(tag: &str) -> Result<Self, NameError> {
        if let Some(rest) = tag.strip_prefix('{') {
            match rest.split_once('}') {
                Some((uri, local)) if !local.is_empty() => {
                    Ok(Self::new(Some(uri.to_string()), local))
                }
                Some(_) => Err(NameError::EmptyLocalPart(tag.to_string())),
                None => Err(NameError::UnterminatedNamespace(tag.to_string())),
            }
        } else if tag.is_empty() {
            Err(NameError::EmptyLocalPart(tag.to_string()))
        } else {
            Ok(Self::new(None, tag))
        }
    }

    /// Namespace URI embedded in a Clark-notation literal, `""` when the
    /// literal is unqualified or malformed.
    pub fn namespace_of(tag: &str) -> &str {
        match tag.strip_prefix('{').and_then(|rest| rest.split_once('}')) {
            Some((uri, _)) => uri,
            None => "",
        }
    }

    /// Qualifies `local` with `ns_uri` in Clark notation. An empty URI
    /// leaves the name bare.
    pub fn qualified(ns_uri: &str, local: &str) -> String {
        if ns_uri.is_empty() {
            local.to_string()
        } else {
            format!("{{{ns_uri}}}{local}")
        }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.ns_uri {
            Some(uri) => write!(f, "{{{uri}}}{}", self.local),
            None => f.write_str(&self.local),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("element", None, "element")]
    #[case("{urn:example}element", Some("urn:example"), "element")]
    #[case("{http://www.w3.org/2001/XMLSchema}string", Some("http://www.w3.org/2001/XMLSchema"), "string")]
    fn parse_cases(#[case] literal: &str, #[case] ns_uri: Option<&str>, #[case] local: &str) {
        let name = QualifiedName::parse(literal).unwrap();
        assert_eq!(name.ns_uri.as_deref(), ns_uri);
        assert_eq!(name.local, local);
        assert_eq!(name.to_string(), literal);
    }

    #[rstest]
    #[case("{urn:example")]
    #[case("{urn:example}")]
    #[case("")]
    fn parse_rejects_malformed(#[case] literal: &str) {
        assert!(QualifiedName::parse(literal).is_err());
    }

    #[rstest]
    fn namespace_extraction() {
        assert_eq!(QualifiedName::namespace_of("{urn:a}x"), "urn:a");
        assert_eq!(QualifiedName::namespace_of("x"), "");
        assert_eq!(QualifiedName::qualified("urn:a", "x"), "{urn:a}x");
        assert_eq!(QualifiedName::qualified("", "x"), "x");
    }
}
