use crate::domain::{error::DomainError, options::ScaffoldOpts};

const RESERVED_WORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move",
    "mut", "pub", "ref", "return", "self", "static", "struct", "super", "trait", "true", "type",
    "unsafe", "use", "where", "while", "abstract", "become", "box", "do", "final", "macro",
    "override", "priv", "try", "typeof", "unsized", "virtual", "yield", "test", "core", "std",
];

/// Centralized domain validation.
///
/// All validation logic lives here, not scattered across actions.
pub struct DomainValidator;

impl DomainValidator {
    /// Options must carry a non-empty name and a usable package identifier.
    pub fn validate_options(opts: &ScaffoldOpts) -> Result<(), DomainError> {
        let name = opts.required_name()?;
        if name.trim().is_empty() {
            return Err(DomainError::MissingRequiredField { field: "name" });
        }
        Self::validate_package(opts.required_package()?)
    }

    /// `[a-zA-Z_][a-zA-Z0-9_]*`, not a keyword, not a lone underscore.
    pub fn validate_package(package: &str) -> Result<(), DomainError> {
        let invalid = || DomainError::InvalidIdentifier {
            identifier: package.to_string(),
            what: "package name",
        };

        let mut chars = package.chars();
        let Some(first) = chars.next() else {
            return Err(invalid());
        };
        if !(first.is_ascii_alphabetic() || first == '_') {
            return Err(invalid());
        }
        if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(invalid());
        }
        if package == "_" || RESERVED_WORDS.contains(&package) {
            return Err(invalid());
        }
        Ok(())
    }
}
