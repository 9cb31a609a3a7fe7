//! `{{VAR}}` substitution for template files.
//!
//! | Variable        | Example            |
//! |-----------------|--------------------|
//! | `NAME`          | "My Tool"          |
//! | `NAME_SNAKE`    | "my_tool"          |
//! | `NAME_KEBAB`    | "my-tool"          |
//! | `NAME_PASCAL`   | "MyTool"           |
//! | `PACKAGE`       | "my_tool"          |
//! | `AUTHOR`        | "Jane Doe"         |
//! | `EMAIL`         | "jane@example.com" |
//! | `LICENSE`       | "MIT"              |
//! | `DESCRIPTION`   | free text          |
//! | `TOOL_VERSION`  | "1.0.0"            |
//!
//! `YEAR` is supplied by whoever knows the clock (see the template adapter).

use std::collections::BTreeMap;

use crate::domain::options::ScaffoldOpts;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderContext {
    variables: BTreeMap<String, String>,
}

impl RenderContext {
    /// Context carrying the naming variables derived from `name`.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::default()
            .with_variable("NAME_SNAKE", to_snake_case(&name))
            .with_variable("NAME_KEBAB", to_kebab_case(&name))
            .with_variable("NAME_PASCAL", to_pascal_case(&name))
            .with_variable("NAME", name)
    }

    /// Context for every well-known option that is set.
    pub fn from_opts(opts: &ScaffoldOpts) -> Self {
        let mut ctx = Self::new(opts.name.clone().unwrap_or_default());
        let fields = [
            ("PACKAGE", &opts.package),
            ("AUTHOR", &opts.author),
            ("EMAIL", &opts.email),
            ("LICENSE", &opts.license),
            ("DESCRIPTION", &opts.description),
        ];
        for (key, field) in fields {
            if let Some(v) = field {
                ctx = ctx.with_variable(key, v.clone());
            }
        }
        if let Some(version) = &opts.version {
            ctx = ctx.with_variable("TOOL_VERSION", version.to_string());
        }
        ctx
    }

    pub fn with_variable(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(String::as_str)
    }

    /// Replace every known `{{KEY}}`; unknown placeholders stay as they are.
    pub fn render(&self, template: &str) -> String {
        let mut result = template.to_string();
        for (key, value) in &self.variables {
            let placeholder = format!("{{{{{key}}}}}");
            result = result.replace(&placeholder, value);
        }
        result
    }
}

// ── Case conversion ─────────────────────────────────────────────────────────

/// `"MyTool"`, `"my-tool"` and `"my tool"` all become `"my_tool"`.
pub fn to_snake_case(s: &str) -> String {
    split_words(s).join("_")
}

pub fn to_kebab_case(s: &str) -> String {
    split_words(s).join("-")
}

pub fn to_pascal_case(s: &str) -> String {
    split_words(s)
        .into_iter()
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Split on `_`, `-`, whitespace, camelCase transitions and acronym
/// boundaries (`HTTPServer` -> `http`, `server`).
fn split_words(input: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '_' || c == '-' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(current.to_lowercase());
                current.clear();
            }
            continue;
        }

        current.push(c);

        if let Some(&next) = chars.peek() {
            let camel = c.is_lowercase() && next.is_uppercase();
            let acronym = c.is_uppercase()
                && next.is_uppercase()
                && chars.clone().nth(1).is_some_and(char::is_lowercase);
            if camel || acronym {
                words.push(current.to_lowercase());
                current.clear();
            }
        }
    }

    if !current.is_empty() {
        words.push(current.to_lowercase());
    }

    words
}
