//! Raw template files. Placeholders are `{{VAR}}`, see `RenderContext`.

pub const CARGO_TOML: &str = r#"[package]
name = "{{NAME_KEBAB}}"
version = "0.1.0"
edition = "2021"
authors = ["{{AUTHOR}} <{{EMAIL}}>"]
license = "{{LICENSE}}"
description = "{{DESCRIPTION}}"
readme = "README.md"

[lib]
name = "{{PACKAGE}}"
path = "src/lib.rs"

[[bin]]
name = "{{NAME_KEBAB}}"
path = "src/main.rs"

[dependencies]
anyhow = "1"
"#;

pub const README: &str = r#"# {{NAME}}

{{DESCRIPTION}}

## Usage

```sh
cargo run
```

## License

{{LICENSE}}
"#;

pub const LICENSE_MIT: &str = r#"MIT License

Copyright (c) {{YEAR}} {{AUTHOR}}

Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the "Software"), to deal
in the Software without restriction, including without limitation the rights
to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in all
copies or substantial portions of the Software.

THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
SOFTWARE.
"#;

pub const LICENSE_NOTICE: &str = r#"Copyright (c) {{YEAR}} {{AUTHOR}}

Licensed under {{LICENSE}}. See https://spdx.org/licenses/{{LICENSE}}.html
for the full license text.
"#;

pub const GITIGNORE: &str = "/target\n**/*.rs.bk\n";

pub const LIB_RS: &str = r#"//! {{DESCRIPTION}}

/// Greeting printed by the command-line entry point.
pub fn greeting() -> String {
    "Hello from {{NAME}}!".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greets() {
        assert!(greeting().contains("{{NAME}}"));
    }
}
"#;

pub const MAIN_RS: &str = r#"use anyhow::Result;

fn main() -> Result<()> {
    println!("{}", {{PACKAGE}}::greeting());
    Ok(())
}
"#;

pub const CLI_TEST_RS: &str = r#"use std::process::Command;

#[test]
fn prints_greeting() {
    let output = Command::new(env!("CARGO_BIN_EXE_{{NAME_KEBAB}}"))
        .output()
        .expect("binary runs");
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("{{NAME}}"));
}
"#;
