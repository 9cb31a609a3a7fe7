//! `trellis extensions`: show what can be enabled on `trellis new`.

use serde::Serialize;
use trellis_adapters::ExtensionRegistry;
use trellis_core::{application::ExtensionResolver, domain::ExtensionHandle};

use crate::{
    cli::{ExtensionsArgs, ListFormat},
    error::CliResult,
    output::OutputManager,
};

#[derive(Debug, Serialize, PartialEq)]
struct ExtensionRow {
    name: String,
    flag: String,
    description: String,
    persisted: bool,
}

impl From<&ExtensionHandle> for ExtensionRow {
    fn from(ext: &ExtensionHandle) -> Self {
        Self {
            name: ext.name().to_string(),
            flag: format!("--{}", ext.name()),
            description: ext.description().to_string(),
            persisted: ext.persist(),
        }
    }
}

pub fn execute(args: ExtensionsArgs, output: OutputManager) -> CliResult<()> {
    let rows: Vec<ExtensionRow> = ExtensionRegistry::builtin()
        .available()
        .iter()
        .map(ExtensionRow::from)
        .collect();

    match args.format {
        ListFormat::Json => output.json(&rows)?,
        ListFormat::List => {
            for row in &rows {
                output.print(&row.name)?;
            }
        }
        ListFormat::Table => {
            output.header("Available extensions:")?;
            let width = rows.iter().map(|r| r.flag.len()).max().unwrap_or(0);
            for row in &rows {
                let note = if row.persisted { "" } else { " (not recorded)" };
                output.print(&format!(
                    "  {:<width$}  {}{note}",
                    row.flag, row.description
                ))?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_follow_registry_order() {
        let rows: Vec<ExtensionRow> = ExtensionRegistry::builtin()
            .available()
            .iter()
            .map(ExtensionRow::from)
            .collect();
        let flags: Vec<&str> = rows.iter().map(|r| r.flag.as_str()).collect();
        assert_eq!(flags, ["--no-cli", "--github-actions", "--no-readme"]);
        assert!(!rows[2].persisted);
    }
}
