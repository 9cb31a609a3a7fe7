//! Writing a project tree to disk.

use std::path::Path;

use tracing::{debug, info};

use crate::{
    application::ports::Filesystem,
    domain::{FileContent, FileOp, Node, ScaffoldOpts, Structure},
    error::TrellisResult,
};

/// What happened (or would happen) to one path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Created,
    Overwritten,
    Skipped,
    Removed,
}

impl Outcome {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "create",
            Self::Overwritten => "updated",
            Self::Skipped => "skip",
            Self::Removed => "remove",
        }
    }
}

/// Materialize `structure` under `opts.project_path`, honouring each leaf's
/// [`FileOp`]. Under `pretend` the same decisions are logged but nothing is
/// written.
pub fn materialize(
    fs: &dyn Filesystem,
    structure: &Structure,
    opts: &ScaffoldOpts,
) -> TrellisResult<Vec<(std::path::PathBuf, Outcome)>> {
    let root = opts.project_path();
    if !opts.pretend {
        fs.create_dir_all(root)?;
    }
    let mut report = Vec::new();
    walk(fs, root, structure, opts, &mut report)?;
    Ok(report)
}

fn walk(
    fs: &dyn Filesystem,
    dir: &Path,
    structure: &Structure,
    opts: &ScaffoldOpts,
    report: &mut Vec<(std::path::PathBuf, Outcome)>,
) -> TrellisResult<()> {
    for (name, node) in structure.entries() {
        let path = dir.join(name);
        match node {
            Node::Dir(sub) => {
                if !opts.pretend {
                    fs.create_dir_all(&path)?;
                }
                walk(fs, &path, sub, opts, report)?;
            }
            Node::File(None) => {
                debug!(path = %path.display(), "No content, skipping");
            }
            Node::File(Some(content)) => {
                let outcome = write_leaf(fs, &path, content, opts)?;
                info!(
                    action = outcome.as_str(),
                    path = %path.display(),
                    pretend = opts.pretend
                );
                report.push((path, outcome));
            }
        }
    }
    Ok(())
}

fn write_leaf(
    fs: &dyn Filesystem,
    path: &Path,
    content: &FileContent,
    opts: &ScaffoldOpts,
) -> TrellisResult<Outcome> {
    let exists = fs.exists(path);

    let outcome = match content.op() {
        FileOp::Remove if exists => Outcome::Removed,
        FileOp::Remove => Outcome::Skipped,
        FileOp::NoOverwrite if exists => Outcome::Skipped,
        FileOp::SkipOnUpdate if opts.update => Outcome::Skipped,
        _ if exists => Outcome::Overwritten,
        _ => Outcome::Created,
    };

    if opts.pretend {
        return Ok(outcome);
    }

    match outcome {
        Outcome::Removed => fs.remove_file(path)?,
        Outcome::Created | Outcome::Overwritten => fs.write_file(path, content.text())?,
        Outcome::Skipped => {}
    }
    Ok(outcome)
}
