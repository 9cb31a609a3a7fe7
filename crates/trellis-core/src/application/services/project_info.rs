//! Reading what an existing project already knows about itself.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{
    application::{
        ApplicationError,
        ports::{ExtensionResolver, Filesystem},
    },
    domain::{MANIFEST_FILE, Manifest, ScaffoldOpts, split_author},
    error::TrellisResult,
};

pub fn manifest_path(project: &Path) -> PathBuf {
    project.join(MANIFEST_FILE)
}

pub fn read_manifest(fs: &dyn Filesystem, project: &Path) -> TrellisResult<Manifest> {
    let text = fs.read_to_string(&manifest_path(project))?;
    Ok(Manifest::parse(&text)?)
}

pub fn write_manifest(fs: &dyn Filesystem, project: &Path, manifest: &Manifest) -> TrellisResult<()> {
    fs.write_file(&manifest_path(project), &manifest.to_string())
}

/// Fill the options the caller left unset from the project's manifest.
///
/// Explicit options always win. Persisted extensions are resolved and
/// appended after the ones already enabled; names nobody provides fail with
/// [`ApplicationError::ExtensionNotFound`].
pub fn merge_persisted(
    fs: &dyn Filesystem,
    resolver: &dyn ExtensionResolver,
    mut opts: ScaffoldOpts,
) -> TrellisResult<ScaffoldOpts> {
    let manifest = read_manifest(fs, opts.project_path())?;

    fill(&mut opts.name, manifest.package_str("name"));
    fill(&mut opts.license, manifest.package_str("license"));
    fill(&mut opts.description, manifest.package_str("description"));
    fill(&mut opts.package, manifest.recorded_package());

    if let Some(first) = manifest.package_authors().first() {
        let (author, email) = split_author(first);
        fill(&mut opts.author, Some(author.as_str()));
        fill(&mut opts.email, email.as_deref());
    }

    for (key, value) in manifest.metadata_extras() {
        opts.set_default_extra(key, value);
    }

    let wanted: Vec<String> = manifest
        .persisted_extensions()
        .into_iter()
        .filter(|name| !opts.has_extension(name))
        .collect();
    if !wanted.is_empty() {
        let (found, missing) = resolver.resolve(&wanted);
        if !missing.is_empty() {
            return Err(ApplicationError::ExtensionNotFound { names: missing }.into());
        }
        debug!(extensions = ?wanted, "Re-enabling persisted extensions");
        opts.extensions.extend(found);
    }

    Ok(opts)
}

fn fill(slot: &mut Option<String>, persisted: Option<&str>) {
    if slot.is_none() {
        *slot = persisted.filter(|v| !v.is_empty()).map(str::to_string);
    }
}
