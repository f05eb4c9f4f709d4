use std::path::{Path, PathBuf};

use log::{debug, error, info};
use thiserror::Error;

use crate::{
    archive::{self, ExtractError},
    model::resolved::ResolvedRelease,
    registry::{Registry, TransportError},
    resolver::{self, ResolveError},
    rpmbuild::{BuildMode, BuildToolError, RpmBuild},
    specfile::{RenderError, SpecRenderer},
};

const SOURCES_DIRECTORY_NAME: &str = "SOURCES";
const SPECS_DIRECTORY_NAME: &str = "SPECS";
const WORKSPACE_DIRECTORY_NAMES: [&str; 5] = [
    "BUILD",
    "RPMS",
    SOURCES_DIRECTORY_NAME,
    SPECS_DIRECTORY_NAME,
    "SRPMS",
];

#[derive(Error, Debug)]
pub enum CreateError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error("Error while downloading {package}: {source}")]
    Download {
        package: String,
        #[source]
        source: TransportError,
    },
    #[error(transparent)]
    Extract(#[from] ExtractError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("IO error on {path}: {source}")]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CreateError {
    fn filesystem(path: &Path) -> impl FnOnce(std::io::Error) -> CreateError + '_ {
        move |source| CreateError::Filesystem {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// An rpmbuild top directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Workspace { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn sources_dir(&self) -> PathBuf {
        self.root.join(SOURCES_DIRECTORY_NAME)
    }

    pub fn specs_dir(&self) -> PathBuf {
        self.root.join(SPECS_DIRECTORY_NAME)
    }

    pub fn tarball_path(&self, release: &ResolvedRelease) -> PathBuf {
        self.sources_dir().join(&release.local_filename)
    }

    pub fn spec_path(&self, release: &ResolvedRelease) -> PathBuf {
        self.specs_dir()
            .join(format!("{}.spec", release.package_display_name()))
    }

    pub fn create_dirs(&self) -> Result<(), CreateError> {
        for name in WORKSPACE_DIRECTORY_NAMES {
            let path = self.root.join(name);
            if !path.is_dir() {
                debug!("Creating {}", path.display());
                std::fs::create_dir_all(&path).map_err(CreateError::filesystem(&path))?;
            }
        }
        Ok(())
    }
}

/// What happened to one module of a `create` run.
#[derive(Debug)]
pub struct PackageOutcome {
    pub package: String,
    pub spec_path: PathBuf,
    /// Set when the native build was requested and failed.
    pub build_error: Option<BuildToolError>,
}

/// Downloads the tarball of `release` unless a file with its name is already
/// in the workspace. Existing files are trusted as they are.
pub fn ensure_tarball<R: Registry + ?Sized>(
    registry: &R,
    workspace: &Workspace,
    release: &ResolvedRelease,
) -> Result<PathBuf, CreateError> {
    let path = workspace.tarball_path(release);
    if path.exists() {
        debug!(
            "Skipping download of {}. Already in {}",
            release.package_name,
            path.display()
        );
        return Ok(path);
    }

    let data = registry
        .fetch_bytes(&release.download_url)
        .map_err(|source| CreateError::Download {
            package: release.package_name.clone(),
            source,
        })?;
    std::fs::write(&path, data).map_err(CreateError::filesystem(&path))?;
    info!("Downloaded {}", path.display());
    Ok(path)
}

/// Reads the module metadata out of the downloaded tarball and writes the
/// spec file of `release`.
pub fn write_spec(
    workspace: &Workspace,
    renderer: &SpecRenderer,
    release: &ResolvedRelease,
) -> Result<PathBuf, CreateError> {
    let tarball = workspace.tarball_path(release);
    let data = std::fs::read(&tarball).map_err(CreateError::filesystem(&tarball))?;
    let metadata = archive::extract(&release.local_filename, &data)?;
    let text = renderer.render(release, &metadata)?;

    let path = workspace.spec_path(release);
    std::fs::write(&path, text).map_err(CreateError::filesystem(&path))?;
    info!("Wrote {}", path.display());
    Ok(path)
}

/// Resolves `module`, then downloads, renders and optionally builds every
/// module of its dependency graph.
///
/// Any error before the build step ends the run. Files written up to that
/// point are left in place. Build failures are only recorded in the
/// returned outcomes.
pub fn create<R: Registry + ?Sized>(
    registry: &R,
    workspace: &Workspace,
    module: &str,
    version: Option<&str>,
    build: &RpmBuild,
    mode: BuildMode,
) -> Result<Vec<PackageOutcome>, CreateError> {
    workspace.create_dirs()?;

    let resolved = resolver::resolve(registry, module, version)?;
    let renderer = SpecRenderer::new()?;

    info!("Generating spec files for {} modules...", resolved.len());
    let mut outcomes = Vec::with_capacity(resolved.len());
    for release in resolved {
        ensure_tarball(registry, workspace, &release)?;
        let spec_path = write_spec(workspace, &renderer, &release)?;

        let build_error = build.invoke(&spec_path, mode).err();
        if let Some(err) = &build_error {
            error!("{err}");
        }

        outcomes.push(PackageOutcome {
            package: release.package_name,
            spec_path,
            build_error,
        });
    }

    Ok(outcomes)
}
