use log::{info, warn};

use crate::{
    fetch::{self, PackageOutcome, Workspace},
    model::release::SearchHit,
    registry::{self, Registry},
    rpmbuild::{BuildMode, RpmBuild},
};
use std::error::Error;

/// Handler to search command
pub fn do_search<R: Registry + ?Sized>(registry: &R, term: &str) -> Result<(), Box<dyn Error>> {
    let hits = registry::search(registry, term)?;
    if hits.is_empty() {
        println!("No modules found for \"{}\"", term);
    } else {
        print!("{}", format_search_table(&hits));
    }
    Ok(())
}

/// Handler to create command
pub fn do_create<R: Registry + ?Sized>(
    registry: &R,
    workspace: &Workspace,
    build: &RpmBuild,
    package: &str,
    version: Option<&str>,
    mode: BuildMode,
) -> Result<Vec<PackageOutcome>, Box<dyn Error>> {
    let outcomes = fetch::create(registry, workspace, package, version, build, mode)?;

    info!(
        "Wrote {} spec files to {}",
        outcomes.len(),
        workspace.specs_dir().display()
    );
    let failed: Vec<&str> = outcomes
        .iter()
        .filter(|outcome| outcome.build_error.is_some())
        .map(|outcome| outcome.package.as_str())
        .collect();
    if !failed.is_empty() {
        warn!("Build failed for {}", failed.join(", "));
    }

    Ok(outcomes)
}

/// Two left aligned columns: module name and description.
pub fn format_search_table(hits: &[SearchHit]) -> String {
    let width = hits
        .iter()
        .map(|hit| hit.full_name.chars().count())
        .max()
        .unwrap_or(0);

    hits.iter()
        .map(|hit| {
            let row = format!("{:<width$}  {}", hit.full_name, hit.description);
            format!("{}\n", row.trim_end())
        })
        .collect()
}
