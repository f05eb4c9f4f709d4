//! Renders the RPM spec file of one resolved module.

use std::collections::BTreeSet;

use handlebars::{no_escape, Handlebars};
use serde::Serialize;
use thiserror::Error;

use crate::{
    archive::METADATA_FILE_NAME,
    model::{
        metadata::ModuleMetadata,
        resolved::{package_display_name, ResolvedRelease},
        Requirement,
    },
};

const TEMPLATE_NAME: &str = "module.spec";
const TEMPLATE: &str = include_str!("../templates/module.spec.hbs");

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Invalid spec template: {0}")]
    Template(#[from] handlebars::TemplateError),
    #[error("Could not render the spec file of {package}: {source}")]
    Render {
        package: String,
        #[source]
        source: handlebars::RenderError,
    },
}

/// Everything the spec template needs, already flattened and ordered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpecVariables {
    pub package_display_name: String,
    pub module_short_name: String,
    pub version: String,
    pub release: String,
    pub source_filename: String,
    pub build_directory_name: String,
    pub license: String,
    pub summary: String,
    pub description: String,
    /// `Requires:` values, sorted byte-wise.
    pub requires: Vec<String>,
    /// Installed files relative to the module directory, sorted byte-wise.
    pub files: Vec<String>,
}

impl SpecVariables {
    pub fn new(resolved: &ResolvedRelease, metadata: &ModuleMetadata) -> Self {
        let mut requires: Vec<String> = metadata.dependencies.iter().map(requires_entry).collect();
        requires.sort();

        let files: BTreeSet<&str> = std::iter::once(METADATA_FILE_NAME)
            .chain(metadata.checksums.keys().map(String::as_str))
            .collect();

        let mut build_directory_name = format!("{}-{}", metadata.full_name(), resolved.version);
        if let Some(release) = &resolved.release {
            build_directory_name.push('-');
            build_directory_name.push_str(release);
        }

        SpecVariables {
            package_display_name: resolved.package_display_name(),
            module_short_name: metadata.short_name(),
            version: resolved.version.clone(),
            release: resolved.release_or_default().to_owned(),
            source_filename: resolved.local_filename.clone(),
            build_directory_name,
            license: metadata.license.clone(),
            summary: metadata.summary.clone(),
            description: metadata.description.clone(),
            requires,
            files: files.into_iter().map(str::to_owned).collect(),
        }
    }
}

fn requires_entry(requirement: &Requirement) -> String {
    let package = package_display_name(&requirement.name);
    match &requirement.version_requirement {
        Some(version) => format!("{} {}", package, version),
        None => package,
    }
}

/// Spec file renderer backed by the bundled template.
pub struct SpecRenderer {
    handlebars: Handlebars<'static>,
}

impl SpecRenderer {
    pub fn new() -> Result<SpecRenderer, RenderError> {
        Self::with_template(TEMPLATE)
    }

    pub fn with_template(template: &str) -> Result<SpecRenderer, RenderError> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(true);
        handlebars.register_escape_fn(no_escape);
        handlebars.register_template_string(TEMPLATE_NAME, template)?;
        Ok(SpecRenderer { handlebars })
    }

    pub fn render(
        &self,
        resolved: &ResolvedRelease,
        metadata: &ModuleMetadata,
    ) -> Result<String, RenderError> {
        self.render_variables(&SpecVariables::new(resolved, metadata))
    }

    pub fn render_variables(&self, variables: &SpecVariables) -> Result<String, RenderError> {
        self.handlebars
            .render(TEMPLATE_NAME, variables)
            .map_err(|source| RenderError::Render {
                package: variables.package_display_name.clone(),
                source,
            })
    }
}
