use std::{cell::RefCell, collections::HashMap, rc::Rc};

use flate2::{write::GzEncoder, Compression};
use forge2rpm::{
    registry::{Registry, TransportError},
    rpmbuild::BuildMode,
    Forge2Rpm,
};
use serde_json::json;
use tar::{Builder, Header};

use pretty_assertions::assert_eq;

#[derive(Clone, Default)]
struct StaticForge {
    releases: serde_json::Value,
    tarballs: HashMap<String, Vec<u8>>,
    downloads: Rc<RefCell<Vec<String>>>,
}

impl Registry for StaticForge {
    fn query(
        &self,
        endpoint: &str,
        _params: &[(&str, &str)],
    ) -> Result<serde_json::Value, TransportError> {
        match endpoint {
            "api/v1/releases.json" => Ok(self.releases.clone()),
            _ => Err(TransportError::Request {
                url: endpoint.to_owned(),
                status: "404 Not Found".to_owned(),
            }),
        }
    }

    fn fetch_bytes(&self, path: &str) -> Result<Vec<u8>, TransportError> {
        self.downloads.borrow_mut().push(path.to_owned());
        self.tarballs
            .get(path)
            .cloned()
            .ok_or_else(|| TransportError::Request {
                url: path.to_owned(),
                status: "404 Not Found".to_owned(),
            })
    }
}

fn tarball(root: &str, metadata: &serde_json::Value) -> Vec<u8> {
    let content = serde_json::to_vec(metadata).unwrap();
    let mut header = Header::new_gnu();
    header.set_size(content.len() as u64);
    header.set_mode(0o644);
    let mut builder = Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
    builder
        .append_data(&mut header, format!("{root}/metadata.json"), content.as_slice())
        .unwrap();
    builder.into_inner().unwrap().finish().unwrap()
}

fn forge() -> StaticForge {
    let a = json!({
        "name": "example-a",
        "author": "example",
        "version": "1.0.0",
        "license": "MIT",
        "summary": "Module a",
        "description": "The a module.",
        "dependencies": [],
        "checksums": {"manifests/init.pp": "0"}
    });
    let b = json!({
        "name": "example-b",
        "author": "example",
        "version": "2.1.0",
        "license": "MIT",
        "summary": "Module b",
        "description": "The b module.",
        "dependencies": [{"name": "example/a", "version_requirement": ">=1.0.0"}],
        "checksums": {"manifests/init.pp": "1", "files/b.conf": "2"}
    });

    StaticForge {
        releases: json!({
            "example/a": [{"version": "1.0.0", "file": "/releases/example-a-1.0.0.tar.gz", "dependencies": []}],
            "example/b": [
                {"version": "2.0.0", "file": "/releases/example-b-2.0.0.tar.gz", "dependencies": []},
                {
                    "version": "2.1.0-3",
                    "file": "/releases/example-b-2.1.0.tar.gz",
                    "dependencies": [{"name": "example/a", "version_requirement": ">=1.0.0"}]
                }
            ]
        }),
        tarballs: HashMap::from([
            (
                "example/a/1.0.0.tar.gz".to_owned(),
                tarball("example-a-1.0.0", &a),
            ),
            (
                "example/b/2.1.0-3.tar.gz".to_owned(),
                tarball("example-b-2.1.0-3", &b),
            ),
        ]),
        downloads: Rc::default(),
    }
}

#[test]
fn create_module_with_dependency() {
    let dir = tempfile::tempdir().unwrap();
    let forge = forge();
    let forge2rpm = Forge2Rpm::builder()
        .workspace(dir.path())
        .registry(forge.clone())
        .try_build()
        .unwrap();

    let outcomes = forge2rpm.create("example/b", None, BuildMode::None).unwrap();

    assert_eq!(
        outcomes
            .iter()
            .map(|outcome| outcome.package.as_str())
            .collect::<Vec<_>>(),
        vec!["example/a", "example/b"]
    );

    let spec = std::fs::read_to_string(dir.path().join("SPECS/puppet-example-b.spec")).unwrap();
    assert!(spec.contains("%define module_name b\n"));
    assert!(spec.contains("%define module_version 2.1.0\n"));
    assert!(spec.contains("%define module_release 3\n"));
    assert!(spec.contains("\nRequires: puppet-example-a >=1.0.0\n"));
    assert!(spec.contains("\n%setup -q -n example-b-2.1.0-3\n"));
    let files: Vec<&str> = spec
        .lines()
        .filter(|line| line.starts_with("%{module_dir}/"))
        .collect();
    assert_eq!(
        files,
        vec![
            "%{module_dir}/files/b.conf",
            "%{module_dir}/manifests/init.pp",
            "%{module_dir}/metadata.json",
        ]
    );

    let spec = std::fs::read_to_string(dir.path().join("SPECS/puppet-example-a.spec")).unwrap();
    assert!(spec.contains("%define module_release 1\n"));
    assert!(!spec.contains("Requires:"));

    assert!(dir
        .path()
        .join("SOURCES/puppet-example-a-1.0.0.tar.gz")
        .is_file());
    assert!(dir
        .path()
        .join("SOURCES/puppet-example-b-2.1.0.tar.gz")
        .is_file());
}

#[test]
fn second_run_reuses_tarballs_and_renders_identically() {
    let dir = tempfile::tempdir().unwrap();
    let forge = forge();
    let forge2rpm = Forge2Rpm::builder()
        .workspace(dir.path())
        .registry(forge.clone())
        .try_build()
        .unwrap();
    let spec_path = dir.path().join("SPECS/puppet-example-b.spec");

    forge2rpm.create("example/b", None, BuildMode::None).unwrap();
    let first = std::fs::read(&spec_path).unwrap();
    forge2rpm.create("example/b", None, BuildMode::None).unwrap();
    let second = std::fs::read(&spec_path).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        *forge.downloads.borrow(),
        vec!["example/a/1.0.0.tar.gz", "example/b/2.1.0-3.tar.gz"]
    );
}

#[test]
fn create_unknown_module() {
    let dir = tempfile::tempdir().unwrap();
    let forge = StaticForge {
        releases: json!({}),
        ..StaticForge::default()
    };
    let forge2rpm = Forge2Rpm::builder()
        .workspace(dir.path())
        .registry(forge)
        .try_build()
        .unwrap();

    let error = forge2rpm
        .create("example/missing", None, BuildMode::None)
        .unwrap_err();

    assert_eq!(error.to_string(), "No releases found for example/missing");
}
