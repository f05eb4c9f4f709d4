pub mod archive;
pub mod cli;
pub mod config;
pub mod fetch;
pub mod model;
pub mod registry;
pub mod resolver;
pub mod rpmbuild;
pub mod specfile;
pub mod version;

mod api;

pub use api::{Forge2Rpm, Forge2RpmBuilder};
