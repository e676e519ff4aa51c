//! Publish and teardown pipelines for webwhisk.
//!
//! Publishing scans a site directory, rewrites marked references in its HTML
//! pages, packages every file as a web action and uploads the lot into a
//! package named after the site. Teardown removes all of it again.

pub mod error;
pub mod packager;
pub mod publish;
pub mod teardown;

pub use error::DeployError;
pub use packager::{Packager, DEFAULT_KIND};
pub use publish::{public_url, PublishConfig, PublishReport, Publisher, DEFAULT_ENTRY};
pub use teardown::{teardown, TeardownReport};
