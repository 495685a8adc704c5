// Ports - Interface definitions (contracts)

use std::path::Path;

use async_trait::async_trait;

use crate::error::ProbeResult;

/// Port for running the external probe tool on one file
///
/// Implementations spawn exactly one process per call and hand back its
/// standard output untouched. The loader owns every check that happens
/// before or after the call.
#[async_trait]
pub trait ProbeRunner: Send + Sync {
    /// Run the probe on an existing, absolute file path
    async fn run(&self, path: &Path) -> ProbeResult<Vec<u8>>;

    /// Display form of the invocation, for logging
    fn describe(&self, path: &Path) -> String;
}
