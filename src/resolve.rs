use tracing::{debug, info};

use crate::client::Appliance;
use crate::error::ApplianceError;
use crate::model::{Filesystem, Scope};

/// First filesystem whose name matches exactly, in response order.
pub fn find_filesystem<'a>(filesystems: &'a [Filesystem], name: &str) -> Option<&'a Filesystem> {
    filesystems.iter().find(|fs| fs.name == name)
}

/// Resolve a filesystem name to the scope its snapshots live under.
///
/// Issues exactly one listing request.
pub fn resolve<A: Appliance + ?Sized>(api: &A, name: &str) -> Result<Scope, ApplianceError> {
    let filesystems = api.filesystems()?;
    debug!(count = filesystems.len(), "filesystem listing fetched");
    let fs = find_filesystem(&filesystems, name)
        .ok_or_else(|| ApplianceError::FilesystemNotFound(name.to_string()))?;
    let scope = Scope::from(fs);
    info!(pool = %scope.pool, project = %scope.project, filesystem = %scope.filesystem, "filesystem resolved");
    Ok(scope)
}
