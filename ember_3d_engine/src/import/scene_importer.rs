/// SceneImporter trait - model file parsing capability

use std::path::Path;

use crate::error::Result;
use crate::import::{ImportFlags, ImportedScene};

/// Parses a model file into an `ImportedScene`.
///
/// Implementations report unreadable or unparseable files as `Err`. A file
/// that parses but only partially should set `SceneFlags::INCOMPLETE`
/// instead, and a scene without a hierarchy leaves `root` empty; the model
/// loader rejects both.
pub trait SceneImporter {
    fn import(&self, path: &Path, flags: ImportFlags) -> Result<ImportedScene>;
}
