//! Content-source scanning: which installed packs contribute sensors.
//!
//! A content pack is one directory under the pack root. A pack contributes
//! content of a given type by carrying a subdirectory of that name, e.g.
//! `<root>/<pack>/sensors/`.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::error::{DiscoveryError, DiscoveryResult};

/// One pack's contribution directory for a given content type.
///
/// Transient: produced and consumed within a single scan pass, never
/// persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentSource {
    /// The `<pack>/<content_type>` directory.
    pub dir: PathBuf,
    pub content_type: String,
}

/// List the per-pack content directories under `root` that declare content
/// of `content_type`, sorted by pack name.
///
/// The order is significant: it fixes override precedence downstream, with
/// later sources overriding earlier ones on identity collisions.
///
/// An unreadable `root` is a fatal configuration error. Individual entries
/// that are not directories or cannot be inspected are skipped with a
/// warning.
pub fn list_content_sources(
    root: &Path,
    content_type: &str,
) -> DiscoveryResult<Vec<ContentSource>> {
    let entries = fs::read_dir(root).map_err(|source| DiscoveryError::ContentRootUnreadable {
        path: root.to_path_buf(),
        source,
    })?;

    let mut packs: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("skipping unreadable entry under {}: {}", root.display(), err);
                continue;
            }
        };
        let path = entry.path();
        if path.is_dir() {
            packs.push(path);
        }
    }
    packs.sort();

    let mut sources = Vec::new();
    for pack in packs {
        let dir = pack.join(content_type);
        if dir.is_dir() {
            sources.push(ContentSource {
                dir,
                content_type: content_type.to_string(),
            });
        }
    }
    Ok(sources)
}
