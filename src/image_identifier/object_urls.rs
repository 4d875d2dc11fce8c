use super::core::BlobId;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Ownership list of the transient references handed out for locally
/// selected files. A revoked reference no longer resolves.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectUrls {
    next_id: u64,
    live: BTreeMap<BlobId, PathBuf>,
}

impl ObjectUrls {
    /// Hands out a reference for `path`. Selecting a file that already has a
    /// live reference reuses it.
    pub fn create(&mut self, path: PathBuf) -> BlobId {
        if let Some((id, _)) = self.live.iter().find(|(_, live)| **live == path) {
            return *id;
        }

        self.next_id += 1;
        let id = BlobId(self.next_id);
        self.live.insert(id, path);
        id
    }

    pub fn resolve(&self, id: BlobId) -> Option<&Path> {
        self.live.get(&id).map(PathBuf::as_path)
    }

    /// Releases every live reference, returning how many there were.
    pub fn revoke_all(&mut self) -> usize {
        let count = self.live.len();
        self.live.clear();
        count
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}
