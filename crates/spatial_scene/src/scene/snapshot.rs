//! Latest-scene snapshot shared between the poller and the display side
//!
//! The poller publishes whole buffers; readers get an `Arc` to an immutable
//! snapshot. A reader never sees a half-written buffer and never holds the
//! lock past the clone.

use parking_lot::RwLock;
use std::sync::Arc;
use uuid::Uuid;

/// One serialized scene and the identifier it was published under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneSnapshot {
    /// Fresh for every publication
    pub id: Uuid,
    /// Serialized scene
    pub data: Arc<[u8]>,
}

impl SceneSnapshot {
    /// Wrap a buffer under a new identifier
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            id: Uuid::new_v4(),
            data: data.into(),
        }
    }
    
    /// Buffer length in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }
    
    /// Whether the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Single-writer, multi-reader cell holding the latest snapshot
#[derive(Debug, Default)]
pub struct SnapshotCell {
    latest: RwLock<Option<Arc<SceneSnapshot>>>,
}

impl SnapshotCell {
    /// Create an empty cell
    pub fn new() -> Self {
        Self::default()
    }
    
    /// Replace the current snapshot, returning the new identifier
    pub fn publish(&self, data: Vec<u8>) -> Uuid {
        let snapshot = Arc::new(SceneSnapshot::new(data));
        let id = snapshot.id;
        *self.latest.write() = Some(snapshot);
        id
    }
    
    /// The latest snapshot, if any has been published
    pub fn latest(&self) -> Option<Arc<SceneSnapshot>> {
        self.latest.read().clone()
    }
    
    /// Identifier of the latest snapshot
    pub fn latest_id(&self) -> Option<Uuid> {
        self.latest.read().as_ref().map(|snapshot| snapshot.id)
    }
}
