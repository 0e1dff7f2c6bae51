use std::collections::VecDeque;

use crate::error::RasterError;
use crate::raster_io;
use crate::surface::RasterSurface;

/// An encoded copy of the whole surface at one instant
#[derive(Clone, PartialEq)]
pub struct Snapshot {
    png: Vec<u8>,
    size: [u32; 2],
}

impl std::fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Snapshot")
            .field("size", &self.size)
            .field("bytes", &self.png.len())
            .finish()
    }
}

impl Snapshot {
    /// Encode the current state of `surface`
    pub fn capture(surface: &RasterSurface) -> Result<Self, RasterError> {
        Ok(Self {
            png: raster_io::encode_png(surface)?,
            size: surface.size(),
        })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.png
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.png
    }

    pub fn size(&self) -> [u32; 2] {
        self.size
    }
}

/// Undo history of surface snapshots, newest last
#[derive(Debug, Default)]
pub struct HistoryStack {
    snapshots: VecDeque<Snapshot>,
    /// Oldest entries are dropped once this many are stored
    capacity: Option<usize>,
}

impl HistoryStack {
    /// Creates a new empty, unbounded history
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a history that keeps at most `capacity` snapshots
    pub fn with_capacity_limit(capacity: Option<usize>) -> Self {
        Self {
            snapshots: VecDeque::new(),
            capacity,
        }
    }

    /// Encode and store the current surface state
    pub fn push(&mut self, surface: &RasterSurface) -> Result<(), RasterError> {
        let snapshot = Snapshot::capture(surface)?;
        self.snapshots.push_back(snapshot);
        if let Some(capacity) = self.capacity {
            while self.snapshots.len() > capacity {
                self.snapshots.pop_front();
            }
        }
        Ok(())
    }

    /// Take the most recent snapshot, `None` when there is nothing to undo
    pub fn pop(&mut self) -> Option<Snapshot> {
        self.snapshots.pop_back()
    }

    /// Discard every snapshot
    pub fn clear(&mut self) {
        self.snapshots.clear();
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Returns true if there is a snapshot to restore
    pub fn can_undo(&self) -> bool {
        !self.is_empty()
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }
}
