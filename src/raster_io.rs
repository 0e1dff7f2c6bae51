//! Moving pixels between the surface and encoded image files.
//!
//! Export is synchronous. Loading decodes off the UI path (a worker thread on
//! native, a spawned local future on the web) and hands the result back
//! through a one-shot channel that the frame loop polls. Loads cannot be
//! cancelled and are not ordered against strokes: whichever completion is
//! applied last owns the surface.

use futures::channel::oneshot;
use image::{ImageFormat, RgbaImage};

use crate::error::RasterError;
use crate::surface::RasterSurface;

/// Encode the full surface as PNG
pub fn encode_png(surface: &RasterSurface) -> Result<Vec<u8>, RasterError> {
    let mut bytes = Vec::new();
    surface
        .image()
        .write_to(&mut std::io::Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(RasterError::Encode)?;
    Ok(bytes)
}

/// Decode any supported image format into RGBA pixels
pub fn decode(bytes: &[u8]) -> Result<RgbaImage, RasterError> {
    let img = image::load_from_memory(bytes).map_err(RasterError::Decode)?;
    log::debug!("Decoded image: {}x{}", img.width(), img.height());
    Ok(img.to_rgba8())
}

/// Why a load was requested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadKind {
    /// A user-chosen background image
    Import,
    /// An undo snapshot being restored
    Restore,
}

/// A decode that has finished, successfully or not
#[derive(Debug)]
pub struct CompletedLoad {
    pub id: u64,
    pub kind: LoadKind,
    pub result: Result<RgbaImage, RasterError>,
}

struct PendingLoad {
    id: u64,
    kind: LoadKind,
    receiver: oneshot::Receiver<Result<RgbaImage, RasterError>>,
}

/// Decodes in flight, in submission order
#[derive(Default)]
pub struct LoadQueue {
    pending: Vec<PendingLoad>,
    next_id: u64,
}

impl std::fmt::Debug for LoadQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadQueue")
            .field("pending", &self.pending.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}

impl LoadQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start decoding `bytes` in the background and return the load id
    pub fn submit(&mut self, bytes: Vec<u8>, kind: LoadKind) -> u64 {
        let id = self.next_id;
        self.next_id += 1;

        let (sender, receiver) = oneshot::channel();
        spawn_decode(bytes, sender);
        self.pending.push(PendingLoad { id, kind, receiver });
        log::debug!("Queued {:?} load #{}", kind, id);
        id
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn in_flight(&self) -> usize {
        self.pending.len()
    }

    /// Forget every pending load of `kind`; their results are never
    /// delivered. Returns how many were dropped.
    pub fn discard(&mut self, kind: LoadKind) -> usize {
        let before = self.pending.len();
        self.pending.retain(|load| load.kind != kind);
        before - self.pending.len()
    }

    /// Collect every decode that has finished since the last poll without
    /// blocking. Results come back in submission order.
    pub fn poll(&mut self) -> Vec<CompletedLoad> {
        let mut completed = Vec::new();
        self.pending.retain_mut(|load| match load.receiver.try_recv() {
            Ok(Some(result)) => {
                completed.push(CompletedLoad {
                    id: load.id,
                    kind: load.kind,
                    result,
                });
                false
            }
            Ok(None) => true,
            Err(oneshot::Canceled) => {
                completed.push(CompletedLoad {
                    id: load.id,
                    kind: load.kind,
                    result: Err(RasterError::Cancelled),
                });
                false
            }
        });
        completed
    }

    /// Block until every pending decode has finished
    #[cfg(not(target_arch = "wasm32"))]
    pub fn wait(&mut self) -> Vec<CompletedLoad> {
        self.pending
            .drain(..)
            .map(|load| {
                let result = futures::executor::block_on(load.receiver)
                    .unwrap_or(Err(RasterError::Cancelled));
                CompletedLoad {
                    id: load.id,
                    kind: load.kind,
                    result,
                }
            })
            .collect()
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn spawn_decode(bytes: Vec<u8>, sender: oneshot::Sender<Result<RgbaImage, RasterError>>) {
    let spawned = std::thread::Builder::new()
        .name("image-decode".to_owned())
        .spawn(move || {
            // The receiver is gone if the load was discarded
            let _ = sender.send(decode(&bytes));
        });
    if let Err(err) = spawned {
        // The sender was dropped with the closure, so the load reports as cancelled
        log::error!("Failed to spawn decode thread: {}", err);
    }
}

#[cfg(target_arch = "wasm32")]
fn spawn_decode(bytes: Vec<u8>, sender: oneshot::Sender<Result<RgbaImage, RasterError>>) {
    wasm_bindgen_futures::spawn_local(async move {
        let _ = sender.send(decode(&bytes));
    });
}
