use eframe::egui;
use futures::channel::oneshot;

use crate::error::ExportError;

/// Extensions accepted by the image picker and for dropped files
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp"];

/// Raw bytes of a file chosen or dropped by the user
#[derive(Debug, Clone)]
pub struct PickedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Gets image files into the app (picker, drag and drop) and exported PNGs
/// out of it (save dialog on native, browser download on the web).
#[derive(Default)]
pub struct FileHandler {
    picked: Vec<PickedFile>,
    pending_picks: Vec<oneshot::Receiver<Option<PickedFile>>>,
}

impl FileHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while an asynchronous picker is still open
    pub fn is_picking(&self) -> bool {
        !self.pending_picks.is_empty()
    }

    /// Ask the user for an image file. The result is delivered by
    /// [`FileHandler::take_picked`].
    #[cfg(not(target_arch = "wasm32"))]
    pub fn open_image_dialog(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", IMAGE_EXTENSIONS)
            .set_title("Load image")
            .pick_file()
        else {
            log::debug!("Image picker dismissed");
            return;
        };

        match std::fs::read(&path) {
            Ok(bytes) => {
                log::info!("Picked image: {} ({} bytes)", path.display(), bytes.len());
                self.picked.push(PickedFile {
                    name: path.display().to_string(),
                    bytes,
                });
            }
            Err(err) => log::error!("Failed to read image file: {}: {}", path.display(), err),
        }
    }

    /// Ask the user for an image file. The result is delivered by
    /// [`FileHandler::take_picked`].
    #[cfg(target_arch = "wasm32")]
    pub fn open_image_dialog(&mut self) {
        let (sender, receiver) = oneshot::channel();
        wasm_bindgen_futures::spawn_local(async move {
            let picked = match rfd::AsyncFileDialog::new()
                .add_filter("Images", IMAGE_EXTENSIONS)
                .set_title("Load image")
                .pick_file()
                .await
            {
                Some(handle) => Some(PickedFile {
                    name: handle.file_name(),
                    bytes: handle.read().await,
                }),
                None => None,
            };
            let _ = sender.send(picked);
        });
        self.pending_picks.push(receiver);
    }

    /// Files chosen through the picker since the last call
    pub fn take_picked(&mut self) -> Vec<PickedFile> {
        let picked = &mut self.picked;
        self.pending_picks.retain_mut(|receiver| match receiver.try_recv() {
            Ok(Some(Some(file))) => {
                log::info!("Picked image: {} ({} bytes)", file.name, file.bytes.len());
                picked.push(file);
                false
            }
            Ok(Some(None)) => {
                log::debug!("Image picker dismissed");
                false
            }
            Ok(None) => true,
            Err(oneshot::Canceled) => false,
        });
        std::mem::take(&mut self.picked)
    }

    /// Image files dropped onto the window this frame
    pub fn take_dropped_images(&mut self, ctx: &egui::Context) -> Vec<PickedFile> {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        let mut images = Vec::new();

        for file in dropped {
            let file_name = if let Some(path) = &file.path {
                path.display().to_string()
            } else if !file.name.is_empty() {
                file.name.clone()
            } else {
                "unknown".to_owned()
            };

            if !is_image_file(&file_name, &file.mime) {
                log::warn!("Dropped file is not a supported type: {}", file_name);
                continue;
            }

            if let Some(bytes) = &file.bytes {
                log::info!("Processing image from memory: {} ({} bytes)", file_name, bytes.len());
                images.push(PickedFile {
                    name: file_name,
                    bytes: bytes.to_vec(),
                });
            } else if let Some(path) = &file.path {
                #[cfg(not(target_arch = "wasm32"))]
                {
                    log::info!("Processing image from path: {}", path.display());
                    match std::fs::read(path) {
                        Ok(bytes) => images.push(PickedFile { name: file_name, bytes }),
                        Err(err) => log::error!("Failed to read image file: {}: {}", path.display(), err),
                    }
                }

                #[cfg(target_arch = "wasm32")]
                {
                    log::warn!("File path access not supported on WASM: {}", path.display());
                }
            } else {
                log::warn!("Dropped file has no accessible data: {}", file_name);
            }
        }

        images
    }

    /// Hand exported PNG bytes to the user through a save dialog.
    ///
    /// Returns `Ok(false)` if the user dismissed the dialog.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_png(&self, bytes: &[u8], file_name: &str) -> Result<bool, ExportError> {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG image", &["png"])
            .set_file_name(file_name)
            .set_title("Export drawing")
            .save_file()
        else {
            return Ok(false);
        };

        std::fs::write(&path, bytes).map_err(|source| ExportError::Write {
            path: path.display().to_string(),
            source,
        })?;
        log::info!("Exported drawing to {}", path.display());
        Ok(true)
    }

    /// Hand exported PNG bytes to the user as a browser download
    #[cfg(target_arch = "wasm32")]
    pub fn save_png(&self, bytes: &[u8], file_name: &str) -> Result<bool, ExportError> {
        use wasm_bindgen::JsCast;

        let js_err = |err: wasm_bindgen::JsValue| ExportError::Download(format!("{:?}", err));

        let window = web_sys::window().ok_or_else(|| ExportError::Download("no window available".to_owned()))?;
        let document = window
            .document()
            .ok_or_else(|| ExportError::Download("no document available".to_owned()))?;

        let parts = js_sys::Array::new();
        parts.push(&js_sys::Uint8Array::from(bytes));
        let options = web_sys::BlobPropertyBag::new();
        options.set_type("image/png");
        let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options).map_err(js_err)?;
        let url = web_sys::Url::create_object_url_with_blob(&blob).map_err(js_err)?;

        let anchor: web_sys::HtmlAnchorElement = document
            .create_element("a")
            .map_err(js_err)?
            .dyn_into()
            .map_err(|_| ExportError::Download("failed to create download link".to_owned()))?;
        anchor.set_href(&url);
        anchor.set_download(file_name);
        anchor.click();

        // Revoking right after the click can cancel the download in some browsers
        let revoke = wasm_bindgen::closure::Closure::once_into_js(move || {
            if let Err(err) = web_sys::Url::revoke_object_url(&url) {
                log::warn!("Failed to revoke download URL: {:?}", err);
            }
        });
        window
            .set_timeout_with_callback_and_timeout_and_arguments_0(revoke.unchecked_ref(), 0)
            .map_err(js_err)?;

        log::info!("Exported drawing as {}", file_name);
        Ok(true)
    }

    /// Preview files being dragged over the application
    pub fn preview_files_being_dropped(&self, ctx: &egui::Context) {
        use egui::{Align2, Color32, Id, LayerId, Order, TextStyle};

        if ctx.input(|i| i.raw.hovered_files.is_empty()) {
            return;
        }

        let text = ctx.input(|i| {
            let mut text = "Drop an image to load it:\n".to_owned();
            for file in &i.raw.hovered_files {
                if let Some(path) = &file.path {
                    text += &format!("\n{}", path.display());
                } else if !file.mime.is_empty() {
                    text += &format!("\n{}", file.mime);
                }
            }
            text
        });

        let painter = ctx.layer_painter(LayerId::new(Order::Foreground, Id::new("file_drop_target")));
        let screen_rect = ctx.screen_rect();
        painter.rect_filled(screen_rect, 0.0, Color32::from_black_alpha(192));
        painter.text(
            screen_rect.center(),
            Align2::CENTER_CENTER,
            text,
            TextStyle::Heading.resolve(&ctx.style()),
            Color32::WHITE,
        );
    }
}

/// Check if a file is an image based on MIME type or extension
pub fn is_image_file(name: &str, mime: &str) -> bool {
    if !mime.is_empty() {
        return mime.starts_with("image/");
    }
    std::path::Path::new(name)
        .extension()
        .map(|ext| {
            let ext = ext.to_string_lossy().to_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}
