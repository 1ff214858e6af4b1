//! Background source loading for hot-swapping the source image
//!
//! Decoding runs on a worker thread and the finished image is handed back
//! over a channel. The driver polls once per tick and installs the image
//! when it arrives, so the engine never stalls on I/O and keeps using its
//! previous source until then.

use crate::io::error::{EngineError, Result};
use crate::io::image::load_rgba;
use image::RgbaImage;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

/// An in-flight source image load
pub struct SourceLoader {
    path: PathBuf,
    receiver: Receiver<Result<RgbaImage>>,
}

impl SourceLoader {
    /// Start loading `path` on a background thread
    pub fn spawn<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let (sender, receiver) = mpsc::channel();
        let worker_path = path.clone();

        thread::spawn(move || {
            // The receiver may already be gone if the driver gave up
            let _ = sender.send(load_rgba(&worker_path));
        });

        Self { path, receiver }
    }

    /// Path being loaded
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Non-blocking check for completion
    ///
    /// Returns `None` while the load is still running, and the load result
    /// once it has finished.
    pub fn poll(&self) -> Option<Result<RgbaImage>> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(self.disconnected())),
        }
    }

    /// Block until the load finishes
    ///
    /// # Errors
    ///
    /// Returns an error if the image cannot be loaded or the worker thread
    /// ended without reporting.
    pub fn wait(self) -> Result<RgbaImage> {
        self.receiver
            .recv()
            .unwrap_or_else(|_| Err(self.disconnected()))
    }

    fn disconnected(&self) -> EngineError {
        EngineError::SourceLoad {
            path: self.path.clone(),
            reason: "loader thread ended without a result".to_string(),
        }
    }
}
