//! Image file loading, PNG export and target directory collection

use crate::io::configuration::IMAGE_EXTENSIONS;
use crate::io::error::{EngineError, Result};
use image::RgbaImage;
use std::path::{Path, PathBuf};

/// Load any supported image file as RGBA8
///
/// # Errors
///
/// Returns an error if the file cannot be opened or decoded.
pub fn load_rgba<P: AsRef<Path>>(path: P) -> Result<RgbaImage> {
    let path_buf = path.as_ref().to_path_buf();
    let img = image::open(&path_buf).map_err(|e| EngineError::ImageLoad {
        path: path_buf,
        source: e,
    })?;
    Ok(img.to_rgba8())
}

/// Save an image as PNG, creating parent directories as needed
///
/// # Errors
///
/// Returns an error if:
/// - The parent directory cannot be created
/// - The image cannot be encoded or written
pub fn export_png<P: AsRef<Path>>(img: &RgbaImage, output_path: P) -> Result<()> {
    let output_path = output_path.as_ref();
    create_parent_dir(output_path)?;

    img.save_with_format(output_path, image::ImageFormat::Png)
        .map_err(|e| EngineError::ImageExport {
            path: output_path.to_path_buf(),
            source: e,
        })
}

/// Create the parent directory of `path` if it has one
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn create_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| EngineError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
    }
    Ok(())
}

/// Test whether a path carries one of the accepted image extensions
pub fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|accepted| ext.eq_ignore_ascii_case(accepted))
        })
}

/// Expand files and directories into a list of image paths
///
/// Files are kept in the given order; each directory contributes its image
/// files sorted by name.
///
/// # Errors
///
/// Returns an error if:
/// - A path is neither a file nor a directory
/// - A file does not carry an image extension
/// - A directory cannot be read
pub fn collect_image_paths(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for input in inputs {
        if input.is_file() {
            if !has_image_extension(input) {
                return Err(crate::io::error::invalid_parameter(
                    "target",
                    &input.display(),
                    &"not a supported image file",
                ));
            }
            files.push(input.clone());
        } else if input.is_dir() {
            let entries = std::fs::read_dir(input).map_err(|e| EngineError::FileSystem {
                path: input.clone(),
                operation: "read directory",
                source: e,
            })?;

            let mut found = Vec::new();
            for entry in entries {
                let path = entry?.path();
                if path.is_file() && has_image_extension(&path) {
                    found.push(path);
                }
            }
            found.sort();
            files.extend(found);
        } else {
            return Err(crate::io::error::invalid_parameter(
                "target",
                &input.display(),
                &"must be an image file or directory",
            ));
        }
    }

    Ok(files)
}
