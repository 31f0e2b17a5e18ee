//! Tile image decoding and quilt rendering

use crate::analysis::descriptor::{TileDescriptor, extract_descriptor};
use crate::io::error::{QuiltError, Result, invalid_parameter, malformed_input};
use crate::spatial::GridAssignment;
use image::RgbaImage;
use image::imageops::{self, FilterType};
use std::path::Path;

/// Decode an image file and resample it to a `side × side` RGBA tile
///
/// # Errors
///
/// Returns `DecodeFailure` if the file cannot be opened or decoded
pub fn load_tile(path: &Path, side: u32) -> Result<RgbaImage> {
    let decoded = image::open(path).map_err(|e| QuiltError::DecodeFailure {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(decoded
        .resize_exact(side, side, FilterType::Triangle)
        .to_rgba8())
}

/// Extract the descriptor of a square RGBA tile
///
/// # Errors
///
/// Returns `MalformedInput` if the image is not square
pub fn describe_tile(tile: &RgbaImage) -> Result<TileDescriptor> {
    let (width, height) = tile.dimensions();
    if width != height {
        return Err(malformed_input(
            width as usize,
            tile.as_raw().len(),
            &format!("tile is {width}x{height}, expected a square"),
        ));
    }
    extract_descriptor(tile.as_raw(), width as usize)
}

/// Paint every cell of an assignment with its tile image
///
/// Tiles whose size differs from `tile_size` are rescaled.
///
/// # Errors
///
/// Returns `InvalidTileIndex` if a cell names a missing tile, or
/// `InvalidParameter` if the quilt dimensions overflow
pub fn render_quilt(
    assignment: &GridAssignment,
    tiles: &[RgbaImage],
    tile_size: u32,
) -> Result<RgbaImage> {
    if tile_size == 0 {
        return Err(invalid_parameter(
            "tile_size",
            &tile_size,
            &"must be positive",
        ));
    }
    let width = u32::try_from(assignment.cols())
        .ok()
        .and_then(|cols| cols.checked_mul(tile_size));
    let height = u32::try_from(assignment.rows())
        .ok()
        .and_then(|rows| rows.checked_mul(tile_size));
    let (Some(width), Some(height)) = (width, height) else {
        return Err(invalid_parameter(
            "tile_size",
            &tile_size,
            &"quilt dimensions overflow",
        ));
    };

    let scaled: Vec<RgbaImage> = tiles
        .iter()
        .map(|tile| {
            if tile.dimensions() == (tile_size, tile_size) {
                tile.clone()
            } else {
                imageops::resize(tile, tile_size, tile_size, FilterType::Triangle)
            }
        })
        .collect();

    let mut quilt = RgbaImage::new(width, height);
    for ((row, col), &index) in assignment.cells().indexed_iter() {
        let tile = scaled.get(index).ok_or(QuiltError::InvalidTileIndex {
            index,
            pool_size: tiles.len(),
        })?;
        let x = i64::from(tile_size) * col as i64;
        let y = i64::from(tile_size) * row as i64;
        imageops::replace(&mut quilt, tile, x, y);
    }

    Ok(quilt)
}

/// Save a rendered quilt, creating the parent directory if needed
///
/// # Errors
///
/// Returns `FileSystem` if the directory cannot be created, or
/// `ImageExport` if encoding or writing fails
pub fn export_quilt_png(quilt: &RgbaImage, output_path: &Path) -> Result<()> {
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| QuiltError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
    }

    quilt
        .save(output_path)
        .map_err(|e| QuiltError::ImageExport {
            path: output_path.to_path_buf(),
            source: e,
        })
}
