//! Rasterizing rendered compositions into PNG data URLs.

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use thiserror::Error;

use crate::tiles::Mosaic;

const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Colour of a heart tile.
pub const HEART_COLOR: Rgba = Rgba([250, 72, 67, 255]);

/// Errors from capture and export.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("nothing to capture")]
    Empty,

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("not a PNG data URL")]
    NotPngDataUrl,

    #[error("base64 error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("capture task failed: {0}")]
    Task(String),
}

/// An RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba(pub [u8; 4]);

/// A grid of coloured cells; `None` is transparent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub width: u32,
    pub height: u32,
    cells: Vec<Option<Rgba>>,
}

impl Snapshot {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![None; (width as usize) * (height as usize)],
        }
    }

    pub fn set(&mut self, x: u32, y: u32, color: Rgba) {
        if x < self.width && y < self.height {
            let index = (y * self.width + x) as usize;
            self.cells[index] = Some(color);
        }
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Rgba> {
        if x < self.width && y < self.height {
            self.cells[(y * self.width + x) as usize]
        } else {
            None
        }
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    /// One cell per visible heart tile, cropped to the mosaic bounds.
    pub fn from_mosaic(mosaic: &Mosaic) -> Self {
        let Some((c0, r0, c1, r1)) = mosaic.bounds() else {
            return Self::new(0, 0);
        };
        let mut snapshot = Self::new((c1 - c0 + 1) as u32, (r1 - r0 + 1) as u32);
        for (col, row) in mosaic.cells() {
            snapshot.set((col - c0) as u32, (row - r0) as u32, HEART_COLOR);
        }
        snapshot
    }
}

/// Turns a snapshot into an image data URL.
pub trait Rasterizer {
    fn rasterize(&self, snapshot: &Snapshot) -> Result<String, CaptureError>;
}

impl<R: Rasterizer + ?Sized> Rasterizer for Arc<R> {
    fn rasterize(&self, snapshot: &Snapshot) -> Result<String, CaptureError> {
        (**self).rasterize(snapshot)
    }
}

/// Encodes each cell as a `cell_px` square in a PNG.
#[derive(Debug, Clone, Copy)]
pub struct PngRasterizer {
    pub cell_px: u32,
}

impl Default for PngRasterizer {
    fn default() -> Self {
        Self { cell_px: 12 }
    }
}

impl Rasterizer for PngRasterizer {
    fn rasterize(&self, snapshot: &Snapshot) -> Result<String, CaptureError> {
        if snapshot.width == 0 || snapshot.height == 0 {
            return Err(CaptureError::Empty);
        }

        let px = self.cell_px.max(1);
        let mut img = image::RgbaImage::new(snapshot.width * px, snapshot.height * px);
        for y in 0..snapshot.height {
            for x in 0..snapshot.width {
                let Some(Rgba(color)) = snapshot.get(x, y) else {
                    continue;
                };
                for dy in 0..px {
                    for dx in 0..px {
                        img.put_pixel(x * px + dx, y * px + dy, image::Rgba(color));
                    }
                }
            }
        }

        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)?;
        Ok(format!("{PNG_DATA_URL_PREFIX}{}", STANDARD.encode(&bytes)))
    }
}

/// Rasterize on a blocking worker so the UI loop keeps running.
pub async fn capture_async<R>(rasterizer: Arc<R>, snapshot: Snapshot) -> Result<String, CaptureError>
where
    R: Rasterizer + Send + Sync + 'static + ?Sized,
{
    tokio::task::spawn_blocking(move || rasterizer.rasterize(&snapshot))
        .await
        .map_err(|e| CaptureError::Task(e.to_string()))?
}

/// Decode the PNG bytes of a data URL.
pub fn decode_png_data_url(data_url: &str) -> Result<Vec<u8>, CaptureError> {
    let encoded = data_url
        .strip_prefix(PNG_DATA_URL_PREFIX)
        .ok_or(CaptureError::NotPngDataUrl)?;
    Ok(STANDARD.decode(encoded)?)
}

/// Download file name for a capture of `page` taken at `timestamp`.
pub fn export_file_name(page: &str, timestamp: i64) -> String {
    format!("anime-gift-{page}-{timestamp}.png")
}

/// Download file name for a picture exported from the saved-items gallery.
pub fn saved_file_name(timestamp: i64) -> String {
    format!("saved-{timestamp}.png")
}

/// Write a captured data URL to `dir/file_name`.
pub fn export_png(dir: impl AsRef<Path>, file_name: &str, data_url: &str) -> Result<PathBuf, CaptureError> {
    let bytes = decode_png_data_url(data_url)?;
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;
    let path = dir.join(file_name);
    fs::write(&path, bytes)?;
    tracing::info!(path = %path.display(), "exported picture");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiles::{TileSequencer, Viewport};
    use std::time::Duration;
    use tempfile::TempDir;

    fn finished_mosaic() -> Mosaic {
        let mut seq = TileSequencer::new(Viewport::new(1280, 1024));
        seq.start();
        seq.advance(Duration::from_secs(60));
        seq.mosaic()
    }

    #[test]
    fn test_snapshot_from_mosaic_counts_tiles() {
        let mosaic = finished_mosaic();
        let snapshot = Snapshot::from_mosaic(&mosaic);
        let lit = (0..snapshot.height)
            .flat_map(|y| (0..snapshot.width).map(move |x| (x, y)))
            .filter(|&(x, y)| snapshot.get(x, y).is_some())
            .count();
        let distinct: std::collections::HashSet<_> = mosaic.cells().collect();
        assert_eq!(lit, distinct.len());
    }

    #[test]
    fn test_empty_snapshot_rejected() {
        let err = PngRasterizer::default()
            .rasterize(&Snapshot::new(0, 0))
            .unwrap_err();
        assert!(matches!(err, CaptureError::Empty));
    }

    #[test]
    fn test_png_data_url_decodes_to_png() {
        let mut snapshot = Snapshot::new(2, 1);
        snapshot.set(0, 0, HEART_COLOR);
        let url = PngRasterizer { cell_px: 4 }.rasterize(&snapshot).unwrap();
        assert!(url.starts_with(PNG_DATA_URL_PREFIX));

        let bytes = decode_png_data_url(&url).unwrap();
        let img = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(img.dimensions(), (8, 4));
        assert_eq!(img.get_pixel(1, 1).0, HEART_COLOR.0);
        assert_eq!(img.get_pixel(6, 1).0[3], 0);
    }

    #[test]
    fn test_export_png_names_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut snapshot = Snapshot::new(1, 1);
        snapshot.set(0, 0, HEART_COLOR);
        let url = PngRasterizer::default().rasterize(&snapshot).unwrap();

        let path = export_png(temp_dir.path(), &export_file_name("letter", 123), &url).unwrap();
        assert!(path.ends_with("anime-gift-letter-123.png"));
        assert!(path.exists());
    }

    #[test]
    fn test_decode_rejects_other_urls() {
        assert!(matches!(
            decode_png_data_url("data:text/plain,hi"),
            Err(CaptureError::NotPngDataUrl)
        ));
    }

    #[tokio::test]
    async fn test_capture_async() {
        let mut snapshot = Snapshot::new(3, 3);
        snapshot.set(1, 1, HEART_COLOR);
        let url = capture_async(Arc::new(PngRasterizer::default()), snapshot)
            .await
            .unwrap();
        assert!(url.starts_with(PNG_DATA_URL_PREFIX));
    }
}
