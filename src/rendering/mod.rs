//! Text layout, highlight bands, composition and rasterization

pub mod compose;
pub mod highlight;
pub mod layout;
pub mod paint;
#[cfg(feature = "raster")]
pub mod raster;
pub mod resolution;
pub mod tokenize;

use base64::Engine as _;

/// An encoded raster of one surface.
#[derive(Debug, Clone)]
pub struct Screenshot {
    pub width: u32,
    pub height: u32,
    pub png_data: Vec<u8>,
}

impl Screenshot {
    /// `data:image/png;base64,…` URL for embedding or download links.
    pub fn to_data_url(&self) -> String {
        format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(&self.png_data)
        )
    }
}
