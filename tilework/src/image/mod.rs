mod convert;
mod io;
mod region;


use std::path::Path;

use crate::common::{ColorFormat, Error, Result};

/// Image file extensions accepted by [`Image::read_file`].
pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "tiff", "tif"];

#[derive(Clone, Copy, Eq, PartialEq, Debug, Hash)]
pub struct ImageDesc {
    pub width: u32,
    pub height: u32,
    pub color_format: ColorFormat,
}

/// A decoded raster with tightly packed rows.
#[derive(Clone, Debug, PartialEq)]
pub struct Image {
    desc: ImageDesc,
    bytes: Vec<u8>,
}

impl Image {
    /// Returns the image descriptor.
    pub fn desc(&self) -> &ImageDesc {
        &self.desc
    }

    pub fn width(&self) -> u32 {
        self.desc.width
    }

    pub fn height(&self) -> u32 {
        self.desc.height
    }

    /// Returns the image bytes as a slice.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the image bytes as a mutable slice.
    pub fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    pub fn new_black(desc: ImageDesc) -> Result<Image> {
        desc.color_format.validate()?;

        let bytes = vec![0; desc.size_in_bytes()];

        Ok(Image { desc, bytes })
    }

    pub fn new_with_data(desc: ImageDesc, bytes: Vec<u8>) -> Result<Image> {
        desc.color_format.validate()?;

        if bytes.len() != desc.size_in_bytes() {
            return Err(Error::InvalidColorFormat(format!(
                "bytes length {} does not match expected size {}",
                bytes.len(),
                desc.size_in_bytes()
            )));
        }

        Ok(Image { desc, bytes })
    }

    /// Decodes PNG, JPEG or TIFF bytes. TIFF is recognised by its magic number,
    /// everything else is left to format sniffing.
    pub fn decode(bytes: &[u8]) -> Result<Image> {
        if io::is_tiff(bytes) {
            io::decode_tiff(bytes)
        } else {
            io::decode_png_jpeg(bytes)
        }
    }

    pub fn read_file<P: AsRef<Path>>(filename: P) -> Result<Image> {
        let filename = filename.as_ref();
        let extension = filename
            .extension()
            .and_then(|os_str| os_str.to_str())
            .ok_or_else(|| Error::UnsupportedFormat("missing extension".to_string()))?
            .to_ascii_lowercase();

        if !SUPPORTED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(Error::UnsupportedFormat(extension));
        }

        let bytes = std::fs::read(filename)?;
        Image::decode(&bytes)
    }

    /// Encodes the image as PNG. Only unsigned 8 and 16 bit formats are encodable.
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        io::encode_png(self)
    }

    pub fn save_png<P: AsRef<Path>>(&self, filename: P) -> Result<()> {
        let encoded = self.encode_png()?;
        std::fs::write(filename, encoded)?;

        Ok(())
    }

    pub fn bytes_per_pixel(&self) -> u8 {
        self.desc.color_format.byte_count()
    }
}

impl ImageDesc {
    pub fn new(width: u32, height: u32, color_format: ColorFormat) -> Self {
        Self {
            width,
            height,
            color_format,
        }
    }

    /// Returns the number of bytes per row.
    pub fn row_bytes(&self) -> usize {
        self.width as usize * self.color_format.byte_count() as usize
    }

    pub fn size_in_bytes(&self) -> usize {
        self.height as usize * self.row_bytes()
    }
}

impl std::fmt::Display for ImageDesc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{} {}", self.width, self.height, self.color_format)
    }
}
