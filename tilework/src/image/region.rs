use crate::prelude::*;

impl Image {
    /// Copies the `width`×`height` region whose top-left corner is at (`x`, `y`).
    pub fn crop(&self, x: u32, y: u32, width: u32, height: u32) -> Result<Image> {
        check_region(self.desc(), x, y, width, height)?;

        let desc = ImageDesc::new(width, height, self.desc().color_format);
        let bpp = self.bytes_per_pixel() as usize;
        let src_row_bytes = self.desc().row_bytes();
        let dst_row_bytes = desc.row_bytes();
        let x_offset = x as usize * bpp;

        let mut bytes = Vec::with_capacity(desc.size_in_bytes());
        for row in y as usize..(y + height) as usize {
            let start = row * src_row_bytes + x_offset;
            bytes.extend_from_slice(&self.bytes()[start..start + dst_row_bytes]);
        }

        Image::new_with_data(desc, bytes)
    }

    /// Copies `src` into this image with its top-left corner at (`x`, `y`).
    /// Both images must share a color format and `src` must fit entirely.
    pub fn paste(&mut self, src: &Image, x: u32, y: u32) -> Result<()> {
        if src.desc().color_format != self.desc().color_format {
            return Err(Error::InvalidColorFormat(format!(
                "cannot paste {} onto {}",
                src.desc().color_format,
                self.desc().color_format
            )));
        }
        check_region(self.desc(), x, y, src.width(), src.height())?;
        if src.width() == 0 {
            return Ok(());
        }

        let bpp = self.bytes_per_pixel() as usize;
        let dst_row_bytes = self.desc().row_bytes();
        let src_row_bytes = src.desc().row_bytes();
        let x_offset = x as usize * bpp;

        for (src_row, dst_row) in src
            .bytes()
            .chunks_exact(src_row_bytes)
            .zip(y as usize..)
        {
            let start = dst_row * dst_row_bytes + x_offset;
            self.bytes_mut()[start..start + src_row_bytes].copy_from_slice(src_row);
        }

        Ok(())
    }

    /// Swaps the first and third channel of every pixel (RGB <-> BGR).
    /// Images without color channels are left untouched.
    pub fn swap_red_blue(&mut self) {
        let color_format = self.desc().color_format;
        if !color_format.channel_count.has_color() {
            return;
        }

        let channel_bytes = color_format.channel_size.byte_count() as usize;
        let bpp = color_format.byte_count() as usize;

        for pixel in self.bytes_mut().chunks_exact_mut(bpp) {
            for i in 0..channel_bytes {
                pixel.swap(i, 2 * channel_bytes + i);
            }
        }
    }
}

fn check_region(desc: &ImageDesc, x: u32, y: u32, width: u32, height: u32) -> Result<()> {
    let fits_x = x.checked_add(width).is_some_and(|right| right <= desc.width);
    let fits_y = y.checked_add(height).is_some_and(|bottom| bottom <= desc.height);

    if !fits_x || !fits_y {
        return Err(Error::InvalidRegion(format!(
            "{}x{} at ({}, {}) exceeds {}x{}",
            width, height, x, y, desc.width, desc.height
        )));
    }

    Ok(())
}
