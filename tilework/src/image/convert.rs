use crate::prelude::*;

impl Image {
    /// Converts to 8-bit RGB. Gray is replicated across channels, alpha is dropped,
    /// 16-bit samples keep their high byte and float samples are clamped to `[0, 1]`.
    pub fn to_rgb_u8(&self) -> Result<Image> {
        let color_format = self.desc().color_format;
        if color_format == ColorFormat::RGB_U8 {
            return Ok(self.clone());
        }

        let channel_bytes = color_format.channel_size.byte_count() as usize;
        let bpp = color_format.byte_count() as usize;
        let sample = sample_reader(color_format)?;

        let desc = ImageDesc::new(self.width(), self.height(), ColorFormat::RGB_U8);
        let mut bytes = Vec::with_capacity(desc.size_in_bytes());

        for pixel in self.bytes().chunks_exact(bpp) {
            let channel =
                |index: usize| sample(&pixel[index * channel_bytes..(index + 1) * channel_bytes]);

            match color_format.channel_count {
                ChannelCount::L | ChannelCount::LA => {
                    let l = channel(0);
                    bytes.extend_from_slice(&[l, l, l]);
                }
                ChannelCount::Rgb | ChannelCount::Rgba => {
                    bytes.extend_from_slice(&[channel(0), channel(1), channel(2)]);
                }
            }
        }

        Image::new_with_data(desc, bytes)
    }
}

fn sample_reader(color_format: ColorFormat) -> Result<fn(&[u8]) -> u8> {
    match (color_format.channel_size, color_format.channel_type) {
        (ChannelSize::_8bit, ChannelType::UInt) => Ok(read_u8),
        (ChannelSize::_16bit, ChannelType::UInt) => Ok(read_u16),
        (ChannelSize::_32bit, ChannelType::Float) => Ok(read_f32),
        _ => Err(Error::UnsupportedFormat(format!(
            "cannot convert {} to RGB",
            color_format
        ))),
    }
}

fn read_u8(b: &[u8]) -> u8 {
    b[0]
}

fn read_u16(b: &[u8]) -> u8 {
    (u16::from_ne_bytes([b[0], b[1]]) >> 8) as u8
}

fn read_f32(b: &[u8]) -> u8 {
    let v = f32::from_ne_bytes([b[0], b[1], b[2], b[3]]);
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}
