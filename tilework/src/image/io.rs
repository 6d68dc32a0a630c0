use std::io::Cursor;

use image_lib::codecs::png::PngEncoder;
use image_lib::{ExtendedColorType, ImageEncoder};
use tiff::decoder::DecodingResult;

use crate::prelude::*;

const TIFF_MAGIC_LE: &[u8] = b"II*\0";
const TIFF_MAGIC_BE: &[u8] = b"MM\0*";

pub(crate) fn is_tiff(bytes: &[u8]) -> bool {
    bytes.starts_with(TIFF_MAGIC_LE) || bytes.starts_with(TIFF_MAGIC_BE)
}

pub(crate) fn decode_png_jpeg(bytes: &[u8]) -> Result<Image> {
    let img = image_lib::load_from_memory(bytes).map_err(|e| Error::Decode(e.to_string()))?;

    let (channel_count, channel_size, channel_type) = match img.color() {
        image_lib::ColorType::L8 => (ChannelCount::L, ChannelSize::_8bit, ChannelType::UInt),
        image_lib::ColorType::L16 => (ChannelCount::L, ChannelSize::_16bit, ChannelType::UInt),
        image_lib::ColorType::La8 => (ChannelCount::LA, ChannelSize::_8bit, ChannelType::UInt),
        image_lib::ColorType::La16 => (ChannelCount::LA, ChannelSize::_16bit, ChannelType::UInt),
        image_lib::ColorType::Rgb8 => (ChannelCount::Rgb, ChannelSize::_8bit, ChannelType::UInt),
        image_lib::ColorType::Rgb16 => (ChannelCount::Rgb, ChannelSize::_16bit, ChannelType::UInt),
        image_lib::ColorType::Rgba8 => (ChannelCount::Rgba, ChannelSize::_8bit, ChannelType::UInt),
        image_lib::ColorType::Rgba16 => {
            (ChannelCount::Rgba, ChannelSize::_16bit, ChannelType::UInt)
        }
        image_lib::ColorType::Rgb32F => {
            (ChannelCount::Rgb, ChannelSize::_32bit, ChannelType::Float)
        }
        image_lib::ColorType::Rgba32F => {
            (ChannelCount::Rgba, ChannelSize::_32bit, ChannelType::Float)
        }
        other => return Err(Error::UnsupportedFormat(format!("{:?}", other))),
    };

    let color_format = ColorFormat::from((channel_count, channel_size, channel_type));
    let desc = ImageDesc::new(img.width(), img.height(), color_format);

    Image::new_with_data(desc, img.into_bytes())
}

/// Decodes the first page of a TIFF file.
pub(crate) fn decode_tiff(bytes: &[u8]) -> Result<Image> {
    let limits = tiff::decoder::Limits::unlimited();
    let mut decoder = tiff::decoder::Decoder::new(Cursor::new(bytes))
        .map_err(decode_error)?
        .with_limits(limits);

    let color_type = decoder.colortype().map_err(decode_error)?;
    let (channel_bits, channel_count) = match color_type {
        tiff::ColorType::Gray(b) => (b, ChannelCount::L),
        tiff::ColorType::GrayA(b) => (b, ChannelCount::LA),
        tiff::ColorType::RGB(b) => (b, ChannelCount::Rgb),
        tiff::ColorType::RGBA(b) => (b, ChannelCount::Rgba),
        other => {
            return Err(Error::UnsupportedFormat(format!("TIFF color type {:?}", other)));
        }
    };

    let (w, h) = decoder.dimensions().map_err(decode_error)?;
    let img = decoder.read_image().map_err(decode_error)?;

    let (bytes, channel_type): (Vec<u8>, ChannelType) = match &img {
        DecodingResult::U8(buf) => (buf.clone(), ChannelType::UInt),
        DecodingResult::U16(buf) => (bytemuck::cast_slice(buf).to_vec(), ChannelType::UInt),
        DecodingResult::F32(buf) => (bytemuck::cast_slice(buf).to_vec(), ChannelType::Float),
        _ => {
            return Err(Error::UnsupportedFormat(
                "TIFF sample format not supported".to_string(),
            ));
        }
    };

    let channel_size = ChannelSize::from_bit_count(channel_bits)?;
    let color_format = ColorFormat::from((channel_count, channel_size, channel_type));
    let desc = ImageDesc::new(w, h, color_format);

    Image::new_with_data(desc, bytes)
}

pub(crate) fn encode_png(image: &Image) -> Result<Vec<u8>> {
    let color_format = image.desc().color_format;

    if color_format.channel_type != ChannelType::UInt {
        return Err(Error::UnsupportedFormat(format!(
            "PNG channel type: {:?}",
            color_format.channel_type
        )));
    }

    let color_type = match color_format.channel_size {
        ChannelSize::_8bit => match color_format.channel_count {
            ChannelCount::L => ExtendedColorType::L8,
            ChannelCount::LA => ExtendedColorType::La8,
            ChannelCount::Rgb => ExtendedColorType::Rgb8,
            ChannelCount::Rgba => ExtendedColorType::Rgba8,
        },
        ChannelSize::_16bit => match color_format.channel_count {
            ChannelCount::L => ExtendedColorType::L16,
            ChannelCount::LA => ExtendedColorType::La16,
            ChannelCount::Rgb => ExtendedColorType::Rgb16,
            ChannelCount::Rgba => ExtendedColorType::Rgba16,
        },

        _ => {
            return Err(Error::UnsupportedFormat(format!(
                "PNG channel size: {:?}",
                color_format.channel_size
            )));
        }
    };

    let mut encoded = Vec::new();
    PngEncoder::new(&mut encoded)
        .write_image(image.bytes(), image.width(), image.height(), color_type)
        .map_err(|e| Error::Encoding(e.to_string()))?;

    Ok(encoded)
}

fn decode_error(e: tiff::TiffError) -> Error {
    Error::Decode(e.to_string())
}
