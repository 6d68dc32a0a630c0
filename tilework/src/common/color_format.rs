use crate::common::error::{Error, Result};

#[derive(Debug, Hash, PartialEq, Eq, Copy, Clone, Default)]
#[repr(u8)]
pub enum ChannelCount {
    L = 1,
    LA = 2,
    #[default]
    Rgb = 3,
    Rgba = 4,
}

#[derive(Debug, Hash, PartialEq, Eq, Copy, Clone, Default)]
#[repr(u8)]
pub enum ChannelSize {
    #[default]
    _8bit = 1,
    _16bit = 2,
    _32bit = 4,
}

#[derive(Debug, Hash, PartialEq, Eq, Copy, Clone, Default)]
#[repr(u8)]
pub enum ChannelType {
    #[default]
    UInt,
    Float,
}

#[derive(Clone, Copy, Debug, Hash, Default, PartialEq, Eq)]
pub struct ColorFormat {
    pub channel_count: ChannelCount,
    pub channel_size: ChannelSize,
    pub channel_type: ChannelType,
}

impl ChannelCount {
    pub fn channel_count(&self) -> u8 {
        *self as u8
    }
    pub fn byte_count(&self, channel_size: ChannelSize) -> u8 {
        self.channel_count() * channel_size.byte_count()
    }
    /// True for formats that carry distinct red and blue channels.
    pub fn has_color(&self) -> bool {
        matches!(self, ChannelCount::Rgb | ChannelCount::Rgba)
    }
}

impl ChannelSize {
    pub fn byte_count(&self) -> u8 {
        *self as u8
    }
    pub(crate) fn from_bit_count(bit_count: u8) -> Result<ChannelSize> {
        match bit_count {
            8 => Ok(ChannelSize::_8bit),
            16 => Ok(ChannelSize::_16bit),
            32 => Ok(ChannelSize::_32bit),
            _ => Err(Error::InvalidColorFormat(format!(
                "invalid channel size: {} bits",
                bit_count
            ))),
        }
    }
}

impl ColorFormat {
    pub const fn new(
        channel_count: ChannelCount,
        channel_size: ChannelSize,
        channel_type: ChannelType,
    ) -> Self {
        Self {
            channel_count,
            channel_size,
            channel_type,
        }
    }

    pub fn byte_count(&self) -> u8 {
        self.channel_count.byte_count(self.channel_size)
    }

    pub fn is_supported(&self) -> bool {
        ALL_FORMATS.contains(self)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.is_supported() {
            return Err(Error::InvalidColorFormat(format!(
                "unsupported color format: {}",
                self
            )));
        }
        Ok(())
    }
}

macro_rules! define_color_formats {
    ($($name:ident => ($count:ident, $size:ident, $ty:ident)),+ $(,)?) => {
        impl ColorFormat {
            $(
                pub const $name: ColorFormat =
                    ColorFormat::new(ChannelCount::$count, ChannelSize::$size, ChannelType::$ty);
            )+
        }
    };
}

define_color_formats!(
    L_U8 => (L, _8bit, UInt),
    L_U16 => (L, _16bit, UInt),
    L_F32 => (L, _32bit, Float),
    LA_U8 => (LA, _8bit, UInt),
    LA_U16 => (LA, _16bit, UInt),
    LA_F32 => (LA, _32bit, Float),
    RGB_U8 => (Rgb, _8bit, UInt),
    RGB_U16 => (Rgb, _16bit, UInt),
    RGB_F32 => (Rgb, _32bit, Float),
    RGBA_U8 => (Rgba, _8bit, UInt),
    RGBA_U16 => (Rgba, _16bit, UInt),
    RGBA_F32 => (Rgba, _32bit, Float),
);

impl From<(ChannelCount, ChannelSize, ChannelType)> for ColorFormat {
    fn from(value: (ChannelCount, ChannelSize, ChannelType)) -> Self {
        ColorFormat::new(value.0, value.1, value.2)
    }
}

impl std::fmt::Display for ChannelCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChannelCount::L => write!(f, "L"),
            ChannelCount::LA => write!(f, "LA"),
            ChannelCount::Rgb => write!(f, "RGB"),
            ChannelCount::Rgba => write!(f, "RGBA"),
        }
    }
}

impl std::fmt::Display for ChannelSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChannelSize::_8bit => write!(f, "8"),
            ChannelSize::_16bit => write!(f, "16"),
            ChannelSize::_32bit => write!(f, "32"),
        }
    }
}

impl std::fmt::Display for ChannelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChannelType::UInt => write!(f, "u"),
            ChannelType::Float => write!(f, "f"),
        }
    }
}

impl std::fmt::Display for ColorFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {}{}",
            self.channel_count, self.channel_type, self.channel_size
        )
    }
}

/// All supported color formats.
pub const ALL_FORMATS: &[ColorFormat] = &[
    //
    ColorFormat::L_U8,
    ColorFormat::L_U16,
    ColorFormat::L_F32,
    //
    ColorFormat::LA_U8,
    ColorFormat::LA_U16,
    ColorFormat::LA_F32,
    //
    ColorFormat::RGB_U8,
    ColorFormat::RGB_U16,
    ColorFormat::RGB_F32,
    //
    ColorFormat::RGBA_U8,
    ColorFormat::RGBA_U16,
    ColorFormat::RGBA_F32,
];
