//! Channel order of encoded patches, declared per source format.

use crate::prelude::*;

/// Container format of the image a patch was cut from, judged by file extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SourceFormat {
    Tiff,
    Png,
    Jpeg,
    Other,
}

impl SourceFormat {
    pub fn from_file_name(file_name: &str) -> Self {
        let Some(extension) = ::common::get_file_extension(file_name) else {
            return SourceFormat::Other;
        };

        match extension.to_ascii_lowercase().as_str() {
            "tif" | "tiff" => SourceFormat::Tiff,
            "png" => SourceFormat::Png,
            "jpg" | "jpeg" => SourceFormat::Jpeg,
            _ => SourceFormat::Other,
        }
    }
}

/// Channel order written into patch files.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ChannelOrder {
    /// Pixels are written exactly as decoded.
    #[default]
    Rgb,
    /// Red and blue are swapped before writing.
    Bgr,
}

impl ChannelOrder {
    pub(crate) fn apply(&self, image: &mut Image) {
        match self {
            ChannelOrder::Rgb => {}
            ChannelOrder::Bgr => image.swap_red_blue(),
        }
    }
}

/// Decides the channel order of the patches cut from a given source format.
pub trait EncodingPolicy: Send + Sync {
    fn channel_order(&self, source: SourceFormat) -> ChannelOrder;
}

/// TIFF sources produce BGR patches, every other source is written as decoded.
///
/// Downstream consumers of TIFF-derived patches read them with a BGR convention.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultEncodingPolicy;

impl EncodingPolicy for DefaultEncodingPolicy {
    fn channel_order(&self, source: SourceFormat) -> ChannelOrder {
        match source {
            SourceFormat::Tiff => ChannelOrder::Bgr,
            SourceFormat::Png | SourceFormat::Jpeg | SourceFormat::Other => ChannelOrder::Rgb,
        }
    }
}

/// Writes every patch as decoded regardless of source.
#[derive(Clone, Copy, Debug, Default)]
pub struct PreserveChannelOrder;

impl EncodingPolicy for PreserveChannelOrder {
    fn channel_order(&self, _source: SourceFormat) -> ChannelOrder {
        ChannelOrder::Rgb
    }
}
