use std::path::{Path, PathBuf};

use crate::prelude::*;

/// Deterministic 8-bit image where every pixel differs from its neighbours.
pub fn gradient_image(width: u32, height: u32, color_format: ColorFormat) -> Image {
    assert_eq!(color_format.channel_size, ChannelSize::_8bit);

    let desc = ImageDesc::new(width, height, color_format);
    let channels = color_format.channel_count.channel_count() as u32;
    let mut bytes = Vec::with_capacity(desc.size_in_bytes());

    for y in 0..height {
        for x in 0..width {
            for c in 0..channels {
                bytes.push(((x * 7 + y * 13 + c * 61) % 251) as u8);
            }
        }
    }

    Image::new_with_data(desc, bytes).unwrap()
}

pub fn gradient_rgb(width: u32, height: u32) -> Image {
    gradient_image(width, height, ColorFormat::RGB_U8)
}

/// Names of all regular files in `dir`, sorted.
pub fn file_names(dir: &Path) -> Vec<String> {
    ::common::file_utils::list_files(dir)
        .unwrap()
        .iter()
        .filter_map(|path| ::common::file_utils::file_name_str(path).map(str::to_string))
        .collect()
}

/// A fresh directory under the workspace `test_output`.
pub fn test_dir(name: &str) -> PathBuf {
    ::common::test_utils::fresh_test_dir(name)
}
