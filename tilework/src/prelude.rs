// Color formats
pub use crate::common::{ChannelCount, ChannelSize, ChannelType, ColorFormat, ALL_FORMATS};

// Error handling
pub use crate::common::{Error, GridInferenceError, Result};

// Image types
pub use crate::image::{Image, ImageDesc, SUPPORTED_EXTENSIONS};

// Grid
pub use crate::grid::{parse_patch_file_name, GridShape, PatchCoord, PatchNaming};

// Configuration
pub use crate::config::{PatcherConfig, ReassemblerConfig, TileworkConfig, UploadConfig};

// Encoding policy
pub use crate::encoding::{
    ChannelOrder, DefaultEncodingPolicy, EncodingPolicy, PreserveChannelOrder, SourceFormat,
};

// Patching and reassembly
pub use crate::manifest::{PatchEntry, PatchManifest, MANIFEST_FILE_NAME};
pub use crate::patcher::{divide_and_save, Patcher, DEFAULT_PATCH_SIZE};
pub use crate::reassembler::{
    infer_layout, recombine, recombine_manifest, stitch, PatchLayout, Reassembler, UploadTarget,
    DEFAULT_UPLOAD_BUCKET, DEFAULT_UPLOAD_KEY,
};

// Storage
pub use crate::storage::{
    read_image, write_image, FsStorage, InMemoryStorage, StorageAdapter, StorageError,
    StorageResult,
};
