//! Wire format of the JSON manifests read by the Pocket loader.
//!
//! Every manifest is an object with a single key naming the manifest
//! (`"core"`, `"video"`, ...) whose value carries `"magic": "APF_VER_1"`.
//! Field order here is the order fields are written.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Schema-version tag stamped into every manifest.
pub const MAGIC: &str = "APF_VER_1";

/// Product the core framework block targets.
pub const TARGET_PRODUCT: &str = "Analogue Pocket";

/// Minimum firmware version the generated manifests require.
pub const VERSION_REQUIRED: &str = "1.1";

/// `Platforms/{id}.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformJson {
    /// Platform description.
    pub platform: PlatformManifest,
}

/// Body of a platform manifest. Platform manifests carry no magic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformManifest {
    /// Display name of the platform.
    pub name: String,
    /// Manufacturer of the original hardware.
    pub manufacturer: String,
    /// Release year of the original hardware.
    pub year: i64,
    /// Optional grouping shown by the loader.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// `core.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreJson {
    /// Core description.
    pub core: CoreManifest,
}

/// Body of `core.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreManifest {
    /// Always [`MAGIC`].
    pub magic: String,
    /// Identity and release information.
    pub metadata: CoreMetadata,
    /// Framework capabilities the core relies on.
    pub framework: Framework,
    /// Bitstreams shipped with the core.
    pub cores: Vec<CoreEntry>,
}

/// Identity block of `core.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreMetadata {
    /// Ids of the platforms this core belongs to, in declaration order.
    pub platform_ids: Vec<String>,
    /// Core author.
    pub author: String,
    /// Core name.
    pub shortname: String,
    /// Core version string.
    pub version: String,
    /// Release date as `YYYY-MM-DD`.
    pub date_release: String,
    /// One-line description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Project homepage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Framework block of `core.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Framework {
    /// Always [`TARGET_PRODUCT`].
    pub target_product: String,
    /// Always [`VERSION_REQUIRED`].
    pub version_required: String,
    /// Whether the core supports sleep/resume.
    pub sleep_supported: bool,
    /// Dock capabilities.
    pub dock: Dock,
    /// Hardware capabilities.
    pub hardware: Hardware,
}

/// Dock capabilities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dock {
    /// The loader requires this to be `true`.
    pub supported: bool,
    /// Analog video output through the dock.
    pub analog_output: bool,
}

impl Default for Dock {
    fn default() -> Self {
        Self {
            supported: true,
            analog_output: false,
        }
    }
}

/// Hardware capabilities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hardware {
    /// Link cable port usage.
    pub link_port: bool,
    /// Cartridge adapter id, `-1` for none.
    pub cartridge_adapter: i64,
}

impl Default for Hardware {
    fn default() -> Self {
        Self {
            link_port: false,
            cartridge_adapter: -1,
        }
    }
}

/// One bitstream listed in `core.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreEntry {
    /// Ordinal of the bitstream in the package.
    pub id: usize,
    /// Name, at most 15 characters.
    pub name: String,
    /// File name next to `core.json`.
    pub filename: String,
}

/// `video.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoJson {
    /// Video description.
    pub video: VideoManifest,
}

/// Body of `video.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoManifest {
    /// Always [`MAGIC`].
    pub magic: String,
    /// One entry per supported video mode.
    pub scaler_modes: Vec<ScalerMode>,
}

/// A video mode as the scaler sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScalerMode {
    /// Active width in pixels.
    pub width: u32,
    /// Active height in pixels.
    pub height: u32,
    /// Reduced display aspect ratio numerator.
    pub aspect_w: u128,
    /// Reduced display aspect ratio denominator.
    pub aspect_h: u128,
    /// Rotation in degrees.
    pub rotation: u32,
    /// Bit 1: horizontal mirror, bit 0: vertical mirror.
    pub mirror: u8,
}

macro_rules! skeleton_manifest {
    ($(#[$doc:meta])* $wrapper:ident { $key:ident : $body:ident { $($field:ident),* } }) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
        pub struct $wrapper {
            #[doc = concat!("Contents of `", stringify!($key), ".json`.")]
            pub $key: $body,
        }

        #[doc = concat!("Body of `", stringify!($key), ".json`.")]
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        pub struct $body {
            /// Always [`MAGIC`].
            pub magic: String,
            $(
                #[doc = concat!("Declared `", stringify!($field), "`; empty until the feature is described.")]
                pub $field: Vec<Value>,
            )*
        }

        impl Default for $body {
            fn default() -> Self {
                Self {
                    magic: MAGIC.to_string(),
                    $($field: Vec::new(),)*
                }
            }
        }
    };
}

skeleton_manifest! {
    /// `audio.json`
    AudioJson { audio: AudioManifest {} }
}

skeleton_manifest! {
    /// `input.json`
    InputJson { input: InputManifest { controllers } }
}

skeleton_manifest! {
    /// `interact.json`
    InteractJson { interact: InteractManifest { variables, messages } }
}

skeleton_manifest! {
    /// `data.json`
    DataJson { data: DataManifest { data_slots } }
}

skeleton_manifest! {
    /// `variants.json`
    VariantsJson { variants: VariantsManifest { variant_list } }
}
