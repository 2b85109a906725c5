//! Derivation of the loader manifests from [`Metadata`].
//!
//! Every function here is pure: the same metadata always yields the same
//! manifest.

use apf_schema::manifest::{
    AudioJson, CoreEntry, CoreJson, CoreManifest, CoreMetadata, DataJson, Dock, Framework,
    Hardware, InputJson, InteractJson, MAGIC, PlatformJson, PlatformManifest, ScalerMode,
    TARGET_PRODUCT, VERSION_REQUIRED, VariantsJson, VideoJson, VideoManifest,
};

use crate::metadata::{Metadata, VideoMode};

/// Longest core name the loader displays.
pub const MAX_CORE_NAME: usize = 15;

/// File name of the `id`-th bitstream: `core_{id}.rbf_r`.
pub fn bitstream_filename(id: usize) -> String {
    format!("core_{id}.rbf_r")
}

/// One platform manifest per distinct platform id, paired with that id.
///
/// A repeated id keeps the position of its first declaration and the
/// contents of its last.
pub fn platform_jsons(meta: &Metadata) -> Vec<(String, PlatformJson)> {
    let mut out: Vec<(String, PlatformJson)> = Vec::with_capacity(meta.platforms().len());
    for p in meta.platforms() {
        let json = PlatformJson {
            platform: PlatformManifest {
                name: p.name.clone(),
                manufacturer: p.manufacturer.clone(),
                year: p.year,
                category: p.category.clone(),
            },
        };
        match out.iter_mut().find(|(id, _)| *id == p.id) {
            Some(slot) => slot.1 = json,
            None => out.push((p.id.clone(), json)),
        }
    }
    out
}

/// `core.json`, listing one bitstream per name in `core_names`.
pub fn core_json<S: AsRef<str>>(meta: &Metadata, core_names: &[S]) -> CoreJson {
    let metadata = CoreMetadata {
        platform_ids: meta.platforms().iter().map(|p| p.id.clone()).collect(),
        author: meta.author().to_string(),
        shortname: meta.name().to_string(),
        version: meta.version().to_string(),
        date_release: meta.release_date().to_string(),
        description: meta.description().map(str::to_string),
        url: meta.url().map(str::to_string),
    };

    let framework = Framework {
        target_product: TARGET_PRODUCT.to_string(),
        version_required: VERSION_REQUIRED.to_string(),
        sleep_supported: meta.options().sleep_supported,
        dock: Dock::default(),
        hardware: Hardware::default(),
    };

    let cores = core_names
        .iter()
        .enumerate()
        .map(|(id, name)| CoreEntry {
            id,
            name: name.as_ref().chars().take(MAX_CORE_NAME).collect(),
            filename: bitstream_filename(id),
        })
        .collect();

    CoreJson {
        core: CoreManifest {
            magic: MAGIC.to_string(),
            metadata,
            framework,
            cores,
        },
    }
}

/// Contents of `info.txt`; empty means the file is not emitted.
pub fn info_txt(meta: &Metadata) -> &str {
    meta.description_long().unwrap_or_default()
}

fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Display aspect ratio `(width / height) * (pixel_width / pixel_height)`,
/// reduced to lowest terms.
pub fn aspect_ratio(mode: &VideoMode) -> (u128, u128) {
    let num = u128::from(mode.width) * u128::from(mode.pixel_width);
    let den = u128::from(mode.height) * u128::from(mode.pixel_height);
    let g = gcd(num, den);
    (num / g, den / g)
}

/// Mirror flags packed as the scaler expects: bit 1 horizontal, bit 0 vertical.
pub fn mirror_bits(mode: &VideoMode) -> u8 {
    (u8::from(mode.mirror_horizontal) << 1) | u8::from(mode.mirror_vertical)
}

/// `video.json`
pub fn video_json(meta: &Metadata) -> VideoJson {
    let scaler_modes = meta
        .video_modes()
        .iter()
        .map(|mode| {
            let (aspect_w, aspect_h) = aspect_ratio(mode);
            ScalerMode {
                width: mode.width,
                height: mode.height,
                aspect_w,
                aspect_h,
                rotation: mode.rotation,
                mirror: mirror_bits(mode),
            }
        })
        .collect();

    VideoJson {
        video: VideoManifest {
            magic: MAGIC.to_string(),
            scaler_modes,
        },
    }
}

/// `audio.json`
pub fn audio_json() -> AudioJson {
    AudioJson::default()
}

/// `input.json`
pub fn input_json() -> InputJson {
    InputJson::default()
}

/// `interact.json`
pub fn interact_json() -> InteractJson {
    InteractJson::default()
}

/// `data.json`
pub fn data_json() -> DataJson {
    DataJson::default()
}

/// `variants.json`
pub fn variants_json() -> VariantsJson {
    VariantsJson::default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn metadata(extra_core: Value, modes: Value) -> Metadata {
        let mut core = json!({
            "author": "whitequark", "name": "demo", "version": "0.1.0",
            "release_date": "2024-03-01"
        });
        for (k, v) in extra_core.as_object().unwrap() {
            core[k] = v.clone();
        }
        Metadata::from_document(&json!({
            "metadata": {
                "platform": [
                    {"id": "snes", "name": "SNES", "manufacturer": "Nintendo", "year": 1990},
                    {"id": "gb", "name": "Game Boy", "manufacturer": "Nintendo", "year": 1989,
                     "category": "Handheld"}
                ],
                "core": core
            },
            "video": {"mode": modes}
        }))
        .unwrap()
    }

    fn mode(fields: Value) -> VideoMode {
        let meta = metadata(json!({}), json!([fields]));
        meta.video_modes()[0].clone()
    }

    #[test]
    fn aspect_ratio_is_exact_and_reduced() {
        let m = mode(json!({"width": 256, "height": 224, "pixel_width": 8, "pixel_height": 7}));
        assert_eq!(aspect_ratio(&m), (64, 49));

        let m = mode(json!({"width": 320, "height": 240}));
        assert_eq!(aspect_ratio(&m), (4, 3));

        let m = mode(json!({"width": 160, "height": 144}));
        assert_eq!(aspect_ratio(&m), (10, 9));
    }

    #[test]
    fn mirror_packing() {
        let cases = [
            (true, false, 2),
            (true, true, 3),
            (false, false, 0),
            (false, true, 1),
        ];
        for (h, v, expected) in cases {
            let m = mode(json!({
                "width": 16, "height": 16, "mirror_horizontal": h, "mirror_vertical": v
            }));
            assert_eq!(mirror_bits(&m), expected, "h={h} v={v}");
        }
    }

    #[test]
    fn video_manifest_fields() {
        let meta = metadata(
            json!({}),
            json!([{"width": 256, "height": 224, "pixel_width": 8, "pixel_height": 7,
                    "rotation": 90, "mirror_horizontal": true}]),
        );
        let json = serde_json::to_value(video_json(&meta)).unwrap();
        assert_eq!(
            json,
            json!({"video": {"magic": "APF_VER_1", "scaler_modes": [{
                "width": 256, "height": 224, "aspect_w": 64, "aspect_h": 49,
                "rotation": 90, "mirror": 2
            }]}})
        );
    }

    #[test]
    fn platform_manifests_keyed_by_id() {
        let meta = metadata(json!({}), json!([]));
        let platforms = platform_jsons(&meta);
        assert_eq!(platforms.len(), 2);
        assert_eq!(platforms[0].0, "snes");
        assert_eq!(platforms[0].1.platform.category, None);
        assert_eq!(platforms[1].1.platform.category.as_deref(), Some("Handheld"));
    }

    #[test]
    fn repeated_platform_ids_collapse() {
        let meta = Metadata::from_document(&json!({
            "metadata": {
                "platform": [
                    {"id": "snes", "name": "SNES", "manufacturer": "Nintendo", "year": 1990},
                    {"id": "gb", "name": "Game Boy", "manufacturer": "Nintendo", "year": 1989},
                    {"id": "snes", "name": "Super Famicom", "manufacturer": "Nintendo", "year": 1990}
                ],
                "core": {"author": "whitequark", "name": "demo", "version": "0.1.0",
                         "release_date": "2024-03-01"}
            },
            "video": {"mode": []}
        }))
        .unwrap();

        let platforms = platform_jsons(&meta);
        let ids: Vec<&str> = platforms.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, ["snes", "gb"]);
        assert_eq!(platforms[0].1.platform.name, "Super Famicom");

        let core = core_json::<&str>(&meta, &[]).core;
        assert_eq!(core.metadata.platform_ids, ["snes", "gb", "snes"]);
    }

    #[test]
    fn core_manifest_lists_bitstreams() {
        let meta = metadata(json!({}), json!([]));
        let core = core_json(&meta, &["main", "a_very_long_core_name"]).core;
        assert_eq!(core.magic, MAGIC);
        assert_eq!(core.metadata.platform_ids, ["snes", "gb"]);
        assert_eq!(core.metadata.shortname, "demo");
        assert_eq!(core.metadata.date_release, "2024-03-01");
        assert!(!core.framework.sleep_supported);
        assert!(core.framework.dock.supported);
        assert!(!core.framework.dock.analog_output);
        assert!(!core.framework.hardware.link_port);
        assert_eq!(core.framework.hardware.cartridge_adapter, -1);

        assert_eq!(core.cores.len(), 2);
        assert_eq!(core.cores[0].id, 0);
        assert_eq!(core.cores[0].filename, "core_0.rbf_r");
        assert_eq!(core.cores[1].name, "a_very_long_cor");
        assert_eq!(core.cores[1].filename, "core_1.rbf_r");
    }

    #[test]
    fn core_manifest_optional_metadata() {
        let meta = metadata(json!({}), json!([]));
        let json = serde_json::to_value(core_json::<&str>(&meta, &[])).unwrap();
        let block = &json["core"]["metadata"];
        assert!(block.get("description").is_none());
        assert!(block.get("url").is_none());

        let meta = metadata(
            json!({"description": "Demo core", "url": "https://example.com"}),
            json!([]),
        );
        let json = serde_json::to_value(core_json::<&str>(&meta, &[])).unwrap();
        assert_eq!(json["core"]["metadata"]["description"], "Demo core");
        assert_eq!(json["core"]["metadata"]["url"], "https://example.com");
    }

    #[test]
    fn info_text_defaults_to_empty() {
        let meta = metadata(json!({}), json!([]));
        assert_eq!(info_txt(&meta), "");
        let meta = metadata(json!({"description_long": "Hello"}), json!([]));
        assert_eq!(info_txt(&meta), "Hello");
    }

    #[test]
    fn skeleton_manifests() {
        assert_eq!(
            serde_json::to_value(input_json()).unwrap(),
            json!({"input": {"magic": "APF_VER_1", "controllers": []}})
        );
        assert_eq!(
            serde_json::to_value(data_json()).unwrap(),
            json!({"data": {"magic": "APF_VER_1", "data_slots": []}})
        );
        assert_eq!(
            serde_json::to_value(variants_json()).unwrap(),
            json!({"variants": {"magic": "APF_VER_1", "variant_list": []}})
        );
        assert_eq!(
            serde_json::to_value(audio_json()).unwrap(),
            json!({"audio": {"magic": "APF_VER_1"}})
        );
        assert_eq!(
            serde_json::to_value(interact_json()).unwrap()["interact"]["messages"],
            json!([])
        );
    }
}
