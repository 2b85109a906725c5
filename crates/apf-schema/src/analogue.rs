//! The fixed schema for `analogue.toml` core descriptions.
//!
//! ```text
//! metadata.platform[]   id, name, manufacturer, year, category?   (0..=4)
//! metadata.core         author, name, version, description?, description_long?,
//!                       url?, release_date?
//! core                  sleep_supported?
//! video.mode[]          width, height, pixel_width? <-> pixel_height?, rotation?,
//!                       mirror_horizontal?, mirror_vertical?, configuration?
//! audio, input, interact, data   (no properties yet)
//! ```

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::rule::{ArrayRule, Format, IntegerRule, ObjectRule, Rule, StringRule, ValidationError};

/// Maximum number of platforms a single core may declare.
pub const MAX_PLATFORMS: usize = 4;

/// Platform identifiers: lowercase alphanumerics and underscores, not starting
/// with an underscore.
pub const PLATFORM_ID_PATTERN: &str = "^[a-z0-9][a-z0-9_]*$";

/// Versions must start with three numeric components.
pub const VERSION_PATTERN: &str = r"^(\d+).(\d+).(\d+)";

/// Rotations (in degrees) the scaler supports.
pub const ROTATIONS: [i64; 4] = [0, 90, 180, 270];

static SCHEMA: LazyLock<Rule> = LazyLock::new(build);

/// The compiled schema, built on first use.
pub fn schema() -> &'static Rule {
    &SCHEMA
}

/// Validate a parsed configuration document.
///
/// # Errors
///
/// Returns the first [`ValidationError`] found.
pub fn validate(document: &Value) -> Result<(), ValidationError> {
    schema().validate(document)
}

fn string(max_length: usize) -> StringRule {
    StringRule::new().max_length(max_length)
}

fn pattern(re: &str) -> Regex {
    Regex::new(re).expect("schema patterns are valid regexes")
}

fn platform() -> Rule {
    Rule::Object(
        ObjectRule::new()
            .property(
                "id",
                Rule::String(string(15).pattern(pattern(PLATFORM_ID_PATTERN))),
            )
            .property("category", Rule::String(string(31)))
            .property("name", Rule::String(string(31)))
            .property("manufacturer", Rule::String(string(31)))
            .property("year", Rule::Integer(IntegerRule::new()))
            .required(&["id", "name", "manufacturer", "year"]),
    )
}

fn core_metadata() -> Rule {
    Rule::Object(
        ObjectRule::new()
            .property("author", Rule::String(string(31)))
            .property("name", Rule::String(string(31)))
            .property("description", Rule::String(string(63)))
            .property("description_long", Rule::String(StringRule::new()))
            .property("url", Rule::String(string(63).format(Format::Uri)))
            .property(
                "version",
                Rule::String(string(31).pattern(pattern(VERSION_PATTERN))),
            )
            .property(
                "release_date",
                Rule::String(string(10).min_length(10).format(Format::Date)),
            )
            .required(&["author", "name", "version"]),
    )
}

fn video_mode() -> Rule {
    Rule::Object(
        ObjectRule::new()
            .property("width", Rule::Integer(IntegerRule::new().minimum(16).maximum(800)))
            .property("height", Rule::Integer(IntegerRule::new().minimum(16).maximum(720)))
            .property("pixel_width", Rule::Integer(IntegerRule::new().minimum(1)))
            .property("pixel_height", Rule::Integer(IntegerRule::new().minimum(1)))
            .property("rotation", Rule::Integer(IntegerRule::new().one_of(&ROTATIONS)))
            .property("mirror_horizontal", Rule::Boolean)
            .property("mirror_vertical", Rule::Boolean)
            .property("configuration", Rule::AnyObject)
            .required(&["width", "height"])
            .dependent_required("pixel_width", &["pixel_height"])
            .dependent_required("pixel_height", &["pixel_width"]),
    )
}

fn build() -> Rule {
    let metadata = ObjectRule::new()
        .property(
            "platform",
            Rule::Array(ArrayRule::of(platform()).min_items(0).max_items(MAX_PLATFORMS)),
        )
        .property("core", core_metadata())
        .required(&["platform", "core"]);

    let core = ObjectRule::new().property("sleep_supported", Rule::Boolean);

    let video = ObjectRule::new()
        .property("mode", Rule::Array(ArrayRule::of(video_mode())))
        .required(&["mode"]);

    Rule::Object(
        ObjectRule::new()
            .property("metadata", Rule::Object(metadata))
            .property("core", Rule::Object(core))
            .property("audio", Rule::Object(ObjectRule::new()))
            .property("video", Rule::Object(video))
            .property("input", Rule::Object(ObjectRule::new()))
            .property("interact", Rule::Object(ObjectRule::new()))
            .property("data", Rule::Object(ObjectRule::new()))
            .required(&["metadata", "video"]),
    )
}
