//! Terminal formatting helpers.

const KIB: u64 = 1024;
const MIB: u64 = 1024 * KIB;

/// Byte count for the `info` listing. Manifests print exact bytes,
/// bitstreams print in KiB or MiB with one decimal.
pub fn format_size(bytes: u64) -> String {
    match bytes {
        b if b >= MIB => format!("{:.1} MiB", b as f64 / MIB as f64),
        b if b >= KIB => format!("{:.1} KiB", b as f64 / KIB as f64),
        b => format!("{b} B"),
    }
}
