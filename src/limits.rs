//! Limits that keep segmentation linear on hostile input.
//!
//! Exceeding a limit is not an error the caller sees: the scanner or the
//! dispatcher falls back to rendering the text unchanged.

/// Maximum marker matches honoured in a single scan.
pub const MAX_SCAN_MATCHES: usize = 4096;

/// Maximum markers in one marker set.
pub const MAX_MARKERS: usize = 256;

/// Maximum nesting of `Sequence`/`Guarded` rules.
pub const MAX_RULE_DEPTH: usize = 8;

/// Maximum tag name length considered by the known-tags marker.
/// Longer names cannot be widget names.
pub const MAX_TAG_NAME_LEN: usize = 64;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WidgetName;

    #[test]
    fn limits_are_reasonable() {
        const { assert!(MAX_SCAN_MATCHES >= 1024) };
        const { assert!(MAX_RULE_DEPTH >= 4) };
        const { assert!(MAX_MARKERS >= 64) };
    }

    #[test]
    fn every_widget_name_fits_tag_limit() {
        for widget in WidgetName::ALL {
            assert!(widget.as_str().len() <= MAX_TAG_NAME_LEN);
        }
    }
}
