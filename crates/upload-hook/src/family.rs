//! Platform identifier normalization.
//!
//! PlatformIO names the ESP platforms `espressif8266` and `espressif32`. The
//! upload scripts are keyed by the bare chip family (`esp8266`, `esp32`).

use std::borrow::Cow;
use std::fmt;

/// Ecosystem prefix carried by the build system's platform identifier.
pub const PLATFORM_PREFIX: &str = "espressif";

/// Replacement for [`PLATFORM_PREFIX`] in the bare family name.
pub const FAMILY_PREFIX: &str = "esp";

/// Microcontroller families that have an upload script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    /// ESP8266 (`espressif8266`)
    Esp8266,
    /// ESP32 (`espressif32`)
    Esp32,
}

impl Family {
    /// Every family, in dispatch order.
    pub const ALL: [Family; 2] = [Family::Esp8266, Family::Esp32];

    /// Bare family name as produced by [`normalize_platform`].
    pub const fn name(self) -> &'static str {
        match self {
            Family::Esp8266 => "esp8266",
            Family::Esp32 => "esp32",
        }
    }

    /// Exact, case-sensitive match against a normalized name.
    pub fn from_normalized(name: &str) -> Option<Family> {
        Family::ALL.into_iter().find(|family| family.name() == name)
    }

    /// Normalize a raw platform identifier and match it.
    pub fn detect(raw: &str) -> Option<Family> {
        Family::from_normalized(&normalize_platform(raw))
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Turn a build-system platform identifier into a bare family name.
///
/// A leading `espressif` is replaced by `esp`; anything else passes through
/// (trimmed) so the caller can report it as-is.
pub fn normalize_platform(raw: &str) -> Cow<'_, str> {
    let raw = raw.trim();
    match raw.strip_prefix(PLATFORM_PREFIX) {
        Some(rest) => Cow::Owned(format!("{FAMILY_PREFIX}{rest}")),
        None => Cow::Borrowed(raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_esp8266() {
        assert_eq!(normalize_platform("espressif8266"), "esp8266");
    }

    #[test]
    fn normalizes_esp32() {
        assert_eq!(normalize_platform("espressif32"), "esp32");
    }

    #[test]
    fn unknown_platform_passes_through() {
        assert_eq!(normalize_platform("unknown"), "unknown");
        assert_eq!(normalize_platform("atmelavr"), "atmelavr");
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert_eq!(normalize_platform("  espressif32\n"), "esp32");
    }

    #[test]
    fn prefix_only_strips_from_the_start() {
        assert_eq!(normalize_platform("xespressif32"), "xespressif32");
    }

    #[test]
    fn detect_maps_platforms_to_families() {
        assert_eq!(Family::detect("espressif8266"), Some(Family::Esp8266));
        assert_eq!(Family::detect("espressif32"), Some(Family::Esp32));
        assert_eq!(Family::detect("unknown"), None);
        assert_eq!(Family::detect("espressif32s3"), None);
    }

    #[test]
    fn bare_family_names_are_accepted() {
        assert_eq!(Family::detect("esp32"), Some(Family::Esp32));
    }

    #[test]
    fn matching_is_case_sensitive() {
        assert_eq!(Family::detect("ESPRESSIF32"), None);
        assert_eq!(Family::from_normalized("ESP8266"), None);
    }

    #[test]
    fn display_matches_name() {
        for family in Family::ALL {
            assert_eq!(family.to_string(), family.name());
        }
    }
}
