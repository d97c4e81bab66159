//! Language catalog — display names and their translation-service codes.
//!
//! [`LANGUAGES`] is an ordered, immutable table. The first entry is the
//! sentinel ("Select Language" with an empty code) meaning "no language
//! chosen"; starting a recording with the sentinel selected is a no-op.
//!
//! The UI renders the display names; the pipeline only ever sees the code.

// ---------------------------------------------------------------------------
// Language
// ---------------------------------------------------------------------------

/// One catalog entry: a human-readable name and the code the translation and
/// synthesis services expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    /// Display name shown in the language dropdown.
    pub name: &'static str,
    /// Service language code (e.g. `"fr"`). Empty only for the sentinel.
    pub code: &'static str,
}

/// Code of the sentinel entry — the empty string.
pub const SENTINEL_CODE: &str = "";

// ---------------------------------------------------------------------------
// LANGUAGES
// ---------------------------------------------------------------------------

/// The full catalog, sentinel first. Immutable for the process lifetime.
pub const LANGUAGES: &[Language] = &[
    Language { name: "Select Language", code: "" },
    Language { name: "Afrikaans", code: "af" },
    Language { name: "Arabic", code: "ar" },
    Language { name: "Bulgarian", code: "bg" },
    Language { name: "Bengali", code: "bn" },
    Language { name: "Bosnian", code: "bs" },
    Language { name: "Catalan", code: "ca" },
    Language { name: "Czech", code: "cs" },
    Language { name: "Danish", code: "da" },
    Language { name: "German", code: "de" },
    Language { name: "Greek", code: "el" },
    Language { name: "English", code: "en" },
    Language { name: "Spanish", code: "es" },
    Language { name: "Estonian", code: "et" },
    Language { name: "Finnish", code: "fi" },
    Language { name: "French", code: "fr" },
    Language { name: "Gujarati", code: "gu" },
    Language { name: "Hindi", code: "hi" },
    Language { name: "Croatian", code: "hr" },
    Language { name: "Hungarian", code: "hu" },
    Language { name: "Indonesian", code: "id" },
    Language { name: "Icelandic", code: "is" },
    Language { name: "Italian", code: "it" },
    Language { name: "Hebrew", code: "iw" },
    Language { name: "Japanese", code: "ja" },
    Language { name: "Javanese", code: "jw" },
    Language { name: "Khmer", code: "km" },
    Language { name: "Kannada", code: "kn" },
    Language { name: "Korean", code: "ko" },
    Language { name: "Latin", code: "la" },
    Language { name: "Latvian", code: "lv" },
    Language { name: "Malayalam", code: "ml" },
    Language { name: "Marathi", code: "mr" },
    Language { name: "Malay", code: "ms" },
    Language { name: "Myanmar (Burmese)", code: "my" },
    Language { name: "Nepali", code: "ne" },
    Language { name: "Dutch", code: "nl" },
    Language { name: "Norwegian", code: "no" },
    Language { name: "Polish", code: "pl" },
    Language { name: "Portuguese", code: "pt" },
    Language { name: "Romanian", code: "ro" },
    Language { name: "Russian", code: "ru" },
    Language { name: "Sinhala", code: "si" },
    Language { name: "Slovak", code: "sk" },
    Language { name: "Albanian", code: "sq" },
    Language { name: "Serbian", code: "sr" },
    Language { name: "Sundanese", code: "su" },
    Language { name: "Swedish", code: "sv" },
    Language { name: "Swahili", code: "sw" },
    Language { name: "Tamil", code: "ta" },
    Language { name: "Telugu", code: "te" },
    Language { name: "Thai", code: "th" },
    Language { name: "Filipino", code: "tl" },
    Language { name: "Turkish", code: "tr" },
    Language { name: "Ukrainian", code: "uk" },
    Language { name: "Urdu", code: "ur" },
    Language { name: "Vietnamese", code: "vi" },
    Language { name: "Chinese (Simplified)", code: "zh-CN" },
    Language { name: "Chinese (Mandarin/Taiwan)", code: "zh-TW" },
    Language { name: "Chinese (Mandarin)", code: "zh" },
];

// ---------------------------------------------------------------------------
// Lookup helpers
// ---------------------------------------------------------------------------

/// Resolve a display name to its service code.
///
/// Returns `None` for unknown names. The sentinel resolves to `Some("")`.
pub fn code_for(display_name: &str) -> Option<&'static str> {
    LANGUAGES
        .iter()
        .find(|l| l.name == display_name)
        .map(|l| l.code)
}

/// `true` when `code` is a non-sentinel entry of the catalog — the
/// precondition for starting a recording cycle.
pub fn is_valid_code(code: &str) -> bool {
    !code.is_empty() && LANGUAGES.iter().any(|l| l.code == code)
}

/// Iterator over all display names in catalog order (sentinel first).
pub fn names() -> impl Iterator<Item = &'static str> {
    LANGUAGES.iter().map(|l| l.name)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
