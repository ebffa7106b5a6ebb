// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Language registry — maps a language code to the recognizer language tag and
// the font resources used to render it.

use tracing::warn;

/// Language used when a requested code is not registered.
pub const FALLBACK_LANGUAGE: &str = "eng";

#[cfg(target_os = "macos")]
const SERIF_FONT: &str = "/Library/Fonts/Times New Roman.ttf";
#[cfg(target_os = "macos")]
const BLACKLETTER_FONT: &str = "/Library/Fonts/Canterbury.ttf";

#[cfg(target_os = "windows")]
const SERIF_FONT: &str = "C:\\Windows\\Fonts\\times.ttf";
#[cfg(target_os = "windows")]
const BLACKLETTER_FONT: &str = "C:\\Windows\\Fonts\\OLDENGL.TTF";

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const SERIF_FONT: &str = "/usr/share/fonts/truetype/dejavu/DejaVuSerif.ttf";
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const BLACKLETTER_FONT: &str = "/usr/share/fonts/truetype/unifraktur/UnifrakturMaguntia.ttf";

/// Per-language rendering and recognition resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageEntry {
    /// Registry key (ISO 639-2 style).
    pub code: &'static str,
    /// Language tag passed to the recognizer.
    pub recognizer_tag: &'static str,
    /// Font used for every condition except typeface substitution.
    pub default_font: &'static str,
    /// Font used for typeface substitution.
    pub blackletter_font: &'static str,
}

const LANGUAGES: &[LanguageEntry] = &[
    LanguageEntry {
        code: "eng",
        recognizer_tag: "eng",
        default_font: SERIF_FONT,
        blackletter_font: BLACKLETTER_FONT,
    },
    LanguageEntry {
        code: "deu",
        recognizer_tag: "deu",
        default_font: SERIF_FONT,
        blackletter_font: BLACKLETTER_FONT,
    },
    LanguageEntry {
        code: "fra",
        recognizer_tag: "fra",
        default_font: SERIF_FONT,
        blackletter_font: BLACKLETTER_FONT,
    },
    LanguageEntry {
        code: "ltz",
        recognizer_tag: "ltz",
        default_font: SERIF_FONT,
        blackletter_font: BLACKLETTER_FONT,
    },
];

/// Exact lookup; `None` for unregistered codes.
pub fn lookup(code: &str) -> Option<&'static LanguageEntry> {
    LANGUAGES.iter().find(|entry| entry.code == code)
}

/// Lookup with fallback to [`FALLBACK_LANGUAGE`], logging a warning when the
/// requested code is not registered.
pub fn resolve(code: &str) -> &'static LanguageEntry {
    match lookup(code) {
        Some(entry) => entry,
        None => {
            warn!(
                requested = code,
                fallback = FALLBACK_LANGUAGE,
                "unsupported language code; falling back"
            );
            &LANGUAGES[0]
        }
    }
}

/// All registered language codes.
pub fn supported_languages() -> impl Iterator<Item = &'static str> {
    LANGUAGES.iter().map(|entry| entry.code)
}
