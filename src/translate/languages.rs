//! Supported-language catalog and the pair-to-model lookup table.
//!
//! The tables are data, not logic: every direct translation the service
//! can perform is listed here explicitly, and anything else either goes
//! through the English pivot or is reported as unavailable.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    European,
    Asian,
    MiddleEastern,
    African,
}

#[derive(Debug, Clone, Copy)]
pub struct Language {
    pub code: &'static str,
    pub name: &'static str,
    pub region: Region,
}

/// All languages the API accepts (ISO 639-1 codes).
pub const LANGUAGES: &[Language] = &[
    Language { code: "en", name: "English", region: Region::European },
    Language { code: "es", name: "Spanish", region: Region::European },
    Language { code: "fr", name: "French", region: Region::European },
    Language { code: "de", name: "German", region: Region::European },
    Language { code: "it", name: "Italian", region: Region::European },
    Language { code: "pt", name: "Portuguese", region: Region::European },
    Language { code: "ru", name: "Russian", region: Region::European },
    Language { code: "zh", name: "Chinese", region: Region::Asian },
    Language { code: "ja", name: "Japanese", region: Region::Asian },
    Language { code: "ko", name: "Korean", region: Region::Asian },
    Language { code: "ar", name: "Arabic", region: Region::MiddleEastern },
    Language { code: "sw", name: "Swahili", region: Region::African },
    Language { code: "yo", name: "Yoruba", region: Region::African },
    Language { code: "ig", name: "Igbo", region: Region::African },
    Language { code: "ha", name: "Hausa", region: Region::African },
    Language { code: "am", name: "Amharic", region: Region::African },
    Language { code: "so", name: "Somali", region: Region::African },
    Language { code: "zu", name: "Zulu", region: Region::African },
    Language { code: "xh", name: "Xhosa", region: Region::African },
    Language { code: "rw", name: "Kinyarwanda", region: Region::African },
    Language { code: "ny", name: "Chichewa", region: Region::African },
    Language { code: "mg", name: "Malagasy", region: Region::African },
    Language { code: "ln", name: "Lingala", region: Region::African },
    Language { code: "sn", name: "Shona", region: Region::African },
    Language { code: "st", name: "Sesotho", region: Region::African },
    Language { code: "tn", name: "Setswana", region: Region::African },
];

/// Verified pair -> Helsinki-NLP model identifiers. Only models that
/// actually exist on the hub are listed; note the `swc` and `jap`
/// naming quirks for Swahili and Japanese.
pub const MODEL_PAIRS: &[(&str, &str, &str)] = &[
    // European
    ("en", "es", "Helsinki-NLP/opus-mt-en-es"),
    ("es", "en", "Helsinki-NLP/opus-mt-es-en"),
    ("en", "fr", "Helsinki-NLP/opus-mt-en-fr"),
    ("fr", "en", "Helsinki-NLP/opus-mt-fr-en"),
    ("en", "de", "Helsinki-NLP/opus-mt-en-de"),
    ("de", "en", "Helsinki-NLP/opus-mt-de-en"),
    ("en", "it", "Helsinki-NLP/opus-mt-en-it"),
    ("it", "en", "Helsinki-NLP/opus-mt-it-en"),
    ("en", "pt", "Helsinki-NLP/opus-mt-en-pt"),
    ("pt", "en", "Helsinki-NLP/opus-mt-pt-en"),
    ("en", "ru", "Helsinki-NLP/opus-mt-en-ru"),
    ("ru", "en", "Helsinki-NLP/opus-mt-ru-en"),
    // Asian
    ("en", "zh", "Helsinki-NLP/opus-mt-en-zh"),
    ("zh", "en", "Helsinki-NLP/opus-mt-zh-en"),
    ("en", "ja", "Helsinki-NLP/opus-mt-en-jap"),
    ("ja", "en", "Helsinki-NLP/opus-mt-jap-en"),
    ("en", "ko", "Helsinki-NLP/opus-mt-en-ko"),
    ("ko", "en", "Helsinki-NLP/opus-mt-ko-en"),
    // Middle Eastern
    ("en", "ar", "Helsinki-NLP/opus-mt-en-ar"),
    ("ar", "en", "Helsinki-NLP/opus-mt-ar-en"),
    // African, English pairs
    ("en", "sw", "Helsinki-NLP/opus-mt-en-swc"),
    ("sw", "en", "Helsinki-NLP/opus-mt-swc-en"),
    ("en", "yo", "Helsinki-NLP/opus-mt-en-yo"),
    ("yo", "en", "Helsinki-NLP/opus-mt-yo-en"),
    ("en", "ig", "Helsinki-NLP/opus-mt-en-ig"),
    ("ig", "en", "Helsinki-NLP/opus-mt-ig-en"),
    ("en", "ha", "Helsinki-NLP/opus-mt-en-ha"),
    ("ha", "en", "Helsinki-NLP/opus-mt-ha-en"),
    ("en", "am", "Helsinki-NLP/opus-mt-en-am"),
    ("am", "en", "Helsinki-NLP/opus-mt-am-en"),
    ("en", "so", "Helsinki-NLP/opus-mt-en-so"),
    ("so", "en", "Helsinki-NLP/opus-mt-so-en"),
    ("en", "xh", "Helsinki-NLP/opus-mt-en-xh"),
    ("xh", "en", "Helsinki-NLP/opus-mt-xh-en"),
    ("en", "rw", "Helsinki-NLP/opus-mt-en-rw"),
    ("rw", "en", "Helsinki-NLP/opus-mt-rw-en"),
    ("en", "ny", "Helsinki-NLP/opus-mt-en-ny"),
    ("ny", "en", "Helsinki-NLP/opus-mt-ny-en"),
    ("en", "mg", "Helsinki-NLP/opus-mt-en-mg"),
    ("mg", "en", "Helsinki-NLP/opus-mt-mg-en"),
    ("en", "ln", "Helsinki-NLP/opus-mt-en-ln"),
    ("ln", "en", "Helsinki-NLP/opus-mt-ln-en"),
    // Direct non-English European pairs
    ("es", "fr", "Helsinki-NLP/opus-mt-es-fr"),
    ("fr", "es", "Helsinki-NLP/opus-mt-fr-es"),
    ("de", "fr", "Helsinki-NLP/opus-mt-de-fr"),
    ("fr", "de", "Helsinki-NLP/opus-mt-fr-de"),
    ("es", "pt", "Helsinki-NLP/opus-mt-es-pt"),
    ("pt", "es", "Helsinki-NLP/opus-mt-pt-es"),
];

/// How a language pair will be translated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Direct(&'static str),
    /// Two model passes through English.
    Pivot {
        to_english: &'static str,
        from_english: &'static str,
    },
}

impl Route {
    pub fn kind(&self) -> &'static str {
        match self {
            Route::Direct(_) => "direct",
            Route::Pivot { .. } => "pivot",
        }
    }

    pub fn describe(&self, source: &str, target: &str) -> String {
        match self {
            Route::Direct(_) => format!("{source} -> {target}"),
            Route::Pivot { .. } => format!("{source} -> en -> {target}"),
        }
    }
}

pub fn language(code: &str) -> Option<&'static Language> {
    LANGUAGES.iter().find(|l| l.code == code)
}

pub fn is_supported(code: &str) -> bool {
    language(code).is_some()
}

pub fn direct_model(source: &str, target: &str) -> Option<&'static str> {
    MODEL_PAIRS
        .iter()
        .find(|(s, t, _)| *s == source && *t == target)
        .map(|(_, _, m)| *m)
}

/// Resolve the route for a supported pair: a direct model when one
/// exists, otherwise the English pivot when both legs exist, otherwise
/// `None` (no model path at all, e.g. Zulu in either position).
pub fn resolve_route(source: &str, target: &str) -> Option<Route> {
    if let Some(model) = direct_model(source, target) {
        return Some(Route::Direct(model));
    }
    let to_english = direct_model(source, "en")?;
    let from_english = direct_model("en", target)?;
    Some(Route::Pivot { to_english, from_english })
}

/// Codes that appear on either side of the model table, i.e. languages
/// reachable without relying on a missing model.
pub fn available_codes() -> Vec<&'static str> {
    LANGUAGES
        .iter()
        .filter(|l| {
            MODEL_PAIRS
                .iter()
                .any(|(s, t, _)| *s == l.code || *t == l.code)
        })
        .map(|l| l.code)
        .collect()
}

/// Direct pairs involving `code`, as (source, target) tuples.
pub fn direct_pairs_for(code: &str) -> Vec<(&'static str, &'static str)> {
    MODEL_PAIRS
        .iter()
        .filter(|(s, t, _)| *s == code || *t == code)
        .map(|(s, t, _)| (*s, *t))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_twenty_six_languages() {
        assert_eq!(LANGUAGES.len(), 26);
        let african = LANGUAGES
            .iter()
            .filter(|l| l.region == Region::African)
            .count();
        assert_eq!(african, 15);
    }

    #[test]
    fn codes_are_unique() {
        for (i, a) in LANGUAGES.iter().enumerate() {
            for b in &LANGUAGES[i + 1..] {
                assert_ne!(a.code, b.code);
            }
        }
    }

    #[test]
    fn model_pairs_only_reference_catalog_codes() {
        for (s, t, _) in MODEL_PAIRS {
            assert!(is_supported(s), "unknown source {s}");
            assert!(is_supported(t), "unknown target {t}");
        }
    }

    #[test]
    fn swahili_and_japanese_use_hub_naming_quirks() {
        assert_eq!(direct_model("en", "sw"), Some("Helsinki-NLP/opus-mt-en-swc"));
        assert_eq!(direct_model("ja", "en"), Some("Helsinki-NLP/opus-mt-jap-en"));
    }

    #[test]
    fn direct_route_wins_over_pivot() {
        match resolve_route("fr", "de") {
            Some(Route::Direct("Helsinki-NLP/opus-mt-fr-de")) => {}
            other => panic!("expected direct fr->de, got {other:?}"),
        }
    }

    #[test]
    fn african_cross_pair_pivots_through_english() {
        match resolve_route("sw", "yo") {
            Some(Route::Pivot { to_english, from_english }) => {
                assert_eq!(to_english, "Helsinki-NLP/opus-mt-swc-en");
                assert_eq!(from_english, "Helsinki-NLP/opus-mt-en-yo");
            }
            other => panic!("expected pivot sw->yo, got {other:?}"),
        }
    }

    #[test]
    fn zulu_has_no_route() {
        assert!(is_supported("zu"));
        assert_eq!(resolve_route("zu", "en"), None);
        assert_eq!(resolve_route("en", "zu"), None);
        assert_eq!(resolve_route("zu", "sw"), None);
    }

    #[test]
    fn unavailable_codes_are_excluded_from_available_set() {
        let available = available_codes();
        assert!(available.contains(&"en"));
        assert!(available.contains(&"ny"));
        for code in ["zu", "sn", "st", "tn"] {
            assert!(!available.contains(&code), "{code} should be unavailable");
        }
    }
}
