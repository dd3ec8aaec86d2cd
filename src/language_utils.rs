use anyhow::{Result, anyhow};
use isolang::Language;

/// Language utilities
///
/// Display metadata for the languages offered by the search front-end, plus
/// ISO 639-1 / 639-2 validation used when loading configuration.

/// A language the translation providers are expected to handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageInfo {
    /// Lowercase code sent to providers
    pub code: &'static str,
    /// English display name
    pub name: &'static str,
    /// Name of the language in itself
    pub native_name: &'static str,
}

const fn lang(code: &'static str, name: &'static str, native_name: &'static str) -> LanguageInfo {
    LanguageInfo { code, name, native_name }
}

static LANGUAGES: &[LanguageInfo] = &[
    lang("en", "English", "English"),
    lang("es", "Spanish", "Español"),
    lang("fr", "French", "Français"),
    lang("de", "German", "Deutsch"),
    lang("it", "Italian", "Italiano"),
    lang("pt", "Portuguese", "Português"),
    lang("ru", "Russian", "Русский"),
    lang("ja", "Japanese", "日本語"),
    lang("ko", "Korean", "한국어"),
    lang("zh", "Chinese", "中文"),
    lang("ar", "Arabic", "العربية"),
    lang("hi", "Hindi", "हिन्दी"),
    lang("tr", "Turkish", "Türkçe"),
    lang("pl", "Polish", "Polski"),
    lang("nl", "Dutch", "Nederlands"),
    lang("sv", "Swedish", "Svenska"),
    lang("da", "Danish", "Dansk"),
    lang("no", "Norwegian", "Norsk"),
    lang("fi", "Finnish", "Suomi"),
    lang("he", "Hebrew", "עברית"),
    lang("th", "Thai", "ไทย"),
    lang("vi", "Vietnamese", "Tiếng Việt"),
    lang("uk", "Ukrainian", "Українська"),
    lang("cs", "Czech", "Čeština"),
    lang("hu", "Hungarian", "Magyar"),
    lang("yo", "Yoruba", "Yorùbá"),
];

const RTL_CODES: &[&str] = &["ar", "he", "fa", "ur"];

/// Lowercase and trim a code the way providers expect it
pub fn normalize_code(code: &str) -> String {
    code.trim().to_lowercase()
}

/// All languages offered for translation, in menu order
pub fn supported_languages() -> &'static [LanguageInfo] {
    LANGUAGES
}

/// Look up the metadata for a code
pub fn language_info(code: &str) -> Option<&'static LanguageInfo> {
    let code = normalize_code(code);
    LANGUAGES.iter().find(|l| l.code == code)
}

/// Human-readable name for a code. Unknown codes come back upper-cased.
pub fn display_name(code: &str) -> String {
    match language_info(code) {
        Some(info) => info.name.to_string(),
        None => code.trim().to_uppercase(),
    }
}

/// Native name for a code, falling back like [`display_name`]
pub fn native_name(code: &str) -> String {
    match language_info(code) {
        Some(info) => info.native_name.to_string(),
        None => code.trim().to_uppercase(),
    }
}

/// Whether text in this language is written right-to-left
pub fn is_rtl(code: &str) -> bool {
    RTL_CODES.contains(&normalize_code(code).as_str())
}

/// Whether text in `source_language` has to go through a provider to reach `target_language`
///
/// Different spellings of one language (`fr`, `fra`, `fre`) need no translation.
pub fn needs_translation(target_language: &str, source_language: &str) -> bool {
    normalize_code(target_language) != normalize_code(source_language)
        && !language_codes_match(target_language, source_language)
}

/// Language code type
#[derive(Debug, PartialEq, Eq)]
pub enum LanguageCodeType {
    /// ISO 639-1 (2-letter) code
    Part1,
    /// ISO 639-2/T (3-letter) code
    Part2T,
    /// ISO 639-2/B (3-letter) code
    Part2B,
}

// ISO 639-2/B codes that differ from their 639-2/T form
fn bibliographic_to_terminologic(code: &str) -> Option<&'static str> {
    let mapped = match code {
        "fre" => "fra",
        "ger" => "deu",
        "dut" => "nld",
        "gre" => "ell",
        "chi" => "zho",
        "cze" => "ces",
        "ice" => "isl",
        "alb" => "sqi",
        "arm" => "hye",
        "baq" => "eus",
        "bur" => "mya",
        "per" => "fas",
        "geo" => "kat",
        "may" => "msa",
        "mac" => "mkd",
        "rum" => "ron",
        "slo" => "slk",
        "wel" => "cym",
        _ => return None,
    };
    Some(mapped)
}

/// Validate that a code is a real ISO 639-1 or ISO 639-2 code
pub fn validate_language_code(code: &str) -> Result<LanguageCodeType> {
    let code = normalize_code(code);

    match code.len() {
        2 if Language::from_639_1(&code).is_some() => Ok(LanguageCodeType::Part1),
        3 if Language::from_639_3(&code).is_some() => Ok(LanguageCodeType::Part2T),
        3 if bibliographic_to_terminologic(&code).is_some() => Ok(LanguageCodeType::Part2B),
        _ => Err(anyhow!("Invalid language code: {}", code)),
    }
}

/// Normalize a language code to ISO 639-2/T (3-letter) format
pub fn normalize_to_part2t(code: &str) -> Result<String> {
    let code = normalize_code(code);

    match validate_language_code(&code)? {
        LanguageCodeType::Part1 => Language::from_639_1(&code)
            .map(|l| l.to_639_3().to_string())
            .ok_or_else(|| anyhow!("Cannot normalize language code: {}", code)),
        LanguageCodeType::Part2T => Ok(code),
        LanguageCodeType::Part2B => bibliographic_to_terminologic(&code)
            .map(str::to_string)
            .ok_or_else(|| anyhow!("Cannot normalize language code: {}", code)),
    }
}

/// Check if two language codes represent the same language
pub fn language_codes_match(code1: &str, code2: &str) -> bool {
    match (normalize_to_part2t(code1), normalize_to_part2t(code2)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
