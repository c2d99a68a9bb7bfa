use once_cell::sync::Lazy;
use regex::Regex;

/// Absolute URLs with the accepted scheme set. `app:` and `intent:` cover
/// the deep-link forms stored alongside ordinary web links.
static LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(https?|app|intent)://\S+$").expect("link regex"));

static DEEP_LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(app|intent)://").expect("deep link regex"));

pub fn valid_link_url(s: &str) -> bool {
    LINK_RE.is_match(s.trim())
}

pub fn is_deep_link(s: &str) -> bool {
    DEEP_LINK_RE.is_match(s.trim())
}

/// Folds the accented characters that show up in Portuguese titles and
/// category labels so search can ignore diacritics.
pub fn fold_diacritics(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        other => other,
    }
}

/// Lowercased, trimmed, diacritic-folded form used for matching.
pub fn normalize_for_search(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .chars()
        .map(fold_diacritics)
        .collect()
}

/// Sentence-case: first letter uppercase, rest untouched.
pub fn sentence_case(s: &str) -> String {
    let s = s.trim();
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_web_and_deep_links() {
        assert!(valid_link_url("https://example.com/fatura"));
        assert!(valid_link_url("http://example.com"));
        assert!(valid_link_url("app://banco/pagamentos"));
        assert!(valid_link_url("intent://scan/#Intent;scheme=zxing;end"));
        assert!(valid_link_url("  HTTPS://EXAMPLE.COM  "));
    }

    #[test]
    fn rejects_other_schemes_and_relative_urls() {
        assert!(!valid_link_url("ftp://example.com"));
        assert!(!valid_link_url("javascript:alert(1)"));
        assert!(!valid_link_url("example.com"));
        assert!(!valid_link_url("/caminho/relativo"));
        assert!(!valid_link_url("https://com espaco"));
        assert!(!valid_link_url(""));
    }

    #[test]
    fn deep_link_detection() {
        assert!(is_deep_link("app://banco"));
        assert!(is_deep_link("intent://abrir"));
        assert!(!is_deep_link("https://example.com"));
    }

    #[test]
    fn search_normalization_folds_case_and_accents() {
        assert_eq!(normalize_for_search("  Saúde "), "saude");
        assert_eq!(normalize_for_search("CONCLUÍDO"), "concluido");
        assert_eq!(normalize_for_search("Ação"), "acao");
    }

    #[test]
    fn sentence_case_first_letter_only() {
        assert_eq!(sentence_case("pagar conta"), "Pagar conta");
        assert_eq!(sentence_case(""), "");
        assert_eq!(sentence_case("  água"), "Água");
    }
}
