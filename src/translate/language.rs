//! Language-code handling shared by the catalog and the translation backend.
//!
//! The catalog speaks lowercase ISO 639-1 codes (`en`, `de`, `no`), the
//! backend speaks its own dialect (`EN`, `NB`, `EN-US`). Codes are mapped
//! at the backend boundary only; everything inside the pipeline uses the
//! catalog form.

pub fn normalize(code: &str) -> String {
    code.trim().to_lowercase()
}

/// `en-US` -> `en`
pub fn base_code(code: &str) -> String {
    let normalized = normalize(code);
    match normalized.split_once('-') {
        Some((base, _)) => base.to_string(),
        None => normalized,
    }
}

pub fn to_backend_code(code: &str) -> String {
    match normalize(code).as_str() {
        "no" => "NB".to_string(),
        other => other.to_uppercase(),
    }
}

pub fn to_catalog_code(code: &str) -> String {
    match normalize(code).as_str() {
        "nb" => "no".to_string(),
        other => other.to_string(),
    }
}

pub fn same_language(a: &str, b: &str) -> bool {
    base_code(&to_catalog_code(a)) == base_code(&to_catalog_code(b))
}

/// Normalize a requested target list: drop blanks and duplicates (first
/// occurrence wins) and, with `skip_source`, any target that is the source
/// language itself.
pub fn resolve_targets<S: AsRef<str>>(source: &str, targets: &[S], skip_source: bool) -> Vec<String> {
    let mut resolved: Vec<String> = Vec::with_capacity(targets.len());
    for target in targets {
        let code = normalize(target.as_ref());
        if code.is_empty() || resolved.contains(&code) {
            continue;
        }
        if skip_source && same_language(source, &code) {
            continue;
        }
        resolved.push(code);
    }
    resolved
}

/// Parse a comma-separated CLI list such as `de, fr,ja`.
pub fn parse_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(normalize)
        .filter(|code| !code.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_code() {
        assert_eq!(base_code("EN-us"), "en");
        assert_eq!(base_code(" pt "), "pt");
    }

    #[test]
    fn test_norwegian_mapping() {
        assert_eq!(to_backend_code("no"), "NB");
        assert_eq!(to_backend_code("de"), "DE");
        assert_eq!(to_catalog_code("NB"), "no");
        assert_eq!(to_catalog_code("EN-GB"), "en-gb");
        assert!(same_language("nb", "no"));
    }

    #[test]
    fn test_resolve_targets_keeps_order_and_drops_source() {
        let targets = ["de", "EN", "fr", "de", " ", "en-US", "ja"];
        assert_eq!(resolve_targets("en", &targets, true), vec!["de", "fr", "ja"]);
        assert_eq!(
            resolve_targets("en", &targets, false),
            vec!["de", "en", "fr", "en-us", "ja"]
        );
    }

    #[test]
    fn test_parse_list() {
        assert_eq!(parse_list("de, FR,,ja "), vec!["de", "fr", "ja"]);
        assert!(parse_list("").is_empty());
    }
}
