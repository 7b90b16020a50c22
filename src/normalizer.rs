// Case folding for every string that takes part in a comparison.

/// Lower-cases `s`. Empty input comes back empty.
pub fn normalize(s: &str) -> String {
    s.to_lowercase()
}

/// Same as [`normalize`] but lets an absent value stay absent.
pub fn normalize_opt(s: Option<&str>) -> Option<String> {
    s.map(normalize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_case() {
        assert_eq!(normalize("ABC"), normalize("abc"));
        assert_eq!(normalize("Sony Ericsson"), "sony ericsson");
    }

    #[test]
    fn is_idempotent() {
        for s in ["", "Canon EOS", "ÄÖÜ straße", "dsc-W310", "123"] {
            let once = normalize(s);
            assert_eq!(normalize(&once), once);
        }
    }

    #[test]
    fn absent_stays_absent() {
        assert_eq!(normalize_opt(None), None);
        assert_eq!(normalize_opt(Some("Cyber-shot")), Some("cyber-shot".to_string()));
        assert_eq!(normalize_opt(Some("")), Some(String::new()));
    }
}
