/// Builds a URL slug from free text: lowercase alphanumerics joined by single dashes.
pub fn slugify(text: &str) -> String {
    let slug = text
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<&str>>()
        .join("-");

    if slug.is_empty() {
        "tournament".to_string()
    } else {
        slug
    }
}

/// Candidate slug for the n-th collision (`base`, `base-2`, `base-3`, ...).
pub fn with_counter(base: &str, attempt: u32) -> String {
    if attempt <= 1 {
        base.to_string()
    } else {
        format!("{}-{}", base, attempt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_punctuation_and_spaces() {
        assert_eq!(slugify("Summer Cup  2025!"), "summer-cup-2025");
        assert_eq!(slugify("--U17 / Regional--"), "u17-regional");
    }

    #[test]
    fn empty_input_falls_back() {
        assert_eq!(slugify("!!!"), "tournament");
    }

    #[test]
    fn counter_suffix_starts_at_two() {
        assert_eq!(with_counter("cup", 1), "cup");
        assert_eq!(with_counter("cup", 2), "cup-2");
    }
}
