//! Text normalization utilities.

/// Normalize a scraped title: trim, drop newlines, turn tabs and
/// carriage returns into spaces.
pub fn normalize_title(s: &str) -> String {
    s.trim().replace('\n', "").replace(['\t', '\r'], " ")
}

/// Qualify a protocol-relative link with `https:`.
///
/// Links that already start with `https:` are returned unchanged, as are
/// links carrying any other scheme.
pub fn https_link(link: &str) -> String {
    let link = link.trim();
    if link.starts_with("//") {
        format!("https:{}", link)
    } else {
        link.to_string()
    }
}

/// Split a comma-separated name list, trimming names and dropping empties.
pub fn split_names(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_title() {
        assert_eq!(normalize_title("  Episode\n 1 "), "Episode 1");
        assert_eq!(normalize_title("A\tB\rC"), "A B C");
    }

    #[test]
    fn test_https_link() {
        assert_eq!(https_link("//cdn.example/x"), "https://cdn.example/x");
        assert_eq!(https_link("https://cdn.example/x"), "https://cdn.example/x");
        assert_eq!(https_link("http://cdn.example/x"), "http://cdn.example/x");
    }

    #[test]
    fn test_split_names() {
        assert_eq!(split_names("Action, Drama,,"), vec!["Action", "Drama"]);
        assert!(split_names("").is_empty());
        assert!(split_names(" , ").is_empty());
    }
}
