//! Output filename sanitization.
//!
//! Show titles become filenames, and titles like `M*A*S*H` or
//! `Kidou Senshi Gundam: Suisei no Majo` carry characters some filesystems
//! refuse. The rules differ per platform, so the core is testable with an
//! explicit flag.

/// Characters Windows refuses in filenames.
const WINDOWS_RESERVED: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Makes a show title safe to use as a filename on the host platform.
///
/// Windows strips its whole reserved set; other platforms only strip `:`.
/// En dashes become plain hyphens everywhere so the name stays portable.
#[must_use]
pub fn safe_filename(name: &str) -> String {
    sanitize(name, cfg!(windows))
}

fn sanitize(name: &str, windows: bool) -> String {
    name.chars()
        .filter_map(|c| {
            if c == '\u{2013}' {
                Some('-')
            } else if windows && WINDOWS_RESERVED.contains(&c) {
                None
            } else if !windows && c == ':' {
                None
            } else {
                Some(c)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn windows_rules_strip_the_reserved_set() {
        assert_eq!(sanitize("M*A*S*H: 1972", true), "MASH 1972");
        assert_eq!(sanitize(r#"a<b>c:d"e/f\g|h?i*j"#, true), "abcdefghij");
    }

    #[test]
    fn other_platforms_strip_only_colons() {
        assert_eq!(sanitize("What If...?: Vol. 1", false), "What If...? Vol. 1");
        assert_eq!(sanitize("M*A*S*H", false), "M*A*S*H");
    }

    #[test]
    fn en_dash_becomes_hyphen_on_every_platform() {
        assert_eq!(sanitize("Doctor Who \u{2013} Specials", true), "Doctor Who - Specials");
        assert_eq!(sanitize("Doctor Who \u{2013} Specials", false), "Doctor Who - Specials");
    }

    #[test]
    fn plain_titles_pass_through() {
        assert_eq!(sanitize("Breaking Bad", true), "Breaking Bad");
        assert_eq!(sanitize("Breaking Bad", false), "Breaking Bad");
    }

    #[test]
    fn host_sanitizer_never_keeps_colons() {
        assert!(!safe_filename("Show: Subtitle").contains(':'));
    }
}
