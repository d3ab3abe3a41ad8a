//! Parsing and building `name.hash.ext` filenames.
//!
//! A name decomposes into a basename, an optional fingerprint segment and an
//! optional extension. The fingerprint and extension segments keep their
//! leading dot, so [`compose`] is plain concatenation:
//!
//! | name                      | base        | hash            | ext      |
//! |---------------------------|-------------|-----------------|----------|
//! | `css/app.css`             | `css/app`   |                 | `.css`   |
//! | `app.0123456789ab.css`    | `app`       | `.0123456789ab` | `.css`   |
//! | `app.0123456789ab`        | `app`       |                 | `.0123456789ab` |
//! | `archive.tar.gz`          | `archive.tar` |               | `.gz`    |
//! | `.htaccess`               | `.htaccess` |                 |          |

use crate::hash::FINGERPRINT_LEN;

/// Number of hex digits in a fingerprint segment (excluding its leading dot).
pub const HASH_SEGMENT_LEN: usize = FINGERPRINT_LEN;

/// The three parts of a filename as produced by [`decompose`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileNameParts<'a> {
    /// Everything before the fingerprint and extension, including any directory prefix.
    pub base: &'a str,
    /// The fingerprint segment with its leading dot, or empty.
    pub hash: &'a str,
    /// The extension with its leading dot, or empty.
    pub ext: &'a str,
}

impl FileNameParts<'_> {
    /// Returns `true` if the name carries a fingerprint segment.
    pub fn is_hashed(&self) -> bool {
        !self.hash.is_empty()
    }
}

/// Splits a name into basename, fingerprint segment and extension.
///
/// The extension is the last dot-delimited suffix of the final path
/// component. A fingerprint is only recognised when an extension is also
/// present and the segment immediately before it is a dot followed by
/// exactly twelve lowercase hex digits. The basename is never empty for a
/// non-empty name. Absent parts are empty strings.
pub fn decompose(name: &str) -> FileNameParts<'_> {
    let whole = FileNameParts {
        base: name,
        hash: "",
        ext: "",
    };

    let dot = match name.rfind('.') {
        Some(dot) => dot,
        None => return whole,
    };
    let ext = &name[dot..];
    if dot == 0 || ext.len() == 1 || ext.contains('/') || name[..dot].ends_with('/') {
        return whole;
    }

    let rest = &name[..dot];
    let segment_len = HASH_SEGMENT_LEN + 1;
    if rest.len() > segment_len && rest.is_char_boundary(rest.len() - segment_len) {
        let (base, hash) = rest.split_at(rest.len() - segment_len);
        if is_hash_segment(hash) && !base.ends_with('/') {
            return FileNameParts { base, hash, ext };
        }
    }

    FileNameParts {
        base: rest,
        hash: "",
        ext,
    }
}

/// Joins the parts produced by [`decompose`] back into a name.
pub fn compose(base: &str, hash: &str, ext: &str) -> String {
    let mut name = String::with_capacity(base.len() + hash.len() + ext.len());
    name.push_str(base);
    name.push_str(hash);
    name.push_str(ext);
    name
}

/// Returns `true` for a dot followed by exactly twelve lowercase hex digits.
pub(crate) fn is_hash_segment(segment: &str) -> bool {
    let mut chars = segment.chars();
    chars.next() == Some('.')
        && segment.len() == HASH_SEGMENT_LEN + 1
        && chars.all(|c| matches!(c, '0'..='9' | 'a'..='f'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn parts(name: &str) -> (&str, &str, &str) {
        let p = decompose(name);
        (p.base, p.hash, p.ext)
    }

    #[test]
    fn plain_name_with_extension() {
        assert_eq!(parts("app.css"), ("app", "", ".css"));
        assert_eq!(parts("css/app.css"), ("css/app", "", ".css"));
    }

    #[test]
    fn hashed_name() {
        assert_eq!(
            parts("css/app.0123456789ab.css"),
            ("css/app", ".0123456789ab", ".css")
        );
        assert!(decompose("app.0123456789ab.css").is_hashed());
    }

    #[test]
    fn hash_requires_extension() {
        assert_eq!(parts("app.0123456789ab"), ("app", "", ".0123456789ab"));
    }

    #[test]
    fn hash_must_be_lowercase_hex_of_exact_width() {
        assert_eq!(parts("app.0123456789AB.css"), ("app.0123456789AB", "", ".css"));
        assert_eq!(parts("app.0123456789a.css"), ("app.0123456789a", "", ".css"));
        assert_eq!(parts("app.0123456789abc.css"), ("app.0123456789abc", "", ".css"));
        assert_eq!(parts("app.0123456789ag.css"), ("app.0123456789ag", "", ".css"));
    }

    #[test]
    fn basename_is_never_empty() {
        assert_eq!(parts(".0123456789ab.css"), (".0123456789ab", "", ".css"));
        assert_eq!(parts(".htaccess"), (".htaccess", "", ""));
        assert_eq!(parts("img/.hidden"), ("img/.hidden", "", ""));
    }

    #[test]
    fn only_last_suffix_is_extension() {
        assert_eq!(parts("archive.tar.gz"), ("archive.tar", "", ".gz"));
    }

    #[test]
    fn no_extension() {
        assert_eq!(parts("LICENSE"), ("LICENSE", "", ""));
        assert_eq!(parts("trailing."), ("trailing.", "", ""));
    }

    #[test]
    fn dots_in_directories_are_not_extensions() {
        assert_eq!(parts("v1.2/README"), ("v1.2/README", "", ""));
        assert_eq!(parts("v1.2/app.js"), ("v1.2/app", "", ".js"));
    }

    #[test]
    fn multibyte_names_do_not_panic() {
        assert_eq!(parts("ünïcödé-ïmägé.png"), ("ünïcödé-ïmägé", "", ".png"));
        assert_eq!(parts("日本語のファイル名.txt"), ("日本語のファイル名", "", ".txt"));
    }

    #[test]
    fn compose_is_inverse() {
        for name in [
            "app.css",
            "css/app.0123456789ab.css",
            "LICENSE",
            ".htaccess",
            "a.b.c.d",
        ] {
            let p = decompose(name);
            assert_eq!(compose(p.base, p.hash, p.ext), name);
        }
    }

    proptest! {
        #[test]
        fn round_trip_is_stable(name in "[a-z0-9./_-]{1,40}") {
            let first = decompose(&name);
            let rebuilt = compose(first.base, first.hash, first.ext);
            prop_assert_eq!(decompose(&rebuilt), first);
        }

        #[test]
        fn base_is_non_empty(name in ".{1,30}") {
            prop_assert!(!decompose(&name).base.is_empty());
        }
    }
}
