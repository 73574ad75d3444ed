//! Raw caller paths to canonical references.
//!
//! Scheme-qualified input (`file://`, `trash://`, `smb://...`) keeps its scheme; bare paths get
//! the `file` scheme. Either way the path component must be absolute as written; qualified
//! input is checked on its raw text, before the parser resolves anything.

use url::{ParseError, Url};

use crate::error::{NormalizeError, NormalizeResult};

/// Convert `raw` into a canonical absolute reference.
///
/// # Errors
///
/// [`NormalizeError::NotAbsolute`] for relative input, [`NormalizeError::Parse`] for input that
/// is not a reference at all.
pub fn normalize(raw: &str) -> NormalizeResult<Url> {
    match Url::parse(raw) {
        Ok(url) if has_absolute_path(raw) && url.path().starts_with('/') => Ok(url),
        Ok(_) => Err(not_absolute(raw)),
        Err(ParseError::RelativeUrlWithoutBase) => {
            if !raw.starts_with('/') {
                return Err(not_absolute(raw));
            }
            Url::from_file_path(raw).map_err(|()| not_absolute(raw))
        }
        Err(source) => Err(NormalizeError::Parse {
            value: raw.to_string(),
            source,
        }),
    }
}

/// Whether the text after `scheme:` is an absolute path, with or without an authority.
fn has_absolute_path(raw: &str) -> bool {
    let Some((_, rest)) = raw.trim().split_once(':') else {
        return false;
    };
    match rest.strip_prefix("//") {
        Some(after_marker) => after_marker
            .find(['/', '?', '#'])
            .is_some_and(|end| after_marker[end..].starts_with('/')),
        None => rest.starts_with('/'),
    }
}

fn not_absolute(raw: &str) -> NormalizeError {
    NormalizeError::NotAbsolute {
        value: raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_absolute_paths_get_the_file_scheme() {
        let url = normalize("/home/user/docs").expect("absolute path");
        assert_eq!(url.scheme(), "file");
        assert_eq!(url.path(), "/home/user/docs");
        assert_eq!(url.as_str(), "file:///home/user/docs");
    }

    #[test]
    fn spaces_are_encoded_but_the_path_survives() {
        let url = normalize("/home/user/my docs").expect("absolute path");
        assert_eq!(url.as_str(), "file:///home/user/my%20docs");
        assert_eq!(
            url.to_file_path().ok(),
            Some(std::path::PathBuf::from("/home/user/my docs"))
        );
    }

    #[test]
    fn qualified_references_are_left_untouched() {
        for raw in [
            "file:///home/user/docs",
            "trash:///deleted.txt",
            "smb://server/share/file",
        ] {
            let once = normalize(raw).expect("qualified reference");
            assert_eq!(once.as_str(), raw);
            let twice = normalize(once.as_str()).expect("idempotent");
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn relative_input_is_rejected() {
        for raw in [
            "relative/path",
            "",
            "./here",
            "mailto:user",
            "file:relative",
            "file:../etc/passwd",
            "http://host",
            "smb://server?share/file",
        ] {
            assert!(
                matches!(normalize(raw), Err(NormalizeError::NotAbsolute { .. })),
                "{raw:?} should be rejected as relative"
            );
        }
    }

    #[test]
    fn single_slash_qualified_paths_are_accepted() {
        let url = normalize("file:/home/user/docs").expect("absolute path after scheme");
        assert_eq!(url.path(), "/home/user/docs");
        let url = normalize("http://host/").expect("root path after authority");
        assert_eq!(url.as_str(), "http://host/");
    }

    #[test]
    fn unparseable_input_is_a_parse_error() {
        assert!(matches!(
            normalize("http://[::1"),
            Err(NormalizeError::Parse { .. })
        ));
    }
}
