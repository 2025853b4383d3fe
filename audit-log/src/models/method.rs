//! HTTP verb classification shared by the event code and the description text.

use axum::http::Method;

pub const METHOD_GET: i16 = 1;
pub const METHOD_POST: i16 = 2;
pub const METHOD_PUT: i16 = 3;
pub const METHOD_PATCH: i16 = 4;
pub const METHOD_DELETE: i16 = 5;

pub const ACTION_GET: &str = "accessed";
pub const ACTION_POST: &str = "created";
pub const ACTION_PUT: &str = "updated";
pub const ACTION_PATCH: &str = "modified";
pub const ACTION_DELETE: &str = "deleted";

/// The semantic action a request performed on its resource.
///
/// Verbs outside GET/POST/PUT/PATCH/DELETE are treated as a read and
/// classify as [`HttpAction::Accessed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpAction {
    Accessed,
    Created,
    Updated,
    Modified,
    Deleted,
}

impl HttpAction {
    /// Classifies a verb, ignoring ASCII case.
    pub fn classify(method: &str) -> Self {
        if method.eq_ignore_ascii_case("POST") {
            HttpAction::Created
        } else if method.eq_ignore_ascii_case("PUT") {
            HttpAction::Updated
        } else if method.eq_ignore_ascii_case("PATCH") {
            HttpAction::Modified
        } else if method.eq_ignore_ascii_case("DELETE") {
            HttpAction::Deleted
        } else {
            HttpAction::Accessed
        }
    }

    pub fn from_method(method: &Method) -> Self {
        Self::classify(method.as_str())
    }

    /// Numeric code carried in the `method` field of an audit event.
    pub fn code(self) -> i16 {
        match self {
            HttpAction::Accessed => METHOD_GET,
            HttpAction::Created => METHOD_POST,
            HttpAction::Updated => METHOD_PUT,
            HttpAction::Modified => METHOD_PATCH,
            HttpAction::Deleted => METHOD_DELETE,
        }
    }

    pub fn action_word(self) -> &'static str {
        match self {
            HttpAction::Accessed => ACTION_GET,
            HttpAction::Created => ACTION_POST,
            HttpAction::Updated => ACTION_PUT,
            HttpAction::Modified => ACTION_PATCH,
            HttpAction::Deleted => ACTION_DELETE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_maps_known_verbs() {
        let cases = [
            ("GET", METHOD_GET, "accessed"),
            ("POST", METHOD_POST, "created"),
            ("PUT", METHOD_PUT, "updated"),
            ("PATCH", METHOD_PATCH, "modified"),
            ("DELETE", METHOD_DELETE, "deleted"),
        ];
        for (verb, code, word) in cases {
            let action = HttpAction::classify(verb);
            assert_eq!(action.code(), code, "code for {verb}");
            assert_eq!(action.action_word(), word, "word for {verb}");
        }
    }

    #[test]
    fn classify_ignores_case() {
        assert_eq!(HttpAction::classify("post"), HttpAction::Created);
        assert_eq!(HttpAction::classify("Patch"), HttpAction::Modified);
        assert_eq!(HttpAction::classify("dElEtE"), HttpAction::Deleted);
    }

    #[test]
    fn classify_defaults_unknown_verbs_to_accessed() {
        for verb in ["OPTIONS", "HEAD", "TRACE", "PURGE", ""] {
            let action = HttpAction::classify(verb);
            assert_eq!(action, HttpAction::Accessed);
            assert_eq!(action.code(), METHOD_GET);
            assert_eq!(action.action_word(), ACTION_GET);
        }
    }

    #[test]
    fn from_method_matches_classify() {
        assert_eq!(HttpAction::from_method(&Method::PUT), HttpAction::Updated);
        assert_eq!(HttpAction::from_method(&Method::OPTIONS), HttpAction::Accessed);
    }
}
