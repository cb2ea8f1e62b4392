use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Redaction patterns for credentials and contact data that pass through
/// request logs.
pub struct PiiPatterns;

impl PiiPatterns {
    /// `Bearer <anything>` as it appears in an Authorization header.
    pub fn bearer() -> &'static Regex {
        static BEARER: LazyLock<Regex> = LazyLock::new(|| {
            #[allow(clippy::unwrap_used)]
            Regex::new(r"(?i)\bBearer\s+[A-Za-z0-9._~+/=-]+").unwrap()
        });
        &BEARER
    }

    /// Three base64url segments separated by dots.
    pub fn jwt() -> &'static Regex {
        static JWT: LazyLock<Regex> = LazyLock::new(|| {
            #[allow(clippy::unwrap_used)]
            Regex::new(r"\b[A-Za-z0-9_-]{8,}\.[A-Za-z0-9_-]{8,}\.[A-Za-z0-9_-]{8,}\b").unwrap()
        });
        &JWT
    }

    pub fn email() -> &'static Regex {
        static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
            #[allow(clippy::unwrap_used)]
            Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{1,}\b").unwrap()
        });
        &EMAIL
    }

    /// Opaque runs of 24+ token characters, e.g. refresh tokens and
    /// verification codes.
    pub fn opaque_token() -> &'static Regex {
        static OPAQUE: LazyLock<Regex> = LazyLock::new(|| {
            #[allow(clippy::unwrap_used)]
            Regex::new(r"\b[A-Za-z0-9+/_-]{24,}={0,2}").unwrap()
        });
        &OPAQUE
    }
}

/// Masks bearer credentials, JWTs, opaque tokens and e-mail local parts.
///
/// Credentials are replaced before e-mails so an address embedded in a
/// token never survives partially.
pub fn redact(input: &str) -> String {
    let step = PiiPatterns::bearer().replace_all(input, "Bearer [REDACTED]");
    let step = PiiPatterns::jwt().replace_all(&step, "[REDACTED_JWT]");
    let step = PiiPatterns::opaque_token().replace_all(&step, "[REDACTED_TOKEN]");
    PiiPatterns::email()
        .replace_all(&step, |caps: &regex::Captures| {
            let found = &caps[0];
            match found.split_once('@') {
                Some((local, domain)) => match local.chars().next() {
                    Some(first) => format!("{first}***@{domain}"),
                    None => format!("@{domain}"),
                },
                None => found.to_string(),
            }
        })
        .into_owned()
}

/// Formats the wrapped string through [`redact`].
pub struct Redacted<'a>(pub &'a str);

impl fmt::Display for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact(self.0))
    }
}

impl fmt::Debug for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", redact(self.0))
    }
}
