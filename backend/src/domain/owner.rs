//! Owner identity tokens.
//!
//! An [`OwnerId`] is the opaque per-browser token issued in the identity
//! cookie. Possession of the token is the only credential: every repository
//! call is scoped by it and nothing else.

use std::fmt;

use rand::RngCore;
use rand::rngs::OsRng;

/// Number of random bytes in a freshly issued token (128 bits).
pub const OWNER_TOKEN_BYTES: usize = 16;
/// Upper bound on accepted token length, in bytes.
pub const OWNER_ID_MAX_LEN: usize = 256;
/// Number of leading characters shown as the session indicator.
pub const SESSION_PREFIX_LEN: usize = 8;

/// Validation errors returned by [`OwnerId::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OwnerIdValidationError {
    Empty,
    TooLong { max: usize },
    InvalidCharacters,
}

impl fmt::Display for OwnerIdValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "owner id must not be empty"),
            Self::TooLong { max } => write!(f, "owner id must be at most {max} bytes"),
            Self::InvalidCharacters => write!(
                f,
                "owner id may only contain visible ASCII characters other than ; , \" \\",
            ),
        }
    }
}

impl std::error::Error for OwnerIdValidationError {}

/// Opaque owner identifier, used verbatim as the row-ownership key.
///
/// Logs must carry [`OwnerId::session_prefix`], never the full credential,
/// so the type has no `Display` impl.
///
/// # Examples
/// ```
/// use todo_backend::domain::OwnerId;
///
/// let owner = OwnerId::new("0123456789abcdef0123456789abcdef").expect("valid token");
/// assert_eq!(owner.session_prefix(), "01234567");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OwnerId(String);

impl OwnerId {
    /// Validate and wrap an existing token.
    pub fn new(raw: impl Into<String>) -> Result<Self, OwnerIdValidationError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(OwnerIdValidationError::Empty);
        }
        if raw.len() > OWNER_ID_MAX_LEN {
            return Err(OwnerIdValidationError::TooLong {
                max: OWNER_ID_MAX_LEN,
            });
        }
        if !raw.chars().all(is_token_char) {
            return Err(OwnerIdValidationError::InvalidCharacters);
        }
        Ok(Self(raw))
    }

    /// Issue a fresh token from the operating system CSPRNG.
    ///
    /// Panics if the OS random source is unavailable.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0_u8; OWNER_TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }

    /// Borrow the raw token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Leading characters of the token, shown as a session indicator.
    ///
    /// Tokens are ASCII-only, so byte slicing is always on a char boundary.
    #[must_use]
    pub fn session_prefix(&self) -> &str {
        self.0.get(..SESSION_PREFIX_LEN).unwrap_or(self.0.as_str())
    }
}

impl AsRef<str> for OwnerId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

fn is_token_char(c: char) -> bool {
    c.is_ascii_graphic() && !matches!(c, ';' | ',' | '"' | '\\')
}
