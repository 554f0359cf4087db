use std::borrow::Cow;
use std::fmt;

use serde::Serialize;

/// Free-text diagnostic category. The engine only creates categories from
/// the named constants in `convert::categories` or from a row error's
/// display text, so the same problem always lands in the same bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Category(Cow<'static, str>);

impl Category {
    pub const fn from_static(text: &'static str) -> Self { Category(Cow::Borrowed(text)) }

    pub fn new(text: impl Into<String>) -> Self { Category(Cow::Owned(text.into())) }

    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl From<String> for Category {
    fn from(text: String) -> Self { Category::new(text) }
}
