use std::borrow::Cow;

/// Upper bound on the name length, counted in characters.
pub const DEFAULT_MAX_NAME_CHARS: usize = 4096;

/// Shape of the greeting and the input bound applied to names.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GreetingConfig {
    pub max_name_chars: usize,
    pub prefix: Cow<'static, str>,
    pub suffix: Cow<'static, str>,
    /// Used in place of an empty name.
    pub fallback_name: Cow<'static, str>,
}

impl GreetingConfig {
    /// `"Hello, {name}!"`, `"Hello, there!"` for an empty name.
    pub const DEFAULT: GreetingConfig = GreetingConfig {
        max_name_chars: DEFAULT_MAX_NAME_CHARS,
        prefix: Cow::Borrowed("Hello, "),
        suffix: Cow::Borrowed("!"),
        fallback_name: Cow::Borrowed("there"),
    };

    pub fn with_max_name_chars(mut self, max_name_chars: usize) -> Self {
        self.max_name_chars = max_name_chars;
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<Cow<'static, str>>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<Cow<'static, str>>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn with_fallback_name(mut self, fallback_name: impl Into<Cow<'static, str>>) -> Self {
        self.fallback_name = fallback_name.into();
        self
    }
}

impl Default for GreetingConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
