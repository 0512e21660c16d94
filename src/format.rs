use unicode_normalization::UnicodeNormalization;

use crate::cli::Config;

/// Characters that get a backslash prefix in escaped output, including the
/// trailing space.
pub const SHELL_SPECIAL: &str = "\"`'()[]<>&?$*|\\ ";

/// Path transformations applied to every item path, in a fixed order:
/// NFC normalization, base-path strip, shell escaping, double quoting,
/// single quoting. Each step runs only when its flag is set.
#[derive(Debug, Default, Clone)]
pub struct PathFormat {
    pub nfc: bool,
    pub base_path: Option<String>,
    pub escape: bool,
    pub quote_double: bool,
    pub quote_single: bool,
}

impl PathFormat {
    pub fn from_config(config: &Config) -> Self {
        Self {
            nfc: config.nfc,
            base_path: config.base_path.clone(),
            escape: config.escape,
            quote_double: config.quote_double,
            quote_single: config.quote_single,
        }
    }

    pub fn apply(&self, path: &str) -> String {
        let mut path = if self.nfc {
            nfc(path)
        } else {
            path.to_owned()
        };
        if let Some(base) = &self.base_path {
            path = strip_base(&path, base).to_owned();
        }
        if self.escape {
            path = escape_shell(&path);
        }
        if self.quote_double {
            path = quote_double(&path);
        }
        if self.quote_single {
            path = quote_single(&path);
        }
        path
    }
}

/// Recompose the path to NFC. HFS-sourced paths arrive decomposed (NFD),
/// which most Linux tools treat as a different file name.
pub fn nfc(path: &str) -> String {
    path.nfc().collect()
}

/// Strip `base` when `path` starts with it exactly; otherwise the path is
/// returned unchanged.
pub fn strip_base<'a>(path: &'a str, base: &str) -> &'a str {
    path.strip_prefix(base).unwrap_or(path)
}

/// Prefix every character in [`SHELL_SPECIAL`] with a single backslash.
pub fn escape_shell(path: &str) -> String {
    let mut escaped = String::with_capacity(path.len());
    for c in path.chars() {
        if SHELL_SPECIAL.contains(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

pub fn quote_double(path: &str) -> String {
    format!("\"{}\"", path)
}

pub fn quote_single(path: &str) -> String {
    format!("'{}'", path)
}
