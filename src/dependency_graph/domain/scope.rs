use crate::shared::Result;

/// Maximum length for a scope name (npm limits full names to 214 bytes)
const MAX_SCOPE_LENGTH: usize = 214;

/// NewType wrapper for the tracked npm scope (e.g. `@wxn0brp`)
///
/// A package is in scope when its name starts with `<scope>/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Scope(String);

impl Scope {
    /// Builds a scope, adding the leading `@` when it is missing
    pub fn new(name: &str) -> Result<Self> {
        let trimmed = name.trim().trim_end_matches('/');
        let bare = trimmed.strip_prefix('@').unwrap_or(trimmed);

        if bare.is_empty() {
            anyhow::bail!("Scope name cannot be empty");
        }

        if bare.len() + 1 > MAX_SCOPE_LENGTH {
            anyhow::bail!(
                "Scope name is too long ({} bytes). Maximum allowed: {} bytes",
                bare.len() + 1,
                MAX_SCOPE_LENGTH
            );
        }

        if !bare
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
        {
            anyhow::bail!(
                "Scope name contains invalid characters. Only alphanumeric, hyphens, underscores and dots are allowed."
            );
        }

        Ok(Self(format!("@{}", bare)))
    }

    /// The scope with its leading `@`, without trailing slash
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `@scope/` - the prefix every in-scope package name starts with
    pub fn prefix(&self) -> String {
        format!("{}/", self.0)
    }

    pub fn contains(&self, package_name: &str) -> bool {
        package_name
            .strip_prefix(self.0.as_str())
            .is_some_and(|rest| rest.len() > 1 && rest.starts_with('/'))
    }

    /// Strips the scope prefix; names outside the scope are returned unchanged
    pub fn short_name<'a>(&self, package_name: &'a str) -> &'a str {
        if self.contains(package_name) {
            &package_name[self.0.len() + 1..]
        } else {
            package_name
        }
    }

    /// Turns a short name (`db`) into the full package name (`@scope/db`)
    pub fn qualify(&self, short_name: &str) -> String {
        if self.contains(short_name) {
            short_name.to_string()
        } else {
            format!("{}/{}", self.0, short_name)
        }
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
