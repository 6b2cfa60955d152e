/// A package left out of a result because its data could not be retrieved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedPackage {
    pub name: String,
    pub reason: String,
}

impl SkippedPackage {
    pub fn new(name: &str, reason: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}
