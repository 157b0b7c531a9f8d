use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A named, hourly-rated contributor. Names are unique within a project and
/// are what task allocations refer to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Resource {
    pub name: String,
    /// Currency per hour.
    pub rate: f64,
}

impl Resource {
    pub fn new(name: impl Into<String>, rate: f64) -> Self {
        Self {
            name: name.into(),
            rate: rate.max(0.0),
        }
    }
}

impl Default for Resource {
    fn default() -> Self {
        Self::new("New resource", 300.0)
    }
}

/// Look up the hourly rate for `name`. Returns `None` for dangling references.
pub fn rate_of(resources: &[Resource], name: &str) -> Option<f64> {
    resources.iter().find(|r| r.name == name).map(|r| r.rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_lookup() {
        let resources = vec![Resource::new("Alex", 350.0), Resource::new("Chris", 500.0)];

        assert_eq!(rate_of(&resources, "Chris"), Some(500.0));
        assert_eq!(rate_of(&resources, "Nobody"), None);
    }

    #[test]
    fn test_negative_rate_clamped() {
        assert_eq!(Resource::new("Alex", -10.0).rate, 0.0);
    }
}
