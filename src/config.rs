/// Ceilings applied to every container a [`Registry`](crate::Registry) creates.
///
/// Hitting a ceiling is reported exactly like the allocator refusing memory, which makes
/// exhaustion paths reproducible.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Limits {
    /// Maximum number of elements (or map entries) per container.
    pub max_elements: Option<usize>,
    /// Maximum bucket count a map may grow to. Growth beyond it is skipped, not failed.
    /// Must be at least 1; a map cannot be created under a ceiling of 0.
    pub max_buckets: Option<usize>,
}

impl Limits {
    pub fn unbounded() -> Self {
        Limits::default()
    }

    pub fn with_max_elements(self, max_elements: usize) -> Self {
        Limits {
            max_elements: Some(max_elements),
            ..self
        }
    }

    pub fn with_max_buckets(self, max_buckets: usize) -> Self {
        Limits {
            max_buckets: Some(max_buckets),
            ..self
        }
    }

    pub(crate) fn allows_elements(&self, len: usize) -> bool {
        self.max_elements.map_or(true, |max| len <= max)
    }

    pub(crate) fn allows_buckets(&self, count: usize) -> bool {
        self.max_buckets.map_or(true, |max| count <= max)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Maximum number of live ledger entries. `None` means bounded only by memory.
    pub max_tracked: Option<usize>,
    pub limits: Limits,
}

impl RegistryConfig {
    pub fn new() -> Self {
        RegistryConfig::default()
    }

    pub fn with_max_tracked(self, max_tracked: usize) -> Self {
        RegistryConfig {
            max_tracked: Some(max_tracked),
            ..self
        }
    }

    pub fn with_limits(self, limits: Limits) -> Self {
        RegistryConfig { limits, ..self }
    }
}
