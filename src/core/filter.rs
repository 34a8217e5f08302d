//! Content-filtering pipeline
//!
//! Rendered fields pass through whatever transforms the host registered
//! before they are exported, in registration order.

use std::fmt;
use std::sync::Arc;

/// Which field a filter is being applied to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterHook {
    /// Post title
    Title,
    /// Rendered post body
    Content,
    /// Post or attachment GUID
    Guid,
}

/// A single transform in the pipeline
pub trait ContentFilter: Send + Sync {
    fn filter(&self, hook: FilterHook, value: String) -> String;
}

impl<F> ContentFilter for F
where
    F: Fn(FilterHook, String) -> String + Send + Sync,
{
    fn filter(&self, hook: FilterHook, value: String) -> String {
        self(hook, value)
    }
}

/// Ordered list of registered filters
#[derive(Clone, Default)]
pub struct FilterPipeline {
    filters: Vec<Arc<dyn ContentFilter>>,
}

impl FilterPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a filter; it runs after every filter registered before it
    pub fn register(mut self, filter: impl ContentFilter + 'static) -> Self {
        self.filters.push(Arc::new(filter));
        self
    }

    /// Run a value through every filter
    pub fn apply(&self, hook: FilterHook, value: &str) -> String {
        self.filters
            .iter()
            .fold(value.to_string(), |acc, filter| filter.filter(hook, acc))
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl fmt::Debug for FilterPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterPipeline")
            .field("filters", &self.filters.len())
            .finish()
    }
}
