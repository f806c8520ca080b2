use scraper::ElementRef;
use std::fmt;
use std::sync::Arc;

/// Attribute the Threads web client puts on the outer wrapper of each post
pub const PRESSABLE_CONTAINER_ATTR: &str = "data-pressable-container";

pub type BoundaryPredicate = Arc<dyn Fn(&ElementRef<'_>) -> bool + Send + Sync>;

/// Marks the outermost element of a single post's rendering.
///
/// The ancestor search processes the boundary element itself and then stops
/// climbing. Without a boundary it climbs to the document root.
#[derive(Clone, Default)]
pub enum PostBoundary {
    #[default]
    None,
    /// Element carrying `name`, and when `value` is set, carrying it with that value
    Attribute { name: String, value: Option<String> },
    Custom(BoundaryPredicate),
}

impl PostBoundary {
    pub fn attribute(name: impl Into<String>) -> Self {
        PostBoundary::Attribute {
            name: name.into(),
            value: None,
        }
    }

    pub fn attribute_value(name: impl Into<String>, value: impl Into<String>) -> Self {
        PostBoundary::Attribute {
            name: name.into(),
            value: Some(value.into()),
        }
    }

    pub fn custom<F>(predicate: F) -> Self
    where
        F: Fn(&ElementRef<'_>) -> bool + Send + Sync + 'static,
    {
        PostBoundary::Custom(Arc::new(predicate))
    }

    /// `data-pressable-container="true"`
    pub fn threads() -> Self {
        Self::attribute_value(PRESSABLE_CONTAINER_ATTR, "true")
    }

    pub fn is_boundary(&self, element: &ElementRef<'_>) -> bool {
        match self {
            PostBoundary::None => false,
            PostBoundary::Attribute { name, value } => match element.value().attr(name) {
                Some(actual) => value.as_deref().is_none_or(|expected| actual == expected),
                None => false,
            },
            PostBoundary::Custom(predicate) => predicate(element),
        }
    }
}

impl fmt::Debug for PostBoundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostBoundary::None => write!(f, "None"),
            PostBoundary::Attribute { name, value } => f
                .debug_struct("Attribute")
                .field("name", name)
                .field("value", value)
                .finish(),
            PostBoundary::Custom(_) => write!(f, "Custom(<predicate>)"),
        }
    }
}
