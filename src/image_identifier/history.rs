use super::core::ImageRef;

/// Previously viewed images, most recent first, without duplicates.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct History {
    entries: Vec<ImageRef>,
}

impl History {
    /// Prepends `image_ref` unless it is already present. An existing entry
    /// keeps its position. Returns whether the history changed.
    pub fn record(&mut self, image_ref: &ImageRef) -> bool {
        if self.contains(image_ref) {
            return false;
        }
        self.entries.insert(0, image_ref.clone());
        true
    }

    pub fn contains(&self, image_ref: &ImageRef) -> bool {
        self.entries.contains(image_ref)
    }

    pub fn entries(&self) -> &[ImageRef] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(value: &str) -> ImageRef {
        ImageRef::Url(value.to_string())
    }

    #[test]
    fn test_record_is_most_recent_first() {
        let mut history = History::default();

        assert!(history.record(&url("a")));
        assert!(history.record(&url("b")));

        assert_eq!(history.entries(), &[url("b"), url("a")]);
    }

    #[test]
    fn test_record_existing_keeps_order() {
        let mut history = History::default();
        history.record(&url("a"));
        history.record(&url("b"));

        assert!(!history.record(&url("a")));

        assert_eq!(history.entries(), &[url("b"), url("a")]);
        assert_eq!(history.len(), 2);
    }
}
