use crate::image_classifier::interface::ClassifierError;

/// Class names indexed by model output position.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Labels {
    names: Vec<String>,
}

impl Labels {
    pub fn from_path(path: &str) -> Result<Self, ClassifierError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ClassifierError::Labels(format!("{}: {}", path, e)))?;
        Ok(Self::parse(&text))
    }

    /// One label per line. A leading WordNet id (`n01440764 tench, Tinca tinca`)
    /// is dropped.
    pub fn parse(text: &str) -> Self {
        let names = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| strip_synset_id(line).to_string())
            .collect();

        Self { names }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Resolves an output index to a name. Models with one extra output
    /// reserve index 0 for "background".
    pub fn name_for(&self, index: usize, num_outputs: usize) -> String {
        let offset = usize::from(num_outputs == self.names.len() + 1);

        index
            .checked_sub(offset)
            .and_then(|i| self.names.get(i))
            .cloned()
            .unwrap_or_else(|| format!("class {}", index))
    }
}

fn strip_synset_id(line: &str) -> &str {
    match line.split_once(' ') {
        Some((id, rest))
            if id.len() == 9
                && id.starts_with('n')
                && id[1..].chars().all(|c| c.is_ascii_digit()) =>
        {
            rest.trim()
        }
        _ => line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_and_synset_lines() {
        let labels = Labels::parse("n01440764 tench, Tinca tinca\n\ngoldfish\n");

        assert_eq!(labels.len(), 2);
        assert_eq!(labels.name_for(0, 2), "tench, Tinca tinca");
        assert_eq!(labels.name_for(1, 2), "goldfish");
    }

    #[test]
    fn test_background_class_offset() {
        let labels = Labels::parse("tench\ngoldfish");

        assert_eq!(labels.name_for(0, 3), "class 0");
        assert_eq!(labels.name_for(1, 3), "tench");
        assert_eq!(labels.name_for(2, 3), "goldfish");
    }

    #[test]
    fn test_unknown_index_falls_back() {
        let labels = Labels::parse("tench");

        assert_eq!(labels.name_for(7, 1000), "class 7");
    }
}
