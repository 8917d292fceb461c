//! Full name parsing

use serde::{Deserialize, Serialize};

/// Lower-cased name tokens used to fill username templates
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameParts {
    pub first: String,
    /// Only set when the name has exactly three tokens
    pub middle: String,
    pub last: String,
}

impl NameParts {
    /// Split a full name into first, middle and last parts
    ///
    /// The name is trimmed, lower-cased and split on runs of whitespace.
    /// Four or more tokens keep only the first and the final one.
    pub fn parse(full_name: &str) -> Self {
        let lowered = full_name.trim().to_lowercase();
        let tokens: Vec<&str> = lowered.split_whitespace().collect();

        let first = tokens.first().copied().unwrap_or_default().to_string();
        let middle = if tokens.len() == 3 {
            tokens[1].to_string()
        } else {
            String::new()
        };
        let last = if tokens.len() >= 2 {
            tokens[tokens.len() - 1].to_string()
        } else {
            String::new()
        };

        Self { first, middle, last }
    }

    pub fn has_middle(&self) -> bool {
        !self.middle.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.first.is_empty() && self.middle.is_empty() && self.last.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parts(first: &str, middle: &str, last: &str) -> NameParts {
        NameParts {
            first: first.to_string(),
            middle: middle.to_string(),
            last: last.to_string(),
        }
    }

    #[test]
    fn test_two_tokens() {
        assert_eq!(NameParts::parse("John Smith"), parts("john", "", "smith"));
    }

    #[test]
    fn test_three_tokens_fill_middle() {
        assert_eq!(
            NameParts::parse("  Ana   Maria\tLopez "),
            parts("ana", "maria", "lopez")
        );
    }

    #[test]
    fn test_four_tokens_drop_middle() {
        assert_eq!(
            NameParts::parse("Juan Carlos De Leon"),
            parts("juan", "", "leon")
        );
    }

    #[test]
    fn test_single_token() {
        let parsed = NameParts::parse("Madonna");
        assert_eq!(parsed, parts("madonna", "", ""));
        assert!(!parsed.has_middle());
    }

    #[test]
    fn test_empty_input() {
        let parsed = NameParts::parse("   ");
        assert!(parsed.is_empty());
        assert_eq!(parsed, NameParts::default());
    }
}
