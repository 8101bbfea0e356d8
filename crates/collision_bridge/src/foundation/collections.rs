//! Specialized collection types

pub use slotmap::{SlotMap, new_key_type};

/// Static two-way table between numeric values and their symbolic names.
///
/// Havok stores enums and material ids as raw numbers; the scene side shows
/// the names. Unknown values are not an error here, callers decide.
#[derive(Debug, Clone, Copy)]
pub struct NamedValues<T: 'static> {
    label: &'static str,
    entries: &'static [(T, &'static str)],
}

impl<T: Copy + PartialEq + 'static> NamedValues<T> {
    /// Create a table from a static entry list
    pub const fn new(label: &'static str, entries: &'static [(T, &'static str)]) -> Self {
        Self { label, entries }
    }

    /// What the table names, for log messages
    pub const fn label(&self) -> &'static str {
        self.label
    }

    /// Name for a numeric value
    pub fn name_of(&self, value: T) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(v, _)| *v == value)
            .map(|(_, name)| *name)
    }

    /// Numeric value for a name (exact match)
    pub fn value_of(&self, name: &str) -> Option<T> {
        self.entries
            .iter()
            .find(|(_, n)| *n == name)
            .map(|(v, _)| *v)
    }

    /// Number of entries
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLORS: NamedValues<u8> = NamedValues::new("color", &[(0, "RED"), (1, "GREEN"), (7, "BLUE")]);

    #[test]
    fn test_lookup_both_directions() {
        assert_eq!(COLORS.name_of(7), Some("BLUE"));
        assert_eq!(COLORS.value_of("GREEN"), Some(1));
        assert_eq!(COLORS.name_of(3), None);
        assert_eq!(COLORS.value_of("green"), None);
        assert_eq!(COLORS.len(), 3);
        assert_eq!(COLORS.label(), "color");
    }
}
