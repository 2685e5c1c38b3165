use std::time::{SystemTime, UNIX_EPOCH};

/// Identifier of a single stream record, `<millis>-<sequence>` in the store's
/// wire format.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordId(String);

/// Cursor sentinel selecting the beginning of a stream.
const BEGINNING: &str = "0";

/// Append sentinel asking the store to assign the id.
const AUTO: &str = "*";

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The beginning-of-stream cursor. A consumer starting here re-reads
    /// every record still in the stream.
    pub fn beginning() -> Self {
        Self(BEGINNING.into())
    }

    /// Ask the store to assign the id at append time.
    pub fn auto() -> Self {
        Self(AUTO.into())
    }

    /// An id derived from the current wall clock, with a fixed `-0` sequence
    /// suffix. Two ids minted within the same millisecond collide; accepted,
    /// since the id must exist before the append so the payload can carry it.
    pub fn from_wall_clock() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        Self(format!("{millis}-0"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_auto(&self) -> bool {
        self.0 == AUTO
    }

    /// Numeric `(millis, sequence)` view used for cursor comparisons. A
    /// missing sequence part reads as zero.
    pub(crate) fn parts(&self) -> (u64, u64) {
        match self.0.split_once('-') {
            Some((millis, seq)) => (millis.parse().unwrap_or(0), seq.parse().unwrap_or(0)),
            None => (self.0.parse().unwrap_or(0), 0),
        }
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wall_clock_ids_carry_zero_sequence() {
        let id = RecordId::from_wall_clock();
        let (millis, seq) = id.parts();
        assert!(millis > 0);
        assert_eq!(seq, 0);
        assert!(id.as_str().ends_with("-0"));
    }

    #[test]
    fn beginning_sorts_before_everything() {
        let cursor = RecordId::beginning();
        let first = RecordId::new("1-0");
        assert!(first.parts() > cursor.parts());
    }

    #[test]
    fn parts_order_by_millis_then_sequence() {
        let a = RecordId::new("100-1");
        let b = RecordId::new("100-2");
        let c = RecordId::new("101-0");
        assert!(b.parts() > a.parts());
        assert!(c.parts() > b.parts());
    }
}
