//! Cache Entry Module
//!
//! Defines the wrapper stored for each cached value, tracking when it was
//! last read or written.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

// == Cache Entry ==
/// A single cached value together with its last-access timestamp.
///
/// Entries are owned exclusively by the cache; callers only ever see the
/// unwrapped value.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Last access timestamp (Unix milliseconds), refreshed on write and read
    pub last_accessed: u64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new entry, stamped with the current time.
    pub fn new(value: V) -> Self {
        Self {
            value,
            last_accessed: current_timestamp_ms(),
        }
    }

    // == Touch ==
    /// Refreshes the last-access timestamp to now.
    pub fn touch(&mut self) {
        self.last_accessed = current_timestamp_ms();
    }

    /// Refreshes the last-access timestamp to an explicit instant.
    ///
    /// Used by snapshot enumeration so that every entry visited in one pass
    /// carries the same timestamp.
    pub fn touch_at(&mut self, timestamp_ms: u64) {
        self.last_accessed = timestamp_ms;
    }

    // == Age ==
    /// Returns the time elapsed since the last access, in milliseconds.
    pub fn age_ms(&self) -> u64 {
        current_timestamp_ms().saturating_sub(self.last_accessed)
    }

    // == Is Expired ==
    /// Checks whether the entry has outlived the given time-to-live.
    ///
    /// Boundary condition: an entry is expired only when its age strictly
    /// exceeds the TTL; an entry whose age equals the TTL exactly is still
    /// alive.
    pub fn is_expired(&self, time_to_live: Duration) -> bool {
        self.age_ms() > time_to_live.as_millis() as u64
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_entry_creation_stamps_now() {
        let before = current_timestamp_ms();
        let entry = CacheEntry::new("test_value");
        let after = current_timestamp_ms();

        assert_eq!(entry.value, "test_value");
        assert!(entry.last_accessed >= before);
        assert!(entry.last_accessed <= after);
    }

    #[test]
    fn test_entry_age_grows() {
        let entry = CacheEntry::new(1u32);

        sleep(Duration::from_millis(50));

        assert!(entry.age_ms() >= 50);
    }

    #[test]
    fn test_touch_resets_age() {
        let mut entry = CacheEntry::new(1u32);

        sleep(Duration::from_millis(50));
        entry.touch();

        assert!(entry.age_ms() < 50);
    }

    #[test]
    fn test_touch_at_uses_given_timestamp() {
        let mut entry = CacheEntry::new(1u32);
        let stamp = current_timestamp_ms() - 5_000;

        entry.touch_at(stamp);

        assert_eq!(entry.last_accessed, stamp);
        assert!(entry.age_ms() >= 5_000);
    }

    #[test]
    fn test_entry_expiration() {
        let entry = CacheEntry::new("test_value");

        assert!(!entry.is_expired(Duration::from_secs(1)));

        sleep(Duration::from_millis(1100));

        assert!(entry.is_expired(Duration::from_secs(1)));
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let mut entry = CacheEntry::new("test");
        entry.last_accessed = current_timestamp_ms() - 10_000;

        // Age exactly equal to the TTL is not yet expired; strictly older is.
        assert!(!entry.is_expired(Duration::from_secs(10)));
        assert!(entry.is_expired(Duration::from_secs(9)));
    }

    #[test]
    fn test_generic_value_types() {
        let numbers = CacheEntry::new(vec![1, 2, 3]);
        let text = CacheEntry::new(String::from("payload"));

        assert_eq!(numbers.value.len(), 3);
        assert_eq!(text.value, "payload");
    }
}
