use crate::JellySyntaxError;
use lru::LruCache;
use std::num::NonZeroUsize;

/// Largest lookup table size accepted in a stream header.
pub(crate) const MAX_TABLE_SIZE: u32 = 1 << 20;

/// Serializer side of a Jelly lookup table.
///
/// When the table is full, the least recently used entry is evicted and its ID is reused.
pub(crate) struct EncoderLookupTable {
    cache: LruCache<String, u32>,
    capacity: u32,
    last_id: u32,
}

impl EncoderLookupTable {
    pub(crate) fn new(capacity: u32) -> Self {
        Self {
            cache: LruCache::new(NonZeroUsize::new(capacity as usize).unwrap_or(NonZeroUsize::MIN)),
            capacity: capacity.max(1),
            last_id: 0,
        }
    }

    /// Returns the ID of the value and, if the value was not in the table yet,
    /// the ID to write in the new table entry (0 if it directly follows the previous entry).
    pub(crate) fn get_or_insert(&mut self, value: &str) -> (u32, Option<u32>) {
        if let Some(id) = self.cache.get(value) {
            return (*id, None);
        }
        let id = if self.cache.len() < self.capacity as usize {
            self.cache.len() as u32 + 1
        } else {
            self.cache.pop_lru().map_or(1, |(_, id)| id)
        };
        self.cache.put(value.to_owned(), id);
        let entry_id = if id == self.last_id + 1 { 0 } else { id };
        self.last_id = id;
        (id, Some(entry_id))
    }
}

/// Parser side of a Jelly lookup table.
#[derive(Default)]
pub(crate) struct DecoderLookupTable {
    values: Vec<Option<String>>,
    last_id: u32,
}

impl DecoderLookupTable {
    pub(crate) fn new(capacity: u32) -> Self {
        Self {
            values: vec![None; capacity as usize],
            last_id: 0,
        }
    }

    pub(crate) fn get(&self, id: u32) -> Option<&str> {
        self.values
            .get((id as usize).checked_sub(1)?)?
            .as_deref()
    }

    pub(crate) fn set(&mut self, id: u32, value: String) -> Result<(), JellySyntaxError> {
        let id = if id == 0 { self.last_id + 1 } else { id };
        let capacity = self.capacity();
        let slot = (id as usize)
            .checked_sub(1)
            .and_then(|i| self.values.get_mut(i))
            .ok_or(JellySyntaxError::IdOutOfBounds(id, capacity))?;
        *slot = Some(value);
        self.last_id = id;
        Ok(())
    }

    pub(crate) fn capacity(&self) -> u32 {
        u32::try_from(self.values.len()).unwrap_or(u32::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_entries_use_the_zero_id() {
        let mut table = EncoderLookupTable::new(8);
        assert_eq!(table.get_or_insert("a"), (1, Some(0)));
        assert_eq!(table.get_or_insert("b"), (2, Some(0)));
        assert_eq!(table.get_or_insert("a"), (1, None));
    }

    #[test]
    fn least_recently_used_entry_is_evicted() {
        let mut table = EncoderLookupTable::new(2);
        table.get_or_insert("a");
        table.get_or_insert("b");
        table.get_or_insert("a");
        assert_eq!(table.get_or_insert("c"), (2, Some(2)));
        assert_eq!(table.get_or_insert("a"), (1, None));
        assert_eq!(table.get_or_insert("b"), (2, Some(2)));
    }

    #[test]
    fn decoder_follows_encoder_ids() -> Result<(), JellySyntaxError> {
        let mut encoder = EncoderLookupTable::new(2);
        let mut decoder = DecoderLookupTable::new(2);
        for value in ["a", "b", "a", "c", "b", "c"] {
            let (id, entry) = encoder.get_or_insert(value);
            if let Some(entry) = entry {
                decoder.set(entry, value.into())?;
            }
            assert_eq!(decoder.get(id), Some(value));
        }
        Ok(())
    }

    #[test]
    fn decoder_bounds() {
        let mut table = DecoderLookupTable::new(1);
        assert!(table.get(0).is_none());
        assert!(table.set(2, "a".into()).is_err());
        assert!(table.set(0, "a".into()).is_ok());
        assert_eq!(table.get(1), Some("a"));
        assert!(matches!(
            table.set(0, "b".into()),
            Err(JellySyntaxError::IdOutOfBounds(2, 1))
        ));
    }
}
