use super::types::BatchError;

/// Splits `items` into ordered chunks of at most `size` items.
///
/// Order is preserved across and within chunks, only the last chunk may be
/// shorter than `size`, and an empty input yields no chunks at all.
///
/// # Errors
///
/// Returns [`BatchError::InvalidChunkSize`] when `size` is zero.
pub fn chunk<T>(items: Vec<T>, size: usize) -> Result<Vec<Vec<T>>, BatchError> {
    if size == 0 {
        return Err(BatchError::InvalidChunkSize { size });
    }

    let mut chunks = Vec::with_capacity(items.len().div_ceil(size));
    let mut items = items.into_iter().peekable();

    while items.peek().is_some() {
        chunks.push(items.by_ref().take(size).collect());
    }

    Ok(chunks)
}

/// Borrowing variant of [`chunk`].
pub fn chunk_slice<T>(items: &[T], size: usize) -> Result<Vec<&[T]>, BatchError> {
    if size == 0 {
        return Err(BatchError::InvalidChunkSize { size });
    }

    Ok(items.chunks(size).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splits_into_chunks_of_size() {
        let result = chunk(vec![1, 2, 3, 4, 5, 6, 7, 8, 9], 3).unwrap();
        assert_eq!(result, vec![vec![1, 2, 3], vec![4, 5, 6], vec![7, 8, 9]]);
    }

    #[test]
    fn test_last_chunk_may_be_shorter() {
        let result = chunk(vec!["a", "b", "c", "d", "e"], 2).unwrap();
        assert_eq!(result, vec![vec!["a", "b"], vec!["c", "d"], vec!["e"]]);
    }

    #[test]
    fn test_empty_input_yields_no_chunks() {
        let result = chunk(Vec::<u8>::new(), 10).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_size_larger_than_input() {
        let result = chunk(vec![1, 2], 1000).unwrap();
        assert_eq!(result, vec![vec![1, 2]]);
    }

    #[test]
    fn test_zero_size_is_rejected() {
        assert_eq!(
            chunk(vec![1, 2, 3], 0),
            Err(BatchError::InvalidChunkSize { size: 0 })
        );
        assert_eq!(
            chunk(Vec::<u8>::new(), 0),
            Err(BatchError::InvalidChunkSize { size: 0 })
        );
    }

    #[test]
    fn test_chunk_slice_matches_owned_chunks() {
        let items: Vec<u32> = (0..10).collect();
        let borrowed = chunk_slice(&items, 4).unwrap();
        let owned = chunk(items.clone(), 4).unwrap();

        assert_eq!(borrowed.len(), owned.len());
        for (slice, vec) in borrowed.iter().zip(owned.iter()) {
            assert_eq!(*slice, vec.as_slice());
        }
        assert!(chunk_slice(&items, 0).is_err());
    }
}
