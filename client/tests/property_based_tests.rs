use bizops::batch::{BatchReport, SubError, chunk, chunk_slice, process_batches, process_records};
use proptest::prelude::*;

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .expect("Failed to build test runtime")
        .block_on(future)
}

#[cfg(test)]
mod chunker_property_tests {
    use super::*;

    proptest! {
        #[test]
        fn test_chunks_preserve_items_and_order(
            items in prop::collection::vec(any::<u32>(), 0..500),
            size in 1usize..100
        ) {
            let chunks = chunk(items.clone(), size).unwrap();

            // Property: concatenating the chunks gives back the input
            let flattened: Vec<u32> = chunks.iter().flatten().copied().collect();
            prop_assert_eq!(&flattened, &items);

            // Property: ceil(n / size) chunks
            prop_assert_eq!(chunks.len(), items.len().div_ceil(size));

            // Property: every chunk is full except possibly the last
            if let Some((last, full)) = chunks.split_last() {
                prop_assert!(full.iter().all(|c| c.len() == size));
                prop_assert!(!last.is_empty() && last.len() <= size);
            }

            // Property: chunking the same input again gives the same chunks
            prop_assert_eq!(chunk(items.clone(), size).unwrap(), chunks);
        }

        #[test]
        fn test_slice_chunks_match_owned_chunks(
            items in prop::collection::vec(".{0,8}", 0..200),
            size in 1usize..50
        ) {
            let owned = chunk(items.clone(), size).unwrap();
            let borrowed = chunk_slice(&items, size).unwrap();

            prop_assert_eq!(owned.len(), borrowed.len());
            for (owned, borrowed) in owned.iter().zip(borrowed) {
                prop_assert_eq!(owned.as_slice(), borrowed);
            }
        }

        #[test]
        fn test_zero_size_is_always_rejected(items in prop::collection::vec(any::<u8>(), 0..50)) {
            prop_assert!(chunk(items.clone(), 0).is_err());
            prop_assert!(chunk_slice(&items, 0).is_err());
        }
    }
}

#[cfg(test)]
mod report_property_tests {
    use super::*;

    proptest! {
        #[test]
        fn test_report_counts_are_consistent(
            item_count in 0usize..300,
            size in 1usize..40,
            failing in prop::collection::vec(any::<bool>(), 0..300)
        ) {
            let items: Vec<usize> = (0..item_count).collect();
            let mut call = 0usize;

            let report = block_on(process_records(
                "Type",
                items,
                |_, _| {
                    let fail = failing.get(call).copied().unwrap_or(false);
                    call += 1;
                    async move {
                        if fail {
                            Err(vec![SubError::new(format!("batch {call} failed"))])
                        } else {
                            Ok(())
                        }
                    }
                },
                size,
            ))
            .unwrap();

            // Property: batch and record counts add up
            prop_assert_eq!(report.total_batch_count, item_count.div_ceil(size));
            prop_assert_eq!(
                report.successful_batch_count + report.failed_batch_count,
                report.total_batch_count
            );
            prop_assert_eq!(report.total_record_count, item_count);
            prop_assert_eq!(
                report.successful_record_count + report.failed_record_count,
                report.total_record_count
            );

            // Property: one error entry per failed batch here
            prop_assert_eq!(report.errors.len(), report.failed_batch_count);
            prop_assert_eq!(report.is_complete_success(), report.failed_batch_count == 0);
        }

        #[test]
        fn test_errors_keep_chunk_order(error_counts in prop::collection::vec(0usize..4, 1..20)) {
            let batches: Vec<Vec<u8>> = error_counts.iter().map(|_| vec![0]).collect();
            let mut index = 0usize;

            let report = block_on(process_batches("Type", batches, |_, _| {
                let errors: Vec<SubError> = (0..error_counts[index])
                    .map(|n| SubError::new(format!("{index}:{n}")))
                    .collect();
                index += 1;
                async move { Err::<(), _>(errors) }
            }));

            let expected: Vec<String> = error_counts
                .iter()
                .enumerate()
                .flat_map(|(i, count)| (0..*count).map(move |n| format!("{i}:{n}")))
                .collect();
            let actual: Vec<String> = report.errors.iter().map(|e| e.message.clone()).collect();

            // Property: sub-errors are appended in chunk order, and an empty
            // list contributes nothing
            prop_assert_eq!(actual, expected);
            prop_assert_eq!(report.failed_batch_count, error_counts.len());
        }
    }

    #[test]
    fn test_report_serializes_camel_case() {
        let mut report = BatchReport::new();
        report.add_success(3);
        report.add_failure(2, "Oh no!");

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["totalBatchCount"], 2);
        assert_eq!(value["successfulRecordCount"], 3);
        assert_eq!(value["failedRecordCount"], 2);
        assert_eq!(value["errors"][0]["message"], "Oh no!");
        assert!(value["duration"].is_u64());
    }
}
