//! Reduction of per-file records into one report.

use crate::stats::{AggregateReport, FileRecord};

/// Sum the counts of all records. The order of `records` does not matter.
pub fn reduce(records: &[FileRecord]) -> AggregateReport {
    AggregateReport {
        file_count: records.len() as u64,
        totals: records.iter().map(|r| &r.counts).sum(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::LineCounts;
    use proptest::prelude::*;
    use std::path::PathBuf;

    fn record(name: &str, blank: u64, comment: u64, code: u64) -> FileRecord {
        FileRecord::new(
            PathBuf::from(name),
            LineCounts {
                blank,
                comment,
                code,
            },
        )
    }

    #[test]
    fn test_reduce_empty() {
        assert_eq!(reduce(&[]), AggregateReport::default());
    }

    #[test]
    fn test_reduce_sums_fields() {
        let records = vec![record("a.c", 1, 2, 3), record("b.c", 10, 20, 30)];

        let report = reduce(&records);

        assert_eq!(report.file_count, 2);
        assert_eq!(
            report.totals,
            LineCounts {
                blank: 11,
                comment: 22,
                code: 33
            }
        );
    }

    fn records_and_permutation() -> impl Strategy<Value = (Vec<FileRecord>, Vec<FileRecord>)> {
        prop::collection::vec((0u64..1000, 0u64..1000, 0u64..1000), 0..20).prop_flat_map(|counts| {
            let records: Vec<FileRecord> = counts
                .iter()
                .enumerate()
                .map(|(i, &(b, c, k))| record(&format!("f{i}.c"), b, c, k))
                .collect();
            (Just(records.clone()), Just(records).prop_shuffle())
        })
    }

    proptest! {
        #[test]
        fn reduce_is_order_independent((records, shuffled) in records_and_permutation()) {
            prop_assert_eq!(reduce(&records), reduce(&shuffled));
        }
    }
}
