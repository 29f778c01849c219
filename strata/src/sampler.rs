//! Display-column partition planner.
//!
//! Given a plot width in columns and a raw-index range, the planner decides
//! which underlying entries each column must reduce. The renderer then asks
//! the store for one aggregate per returned sub-range.

/// Partitions `[start, end)` into at most `rows` contiguous sub-ranges.
///
/// Each returned pair is a `(begin, end)` index range of entries reduced
/// into one display column. The sub-ranges are contiguous, non-overlapping,
/// and cover `[start, end)` exactly; when the range does not divide evenly,
/// the earliest columns receive the extra elements (10 over 3 columns
/// splits {4, 3, 3}). A range shorter than `rows` yields one single-element
/// sub-range per entry.
///
/// Degenerate inputs (`rows == 0` or an empty/inverted range) yield an
/// empty plan.
pub fn sample(rows: usize, start: usize, end: usize) -> Vec<(usize, usize)> {
    if rows == 0 || start >= end {
        return Vec::new();
    }

    let total = end - start;
    let columns = rows.min(total);
    let base = total / columns;
    let remainder = total % columns;

    let mut plan = Vec::with_capacity(columns);
    let mut cursor = start;
    for column in 0..columns {
        let size = if column < remainder { base + 1 } else { base };
        plan.push((cursor, cursor + size));
        cursor += size;
    }
    plan
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remainder_goes_to_earliest_columns() {
        let plan = sample(3, 0, 10);
        assert_eq!(plan, vec![(0, 4), (4, 7), (7, 10)]);
    }

    #[test]
    fn test_even_split() {
        let plan = sample(4, 0, 12);
        assert_eq!(plan, vec![(0, 3), (3, 6), (6, 9), (9, 12)]);
    }

    #[test]
    fn test_offset_range() {
        let plan = sample(2, 5, 10);
        assert_eq!(plan, vec![(5, 8), (8, 10)]);
    }

    #[test]
    fn test_short_range_yields_fewer_columns() {
        let plan = sample(8, 0, 3);
        assert_eq!(plan, vec![(0, 1), (1, 2), (2, 3)]);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(sample(0, 0, 10).is_empty());
        assert!(sample(3, 4, 4).is_empty());
        assert!(sample(3, 9, 2).is_empty());
    }

    #[test]
    fn test_partition_is_exact_for_many_shapes() {
        for rows in 1..20 {
            for total in 0..50 {
                let start = 7;
                let plan = sample(rows, start, start + total);

                // Contiguous, non-overlapping, exact coverage.
                let mut cursor = start;
                for &(begin, end) in &plan {
                    assert_eq!(begin, cursor, "rows={rows} total={total}");
                    assert!(end > begin);
                    cursor = end;
                }
                if total > 0 {
                    assert_eq!(cursor, start + total);
                    assert_eq!(plan.len(), rows.min(total));

                    // Sizes are non-increasing by at most one.
                    let sizes: Vec<usize> = plan.iter().map(|(b, e)| e - b).collect();
                    let max = *sizes.iter().max().unwrap();
                    let min = *sizes.iter().min().unwrap();
                    assert!(max - min <= 1);
                    assert!(sizes.windows(2).all(|w| w[0] >= w[1]));
                }
            }
        }
    }
}
