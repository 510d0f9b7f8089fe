/// Maps a zero-based data-row ordinal to its 1-based group number.
///
/// Groups are contiguous runs of at most `group_size` rows, numbered from 1
/// in source order, so the group number is non-decreasing over a forward
/// scan and increases exactly at multiples of `group_size`. The caller
/// detects a group boundary by comparing each row's group with the previous
/// row's, seeding the previous group as 0 before the first row.
///
/// `group_size` must be positive; configuration validation clamps it to a
/// minimum of 1 before it reaches this function.
pub fn group_of(ordinal: u64, group_size: u64) -> u64 {
    debug_assert!(group_size > 0);
    1 + ordinal / group_size
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_group_holds_the_first_size_rows() {
        assert_eq!(group_of(0, 3), 1);
        assert_eq!(group_of(1, 3), 1);
        assert_eq!(group_of(2, 3), 1);
        assert_eq!(group_of(3, 3), 2);
    }

    #[test]
    fn boundaries_fall_on_multiples_of_the_group_size() {
        for size in 1..=7u64 {
            let mut prev = 0;
            for ordinal in 0..100 {
                let group = group_of(ordinal, size);
                assert!(group >= prev);
                if group != prev {
                    assert_eq!(ordinal % size, 0);
                }
                prev = group;
            }
        }
    }

    #[test]
    fn size_one_gives_every_row_its_own_group() {
        assert_eq!(group_of(0, 1), 1);
        assert_eq!(group_of(41, 1), 42);
    }
}
