//! Per-record visitor totals and group labels.

use crate::record::GroupType;

/// The adult who signed in plus accompanying children.
pub fn total_visitors(children_count: u32) -> u32 {
    children_count.saturating_add(1)
}

pub fn project(children_count: u32) -> (u32, GroupType) {
    (
        total_visitors(children_count),
        GroupType::from_children(children_count),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adult_alone() {
        assert_eq!(project(0), (1, GroupType::IndividualAdult));
    }

    #[test]
    fn test_family() {
        assert_eq!(project(3), (4, GroupType::FamilyOrGroup));
    }

    #[test]
    fn test_total_is_one_plus_children() {
        for n in 0..=40 {
            assert_eq!(total_visitors(n), n + 1);
        }
    }
}
