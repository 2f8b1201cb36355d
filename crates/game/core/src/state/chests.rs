use std::collections::BTreeMap;

use crate::fixed::FixedPoint;
use crate::ids::ItemId;

/// Partial progress toward each chest.
///
/// Stored points always stay below the chest's `max_points`; overflow is
/// converted into whole chests by [`ChestPoints::add_chest_points`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ChestPoints {
    points: BTreeMap<ItemId, FixedPoint>,
}

impl ChestPoints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn points(&self, chest_id: &ItemId) -> FixedPoint {
        self.points.get(chest_id).copied().unwrap_or_default()
    }

    /// Adds points and returns how many whole chests were earned.
    ///
    /// A non-positive `max_points` can never fill, so nothing is stored.
    pub fn add_chest_points(
        &mut self,
        chest_id: &ItemId,
        points: FixedPoint,
        max_points: FixedPoint,
    ) -> u64 {
        if !points.is_positive() || !max_points.is_positive() {
            return 0;
        }
        let total = self.points(chest_id).saturating_add(points);
        let earned = total.whole_times(max_points).unwrap_or(0).max(0) as u64;
        let remaining = total.rem(max_points);
        if remaining.is_zero() {
            self.points.remove(chest_id);
        } else {
            self.points.insert(chest_id.clone(), remaining);
        }
        earned
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ItemId, FixedPoint)> {
        self.points.iter().map(|(id, points)| (id, *points))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chest() -> ItemId {
        ItemId::new("mining_chest")
    }

    #[test]
    fn overflow_converts_to_chests() {
        let mut points = ChestPoints::new();
        let earned = points.add_chest_points(
            &chest(),
            FixedPoint::from_int(1100),
            FixedPoint::from_int(1000),
        );
        assert_eq!(earned, 1);
        assert_eq!(points.points(&chest()), FixedPoint::from_int(100));
    }

    #[test]
    fn accumulates_below_max() {
        let mut points = ChestPoints::new();
        let max = FixedPoint::from_int(10);
        assert_eq!(points.add_chest_points(&chest(), FixedPoint::from_f64(4.5), max), 0);
        assert_eq!(points.add_chest_points(&chest(), FixedPoint::from_f64(4.5), max), 0);
        assert_eq!(points.add_chest_points(&chest(), FixedPoint::from_int(22), max), 3);
        assert_eq!(points.points(&chest()), FixedPoint::from_int(1));
    }

    #[test]
    fn exact_multiple_leaves_nothing() {
        let mut points = ChestPoints::new();
        let max = FixedPoint::from_int(10);
        assert_eq!(points.add_chest_points(&chest(), FixedPoint::from_int(30), max), 3);
        assert_eq!(points.iter().count(), 0);
    }
}
