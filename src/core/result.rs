use indexmap::IndexMap;

use crate::model::{ItemDefinition, ItemId};

#[derive(Debug, Clone, PartialEq)]
pub struct ItemTally {
    pub item: ItemDefinition,
    pub count: u32,
}

impl ItemTally {
    pub fn points(&self) -> u64 {
        u64::from(self.item.point_value) * u64::from(self.count)
    }
}

/// Outcome of one harvest. Not `Clone`: the value is consumed exactly once
/// when its points are credited.
#[derive(Debug, PartialEq)]
#[must_use = "a harvest result must be claimed or its points are lost"]
pub struct HarvestRunResult {
    run_size: u32,
    tallies: IndexMap<ItemId, ItemTally>,
    total_points: u64,
}

impl HarvestRunResult {
    pub(crate) fn new(run_size: u32) -> Self {
        Self {
            run_size,
            tallies: IndexMap::new(),
            total_points: 0,
        }
    }

    pub(crate) fn record(&mut self, item: &ItemDefinition) {
        self.total_points += u64::from(item.point_value);
        self.tallies
            .entry(item.id.clone())
            .or_insert_with(|| ItemTally {
                item: item.clone(),
                count: 0,
            })
            .count += 1;
    }

    pub fn run_size(&self) -> u32 {
        self.run_size
    }

    pub fn total_points(&self) -> u64 {
        self.total_points
    }

    pub fn tallies(&self) -> impl Iterator<Item = &ItemTally> {
        self.tallies.values()
    }

    pub fn count_of(&self, id: &ItemId) -> u32 {
        self.tallies.get(id).map(|tally| tally.count).unwrap_or(0)
    }

    pub fn item_ids(&self) -> impl Iterator<Item = &ItemId> {
        self.tallies.keys()
    }

    pub fn drawn_count(&self) -> u64 {
        self.tallies.values().map(|tally| u64::from(tally.count)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::HarvestRunResult;
    use crate::model::{ItemDefinition, ItemId};

    #[test]
    fn recording_folds_counts_and_points() {
        let normal = ItemDefinition::new("normal", "Normal", 5, 0, 1.0);
        let gold = ItemDefinition::new("gold", "Gold", 10, 30, 0.2);
        let mut result = HarvestRunResult::new(4);

        result.record(&gold);
        result.record(&normal);
        result.record(&normal);
        result.record(&normal);

        assert_eq!(result.total_points(), 25);
        assert_eq!(result.drawn_count(), 4);
        assert_eq!(result.count_of(&ItemId::new("normal")), 3);
        assert_eq!(result.count_of(&ItemId::new("silver")), 0);
        let order = result.tallies().map(|tally| tally.item.id.as_str()).collect::<Vec<_>>();
        assert_eq!(order, ["gold", "normal"]);
        assert_eq!(result.tallies().map(|tally| tally.points()).sum::<u64>(), 25);
    }
}
