use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::Add;

/// The four stockpiled resources.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Mineral,
    Organic,
    Radioactive,
    Exotic,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Mineral,
        ResourceKind::Organic,
        ResourceKind::Radioactive,
        ResourceKind::Exotic,
    ];
}

/// One amount per resource kind. Used for production rates, storage
/// capacities and stockpiles alike.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resources {
    pub mineral: u64,
    pub organic: u64,
    pub radioactive: u64,
    pub exotic: u64,
}

impl Resources {
    pub const ZERO: Self = Self::splat(0);

    pub const fn new(mineral: u64, organic: u64, radioactive: u64, exotic: u64) -> Self {
        Self {
            mineral,
            organic,
            radioactive,
            exotic,
        }
    }

    pub const fn splat(amount: u64) -> Self {
        Self::new(amount, amount, amount, amount)
    }

    pub fn get(&self, kind: ResourceKind) -> u64 {
        match kind {
            ResourceKind::Mineral => self.mineral,
            ResourceKind::Organic => self.organic,
            ResourceKind::Radioactive => self.radioactive,
            ResourceKind::Exotic => self.exotic,
        }
    }

    pub fn get_mut(&mut self, kind: ResourceKind) -> &mut u64 {
        match kind {
            ResourceKind::Mineral => &mut self.mineral,
            ResourceKind::Organic => &mut self.organic,
            ResourceKind::Radioactive => &mut self.radioactive,
            ResourceKind::Exotic => &mut self.exotic,
        }
    }

    /// Add `produced` to `self`, clamping each resource at `capacity`.
    ///
    /// Excess is dropped. A stockpile already above capacity is left as is so
    /// that shrinking capacity never destroys stored resources.
    pub fn stored_with(&self, produced: Resources, capacity: Resources) -> Resources {
        let mut out = *self;
        for kind in ResourceKind::ALL {
            let current = self.get(kind);
            let cap = capacity.get(kind).max(current);
            *out.get_mut(kind) = current.saturating_add(produced.get(kind)).min(cap);
        }
        out
    }

    /// Tuple form: (mineral, organic, radioactive, exotic).
    pub fn as_tuple(&self) -> (u64, u64, u64, u64) {
        (self.mineral, self.organic, self.radioactive, self.exotic)
    }
}

impl Add for Resources {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            mineral: self.mineral.saturating_add(rhs.mineral),
            organic: self.organic.saturating_add(rhs.organic),
            radioactive: self.radioactive.saturating_add(rhs.radioactive),
            exotic: self.exotic.saturating_add(rhs.exotic),
        }
    }
}

impl Sum for Resources {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Resources::ZERO, Add::add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storing_caps_at_capacity() {
        let stock = Resources::new(10, 0, 95, 0);
        let produced = Resources::new(10, 5, 10, 0);
        let capacity = Resources::new(15, 100, 100, 0);
        assert_eq!(
            stock.stored_with(produced, capacity),
            Resources::new(15, 5, 100, 0)
        );
    }

    #[test]
    fn storing_never_lowers_an_overfull_stockpile() {
        let stock = Resources::splat(120);
        let stored = stock.stored_with(Resources::splat(10), Resources::splat(100));
        assert_eq!(stored, stock);
    }

    #[test]
    fn sum_saturates() {
        let total: Resources = [Resources::splat(u64::MAX), Resources::splat(1)]
            .into_iter()
            .sum();
        assert_eq!(total, Resources::splat(u64::MAX));
    }
}
