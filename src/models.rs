use chrono::NaiveDate;
use compact_str::CompactString;
use serde::{Deserialize, Serialize};

use crate::category::{GroupKey, GROUP_COUNT};

///////////////////////// input ////////////////////////////////
/// One sale. Region and product stay textual so that values outside the
/// enumerations can be carried to the aggregator and reported.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SalesRecord {
    pub region: CompactString,
    pub product: CompactString,
    pub amount: f64,
    pub quantity: u64,
    pub date: NaiveDate,
}

impl SalesRecord {
    pub fn new(
        region: impl Into<CompactString>,
        product: impl Into<CompactString>,
        amount: f64,
        quantity: u64,
        date: NaiveDate,
    ) -> Self {
        SalesRecord {
            region: region.into(),
            product: product.into(),
            amount,
            quantity,
            date,
        }
    }
}

///////////////////////// output ////////////////////////////////
#[derive(Copy, Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct AggResult {
    pub total_sales: u64,
    pub total_amount: f64,
    pub total_quantity: u64,
}

/// Counts saturate at `u64::MAX` instead of overflowing.
impl AggResult {
    #[inline]
    pub fn add(&mut self, record: &SalesRecord) {
        self.total_sales = self.total_sales.saturating_add(1);
        self.total_amount += record.amount;
        self.total_quantity = self.total_quantity.saturating_add(record.quantity);
    }

    pub fn merge(&mut self, other: &AggResult) {
        self.total_sales = self.total_sales.saturating_add(other.total_sales);
        self.total_amount += other.total_amount;
        self.total_quantity = self.total_quantity.saturating_add(other.total_quantity);
    }

    pub fn avg_amount(&self) -> Option<f64> {
        (self.total_sales > 0).then(|| self.total_amount / self.total_sales as f64)
    }

    pub fn avg_quantity(&self) -> Option<f64> {
        (self.total_sales > 0).then(|| self.total_quantity as f64 / self.total_sales as f64)
    }
}

/// Totals for all 20 groups, addressed by [`GroupKey::index`].
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct GroupTotals {
    slots: [AggResult; GROUP_COUNT],
}

impl GroupTotals {
    pub fn get(&self, key: GroupKey) -> &AggResult {
        &self.slots[key.index()]
    }

    pub(crate) fn get_mut(&mut self, key: GroupKey) -> &mut AggResult {
        &mut self.slots[key.index()]
    }

    /// Groups with their totals, in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (GroupKey, &AggResult)> {
        GroupKey::all().zip(self.slots.iter())
    }

    /// Sum over every group.
    pub fn total(&self) -> AggResult {
        let mut ret = AggResult::default();
        for agg in &self.slots {
            ret.merge(agg);
        }
        ret
    }

    /// The group with the strictly largest amount. Ties, including the all
    /// zero case, keep the canonically earliest group.
    pub fn top(&self) -> (GroupKey, AggResult) {
        let mut max_idx = 0;
        let mut max_amount = self.slots[0].total_amount;
        for (idx, agg) in self.slots.iter().enumerate().skip(1) {
            if agg.total_amount > max_amount {
                max_idx = idx;
                max_amount = agg.total_amount;
            }
        }
        let key = GroupKey::from_index(max_idx).unwrap_or(GroupKey::FIRST);
        (key, self.slots[max_idx])
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Aggregation {
    pub top: GroupKey,
    pub top_totals: AggResult,
    pub groups: GroupTotals,
}

impl From<GroupTotals> for Aggregation {
    fn from(groups: GroupTotals) -> Self {
        let (top, top_totals) = groups.top();
        Aggregation {
            top,
            top_totals,
            groups,
        }
    }
}
