use tracing::debug;

use crate::category::GroupKey;
use crate::error::Error;
use crate::models::{Aggregation, GroupTotals, SalesRecord};

/// Groups `records` by (region, product) in a single pass and reports the
/// group with the largest total amount.
///
/// Accumulators live on the stack for the duration of the call, so the
/// function is reentrant. A record outside the region or product
/// enumerations fails the whole call; no partial totals are returned.
pub fn aggregate<'a, I>(records: I) -> Result<Aggregation, Error>
where
    I: IntoIterator<Item = &'a SalesRecord>,
{
    let mut groups = GroupTotals::default();
    let mut count = 0usize;
    for record in records {
        let key = GroupKey::classify(&record.region, &record.product)
            .inspect_err(|e| debug!(record = count, "classification failed: {e}"))?;
        groups.get_mut(key).add(record);
        count += 1;
    }

    let ret = Aggregation::from(groups);
    debug!(records = count, top = %ret.top, "aggregation finished");
    Ok(ret)
}
