//! The same group-by computed by a differential dataflow, used as an engine
//! baseline for the hand-written kernel in [`crate::aggregate`].

use std::time::Instant;

use differential_dataflow::difference::{IsZero, Monoid, Multiply, Semigroup};
use differential_dataflow::input::InputSession;
use differential_dataflow::operators::*;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::category::GroupKey;
use crate::error::Error;
use crate::models::{AggResult, Aggregation, GroupTotals, SalesRecord};

pub type SysTime = u64;
pub type SysDiff = isize;

type Row = (GroupKey, Decimal, u64);

/// Aggregates `records` with a single timely worker on the calling thread.
///
/// Classification happens before the dataflow is built, so an invalid
/// category fails the call with the same error as [`crate::aggregate`].
/// Amounts are summed as exact decimals and converted back to `f64` at the
/// end.
pub fn aggregate_dataflow<'a, I>(records: I) -> Result<Aggregation, Error>
where
    I: IntoIterator<Item = &'a SalesRecord>,
{
    let timer = Instant::now();
    let rows = records
        .into_iter()
        .map(to_row)
        .collect::<Result<Vec<_>, _>>()?;
    let count = rows.len();

    let (tx, rx) = crossbeam::channel::unbounded();
    timely::execute_directly(move |worker| {
        let mut input: InputSession<SysTime, Row, SysDiff> = InputSession::new();
        worker.dataflow::<SysTime, _, _>(|scope| {
            input
                .to_collection(scope)
                .explode(|(key, amount, quantity)| Some((key, Sum::new(amount, quantity))))
                .count_total_core::<SysDiff>()
                .inspect(move |((key, sum), _time, diff)| {
                    // rx outlives the worker, send cannot fail
                    let _ = tx.send((*key, sum.clone(), *diff));
                });
        });
        for row in rows {
            input.update(row, 1);
        }
        input.advance_to(1);
        input.flush();
    });

    let mut groups = GroupTotals::default();
    for (key, sum, diff) in rx.try_iter() {
        // single input epoch, every group is emitted once with a positive diff
        if diff > 0 {
            *groups.get_mut(key) = sum.to_agg_result(key)?;
        }
    }

    let ret = Aggregation::from(groups);
    info!(
        records = count,
        top = %ret.top,
        "dataflow aggregation finished, time: {:?}",
        timer.elapsed()
    );
    Ok(ret)
}

fn to_row(record: &SalesRecord) -> Result<Row, Error> {
    let key = GroupKey::classify(&record.region, &record.product)?;
    let amount = Decimal::from_f64_retain(record.amount)
        .ok_or_else(|| Error::Dataflow(format!("amount {} is not representable", record.amount)))?;
    Ok((key, amount, record.quantity))
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, Ord, PartialOrd, Eq, PartialEq, Hash)]
struct Sum {
    count: u64,
    amount: Decimal,
    quantity: u64,
    /// set once `amount` left the decimal range; the sum is unusable after that
    overflow: bool,
}

impl Sum {
    fn new(amount: Decimal, quantity: u64) -> Self {
        Sum {
            count: 1,
            amount,
            quantity,
            overflow: false,
        }
    }

    fn to_agg_result(&self, key: GroupKey) -> Result<AggResult, Error> {
        let total_amount = match self.amount.to_f64() {
            Some(amount) if !self.overflow => amount,
            _ => {
                return Err(Error::Dataflow(format!(
                    "total amount of {key} overflows the decimal range"
                )))
            }
        };
        Ok(AggResult {
            total_sales: self.count,
            total_amount,
            total_quantity: self.quantity,
        })
    }
}

impl Multiply<SysDiff> for Sum {
    type Output = Self;
    fn multiply(self, rhs: &SysDiff) -> Self::Output {
        // insert-only input
        assert!(*rhs > 0);
        let urhs = *rhs as u64;
        let amount = self.amount.checked_mul(Decimal::from(urhs));
        Sum {
            count: self.count.saturating_mul(urhs),
            amount: amount.unwrap_or(self.amount),
            quantity: self.quantity.saturating_mul(urhs),
            overflow: self.overflow || amount.is_none(),
        }
    }
}

impl IsZero for Sum {
    fn is_zero(&self) -> bool {
        self.count == 0
    }
}

impl Semigroup for Sum {
    fn plus_equals(&mut self, rhs: &Self) {
        self.count = self.count.saturating_add(rhs.count);
        self.quantity = self.quantity.saturating_add(rhs.quantity);
        self.overflow |= rhs.overflow;
        match self.amount.checked_add(rhs.amount) {
            Some(amount) => self.amount = amount,
            None => self.overflow = true,
        }
    }
}

impl Monoid for Sum {
    fn zero() -> Self {
        Sum::default()
    }
}
