use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use salesagg::{
    aggregate, aggregate_dataflow, generate, Error, Field, GroupKey, Product, Region, SalesRecord,
    SampleConfig,
};

fn init_log() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

#[test]
fn smoke() -> anyhow::Result<()> {
    init_log();
    let records = generate(&SampleConfig::default());
    assert_eq!(records.len(), 1_000_000);

    let res = aggregate(&records)?;
    assert_eq!(res.top, GroupKey::new(Region::West, Product::Keyboard));
    assert_eq!(res.top_totals.total_sales, 50_000);
    assert_eq!(res.top_totals.total_quantity, 500_000);
    assert!((res.top_totals.total_amount - 250_009_500_000.0).abs() < 1e-6);

    let avg_quantity = res.top_totals.avg_quantity().unwrap_or_default();
    assert!((avg_quantity - 10.0).abs() < 1e-6);
    let avg_amount = res.top_totals.avg_amount().unwrap_or_default();
    assert!((avg_amount - 5_000_190.0).abs() < 1e-6);

    for (_, agg) in res.groups.iter() {
        assert_eq!(agg.total_sales, 50_000);
    }
    Ok(())
}

#[test]
fn order_independent() -> anyhow::Result<()> {
    init_log();
    let ordered = aggregate(&generate(&SampleConfig::new(100_000).without_shuffle()))?;
    let a = aggregate(&generate(&SampleConfig::new(100_000).with_shuffle(1)))?;
    let b = aggregate(&generate(&SampleConfig::new(100_000).with_shuffle(2)))?;
    // integral amounts, so every summation order is exact
    assert_eq!(ordered, a);
    assert_eq!(ordered, b);
    Ok(())
}

#[test]
fn dataflow_agrees() -> anyhow::Result<()> {
    init_log();
    let records = generate(&SampleConfig::new(100_000));
    let native = aggregate(&records)?;
    let dataflow = aggregate_dataflow(&records)?;
    assert_eq!(native, dataflow);
    assert_eq!(dataflow.top, GroupKey::new(Region::West, Product::Keyboard));
    assert_eq!(dataflow.top_totals.total_sales, 5_000);
    assert_eq!(dataflow.top_totals.total_quantity, 50_000);
    Ok(())
}

#[test]
fn concurrent_calls() -> anyhow::Result<()> {
    init_log();
    let records = generate(&SampleConfig::new(200_000));
    let expected = aggregate(&records)?;
    let results = (0..8)
        .into_par_iter()
        .map(|_| aggregate(&records))
        .collect::<Result<Vec<_>, _>>()?;
    for res in results {
        assert_eq!(res, expected);
    }
    Ok(())
}

fn random_records(rng: &mut StdRng, n: usize) -> Vec<SalesRecord> {
    let date = chrono::NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
    (0..n)
        .map(|_| {
            let region = Region::ALL[rng.gen_range(0..Region::ALL.len())];
            let product = Product::ALL[rng.gen_range(0..Product::ALL.len())];
            let amount = rng.gen_range(0..40_000u32) as f64 * 0.25;
            let quantity = rng.gen_range(0..50);
            SalesRecord::new(region.name(), product.name(), amount, quantity, date)
        })
        .collect()
}

#[test]
fn conservation() -> anyhow::Result<()> {
    init_log();
    let mut rng = StdRng::seed_from_u64(2024);
    for n in [0, 1, 19, 20, 1_000, 25_000] {
        let records = random_records(&mut rng, n);
        let res = aggregate(&records)?;
        let total = res.groups.total();

        assert_eq!(total.total_sales, n as u64);
        assert_eq!(total.total_quantity, records.iter().map(|r| r.quantity).sum::<u64>());
        let amount: f64 = records.iter().map(|r| r.amount).sum();
        assert!((total.total_amount - amount).abs() <= 1e-9 * amount.abs());

        // the top group is never beaten and never tied by an earlier group
        for (key, agg) in res.groups.iter() {
            assert!(agg.total_amount <= res.top_totals.total_amount);
            if key < res.top {
                assert!(agg.total_amount < res.top_totals.total_amount);
            }
        }

        let dataflow = aggregate_dataflow(&records)?;
        for ((key, a), (_, b)) in res.groups.iter().zip(dataflow.groups.iter()) {
            assert_eq!(a.total_sales, b.total_sales, "{key}");
            assert_eq!(a.total_quantity, b.total_quantity, "{key}");
            let tolerance = 1e-9 * a.total_amount.abs().max(1.0);
            assert!((a.total_amount - b.total_amount).abs() <= tolerance, "{key}");
        }
    }
    Ok(())
}

#[test]
fn invalid_category_fails_whole_call() {
    init_log();
    let mut records = generate(&SampleConfig::new(1_000));
    records[500].region = "Z".into();

    let expected = Error::InvalidCategory {
        field: Field::Region,
        value: "Z".into(),
    };
    assert_eq!(aggregate(&records), Err(expected.clone()));
    assert_eq!(aggregate_dataflow(&records), Err(expected));
}
