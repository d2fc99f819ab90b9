//! Property tests for binning, grouping, filtering and correlation.

use proptest::prelude::*;
use spendscope::analysis::stats::pearson;
use spendscope::analysis::{group_means, Binning, Bounds, RecordFilter};
use spendscope::dashboards::{CampaignFilter, EducationFilter, FamilyFilter, IncomeFilter};
use spendscope::models::{AgeBracket, CampaignRecord, FamilyRecord, IncomeBracket, SpendRecord};

fn family_record() -> impl Strategy<Value = FamilyRecord> {
    (0u32..4, 0u32..4, 0.0..3000.0f64, 0.0..300.0f64, 0.0..300.0f64).prop_map(
        |(kidhome, teenhome, total, sweets, gold)| FamilyRecord {
            kidhome,
            teenhome,
            mnt_total: total,
            mnt_sweet_products: sweets,
            mnt_gold_prods: gold,
        },
    )
}

fn campaign_record() -> impl Strategy<Value = CampaignRecord> {
    (0u32..5, 18i32..100, 0u8..2).prop_map(|(accepted, age, graduate)| CampaignRecord {
        accepted_cmp_overall: accepted,
        age,
        education_graduation: graduate,
    })
}

fn spend_record() -> impl Strategy<Value = SpendRecord> {
    (0.0..200_000.0f64, 0.0..1500.0f64, 0.0..200.0f64, 0.0..1800.0f64).prop_map(
        |(income, wines, fruits, meat)| SpendRecord {
            income,
            mnt_wines: wines,
            mnt_fruits: fruits,
            mnt_meat_products: meat,
            age: 40,
        },
    )
}

/// Strictly increasing, finite lower edges.
fn edges() -> impl Strategy<Value = Vec<f64>> {
    (-1000.0..1000.0f64, prop::collection::vec(0.5..500.0f64, 0..6)).prop_map(|(start, gaps)| {
        let mut edges = vec![start];
        for gap in gaps {
            let next = edges[edges.len() - 1] + gap;
            edges.push(next);
        }
        edges
    })
}

proptest! {
    #[test]
    fn binning_is_total_and_ordered(edges in edges(), value in -5000.0..5000.0f64) {
        let labels: Vec<usize> = (0..edges.len()).collect();
        let binning = Binning::new(edges.clone(), labels).unwrap();

        let bin = binning.classify(value);
        prop_assert!(bin < edges.len());
        if bin > 0 {
            prop_assert!(value >= edges[bin]);
        }
        if bin + 1 < edges.len() {
            prop_assert!(value < edges[bin + 1]);
        }
    }

    #[test]
    fn boundary_values_open_their_bin(edges in edges()) {
        let labels: Vec<usize> = (0..edges.len()).collect();
        let binning = Binning::new(edges.clone(), labels).unwrap();

        for (i, edge) in edges.iter().enumerate() {
            prop_assert_eq!(binning.classify(*edge), i);
        }
    }

    #[test]
    fn fixed_brackets_cover_every_value(age in -10i32..150, income in -1000.0..500_000.0f64) {
        let age_label = AgeBracket::of(age).to_string();
        let income_label = IncomeBracket::of(income).to_string();
        prop_assert!(!age_label.is_empty());
        prop_assert!(!income_label.is_empty());
    }

    #[test]
    fn grouping_ignores_record_order(
        (records, order) in prop::collection::vec(family_record(), 1..40)
            .prop_flat_map(|records| {
                let n = records.len();
                (Just(records), Just((0..n).collect::<Vec<_>>()).prop_shuffle())
            })
    ) {
        let shuffled: Vec<FamilyRecord> = order.iter().map(|&i| records[i]).collect();
        let measures: [fn(&FamilyRecord) -> f64; 1] = [|r| r.mnt_total];

        let a = group_means(&records, FamilyRecord::total_children, &measures);
        let b = group_means(&shuffled, FamilyRecord::total_children, &measures);

        prop_assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            prop_assert_eq!(x.key, y.key);
            prop_assert_eq!(x.count, y.count);
            prop_assert!((x.means[0] - y.means[0]).abs() <= 1e-6 * x.means[0].abs().max(1.0));
        }
        let total: usize = a.iter().map(|g| g.count).sum();
        prop_assert_eq!(total, records.len());
        prop_assert!(a.windows(2).all(|w| w[0].key < w[1].key));
    }

    #[test]
    fn filters_are_idempotent(
        family in prop::collection::vec(family_record(), 0..30),
        campaign in prop::collection::vec(campaign_record(), 0..30),
        spend in prop::collection::vec(spend_record(), 0..30),
        lo in 0u64..7,
        age in 18i32..80,
        income in 0.0..150_000.0f64,
    ) {
        let family_filter = FamilyFilter { children: Bounds::between(lo, lo + 2) };
        let once = family_filter.apply(&family);
        prop_assert_eq!(family_filter.apply(&once), once.clone());
        prop_assert!(once.iter().all(|r| family_filter.matches(r)));

        let campaign_filter = CampaignFilter {
            age: Bounds::between(age, age + 15),
            education: EducationFilter::Graduates,
        };
        let once = campaign_filter.apply(&campaign);
        prop_assert_eq!(campaign_filter.apply(&once), once.clone());

        let income_filter = IncomeFilter { income: Bounds::new(Some(income), None) };
        let once = income_filter.apply(&spend);
        prop_assert_eq!(income_filter.apply(&once), once.clone());
        prop_assert!(once.iter().all(|r| r.income >= income));
    }

    #[test]
    fn correlation_is_bounded(
        pairs in prop::collection::vec((-1e6..1e6f64, -1e6..1e6f64), 0..50)
    ) {
        let (xs, ys): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();
        if let Some(r) = pearson(&xs, &ys) {
            prop_assert!((-1.0..=1.0).contains(&r));
        }
    }

    #[test]
    fn self_correlation_is_one(xs in prop::collection::vec(-1e4..1e4f64, 2..50)) {
        let spread = xs.iter().cloned().fold(f64::NEG_INFINITY, f64::max)
            - xs.iter().cloned().fold(f64::INFINITY, f64::min);
        prop_assume!(spread > 1e-3);

        let r = pearson(&xs, &xs).unwrap();
        prop_assert!((r - 1.0).abs() < 1e-9);
    }
}
