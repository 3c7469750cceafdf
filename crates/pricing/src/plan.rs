use serde::{Deserialize, Serialize};

/// A subscription plan as shown on the pricing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub name: String,
    /// Monthly price in whole currency units (PKR).
    pub price: u64,
    pub description: String,
    pub features: Vec<String>,
    pub popular: bool,
}

/// Price per additional user on a custom quote, whole currency units.
pub const CUSTOM_UNIT_RATE: u64 = 850;

/// The fixed plan catalog, cheapest first.
pub fn plans() -> Vec<Plan> {
    vec![
        Plan {
            name: "Starter".to_string(),
            price: 15_000,
            description: "For small businesses getting started.".to_string(),
            features: vec![
                "50 contacts".to_string(),
                "10 sales pipelines".to_string(),
                "20 invoices per month".to_string(),
                "2 user accounts".to_string(),
                "Basic support".to_string(),
            ],
            popular: false,
        },
        Plan {
            name: "Professional".to_string(),
            price: 35_000,
            description: "For growing businesses with advanced needs.".to_string(),
            features: vec![
                "500 contacts".to_string(),
                "50 sales pipelines".to_string(),
                "Unlimited invoices".to_string(),
                "5 user accounts".to_string(),
                "Priority support".to_string(),
            ],
            popular: true,
        },
        Plan {
            name: "Enterprise".to_string(),
            price: 75_000,
            description: "For large organizations with complex requirements.".to_string(),
            features: vec![
                "Unlimited contacts".to_string(),
                "Unlimited sales pipelines".to_string(),
                "Unlimited invoices".to_string(),
                "Unlimited user accounts".to_string(),
                "24/7 dedicated support".to_string(),
            ],
            popular: false,
        },
    ]
}

/// Custom quote for `units` additional users. Zero or negative unit counts
/// price at 0.
pub fn custom_quote(units: i64) -> u64 {
    if units <= 0 {
        return 0;
    }
    (units as u64).saturating_mul(CUSTOM_UNIT_RATE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_lists_three_plans_cheapest_first() {
        let plans = plans();
        assert_eq!(plans.len(), 3);
        assert_eq!(plans[0].name, "Starter");
        assert_eq!(plans[0].price, 15_000);
        assert_eq!(plans[1].name, "Professional");
        assert_eq!(plans[1].price, 35_000);
        assert_eq!(plans[2].name, "Enterprise");
        assert_eq!(plans[2].price, 75_000);
        assert!(plans.windows(2).all(|w| w[0].price < w[1].price));
    }

    #[test]
    fn only_professional_is_popular() {
        let popular: Vec<String> = plans()
            .into_iter()
            .filter(|p| p.popular)
            .map(|p| p.name)
            .collect();
        assert_eq!(popular, vec!["Professional".to_string()]);
    }

    #[test]
    fn every_plan_has_five_features() {
        for plan in plans() {
            assert_eq!(plan.features.len(), 5, "plan {}", plan.name);
        }
    }

    #[test]
    fn custom_quote_prices_per_unit() {
        assert_eq!(custom_quote(1), 850);
        assert_eq!(custom_quote(12), 10_200);
    }

    #[test]
    fn custom_quote_is_zero_for_non_positive_units() {
        assert_eq!(custom_quote(0), 0);
        assert_eq!(custom_quote(-5), 0);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            #[test]
            fn quote_is_monotonic_in_units(a in 0i64..1_000_000, b in 0i64..1_000_000) {
                let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
                prop_assert!(custom_quote(lo) <= custom_quote(hi));
            }

            #[test]
            fn quote_is_a_multiple_of_the_unit_rate(units in 1i64..1_000_000) {
                prop_assert_eq!(custom_quote(units) % CUSTOM_UNIT_RATE, 0);
            }
        }
    }
}
