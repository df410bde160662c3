use order_desk::domain::money::{Currency, MoneyAmount};
use order_desk::domain::order::{
    CustomerContact, NewOrder, NewOrderItem, NewOrderParams, OrderStatus, ShippingAddress,
};
use order_desk::domain::subscription::{BillingInterval, IntervalUnit, SubscriptionStatus};
use proptest::prelude::*;

fn arb_interval_unit() -> impl Strategy<Value = IntervalUnit> {
    prop_oneof![
        Just(IntervalUnit::Day),
        Just(IntervalUnit::Week),
        Just(IntervalUnit::Month),
        Just(IntervalUnit::Year),
    ]
}

fn arb_items() -> impl Strategy<Value = Vec<(u32, i64)>> {
    // (quantity, unit price in cents)
    prop::collection::vec((1u32..5, 0i64..10_000), 1..6)
}

fn make_items(entries: &[(u32, i64)]) -> Vec<NewOrderItem> {
    entries.iter()
        .enumerate()
        .map(|(i, &(quantity, unit))| NewOrderItem {
            product_id: None,
            variant_id: None,
            title: format!("Item {i}"),
            sku: None,
            image_url: None,
            quantity,
            unit_price: MoneyAmount::new(unit).unwrap(),
            total_price: MoneyAmount::new(unit * i64::from(quantity)).unwrap(),
        })
        .collect()
}

fn make_order(items: Vec<NewOrderItem>, shipping: i64, discount: i64) -> Result<NewOrder, order_desk::domain::error::PipelineError> {
    NewOrder::new(NewOrderParams {
        checkout_session_id: "cs_prop_1".to_string(),
        payment_intent_id: None,
        customer_ref: None,
        contact: CustomerContact::default(),
        shipping: ShippingAddress::default(),
        shipping_cost: MoneyAmount::new(shipping).unwrap(),
        discount: MoneyAmount::new(discount).unwrap(),
        currency: Currency::Usd,
        items,
    })
}

proptest! {
    /// Minor-unit → decimal rendering loses nothing: splitting the string
    /// back into whole and fractional cents reproduces the input exactly.
    #[test]
    fn decimal_rendering_is_exact(cents in 0i64..=i64::MAX) {
        let rendered = MoneyAmount::new(cents).unwrap().to_decimal_string();
        let (whole, frac) = rendered.split_once('.').unwrap();
        prop_assert_eq!(frac.len(), 2);
        let roundtripped = whole.parse::<i64>().unwrap() * 100 + frac.parse::<i64>().unwrap();
        prop_assert_eq!(roundtripped, cents);
    }

    /// The interval mapping table is total: the three plans map to
    /// themselves, everything else collapses to monthly.
    #[test]
    fn interval_mapping_defaults_to_monthly(unit in arb_interval_unit(), count in 0u64..48) {
        let mapped = BillingInterval::from_provider(unit, count);
        let expected = match (unit, count) {
            (IntervalUnit::Week, 2) => BillingInterval::EveryTwoWeeks,
            (IntervalUnit::Month, 1) => BillingInterval::Monthly,
            (IntervalUnit::Month, 3) => BillingInterval::EveryThreeMonths,
            _ => BillingInterval::Monthly,
        };
        prop_assert_eq!(mapped, expected);
    }

    /// For any item set: total = sum(item totals) + shipping − discount,
    /// provided the discount doesn't exceed the rest.
    #[test]
    fn order_total_invariant(
        entries in arb_items(),
        shipping in 0i64..5_000,
        discount in 0i64..100_000,
    ) {
        let item_sum: i64 = entries.iter().map(|&(q, u)| u * i64::from(q)).sum();
        let order = make_order(make_items(&entries), shipping, discount);

        if discount > item_sum + shipping {
            prop_assert!(order.is_err(), "discount beyond total must be rejected");
        } else {
            let order = order.unwrap();
            prop_assert_eq!(order.subtotal().cents(), item_sum);
            prop_assert_eq!(order.total().cents(), item_sum + shipping - discount);
        }
    }

    /// as_str → try_from is the identity for every closed status enum.
    #[test]
    fn order_status_roundtrip(status in prop_oneof![
        Just(OrderStatus::Processing),
        Just(OrderStatus::Shipped),
        Just(OrderStatus::Delivered),
        Just(OrderStatus::Cancelled),
    ]) {
        prop_assert_eq!(OrderStatus::try_from(status.as_str()).unwrap(), status);
    }

    #[test]
    fn subscription_status_roundtrip(status in prop_oneof![
        Just(SubscriptionStatus::Active),
        Just(SubscriptionStatus::PastDue),
        Just(SubscriptionStatus::Cancelled),
        Just(SubscriptionStatus::Paused),
    ]) {
        prop_assert_eq!(SubscriptionStatus::try_from(status.as_str()).unwrap(), status);
    }

    #[test]
    fn billing_interval_roundtrip(interval in prop_oneof![
        Just(BillingInterval::Monthly),
        Just(BillingInterval::EveryTwoWeeks),
        Just(BillingInterval::EveryThreeMonths),
    ]) {
        prop_assert_eq!(BillingInterval::try_from(interval.as_str()).unwrap(), interval);
    }
}

// ── Fixed-point checks from the receipt contract ───────────────────────────

#[test]
fn known_conversions() {
    assert_eq!(MoneyAmount::new(1999).unwrap().to_decimal_string(), "19.99");
    assert_eq!(MoneyAmount::new(5).unwrap().to_decimal_string(), "0.05");
    assert_eq!(MoneyAmount::new(0).unwrap().to_decimal_string(), "0.00");
    assert_eq!(MoneyAmount::new(2100).unwrap().to_decimal_string(), "21.00");
}

#[test]
fn known_interval_mappings() {
    assert_eq!(
        BillingInterval::from_provider(IntervalUnit::Week, 2),
        BillingInterval::EveryTwoWeeks
    );
    assert_eq!(
        BillingInterval::from_provider(IntervalUnit::Month, 1),
        BillingInterval::Monthly
    );
    assert_eq!(
        BillingInterval::from_provider(IntervalUnit::Month, 3),
        BillingInterval::EveryThreeMonths
    );
    assert_eq!(
        BillingInterval::from_provider(IntervalUnit::Week, 1),
        BillingInterval::Monthly
    );
    assert_eq!(
        BillingInterval::from_provider(IntervalUnit::Year, 1),
        BillingInterval::Monthly
    );
}
