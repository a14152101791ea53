//! Tests for the workspace: ingestion, routing, eviction, diagnostics.

use super::*;
use crate::facts::ImplementationFact;
use crate::model::{InjectionSiteKind, SourceLocation};
use std::path::PathBuf;

const PAYMENT: &str = "com.example.PaymentService";

fn bean(name: &str, ty: &str, file: &str) -> BeanDefinition {
    BeanDefinition::new(name, ty, BeanKind::Component, SourceLocation::new(file, 3, 1))
}

fn implements(interface: &str, bean: &str) -> ImplementationFact {
    ImplementationFact {
        interface: interface.to_string(),
        bean: bean.to_string(),
        detection: DetectionMethod::ImplementsClause,
    }
}

fn field(ty: &str) -> BeanInjectionPoint {
    BeanInjectionPoint::new(ty, SourceLocation::new("Checkout.java", 12, 5), InjectionSiteKind::Field)
}

fn payment_batches(stripe_primary: bool) -> Vec<FactBatch> {
    let mut iface = FactBatch::new("PaymentService.java");
    iface.interfaces.push(InterfaceDefinition::from_fqn(
        PAYMENT,
        SourceLocation::new("PaymentService.java", 1, 1),
        false,
    ));

    let mut stripe = FactBatch::new("Stripe.java");
    let mut stripe_bean = bean("stripePaymentService", "com.example.StripePaymentService", "Stripe.java");
    stripe_bean.is_primary = stripe_primary;
    stripe.beans.push(stripe_bean);
    stripe.implementations.push(implements(PAYMENT, "stripePaymentService"));

    let mut paypal = FactBatch::new("Paypal.java");
    paypal
        .beans
        .push(bean("paypalPaymentService", "com.example.PaypalPaymentService", "Paypal.java"));
    paypal.implementations.push(implements(PAYMENT, "paypalPaymentService"));

    vec![iface, stripe, paypal]
}

fn workspace(stripe_primary: bool) -> BeanWorkspace {
    let mut ws = BeanWorkspace::new();
    ws.ingest_all(payment_batches(stripe_primary));
    ws
}

fn outcome(nav: &Navigation<'_>) -> (&'static str, Vec<String>) {
    match nav {
        Navigation::Interface { result, .. } => {
            (result.kind(), result.beans().iter().map(|b| b.name.clone()).collect())
        }
        Navigation::Concrete { candidates } => {
            ("concrete", candidates.iter().map(|c| c.bean.name.clone()).collect())
        }
    }
}

#[test]
fn test_interface_injection_resolves_primary() {
    let ws = workspace(true);
    let nav = ws.navigate(&field("PaymentService"));
    assert_eq!(outcome(&nav), ("primary", vec!["stripePaymentService".to_string()]));
    match nav {
        Navigation::Interface { interface, .. } => assert_eq!(interface, PAYMENT),
        other => panic!("expected interface route, got {:?}", other),
    }
}

#[test]
fn test_qualifier_hint_selects_bean() {
    let ws = workspace(true);
    let nav = ws.navigate(&field(PAYMENT).with_qualifier("paypalPaymentService"));
    assert_eq!(outcome(&nav), ("qualified", vec!["paypalPaymentService".to_string()]));
}

#[test]
fn test_explicit_bean_name_used_as_hint() {
    let ws = workspace(false);
    let nav = ws.navigate(&field(PAYMENT).with_bean_name("paypalPaymentService"));
    assert_eq!(outcome(&nav), ("qualified", vec!["paypalPaymentService".to_string()]));
}

#[test]
fn test_ambiguous_interface_keeps_registration_order() {
    let ws = workspace(false);
    let nav = ws.navigate(&field(PAYMENT));
    assert_eq!(
        outcome(&nav),
        (
            "multiple",
            vec!["stripePaymentService".to_string(), "paypalPaymentService".to_string()]
        )
    );
    assert_eq!(nav.status(), InjectionStatus::Ambiguous);
}

#[test]
fn test_interface_without_implementations_is_none() {
    let mut ws = BeanWorkspace::new();
    let mut batch = FactBatch::new("Unused.java");
    batch.interfaces.push(InterfaceDefinition::from_fqn(
        "com.example.Unused",
        SourceLocation::new("Unused.java", 1, 1),
        false,
    ));
    ws.ingest(batch);

    let nav = ws.navigate(&field("Unused"));
    assert_eq!(outcome(&nav), ("none", vec![]));
    assert_eq!(nav.status(), InjectionStatus::Unresolved);
}

#[test]
fn test_concrete_type_routes_to_bean_index() {
    let ws = workspace(false);
    let nav = ws.navigate(&field("com.example.StripePaymentService"));
    assert_eq!(outcome(&nav), ("concrete", vec!["stripePaymentService".to_string()]));
    assert_eq!(nav.status(), InjectionStatus::Resolved);
}

#[test]
fn test_ingest_backfills_implemented_interfaces() {
    let ws = workspace(false);
    let stripe = ws.beans().bean("stripePaymentService").unwrap();
    assert_eq!(stripe.implemented_interfaces, vec![PAYMENT.to_string()]);
    assert_eq!(ws.interfaces_for("stripePaymentService"), &[PAYMENT.to_string()]);
    assert!(ws.validate().is_empty());
}

#[test]
fn test_declared_interfaces_register_edges() {
    let mut ws = BeanWorkspace::new();
    let mut batch = FactBatch::new("Config.java");
    let mut clock = bean("clock", "com.example.SystemClock", "Config.java").implementing("com.example.Clock");
    clock.kind = BeanKind::FactoryMethod;
    batch.beans.push(clock);
    ws.ingest(batch);

    assert_eq!(ws.implementations("com.example.Clock").len(), 1);
    let rel = &ws.interfaces().relationships()[0];
    assert_eq!(rel.detection_method, DetectionMethod::FactoryMethodReturnType);
    // no duplicate backfill
    assert_eq!(ws.beans().bean("clock").unwrap().implemented_interfaces.len(), 1);
}

fn legacy_factory_batch(primary: bool) -> FactBatch {
    let mut batch = FactBatch::new("LegacyConfig.java");
    let mut legacy = bean("legacyPayment", PAYMENT, "LegacyConfig.java");
    legacy.kind = BeanKind::FactoryMethod;
    legacy.is_primary = primary;
    batch.beans.push(legacy);
    batch
}

#[test]
fn test_factory_bean_of_interface_type_is_candidate() {
    let mut ws = workspace(false);
    ws.ingest(legacy_factory_batch(false));

    let nav = ws.navigate(&field("PaymentService"));
    assert_eq!(
        outcome(&nav),
        (
            "multiple",
            vec![
                "stripePaymentService".to_string(),
                "paypalPaymentService".to_string(),
                "legacyPayment".to_string()
            ]
        )
    );
}

#[test]
fn test_primary_factory_bean_of_interface_type_wins() {
    let mut ws = workspace(false);
    ws.ingest(legacy_factory_batch(true));

    let nav = ws.navigate(&field(PAYMENT));
    assert_eq!(outcome(&nav), ("primary", vec!["legacyPayment".to_string()]));
}

#[test]
fn test_factory_bean_makes_lone_implementer_ambiguous() {
    let mut ws = workspace(false);
    ws.remove_file(&PathBuf::from("Paypal.java"));
    ws.ingest(legacy_factory_batch(false));

    let nav = ws.navigate(&field(PAYMENT));
    assert_eq!(nav.status(), InjectionStatus::Ambiguous);
    let names: Vec<&str> = nav.targets().iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, vec!["stripePaymentService", "legacyPayment"]);
}

#[test]
fn test_implementation_for_unknown_bean_ignored() {
    let mut ws = BeanWorkspace::new();
    let mut batch = FactBatch::new("Ghost.java");
    batch.implementations.push(implements(PAYMENT, "ghost"));
    ws.ingest(batch);

    assert!(ws.implementations(PAYMENT).is_empty());
    assert!(ws.interfaces().is_empty());
}

#[test]
fn test_reingest_replaces_file_facts() {
    let mut ws = workspace(false);

    let mut paypal = FactBatch::new("Paypal.java");
    paypal
        .beans
        .push(bean("braintreePaymentService", "com.example.BraintreePaymentService", "Paypal.java"));
    paypal.implementations.push(implements(PAYMENT, "braintreePaymentService"));
    ws.ingest(paypal);

    assert!(ws.beans().bean("paypalPaymentService").is_none());
    assert!(ws.interfaces_for("paypalPaymentService").is_empty());
    let names: Vec<&str> = ws.implementations(PAYMENT).iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, vec!["stripePaymentService", "braintreePaymentService"]);
    assert!(ws.validate().is_empty());
}

#[test]
fn test_remove_file_evicts_edges() {
    let mut ws = workspace(true);
    ws.remove_file(&PathBuf::from("Stripe.java"));

    let nav = ws.navigate(&field(PAYMENT));
    assert_eq!(outcome(&nav), ("single", vec!["paypalPaymentService".to_string()]));
    assert!(ws.validate().is_empty());

    // idempotent
    ws.remove_file(&PathBuf::from("Stripe.java"));
    assert_eq!(ws.stats().beans.beans, 1);
}

#[test]
fn test_remove_interface_file_keeps_implementers() {
    let mut ws = workspace(false);
    ws.remove_file(&PathBuf::from("PaymentService.java"));

    assert!(ws.interfaces().get_interface(PAYMENT).is_none());
    assert_eq!(ws.implementations(PAYMENT).len(), 2);
    assert!(matches!(ws.navigate(&field(PAYMENT)), Navigation::Interface { .. }));
}

#[test]
fn test_remove_interface_strips_backfill() {
    let mut ws = workspace(false);
    ws.remove_interface(PAYMENT);

    assert!(ws.implementations(PAYMENT).is_empty());
    assert!(ws.beans().bean("stripePaymentService").unwrap().implemented_interfaces.is_empty());
    assert!(matches!(ws.navigate(&field(PAYMENT)), Navigation::Concrete { .. }));
}

#[test]
fn test_usages_of() {
    let mut ws = workspace(true);
    let mut checkout = FactBatch::new("Checkout.java");
    checkout.injection_points.push(field("PaymentService"));
    checkout
        .injection_points
        .push(field("PaymentService").with_qualifier("paypalPaymentService"));
    ws.ingest(checkout);

    assert_eq!(ws.usages_of("stripePaymentService").len(), 1);
    let paypal = ws.usages_of("paypalPaymentService");
    assert_eq!(paypal.len(), 1);
    assert_eq!(paypal[0].qualifier_hint.as_deref(), Some("paypalPaymentService"));
    assert!(ws.usages_of("nobody").is_empty());
}

#[test]
fn test_diagnose_classifies_points() {
    let mut ws = workspace(false);
    let mut checkout = FactBatch::new("Checkout.java");
    checkout.injection_points.push(field(PAYMENT));
    checkout.injection_points.push(field(PAYMENT).with_qualifier("stripePaymentService"));
    checkout.injection_points.push(field("com.example.Missing"));
    ws.ingest(checkout);

    let statuses: Vec<InjectionStatus> = ws.diagnose().iter().map(|d| d.status).collect();
    assert_eq!(
        statuses,
        vec![InjectionStatus::Ambiguous, InjectionStatus::Resolved, InjectionStatus::Unresolved]
    );
    assert_eq!(ws.diagnose()[1].beans, vec!["stripePaymentService"]);
}

#[test]
fn test_snapshot_restore_clears_registry() {
    let ws = workspace(false);
    let snapshot = ws.snapshot();

    let mut restored = BeanWorkspace::new();
    restored.restore(snapshot);
    assert!(restored.interfaces().is_empty());
    assert_eq!(restored.stats().beans.beans, 2);

    // backfilled interfaces survive, so concrete lookup still finds implementers
    let nav = restored.navigate(&field(PAYMENT));
    assert_eq!(
        outcome(&nav),
        (
            "concrete",
            vec!["stripePaymentService".to_string(), "paypalPaymentService".to_string()]
        )
    );
}

#[test]
fn test_ingest_all_compacts_churned_index() {
    let mut ws = workspace(false);
    for _ in 0..5 {
        ws.ingest_all(payment_batches(false));
    }
    let stats = ws.stats();
    assert!(stats.beans.tombstones <= stats.beans.beans, "tombstones never outgrow live entries");
    assert_eq!(ws.implementations(PAYMENT).len(), 2);
    assert!(ws.validate().is_empty());
}

#[test]
fn test_clear() {
    let mut ws = workspace(true);
    ws.clear();
    assert_eq!(ws.stats(), WorkspaceStats::default());
    assert!(ws.all_interfaces().is_empty());
}
