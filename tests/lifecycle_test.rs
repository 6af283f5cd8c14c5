mod common;

use paystate::domain::description::PaymentDescription;
use paystate::domain::payment::{Payment, PaymentStatus};
use paystate::error::PaymentError;
use paystate::infrastructure::stub::{GatewayCall, StubGatewayClient};

#[tokio::test]
async fn test_charge_flow() {
    let order_id = common::random_order_id();
    let stub = StubGatewayClient::new("session-42");
    let registry = common::stub_registry(&stub);

    let payment = common::new_payment("default", &order_id);
    let prepared = payment.prepare(&registry, None).await.unwrap();
    assert_eq!(prepared.session_id().as_str(), "session-42");
    assert_eq!(prepared.details(), payment.details());

    let blocked = prepared.block().unwrap();
    let charged = blocked.charge(&registry).await.unwrap();
    assert_eq!(charged.details().order_id().as_str(), order_id);

    assert_eq!(
        stub.calls().await,
        vec![
            GatewayCall::Init {
                order_id: order_id.clone(),
                amount: 12345,
                client_ip: common::client_ip(),
                description: None,
            },
            GatewayCall::Charge {
                order_id: order_id.clone(),
                session_id: "session-42".into(),
            },
        ]
    );
}

#[tokio::test]
async fn test_unblock_flow() {
    let order_id = common::random_order_id();
    let stub = StubGatewayClient::new("session-42");
    let registry = common::stub_registry(&stub);

    let cancelled = common::new_payment("default", &order_id)
        .prepare(&registry, None)
        .await
        .unwrap()
        .block()
        .unwrap()
        .unblock(&registry)
        .await
        .unwrap();

    assert_eq!(cancelled.session_id().as_str(), "session-42");
    assert_eq!(
        stub.calls().await.last(),
        Some(&GatewayCall::Unblock {
            order_id,
            amount: 12345,
        })
    );
}

#[tokio::test]
async fn test_refund_flow_through_stored_payment() {
    let order_id = common::random_order_id();
    let stub = StubGatewayClient::new("session-42");
    let registry = common::stub_registry(&stub);
    let description = PaymentDescription::new("Order payment", 1231);

    let mut payment = Payment::from(common::new_payment("default", &order_id));
    payment = payment.prepare(&registry, Some(&description)).await.unwrap();
    assert_eq!(payment.status(), PaymentStatus::Prepared);

    // Survives a round trip through storage between requests
    let stored = serde_json::to_string(&payment).unwrap();
    payment = serde_json::from_str(&stored).unwrap();

    payment = payment.block().unwrap();
    assert_eq!(payment.status(), PaymentStatus::Blocked);
    payment = payment.charge(&registry).await.unwrap();
    assert_eq!(payment.status(), PaymentStatus::Charged);
    payment = payment.refund(&registry).await.unwrap();
    assert_eq!(payment.status(), PaymentStatus::Refunded);

    assert_eq!(payment.details().order_id().as_str(), order_id);
    assert_eq!(payment.session_id().map(|s| s.as_str()), Some("session-42"));
    assert_eq!(stub.calls().await.len(), 3);
}

#[tokio::test]
async fn test_refund_requires_charge() {
    let stub = StubGatewayClient::new("session-42");
    let registry = common::stub_registry(&stub);

    let blocked = Payment::from(common::new_payment("default", "order-1"))
        .prepare(&registry, None)
        .await
        .unwrap()
        .block()
        .unwrap();

    let cancelled = blocked.unblock(&registry).await.unwrap();
    assert!(matches!(
        cancelled.refund(&registry).await,
        Err(PaymentError::InvalidState(_))
    ));
    assert!(matches!(
        cancelled.charge(&registry).await,
        Err(PaymentError::InvalidState(_))
    ));
}

#[tokio::test]
async fn test_unblock_declined_leaves_payment_blocked() {
    let stub = StubGatewayClient::new("session-42").with_unblock_result(false);
    let registry = common::stub_registry(&stub);

    let blocked = Payment::from(common::new_payment("default", "order-1"))
        .prepare(&registry, None)
        .await
        .unwrap()
        .block()
        .unwrap();

    assert!(matches!(
        blocked.unblock(&registry).await,
        Err(PaymentError::GatewayError(_))
    ));
    assert_eq!(blocked.status(), PaymentStatus::Blocked);
}

#[tokio::test]
async fn test_payment_routed_to_missing_gateway() {
    let stub = StubGatewayClient::new("session-42");
    let registry = common::stub_registry(&stub);

    let result = common::new_payment("real", "order-1")
        .prepare(&registry, None)
        .await;

    assert!(matches!(result, Err(PaymentError::ConfigurationMissing(_))));
    assert!(stub.calls().await.is_empty());
}
