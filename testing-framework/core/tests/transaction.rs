use chain_harness_core::nodes::{
    Action, Authorization, SignedTransaction, SubmitOptions, Transaction,
};
use chrono::{TimeZone as _, Utc};
use serde_json::json;

#[test]
fn active_authorization_uses_the_active_permission() {
    let auth = Authorization::active("system");

    assert_eq!(auth.actor, "system");
    assert_eq!(auth.permission, "active");
}

#[test]
fn signed_envelope_serializes_transaction_and_signatures() {
    let transaction = Transaction {
        expiration: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 30).unwrap(),
        ref_block_num: 1234,
        actions: vec![Action::new(
            "token",
            "transfer",
            vec![Authorization::active("system")],
            json!({ "from": "system", "to": "a11.test", "quantity": "1.0000 TEST", "memo": "" }),
        )],
    };
    let signed = SignedTransaction {
        transaction,
        signatures: vec!["SIG_TST_deadbeef".to_owned()],
    };

    let value = serde_json::to_value(&signed).expect("envelope serializes");
    assert_eq!(value["transaction"]["ref_block_num"], 1234);
    assert_eq!(value["transaction"]["actions"][0]["name"], "transfer");
    assert_eq!(
        value["transaction"]["actions"][0]["authorization"][0]["actor"],
        "system"
    );
    assert_eq!(value["signatures"][0], "SIG_TST_deadbeef");
}

#[test]
fn submit_options_default_to_a_thirty_second_expiry() {
    assert_eq!(SubmitOptions::default().expire_secs, 30);
}
