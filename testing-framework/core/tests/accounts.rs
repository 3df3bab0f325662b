use chain_harness_config::constants::{
    DEFAULT_FUNDING_AMOUNT, DEFAULT_STORAGE_BYTES, FUNDING_MEMO, SHARED_TEST_PUBKEY,
    SYSTEM_ACCOUNT, TOKEN_ACCOUNT,
};
use chain_harness_core::session::accounts::{account_name, batch_names, creation_actions};

#[test]
fn default_batch_names_are_deterministic() {
    let expected = [
        "a11.test", "a12.test", "a13.test", "a14.test", "a15.test", "a21.test", "a22.test",
        "a23.test", "a24.test", "a25.test",
    ];

    let names = batch_names(10);
    assert_eq!(names, expected);

    // Same batch size, same names, every run.
    assert_eq!(batch_names(10), names);
}

#[test]
fn batch_names_are_distinct() {
    let names = batch_names(10);
    let mut deduped = names.clone();
    deduped.sort();
    deduped.dedup();
    assert_eq!(deduped.len(), names.len());
}

#[test]
fn name_scheme_rolls_over_groups_of_five() {
    assert_eq!(account_name(0), "a11.test");
    assert_eq!(account_name(4), "a15.test");
    assert_eq!(account_name(5), "a21.test");
    assert_eq!(account_name(9), "a25.test");
}

#[test]
fn creation_bundles_exactly_four_actions_in_order() {
    let actions = creation_actions("a11.test", SHARED_TEST_PUBKEY, DEFAULT_FUNDING_AMOUNT);

    let order = actions
        .iter()
        .map(|action| (action.account.as_str(), action.name.as_str()))
        .collect::<Vec<_>>();
    assert_eq!(
        order,
        [
            (SYSTEM_ACCOUNT, "newaccount"),
            (SYSTEM_ACCOUNT, "buybytes"),
            (SYSTEM_ACCOUNT, "delegate"),
            (TOKEN_ACCOUNT, "transfer"),
        ]
    );
}

#[test]
fn creation_actions_authorize_as_the_funding_identity() {
    let actions = creation_actions("a11.test", SHARED_TEST_PUBKEY, DEFAULT_FUNDING_AMOUNT);

    for action in &actions {
        assert_eq!(action.authorization.len(), 1);
        assert_eq!(action.authorization[0].actor, SYSTEM_ACCOUNT);
        assert_eq!(action.authorization[0].permission, "active");
    }
}

#[test]
fn creation_payloads_carry_the_expected_fields() {
    let actions = creation_actions("a21.test", SHARED_TEST_PUBKEY, "100.0000 TEST");

    let newaccount = &actions[0].data;
    assert_eq!(newaccount["name"], "a21.test");
    assert_eq!(newaccount["owner"]["threshold"], 1);
    assert_eq!(newaccount["owner"]["keys"][0]["key"], SHARED_TEST_PUBKEY);
    assert_eq!(newaccount["owner"], newaccount["active"]);

    let buybytes = &actions[1].data;
    assert_eq!(buybytes["receiver"], "a21.test");
    assert_eq!(buybytes["bytes"], DEFAULT_STORAGE_BYTES);

    let delegate = &actions[2].data;
    assert_eq!(delegate["receiver"], "a21.test");
    assert_eq!(delegate["transfer"], true);

    let transfer = &actions[3].data;
    assert_eq!(transfer["from"], SYSTEM_ACCOUNT);
    assert_eq!(transfer["to"], "a21.test");
    assert_eq!(transfer["quantity"], "100.0000 TEST");
    assert_eq!(transfer["memo"], FUNDING_MEMO);
}
