use super::*;

#[test]
fn empty_policy_grants_nothing() {
    let policy = Policy::empty();
    assert!(policy.privileges_of("alice", &Scope::Server).is_empty());
}

#[test]
fn privileges_of_looks_up_the_exact_principal_and_scope() {
    let policy = Policy {
        grants: vec![PolicyGrant {
            principal: "alice".to_string(),
            scope: Scope::Database("sales".to_string()),
            privileges: vec![Privilege::Select, Privilege::Insert],
        }],
    };

    assert_eq!(policy.privileges_of("alice", &Scope::Database("sales".to_string())), vec![
        Privilege::Select,
        Privilege::Insert
    ]);
    assert!(policy.privileges_of("bob", &Scope::Database("sales".to_string())).is_empty());
    assert!(policy.privileges_of("alice", &Scope::Database("marketing".to_string())).is_empty());
}

#[test]
fn policy_round_trips_through_json() {
    let policy = Policy {
        grants: vec![PolicyGrant {
            principal: "alice".to_string(),
            scope: Scope::Table { db: "sales".to_string(), table: "orders".to_string() },
            privileges: vec![Privilege::All],
        }],
    };

    let json = serde_json::to_string(&policy).unwrap();
    let parsed: Policy = serde_json::from_str(&json).unwrap();
    assert_eq!(policy, parsed);
}
