use super::*;

#[test]
fn database_key_is_lowercased() {
    assert_eq!(ObjectKey::database("Sales"), ObjectKey::database("sales"));
}

#[test]
fn table_key_is_lowercased_in_both_components() {
    assert_eq!(ObjectKey::table("Sales", "Orders"), ObjectKey::table("sales", "orders"));
}

#[test]
fn db_name_extracts_owning_database() {
    assert_eq!(ObjectKey::table("sales", "orders").db_name(), "sales");
    assert_eq!(ObjectKey::function("sales", "f(int)").db_name(), "sales");
    assert_eq!(ObjectKey::database("sales").db_name(), "sales");
}

#[test]
fn display_matches_dotted_name() {
    assert_eq!(ObjectKey::table("sales", "orders").to_string(), "sales.orders");
    assert_eq!(ObjectKey::database("sales").to_string(), "sales");
}
