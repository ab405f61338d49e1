use super::*;

fn key(name: &str) -> ObjectKey {
    ObjectKey::table("sales", name)
}

#[test]
fn fresh_log_has_nothing_removed() {
    let log = DeltaLog::new();
    assert!(!log.was_removed_after(&key("orders"), CatalogVersion(0)));
}

#[test]
fn was_removed_after_is_strict() {
    let mut log = DeltaLog::new();
    log.record_drop(key("orders"), ObjectKind::Table, CatalogVersion(12));
    assert!(log.was_removed_after(&key("orders"), CatalogVersion(11)));
    assert!(!log.was_removed_after(&key("orders"), CatalogVersion(12)));
    assert!(!log.was_removed_after(&key("orders"), CatalogVersion(13)));
}

#[test]
fn later_drop_replaces_earlier_entry() {
    let mut log = DeltaLog::new();
    log.record_drop(key("orders"), ObjectKind::Table, CatalogVersion(5));
    log.record_drop(key("orders"), ObjectKind::Table, CatalogVersion(12));
    assert!(log.was_removed_after(&key("orders"), CatalogVersion(11)));
}

#[test]
fn earlier_drop_does_not_override_later_entry() {
    let mut log = DeltaLog::new();
    log.record_drop(key("orders"), ObjectKind::Table, CatalogVersion(12));
    log.record_drop(key("orders"), ObjectKind::Table, CatalogVersion(5));
    assert!(log.was_removed_after(&key("orders"), CatalogVersion(11)));
}

#[test]
fn garbage_collect_removes_entries_at_or_below_watermark() {
    let mut log = DeltaLog::new();
    log.record_drop(key("orders"), ObjectKind::Table, CatalogVersion(12));
    log.record_drop(key("returns"), ObjectKind::Table, CatalogVersion(20));

    log.garbage_collect(CatalogVersion(15));

    assert_eq!(log.len(), 1);
    assert!(!log.was_removed_after(&key("orders"), CatalogVersion(0)));
    assert!(log.was_removed_after(&key("returns"), CatalogVersion(0)));
}

#[test]
fn garbage_collect_below_every_entry_is_a_no_op() {
    let mut log = DeltaLog::new();
    log.record_drop(key("orders"), ObjectKind::Table, CatalogVersion(12));

    log.garbage_collect(CatalogVersion(0));

    assert_eq!(log.len(), 1);
}

#[test]
fn clear_empties_the_log() {
    let mut log = DeltaLog::new();
    log.record_drop(key("orders"), ObjectKind::Table, CatalogVersion(12));
    log.clear();
    assert!(log.is_empty());
}
