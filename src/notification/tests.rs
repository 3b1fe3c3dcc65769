use super::*;

#[test]
fn convenience_methods_set_kind_and_ttl() {
    let mut manager = NotificationManager::new();
    manager.info("opened");
    manager.warn("server slow");
    manager.error("write failed");
    manager.success("Wrote 2 buffer(s)");

    let seen: Vec<_> = manager
        .iter_active()
        .map(|n| (n.kind, n.ttl.map(|t| t.as_secs())))
        .collect();
    assert_eq!(
        seen,
        vec![
            (NotificationType::Info, Some(5)),
            (NotificationType::Warning, Some(8)),
            (NotificationType::Error, Some(10)),
            (NotificationType::Success, Some(3)),
        ]
    );
}

#[test]
fn ids_increase_and_generation_tracks_changes() {
    let mut manager = NotificationManager::new();
    let first = manager.info("a");
    let second = manager.info("b");
    assert!(second > first);
    assert_eq!(manager.generation, 2);

    manager.remove(first);
    assert_eq!(manager.generation, 3);

    // Unknown id leaves everything untouched
    manager.remove(999);
    assert_eq!(manager.generation, 3);
    assert_eq!(manager.iter_active().count(), 1);
}

#[test]
fn since_returns_only_newer_notifications() {
    let mut manager = NotificationManager::new();
    manager.info("old");
    let mark = manager.next_id();
    manager.warn("new one");
    manager.error("new two");

    let messages: Vec<_> = manager.since(mark).map(|n| n.message.as_str()).collect();
    assert_eq!(messages, vec!["new one", "new two"]);
}

#[test]
fn display_prefixes_kind() {
    let n = Notification::new(0, NotificationType::Warning, "careful", None);
    assert_eq!(n.to_string(), "[WARN] careful");
}

#[test]
fn zero_ttl_expires() {
    let mut manager = NotificationManager::new();
    manager.add(NotificationType::Info, "flash", Some(Duration::ZERO));
    manager.add(NotificationType::Info, "sticky", None);
    std::thread::sleep(Duration::from_millis(5));

    manager.prune_expired();
    let left: Vec<_> = manager.iter_active().map(|n| n.message.as_str()).collect();
    assert_eq!(left, vec!["sticky"]);
}

#[test]
fn clear_all_empties() {
    let mut manager = NotificationManager::new();
    manager.info("x");
    manager.clear_all();
    assert!(manager.is_empty());
    assert!(manager.last().is_none());
}
