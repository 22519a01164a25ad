//! Tests for audit sink

use prometheus_curriculum::core::{AuditAction, AuditEvent, AuditSink, InMemoryAuditSink};

#[test]
fn test_in_memory_audit_sink() {
    let sink = InMemoryAuditSink::new(10);

    sink.record(AuditEvent::now(1, 0, AuditAction::Enqueue));
    sink.record(AuditEvent::now(1, 0, AuditAction::Dispatch));
    assert_eq!(sink.events().len(), 2);

    let events = sink.events();
    assert_eq!(events[0].call_id, 1);
    assert_eq!(events[0].action, AuditAction::Enqueue);
    assert_eq!(events[1].action, AuditAction::Dispatch);
}

#[test]
fn test_audit_sink_overflow() {
    let sink = InMemoryAuditSink::new(2);

    sink.record(AuditEvent::now(1, 0, AuditAction::Enqueue));
    sink.record(AuditEvent::now(2, 0, AuditAction::Enqueue));
    sink.record(AuditEvent::now(3, 0, AuditAction::Enqueue));

    let events = sink.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].call_id, 2); // First one popped
    assert_eq!(events[1].call_id, 3);
}

#[test]
fn test_clones_share_buffer() {
    let sink = InMemoryAuditSink::new(8);
    let handle = sink.clone();

    handle.record(AuditEvent::now(4, 1, AuditAction::Dispatch));
    handle.record(AuditEvent::now(5, 0, AuditAction::Dispatch));

    assert_eq!(sink.dispatch_order(), vec![4, 5]);
    assert_eq!(sink.with_action(AuditAction::Dispatch)[0].retry_count, 1);
}
