//! Tests for the resilient pane writer

use super::*;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// Destination that records appended text and can be told to fail.
struct ScriptedPane {
    captured: Arc<Mutex<String>>,
    fail_next: Arc<AtomicBool>,
}

impl OutputPane for ScriptedPane {
    fn append(&mut self, text: &str) -> io::Result<()> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "pane went away"));
        }
        self.captured.lock().unwrap().push_str(text);
        Ok(())
    }
}

/// Resolver that counts invocations and can be made unavailable.
#[derive(Default)]
struct ScriptedResolver {
    resolves: AtomicUsize,
    unavailable: AtomicBool,
    captured: Arc<Mutex<String>>,
    fail_next_write: Arc<AtomicBool>,
}

impl ScriptedResolver {
    fn resolve_count(&self) -> usize {
        self.resolves.load(Ordering::SeqCst)
    }
}

impl PaneResolver for ScriptedResolver {
    fn resolve(&self, _name: &str) -> Option<Box<dyn OutputPane>> {
        self.resolves.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return None;
        }
        Some(Box::new(ScriptedPane {
            captured: Arc::clone(&self.captured),
            fail_next: Arc::clone(&self.fail_next_write),
        }))
    }
}

#[test]
fn test_resolves_lazily_and_reuses_the_cached_destination() {
    let resolver = Arc::new(ScriptedResolver::default());
    let mut writer = ResilientPaneWriter::new(Arc::clone(&resolver) as Arc<dyn PaneResolver>, "");

    assert_eq!(resolver.resolve_count(), 0);
    assert!(writer.write("one "));
    assert!(writer.write("two"));
    assert_eq!(resolver.resolve_count(), 1);
    assert_eq!(*resolver.captured.lock().unwrap(), "one two");
}

#[test]
fn test_failed_write_invalidates_and_reresolves() {
    let resolver = Arc::new(ScriptedResolver::default());
    let mut writer = ResilientPaneWriter::new(Arc::clone(&resolver) as Arc<dyn PaneResolver>, "");

    assert!(writer.write("ok "));
    resolver.fail_next_write.store(true, Ordering::SeqCst);
    assert!(!writer.write("lost"));
    assert_eq!(resolver.resolve_count(), 1);

    // The next write resolves the destination again from scratch.
    assert!(writer.write("after"));
    assert_eq!(resolver.resolve_count(), 2);
    assert_eq!(*resolver.captured.lock().unwrap(), "ok after");
}

#[test]
fn test_resolve_failure_reports_false_without_caching() {
    let resolver = Arc::new(ScriptedResolver::default());
    resolver.unavailable.store(true, Ordering::SeqCst);
    let mut writer = ResilientPaneWriter::new(Arc::clone(&resolver) as Arc<dyn PaneResolver>, "");

    assert!(!writer.write("nowhere to go"));
    assert!(!writer.write("still nowhere"));
    assert_eq!(resolver.resolve_count(), 2);

    // Once the destination turns up the writer recovers on its own.
    resolver.unavailable.store(false, Ordering::SeqCst);
    assert!(writer.write("arrived"));
    assert_eq!(*resolver.captured.lock().unwrap(), "arrived");
}

#[test]
fn test_metrics_count_writes_and_failures() {
    let resolver = Arc::new(ScriptedResolver::default());
    let mut writer = ResilientPaneWriter::new(Arc::clone(&resolver) as Arc<dyn PaneResolver>, "build");
    assert_eq!(writer.name(), "build");

    writer.write("abc");
    resolver.fail_next_write.store(true, Ordering::SeqCst);
    writer.write("xyz");

    let snapshot = writer.metrics().snapshot();
    assert_eq!(snapshot.writes_ok, 1);
    assert_eq!(snapshot.bytes_written, 3);
    assert_eq!(snapshot.writes_failed, 1);
    assert_eq!(snapshot.resolve_attempts, 1);
    assert_eq!(snapshot.resolve_failures, 0);
}
