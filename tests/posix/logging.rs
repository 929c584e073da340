use std::ffi::c_void;
use std::process::Command;
use std::sync::Mutex;
use std::thread::{self, ThreadId};

use platutils::*;

// Records are shared process state; these tests take turns.
static SINK_TURN: Mutex<()> = Mutex::new(());
static CAPTURED: Mutex<Vec<Captured>> = Mutex::new(Vec::new());

#[derive(Debug, Clone)]
struct Captured {
    level: PlatformLogLevel,
    target: String,
    message: String,
    file: String,
    line: u32,
    thread: ThreadId,
}

fn view_text(view: PlatformStringView) -> String {
    if view.ptr.is_null() {
        return String::new();
    }
    let bytes = unsafe { std::slice::from_raw_parts(view.ptr as *const u8, view.len) };
    String::from_utf8_lossy(bytes).into_owned()
}

extern "C" fn capture(record: *const PlatformLogRecord, _user_data: *mut c_void) {
    let Some(rec) = (unsafe { record.as_ref() }) else {
        return;
    };
    let target = view_text(rec.target);
    if !target.starts_with("platutils") {
        return;
    }
    CAPTURED.lock().unwrap().push(Captured {
        level: rec.level,
        target,
        message: view_text(rec.message),
        file: view_text(rec.file),
        line: rec.line,
        thread: thread::current().id(),
    });
}

/// Records emitted on the calling thread; other tests in this binary log concurrently.
fn captured_for(target: &str) -> Vec<Captured> {
    let me = thread::current().id();
    CAPTURED
        .lock()
        .unwrap()
        .iter()
        .filter(|c| c.target == target && c.thread == me)
        .cloned()
        .collect()
}

#[test]
fn shallow_weave_reports_through_callback() {
    let _turn = SINK_TURN.lock().unwrap();
    CAPTURED.lock().unwrap().clear();
    assert_eq!(
        platform_log_set_callback(Some(capture), std::ptr::null_mut(), PlatformLogLevel::Debug),
        PlatformStatus::Ok
    );

    assert_eq!(weave_paths(Some("/a/c.xml"), "../../../d.xml"), "d.xml");
    assert_eq!(weave_paths(Some("/a/b/c.xml"), "../d.xml"), "/a/d.xml");
    platform_log_disable();

    let records = captured_for("platutils::path");
    assert_eq!(records.len(), 1, "{records:?}");
    let record = &records[0];
    assert_eq!(record.level, PlatformLogLevel::Debug);
    assert!(record.message.contains("too few levels"), "{}", record.message);
    assert!(record.message.contains("/a/c.xml"), "{}", record.message);
    assert!(record.file.ends_with("path.rs"), "{}", record.file);
    assert!(record.line > 0);
}

#[test]
fn level_above_debug_hides_weave_record() {
    let _turn = SINK_TURN.lock().unwrap();
    CAPTURED.lock().unwrap().clear();
    assert_eq!(
        platform_log_set_callback(Some(capture), std::ptr::null_mut(), PlatformLogLevel::Debug),
        PlatformStatus::Ok
    );
    assert_eq!(platform_log_set_level(PlatformLogLevel::Info), PlatformStatus::Ok);

    weave_paths(Some("/c.xml"), "../../d.xml");
    platform_log_disable();

    assert!(captured_for("platutils::path").is_empty());
}

#[test]
fn misuse_of_recursive_lock_is_logged() {
    let _turn = SINK_TURN.lock().unwrap();
    CAPTURED.lock().unwrap().clear();
    assert_eq!(
        platform_log_set_callback(Some(capture), std::ptr::null_mut(), PlatformLogLevel::Warn),
        PlatformStatus::Ok
    );

    let lock = RecursiveLock::new().unwrap();
    assert_eq!(lock.unlock(), Err(PlatformStatus::LockReleaseError));
    platform_log_disable();

    let records = captured_for("platutils::recursive_lock");
    assert_eq!(records.len(), 1, "{records:?}");
    assert_eq!(records[0].level, PlatformLogLevel::Warn);
}

#[test]
fn log_stderr_flag_installs_stderr_sink() {
    const CHILD_ENV: &str = "PLATUTILS_STDERR_SINK_CHILD";
    if std::env::var_os(CHILD_ENV).is_some() {
        let config = PlatformConfig {
            flags: PLATFORM_FLAG_LOG_STDERR,
            ..PlatformConfig::default()
        };
        assert_eq!(platform_init(&config), PlatformStatus::Ok);
        let lock = RecursiveLock::new().unwrap();
        let _ = lock.unlock();
        log::info!(target: "platutils::stderr_sink", "below the warn threshold");
        return;
    }

    let output = Command::new(std::env::current_exe().unwrap())
        .args([
            "logging::log_stderr_flag_installs_stderr_sink",
            "--exact",
            "--nocapture",
        ])
        .env(CHILD_ENV, "1")
        .output()
        .unwrap();
    assert!(output.status.success(), "{output:?}");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("[platutils][WARN] unlock of a recursive lock not held by this thread"),
        "{stderr}"
    );
    assert!(!stderr.contains("below the warn threshold"), "{stderr}");
}
