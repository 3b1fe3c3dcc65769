use std::path::PathBuf;
use std::sync::Arc;

use serde_json::json;
use tempfile::TempDir;

use super::*;
use crate::constants::errors;
use crate::lsp::{ClientOptions, ServerConfig};
use crate::split::SplitNode;
use crate::test_utils::{settle, FakeLauncher};
use crate::window::Processor;

struct Session {
    editor: Editor,
    launcher: Arc<FakeLauncher>,
    dir: TempDir,
}

impl Session {
    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn file(&self, name: &str, text: &str) -> PathBuf {
        let path = self.path(name);
        std::fs::write(&path, text).unwrap();
        path
    }

    async fn run(&mut self, line: &str) {
        self.editor.execute_line(line).await;
    }

    fn last_message(&self) -> String {
        self.editor
            .notifications()
            .last()
            .map(|n| n.message.clone())
            .unwrap_or_default()
    }

    fn active(&self) -> BufferId {
        self.editor.active_buffer_id().unwrap()
    }

    fn active_name(&self) -> String {
        let id = self.active();
        self.editor.buffers().get(id).unwrap().display_name(true)
    }

    fn make_dirty(&mut self, id: BufferId) {
        self.editor
            .buffers_mut()
            .get_mut(id)
            .unwrap()
            .set_text("changed\n");
    }

    /// Let background jobs run until `done` holds
    async fn wait_for(&mut self, done: impl Fn(&Editor) -> bool) {
        for _ in 0..100 {
            settle().await;
            self.editor.drain_jobs();
            if done(&self.editor) {
                return;
            }
        }
        panic!("condition not reached");
    }
}

fn session_with(launcher: FakeLauncher) -> Session {
    let dir = tempfile::tempdir().unwrap();
    let launcher = Arc::new(launcher);
    let mut clients = LanguageClientManager::with_launcher(launcher.clone(), ClientOptions::default());
    clients.add_server(ServerConfig::new("python", &["py"], "pylsp"));
    let editor = Editor::with_clients(Config::default(), Arc::new(clients), dir.path().to_path_buf());
    Session {
        editor,
        launcher,
        dir,
    }
}

/// Session with one empty window
async fn session() -> Session {
    let mut s = session_with(FakeLauncher::default());
    s.editor.open_initial(&[], InitialLayout::Buffers).await.unwrap();
    s
}

// ============================================================
// Startup layout
// ============================================================

#[tokio::test]
async fn test_initial_layout_without_files() {
    let s = session().await;
    assert_eq!(s.editor.windows().window_count(), 1);
    assert_eq!(s.active_name(), "[No Name]");
    assert_eq!(s.editor.buffers().len(), 1);
}

#[tokio::test]
async fn test_initial_layout_lists_files_in_one_window() {
    let mut s = session_with(FakeLauncher::default());
    let a = s.file("a.txt", "one\n");
    let b = s.file("b.txt", "two\n");
    s.editor
        .open_initial(&[a, b], InitialLayout::Buffers)
        .await
        .unwrap();

    assert_eq!(s.editor.windows().window_count(), 1);
    let window = s.editor.windows().active_window().unwrap();
    assert_eq!(window.get_buffer_count(), 2);
    assert_eq!(s.active_name(), "a.txt");
}

#[tokio::test]
async fn test_initial_layout_splits_each_file() {
    let mut s = session_with(FakeLauncher::default());
    let files = vec![
        s.file("a.txt", ""),
        s.file("b.txt", ""),
        s.file("c.txt", ""),
    ];
    s.editor
        .open_initial(&files, InitialLayout::VerticalSplits)
        .await
        .unwrap();

    let windows = s.editor.windows().walk_windows();
    assert_eq!(windows.len(), 3);
    assert!(matches!(
        s.editor.windows().root(),
        Some(SplitNode::Split { direction: SplitDirection::Vertical, children }) if children.len() == 3
    ));
    assert_eq!(s.editor.windows().active_window_id(), Some(windows[0]));
    assert_eq!(s.active_name(), "a.txt");
}

#[tokio::test]
async fn test_initial_layout_skips_unreadable_files() {
    let mut s = session_with(FakeLauncher::default());
    let dir = s.dir.path().to_path_buf();
    let a = s.file("a.txt", "");
    s.editor
        .open_initial(&[dir, a], InitialLayout::Buffers)
        .await
        .unwrap();

    assert_eq!(s.active_name(), "a.txt");
    assert_eq!(s.editor.notifications().iter_active().count(), 1);
}

// ============================================================
// Files
// ============================================================

#[tokio::test]
async fn test_edit_opens_and_reuses() {
    let mut s = session().await;
    let path = s.file("notes.txt", "a\nb\n");

    s.run(&format!("e {}", path.display())).await;
    assert_eq!(s.active_name(), "notes.txt");
    assert!(s.last_message().ends_with("3L"));
    let id = s.active();

    s.run("bn").await;
    s.run(&format!("e {}", path.display())).await;
    assert_eq!(s.active(), id);
    assert_eq!(s.editor.windows().active_window().unwrap().get_buffer_count(), 2);
}

#[tokio::test]
async fn test_edit_new_file_and_line() {
    let mut s = session().await;
    let path = s.path("fresh.txt");
    s.run(&format!("e +5 {}", path.display())).await;

    assert!(s.last_message().ends_with("[New]"));
    assert_eq!(s.editor.windows().active_window().unwrap().cursor_line(), 4);
}

#[tokio::test]
async fn test_reload_refuses_unsaved_changes() {
    let mut s = session().await;
    let path = s.file("notes.txt", "disk\n");
    s.run(&format!("e {}", path.display())).await;
    let id = s.active();
    s.make_dirty(id);

    s.run("e").await;
    assert_eq!(s.last_message(), errors::unsaved_changes("notes.txt"));
    assert!(s.editor.buffers().get(id).unwrap().is_dirty());

    s.run("e!").await;
    let buffer = s.editor.buffers().get(id).unwrap();
    assert!(!buffer.is_dirty());
    assert_eq!(buffer.contents(), "disk\n");
}

#[tokio::test]
async fn test_reload_without_path() {
    let mut s = session().await;
    s.run("e").await;
    assert_eq!(s.last_message(), errors::MSG_NO_FILE_NAME);
}

#[tokio::test]
async fn test_write_saves_active_buffer() {
    let mut s = session().await;
    let path = s.file("notes.txt", "old\n");
    s.run(&format!("e {}", path.display())).await;
    let id = s.active();
    s.make_dirty(id);

    s.run("w").await;
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "changed\n");
    assert!(!s.editor.buffers().get(id).unwrap().is_dirty());
    assert!(s.last_message().ends_with("written"));
}

#[tokio::test]
async fn test_write_path_on_unnamed_buffer_adopts_it() {
    let mut s = session().await;
    let id = s.active();
    s.make_dirty(id);
    let target = s.path("named.txt");

    s.run(&format!("w {}", target.display())).await;
    assert_eq!(std::fs::read_to_string(&target).unwrap(), "changed\n");
    assert_eq!(s.active_name(), "named.txt");
    assert!(!s.editor.buffers().get(id).unwrap().is_dirty());
}

#[tokio::test]
async fn test_write_path_on_named_buffer_writes_copy() {
    let mut s = session().await;
    let path = s.file("notes.txt", "old\n");
    s.run(&format!("e {}", path.display())).await;
    let id = s.active();
    s.make_dirty(id);
    let copy = s.path("copy.txt");

    s.run(&format!("w {}", copy.display())).await;
    assert_eq!(std::fs::read_to_string(&copy).unwrap(), "changed\n");
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "old\n");
    assert_eq!(s.active_name(), "notes.txt");
    assert!(s.editor.buffers().get(id).unwrap().is_dirty());
}

#[tokio::test]
async fn test_write_all_counts_buffers() {
    let mut s = session().await;
    let a = s.file("a.txt", "");
    let b = s.file("b.txt", "");
    s.run(&format!("e {}", a.display())).await;
    let a_id = s.active();
    s.run(&format!("e {}", b.display())).await;
    let b_id = s.active();
    s.make_dirty(a_id);
    s.make_dirty(b_id);

    s.run("wa").await;
    assert_eq!(s.last_message(), "Wrote 2 buffer(s)");
    assert!(!s.editor.buffers().has_unsaved_changes());
}

// ============================================================
// Quitting
// ============================================================

#[tokio::test]
async fn test_quit_last_window_checks_dirty_buffers() {
    let mut s = session().await;
    let id = s.active();
    s.make_dirty(id);

    s.run("q").await;
    assert!(!s.editor.should_quit());
    assert_eq!(s.last_message(), errors::unsaved_changes("[No Name]"));

    s.run("q!").await;
    assert!(s.editor.should_quit());
    assert!(s.editor.windows().is_empty());
}

#[tokio::test]
async fn test_quit_closes_split_first() {
    let mut s = session().await;
    s.run("sp").await;
    assert_eq!(s.editor.windows().window_count(), 2);

    s.run("q").await;
    assert_eq!(s.editor.windows().window_count(), 1);
    assert!(!s.editor.should_quit());
}

#[tokio::test]
async fn test_quit_all_and_write_quit() {
    let mut s = session().await;
    let path = s.file("a.txt", "");
    s.run(&format!("e {}", path.display())).await;
    let id = s.active();
    s.make_dirty(id);

    s.run("qa").await;
    assert!(!s.editor.should_quit());
    assert!(s.last_message().contains("a.txt"));

    s.run("x").await;
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "changed\n");
    assert!(s.editor.should_quit());
}

// ============================================================
// Buffers
// ============================================================

#[tokio::test]
async fn test_buffer_cycling_and_selection() {
    let mut s = session().await;
    let a = s.file("a.txt", "");
    let b = s.file("b.txt", "");
    s.run(&format!("e {}", a.display())).await;
    s.run(&format!("e {}", b.display())).await;

    s.run("bn").await;
    assert_eq!(s.active_name(), "[No Name]");
    s.run("bp").await;
    assert_eq!(s.active_name(), "b.txt");

    s.run("b 2").await;
    assert_eq!(s.active_name(), "a.txt");
    s.run("b b.txt").await;
    assert_eq!(s.active_name(), "b.txt");

    s.run("b 9").await;
    assert!(s.last_message().contains("No matching buffer"));
    assert_eq!(s.active_name(), "b.txt");
}

#[tokio::test]
async fn test_buffer_list() {
    let mut s = session().await;
    let a = s.file("a.txt", "");
    s.run(&format!("e {}", a.display())).await;
    s.make_dirty(s.active());
    s.editor.take_output();

    s.run("ls").await;
    let output = s.editor.take_output();
    assert_eq!(output.len(), 2);
    assert!(output[0].contains("\"[No Name]\""));
    assert!(output[1].starts_with("  2 %"));
    assert!(output[1].contains('+'));
    assert!(output[1].ends_with(&format!("\"{}\"", a.display())));
}

#[tokio::test]
async fn test_buffer_delete() {
    let mut s = session().await;
    let a = s.file("a.txt", "");
    s.run(&format!("e {}", a.display())).await;
    let id = s.active();
    s.run("vs").await;
    s.make_dirty(id);

    s.run("bd").await;
    assert_eq!(s.last_message(), errors::unsaved_changes("a.txt"));

    s.run("bd!").await;
    assert!(s.editor.buffers().get(id).is_none());
    // the split showed only this buffer, so it closed
    assert_eq!(s.editor.windows().window_count(), 1);
    assert_eq!(s.active_name(), "[No Name]");
}

#[tokio::test]
async fn test_buffer_delete_last_buffer_leaves_empty_window() {
    let mut s = session().await;
    let first = s.active();
    s.run("bd").await;

    assert_eq!(s.editor.windows().window_count(), 1);
    assert_ne!(s.active(), first);
    assert_eq!(s.active_name(), "[No Name]");
    assert!(!s.editor.should_quit());
}

// ============================================================
// Windows
// ============================================================

#[tokio::test]
async fn test_split_commands() {
    let mut s = session().await;
    let other = s.file("other.txt", "");
    let first = s.editor.windows().active_window_id().unwrap();

    s.run("sp").await;
    s.run(&format!("vs {}", other.display())).await;
    assert_eq!(s.editor.windows().window_count(), 3);
    assert_eq!(s.active_name(), "other.txt");

    s.run("wn").await;
    assert_eq!(s.editor.windows().active_window_id(), Some(first));
    s.run("wp").await;
    assert_eq!(s.active_name(), "other.txt");

    s.run("on").await;
    assert_eq!(s.editor.windows().window_count(), 1);
    assert_eq!(s.active_name(), "other.txt");
}

// ============================================================
// Options and messages
// ============================================================

#[tokio::test]
async fn test_set_updates_window_processors() {
    let mut s = session().await;
    s.run("set ts=8").await;
    assert_eq!(s.editor.config().tabstop, 8);
    let window = s.editor.windows().active_window().unwrap();
    assert!(matches!(
        window.processors().last(),
        Some(Processor::Tabs { tabstop: 8, .. })
    ));

    s.run("set nolist").await;
    let window = s.editor.windows().active_window().unwrap();
    assert!(matches!(
        window.processors().last(),
        Some(Processor::Tabs { char1: ' ', .. })
    ));
}

#[tokio::test]
async fn test_set_shows_and_lists() {
    let mut s = session().await;
    s.run("set ts").await;
    assert_eq!(s.editor.take_output(), vec!["tabstop=4".to_string()]);

    s.run("set et?").await;
    assert_eq!(s.editor.take_output(), vec!["expandtabs".to_string()]);
    assert!(s.editor.config().expandtabs);

    s.run("set").await;
    assert!(s.editor.take_output().contains(&"tabstop=4".to_string()));
}

#[tokio::test]
async fn test_set_errors_are_reported() {
    let mut s = session().await;
    s.run("set bogus=1").await;
    assert!(s.last_message().contains("bogus"));
    s.run("set ts=0").await;
    assert_eq!(s.editor.config().tabstop, 4);
}

#[tokio::test]
async fn test_bad_commands_are_reported() {
    let mut s = session().await;
    s.run("frobnicate").await;
    assert_eq!(s.last_message(), "Not an editor command: frobnicate");
    s.run("bu").await;
    assert!(s.last_message().starts_with("Ambiguous command 'bu'"));
    s.run("q now").await;
    assert!(s.last_message().starts_with("quit:"));
}

#[tokio::test]
async fn test_messages_show_the_log() {
    let mut s = session().await;
    s.run("echo hello there").await;
    s.run("nope").await;
    s.run("messages").await;

    let output = s.editor.take_output();
    assert_eq!(
        output,
        vec![
            "[INFO] hello there".to_string(),
            "[ERROR] Not an editor command: nope".to_string(),
        ]
    );
    assert!(s.editor.take_messages().is_empty());
}

#[tokio::test]
async fn test_logged_notifications_expire() {
    let mut s = session().await;
    s.editor.errors.notifications_mut().add(
        crate::notification::NotificationType::Info,
        "brief",
        Some(std::time::Duration::ZERO),
    );
    s.editor.errors.notifications_mut().add(
        crate::notification::NotificationType::Error,
        "sticky",
        None,
    );
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;

    assert_eq!(s.editor.take_messages(), vec!["[INFO] brief", "[ERROR] sticky"]);
    let left: Vec<_> = s
        .editor
        .notifications()
        .iter_active()
        .map(|n| n.message.clone())
        .collect();
    assert_eq!(left, vec!["sticky"]);
    let log = s.editor.buffers().log_buffer().unwrap().contents();
    assert_eq!(log, "[INFO] brief\n[ERROR] sticky\n");
}

// ============================================================
// Language servers
// ============================================================

#[tokio::test]
async fn test_python_buffer_gets_a_server_and_diagnostics() {
    let mut s = session().await;
    let path = s.file("main.py", "import os\n");
    s.run(&format!("e {}", path.display())).await;
    let id = s.active();

    s.wait_for(|e| e.buffers().get(id).unwrap().lsp().is_some())
        .await;
    assert_eq!(s.launcher.launches(), 1);

    let uri = s.editor.buffers().get(id).unwrap().uri().unwrap();
    s.launcher.notify(
        "textDocument/publishDiagnostics",
        json!({
            "uri": uri.as_str(),
            "diagnostics": [{
                "range": { "start": { "line": 0, "character": 7 }, "end": { "line": 0, "character": 9 } },
                "severity": 2,
                "message": "unused import"
            }]
        }),
    );
    s.wait_for(|e| !e.buffers().get(id).unwrap().diagnostics().is_empty())
        .await;
    let reports = s.editor.buffers().get(id).unwrap().diagnostics().to_vec();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].message, "unused import");
    assert_eq!(s.launcher.received_method("textDocument/didOpen").len(), 1);
}

#[tokio::test]
async fn test_other_files_start_no_server() {
    let mut s = session().await;
    let path = s.file("notes.txt", "");
    s.run(&format!("e {}", path.display())).await;
    settle().await;
    s.editor.drain_jobs();

    assert_eq!(s.launcher.launches(), 0);
    assert_eq!(s.editor.jobs().running_count(), 0);
}

#[tokio::test]
async fn test_failed_server_is_retried_by_forced_edit() {
    let mut s = session_with(FakeLauncher::failing());
    s.editor.open_initial(&[], InitialLayout::Buffers).await.unwrap();
    let path = s.file("main.py", "");
    s.run(&format!("e {}", path.display())).await;
    let id = s.active();

    s.wait_for(|e| {
        e.notifications()
            .last()
            .is_some_and(|n| n.message.starts_with("No language server"))
    })
    .await;
    assert!(s.editor.buffers().get(id).unwrap().lsp().is_none());

    s.launcher.set_failing(false);
    s.run("e!").await;
    s.wait_for(|e| e.buffers().get(id).unwrap().lsp().is_some())
        .await;
    assert_eq!(s.launcher.launches(), 1);
}

#[tokio::test]
async fn test_crashed_server_is_restarted_by_forced_edit() {
    let mut s = session().await;
    let path = s.file("main.py", "x = 1\n");
    s.run(&format!("e {}", path.display())).await;
    let id = s.active();
    s.wait_for(|e| e.buffers().get(id).unwrap().lsp().is_some())
        .await;

    s.launcher.crash_all();
    s.wait_for(|e| {
        e.buffers()
            .get(id)
            .unwrap()
            .lsp()
            .is_some_and(|client| !client.is_alive())
    })
    .await;

    s.run("e!").await;
    s.wait_for(|e| {
        e.buffers()
            .get(id)
            .unwrap()
            .lsp()
            .is_some_and(|client| client.is_alive())
    })
    .await;
    settle().await;
    assert_eq!(s.launcher.launches(), 2);
    assert_eq!(s.launcher.received_method("textDocument/didOpen").len(), 2);
}

#[tokio::test]
async fn test_buffers_share_one_server() {
    let mut s = session().await;
    let a = s.file("a.py", "");
    let b = s.file("b.py", "");
    s.run(&format!("e {}", a.display())).await;
    let a_id = s.active();
    s.run(&format!("sp {}", b.display())).await;
    let b_id = s.active();

    s.wait_for(|e| {
        [a_id, b_id]
            .iter()
            .all(|&id| e.buffers().get(id).unwrap().lsp().is_some())
    })
    .await;
    assert_eq!(s.launcher.launches(), 1);

    s.run("bd").await;
    settle().await;
    assert_eq!(s.launcher.received_method("textDocument/didClose").len(), 1);
    assert!(s.editor.buffers().get(a_id).unwrap().lsp().unwrap().is_alive());
}

// ============================================================
// Run loop
// ============================================================

#[tokio::test]
async fn test_run_prints_messages_and_stops_on_quit() {
    let mut s = session().await;
    let input = tokio::io::BufReader::new(&b"echo hi\n\nset ts\nqa\necho never\n"[..]);
    let mut out = Vec::new();

    s.editor.run(input, &mut out).await.unwrap();

    let text = String::from_utf8(out).unwrap();
    assert_eq!(text, "[INFO] hi\ntabstop=4\n");
    assert!(s.editor.should_quit());
}

#[tokio::test]
async fn test_run_stops_at_end_of_input_and_shuts_servers_down() {
    let mut s = session().await;
    let path = s.file("main.py", "");
    s.run(&format!("e {}", path.display())).await;
    let id = s.active();
    s.wait_for(|e| e.buffers().get(id).unwrap().lsp().is_some())
        .await;

    let mut out = Vec::new();
    s.editor
        .run(tokio::io::BufReader::new(&b""[..]), &mut out)
        .await
        .unwrap();

    assert!(s.editor.should_quit());
    assert_eq!(s.launcher.received_method("textDocument/didClose").len(), 1);
    assert_eq!(s.launcher.received_method("shutdown").len(), 1);
}
