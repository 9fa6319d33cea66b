use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

fn run_interactive(dir: &Path, input: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_taskboard"))
        .env("TASKBOARD_DATA_DIR", dir)
        .env("TASKBOARD_CONFIG_PATH", dir.join("config.json"))
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn interactive session");

    {
        let stdin = child.stdin.as_mut().expect("stdin");
        stdin
            .write_all(input.as_bytes())
            .expect("failed to write to stdin");
    }

    child
        .wait_with_output()
        .expect("failed to read interactive output")
}

fn stored(dir: &Path) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(dir.join("tasks.json")).unwrap()).unwrap()
}

#[test]
fn interactive_help_shows_usage() {
    let dir = TempDir::new().unwrap();
    let output = run_interactive(dir.path(), "help\nexit\n");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage"));
    assert!(stdout.contains("Interactive commands"));
}

#[test]
fn interactive_invalid_command_prints_error() {
    let dir = TempDir::new().unwrap();
    let output = run_interactive(dir.path(), "nope\nexit\n");

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: invalid_input"));
}

#[test]
fn interactive_form_keeps_draft_until_valid() {
    let dir = TempDir::new().unwrap();
    let input = "new\nset title \"Buy milk\"\nsubmit\nset priority high\nset status to-do\nsubmit\nexit\n";
    let output = run_interactive(dir.path(), input);

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("priority required"));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Added task: Buy milk"));
    assert_eq!(stored(dir.path())[0]["title"], "Buy milk");
}

#[test]
fn interactive_edit_session_saves_changes() {
    let dir = TempDir::new().unwrap();
    let setup = "add first -p low -s to-do\nlist --json\nexit\n";
    let output = run_interactive(dir.path(), setup);
    assert!(output.status.success());
    let id = stored(dir.path())[0]["id"].as_str().unwrap().to_string();

    let input = format!("edit {id}\nset title renamed\nset status done\nsave\nexit\n");
    let output = run_interactive(dir.path(), &input);

    assert!(output.status.success());
    let tasks = stored(dir.path());
    assert_eq!(tasks[0]["title"], "renamed");
    assert_eq!(tasks[0]["status"], "done");
    assert_eq!(tasks[0]["priority"], "low");
}

#[test]
fn interactive_cancel_discards_edit() {
    let dir = TempDir::new().unwrap();
    run_interactive(dir.path(), "add first -p low -s to-do\nexit\n");
    let before = std::fs::read_to_string(dir.path().join("tasks.json")).unwrap();
    let id = stored(dir.path())[0]["id"].as_str().unwrap().to_string();

    let input = format!("edit {id}\nset title discarded\ncancel\nsave\nexit\n");
    let output = run_interactive(dir.path(), &input);

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no task is being edited"));
    let after = std::fs::read_to_string(dir.path().join("tasks.json")).unwrap();
    assert_eq!(after, before);
}

#[test]
fn interactive_delete_asks_for_confirmation() {
    let dir = TempDir::new().unwrap();
    run_interactive(dir.path(), "add first -p low -s to-do\nexit\n");
    let id = stored(dir.path())[0]["id"].as_str().unwrap().to_string();

    let declined = run_interactive(dir.path(), &format!("delete {id}\nn\nexit\n"));
    assert!(declined.status.success());
    assert_eq!(stored(dir.path()).as_array().unwrap().len(), 1);

    let accepted = run_interactive(dir.path(), &format!("delete {id}\ny\nexit\n"));
    assert!(accepted.status.success());
    let stdout = String::from_utf8_lossy(&accepted.stdout);
    assert!(stdout.contains("Are you sure you want to delete this task?"));
    assert!(stored(dir.path()).as_array().unwrap().is_empty());
}

#[test]
fn interactive_new_form_discards_open_edit() {
    let dir = TempDir::new().unwrap();
    run_interactive(dir.path(), "add first -p low -s to-do\nexit\n");
    let id = stored(dir.path())[0]["id"].as_str().unwrap().to_string();

    let input = format!(
        "edit {id}\nnew\nset title second\nset priority high\nset status done\nsubmit\nexit\n"
    );
    let output = run_interactive(dir.path(), &input);

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stderr.contains("ERROR"));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(&format!("Edit of {id} discarded.")));
    let tasks = stored(dir.path());
    assert_eq!(tasks.as_array().unwrap().len(), 2);
    assert_eq!(tasks[0]["title"], "first");
    assert_eq!(tasks[1]["title"], "second");
}

#[test]
fn interactive_failed_flag_edit_leaves_no_open_edit() {
    let dir = TempDir::new().unwrap();
    run_interactive(dir.path(), "add first -p low -s to-do\nexit\n");
    let id = stored(dir.path())[0]["id"].as_str().unwrap().to_string();

    let input = format!(
        "edit {id} --title \"  \"\nset title second\nset priority high\nset status done\nsubmit\nsave\nexit\n"
    );
    let output = run_interactive(dir.path(), &input);

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.matches("title required").count(), 1);
    assert!(stderr.contains("no task is being edited"));
    let tasks = stored(dir.path());
    assert_eq!(tasks[0]["title"], "first");
    assert_eq!(tasks[1]["title"], "second");
}
