use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

const PASSWORD: &str = "test-password-123";

struct Env {
    dir: TempDir,
}

impl Env {
    /// Isolated XDG directories with a cheap KDF configured.
    fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let config_dir = dir.path().join("config").join("sealnote");
        std::fs::create_dir_all(&config_dir).expect("config dir");
        std::fs::write(
            config_dir.join("config.toml"),
            "[kdf]\nmemory_kib = 1024\niterations = 1\nparallelism = 1\n",
        )
        .expect("config");
        Self { dir }
    }

    fn vault_path(&self) -> PathBuf {
        self.dir.path().join("data").join("sealnote").join("vault")
    }

    fn command(&self, password: &str) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_sealnote"));
        cmd.env("HOME", self.dir.path())
            .env("XDG_CONFIG_HOME", self.dir.path().join("config"))
            .env("XDG_DATA_HOME", self.dir.path().join("data"))
            .env("SEALNOTE_PASSPHRASE", password)
            .env("NO_COLOR", "1")
            .env_remove("SEALNOTE_VAULT")
            .env_remove("SEALNOTE_LOG");
        cmd
    }

    fn run(&self, args: &[&str]) -> Output {
        self.command(PASSWORD)
            .args(args)
            .output()
            .expect("run sealnote")
    }

    fn run_shell(&self, script: &str) -> Output {
        self.run_shell_with(&[], script)
    }

    fn run_shell_with(&self, args: &[&str], script: &str) -> Output {
        let mut child = self
            .command(PASSWORD)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("spawn sealnote");
        if let Some(mut stdin) = child.stdin.take() {
            // The process may exit before reading its input.
            let _ = stdin.write_all(script.as_bytes());
        }
        child.wait_with_output().expect("wait for sealnote")
    }

    fn init(&self) {
        let output = self.run(&["init"]);
        assert!(
            output.status.success(),
            "init failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn files_under(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(root).expect("read dir") {
        let path = entry.expect("entry").path();
        if path.is_dir() {
            files.extend(files_under(&path));
        } else {
            files.push(path);
        }
    }
    files
}

#[test]
fn test_init_creates_vault() {
    let env = Env::new();
    let output = env.run(&["init"]);

    assert!(output.status.success());
    assert!(stdout(&output).contains("Vault created"));
    assert!(env.vault_path().join("vault.json").exists());
}

#[test]
fn test_init_twice_is_rejected() {
    let env = Env::new();
    env.init();

    let output = env.run(&["init"]);
    assert_eq!(output.status.code(), Some(4));
}

#[test]
fn test_shell_create_and_view() {
    let env = Env::new();
    env.init();

    let output = env.run_shell("new\nideas\nline one\nline two\n.\nview\nideas\nquit\n");
    let out = stdout(&output);

    assert!(output.status.success());
    assert!(out.contains("Enter command"));
    assert!(out.contains("Saved note 'ideas'."));
    assert!(out.contains("line one\nline two"));

    for path in files_under(&env.vault_path()) {
        let raw = std::fs::read(&path).expect("read vault file");
        let text = String::from_utf8_lossy(&raw);
        assert!(!text.contains("line one"), "plaintext in {}", path.display());
    }
}

#[test]
fn test_shell_invalid_command_and_eof() {
    let env = Env::new();
    env.init();

    let output = env.run_shell("dance\n");
    assert!(output.status.success());
    assert!(stdout(&output).contains("Invalid command."));
}

#[test]
fn test_notes_persist_across_runs() {
    let env = Env::new();
    env.init();
    let created = env.run_shell("new\ntodo\nbuy milk\n.\nquit\n");
    assert!(created.status.success());

    let listed = env.run(&["list"]);
    assert!(listed.status.success());
    assert!(stdout(&listed).contains("todo"));

    let viewed = env.run(&["view", "todo"]);
    assert!(viewed.status.success());
    assert_eq!(stdout(&viewed).trim_end(), "buy milk");
}

#[test]
fn test_view_missing_note() {
    let env = Env::new();
    env.init();

    let output = env.run(&["view", "nothing-here"]);
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn test_wrong_password_exits_with_auth_code() {
    let env = Env::new();
    env.init();

    let output = env
        .command("definitely-wrong")
        .arg("list")
        .output()
        .expect("run sealnote");
    assert_eq!(output.status.code(), Some(5));
    assert!(!String::from_utf8_lossy(&output.stderr).contains("definitely-wrong"));
}

#[test]
fn test_missing_vault() {
    let env = Env::new();
    let missing = env.dir.path().join("nowhere");

    let output = env.run(&["--vault", missing.to_str().expect("utf8"), "list"]);
    assert_eq!(output.status.code(), Some(3));
    assert!(String::from_utf8_lossy(&output.stderr).contains("sealnote init"));
}

#[test]
fn test_unreadable_vault_location_fails_at_startup() {
    let env = Env::new();
    let not_a_dir = env.dir.path().join("plain-file");
    std::fs::write(&not_a_dir, b"not a vault").expect("write file");

    let vault = not_a_dir.to_str().expect("utf8");
    let output = env.run_shell_with(&["--vault", vault], "quit\n");
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_check_reports_ok() {
    let env = Env::new();
    env.init();
    env.run_shell("new\na\nalpha\n.\nnew\nb\nbeta\n.\nquit\n");

    let output = env.run(&["check"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("2 note(s) OK"));
}

#[test]
fn test_check_detects_swapped_note() {
    let env = Env::new();
    env.init();
    env.run_shell("new\na\nalpha\n.\nnew\nb\nbeta\n.\nquit\n");

    // Move b's ciphertext under a's file name.
    let notes = env.vault_path().join("notes");
    let a = notes.join(format!("{}.note", hex_name("a")));
    let b = notes.join(format!("{}.note", hex_name("b")));
    let mut swapped: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&b).expect("read b")).expect("parse b");
    swapped["name"] = serde_json::Value::String("a".to_string());
    std::fs::write(&a, serde_json::to_vec(&swapped).expect("encode")).expect("write a");

    let output = env.run(&["check"]);
    assert_eq!(output.status.code(), Some(6));
}

fn hex_name(name: &str) -> String {
    name.bytes().map(|b| format!("{:02x}", b)).collect()
}
