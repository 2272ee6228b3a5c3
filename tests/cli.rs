//! Runs the `videoclipper` binary and checks its exit status and final message.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::Mutex;

use tempfile::{tempdir, TempDir};

// Writing a script while another test forks can make exec fail with ETXTBSY.
static SERIAL: Mutex<()> = Mutex::new(());

const GOOD_PROJECT: &str = r#"
title: Meetup
video: talk.mp4
output:
  dir: out
sections:
  - title: Welcome
    speaker: Ann
    start: 0
    end: 5
"#;

const BACKWARDS_PROJECT: &str = r#"
title: Meetup
video: talk.mp4
output:
  dir: out
sections:
  - title: Welcome
    speaker: Ann
    start: 0
    end: 5
  - title: Backwards
    speaker: Bob
    start: 5
    end: 3
"#;

struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    /// Stand-in tools that log each call and create whatever file ffmpeg is asked for
    fn new() -> Self {
        let sandbox = Self { dir: tempdir().unwrap() };
        let calls = sandbox.calls_path();
        sandbox.script(
            "ffprobe",
            &format!("#!/bin/sh\necho ffprobe >> '{}'\necho '{{}}'\n", calls.display()),
        );
        sandbox.script(
            "ffmpeg",
            &format!(
                "#!/bin/sh\necho ffmpeg >> '{}'\nfor last; do :; done\n: > \"$last\"\n",
                calls.display()
            ),
        );
        sandbox
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn script(&self, name: &str, body: &str) {
        let path = self.path().join(name);
        fs::write(&path, body).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    fn calls_path(&self) -> PathBuf {
        self.path().join("calls.log")
    }

    fn calls(&self) -> Vec<String> {
        fs::read_to_string(self.calls_path())
            .map(|s| s.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// A configuration pointing at the stand-in tools, followed by `extra`
    fn write_config(&self, extra: &str) -> PathBuf {
        let path = self.path().join("videoclipper.toml");
        let content = format!(
            "[tools]\nffmpeg = '{}'\nffprobe = '{}'\n{}",
            self.path().join("ffmpeg").display(),
            self.path().join("ffprobe").display(),
            extra
        );
        fs::write(&path, content).unwrap();
        path
    }

    fn write_project(&self, yaml: &str) -> PathBuf {
        let path = self.path().join("project.yaml");
        fs::write(&path, yaml).unwrap();
        path
    }

    fn run(&self, config: &Path, project: &Path) -> Output {
        Command::new(env!("CARGO_BIN_EXE_videoclipper"))
            .arg(project)
            .arg("--config")
            .arg(config)
            .current_dir(self.path())
            .output()
            .unwrap()
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_successful_run_exits_zero() {
    let _guard = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
    let sandbox = Sandbox::new();
    let config = sandbox.write_config("");
    let project = sandbox.write_project(GOOD_PROJECT);

    let output = sandbox.run(&config, &project);

    assert!(output.status.success(), "{}", stdout(&output));
    assert!(sandbox.path().join("out/Meetup/01-Welcome-Ann.mp4").exists());
    assert_eq!(sandbox.calls(), vec!["ffprobe", "ffmpeg"]);
}

#[test]
fn test_invalid_range_exits_non_zero() {
    let _guard = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
    let sandbox = Sandbox::new();
    let config = sandbox.write_config("");
    let project = sandbox.write_project(BACKWARDS_PROJECT);

    let output = sandbox.run(&config, &project);

    assert!(!output.status.success());
    assert_eq!(sandbox.calls(), vec!["ffprobe", "ffmpeg"]);
    assert!(sandbox.path().join("out/Meetup/01-Welcome-Ann.mp4").exists());

    let text = stdout(&output);
    assert!(text.contains("Clipping 'Meetup' aborted"));
    assert_eq!(text.matches("should be earlier than end time").count(), 1);
}

#[test]
fn test_malformed_config_stops_before_any_tool_runs() {
    let _guard = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
    let sandbox = Sandbox::new();
    let config = sandbox.write_config("[debug\nffmpeg = ");
    let project = sandbox.write_project(GOOD_PROJECT);

    let output = sandbox.run(&config, &project);

    assert!(!output.status.success());
    assert!(sandbox.calls().is_empty());
    assert!(!sandbox.path().join("out").exists());
}

#[test]
fn test_unknown_level_name_exits_non_zero() {
    let _guard = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
    let sandbox = Sandbox::new();
    let config = sandbox.write_config("[debug]\nffmpeg = 'LOUD'\n");
    let project = sandbox.write_project(GOOD_PROJECT);

    let output = sandbox.run(&config, &project);

    assert!(!output.status.success());
    assert!(sandbox.calls().is_empty());
    assert_eq!(stdout(&output).matches("LOUD").count(), 1);
}

#[test]
fn test_missing_project_exits_non_zero() {
    let _guard = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
    let sandbox = Sandbox::new();
    let config = sandbox.write_config("");

    let output = sandbox.run(&config, &sandbox.path().join("nope.yaml"));

    assert!(!output.status.success());
    assert_eq!(stdout(&output).matches("No such file or directory").count(), 1);
}

#[test]
fn test_missing_config_writes_template() {
    let _guard = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
    let sandbox = Sandbox::new();
    let config = sandbox.path().join("fresh.toml");
    let project = sandbox.write_project("title: Empty\nvideo: talk.mp4\n");

    // the default `ffprobe` may not be installed, so only the template is checked
    let _ = sandbox.run(&config, &project);

    let template = fs::read_to_string(&config).unwrap();
    assert!(template.contains("[tools]"));
    assert!(template.contains("[debug]"));
}
