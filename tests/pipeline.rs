//! End-to-end runs against stand-in `ffmpeg`/`ffprobe` shell scripts.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tempfile::{tempdir, TempDir};
use videoclipper::{
    ChannelRegistry, ClipPipeline, Config, ErrorKind, PipelineState, ProjectDescriptor,
};

// Writing a script while another test forks can make exec fail with ETXTBSY.
static SERIAL: Mutex<()> = Mutex::new(());

const PROBE_OK: &str = "#!/bin/sh\nprintf '{\\n\\n}\\n'\n";

const PROBE_MISSING: &str = r#"#!/bin/sh
echo "$2: No such file or directory" >&2
printf '{\n    "error": {\n        "code": -2,\n        "string": "No such file or directory"\n    }\n}\n'
exit 1
"#;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self { dir: tempdir().unwrap() }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn script(&self, name: &str, body: &str) -> String {
        let path = self.path().join(name);
        fs::write(&path, body).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path.display().to_string()
    }

    /// Records its arguments, one invocation per line, then creates the output file
    fn fake_ffmpeg(&self) -> String {
        let log = self.calls_path();
        let body = format!(
            "#!/bin/sh\necho \"$@\" >> '{}'\nfor last; do :; done\nprintf 'frame=  1\\rframe=  2\\r\\n' >&2\n: > \"$last\"\n",
            log.display()
        );
        self.script("ffmpeg", &body)
    }

    fn calls_path(&self) -> PathBuf {
        self.path().join("ffmpeg-calls.log")
    }

    fn calls(&self) -> Vec<String> {
        fs::read_to_string(self.calls_path())
            .map(|s| s.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }

    fn config(&self, probe: &str) -> Config {
        let mut config = Config::default();
        config.tools.ffprobe = self.script("ffprobe", probe);
        config.tools.ffmpeg = self.fake_ffmpeg();
        config
    }

    fn project(&self, yaml: &str) -> ProjectDescriptor {
        let path = self.path().join("project.yaml");
        fs::write(&path, yaml).unwrap();
        ProjectDescriptor::load(&path).unwrap()
    }
}

const TWO_SECTIONS: &str = r#"
title: Meetup
video: talk.mp4
output:
  dir: out
  format: mkv
sections:
  - title: Welcome
    speaker: Ann
    start: "0"
    end: "5"
  - title: Backwards
    speaker: Bob
    start: "5"
    end: "3"
"#;

#[tokio::test]
async fn test_stops_at_first_invalid_range() {
    let _guard = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
    let ws = Workspace::new();
    let mut registry = ChannelRegistry::new();
    let mut pipeline =
        ClipPipeline::new(ws.config(PROBE_OK), ws.project(TWO_SECTIONS), &mut registry).unwrap();

    let err = pipeline.run().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidClipRange);
    assert_eq!(pipeline.state(), PipelineState::Aborted);

    let first = ws.path().join("out/Meetup/01-Welcome-Ann.mkv");
    assert_eq!(pipeline.produced(), &[first.clone()]);
    assert!(first.exists());
    assert!(!ws.path().join("out/Meetup/02-Backwards-Bob.mkv").exists());
    assert_eq!(ws.calls().len(), 1);
}

#[tokio::test]
async fn test_exports_every_section() {
    let _guard = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
    let ws = Workspace::new();
    let yaml = r#"
title: Meetup
video: talk.mp4
output:
  dir: out
  format: mp4
sections:
  - title: Intro
    speaker: Ann
    start: 0
    end: 1.4
  - title: Talk
    speaker: Bob
    start: "00:01:02.5"
    end: "1:10"
"#;
    let mut config = ws.config(PROBE_OK);
    config.clip.overwrite = false;

    let mut registry = ChannelRegistry::new();
    let mut pipeline = ClipPipeline::new(config, ws.project(yaml), &mut registry).unwrap();
    let report = pipeline.run().await.unwrap();

    assert_eq!(pipeline.state(), PipelineState::Done);
    assert_eq!(report.outdir, ws.path().join("out/Meetup"));
    assert_eq!(
        report.clips,
        vec![
            ws.path().join("out/Meetup/01-Intro-Ann.mp4"),
            ws.path().join("out/Meetup/02-Talk-Bob.mp4"),
        ]
    );
    assert!(report.clips.iter().all(|clip| clip.exists()));

    let video = ws.path().join("talk.mp4");
    let calls = ws.calls();
    assert_eq!(
        calls,
        vec![
            format!(
                "-ss 0 -i {} -c copy -nostdin -n -t 2 {}",
                video.display(),
                report.clips[0].display()
            ),
            format!(
                "-ss 00:01:02.5 -i {} -c copy -nostdin -n -t 8 {}",
                video.display(),
                report.clips[1].display()
            ),
        ]
    );
}

#[tokio::test]
async fn test_invalid_source_stops_before_export() {
    let _guard = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
    let ws = Workspace::new();
    let mut registry = ChannelRegistry::new();
    let mut pipeline =
        ClipPipeline::new(ws.config(PROBE_MISSING), ws.project(TWO_SECTIONS), &mut registry)
            .unwrap();

    let err = pipeline.run().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::SourceVideoInvalid);
    assert!(err.to_string().contains("No such file or directory"));
    assert!(ws.calls().is_empty());
    assert!(ws.path().join("out/Meetup").is_dir());
}

#[tokio::test]
async fn test_bad_timestamp_aborts() {
    let _guard = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
    let ws = Workspace::new();
    let yaml = "title: T\nvideo: v.mp4\nsections:\n  - title: x\n    speaker: y\n    start: \"0x:00\"\n    end: 5\n";
    let mut registry = ChannelRegistry::new();
    let mut pipeline = ClipPipeline::new(ws.config(PROBE_OK), ws.project(yaml), &mut registry).unwrap();

    let err = pipeline.run().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidTimestamp);
    assert!(ws.calls().is_empty());
}
