//! Integration tests for the bootstrapping engine
//!
//! These tests run complete bootstraps into temporary directories and check
//! both the files on disk and the lines of the log stream.

use bootstrapme_core::engine::{
    BootstrapJob, Bootstrapper, CancelToken, FailedStep, Outcome, RunEvent, RunReport,
};
use bootstrapme_core::presets::{FileSpec, Preset};
use std::time::Duration;
use tempfile::TempDir;

fn preset(files: Vec<FileSpec>, commands: &[&str]) -> Preset {
    Preset {
        name: "test".to_string(),
        description: "Test preset".to_string(),
        language: "shell".to_string(),
        framework: "none".to_string(),
        files,
        post_install_commands: commands.iter().map(|c| c.to_string()).collect(),
        ..Default::default()
    }
}

async fn bootstrap(temp: &TempDir, name: &str, preset: Preset) -> RunReport {
    let job = BootstrapJob::new(temp.path().join(name), preset).unwrap();
    Bootstrapper::default().run(job, CancelToken::new()).await
}

fn position(texts: &[String], predicate: impl Fn(&str) -> bool) -> usize {
    texts
        .iter()
        .position(|t| predicate(t.as_str()))
        .unwrap_or_else(|| panic!("line not found in {:#?}", texts))
}

#[tokio::test]
async fn test_readme_and_echo_scenario() {
    let temp = TempDir::new().unwrap();
    let report = bootstrap(
        &temp,
        "demo",
        preset(
            vec![FileSpec::new("README.md", "# {{ project_name }}")],
            &["echo hello"],
        ),
    )
    .await;

    assert_eq!(report.outcome, Outcome::Succeeded);
    assert_eq!(
        std::fs::read_to_string(temp.path().join("demo/README.md")).unwrap(),
        "# demo"
    );

    let texts = report.texts();
    let dir = position(&texts, |t| t.starts_with("Creating project directory:"));
    let created = position(&texts, |t| t == "Created file: README.md");
    let running = position(&texts, |t| t == "Running: echo hello");
    let hello = position(&texts, |t| t == "hello");
    let completed = position(&texts, |t| t == "Command completed: echo hello");

    assert!(dir < created);
    assert!(created < running);
    assert!(running < hello);
    assert!(hello < completed);
}

#[tokio::test]
async fn test_failed_command_stops_remaining_commands() {
    let temp = TempDir::new().unwrap();
    let report = bootstrap(&temp, "failing", preset(vec![], &["exit 1", "echo never"])).await;

    let texts = report.texts();
    let running = position(&texts, |t| t == "Running: exit 1");
    let failed = position(&texts, |t| t.starts_with("Command failed") && t.contains("exit code 1"));
    assert!(running < failed);
    assert!(!texts.iter().any(|t| t == "Running: echo never"));

    match report.outcome {
        Outcome::Failed {
            step: Some(FailedStep::RunCommand { index, command }),
            ..
        } => {
            assert_eq!(index, 0);
            assert_eq!(command, "exit 1");
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
}

#[tokio::test]
async fn test_stdout_and_stderr_each_once() {
    let temp = TempDir::new().unwrap();
    let report = bootstrap(&temp, "streams", preset(vec![], &["echo out; echo err 1>&2"])).await;

    assert!(report.outcome.is_success());
    let texts = report.texts();
    assert_eq!(texts.iter().filter(|t| *t == "out").count(), 1);
    assert_eq!(texts.iter().filter(|t| *t == "ERR: err").count(), 1);

    let stderr_lines: Vec<_> = report.lines.iter().filter(|l| l.is_stderr()).collect();
    assert_eq!(stderr_lines.len(), 1);
    assert_eq!(stderr_lines[0].text, "err");
}

#[tokio::test]
async fn test_file_lines_follow_declaration_order() {
    let temp = TempDir::new().unwrap();
    let files = vec![
        FileSpec::new("z.txt", "z"),
        FileSpec::new("src/main.rs", "fn main() {}"),
        FileSpec::new("a/b/c.txt", "{{ project_name }}-{{ flavor }}"),
    ];
    let mut p = preset(files, &[]);
    p.variables.insert("flavor".to_string(), "vanilla".to_string());

    let report = bootstrap(&temp, "ordered", p).await;
    assert!(report.outcome.is_success());

    let created: Vec<String> = report
        .texts()
        .into_iter()
        .filter(|t| t.starts_with("Created file: "))
        .collect();
    assert_eq!(
        created,
        vec![
            "Created file: z.txt",
            "Created file: src/main.rs",
            "Created file: a/b/c.txt"
        ]
    );
    assert_eq!(
        std::fs::read_to_string(temp.path().join("ordered/a/b/c.txt")).unwrap(),
        "ordered-vanilla"
    );
}

#[tokio::test]
async fn test_write_failure_at_index_keeps_earlier_files_only() {
    let temp = TempDir::new().unwrap();
    let files = vec![
        FileSpec::new("first.txt", "1 {{ project_name }}"),
        FileSpec::new("second.txt", "2"),
        // Parent is a regular file, so this write fails
        FileSpec::new("first.txt/third.txt", "3"),
        FileSpec::new("fourth.txt", "4"),
    ];

    let report = bootstrap(&temp, "partial", preset(files, &["touch ran"])).await;
    let root = temp.path().join("partial");

    assert!(matches!(
        report.outcome,
        Outcome::Failed {
            step: Some(FailedStep::WriteFile { index: 2, .. }),
            ..
        }
    ));
    assert_eq!(
        std::fs::read_to_string(root.join("first.txt")).unwrap(),
        "1 partial"
    );
    assert!(root.join("second.txt").exists());
    assert!(!root.join("fourth.txt").exists());
    assert!(!root.join("ran").exists());
    assert!(!report.texts().iter().any(|t| t.starts_with("Running:")));
}

#[tokio::test]
async fn test_commands_run_strictly_in_sequence() {
    let temp = TempDir::new().unwrap();
    let report = bootstrap(
        &temp,
        "sequence",
        preset(
            vec![],
            &[
                "for i in 1 2 3; do echo a$i; echo e$i 1>&2; done",
                "echo second",
                "echo {{ project_name }} > name.txt",
            ],
        ),
    )
    .await;

    assert!(report.outcome.is_success());
    let texts = report.texts();

    let first_done = position(&texts, |t| t.starts_with("Command completed: for i"));
    let second_running = position(&texts, |t| t == "Running: echo second");
    let second_done = position(&texts, |t| t == "Command completed: echo second");
    let third_running = position(&texts, |t| t == "Running: echo sequence > name.txt");

    assert!(first_done < second_running);
    assert!(second_done < third_running);
    for line in ["a3", "ERR: e3"] {
        assert!(position(&texts, |t| t == line) < first_done);
    }
    assert_eq!(
        std::fs::read_to_string(temp.path().join("sequence/name.txt")).unwrap(),
        "sequence\n"
    );
}

#[tokio::test]
async fn test_username_reaches_commands() {
    let temp = TempDir::new().unwrap();
    let job = BootstrapJob::new(
        temp.path().join("gomod"),
        preset(vec![], &["echo github.com/{{ username }}/{{ project_name }}"]),
    )
    .unwrap()
    .with_username("alice");

    let report = Bootstrapper::default().run(job, CancelToken::new()).await;
    assert!(report.texts().iter().any(|t| t == "github.com/alice/gomod"));
}

#[tokio::test]
async fn test_cancel_kills_running_command() {
    let temp = TempDir::new().unwrap();
    let job = BootstrapJob::new(
        temp.path().join("cancelled"),
        preset(vec![], &["sleep 30", "touch after"]),
    )
    .unwrap();

    let cancel = CancelToken::new();
    let mut stream = Bootstrapper::default().start(job, cancel.clone());

    let mut texts = Vec::new();
    let mut outcome = None;
    let drained = tokio::time::timeout(Duration::from_secs(10), async {
        while let Some(event) = stream.next().await {
            match event {
                RunEvent::Log(line) => {
                    if line.text == "Running: sleep 30" {
                        cancel.cancel();
                    }
                    texts.push(line.to_string());
                }
                RunEvent::Finished(o) => outcome = Some(o),
            }
        }
    })
    .await;

    assert!(drained.is_ok(), "cancelled run should finish promptly");
    assert_eq!(outcome, Some(Outcome::Cancelled));
    assert!(!texts.iter().any(|t| t == "Running: touch after"));
    assert!(!temp.path().join("cancelled/after").exists());
}

#[tokio::test]
async fn test_cancel_while_background_job_keeps_output_open() {
    let temp = TempDir::new().unwrap();
    let job = BootstrapJob::new(
        temp.path().join("background"),
        preset(vec![], &["sleep 5 & echo started"]),
    )
    .unwrap();

    let cancel = CancelToken::new();
    let mut stream = Bootstrapper::default().start(job, cancel.clone());

    let mut texts = Vec::new();
    let mut outcome = None;
    let drained = tokio::time::timeout(Duration::from_secs(3), async {
        while let Some(event) = stream.next().await {
            match event {
                RunEvent::Log(line) => {
                    if line.text == "started" {
                        cancel.cancel();
                    }
                    texts.push(line.to_string());
                }
                RunEvent::Finished(o) => outcome = Some(o),
            }
        }
    })
    .await;

    assert!(drained.is_ok(), "cancel must not wait for the background job");
    assert_eq!(outcome, Some(Outcome::Cancelled));
    assert!(!texts.iter().any(|t| t.starts_with("Command completed")));
}

#[tokio::test]
async fn test_dropping_stream_kills_running_command() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("dropped");
    let job = BootstrapJob::new(&root, preset(vec![], &["sleep 30; touch after", "touch second"]))
        .unwrap();

    let mut stream = Bootstrapper::default().start(job, CancelToken::new());
    while let Some(event) = stream.next().await {
        if matches!(&event, RunEvent::Log(line) if line.text.starts_with("Running:")) {
            break;
        }
    }

    let task = stream.detach().expect("engine task");
    tokio::time::timeout(Duration::from_secs(5), task)
        .await
        .expect("engine should stop once the stream is dropped")
        .unwrap();

    assert!(!root.join("after").exists());
    assert!(!root.join("second").exists());
}

#[tokio::test]
async fn test_finished_is_last_event() {
    let temp = TempDir::new().unwrap();
    let job = BootstrapJob::new(temp.path().join("last"), preset(vec![], &["echo x"])).unwrap();
    let mut stream = Bootstrapper::default().start(job, CancelToken::new());

    let mut events = Vec::new();
    while let Some(event) = stream.next().await {
        events.push(event);
    }

    assert!(matches!(events.last(), Some(RunEvent::Finished(Outcome::Succeeded))));
    let finished = events
        .iter()
        .filter(|e| matches!(e, RunEvent::Finished(_)))
        .count();
    assert_eq!(finished, 1);
}
