use texbox::config::{Compiler, Config};
use texbox::runner::{CompileJob, Runner};
use texbox::workspace::Workspace;

use crate::{fixture_source, test_config};

fn runner_in(root: &std::path::Path) -> Runner {
    Runner::new(Config {
        work_root: Some(root.to_path_buf()),
        ..test_config()
    })
}

#[tokio::test]
async fn test_workspace_write_and_read_file() {
    let root = tempfile::tempdir().unwrap();
    let workspace = Workspace::create(Some(root.path()), false).expect("Failed to create workspace");

    workspace
        .write_file("figures/plot.txt", b"data")
        .await
        .expect("Failed to write file");
    assert!(workspace.file_exists("figures/plot.txt").await.unwrap());
    assert_eq!(workspace.read_file("figures/plot.txt").await.unwrap(), b"data");

    let path = workspace.path().to_path_buf();
    workspace.cleanup().expect("Failed to cleanup");
    assert!(!path.exists());
}

#[tokio::test]
#[ignore = "requires a TeX installation"]
async fn test_successful_job_leaves_nothing_behind() {
    let root = tempfile::tempdir().unwrap();
    let runner = runner_in(root.path());

    runner
        .run_job(&CompileJob::new(Compiler::Pdflatex, fixture_source("hello.tex")))
        .await
        .expect("Compilation failed");

    assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
}

#[tokio::test]
#[ignore = "requires a TeX installation"]
async fn test_failed_job_leaves_nothing_behind() {
    let root = tempfile::tempdir().unwrap();
    let runner = runner_in(root.path());

    let _ = runner
        .run_job(&CompileJob::new(
            Compiler::Pdflatex,
            fixture_source("undefined_control.tex"),
        ))
        .await;

    assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
}

#[tokio::test]
#[ignore = "requires a TeX installation"]
async fn test_concurrent_jobs_are_isolated() {
    let root = tempfile::tempdir().unwrap();
    let runner = runner_in(root.path());
    let job = CompileJob::new(Compiler::Pdflatex, fixture_source("hello.tex"));

    let (a, b) = tokio::join!(runner.run_job(&job), runner.run_job(&job));

    assert!(a.expect("first job failed").artifact.starts_with(b"%PDF"));
    assert!(b.expect("second job failed").artifact.starts_with(b"%PDF"));
    assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
}
