//! docker CLI ラッパー
//!
//! `docker build` / `docker push` / `docker tag` を子プロセスとして実行する。

use crate::error::OpError;
use crate::ops::{BuildOptions, Execution, ImageOps};
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

/// docker CLI を使う [`ImageOps`] 実装
#[derive(Debug, Clone)]
pub struct DockerCli {
    program: String,
}

impl Default for DockerCli {
    fn default() -> Self {
        Self::new()
    }
}

impl DockerCli {
    pub fn new() -> Self {
        Self::with_program("docker")
    }

    /// 実行ファイルを差し替える（podman 等）
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// コマンドを実行し、stdout と stderr を結合して返す
    async fn run_command(&self, dir: Option<&Path>, args: &[&str]) -> Execution {
        let mut cmd = Command::new(&self.program);
        cmd.args(args);
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        if let Some(dir) = dir {
            cmd.current_dir(dir);
        }

        tracing::debug!(
            dir = ?dir,
            "Running: {} {}",
            self.program,
            args.join(" ")
        );

        let output = match cmd.output().await {
            Ok(output) => output,
            Err(source) => {
                return Execution::failure(
                    String::new(),
                    OpError::Spawn {
                        program: self.program.clone(),
                        source,
                    },
                );
            }
        };

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        if output.status.success() {
            Execution::success(combined)
        } else {
            Execution::failure(combined, OpError::Exit(output.status))
        }
    }
}

#[async_trait]
impl ImageOps for DockerCli {
    async fn build(&self, name: &str, context: &Path, options: BuildOptions) -> Execution {
        let mut args = vec!["build", "-t", name];
        if !options.cache {
            args.push("--no-cache");
        }
        args.push(".");

        self.run_command(Some(context), &args).await
    }

    async fn push(&self, name: &str) -> Execution {
        self.run_command(None, &["push", name]).await
    }

    async fn tag(&self, name: &str, alias: &str) -> Execution {
        self.run_command(None, &["tag", name, alias]).await
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::tempdir;

    /// 引数と作業ディレクトリを出力し、FAKE_EXIT で終了するスクリプト
    fn fake_docker(dir: &Path, exit_code: i32) -> String {
        let script = dir.join("fake-docker");
        fs::write(
            &script,
            format!(
                "#!/bin/sh\necho \"args: $*\"\necho \"pwd: $(pwd)\"\necho oops >&2\nexit {}\n",
                exit_code
            ),
        )
        .unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
        script.to_string_lossy().into_owned()
    }

    #[tokio::test]
    async fn test_build_passes_tag_and_runs_in_context() {
        let bin_dir = tempdir().unwrap();
        let context = tempdir().unwrap();
        let docker = DockerCli::with_program(fake_docker(bin_dir.path(), 0));

        let execution = docker
            .build("base", context.path(), BuildOptions { cache: false })
            .await;

        assert!(execution.is_success());
        assert!(execution.output.contains("args: build -t base --no-cache ."));
        let canonical = fs::canonicalize(context.path()).unwrap();
        assert!(
            execution
                .output
                .contains(&format!("pwd: {}", canonical.display()))
        );
        // stderr は stdout の後ろに連結される
        assert!(execution.output.ends_with("oops\n"));
    }

    #[tokio::test]
    async fn test_build_with_cache_omits_flag() {
        let bin_dir = tempdir().unwrap();
        let docker = DockerCli::with_program(fake_docker(bin_dir.path(), 0));

        let execution = docker
            .build("base", bin_dir.path(), BuildOptions::default())
            .await;

        assert!(execution.output.contains("args: build -t base .\n"));
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_failure_with_output() {
        let bin_dir = tempdir().unwrap();
        let docker = DockerCli::with_program(fake_docker(bin_dir.path(), 3));

        let execution = docker.push("base").await;

        assert!(execution.output.contains("args: push base"));
        match execution.result {
            Err(OpError::Exit(status)) => assert_eq!(status.code(), Some(3)),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_tag_arguments() {
        let bin_dir = tempdir().unwrap();
        let docker = DockerCli::with_program(fake_docker(bin_dir.path(), 0));

        let execution = docker.tag("base", "example/base:latest").await;

        assert!(execution.output.contains("args: tag base example/base:latest"));
    }

    #[tokio::test]
    async fn test_missing_program_is_spawn_error() {
        let docker = DockerCli::with_program("/nonexistent/kiln-docker");

        let execution = docker.push("base").await;

        assert!(execution.output.is_empty());
        assert!(matches!(execution.result, Err(OpError::Spawn { .. })));
    }

    /// 実際の Docker デーモンが必要
    #[tokio::test]
    #[ignore]
    async fn test_real_docker_builds_scratch_image() {
        let context = tempdir().unwrap();
        fs::write(context.path().join("Dockerfile"), "FROM scratch\nLABEL kiln=test\n").unwrap();
        let docker = DockerCli::new();

        let execution = docker
            .build("kiln-ignored-test", context.path(), BuildOptions::default())
            .await;

        assert!(execution.is_success(), "{}", execution.output);
    }
}
