use async_trait::async_trait;
use kiln_build::{BuildOptions, Execution, ImageOps, OpError};
use kiln_core::ImageDefinition;
use std::collections::{HashMap, VecDeque};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

/// ワークスペースの中身を記録する
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct Sample {
    pub image: String,
    pub context: PathBuf,
    pub marker_before: Option<String>,
    pub marker_after: Option<String>,
    pub files: Vec<String>,
}

/// 台本どおりに成否を返し、テストビルド時のワークスペースを観測するモック
#[derive(Default)]
pub struct FakeOps {
    script: Mutex<HashMap<String, VecDeque<bool>>>,
    attempts: Mutex<HashMap<String, usize>>,
    samples: Mutex<Vec<Sample>>,
    delay: Duration,
    panic_on: Option<String>,
}

#[allow(dead_code)]
impl FakeOps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// `name` のビルドでパニックする
    pub fn panic_on(mut self, name: &str) -> Self {
        self.panic_on = Some(name.to_string());
        self
    }

    pub fn script(self, name: &str, outcomes: &[bool]) -> Self {
        self.script
            .lock()
            .unwrap()
            .insert(name.to_string(), outcomes.iter().copied().collect());
        self
    }

    pub fn always_fail(self, name: &str) -> Self {
        self.script(name, &[false; 32])
    }

    pub fn attempts(&self, name: &str) -> usize {
        self.attempts
            .lock()
            .unwrap()
            .get(name)
            .copied()
            .unwrap_or(0)
    }

    pub fn samples(&self) -> Vec<Sample> {
        self.samples.lock().unwrap().clone()
    }

    fn outcome(&self, name: &str, output: String) -> Execution {
        *self
            .attempts
            .lock()
            .unwrap()
            .entry(name.to_string())
            .or_insert(0) += 1;

        let ok = self
            .script
            .lock()
            .unwrap()
            .get_mut(name)
            .and_then(|queue| queue.pop_front())
            .unwrap_or(true);

        if ok {
            Execution::success(output)
        } else {
            Execution::failure(output, OpError::Failed("exit status: 1".to_string()))
        }
    }
}

fn read_marker(context: &Path) -> Option<String> {
    fs::read_to_string(context.join("marker.txt")).ok()
}

#[async_trait]
impl ImageOps for FakeOps {
    async fn build(&self, name: &str, context: &Path, _options: BuildOptions) -> Execution {
        if self.panic_on.as_deref() == Some(name) {
            panic!("build of {} exploded", name);
        }
        if name.contains("-test") {
            let marker_before = read_marker(context);
            let mut files: Vec<String> = fs::read_dir(context)
                .map(|entries| {
                    entries
                        .filter_map(|entry| entry.ok())
                        .map(|entry| entry.file_name().to_string_lossy().into_owned())
                        .collect()
                })
                .unwrap_or_default();
            files.sort();

            tokio::time::sleep(self.delay).await;

            let marker_after = read_marker(context);
            let image = name.split("-test").next().unwrap_or_default().to_string();
            self.samples.lock().unwrap().push(Sample {
                image,
                context: context.to_path_buf(),
                marker_before,
                marker_after,
                files,
            });
        } else {
            tokio::time::sleep(self.delay).await;
        }

        self.outcome(name, format!("Successfully tagged {}", name))
    }

    async fn push(&self, name: &str) -> Execution {
        self.outcome(name, format!("pushed {}", name))
    }

    async fn tag(&self, name: &str, alias: &str) -> Execution {
        self.outcome(alias, format!("tagged {} as {}", name, alias))
    }
}

/// Reporter の出力を取り出せるバッファ
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// イメージとテストコンテキストを並べた一時プロジェクト
pub struct TestProject {
    pub root: TempDir,
}

#[allow(dead_code)]
impl TestProject {
    pub fn new() -> Self {
        Self {
            root: tempfile::tempdir().unwrap(),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.root.path().to_path_buf()
    }

    pub fn workspace_root(&self) -> PathBuf {
        self.root.path().join(".kiln-work")
    }

    /// `dir` にテストコンテキストを作成（marker.txt に `marker` を書く）
    pub fn write_test(&self, dir: &str, dockerfile: &str, marker: &str) -> PathBuf {
        let path = self.root.path().join(dir);
        fs::create_dir_all(&path).unwrap();
        fs::write(path.join("Dockerfile"), dockerfile).unwrap();
        fs::write(path.join("marker.txt"), marker).unwrap();
        path
    }

    pub fn image(&self, name: &str) -> ImageDefinition {
        ImageDefinition::new(name, self.root.path().join(name))
    }
}
