//! ユニットテスト用のモック

use crate::error::OpError;
use crate::ops::{BuildOptions, Execution, ImageOps};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// 記録された呼び出し
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Build { name: String, context: PathBuf },
    Push(String),
    Tag(String, String),
}

/// イメージ名ごとに成否を台本として与えるモック
///
/// 台本が尽きた名前は成功扱い。
#[derive(Default)]
pub(crate) struct ScriptedOps {
    script: Mutex<HashMap<String, VecDeque<bool>>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedOps {
    pub fn new() -> Self {
        Self::default()
    }

    /// `name` に対する操作結果を順番に設定
    pub fn script(self, name: &str, outcomes: &[bool]) -> Self {
        self.script
            .lock()
            .unwrap()
            .insert(name.to_string(), outcomes.iter().copied().collect());
        self
    }

    pub fn always_fail(self, name: &str) -> Self {
        self.script(name, &[false; 64])
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn attempts(&self, name: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| match call {
                Call::Build { name: n, .. } => n == name,
                Call::Push(n) => n == name,
                Call::Tag(n, _) => n == name,
            })
            .count()
    }

    fn outcome(&self, key: &str, output: String) -> Execution {
        let ok = self
            .script
            .lock()
            .unwrap()
            .get_mut(key)
            .and_then(|queue| queue.pop_front())
            .unwrap_or(true);

        if ok {
            Execution::success(output)
        } else {
            Execution::failure(output, OpError::Failed(format!("{} failed", key)))
        }
    }
}

#[async_trait]
impl ImageOps for ScriptedOps {
    async fn build(&self, name: &str, context: &Path, _options: BuildOptions) -> Execution {
        self.calls.lock().unwrap().push(Call::Build {
            name: name.to_string(),
            context: context.to_path_buf(),
        });
        self.outcome(name, format!("built {}", name))
    }

    async fn push(&self, name: &str) -> Execution {
        self.calls.lock().unwrap().push(Call::Push(name.to_string()));
        self.outcome(name, format!("pushed {}", name))
    }

    async fn tag(&self, name: &str, alias: &str) -> Execution {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Tag(name.to_string(), alias.to_string()));
        self.outcome(alias, format!("tagged {} as {}", name, alias))
    }
}
