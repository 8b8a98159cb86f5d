use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub struct TestProject {
    pub root: TempDir,
}

#[allow(dead_code)]
impl TestProject {
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        Self { root }
    }

    pub fn write_inventory(&self, content: &str) -> PathBuf {
        let path = self.root.path().join("inventory.yml");
        fs::write(&path, content).unwrap();
        path
    }

    /// ビルドコンテキスト（Dockerfile 付き）を作成
    pub fn write_context(&self, dir: &str, dockerfile: &str) -> PathBuf {
        let path = self.root.path().join(dir);
        fs::create_dir_all(&path).unwrap();
        fs::write(path.join("Dockerfile"), dockerfile).unwrap();
        path
    }

    /// 引数を echo し、`FAIL_ON` を含む呼び出しだけ失敗する docker 代替スクリプト
    #[cfg(unix)]
    pub fn fake_docker(&self, fail_on: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let bin_dir = self.root.path().join("bin");
        fs::create_dir_all(&bin_dir).unwrap();
        let script = bin_dir.join("docker");
        fs::write(
            &script,
            format!(
                "#!/bin/sh\necho \"docker $*\"\ncase \"$*\" in\n  *'{}'*) echo 'boom' >&2; exit 1 ;;\nesac\nexit 0\n",
                fail_on
            ),
        )
        .unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
        script
    }

    pub fn path(&self) -> PathBuf {
        self.root.path().to_path_buf()
    }
}
