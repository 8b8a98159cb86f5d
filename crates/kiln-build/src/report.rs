//! ジョブごとのレポート（Markdown）

use std::fmt;

/// 追記専用のレポートテキスト
///
/// 1つのジョブを処理するワーカーだけが書き込み、最後に Reporter が
/// まとめて1回で出力する。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    text: String,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, text: impl AsRef<str>) {
        self.text.push_str(text.as_ref());
    }

    /// コマンドの結合出力をコードブロックとして追記
    pub fn command_output(&mut self, output: &str) {
        self.text.push_str(&format!("```\n{}\n```\n\n", output));
    }

    /// 失敗した試行と残りリトライ回数を追記
    pub fn attempt_failed(&mut self, error: &dyn fmt::Display, remaining: u32) {
        self.text.push_str(&format!(
            "**Failed** with error: `{}`\nRetries Remaining: {}",
            error, remaining
        ));
        if remaining == 0 {
            self.text.push_str("... Moving on");
        }
        self.text.push_str("\n\n");
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
