use crate::report::Report;
use kiln_core::ImageDefinition;

/// ワーカーがジョブに対して行う処理
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pipeline {
    /// イメージをビルドし、宣言されたテストを実行する
    Test,
    /// イメージをレジストリにプッシュする
    Push,
}

impl Pipeline {
    /// レポートの見出し
    pub fn header(&self, image_name: &str) -> String {
        match self {
            Pipeline::Test => format!("# Tested image `{}`\n\n## Build Log\n\n", image_name),
            Pipeline::Push => format!("# Pushed image `{}`\n\n## Push Log\n\n", image_name),
        }
    }
}

/// 1イメージ分の処理単位
///
/// Dispatcher が作成し、受け取ったワーカーが所有する。
/// Reporter に渡した後は変更されない（所有権ごと移動する）。
#[derive(Debug)]
pub struct Job {
    pub id: usize,
    pub image: ImageDefinition,
    pub retries: u32,
    pub pipeline: Pipeline,
    pub success: bool,
    pub report: Report,
}

impl Job {
    pub fn new(id: usize, image: ImageDefinition, retries: u32, pipeline: Pipeline) -> Self {
        Self {
            id,
            image,
            retries,
            pipeline,
            success: false,
            report: Report::new(),
        }
    }

    /// 結果を確定させる
    pub fn finish(mut self, success: bool, report: Report) -> Self {
        self.success = success;
        self.report = report;
        self
    }
}
