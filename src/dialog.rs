//! ダイアログメッセージの翻訳

use std::fmt::Display;
use std::sync::Arc;

use crate::pipeline::TranslationPipeline;

/// アラート・確認ダイアログを表示するホスト
pub trait DialogHost {
    fn alert(&mut self, message: &str);

    /// ユーザーが承認したら `true`
    fn confirm(&mut self, message: &str) -> bool;
}

/// メッセージを翻訳してからホストに渡すダイアログ
#[derive(Debug, Clone)]
pub struct TranslatingDialogs<H> {
    /// 翻訳パイプライン
    pipeline: Arc<TranslationPipeline>,
    /// 元のホスト
    host: H,
}

impl<H: DialogHost> TranslatingDialogs<H> {
    #[must_use]
    pub const fn new(pipeline: Arc<TranslationPipeline>, host: H) -> Self {
        Self { pipeline, host }
    }

    /// 任意の値をテキストに変換し、翻訳して表示する
    pub fn alert(&mut self, message: impl Display) {
        let message = self.pipeline.translate_display(message);
        self.host.alert(&message);
    }

    pub fn confirm(&mut self, message: impl Display) -> bool {
        let message = self.pipeline.translate_display(message);
        self.host.confirm(&message)
    }

    #[must_use]
    pub const fn host(&self) -> &H {
        &self.host
    }

    /// 元のホストを取り出す
    #[must_use]
    pub fn into_inner(self) -> H {
        self.host
    }
}
