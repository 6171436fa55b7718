//! テスト用の共通フィクスチャ

#![allow(clippy::unwrap_used)]

use rstest::fixture;

use crate::config::I18nSettings;
use crate::locale::{
    Localizer,
    MemoryLocaleSource,
    MemoryPreferences,
};
use crate::pipeline::{
    Dictionary,
    RuleSet,
    TranslationPipeline,
};

/// 組み込みルールと小さな辞書を持つパイプライン
#[fixture]
pub(crate) fn pipeline() -> TranslationPipeline {
    let dictionary = Dictionary::new(
        [
            ("Salvar", "Guardar"),
            ("Peso total das tarefas: 100", "Peso total: 100"),
            ("Equipe", "Equipo"),
        ],
        [("projeto", "proyecto"), ("tarefas", "tareas")],
    );
    let rules = RuleSet::portuguese_to_spanish().unwrap();
    TranslationPipeline::new(dictionary, rules)
}

/// pt/es のロケールバンドル
pub(crate) fn locale_documents() -> Vec<(String, String)> {
    vec![
        (
            "pt".to_string(),
            r#"{
                "menu": {"team": "Equipe", "reports": "Relatórios"},
                "greeting": "Olá, {{name}}",
                "actions": {"save": "Salvar"}
            }"#
            .to_string(),
        ),
        (
            "es".to_string(),
            r#"{
                "menu": {"team": "Equipo"},
                "greeting": "Hola, {{name}}",
                "actions": {"save": "Guardar"}
            }"#
            .to_string(),
        ),
    ]
}

/// メモリ上のバンドルとデフォルト設定を持つローカライザー
pub(crate) fn memory_localizer(
    preferences: MemoryPreferences,
) -> Localizer<MemoryLocaleSource, MemoryPreferences> {
    Localizer::new(
        MemoryLocaleSource::new(locale_documents()),
        preferences,
        I18nSettings::default(),
    )
}
