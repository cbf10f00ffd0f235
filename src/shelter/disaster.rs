use serde_json::{Map, Value};

/// 避難所が対応しうる災害種別(8分類)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisasterType {
    /// 洪水
    Flood,
    /// 崖崩れ、土石流及び地滑り
    Landslide,
    /// 高潮
    StormSurge,
    /// 地震
    Earthquake,
    /// 津波
    Tsunami,
    /// 大規模な火事
    MajorFire,
    /// 内水氾濫
    InlandFlooding,
    /// 火山現象
    Volcanic,
}

/// APIのプロパティに現れる順の全種別
pub const ALL_DISASTER_TYPES: [DisasterType; 8] = [
    DisasterType::Flood,
    DisasterType::Landslide,
    DisasterType::StormSurge,
    DisasterType::Earthquake,
    DisasterType::Tsunami,
    DisasterType::MajorFire,
    DisasterType::InlandFlooding,
    DisasterType::Volcanic,
];

impl DisasterType {
    /// 日本語名。避難所データのプロパティキーを兼ねる
    pub fn label(self) -> &'static str {
        match self {
            DisasterType::Flood => "洪水",
            DisasterType::Landslide => "崖崩れ、土石流及び地滑り",
            DisasterType::StormSurge => "高潮",
            DisasterType::Earthquake => "地震",
            DisasterType::Tsunami => "津波",
            DisasterType::MajorFire => "大規模な火事",
            DisasterType::InlandFlooding => "内水氾濫",
            DisasterType::Volcanic => "火山現象",
        }
    }

    /// 表示用グリフ。洪水と津波はどちらも🌊
    pub fn glyph(self) -> &'static str {
        match self {
            DisasterType::Flood => "🌊",
            DisasterType::Landslide => "⛰️",
            DisasterType::StormSurge => "🌀",
            DisasterType::Earthquake => "🏚️",
            DisasterType::Tsunami => "🌊",
            DisasterType::MajorFire => "🔥",
            DisasterType::InlandFlooding => "💧",
            DisasterType::Volcanic => "🌋",
        }
    }
}

/// featureのpropertiesから対応災害種別を抽出する。
/// 値が文字列の"1"のものだけを対応扱いとし、列挙順を保つ
pub fn disaster_types(properties: &Map<String, Value>) -> Vec<DisasterType> {
    ALL_DISASTER_TYPES
        .iter()
        .copied()
        .filter(|d| properties.get(d.label()).and_then(Value::as_str) == Some("1"))
        .collect()
}
