pub mod api;
pub mod app;
pub mod map;
pub mod marker;
pub mod shelter;
pub mod tutorial;
#[cfg(target_arch = "wasm32")]
pub mod wasm_entry;

use log::info;

pub use api::ApiError;
pub use app::context::{AppContext, display_shelters, popup_content};
pub use map::{LatLng, MapAdapter, RecordingMap};
pub use marker::icon::{LayoutStrategy, MarkerIcon, build_marker_icon};
pub use marker::layout::{MarkerLayout, RingIcon, layout_ring_icons};
pub use tutorial::state::TutorialSession;

/// 既定で読み込む札幌市の団体コード
pub const DEFAULT_CITY_CODE: &str = "011002";

// ========================================
// コマンドライン引数構造体
// ========================================

/// コマンドライン引数の設定
#[derive(Debug)]
pub struct CliArgs {
    /// 表示する市区町村の団体コード(6桁)
    pub city_code: String,
    /// 団体コードの代わりに地点から市区町村を特定する
    pub near: Option<LatLng>,
    pub strategy: LayoutStrategy,
    pub quiet: bool, // panic以外のログを抑制
    pub log_level: LogLevel,
}

#[derive(Debug, Clone)]
pub enum LogLevel {
    Off,   // ログを一切表示しない(panicは除く)
    Error, // エラーレベルのみ
    Warn,  // 警告レベル以上
    Info,  // 情報レベル以上
    Debug, // デバッグレベル以上
    Trace, // 全てのログ
}

impl Default for CliArgs {
    fn default() -> Self {
        Self {
            city_code: DEFAULT_CITY_CODE.to_string(),
            near: None,
            strategy: LayoutStrategy::ConcentricRing,
            quiet: false,
            log_level: LogLevel::Info,
        }
    }
}

pub fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli_args = CliArgs::default();

    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "--strategy=combined" => cli_args.strategy = LayoutStrategy::Combined,
            "--strategy=ring" => cli_args.strategy = LayoutStrategy::ConcentricRing,
            "--quiet" | "-q" => {
                cli_args.quiet = true;
                cli_args.log_level = LogLevel::Off;
            }
            "--log-level=off" => cli_args.log_level = LogLevel::Off,
            "--log-level=error" => cli_args.log_level = LogLevel::Error,
            "--log-level=warn" => cli_args.log_level = LogLevel::Warn,
            "--log-level=info" => cli_args.log_level = LogLevel::Info,
            "--log-level=debug" => cli_args.log_level = LogLevel::Debug,
            "--log-level=trace" => cli_args.log_level = LogLevel::Trace,
            "--help" | "-h" => {
                show_help();
                std::process::exit(0);
            }
            other if other.starts_with("--near=") => {
                let mut parts = other["--near=".len()..].splitn(2, ',');
                let lat = parts.next().and_then(|s| s.trim().parse().ok());
                let lng = parts.next().and_then(|s| s.trim().parse().ok());
                if let (Some(lat), Some(lng)) = (lat, lng) {
                    cli_args.near = Some(LatLng { lat, lng });
                } else {
                    log::warn!("--nearは 緯度,経度 の形式で指定してください: {}", other);
                }
            }
            other => {
                // 最初の非フラグ引数を団体コードとして扱う
                if !other.starts_with('-') {
                    cli_args.city_code = other.to_string();
                }
            }
        }
    }
    cli_args
}

pub fn show_help() {
    info!(
        "hinamap - 緊急避難所マップ

USAGE:
    hinamap [CITY_CODE] [OPTIONS]

ARGS:
    CITY_CODE                6桁の団体コード (default: 011002 札幌市)

OPTIONS:
    --near=LAT,LNG           Resolve the city from a location instead of a code
    --strategy=TYPE          Set marker icon strategy (combined/ring, default: ring)
    --quiet, -q              Suppress all logs except panics
    --log-level=LEVEL        Set log level (off/error/warn/info/debug/trace)
    --help, -h               Show this help"
    );
}

/// ログレベルを初期化する関数
pub fn init_logger(log_level: &LogLevel) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::sync::Once;

    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let level = match log_level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        };

        let mut builder = Builder::from_default_env();

        if matches!(log_level, LogLevel::Off) {
            // quietモードの場合、何も出力しない(panicは別途処理される)
            builder
                .filter_level(LevelFilter::Off)
                .format(|_, _| Ok(()))
                .try_init()
                .ok(); // エラーを無視
        } else {
            builder
                .filter_level(level)
                // HTTPクライアント関連のInfoログを抑制
                .filter_module("reqwest", LevelFilter::Warn)
                .filter_module("hyper", LevelFilter::Warn)
                .filter_module("rustls", LevelFilter::Warn)
                .format_timestamp_secs()
                .try_init()
                .ok(); // エラーを無視
        }
    });
}
