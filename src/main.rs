//! ネイティブ用のデモ。団体コードまたは地点を指定して避難所を取得し、
//! 各避難所のマーカーレイアウトを端末に表示する

use colored::*;

use hinamap::app::LogStatus;
use hinamap::shelter::disaster::disaster_types;
use hinamap::{ApiError, AppContext, LayoutStrategy, RecordingMap, layout_ring_icons};

fn main() {
    let cli_args = hinamap::parse_args();
    hinamap::init_logger(&cli_args.log_level);

    let runtime = tokio::runtime::Runtime::new().expect("Failed to start tokio runtime");
    if let Err(e) = runtime.block_on(run(&cli_args)) {
        eprintln!("{}", e.user_message().red().bold());
        std::process::exit(1);
    }
}

async fn run(cli_args: &hinamap::CliArgs) -> Result<(), ApiError> {
    let mut context = AppContext::new(RecordingMap::default(), cli_args.strategy);
    let mut status = LogStatus;

    let collection = match cli_args.near {
        Some(at) => context.load_shelters_near(at, &mut status).await?,
        None => context.load_shelters(&cli_args.city_code, &mut status).await?,
    };

    println!(
        "{}",
        format!("緊急避難所 {}件", context.map.markers.len())
            .green()
            .bold()
    );

    for feature in &collection.features {
        let at = feature.latlng();
        let disasters = disaster_types(&feature.properties);
        let glyphs: String = disasters.iter().map(|d| d.glyph()).collect();

        println!(
            "{} ({:.5}, {:.5}) {}",
            feature.name().bold(),
            at.lat,
            at.lng,
            glyphs
        );

        if cli_args.strategy == LayoutStrategy::ConcentricRing {
            let layout = layout_ring_icons(&disasters);
            for icon in &layout.icons {
                println!(
                    "    {:>6.1}° r={:>2.0}px ({:+7.1}, {:+7.1}) {} {}",
                    icon.angle_deg,
                    icon.radius,
                    icon.dx,
                    icon.dy,
                    icon.disaster.glyph(),
                    icon.disaster.label().dimmed()
                );
            }
        }
    }

    Ok(())
}
