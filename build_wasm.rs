use std::fs;
use std::path::Path;
use std::process::Command;

fn main() {
    println!("🚀 Building hinamap WASM with demo HTML...");

    // 1. wasm-pack でビルド
    println!("📦 Running wasm-pack build...");
    let status = Command::new("wasm-pack")
        .args(&[
            "build",
            "--target",
            "web",
            "--out-dir",
            "pkg",
            "--no-default-features",
            "--features",
            "wasm",
        ])
        .status()
        .expect("Failed to execute wasm-pack");

    if !status.success() {
        eprintln!("❌ wasm-pack build failed");
        std::process::exit(1);
    }

    println!("✅ WASM build completed");

    let pkg_dir = if Path::new("pkg").exists() {
        Path::new("pkg")
    } else {
        Path::new(".")
    };

    // 2. デモページを生成
    println!("📝 Generating HTML file...");
    generate_demo_html(pkg_dir);

    println!("✅ HTML file generated:");
    println!("   - pkg/index.html");
    println!("\n🎉 Build complete! Serve pkg/ with any static file server.");
}

fn generate_demo_html(pkg_dir: &Path) {
    let html = r#"<!DOCTYPE html>
<html lang="ja">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>緊急避難所マップ</title>
    <link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css">
    <style>
        * {
            margin: 0;
            padding: 0;
            box-sizing: border-box;
        }
        html, body {
            width: 100%;
            height: 100%;
        }
        #map {
            width: 100%;
            height: calc(100% - 48px);
        }
        #controls {
            height: 48px;
            display: flex;
            align-items: center;
            gap: 8px;
            padding: 0 12px;
        }
        .status.error { color: #c0392b; }
        .status.success { color: #27ae60; }
    </style>
</head>
<body>
    <div id="controls">
        <input id="cityCode" placeholder="団体コード (6桁)" value="011002">
        <button id="loadData">表示</button>
        <button id="locate">現在地から探す</button>
        <span id="status" class="status"></span>
    </div>
    <div id="map"></div>
    <script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
    <script type="module">
        import init, { TutorialWidget, locate_city_code, marker_icon_json, popup_html } from './hinamap.js';

        await init();

        const map = L.map('map').setView([35.6762, 139.6503], 10);
        L.tileLayer('https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png', {
            attribution: '&copy; <a href="https://www.openstreetmap.org/copyright">OpenStreetMap</a> contributors',
            maxZoom: 19
        }).addTo(map);
        const markersLayer = L.layerGroup().addTo(map);

        async function loadShelters(cityCode) {
            const statusEl = document.getElementById('status');
            statusEl.textContent = 'データを読み込み中...';
            statusEl.className = 'status loading';
            try {
                const response = await fetch(`https://motohasystem.github.io/jp-shelter-api/api/v0/emergency/${cityCode}.json`);
                if (!response.ok) throw new Error(`データの取得に失敗しました (ステータス: ${response.status})`);
                const geojson = await response.json();
                markersLayer.clearLayers();
                const bounds = [];
                for (const feature of geojson.features ?? []) {
                    const json = JSON.stringify(feature);
                    const icon = JSON.parse(marker_icon_json(json, 'ring'));
                    const [lng, lat] = feature.geometry.coordinates;
                    L.marker([lat, lng], { icon: L.divIcon({ ...icon, className: 'custom-icon' }) })
                        .bindPopup(popup_html(json))
                        .addTo(markersLayer);
                    bounds.push([lat, lng]);
                }
                if (bounds.length > 0) map.fitBounds(bounds, { padding: [50, 50] });
                statusEl.textContent = `${bounds.length}件の緊急避難所を表示しました`;
                statusEl.className = 'status success';
            } catch (error) {
                statusEl.textContent = `エラー: ${error.message}`;
                statusEl.className = 'status error';
            }
        }

        document.getElementById('loadData').addEventListener('click', () => {
            loadShelters(document.getElementById('cityCode').value.trim());
        });
        document.getElementById('locate').addEventListener('click', () => {
            locate_city_code((code, error) => {
                if (error) {
                    const statusEl = document.getElementById('status');
                    statusEl.textContent = error;
                    statusEl.className = 'status error';
                    return;
                }
                document.getElementById('cityCode').value = code;
                loadShelters(code);
            });
        });
        loadShelters('011002');

        new TutorialWidget({ configUrl: './tutorial/config.json' }).init();
    </script>
</body>
</html>
"#;

    fs::write(pkg_dir.join("index.html"), html).expect("Failed to write index.html");
}
