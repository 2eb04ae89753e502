use std::path::PathBuf;

use anyhow::{Context, Result};
use harf_config::FileStore;
use harf_dom::{Document, Viewport};
use harf_engine::Engine;
use tracing::info;

/// Drives the engine over a saved HTML page on a simulated clock, then
/// prints the restyled document to stdout.
///
/// Usage: demo-app <page.html> [--url=https://host/path] [--viewport=1280]
///        [--ticks=20] [--settings=harf.toml] [--no-enable]
fn main() -> Result<()> {
    use tracing_subscriber::{EnvFilter, FmtSubscriber};
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    let mut page_path: Option<PathBuf> = None;
    let mut page_url: Option<String> = None;
    let mut viewport_width = 1280.0_f64;
    let mut ticks: u64 = 20;
    let mut settings_path = PathBuf::from("harf.toml");
    let mut enable_site = true;

    for arg in std::env::args().skip(1) {
        if let Some(value) = arg.strip_prefix("--url=") {
            page_url = Some(value.to_string());
        } else if let Some(value) = arg.strip_prefix("--viewport=") {
            viewport_width = value.parse().context("--viewport expects a number")?;
        } else if let Some(value) = arg.strip_prefix("--ticks=") {
            ticks = value.parse().context("--ticks expects an integer")?;
        } else if let Some(value) = arg.strip_prefix("--settings=") {
            settings_path = PathBuf::from(value);
        } else if arg == "--no-enable" {
            enable_site = false;
        } else {
            page_path = Some(PathBuf::from(arg));
        }
    }

    let page_path = page_path.context("usage: demo-app <page.html> [--url=...] [--ticks=N]")?;
    let page = std::fs::read_to_string(&page_path)
        .with_context(|| format!("failed to read page '{}'", page_path.display()))?;
    let page_url = page_url.unwrap_or_else(|| {
        let name = page_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "page".to_string());
        format!("https://demo.local/{name}")
    });

    let mut doc = Document::parse(
        &page,
        Viewport {
            width: viewport_width,
        },
    );
    let mut engine = Engine::new(&page_url, Box::new(FileStore::new(&settings_path)));
    engine.load_settings(0);
    if enable_site {
        engine.enable_current_site(&mut doc, 0);
    }

    let mut total = 0;
    for now in 0..=ticks {
        total += engine.tick(&mut doc, now);
    }

    let status = engine.status();
    info!(
        total,
        site = %status.current_site,
        site_enabled = status.site_enabled,
        "run finished"
    );
    println!("{}", doc.to_html());
    Ok(())
}
