//! Renders a demo scene into an offscreen texture and reports batching stats.
//!
//! Usage: `nanodraw-headless [--font <path.ttf>] [--frames <n>]`

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use nanodraw::logging::{LoggingConfig, init_logging};
use nanodraw::render::{WgpuConfig, WgpuRasterizer};
use nanodraw::text::{CONSOLE_BITMAP_LEN, FontId};
use nanodraw::{Color, DrawConfig, DrawEngine};

const WIDTH: u32 = 640;
const HEIGHT: u32 = 360;
const ATLAS_SIZE: u32 = 512;

/// Offscreen nanodraw demo
#[derive(Parser, Debug)]
#[command(name = "nanodraw-headless")]
#[command(about = "Renders a demo scene offscreen and logs batching stats")]
struct Args {
    /// TrueType/OpenType font for the body line
    #[arg(long)]
    font: Option<PathBuf>,

    /// Number of frames to render
    #[arg(long, default_value_t = 1)]
    frames: u32,
}

/// Console bitmap with a hollow box in every cell, so text is visible
/// without shipping a font file.
fn box_console_bitmap() -> Vec<u8> {
    let glyph = [0xFF, 0x81, 0x81, 0x81, 0x81, 0x81, 0xFF, 0x00];
    let mut bitmap = Vec::with_capacity(CONSOLE_BITMAP_LEN);
    while bitmap.len() < CONSOLE_BITMAP_LEN {
        bitmap.extend_from_slice(&glyph);
    }
    bitmap
}

fn draw_scene(engine: &mut DrawEngine<WgpuRasterizer>, console: FontId, body: Option<FontId>, frame: u32) {
    engine.begin(WIDTH as f32, HEIGHT as f32);

    // ── background panels ──────────────────────────────────────────────────
    let panel = Color::from_hex_rgb(0x1E2430);
    for i in 0..8 {
        engine.set_color(if i % 2 == 0 { panel } else { panel.lighten(0.1) });
        engine.draw_rect(0.0, i as f32 * 45.0, WIDTH as f32, 45.0);
    }

    // ── outlines and lines ─────────────────────────────────────────────────
    engine.set_stroke_color(Color::ORANGE);
    engine.set_stroke_width(2.0);
    engine.stroke_rect(16.0, 16.0, WIDTH as f32 - 32.0, HEIGHT as f32 - 32.0);
    engine.set_stroke_width(1.0);
    engine.set_stroke_color(Color::CYAN.darken(0.3));
    for i in 0..16 {
        let x = 32.0 + i as f32 * 36.0;
        engine.draw_line(x, 300.0, x + 18.0, 330.0);
    }

    // ── text ───────────────────────────────────────────────────────────────
    engine.set_color(Color::WHITE);
    let label = format!("frame {frame}");
    engine.draw_text(console, &label, 32.0, 32.0);
    engine.draw_text_scaled(console, "nanodraw", 32.0, 48.0, 2.0);

    if let Some(font) = body {
        engine.set_color(Color::YELLOW);
        let text = "The quick brown fox jumps over the lazy dog";
        let bounds = engine.measure_text(font, text);
        let x = (WIDTH as f32 - bounds.width()) * 0.5;
        engine.draw_text(font, text, x, 180.0);

        let line_height = engine.fonts().atlas(font).map_or(24.0, |a| a.line_height());
        engine.set_color(Color::LIGHT_GRAY);
        engine.draw_text(font, "0123456789 !?", x, 180.0 + line_height);
    }

    let stats = engine.end();
    log::info!(
        "frame {frame}: {} submissions, {} vertices ({} key flushes, {} overflow flushes)",
        stats.submissions,
        stats.vertices,
        stats.key_flushes,
        stats.overflow_flushes
    );
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());
    let args = Args::parse();

    let config = WgpuConfig {
        clear_color: Some(Color::from_hex_rgb(0x101318)),
        ..WgpuConfig::default()
    };
    let target_format = config.target_format;
    let raster = WgpuRasterizer::new_headless(config).context("failed to create headless GPU device")?;

    let target = raster.device().create_texture(&wgpu::TextureDescriptor {
        label: Some("nanodraw-headless target"),
        size: wgpu::Extent3d { width: WIDTH, height: HEIGHT, depth_or_array_layers: 1 },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: target_format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
        view_formats: &[],
    });

    let mut engine = DrawEngine::create(raster, DrawConfig::default()).context("failed to create draw engine")?;
    engine
        .raster_mut()
        .set_target(target.create_view(&wgpu::TextureViewDescriptor::default()));

    let console = engine
        .load_console_font("boxes", &box_console_bitmap())
        .context("failed to load console font")?;

    let body = match &args.font {
        Some(path) => {
            let mut atlas = vec![0u8; (ATLAS_SIZE * ATLAS_SIZE) as usize];
            let id = engine
                .load_font_file(path, 24.0, &mut atlas, ATLAS_SIZE, ATLAS_SIZE)
                .with_context(|| format!("failed to load font '{}'", path.display()))?;
            Some(id)
        }
        None => None,
    };

    for frame in 0..args.frames {
        draw_scene(&mut engine, console, body, frame);
    }

    log::info!("rendered {} frame(s) into a {WIDTH}x{HEIGHT} target", args.frames);
    Ok(())
}
