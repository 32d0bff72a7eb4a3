//! TRS Platformer: a software-rendered 3D platformer
//!
//! Everything is drawn by the CPU into a low resolution framebuffer:
//! - Triangle lists rebuilt every frame from model instances
//! - Whole-triangle frustum culling
//! - Painter's algorithm depth sorting (no depth buffer)
//! - Affine texture mapping from one atlas
//!
//! macroquad only opens the window, reads the keyboard and shows the
//! finished framebuffer scaled up.

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod config;
mod error;
mod game;
mod input;
mod rasterizer;
mod world;

use macroquad::prelude::*;
use config::{GameConfig, CONFIG_FILE};
use error::{fatal, AssetError};
use game::{Assets, Game, Viewport};
use input::InputState;
use rasterizer::{RenderContext, SoftwareRasterizer, Texture as Atlas, HEIGHT, WIDTH};
use world::load_level;

/// Longest simulated step; slower frames run in slow motion instead of tunnelling
const MAX_DELTA: f32 = 0.1;

fn window_conf() -> Conf {
    Conf {
        window_title: format!("TRS Platformer v{}", VERSION),
        window_width: WIDTH as i32 * 3,
        window_height: HEIGHT as i32 * 3,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

fn load_atlas(config: &GameConfig) -> Result<Atlas, AssetError> {
    match &config.atlas {
        Some(relative) => {
            let path = config.asset(relative);
            let atlas = Atlas::from_file(&path).map_err(AssetError::Image)?;
            log::info!("Loaded atlas {} ({}x{})", path.display(), atlas.width, atlas.height);
            Ok(atlas)
        }
        None => {
            log::info!("No atlas configured, using checkerboard");
            Ok(Atlas::checkerboard(
                128,
                128,
                rasterizer::Color::new(200, 200, 200),
                rasterizer::Color::new(120, 160, 120),
            ))
        }
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("=== TRS Platformer v{} ===", VERSION);

    let config = GameConfig::load(CONFIG_FILE).unwrap_or_else(|e| fatal("Loading config", e));
    let atlas = load_atlas(&config).unwrap_or_else(|e| fatal("Loading atlas", e));
    let assets = Assets::load(&config).unwrap_or_else(|e| fatal("Loading models", e));

    let level_path = config.asset(&config.level);
    let level = load_level(&level_path)
        .unwrap_or_else(|e| fatal(&format!("Loading level {}", level_path.display()), e));
    let mut game = Game::new(assets, &level, config.save_file.clone())
        .unwrap_or_else(|e| fatal(&format!("Building level {}", level.name), e));

    let mut ctx = RenderContext::new(config.width as f32, config.height as f32, config.projection(), atlas);
    let mut raster = SoftwareRasterizer::new(config.width, config.height, config.raster_settings());
    let mut input = InputState::new();

    loop {
        let dt = get_frame_time().min(MAX_DELTA);
        input.poll();

        if !game.update(&input, &mut ctx.camera, dt) {
            break;
        }

        ctx.begin_frame();
        game.draw(&mut ctx, dt);
        let frame = ctx.end_frame(&mut raster, true);
        game.draw_overlay(frame.surface, &ctx.camera);

        let (logical_w, logical_h) = (frame.width, frame.height);
        let fb = frame.surface;
        let texture = Texture2D::from_rgba8(fb.width as u16, fb.height as u16, &fb.pixels);
        texture.set_filter(FilterMode::Nearest);

        clear_background(BLACK);
        let view = Viewport::fit(logical_w, logical_h, screen_width(), screen_height());
        draw_texture_ex(
            &texture,
            view.x,
            view.y,
            WHITE,
            DrawTextureParams {
                dest_size: Some(Vec2::new(logical_w * view.scale, logical_h * view.scale)),
                ..Default::default()
            },
        );

        game.draw_hud(&view, logical_w, logical_h);
        game::draw_debug(&view, get_fps(), ctx.triangle_count());

        next_frame().await;
    }

    game.write_save();
    ctx.shutdown();
    log::info!("Goodbye");
}
