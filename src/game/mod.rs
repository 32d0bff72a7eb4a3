//! Game rooms: title menu and level session
//!
//! The level document is built into a template `World` once at startup;
//! every session plays on a fresh clone of it.

mod player;
mod camera;
mod menu;
mod save;
mod hud;

pub use player::*;
pub use camera::*;
pub use menu::*;
pub use save::*;
pub use hud::*;

use std::path::PathBuf;
use std::rc::Rc;
use crate::config::GameConfig;
use crate::error::AssetError;
use crate::input::{Action, InputState};
use crate::rasterizer::{Camera, Framebuffer, Mat4, RenderContext, Vec3, Vertex};
use crate::world::{LevelData, LevelError, Model, ModelStore, World};

/// Models every level relies on, loaded from `models/<name>.obj`
pub const REQUIRED_MODELS: [&str; 4] = ["player", "platform", "island", "flag"];

const GROUND_SIZE: f32 = 2.0;
const GROUND_Z: f32 = -1.0;

/// One 4x4 ground tile textured from the atlas
pub fn ground_tile() -> Result<Model, AssetError> {
    let s = GROUND_SIZE;
    let (u0, u1, v0, v1) = (88.0 / 128.0, 104.0 / 128.0, 0.0, 16.0 / 128.0);
    Model::new(&[
        Vertex::textured(-s, -s, 0.0, u0, v0),
        Vertex::textured(s, -s, 0.0, u1, v0),
        Vertex::textured(-s, s, 0.0, u0, v1),
        Vertex::textured(s, -s, 0.0, u1, v0),
        Vertex::textured(s, s, 0.0, u1, v1),
        Vertex::textured(-s, s, 0.0, u0, v1),
    ])
}

/// Shared models
pub struct Assets {
    pub models: ModelStore,
    pub player: Rc<Model>,
    pub island: Rc<Model>,
    pub ground: Rc<Model>,
}

impl Assets {
    /// Load every required OBJ from the asset directory
    pub fn load(config: &GameConfig) -> Result<Self, AssetError> {
        let mut models = ModelStore::new();
        for name in REQUIRED_MODELS {
            models.load_obj(name, config.asset(format!("models/{}.obj", name)))?;
        }
        log::debug!("{} models loaded", models.len());
        Self::from_store(models)
    }

    pub fn from_store(mut models: ModelStore) -> Result<Self, AssetError> {
        let require = |models: &ModelStore, name: &str| {
            models
                .get(name)
                .ok_or_else(|| AssetError::InvalidModel(format!("missing model {}", name)))
        };
        let player = require(&models, "player")?;
        let island = require(&models, "island")?;
        let ground = models.insert("ground", ground_tile()?);
        Ok(Self { models, player, island, ground })
    }
}

/// What a session tick produced
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    None,
    Checkpoint(usize),
    Finished { splits: Vec<f32>, total: f32 },
}

/// One run through the level
pub struct Session {
    pub world: World,
    pub player: Player,
    pub rig: FollowCamera,
    pub elapsed: f32,
    pub next_checkpoint: usize,
    pub splits: Vec<f32>,
}

impl Session {
    pub fn new(world: World, start: Vec3, player_model: &Model, camera: &mut Camera) -> Self {
        let player = Player::new(start, player_model.hitbox().unwrap_or_default());
        let mut rig = FollowCamera::new();
        rig.start(camera, start);
        Self {
            world,
            player,
            rig,
            elapsed: 0.0,
            next_checkpoint: 0,
            splits: Vec::new(),
        }
    }

    pub fn update(&mut self, input: &InputState, camera: &mut Camera, dt: f32) -> SessionEvent {
        self.elapsed += dt;

        if input.is_pressed(Action::CameraLeft) {
            self.rig.turn_left();
        }
        if input.is_pressed(Action::CameraRight) {
            self.rig.turn_right();
        }
        self.rig.follow(camera, self.player.position, dt);

        let controls = PlayerInput {
            movement: input.movement(),
            jump: input.is_pressed(Action::Jump),
        };
        self.player.tick(&mut self.world, controls, camera.yaw, dt);
        self.world.update(dt);

        self.check_checkpoints()
    }

    fn check_checkpoints(&mut self) -> SessionEvent {
        let touched = self.world.touching_checkpoint(&self.player.hitbox, self.player.position);
        if touched != Some(self.next_checkpoint) {
            return SessionEvent::None;
        }
        let order = self.next_checkpoint;
        self.splits.push(self.elapsed);
        self.next_checkpoint += 1;

        if self.next_checkpoint == self.world.checkpoint_count() {
            SessionEvent::Finished {
                splits: self.splits.clone(),
                total: self.elapsed,
            }
        } else {
            SessionEvent::Checkpoint(order)
        }
    }

    pub fn draw(&mut self, ctx: &mut RenderContext, assets: &Assets, dt: f32) {
        for x in [-4.0, 0.0, 4.0] {
            for y in [-4.0, 0.0, 4.0] {
                ctx.draw_model(&assets.ground, &Mat4::translation(Vec3::new(x, y, GROUND_Z)));
            }
        }
        for (_, wall) in self.world.walls() {
            ctx.draw_model(&wall.model, &Mat4::translation(wall.position));
        }
        for checkpoint in self.world.checkpoints() {
            if checkpoint.order >= self.next_checkpoint {
                ctx.draw_model(&checkpoint.model, &Mat4::translation(checkpoint.position));
            }
        }
        self.player.smooth_facing(dt);
        ctx.draw_model(&assets.player, &self.player.model_matrix());
    }
}

pub enum Room {
    Menu(Menu),
    Playing(Session),
}

/// Top-level game state
pub struct Game {
    pub assets: Assets,
    pub level_name: String,
    pub player_start: Vec3,
    template: World,
    pub room: Room,
    pub save: SaveData,
    save_path: PathBuf,
    /// Seconds since launch
    pub time: f32,
}

impl Game {
    pub fn new(assets: Assets, level: &LevelData, save_path: PathBuf) -> Result<Self, LevelError> {
        let template = level.build(&assets.models)?;
        log::info!(
            "Level {} ready: {} walls, {} checkpoints",
            level.name,
            template.wall_count(),
            template.checkpoint_count()
        );
        Ok(Self {
            assets,
            level_name: level.name.clone(),
            player_start: level.player_start,
            template,
            room: Room::Menu(Menu::new()),
            save: SaveData::load(&save_path),
            save_path,
            time: 0.0,
        })
    }

    pub fn start_session(&mut self, camera: &mut Camera) {
        log::info!("Starting level {}", self.level_name);
        self.room = Room::Playing(Session::new(
            self.template.clone(),
            self.player_start,
            &self.assets.player,
            camera,
        ));
    }

    pub fn return_to_menu(&mut self) {
        self.room = Room::Menu(Menu::new());
    }

    fn finish(&mut self, splits: &[f32], total: f32) {
        let best = self.save.set_scores(&self.level_name, splits, total);
        log::info!(
            "Finished {} in {}{}",
            self.level_name,
            format_time(total),
            if best { " (new best)" } else { "" }
        );
        self.write_save();
        self.return_to_menu();
    }

    pub fn write_save(&self) {
        if let Err(e) = self.save.write(&self.save_path) {
            log::warn!("Failed to write save: {}", e);
        }
    }

    /// Returns false when the player asked to quit
    pub fn update(&mut self, input: &InputState, camera: &mut Camera, dt: f32) -> bool {
        self.time += dt;
        match &mut self.room {
            Room::Menu(menu) => {
                if input.is_pressed(Action::Exit) {
                    return false;
                }
                if menu.update(camera, input.is_pressed(Action::Jump), dt) == MenuEvent::StartGame {
                    self.start_session(camera);
                }
            }
            Room::Playing(session) => {
                if input.is_pressed(Action::Exit) {
                    self.return_to_menu();
                    return true;
                }
                match session.update(input, camera, dt) {
                    SessionEvent::Finished { splits, total } => self.finish(&splits, total),
                    SessionEvent::Checkpoint(order) => {
                        log::info!("Checkpoint {} at {}", order + 1, format_time(session.elapsed));
                    }
                    SessionEvent::None => {}
                }
            }
        }
        true
    }

    /// Submit this frame's geometry
    pub fn draw(&mut self, ctx: &mut RenderContext, dt: f32) {
        match &mut self.room {
            Room::Menu(_) => ctx.draw_model(&self.assets.island, &Menu::island_matrix(self.time)),
            Room::Playing(session) => session.draw(ctx, &self.assets, dt),
        }
    }

    /// Overlays drawn into the finished framebuffer
    pub fn draw_overlay(&self, fb: &mut Framebuffer, camera: &Camera) {
        if let Room::Playing(_) = self.room {
            draw_compass(fb, camera.yaw, camera.pitch);
        }
    }

    pub fn draw_hud(&self, view: &Viewport, logical_w: f32, logical_h: f32) {
        match &self.room {
            Room::Menu(menu) => {
                let best = self.save.scores(&self.level_name).and_then(|s| s.best_time);
                draw_menu_hud(view, logical_w, logical_h, best, menu.fade_amount());
            }
            Room::Playing(session) => {
                let info = HudInfo {
                    elapsed: session.elapsed,
                    player: session.player.position,
                    checkpoint: session.next_checkpoint,
                    checkpoint_total: session.world.checkpoint_count(),
                };
                draw_level_hud(view, logical_w, logical_h, &info);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{CheckpointDef, WallDef};

    fn cube(half: f32) -> Model {
        Model::new(&[
            Vertex::from_pos(-half, -half, 0.0),
            Vertex::from_pos(half, half, 1.0),
            Vertex::from_pos(half, -half, 0.0),
        ])
        .unwrap()
    }

    fn assets() -> Assets {
        let mut store = ModelStore::new();
        for name in REQUIRED_MODELS {
            store.insert(name, cube(0.5));
        }
        Assets::from_store(store).unwrap()
    }

    fn level(checkpoints: &[Vec3]) -> LevelData {
        LevelData {
            name: "test".to_string(),
            player_start: Vec3::ZERO,
            walls: vec![WallDef {
                model: "platform".to_string(),
                position: Vec3::new(6.0, 0.0, 0.0),
                motion: None,
            }],
            checkpoints: checkpoints
                .iter()
                .map(|&position| CheckpointDef { position, model: "flag".to_string() })
                .collect(),
        }
    }

    fn temp_save(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("trs-platformer-{}-{}.sav", name, std::process::id()))
    }

    #[test]
    fn test_ground_tile_is_two_triangles() {
        let tile = ground_tile().unwrap();
        assert_eq!(tile.triangle_count(), 2);
        let hb = tile.hitbox().unwrap();
        assert_eq!(hb.max, Vec3::new(2.0, 2.0, 0.0));
    }

    #[test]
    fn test_missing_required_model() {
        assert!(Assets::from_store(ModelStore::new()).is_err());
    }

    #[test]
    fn test_session_checkpoints_in_order() {
        let mut camera = Camera::default();
        let a = assets();
        let template = level(&[Vec3::new(20.0, 0.0, 0.0), Vec3::ZERO]).build(&a.models).unwrap();
        let mut session = Session::new(template, Vec3::ZERO, &a.player, &mut camera);
        let input = InputState::new();

        // Standing on the second flag does not count before the first
        assert_eq!(session.update(&input, &mut camera, 0.05), SessionEvent::None);
        session.player.position = Vec3::new(20.0, 0.0, 0.0);
        assert_eq!(session.update(&input, &mut camera, 0.05), SessionEvent::Checkpoint(0));
        session.player.position = Vec3::ZERO;
        match session.update(&input, &mut camera, 0.05) {
            SessionEvent::Finished { splits, total } => {
                assert_eq!(splits.len(), 2);
                assert!((total - 0.15).abs() < 0.001);
            }
            other => panic!("expected finish, got {:?}", other),
        }
    }

    #[test]
    fn test_finishing_records_best_and_returns_to_menu() {
        let path = temp_save("finish");
        let mut camera = Camera::default();
        let mut game = Game::new(assets(), &level(&[Vec3::ZERO]), path.clone()).unwrap();
        game.start_session(&mut camera);
        assert!(matches!(game.room, Room::Playing(_)));

        assert!(game.update(&InputState::new(), &mut camera, 0.05));
        assert!(matches!(game.room, Room::Menu(_)));
        assert!(game.save.scores("test").and_then(|s| s.best_time).is_some());
        assert_eq!(SaveData::load(&path), game.save);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_escape_leaves_level_then_quits() {
        let mut camera = Camera::default();
        let mut game = Game::new(assets(), &level(&[]), temp_save("escape")).unwrap();
        game.start_session(&mut camera);

        let mut input = InputState::new();
        input.update_with(|a| a == Action::Exit);
        assert!(game.update(&input, &mut camera, 0.05));
        assert!(matches!(game.room, Room::Menu(_)));

        input.update_with(|_| false);
        input.update_with(|a| a == Action::Exit);
        assert!(!game.update(&input, &mut camera, 0.05));
    }

    #[test]
    fn test_session_draw_submits_scene() {
        let mut camera = Camera::default();
        let a = assets();
        let template = level(&[Vec3::new(3.0, 3.0, 0.0)]).build(&a.models).unwrap();
        let mut session = Session::new(template, Vec3::ZERO, &a.player, &mut camera);

        let mut ctx = RenderContext::new(
            256.0,
            224.0,
            crate::rasterizer::Projection::default(),
            crate::rasterizer::Texture::new(1, 1),
        );
        ctx.begin_frame();
        session.draw(&mut ctx, &a, 0.05);
        let mut raster = crate::rasterizer::SoftwareRasterizer::new(256, 224, Default::default());
        ctx.camera = Camera::new(Vec3::new(-8.0, -8.0, 8.0), 0.0, 0.0);
        ctx.camera.aim_at(Vec3::ZERO);
        ctx.end_frame(&mut raster, true);
        // 9 ground tiles of 2 triangles, plus the wall, the flag and the player
        assert!(ctx.triangle_count() > 0);
        assert!(ctx.triangle_count() <= 9 * 2 + 3);
    }

    #[test]
    fn test_shipped_assets_load() {
        let config = GameConfig::default();
        let assets = Assets::load(&config).unwrap();
        let level = crate::world::load_level(config.asset(&config.level)).unwrap();
        let game = Game::new(assets, &level, temp_save("shipped")).unwrap();
        assert_eq!(game.level_name, "tutorial");
        assert_eq!(game.template.checkpoint_count(), 2);
        assert!(game.assets.player.hitbox().is_some());
    }
}
