#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Robot Merge.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature.
//!
//! The scene is laid out on a fixed logical canvas (see
//! [`BoardLayout`](robot_merge_rendering::BoardLayout)) that is scaled
//! uniformly and centred inside the window.

use anyhow::Result;
use glam::Vec2;
use log::info;
use macroquad::input::{
    is_key_pressed, is_mouse_button_pressed, mouse_position, KeyCode, MouseButton,
};
use robot_merge_rendering::{
    BoardLayout, Color, FrameInput, Presentation, RenderingBackend, Scene,
};
use std::time::Duration;

const CONTROLLED_OUTLINE: Color = Color::from_rgb_u8(0xff, 0xc1, 0x07);
const REACHABLE_OUTLINE: Color = Color::from_rgb_u8(0x9e, 0x9e, 0x9e);

/// Snapshot of edge-triggered keyboard shortcuts observed during a single frame.
#[derive(Clone, Copy, Debug, Default)]
struct KeyboardShortcuts {
    /// `Q` or `Escape` to quit the game loop.
    quit_requested: bool,
    /// `Space` spawns an extra robot.
    spawn_requested: bool,
    /// `R` clears the board.
    reset_requested: bool,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        Self {
            quit_requested: is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q),
            spawn_requested: is_key_pressed(KeyCode::Space),
            reset_requested: is_key_pressed(KeyCode::R),
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Clone, Copy, Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend logs frame timing metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }
}

/// Counts frames over one second of frame time.
#[derive(Debug, Default)]
struct FrameRate {
    elapsed: Duration,
    frames: u32,
}

impl FrameRate {
    /// Returns the number of frames drawn once at least a second has passed, then starts over.
    fn record_frame(&mut self, frame: Duration) -> Option<u32> {
        self.elapsed += frame;
        self.frames = self.frames.saturating_add(1);
        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let frames = self.frames;
        *self = Self::default();
        Some(frames)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: scene.layout.canvas_size.x as i32,
            window_height: scene.layout.canvas_size.y as i32,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let background = to_macroquad_color(clear_color);
            let mut frame_rate = FrameRate::default();

            loop {
                let keyboard = KeyboardShortcuts::poll();
                if keyboard.quit_requested {
                    break;
                }

                macroquad::window::clear_background(background);

                let screen_width = macroquad::window::screen_width();
                let screen_height = macroquad::window::screen_height();

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                let metrics_before =
                    CanvasMetrics::from_layout(&scene.layout, screen_width, screen_height);
                let (cursor_x, cursor_y) = mouse_position();
                let frame_input = gather_frame_input_from_observations(
                    &scene.layout,
                    &metrics_before,
                    Vec2::new(cursor_x, cursor_y),
                    is_mouse_button_pressed(MouseButton::Left),
                    keyboard,
                );

                update_scene(frame_dt, frame_input, &mut scene);

                let metrics = CanvasMetrics::from_layout(&scene.layout, screen_width, screen_height);
                draw_tiles(&scene, &metrics);
                draw_outlines(&scene, &metrics);

                if show_fps {
                    if let Some(frames) = frame_rate.record_frame(frame_dt) {
                        info!("FPS: {frames}");
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

/// Uniform scale and offset that fit the logical canvas into the window.
#[derive(Clone, Copy, Debug, PartialEq)]
struct CanvasMetrics {
    scale: f32,
    offset: Vec2,
}

impl CanvasMetrics {
    fn from_layout(layout: &BoardLayout, screen_width: f32, screen_height: f32) -> Self {
        let canvas = layout.canvas_size;
        let scale = if canvas.x <= f32::EPSILON || canvas.y <= f32::EPSILON {
            1.0
        } else {
            (screen_width / canvas.x).min(screen_height / canvas.y)
        };
        let offset = Vec2::new(
            ((screen_width - canvas.x * scale) * 0.5).max(0.0),
            ((screen_height - canvas.y * scale) * 0.5).max(0.0),
        );
        Self { scale, offset }
    }

    fn to_screen(self, canvas_point: Vec2) -> Vec2 {
        self.offset + canvas_point * self.scale
    }

    fn to_canvas(self, screen_point: Vec2) -> Option<Vec2> {
        if self.scale <= f32::EPSILON {
            return None;
        }
        Some((screen_point - self.offset) / self.scale)
    }
}

fn gather_frame_input_from_observations(
    layout: &BoardLayout,
    metrics: &CanvasMetrics,
    cursor_position: Vec2,
    click: bool,
    keyboard: KeyboardShortcuts,
) -> FrameInput {
    let clicked_tile = if click {
        metrics
            .to_canvas(cursor_position)
            .and_then(|point| layout.tile_at(point))
    } else {
        None
    };

    FrameInput {
        clicked_tile,
        spawn_requested: keyboard.spawn_requested,
        reset_requested: keyboard.reset_requested,
    }
}

fn draw_tiles(scene: &Scene, metrics: &CanvasMetrics) {
    let side = scene.layout.tile_width * metrics.scale;
    for tile in &scene.tiles {
        let origin = metrics.to_screen(scene.layout.tile_origin(tile.cell));
        macroquad::shapes::draw_rectangle(
            origin.x,
            origin.y,
            side,
            side,
            to_macroquad_color(tile.color),
        );
    }
}

fn draw_outlines(scene: &Scene, metrics: &CanvasMetrics) {
    let side = scene.layout.tile_width * metrics.scale;
    let thickness = (4.0 * metrics.scale).max(1.0);
    let reachable = to_macroquad_color(REACHABLE_OUTLINE);
    for cell in &scene.reachable {
        let origin = metrics.to_screen(scene.layout.tile_origin(*cell));
        macroquad::shapes::draw_rectangle_lines(origin.x, origin.y, side, side, thickness, reachable);
    }

    if let Some(cell) = scene.controlled {
        let origin = metrics.to_screen(scene.layout.tile_origin(cell));
        macroquad::shapes::draw_rectangle_lines(
            origin.x,
            origin.y,
            side,
            side,
            thickness * 2.0,
            to_macroquad_color(CONTROLLED_OUTLINE),
        );
    }
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}
