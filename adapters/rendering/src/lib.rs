#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Robot Merge adapters.
//!
//! Backends receive a declarative [`Scene`] and report player input through
//! [`FrameInput`]. Board geometry lives in [`BoardLayout`], an affine mapping
//! between tile coordinates and canvas pixels. Canvas `y` grows downwards while
//! board `y` grows upwards, so rows are flipped on the way in and out.

use anyhow::Result as AnyResult;
use glam::Vec2;
use robot_merge_core::{BoardView, RobotSize, TileCoord, GRID_SIDE};
use std::{error::Error, fmt, time::Duration};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }
}

/// Robot size to color table: black (empty), red, green, blue, purple.
pub const ROBOT_PALETTE: [Color; RobotSize::PALETTE_LEN] = [
    Color::from_rgb_u8(0x00, 0x00, 0x00),
    Color::from_rgb_u8(0xff, 0x00, 0x00),
    Color::from_rgb_u8(0x00, 0x80, 0x00),
    Color::from_rgb_u8(0x00, 0x00, 0xff),
    Color::from_rgb_u8(0x80, 0x00, 0x80),
];

/// Looks up the display color for a robot size.
#[must_use]
pub fn robot_color(size: RobotSize) -> Color {
    ROBOT_PALETTE[usize::from(size.get())]
}

/// Affine mapping between board tiles and canvas pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoardLayout {
    /// Side length of each drawn tile.
    pub tile_width: f32,
    /// Distance between the origins of neighbouring tiles.
    pub tile_pitch: f32,
    /// Canvas position of the centre tile's centre.
    pub center: Vec2,
    /// Size of the logical canvas that backends scale to the window.
    pub canvas_size: Vec2,
}

impl Default for BoardLayout {
    fn default() -> Self {
        Self {
            tile_width: Self::DEFAULT_TILE_WIDTH,
            tile_pitch: Self::DEFAULT_TILE_PITCH,
            center: Vec2::splat(Self::DEFAULT_CANVAS_SIDE * 0.5),
            canvas_size: Vec2::splat(Self::DEFAULT_CANVAS_SIDE),
        }
    }
}

impl BoardLayout {
    /// Default side length of a tile in canvas pixels.
    pub const DEFAULT_TILE_WIDTH: f32 = 100.0;

    /// Default tile pitch, leaving a 20 pixel gap between tiles.
    pub const DEFAULT_TILE_PITCH: f32 = 120.0;

    /// Default side length of the square canvas.
    pub const DEFAULT_CANVAS_SIDE: f32 = 800.0;

    /// Creates a layout centred on a square canvas.
    ///
    /// Returns an error when the tile width is not positive or the pitch is
    /// smaller than the tile width.
    pub fn new(
        tile_width: f32,
        tile_pitch: f32,
        canvas_side: f32,
    ) -> std::result::Result<Self, RenderingError> {
        if tile_width.is_nan() || tile_width <= 0.0 {
            return Err(RenderingError::InvalidTileWidth { tile_width });
        }
        if tile_pitch.is_nan() || tile_pitch < tile_width {
            return Err(RenderingError::InvalidTilePitch {
                tile_width,
                tile_pitch,
            });
        }

        Ok(Self {
            tile_width,
            tile_pitch,
            center: Vec2::splat(canvas_side * 0.5),
            canvas_size: Vec2::splat(canvas_side),
        })
    }

    /// Upper-left canvas corner of the tile.
    #[must_use]
    pub fn tile_origin(&self, cell: TileCoord) -> Vec2 {
        let middle = f32::from(GRID_SIDE / 2);
        let column = f32::from(cell.x());
        let row_from_top = f32::from(GRID_SIDE - 1 - cell.y());
        Vec2::new(
            (column - middle) * self.tile_pitch + self.center.x - self.tile_width * 0.5,
            (row_from_top - middle) * self.tile_pitch + self.center.y - self.tile_width * 0.5,
        )
    }

    /// Canvas centre of the tile.
    #[must_use]
    pub fn tile_center(&self, cell: TileCoord) -> Vec2 {
        self.tile_origin(cell) + Vec2::splat(self.tile_width * 0.5)
    }

    /// Tile whose pitch cell contains `point`, or `None` outside the board.
    ///
    /// The gap after a tile belongs to that tile.
    #[must_use]
    pub fn tile_at(&self, point: Vec2) -> Option<TileCoord> {
        let middle = f32::from(GRID_SIDE / 2);
        let column =
            ((point.x - self.center.x + self.tile_width * 0.5) / self.tile_pitch + middle).floor();
        let row_from_top =
            ((point.y - self.center.y + self.tile_width * 0.5) / self.tile_pitch + middle).floor();

        let side = f32::from(GRID_SIDE);
        if !(0.0..side).contains(&column) || !(0.0..side).contains(&row_from_top) {
            return None;
        }

        // Both values are whole numbers in 0..GRID_SIDE.
        let x = column as u8;
        let y = GRID_SIDE - 1 - row_from_top as u8;
        TileCoord::new(x, y).ok()
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Tile clicked on this frame, if the click landed on the board.
    pub clicked_tile: Option<TileCoord>,
    /// Whether the player requested an extra robot on this frame.
    pub spawn_requested: bool,
    /// Whether the player requested a board reset on this frame.
    pub reset_requested: bool,
}

/// Single tile drawn as a filled square.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TilePresentation {
    /// Board tile being drawn.
    pub cell: TileCoord,
    /// Fill color of the square.
    pub color: Color,
}

impl TilePresentation {
    /// Creates a new tile presentation descriptor.
    #[must_use]
    pub const fn new(cell: TileCoord, color: Color) -> Self {
        Self { cell, color }
    }
}

/// Scene description combining the board layout and its tiles.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Geometry used to place tiles on the canvas.
    pub layout: BoardLayout,
    /// Every tile on the board in flat-index order.
    pub tiles: Vec<TilePresentation>,
    /// Tile of the controlled robot, outlined when present.
    pub controlled: Option<TileCoord>,
    /// Tiles the controlled robot can reach, outlined faintly.
    pub reachable: Vec<TileCoord>,
}

impl Scene {
    /// Creates a new scene descriptor.
    #[must_use]
    pub fn new(
        layout: BoardLayout,
        tiles: Vec<TilePresentation>,
        controlled: Option<TileCoord>,
        reachable: Vec<TileCoord>,
    ) -> Self {
        Self {
            layout,
            tiles,
            controlled,
            reachable,
        }
    }

    /// Builds a scene that colors every tile by its robot size.
    #[must_use]
    pub fn from_board(
        layout: BoardLayout,
        board: BoardView<'_>,
        controlled: Option<TileCoord>,
        reachable: Vec<TileCoord>,
    ) -> Self {
        let tiles = board
            .iter()
            .map(|(cell, size)| TilePresentation::new(cell, robot_color(size)))
            .collect();
        Self::new(layout, tiles, controlled, reachable)
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Robot Merge scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the frame delta and the
    /// input captured by the adapter, and may mutate the scene before it is
    /// rendered.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Tiles must have a positive width.
    InvalidTileWidth {
        /// Provided width that failed validation.
        tile_width: f32,
    },
    /// Tiles must not overlap their neighbours.
    InvalidTilePitch {
        /// Width of a tile.
        tile_width: f32,
        /// Provided pitch that failed validation.
        tile_pitch: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTileWidth { tile_width } => {
                write!(f, "tile_width must be positive (received {tile_width})")
            }
            Self::InvalidTilePitch {
                tile_width,
                tile_pitch,
            } => write!(
                f,
                "tile_pitch {tile_pitch} must be at least the tile width {tile_width}"
            ),
        }
    }
}

impl Error for RenderingError {}

#[cfg(test)]
mod tests {
    use super::*;
    use robot_merge_core::CELL_COUNT;

    fn coord(x: u8, y: u8) -> TileCoord {
        TileCoord::new(x, y).expect("valid coordinate")
    }

    #[test]
    fn palette_maps_sizes_in_order() {
        assert_eq!(robot_color(RobotSize::EMPTY), Color::from_rgb_u8(0, 0, 0));
        assert_eq!(robot_color(RobotSize::MIN), Color::from_rgb_u8(255, 0, 0));
        assert_eq!(robot_color(RobotSize::MAX), Color::from_rgb_u8(128, 0, 128));
    }

    #[test]
    fn default_layout_matches_canvas_geometry() {
        let layout = BoardLayout::default();

        assert_eq!(layout.tile_origin(coord(2, 2)), Vec2::new(350.0, 350.0));
        assert_eq!(layout.tile_origin(coord(0, 4)), Vec2::new(110.0, 110.0));
        assert_eq!(layout.tile_origin(coord(4, 0)), Vec2::new(590.0, 590.0));
    }

    #[test]
    fn tile_at_inverts_tile_origin() {
        let layout = BoardLayout::default();
        for cell in TileCoord::all() {
            assert_eq!(layout.tile_at(layout.tile_center(cell)), Some(cell));
            assert_eq!(layout.tile_at(layout.tile_origin(cell)), Some(cell));
        }
    }

    #[test]
    fn tile_at_rejects_points_outside_board() {
        let layout = BoardLayout::default();

        assert_eq!(layout.tile_at(Vec2::new(100.0, 400.0)), None);
        assert_eq!(layout.tile_at(Vec2::new(400.0, 730.0)), None);
        assert_eq!(layout.tile_at(Vec2::new(-5.0, -5.0)), None);
    }

    #[test]
    fn gap_after_tile_selects_that_tile() {
        let layout = BoardLayout::default();

        assert_eq!(layout.tile_at(Vec2::new(215.0, 115.0)), Some(coord(0, 4)));
    }

    #[test]
    fn layout_creation_rejects_degenerate_geometry() {
        assert_eq!(
            BoardLayout::new(0.0, 120.0, 800.0),
            Err(RenderingError::InvalidTileWidth { tile_width: 0.0 })
        );
        assert_eq!(
            BoardLayout::new(100.0, 80.0, 800.0),
            Err(RenderingError::InvalidTilePitch {
                tile_width: 100.0,
                tile_pitch: 80.0,
            })
        );
        assert_eq!(BoardLayout::new(100.0, 120.0, 800.0), Ok(BoardLayout::default()));
    }

    #[test]
    fn scene_from_board_colors_every_tile() {
        let mut cells = [RobotSize::EMPTY; CELL_COUNT];
        cells[12] = RobotSize::MAX;
        let scene = Scene::from_board(
            BoardLayout::default(),
            BoardView::new(&cells),
            Some(coord(2, 2)),
            vec![coord(2, 3)],
        );

        assert_eq!(scene.tiles.len(), CELL_COUNT);
        assert_eq!(scene.tiles[12], TilePresentation::new(coord(2, 2), ROBOT_PALETTE[4]));
        assert_eq!(scene.tiles[0].color, ROBOT_PALETTE[0]);
        assert_eq!(scene.controlled, Some(coord(2, 2)));
        assert_eq!(scene.reachable, vec![coord(2, 3)]);
    }

    #[test]
    fn byte_colors_are_opaque_and_normalised() {
        let purple = Color::from_rgb_u8(0x80, 0x00, 0xff);

        assert!((purple.red - 128.0 / 255.0).abs() < f32::EPSILON);
        assert!(purple.green.abs() < f32::EPSILON);
        assert!((purple.blue - 1.0).abs() < f32::EPSILON);
        assert!((purple.alpha - 1.0).abs() < f32::EPSILON);
    }
}
