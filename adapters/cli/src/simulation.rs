//! Frame-by-frame driver that feeds player input through the systems into the world.

use std::time::Duration;

use robot_merge_core::{Command, Event};
use robot_merge_rendering::{BoardLayout, FrameInput, Scene};
use robot_merge_system_control::{Control, ControlInput};
use robot_merge_system_spawning::Spawning;
use robot_merge_world::{self as world, query, World};

use crate::config::GameConfig;

/// Owns the world and the systems that react to it.
#[derive(Debug)]
pub(crate) struct Simulation {
    world: World,
    spawning: Spawning,
    control: Control,
    layout: BoardLayout,
}

impl Simulation {
    pub(crate) fn new(config: &GameConfig, layout: BoardLayout) -> Self {
        Self {
            world: World::with_config(config.world),
            spawning: Spawning::new(config.spawning),
            control: Control::new(),
            layout,
        }
    }

    pub(crate) fn welcome_banner(&self) -> &'static str {
        query::welcome_banner(&self.world)
    }

    /// Builds the scene for the current board.
    pub(crate) fn scene(&self) -> Scene {
        Scene::from_board(
            self.layout,
            query::board_view(&self.world),
            query::controlled(&self.world),
            query::available_moves(&self.world),
        )
    }

    /// Applies one frame of input and time, then refreshes `scene`.
    pub(crate) fn advance(&mut self, dt: Duration, input: FrameInput, scene: &mut Scene) {
        let mut commands = Vec::new();
        let available_moves = query::available_moves(&self.world);
        self.control.handle(
            ControlInput::new(
                input.clicked_tile,
                input.spawn_requested,
                input.reset_requested,
            ),
            query::board_view(&self.world),
            query::controlled(&self.world),
            &available_moves,
            &mut commands,
        );
        commands.push(Command::Tick { dt });

        for command in commands {
            self.execute(command);
        }

        *scene = self.scene();
    }

    /// Applies `command` and every follow-up command the spawning system requests.
    fn execute(&mut self, command: Command) {
        let mut events: Vec<Event> = Vec::new();
        world::apply(&mut self.world, command, &mut events);

        while !events.is_empty() {
            let mut follow_ups = Vec::new();
            self.spawning.handle(&events, &mut follow_ups);
            events.clear();
            for follow_up in follow_ups {
                world::apply(&mut self.world, follow_up, &mut events);
            }
        }
    }
}
