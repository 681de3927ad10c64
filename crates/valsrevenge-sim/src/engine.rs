//! Simulation engine: the per-frame entry point.
//!
//! `SimulationEngine` owns the entity registry, the flow and key state
//! machines, the save record and the delayed-effect queue. The host calls
//! `update` once per frame and forwards touches and (optionally) physics
//! contacts; everything the host should play or show comes back as
//! `GameEvent`s. Completely headless, so runs are deterministic per seed.

use std::collections::VecDeque;
use std::path::PathBuf;

use log::{debug, info, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use valsrevenge_core::commands::{Command, TouchEvent};
use valsrevenge_core::components::{Agent, Health, Player};
use valsrevenge_core::config::LevelSpec;
use valsrevenge_core::constants::MAX_FRAME_DT;
use valsrevenge_core::enums::{Direction, GameFlowState, HealthPhase, PhysicsCategory, PlayerKeyState};
use valsrevenge_core::error::ConfigError;
use valsrevenge_core::events::GameEvent;
use valsrevenge_core::save::SaveData;
use valsrevenge_core::types::{EntityId, Position, SimTime};

use crate::controls::{ControlAction, Controls};
use crate::error::{SaveError, SimError};
use crate::flow::{GameFlow, KeyTracker};
use crate::persistence;
use crate::registry::EntityRegistry;
use crate::systems;
use crate::systems::collision::{self, ContactContext, ContactRule, Resolution};
use crate::systems::contacts::ContactDetector;
use crate::timers::{TimerAction, TimerKey, TimerQueue};
use crate::world_setup;

/// Configuration for a simulation run.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// Integrate velocities and block against walls. Hosts with their own
    /// physics engine turn this off.
    pub integrate_motion: bool,
    /// Detect overlaps and route them as contacts. Hosts that call
    /// `on_contact` themselves turn this off.
    pub detect_contacts: bool,
    /// Where `gamedata.json` is written. `None` keeps the record in memory.
    pub save_dir: Option<PathBuf>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            integrate_motion: true,
            detect_contacts: true,
            save_dir: None,
        }
    }
}

pub struct SimulationEngine {
    registry: EntityRegistry,
    time: SimTime,
    last_frame: Option<f64>,
    flow: GameFlow,
    keys: KeyTracker,
    save: SaveData,
    rng: ChaCha8Rng,
    command_queue: VecDeque<Command>,
    timers: TimerQueue,
    controls: Controls,
    contacts: ContactDetector,
    despawn_buffer: Vec<EntityId>,
    events: Vec<GameEvent>,
    player: Option<EntityId>,
    patrol_nodes: Vec<glam::Vec2>,
    /// Set once the exit is reached; cleared by the next `load_level`.
    level_complete: bool,
    integrate_motion: bool,
    detect_contacts: bool,
    save_dir: Option<PathBuf>,
}

impl SimulationEngine {
    /// Create an engine around an existing save record.
    pub fn new(config: SimConfig, save: SaveData) -> Self {
        Self {
            registry: EntityRegistry::new(),
            time: SimTime::default(),
            last_frame: None,
            flow: GameFlow::default(),
            keys: KeyTracker::new(save.keys),
            save,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            command_queue: VecDeque::new(),
            timers: TimerQueue::new(),
            controls: Controls::default(),
            contacts: ContactDetector::new(),
            despawn_buffer: Vec::new(),
            events: Vec::new(),
            player: None,
            patrol_nodes: Vec::new(),
            level_complete: false,
            integrate_motion: config.integrate_motion,
            detect_contacts: config.detect_contacts,
            save_dir: config.save_dir,
        }
    }

    /// Replace the current level. The new level starts paused; the save
    /// record is written so a resumed game restarts here. Every entity of
    /// the old level is destroyed through the registry, so destroy
    /// subscribers see it leave.
    pub fn load_level(&mut self, level: &LevelSpec) -> Result<(), ConfigError> {
        // Validate before tearing down the current level.
        level.resolve()?;

        let torn_down = self.registry.clear();
        debug!("tore down {torn_down} entities");
        self.timers.clear();
        self.contacts.reset();
        self.command_queue.clear();
        if self.flow.is_playing() {
            self.events.push(GameEvent::FlowChanged {
                state: GameFlowState::Paused,
            });
        }
        self.flow = GameFlow::default();
        self.level_complete = false;
        self.controls = Controls::new(self.controls.movement.center, self.controls.attack.center);

        let loaded = world_setup::load_level(&mut self.registry, level, self.keys.state())?;
        info!(
            "level {} loaded: {} entities, {} patrol nodes",
            self.save.level,
            loaded.entities.len(),
            loaded.patrol_nodes.len()
        );
        self.player = loaded.player;
        self.patrol_nodes = loaded.patrol_nodes;

        if let Err(err) = self.save_game() {
            warn!("saving at level start: {err}");
        }
        Ok(())
    }

    /// Queue a command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: Command) {
        self.command_queue.push_back(command);
    }

    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = Command>) {
        self.command_queue.extend(commands);
    }

    /// Forward a touch from the host.
    pub fn handle_input(&mut self, event: TouchEvent) {
        self.queue_command(Command::Touch(event));
    }

    /// Change one goal weight; applied at the next tick boundary. Monster
    /// goal slots are re-derived from the key state every tick, so a weight
    /// set on them only lasts until then.
    pub fn set_goal_weight(&mut self, entity: EntityId, goal_index: usize, weight: f32) {
        self.queue_command(Command::SetGoalWeight {
            entity,
            goal_index,
            weight,
        });
    }

    /// Enter Paused immediately.
    pub fn pause(&mut self) -> Result<(), SimError> {
        self.enter_flow(GameFlowState::Paused)
    }

    /// Enter Playing immediately.
    pub fn resume(&mut self) -> Result<(), SimError> {
        self.enter_flow(GameFlowState::Playing)
    }

    /// Advance one frame. `current_time` is the host clock in seconds; the
    /// first frame has a zero delta and every delta is clamped to
    /// `MAX_FRAME_DT`. Returns the events produced since the previous call.
    pub fn update(&mut self, current_time: f64) -> Vec<GameEvent> {
        let dt = match self.last_frame {
            Some(previous) => (current_time - previous).clamp(0.0, MAX_FRAME_DT),
            None => 0.0,
        };
        self.last_frame = Some(current_time);

        self.process_commands();
        self.time.advance(dt);

        if self.flow.is_playing() {
            self.run_systems(dt as f32);
        }
        self.service_timers();

        std::mem::take(&mut self.events)
    }

    /// Contact callback for hosts that run their own physics. Events are
    /// returned by the next `update` or `drain_events`.
    pub fn on_contact(
        &mut self,
        category_a: PhysicsCategory,
        category_b: PhysicsCategory,
        entity_a: EntityId,
        entity_b: EntityId,
    ) -> Resolution {
        self.dispatch_contact(category_a, category_b, entity_a, entity_b)
    }

    /// Take the buffered events without advancing.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Reset the save record to level 1 with nothing collected.
    pub fn start_new_game(&mut self) {
        self.save = SaveData::start_new_game();
        self.sync_keys_from_save();
    }

    /// Replace the save record, e.g. with one loaded from disk.
    pub fn restore_save(&mut self, save: SaveData) {
        self.save = save;
        self.sync_keys_from_save();
    }

    /// Write the save record if a save directory is configured.
    pub fn save_game(&self) -> Result<(), SaveError> {
        match &self.save_dir {
            Some(dir) => persistence::save_to_file(dir, &self.save),
            None => Ok(()),
        }
    }

    pub fn flow_state(&self) -> GameFlowState {
        self.flow.state()
    }

    pub fn key_state(&self) -> PlayerKeyState {
        self.keys.state()
    }

    pub fn keys(&self) -> u32 {
        self.keys.keys()
    }

    pub fn save_data(&self) -> SaveData {
        self.save
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut EntityRegistry {
        &mut self.registry
    }

    pub fn player(&self) -> Option<EntityId> {
        self.player
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Consume the engine, handing back the save record.
    pub fn into_save(self) -> SaveData {
        self.save
    }

    fn sync_keys_from_save(&mut self) {
        if let Some(state) = self.keys.set(self.save.keys) {
            self.events.push(GameEvent::KeyStateChanged {
                state,
                keys: self.save.keys,
            });
        }
    }

    /// Switch flow and start or stop everything gated on it.
    fn enter_flow(&mut self, next: GameFlowState) -> Result<(), SimError> {
        self.flow.enter(next)?;
        match next {
            GameFlowState::Playing => {
                systems::spawner::set_running(&mut self.registry, true);
                systems::pathfinding::start(self.registry.world_mut(), &self.patrol_nodes);
            }
            GameFlowState::Paused => {
                systems::spawner::set_running(&mut self.registry, false);
                systems::pathfinding::stop(self.registry.world_mut());
            }
        }
        self.events.push(GameEvent::FlowChanged { state: next });
        Ok(())
    }

    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Touch(event) => {
                if matches!(event, TouchEvent::Down { .. }) {
                    // Refused while already playing; the flow logs it.
                    let _ = self.enter_flow(GameFlowState::Playing);
                }
                match self.controls.handle(event) {
                    Some(ControlAction::Move(direction)) => self.steer_player(direction),
                    Some(ControlAction::Attack(direction)) => self.attack(direction),
                    None => {}
                }
            }
            Command::SetGoalWeight {
                entity,
                goal_index,
                weight,
            } => {
                let applied = self
                    .registry
                    .get_mut::<Agent>(entity)
                    .map(|mut agent| agent.behavior.set_weight(goal_index, weight));
                match applied {
                    Some(true) => {}
                    Some(false) => debug!("{entity} has no goal {goal_index}"),
                    None => debug!("set goal weight: {}", SimError::UnknownEntity(entity)),
                }
            }
            Command::Pause => {
                let _ = self.enter_flow(GameFlowState::Paused);
            }
            Command::Resume => {
                let _ = self.enter_flow(GameFlowState::Playing);
            }
            Command::Despawn { entity } => {
                self.timers.cancel(TimerKey::DeathEffect(entity));
                self.remove_entity(entity);
            }
        }
    }

    fn steer_player(&mut self, direction: Direction) {
        let Some(mut player) = self.player.and_then(|id| self.registry.get_mut::<Player>(id)) else {
            warn!("move: {}", SimError::UnresolvedLookup("player"));
            return;
        };
        player.moving = direction;
        if direction != Direction::Stop {
            player.facing = direction;
        }
    }

    /// Throw a projectile. `Stop` means "the way the player faces", and a
    /// player who never moved throws to the right.
    fn attack(&mut self, direction: Direction) {
        if !self.flow.is_playing() {
            return;
        }
        let Some(player) = self.player else {
            warn!("attack: {}", SimError::UnresolvedLookup("player"));
            return;
        };
        let alive = self
            .registry
            .get::<Health>(player)
            .map_or(true, |h| h.phase == HealthPhase::Alive);
        let facing = self.registry.get::<Player>(player).map(|p| p.facing);
        let origin = self.registry.get::<Position>(player).map(|p| p.0);
        let (Some(facing), Some(origin)) = (facing, origin) else {
            warn!("attack: {}", SimError::UnresolvedLookup("player"));
            return;
        };
        if !alive {
            return;
        }

        let direction = match (direction, facing) {
            (Direction::Stop, Direction::Stop) => Direction::Right,
            (Direction::Stop, facing) => facing,
            (direction, _) => direction,
        };
        let projectile = world_setup::spawn_projectile(&mut self.registry, origin, direction);
        self.events.push(GameEvent::Attack {
            projectile,
            direction,
        });
    }

    /// Run all systems in order.
    fn run_systems(&mut self, dt: f32) {
        let key_state = self.keys.state();
        // 1. Generators
        systems::spawner::run(
            &mut self.registry,
            &mut self.rng,
            dt,
            self.player,
            key_state,
            &mut self.events,
        );
        // 2. Monster goal weights from the key state
        systems::steering::apply_monster_weights(self.registry.world_mut(), key_state);
        // 3. Agent steering
        systems::steering::run(self.registry.world_mut(), &mut self.rng, dt);
        // 4. Player input
        systems::movement::apply_player_input(self.registry.world_mut());
        // 5. Motion integration
        if self.integrate_motion {
            systems::movement::run(self.registry.world_mut(), dt);
        }
        // 6. Projectile expiry
        systems::cleanup::run(
            &mut self.registry,
            dt,
            &mut self.despawn_buffer,
            &mut self.events,
        );
        // 7. Contacts
        if self.detect_contacts {
            for contact in self.contacts.detect(self.registry.world()) {
                self.dispatch_contact(
                    contact.category_a,
                    contact.category_b,
                    contact.entity_a,
                    contact.entity_b,
                );
            }
        }
    }

    fn dispatch_contact(
        &mut self,
        category_a: PhysicsCategory,
        category_b: PhysicsCategory,
        entity_a: EntityId,
        entity_b: EntityId,
    ) -> Resolution {
        let Some(routed) = collision::route(category_a, category_b, entity_a, entity_b) else {
            return Resolution::Ignored;
        };
        if routed.rule == ContactRule::ReachExit && self.level_complete {
            debug!("exit contact ignored: level already complete");
            return Resolution::Ignored;
        }
        let mut ctx = ContactContext {
            registry: &mut self.registry,
            keys: &mut self.keys,
            save: &mut self.save,
            timers: &mut self.timers,
            events: &mut self.events,
            now: self.time.elapsed_secs,
        };
        let resolution = collision::resolve(&mut ctx, routed);
        if resolution == Resolution::LevelComplete {
            self.finish_level();
        }
        resolution
    }

    /// The world freezes until the host loads the next level.
    fn finish_level(&mut self) {
        self.level_complete = true;
        info!("level complete, next level {}", self.save.level);
        if self.flow.is_playing() {
            let _ = self.enter_flow(GameFlowState::Paused);
        }
        if let Err(err) = self.save_game() {
            warn!("saving after level complete: {err}");
        }
    }

    fn service_timers(&mut self) {
        for (_key, action) in self.timers.drain_due(self.time.elapsed_secs) {
            match action {
                TimerAction::Remove(id) => self.remove_entity(id),
                TimerAction::ResetHealth(id) => {
                    systems::health::reset_to_max(&mut self.registry, id, &mut self.events)
                }
            }
        }
    }

    fn remove_entity(&mut self, id: EntityId) {
        systems::health::mark_removed(&mut self.registry, id);
        if self.registry.destroy_entity(id).is_some() {
            self.events.push(GameEvent::Removed { entity: id });
            if self.player == Some(id) {
                warn!("player {id} was removed");
                self.player = None;
            }
        }
    }
}
