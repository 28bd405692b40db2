//! Battle session — the engine's command surface and tick loop.
//!
//! `BattleSession` owns the hecs world, the seeded RNG, both bases, the
//! spawn economy, and one injected `UnitController` per side. All
//! mutation happens synchronously inside `start`, `update`, `deploy_unit`
//! and the explicit intent methods; callers read state only through the
//! snapshots returned between ticks.

use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use arena_ai::context::{
    CombatDecision, DecisionContext, EnemyContext, FireRequest, ProjectileContext, SelfContext,
    SlotContext,
};
use arena_ai::controller::TreeController;
use arena_ai::UnitController;

use arena_core::catalog::PartCatalog;
use arena_core::commands::{BattleConfig, InputIntent, NodeConfig};
use arena_core::components::*;
use arena_core::constants::*;
use arena_core::enums::{Side, UnitKind};
use arena_core::events::BattleEvent;
use arena_core::state::{BattleSnapshot, Outcome};
use arena_core::types::{Position, SimTime, Velocity};

use crate::economy::{BaseStatus, SpawnEconomy};
use crate::systems::effects::Effect;
use crate::systems::{cleanup, effects, loader, mobility, projectiles, snapshot, spawner, weapons};
use crate::unit_factory;

/// Pointer pick radius for unit selection.
const CLICK_RADIUS: f64 = 48.0;

/// The authoritative battle state and its update loop.
pub struct BattleSession {
    world: World,
    catalog: PartCatalog,
    seed: u64,
    charge_gas: bool,
    time: SimTime,
    started: bool,
    outcome: Option<Outcome>,
    rng: ChaCha8Rng,
    next_unit_id: u32,
    next_projectile_id: u32,
    player_base: BaseStatus,
    enemy_base: BaseStatus,
    economy: SpawnEconomy,
    controlled_unit: Option<u32>,
    aim_point: Position,
    fire_held: bool,
    events: Vec<BattleEvent>,
    despawn_buffer: Vec<Entity>,
    particles: Vec<Effect>,
    debris: Vec<Effect>,
    player_controller: Box<dyn UnitController>,
    enemy_controller: Box<dyn UnitController>,
}

/// Everything the decision pass needs to know about one unit, captured
/// up front so controllers see a consistent pre-decision picture.
struct UnitBrief {
    entity: Entity,
    id: u32,
    side: Side,
    kind: UnitKind,
    position: Position,
    velocity: Velocity,
    integrity: f64,
    max_speed: f64,
    facing: i8,
    aim_bias_y: f64,
    weapon_count: u32,
    air_dropping: bool,
    slots: Vec<SlotContext>,
}

impl BattleSession {
    pub fn new(catalog: PartCatalog, config: BattleConfig) -> Self {
        let base_hp = BASE_DEFAULT_HP;
        Self {
            world: World::new(),
            catalog,
            seed: config.seed,
            charge_gas: config.charge_gas,
            time: SimTime::default(),
            started: false,
            outcome: None,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            next_unit_id: 0,
            next_projectile_id: 0,
            player_base: BaseStatus::player(base_hp),
            enemy_base: BaseStatus::enemy(base_hp),
            economy: SpawnEconomy::default(),
            controlled_unit: None,
            aim_point: Position::default(),
            fire_held: false,
            events: Vec::new(),
            despawn_buffer: Vec::new(),
            particles: Vec::new(),
            debris: Vec::new(),
            player_controller: Box::new(TreeController::new()),
            enemy_controller: Box::new(TreeController::new()),
        }
    }

    /// Swap the decision source for one side (harness injection point).
    pub fn set_controller(&mut self, side: Side, controller: Box<dyn UnitController>) {
        match side {
            Side::Player => self.player_controller = controller,
            Side::Enemy => self.enemy_controller = controller,
        }
    }

    /// Reset state and begin a battle on the given node.
    pub fn start(&mut self, node: &NodeConfig) {
        self.world = World::new();
        self.rng = ChaCha8Rng::seed_from_u64(self.seed);
        self.time = SimTime::default();
        self.outcome = None;
        self.next_unit_id = 0;
        self.next_projectile_id = 0;
        self.controlled_unit = None;
        self.fire_held = false;
        self.events.clear();
        self.particles.clear();
        self.debris.clear();

        let base_hp = node.base_hp_override.unwrap_or(BASE_DEFAULT_HP);
        self.player_base = BaseStatus::player(base_hp);
        self.enemy_base = BaseStatus::enemy(base_hp);
        self.economy = SpawnEconomy::from_node(node);

        let starters: Vec<(String, Side)> = node
            .player_starters
            .iter()
            .map(|t| (t.clone(), Side::Player))
            .chain(node.enemy_starters.iter().map(|t| (t.clone(), Side::Enemy)))
            .collect();
        for (template_id, side) in starters {
            self.spawn_unit(&template_id, side);
        }

        self.started = true;
    }

    /// Advance the battle one fixed step. A session that has not started
    /// or already has an outcome returns its snapshot unchanged.
    pub fn update(&mut self, dt: f64, input: &InputIntent) -> BattleSnapshot {
        if self.started && self.outcome.is_none() {
            self.run_systems(dt, input);
            self.time.advance(dt);
            self.check_outcome();
        }
        self.snapshot()
    }

    /// Deploy a player unit, spending gas unless the session runs in the
    /// no-charge test mode. Returns false with no state change when the
    /// template is unknown, the cap is reached, or gas is short.
    pub fn deploy_unit(&mut self, template_id: &str) -> bool {
        if !self.started || self.outcome.is_some() {
            return false;
        }
        let Some(template) = self.catalog.templates.get(template_id) else {
            return false;
        };
        let cost = template.gas_cost;

        if spawner::alive_count(&mut self.world, Side::Player) >= self.economy.player_cap {
            return false;
        }
        if self.charge_gas && self.economy.player_gas < cost {
            return false;
        }
        if self.spawn_unit(template_id, Side::Player).is_none() {
            return false;
        }
        if self.charge_gas {
            self.economy.player_gas -= cost;
        }
        true
    }

    /// Terminate the battle immediately with the given outcome.
    pub fn force_end(&mut self, victory: bool, reason: &str) {
        if self.started && self.outcome.is_none() {
            self.set_outcome(victory, reason);
        }
    }

    /// Select the player unit nearest the click, within pick radius.
    pub fn set_control_by_click(&mut self, x: f64, y: f64) -> Option<u32> {
        let point = Position::new(x, y);
        let mut best: Option<(u32, f64)> = None;
        {
            let mut query = self.world.query::<(&UnitTag, &Position, &Pilot)>();
            for (_entity, (tag, pos, pilot)) in query.iter() {
                if tag.side != Side::Player || !pilot.alive {
                    continue;
                }
                let d2 = pos.distance_sq_to(&point);
                if d2 <= CLICK_RADIUS * CLICK_RADIUS
                    && best.map_or(true, |(_, bd)| d2 < bd)
                {
                    best = Some((tag.id, d2));
                }
            }
        }
        self.controlled_unit = best.map(|(id, _)| id);
        self.controlled_unit
    }

    /// Move the controlled unit's aim point.
    pub fn set_aim(&mut self, x: f64, y: f64) {
        self.aim_point = Position::new(x, y);
    }

    /// Press / release the fire control.
    pub fn set_fire_held(&mut self, held: bool) {
        self.fire_held = held;
    }

    /// Prioritize a weapon slot on the controlled unit; loaders service
    /// it first.
    pub fn select_weapon_slot(&mut self, slot: usize) {
        let Some(controlled) = self.controlled_unit else {
            return;
        };
        for (_entity, (tag, battery)) in self.world.query_mut::<(&UnitTag, &mut WeaponBattery)>() {
            if tag.id == controlled && slot < battery.slots.len() {
                battery.selected = Some(slot);
            }
        }
    }

    /// Build a snapshot of the current state, draining pending events.
    pub fn snapshot(&mut self) -> BattleSnapshot {
        let events = std::mem::take(&mut self.events);
        snapshot::build(
            &mut self.world,
            &self.time,
            self.started && self.outcome.is_none(),
            self.outcome.clone(),
            &self.player_base,
            &self.enemy_base,
            &self.economy,
            &self.particles,
            &self.debris,
            events,
        )
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    pub fn controlled_unit(&self) -> Option<u32> {
        self.controlled_unit
    }

    /// Read-only access to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable world access for test scaffolding.
    #[cfg(test)]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Drain pending events without building a snapshot (tests).
    #[cfg(test)]
    pub fn take_events(&mut self) -> Vec<BattleEvent> {
        std::mem::take(&mut self.events)
    }

    /// Spawn a unit directly at a chosen position (test scaffolding).
    #[cfg(test)]
    pub fn spawn_unit_at(
        &mut self,
        template_id: &str,
        side: Side,
        position: Position,
    ) -> Option<u32> {
        let unit_id = self.next_unit_id;
        unit_factory::instantiate(
            &mut self.world,
            &self.catalog,
            template_id,
            side,
            unit_id,
            position,
        )
        .map(|_| {
            self.next_unit_id += 1;
            self.events.push(BattleEvent::UnitDeployed {
                unit: unit_id,
                side,
            });
            unit_id
        })
    }

    // ---- Internals ----

    fn spawn_unit(&mut self, template_id: &str, side: Side) -> Option<u32> {
        let kind = self.catalog.templates.get(template_id)?.kind;
        let unit_id = self.next_unit_id;
        let position = unit_factory::spawn_position(side, kind, &mut self.rng);
        unit_factory::instantiate(
            &mut self.world,
            &self.catalog,
            template_id,
            side,
            unit_id,
            position,
        )
        .map(|_| {
            self.next_unit_id += 1;
            self.events.push(BattleEvent::UnitDeployed {
                unit: unit_id,
                side,
            });
            unit_id
        })
    }

    /// One full tick: spawn economy, mobility, decisions, firing,
    /// loaders, projectiles, recovery, effects, cleanup.
    fn run_systems(&mut self, dt: f64, input: &InputIntent) {
        spawner::run(
            &mut self.world,
            &mut self.rng,
            &self.catalog,
            &mut self.economy,
            dt,
            &mut self.next_unit_id,
            &mut self.events,
        );

        mobility::refresh(&mut self.world, &mut self.rng);

        let decisions = self.collect_decisions(dt, input);
        for (entity, decision) in decisions {
            if let Ok(pilot) = self.world.query_one_mut::<&mut Pilot>(entity) {
                if decision.facing != 0 {
                    pilot.facing = decision.facing;
                }
                pilot.decision_path = decision.decision_path;
                pilot.block_reason = decision.block_reason;
            }
            mobility::apply_decision_movement(
                &mut self.world,
                entity,
                decision.move_x,
                decision.move_y,
                decision.allow_descend,
                dt,
            );
            for request in decision.fire_requests {
                weapons::try_fire(
                    &mut self.world,
                    entity,
                    request.slot,
                    request.aim,
                    request.intended_target,
                    &mut self.rng,
                    &mut self.next_projectile_id,
                    &mut self.events,
                );
            }
        }

        mobility::air_drop_fall(&mut self.world, dt, &mut self.events);
        loader::run(&mut self.world, dt);
        weapons::tick_cooldowns(&mut self.world, dt);

        projectiles::run(
            &mut self.world,
            dt,
            &mut self.rng,
            &mut self.player_base,
            &mut self.enemy_base,
            self.controlled_unit,
            &mut self.events,
            &mut self.despawn_buffer,
            &mut self.particles,
            &mut self.debris,
        );

        crate::systems::structure::recover(&mut self.world, dt);
        effects::update(&mut self.particles, dt);
        effects::update(&mut self.debris, dt);
        cleanup::run(&mut self.world, &mut self.despawn_buffer);
    }

    /// Collect one decision per alive, non-falling unit, in id order.
    /// Controllers never see mid-tick mutations: every context derives
    /// from the same pre-decision capture.
    fn collect_decisions(&mut self, dt: f64, input: &InputIntent) -> Vec<(Entity, CombatDecision)> {
        let mut briefs: Vec<UnitBrief> = Vec::new();
        {
            let mut query = self.world.query::<(
                &UnitTag,
                &Position,
                &Velocity,
                &Hull,
                &WeaponBattery,
                &Mobility,
                &Pilot,
            )>();
            for (entity, (tag, pos, vel, hull, battery, mobility, pilot)) in query.iter() {
                if !pilot.alive {
                    continue;
                }
                let slots = battery
                    .slots
                    .iter()
                    .enumerate()
                    .filter_map(|(index, slot)| {
                        let attachment = hull.attachment(slot.attachment)?;
                        if !attachment.alive {
                            return None;
                        }
                        let AttachmentSpec::Weapon(weapon) = &attachment.spec else {
                            return None;
                        };
                        let (speed, gravity) = weapons::effective_ballistics(weapon);
                        let ready = slot.fire_timer <= 0.0
                            && (!weapon.class.needs_loader() || slot.ready_charges > 0);
                        Some(SlotContext {
                            index,
                            class: weapon.class,
                            damage: weapon.damage,
                            range: weapon.range,
                            speed,
                            gravity,
                            shoot_angle_deg: weapon.shoot_angle_deg,
                            ready,
                        })
                    })
                    .collect::<Vec<_>>();

                briefs.push(UnitBrief {
                    entity,
                    id: tag.id,
                    side: tag.side,
                    kind: tag.kind,
                    position: *pos,
                    velocity: *vel,
                    integrity: hull.integrity(),
                    max_speed: mobility.max_speed,
                    facing: pilot.facing,
                    aim_bias_y: pilot.aim_bias_y,
                    weapon_count: slots.len() as u32,
                    air_dropping: pilot.air_drop.is_some(),
                    slots,
                });
            }
        }
        briefs.sort_by_key(|b| b.id);

        let mut projectile_ctx: Vec<ProjectileContext> = Vec::new();
        {
            let mut query = self.world.query::<(&Projectile, &Position)>();
            for (_entity, (p, pos)) in query.iter() {
                projectile_ctx.push(ProjectileContext {
                    side: p.side,
                    position: *pos,
                });
            }
        }

        let mut decisions = Vec::with_capacity(briefs.len());
        for brief in &briefs {
            if brief.air_dropping {
                continue;
            }

            let decision = if Some(brief.id) == self.controlled_unit {
                self.input_decision(brief, input)
            } else {
                let enemies: Vec<EnemyContext> = briefs
                    .iter()
                    .filter(|b| b.side != brief.side)
                    .map(|b| EnemyContext {
                        id: b.id,
                        kind: b.kind,
                        position: b.position,
                        velocity: b.velocity,
                        weapon_count: b.weapon_count,
                    })
                    .collect();
                let (base_target, own_base) = match brief.side {
                    Side::Player => {
                        (self.enemy_base.rect.center(), self.player_base.rect.center())
                    }
                    Side::Enemy => {
                        (self.player_base.rect.center(), self.enemy_base.rect.center())
                    }
                };
                let ctx = DecisionContext {
                    unit: SelfContext {
                        id: brief.id,
                        side: brief.side,
                        kind: brief.kind,
                        position: brief.position,
                        velocity: brief.velocity,
                        facing: brief.facing,
                        integrity: brief.integrity,
                        max_speed: brief.max_speed,
                        aim_bias_y: brief.aim_bias_y,
                        slots: brief.slots.clone(),
                    },
                    enemies,
                    projectiles: projectile_ctx.clone(),
                    base_target,
                    own_base,
                    desired_range: DESIRED_RANGE_DEFAULT,
                    dt,
                };
                match brief.side {
                    Side::Player => self.player_controller.decide(&ctx, &mut self.rng),
                    Side::Enemy => self.enemy_controller.decide(&ctx, &mut self.rng),
                }
            };
            decisions.push((brief.entity, decision));
        }
        decisions
    }

    /// Decision for the externally-controlled unit, straight from input.
    fn input_decision(&self, brief: &UnitBrief, input: &InputIntent) -> CombatDecision {
        let (move_x, move_y) = input.direction();
        let facing = if self.aim_point.x >= brief.position.x {
            1
        } else {
            -1
        };
        let fire_requests = if self.fire_held {
            brief
                .slots
                .iter()
                .map(|slot| FireRequest {
                    slot: slot.index,
                    aim: self.aim_point,
                    intended_target: None,
                })
                .collect()
        } else {
            Vec::new()
        };
        CombatDecision {
            move_x,
            move_y,
            allow_descend: true,
            facing,
            fire_requests,
            decision_path: "player-input".to_string(),
            block_reason: None,
        }
    }

    fn check_outcome(&mut self) {
        if self.enemy_base.hp <= 0.0 {
            self.set_outcome(true, "enemy-base-destroyed");
        } else if self.player_base.hp <= 0.0 {
            self.set_outcome(false, "player-base-destroyed");
        }
    }

    fn set_outcome(&mut self, victory: bool, reason: &str) {
        self.outcome = Some(Outcome {
            victory,
            reason: reason.to_string(),
        });
        self.events.push(BattleEvent::BattleEnded {
            victory,
            reason: reason.to_string(),
        });
    }
}
