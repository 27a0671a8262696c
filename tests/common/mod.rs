//! Shared fixtures for the integration suites: a scriptable mock host
//! and a small arithmetic formula evaluator.
#![allow(dead_code)]

use rustc_hash::FxHashMap;
use skillcast::error::{FormulaError, PlatformError};
use skillcast::{EntityId, FormulaEvaluator, Host, ScheduledTask, SkillRng, TaskId};

/// Deterministic RNG for tests.
pub fn test_rng() -> SkillRng {
    SkillRng::new(42)
}

/// One scripted entity in the mock world.
///
/// The world is one-dimensional: `pos` is a coordinate on a line, which
/// is all the range/radius queries need.
#[derive(Clone, Debug)]
pub struct MockEntity {
    pub alive: bool,
    pub name: Option<String>,
    pub health: f64,
    pub max_health: f64,
    pub mana: f64,
    pub elevation: f64,
    pub biome: String,
    pub burning: bool,
    pub in_water: bool,
    pub team: u8,
    pub pos: f64,
}

impl Default for MockEntity {
    fn default() -> Self {
        Self {
            alive: true,
            name: None,
            health: 20.0,
            max_health: 20.0,
            mana: 10.0,
            elevation: 64.0,
            biome: "plains".to_string(),
            burning: false,
            in_water: false,
            team: 0,
            pos: 0.0,
        }
    }
}

/// Everything the mock host was asked to do, in order.
#[derive(Clone, Debug, PartialEq)]
pub enum Applied {
    Damage { source: EntityId, target: EntityId, amount: f64 },
    Heal { target: EntityId, amount: f64 },
    Push { source: EntityId, target: EntityId, speed: f64 },
    Ignite { target: EntityId, duration_ms: u64 },
    Potion { target: EntityId, effect: String, tier: i64, duration_ms: u64 },
    Cleanse { target: EntityId },
    Message { target: EntityId, text: String },
    Particle { target: EntityId, name: String, count: i64 },
    Sound { target: EntityId, name: String },
    Command { target: EntityId, command: String },
    Explosion { target: EntityId, power: f64 },
    Speed { target: EntityId, multiplier: f64, duration_ms: u64 },
    Launch { source: EntityId, projectile: String, speed: f64 },
    Lightning { target: EntityId },
}

/// Scriptable in-memory host with a controllable clock and a recorded
/// application log.
#[derive(Default)]
pub struct MockHost {
    pub now_ms: u64,
    pub world_time: u64,
    pub entities: FxHashMap<EntityId, MockEntity>,
    pub applied: Vec<Applied>,
    pub scheduled: Vec<(TaskId, u64, ScheduledTask)>,
    pub cancelled: Vec<TaskId>,
    pub fail_damage: bool,
    next_task: u64,
}

impl MockHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a default entity under the given raw id.
    pub fn spawn(&mut self, id: u64) -> EntityId {
        self.spawn_at(id, 0, 0.0)
    }

    /// Add an entity with a team and position.
    pub fn spawn_at(&mut self, id: u64, team: u8, pos: f64) -> EntityId {
        let entity = EntityId::new(id);
        self.entities.insert(
            entity,
            MockEntity {
                team,
                pos,
                ..MockEntity::default()
            },
        );
        entity
    }

    pub fn entity_mut(&mut self, entity: EntityId) -> &mut MockEntity {
        self.entities.get_mut(&entity).expect("entity not spawned")
    }

    pub fn kill(&mut self, entity: EntityId) {
        self.entity_mut(entity).alive = false;
    }

    /// Move the clock forward.
    pub fn advance(&mut self, ms: u64) {
        self.now_ms += ms;
    }

    /// Drain scheduled tasks that have come due. Cancelled tasks left
    /// the queue when they were cancelled.
    pub fn due_tasks(&mut self) -> Vec<ScheduledTask> {
        let now = self.now_ms;
        let mut due = Vec::new();
        self.scheduled.retain(|(_, due_at, task)| {
            if *due_at <= now {
                due.push(task.clone());
                false
            } else {
                true
            }
        });
        due
    }

    /// Recorded damage applications as (source, target, amount).
    pub fn damage_log(&self) -> Vec<(EntityId, EntityId, f64)> {
        self.applied
            .iter()
            .filter_map(|entry| match entry {
                Applied::Damage { source, target, amount } => Some((*source, *target, *amount)),
                _ => None,
            })
            .collect()
    }

    /// Recorded heal applications as (target, amount).
    pub fn heal_log(&self) -> Vec<(EntityId, f64)> {
        self.applied
            .iter()
            .filter_map(|entry| match entry {
                Applied::Heal { target, amount } => Some((*target, *amount)),
                _ => None,
            })
            .collect()
    }

    fn check_alive(&self, entity: EntityId) -> Result<(), PlatformError> {
        if self.entities.get(&entity).is_some_and(|e| e.alive) {
            Ok(())
        } else {
            Err(PlatformError::MissingEntity(entity))
        }
    }
}

impl Host for MockHost {
    fn now_ms(&self) -> u64 {
        self.now_ms
    }

    fn world_time(&self) -> u64 {
        self.world_time
    }

    fn is_alive(&self, entity: EntityId) -> bool {
        self.entities.get(&entity).is_some_and(|e| e.alive)
    }

    fn name(&self, entity: EntityId) -> Option<String> {
        self.entities.get(&entity).and_then(|e| e.name.clone())
    }

    fn health(&self, entity: EntityId) -> Option<f64> {
        self.entities.get(&entity).map(|e| e.health)
    }

    fn max_health(&self, entity: EntityId) -> Option<f64> {
        self.entities.get(&entity).map(|e| e.max_health)
    }

    fn mana(&self, entity: EntityId) -> Option<f64> {
        self.entities.get(&entity).map(|e| e.mana)
    }

    fn elevation(&self, entity: EntityId) -> Option<f64> {
        self.entities.get(&entity).map(|e| e.elevation)
    }

    fn biome(&self, entity: EntityId) -> Option<String> {
        self.entities.get(&entity).map(|e| e.biome.clone())
    }

    fn is_burning(&self, entity: EntityId) -> bool {
        self.entities.get(&entity).is_some_and(|e| e.burning)
    }

    fn is_in_water(&self, entity: EntityId) -> bool {
        self.entities.get(&entity).is_some_and(|e| e.in_water)
    }

    fn nearby(&self, origin: EntityId, radius: f64) -> Vec<EntityId> {
        let Some(center) = self.entities.get(&origin) else {
            return Vec::new();
        };
        let mut found: Vec<(f64, EntityId)> = self
            .entities
            .iter()
            .filter(|(id, e)| **id != origin && e.alive && (e.pos - center.pos).abs() <= radius)
            .map(|(id, e)| ((e.pos - center.pos).abs(), *id))
            .collect();
        found.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.raw().cmp(&b.1.raw())));
        found.into_iter().map(|(_, id)| id).collect()
    }

    fn nearest_hostile(&self, origin: EntityId, range: f64) -> Option<EntityId> {
        let team = self.entities.get(&origin)?.team;
        self.nearby(origin, range)
            .into_iter()
            .find(|id| self.entities[id].team != team)
    }

    fn are_allied(&self, a: EntityId, b: EntityId) -> bool {
        match (self.entities.get(&a), self.entities.get(&b)) {
            (Some(ea), Some(eb)) => ea.team == eb.team,
            _ => false,
        }
    }

    fn damage(
        &mut self,
        source: EntityId,
        target: EntityId,
        amount: f64,
    ) -> Result<(), PlatformError> {
        if self.fail_damage {
            return Err(PlatformError::Host("damage disabled".to_string()));
        }
        self.check_alive(target)?;
        let entity = self.entity_mut(target);
        entity.health = (entity.health - amount).max(0.0);
        if entity.health == 0.0 {
            entity.alive = false;
        }
        self.applied.push(Applied::Damage { source, target, amount });
        Ok(())
    }

    fn heal(&mut self, target: EntityId, amount: f64) -> Result<(), PlatformError> {
        self.check_alive(target)?;
        let entity = self.entity_mut(target);
        entity.health = (entity.health + amount).min(entity.max_health);
        self.applied.push(Applied::Heal { target, amount });
        Ok(())
    }

    fn push(
        &mut self,
        source: EntityId,
        target: EntityId,
        speed: f64,
    ) -> Result<(), PlatformError> {
        self.check_alive(target)?;
        self.applied.push(Applied::Push { source, target, speed });
        Ok(())
    }

    fn ignite(&mut self, target: EntityId, duration_ms: u64) -> Result<(), PlatformError> {
        self.check_alive(target)?;
        self.entity_mut(target).burning = true;
        self.applied.push(Applied::Ignite { target, duration_ms });
        Ok(())
    }

    fn apply_potion(
        &mut self,
        target: EntityId,
        effect: &str,
        tier: i64,
        duration_ms: u64,
    ) -> Result<(), PlatformError> {
        self.check_alive(target)?;
        self.applied.push(Applied::Potion {
            target,
            effect: effect.to_string(),
            tier,
            duration_ms,
        });
        Ok(())
    }

    fn cleanse(&mut self, target: EntityId) -> Result<(), PlatformError> {
        self.check_alive(target)?;
        self.applied.push(Applied::Cleanse { target });
        Ok(())
    }

    fn message(&mut self, target: EntityId, text: &str) -> Result<(), PlatformError> {
        self.check_alive(target)?;
        self.applied.push(Applied::Message {
            target,
            text: text.to_string(),
        });
        Ok(())
    }

    fn particle(&mut self, target: EntityId, name: &str, count: i64) -> Result<(), PlatformError> {
        self.applied.push(Applied::Particle {
            target,
            name: name.to_string(),
            count,
        });
        Ok(())
    }

    fn sound(
        &mut self,
        target: EntityId,
        name: &str,
        _volume: f64,
        _pitch: f64,
    ) -> Result<(), PlatformError> {
        self.applied.push(Applied::Sound {
            target,
            name: name.to_string(),
        });
        Ok(())
    }

    fn command(&mut self, target: EntityId, command: &str) -> Result<(), PlatformError> {
        self.applied.push(Applied::Command {
            target,
            command: command.to_string(),
        });
        Ok(())
    }

    fn explode(&mut self, target: EntityId, power: f64) -> Result<(), PlatformError> {
        self.check_alive(target)?;
        self.applied.push(Applied::Explosion { target, power });
        Ok(())
    }

    fn set_speed(
        &mut self,
        target: EntityId,
        multiplier: f64,
        duration_ms: u64,
    ) -> Result<(), PlatformError> {
        self.check_alive(target)?;
        self.applied.push(Applied::Speed {
            target,
            multiplier,
            duration_ms,
        });
        Ok(())
    }

    fn launch(
        &mut self,
        source: EntityId,
        projectile: &str,
        speed: f64,
    ) -> Result<(), PlatformError> {
        self.check_alive(source)?;
        self.applied.push(Applied::Launch {
            source,
            projectile: projectile.to_string(),
            speed,
        });
        Ok(())
    }

    fn lightning(&mut self, target: EntityId) -> Result<(), PlatformError> {
        self.check_alive(target)?;
        self.applied.push(Applied::Lightning { target });
        Ok(())
    }

    fn schedule(&mut self, delay_ms: u64, task: ScheduledTask) -> TaskId {
        let id = TaskId::new(self.next_task);
        self.next_task += 1;
        self.scheduled.push((id, self.now_ms + delay_ms, task));
        id
    }

    fn cancel(&mut self, task: TaskId) {
        // Spent or unknown ids are a no-op, per the contract.
        if let Some(index) = self.scheduled.iter().position(|(id, _, _)| *id == task) {
            self.scheduled.remove(index);
            self.cancelled.push(task);
        }
    }
}

/// Arithmetic formula evaluator covering the expression shapes the
/// tests use: `+ - * /`, parentheses, unary minus, numbers, and bound
/// variables (`10 + Lv*2`).
pub struct FixtureFormula;

impl FormulaEvaluator for FixtureFormula {
    fn evaluate(&self, expr: &str, vars: &[(&str, f64)]) -> Result<f64, FormulaError> {
        let mut parser = Parser {
            src: expr.as_bytes(),
            pos: 0,
            vars,
            expr,
        };
        let value = parser.expression()?;
        parser.skip_spaces();
        if parser.pos != parser.src.len() {
            return Err(FormulaError::Parse(expr.to_string()));
        }
        if !value.is_finite() {
            return Err(FormulaError::NotFinite(expr.to_string()));
        }
        Ok(value)
    }
}

struct Parser<'a> {
    src: &'a [u8],
    pos: usize,
    vars: &'a [(&'a str, f64)],
    expr: &'a str,
}

impl Parser<'_> {
    fn skip_spaces(&mut self) {
        while self.src.get(self.pos) == Some(&b' ') {
            self.pos += 1;
        }
    }

    fn peek(&mut self) -> Option<u8> {
        self.skip_spaces();
        self.src.get(self.pos).copied()
    }

    fn expression(&mut self) -> Result<f64, FormulaError> {
        let mut value = self.term()?;
        while let Some(op @ (b'+' | b'-')) = self.peek() {
            self.pos += 1;
            let rhs = self.term()?;
            value = if op == b'+' { value + rhs } else { value - rhs };
        }
        Ok(value)
    }

    fn term(&mut self) -> Result<f64, FormulaError> {
        let mut value = self.factor()?;
        while let Some(op @ (b'*' | b'/')) = self.peek() {
            self.pos += 1;
            let rhs = self.factor()?;
            value = if op == b'*' { value * rhs } else { value / rhs };
        }
        Ok(value)
    }

    fn factor(&mut self) -> Result<f64, FormulaError> {
        match self.peek() {
            Some(b'-') => {
                self.pos += 1;
                Ok(-self.factor()?)
            }
            Some(b'(') => {
                self.pos += 1;
                let value = self.expression()?;
                if self.peek() != Some(b')') {
                    return Err(FormulaError::Parse(self.expr.to_string()));
                }
                self.pos += 1;
                Ok(value)
            }
            Some(c) if c.is_ascii_digit() || c == b'.' => {
                let start = self.pos;
                while self
                    .src
                    .get(self.pos)
                    .is_some_and(|c| c.is_ascii_digit() || *c == b'.')
                {
                    self.pos += 1;
                }
                self.expr[start..self.pos]
                    .parse()
                    .map_err(|_| FormulaError::Parse(self.expr.to_string()))
            }
            Some(c) if c.is_ascii_alphabetic() || c == b'_' => {
                let start = self.pos;
                while self
                    .src
                    .get(self.pos)
                    .is_some_and(|c| c.is_ascii_alphanumeric() || *c == b'_')
                {
                    self.pos += 1;
                }
                let name = &self.expr[start..self.pos];
                self.vars
                    .iter()
                    .find(|(bound, _)| *bound == name)
                    .map(|(_, value)| *value)
                    .ok_or_else(|| FormulaError::UnknownVariable(name.to_string()))
            }
            _ => Err(FormulaError::Parse(self.expr.to_string())),
        }
    }
}
