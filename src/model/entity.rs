use super::phase::{Phase, PhaseLabel};
use crate::error::{Result, TimingError};
use std::fmt;

/// Upper bound on `rep_max`. AUTOSAR stacks use single digits; anything
/// past this overflows the backoff arithmetic long before it is useful.
pub const MAX_REPETITIONS: u32 = 64;

/// Length given to the Main Phase before any cross-entity adjustment.
const MAIN_PHASE_SEED: f64 = 1.0;

/// Phase timeline shared by clients and services.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    name: String,
    boot_del: f64,
    init_del: f64,
    rep_del: f64,
    rep_max: u32,
    t_init: f64,
    phases: [Phase; 4],
    rep_times: Vec<f64>,
}

pub(crate) fn check_delay(entity: &str, field: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(TimingError::invalid(
            entity,
            format!("{} must be a finite non-negative delay, got {}", field, value),
        ));
    }
    Ok(())
}

impl Entity {
    pub fn new(name: &str, boot_del: f64, init_del: f64, rep_del: f64, rep_max: u32) -> Result<Self> {
        check_delay(name, "boot_del", boot_del)?;
        check_delay(name, "init_del", init_del)?;
        check_delay(name, "rep_del", rep_del)?;
        if rep_max > MAX_REPETITIONS {
            return Err(TimingError::invalid(
                name,
                format!("rep_max {} exceeds {}", rep_max, MAX_REPETITIONS),
            ));
        }

        let t_init = boot_del + init_del;

        let boot = Phase::new(0.0, boot_del, PhaseLabel::Boot);
        let initial = Phase::new(boot.end, init_del, PhaseLabel::Initial);
        let rep_duration: f64 = (0..rep_max).map(|i| 2f64.powi(i as i32) * rep_del).sum();
        let repetition = Phase::new(initial.end, rep_duration, PhaseLabel::Repetition);
        let main = Phase::new(repetition.end, MAIN_PHASE_SEED, PhaseLabel::Main);

        // The first entry is the message sent when the Initial Wait Phase ends.
        let mut rep_times = Vec::with_capacity(rep_max as usize + 1);
        rep_times.push(t_init);
        for i in 0..rep_max {
            let last = rep_times[rep_times.len() - 1];
            rep_times.push(last + 2f64.powi(i as i32) * rep_del);
        }

        Ok(Entity {
            name: name.to_string(),
            boot_del,
            init_del,
            rep_del,
            rep_max,
            t_init,
            phases: [boot, initial, repetition, main],
            rep_times,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn boot_del(&self) -> f64 {
        self.boot_del
    }

    pub fn init_del(&self) -> f64 {
        self.init_del
    }

    pub fn rep_del(&self) -> f64 {
        self.rep_del
    }

    pub fn rep_max(&self) -> u32 {
        self.rep_max
    }

    /// Instant the Initial Wait Phase ends and the first message goes out.
    pub fn t_init(&self) -> f64 {
        self.t_init
    }

    pub fn phases(&self) -> &[Phase; 4] {
        &self.phases
    }

    pub fn phase(&self, label: PhaseLabel) -> &Phase {
        &self.phases[label as usize]
    }

    pub fn rep_times(&self) -> &[f64] {
        &self.rep_times
    }

    pub fn main_phase_end(&self) -> f64 {
        self.phases[3].end
    }

    pub(crate) fn widen_main_phase(&mut self, end: f64) {
        self.phases[3].widen_to(end);
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A service consumer.
#[derive(Debug, Clone, PartialEq)]
pub struct Client {
    entity: Entity,
    find_mode: bool,
}

impl Client {
    pub fn new(name: &str, boot_del: f64, init_del: f64, rep_del: f64, rep_max: u32, find_mode: bool) -> Result<Self> {
        Ok(Client {
            entity: Entity::new(name, boot_del, init_del, rep_del, rep_max)?,
            find_mode,
        })
    }

    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    /// Whether the client actively sends Find messages.
    pub fn find_mode(&self) -> bool {
        self.find_mode
    }

    pub fn name(&self) -> &str {
        self.entity.name()
    }
}

/// A service provider.
#[derive(Debug, Clone, PartialEq)]
pub struct Service {
    entity: Entity,
    cyc_del: f64,
    ans_del: f64,
    offer_mode: bool,
}

impl Service {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: &str,
        boot_del: f64,
        init_del: f64,
        rep_del: f64,
        rep_max: u32,
        cyc_del: f64,
        ans_del: f64,
        offer_mode: bool,
    ) -> Result<Self> {
        let entity = Entity::new(name, boot_del, init_del, rep_del, rep_max)?;
        check_delay(name, "cyc_del", cyc_del)?;
        check_delay(name, "ans_del", ans_del)?;
        Ok(Service {
            entity,
            cyc_del,
            ans_del,
            offer_mode,
        })
    }

    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    /// Period of the Offer messages sent in the Main Phase.
    pub fn cyc_del(&self) -> f64 {
        self.cyc_del
    }

    /// Delay between receiving a Find and sending the answering Offer.
    pub fn ans_del(&self) -> f64 {
        self.ans_del
    }

    /// Whether the service actively sends Offer messages.
    pub fn offer_mode(&self) -> bool {
        self.offer_mode
    }

    pub fn name(&self) -> &str {
        self.entity.name()
    }
}

impl AsRef<Entity> for Entity {
    fn as_ref(&self) -> &Entity {
        self
    }
}

impl AsMut<Entity> for Entity {
    fn as_mut(&mut self) -> &mut Entity {
        self
    }
}

impl AsRef<Entity> for Client {
    fn as_ref(&self) -> &Entity {
        &self.entity
    }
}

impl AsMut<Entity> for Client {
    fn as_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }
}

impl AsRef<Entity> for Service {
    fn as_ref(&self) -> &Entity {
        &self.entity
    }
}

impl AsMut<Entity> for Service {
    fn as_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }
}

impl fmt::Display for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.entity, f)
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.entity, f)
    }
}

/// Latest Main Phase end over `entities`, `None` when the slice is empty.
pub fn get_time_max<E: AsRef<Entity>>(entities: &[E]) -> Option<f64> {
    entities
        .iter()
        .map(|e| e.as_ref().main_phase_end())
        .fold(None, |acc, end| match acc {
            Some(max) if max >= end => Some(max),
            _ => Some(end),
        })
}

/// Stretches every Main Phase so all entities share the same right edge.
pub fn adjust_phases<E: AsRef<Entity> + AsMut<Entity>>(entities: &mut [E]) {
    if let Some(max) = get_time_max(entities) {
        for entity in entities.iter_mut() {
            entity.as_mut().widen_main_phase(max);
        }
    }
}
