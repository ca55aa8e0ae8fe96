use super::engine::{analyze, timing_analysis, Analysis};
use super::quantities::COMPONENT;
use crate::error::{Result, TimingError};
use crate::logging::{LogLevel, TimingLogger};
use crate::model::{Relation, System};

/// Analyses every relation on its own; a failing relation does not stop
/// the others.
pub fn analyze_system(system: &System, log: &dyn TimingLogger) -> Vec<Result<Analysis>> {
    system
        .iter()
        .map(|relation| {
            let outcome = analyze(relation, log);
            if let Err(e) = &outcome {
                log.log(LogLevel::Warn, COMPONENT, &format!("{}: {}", relation, e));
            }
            outcome
        })
        .collect()
}

/// First relation with the largest discovery time, and that time.
fn bottleneck<'a>(system: &'a System, log: &dyn TimingLogger) -> Result<(&'a Relation, f64)> {
    let mut best: Option<(&Relation, f64)> = None;
    for relation in system {
        let time = timing_analysis(relation.service(), relation.client(), relation.t_c(), log)?;
        match best {
            Some((_, max)) if max >= time => {}
            _ => best = Some((relation, time)),
        }
    }
    best.ok_or(TimingError::EmptySystem)
}

/// Discovery time of the whole system: the slowest relation decides it.
/// Any failing relation fails the reduction.
pub fn timing_analysis_system(system: &System, log: &dyn TimingLogger) -> Result<f64> {
    let (relation, time) = bottleneck(system, log)?;
    log.log(
        LogLevel::Debug,
        COMPONENT,
        &format!("timing_analysis_system(relations: {}, bottleneck: {}) -> {:.2}", system.len(), relation, time),
    );
    Ok(time)
}

/// The relation whose discovery time equals the system's.
pub fn highest_impact_relation<'a>(system: &'a System, log: &dyn TimingLogger) -> Result<&'a Relation> {
    bottleneck(system, log).map(|(relation, _)| relation)
}
