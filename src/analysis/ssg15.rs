//! Startup delay formulas as published in J. R. Seyler, T. Streichert,
//! M. Glaß, N. Navet and J. Teich, "Formal analysis of the startup delay of
//! SOME/IP service discovery", DATE 2015.
//!
//! Kept for comparison with the main model. Differences: `z` is not clamped
//! at zero, `x` counts one message less, a repetition run of `x` messages
//! lasts `(2^(x+1) - 1) * rep_del`, and times are measured from the client's
//! boot rather than from system start. The case letters follow the paper,
//! not [`DiscoveryCase`](super::DiscoveryCase).

use super::quantities::pow2;
use crate::error::{Result, TimingError};
use crate::logging::{LogLevel, TimingLogger};
use crate::model::entity::check_delay;
use crate::model::{Client, Service};

const COMPONENT: &str = "timing_ssg15";

pub fn compute_z_s(s: &Service, c: &Client, log: &dyn TimingLogger) -> f64 {
    let result = s.entity().t_init() - c.entity().t_init();
    log.log(
        LogLevel::Debug,
        COMPONENT,
        &format!(
            "compute_z_s(s.t_init: {:.2}, c.t_init: {:.2}) -> {:.2}",
            s.entity().t_init(),
            c.entity().t_init(),
            result
        ),
    );
    result
}

pub fn compute_z_c(s: &Service, c: &Client, log: &dyn TimingLogger) -> f64 {
    let result = c.entity().boot_del() - s.entity().t_init();
    log.log(
        LogLevel::Debug,
        COMPONENT,
        &format!(
            "compute_z_c(c.boot_del: {:.2}, s.t_init: {:.2}) -> {:.2}",
            c.entity().boot_del(),
            s.entity().t_init(),
            result
        ),
    );
    result
}

fn messages_before(z: f64, t_c: f64, rep_del: f64, owner: &str) -> Result<u32> {
    if z <= t_c {
        return Ok(0);
    }
    if rep_del <= 0.0 {
        return Err(TimingError::invalid(owner, "rep_del must be positive to count repetitions"));
    }
    let covering = (((z - t_c) / rep_del) + 1.0).log2().ceil() as u32;
    Ok(covering.saturating_sub(1))
}

pub fn compute_x_s(s: &Service, c: &Client, t_c: f64, log: &dyn TimingLogger) -> Result<u32> {
    let z_s = compute_z_s(s, c, log);
    let result = messages_before(z_s, t_c, c.entity().rep_del(), c.name())?;
    log.log(
        LogLevel::Debug,
        COMPONENT,
        &format!(
            "compute_x_s(z_s: {:.2}, t_c: {:.2}, c.rep_del: {:.2}) -> {}",
            z_s,
            t_c,
            c.entity().rep_del(),
            result
        ),
    );
    Ok(result)
}

pub fn compute_x_c(s: &Service, c: &Client, t_c: f64, log: &dyn TimingLogger) -> Result<u32> {
    let z_c = compute_z_c(s, c, log);
    let result = messages_before(z_c, t_c, s.entity().rep_del(), s.name())?;
    log.log(
        LogLevel::Debug,
        COMPONENT,
        &format!(
            "compute_x_c(z_c: {:.2}, t_c: {:.2}, s.rep_del: {:.2}) -> {}",
            z_c,
            t_c,
            s.entity().rep_del(),
            result
        ),
    );
    Ok(result)
}

pub fn compute_x_c_hat(s: &Service, c: &Client, t_c: f64, log: &dyn TimingLogger) -> Result<u32> {
    let x_c = compute_x_c(s, c, t_c, log)?;
    let result = x_c.min(s.entity().rep_max());
    log.log(
        LogLevel::Debug,
        COMPONENT,
        &format!("compute_x_c_hat(s.rep_max: {}, x_c: {}) -> {}", s.entity().rep_max(), x_c, result),
    );
    Ok(result)
}

pub fn compute_x_s_hat(s: &Service, c: &Client, t_c: f64, log: &dyn TimingLogger) -> Result<u32> {
    let x_s = compute_x_s(s, c, t_c, log)?;
    let result = x_s.min(c.entity().rep_max());
    log.log(
        LogLevel::Debug,
        COMPONENT,
        &format!("compute_x_s_hat(c.rep_max: {}, x_s: {}) -> {}", c.entity().rep_max(), x_s, result),
    );
    Ok(result)
}

pub fn compute_y(s: &Service, c: &Client, t_c: f64, log: &dyn TimingLogger) -> Result<i64> {
    let z_c = compute_z_c(s, c, log);
    if s.cyc_del() <= 0.0 {
        return Err(TimingError::invalid(s.name(), "cyc_del must be positive to count cyclic offers"));
    }
    let t_rep = (pow2(s.entity().rep_max() + 1) - 1.0) * s.entity().rep_del();
    let result = ((z_c - t_c - t_rep) / s.cyc_del()).ceil() as i64;
    log.log(
        LogLevel::Debug,
        COMPONENT,
        &format!(
            "compute_y(z_c: {:.2}, t_c: {:.2}, s.rep_max: {}, s.rep_del: {:.2}, s.cyc_del: {:.2}) -> {}",
            z_c,
            t_c,
            s.entity().rep_max(),
            s.entity().rep_del(),
            s.cyc_del(),
            result
        ),
    );
    Ok(result)
}

/// As published, `x̂_c` is clamped to `rep_max` so the guard always holds and
/// cyclic offers never contribute.
pub fn compute_y_hat(s: &Service, c: &Client, t_c: f64, log: &dyn TimingLogger) -> Result<i64> {
    let x_c_hat = compute_x_c_hat(s, c, t_c, log)?;
    let result = if x_c_hat <= s.entity().rep_max() { 0 } else { compute_y(s, c, t_c, log)? };
    log.log(
        LogLevel::Debug,
        COMPONENT,
        &format!("compute_y_hat(x_c_hat: {}) -> {}", x_c_hat, result),
    );
    Ok(result)
}

/// Offers received by a listening client, relative to its boot.
fn offer_path(s: &Service, c: &Client, t_c: f64, log: &dyn TimingLogger) -> Result<f64> {
    let x_hat = compute_x_c_hat(s, c, t_c, log)?;
    let y_hat = compute_y_hat(s, c, t_c, log)?;
    let z_c = compute_z_c(s, c, log);
    let t_rep = (pow2(x_hat + 1) - 1.0) * s.entity().rep_del();
    let t_cyc = y_hat as f64 * s.cyc_del();
    Ok(t_rep + t_cyc + t_c - z_c)
}

/// (A) Service in Offer Mode and Client in Request Mode.
pub fn timing_analysis_a(s: &Service, c: &Client, t_c: f64, log: &dyn TimingLogger) -> Result<f64> {
    check_delay("relation", "t_c", t_c)?;
    // (A1) the client is up before the service's first offer arrives.
    if s.entity().t_init() + t_c >= c.entity().boot_del() {
        let z_s = compute_z_s(s, c, log);
        let result = z_s + c.entity().init_del() + t_c;
        log.log(
            LogLevel::Debug,
            COMPONENT,
            &format!(
                "timing_analysis_a1(z_s: {:.2}, c.init_del: {:.2}, t_c: {:.2}) -> {:.2}",
                z_s,
                c.entity().init_del(),
                t_c,
                result
            ),
        );
        return Ok(result);
    }
    // (A2) the service is already repeating when the client boots.
    let offered = offer_path(s, c, t_c, log)?;
    let answered = c.entity().init_del() + 2.0 * t_c + s.ans_del();
    let result = offered.min(answered);
    log.log(
        LogLevel::Debug,
        COMPONENT,
        &format!("timing_analysis_a2(offered: {:.2}, answered: {:.2}) -> {:.2}", offered, answered, result),
    );
    Ok(result)
}

/// (B) Service in Offer Mode and Client in Listen Mode.
pub fn timing_analysis_b(s: &Service, c: &Client, t_c: f64, log: &dyn TimingLogger) -> Result<f64> {
    check_delay("relation", "t_c", t_c)?;
    let result = offer_path(s, c, t_c, log)?;
    log.log(LogLevel::Debug, COMPONENT, &format!("timing_analysis_b(t_c: {:.2}) -> {:.2}", t_c, result));
    Ok(result)
}

/// (C) Service in Silent Mode and Client in Request Mode.
pub fn timing_analysis_c(s: &Service, c: &Client, t_c: f64, log: &dyn TimingLogger) -> Result<f64> {
    check_delay("relation", "t_c", t_c)?;
    // (C1) the service listens by the time the first find arrives.
    if c.entity().t_init() + t_c >= s.entity().t_init() {
        let result = c.entity().init_del() + 2.0 * t_c + s.ans_del();
        log.log(
            LogLevel::Debug,
            COMPONENT,
            &format!(
                "timing_analysis_c1(c.init_del: {:.2}, s.ans_del: {:.2}, t_c: {:.2}) -> {:.2}",
                c.entity().init_del(),
                s.ans_del(),
                t_c,
                result
            ),
        );
        return Ok(result);
    }
    // (C2) the client repeats finds until the service is up.
    let x_s = compute_x_s(s, c, t_c, log)?;
    let t_rep = (pow2(x_s + 1) - 1.0) * c.entity().rep_del();
    let result = c.entity().t_init() - c.entity().boot_del() + t_rep + t_c + s.ans_del() + t_c;
    log.log(
        LogLevel::Debug,
        COMPONENT,
        &format!("timing_analysis_c2(x_s: {}, t_rep: {:.2}, t_c: {:.2}) -> {:.2}", x_s, t_rep, t_c, result),
    );
    Ok(result)
}

pub fn timing_analysis(s: &Service, c: &Client, t_c: f64, log: &dyn TimingLogger) -> Result<f64> {
    match (s.offer_mode(), c.find_mode()) {
        (true, true) => {
            log.log(LogLevel::Debug, COMPONENT, "(a) Service in Offer Mode and Client in Request Mode");
            timing_analysis_a(s, c, t_c, log)
        }
        (true, false) => {
            log.log(LogLevel::Debug, COMPONENT, "(b) Service in Offer Mode and Client in Listen Mode");
            timing_analysis_b(s, c, t_c, log)
        }
        (false, true) => {
            log.log(LogLevel::Debug, COMPONENT, "(c) Service in Silent Mode and Client in Request Mode");
            timing_analysis_c(s, c, t_c, log)
        }
        (false, false) => Err(TimingError::InvalidConfiguration {
            client: c.name().to_string(),
            service: s.name().to_string(),
        }),
    }
}
