//! Intermediate quantities shared by the discovery-time formulas.
//!
//! Naming follows the protocol roles: the `_s` quantities describe a client
//! that starts repeating before the service is ready, the `_c` ones a service
//! that starts repeating before the client has booted.

use crate::error::{Result, TimingError};
use crate::logging::{LogLevel, TimingLogger};
use crate::model::{Client, Entity, Service};

pub(crate) const COMPONENT: &str = "timing";

pub(crate) fn pow2(x: u32) -> f64 {
    2f64.powi(x.min(i32::MAX as u32) as i32)
}

/// Number of backoff intervals of length `rep_del` needed to cover `span`.
fn intervals_covering(span: f64, rep_del: f64, owner: &str) -> Result<u32> {
    if rep_del <= 0.0 {
        return Err(TimingError::invalid(owner, "rep_del must be positive to count repetitions"));
    }
    Ok(((span / rep_del) + 1.0).log2().ceil() as u32)
}

/// Time from the start of the Repetition Phase until the `x`-th message is
/// sent, excluding the communication delay.
pub fn compute_t_rep(e: &Entity, x: u32, log: &dyn TimingLogger) -> f64 {
    let result = (pow2(x) - 1.0) * e.rep_del();
    log.log(
        LogLevel::Debug,
        COMPONENT,
        &format!("compute_t_rep(e.rep_del: {:.2}, x: {}) -> {:.2}", e.rep_del(), x, result),
    );
    result
}

/// Time from the start of the Main Phase until the `y`-th cyclic offer.
pub fn compute_t_cyc(s: &Service, y: u64, log: &dyn TimingLogger) -> f64 {
    let result = y as f64 * s.cyc_del();
    log.log(
        LogLevel::Debug,
        COMPONENT,
        &format!("compute_t_cyc(s.cyc_del: {:.2}, y: {}) -> {:.2}", s.cyc_del(), y, result),
    );
    result
}

/// How far the service's Repetition Phase starts after the client's.
pub fn compute_z_s(s: &Service, c: &Client, log: &dyn TimingLogger) -> f64 {
    let (s_init, c_init) = (s.entity().t_init(), c.entity().t_init());
    let result = if s_init > c_init { s_init - c_init } else { 0.0 };
    log.log(
        LogLevel::Debug,
        COMPONENT,
        &format!("compute_z_s(s.t_init: {:.2}, c.t_init: {:.2}) -> {:.2}", s_init, c_init, result),
    );
    result
}

/// How far the client finishes booting after the service starts repeating.
pub fn compute_z_c(s: &Service, c: &Client, log: &dyn TimingLogger) -> f64 {
    let (s_init, c_boot) = (s.entity().t_init(), c.entity().boot_del());
    let result = if s_init < c_boot { c_boot - s_init } else { 0.0 };
    log.log(
        LogLevel::Debug,
        COMPONENT,
        &format!("compute_z_c(c.boot_del: {:.2}, s.t_init: {:.2}) -> {:.2}", c_boot, s_init, result),
    );
    result
}

/// Find messages the client has already wasted before the service listens.
pub fn compute_x_s(s: &Service, c: &Client, t_c: f64, log: &dyn TimingLogger) -> Result<u32> {
    let z_s = compute_z_s(s, c, log);
    let rep_del = c.entity().rep_del();
    let result = if z_s > t_c {
        intervals_covering(z_s - t_c, rep_del, c.name())?
    } else {
        0
    };
    log.log(
        LogLevel::Debug,
        COMPONENT,
        &format!("compute_x_s(z_s: {:.2}, t_c: {:.2}, c.rep_del: {:.2}) -> {}", z_s, t_c, rep_del, result),
    );
    Ok(result)
}

/// Offer messages the service has already wasted before the client listens.
pub fn compute_x_c(s: &Service, c: &Client, t_c: f64, log: &dyn TimingLogger) -> Result<u32> {
    let z_c = compute_z_c(s, c, log);
    let rep_del = s.entity().rep_del();
    let result = if z_c > t_c {
        intervals_covering(z_c - t_c, rep_del, s.name())?
    } else {
        0
    };
    log.log(
        LogLevel::Debug,
        COMPONENT,
        &format!("compute_x_c(z_c: {:.2}, t_c: {:.2}, s.rep_del: {:.2}) -> {}", z_c, t_c, rep_del, result),
    );
    Ok(result)
}

pub fn compute_x_s_hat(s: &Service, c: &Client, t_c: f64, log: &dyn TimingLogger) -> Result<u32> {
    let x_s = compute_x_s(s, c, t_c, log)?;
    let rep_max = c.entity().rep_max();
    let result = rep_max.min(x_s);
    log.log(
        LogLevel::Debug,
        COMPONENT,
        &format!("compute_x_s_hat(c.rep_max: {}, x_s: {}) -> {}", rep_max, x_s, result),
    );
    Ok(result)
}

pub fn compute_x_c_hat(s: &Service, c: &Client, t_c: f64, log: &dyn TimingLogger) -> Result<u32> {
    let x_c = compute_x_c(s, c, t_c, log)?;
    let rep_max = s.entity().rep_max();
    let result = rep_max.min(x_c);
    log.log(
        LogLevel::Debug,
        COMPONENT,
        &format!("compute_x_c_hat(s.rep_max: {}, x_c: {}) -> {}", rep_max, x_c, result),
    );
    Ok(result)
}

/// Cyclic Main Phase offers already sent when the client comes up. May be
/// negative when the client is up before the Main Phase begins.
pub fn compute_y(s: &Service, c: &Client, t_c: f64, log: &dyn TimingLogger) -> Result<i64> {
    let z_c = compute_z_c(s, c, log);
    let t_rep = compute_t_rep(s.entity(), s.entity().rep_max(), log);
    if s.cyc_del() <= 0.0 {
        return Err(TimingError::invalid(s.name(), "cyc_del must be positive to count cyclic offers"));
    }
    let result = ((z_c - t_c - t_rep) / s.cyc_del()).ceil() as i64;
    log.log(
        LogLevel::Debug,
        COMPONENT,
        &format!(
            "compute_y(z_c: {:.2}, t_c: {:.2}, t_rep: {:.2}, s.cyc_del: {:.2}) -> {}",
            z_c,
            t_c,
            t_rep,
            s.cyc_del(),
            result
        ),
    );
    Ok(result)
}

/// `y`, counted only once the service has used up its repetitions.
pub fn compute_y_hat(s: &Service, c: &Client, t_c: f64, log: &dyn TimingLogger) -> Result<u64> {
    let x_c_hat = compute_x_c_hat(s, c, t_c, log)?;
    // Before the repetitions run out there are no cyclic offers to count,
    // so `y` (and its division by cyc_del) is not needed.
    let result = if x_c_hat >= s.entity().rep_max() {
        let y = compute_y(s, c, t_c, log)?;
        if y >= 0 { y as u64 } else { 0 }
    } else {
        0
    };
    log.log(
        LogLevel::Debug,
        COMPONENT,
        &format!("compute_y_hat(x_c_hat: {}, s.rep_max: {}) -> {}", x_c_hat, s.entity().rep_max(), result),
    );
    Ok(result)
}
