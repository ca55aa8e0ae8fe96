use super::quantities::*;
use crate::error::{Result, TimingError};
use crate::logging::{LogLevel, TimingLogger};
use crate::model::entity::check_delay;
use crate::model::{Client, Relation, Service};
use indexmap::IndexMap;
use std::fmt;

/// Which discovery mechanism applies to a client/service pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiscoveryCase {
    /// (a) Service in Offer Mode, Client in Listen Mode.
    OfferListen,
    /// (b) Service in Silent Mode, Client in Find Mode.
    SilentFind,
    /// (c) Service in Offer Mode, Client in Find Mode.
    OfferFind,
}

impl DiscoveryCase {
    pub fn select(s: &Service, c: &Client) -> Result<Self> {
        match (s.offer_mode(), c.find_mode()) {
            (true, false) => Ok(DiscoveryCase::OfferListen),
            (false, true) => Ok(DiscoveryCase::SilentFind),
            (true, true) => Ok(DiscoveryCase::OfferFind),
            (false, false) => Err(TimingError::InvalidConfiguration {
                client: c.name().to_string(),
                service: s.name().to_string(),
            }),
        }
    }

    pub fn tag(&self) -> char {
        match self {
            DiscoveryCase::OfferListen => 'a',
            DiscoveryCase::SilentFind => 'b',
            DiscoveryCase::OfferFind => 'c',
        }
    }
}

impl fmt::Display for DiscoveryCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            DiscoveryCase::OfferListen => "Service in Offer Mode and Client in Listen Mode",
            DiscoveryCase::SilentFind => "Service in Silent Mode and Client in Request Mode",
            DiscoveryCase::OfferFind => "Service in Offer Mode and Client in Request Mode",
        };
        write!(f, "({}) {}", self.tag(), text)
    }
}

struct OfferBreakdown {
    x_c_hat: u32,
    t_rep: f64,
    y_hat: u64,
    t_cyc: f64,
    total: f64,
}

struct FindBreakdown {
    x_s_hat: u32,
    t_rep: f64,
    total: f64,
}

fn offer_breakdown(s: &Service, c: &Client, t_c: f64, log: &dyn TimingLogger) -> Result<OfferBreakdown> {
    check_delay("relation", "t_c", t_c)?;
    let x_c_hat = compute_x_c_hat(s, c, t_c, log)?;
    let t_rep = compute_t_rep(s.entity(), x_c_hat, log);
    let y_hat = compute_y_hat(s, c, t_c, log)?;
    let t_cyc = compute_t_cyc(s, y_hat, log);
    let total = s.entity().t_init() + t_rep + t_cyc + t_c;
    log.log(
        LogLevel::Debug,
        COMPONENT,
        &format!(
            "timing_analysis_a(s.t_init: {:.2}, t_rep: {:.2}, t_cyc: {:.2}, t_c: {:.2}) -> {:.2}",
            s.entity().t_init(),
            t_rep,
            t_cyc,
            t_c,
            total
        ),
    );
    Ok(OfferBreakdown { x_c_hat, t_rep, y_hat, t_cyc, total })
}

fn find_breakdown(s: &Service, c: &Client, t_c: f64, log: &dyn TimingLogger) -> Result<FindBreakdown> {
    check_delay("relation", "t_c", t_c)?;
    let x_s_hat = compute_x_s_hat(s, c, t_c, log)?;
    let t_rep = compute_t_rep(c.entity(), x_s_hat, log);
    // Find travels to the service, the answer travels back.
    let total = c.entity().t_init() + t_rep + t_c + s.ans_del() + t_c;
    log.log(
        LogLevel::Debug,
        COMPONENT,
        &format!(
            "timing_analysis_b(c.t_init: {:.2}, t_rep: {:.2}, t_c: {:.2}, s.ans_del: {:.2}, t_c: {:.2}) -> {:.2}",
            c.entity().t_init(),
            t_rep,
            t_c,
            s.ans_del(),
            t_c,
            total
        ),
    );
    Ok(FindBreakdown { x_s_hat, t_rep, total })
}

/// Discovery time when the client only listens for the service's offers.
pub fn timing_analysis_a(s: &Service, c: &Client, t_c: f64, log: &dyn TimingLogger) -> Result<f64> {
    Ok(offer_breakdown(s, c, t_c, log)?.total)
}

/// Discovery time when a silent service only answers the client's finds.
pub fn timing_analysis_b(s: &Service, c: &Client, t_c: f64, log: &dyn TimingLogger) -> Result<f64> {
    Ok(find_breakdown(s, c, t_c, log)?.total)
}

/// Both mechanisms run; whichever completes first wins.
pub fn timing_analysis_c(s: &Service, c: &Client, t_c: f64, log: &dyn TimingLogger) -> Result<f64> {
    let timing_a = timing_analysis_a(s, c, t_c, log)?;
    let timing_b = timing_analysis_b(s, c, t_c, log)?;
    let result = timing_a.min(timing_b);
    log.log(
        LogLevel::Debug,
        COMPONENT,
        &format!("timing_analysis_c(timing_a: {:.2}, timing_b: {:.2}) -> {:.2}", timing_a, timing_b, result),
    );
    Ok(result)
}

/// Time from system start until `c` has located `s`.
pub fn timing_analysis(s: &Service, c: &Client, t_c: f64, log: &dyn TimingLogger) -> Result<f64> {
    let case = DiscoveryCase::select(s, c)?;
    log.log(LogLevel::Info, COMPONENT, &case.to_string());
    match case {
        DiscoveryCase::OfferListen => timing_analysis_a(s, c, t_c, log),
        DiscoveryCase::SilentFind => timing_analysis_b(s, c, t_c, log),
        DiscoveryCase::OfferFind => timing_analysis_c(s, c, t_c, log),
    }
}

/// Discovery time of one relation, with the sub-intervals that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub client: String,
    pub service: String,
    pub communication_delay: f64,
    pub case: DiscoveryCase,
    pub discovery_time: f64,
    pub details: IndexMap<String, f64>,
}

impl fmt::Display for Analysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} (t_c: {:.2}, case {}): {:.2} ms",
            self.client,
            self.service,
            self.communication_delay,
            self.case.tag(),
            self.discovery_time
        )
    }
}

fn offer_details(details: &mut IndexMap<String, f64>, prefix: &str, s: &Service, b: &OfferBreakdown) {
    details.insert(format!("{}s.t_init", prefix), s.entity().t_init());
    details.insert(format!("{}x_c_hat", prefix), b.x_c_hat as f64);
    details.insert(format!("{}t_rep", prefix), b.t_rep);
    details.insert(format!("{}y_hat", prefix), b.y_hat as f64);
    details.insert(format!("{}t_cyc", prefix), b.t_cyc);
    details.insert(format!("{}total", prefix), b.total);
}

fn find_details(details: &mut IndexMap<String, f64>, prefix: &str, s: &Service, c: &Client, b: &FindBreakdown) {
    details.insert(format!("{}c.t_init", prefix), c.entity().t_init());
    details.insert(format!("{}x_s_hat", prefix), b.x_s_hat as f64);
    details.insert(format!("{}t_rep", prefix), b.t_rep);
    details.insert(format!("{}s.ans_del", prefix), s.ans_del());
    details.insert(format!("{}total", prefix), b.total);
}

/// Like [`timing_analysis`], keeping the breakdown for diagnostics.
pub fn analyze(relation: &Relation, log: &dyn TimingLogger) -> Result<Analysis> {
    let (s, c, t_c) = (relation.service(), relation.client(), relation.t_c());
    let case = DiscoveryCase::select(s, c)?;
    log.log(LogLevel::Info, COMPONENT, &format!("{} {}", relation, case));

    let mut details = IndexMap::new();
    details.insert("t_c".to_string(), t_c);
    let discovery_time = match case {
        DiscoveryCase::OfferListen => {
            let a = offer_breakdown(s, c, t_c, log)?;
            offer_details(&mut details, "", s, &a);
            a.total
        }
        DiscoveryCase::SilentFind => {
            let b = find_breakdown(s, c, t_c, log)?;
            find_details(&mut details, "", s, c, &b);
            b.total
        }
        DiscoveryCase::OfferFind => {
            let a = offer_breakdown(s, c, t_c, log)?;
            let b = find_breakdown(s, c, t_c, log)?;
            offer_details(&mut details, "a.", s, &a);
            find_details(&mut details, "b.", s, c, &b);
            a.total.min(b.total)
        }
    };

    Ok(Analysis {
        client: c.name().to_string(),
        service: s.name().to_string(),
        communication_delay: t_c,
        case,
        discovery_time,
        details,
    })
}
