//! Message timelines behind a discovery: every Find or Offer an entity sends
//! during startup, when it arrives, and whether the peer was able to take it.
//! Useful for drawing sequence charts or checking a computed discovery time
//! against the individual messages.

use crate::model::{Client, Entity, PhaseLabel, Service};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Find,
    Offer,
    /// Offer sent by a service in reply to a Find.
    Answer,
    /// Offer sent periodically during the Main Phase.
    CyclicOffer,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MessageEvent {
    pub kind: MessageKind,
    /// Position within the burst; 0 is the message ending the Initial Wait Phase.
    pub index: usize,
    pub sent_at: f64,
    pub arrives_at: f64,
    pub delivered: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct TraceOptions {
    /// Include the message sent when the Initial Wait Phase ends.
    pub include_first: bool,
    /// Stop after the first delivered message.
    pub stop_at_first: bool,
    /// Add the service's Answer after each delivered Find.
    pub include_answer: bool,
}

impl Default for TraceOptions {
    fn default() -> Self {
        TraceOptions {
            include_first: true,
            stop_at_first: true,
            include_answer: true,
        }
    }
}

/// An entity that sends Repetition Phase messages towards a peer.
pub trait Sender: AsRef<Entity> {
    type Peer;

    const KIND: MessageKind;

    /// Whether this entity sends anything at all in its current mode.
    fn is_active(&self) -> bool;

    /// Whether `peer` can take a message arriving at `arrival`.
    fn reaches(&self, peer: &Self::Peer, arrival: f64) -> bool;

    /// Reply delay of the peer, if a delivered message triggers one.
    fn answer_delay(&self, _peer: &Self::Peer) -> Option<f64> {
        None
    }
}

impl Sender for Client {
    type Peer = Service;

    const KIND: MessageKind = MessageKind::Find;

    fn is_active(&self) -> bool {
        self.find_mode()
    }

    // The service only answers once its own Initial Wait Phase is over.
    fn reaches(&self, peer: &Service, arrival: f64) -> bool {
        arrival >= peer.entity().t_init()
    }

    fn answer_delay(&self, peer: &Service) -> Option<f64> {
        Some(peer.ans_del())
    }
}

impl Sender for Service {
    type Peer = Client;

    const KIND: MessageKind = MessageKind::Offer;

    fn is_active(&self) -> bool {
        self.offer_mode()
    }

    // The client listens as soon as it has booted.
    fn reaches(&self, peer: &Client, arrival: f64) -> bool {
        arrival >= peer.entity().boot_del()
    }
}

/// Repetition Phase messages from `source` to `target`.
pub fn repetition_messages<S: Sender>(source: &S, target: &S::Peer, t_c: f64, opts: TraceOptions) -> Vec<MessageEvent> {
    let mut events = Vec::new();
    if !source.is_active() {
        return events;
    }

    for (index, &sent_at) in source.as_ref().rep_times().iter().enumerate() {
        if index == 0 && !opts.include_first {
            continue;
        }
        let arrives_at = sent_at + t_c;
        let delivered = source.reaches(target, arrives_at);
        events.push(MessageEvent {
            kind: S::KIND,
            index,
            sent_at,
            arrives_at,
            delivered,
        });

        if delivered && opts.include_answer {
            if let Some(ans_del) = source.answer_delay(target) {
                let answered_at = arrives_at + ans_del;
                events.push(MessageEvent {
                    kind: MessageKind::Answer,
                    index,
                    sent_at: answered_at,
                    arrives_at: answered_at + t_c,
                    delivered: true,
                });
            }
        }

        if delivered && opts.stop_at_first {
            break;
        }
    }
    events
}

/// Main Phase offers sent after the Repetition Phase, up to `horizon`.
/// Empty when `horizon` is not finite.
pub fn cyclic_messages(s: &Service, c: &Client, t_c: f64, horizon: f64, opts: TraceOptions) -> Vec<MessageEvent> {
    let mut events = Vec::new();
    if !s.offer_mode() || s.cyc_del() <= 0.0 || !horizon.is_finite() {
        return events;
    }

    let main_start = s.entity().phase(PhaseLabel::Repetition).end;
    let count = ((horizon - main_start) / s.cyc_del()).floor();
    if count < 1.0 {
        return events;
    }

    for index in 1..=count as usize {
        let sent_at = main_start + index as f64 * s.cyc_del();
        let arrives_at = sent_at + t_c;
        let delivered = s.reaches(c, arrives_at);
        events.push(MessageEvent {
            kind: MessageKind::CyclicOffer,
            index,
            sent_at,
            arrives_at,
            delivered,
        });
        if delivered && opts.stop_at_first {
            break;
        }
    }
    events
}

/// Interval separating the service's Repetition Phase start from the
/// client's: its Initial Wait start when the service is faster, its own
/// Repetition start otherwise. `None` when both start repeating together.
pub fn z_band(s: &Service, c: &Client) -> Option<(f64, f64)> {
    let s_rep = s.entity().phase(PhaseLabel::Repetition).start;
    let (s_init, c_init) = (s.entity().t_init(), c.entity().t_init());
    let edge = if s_init < c_init {
        c.entity().phase(PhaseLabel::Initial).start
    } else if s_init > c_init {
        c.entity().phase(PhaseLabel::Repetition).start
    } else {
        return None;
    };
    Some((edge.min(s_rep), edge.max(s_rep)))
}

/// Earliest arrival among the delivered events.
pub fn first_delivery(events: &[MessageEvent]) -> Option<f64> {
    events
        .iter()
        .filter(|e| e.delivered)
        .map(|e| e.arrives_at)
        .fold(None, |acc, t| match acc {
            Some(min) if min <= t => Some(min),
            _ => Some(t),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(boot_del: f64, find_mode: bool) -> Client {
        Client::new("client", boot_del, 10.0, 100.0, 3, find_mode).unwrap()
    }

    fn service(boot_del: f64, offer_mode: bool) -> Service {
        Service::new("service", boot_del, 10.0, 100.0, 3, 1000.0, 5.0, offer_mode).unwrap()
    }

    #[test]
    fn test_passive_sender_sends_nothing() {
        let c = client(0.0, false);
        let s = service(0.0, false);
        assert!(repetition_messages(&c, &s, 2.0, TraceOptions::default()).is_empty());
        assert!(repetition_messages(&s, &c, 2.0, TraceOptions::default()).is_empty());
        assert!(cyclic_messages(&s, &c, 2.0, 10_000.0, TraceOptions::default()).is_empty());
    }

    #[test]
    fn test_find_misses_until_service_ready() {
        // Client repeats at 10, 110, 310, 710; service ready at 260.
        let c = client(0.0, true);
        let s = service(250.0, false);
        let events = repetition_messages(&c, &s, 2.0, TraceOptions::default());

        let finds: Vec<_> = events.iter().filter(|e| e.kind == MessageKind::Find).collect();
        assert_eq!(finds.len(), 3);
        assert!(!finds[0].delivered);
        assert!(!finds[1].delivered);
        assert!(finds[2].delivered);
        assert_eq!(finds[2].sent_at, 310.0);

        let answer = events.last().unwrap();
        assert_eq!(answer.kind, MessageKind::Answer);
        assert_eq!(answer.sent_at, 312.0 + 5.0);
        assert_eq!(answer.arrives_at, 319.0);
        assert_eq!(first_delivery(&events), Some(312.0));
    }

    #[test]
    fn test_trace_all_without_stopping() {
        let c = client(0.0, true);
        let s = service(0.0, true);
        let opts = TraceOptions {
            include_first: false,
            stop_at_first: false,
            include_answer: false,
        };
        let events = repetition_messages(&s, &c, 1.0, opts);
        assert_eq!(events.len(), 3);
        assert!(events.iter().all(|e| e.kind == MessageKind::Offer && e.delivered));
        assert_eq!(events[0].index, 1);
    }

    #[test]
    fn test_cyclic_offers_wait_for_client_boot() {
        // Service Main Phase starts at 10 + 700 = 710.
        let s = service(0.0, true);
        let c = client(2500.0, false);
        let events = cyclic_messages(&s, &c, 3.0, 10_000.0, TraceOptions::default());
        assert_eq!(events[0].sent_at, 1710.0);
        assert!(!events[0].delivered);
        let hit = events.last().unwrap();
        assert!(hit.delivered);
        assert_eq!(hit.sent_at, 2710.0);
    }

    #[test]
    fn test_cyclic_offers_need_finite_horizon() {
        let s = service(0.0, true);
        let c = client(2500.0, false);
        let opts = TraceOptions {
            stop_at_first: false,
            ..TraceOptions::default()
        };
        assert!(cyclic_messages(&s, &c, 3.0, f64::INFINITY, opts).is_empty());
        assert!(cyclic_messages(&s, &c, 3.0, f64::NAN, opts).is_empty());
        // 710 + 1000 * i for i in 1..=3
        assert_eq!(cyclic_messages(&s, &c, 3.0, 3710.0, opts).len(), 3);
    }

    #[test]
    fn test_z_band() {
        let s = service(100.0, true);
        let c = client(0.0, true);
        assert_eq!(z_band(&s, &c), Some((10.0, 110.0)));
        assert_eq!(z_band(&service(0.0, true), &client(0.0, true)), None);
        assert_eq!(z_band(&service(0.0, true), &client(50.0, true)), Some((10.0, 50.0)));
    }
}
