//! JSON description of a system under analysis.
//!
//! Entities carry an explicit `type` discriminant:
//!
//! ```json
//! {
//!   "relations": [
//!     {
//!       "client":  { "type": "client",  "name": "c0", "boot_del": 0, "find_mode": false },
//!       "service": { "type": "service", "name": "s0", "rep_del": 200, "cyc_del": 2000 },
//!       "t_c": 5.0
//!     }
//!   ]
//! }
//! ```
//!
//! All delays are in milliseconds. Only configured parameters are read; the
//! phase timeline is always recomputed on load.

use crate::error::{Result, TimingError};
use crate::model::{Client, Relation, Service, System};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub name: String,
    /// Boot delay (ms, default: 0)
    #[serde(default)]
    pub boot_del: f64,
    /// Initial Wait Phase length (ms, default: 0)
    #[serde(default)]
    pub init_del: f64,
    /// Base delay for repetition phase (ms, default: 100)
    #[serde(default = "default_rep_del")]
    pub rep_del: f64,
    /// Repetitions before entering main phase (default: 3)
    #[serde(default = "default_rep_max")]
    pub rep_max: u32,
    /// Send Find messages (default: true)
    #[serde(default = "default_active")]
    pub find_mode: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    /// Boot delay (ms, default: 0)
    #[serde(default)]
    pub boot_del: f64,
    /// Initial Wait Phase length (ms, default: 0)
    #[serde(default)]
    pub init_del: f64,
    /// Base delay for repetition phase (ms, default: 100)
    #[serde(default = "default_rep_del")]
    pub rep_del: f64,
    /// Repetitions before entering main phase (default: 3)
    #[serde(default = "default_rep_max")]
    pub rep_max: u32,
    /// Cyclic offer delay in main phase (ms, default: 1000)
    #[serde(default = "default_cyc_del")]
    pub cyc_del: f64,
    /// Delay before answering a Find (ms, default: 10)
    #[serde(default = "default_ans_del")]
    pub ans_del: f64,
    /// Send Offer messages (default: true)
    #[serde(default = "default_active")]
    pub offer_mode: bool,
}

fn default_rep_del() -> f64 { 100.0 }
fn default_rep_max() -> u32 { 3 }
fn default_cyc_del() -> f64 { 1000.0 }
fn default_ans_del() -> f64 { 10.0 }
fn default_active() -> bool { true }

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EntityConfig {
    Client(ClientConfig),
    Service(ServiceConfig),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationConfig {
    pub client: EntityConfig,
    pub service: EntityConfig,
    pub t_c: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemConfig {
    #[serde(default)]
    pub relations: Vec<RelationConfig>,
}

impl ClientConfig {
    pub fn build(&self) -> Result<Client> {
        Client::new(&self.name, self.boot_del, self.init_del, self.rep_del, self.rep_max, self.find_mode)
    }
}

impl ServiceConfig {
    pub fn build(&self) -> Result<Service> {
        Service::new(
            &self.name,
            self.boot_del,
            self.init_del,
            self.rep_del,
            self.rep_max,
            self.cyc_del,
            self.ans_del,
            self.offer_mode,
        )
    }
}

impl From<&Client> for ClientConfig {
    fn from(c: &Client) -> Self {
        ClientConfig {
            name: c.name().to_string(),
            boot_del: c.entity().boot_del(),
            init_del: c.entity().init_del(),
            rep_del: c.entity().rep_del(),
            rep_max: c.entity().rep_max(),
            find_mode: c.find_mode(),
        }
    }
}

impl From<&Service> for ServiceConfig {
    fn from(s: &Service) -> Self {
        ServiceConfig {
            name: s.name().to_string(),
            boot_del: s.entity().boot_del(),
            init_del: s.entity().init_del(),
            rep_del: s.entity().rep_del(),
            rep_max: s.entity().rep_max(),
            cyc_del: s.cyc_del(),
            ans_del: s.ans_del(),
            offer_mode: s.offer_mode(),
        }
    }
}

impl EntityConfig {
    fn name(&self) -> &str {
        match self {
            EntityConfig::Client(c) => &c.name,
            EntityConfig::Service(s) => &s.name,
        }
    }
}

impl RelationConfig {
    pub fn build(&self) -> Result<Relation> {
        let client = match &self.client {
            EntityConfig::Client(c) => c.build()?,
            other => {
                return Err(TimingError::invalid(other.name(), "expected an entity of type 'client'"));
            }
        };
        let service = match &self.service {
            EntityConfig::Service(s) => s.build()?,
            other => {
                return Err(TimingError::invalid(other.name(), "expected an entity of type 'service'"));
            }
        };
        Relation::new(client, service, self.t_c)
    }
}

impl From<&Relation> for RelationConfig {
    fn from(r: &Relation) -> Self {
        RelationConfig {
            client: EntityConfig::Client(r.client().into()),
            service: EntityConfig::Service(r.service().into()),
            t_c: r.t_c(),
        }
    }
}

impl SystemConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn into_system(self) -> Result<System> {
        self.relations.iter().map(RelationConfig::build).collect()
    }
}

impl From<&System> for SystemConfig {
    fn from(system: &System) -> Self {
        SystemConfig {
            relations: system.iter().map(RelationConfig::from).collect(),
        }
    }
}
