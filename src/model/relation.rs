use super::entity::{check_delay, Client, Service};
use crate::error::Result;
use crate::graph::Graph;
use std::fmt;
use std::hash::Hash;

/// Which service a client depends on, and the one-way delay between them.
#[derive(Debug, Clone, PartialEq)]
pub struct Relation {
    client: Client,
    service: Service,
    t_c: f64,
}

impl Relation {
    pub fn new(client: Client, service: Service, t_c: f64) -> Result<Self> {
        let label = format!("{}->{}", client.name(), service.name());
        check_delay(&label, "t_c", t_c)?;
        Ok(Relation { client, service, t_c })
    }

    /// Builds a relation whose `t_c` is the cheapest path between the two
    /// nodes hosting the pair.
    pub fn from_topology<N>(client: Client, service: Service, topology: &Graph<N>, client_node: &N, service_node: &N) -> Result<Self>
    where
        N: Eq + Hash + Clone + fmt::Display,
    {
        let t_c = topology.communication_delay(client_node, service_node)?;
        Relation::new(client, service, t_c)
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn service(&self) -> &Service {
        &self.service
    }

    pub fn t_c(&self) -> f64 {
        self.t_c
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{},{},{:.2}>", self.client, self.service, self.t_c)
    }
}

/// Independent client/service pairs analysed together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct System {
    pub relations: Vec<Relation>,
}

impl System {
    pub fn new(relations: Vec<Relation>) -> Self {
        System { relations }
    }

    pub fn push(&mut self, relation: Relation) {
        self.relations.push(relation);
    }

    pub fn len(&self) -> usize {
        self.relations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Relation> {
        self.relations.iter()
    }
}

impl FromIterator<Relation> for System {
    fn from_iter<I: IntoIterator<Item = Relation>>(iter: I) -> Self {
        System {
            relations: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a System {
    type Item = &'a Relation;
    type IntoIter = std::slice::Iter<'a, Relation>;

    fn into_iter(self) -> Self::IntoIter {
        self.relations.iter()
    }
}
