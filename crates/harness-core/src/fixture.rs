//! Expected network and container state, expressed as data
//!
//! A [`NetworkSpec`] describes a network the harness asks the platform to
//! create; a [`ContainerAttachment`] describes a container joined to one
//! network. Both know how to render the platform commands that create,
//! inspect and remove them, so suites are assembled from fixtures rather
//! than hand-written command strings.

use ipnet::Ipv4Net;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::net::Ipv4Addr;

use crate::invoker::CommandLine;
use crate::{Error, Result};

/// Networks every platform instance exposes without any setup
pub const DEFAULT_NETWORKS: [&str; 3] = ["bridge", "none", "host"];

/// Interface a container sees on a bridge network
pub const CONTAINER_INTERFACE: &str = "eth0";

/// Connectivity mode of a network
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Driver {
    /// Software bridge with its own subnet
    Bridge,
    /// Shares the host's network stack
    Host,
    /// Loopback only
    None,
    /// Any other driver name, registered or not
    Other(String),
}

impl Driver {
    /// The name the platform knows the driver by
    pub fn as_str(&self) -> &str {
        match self {
            Driver::Bridge => "bridge",
            Driver::Host => "host",
            Driver::None => "none",
            Driver::Other(name) => name,
        }
    }
}

impl From<&str> for Driver {
    fn from(name: &str) -> Self {
        match name {
            "bridge" => Driver::Bridge,
            "host" => Driver::Host,
            "none" => Driver::None,
            other => Driver::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A network the harness creates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkSpec {
    /// Unique among live networks
    pub name: String,
    /// Driver to request
    pub driver: Driver,
    /// Default-route address inside the subnet
    pub gateway: Option<Ipv4Addr>,
    /// Address block
    pub subnet: Option<Ipv4Net>,
    /// Free-form labels
    pub labels: BTreeMap<String, String>,
    /// Driver options
    pub options: BTreeMap<String, String>,
}

impl NetworkSpec {
    /// A network using `driver`
    pub fn new(name: impl Into<String>, driver: Driver) -> Self {
        Self {
            name: name.into(),
            driver,
            gateway: None,
            subnet: None,
            labels: BTreeMap::new(),
            options: BTreeMap::new(),
        }
    }

    /// A bridge network
    pub fn bridge(name: impl Into<String>) -> Self {
        Self::new(name, Driver::Bridge)
    }

    /// Set the gateway
    pub fn gateway(mut self, gateway: Ipv4Addr) -> Self {
        self.gateway = Some(gateway);
        self
    }

    /// Set the subnet
    pub fn subnet(mut self, subnet: Ipv4Net) -> Self {
        self.subnet = Some(subnet);
        self
    }

    /// Add a label
    pub fn label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    /// Add a driver option
    pub fn option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Catch fixtures the platform would reject for reasons other than
    /// the behaviour under test
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::invalid_fixture("network name is empty"));
        }
        if self.driver.as_str().is_empty() {
            return Err(Error::invalid_fixture(format!(
                "network '{}' has an empty driver name",
                self.name
            )));
        }
        if let (Some(gateway), Some(subnet)) = (self.gateway, self.subnet) {
            if !subnet.contains(&gateway) {
                return Err(Error::invalid_fixture(format!(
                    "gateway {} of network '{}' is outside subnet {}",
                    gateway, self.name, subnet
                )));
            }
        }
        for key in self.labels.keys().chain(self.options.keys()) {
            if key.is_empty() || key.contains('=') {
                return Err(Error::invalid_fixture(format!(
                    "invalid label/option key {:?} on network '{}'",
                    key, self.name
                )));
            }
        }
        Ok(())
    }

    /// `network create` for this spec
    pub fn create_command(&self) -> CommandLine {
        let mut args = vec![
            "network".to_string(),
            "create".to_string(),
            "--name".to_string(),
            self.name.clone(),
            "--driver".to_string(),
            self.driver.to_string(),
        ];
        if let Some(gateway) = self.gateway {
            args.push("--gateway".to_string());
            args.push(gateway.to_string());
        }
        if let Some(subnet) = self.subnet {
            args.push("--subnet".to_string());
            args.push(subnet.to_string());
        }
        for (key, value) in &self.labels {
            args.push("--label".to_string());
            args.push(format!("{}={}", key, value));
        }
        for (key, value) in &self.options {
            args.push("--option".to_string());
            args.push(format!("{}={}", key, value));
        }
        CommandLine::Platform { args }
    }

    /// `network inspect` for this network
    pub fn inspect_command(&self) -> CommandLine {
        network_inspect(&self.name)
    }

    /// `network remove` for this network
    pub fn remove_command(&self) -> CommandLine {
        network_remove(&self.name)
    }
}

/// `network inspect <name>`
pub fn network_inspect(name: &str) -> CommandLine {
    CommandLine::platform(["network", "inspect", name])
}

/// `network remove <name>`
pub fn network_remove(name: &str) -> CommandLine {
    CommandLine::platform(["network", "remove", name])
}

/// A command run inside a container to surface its network state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Probe {
    /// Print the routing table
    Routes,
    /// Print one link
    Link(String),
    /// Keep running so the container holds its endpoint
    Idle,
}

impl Probe {
    /// The probe's argv inside the container
    pub fn argv(&self) -> Vec<String> {
        match self {
            Probe::Routes => vec!["ip".to_string(), "r".to_string()],
            Probe::Link(iface) => vec![
                "ip".to_string(),
                "link".to_string(),
                "ls".to_string(),
                iface.clone(),
            ],
            Probe::Idle => vec!["top".to_string()],
        }
    }

    /// Whether the container must be started in the background
    pub fn detached(&self) -> bool {
        matches!(self, Probe::Idle)
    }
}

/// A container joined to one network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerAttachment {
    /// Container name
    pub container: String,
    /// Network the container joins
    pub network: String,
}

impl ContainerAttachment {
    /// Attach `container` to `network`
    pub fn new(container: impl Into<String>, network: impl Into<String>) -> Self {
        Self {
            container: container.into(),
            network: network.into(),
        }
    }

    /// `run` a container from `image` executing `probe`
    pub fn run_command(&self, image: &str, probe: &Probe) -> CommandLine {
        let mut args = vec!["run".to_string()];
        if probe.detached() {
            args.push("-d".to_string());
        }
        args.extend([
            "--name".to_string(),
            self.container.clone(),
            "--net".to_string(),
            self.network.clone(),
            image.to_string(),
        ]);
        args.extend(probe.argv());
        CommandLine::Platform { args }
    }

    /// `rm -f` the container, ending its attachment
    pub fn remove_command(&self) -> CommandLine {
        CommandLine::platform(["rm", "-f", self.container.as_str()])
    }
}
