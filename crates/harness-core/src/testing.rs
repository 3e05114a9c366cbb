//! In-memory invokers for exercising the orchestrator without a platform
//!
//! [`FakePlatform`] models the network state machine the suite asserts
//! against, and can be told to misbehave in specific ways. [`ScriptedInvoker`]
//! returns canned results for exact command lines.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::fixture::DEFAULT_NETWORKS;
use crate::invoker::{CommandInvoker, CommandLine, Invocation};
use crate::{Error, Result};

/// Routing table the fake host reports unless told otherwise
pub const FAKE_HOST_ROUTES: &str = "default via 10.0.0.1 dev eth0\n\
    10.0.0.0/24 dev eth0 proto kernel scope link src 10.0.0.5\n";

const KNOWN_DRIVERS: [&str; 3] = ["bridge", "host", "null"];

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn timed_out(command: &CommandLine) -> Error {
    Error::invocation(
        command.to_string(),
        command_executor::Error::TimedOut {
            command: command.to_string(),
            timeout: Duration::from_secs(60),
        },
    )
}

#[derive(Debug, Clone)]
struct FakeNetwork {
    driver: String,
    gateway: Option<String>,
    subnet: Option<String>,
    labels: BTreeMap<String, String>,
    options: BTreeMap<String, String>,
}

#[derive(Debug, Clone)]
struct FakeContainer {
    network: String,
    running: bool,
}

#[derive(Debug, Default)]
struct PlatformState {
    networks: BTreeMap<String, FakeNetwork>,
    containers: BTreeMap<String, FakeContainer>,
    calls: Vec<CommandLine>,
}

/// An in-memory container platform
#[derive(Debug)]
pub struct FakePlatform {
    state: Mutex<PlatformState>,
    host_routes: String,
    host_links: Vec<String>,
    allow_duplicates: bool,
    ignore_endpoints: bool,
    leak_routes_into_none: bool,
    hide_labels: bool,
    time_out_on: Vec<String>,
}

impl Default for FakePlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl FakePlatform {
    /// A well-behaved platform with only the default networks
    pub fn new() -> Self {
        let networks = DEFAULT_NETWORKS
            .iter()
            .map(|name| {
                let driver = if *name == "none" { "null" } else { *name };
                (
                    name.to_string(),
                    FakeNetwork {
                        driver: driver.to_string(),
                        gateway: None,
                        subnet: None,
                        labels: BTreeMap::new(),
                        options: BTreeMap::new(),
                    },
                )
            })
            .collect();

        Self {
            state: Mutex::new(PlatformState {
                networks,
                ..Default::default()
            }),
            host_routes: FAKE_HOST_ROUTES.to_string(),
            host_links: vec!["lo".to_string(), "eth0".to_string(), "p0".to_string()],
            allow_duplicates: false,
            ignore_endpoints: false,
            leak_routes_into_none: false,
            hide_labels: false,
            time_out_on: Vec::new(),
        }
    }

    /// Accept a second network with an existing name
    pub fn allow_duplicates(mut self) -> Self {
        self.allow_duplicates = true;
        self
    }

    /// Remove networks even while containers are attached
    pub fn ignore_endpoints(mut self) -> Self {
        self.ignore_endpoints = true;
        self
    }

    /// Give containers on `none` the host's routes
    pub fn leak_routes_into_none(mut self) -> Self {
        self.leak_routes_into_none = true;
        self
    }

    /// Leave labels and options out of `network inspect`
    pub fn hide_labels(mut self) -> Self {
        self.hide_labels = true;
        self
    }

    /// Time out every command whose rendering contains `needle`
    pub fn time_out_on(mut self, needle: impl Into<String>) -> Self {
        self.time_out_on.push(needle.into());
        self
    }

    /// Networks created through the platform that still exist
    pub fn live_networks(&self) -> Vec<String> {
        lock(&self.state)
            .networks
            .keys()
            .filter(|name| !DEFAULT_NETWORKS.contains(&name.as_str()))
            .cloned()
            .collect()
    }

    /// Containers that still exist
    pub fn live_containers(&self) -> Vec<String> {
        lock(&self.state).containers.keys().cloned().collect()
    }

    /// Every command received, in order
    pub fn calls(&self) -> Vec<CommandLine> {
        lock(&self.state).calls.clone()
    }

    fn host(&self, program: &str, args: &[String]) -> Option<Invocation> {
        if program != "ip" {
            return None;
        }
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        let invocation = match args.as_slice() {
            ["route"] | ["r"] | ["route", "show"] => Invocation::ok(self.host_routes.as_str()),
            ["link", "show", "dev", device] => {
                if self.host_links.iter().any(|link| link.as_str() == *device) {
                    Invocation::ok(format!("5: {device}: <BROADCAST,MULTICAST,UP> mtu 1500\n"))
                } else {
                    Invocation::failed(format!("Device \"{device}\" does not exist.\n"))
                }
            }
            _ => Invocation::new(255, "", "Command line is not complete.\n"),
        };
        Some(invocation)
    }

    fn platform(&self, state: &mut PlatformState, args: &[String]) -> Invocation {
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        match args.as_slice() {
            ["network", "create", rest @ ..] => self.network_create(state, rest),
            ["network", "inspect", name] => self.network_inspect(state, name),
            ["network", "remove", name] | ["network", "rm", name] => {
                self.network_remove(state, name)
            }
            ["run", rest @ ..] => self.run(state, rest),
            ["rm", "-f", name] => match state.containers.remove(*name) {
                Some(_) => Invocation::ok(format!("{name}\n")),
                None => Invocation::failed(format!("Error: container: {name}: not found\n")),
            },
            _ => Invocation::failed(format!("Error: unknown command {:?}\n", args.join(" "))),
        }
    }

    fn network_create(&self, state: &mut PlatformState, args: &[&str]) -> Invocation {
        let mut name = None;
        let mut network = FakeNetwork {
            driver: "bridge".to_string(),
            gateway: None,
            subnet: None,
            labels: BTreeMap::new(),
            options: BTreeMap::new(),
        };

        let mut args = args.iter();
        while let Some(flag) = args.next() {
            let Some(value) = args.next() else {
                return Invocation::failed(format!("Error: flag needs an argument: {flag}\n"));
            };
            match *flag {
                "--name" => name = Some(value.to_string()),
                "-d" | "--driver" => network.driver = value.to_string(),
                "--gateway" => network.gateway = Some(value.to_string()),
                "--subnet" => network.subnet = Some(value.to_string()),
                "--label" | "--option" => {
                    let Some((key, val)) = value.split_once('=') else {
                        return Invocation::failed(format!("Error: invalid {flag} {value}\n"));
                    };
                    let target = if *flag == "--label" {
                        &mut network.labels
                    } else {
                        &mut network.options
                    };
                    target.insert(key.to_string(), val.to_string());
                }
                other => return Invocation::failed(format!("Error: unknown flag: {other}\n")),
            }
        }

        let Some(name) = name else {
            return Invocation::failed("Error: network name cannot be empty\n");
        };
        if !KNOWN_DRIVERS.contains(&network.driver.as_str()) {
            return Invocation::failed(format!(
                "Error: failed to create network: driver {} not found\n",
                network.driver
            ));
        }
        if state.networks.contains_key(&name) && !self.allow_duplicates {
            return Invocation::failed(format!(
                "Error: failed to create network: network {name} already exist\n"
            ));
        }

        state.networks.insert(name.clone(), network);
        Invocation::ok(format!("{name}\n"))
    }

    fn network_inspect(&self, state: &PlatformState, name: &str) -> Invocation {
        let Some(network) = state.networks.get(name) else {
            return Invocation::failed(format!("Error: network {name} not found\n"));
        };

        let mut document = serde_json::json!({
            "Name": name,
            "Driver": network.driver,
            "Gateway": network.gateway,
            "Subnet": network.subnet,
        });
        if !self.hide_labels {
            document["Labels"] = serde_json::json!(network.labels);
            document["Options"] = serde_json::json!(network.options);
        }
        Invocation::ok(format!("{document:#}\n"))
    }

    fn network_remove(&self, state: &mut PlatformState, name: &str) -> Invocation {
        if DEFAULT_NETWORKS.contains(&name) {
            return Invocation::failed(format!(
                "Error: {name} is a pre-defined network and cannot be removed\n"
            ));
        }
        if !state.networks.contains_key(name) {
            return Invocation::failed(format!("Error: network {name} not found\n"));
        }
        let in_use = state
            .containers
            .values()
            .any(|container| container.running && container.network == name);
        if in_use && !self.ignore_endpoints {
            return Invocation::failed(format!("Error: network {name} has active endpoints\n"));
        }

        state.networks.remove(name);
        Invocation::ok(format!("{name}\n"))
    }

    fn run(&self, state: &mut PlatformState, args: &[&str]) -> Invocation {
        let mut detached = false;
        let mut name = None;
        let mut network = "bridge".to_string();
        let mut rest = args;
        loop {
            match rest {
                ["-d", tail @ ..] => {
                    detached = true;
                    rest = tail;
                }
                ["--name", value, tail @ ..] => {
                    name = Some(value.to_string());
                    rest = tail;
                }
                ["--net", value, tail @ ..] => {
                    network = value.to_string();
                    rest = tail;
                }
                _ => break,
            }
        }
        let [_image, command @ ..] = rest else {
            return Invocation::failed("Error: image name cannot be empty\n");
        };
        let name = name.unwrap_or_else(|| format!("anon-{}", state.containers.len()));

        let Some(attached) = state.networks.get(&network) else {
            return Invocation::failed(format!("Error: network {network} not found\n"));
        };
        if state.containers.contains_key(&name) {
            return Invocation::failed(format!("Error: container name {name} is in use\n"));
        }

        let stdout = match (network.as_str(), command) {
            (_, ["top"]) => String::new(),
            ("none", ["ip", "r"]) if self.leak_routes_into_none => self.host_routes.clone(),
            ("none", ["ip", "r"]) => String::new(),
            ("host", ["ip", "r"]) => self.host_routes.clone(),
            (_, ["ip", "r"]) => match &attached.gateway {
                Some(gateway) => format!("default via {gateway} dev eth0\n"),
                None => "default via 172.17.0.1 dev eth0\n".to_string(),
            },
            ("none", ["ip", "link", "ls", iface]) if *iface != "lo" => {
                return Invocation::failed(format!("ip: can't find device '{iface}'\n"));
            }
            (_, ["ip", "link", "ls", iface]) => format!(
                "2: {iface}@if7: <BROADCAST,MULTICAST,UP,LOWER_UP> mtu 1500 qdisc noqueue\n"
            ),
            _ => String::new(),
        };

        state.containers.insert(
            name.clone(),
            FakeContainer {
                network,
                running: detached,
            },
        );
        if detached {
            Invocation::ok(format!("{name}\n"))
        } else {
            Invocation::ok(stdout)
        }
    }
}

#[async_trait]
impl CommandInvoker for FakePlatform {
    async fn invoke(&self, command: &CommandLine) -> Result<Invocation> {
        let mut state = lock(&self.state);
        state.calls.push(command.clone());

        let rendered = command.to_string();
        if self.time_out_on.iter().any(|needle| rendered.contains(needle.as_str())) {
            return Err(timed_out(command));
        }

        match command {
            CommandLine::Platform { args } => Ok(self.platform(&mut state, args)),
            CommandLine::Host { program, args } => self.host(program, args).ok_or_else(|| {
                Error::invocation(
                    rendered.clone(),
                    command_executor::Error::command_not_found(program.as_str()),
                )
            }),
        }
    }
}

/// Invoker returning canned results for exact command lines
///
/// Commands without a canned result succeed with empty output.
#[derive(Debug, Default)]
pub struct ScriptedInvoker {
    responses: HashMap<CommandLine, Invocation>,
    faults: Vec<CommandLine>,
    panics: Vec<CommandLine>,
    calls: Mutex<Vec<CommandLine>>,
}

impl ScriptedInvoker {
    /// An invoker where everything succeeds
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `invocation` for `command`
    pub fn respond(mut self, command: CommandLine, invocation: Invocation) -> Self {
        self.responses.insert(command, invocation);
        self
    }

    /// Time out when `command` runs
    pub fn fail(mut self, command: CommandLine) -> Self {
        self.faults.push(command);
        self
    }

    /// Panic when `command` runs
    pub fn panic_on(mut self, command: CommandLine) -> Self {
        self.panics.push(command);
        self
    }

    /// Every command received, in order
    pub fn calls(&self) -> Vec<CommandLine> {
        lock(&self.calls).clone()
    }
}

#[async_trait]
impl CommandInvoker for ScriptedInvoker {
    async fn invoke(&self, command: &CommandLine) -> Result<Invocation> {
        lock(&self.calls).push(command.clone());

        if self.panics.contains(command) {
            panic!("scripted panic on `{command}`");
        }
        if self.faults.contains(command) {
            return Err(timed_out(command));
        }
        Ok(self
            .responses
            .get(command)
            .cloned()
            .unwrap_or_else(|| Invocation::ok("")))
    }
}
