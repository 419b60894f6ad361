//! Startup-time convention-based service registration.
//!
//! # Responsibility
//! - Bind interface names to implementation names from a statically
//!   assembled candidate table, filtered by naming convention.
//! - Fail fast on ambiguous wiring before any traffic is served.
//!
//! # Invariants
//! - Candidates participate only when their name ends with the requested
//!   suffix.
//! - Interfaces prefixed with [`BASE_INTERFACE_PREFIX`] are shared generic
//!   contracts, never per-type bindings.
//! - One interface binds to at most one implementation; duplicates are a
//!   startup configuration error, not a silent pick.
//!
//! Runs single-threaded during process wiring and is inert afterwards.

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Reserved prefix marking shared generic contracts that are ineligible for
/// per-type binding (e.g. `BaseRepository`).
pub const BASE_INTERFACE_PREFIX: &str = "Base";

/// Lifetime scope requested for a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifetime {
    /// One instance per request/session.
    Scoped,
    /// One instance per process.
    Singleton,
    /// A fresh instance per resolution.
    Transient,
}

/// One implementation type and the interfaces it implements, by fully
/// qualified name. Assembled by hand (or generated) at startup; this is the
/// static stand-in for a reflection scan.
#[derive(Debug, Clone, Copy)]
pub struct Candidate {
    pub name: &'static str,
    pub interfaces: &'static [&'static str],
}

/// Produced binding, consumed once by the service container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistrationEntry {
    pub interface: &'static str,
    pub implementation: &'static str,
    pub lifetime: Lifetime,
}

/// Registration/wiring errors raised during startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    EmptySuffix,
    DuplicateBinding {
        interface: &'static str,
        first: &'static str,
        second: &'static str,
    },
}

impl Display for RegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptySuffix => write!(f, "registration suffix cannot be empty"),
            Self::DuplicateBinding {
                interface,
                first,
                second,
            } => write!(
                f,
                "interface `{interface}` is bound by both `{first}` and `{second}`"
            ),
        }
    }
}

impl Error for RegistryError {}

/// Consumer of registration entries (the service container boundary).
pub trait ServiceContainer {
    /// Accepts one binding; rejects duplicates for the same interface.
    fn register(&mut self, entry: RegistrationEntry) -> Result<(), RegistryError>;
}

/// In-memory registration table implementing [`ServiceContainer`].
#[derive(Debug, Default)]
pub struct RegistrationTable {
    bindings: BTreeMap<&'static str, RegistrationEntry>,
}

impl RegistrationTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Returns the binding for one interface, if registered.
    pub fn binding(&self, interface: &str) -> Option<&RegistrationEntry> {
        self.bindings.get(interface)
    }

    /// Returns all bindings sorted by interface name.
    pub fn entries(&self) -> impl Iterator<Item = &RegistrationEntry> {
        self.bindings.values()
    }
}

impl ServiceContainer for RegistrationTable {
    fn register(&mut self, entry: RegistrationEntry) -> Result<(), RegistryError> {
        if let Some(existing) = self.bindings.get(entry.interface) {
            return Err(RegistryError::DuplicateBinding {
                interface: entry.interface,
                first: existing.implementation,
                second: entry.implementation,
            });
        }

        self.bindings.insert(entry.interface, entry);
        Ok(())
    }
}

/// Scans `candidates` whose name ends with `suffix`, binds each to its first
/// eligible interface declared under `interface_module`, and feeds the
/// entries to `container`. Candidates with zero eligible interfaces are
/// skipped. Returns the number of bindings produced.
pub fn register_by_convention(
    suffix: &str,
    interface_module: &str,
    candidates: &[Candidate],
    lifetime: Lifetime,
    container: &mut dyn ServiceContainer,
) -> Result<usize, RegistryError> {
    if suffix.trim().is_empty() {
        return Err(RegistryError::EmptySuffix);
    }

    let mut bound = 0;
    for candidate in candidates {
        if !candidate.name.ends_with(suffix) {
            continue;
        }

        let Some(interface) = candidate
            .interfaces
            .iter()
            .copied()
            .find(|interface| is_eligible(interface, interface_module))
        else {
            continue;
        };

        container.register(RegistrationEntry {
            interface,
            implementation: candidate.name,
            lifetime,
        })?;
        bound += 1;
    }

    Ok(bound)
}

fn is_eligible(interface: &str, interface_module: &str) -> bool {
    let declared_in_module = interface
        .strip_prefix(interface_module)
        .is_some_and(|rest| rest.starts_with("::"));
    declared_in_module && !unqualified_name(interface).starts_with(BASE_INTERFACE_PREFIX)
}

fn unqualified_name(path: &str) -> &str {
    path.rsplit("::").next().unwrap_or(path)
}
