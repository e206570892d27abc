//! Rotating User-Agent strings.
//!
//! A fixed, read-only table of recent desktop Chrome on Windows User-Agents.
//! The pool is built once and handed to client constructors; sampling takes
//! the random source as a parameter so tests can seed it.

use rand::seq::IndexedRandom;
use rand::Rng;

use crate::config::DEFAULT_USER_AGENT;

/// Chrome 120+ on Windows 10/11, the same family real visitors send.
const CHROME_WINDOWS_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/125.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/128.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/129.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/130.0.0.0 Safari/537.36",
    DEFAULT_USER_AGENT,
];

/// Immutable set of User-Agent strings to sample from.
#[derive(Debug, Clone)]
pub struct UserAgentPool {
    agents: Vec<String>,
}

impl Default for UserAgentPool {
    fn default() -> Self {
        Self::new(CHROME_WINDOWS_USER_AGENTS.iter().map(|ua| ua.to_string()))
    }
}

impl UserAgentPool {
    /// Builds a pool from arbitrary strings; empty entries are skipped.
    pub fn new<I>(agents: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        Self {
            agents: agents.into_iter().filter(|ua| !ua.trim().is_empty()).collect(),
        }
    }

    /// Picks one User-Agent, or the default one if the pool is empty.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        self.agents
            .choose(rng)
            .map(String::as_str)
            .unwrap_or(DEFAULT_USER_AGENT)
    }

    /// Number of strings in the pool.
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    /// Whether the pool has no strings.
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}
