//! Subcommand registry
//!
//! Built once at startup and read-only afterwards. Names are unique: a second
//! registration under the same name is rejected instead of being shadowed.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use tracing::debug;

use super::{decrypt, encrypt, keyexchange, keygen, Command, Io};
use crate::error::{PoniError, Result};

#[derive(Default)]
pub struct CommandRegistry {
    commands: BTreeMap<&'static str, Box<dyn Command>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry with every built-in command
    pub fn standard() -> Result<Self> {
        let mut registry = Self::new();
        registry.register(Box::new(keygen::Keygen))?;
        registry.register(Box::new(encrypt::Encrypt))?;
        registry.register(Box::new(decrypt::Decrypt))?;
        registry.register(Box::new(keyexchange::KeyExchange))?;
        Ok(registry)
    }

    pub fn register(&mut self, command: Box<dyn Command>) -> Result<()> {
        let name = command.name();
        if self.commands.contains_key(name) {
            return Err(PoniError::DuplicateCommand(name.to_string()));
        }
        self.commands.insert(name, command);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&dyn Command> {
        self.commands.get(name).map(|c| c.as_ref())
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.commands.keys().copied()
    }

    /// Run the command registered under exactly `name`
    pub fn dispatch(&self, name: &str, args: &[String], io: &mut Io<'_>) -> Result<()> {
        let command = self
            .get(name)
            .ok_or_else(|| PoniError::CommandNotFound(name.to_string()))?;

        debug!(command = name, argc = args.len(), "dispatching command");
        command.run(args, io)
    }

    /// One line per command, for top-level help
    pub fn usage(&self) -> String {
        let mut out = String::from("Commands:\n");
        for (name, command) in &self.commands {
            let _ = writeln!(out, "  {:<12} {}", name, command.about());
        }
        out.push_str("\nRun 'poni <command> -h' for the options of a command.");
        out
    }
}
