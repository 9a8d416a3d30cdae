// SPDX-License-Identifier: GPL-3.0-only

mod disambiguator;
mod orchestrator;

pub use disambiguator::{ActionChoice, ConfirmedAction, PartitionActionMachine, PartitionActionState};
pub use orchestrator::{ActionOrchestrator, ActionOutcome};
