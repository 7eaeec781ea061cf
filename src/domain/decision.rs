//! Per-asset decision rule table.
//!
//! A fixed, ordered set of score threshold bands per asset, evaluated
//! top-down with first match winning. Total over the asset vocabulary:
//! assets without a rule table fall back to no-trade. Each decision carries
//! a rationale naming the exact boundary that fired so the action can be
//! audited against the score. Guard verdicts and trend signals are
//! enforced upstream by the orchestrator, never here.

use crate::domain::asset::Asset;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    LongFull,
    LongHalf,
    Long,
    Short,
    NoTrade,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::LongFull => "LONG_FULL",
            Action::LongHalf => "LONG_HALF",
            Action::Long => "LONG",
            Action::Short => "SHORT",
            Action::NoTrade => "NO_TRADE",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub struct Decision {
    pub action: Action,
    pub rationale: String,
}

/// Map (asset, score) to exactly one action. Boundary semantics are part of
/// the contract: `>=` and `<=` where stated, nothing else.
pub fn decide(asset: &Asset, score: f64) -> Decision {
    match asset {
        Asset::Gold => {
            if score >= 0.55 {
                rule(Action::LongFull, format!("score {score:.3} >= 0.55"))
            } else if score >= 0.53 {
                rule(Action::LongHalf, format!("score {score:.3} in [0.53, 0.55)"))
            } else {
                rule(Action::NoTrade, format!("score {score:.3} < 0.53"))
            }
        }
        Asset::Silver => {
            if score >= 0.96 {
                rule(Action::Long, format!("score {score:.3} >= 0.96"))
            } else {
                rule(Action::NoTrade, format!("score {score:.3} < 0.96"))
            }
        }
        Asset::Copper => {
            if score >= 0.56 {
                rule(Action::Long, format!("score {score:.3} >= 0.56"))
            } else {
                rule(Action::NoTrade, format!("score {score:.3} < 0.56"))
            }
        }
        Asset::NaturalGas => {
            if score >= 0.56 {
                rule(Action::Long, format!("score {score:.3} >= 0.56"))
            } else if score <= 0.44 {
                rule(Action::Short, format!("score {score:.3} <= 0.44"))
            } else {
                rule(
                    Action::NoTrade,
                    format!("score {score:.3} in (0.44, 0.56)"),
                )
            }
        }
        Asset::Other(name) => rule(
            Action::NoTrade,
            format!("{name}: no rule table, defaulting to NO_TRADE"),
        ),
    }
}

fn rule(action: Action, rationale: String) -> Decision {
    Decision { action, rationale }
}
