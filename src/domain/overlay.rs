//! Macro-bias overlay: advisory opinions derived from a per-asset macro
//! stance. Report-only: the overlay rides on the result record and never
//! alters the terminal action chosen by the rule table.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MacroBias {
    StrongSupport,
    WeakSupport,
    #[default]
    Neutral,
}

impl MacroBias {
    pub fn parse(input: &str) -> MacroBias {
        match input.trim().to_uppercase().as_str() {
            "STRONG_SUPPORT" => MacroBias::StrongSupport,
            "WEAK_SUPPORT" => MacroBias::WeakSupport,
            _ => MacroBias::Neutral,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opinion {
    Ok,
    Neutral,
    No,
}

impl fmt::Display for Opinion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Opinion::Ok => "OK",
            Opinion::Neutral => "Neutral",
            Opinion::No => "No",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sizing {
    Go100,
    Go50,
    NoTrade,
}

impl fmt::Display for Sizing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Sizing::Go100 => "Go100",
            Sizing::Go50 => "Go50",
            Sizing::NoTrade => "NoTrade",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayCall {
    /// 1–5 day opinion.
    pub short_term: Opinion,
    /// 2–3 week opinion.
    pub medium_term: Opinion,
    pub sizing: Sizing,
}

/// Derive the advisory call from the macro bias. Sizing: both opinions OK →
/// full size; one OK → half size; otherwise no trade.
pub fn overlay(bias: MacroBias) -> OverlayCall {
    let (short_term, medium_term) = match bias {
        MacroBias::StrongSupport => (Opinion::Ok, Opinion::Ok),
        MacroBias::WeakSupport => (Opinion::Ok, Opinion::Neutral),
        MacroBias::Neutral => (Opinion::No, Opinion::No),
    };

    let ok = |o: Opinion| o == Opinion::Ok;
    let sizing = if ok(short_term) && ok(medium_term) {
        Sizing::Go100
    } else if ok(short_term) || ok(medium_term) {
        Sizing::Go50
    } else {
        Sizing::NoTrade
    };

    OverlayCall {
        short_term,
        medium_term,
        sizing,
    }
}
