//! Cross-option checks run once the grammar accepted the command line.
//!
//! Rules are evaluated in [`RULES`] order and the first violation is
//! reported; adding a check means adding an entry, nothing else.

use crate::cli::{Args, FLAG_CIRCULAR, FLAG_LINEAR};
use crate::error::UsageErrorKind;
use std::collections::HashMap;

/// Parsed values plus where each long option first appeared on the command line.
pub struct Draft<'a> {
    pub args: &'a Args,
    pub first_seen: &'a HashMap<String, usize>,
}

impl Draft<'_> {
    fn position(&self, id: &str) -> Option<usize> {
        self.first_seen.get(id).copied()
    }
}

pub struct Rule {
    pub name: &'static str,
    pub check: fn(&Draft<'_>) -> Option<UsageErrorKind>,
}

pub const RULES: &[Rule] = &[Rule {
    name: "circular-linear-exclusion",
    check: circular_linear_exclusion,
}];

pub fn validate(draft: &Draft<'_>) -> Result<(), UsageErrorKind> {
    match RULES.iter().find_map(|rule| (rule.check)(draft)) {
        Some(violation) => Err(violation),
        None => Ok(()),
    }
}

/// The flag whose first occurrence comes second is the one reported.
fn circular_linear_exclusion(draft: &Draft<'_>) -> Option<UsageErrorKind> {
    if !(draft.args.circular && draft.args.linear) {
        return None;
    }
    let (arg, prior) = if draft.position("linear") >= draft.position("circular") {
        (FLAG_LINEAR, FLAG_CIRCULAR)
    } else {
        (FLAG_CIRCULAR, FLAG_LINEAR)
    };
    Some(UsageErrorKind::NotAllowedWith {
        arg: arg.to_string(),
        prior: prior.to_string(),
    })
}
