//! Precedence-ordered registry of block rules.
//!
//! Every rule has a name and a list of alternate chains it belongs to. A
//! chain (`"paragraph"`, `"blockquote"`, `"list"`, ...) is the subset of rules
//! allowed to interrupt that construct; the owning rule probes them in
//! silent mode to decide where it ends. The unnamed chain `""` holds every
//! enabled rule and drives the main tokenize loop.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use super::state::BlockState;

/// A block rule: `(state, start_line, end_line, silent) -> matched`.
///
/// In silent mode the rule only reports whether `start_line` opens its
/// construct and must not touch `state`.
pub type BlockRule = fn(&mut BlockState<'_>, usize, usize, bool) -> bool;

/// Errors raised when editing a [`Ruler`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RulerError {
    /// No rule is registered under this name.
    #[error("no block rule named `{0}`")]
    UnknownRule(String),
}

#[derive(Clone)]
struct RuleEntry {
    name: &'static str,
    rule: BlockRule,
    alt: SmallVec<[&'static str; 4]>,
    enabled: bool,
}

/// Ordered rule list with precompiled chains.
#[derive(Clone, Default)]
pub struct Ruler {
    rules: Vec<RuleEntry>,
    chains: FxHashMap<&'static str, Vec<BlockRule>>,
}

impl Ruler {
    /// Create an empty ruler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule at the lowest precedence.
    pub fn push(&mut self, name: &'static str, rule: BlockRule, alt: &[&'static str]) {
        self.rules.push(RuleEntry::new(name, rule, alt));
        self.compile();
    }

    /// Insert a rule so it is tried right before `anchor`.
    pub fn before(
        &mut self,
        anchor: &str,
        name: &'static str,
        rule: BlockRule,
        alt: &[&'static str],
    ) -> Result<(), RulerError> {
        let idx = self.find(anchor)?;
        self.rules.insert(idx, RuleEntry::new(name, rule, alt));
        self.compile();
        Ok(())
    }

    /// Insert a rule so it is tried right after `anchor`.
    pub fn after(
        &mut self,
        anchor: &str,
        name: &'static str,
        rule: BlockRule,
        alt: &[&'static str],
    ) -> Result<(), RulerError> {
        let idx = self.find(anchor)?;
        self.rules.insert(idx + 1, RuleEntry::new(name, rule, alt));
        self.compile();
        Ok(())
    }

    /// Enable a previously disabled rule.
    pub fn enable(&mut self, name: &str) -> Result<(), RulerError> {
        self.set_enabled(name, true)
    }

    /// Disable a rule without removing it.
    pub fn disable(&mut self, name: &str) -> Result<(), RulerError> {
        self.set_enabled(name, false)
    }

    /// Rules of a chain in precedence order. `""` is the main chain.
    pub fn rules(&self, chain: &str) -> &[BlockRule] {
        self.chains.get(chain).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Names of the enabled rules in precedence order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().filter(|r| r.enabled).map(|r| r.name)
    }

    /// Check if a rule is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.rules.iter().any(|r| r.name == name)
    }

    fn set_enabled(&mut self, name: &str, enabled: bool) -> Result<(), RulerError> {
        let idx = self.find(name)?;
        self.rules[idx].enabled = enabled;
        self.compile();
        Ok(())
    }

    fn find(&self, name: &str) -> Result<usize, RulerError> {
        self.rules
            .iter()
            .position(|r| r.name == name)
            .ok_or_else(|| RulerError::UnknownRule(name.to_owned()))
    }

    /// Rebuild every chain from the current rule order.
    fn compile(&mut self) {
        self.chains.clear();
        let main = self.chains.entry("").or_default();
        for entry in self.rules.iter().filter(|r| r.enabled) {
            main.push(entry.rule);
        }

        for entry in self.rules.iter().filter(|r| r.enabled) {
            for &chain in &entry.alt {
                self.chains.entry(chain).or_default().push(entry.rule);
            }
        }
    }
}

impl RuleEntry {
    fn new(name: &'static str, rule: BlockRule, alt: &[&'static str]) -> Self {
        Self {
            name,
            rule,
            alt: alt.iter().copied().collect(),
            enabled: true,
        }
    }
}
