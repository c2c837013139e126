//! Dialect parsers.
//!
//! Every parser satisfies the same contract: scan one file's content and
//! insert whatever translatable strings it recognizes into the catalog.
//! Parsing is best-effort and never fatal; malformed input yields the
//! strings found in its well-formed prefix. The set of dialects is closed,
//! so the variants live behind one [`Parser`] enum (dispatched with
//! `enum_dispatch`) rather than a runtime registry.

mod php;
mod script;
mod settings;
mod smarty;

use enum_dispatch::enum_dispatch;

pub use php::PhpParser;
pub use script::ScriptParser;
pub use settings::SettingsParser;
pub use smarty::SmartyParser;

use crate::catalog::Catalog;

/// The contract every dialect parser satisfies.
#[enum_dispatch]
pub trait Parse {
    /// Scan `content` and insert discovered strings into `catalog`.
    ///
    /// `file_path` is recorded (relativized) on every reference. Must not
    /// fail: unrecognizable syntax is skipped, never propagated.
    fn parse(&self, file_path: &str, content: &str, catalog: &mut Catalog);
}

/// The closed set of dialect parsers.
#[enum_dispatch(Parse)]
#[derive(Debug, Clone)]
pub enum Parser {
    Php(PhpParser),
    Smarty(SmartyParser),
    Script(ScriptParser),
    Settings(SettingsParser),
}
