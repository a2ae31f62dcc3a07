//! Command interpreter for ftxcmd.
//!
//! Turns one line of user input into exchange calls:
//! - [`tokenizer`]: `;`-separated sub-commands, space-separated tokens
//! - [`order_builder`], [`conditional_builder`], [`split`], [`cancel`]:
//!   positional grammars producing intents from tokens and the [`Session`]
//! - [`Interpreter`]: dispatch, fat-finger guard, transport, reporting
//!
//! Every failure is reported through the [`Reporter`] and confined to the
//! sub-command that caused it.

pub mod cancel;
pub mod conditional_builder;
pub mod error;
pub mod interpreter;
pub mod order_builder;
pub mod reporter;
pub mod session;
pub mod split;
pub mod tokenizer;

pub use cancel::build_cancel;
pub use conditional_builder::build_conditional;
pub use error::{CommandError, CommandResult};
pub use interpreter::{Interpreter, HELP};
pub use order_builder::build_order;
pub use reporter::{RecordingReporter, Report, Reporter};
pub use session::Session;
pub use split::{parse_split, plan_ladder, MAX_RUNGS, RungIntent, SplitKind, SplitPlan};
pub use tokenizer::{is_quit, split_commands, tokens};
