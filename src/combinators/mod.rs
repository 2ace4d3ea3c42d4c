//! # Parser Combinators
//!
//! One struct per kind of parser node. Grammar authors normally build these through
//! the constructor functions of [`crate::prelude`].
//!
//! ## Node Kinds
//!
//! * **Primitives**: leaf parsers reading tokens, like `Token`, `Candidate`, `End`
//! * **Structural**: deterministic sequencing like `Map2` and `Bind`
//! * **Branching**: alternation and speculation like `OneOf`, `Safe`, `Lookahead`
//! * **Repetition**: loops like `ChainAtLeastOnceL` and the separated lists

mod branching;
mod primitives;
mod repetition;
mod structural;

pub use branching::{Assert, Lookahead, Not, OneOf, Safe, WithExpected};
pub use primitives::{
    Candidate, CurrentPosition, End, Fail, Recursive, Return, Token, TokenSequence,
};
pub use repetition::{
    ChainAtLeastOnceL, SeparatedAndOptionallyTerminatedAtLeastOnce, SeparatedAtLeastOnce,
};
pub use structural::{Bind, Map, Map2, Map3, Map4, ParserSequence};
