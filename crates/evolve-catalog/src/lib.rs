//! Evolve Catalog
//!
//! The closed set of source evolutions the planner may choose from. Each
//! evolution changes source text without changing the binary interface
//! existing clients were compiled against.
//!
//! # Catalog
//!
//! | kind | applies to | payload |
//! |---|---|---|
//! | [`ShuffleMembers`] | member blocks | permutation of member indices |
//! | [`SynthesizeMemberwiseInitializer`] | member blocks of structs without an initializer | initializer signatures |
//! | [`ChangeDefaultArgument`] | functions, initializers, subscripts outside protocols | parameter index and new default |
//!
//! Every kind implements [`Transformation`]; [`EvolutionKind`] enumerates
//! them in the fixed order the planner tests them in, and [`Evolution`] is
//! the serializable sum of their payloads.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod change_default_argument;
mod default_value;
mod error;
mod evolution;
mod kind;
mod memberwise_initializer;
mod shuffle_members;

pub use change_default_argument::ChangeDefaultArgument;
pub use default_value::{is_magic_literal, wrapped_default, DefaultValue, MAGIC_LITERALS, PLACEHOLDER_TEXT};
pub use error::EvolutionError;
pub use evolution::{Evolution, Transformation};
pub use kind::{EvolutionKind, UnknownKind};
pub use memberwise_initializer::{
    InitializerParameter, InitializerSignature, SynthesizeMemberwiseInitializer,
};
pub use shuffle_members::{ShuffleMembers, MIN_ELIGIBLE_MEMBERS};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
