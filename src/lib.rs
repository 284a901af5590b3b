//! Semantic middle-end for the Structure Definition Language: typed
//! symbol model, aggregate layout engine, conditional-parse state
//! machine, and emission gateway shared by every OpenSDL target
//! emitter.
//!
//! This crate has no lexer/parser and no on-disk format of its own —
//! it's the part between them: a parser built against another crate
//! drives a [`Translator`] through the builder/lifecycle/control
//! actions in [`translator`], and one or more [`emission::Emitter`]
//! implementations (usually living in a sibling crate per target
//! language) receive the resulting event stream.
#![forbid(unsafe_code)]

pub mod block_pool;
pub mod config;
pub mod conditional;
pub mod dispatcher;
pub mod emission;
pub mod error;
pub mod ids;
pub mod layout;
pub mod locals;
pub mod model;
pub mod oracle;
pub mod options;
pub mod registry;
pub mod state;
pub mod translator;

pub use config::{AlignmentRule, TranslatorConfig, WordSize};
pub use conditional::TargetId;
pub use emission::{EmissionGateway, Emitter, EmitResult, Event, TvTypeTag, TvVersion, negotiate_tv};
pub use error::{Diagnostic, ErrorCode, ErrorVector, Severity};
pub use ids::{BaseType, Kind, TypeId};
pub use state::{Action, ParseState};
pub use translator::Translator;
