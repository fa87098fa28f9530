//! Numeric constants defined by the hosting environment
//!
//! A host binds names such as `TitaniumOre` to integer values before a
//! script is compiled. The scanner classifies matching words as
//! `DefinedConstant` tokens carrying the bound value.

pub mod error;
pub mod table;

pub use error::{DefineError, DefineResult};
pub use table::DefineTable;
