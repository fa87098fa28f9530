//! Keyword table for CBOT
//!
//! Keyword spellings are not hard-coded in the scanner. They come from a
//! [`StringProvider`] that maps numeric ids to display strings, queried over
//! four contiguous id ranges (one per [`KeywordCategory`]). Operators are
//! keywords too, which is what drives maximal-munch operator scanning.

pub mod provider;
pub mod table;

pub use provider::{BuiltinStrings, KeywordFileError, StringProvider, TableStrings};
pub use table::KeywordTable;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of ids reserved for each category
pub const CATEGORY_WIDTH: i64 = 100;

/// The four keyword id ranges, in population order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordCategory {
    Language,
    Declaration,
    Value,
    Operator,
}

impl KeywordCategory {
    pub const ALL: [KeywordCategory; 4] = [
        KeywordCategory::Language,
        KeywordCategory::Declaration,
        KeywordCategory::Value,
        KeywordCategory::Operator,
    ];

    /// First id of the category's range
    pub fn base(self) -> i64 {
        match self {
            KeywordCategory::Language => 2000,
            KeywordCategory::Declaration => 2100,
            KeywordCategory::Value => 2200,
            KeywordCategory::Operator => 2300,
        }
    }

    pub fn of_id(id: i64) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| (category.base()..category.base() + CATEGORY_WIDTH).contains(&id))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            KeywordCategory::Language => "language",
            KeywordCategory::Declaration => "declarations",
            KeywordCategory::Value => "values",
            KeywordCategory::Operator => "operators",
        }
    }
}

impl fmt::Display for KeywordCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ids assigned by [`BuiltinStrings`], for parsers matching on token types
pub mod ids {
    // Language keywords
    pub const IF: i64 = 2000;
    pub const ELSE: i64 = 2001;
    pub const WHILE: i64 = 2002;
    pub const DO: i64 = 2003;
    pub const FOR: i64 = 2004;
    pub const BREAK: i64 = 2005;
    pub const CONTINUE: i64 = 2006;
    pub const SWITCH: i64 = 2007;
    pub const CASE: i64 = 2008;
    pub const DEFAULT: i64 = 2009;
    pub const TRY: i64 = 2010;
    pub const THROW: i64 = 2011;
    pub const CATCH: i64 = 2012;
    pub const FINALLY: i64 = 2013;
    pub const TXT_AND: i64 = 2014;
    pub const TXT_OR: i64 = 2015;
    pub const TXT_NOT: i64 = 2016;
    pub const RETURN: i64 = 2017;
    pub const CLASS: i64 = 2018;
    pub const EXTENDS: i64 = 2019;
    pub const SYNCHRONIZED: i64 = 2020;
    pub const NEW: i64 = 2021;
    pub const PUBLIC: i64 = 2022;
    pub const EXTERN: i64 = 2023;
    pub const FINAL: i64 = 2024;
    pub const STATIC: i64 = 2025;
    pub const PROTECTED: i64 = 2026;
    pub const PRIVATE: i64 = 2027;
    pub const REPEAT: i64 = 2028;
    pub const DEBUGDD: i64 = 2029;

    // Declarations
    pub const INT: i64 = 2100;
    pub const FLOAT: i64 = 2101;
    pub const BOOLEAN: i64 = 2102;
    pub const STRING: i64 = 2103;
    pub const VOID: i64 = 2104;
    pub const BOOL: i64 = 2105;

    // Values
    pub const TRUE: i64 = 2200;
    pub const FALSE: i64 = 2201;
    pub const NULL: i64 = 2202;
    pub const NAN: i64 = 2203;

    // Operators
    pub const OPEN_PAR: i64 = 2300;
    pub const CLOSE_PAR: i64 = 2301;
    pub const OPEN_BLOCK: i64 = 2302;
    pub const CLOSE_BLOCK: i64 = 2303;
    pub const SEMICOLON: i64 = 2304;
    pub const COMMA: i64 = 2305;
    pub const ELLIPSIS: i64 = 2306;
    pub const DOT: i64 = 2307;
    pub const OPEN_BRACKET: i64 = 2308;
    pub const CLOSE_BRACKET: i64 = 2309;
    pub const COLON: i64 = 2310;
    pub const QUESTION: i64 = 2311;
    pub const ADD: i64 = 2312;
    pub const SUB: i64 = 2313;
    pub const MUL: i64 = 2314;
    pub const DIV: i64 = 2315;
    pub const ASSIGN: i64 = 2316;
    pub const ASSIGN_ADD: i64 = 2317;
    pub const ASSIGN_SUB: i64 = 2318;
    pub const ASSIGN_MUL: i64 = 2319;
    pub const ASSIGN_DIV: i64 = 2320;
    pub const ASSIGN_OR: i64 = 2321;
    pub const ASSIGN_AND: i64 = 2322;
    pub const ASSIGN_XOR: i64 = 2323;
    pub const ASSIGN_SHL: i64 = 2324;
    pub const ASSIGN_SHR: i64 = 2325;
    pub const ASSIGN_ASR: i64 = 2326;
    pub const SHL: i64 = 2327;
    pub const SHR: i64 = 2328;
    pub const ASR: i64 = 2329;
    pub const INC: i64 = 2330;
    pub const DEC: i64 = 2331;
    pub const LT: i64 = 2332;
    pub const GT: i64 = 2333;
    pub const LE: i64 = 2334;
    pub const GE: i64 = 2335;
    pub const EQ: i64 = 2336;
    pub const NE: i64 = 2337;
    pub const BIT_AND: i64 = 2338;
    pub const BIT_XOR: i64 = 2339;
    pub const BIT_OR: i64 = 2340;
    pub const LOG_AND: i64 = 2341;
    pub const LOG_OR: i64 = 2342;
    pub const LOG_NOT: i64 = 2343;
    pub const BIT_NOT: i64 = 2344;
    pub const MODULO: i64 = 2345;
    pub const POWER: i64 = 2346;
    pub const ASSIGN_MODULO: i64 = 2347;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_of_id() {
        assert_eq!(KeywordCategory::of_id(ids::IF), Some(KeywordCategory::Language));
        assert_eq!(KeywordCategory::of_id(ids::BOOL), Some(KeywordCategory::Declaration));
        assert_eq!(KeywordCategory::of_id(ids::NAN), Some(KeywordCategory::Value));
        assert_eq!(
            KeywordCategory::of_id(ids::ASSIGN_MODULO),
            Some(KeywordCategory::Operator)
        );
        assert_eq!(KeywordCategory::of_id(1999), None);
        assert_eq!(KeywordCategory::of_id(2400), None);
    }
}
