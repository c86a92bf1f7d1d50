//! Core value types of the lexicon.

pub mod attrs;
pub mod lexeme;
pub mod vocab;

pub use attrs::{ExtraAttributes, RESERVED_LU_ATTRIBUTES};
pub use lexeme::{compose_lu_name, reconstruct_lemma, split_lu_name, Lexeme, RawLexeme, Separator};
pub use vocab::{LuType, Pos, Status};
