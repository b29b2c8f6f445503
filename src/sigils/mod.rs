//! Sigil codecs - conversions between wrapped variable references inside
//! document text, bare key names, and scripting-language member syntax.

mod key_operator;
mod script;
mod sigils;

pub use key_operator::{Reference, SigilKeyOperator};
pub use script::{PREFIX, SUFFIX, ScriptKeyOperator, ScriptSigilOperator, escape};
pub use sigils::Sigils;
