//! Process-wide string interning table.
//!
//! Token surfaces, lemmas, entity-type names and relation names all
//! travel through the analysis graphs as integer codes. The pool maps
//! codes back to decoded text. It is owned by the host application and
//! injected into the engine as a read-only reference, which keeps the
//! engine testable with synthetic pools.

use std::collections::HashMap;

/// Integer code identifying an interned string.
///
/// Code 0 is reserved for the empty string, so a zeroed candidate field
/// decodes to `""` rather than garbage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StrCode(pub u32);

impl StrCode {
    /// The reserved empty-string code.
    pub const EMPTY: StrCode = StrCode(0);
}

/// Interning table mapping [`StrCode`] to decoded text.
#[derive(Debug, Clone)]
pub struct StringPool {
    entries: Vec<String>,
    index: HashMap<String, StrCode>,
}

impl Default for StringPool {
    fn default() -> Self {
        Self::new()
    }
}

impl StringPool {
    /// Create a pool containing only the reserved empty string.
    pub fn new() -> Self {
        let mut index = HashMap::new();
        index.insert(String::new(), StrCode::EMPTY);
        Self {
            entries: vec![String::new()],
            index,
        }
    }

    /// Intern `text`, returning its code. Idempotent.
    pub fn intern(&mut self, text: &str) -> StrCode {
        if let Some(&code) = self.index.get(text) {
            return code;
        }
        let code = StrCode(self.entries.len() as u32);
        self.entries.push(text.to_string());
        self.index.insert(text.to_string(), code);
        code
    }

    /// Decode a code back to text.
    ///
    /// Unknown codes decode to the empty string; the upstream pipeline
    /// never hands out codes it did not intern.
    pub fn resolve(&self, code: StrCode) -> &str {
        match self.entries.get(code.0 as usize) {
            Some(text) => text,
            None => {
                log::debug!("unknown string code {:?}", code);
                ""
            }
        }
    }

    /// Number of interned strings (including the reserved empty one).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        // The reserved empty string is always present.
        false
    }
}
