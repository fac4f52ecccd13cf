pub(crate) mod assembler;
pub(crate) mod catalog;
pub(crate) mod render;
pub(crate) mod sufficiency;

use serde::{Deserialize, Serialize};

/// Abstract layout unit emitted by the assembler and consumed by the
/// renderer. `Line` carries the running question number, which is shared
/// across the whole paper and never resets per section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub(crate) enum Block {
    Heading { text: String },
    Line { number: u32, text: String },
    Note { text: String },
    Spacer,
}
