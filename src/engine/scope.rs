use std::collections::HashMap;

use crate::code::{Arg, CodeBlock, FormatError};
use crate::runtime::{jdk, Identity};
use crate::types::TypeName;

/// One self-contained unit of construction: the statements emitted so far
/// and the names declared by them. A child never touches its parent's lists.
#[derive(Debug, Default)]
pub struct Scope {
    statements: Vec<CodeBlock>,
    names: HashMap<Identity, String>,
    parent: Option<Box<Scope>>,
}

impl Scope {
    pub fn child_of(parent: Scope) -> Self {
        Self { parent: Some(Box::new(parent)), ..Self::default() }
    }

    /// Detach the parent, leaving this scope standalone.
    pub fn take_parent(&mut self) -> Option<Scope> {
        self.parent.take().map(|parent| *parent)
    }

    pub fn push(&mut self, statement: CodeBlock) {
        self.statements.push(statement);
    }

    pub fn declare(&mut self, id: Identity, name: String) {
        self.names.insert(id, name);
    }

    pub fn name_of(&self, id: Identity) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Turn the scope into a single expression. Without statements that is
    /// `result` itself; otherwise the statements are wrapped in a supplier
    /// lambda cast to `ty` and invoked on the spot.
    pub fn close(self, result: CodeBlock, ty: &TypeName) -> Result<CodeBlock, FormatError> {
        if self.statements.is_empty() {
            return Ok(result);
        }
        let supplier = TypeName::parameterized(jdk::supplier_name(), vec![ty.boxed()]);
        let mut out = CodeBlock::of("(($T) () -> {\n$>", [Arg::ty(supplier)])?;
        for statement in self.statements {
            out.append(CodeBlock::of("$L;\n", [Arg::code(statement)])?);
        }
        out.append(CodeBlock::of("return $L;\n$<}).get()", [Arg::code(result)])?);
        Ok(out)
    }
}
