//! Converts a small subset of Python into Sigma16 assembly.
//!
//! The pipeline is [`lexer`] → [`parser`] → [`codegen`] → [`listing`].
//! Accepted programs assign integers and two-operand arithmetic results to
//! variables and use `if`/`elif`/`else`, `while` and `for ... in range(...)`
//! with single comparisons. Each generated instruction is annotated with the
//! Python statement it came from, and every variable gets a `data` cell.
//!
//! ```
//! let listing = converter::convert("a = 15\nb = a + 1").unwrap();
//! assert!(listing.contains("add R1,R2,R3"));
//! assert!(listing.contains("a data 15"));
//! ```

pub mod ast;
pub mod codegen;
pub mod error;
pub mod instruction;
pub mod lexer;
pub mod listing;
pub mod parser;

use tracing::debug;

pub use codegen::Variable;
pub use error::ConvertError;

/// Result of a successful conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assembly {
    listing: String,
    variables: Vec<Variable>,
}

impl Assembly {
    pub fn listing(&self) -> &str {
        &self.listing
    }

    /// Data-section variables in declaration order.
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn into_listing(self) -> String {
        self.listing
    }
}

pub struct Converter<'a> {
    source: &'a str,
}

impl<'a> Converter<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source }
    }

    pub fn program(&self) -> Result<ast::Program, ConvertError> {
        parser::parse(self.source)
    }

    pub fn assemble(&self) -> Result<Assembly, ConvertError> {
        let program = self.program()?;
        let generated = codegen::generate(&program)?;
        let listing = listing::render(&generated.items, &generated.variables);
        debug!(
            statements = program.body.len(),
            variables = generated.variables.len(),
            "converted program"
        );
        Ok(Assembly {
            listing,
            variables: generated.variables,
        })
    }
}

pub fn convert(source: &str) -> Result<String, ConvertError> {
    Converter::new(source).assemble().map(Assembly::into_listing)
}
