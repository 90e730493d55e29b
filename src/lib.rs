pub mod ast;
mod ast_ext;
pub mod check;
pub mod config;
pub mod error;
pub mod eval;
pub mod fresh;
pub mod pred;
mod pred_ext;
pub mod report;
mod sp;
pub mod subst;
pub mod translate;

use std::collections::BTreeSet;

use ast::{Procedure, Program, Stmt};
use config::VcgConfig;
use error::Result;
use pred::Pred;
use report::{Obligation, Transformed, VcReport};
use sp::Transformer;
use translate::{ExprTranslator, SyntaxTranslator};

pub use error::VcgError;

/// Verification-condition generator.
///
/// For a procedure with contract `{pre} body {post}` the generator computes
/// `sp(body, pre)` and emits `sp(body, pre) ==> post`, which is valid exactly
/// when the procedure meets its contract. Deciding validity is left to an
/// external prover.
#[derive(Debug, Clone)]
pub struct Vcg<T = SyntaxTranslator> {
    config: VcgConfig,
    translator: T,
}

impl Default for Vcg {
    fn default() -> Self {
        Vcg {
            config: VcgConfig::default(),
            translator: SyntaxTranslator,
        }
    }
}

impl Vcg {
    pub fn new(config: VcgConfig) -> Result<Vcg> {
        Vcg::with_translator(config, SyntaxTranslator)
    }
}

impl<T: ExprTranslator> Vcg<T> {
    pub fn with_translator(config: VcgConfig, translator: T) -> Result<Vcg<T>> {
        config.validate()?;
        Ok(Vcg { config, translator })
    }

    /// The proof obligation for the program's main procedure as one formula.
    pub fn execute(&self, program: &Program) -> Result<Pred> {
        Ok(self.generate(program)?.predicate())
    }

    pub fn generate(&self, program: &Program) -> Result<VcReport> {
        let main = program.main_procedure()?;
        self.generate_procedure(main)
    }

    /// One report per procedure. Each is generated independently with its
    /// own fresh-name allocator.
    pub fn generate_all(&self, program: &Program) -> Result<Vec<VcReport>> {
        program
            .procedures
            .iter()
            .map(|p| self.generate_procedure(p))
            .collect()
    }

    pub fn generate_procedure(&self, procedure: &Procedure) -> Result<VcReport> {
        let Transformed { post, side, unsound } =
            self.run(&procedure.body, &procedure.pre, procedure.vars())?;
        let main = Obligation::new(
            post.implies(&procedure.post),
            procedure.post.span,
            "postcondition might not hold",
        );
        tracing::info!(
            procedure = %procedure.name,
            side_obligations = side.len(),
            unsound_sites = unsound.len(),
            "generated verification condition"
        );
        Ok(VcReport {
            procedure: procedure.name.clone(),
            main,
            side,
            unsound,
        })
    }

    /// `sp(stmt, pre)` on its own, with the side obligations raised by
    /// asserts and loops and any statements passed through without a rule.
    /// `post` is only meaningful when the result `is_sound()` and every
    /// side obligation is valid.
    pub fn transform(&self, stmt: &Stmt, pre: &Pred) -> Result<Transformed> {
        let mut reserved = stmt.vars();
        reserved.extend(pre.free_vars());
        self.run(stmt, pre, reserved)
    }

    fn run(&self, stmt: &Stmt, pre: &Pred, reserved: BTreeSet<String>) -> Result<Transformed> {
        let mut transformer = Transformer::new(&self.config, &self.translator, reserved);
        let post = transformer.sp(stmt, pre)?;
        Ok(Transformed {
            post,
            side: transformer.side,
            unsound: transformer.unsound,
        })
    }
}
