//! Binding assembly.
//!
//! A `Bind` path resolves against the nodes its element's owning type
//! declared. Bindings never create nodes.

use tracing::debug;

use crate::error::{Diagnostic, ErrorKind};
use crate::foundation::{Annotation, Declaration};
use crate::tree::NodeId;
use crate::Environment;

use super::captor::Captor;
use super::lex_errors;

/// Assembles one `Bind` declaration.
pub(crate) fn assemble(environment: &mut Environment, captor: &Captor<'_>, declaration: &Declaration) {
    let Annotation::Bind { path } = &declaration.annotation else {
        return;
    };
    let site = &declaration.element;

    let role = match captor.capture(site) {
        Ok(role) => role,
        Err(reason) => {
            let diagnostic = Diagnostic::error(ErrorKind::InvalidBinding, site.clone(), reason.to_string());
            environment.report(diagnostic);
            return;
        }
    };

    let tokens = match environment.lexer_mut().lex(path) {
        Ok(tokens) => tokens,
        Err(errors) => return lex_errors(environment, site, path, errors),
    };

    let tree = environment.tree();
    let scope = environment.scope(site.scope());
    let mut node = NodeId::ROOT;

    for token in tokens.iter() {
        let next = tree
            .child(node, &token.identity)
            .map(|child| tree.primary(child))
            .filter(|child| scope.is_some_and(|scope| scope.contains(*child)));

        match next {
            Some(child) => node = child,
            None => {
                let message = format!("\"{}\" does not exist in \"{}\"", token.identity, path);
                let diagnostic = Diagnostic::error(ErrorKind::UnresolvedBinding, site.clone(), message)
                    .with_snippet(path.as_str(), token.span.clone());
                environment.report(diagnostic);
                return;
            }
        }
    }

    debug!(site = %site, role = %role, path = %path, "bound");
    environment.bind(node, role, site.clone());
}
