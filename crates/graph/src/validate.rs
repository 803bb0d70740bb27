//! Structural checks over grapher output.
//!
//! Each validator scans one collection and stops at the first violation.

use crate::error::{GraphError, Result};
use crate::types::{Def, Doc, Ref};
use std::collections::HashSet;

/// Ref keys must be unique and spans ordered
pub fn validate_refs(refs: &[Ref]) -> Result<()> {
    let mut seen = HashSet::with_capacity(refs.len());
    for r in refs {
        check_span("ref", &r.file, r.start, r.end)?;
        let key = r.ref_key();
        if seen.contains(&key) {
            return Err(GraphError::DuplicateRef(key.to_string()));
        }
        seen.insert(key);
    }
    Ok(())
}

/// Def keys must be unique, spans ordered, tree paths well-formed and
/// inline docs absent
pub fn validate_defs(defs: &[Def]) -> Result<()> {
    let mut seen = HashSet::with_capacity(defs.len());
    for def in defs {
        check_span("def", &def.file, def.def_start, def.def_end)?;
        if !def.docs.is_empty() {
            return Err(GraphError::InlineDefDocs(def.key.to_string()));
        }
        if let Err(reason) = check_tree_path(&def.tree_path) {
            return Err(GraphError::InvalidTreePath {
                def: def.key.to_string(),
                tree_path: def.tree_path.clone(),
                reason,
            });
        }
        if !seen.insert(&def.key) {
            return Err(GraphError::DuplicateDef(def.key.to_string()));
        }
    }
    Ok(())
}

/// Doc keys must be unique and spans ordered
pub fn validate_docs(docs: &[Doc]) -> Result<()> {
    let mut seen = HashSet::with_capacity(docs.len());
    for doc in docs {
        check_span("doc", &doc.file, doc.start, doc.end)?;
        let key = doc.doc_key();
        if seen.contains(&key) {
            return Err(GraphError::DuplicateDoc(key.to_string()));
        }
        seen.insert(key);
    }
    Ok(())
}

fn check_span(kind: &'static str, file: &str, start: usize, end: usize) -> Result<()> {
    if start > end {
        return Err(GraphError::invalid_span(kind, file, start, end));
    }
    Ok(())
}

/// An empty tree path is allowed (grapher did not emit one).
fn check_tree_path(tree_path: &str) -> std::result::Result<(), &'static str> {
    if tree_path.is_empty() {
        return Ok(());
    }
    for component in tree_path.split('/') {
        if component.is_empty() {
            return Err("empty component");
        }
        if component == "-" {
            return Err("ghost component without a name");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DefDoc, DefKey};

    fn def(path: &str) -> Def {
        Def::new(DefKey::new("r", "Python", "u", path), path, "a.py").span(1, 4)
    }

    fn reference(file: &str, start: usize, end: usize) -> Ref {
        Ref {
            def_path: "x".to_string(),
            file: file.to_string(),
            start,
            end,
            ..Default::default()
        }
    }

    #[test]
    fn rejects_duplicate_def_keys() {
        let defs = vec![def("a"), def("b"), def("a").span(0, 0).tree_path("a/-ghost/b")];
        assert!(validate_defs(&defs[..2]).is_ok());
        assert!(matches!(validate_defs(&defs), Err(GraphError::DuplicateDef(_))));
    }

    #[test]
    fn rejects_inverted_def_span() {
        let err = validate_defs(&[def("a").span(9, 2)]).unwrap_err();
        assert!(matches!(err, GraphError::InvalidSpan { kind: "def", start: 9, end: 2, .. }));
    }

    #[test]
    fn rejects_malformed_tree_paths() {
        for tree_path in ["a//b", "/a", "a/", "a/-/b"] {
            let result = validate_defs(&[def("a").tree_path(tree_path)]);
            assert!(
                matches!(result, Err(GraphError::InvalidTreePath { .. })),
                "expected {tree_path:?} to be rejected"
            );
        }
        assert!(validate_defs(&[def("a").tree_path("a/-ghost/b")]).is_ok());
    }

    #[test]
    fn rejects_inline_docs() {
        let mut d = def("a");
        d.docs.push(DefDoc {
            format: "text/plain".to_string(),
            data: "hello".to_string(),
        });
        assert!(matches!(validate_defs(&[d]), Err(GraphError::InlineDefDocs(_))));
    }

    #[test]
    fn rejects_duplicate_refs_only_on_full_key_match() {
        let refs = vec![reference("a.py", 1, 2), reference("a.py", 3, 4)];
        assert!(validate_refs(&refs).is_ok());

        let dup = vec![reference("a.py", 1, 2), reference("a.py", 1, 2)];
        assert!(matches!(validate_refs(&dup), Err(GraphError::DuplicateRef(_))));
    }

    #[test]
    fn rejects_duplicate_docs() {
        let doc = Doc {
            path: "x".to_string(),
            format: "text/plain".to_string(),
            data: "one".to_string(),
            file: "a.py".to_string(),
            start: 0,
            end: 3,
            ..Default::default()
        };
        let mut other = doc.clone();
        other.data = "two".to_string();

        assert!(validate_docs(std::slice::from_ref(&doc)).is_ok());
        assert!(matches!(
            validate_docs(&[doc, other]),
            Err(GraphError::DuplicateDoc(_))
        ));
    }
}
