//! Canonical ordering of graph collections.
//!
//! Every comparator is total over all fields of its entity, so two outputs
//! holding the same records in different orders sort identically.

use crate::types::{Ann, Def, DefDoc, DefKey, Doc, Output, Ref};
use serde_json::Value;
use std::cmp::Ordering;

/// Opaque payloads compare by their JSON text (object keys are sorted by serde_json).
fn cmp_data(a: &Option<Value>, b: &Option<Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => a.to_string().cmp(&b.to_string()),
    }
}

#[allow(clippy::type_complexity)]
fn def_order(d: &Def) -> (&DefKey, &str, usize, usize, &str, &str, bool, bool, bool, &str, &[DefDoc]) {
    (
        &d.key,
        &d.file,
        d.def_start,
        d.def_end,
        &d.name,
        &d.kind,
        d.exported,
        d.local,
        d.test,
        &d.tree_path,
        &d.docs,
    )
}

pub fn cmp_defs(a: &Def, b: &Def) -> Ordering {
    def_order(a)
        .cmp(&def_order(b))
        .then_with(|| cmp_data(&a.data, &b.data))
}

pub fn cmp_refs(a: &Ref, b: &Ref) -> Ordering {
    a.def_repo
        .cmp(&b.def_repo)
        .then_with(|| a.def_unit_type.cmp(&b.def_unit_type))
        .then_with(|| a.def_unit.cmp(&b.def_unit))
        .then_with(|| a.def_path.cmp(&b.def_path))
        .then_with(|| a.repo.cmp(&b.repo))
        .then_with(|| a.commit_id.cmp(&b.commit_id))
        .then_with(|| a.unit_type.cmp(&b.unit_type))
        .then_with(|| a.unit.cmp(&b.unit))
        .then_with(|| a.file.cmp(&b.file))
        .then_with(|| a.start.cmp(&b.start))
        .then_with(|| a.end.cmp(&b.end))
        .then_with(|| a.def.cmp(&b.def))
}

pub fn cmp_docs(a: &Doc, b: &Doc) -> Ordering {
    a.doc_key()
        .cmp(&b.doc_key())
        .then_with(|| a.start.cmp(&b.start))
        .then_with(|| a.end.cmp(&b.end))
        .then_with(|| a.data.cmp(&b.data))
}

pub fn cmp_anns(a: &Ann, b: &Ann) -> Ordering {
    a.repo
        .cmp(&b.repo)
        .then_with(|| a.commit_id.cmp(&b.commit_id))
        .then_with(|| a.unit_type.cmp(&b.unit_type))
        .then_with(|| a.unit.cmp(&b.unit))
        .then_with(|| a.file.cmp(&b.file))
        .then_with(|| a.start.cmp(&b.start))
        .then_with(|| a.end.cmp(&b.end))
        .then_with(|| a.ann_type.cmp(&b.ann_type))
        .then_with(|| cmp_data(&a.data, &b.data))
}

impl Output {
    /// Sort all four collections into canonical order
    pub fn sort(&mut self) {
        self.defs.sort_by(cmp_defs);
        self.refs.sort_by(cmp_refs);
        self.docs.sort_by(cmp_docs);
        self.anns.sort_by(cmp_anns);
    }
}
