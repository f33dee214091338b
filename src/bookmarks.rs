use std::collections::BTreeMap;

use anyhow::{anyhow, bail, Context, Result};
use glam::{DAffine3, DMat3, DVec3};

use crate::session::{
    child_value, restore_sink, SessionDocument, SinkRestore, XmlElement, XmlRestorable, BOOKMARKS_ELEMENT,
};

const BOOKMARK_ELEMENT: &str = "Bookmark";

/// Named viewer transforms the user can jump back to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bookmarks {
    entries: BTreeMap<String, DAffine3>,
}

impl Bookmarks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, transform: DAffine3) -> Option<DAffine3> {
        self.entries.insert(key.into(), transform)
    }

    pub fn get(&self, key: &str) -> Option<&DAffine3> {
        self.entries.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|k| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl XmlRestorable for Bookmarks {
    fn restore_from_xml(&mut self, gui_state: &XmlElement) -> Result<()> {
        let element = gui_state
            .child(BOOKMARKS_ELEMENT)
            .ok_or_else(|| anyhow!("missing <{BOOKMARKS_ELEMENT}> element"))?;
        let mut restored = BTreeMap::new();
        for bookmark in element.children_named(BOOKMARK_ELEMENT) {
            let key: String = child_value(bookmark, "key")?;
            let text = bookmark.child_text("transform").unwrap_or_default();
            let transform = parse_row_packed_affine(text).with_context(|| format!("bookmark '{key}'"))?;
            restored.insert(key, transform);
        }
        self.entries = restored;
        Ok(())
    }
}

/// Parses the twelve whitespace-separated values of a row-packed 3x4 affine matrix.
pub fn parse_row_packed_affine(text: &str) -> Result<DAffine3> {
    let values = text
        .split_whitespace()
        .map(|token| token.parse::<f64>().with_context(|| format!("invalid matrix entry '{token}'")))
        .collect::<Result<Vec<_>>>()?;
    if values.len() != 12 {
        bail!("expected 12 matrix entries, found {}", values.len());
    }
    let row = |r: usize| &values[r * 4..r * 4 + 4];
    let (r0, r1, r2) = (row(0), row(1), row(2));
    Ok(DAffine3 {
        matrix3: DMat3::from_cols(
            DVec3::new(r0[0], r1[0], r2[0]),
            DVec3::new(r0[1], r1[1], r2[1]),
            DVec3::new(r0[2], r1[2], r2[2]),
        ),
        translation: DVec3::new(r0[3], r1[3], r2[3]),
    })
}

/// Applies the bookmarks subtree of a session onto a sink.
pub struct BookmarksRestorer;

impl BookmarksRestorer {
    pub fn apply(gui_state: Option<&XmlElement>, sink: &mut dyn XmlRestorable) -> SinkRestore {
        restore_sink(gui_state, BOOKMARKS_ELEMENT, sink)
    }

    pub fn apply_document(document: &SessionDocument, sink: &mut dyn XmlRestorable) -> SinkRestore {
        Self::apply(document.gui_state(), sink)
    }
}
