//! Persisted session document.
//!
//! The session file is XML. Only the GUI-state part is interpreted here: the
//! list of views to reopen and the setup-assignments/bookmarks subtrees, which
//! are handed over untouched to their sinks.

use crate::error::{PlacementError, SessionError};
use crate::view::WindowBounds;
use anyhow::{anyhow, Context};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::fs;
use std::path::Path;
use std::str::FromStr;

pub const GUI_STATE_ELEMENT: &str = "GUIState";
pub const VIEW_ELEMENT: &str = "View";
pub const VIEW_KIND_ATTRIBUTE: &str = "key";
pub const VIEW_X_ATTRIBUTE: &str = "x";
pub const VIEW_Y_ATTRIBUTE: &str = "y";
pub const VIEW_WIDTH_ATTRIBUTE: &str = "width";
pub const VIEW_HEIGHT_ATTRIBUTE: &str = "height";
pub const SETUP_ASSIGNMENTS_ELEMENT: &str = "SetupAssignments";
pub const BOOKMARKS_ELEMENT: &str = "Bookmarks";

/// Minimal owned element tree built from the XML token stream.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlElement>,
    pub text: String,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|child| child.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// Trimmed text of the first child called `name`.
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).map(|child| child.text.trim())
    }

    pub fn parse(xml: &str) -> Result<Self, SessionError> {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);

        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            match reader.read_event()? {
                Event::Start(ref e) => stack.push(element_from_start(e)?),
                Event::Empty(ref e) => {
                    let element = element_from_start(e)?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::End(_) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| SessionError::Malformed("closing tag without opening tag".into()))?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::Text(e) => {
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&e.unescape()?);
                    }
                }
                Event::CData(e) => {
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(SessionError::Malformed(format!("element <{}> is never closed", open.name)));
        }
        root.ok_or_else(|| SessionError::Malformed("document has no root element".into()))
    }
}

fn element_from_start(start: &BytesStart<'_>) -> Result<XmlElement, SessionError> {
    let mut element = XmlElement::new(String::from_utf8_lossy(start.name().as_ref()).into_owned());
    for attr in start.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> Result<(), SessionError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => return Err(SessionError::Malformed(format!("second root element <{}>", element.name))),
    }
    Ok(())
}

/// A sink that knows how to restore itself from the GUI-state element.
///
/// The sink receives the GUI-state element, not its own child, and looks up
/// the subtree it owns.
pub trait XmlRestorable {
    fn restore_from_xml(&mut self, gui_state: &XmlElement) -> anyhow::Result<()>;
}

/// Outcome of handing a GUI-state subtree to its sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkRestore {
    Applied,
    MissingGuiState,
    MissingSubtree,
    Failed(String),
}

impl SinkRestore {
    pub fn is_applied(&self) -> bool {
        matches!(self, SinkRestore::Applied)
    }
}

/// Delegates to `sink` if `gui_state` carries a `subtree` child. Never fails loudly.
pub(crate) fn restore_sink(
    gui_state: Option<&XmlElement>,
    subtree: &str,
    sink: &mut dyn XmlRestorable,
) -> SinkRestore {
    let Some(gui_state) = gui_state else {
        log::error!("[session] Could not find GUI state element.");
        return SinkRestore::MissingGuiState;
    };
    if gui_state.child(subtree).is_none() {
        log::error!("[session] Could not find {subtree} element.");
        return SinkRestore::MissingSubtree;
    }
    match sink.restore_from_xml(gui_state) {
        Ok(()) => SinkRestore::Applied,
        Err(err) => {
            log::error!("[session] Failed to restore {subtree}: {err:#}");
            SinkRestore::Failed(format!("{err:#}"))
        }
    }
}

/// Parses the trimmed text of child `name`.
pub(crate) fn child_value<T>(element: &XmlElement, name: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let text = element
        .child_text(name)
        .ok_or_else(|| anyhow!("<{}> is missing child <{name}>", element.name))?;
    text.parse::<T>().with_context(|| format!("<{name}> has invalid value '{text}'"))
}

/// One persisted window: a view kind plus optional raw screen bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewDescriptor {
    /// Position among the view elements of the document.
    pub index: usize,
    pub kind: Option<String>,
    pub x: Option<String>,
    pub y: Option<String>,
    pub width: Option<String>,
    pub height: Option<String>,
}

impl ViewDescriptor {
    pub fn from_element(index: usize, element: &XmlElement) -> Self {
        let attr = |key: &str| element.attribute(key).map(str::to_string);
        Self {
            index,
            kind: attr(VIEW_KIND_ATTRIBUTE),
            x: attr(VIEW_X_ATTRIBUTE),
            y: attr(VIEW_Y_ATTRIBUTE),
            width: attr(VIEW_WIDTH_ATTRIBUTE),
            height: attr(VIEW_HEIGHT_ATTRIBUTE),
        }
    }

    /// Saved bounds, if any.
    ///
    /// `Ok(None)` when no bounds attribute was written at all. Partial or
    /// non-integer bounds are an error so the window keeps its default placement.
    pub fn bounds(&self) -> Result<Option<WindowBounds>, PlacementError> {
        let fields = [
            (VIEW_X_ATTRIBUTE, &self.x),
            (VIEW_Y_ATTRIBUTE, &self.y),
            (VIEW_WIDTH_ATTRIBUTE, &self.width),
            (VIEW_HEIGHT_ATTRIBUTE, &self.height),
        ];
        if fields.iter().all(|(_, value)| value.is_none()) {
            return Ok(None);
        }
        let mut parsed = [0i32; 4];
        for (slot, (attribute, value)) in parsed.iter_mut().zip(fields) {
            let raw = value.as_deref().ok_or(PlacementError::MissingAttribute { attribute })?;
            *slot = raw
                .trim()
                .parse::<i32>()
                .map_err(|_| PlacementError::InvalidInteger { attribute, value: raw.to_string() })?;
        }
        let [x, y, width, height] = parsed;
        Ok(Some(WindowBounds { x, y, width, height }))
    }
}

/// Parsed session file. Lives for the duration of one load call.
#[derive(Debug, Clone)]
pub struct SessionDocument {
    root: XmlElement,
}

impl SessionDocument {
    pub fn from_root(root: XmlElement) -> Self {
        Self { root }
    }

    pub fn parse(xml: &str) -> Result<Self, SessionError> {
        XmlElement::parse(xml).map(Self::from_root)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let path = path.as_ref();
        let xml = fs::read_to_string(path)
            .map_err(|source| SessionError::Io { path: path.to_path_buf(), source })?;
        Self::parse(&xml)
    }

    pub fn root(&self) -> &XmlElement {
        &self.root
    }

    pub fn gui_state(&self) -> Option<&XmlElement> {
        self.root.child(GUI_STATE_ELEMENT)
    }

    /// View descriptors in document order, or `None` when the GUI state is missing.
    pub fn view_descriptors(&self) -> Option<Vec<ViewDescriptor>> {
        let gui_state = self.gui_state()?;
        Some(
            gui_state
                .children_named(VIEW_ELEMENT)
                .enumerate()
                .map(|(index, element)| ViewDescriptor::from_element(index, element))
                .collect(),
        )
    }

    pub fn setup_assignments(&self) -> Option<&XmlElement> {
        self.gui_state()?.child(SETUP_ASSIGNMENTS_ELEMENT)
    }

    pub fn bookmarks(&self) -> Option<&XmlElement> {
        self.gui_state()?.child(BOOKMARKS_ELEMENT)
    }
}
