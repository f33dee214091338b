//! Brightness and color setup of the displayed sources.

use anyhow::{anyhow, bail, Result};

use crate::session::{
    child_value, restore_sink, SessionDocument, SinkRestore, XmlElement, XmlRestorable,
    SETUP_ASSIGNMENTS_ELEMENT,
};

#[derive(Debug, Clone, PartialEq)]
pub struct ConverterSetup {
    pub id: i32,
    pub min: f64,
    pub max: f64,
    /// Packed ARGB, as written by the session writer.
    pub color: u32,
    pub group_id: i32,
}

impl ConverterSetup {
    pub fn rgba(&self) -> [f32; 4] {
        let channel = |shift: u32| ((self.color >> shift) & 0xff) as f32 / 255.0;
        [channel(16), channel(8), channel(0), channel(24)]
    }

    fn from_xml(element: &XmlElement) -> Result<Self> {
        Ok(Self {
            id: child_value(element, "id")?,
            min: child_value(element, "min")?,
            max: child_value(element, "max")?,
            color: child_value::<i32>(element, "color")? as u32,
            group_id: child_value(element, "groupId")?,
        })
    }
}

/// Display range shared by the converter setups of one group.
#[derive(Debug, Clone, PartialEq)]
pub struct MinMaxGroup {
    pub id: i32,
    pub full_range_min: f64,
    pub full_range_max: f64,
    pub range_min: f64,
    pub range_max: f64,
    pub current_min: f64,
    pub current_max: f64,
}

impl MinMaxGroup {
    fn from_xml(element: &XmlElement) -> Result<Self> {
        Ok(Self {
            id: child_value(element, "id")?,
            full_range_min: child_value(element, "fullRangeMin")?,
            full_range_max: child_value(element, "fullRangeMax")?,
            range_min: child_value(element, "rangeMin")?,
            range_max: child_value(element, "rangeMax")?,
            current_min: child_value(element, "currentMin")?,
            current_max: child_value(element, "currentMax")?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SetupAssignments {
    setups: Vec<ConverterSetup>,
    groups: Vec<MinMaxGroup>,
}

impl SetupAssignments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn setups(&self) -> &[ConverterSetup] {
        &self.setups
    }

    pub fn groups(&self) -> &[MinMaxGroup] {
        &self.groups
    }

    pub fn setup(&self, id: i32) -> Option<&ConverterSetup> {
        self.setups.iter().find(|setup| setup.id == id)
    }

    pub fn group_of(&self, setup: &ConverterSetup) -> Option<&MinMaxGroup> {
        self.groups.iter().find(|group| group.id == setup.group_id)
    }
}

impl XmlRestorable for SetupAssignments {
    fn restore_from_xml(&mut self, gui_state: &XmlElement) -> Result<()> {
        let element = gui_state
            .child(SETUP_ASSIGNMENTS_ELEMENT)
            .ok_or_else(|| anyhow!("missing <{SETUP_ASSIGNMENTS_ELEMENT}> element"))?;
        let setups = parse_list(element, "ConverterSetups", "ConverterSetup", ConverterSetup::from_xml)?;
        let groups = parse_list(element, "MinMaxGroups", "MinMaxGroup", MinMaxGroup::from_xml)?;
        let restored = SetupAssignments { setups, groups };
        if let Some(orphan) = restored.setups.iter().find(|setup| restored.group_of(setup).is_none()) {
            bail!("converter setup {} references unknown min/max group {}", orphan.id, orphan.group_id);
        }
        *self = restored;
        Ok(())
    }
}

fn parse_list<T>(
    element: &XmlElement,
    list: &str,
    item: &str,
    parse: fn(&XmlElement) -> Result<T>,
) -> Result<Vec<T>> {
    match element.child(list) {
        Some(list) => list.children_named(item).map(parse).collect(),
        None => Ok(Vec::new()),
    }
}

/// Applies the color/brightness subtree of a session onto a sink.
pub struct SetupAssignmentsRestorer;

impl SetupAssignmentsRestorer {
    pub fn apply(gui_state: Option<&XmlElement>, sink: &mut dyn XmlRestorable) -> SinkRestore {
        restore_sink(gui_state, SETUP_ASSIGNMENTS_ELEMENT, sink)
    }

    pub fn apply_document(document: &SessionDocument, sink: &mut dyn XmlRestorable) -> SinkRestore {
        Self::apply(document.gui_state(), sink)
    }
}
