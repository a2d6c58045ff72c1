//! Event-driven extraction of properties and dependency coordinates from a POM.
//!
//! Only leaf elements carry values: a property or coordinate element with
//! nested markup contributes nothing. Extraction stops at the first reader
//! error and keeps whatever was collected up to that point.

use quick_xml::Reader;
use quick_xml::events::Event;

/// A `<dependency>` element's coordinates, as written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Coordinate {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
    /// Declared inside `<dependencyManagement>`.
    pub managed: bool,
}

impl Coordinate {
    /// `group:artifact`, or `None` when either half is missing.
    pub fn key(&self) -> Option<String> {
        match (&self.group_id, &self.artifact_id) {
            (Some(group), Some(artifact)) => Some(format!("{}:{}", group, artifact)),
            _ => None,
        }
    }
}

/// The parts of a POM the aggregator and the dependency parser read.
#[derive(Debug, Default)]
pub struct PomDocument {
    /// Children of the root-level `<properties>`, in document order.
    pub properties: Vec<(String, String)>,
    /// Every `<dependency>` element, in document order.
    pub dependencies: Vec<Coordinate>,
}

impl PomDocument {
    /// `group:artifact -> version` for managed dependencies that declare a version.
    pub fn managed_versions(&self) -> impl Iterator<Item = (String, String)> + '_ {
        self.dependencies
            .iter()
            .filter(|d| d.managed)
            .filter_map(|d| Some((d.key()?, d.version.clone()?)))
    }
}

struct Element {
    name: String,
    has_children: bool,
}

/// Extract properties and dependencies from POM content.
pub fn extract(content: &str) -> PomDocument {
    let mut reader = Reader::from_str(content);
    let mut doc = PomDocument::default();
    let mut stack: Vec<Element> = Vec::new();
    // Open <dependency> and the stack depth it sits at.
    let mut current: Option<(usize, Coordinate)> = None;
    let mut text = String::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                if let Some(parent) = stack.last_mut() {
                    parent.has_children = true;
                }

                if name == "dependency" && current.is_none() {
                    let managed = stack.iter().any(|el| el.name == "dependencyManagement");
                    current = Some((
                        stack.len(),
                        Coordinate {
                            managed,
                            ..Default::default()
                        },
                    ));
                }

                stack.push(Element {
                    name,
                    has_children: false,
                });
                text.clear();
            }
            Ok(Event::Empty(_)) => {
                if let Some(parent) = stack.last_mut() {
                    parent.has_children = true;
                }
            }
            Ok(Event::Text(e)) => {
                if let Ok(t) = e.unescape() {
                    text.push_str(&t);
                }
            }
            Ok(Event::CData(e)) => {
                text.push_str(&String::from_utf8_lossy(&e));
            }
            Ok(Event::End(_)) => {
                let Some(element) = stack.pop() else {
                    break;
                };
                let depth = stack.len();
                let value = text.trim().to_string();
                text.clear();

                let is_leaf_value = !element.has_children && !value.is_empty();

                let closes_dependency = current.as_ref().is_some_and(|(d, _)| *d == depth);

                if closes_dependency {
                    if let Some((_, done)) = current.take() {
                        doc.dependencies.push(done);
                    }
                } else if let Some((dep_depth, coordinate)) = current.as_mut()
                    && depth == *dep_depth + 1
                    && is_leaf_value
                {
                    match element.name.as_str() {
                        "groupId" => coordinate.group_id = Some(value.clone()),
                        "artifactId" => coordinate.artifact_id = Some(value.clone()),
                        "version" => coordinate.version = Some(value.clone()),
                        _ => {}
                    }
                }

                // <project><properties><key>value</key>
                if depth == 2 && stack[1].name == "properties" && is_leaf_value {
                    doc.properties.push((element.name, value));
                }
            }
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {}
        }
        buf.clear();
    }

    doc
}
