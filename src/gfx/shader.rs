//! Shader program sources
//!
//! A program is a vertex/fragment pair resolved from a root directory and two
//! base names by suffix (`<vertex>.vert.wgsl`, `<fragment>.frag.wgsl`). Both
//! stages are parsed up front so a broken shader aborts startup, and the
//! vertex stage is reflected to answer attribute-location queries by name.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use crate::error::{Result, ViewerError};

pub const VERTEX_SUFFIX: &str = "vert.wgsl";
pub const FRAGMENT_SUFFIX: &str = "frag.wgsl";

/// Attribute every draw call needs.
pub const POSITION_ATTRIBUTE: &str = "position";
/// Attribute bound only when the program exposes it.
pub const NORMAL_ATTRIBUTE: &str = "normal";

/// One parsed shader stage.
#[derive(Debug, Clone)]
pub struct ShaderStageSource {
    pub path: PathBuf,
    pub source: String,
    pub entry_point: String,
}

/// A validated vertex/fragment pair plus the vertex-stage attribute table.
#[derive(Debug, Clone)]
pub struct ShaderSource {
    pub vertex: ShaderStageSource,
    pub fragment: ShaderStageSource,
    attributes: HashMap<String, u32>,
}

impl ShaderSource {
    /// Reads and parses `<root>/<vertex>.vert.wgsl` and `<root>/<fragment>.frag.wgsl`.
    pub fn load(root: impl AsRef<Path>, vertex: &str, fragment: &str) -> Result<Self> {
        let root = root.as_ref();
        let vertex_path = root.join(format!("{}.{}", vertex, VERTEX_SUFFIX));
        let fragment_path = root.join(format!("{}.{}", fragment, FRAGMENT_SUFFIX));

        let vertex_source = read_source(&vertex_path)?;
        let fragment_source = read_source(&fragment_path)?;

        let source = Self::from_wgsl(vertex_path, vertex_source, fragment_path, fragment_source)?;
        log::info!(
            "Loaded shader program '{}' + '{}' with attributes {:?}",
            vertex,
            fragment,
            source.attributes
        );
        Ok(source)
    }

    /// Parses an in-memory pair. `vertex_path`/`fragment_path` only label errors.
    pub fn from_wgsl(
        vertex_path: impl Into<PathBuf>,
        vertex_source: String,
        fragment_path: impl Into<PathBuf>,
        fragment_source: String,
    ) -> Result<Self> {
        let vertex_path = vertex_path.into();
        let fragment_path = fragment_path.into();

        let vertex_module = parse(&vertex_path, &vertex_source)?;
        let vertex_entry = find_entry_point(&vertex_module, naga::ShaderStage::Vertex)
            .ok_or_else(|| ViewerError::MissingEntryPoint {
                path: vertex_path.clone(),
                stage: "vertex",
            })?;
        let attributes = vertex_attributes(&vertex_module, vertex_entry);
        let vertex_entry = vertex_entry.name.clone();

        let fragment_module = parse(&fragment_path, &fragment_source)?;
        let fragment_entry = find_entry_point(&fragment_module, naga::ShaderStage::Fragment)
            .ok_or_else(|| ViewerError::MissingEntryPoint {
                path: fragment_path.clone(),
                stage: "fragment",
            })?
            .name
            .clone();

        Ok(Self {
            vertex: ShaderStageSource {
                path: vertex_path,
                source: vertex_source,
                entry_point: vertex_entry,
            },
            fragment: ShaderStageSource {
                path: fragment_path,
                source: fragment_source,
                entry_point: fragment_entry,
            },
            attributes,
        })
    }

    /// Location of a named vertex input, or `None` if the program does not
    /// expose it.
    pub fn attribute_location(&self, name: &str) -> Option<u32> {
        self.attributes.get(name).copied()
    }
}

fn read_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| ViewerError::ShaderRead {
        path: path.to_path_buf(),
        source,
    })
}

fn parse(path: &Path, source: &str) -> Result<naga::Module> {
    naga::front::wgsl::parse_str(source).map_err(|error| ViewerError::ShaderParse {
        path: path.to_path_buf(),
        message: error.emit_to_string(source),
    })
}

fn find_entry_point(module: &naga::Module, stage: naga::ShaderStage) -> Option<&naga::EntryPoint> {
    module.entry_points.iter().find(|entry| entry.stage == stage)
}

/// Collects `@location` inputs of the vertex entry point, whether declared as
/// plain arguments or as members of an input struct.
fn vertex_attributes(module: &naga::Module, entry: &naga::EntryPoint) -> HashMap<String, u32> {
    let mut attributes = HashMap::new();

    for argument in &entry.function.arguments {
        match &argument.binding {
            Some(naga::Binding::Location { location, .. }) => {
                if let Some(name) = &argument.name {
                    attributes.insert(name.clone(), *location);
                }
            }
            Some(naga::Binding::BuiltIn(_)) => {}
            None => {
                if let naga::TypeInner::Struct { members, .. } = &module.types[argument.ty].inner {
                    for member in members {
                        if let (Some(name), Some(naga::Binding::Location { location, .. })) =
                            (&member.name, &member.binding)
                        {
                            attributes.insert(name.clone(), *location);
                        }
                    }
                }
            }
        }
    }

    attributes
}
