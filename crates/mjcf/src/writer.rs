//! MJCF serialization.

use std::io::Cursor;
use std::path::Path;

use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::Writer;

use crate::error::{MjcfError, Result};
use crate::format::{format_g, format_vec};
use crate::model::{AngleUnit, Body, BodyItem, Compiler, Coordinate, Geom, Joint, MjcfModel};

impl MjcfModel {
    /// Serialize to an indented document, two spaces per nesting level.
    ///
    /// # Errors
    ///
    /// Returns [`MjcfError::Xml`] if the underlying writer fails.
    pub fn to_xml_string(&self) -> Result<String> {
        let mut buffer = Vec::new();
        let mut writer = Writer::new_with_indent(Cursor::new(&mut buffer), b' ', 2);

        let mut root = BytesStart::new("mujoco");
        root.push_attribute(("model", self.name.as_str()));
        emit(&mut writer, Event::Start(root), "mujoco")?;

        emit(&mut writer, Event::Empty(compiler_element(&self.compiler)), "compiler")?;

        if self.worldbody.is_empty() {
            emit(&mut writer, Event::Empty(BytesStart::new("worldbody")), "worldbody")?;
        } else {
            emit(&mut writer, Event::Start(BytesStart::new("worldbody")), "worldbody")?;
            for body in &self.worldbody {
                write_body(&mut writer, body)?;
            }
            emit(&mut writer, Event::End(BytesEnd::new("worldbody")), "worldbody")?;
        }

        emit(&mut writer, Event::End(BytesEnd::new("mujoco")), "mujoco")?;

        String::from_utf8(buffer).map_err(|e| MjcfError::Xml(format!("non utf-8 output: {e}")))
    }

    /// Write the document to `path`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the file write fails.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let xml = self.to_xml_string()?;
        std::fs::write(path, xml)?;
        tracing::debug!("wrote MJCF model {} to {}", self.name, path.display());
        Ok(())
    }
}

fn emit<W: std::io::Write>(writer: &mut Writer<W>, event: Event<'_>, element: &str) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| MjcfError::Xml(format!("failed to write <{element}>: {e}")))
}

fn compiler_element(compiler: &Compiler) -> BytesStart<'static> {
    let mut el = BytesStart::new("compiler");
    el.push_attribute((
        "angle",
        match compiler.angle {
            AngleUnit::Degree => "degree",
            AngleUnit::Radian => "radian",
        },
    ));
    el.push_attribute((
        "coordinate",
        match compiler.coordinate {
            Coordinate::Local => "local",
            Coordinate::Global => "global",
        },
    ));
    el.push_attribute(("inertiafromgeom", if compiler.inertia_from_geom { "true" } else { "false" }));
    el
}

fn write_body<W: std::io::Write>(writer: &mut Writer<W>, body: &Body) -> Result<()> {
    let mut el = BytesStart::new("body");
    el.push_attribute(("name", body.name.as_str()));
    el.push_attribute(("pos", format_vec(&body.pos).as_str()));
    if let Some(q) = body.quat {
        el.push_attribute(("quat", format_vec(&q).as_str()));
    }

    if body.items.is_empty() {
        return emit(writer, Event::Empty(el), "body");
    }

    emit(writer, Event::Start(el), "body")?;
    for item in &body.items {
        match item {
            BodyItem::Joint(joint) => emit(writer, Event::Empty(joint_element(joint)), "joint")?,
            BodyItem::Geom(geom) => emit(writer, Event::Empty(geom_element(geom)), "geom")?,
            BodyItem::Body(child) => write_body(writer, child)?,
        }
    }
    emit(writer, Event::End(BytesEnd::new("body")), "body")
}

fn joint_element(joint: &Joint) -> BytesStart<'static> {
    let mut el = BytesStart::new("joint");
    el.push_attribute(("name", joint.name.as_str()));
    el.push_attribute(("type", joint.kind.as_str()));
    if let Some(pos) = joint.pos {
        el.push_attribute(("pos", format_vec(&pos).as_str()));
    }
    if let Some(axis) = joint.axis {
        el.push_attribute(("axis", format_vec(&axis).as_str()));
    }
    if let Some([lower, upper]) = joint.range {
        el.push_attribute(("limited", "true"));
        el.push_attribute(("range", format!("{} {}", format_g(lower), format_g(upper)).as_str()));
    }
    el
}

fn geom_element(geom: &Geom) -> BytesStart<'static> {
    let mut el = BytesStart::new("geom");
    el.push_attribute(("type", geom.kind.as_str()));
    el.push_attribute(("size", format_vec(&geom.size).as_str()));
    if let Some(pos) = geom.pos {
        el.push_attribute(("pos", format_vec(&pos).as_str()));
    }
    if let Some(density) = geom.density {
        el.push_attribute(("density", format_g(density).as_str()));
    }
    el
}
