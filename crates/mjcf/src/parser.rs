//! MJCF reader for the subset produced by [`MjcfModel::to_xml_string`].
//!
//! Unknown elements are skipped, so hand-edited files with extra sections
//! (`<option>`, `<actuator>`, ...) still load.

use std::collections::HashMap;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{MjcfError, Result};
use crate::model::{AngleUnit, Body, Compiler, Coordinate, Geom, GeomKind, Joint, JointKind, MjcfModel};

type Attrs = HashMap<String, String>;

/// Parse an MJCF string into a model.
///
/// # Errors
///
/// Returns an error if the XML is malformed, the `<mujoco>` root is missing,
/// or an attribute this reader understands has an invalid value.
pub fn parse_str(xml: &str) -> Result<MjcfModel> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) if e.name().as_ref() == b"mujoco" => {
                let attrs = collect_attrs(e)?;
                return parse_mujoco(&mut reader, &attrs);
            }
            Ok(Event::Empty(ref e)) if e.name().as_ref() == b"mujoco" => {
                let attrs = collect_attrs(e)?;
                return Ok(MjcfModel::new(model_name(&attrs)));
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(MjcfError::Xml(e.to_string())),
        }
        buf.clear();
    }

    Err(MjcfError::MissingElement { element: "mujoco", context: "MJCF document" })
}

fn model_name(attrs: &Attrs) -> String {
    attrs.get("model").cloned().unwrap_or_else(|| "unnamed".to_string())
}

fn parse_mujoco(reader: &mut Reader<&[u8]>, attrs: &Attrs) -> Result<MjcfModel> {
    let mut model = MjcfModel::new(model_name(attrs));
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let name = e.name().as_ref().to_vec();
                let attrs = collect_attrs(e)?;
                match name.as_slice() {
                    b"worldbody" => model.worldbody = parse_worldbody(reader)?,
                    b"compiler" => {
                        model.compiler = parse_compiler(&attrs)?;
                        skip_element(reader, &name)?;
                    }
                    _ => skip_element(reader, &name)?,
                }
            }
            Ok(Event::Empty(ref e)) => {
                if e.name().as_ref() == b"compiler" {
                    model.compiler = parse_compiler(&collect_attrs(e)?)?;
                }
            }
            Ok(Event::End(ref e)) if e.name().as_ref() == b"mujoco" => break,
            Ok(Event::Eof) => {
                return Err(MjcfError::Xml("unexpected end of document inside <mujoco>".into()));
            }
            Ok(_) => {}
            Err(e) => return Err(MjcfError::Xml(e.to_string())),
        }
        buf.clear();
    }

    Ok(model)
}

fn parse_compiler(attrs: &Attrs) -> Result<Compiler> {
    let mut compiler = Compiler::default();
    if let Some(angle) = attrs.get("angle") {
        compiler.angle = match angle.as_str() {
            "degree" => AngleUnit::Degree,
            "radian" => AngleUnit::Radian,
            other => return Err(invalid("compiler", "angle", other)),
        };
    }
    if let Some(coordinate) = attrs.get("coordinate") {
        compiler.coordinate = match coordinate.as_str() {
            "local" => Coordinate::Local,
            "global" => Coordinate::Global,
            other => return Err(invalid("compiler", "coordinate", other)),
        };
    }
    if let Some(flag) = attrs.get("inertiafromgeom") {
        compiler.inertia_from_geom = flag == "true";
    }
    Ok(compiler)
}

fn parse_worldbody(reader: &mut Reader<&[u8]>) -> Result<Vec<Body>> {
    let mut bodies = Vec::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let name = e.name().as_ref().to_vec();
                let attrs = collect_attrs(e)?;
                if name == b"body" {
                    bodies.push(parse_body(reader, &attrs)?);
                } else {
                    skip_element(reader, &name)?;
                }
            }
            Ok(Event::Empty(ref e)) => {
                if e.name().as_ref() == b"body" {
                    bodies.push(body_header(&collect_attrs(e)?)?);
                }
            }
            Ok(Event::End(ref e)) if e.name().as_ref() == b"worldbody" => break,
            Ok(Event::Eof) => {
                return Err(MjcfError::Xml("unexpected end of document inside <worldbody>".into()));
            }
            Ok(_) => {}
            Err(e) => return Err(MjcfError::Xml(e.to_string())),
        }
        buf.clear();
    }

    Ok(bodies)
}

fn body_header(attrs: &Attrs) -> Result<Body> {
    let name = attrs.get("name").cloned().unwrap_or_default();
    let pos = match attrs.get("pos") {
        Some(v) => parse_floats::<3>("body", "pos", v)?,
        None => [0.0; 3],
    };
    let mut body = Body::new(name, pos);
    if let Some(v) = attrs.get("quat") {
        body.quat = Some(parse_floats::<4>("body", "quat", v)?);
    }
    Ok(body)
}

fn parse_body(reader: &mut Reader<&[u8]>, attrs: &Attrs) -> Result<Body> {
    let mut body = body_header(attrs)?;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let name = e.name().as_ref().to_vec();
                let attrs = collect_attrs(e)?;
                match name.as_slice() {
                    b"body" => {
                        let child = parse_body(reader, &attrs)?;
                        body.push_body(child);
                    }
                    b"joint" => {
                        body.push_joint(parse_joint(&attrs)?);
                        skip_element(reader, &name)?;
                    }
                    b"geom" => {
                        body.push_geom(parse_geom(&attrs)?);
                        skip_element(reader, &name)?;
                    }
                    _ => skip_element(reader, &name)?,
                }
            }
            Ok(Event::Empty(ref e)) => {
                let attrs = collect_attrs(e)?;
                match e.name().as_ref() {
                    b"body" => {
                        body.push_body(body_header(&attrs)?);
                    }
                    b"joint" => {
                        body.push_joint(parse_joint(&attrs)?);
                    }
                    b"geom" => {
                        body.push_geom(parse_geom(&attrs)?);
                    }
                    _ => {}
                }
            }
            Ok(Event::End(ref e)) if e.name().as_ref() == b"body" => break,
            Ok(Event::Eof) => {
                return Err(MjcfError::Xml(format!("unexpected end of document inside body {}", body.name)));
            }
            Ok(_) => {}
            Err(e) => return Err(MjcfError::Xml(e.to_string())),
        }
        buf.clear();
    }

    Ok(body)
}

fn parse_joint(attrs: &Attrs) -> Result<Joint> {
    let kind = match attrs.get("type") {
        Some(t) => JointKind::parse(t).ok_or_else(|| invalid("joint", "type", t))?,
        // MJCF's default joint type.
        None => JointKind::Hinge,
    };
    let pos = attrs.get("pos").map(|v| parse_floats::<3>("joint", "pos", v)).transpose()?;
    let axis = attrs.get("axis").map(|v| parse_floats::<3>("joint", "axis", v)).transpose()?;
    let limited = attrs.get("limited").is_some_and(|v| v == "true");
    let range = if limited {
        attrs.get("range").map(|v| parse_floats::<2>("joint", "range", v)).transpose()?
    } else {
        None
    };
    Ok(Joint {
        name: attrs.get("name").cloned().unwrap_or_default(),
        kind,
        pos,
        axis,
        range,
    })
}

fn parse_geom(attrs: &Attrs) -> Result<Geom> {
    let kind = match attrs.get("type") {
        Some(t) => GeomKind::parse(t).ok_or_else(|| invalid("geom", "type", t))?,
        None => GeomKind::Sphere,
    };
    let size = match attrs.get("size") {
        Some(v) => parse_float_list("geom", "size", v)?,
        None => Vec::new(),
    };
    let pos = attrs.get("pos").map(|v| parse_floats::<3>("geom", "pos", v)).transpose()?;
    let density = attrs
        .get("density")
        .map(|v| v.trim().parse::<f32>().map_err(|_| invalid("geom", "density", v)))
        .transpose()?;
    Ok(Geom { kind, size, pos, density })
}

fn collect_attrs(e: &BytesStart<'_>) -> Result<Attrs> {
    let mut attrs = HashMap::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| MjcfError::Xml(err.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = String::from_utf8_lossy(&attr.value).into_owned();
        attrs.insert(key, value);
    }
    Ok(attrs)
}

fn skip_element(reader: &mut Reader<&[u8]>, name: &[u8]) -> Result<()> {
    let mut buf = Vec::new();
    let mut depth = 1usize;
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) if e.name().as_ref() == name => depth += 1,
            Ok(Event::End(ref e)) if e.name().as_ref() == name => {
                depth -= 1;
                if depth == 0 {
                    return Ok(());
                }
            }
            Ok(Event::Eof) => {
                return Err(MjcfError::Xml(format!(
                    "unexpected end of document inside <{}>",
                    String::from_utf8_lossy(name)
                )));
            }
            Ok(_) => {}
            Err(e) => return Err(MjcfError::Xml(e.to_string())),
        }
        buf.clear();
    }
}

fn parse_float_list(element: &str, attribute: &'static str, value: &str) -> Result<Vec<f32>> {
    value
        .split_whitespace()
        .map(|tok| tok.parse::<f32>().map_err(|_| invalid(element, attribute, value)))
        .collect()
}

fn parse_floats<const N: usize>(element: &str, attribute: &'static str, value: &str) -> Result<[f32; N]> {
    let values = parse_float_list(element, attribute, value)?;
    <[f32; N]>::try_from(values.as_slice()).map_err(|_| invalid(element, attribute, value))
}

fn invalid(element: &str, attribute: &'static str, value: &str) -> MjcfError {
    MjcfError::InvalidAttribute {
        element: element.to_string(),
        attribute,
        value: value.to_string(),
    }
}
