#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! # MJCF
//!
//! A small MJCF (`MuJoCo` XML) toolkit for procedurally generated robots.
//!
//! Tasks describe their articulated bodies in code with [`MjcfModel`],
//! [`Body`], [`Joint`] and [`Geom`], write them with
//! [`MjcfModel::write_to_file`], and hand the file to a physics backend's
//! asset loader. [`parse_str`] reads the same subset back, which is what the
//! CPU backend in `physics` uses to build articulations.
//!
//! ```rust,ignore
//! use mjcf::{Body, Geom, GeomKind, Joint, MjcfModel};
//!
//! let mut model = MjcfModel::new("Pendulum");
//! let mut link = Body::new("link", [0.0, 0.0, 1.0]);
//! link.push_joint(Joint::hinge("pivot", [0.0, 0.0, 0.5], [0.0, 1.0, 0.0]));
//! link.push_geom(Geom::new(GeomKind::Capsule, &[0.05, 0.5]));
//! model.worldbody.push(link);
//! println!("{}", model.to_xml_string()?);
//! ```

pub mod error;
pub mod format;
pub mod model;
pub mod parser;
mod writer;

pub use error::{MjcfError, Result};
pub use format::{format_g, format_vec};
pub use model::{
    AngleUnit, Body, BodyItem, BodyVisit, Compiler, Coordinate, Geom, GeomKind, Joint, JointKind,
    MjcfModel,
};
pub use parser::parse_str;
