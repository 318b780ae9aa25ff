//! In-memory MJCF document.
//!
//! Only the subset needed to describe articulated rigid bodies is modelled:
//! `<compiler>`, and a `<worldbody>` tree of `<body>`, `<joint>` and `<geom>`
//! elements. Children of a body keep the order they were added in so a
//! written document reads the same as the code that built it.


#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum AngleUnit {
    #[default]
    Degree,
    Radian,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Coordinate {
    #[default]
    Local,
    Global,
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Compiler {
    pub angle: AngleUnit,
    pub coordinate: Coordinate,
    pub inertia_from_geom: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JointKind {
    Free,
    Ball,
    Slide,
    Hinge,
}

impl JointKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Ball => "ball",
            Self::Slide => "slide",
            Self::Hinge => "hinge",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "free" => Some(Self::Free),
            "ball" => Some(Self::Ball),
            "slide" => Some(Self::Slide),
            "hinge" => Some(Self::Hinge),
            _ => None,
        }
    }

    /// Whether an asset loader exposes this joint as a single scalar DOF.
    #[must_use]
    pub const fn is_scalar_dof(self) -> bool {
        matches!(self, Self::Slide | Self::Hinge)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GeomKind {
    Sphere,
    Capsule,
    Cylinder,
    Box,
}

impl GeomKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sphere => "sphere",
            Self::Capsule => "capsule",
            Self::Cylinder => "cylinder",
            Self::Box => "box",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "sphere" => Some(Self::Sphere),
            "capsule" => Some(Self::Capsule),
            "cylinder" => Some(Self::Cylinder),
            "box" => Some(Self::Box),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Joint {
    pub name: String,
    pub kind: JointKind,
    pub pos: Option<[f32; 3]>,
    pub axis: Option<[f32; 3]>,
    /// Lower/upper limit in the compiler's angle unit. `Some` means limited.
    pub range: Option<[f32; 2]>,
}

impl Joint {
    #[must_use]
    pub fn free(name: impl Into<String>) -> Self {
        Self { name: name.into(), kind: JointKind::Free, pos: None, axis: None, range: None }
    }

    #[must_use]
    pub fn hinge(name: impl Into<String>, pos: [f32; 3], axis: [f32; 3]) -> Self {
        Self { name: name.into(), kind: JointKind::Hinge, pos: Some(pos), axis: Some(axis), range: None }
    }

    #[must_use]
    pub fn with_range(mut self, lower: f32, upper: f32) -> Self {
        self.range = Some([lower, upper]);
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Geom {
    pub kind: GeomKind,
    pub size: Vec<f32>,
    pub pos: Option<[f32; 3]>,
    pub density: Option<f32>,
}

impl Geom {
    #[must_use]
    pub fn new(kind: GeomKind, size: &[f32]) -> Self {
        Self { kind, size: size.to_vec(), pos: None, density: None }
    }

    #[must_use]
    pub fn with_pos(mut self, pos: [f32; 3]) -> Self {
        self.pos = Some(pos);
        self
    }

    #[must_use]
    pub fn with_density(mut self, density: f32) -> Self {
        self.density = Some(density);
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum BodyItem {
    Joint(Joint),
    Geom(Geom),
    Body(Body),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Body {
    pub name: String,
    pub pos: [f32; 3],
    /// Orientation as `w x y z`, the MJCF attribute order.
    pub quat: Option<[f32; 4]>,
    pub items: Vec<BodyItem>,
}

impl Body {
    #[must_use]
    pub fn new(name: impl Into<String>, pos: [f32; 3]) -> Self {
        Self { name: name.into(), pos, quat: None, items: Vec::new() }
    }

    #[must_use]
    pub fn with_quat(mut self, quat: [f32; 4]) -> Self {
        self.quat = Some(quat);
        self
    }

    pub fn push_joint(&mut self, joint: Joint) -> &mut Self {
        self.items.push(BodyItem::Joint(joint));
        self
    }

    pub fn push_geom(&mut self, geom: Geom) -> &mut Self {
        self.items.push(BodyItem::Geom(geom));
        self
    }

    pub fn push_body(&mut self, body: Body) -> &mut Self {
        self.items.push(BodyItem::Body(body));
        self
    }

    pub fn joints(&self) -> impl Iterator<Item = &Joint> {
        self.items.iter().filter_map(|item| match item {
            BodyItem::Joint(j) => Some(j),
            _ => None,
        })
    }

    pub fn geoms(&self) -> impl Iterator<Item = &Geom> {
        self.items.iter().filter_map(|item| match item {
            BodyItem::Geom(g) => Some(g),
            _ => None,
        })
    }

    pub fn children(&self) -> impl Iterator<Item = &Body> {
        self.items.iter().filter_map(|item| match item {
            BodyItem::Body(b) => Some(b),
            _ => None,
        })
    }
}

/// A body visited during a depth-first walk, with the index of its parent in
/// the same walk.
#[derive(Clone, Copy, Debug)]
pub struct BodyVisit<'a> {
    pub body: &'a Body,
    pub parent: Option<usize>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MjcfModel {
    pub name: String,
    pub compiler: Compiler,
    pub worldbody: Vec<Body>,
}

impl MjcfModel {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), compiler: Compiler::default(), worldbody: Vec::new() }
    }

    /// Bodies in depth-first pre-order, the order asset loaders assign
    /// rigid body indices in.
    #[must_use]
    pub fn bodies_depth_first(&self) -> Vec<BodyVisit<'_>> {
        fn walk<'a>(body: &'a Body, parent: Option<usize>, out: &mut Vec<BodyVisit<'a>>) {
            let idx = out.len();
            out.push(BodyVisit { body, parent });
            for child in body.children() {
                walk(child, Some(idx), out);
            }
        }

        let mut out = Vec::new();
        for body in &self.worldbody {
            walk(body, None, &mut out);
        }
        out
    }

    /// Joints in the same order as [`Self::bodies_depth_first`], each paired
    /// with the index of the body that owns it.
    #[must_use]
    pub fn joints_depth_first(&self) -> Vec<(usize, &Joint)> {
        let mut out = Vec::new();
        for (idx, visit) in self.bodies_depth_first().into_iter().enumerate() {
            let body: &Body = visit.body;
            out.extend(body.joints().map(|j| (idx, j)));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_link() -> MjcfModel {
        let mut model = MjcfModel::new("chain");
        let mut root = Body::new("root", [0.0, 0.0, 1.0]);
        root.push_joint(Joint::free("root_joint"));
        let mut link = Body::new("link", [0.0, 0.0, -0.5]);
        link.push_joint(Joint::hinge("elbow", [0.0, 0.0, 0.25], [0.0, 1.0, 0.0]).with_range(-30.0, 30.0));
        let mut tip = Body::new("tip", [0.0, 0.0, -0.5]);
        tip.push_joint(Joint::hinge("wrist", [0.0; 3], [1.0, 0.0, 0.0]));
        link.push_body(tip);
        root.push_body(link);
        model.worldbody.push(root);
        model
    }

    #[test]
    fn depth_first_order_tracks_parents() {
        let model = two_link();
        let bodies = model.bodies_depth_first();
        let names: Vec<_> = bodies.iter().map(|v| v.body.name.as_str()).collect();
        assert_eq!(names, ["root", "link", "tip"]);
        assert_eq!(bodies[0].parent, None);
        assert_eq!(bodies[2].parent, Some(1));
    }

    #[test]
    fn joints_follow_body_order() {
        let model = two_link();
        let joints: Vec<_> = model
            .joints_depth_first()
            .into_iter()
            .map(|(body, j)| (body, j.name.clone()))
            .collect();
        assert_eq!(
            joints,
            [(0, "root_joint".to_string()), (1, "elbow".to_string()), (2, "wrist".to_string())]
        );
    }
}
