use mjcf::{Body, Compiler, Geom, GeomKind, Joint, MjcfModel};

fn pendulum() -> MjcfModel {
    let mut model = MjcfModel::new("Pendulum");
    model.compiler = Compiler { inertia_from_geom: true, ..Compiler::default() };
    let mut base = Body::new("base", [0.0, 0.0, 1.5]);
    base.push_joint(Joint::free("root_joint"));
    base.push_geom(Geom::new(GeomKind::Cylinder, &[0.5, 0.01]).with_pos([0.0; 3]).with_density(100.0));
    let mut link = Body::new("link", [0.25, 0.0, -0.5]).with_quat([1.0, 0.0, 0.0, 0.0]);
    link.push_geom(Geom::new(GeomKind::Capsule, &[0.02, 0.18]).with_density(1000.0));
    link.push_joint(Joint::hinge("pivot", [0.0, 0.0, -0.18], [0.0, 1.0, 0.0]).with_range(-70.0, 90.0));
    base.push_body(link);
    model.worldbody.push(base);
    model
}

#[test]
fn document_is_indented_two_spaces_per_level() {
    let xml = pendulum().to_xml_string().unwrap();
    let lines: Vec<&str> = xml.lines().collect();
    assert_eq!(lines[0], r#"<mujoco model="Pendulum">"#);
    assert_eq!(
        lines[1],
        r#"  <compiler angle="degree" coordinate="local" inertiafromgeom="true"/>"#
    );
    assert_eq!(lines[2], "  <worldbody>");
    assert_eq!(lines[3], r#"    <body name="base" pos="0 0 1.5">"#);
    assert_eq!(lines[4], r#"      <joint name="root_joint" type="free"/>"#);
    assert_eq!(
        lines[5],
        r#"      <geom type="cylinder" size="0.5 0.01" pos="0 0 0" density="100"/>"#
    );
    assert_eq!(lines[6], r#"      <body name="link" pos="0.25 0 -0.5" quat="1 0 0 0">"#);
    assert_eq!(
        lines[8],
        r#"        <joint name="pivot" type="hinge" pos="0 0 -0.18" axis="0 1 0" limited="true" range="-70 90"/>"#
    );
    assert_eq!(*lines.last().unwrap(), "</mujoco>");
}

#[test]
fn write_to_file_matches_string_output() {
    let model = pendulum();
    let dir = std::env::temp_dir().join(format!("mjcf-write-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("pendulum.xml");
    model.write_to_file(&path).unwrap();
    let on_disk = std::fs::read_to_string(&path).unwrap();
    assert_eq!(on_disk, model.to_xml_string().unwrap());
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn empty_model_is_well_formed() {
    let xml = MjcfModel::new("Empty").to_xml_string().unwrap();
    assert!(xml.contains("<worldbody/>"));
    assert!(mjcf::parse_str(&xml).unwrap().worldbody.is_empty());
}
