use proptest::prelude::*;
use rampart_blocks::catalog::load_from_toml_str;
use rampart_blocks::{
    BlockRegistry, BlockTemplate, Face, Rotation, RotationSet, Socket, SocketType, rotate_sockets,
};

fn socket_type() -> impl Strategy<Value = SocketType> {
    prop_oneof![
        Just(SocketType::Empty),
        Just(SocketType::A),
        Just(SocketType::B),
        Just(SocketType::C),
        Just(SocketType::D),
        Just(SocketType::E),
        Just(SocketType::Wall),
    ]
}

fn sockets() -> impl Strategy<Value = [Socket; 6]> {
    prop::array::uniform6((socket_type(), any::<bool>()))
        .prop_map(|a| a.map(|(kind, symmetric)| Socket { kind, symmetric }))
}

fn rotation_set() -> impl Strategy<Value = RotationSet> {
    prop::collection::vec(0u8..4, 0..6)
        .prop_map(|steps| steps.into_iter().map(Rotation::from_steps).collect())
}

proptest! {
    // Four quarter turns bring every socket back home
    #[test]
    fn four_quarter_turns_are_identity(s in sockets()) {
        let mut r = s;
        for _ in 0..4 {
            r = rotate_sockets(&r, Rotation::R90);
        }
        prop_assert_eq!(r, s);
    }

    // Vertical faces never move under yaw
    #[test]
    fn yaw_keeps_vertical_faces(s in sockets(), steps in 0u8..4) {
        let r = rotate_sockets(&s, Rotation::from_steps(steps));
        prop_assert_eq!(r[Face::PosY.index()], s[Face::PosY.index()]);
        prop_assert_eq!(r[Face::NegY.index()], s[Face::NegY.index()]);
    }

    // Regenerating the cache yields the same variants
    #[test]
    fn rotated_variant_cache_is_idempotent(defs in prop::collection::vec((sockets(), rotation_set()), 1..6)) {
        let mut reg = BlockRegistry::new();
        for (i, (s, rots)) in defs.iter().enumerate() {
            reg.add_template(BlockTemplate {
                id: i as u16,
                name: format!("b{i}"),
                sockets: *s,
                allowed_rotations: *rots,
            });
        }
        reg.generate_rotated_variants();
        let first: Vec<_> = reg.variants().map(|(c, s)| (c, *s)).collect();
        reg.generate_rotated_variants();
        let second: Vec<_> = reg.variants().map(|(c, s)| (c, *s)).collect();
        prop_assert_eq!(&first, &second);
        let expected: usize = defs.iter().map(|(_, r)| r.len()).sum();
        prop_assert_eq!(first.len(), expected);
    }
}

#[test]
fn unknown_variant_falls_back_to_open_faces() {
    let mut reg = BlockRegistry::new();
    reg.add_template(BlockTemplate::open(3, "pillar").with_rotations(RotationSet::IDENTITY));
    reg.generate_rotated_variants();
    assert!(reg.variant(3, Rotation::R90).is_none());
    assert_eq!(reg.rotated_sockets(3, Rotation::R90), [Socket::EMPTY; 6]);
    assert_eq!(reg.rotated_sockets(9, Rotation::R0), [Socket::EMPTY; 6]);
}

#[test]
fn adding_a_template_marks_variants_stale() {
    let mut reg = BlockRegistry::new();
    reg.add_template(BlockTemplate::open(0, "a"));
    assert!(!reg.variants_ready());
    reg.generate_rotated_variants();
    assert!(reg.variants_ready());
    reg.add_template(BlockTemplate::open(1, "b"));
    assert!(!reg.variants_ready());
}

#[test]
fn overwriting_an_id_keeps_last_template() {
    let mut reg = BlockRegistry::new();
    reg.add_template(BlockTemplate::open(0, "first"));
    reg.add_template(
        BlockTemplate::open(0, "second").with_socket(Face::PosX, Socket::new(SocketType::B)),
    );
    assert_eq!(reg.len(), 1);
    assert_eq!(reg.get(0).unwrap().name, "second");
    assert_eq!(reg.id_by_name("second"), Some(0));
    assert_eq!(reg.id_by_name("first"), None);
}

#[test]
fn catalog_toml_seeds_templates_and_assets() {
    let (catalog, reg) = load_from_toml_str(
        r#"
        default_rules = false

        [[socket_rules]]
        a = "a"
        b = "b"

        [[assets]]
        name = "floor"
        path = "models/floor.glb"
        bounds = { min = [0.0, 0.0, 0.0], max = [2.0, 0.5, 2.0] }
        textures = ["textures/stone.png"]

        [[assets]]
        name = "tower"
        id = 7
        path = "models/tower.glb"
        rotations = [0, 90]
        sockets = { all = "wall", side = "a", neg_x = { kind = "b", symmetric = false } }
    "#,
    )
    .expect("catalog");

    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.cell_size_hint(), Some(2.0));
    assert_eq!(catalog.get(7).unwrap().name, "tower");

    let floor = reg.get(0).unwrap();
    assert_eq!(floor.sockets, [Socket::EMPTY; 6]);
    assert_eq!(floor.allowed_rotations, RotationSet::ALL);

    let tower = reg.get(7).unwrap();
    assert_eq!(tower.socket(Face::PosY).kind, SocketType::Wall);
    assert_eq!(tower.socket(Face::PosX).kind, SocketType::A);
    assert_eq!(tower.socket(Face::NegX).kind, SocketType::B);
    assert!(!tower.socket(Face::NegX).symmetric);
    assert_eq!(tower.allowed_rotations.len(), 2);

    assert!(reg.variants_ready());
    assert_eq!(reg.candidates().len(), 4 + 2);
    assert!(reg.rules.can_connect(SocketType::A, SocketType::B));
    assert!(!reg.rules.can_connect(SocketType::A, SocketType::A));
}

#[test]
fn catalog_rejects_odd_rotations() {
    let err = load_from_toml_str(
        r#"
        [[assets]]
        name = "skew"
        path = "skew.glb"
        rotations = [45]
    "#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("45"));
}
