use lode_blocks::codec::{
    BlockParts, FieldCodec, FieldSpec, FieldValue, IntProvider, SerializedRecord,
};
use lode_blocks::config::BehaviorProperties;
use lode_blocks::kinds::simple::roll_experience;
use lode_blocks::registry::AIR_NAME;
use lode_blocks::{
    BlockConfig, BlockError, BlockSchema, Blueprint, Capabilities, Capability, Catalog,
    StateDefinitionBuilder, props,
};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

const FIXTURE: &str = "fixture";
const FIXTURE_SHAPES: &[&str] = &["a", "b", "c"];

fn record(text: &str) -> SerializedRecord {
    toml::from_str(text).unwrap()
}

// A kind that uses every field codec, registered next to the built-ins.
fn fixture_schema() -> BlockSchema {
    BlockSchema::new(FIXTURE)
        .field(FieldSpec::optional("flag", FieldCodec::Bool, FieldValue::Bool(false)))
        .field(FieldSpec::required("count", FieldCodec::Int { min: -5, max: 5 }))
        .field(FieldSpec::optional(
            "ratio",
            FieldCodec::Float { min: 0.0, max: 2.0 },
            FieldValue::Float(0.5),
        ))
        .field(FieldSpec::required("shape", FieldCodec::Name(FIXTURE_SHAPES)))
        .field(FieldSpec::optional(
            "reward",
            FieldCodec::IntProvider { min: 0, max: 10 },
            FieldValue::IntProvider(IntProvider::Constant { value: 1 }),
        ))
        .field(FieldSpec::optional(
            "target",
            FieldCodec::BlockRef,
            FieldValue::BlockRef(AIR_NAME.into()),
        ))
}

fn build_fixture(_cfg: &BlockConfig) -> lode_blocks::Result<BlockParts> {
    Ok(BlockParts::plain())
}

fn catalog_with_fixture() -> Catalog {
    let mut catalog = Catalog::new().unwrap();
    catalog
        .codecs_mut()
        .register(fixture_schema(), build_fixture)
        .unwrap();
    catalog
}

#[test]
fn every_builtin_type_roundtrips() {
    let catalog = Catalog::builtin().unwrap();
    for ty in catalog.iter() {
        let rec = catalog.encode(ty.id).unwrap();
        let (kind, cfg) = catalog.codecs().decode(&rec).unwrap();
        assert_eq!(kind, ty.kind, "{}", ty.name);
        assert_eq!(cfg, ty.config, "{}", ty.name);
    }
}

#[test]
fn roundtrip_survives_text_form() {
    let catalog = Catalog::builtin().unwrap();
    let ty = catalog.lookup("lode:diamond_ore").unwrap();
    let text = toml::to_string(&catalog.encode(ty.id).unwrap()).unwrap();
    let (_, cfg) = catalog.codecs().decode(&record(&text)).unwrap();
    assert_eq!(
        cfg.int_provider("experience"),
        Some(IntProvider::Uniform {
            min_inclusive: 3,
            max_inclusive: 7
        })
    );
}

#[test]
fn missing_required_field_rejected() {
    let catalog = Catalog::new().unwrap();
    let err = catalog
        .codecs()
        .decode(&record(r#"kind = "colored""#))
        .unwrap_err();
    assert!(matches!(err, BlockError::SchemaMismatch { ref kind, .. } if kind == "colored"));
}

#[test]
fn optional_field_takes_default() {
    let catalog = Catalog::new().unwrap();
    let (_, cfg) = catalog
        .codecs()
        .decode(&record(r#"kind = "growing_vine""#))
        .unwrap();
    assert_eq!(cfg.name("direction"), Some("down"));
    let (_, cfg) = catalog
        .codecs()
        .decode(&record(r#"kind = "drop_experience""#))
        .unwrap();
    assert_eq!(
        cfg.get("experience"),
        Some(&FieldValue::IntProvider(IntProvider::Constant { value: 0 }))
    );
}

#[test]
fn out_of_domain_values_rejected() {
    let catalog = Catalog::new().unwrap();
    for text in [
        r#"
        kind = "drop_experience"
        experience = 11
        "#,
        r#"
        kind = "colored"
        color = "ultraviolet"
        "#,
        r#"
        kind = "weathering"
        stage = "rusted"
        "#,
        r#"
        kind = "colored"
        color = 3
        "#,
        r#"
        kind = "simple"
        colour = "red"
        "#,
        r#"
        kind = "simple"
        properties = { hardness = 1.0, sparkle = true }
        "#,
    ] {
        let err = catalog.codecs().decode(&record(text)).unwrap_err();
        assert!(matches!(err, BlockError::SchemaMismatch { .. }), "{text}: {err}");
    }
}

#[test]
fn unknown_kind_rejected() {
    let mut catalog = Catalog::new().unwrap();
    let err = catalog
        .register_record("lode:mystery", &record(r#"kind = "mystery""#))
        .unwrap_err();
    assert!(matches!(err, BlockError::UnknownKind(ref k) if k == "mystery"));
}

#[test]
fn dangling_block_reference_rejected() {
    let mut catalog = catalog_with_fixture();
    let linked = r#"
        kind = "fixture"
        count = 1
        shape = "a"
        target = "lode:fixture_a"
    "#;
    catalog.register_record("lode:fixture_a", &record(linked)).unwrap();
    catalog.check_references().unwrap();

    let dangling = r#"
        kind = "fixture"
        count = 2
        shape = "b"
        target = "lode:nowhere"
    "#;
    catalog.register_record("lode:fixture_b", &record(dangling)).unwrap();
    let err = catalog.check_references().unwrap_err();
    assert!(matches!(err, BlockError::UnknownBlock(ref n) if n == "lode:nowhere"));
}

#[test]
fn weathering_stage_collision_rejected() {
    let err = Catalog::from_toml_str(
        r#"
        [[blocks]]
        id = "lode:a"
        kind = "weathering"
        stage = "exposed"

        [[blocks]]
        id = "lode:b"
        kind = "weathering"
        stage = "exposed"
        "#,
    )
    .err()
    .unwrap();
    assert!(matches!(err, BlockError::SchemaMismatch { .. }));
}

#[test]
fn capability_absence_rejected_at_dispatch() {
    let catalog = Catalog::builtin().unwrap();
    let stone = catalog.lookup("lode:stone").unwrap();
    for cap in Capability::ALL {
        assert!(!stone.has(cap));
    }
    let err = stone.portal().err().unwrap();
    assert!(matches!(
        err,
        BlockError::CapabilityNotSupported {
            capability: Capability::Portal,
            ..
        }
    ));
    assert!(stone.fall_reactive().is_err());
    assert!(stone.bucket_pickup().is_err());

    let sand = catalog.lookup("lode:sand").unwrap();
    assert!(sand.fall_reactive().is_ok());
    assert!(sand.portal().is_err());
}

#[test]
fn experience_stays_within_provider_bounds() {
    let catalog = Catalog::builtin().unwrap();
    let ore = catalog.lookup("lode:coal_ore").unwrap();
    let stone = catalog.lookup("lode:stone").unwrap();
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(3);
    for _ in 0..200 {
        let xp = roll_experience(ore, &mut rng);
        assert!((0..=2).contains(&xp));
        assert_eq!(roll_experience(stone, &mut rng), 0);
    }
}

#[test]
fn with_value_errors_name_the_property() {
    let catalog = Catalog::builtin().unwrap();
    let vine = catalog.lookup("lode:weeping_vines").unwrap();
    let err = vine
        .with_value(
            vine.default_state(),
            "age",
            lode_blocks::Value::Int(26),
        )
        .unwrap_err();
    assert!(
        matches!(err, BlockError::InvalidPropertyValue { ref property, .. } if property == "age")
    );
}

#[test]
fn built_config_keeps_its_defaults() {
    let mut catalog = Catalog::new().unwrap();
    let blueprint = catalog
        .codecs()
        .build("drop_experience", BlockConfig::new(BehaviorProperties::default()))
        .unwrap();
    assert_eq!(
        blueprint.config.int_provider("experience"),
        Some(IntProvider::Constant { value: 0 })
    );
    let id = catalog.register("lode:plain_ore", blueprint).unwrap();

    let (_, decoded) = catalog
        .codecs()
        .decode(&catalog.encode(id).unwrap())
        .unwrap();
    assert_eq!(decoded, catalog.get(id).unwrap().config);
}

#[test]
fn registered_blueprint_keeps_its_defaults() {
    let mut catalog = Catalog::new().unwrap();
    let mut states = StateDefinitionBuilder::new();
    states.declare(props::AGE_25).unwrap();
    let blueprint = Blueprint {
        kind: "growing_vine",
        config: BlockConfig::new(BehaviorProperties::default().non_solid()),
        states,
        capabilities: Capabilities::new(),
    };
    let id = catalog.register("lode:bare_vine", blueprint).unwrap();
    let stored = &catalog.get(id).unwrap().config;
    assert_eq!(stored.name("direction"), Some("down"));

    let (_, decoded) = catalog
        .codecs()
        .decode(&catalog.encode(id).unwrap())
        .unwrap();
    assert_eq!(&decoded, stored);
}

#[test]
fn non_finite_or_negative_strength_rejected() {
    let catalog = Catalog::new().unwrap();
    for props in [
        "{ hardness = nan }",
        "{ hardness = -1.0 }",
        "{ explosion_resistance = inf }",
        "{ explosion_resistance = -0.5 }",
    ] {
        let text = format!("kind = \"simple\"\nproperties = {props}\n");
        let err = catalog.codecs().decode(&record(&text)).unwrap_err();
        assert!(
            matches!(err, BlockError::SchemaMismatch { ref kind, .. } if kind == "simple"),
            "{props}: {err}"
        );
    }

    for bad in [f32::NAN, f32::INFINITY, -2.0] {
        let props = BehaviorProperties {
            hardness: bad,
            ..BehaviorProperties::default()
        };
        let cfg = BlockConfig::new(props);
        assert!(matches!(
            catalog.codecs().encode("simple", &cfg),
            Err(BlockError::SchemaMismatch { .. })
        ));
        assert!(matches!(
            catalog.codecs().build("simple", cfg),
            Err(BlockError::SchemaMismatch { .. })
        ));
    }
}

fn arb_properties() -> impl Strategy<Value = BehaviorProperties> {
    (
        0.0f32..1_000.0,
        0.0f32..3_600_000.0,
        any::<bool>(),
        any::<bool>(),
        0u8..=15,
    )
        .prop_map(
            |(hardness, explosion_resistance, solid, replaceable, light_emission)| {
                BehaviorProperties {
                    hardness,
                    explosion_resistance,
                    solid,
                    replaceable,
                    light_emission,
                }
            },
        )
}

fn arb_provider(min: i32, max: i32) -> BoxedStrategy<IntProvider> {
    let (lo, hi) = (min.max(0), max.min(10));
    prop_oneof![
        (lo..=hi).prop_map(|value| IntProvider::Constant { value }),
        (lo..=hi, lo..=hi).prop_map(|(a, b)| IntProvider::Uniform {
            min_inclusive: a.min(b),
            max_inclusive: a.max(b),
        }),
    ]
    .boxed()
}

fn arb_value(codec: FieldCodec) -> BoxedStrategy<FieldValue> {
    match codec {
        FieldCodec::Bool => any::<bool>().prop_map(FieldValue::Bool).boxed(),
        FieldCodec::Int { min, max } => (min..=max).prop_map(FieldValue::Int).boxed(),
        FieldCodec::Float { min, max } => (min..=max).prop_map(FieldValue::Float).boxed(),
        FieldCodec::Name(names) => proptest::sample::select(names.to_vec())
            .prop_map(|n| FieldValue::Name(n.to_string()))
            .boxed(),
        FieldCodec::IntProvider { min, max } => arb_provider(min, max)
            .prop_map(FieldValue::IntProvider)
            .boxed(),
        FieldCodec::BlockRef => proptest::sample::select(vec![AIR_NAME, "lode:stone", "other:thing"])
            .prop_map(|r| FieldValue::BlockRef(r.to_string()))
            .boxed(),
    }
}

// In-domain config for `schema`; fields with a default may be left out.
fn arb_config(schema: &BlockSchema) -> BoxedStrategy<BlockConfig> {
    let fields: Vec<BoxedStrategy<Option<(&'static str, FieldValue)>>> = schema
        .fields
        .iter()
        .map(|spec| {
            let name = spec.name;
            let value = arb_value(spec.codec).prop_map(move |v| (name, v));
            if spec.default.is_some() {
                proptest::option::of(value).boxed()
            } else {
                value.prop_map(Some).boxed()
            }
        })
        .collect();
    (arb_properties(), fields)
        .prop_map(|(props, fields)| {
            fields
                .into_iter()
                .flatten()
                .fold(BlockConfig::new(props), |cfg, (name, v)| cfg.with(name, v))
        })
        .boxed()
}

fn arb_kind_and_config() -> impl Strategy<Value = (&'static str, BlockConfig)> {
    let catalog = catalog_with_fixture();
    let per_kind: Vec<BoxedStrategy<(&'static str, BlockConfig)>> = catalog
        .codecs()
        .kinds()
        .into_iter()
        .map(|kind| {
            let schema = catalog.codecs().schema(kind).unwrap();
            arb_config(schema).prop_map(move |cfg| (kind, cfg)).boxed()
        })
        .collect();
    proptest::strategy::Union::new(per_kind)
}

proptest! {
    // Every registered schema, every in-domain value, defaults present or not
    #[test]
    fn every_schema_roundtrips_in_domain((kind, cfg) in arb_kind_and_config()) {
        let catalog = catalog_with_fixture();
        let schema = catalog.codecs().schema(kind).unwrap();
        let normalized = schema.normalize(cfg.clone());

        let record = catalog.codecs().encode(kind, &cfg).unwrap();
        let (decoded_kind, decoded) = catalog.codecs().decode(&record).unwrap();
        prop_assert_eq!(decoded_kind, kind);
        prop_assert_eq!(&decoded, &normalized);

        let blueprint = catalog.codecs().build(kind, cfg).unwrap();
        prop_assert_eq!(&blueprint.config, &normalized);
    }
}
