use pretty_assertions::assert_eq;
use tether_ir::{ReflectedType, TypeKey, TypeUniverse};
use tether_types::{NullabilityResolver, TypeDescriptorRegistry};

use super::*;
use crate::syntax::{KotlinDialect, SwiftDialect};

fn param(
    registry: &TypeDescriptorRegistry<'_>,
    name: &str,
    key: TypeKey,
    nullability: ResolvedNullability,
) -> MarshalledParam {
    let descriptor = match registry.get_or_create(key) {
        Ok(descriptor) => descriptor,
        Err(err) => panic!("cannot describe {key:?}: {err}"),
    };
    MarshalledParam {
        name: name.to_owned(),
        descriptor,
        mode: ParamMode::ByValue,
        nullability,
    }
}

#[test]
fn identity_conversions_create_no_temporaries() {
    let universe = TypeUniverse::new();
    let registry = TypeDescriptorRegistry::new(&universe, NullabilityResolver::default());
    let params = vec![
        param(&registry, "x", TypeKey::INT32, ResolvedNullability::NonNullable),
        param(&registry, "flag", TypeKey::BOOL, ResolvedNullability::NonNullable),
    ];

    let converted = convert_params(
        &params,
        CodeLanguage::Swift,
        CodeLanguage::C,
        CodeLanguage::Swift,
        &[],
        &SwiftDialect,
    );

    assert_eq!(
        converted,
        Ok(ConvertedParams {
            statements: Vec::new(),
            arguments: vec!["x".to_owned(), "flag".to_owned()],
        })
    );
}

#[test]
fn conversions_bind_temporaries_in_order() {
    let mut universe = TypeUniverse::new();
    let widget = universe.register(ReflectedType::class("MyApp.Widget"));
    let registry = TypeDescriptorRegistry::new(&universe, NullabilityResolver::default());
    let params = vec![
        param(&registry, "count", TypeKey::UINT32, ResolvedNullability::NonNullable),
        param(&registry, "n", TypeKey::INT32, ResolvedNullability::NonNullable),
        param(&registry, "widget", widget, ResolvedNullability::Nullable),
    ];

    let converted = convert_params(
        &params,
        CodeLanguage::Kotlin,
        CodeLanguage::KotlinJna,
        CodeLanguage::Kotlin,
        &[],
        &KotlinDialect,
    );

    assert_eq!(
        converted,
        Ok(ConvertedParams {
            statements: vec![
                "val __countC = count.toInt()".to_owned(),
                "val __widgetC = widget?.__handle".to_owned(),
            ],
            arguments: vec!["__countC".to_owned(), "n".to_owned(), "__widgetC".to_owned()],
        })
    );
}

#[test]
fn keyword_names_are_escaped_but_temporaries_are_not() {
    let mut universe = TypeUniverse::new();
    let widget = universe.register(ReflectedType::class("MyApp.Widget"));
    let registry = TypeDescriptorRegistry::new(&universe, NullabilityResolver::default());
    let params = vec![param(&registry, "object", widget, ResolvedNullability::NonNullable)];

    let converted = convert_params(
        &params,
        CodeLanguage::KotlinJna,
        CodeLanguage::Kotlin,
        CodeLanguage::KotlinJna,
        &[],
        &KotlinDialect,
    );

    assert_eq!(
        converted.map(|c| c.statements),
        Ok(vec!["val __objectKotlin = MyApp_Widget(`object`)".to_owned()])
    );
    assert_eq!(
        declarations(&params, &KotlinDialect, CodeLanguage::Kotlin),
        vec!["`object`: MyApp_Widget".to_owned()]
    );
}

#[test]
fn by_ref_parameters_use_by_ref_templates() {
    let universe = TypeUniverse::new();
    let registry = TypeDescriptorRegistry::new(&universe, NullabilityResolver::default());
    let mut value = param(&registry, "value", TypeKey::INT32, ResolvedNullability::NonNullable);
    value.mode = ParamMode::Ref;

    assert_eq!(value.type_name(CodeLanguage::Kotlin), "DNRef<Int>");
    assert_eq!(
        value
            .conversion(CodeLanguage::Kotlin, CodeLanguage::KotlinJna)
            .map(|t| t.map(|t| t.apply("value"))),
        Ok(Some("value.__pointer".to_owned()))
    );
    assert!(value.conversion(CodeLanguage::Swift, CodeLanguage::C).is_err());
}

#[test]
fn type_and_identifier_lists() {
    let universe = TypeUniverse::new();
    let registry = TypeDescriptorRegistry::new(&universe, NullabilityResolver::default());
    let params = vec![
        param(&registry, "in", TypeKey::STRING, ResolvedNullability::Nullable),
        param(&registry, "y", TypeKey::FLOAT64, ResolvedNullability::NonNullable),
    ];

    assert_eq!(
        type_names(&params, CodeLanguage::Swift),
        vec!["String?".to_owned(), "Double".to_owned()]
    );
    assert_eq!(
        identifiers(&params, CodeLanguage::Swift),
        vec!["`in`".to_owned(), "y".to_owned()]
    );
}

#[test]
fn temporaries_avoid_reserved_and_existing_names() {
    let universe = TypeUniverse::new();
    let registry = TypeDescriptorRegistry::new(&universe, NullabilityResolver::default());
    let params = vec![
        param(&registry, "exception", TypeKey::STRING, ResolvedNullability::NonNullable),
        param(&registry, "__p_exceptionC", TypeKey::INT32, ResolvedNullability::NonNullable),
        param(&registry, "count", TypeKey::UINT32, ResolvedNullability::NonNullable),
    ];

    let converted = convert_params(
        &params,
        CodeLanguage::Kotlin,
        CodeLanguage::KotlinJna,
        CodeLanguage::Kotlin,
        &["__exceptionC", "__countC"],
        &KotlinDialect,
    );

    assert_eq!(
        converted.map(|c| c.arguments),
        Ok(vec![
            "__p1_exceptionC".to_owned(),
            "__p_exceptionC".to_owned(),
            "__p_countC".to_owned(),
        ])
    );
}
