//! Condition authoring properties
//!
//! End-to-end checks of the scoping resolver: defaulting, structural
//! completeness, ordering, and type-compatibility self-consistency.

use alloy_primitives::{address, Address};
use proptest::prelude::{prop_assert_eq, proptest, Just, Strategy};
use proptest::prop_oneof;
use warden_presets::prelude::{
    and, eq, every, gt, lt, matches, matches_abi, or, resolve, AbiParam, AbiType, Operator,
    ParamType, PlaceholderRegistry, ScopeError, Scoping,
};
use warden_presets::{any, effective_param_type};

const OWNER: Address = address!("d8dA6BF26964aF9D7eEd9e03E53415D37aA96045");

#[test]
fn primitive_values_default_to_equality() {
    let ty = AbiType::Uint(256);
    let defaulted = resolve(&Scoping::from(1000u64), &ty).unwrap();
    let explicit = resolve(&eq(1000u64), &ty).unwrap();
    assert_eq!(defaulted, explicit);

    let ty = AbiType::Address;
    let defaulted = resolve(&Scoping::from(OWNER), &ty).unwrap();
    let explicit = resolve(&eq(OWNER), &ty).unwrap();
    assert_eq!(defaulted, explicit);

    let ty = AbiType::Bool;
    assert_eq!(
        resolve(&Scoping::from(true), &ty).unwrap(),
        resolve(&eq(true), &ty).unwrap()
    );
}

#[test]
fn placeholders_default_to_equality() {
    let mut registry = PlaceholderRegistry::new();
    let recipient = registry.define("recipient", AbiType::Address);
    let ty = AbiType::Address;
    let defaulted = resolve(&Scoping::Placeholder(recipient.clone()), &ty).unwrap();
    let explicit = resolve(&eq(recipient), &ty).unwrap();
    assert_eq!(defaulted, explicit);
    assert_eq!(defaulted.operator, Operator::EqualTo);
}

#[test]
fn struct_scopings_default_to_the_matcher() {
    let ty = AbiType::Tuple(vec![
        AbiParam::named("to", AbiType::Address),
        AbiParam::named("amount", AbiType::Uint(256)),
    ]);
    let shorthand = Scoping::Struct(vec![("amount".to_string(), gt(100u64))]);
    let defaulted = resolve(&shorthand, &ty).unwrap();
    let explicit = resolve(&matches(shorthand.clone()), &ty).unwrap();
    assert_eq!(defaulted, explicit);
    assert_eq!(defaulted.operator, Operator::Matches);
    assert_eq!(defaulted.children.len(), 2);
}

#[test]
fn resolved_conditions_are_type_consistent() {
    let array_ty = AbiType::Array(Box::new(AbiType::Uint(256)));
    let tuple_ty = AbiType::Tuple(vec![
        AbiParam::named("to", AbiType::Address),
        AbiParam::named("data", AbiType::Bytes),
    ]);
    let cases: Vec<(Scoping, AbiType)> = vec![
        (eq(5u64), AbiType::Uint(256)),
        (or([eq(1u64), gt(10u64)]), AbiType::Uint(256)),
        (and([gt(1u64), lt(10u64)]), AbiType::Uint(96)),
        (every(eq(1u64)), array_ty.clone()),
        (matches(vec![eq(1u64), eq(2u64)]), array_ty),
        (
            Scoping::Struct(vec![("to".to_string(), eq(OWNER))]),
            tuple_ty,
        ),
    ];
    for (scoping, ty) in cases {
        let condition = resolve(&scoping, &ty).unwrap();
        assert_eq!(
            effective_param_type(&condition).unwrap(),
            ty.param_type(),
            "self-consistency for {ty:?}"
        );
    }
}

#[test]
fn abi_encoded_scoping_slots_into_a_bytes_field() {
    let inner_params = vec![AbiParam::named("id", AbiType::Uint(256))];
    let ty = AbiType::Tuple(vec![
        AbiParam::named("target", AbiType::Address),
        AbiParam::named("data", AbiType::Bytes),
    ]);
    let scoping = Scoping::Struct(vec![(
        "data".to_string(),
        matches_abi(vec![eq(42u64)], inner_params),
    )]);
    let condition = resolve(&scoping, &ty).unwrap();
    assert_eq!(condition.children[1].param_type, ParamType::AbiEncoded);
    assert_eq!(condition.children[1].children.len(), 1);
}

#[test]
fn mixed_branch_types_are_rejected() {
    // An or() over scopings that resolve to different structural categories
    // can only be built by nesting explicit expressions; the matcher must
    // reject the disagreement when the branches diverge.
    let ty = AbiType::Tuple(vec![AbiParam::named("data", AbiType::Bytes)]);
    let scoping = Scoping::Struct(vec![(
        "data".to_string(),
        // eq on bytes resolves Dynamic; matches_abi resolves AbiEncoded.
        // Dynamic slots tolerate AbiEncoded, so both branches pass alone,
        // but together they disagree with each other.
        or([
            eq(vec![0xde, 0xad]),
            matches_abi(vec![eq(1u64)], vec![AbiParam::new(AbiType::Uint(256))]),
        ]),
    )]);
    let err = resolve(&scoping, &ty).unwrap_err();
    assert!(matches!(err, ScopeError::ParamTypeMismatch { .. }));
}

#[test]
fn length_violation_named_in_error() {
    let ty = AbiType::FixedArray(Box::new(AbiType::Uint(256)), 2);
    let err = resolve(&matches(vec![eq(1u64), eq(2u64), eq(3u64)]), &ty).unwrap_err();
    assert_eq!(
        err,
        ScopeError::TooManyElements {
            given: 3,
            capacity: 2
        }
    );
}

#[test]
fn unknown_key_named_in_error() {
    let ty = AbiType::Tuple(vec![
        AbiParam::named("bar", AbiType::Uint(256)),
        AbiParam::named("baz", AbiType::Uint(256)),
    ]);
    let err = resolve(
        &matches(Scoping::Struct(vec![("foo".to_string(), eq(1u64))])),
        &ty,
    )
    .unwrap_err();
    let ScopeError::UnknownField { field, .. } = &err else {
        panic!("expected UnknownField, got {err:?}");
    };
    assert_eq!(field, "foo");
}

fn arb_component_type() -> impl Strategy<Value = AbiType> {
    prop_oneof![
        Just(AbiType::Uint(256)),
        Just(AbiType::Bool),
        Just(AbiType::Address),
        Just(AbiType::String),
        Just(AbiType::Array(Box::new(AbiType::Uint(256)))),
    ]
}

fn scoping_for(ty: &AbiType) -> Scoping {
    match ty {
        AbiType::Uint(_) => eq(7u64),
        AbiType::Bool => eq(true),
        AbiType::Address => eq(Address::ZERO),
        AbiType::String => eq("x"),
        AbiType::Array(_) => every(gt(0u64)),
        _ => any(),
    }
}

proptest! {
    /// A partial scoping always yields one child per ABI component,
    /// regardless of how many fields it specifies.
    #[test]
    fn structural_completeness(
        types in proptest::collection::vec(arb_component_type(), 1..6),
        mask in proptest::collection::vec(proptest::bool::ANY, 6),
    ) {
        let components: Vec<AbiParam> = types
            .iter()
            .enumerate()
            .map(|(i, ty)| AbiParam::named(format!("f{i}"), ty.clone()))
            .collect();
        let ty = AbiType::Tuple(components);
        let fields: Vec<(String, Scoping)> = types
            .iter()
            .zip(&mask)
            .enumerate()
            .filter(|(_, (_, specified))| **specified)
            .map(|(i, (component_ty, _))| (format!("f{i}"), scoping_for(component_ty)))
            .collect();
        let condition = resolve(&matches(Scoping::Struct(fields)), &ty).unwrap();
        prop_assert_eq!(condition.children.len(), types.len());
    }

    /// Recomputing the effective parameter type of anything the resolver
    /// produces never disagrees with the ABI-derived expectation.
    #[test]
    fn type_compatibility_round_trip(
        types in proptest::collection::vec(arb_component_type(), 1..6),
    ) {
        for ty in &types {
            let condition = resolve(&scoping_for(ty), ty).unwrap();
            prop_assert_eq!(
                effective_param_type(&condition).unwrap(),
                ty.param_type()
            );
        }
    }
}
