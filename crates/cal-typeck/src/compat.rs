//! Type identity and assignment compatibility.

use crate::ty::SemanticType;

/// Structural type identity.
///
/// Display-only data is ignored: `table_name`/`codeunit_name` never
/// affect identity, and a temporary record is the same type as its
/// non-temporary twin. `Unknown` values compare equal to each other so
/// unresolved types stay inert in downstream comparisons.
pub fn are_types_equal(a: &SemanticType, b: &SemanticType) -> bool {
    match (a, b) {
        (SemanticType::Primitive { name: a }, SemanticType::Primitive { name: b }) => {
            a.eq_ignore_ascii_case(b)
        }
        (
            SemanticType::Text {
                max_length: la,
                is_code: ca,
            },
            SemanticType::Text {
                max_length: lb,
                is_code: cb,
            },
        ) => la == lb && ca == cb,
        (
            SemanticType::Record { table_id: ia, .. },
            SemanticType::Record { table_id: ib, .. },
        ) => ia == ib,
        (
            SemanticType::Codeunit { codeunit_id: ia, .. },
            SemanticType::Codeunit { codeunit_id: ib, .. },
        ) => ia == ib,
        (SemanticType::Option { values: va }, SemanticType::Option { values: vb }) => {
            va.len() == vb.len()
                && va
                    .iter()
                    .zip(vb)
                    .all(|(x, y)| x.eq_ignore_ascii_case(y))
        }
        (
            SemanticType::Array {
                element_type: ea,
                dimensions: da,
            },
            SemanticType::Array {
                element_type: eb,
                dimensions: db,
            },
        ) => da == db && are_types_equal(ea, eb),
        (SemanticType::Unknown { .. }, SemanticType::Unknown { .. }) => true,
        _ => false,
    }
}

/// Whether a value of `source` may be assigned to a slot of `target`.
///
/// Deliberately asymmetric: widening conversions are allowed
/// (`Integer -> Decimal`, `Integer -> BigInteger`), narrowing is not.
/// Text and Code interassign freely (the runtime truncates), options
/// interassign with integers, and `Unknown` is compatible in both
/// directions so editor services stay quiet on unresolved types.
pub fn is_assignment_compatible(source: &SemanticType, target: &SemanticType) -> bool {
    if are_types_equal(source, target) {
        return true;
    }
    if matches!(source, SemanticType::Unknown { .. })
        || matches!(target, SemanticType::Unknown { .. })
    {
        return true;
    }
    match (source, target) {
        (SemanticType::Primitive { name: s }, SemanticType::Primitive { name: t }) => {
            let s = s.as_str();
            let t = t.as_str();
            (s.eq_ignore_ascii_case("Integer") && t.eq_ignore_ascii_case("Decimal"))
                || (s.eq_ignore_ascii_case("Integer") && t.eq_ignore_ascii_case("BigInteger"))
                || (s.eq_ignore_ascii_case("Char") && t.eq_ignore_ascii_case("Integer"))
                || (s.eq_ignore_ascii_case("Integer") && t.eq_ignore_ascii_case("Char"))
        }
        (SemanticType::Text { .. }, SemanticType::Text { .. }) => true,
        (SemanticType::Option { .. }, SemanticType::Primitive { name }) => {
            name.eq_ignore_ascii_case("Integer")
        }
        (SemanticType::Primitive { name }, SemanticType::Option { .. }) => {
            name.eq_ignore_ascii_case("Integer")
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_is_reflexive_and_symmetric() {
        let types = [
            SemanticType::integer(),
            SemanticType::text(Some(30)),
            SemanticType::code(None),
            SemanticType::record(Some(18), true),
            SemanticType::codeunit(Some(80)),
            SemanticType::option(vec!["A".into(), "B".into()]),
            SemanticType::array(),
            SemanticType::unknown("x"),
        ];
        for a in &types {
            assert!(are_types_equal(a, a), "{a} == {a}");
            for b in &types {
                assert_eq!(are_types_equal(a, b), are_types_equal(b, a));
            }
        }
    }

    #[test]
    fn temporary_does_not_split_record_identity() {
        assert!(are_types_equal(
            &SemanticType::record(Some(18), true),
            &SemanticType::record(Some(18), false),
        ));
        assert!(!are_types_equal(
            &SemanticType::record(Some(18), false),
            &SemanticType::record(Some(36), false),
        ));
    }

    #[test]
    fn integer_widens_but_never_narrows() {
        assert!(is_assignment_compatible(
            &SemanticType::integer(),
            &SemanticType::decimal()
        ));
        assert!(!is_assignment_compatible(
            &SemanticType::decimal(),
            &SemanticType::integer()
        ));
        assert!(is_assignment_compatible(
            &SemanticType::integer(),
            &SemanticType::primitive("BigInteger")
        ));
    }

    #[test]
    fn text_and_code_interassign() {
        assert!(is_assignment_compatible(
            &SemanticType::code(Some(20)),
            &SemanticType::text(Some(50))
        ));
        assert!(is_assignment_compatible(
            &SemanticType::text(None),
            &SemanticType::code(Some(10))
        ));
    }

    #[test]
    fn options_interassign_with_integers_only() {
        let option = SemanticType::option(vec!["Open".into()]);
        assert!(is_assignment_compatible(&option, &SemanticType::integer()));
        assert!(is_assignment_compatible(&SemanticType::integer(), &option));
        assert!(!is_assignment_compatible(&option, &SemanticType::decimal()));
    }

    #[test]
    fn unknown_is_compatible_both_ways() {
        let unknown = SemanticType::unknown("Unrecognized type: TextConst");
        assert!(is_assignment_compatible(&unknown, &SemanticType::integer()));
        assert!(is_assignment_compatible(&SemanticType::integer(), &unknown));
    }
}
