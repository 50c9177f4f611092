pub(crate) mod all_of;
pub(crate) mod any_of;
pub(crate) mod boolean;
pub(crate) mod const_;
pub(crate) mod dependencies;
pub(crate) mod enum_;
pub(crate) mod format;
pub(crate) mod if_;
pub(crate) mod items;
pub(crate) mod length;
pub(crate) mod maximum;
pub(crate) mod minimum;
pub(crate) mod multiple_of;
pub(crate) mod not;
pub(crate) mod one_of;
pub(crate) mod pattern;
pub(crate) mod properties;
pub(crate) mod property_names;
pub(crate) mod ref_;
pub(crate) mod required;
pub(crate) mod type_;

use crate::{
    compilation::SchemaNode, error::ValidationError, validator::Engine, value::Kind,
};
use serde_json::Value;

/// One validator per applicable keyword. The set is closed, so dispatch is
/// a tagged enum rather than virtual calls; the compiler assembles each
/// node's list in a fixed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Keyword {
    Value,
    BooleanSchema,
    Ref,
    Items,
    Properties,
    PropertyNames,
    Type,
    Pattern,
    Required,
    Dependencies,
    AllOf,
    AnyOf,
    OneOf,
    Not,
    MultipleOf,
    Maximum,
    Minimum,
    MaxLength,
    MinLength,
    Enum,
    Const,
    IfThenElse,
    Format,
}

pub(crate) fn run(
    keyword: Keyword,
    engine: &Engine,
    node: &SchemaNode,
    instance: &Value,
    kind: Kind,
) -> Result<(), ValidationError> {
    match keyword {
        Keyword::Value => boolean::validate_value(instance, kind),
        Keyword::BooleanSchema => boolean::validate(node, instance),
        Keyword::Ref => ref_::validate(engine, node, instance, kind),
        Keyword::Items => items::validate(engine, node, instance),
        Keyword::Properties => properties::validate(engine, node, instance),
        Keyword::PropertyNames => property_names::validate(engine, node, instance),
        Keyword::Type => type_::validate(engine, node, instance, kind),
        Keyword::Pattern => pattern::validate(node, instance),
        Keyword::Required => required::validate(node, instance),
        Keyword::Dependencies => dependencies::validate(engine, node, instance),
        Keyword::AllOf => all_of::validate(engine, node, instance, kind),
        Keyword::AnyOf => any_of::validate(engine, node, instance, kind),
        Keyword::OneOf => one_of::validate(engine, node, instance, kind),
        Keyword::Not => not::validate(engine, node, instance, kind),
        Keyword::MultipleOf => multiple_of::validate(node, instance),
        Keyword::Maximum => maximum::validate(node, instance),
        Keyword::Minimum => minimum::validate(node, instance),
        Keyword::MaxLength => length::validate_max(node, instance),
        Keyword::MinLength => length::validate_min(node, instance),
        Keyword::Enum => enum_::validate(node, instance),
        Keyword::Const => const_::validate(node, instance),
        Keyword::IfThenElse => if_::validate(engine, node, instance, kind),
        Keyword::Format => format::validate(node, instance),
    }
}
