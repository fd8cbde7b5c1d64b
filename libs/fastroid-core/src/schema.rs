//! Schema descriptors for mapped entities and forms
//!
//! Each entity type describes its fields once through [`Entity::schema`]:
//! the field name, its declared [`FieldType`], whether it is a column, an
//! identity, auto-incremented, an explicit order rank, and the form
//! metadata used by the validator. Relations to other entities are described
//! by [`RelationDef`] and resolved when a join is registered.

use crate::error::{FastroidError, Result};
use crate::value::Value;
use fastroid_common::{to_db_name, to_legacy_db_name};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Declared type of a mapped field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Double,
    Float,
    Int,
    Long,
    Text,
    Blob,
    Short,
}

impl FieldType {
    /// Returns true for the integer types
    #[must_use]
    pub fn is_integral(self) -> bool {
        matches!(self, Self::Int | Self::Long | Self::Short)
    }

    /// Normalize a value read from a row to this declared type
    ///
    /// # Errors
    /// Returns `FastroidError::TypeMismatch` if the value cannot be read as
    /// this type
    pub fn coerce(self, field: &str, value: Value) -> Result<Value> {
        Ok(match self {
            Self::Double | Self::Float => Value::Real(value.as_f64(field)?),
            Self::Int => Value::Integer(i64::from(value.as_i32(field)?)),
            Self::Long => Value::Integer(value.as_i64(field)?),
            Self::Short => Value::Integer(i64::from(value.as_i16(field)?)),
            Self::Text => Value::from(value.into_text(field)?),
            Self::Blob => Value::from(value.into_blob(field)?),
        })
    }
}

/// How class and field names become table and column names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamingStrategy {
    /// `departmentId` -> `DEPARTMENT_ID`, `userID` -> `USER_ID`
    #[default]
    Shouty,
    /// One underscore per capital letter: `userID` -> `USER_I_D`
    Legacy,
}

impl NamingStrategy {
    /// Convert a class or field name to a database name
    #[must_use]
    pub fn apply(self, name: &str) -> String {
        match self {
            Self::Shouty => to_db_name(name),
            Self::Legacy => to_legacy_db_name(name),
        }
    }
}

impl std::str::FromStr for NamingStrategy {
    type Err = FastroidError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "shouty" => Ok(Self::Shouty),
            "legacy" => Ok(Self::Legacy),
            other => Err(FastroidError::configuration(format!(
                "Invalid naming strategy: {other}. Must be one of: shouty, legacy"
            ))),
        }
    }
}

/// Condition under which a required field is checked
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WhenCondition {
    /// The other field holds a non-empty string
    NotEmpty,
    /// The other field equals the literal
    EqualsTo(&'static str),
}

/// Makes a required check depend on another field of the same object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct When {
    pub field: &'static str,
    pub condition: WhenCondition,
}

impl When {
    #[must_use]
    pub fn not_empty(field: &'static str) -> Self {
        Self {
            field,
            condition: WhenCondition::NotEmpty,
        }
    }

    #[must_use]
    pub fn equals(field: &'static str, expected: &'static str) -> Self {
        Self {
            field,
            condition: WhenCondition::EqualsTo(expected),
        }
    }
}

/// Required-field rule
///
/// Without conditions the field is always required. With conditions it is
/// required when any of them holds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Required {
    /// Display name used in the message instead of the field name
    pub label: Option<&'static str>,
    pub when: Vec<When>,
}

impl Required {
    #[must_use]
    pub fn always() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn label(mut self, label: &'static str) -> Self {
        self.label = Some(label);
        self
    }

    #[must_use]
    pub fn when(mut self, when: When) -> Self {
        self.when.push(when);
        self
    }
}

/// Widget a form field reads its value from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputBinding {
    /// Free text box
    Text { id: &'static str },
    /// Radio group; each choice maps a button id to the stored value
    Radio {
        group_id: &'static str,
        choices: &'static [(&'static str, &'static str)],
    },
}

/// Metadata of one field of an entity or form
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    pub name: &'static str,
    pub field_type: FieldType,
    pub column: bool,
    pub identity: bool,
    pub auto_increment: bool,
    pub order: Option<i32>,
    pub required: Option<Required>,
    pub input: Option<InputBinding>,
}

impl FieldDef {
    #[must_use]
    pub fn new(name: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            field_type,
            column: false,
            identity: false,
            auto_increment: false,
            order: None,
            required: None,
            input: None,
        }
    }

    /// Mark the field as a mapped column
    #[must_use]
    pub fn column(mut self) -> Self {
        self.column = true;
        self
    }

    /// Mark the field as (part of) the primary key; implies [`FieldDef::column`]
    #[must_use]
    pub fn identity(mut self) -> Self {
        self.column = true;
        self.identity = true;
        self
    }

    #[must_use]
    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    /// Explicit rank; ranked fields come before unranked ones
    #[must_use]
    pub fn order(mut self, rank: i32) -> Self {
        self.order = Some(rank);
        self
    }

    #[must_use]
    pub fn required(mut self, required: Required) -> Self {
        self.required = Some(required);
        self
    }

    #[must_use]
    pub fn input(mut self, input: InputBinding) -> Self {
        self.input = Some(input);
        self
    }
}

/// Total order over fields
///
/// Ranked fields sort by rank and precede unranked fields. Unranked fields,
/// and ranked fields sharing a rank, sort by name.
#[must_use]
pub fn compare_fields(a: &FieldDef, b: &FieldDef) -> Ordering {
    match (a.order, b.order) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.name.cmp(b.name)),
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (None, None) => a.name.cmp(b.name),
    }
}

/// Cardinality of a relation and where its join column is declared
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    /// Single referenced entity; the join column is declared here
    ToOne { join_column: &'static str },
    /// Collection of entities; the join column is declared by the named
    /// to-one relation on the element type
    ToMany { mapped_by: &'static str },
}

/// A field referencing another entity
#[derive(Debug, Clone, Copy)]
pub struct RelationDef {
    pub field: &'static str,
    pub kind: RelationKind,
    pub target: fn() -> EntitySchema,
}

impl RelationDef {
    #[must_use]
    pub fn to_one(field: &'static str, join_column: &'static str, target: fn() -> EntitySchema) -> Self {
        Self {
            field,
            kind: RelationKind::ToOne { join_column },
            target,
        }
    }

    #[must_use]
    pub fn to_many(field: &'static str, mapped_by: &'static str, target: fn() -> EntitySchema) -> Self {
        Self {
            field,
            kind: RelationKind::ToMany { mapped_by },
            target,
        }
    }

    /// Resolve the field name of the join column for this relation
    ///
    /// # Errors
    /// Returns `FastroidError::Mapping` if a to-many relation names a
    /// `mapped_by` relation that the element type does not declare as to-one
    pub fn join_column(&self) -> Result<&'static str> {
        match self.kind {
            RelationKind::ToOne { join_column } => Ok(join_column),
            RelationKind::ToMany { mapped_by } => {
                let target = (self.target)();
                match target.find_relation(mapped_by).map(|owner| owner.kind) {
                    Some(RelationKind::ToOne { join_column }) => Ok(join_column),
                    _ => Err(FastroidError::mapping(
                        target.name,
                        format!(
                            "{} declares no to-one relation {mapped_by} for {}",
                            target.name, self.field
                        ),
                    )),
                }
            }
        }
    }
}

/// Everything the mapper and the validator know about a type
#[derive(Debug, Clone)]
pub struct EntitySchema {
    /// Simple type name, the source of the table name
    pub name: &'static str,
    pub fields: Vec<FieldDef>,
    pub relations: Vec<RelationDef>,
}

impl EntitySchema {
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            fields: Vec::new(),
            relations: Vec::new(),
        }
    }

    #[must_use]
    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    #[must_use]
    pub fn relation(mut self, relation: RelationDef) -> Self {
        self.relations.push(relation);
        self
    }

    #[must_use]
    pub fn table_name(&self, naming: NamingStrategy) -> String {
        naming.apply(self.name)
    }

    /// All fields in field order
    #[must_use]
    pub fn ordered_fields(&self) -> Vec<&FieldDef> {
        let mut fields: Vec<&FieldDef> = self.fields.iter().collect();
        fields.sort_by(|a, b| compare_fields(a, b));
        fields
    }

    /// Column fields in field order
    #[must_use]
    pub fn column_fields(&self) -> Vec<&FieldDef> {
        self.ordered_fields()
            .into_iter()
            .filter(|f| f.column)
            .collect()
    }

    #[must_use]
    pub fn find_field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    #[must_use]
    pub fn find_relation(&self, name: &str) -> Option<&RelationDef> {
        self.relations.iter().find(|r| r.field == name)
    }
}

/// Field access for a mapped object
///
/// This is the object-safe half of an entity: the mapper writes hydrated
/// values through it, including into related entities it does not know the
/// concrete type of.
pub trait Record {
    /// Current value of a field
    ///
    /// # Errors
    /// Returns `FastroidError::UnknownField` for a name the type does not have
    fn value(&self, field: &str) -> Result<Value>;

    /// Replace the value of a field
    ///
    /// # Errors
    /// Returns `FastroidError::UnknownField` for a name the type does not have
    /// and `FastroidError::TypeMismatch` if the value does not fit the field
    fn set_value(&mut self, field: &str, value: Value) -> Result<()>;

    /// Prepare a fresh related entity and return it for population
    ///
    /// A to-one relation is replaced by a new default instance; a to-many
    /// relation gets a new default element appended.
    ///
    /// # Errors
    /// Returns `FastroidError::UnknownRelation` if the type has no such relation
    fn relation_slot(&mut self, relation: &str) -> Result<&mut dyn Record> {
        Err(FastroidError::unknown_relation(short_type_name::<Self>(), relation))
    }
}

/// A type with a schema that can be default-constructed and populated
pub trait Entity: Record + Default {
    fn schema() -> EntitySchema;
}

pub(crate) fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn field(name: &'static str, order: Option<i32>) -> FieldDef {
        let def = FieldDef::new(name, FieldType::Text).column();
        match order {
            Some(rank) => def.order(rank),
            None => def,
        }
    }

    fn parent_schema() -> EntitySchema {
        EntitySchema::new("Department")
            .field(FieldDef::new("departmentId", FieldType::Long).identity())
            .relation(RelationDef::to_many("employees", "department", child_schema))
    }

    fn child_schema() -> EntitySchema {
        EntitySchema::new("Employee")
            .field(FieldDef::new("employeeId", FieldType::Long).identity().auto_increment())
            .field(FieldDef::new("departmentId", FieldType::Long).column())
            .relation(RelationDef::to_one("department", "departmentId", parent_schema))
    }

    #[test]
    fn test_ranked_fields_come_first() {
        let schema = EntitySchema::new("Sample")
            .field(field("alpha", None))
            .field(field("zeta", Some(2)))
            .field(field("beta", Some(1)));

        let names: Vec<_> = schema.ordered_fields().iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["beta", "zeta", "alpha"]);
    }

    #[test]
    fn test_unranked_fields_sort_by_name() {
        let schema = EntitySchema::new("Sample")
            .field(field("name", None))
            .field(field("age", None))
            .field(field("email", None));

        let names: Vec<_> = schema.ordered_fields().iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["age", "email", "name"]);
    }

    #[test]
    fn test_name_comparison_is_ordinal() {
        let upper = field("Zed", None);
        let lower = field("alpha", None);
        assert_eq!(compare_fields(&upper, &lower), Ordering::Less);
    }

    #[test]
    fn test_column_fields_skip_non_columns() {
        let schema = EntitySchema::new("Sample")
            .field(field("name", None))
            .field(FieldDef::new("note", FieldType::Text));

        let names: Vec<_> = schema.column_fields().iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["name"]);
    }

    #[test]
    fn test_identity_implies_column() {
        let def = FieldDef::new("id", FieldType::Long).identity();
        assert!(def.column);
        assert!(def.identity);
        assert!(!def.auto_increment);
    }

    #[test]
    fn test_table_name_by_strategy() {
        let schema = EntitySchema::new("ProjectAssignment");
        assert_eq!(schema.table_name(NamingStrategy::Shouty), "PROJECT_ASSIGNMENT");
        assert_eq!(schema.table_name(NamingStrategy::Legacy), "PROJECT_ASSIGNMENT");
    }

    #[test]
    fn test_to_one_join_column() {
        let child = child_schema();
        let relation = child.find_relation("department").unwrap();
        assert_eq!(relation.join_column().unwrap(), "departmentId");
    }

    #[test]
    fn test_to_many_join_column_comes_from_owner() {
        let parent = parent_schema();
        let relation = parent.find_relation("employees").unwrap();
        assert_eq!(relation.join_column().unwrap(), "departmentId");
    }

    #[test]
    fn test_to_many_with_bad_mapped_by() {
        let relation = RelationDef::to_many("employees", "team", child_schema);
        let err = relation.join_column().unwrap_err();
        assert!(matches!(err, FastroidError::Mapping { .. }));
    }

    #[test]
    fn test_coerce_to_declared_type() {
        assert_eq!(
            FieldType::Int.coerce("age", Value::Text("42".to_string())).unwrap(),
            Value::Integer(42)
        );
        assert_eq!(
            FieldType::Text.coerce("name", Value::Integer(7)).unwrap(),
            Value::Text("7".to_string())
        );
        assert_eq!(FieldType::Blob.coerce("photo", Value::Null).unwrap(), Value::Null);
        assert!(FieldType::Short.coerce("level", Value::Integer(1 << 20)).is_err());
    }

    #[test]
    fn test_naming_strategy_from_str() {
        assert_eq!("legacy".parse::<NamingStrategy>().unwrap(), NamingStrategy::Legacy);
        assert!("camel".parse::<NamingStrategy>().is_err());
    }

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name::<EntitySchema>(), "EntitySchema");
    }

    fn arb_field() -> impl Strategy<Value = FieldDef> {
        (
            prop::sample::select(vec!["a", "b", "c", "id", "name", "zeta"]),
            prop::option::of(-3i32..3),
        )
            .prop_map(|(name, order)| field(name, order))
    }

    proptest! {
        #[test]
        fn prop_ranked_strictly_precede_unranked(mut fields in prop::collection::vec(arb_field(), 0..12)) {
            fields.sort_by(compare_fields);
            let first_unranked = fields.iter().position(|f| f.order.is_none()).unwrap_or(fields.len());
            prop_assert!(fields[first_unranked..].iter().all(|f| f.order.is_none()));
        }

        #[test]
        fn prop_ranked_follow_numeric_rank(mut fields in prop::collection::vec(arb_field(), 0..12)) {
            fields.sort_by(compare_fields);
            let ranks: Vec<i32> = fields.iter().filter_map(|f| f.order).collect();
            prop_assert!(ranks.windows(2).all(|w| w[0] <= w[1]));
        }

        #[test]
        fn prop_order_is_antisymmetric_and_transitive(
            a in arb_field(),
            b in arb_field(),
            c in arb_field(),
        ) {
            prop_assert_eq!(compare_fields(&a, &b), compare_fields(&b, &a).reverse());
            if compare_fields(&a, &b) != Ordering::Greater && compare_fields(&b, &c) != Ordering::Greater {
                prop_assert!(compare_fields(&a, &c) != Ordering::Greater);
            }
        }
    }
}
