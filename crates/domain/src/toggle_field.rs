use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use badgedesk_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

/// Kind of record a toggle mutates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    /// An employee record.
    Employee,
    /// A company record.
    Company,
}

impl EntityType {
    /// Returns the stable wire value for this entity type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Employee => "employee",
            Self::Company => "company",
        }
    }
}

impl Display for EntityType {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "employee" => Ok(Self::Employee),
            "company" => Ok(Self::Company),
            _ => Err(AppError::Validation(format!(
                "unknown entity type '{value}'"
            ))),
        }
    }
}

/// Server-assigned identifier of an employee or company.
///
/// Serialized as a JSON string or a JSON number depending on how the server
/// rendered it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    /// Textual identifier.
    Text(NonEmptyString),
    /// Numeric identifier.
    Number(i64),
}

impl EntityId {
    /// Creates a textual identifier.
    pub fn text(value: impl Into<String>) -> AppResult<Self> {
        NonEmptyString::new(value)
            .map(Self::Text)
            .map_err(|_| AppError::Validation("entity id must not be empty".to_owned()))
    }

    /// Creates a numeric identifier.
    #[must_use]
    pub fn number(value: i64) -> Self {
        Self::Number(value)
    }
}

impl Display for EntityId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(value) => formatter.write_str(value.as_str()),
            Self::Number(value) => write!(formatter, "{value}"),
        }
    }
}

/// Default employee fields that can be toggled.
pub const EMPLOYEE_TOGGLE_FIELDS: &[&str] = &["access", "badge", "badgeSuspended"];

/// Default company fields that can be toggled.
pub const COMPANY_TOGGLE_FIELDS: &[&str] = &["accessBlocked", "individualCompany"];

/// Allow-list of togglable field names per entity type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldCatalog {
    employee: BTreeSet<String>,
    company: BTreeSet<String>,
}

impl FieldCatalog {
    /// Creates a catalog from explicit field lists.
    ///
    /// Names must be non-empty and may not appear under both entity types,
    /// otherwise derivation of the entity type would be ambiguous.
    pub fn new<E, C>(employee_fields: E, company_fields: C) -> AppResult<Self>
    where
        E: IntoIterator,
        E::Item: Into<String>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        let employee = collect_field_names(employee_fields)?;
        let company = collect_field_names(company_fields)?;

        if let Some(shared) = employee.intersection(&company).next() {
            return Err(AppError::Validation(format!(
                "field '{shared}' cannot be togglable on both employees and companies"
            )));
        }

        Ok(Self { employee, company })
    }

    /// Derives the entity type owning a field.
    ///
    /// Unknown names are rejected instead of being attributed to a default
    /// entity type.
    pub fn resolve(&self, field_name: &str) -> AppResult<EntityType> {
        if self.employee.contains(field_name) {
            return Ok(EntityType::Employee);
        }

        if self.company.contains(field_name) {
            return Ok(EntityType::Company);
        }

        Err(AppError::Validation(format!(
            "field '{field_name}' is not togglable"
        )))
    }

    /// Returns whether the field belongs to the entity type allow-list.
    #[must_use]
    pub fn allows(&self, entity_type: EntityType, field_name: &str) -> bool {
        self.fields(entity_type).contains(field_name)
    }

    /// Lists the togglable field names of one entity type in sorted order.
    pub fn fields_for(&self, entity_type: EntityType) -> impl Iterator<Item = &str> {
        self.fields(entity_type).iter().map(String::as_str)
    }

    /// Builds a validated toggle target.
    ///
    /// When `entity_type` is `None` it is derived from the field name.
    pub fn field(
        &self,
        entity_type: Option<EntityType>,
        entity_id: EntityId,
        field_name: &str,
    ) -> AppResult<ToggleableField> {
        let entity_type = match entity_type {
            Some(entity_type) if self.allows(entity_type, field_name) => entity_type,
            Some(entity_type) => {
                return Err(AppError::Validation(format!(
                    "field '{field_name}' is not togglable on {entity_type} records"
                )));
            }
            None => self.resolve(field_name)?,
        };

        Ok(ToggleableField {
            entity_type,
            entity_id,
            field_name: NonEmptyString::new(field_name)?,
        })
    }

    fn fields(&self, entity_type: EntityType) -> &BTreeSet<String> {
        match entity_type {
            EntityType::Employee => &self.employee,
            EntityType::Company => &self.company,
        }
    }
}

impl Default for FieldCatalog {
    fn default() -> Self {
        Self {
            employee: EMPLOYEE_TOGGLE_FIELDS
                .iter()
                .map(|name| (*name).to_owned())
                .collect(),
            company: COMPANY_TOGGLE_FIELDS
                .iter()
                .map(|name| (*name).to_owned())
                .collect(),
        }
    }
}

fn collect_field_names<I>(fields: I) -> AppResult<BTreeSet<String>>
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    fields
        .into_iter()
        .map(|name| {
            let name = name.into();
            if name.trim().is_empty() || name.trim() != name {
                return Err(AppError::Validation(format!(
                    "invalid togglable field name '{name}'"
                )));
            }

            Ok(name)
        })
        .collect()
}

/// One togglable boolean attribute of one record.
///
/// Only constructible through [`FieldCatalog::field`], so the field name is
/// always part of the allow-list of its entity type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ToggleableField {
    entity_type: EntityType,
    entity_id: EntityId,
    field_name: NonEmptyString,
}

impl ToggleableField {
    /// Returns the owning entity type.
    #[must_use]
    pub fn entity_type(&self) -> EntityType {
        self.entity_type
    }

    /// Returns the record identifier.
    #[must_use]
    pub fn entity_id(&self) -> &EntityId {
        &self.entity_id
    }

    /// Returns the field name.
    #[must_use]
    pub fn field_name(&self) -> &str {
        self.field_name.as_str()
    }
}
