use crate::catalog::Crop;
use crate::field::{Field, FieldDraft, FieldId, ValidationError};
use crate::projection::{aggregate, YieldTotals};
use crate::view::{distinct_crops, FieldView, SortKey};

/// Append-only, ordered store of fields for one session.
#[derive(Debug, Default)]
pub struct FieldRegistry {
    fields: Vec<Field>,
}

impl FieldRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates `draft` and appends the resulting field. Nothing is stored
    /// when validation fails.
    pub fn append(&mut self, draft: &FieldDraft) -> Result<&Field, ValidationError> {
        let field = draft.validate()?;
        self.fields.push(field);
        Ok(&self.fields[self.fields.len() - 1])
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, id: FieldId) -> Option<&Field> {
        self.fields.iter().find(|field| field.id() == id)
    }

    pub fn crops(&self) -> Vec<Crop> {
        distinct_crops(&self.fields)
    }

    pub fn aggregate(&self) -> YieldTotals {
        aggregate(&self.fields)
    }

    pub fn view(&self, crop_filter: Option<Crop>, sort: Option<SortKey>) -> FieldView<'_> {
        FieldView::build(&self.fields, crop_filter, sort)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_keeps_insertion_order() {
        let mut registry = FieldRegistry::new();
        registry.append(&FieldDraft::new("one", 1.0, "Corn")).unwrap();
        registry.append(&FieldDraft::new("two", 2.0, "Soybean")).unwrap();
        let names: Vec<_> = registry.fields().iter().map(Field::name).collect();
        assert_eq!(names, vec!["one", "two"]);
        assert_eq!(registry.crops(), vec![Crop::Corn, Crop::Soybean]);
    }

    #[test]
    fn rejected_draft_is_not_stored() {
        let mut registry = FieldRegistry::new();
        let err = registry
            .append(&FieldDraft::new("", 1.0, "Corn"))
            .unwrap_err();
        assert_eq!(err.issues[0].input, "name");
        assert!(registry.is_empty());
    }

    #[test]
    fn lookup_by_id() {
        let mut registry = FieldRegistry::new();
        let id = registry
            .append(&FieldDraft::new("target", 3.0, "Wheat"))
            .unwrap()
            .id();
        registry.append(&FieldDraft::new("other", 3.0, "Wheat")).unwrap();
        assert_eq!(registry.get(id).map(Field::name), Some("target"));
        assert_eq!(registry.len(), 2);
    }
}
