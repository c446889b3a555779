//! Recorded end-user submissions

use super::{PersistenceGateway, StoreError, SubmitError};
use crate::state::{new_id, now_millis, validate_form, FieldValue, Form};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

const SUBMISSIONS_KEY: &str = "submissions";

/// One completed fill-in of a form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    pub id: String,
    pub form_id: String,
    pub data: HashMap<String, FieldValue>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub submitted_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct SubmissionStore {
    gateway: Arc<dyn PersistenceGateway>,
}

impl SubmissionStore {
    pub fn new(gateway: Arc<dyn PersistenceGateway>) -> Self {
        Self { gateway }
    }

    async fn all(&self) -> Result<Vec<SubmissionRecord>, StoreError> {
        match self.gateway.get(SUBMISSIONS_KEY).await? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    async fn write_all(&self, records: &[SubmissionRecord]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(records)?;
        self.gateway.set(SUBMISSIONS_KEY, &raw).await
    }

    /// Validate `data` against every step of `form` and record it when it passes
    pub async fn submit(
        &self,
        form: &Form,
        data: HashMap<String, FieldValue>,
    ) -> Result<SubmissionRecord, SubmitError> {
        let errors = validate_form(form, &data);
        if !errors.is_empty() {
            tracing::debug!("Submission to {} rejected: {:?}", form.id, errors);
            return Err(SubmitError::Invalid(errors));
        }

        let record = SubmissionRecord {
            id: new_id(),
            form_id: form.id.clone(),
            data,
            submitted_at: now_millis(),
        };
        let mut records = self.all().await?;
        records.push(record.clone());
        self.write_all(&records).await?;
        tracing::info!("Recorded submission {} for form {}", record.id, form.id);
        Ok(record)
    }

    /// Submissions of one form, oldest first
    pub async fn for_form(&self, form_id: &str) -> Result<Vec<SubmissionRecord>, StoreError> {
        Ok(self
            .all()
            .await?
            .into_iter()
            .filter(|r| r.form_id == form_id)
            .collect())
    }

    pub async fn delete(&self, submission_id: &str) -> Result<(), StoreError> {
        let mut records = self.all().await?;
        let before = records.len();
        records.retain(|r| r.id != submission_id);
        if records.len() != before {
            self.write_all(&records).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Field, FieldType, ValidationRule};
    use crate::store::MemoryGateway;
    use pretty_assertions::assert_eq;

    fn form_with_required_name() -> (Form, String) {
        let mut form = Form::untitled();
        let field = Field::new(FieldType::Text)
            .with_label("Name")
            .with_rule(ValidationRule::required("Name is required"));
        let id = field.id.clone();
        form.steps[0].fields.push(field);
        (form, id)
    }

    fn store() -> SubmissionStore {
        SubmissionStore::new(Arc::new(MemoryGateway::new()))
    }

    #[tokio::test]
    async fn test_invalid_submission_is_rejected_and_not_stored() {
        let store = store();
        let (form, field_id) = form_with_required_name();

        let err = store.submit(&form, HashMap::new()).await.unwrap_err();
        match err {
            SubmitError::Invalid(errors) => {
                assert_eq!(errors.get(&field_id).map(String::as_str), Some("Name is required"));
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert!(store.for_form(&form.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_valid_submissions_are_listed_per_form() {
        let store = store();
        let (form, field_id) = form_with_required_name();
        let other = Form::untitled();

        let mut data = HashMap::new();
        data.insert(field_id.clone(), FieldValue::Text("Ada".into()));
        let first = store.submit(&form, data.clone()).await.unwrap();
        store.submit(&other, HashMap::new()).await.unwrap();
        data.insert(field_id, FieldValue::Text("Grace".into()));
        let second = store.submit(&form, data).await.unwrap();

        let ids: Vec<_> = store
            .for_form(&form.id)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![first.id, second.id]);
    }

    #[tokio::test]
    async fn test_delete_removes_only_that_record() {
        let store = store();
        let form = Form::untitled();
        let a = store.submit(&form, HashMap::new()).await.unwrap();
        let b = store.submit(&form, HashMap::new()).await.unwrap();

        store.delete(&a.id).await.unwrap();
        store.delete("missing").await.unwrap();

        let left = store.for_form(&form.id).await.unwrap();
        assert_eq!(left, vec![b]);
    }

    #[test]
    fn test_record_json_shape() {
        let record = SubmissionRecord {
            id: "s1".into(),
            form_id: "f1".into(),
            data: HashMap::from([("a".to_string(), FieldValue::Number(3.0))]),
            submitted_at: DateTime::from_timestamp_millis(1_700_000_000_000).unwrap(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["formId"], "f1");
        assert_eq!(json["submittedAt"], 1_700_000_000_000_i64);
        assert_eq!(json["data"]["a"], 3.0);
    }
}
