use dashboard_domain::{ComplaintId, StatusLabel};

/// Form field carrying the requested status.
pub const STATUS_FIELD: &str = "status";

/// A row's status form: where it posts and the fields it currently holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSubmission {
    pub action: String,
    pub fields: Vec<(String, String)>,
}

impl FormSubmission {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value.as_str())
    }

    /// Replaces every occurrence of `name` with a single field.
    pub fn set_field(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.fields.iter().position(|(field, _)| field == name) {
            Some(first) => {
                self.fields[first].1 = value;
                let mut index = 0;
                self.fields.retain(|(field, _)| {
                    let keep = index <= first || field != name;
                    index += 1;
                    keep
                });
            }
            None => self.fields.push((name.to_owned(), value)),
        }
    }
}

/// One in-flight status change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRequest {
    pub row_id: ComplaintId,
    pub new_status: StatusLabel,
    pub generation: u64,
    pub form: FormSubmission,
}

impl MutationRequest {
    pub fn new(
        row_id: ComplaintId,
        new_status: StatusLabel,
        generation: u64,
        mut form: FormSubmission,
    ) -> Self {
        form.set_field(STATUS_FIELD, new_status.as_str());
        Self {
            row_id,
            new_status,
            generation,
            form,
        }
    }
}
