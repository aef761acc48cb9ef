use crate::model::{Student, StudentDraft};

/// Roster edit dialog state. Opening copies the selected student into an
/// editable draft; closing discards it. The daemon handles requests
/// sequentially, so rejecting submit/field calls while `Closed` is what
/// guards against double submission.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum EditForm {
    #[default]
    Closed,
    Open {
        original_id: String,
        draft: StudentDraft,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormError {
    NotOpen,
    UnknownField(String),
    MissingRequired(&'static str),
}

impl FormError {
    pub fn message(&self) -> String {
        match self {
            FormError::NotOpen => "no student is being edited".to_string(),
            FormError::UnknownField(f) => format!("unknown field: {}", f),
            FormError::MissingRequired(f) => format!("{} must not be blank", f),
        }
    }
}

impl EditForm {
    pub fn is_open(&self) -> bool {
        matches!(self, EditForm::Open { .. })
    }

    pub fn open(&mut self, student: &Student) {
        *self = EditForm::Open {
            original_id: student.id.clone(),
            draft: StudentDraft::from(student),
        };
    }

    pub fn cancel(&mut self) {
        *self = EditForm::Closed;
    }

    pub fn set_field(&mut self, field: &str, value: &str) -> Result<(), FormError> {
        let EditForm::Open { draft, .. } = self else {
            return Err(FormError::NotOpen);
        };
        match field {
            "name" => draft.name = value.to_string(),
            "studentId" => draft.student_id = value.to_string(),
            "classLevel" => draft.class_level = value.to_string(),
            "sex" => draft.sex = value.to_string(),
            other => return Err(FormError::UnknownField(other.to_string())),
        }
        Ok(())
    }

    /// Validates the draft for submission without consuming it; the form
    /// stays open until the backend confirms the update.
    pub fn submission(&self) -> Result<(&str, &StudentDraft), FormError> {
        let EditForm::Open { original_id, draft } = self else {
            return Err(FormError::NotOpen);
        };
        if draft.name.trim().is_empty() {
            return Err(FormError::MissingRequired("name"));
        }
        if draft.student_id.trim().is_empty() {
            return Err(FormError::MissingRequired("studentId"));
        }
        Ok((original_id.as_str(), draft))
    }

    pub fn draft(&self) -> Option<&StudentDraft> {
        match self {
            EditForm::Open { draft, .. } => Some(draft),
            EditForm::Closed => None,
        }
    }
}
