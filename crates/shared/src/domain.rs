use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                std::fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

id_newtype!(DocenteId);

/// Teacher record as stored by the directory service. The id is server-assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Docente {
    pub id: DocenteId,
    pub nombre: String,
    pub email: String,
    pub especialidad: String,
}

impl Docente {
    /// Copies the editable fields into a fresh draft.
    pub fn to_draft(&self) -> Draft {
        Draft {
            nombre: self.nombre.clone(),
            email: self.email.clone(),
            especialidad: self.especialidad.clone(),
        }
    }
}

/// Editable fields of a docente, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftField {
    Nombre,
    Email,
    Especialidad,
}

impl DraftField {
    pub const ALL: [DraftField; 3] = [
        DraftField::Nombre,
        DraftField::Email,
        DraftField::Especialidad,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DraftField::Nombre => "nombre",
            DraftField::Email => "email",
            DraftField::Especialidad => "especialidad",
        }
    }
}

/// In-progress form contents. Also the JSON body of create and update requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    pub nombre: String,
    pub email: String,
    pub especialidad: String,
}

impl Draft {
    pub fn get(&self, field: DraftField) -> &str {
        match field {
            DraftField::Nombre => &self.nombre,
            DraftField::Email => &self.email,
            DraftField::Especialidad => &self.especialidad,
        }
    }

    pub fn field_mut(&mut self, field: DraftField) -> &mut String {
        match field {
            DraftField::Nombre => &mut self.nombre,
            DraftField::Email => &mut self.email,
            DraftField::Especialidad => &mut self.especialidad,
        }
    }

    pub fn set(&mut self, field: DraftField, value: impl Into<String>) {
        *self.field_mut(field) = value.into();
    }

    pub fn is_empty(&self) -> bool {
        self.nombre.is_empty() && self.email.is_empty() && self.especialidad.is_empty()
    }
}

/// Entries whose `nombre` contains `filter`, ignoring case. Order is preserved
/// and an empty filter matches everything.
pub fn filter_by_nombre<'a>(docentes: &'a [Docente], filter: &str) -> Vec<&'a Docente> {
    let needle = filter.to_lowercase();
    docentes
        .iter()
        .filter(|docente| docente.nombre.to_lowercase().contains(&needle))
        .collect()
}
