use crate::domain::DocenteId;

/// Collection path of the docente directory, relative to the API base URL.
pub const DOCENTES_PATH: &str = "/api/docentes";

pub fn docentes_url(base_url: &str) -> String {
    format!("{}{DOCENTES_PATH}", base_url.trim_end_matches('/'))
}

pub fn docente_url(base_url: &str, id: DocenteId) -> String {
    format!("{}/{}", docentes_url(base_url), id.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_collection_and_item_urls() {
        assert_eq!(
            docentes_url("http://localhost:3000"),
            "http://localhost:3000/api/docentes"
        );
        assert_eq!(
            docente_url("http://localhost:3000/", DocenteId(42)),
            "http://localhost:3000/api/docentes/42"
        );
    }
}
