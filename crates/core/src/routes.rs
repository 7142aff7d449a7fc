//! Client-side route table.

use crate::constants::PATIENTS_PATH;

/// A screen of the admin client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Patients,
    PatientDetail(String),
    Contacts,
}

impl Route {
    /// Map a path to its screen. Anything unknown lands on the patient list.
    pub fn resolve(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [PATIENTS_PATH] => Route::Patients,
            [PATIENTS_PATH, id] => Route::PatientDetail((*id).to_owned()),
            ["contacts"] => Route::Contacts,
            _ => Route::Patients,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Patients => format!("/{PATIENTS_PATH}"),
            Route::PatientDetail(id) => format!("/{PATIENTS_PATH}/{id}"),
            Route::Contacts => "/contacts".to_owned(),
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path())
    }
}
