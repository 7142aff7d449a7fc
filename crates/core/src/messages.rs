//! User-facing strings.
//!
//! The clinic staff work in Russian, so every message surfaced to a user is kept
//! here verbatim. Log lines stay in English.

pub const VISIT_IN_PAST: &str = "Время визита не может быть в прошлом. Выберите будущее время.";

pub const UNKNOWN_ERROR: &str = "Неизвестная ошибка.";
pub const PATIENTS_LOAD_FAILED: &str = "Не удалось загрузить пациентов.";
pub const PATIENT_LOAD_FAILED: &str = "Не удалось загрузить данные пациента.";
pub const PATIENT_DELETE_FAILED: &str = "Неизвестная ошибка при удалении пациента.";
pub const VISIT_ID_MISSING: &str = "ID визита для обновления не найден.";

pub const CONFIRM_DELETE_PATIENT: &str =
    "Вы уверены, что хотите удалить этого пациента? Это также удалит все связанные визиты.";
pub const CONFIRM_DELETE_VISIT: &str = "Вы уверены, что хотите удалить этот визит?";

pub const PATIENT_ADDED: &str = "Пациент успешно добавлен!";
pub const PATIENT_DELETED: &str = "Пациент успешно удален!";
pub const PATIENT_UPDATED: &str = "Данные пациента успешно обновлены!";
pub const VISIT_ADDED: &str = "Новый визит успешно добавлен!";
pub const VISIT_UPDATED: &str = "Визит успешно обновлен!";
pub const VISIT_DELETE_FAILED_PREFIX: &str = "Ошибка при удалении визита";

pub const NO_PATIENTS_FOR_QUERY: &str = "Пациенты по вашему запросу не найдены.";
pub const PATIENT_NOT_FOUND: &str = "Данные пациента не найдены.";
pub const NO_VISITS_FOR_FILTER: &str = "Нет визитов с выбранными критериями фильтрации.";
pub const NO_VISITS_YET: &str = "У этого пациента пока нет визитов.";
pub const NO_NOTES: &str = "Нет";

pub const DATE_NOT_SET: &str = "Не указано";
pub const DATE_INVALID: &str = "Некорректная дата";

pub const REQUIRED_FIELD: &str = "Поле обязательно для заполнения";
pub const INVALID_EMAIL: &str = "Некорректный email";
pub const INVALID_DATETIME: &str = "Некорректная дата и время визита";
