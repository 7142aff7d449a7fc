//! Plain-text rendering of the views.

use clinic_core::format::{format_date_time, format_short_date, format_visit_date};
use clinic_core::messages;
use clinic_core::models::{Patient, Visit};
use clinic_core::store::PatientListState;
use clinic_core::views::patient_list::{column_keys, format_cell_value, page_window};
use clinic_core::views::PageItem;

pub fn patient_table(state: &PatientListState) -> String {
    let columns: Vec<_> = column_keys(&state.patients)
        .into_iter()
        .filter(|c| c.key() != "actions")
        .collect();

    let mut rows: Vec<Vec<String>> = vec![columns.iter().map(|c| c.header().to_owned()).collect()];
    rows.extend(state.patients.iter().map(|p| {
        columns
            .iter()
            .map(|c| format_cell_value(*c, p))
            .collect()
    }));

    let mut out = align(&rows);
    if state.patients.is_empty() {
        let empty = if state.search_query.is_empty() {
            "-"
        } else {
            messages::NO_PATIENTS_FOR_QUERY
        };
        out.push_str(empty);
        out.push('\n');
    }
    out.push_str(&pager(state.current_page, state.total_pages));
    out.push_str(&format!(
        "  ({} всего, по {} на странице)\n",
        state.total_patients, state.items_per_page
    ));
    out
}

fn pager(current: u32, total_pages: u32) -> String {
    page_window(current, total_pages)
        .into_iter()
        .map(|item| match item {
            PageItem::Page { number, active: true } => format!("[{number}]"),
            PageItem::Page { number, .. } => number.to_string(),
            PageItem::Ellipsis => "…".to_owned(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn patient_card(patient: &Patient) -> String {
    let fields = [
        ("ID", patient.id.clone()),
        ("Дата рождения", format_date_time(Some(&patient.date_of_birth))),
        ("Телефон", patient.phone_number.clone()),
        ("Email", patient.email.clone()),
        ("Создано", format_short_date(&patient.created_at.to_rfc3339())),
        ("Обновлено", format_short_date(&patient.updated_at.to_rfc3339())),
    ];

    let mut out = format!("{}\n", patient.full_name());
    for (label, value) in fields {
        out.push_str(&format!("  {:<15}{value}\n", format!("{label}:")));
    }
    out
}

pub fn visit_table(visits: &[Visit], empty_message: Option<&str>) -> String {
    if let Some(message) = empty_message {
        return format!("{message}\n");
    }

    let mut rows = vec![vec![
        "Дата".to_owned(),
        "Статус".to_owned(),
        "Диагноз".to_owned(),
        "Лечение".to_owned(),
        "Заметки".to_owned(),
        "ID".to_owned(),
    ]];
    rows.extend(visits.iter().map(|v| {
        vec![
            format_visit_date(&v.visit_date),
            v.status.label().to_owned(),
            v.diagnosis.clone(),
            v.treatment.clone(),
            v.notes.clone().unwrap_or_else(|| messages::NO_NOTES.to_owned()),
            v.id.clone(),
        ]
    }));
    align(&rows)
}

fn align(rows: &[Vec<String>]) -> String {
    let widths: Vec<usize> = (0..rows.first().map_or(0, Vec::len))
        .map(|i| {
            rows.iter()
                .map(|r| r.get(i).map_or(0, |c| c.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    for row in rows {
        let line: Vec<String> = row
            .iter()
            .zip(widths.iter().copied())
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect();
        out.push_str(line.join("  ").trim_end());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_are_padded_by_char_count() {
        let rows = vec![
            vec!["Имя".to_owned(), "ID".to_owned()],
            vec!["Анна".to_owned(), "1".to_owned()],
        ];
        assert_eq!(align(&rows), "Имя   ID\nАнна  1\n");
    }

    #[test]
    fn pager_marks_current_page() {
        assert_eq!(pager(10, 20), "1 … 8 9 [10] 11 12 … 20");
    }

    #[test]
    fn patient_card_aligns_labels() {
        let patient = Patient {
            id: "p-1".into(),
            first_name: "Анна".into(),
            last_name: "Иванова".into(),
            date_of_birth: "1990-04-12".into(),
            phone_number: "+79000000000".into(),
            email: "anna@example.com".into(),
            created_at: "2024-01-05T12:00:00Z".parse().unwrap(),
            updated_at: "2024-01-05T12:00:00Z".parse().unwrap(),
        };

        let card = patient_card(&patient);
        let lines: Vec<&str> = card.lines().collect();
        assert_eq!(lines[0], "Анна Иванова");
        assert_eq!(lines[1], "  ID:            p-1");
        assert_eq!(lines[2], "  Дата рождения: 12 апреля 1990 г.");
        assert!(lines[5].starts_with("  Создано:       "));
        assert!(lines[5].ends_with(".2024"));
    }

    #[test]
    fn empty_visit_table_shows_message() {
        assert_eq!(
            visit_table(&[], Some(messages::NO_VISITS_YET)),
            "У этого пациента пока нет визитов.\n"
        );
    }
}
