//! Text rendering of parsed responses and errors.
//!
//! Every function returns the exact text to print, trailing newline
//! included, so output can be asserted byte for byte.

use crate::error::{ApiError, ErrorDetail};
use crate::types::{Cluster, Created, Hyperparameter, Page};

pub const NO_DATA: &str = "No data found\n";

/// Fixed-width ASCII table with a boxed header row.
///
/// ```text
/// +------+----+
/// | Name | ID |
/// +------+----+
/// | a    | 1  |
/// +------+----+
/// ```
#[derive(Debug, Clone)]
pub struct Table {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<I, S>(header: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            header: header.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row. Short rows are padded with empty cells; extra cells are
    /// dropped.
    pub fn push_row<I, S>(&mut self, row: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut cells: Vec<String> = row.into_iter().map(Into::into).collect();
        cells.resize(self.header.len(), String::new());
        self.rows.push(cells);
    }

    pub fn render(&self) -> String {
        let widths: Vec<usize> = (0..self.header.len())
            .map(|col| {
                std::iter::once(&self.header)
                    .chain(&self.rows)
                    .map(|row| row[col].chars().count())
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let border = border_line(&widths);
        let mut out = String::new();
        out.push_str(&border);
        out.push_str(&row_line(&self.header, &widths));
        out.push_str(&border);
        for row in &self.rows {
            out.push_str(&row_line(row, &widths));
        }
        out.push_str(&border);
        out
    }
}

fn border_line(widths: &[usize]) -> String {
    let mut line = String::from("+");
    for width in widths {
        line.push_str(&"-".repeat(width + 2));
        line.push('+');
    }
    line.push('\n');
    line
}

fn row_line(cells: &[String], widths: &[usize]) -> String {
    let mut line = String::from("|");
    for (cell, width) in cells.iter().zip(widths) {
        let pad = width - cell.chars().count();
        line.push(' ');
        line.push_str(cell);
        line.push_str(&" ".repeat(pad + 1));
        line.push('|');
    }
    line.push('\n');
    line
}

pub fn created_hyperparameter(created: &Created) -> String {
    format!("Hyperparameter created with ID: {}\n", created.handle)
}

pub fn started_hyperparameter() -> String {
    "Hyperparameter tuning started\n".to_string()
}

pub fn hyperparameter_list(page: &Page<Hyperparameter>) -> String {
    if page.is_empty() {
        return NO_DATA.to_string();
    }
    let mut table = Table::new(["Name", "ID", "Project ID"]);
    for job in &page.items {
        table.push_row([
            job.name.as_str(),
            job.handle.as_str(),
            job.project_handle.as_str(),
        ]);
    }
    table.render()
}

pub fn hyperparameter_details(job: &Hyperparameter) -> String {
    let optional = |value: &Option<String>| value.clone().unwrap_or_default();
    let mut table = Table::new(["Field", "Value"]);
    table.push_row(["Name".to_string(), job.name.clone()]);
    table.push_row(["ID".to_string(), job.handle.clone()]);
    table.push_row(["Project ID".to_string(), job.project_handle.clone()]);
    table.push_row(["Tuning command".to_string(), optional(&job.tuning_command)]);
    table.push_row(["Worker container".to_string(), optional(&job.worker_container)]);
    table.push_row([
        "Worker machine type".to_string(),
        optional(&job.worker_machine_type),
    ]);
    table.push_row(["Worker command".to_string(), optional(&job.worker_command)]);
    table.push_row([
        "Worker count".to_string(),
        job.worker_count.map(|n| n.to_string()).unwrap_or_default(),
    ]);
    table.push_row([
        "State".to_string(),
        job.state.map(|s| s.to_string()).unwrap_or_default(),
    ]);
    table.render()
}

pub fn cluster_list(page: &Page<Cluster>) -> String {
    if page.is_empty() {
        return NO_DATA.to_string();
    }
    let mut table = cluster_table();
    for cluster in &page.items {
        push_cluster(&mut table, cluster);
    }
    table.render()
}

pub fn cluster(cluster: &Cluster) -> String {
    let mut table = cluster_table();
    push_cluster(&mut table, cluster);
    table.render()
}

fn cluster_table() -> Table {
    Table::new(["ID", "Name", "Type"])
}

fn push_cluster(table: &mut Table, cluster: &Cluster) {
    table.push_row([
        cluster.id.as_str(),
        cluster.name.as_str(),
        cluster.cluster_type.as_str(),
    ]);
}

/// Render an error as the lines shown to the user.
pub fn error(err: &ApiError) -> String {
    match err {
        ApiError::Api {
            message, detail, ..
        } => {
            let mut out = format!("{message}\n");
            match detail {
                Some(ErrorDetail::Text(text)) => {
                    out.push_str(text);
                    out.push('\n');
                }
                Some(ErrorDetail::Fields(fields)) => {
                    for (field, field_message) in fields {
                        out.push_str(&format!("{field}: {field_message}\n"));
                    }
                }
                None => {}
            }
            out
        }
        other => format!("{other}\n"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Operation;
    use crate::types::ListMeta;

    fn job(handle: &str) -> Hyperparameter {
        Hyperparameter {
            handle: handle.to_string(),
            name: "some_name".to_string(),
            project_handle: "pr4yxj956".to_string(),
            tuning_command: None,
            worker_container: None,
            worker_machine_type: None,
            worker_command: None,
            worker_count: None,
            state: None,
        }
    }

    #[test]
    fn hyperparameter_table_keeps_response_order() {
        let page = Page {
            items: ["es3dn6fu16r4kk", "eshlqek7wzvrxa", "esdwnui5qsk8qm", "eshz1z9k37w4nm"]
                .into_iter()
                .map(job)
                .collect(),
            meta: Some(ListMeta {
                total_items: Some(4),
                ..Default::default()
            }),
        };
        let expected = "\
+-----------+----------------+------------+
| Name      | ID             | Project ID |
+-----------+----------------+------------+
| some_name | es3dn6fu16r4kk | pr4yxj956  |
| some_name | eshlqek7wzvrxa | pr4yxj956  |
| some_name | esdwnui5qsk8qm | pr4yxj956  |
| some_name | eshz1z9k37w4nm | pr4yxj956  |
+-----------+----------------+------------+
";
        assert_eq!(hyperparameter_list(&page), expected);
    }

    #[test]
    fn zero_total_items_wins_over_data() {
        let page = Page {
            items: vec![job("es1")],
            meta: Some(ListMeta {
                total_items: Some(0),
                ..Default::default()
            }),
        };
        assert_eq!(hyperparameter_list(&page), "No data found\n");
    }

    #[test]
    fn empty_cluster_list() {
        let page: Page<Cluster> = Page {
            items: vec![],
            meta: None,
        };
        assert_eq!(cluster_list(&page), NO_DATA);
    }

    #[test]
    fn single_cluster_table() {
        let out = cluster(&Cluster {
            id: "clmtkpnm2".to_string(),
            name: "prod".to_string(),
            cluster_type: "Job Cluster".to_string(),
        });
        assert_eq!(
            out,
            "\
+-----------+------+-------------+
| ID        | Name | Type        |
+-----------+------+-------------+
| clmtkpnm2 | prod | Job Cluster |
+-----------+------+-------------+
"
        );
    }

    #[test]
    fn details_table_leaves_missing_values_blank() {
        let out = hyperparameter_details(&job("es1"));
        assert!(out.contains("| Worker count        |           |\n"));
        assert!(out.contains("| ID                  | es1       |\n"));
    }

    #[test]
    fn created_message() {
        let created = Created {
            handle: "eshgvasywz9k1w".to_string(),
        };
        assert_eq!(
            created_hyperparameter(&created),
            "Hyperparameter created with ID: eshgvasywz9k1w\n"
        );
    }

    #[test]
    fn error_with_field_mapping() {
        let err = ApiError::Api {
            status: 400,
            message: "Experiment data error".to_string(),
            detail: Some(ErrorDetail::Fields(vec![(
                "projectHandle".to_string(),
                "Missing data for required field.".to_string(),
            )])),
        };
        assert_eq!(
            error(&err),
            "Experiment data error\nprojectHandle: Missing data for required field.\n"
        );
    }

    #[test]
    fn error_with_text_detail() {
        let err = ApiError::Api {
            status: 403,
            message: "Forbidden".to_string(),
            detail: Some(ErrorDetail::Text("Incorrect API Key provided".to_string())),
        };
        assert_eq!(error(&err), "Forbidden\nIncorrect API Key provided\n");
    }

    #[test]
    fn error_message_only() {
        let err = ApiError::Api {
            status: 401,
            message: "No such API token".to_string(),
            detail: None,
        };
        assert_eq!(error(&err), "No such API token\n");
    }

    #[test]
    fn unknown_error() {
        let err = ApiError::Unknown {
            status: 500,
            operation: Operation::CreateHyperparameter,
        };
        assert_eq!(error(&err), "Unknown error while creating hyperparameter\n");
    }

    #[test]
    fn cell_width_counts_chars_not_bytes() {
        let mut table = Table::new(["Name"]);
        table.push_row(["héllo"]);
        assert_eq!(
            table.render(),
            "+-------+\n| Name  |\n+-------+\n| héllo |\n+-------+\n"
        );
    }
}
